//! Run-over-run change detection.
//!
//! The tracker is a pure function of (prior state, this run's evaluation).
//! It never touches storage: the caller loads the prior state, and writes back
//! `Transition::state` when it is `Some`.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{PersistedState, PositionAction, SignalResult};
use crate::engine::Evaluation;
use crate::error::{DataErrorReport, SignalError};

/// What one run produced, as seen by the notification layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub result: Option<SignalResult>,
    /// Signal type or position differs from the prior run (or there was none).
    pub changed: bool,
    pub data_error: Option<DataErrorReport>,
    /// Position change relative to the prior run; absent on data errors.
    pub action: Option<PositionAction>,
}

impl RunOutcome {
    /// Whether downstream should alert: a material change or a data error.
    pub fn notify(&self) -> bool {
        self.changed || self.data_error.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub outcome: RunOutcome,
    /// State to persist. `None` means keep the stored state untouched.
    pub state: Option<PersistedState>,
}

pub struct StateTracker;

impl StateTracker {
    pub fn transition(
        prior: Option<&PersistedState>,
        evaluation: Result<Evaluation, SignalError>,
    ) -> Transition {
        match evaluation.and_then(|eval| Self::build_result(prior, eval)) {
            Ok(result) => {
                let changed = match prior {
                    None => true,
                    Some(p) => {
                        p.last_signal_type != result.signal_type
                            || p.last_position_pct != result.position_pct
                    }
                };
                let prior_pct = prior.map_or(0.0, |p| p.last_position_pct);
                let action = PositionAction::between(prior_pct, result.position_pct);
                let state = PersistedState::from(&result);

                info!(
                    date = %result.date,
                    signal = %result.signal_type,
                    position_pct = result.position_pct,
                    changed,
                    "signal evaluated"
                );

                Transition {
                    outcome: RunOutcome {
                        result: Some(result),
                        changed,
                        data_error: None,
                        action: Some(action),
                    },
                    state: Some(state),
                }
            }
            Err(err) => {
                warn!(error = %err, kind = ?err.kind(), "run produced no signal");
                Transition {
                    outcome: RunOutcome {
                        result: None,
                        changed: false,
                        data_error: Some(DataErrorReport::from(&err)),
                        action: None,
                    },
                    state: None,
                }
            }
        }
    }

    fn build_result(
        prior: Option<&PersistedState>,
        eval: Evaluation,
    ) -> Result<SignalResult, SignalError> {
        let position_pct = eval
            .band
            .position
            .resolve(prior.map(|p| p.last_position_pct));

        if position_pct > 0.0 && eval.stop_loss_price > eval.close {
            return Err(SignalError::InvalidStop {
                stop: eval.stop_loss_price,
                close: eval.close,
            });
        }

        Ok(SignalResult {
            date: eval.date,
            close: eval.close,
            composite_score: eval.composite_score,
            sub_signals: eval.sub_signals,
            signal_type: eval.band.signal_type,
            position_pct,
            stop_loss_price: eval.stop_loss_price,
        })
    }
}
