//! View state machine: landing → analyzing → chat.

use forge_models::{AnalysisInput, ViewState};
use thiserror::Error;
use tracing::debug;

/// A transition not allowed from the current view.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot {action} from the {from} view")]
pub struct TransitionError {
    /// View the machine was in.
    pub from: ViewState,
    /// Attempted transition.
    pub action: &'static str,
}

/// Owns the current [`ViewState`] and its legal transitions.
///
/// `Landing → Analyzing` on submit, `Analyzing → Chat` on success and
/// `Analyzing → Landing` on failure. There is no way back from chat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewMachine {
    state: ViewState,
}

impl ViewMachine {
    /// Start on the landing view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view.
    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Submit a source for analysis.
    pub fn begin(&mut self, input: &AnalysisInput) -> Result<(), TransitionError> {
        self.transition(ViewState::Landing, ViewState::Analyzing, "begin an analysis")?;
        debug!(source = input.label(), "View: analyzing");
        Ok(())
    }

    /// The first analysis succeeded.
    pub fn complete(&mut self) -> Result<(), TransitionError> {
        self.transition(ViewState::Analyzing, ViewState::Chat, "complete an analysis")
    }

    /// The first analysis failed.
    pub fn fail(&mut self) -> Result<(), TransitionError> {
        self.transition(ViewState::Analyzing, ViewState::Landing, "fail an analysis")
    }

    fn transition(
        &mut self,
        expected: ViewState,
        next: ViewState,
        action: &'static str,
    ) -> Result<(), TransitionError> {
        if self.state != expected {
            return Err(TransitionError {
                from: self.state,
                action,
            });
        }
        self.state = next;
        Ok(())
    }
}
