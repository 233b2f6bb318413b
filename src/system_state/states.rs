use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing state of the relay pipeline as a whole
///
/// Deliberately open to extension (a degraded or rate-limited state would
/// slot in here); the pause flag on [`SystemState`] must track membership of
/// the paused family in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingState {
    /// Workers consume the subscription normally
    #[default]
    Normal,
    /// Workers skip polling until resumed
    Paused,
}

impl ProcessingState {
    /// Check if workers should stop pulling from the subscription
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Get a human-readable description of this state
    pub fn description(&self) -> &'static str {
        match self {
            Self::Normal => "Processing events normally",
            Self::Paused => "Processing paused by operator",
        }
    }
}

impl fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Paused => write!(f, "PAUSED"),
        }
    }
}

impl std::str::FromStr for ProcessingState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NORMAL" => Ok(Self::Normal),
            "PAUSED" => Ok(Self::Paused),
            _ => Err(format!("Invalid processing state: {s}")),
        }
    }
}

/// The control plane's shared state triple
///
/// Serialized shape matches the HTTP surface:
/// `{"state": "NORMAL", "pauseProcessing": false, "maxProcessingRate": null}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemState {
    pub state: ProcessingState,
    pub pause_processing: bool,
    /// Advisory messages/sec cap for rate-limited extensions; currently
    /// never enforced by workers and never mutated
    #[serde(default)]
    pub max_processing_rate: Option<u32>,
}

impl Default for SystemState {
    fn default() -> Self {
        Self {
            state: ProcessingState::Normal,
            pause_processing: false,
            max_processing_rate: None,
        }
    }
}

impl SystemState {
    /// The state after a pause request; idempotent
    pub fn paused(self) -> Self {
        Self {
            state: ProcessingState::Paused,
            pause_processing: true,
            ..self
        }
    }

    /// The state after a resume request; idempotent
    pub fn resumed(self) -> Self {
        Self {
            state: ProcessingState::Normal,
            pause_processing: false,
            ..self
        }
    }

    /// The lockstep invariant: the pause flag agrees with the state enum
    pub fn invariant_holds(&self) -> bool {
        self.pause_processing == self.state.is_paused()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_state_is_normal_and_unpaused() {
        let state = SystemState::default();

        assert_eq!(state.state, ProcessingState::Normal);
        assert!(!state.pause_processing);
        assert_eq!(state.max_processing_rate, None);
        assert!(state.invariant_holds());
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let paused = SystemState::default().paused().paused();
        assert_eq!(paused.state, ProcessingState::Paused);
        assert!(paused.pause_processing);

        let resumed = paused.resumed().resumed();
        assert_eq!(resumed.state, ProcessingState::Normal);
        assert!(!resumed.pause_processing);
    }

    #[test]
    fn pause_preserves_rate_cap() {
        let state = SystemState {
            max_processing_rate: Some(100),
            ..SystemState::default()
        };

        assert_eq!(state.paused().max_processing_rate, Some(100));
    }

    #[test]
    fn state_display_matches_wire_format() {
        assert_eq!(ProcessingState::Normal.to_string(), "NORMAL");
        assert_eq!(ProcessingState::Paused.to_string(), "PAUSED");
    }

    #[test]
    fn state_descriptions_are_operator_readable() {
        assert_eq!(
            ProcessingState::Normal.description(),
            "Processing events normally"
        );
        assert_eq!(
            ProcessingState::Paused.description(),
            "Processing paused by operator"
        );
    }

    #[test]
    fn state_round_trips_through_from_str() {
        assert_eq!(
            "NORMAL".parse::<ProcessingState>().unwrap(),
            ProcessingState::Normal
        );
        assert_eq!(
            "PAUSED".parse::<ProcessingState>().unwrap(),
            ProcessingState::Paused
        );
        assert!("paused".parse::<ProcessingState>().is_err());
    }

    #[test]
    fn wire_format_uses_camel_case_fields() {
        let json = serde_json::to_value(SystemState::default()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "state": "NORMAL",
                "pauseProcessing": false,
                "maxProcessingRate": null
            })
        );
    }

    proptest! {
        /// For any sequence of pause/resume calls the lockstep invariant
        /// holds after every step.
        #[test]
        fn invariant_holds_under_any_operation_sequence(
            ops in proptest::collection::vec(any::<bool>(), 0..64)
        ) {
            let mut state = SystemState::default();
            prop_assert!(state.invariant_holds());

            for pause in ops {
                state = if pause { state.paused() } else { state.resumed() };
                prop_assert!(state.invariant_holds());
                prop_assert_eq!(state.pause_processing, state.state.is_paused());
            }
        }
    }
}
