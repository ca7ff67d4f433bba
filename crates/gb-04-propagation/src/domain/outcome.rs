//! # Propagation Outcome
//!
//! Terminal state of one target node, derived from which steps succeeded:
//!
//! | trusted | action ok | alert ok | outcome |
//! |---------|-----------|----------|---------|
//! | yes | yes | any | `Success` |
//! | yes | no | yes | `ErrorFallbackAlert` |
//! | yes | no | no | `ErrorFailure` |
//! | no | any | yes | `NonTrustedAlert` |
//! | no | any | no | `ErrorFailure` |

use std::fmt;

/// Outcome of a global ban on one target node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropagationOutcome {
    /// Target trusts the origin and the ban was applied.
    Success,
    /// Target does not trust the origin; an alert with fallback controls was posted.
    NonTrustedAlert,
    /// Ban failed; an alert with a retry control was posted.
    ErrorFallbackAlert,
    /// Nothing was applied and no alert could be posted.
    ErrorFailure,
}

impl PropagationOutcome {
    /// All outcomes, in reporting order.
    pub const ALL: [PropagationOutcome; 4] = [
        PropagationOutcome::Success,
        PropagationOutcome::NonTrustedAlert,
        PropagationOutcome::ErrorFallbackAlert,
        PropagationOutcome::ErrorFailure,
    ];

    /// Classify a target from the steps that succeeded.
    ///
    /// `alert_succeeded` is false when no alert was attempted (no
    /// notification channel configured).
    pub fn from_steps(trusted: bool, action_succeeded: bool, alert_succeeded: bool) -> Self {
        match (trusted, action_succeeded, alert_succeeded) {
            (true, true, _) => PropagationOutcome::Success,
            (true, false, true) => PropagationOutcome::ErrorFallbackAlert,
            (false, _, true) => PropagationOutcome::NonTrustedAlert,
            (_, _, false) => PropagationOutcome::ErrorFailure,
        }
    }

    /// Stable label used for metrics and logs.
    pub fn label(self) -> &'static str {
        match self {
            PropagationOutcome::Success => "success",
            PropagationOutcome::NonTrustedAlert => "non_trusted_alert",
            PropagationOutcome::ErrorFallbackAlert => "error_fallback_alert",
            PropagationOutcome::ErrorFailure => "error_failure",
        }
    }
}

impl fmt::Display for PropagationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PropagationOutcome::*;

    #[test]
    fn test_truth_table() {
        assert_eq!(PropagationOutcome::from_steps(true, true, true), Success);
        assert_eq!(PropagationOutcome::from_steps(true, true, false), Success);
        assert_eq!(
            PropagationOutcome::from_steps(true, false, true),
            ErrorFallbackAlert
        );
        assert_eq!(PropagationOutcome::from_steps(true, false, false), ErrorFailure);
        assert_eq!(PropagationOutcome::from_steps(false, false, true), NonTrustedAlert);
        assert_eq!(PropagationOutcome::from_steps(false, false, false), ErrorFailure);
    }

    #[test]
    fn test_untrusted_ignores_action_flag() {
        assert_eq!(PropagationOutcome::from_steps(false, true, true), NonTrustedAlert);
        assert_eq!(PropagationOutcome::from_steps(false, true, false), ErrorFailure);
    }

    #[test]
    fn test_labels_unique() {
        let labels: std::collections::HashSet<_> =
            PropagationOutcome::ALL.iter().map(|o| o.label()).collect();
        assert_eq!(labels.len(), 4);
    }
}
