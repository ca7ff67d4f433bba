//! # Summaries
//!
//! Aggregates reported to the issuer once every target has resolved. Built
//! by counting, so completion order is irrelevant.

use super::outcome::PropagationOutcome;
use shared_types::NodeId;
use std::collections::HashMap;

fn servers(count: usize) -> &'static str {
    if count == 1 {
        "server"
    } else {
        "servers"
    }
}

/// Per-outcome counts of one global ban.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropagationSummary {
    /// Targets that applied the ban.
    pub success_count: usize,
    /// Targets that do not trust the origin and got an alert.
    pub non_trusted_alert_count: usize,
    /// Targets where the ban failed and a retry alert was posted.
    pub fallback_alert_count: usize,
    /// Targets where nothing could be done.
    pub failure_count: usize,
}

impl PropagationSummary {
    /// Count outcomes.
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a PropagationOutcome>) -> Self {
        outcomes
            .into_iter()
            .fold(Self::default(), |mut summary, outcome| {
                summary.record(*outcome);
                summary
            })
    }

    /// Count the values of a fan-out result map.
    pub fn from_results(results: &HashMap<NodeId, PropagationOutcome>) -> Self {
        Self::from_outcomes(results.values())
    }

    /// Add one outcome.
    pub fn record(&mut self, outcome: PropagationOutcome) {
        match outcome {
            PropagationOutcome::Success => self.success_count += 1,
            PropagationOutcome::NonTrustedAlert => self.non_trusted_alert_count += 1,
            PropagationOutcome::ErrorFallbackAlert => self.fallback_alert_count += 1,
            PropagationOutcome::ErrorFailure => self.failure_count += 1,
        }
    }

    /// Count for one outcome.
    pub fn count(&self, outcome: PropagationOutcome) -> usize {
        match outcome {
            PropagationOutcome::Success => self.success_count,
            PropagationOutcome::NonTrustedAlert => self.non_trusted_alert_count,
            PropagationOutcome::ErrorFallbackAlert => self.fallback_alert_count,
            PropagationOutcome::ErrorFailure => self.failure_count,
        }
    }

    /// Total number of resolved targets.
    pub fn total(&self) -> usize {
        self.success_count
            + self.non_trusted_alert_count
            + self.fallback_alert_count
            + self.failure_count
    }

    /// Issuer-facing report. The success line is always present; every
    /// other class adds a line only when nonzero.
    pub fn render(&self, target_name: &str) -> String {
        let mut msg = format!(
            ":white_check_mark: Successfully banned **{}** across **{}** {}.",
            target_name,
            self.success_count,
            servers(self.success_count)
        );
        if self.non_trusted_alert_count > 0 {
            msg.push_str(&format!(
                "\n- :information_source: {} {} did not automatically apply the ban because your \
                 server isn't in their trusted list. An alert was sent for them instead.",
                self.non_trusted_alert_count,
                servers(self.non_trusted_alert_count)
            ));
        }
        if self.fallback_alert_count > 0 {
            msg.push_str(&format!(
                "\n- :x: {} {} failed to apply the ban due to an error. An alert was sent for \
                 them instead.",
                self.fallback_alert_count,
                servers(self.fallback_alert_count)
            ));
        }
        if self.failure_count > 0 {
            msg.push_str(&format!(
                "\n- :no_entry: {} {} failed to apply the ban and did not receive a fallback \
                 alert either due to multiple errors.",
                self.failure_count,
                servers(self.failure_count)
            ));
        }
        msg
    }
}

/// Counts of one global alert broadcast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlertSummary {
    /// Nodes where the alert was posted.
    pub success_count: usize,
    /// Nodes without a notification channel or where posting failed.
    pub failure_count: usize,
}

impl AlertSummary {
    /// Count a fan-out result map.
    pub fn from_results(results: &HashMap<NodeId, bool>) -> Self {
        let success_count = results.values().filter(|ok| **ok).count();
        Self {
            success_count,
            failure_count: results.len() - success_count,
        }
    }

    /// Issuer-facing report.
    pub fn render(&self, target_name: &str) -> String {
        let mut msg = format!(
            ":white_check_mark: Successfully sent an alert for **{}** across **{}** {}.",
            target_name,
            self.success_count,
            servers(self.success_count)
        );
        if self.failure_count > 0 {
            msg.push_str(&format!(
                "\n- :warning: The alert was not sent on {} {} due to errors.",
                self.failure_count,
                servers(self.failure_count)
            ));
        }
        msg
    }
}
