use crate::{core::store::PlanId, types::travel_types::TravelPlan};
use serde::Serialize;
use std::time::Duration;

/// Result of one plan-generation request that passed form validation
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanOutcome {
    /// The service answered; the plan is now in the session store
    Generated {
        id: PlanId,
        plan: TravelPlan,
        duration: Duration,
        fragments: usize,
    },
    /// The service failed; nothing was stored
    Failed {
        code: &'static str,
        message: String,
    },
}

impl PlanOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PlanOutcome::Generated { .. })
    }

    pub fn plan(&self) -> Option<&TravelPlan> {
        match self {
            PlanOutcome::Generated { plan, .. } => Some(plan),
            PlanOutcome::Failed { .. } => None,
        }
    }

    pub fn id(&self) -> Option<PlanId> {
        match self {
            PlanOutcome::Generated { id, .. } => Some(*id),
            PlanOutcome::Failed { .. } => None,
        }
    }

    /// Text shown to the user after the request resolves
    pub fn render(&self) -> String {
        match self {
            PlanOutcome::Generated {
                id,
                plan,
                duration,
                fragments,
            } => {
                let mut lines = vec![format!(
                    "Travel plan #{} generated successfully! ({:.2}s, {} fragments)",
                    id,
                    duration.as_secs_f64(),
                    fragments
                )];
                lines.push(plan.describe());
                lines.join("\n")
            }
            PlanOutcome::Failed { message, .. } => format!("Error: {}", message),
        }
    }

    /// Error text for a failed request whose fragments were already printed.
    ///
    /// Printed fragments are not part of any stored plan, so the notice says so
    /// before the error line.
    pub fn failure_notice(&self, partial_shown: bool) -> Option<String> {
        match self {
            PlanOutcome::Generated { .. } => None,
            PlanOutcome::Failed { .. } if partial_shown => {
                Some(format!("{PARTIAL_OUTPUT_DISCARDED}\n{}", self.render()))
            }
            PlanOutcome::Failed { .. } => Some(self.render()),
        }
    }
}

pub const PARTIAL_OUTPUT_DISCARDED: &str = "(partial output discarded)";
