use crate::{
    budget::{calculate, BudgetInputs, BudgetSummary},
    config::PlannerConfig,
    core::{
        generator::{collect_fragments_with, TextGenerator},
        request::TripRequest,
        store::PlanStore,
    },
    error::{PlannerError, Result},
    services::generation_client::GenerationClient,
    types::{outcome::PlanOutcome, travel_types::TravelPlan},
};
use chrono::NaiveDate;
use std::time::Instant;
use tracing::{error, info, warn};

/// One interactive planning session.
///
/// Owns the plan store and, when a credential is available, the generator.
/// Methods take `&mut self`, so only one generation can be in flight.
#[derive(Debug, Default)]
pub struct Session {
    generator: Option<Box<dyn TextGenerator>>,
    store: PlanStore,
}

impl Session {
    pub fn new(generator: Option<Box<dyn TextGenerator>>) -> Self {
        Self {
            generator,
            store: PlanStore::new(),
        }
    }

    pub fn with_generator<G: TextGenerator + 'static>(generator: G) -> Self {
        Self::new(Some(Box::new(generator)))
    }

    /// Start a session from configuration.
    ///
    /// A missing API key is logged once here; the session still starts so the
    /// budget calculator stays usable.
    pub fn from_config(config: &PlannerConfig) -> Self {
        match GenerationClient::from_config(config) {
            Ok(client) => {
                info!(model = %client.model(), base_url = %config.base_url(), "generation service configured");
                Self::with_generator(client)
            }
            Err(err) => {
                warn!("{}; plan generation is disabled for this session", err);
                Self::new(None)
            }
        }
    }

    pub fn can_generate(&self) -> bool {
        self.generator.is_some()
    }

    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    /// Budget calculator; available with or without a credential
    pub fn calculate_budget(&self, inputs: &BudgetInputs) -> Result<BudgetSummary> {
        calculate(inputs)
    }

    /// Validate the form, call the generation service and store the plan.
    ///
    /// Form and credential problems come back as `Err` and block the request.
    /// Service failures come back as [`PlanOutcome::Failed`]; the store is
    /// left untouched in that case.
    pub async fn generate_plan(
        &mut self,
        request: &TripRequest,
        today: NaiveDate,
    ) -> Result<PlanOutcome> {
        self.generate_plan_with(request, today, |_| {}).await
    }

    /// [`Session::generate_plan`] that hands each fragment to `on_fragment` as it arrives
    pub async fn generate_plan_with<F>(
        &mut self,
        request: &TripRequest,
        today: NaiveDate,
        mut on_fragment: F,
    ) -> Result<PlanOutcome>
    where
        F: FnMut(&str) + Send,
    {
        let details = request.validate(today)?;
        let generator = self
            .generator
            .as_deref()
            .ok_or(PlannerError::MissingCredential)?;

        let prompt = details.prompt();
        info!(
            origin = %details.origin(),
            destination = %details.destination(),
            days = details.days(),
            "requesting travel plan"
        );

        let started = Instant::now();
        let mut fragments = 0usize;
        let generated = match generator.stream(&prompt).await {
            Ok(stream) => {
                collect_fragments_with(stream, |fragment| {
                    fragments += 1;
                    on_fragment(fragment);
                })
                .await
            }
            Err(err) => Err(err),
        };

        let text = match generated {
            Ok(text) if text.trim().is_empty() => Err(PlannerError::Api(
                "generation service returned no text".to_string(),
            )),
            other => other,
        };

        match text {
            Ok(text) => {
                let plan = TravelPlan::new(details, text);
                let id = self.store.add(plan.clone());
                Ok(PlanOutcome::Generated {
                    id,
                    plan,
                    duration: started.elapsed(),
                    fragments,
                })
            }
            Err(err) => {
                error!(code = err.error_code(), "travel plan generation failed: {}", err);
                Ok(PlanOutcome::Failed {
                    code: err.error_code(),
                    message: err.to_string(),
                })
            }
        }
    }
}
