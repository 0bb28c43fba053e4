//! trip-planner-rs: a terminal travel-planning assistant
//!
//! Collects a trip (cities, dates, budget), asks an OpenAI-compatible LLM
//! service for a day-by-day itinerary, and keeps the generated plans for the
//! length of one session. A budget calculator breaks a travel budget into
//! categories and renders them as a pie chart.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chrono::{Days, Local};
//! use trip_planner::{cities::City, PlannerConfig, Session, TripBudget, TripRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PlannerConfig::from_env()?;
//!     let mut session = Session::from_config(&config);
//!
//!     let today = Local::now().date_naive();
//!     let request = TripRequest::new()
//!         .from_city(City::Mumbai)
//!         .to_city(City::Gokarna)
//!         .dates(today, today + Days::new(3))
//!         .budget(TripBudget::new(4000, 6000, 2000));
//!
//!     let outcome = session.generate_plan(&request, today).await?;
//!     println!("{}", outcome.render());
//!     Ok(())
//! }
//! ```

pub mod budget;
pub mod cities;
pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod types;

pub use budget::{calculate, BudgetInputs, BudgetSummary, ChartData};
pub use config::PlannerConfig;
pub use crate::core::{PlanId, PlanOutcome, PlanStore, Session, TextGenerator, TripRequest};
pub use error::{PlannerError, Result};
pub use services::GenerationClient;
pub use types::{TravelPlan, TripBudget, TripDetails};

#[cfg(feature = "cli")]
pub mod cli;
