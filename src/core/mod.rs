pub mod generator;
pub mod request;
pub mod session;
pub mod store;

pub use crate::types::outcome::PlanOutcome;
pub use generator::{collect_fragments, collect_fragments_with, FragmentStream, TextGenerator};
pub use request::TripRequest;
pub use session::Session;
pub use store::{PlanId, PlanStore};
