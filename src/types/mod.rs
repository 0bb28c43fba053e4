pub mod outcome;
pub mod travel_types;

pub use outcome::PlanOutcome;
pub use travel_types::{TravelPlan, TripBudget, TripDetails};
