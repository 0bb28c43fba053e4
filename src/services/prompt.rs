use crate::{cities::City, types::travel_types::TripBudget};
use chrono::NaiveDate;

/// System message sent ahead of every trip prompt
pub const SYSTEM_PROMPT: &str = "You are a helpful travel planner for trips within India. Answer with a clear, practical itinerary. Quote all prices in Indian rupees.";

/// Inclusive day count between two dates: a same-day trip is one day.
pub fn day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Build the natural-language request for a day-by-day itinerary within budget
pub fn build_trip_prompt(origin: City, destination: City, days: i64, budget: &TripBudget) -> String {
    format!(
        "Plan a trip from {} to {} for {} days with a total budget of ₹{}, including {}. Provide a day-by-day itinerary that stays within this budget.",
        origin,
        destination,
        days,
        budget.total(),
        budget
    )
}
