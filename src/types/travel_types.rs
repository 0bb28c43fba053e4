use crate::{
    cities::City,
    error::{PlannerError, Result},
    services::prompt::{build_trip_prompt, day_count},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Budget gathered by the trip planner form, in rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripBudget {
    pub food: u32,
    pub stay: u32,
    pub other: u32,
}

impl TripBudget {
    pub fn new(food: u32, stay: u32, other: u32) -> Self {
        Self { food, stay, other }
    }

    pub fn total(&self) -> u64 {
        u64::from(self.food) + u64::from(self.stay) + u64::from(self.other)
    }
}

impl fmt::Display for TripBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Food: ₹{}, Stay: ₹{}, Other: ₹{}, Total: ₹{}",
            self.food,
            self.stay,
            self.other,
            self.total()
        )
    }
}

/// A validated trip request: cities chosen, dates ordered, budget filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDetails {
    origin: City,
    destination: City,
    start_date: NaiveDate,
    end_date: NaiveDate,
    budget: TripBudget,
}

impl TripDetails {
    /// Fails with [`PlannerError::InvalidDateRange`] when `end_date` precedes `start_date`.
    pub fn new(
        origin: City,
        destination: City,
        start_date: NaiveDate,
        end_date: NaiveDate,
        budget: TripBudget,
    ) -> Result<Self> {
        if end_date < start_date {
            return Err(PlannerError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }

        Ok(Self {
            origin,
            destination,
            start_date,
            end_date,
            budget,
        })
    }

    pub fn origin(&self) -> City {
        self.origin
    }

    pub fn destination(&self) -> City {
        self.destination
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn budget(&self) -> &TripBudget {
        &self.budget
    }

    /// Inclusive number of travel days
    pub fn days(&self) -> i64 {
        day_count(self.start_date, self.end_date)
    }

    /// Prompt sent to the generation service for this trip
    pub fn prompt(&self) -> String {
        build_trip_prompt(self.origin, self.destination, self.days(), &self.budget)
    }
}

/// A generated travel plan. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelPlan {
    #[serde(flatten)]
    details: TripDetails,
    total_budget: u64,
    budget_breakdown: String,
    plan: String,
}

impl TravelPlan {
    pub fn new(details: TripDetails, plan: String) -> Self {
        let total_budget = details.budget().total();
        let budget_breakdown = details.budget().to_string();
        Self {
            details,
            total_budget,
            budget_breakdown,
            plan,
        }
    }

    pub fn details(&self) -> &TripDetails {
        &self.details
    }

    pub fn origin(&self) -> City {
        self.details.origin()
    }

    pub fn destination(&self) -> City {
        self.details.destination()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.details.start_date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.details.end_date()
    }

    pub fn total_budget(&self) -> u64 {
        self.total_budget
    }

    /// Display string for the per-category budget
    pub fn budget_breakdown(&self) -> &str {
        &self.budget_breakdown
    }

    /// Generated itinerary text
    pub fn plan(&self) -> &str {
        &self.plan
    }

    /// Human-readable summary in the order the planner screen shows it
    pub fn describe(&self) -> String {
        let lines = [
            format!("From: {}", self.origin()),
            format!("To: {}", self.destination()),
            format!("Start Date: {}", self.start_date()),
            format!("End Date: {}", self.end_date()),
            format!("Budget Breakdown: {}", self.budget_breakdown),
            format!("Generated Plan: {}", self.plan),
        ];
        lines.join("\n")
    }
}
