use crate::{
    cities::City,
    error::{PlannerError, Result},
    types::travel_types::{TripBudget, TripDetails},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw planner form. Every field may still be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    pub origin: Option<City>,
    pub destination: Option<City>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<TripBudget>,
}

impl TripRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_city(mut self, city: City) -> Self {
        self.origin = Some(city);
        self
    }

    pub fn to_city(mut self, city: City) -> Self {
        self.destination = Some(city);
        self
    }

    pub fn dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn budget(mut self, budget: TripBudget) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Validate the form against `today` and produce the trip to plan.
    ///
    /// Checks run in form order: required fields, then the date range, then
    /// the start-date floor, then a non-zero budget.
    pub fn validate(&self, today: NaiveDate) -> Result<TripDetails> {
        let origin = self.origin.ok_or(PlannerError::MissingField("origin"))?;
        let destination = self
            .destination
            .ok_or(PlannerError::MissingField("destination"))?;
        let start = self
            .start_date
            .ok_or(PlannerError::MissingField("start date"))?;
        let end = self.end_date.ok_or(PlannerError::MissingField("end date"))?;

        if end < start {
            return Err(PlannerError::InvalidDateRange { start, end });
        }

        if start < today {
            return Err(PlannerError::InvalidInput(format!(
                "start date {start} is in the past (today is {today})"
            )));
        }

        let budget = self
            .budget
            .filter(|budget| budget.total() > 0)
            .ok_or(PlannerError::MissingField("budget"))?;

        TripDetails::new(origin, destination, start, end, budget)
    }
}
