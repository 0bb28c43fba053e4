use crate::types::travel_types::TravelPlan;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Identifier of a stored plan: dense, 1-based, never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(usize);

impl PlanId {
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// In-memory plans for one session, in insertion order
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanStore {
    plans: Vec<TravelPlan>,
}

impl PlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a plan and return its id (the new count)
    pub fn add(&mut self, plan: TravelPlan) -> PlanId {
        self.plans.push(plan);
        let id = PlanId(self.plans.len());
        info!(target: "trip_planner::store", plan_id = %id, "stored travel plan");
        id
    }

    /// All plans with their ids, oldest first
    pub fn list(&self) -> impl Iterator<Item = (PlanId, &TravelPlan)> + '_ {
        self.plans
            .iter()
            .enumerate()
            .map(|(idx, plan)| (PlanId(idx + 1), plan))
    }

    pub fn get(&self, id: PlanId) -> Option<&TravelPlan> {
        let idx = id.0.checked_sub(1)?;
        self.plans.get(idx)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Plans keyed by id, for JSON output
    pub fn to_json(&self) -> serde_json::Value {
        let entries: Vec<serde_json::Value> = self
            .list()
            .map(|(id, plan)| serde_json::json!({ "id": id, "plan": plan }))
            .collect();
        serde_json::Value::Array(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::City;
    use crate::types::travel_types::{TripBudget, TripDetails};
    use chrono::NaiveDate;

    fn plan(text: &str) -> TravelPlan {
        let day = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        let details = TripDetails::new(
            City::Chennai,
            City::Kolkata,
            day,
            day,
            TripBudget::new(1000, 1000, 1000),
        )
        .unwrap();
        TravelPlan::new(details, text.to_string())
    }

    #[test]
    fn test_empty_store() {
        let store = PlanStore::new();
        assert!(store.is_empty());
        assert_eq!(store.list().count(), 0);
        assert!(store.get(PlanId(0)).is_none());
        assert!(store.get(PlanId(1)).is_none());
    }

    #[test]
    fn test_ids_are_dense_and_ordered() {
        let mut store = PlanStore::new();
        let ids: Vec<usize> = (0..5)
            .map(|n| store.add(plan(&format!("plan {n}"))).get())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        let listed: Vec<(usize, String)> = store
            .list()
            .map(|(id, p)| (id.get(), p.plan().to_string()))
            .collect();
        assert_eq!(listed[0], (1, "plan 0".to_string()));
        assert_eq!(listed[4], (5, "plan 4".to_string()));
    }

    #[test]
    fn test_get_by_id() {
        let mut store = PlanStore::new();
        let first = store.add(plan("first"));
        let second = store.add(plan("second"));
        assert_eq!(store.get(first).unwrap().plan(), "first");
        assert_eq!(store.get(second).unwrap().plan(), "second");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_json_listing() {
        let mut store = PlanStore::new();
        store.add(plan("only"));
        let json = store.to_json();
        assert_eq!(json[0]["id"], 1);
        assert_eq!(json[0]["plan"]["plan"], "only");
    }

    #[test]
    fn test_ids_track_len_without_narrowing() {
        let mut store = PlanStore::new();
        for n in 0..300 {
            let id = store.add(plan(&format!("plan {n}")));
            assert_eq!(id.get(), store.len());
        }
        let last = PlanId(store.len());
        assert_eq!(store.get(last).unwrap().plan(), "plan 299");
        assert!(store.get(PlanId(usize::MAX)).is_none());
    }
}
