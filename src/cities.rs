//! City catalogue offered by the planner form, plus the set-operations view
//! over two fixed city groups.

use crate::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Cities the planner knows how to route between
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum City {
    Mumbai,
    Delhi,
    Bengaluru,
    Hyderabad,
    Ahmedabad,
    Chennai,
    Kolkata,
    Surat,
    Pune,
    Jaipur,
    Gokarna,
    Palanpur,
}

impl City {
    /// All selectable cities, in menu order
    pub const ALL: [City; 12] = [
        City::Mumbai,
        City::Delhi,
        City::Bengaluru,
        City::Hyderabad,
        City::Ahmedabad,
        City::Chennai,
        City::Kolkata,
        City::Surat,
        City::Pune,
        City::Jaipur,
        City::Gokarna,
        City::Palanpur,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            City::Mumbai => "Mumbai",
            City::Delhi => "Delhi",
            City::Bengaluru => "Bengaluru",
            City::Hyderabad => "Hyderabad",
            City::Ahmedabad => "Ahmedabad",
            City::Chennai => "Chennai",
            City::Kolkata => "Kolkata",
            City::Surat => "Surat",
            City::Pune => "Pune",
            City::Jaipur => "Jaipur",
            City::Gokarna => "Gokarna",
            City::Palanpur => "Palanpur",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        City::ALL
            .iter()
            .copied()
            .find(|city| city.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = City::ALL.iter().map(City::name).collect();
                PlannerError::InvalidInput(format!(
                    "unknown city `{}` (choose one of: {})",
                    wanted,
                    known.join(", ")
                ))
            })
    }
}

/// First fixed group shown in the set-operations view
pub const GROUP_ONE: [City; 4] = [City::Mumbai, City::Delhi, City::Bengaluru, City::Hyderabad];
/// Second fixed group shown in the set-operations view
pub const GROUP_TWO: [City; 4] = [City::Pune, City::Delhi, City::Kolkata, City::Bengaluru];

/// One labelled result of a set operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetOperationResult {
    pub operation: &'static str,
    pub cities: Vec<City>,
}

/// Union, intersection, difference and symmetric difference of two city groups.
///
/// Results are sorted so the output is stable across runs.
pub fn set_operations(first: &[City], second: &[City]) -> Vec<SetOperationResult> {
    let a: BTreeSet<City> = first.iter().copied().collect();
    let b: BTreeSet<City> = second.iter().copied().collect();

    vec![
        SetOperationResult {
            operation: "Union",
            cities: a.union(&b).copied().collect(),
        },
        SetOperationResult {
            operation: "Intersection",
            cities: a.intersection(&b).copied().collect(),
        },
        SetOperationResult {
            operation: "Difference (Set1 - Set2)",
            cities: a.difference(&b).copied().collect(),
        },
        SetOperationResult {
            operation: "Symmetric Difference",
            cities: a.symmetric_difference(&b).copied().collect(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_city_case_insensitive() {
        assert_eq!("mumbai".parse::<City>().unwrap(), City::Mumbai);
        assert_eq!("  GOKARNA ".parse::<City>().unwrap(), City::Gokarna);
    }

    #[test]
    fn test_parse_unknown_city() {
        let err = "Atlantis".parse::<City>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("Atlantis"));
    }

    #[test]
    fn test_set_operations_on_fixed_groups() {
        let results = set_operations(&GROUP_ONE, &GROUP_TWO);
        assert_eq!(results.len(), 4);

        assert_eq!(results[0].operation, "Union");
        assert_eq!(results[0].cities.len(), 6);

        assert_eq!(results[1].cities, vec![City::Delhi, City::Bengaluru]);
        assert_eq!(results[2].cities, vec![City::Mumbai, City::Hyderabad]);
        assert_eq!(
            results[3].cities,
            vec![City::Mumbai, City::Hyderabad, City::Kolkata, City::Pune]
        );
    }
}
