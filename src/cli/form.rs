//! Input constraints of the planner and calculator forms, shared by the
//! one-shot commands and the interactive session.

use crate::cities::City;
use chrono::NaiveDate;

/// Integer field with inclusive bounds, a step and a default
#[derive(Debug, Clone, Copy)]
pub struct Stepped {
    pub name: &'static str,
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub default: u32,
}

impl Stepped {
    pub const fn new(name: &'static str, min: u32, max: u32, step: u32, default: u32) -> Self {
        Self {
            name,
            min,
            max,
            step,
            default,
        }
    }

    pub fn parse(&self, raw: &str) -> Result<u32, String> {
        let value: u32 = raw
            .trim()
            .parse()
            .map_err(|_| format!("{} must be a whole number, got `{}`", self.name, raw.trim()))?;

        if value < self.min || value > self.max {
            return Err(format!(
                "{} must be between {} and {}",
                self.name, self.min, self.max
            ));
        }

        if (value - self.min) % self.step != 0 {
            return Err(format!(
                "{} must move in steps of {} from {}",
                self.name, self.step, self.min
            ));
        }

        Ok(value)
    }

    /// clap value parser enforcing these bounds
    pub fn value_parser(self) -> impl Fn(&str) -> Result<u32, String> + Clone + Send + Sync + 'static {
        move |raw: &str| self.parse(raw)
    }
}

pub const PLAN_FOOD: Stepped = Stepped::new("Food budget", 1000, 50000, 1000, 1000);
pub const PLAN_STAY: Stepped = Stepped::new("Stay budget", 1000, 50000, 1000, 1000);
pub const PLAN_OTHER: Stepped = Stepped::new("Other expenses", 1000, 50000, 1000, 1000);

pub const CALC_TRANSPORT: Stepped = Stepped::new("Transport budget", 1000, 100000, 1000, 1000);
pub const CALC_FOOD: Stepped = Stepped::new("Food budget", 1000, 50000, 500, 1000);
pub const CALC_STAY: Stepped = Stepped::new("Accommodation budget", 1000, 100000, 1000, 1000);
pub const CALC_MISC: Stepped = Stepped::new("Miscellaneous expenses", 500, 50000, 500, 500);
pub const CALC_INFLATION: Stepped = Stepped::new("Inflation rate", 0, 20, 1, 5);
pub const CALC_DAYS: Stepped = Stepped::new("Number of travel days", 1, 30, 1, 7);

pub const MIN_CONVERSION_RATE: f64 = 0.01;

pub fn parse_city(raw: &str) -> Result<City, String> {
    raw.parse::<City>().map_err(|err| err.to_string())
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    raw.trim()
        .parse::<NaiveDate>()
        .map_err(|_| format!("expected a date as YYYY-MM-DD, got `{}`", raw.trim()))
}

pub fn parse_conversion_rate(raw: &str) -> Result<f64, String> {
    let rate: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("conversion rate must be a number, got `{}`", raw.trim()))?;
    if !rate.is_finite() || rate < MIN_CONVERSION_RATE {
        return Err(format!(
            "conversion rate must be at least {MIN_CONVERSION_RATE}"
        ));
    }
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepped_bounds_and_steps() {
        assert_eq!(PLAN_FOOD.parse("3000"), Ok(3000));
        assert!(PLAN_FOOD.parse("500").is_err());
        assert!(PLAN_FOOD.parse("51000").is_err());
        assert!(PLAN_FOOD.parse("1500").is_err());
        assert_eq!(CALC_FOOD.parse("1500"), Ok(1500));
        assert_eq!(CALC_MISC.parse(" 500 "), Ok(500));
        assert!(CALC_DAYS.parse("0").is_err());
        assert!(CALC_INFLATION.parse("abc").is_err());
    }

    #[test]
    fn test_conversion_rate_floor() {
        assert_eq!(parse_conversion_rate("80"), Ok(80.0));
        assert!(parse_conversion_rate("0").is_err());
        assert!(parse_conversion_rate("0.001").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-12-25"),
            Ok(NaiveDate::from_ymd_opt(2026, 12, 25).unwrap())
        );
        assert!(parse_date("25/12/2026").is_err());
    }
}
