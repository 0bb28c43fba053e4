use super::chart::ChartData;
use crate::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};

/// Inputs to the budget calculator, in home currency (rupees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetInputs {
    pub transport: f64,
    pub food: f64,
    pub stay: f64,
    pub misc: f64,
    /// Inflation rate in percent, 0 to 100
    pub inflation_rate: f64,
    /// Number of travel days, at least 1
    pub days: u32,
    /// Home-to-foreign conversion rate; `None` when no conversion is wanted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_rate: Option<f64>,
}

impl BudgetInputs {
    pub fn new(transport: f64, food: f64, stay: f64, misc: f64) -> Self {
        Self {
            transport,
            food,
            stay,
            misc,
            inflation_rate: 0.0,
            days: 1,
            conversion_rate: None,
        }
    }

    pub fn with_inflation(mut self, rate: f64) -> Self {
        self.inflation_rate = rate;
        self
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    pub fn with_conversion_rate(mut self, rate: Option<f64>) -> Self {
        self.conversion_rate = rate;
        self
    }

    fn categories(&self) -> [(&'static str, f64); 4] {
        [
            ("Transport", self.transport),
            ("Food", self.food),
            ("Accommodation", self.stay),
            ("Miscellaneous", self.misc),
        ]
    }

    /// Check every input against its allowed range
    pub fn validate(&self) -> Result<()> {
        for (label, amount) in self.categories() {
            if !amount.is_finite() || amount < 0.0 {
                return Err(PlannerError::InvalidInput(format!(
                    "{label} amount must be a non-negative number, got {amount}"
                )));
            }
        }

        if !(0.0..=100.0).contains(&self.inflation_rate) {
            return Err(PlannerError::InvalidInput(format!(
                "inflation rate must be between 0 and 100 percent, got {}",
                self.inflation_rate
            )));
        }

        if self.days == 0 {
            return Err(PlannerError::InvalidInput(
                "number of travel days must be at least 1".to_string(),
            ));
        }

        if let Some(rate) = self.conversion_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(PlannerError::InvalidInput(format!(
                    "conversion rate must be greater than 0, got {rate}"
                )));
            }
        }

        Ok(())
    }
}

/// Derived budget figures plus the data for the category chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub total: f64,
    pub adjusted_total: f64,
    pub cost_per_day: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_total: Option<f64>,
    /// `None` when the total is zero and there is nothing to plot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartData>,
}

impl BudgetSummary {
    /// Report lines in the order the calculator screen shows them
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Total Budget (without inflation): ₹{}", self.total),
            format!(
                "Total Budget (with inflation adjustment): ₹{}",
                self.adjusted_total
            ),
            format!("Cost per day: ₹{}", self.cost_per_day),
        ];

        if let Some(foreign_total) = self.foreign_total {
            lines.push(format!(
                "Total Budget in Foreign Currency: {}",
                foreign_total
            ));
        }

        lines
    }
}

/// Compute totals, inflation adjustment, per-day cost and optional conversion.
///
/// Pure and deterministic. Invalid inputs are rejected instead of producing
/// infinities or NaN.
pub fn calculate(inputs: &BudgetInputs) -> Result<BudgetSummary> {
    inputs.validate()?;

    let total = inputs.transport + inputs.food + inputs.stay + inputs.misc;
    let adjusted_total = adjust_for_inflation(total, inputs.inflation_rate);
    let cost_per_day = total / f64::from(inputs.days);
    let foreign_total = inputs.conversion_rate.map(|rate| adjusted_total / rate);
    let chart = ChartData::from_pairs(inputs.categories());

    Ok(BudgetSummary {
        total,
        adjusted_total,
        cost_per_day,
        foreign_total,
        chart,
    })
}

pub fn adjust_for_inflation(amount: f64, rate_percent: f64) -> f64 {
    amount * (1.0 + rate_percent / 100.0)
}
