//! Budget calculator and the pie chart built from its categories

pub mod calculator;
pub mod chart;

pub use calculator::{adjust_for_inflation, calculate, BudgetInputs, BudgetSummary};
pub use chart::{ChartData, ChartSlice};
