//! Trip budget breakdown with a spending suggestion.

use serde::{Serialize, Serializer};

use crate::error::PipelineError;

const LODGING_SHARE_LIMIT: f64 = 60.0;
const TRANSPORT_SHARE_LIMIT: f64 = 50.0;
const LOW_DAILY_BUDGET: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetInput {
    pub duration_days: f64,
    pub accommodation_per_day: f64,
    pub transportation_total: f64,
}

impl BudgetInput {
    pub fn new(
        duration_days: f64,
        accommodation_per_day: f64,
        transportation_total: f64,
    ) -> Result<Self, PipelineError> {
        if !duration_days.is_finite() || duration_days <= 0.0 {
            return Err(PipelineError::invalid(
                "duration",
                format!("{} must be a positive number of days", duration_days),
            ));
        }
        for (field, value) in [
            ("accommodation_cost", accommodation_per_day),
            ("transportation_cost", transportation_total),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PipelineError::invalid(
                    field,
                    format!("{} must be a non-negative number", value),
                ));
            }
        }
        Ok(Self {
            duration_days,
            accommodation_per_day,
            transportation_total,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetAdvice {
    CheaperLodging,
    BookTransportEarly,
    PlanAhead,
    Balanced,
}

impl BudgetAdvice {
    pub fn message(self) -> &'static str {
        match self {
            BudgetAdvice::CheaperLodging => {
                "Accommodation takes over 60% of the budget; a guesthouse or hostel could cut costs by 10-20%"
            }
            BudgetAdvice::BookTransportEarly => {
                "Transportation takes over 50% of the budget; book early or pick a cheaper mode of travel"
            }
            BudgetAdvice::PlanAhead => {
                "Daily budget is below 200; plan the itinerary ahead to avoid overspending"
            }
            BudgetAdvice::Balanced => "Spending is well balanced for a mid-range trip",
        }
    }
}

impl Serialize for BudgetAdvice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetPlan {
    pub total_cost: f64,
    pub daily_cost: f64,
    /// Percent of the total spent on accommodation.
    pub accommodation_share: f64,
    pub transportation_share: f64,
    pub suggestion: BudgetAdvice,
}

pub fn plan_budget(input: &BudgetInput) -> BudgetPlan {
    let accommodation_total = input.accommodation_per_day * input.duration_days;
    let total = accommodation_total + input.transportation_total;
    let daily = total / input.duration_days;

    let (accommodation_share, transportation_share) = if total > 0.0 {
        (
            accommodation_total / total * 100.0,
            input.transportation_total / total * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    let suggestion = if accommodation_share > LODGING_SHARE_LIMIT {
        BudgetAdvice::CheaperLodging
    } else if transportation_share > TRANSPORT_SHARE_LIMIT {
        BudgetAdvice::BookTransportEarly
    } else if daily < LOW_DAILY_BUDGET {
        BudgetAdvice::PlanAhead
    } else {
        BudgetAdvice::Balanced
    };

    BudgetPlan {
        total_cost: round_to(total, 2),
        daily_cost: round_to(daily, 2),
        accommodation_share: round_to(accommodation_share, 1),
        transportation_share: round_to(transportation_share, 1),
        suggestion,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
