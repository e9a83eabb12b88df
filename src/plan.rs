use crate::error::Result;
use crate::taxonomy::{FlowGroup, SourceCategory, UseCategory};
use crate::utils::{validate_amount, validate_horizon, validate_year};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Uses amounts keyed by `(category, year)`. Absent keys are 0.
pub type UsesGrid = BTreeMap<(UseCategory, u32), f64>;

/// Sources amounts keyed by `(category, year)`. Absent keys are 0.
pub type SourcesGrid = BTreeMap<(SourceCategory, u32), f64>;

/// One year's Uses, one field per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsesRecord {
    pub carry_forward: f64,
    pub investments: f64,
    pub loan_repayments: f64,
    pub working_capital_requirement: f64,
    pub dividends: f64,
}

impl UsesRecord {
    pub fn get(&self, category: UseCategory) -> f64 {
        match category {
            UseCategory::CarryForward => self.carry_forward,
            UseCategory::Investments => self.investments,
            UseCategory::LoanRepayments => self.loan_repayments,
            UseCategory::WorkingCapitalRequirement => self.working_capital_requirement,
            UseCategory::Dividends => self.dividends,
        }
    }

    fn slot(&mut self, category: UseCategory) -> &mut f64 {
        match category {
            UseCategory::CarryForward => &mut self.carry_forward,
            UseCategory::Investments => &mut self.investments,
            UseCategory::LoanRepayments => &mut self.loan_repayments,
            UseCategory::WorkingCapitalRequirement => &mut self.working_capital_requirement,
            UseCategory::Dividends => &mut self.dividends,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (UseCategory, f64)> + '_ {
        UseCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Sum over every category, zero-valued ones included.
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, amount)| amount).sum()
    }
}

/// One year's Sources, one field per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SourcesRecord {
    pub self_financing_capacity: f64,
    pub subsidies: f64,
    pub capital_increase: f64,
    pub medium_long_term_loans: f64,
    pub asset_disposals: f64,
    pub working_capital_drawdown: f64,
}

impl SourcesRecord {
    pub fn get(&self, category: SourceCategory) -> f64 {
        match category {
            SourceCategory::SelfFinancingCapacity => self.self_financing_capacity,
            SourceCategory::Subsidies => self.subsidies,
            SourceCategory::CapitalIncrease => self.capital_increase,
            SourceCategory::MediumLongTermLoans => self.medium_long_term_loans,
            SourceCategory::AssetDisposals => self.asset_disposals,
            SourceCategory::WorkingCapitalDrawdown => self.working_capital_drawdown,
        }
    }

    fn slot(&mut self, category: SourceCategory) -> &mut f64 {
        match category {
            SourceCategory::SelfFinancingCapacity => &mut self.self_financing_capacity,
            SourceCategory::Subsidies => &mut self.subsidies,
            SourceCategory::CapitalIncrease => &mut self.capital_increase,
            SourceCategory::MediumLongTermLoans => &mut self.medium_long_term_loans,
            SourceCategory::AssetDisposals => &mut self.asset_disposals,
            SourceCategory::WorkingCapitalDrawdown => &mut self.working_capital_drawdown,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourceCategory, f64)> + '_ {
        SourceCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, amount)| amount).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearAllocation {
    /// 1-based year within the plan horizon.
    pub year: u32,
    pub uses: UsesRecord,
    pub sources: SourcesRecord,
}

/// A committed, immutable financing plan.
///
/// Every year in `1..=horizon` is present and every category of both groups has an
/// amount, so downstream sums never need existence checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    name: String,
    horizon: u32,
    years: Vec<YearAllocation>,
}

impl Plan {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Years in ascending order.
    pub fn years(&self) -> &[YearAllocation] {
        &self.years
    }

    pub fn year(&self, year: u32) -> Option<&YearAllocation> {
        year.checked_sub(1)
            .and_then(|idx| self.years.get(idx as usize))
    }
}

/// Builds a plan from sparse year×category grids.
///
/// The horizon is checked first, then every supplied amount. Missing entries are 0.
pub fn create_plan(
    name: impl Into<String>,
    horizon: u32,
    uses_by_year: &UsesGrid,
    sources_by_year: &SourcesGrid,
) -> Result<Plan> {
    let name = name.into();
    validate_horizon(horizon)?;

    let mut years: Vec<YearAllocation> = (1..=horizon)
        .map(|year| YearAllocation {
            year,
            uses: UsesRecord::default(),
            sources: SourcesRecord::default(),
        })
        .collect();

    for (&(category, year), &amount) in uses_by_year {
        validate_year(year, horizon)?;
        validate_amount(FlowGroup::Uses, category.label(), year, amount)?;
        *years[(year - 1) as usize].uses.slot(category) = amount;
    }

    for (&(category, year), &amount) in sources_by_year {
        validate_year(year, horizon)?;
        validate_amount(FlowGroup::Sources, category.label(), year, amount)?;
        *years[(year - 1) as usize].sources.slot(category) = amount;
    }

    info!("Created financing plan '{}' over {} year(s)", name, horizon);
    debug!(
        "Plan '{}' received {} uses entries and {} sources entries",
        name,
        uses_by_year.len(),
        sources_by_year.len()
    );

    Ok(Plan {
        name,
        horizon,
        years,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FinancingPlanError;

    #[test]
    fn test_missing_categories_default_to_zero() {
        let mut uses = UsesGrid::new();
        uses.insert((UseCategory::Investments, 2), 1000.0);
        let mut sources = SourcesGrid::new();
        sources.insert((SourceCategory::Subsidies, 1), 250.0);

        let plan = create_plan("Base", 3, &uses, &sources).unwrap();

        assert_eq!(plan.years().len(), 3);
        assert_eq!(plan.years()[0].uses.total(), 0.0);
        assert_eq!(plan.years()[0].sources.subsidies, 250.0);
        assert_eq!(plan.years()[1].uses.investments, 1000.0);
        assert_eq!(plan.years()[2], YearAllocation {
            year: 3,
            uses: UsesRecord::default(),
            sources: SourcesRecord::default(),
        });
        assert_eq!(plan.years()[1].uses.iter().count(), UseCategory::ALL.len());
        assert_eq!(plan.years()[1].sources.iter().count(), SourceCategory::ALL.len());
    }

    #[test]
    fn test_total_is_sum_of_every_category() {
        let mut uses = UsesGrid::new();
        uses.insert((UseCategory::CarryForward, 1), 10.0);
        uses.insert((UseCategory::Dividends, 1), 5.5);
        let plan = create_plan("Totals", 1, &uses, &SourcesGrid::new()).unwrap();

        let record = &plan.years()[0].uses;
        let summed: f64 = record.iter().map(|(_, v)| v).sum();
        assert_eq!(summed, record.total());
        assert_eq!(record.total(), 15.5);
    }

    #[test]
    fn test_rejects_negative_amount() {
        let mut sources = SourcesGrid::new();
        sources.insert((SourceCategory::MediumLongTermLoans, 1), -1.0);

        let result = create_plan("Bad", 2, &UsesGrid::new(), &sources);
        match result {
            Err(FinancingPlanError::InvalidAmount { year, amount, .. }) => {
                assert_eq!(year, 1);
                assert_eq!(amount, -1.0);
            }
            other => panic!("expected InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_finite_amount() {
        let mut uses = UsesGrid::new();
        uses.insert((UseCategory::Investments, 1), f64::NAN);
        assert!(matches!(
            create_plan("Nan", 1, &uses, &SourcesGrid::new()),
            Err(FinancingPlanError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_horizon() {
        assert!(matches!(
            create_plan("Zero", 0, &UsesGrid::new(), &SourcesGrid::new()),
            Err(FinancingPlanError::InvalidHorizon(0))
        ));
        assert!(matches!(
            create_plan("Six", 6, &UsesGrid::new(), &SourcesGrid::new()),
            Err(FinancingPlanError::InvalidHorizon(6))
        ));
    }

    #[test]
    fn test_rejects_year_outside_horizon() {
        let mut uses = UsesGrid::new();
        uses.insert((UseCategory::Investments, 3), 100.0);
        assert!(matches!(
            create_plan("Short", 2, &uses, &SourcesGrid::new()),
            Err(FinancingPlanError::YearOutOfRange { year: 3, horizon: 2 })
        ));
    }

    #[test]
    fn test_year_lookup() {
        let plan = create_plan("Lookup", 2, &UsesGrid::new(), &SourcesGrid::new()).unwrap();
        assert_eq!(plan.year(1).map(|y| y.year), Some(1));
        assert_eq!(plan.year(2).map(|y| y.year), Some(2));
        assert!(plan.year(0).is_none());
        assert!(plan.year(3).is_none());
    }
}
