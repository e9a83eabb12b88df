use crate::plan::Plan;
use crate::taxonomy::SourceCategory;
use crate::utils::percentage;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinancialStatus {
    /// Sources exceed uses.
    Surplus,
    /// Uses are not strictly covered (balance <= 0).
    Deficit,
}

impl FinancialStatus {
    pub fn from_balance(balance: f64) -> Self {
        if balance > 0.0 {
            FinancialStatus::Surplus
        } else {
            FinancialStatus::Deficit
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearMetrics {
    pub year: u32,
    pub total_uses: f64,
    pub total_sources: f64,
    /// `total_sources - total_uses`
    pub balance: f64,
    /// Running sum of `balance` for years 1..=year.
    pub cumulative_balance: f64,
    pub coverage_ratio: f64,
    /// `max(balance, 0)`
    pub safety_margin: f64,
    pub status: FinancialStatus,
}

/// Grand totals across a plan's full horizon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanTotals {
    pub total_uses: f64,
    pub total_sources: f64,
    pub self_financing_capacity: f64,
    pub medium_long_term_loans: f64,
}

pub struct PlanAggregator<'a> {
    plan: &'a Plan,
}

impl<'a> PlanAggregator<'a> {
    pub fn new(plan: &'a Plan) -> Self {
        Self { plan }
    }

    /// One entry per year, ascending. The cumulative balance is a strict left fold seeded at 0.
    pub fn year_metrics(&self) -> Vec<YearMetrics> {
        let mut cumulative_balance = 0.0;
        let mut metrics = Vec::with_capacity(self.plan.years().len());

        for allocation in self.plan.years() {
            let total_uses = allocation.uses.total();
            let total_sources = allocation.sources.total();
            let balance = total_sources - total_uses;
            cumulative_balance += balance;

            debug!(
                "Plan '{}' year {}: uses={:.2} sources={:.2} balance={:.2} cumulative={:.2}",
                self.plan.name(),
                allocation.year,
                total_uses,
                total_sources,
                balance,
                cumulative_balance
            );

            metrics.push(YearMetrics {
                year: allocation.year,
                total_uses,
                total_sources,
                balance,
                cumulative_balance,
                coverage_ratio: percentage(total_sources, total_uses),
                safety_margin: balance.max(0.0),
                status: FinancialStatus::from_balance(balance),
            });
        }

        metrics
    }

    pub fn totals(&self) -> PlanTotals {
        self.plan
            .years()
            .iter()
            .fold(PlanTotals::default(), |acc, allocation| PlanTotals {
                total_uses: acc.total_uses + allocation.uses.total(),
                total_sources: acc.total_sources + allocation.sources.total(),
                self_financing_capacity: acc.self_financing_capacity
                    + allocation.sources.get(SourceCategory::SelfFinancingCapacity),
                medium_long_term_loans: acc.medium_long_term_loans
                    + allocation.sources.get(SourceCategory::MediumLongTermLoans),
            })
    }
}

pub fn year_metrics(plan: &Plan) -> Vec<YearMetrics> {
    PlanAggregator::new(plan).year_metrics()
}

pub fn plan_totals(plan: &Plan) -> PlanTotals {
    PlanAggregator::new(plan).totals()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{create_plan, SourcesGrid, UsesGrid};
    use crate::taxonomy::UseCategory;

    fn plan_with_balances() -> Plan {
        // Balances: +500k, -200k, +100k
        let mut uses = UsesGrid::new();
        uses.insert((UseCategory::Investments, 1), 1_000_000.0);
        uses.insert((UseCategory::Investments, 2), 600_000.0);
        uses.insert((UseCategory::LoanRepayments, 3), 300_000.0);

        let mut sources = SourcesGrid::new();
        sources.insert((SourceCategory::SelfFinancingCapacity, 1), 700_000.0);
        sources.insert((SourceCategory::MediumLongTermLoans, 1), 800_000.0);
        sources.insert((SourceCategory::SelfFinancingCapacity, 2), 400_000.0);
        sources.insert((SourceCategory::Subsidies, 3), 400_000.0);

        create_plan("Balances", 3, &uses, &sources).unwrap()
    }

    #[test]
    fn test_cumulative_balance_is_left_fold() {
        let metrics = year_metrics(&plan_with_balances());

        let balances: Vec<f64> = metrics.iter().map(|m| m.balance).collect();
        let cumulative: Vec<f64> = metrics.iter().map(|m| m.cumulative_balance).collect();

        assert_eq!(balances, vec![500_000.0, -200_000.0, 100_000.0]);
        assert_eq!(cumulative, vec![500_000.0, 300_000.0, 400_000.0]);
        assert_eq!(metrics.iter().map(|m| m.year).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_coverage_and_status() {
        let metrics = year_metrics(&plan_with_balances());

        assert!((metrics[0].coverage_ratio - 150.0).abs() < 1e-9);
        assert_eq!(metrics[0].status, FinancialStatus::Surplus);
        assert_eq!(metrics[0].safety_margin, 500_000.0);

        assert!((metrics[1].coverage_ratio - 400_000.0 / 600_000.0 * 100.0).abs() < 1e-9);
        assert_eq!(metrics[1].status, FinancialStatus::Deficit);
        assert_eq!(metrics[1].safety_margin, 0.0);
    }

    #[test]
    fn test_zero_uses_gives_zero_coverage() {
        let mut sources = SourcesGrid::new();
        sources.insert((SourceCategory::Subsidies, 1), 1000.0);
        let plan = create_plan("NoUses", 1, &UsesGrid::new(), &sources).unwrap();

        let metrics = year_metrics(&plan);
        assert_eq!(metrics[0].coverage_ratio, 0.0);
        assert_eq!(metrics[0].balance, 1000.0);
    }

    #[test]
    fn test_zero_balance_is_deficit() {
        let plan = create_plan("Empty", 2, &UsesGrid::new(), &SourcesGrid::new()).unwrap();
        let metrics = year_metrics(&plan);
        assert!(metrics.iter().all(|m| m.status == FinancialStatus::Deficit));
        assert!(metrics.iter().all(|m| m.cumulative_balance == 0.0));
    }

    #[test]
    fn test_plan_totals() {
        let totals = plan_totals(&plan_with_balances());
        assert_eq!(totals.total_uses, 1_900_000.0);
        assert_eq!(totals.total_sources, 2_300_000.0);
        assert_eq!(totals.self_financing_capacity, 1_100_000.0);
        assert_eq!(totals.medium_long_term_loans, 800_000.0);
    }

    #[test]
    fn test_recomputation_is_identical() {
        let plan = plan_with_balances();
        assert_eq!(year_metrics(&plan), year_metrics(&plan));
        assert_eq!(plan_totals(&plan), plan_totals(&plan));
    }
}
