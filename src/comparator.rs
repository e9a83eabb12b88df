use crate::aggregation::PlanAggregator;
use crate::error::{FinancingPlanError, Result};
use crate::plan::Plan;
use crate::ratios::{
    AutonomyAssessment, DebtAssessment, AUTONOMY_THRESHOLD, COVERAGE_THRESHOLD, DEBT_THRESHOLD,
};
use crate::utils::{mean, percentage};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Whole-horizon figures used to rank plans against each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeSummary {
    pub plan_name: String,
    pub final_cumulative_balance: f64,
    pub mean_coverage_ratio: f64,
    /// Sum of self-financing capacity over sum of uses, × 100.
    pub overall_autonomy: f64,
    /// Sum of medium/long-term loans over sum of sources, × 100.
    pub overall_debt: f64,
    pub total_uses: f64,
    pub total_sources: f64,
}

impl ComparativeSummary {
    pub fn from_plan(plan: &Plan) -> Self {
        let aggregator = PlanAggregator::new(plan);
        let metrics = aggregator.year_metrics();
        let totals = aggregator.totals();

        let coverage: Vec<f64> = metrics.iter().map(|m| m.coverage_ratio).collect();

        Self {
            plan_name: plan.name().to_string(),
            final_cumulative_balance: metrics.last().map_or(0.0, |m| m.cumulative_balance),
            mean_coverage_ratio: mean(&coverage),
            overall_autonomy: percentage(totals.self_financing_capacity, totals.total_uses),
            overall_debt: percentage(totals.medium_long_term_loans, totals.total_sources),
            total_uses: totals.total_uses,
            total_sources: totals.total_sources,
        }
    }

    /// All four financial-health thresholds hold at once.
    pub fn is_qualified(&self) -> bool {
        self.final_cumulative_balance >= 0.0
            && self.mean_coverage_ratio >= COVERAGE_THRESHOLD
            && self.overall_autonomy >= AUTONOMY_THRESHOLD
            && self.overall_debt <= DEBT_THRESHOLD
    }

    pub fn assessment(&self) -> SummaryAssessment {
        SummaryAssessment {
            structure: if self.mean_coverage_ratio >= COVERAGE_THRESHOLD {
                StructureAssessment::Balanced
            } else {
                StructureAssessment::NeedsAdjustment
            },
            autonomy: AutonomyAssessment::from_ratio(self.overall_autonomy),
            debt: DebtAssessment::from_ratio(self.overall_debt),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureAssessment {
    Balanced,
    NeedsAdjustment,
}

impl StructureAssessment {
    pub fn label(&self) -> &'static str {
        match self {
            StructureAssessment::Balanced => "Balanced financial structure",
            StructureAssessment::NeedsAdjustment => "Financial structure needs adjustment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryAssessment {
    pub structure: StructureAssessment,
    pub autonomy: AutonomyAssessment,
    pub debt: DebtAssessment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// The plan meets every threshold.
    Qualified,
    /// No plan qualified; this is the least-bad candidate.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub plan_name: String,
    /// Position of the plan in the comparison input.
    pub index: usize,
    pub kind: RecommendationKind,
    pub summary: ComparativeSummary,
    pub assessment: SummaryAssessment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// One summary per input plan, in input order.
    pub summaries: Vec<ComparativeSummary>,
    pub recommendation: Recommendation,
}

pub struct PlanComparator;

impl PlanComparator {
    pub fn compare<P: Borrow<Plan>>(plans: &[P]) -> Result<Comparison> {
        if plans.len() < 2 {
            return Err(FinancingPlanError::InsufficientPlans(plans.len()));
        }

        info!("Comparing {} financing plans", plans.len());

        let summaries: Vec<ComparativeSummary> = plans
            .iter()
            .map(|plan| ComparativeSummary::from_plan(plan.borrow()))
            .collect();

        for summary in &summaries {
            debug!(
                "Plan '{}': final balance={:.2} coverage={:.2} autonomy={:.2} debt={:.2} qualified={}",
                summary.plan_name,
                summary.final_cumulative_balance,
                summary.mean_coverage_ratio,
                summary.overall_autonomy,
                summary.overall_debt,
                summary.is_qualified()
            );
        }

        let (index, kind) = match Self::best_qualified(&summaries) {
            Some(index) => (index, RecommendationKind::Qualified),
            None => {
                let index = Self::least_bad(&summaries);
                warn!(
                    "No plan meets every threshold; falling back to '{}'",
                    summaries[index].plan_name
                );
                (index, RecommendationKind::Fallback)
            }
        };

        let summary = summaries[index].clone();
        let recommendation = Recommendation {
            plan_name: summary.plan_name.clone(),
            index,
            kind,
            assessment: summary.assessment(),
            summary,
        };

        info!(
            "Recommended plan '{}' ({:?})",
            recommendation.plan_name, recommendation.kind
        );

        Ok(Comparison {
            summaries,
            recommendation,
        })
    }

    /// Highest final cumulative balance among qualified plans; the first one wins ties.
    fn best_qualified(summaries: &[ComparativeSummary]) -> Option<usize> {
        let mut best: Option<usize> = None;

        for (idx, summary) in summaries.iter().enumerate() {
            if !summary.is_qualified() {
                continue;
            }
            match best {
                Some(current)
                    if summary.final_cumulative_balance
                        <= summaries[current].final_cumulative_balance => {}
                _ => best = Some(idx),
            }
        }

        best
    }

    /// Final cumulative balance descending, then overall debt ascending. Stable on input order.
    fn least_bad(summaries: &[ComparativeSummary]) -> usize {
        let mut order: Vec<usize> = (0..summaries.len()).collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (&summaries[a], &summaries[b]);
            b.final_cumulative_balance
                .total_cmp(&a.final_cumulative_balance)
                .then(a.overall_debt.total_cmp(&b.overall_debt))
        });
        order[0]
    }
}

pub fn compare<P: Borrow<Plan>>(plans: &[P]) -> Result<Comparison> {
    PlanComparator::compare(plans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, balance: f64, coverage: f64, autonomy: f64, debt: f64) -> ComparativeSummary {
        ComparativeSummary {
            plan_name: name.to_string(),
            final_cumulative_balance: balance,
            mean_coverage_ratio: coverage,
            overall_autonomy: autonomy,
            overall_debt: debt,
            total_uses: 0.0,
            total_sources: 0.0,
        }
    }

    #[test]
    fn test_qualification_beats_larger_balance() {
        let summaries = vec![
            summary("A", 100.0, 110.0, 35.0, 40.0),
            summary("B", 500.0, 90.0, 50.0, 20.0),
        ];
        assert!(summaries[0].is_qualified());
        assert!(!summaries[1].is_qualified());
        assert_eq!(PlanComparator::best_qualified(&summaries), Some(0));
    }

    #[test]
    fn test_qualified_ties_keep_first() {
        let summaries = vec![
            summary("First", 100.0, 110.0, 35.0, 40.0),
            summary("Second", 100.0, 120.0, 40.0, 10.0),
            summary("Lower", 50.0, 120.0, 40.0, 10.0),
        ];
        assert_eq!(PlanComparator::best_qualified(&summaries), Some(0));
    }

    #[test]
    fn test_threshold_boundaries_are_inclusive() {
        assert!(summary("Edge", 0.0, 100.0, 30.0, 50.0).is_qualified());
        assert!(!summary("Neg", -0.01, 100.0, 30.0, 50.0).is_qualified());
        assert!(!summary("Debt", 0.0, 100.0, 30.0, 50.01).is_qualified());
        assert!(!summary("Auto", 0.0, 100.0, 29.99, 50.0).is_qualified());
    }

    #[test]
    fn test_fallback_prefers_balance_then_debt() {
        let summaries = vec![
            summary("D", -200.0, 80.0, 10.0, 10.0),
            summary("C", -50.0, 80.0, 10.0, 60.0),
        ];
        assert_eq!(PlanComparator::best_qualified(&summaries), None);
        assert_eq!(PlanComparator::least_bad(&summaries), 1);

        let tied = vec![
            summary("HighDebt", -50.0, 80.0, 10.0, 60.0),
            summary("LowDebt", -50.0, 80.0, 10.0, 20.0),
        ];
        assert_eq!(PlanComparator::least_bad(&tied), 1);
    }

    #[test]
    fn test_summary_assessment_labels() {
        let assessment = summary("X", 10.0, 95.0, 31.0, 55.0).assessment();
        assert_eq!(assessment.structure, StructureAssessment::NeedsAdjustment);
        assert_eq!(assessment.autonomy, AutonomyAssessment::Sufficient);
        assert_eq!(assessment.debt, DebtAssessment::Elevated);
    }
}
