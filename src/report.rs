use crate::aggregation::{year_metrics, FinancialStatus, YearMetrics};
use crate::comparator::{compare, Comparison, ComparativeSummary, Recommendation, RecommendationKind};
use crate::error::Result;
use crate::plan::Plan;
use crate::ratios::{plan_ratios, RatioAssessment, Ratios};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearReport {
    pub metrics: YearMetrics,
    pub ratios: Ratios,
    pub assessment: RatioAssessment,
}

/// Everything a table or report renderer needs for a single plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    pub plan_name: String,
    pub horizon: u32,
    pub years: Vec<YearReport>,
}

impl PlanReport {
    pub fn build(plan: &Plan) -> Self {
        let years = year_metrics(plan)
            .into_iter()
            .zip(plan_ratios(plan))
            .map(|(metrics, year_ratios)| YearReport {
                metrics,
                ratios: year_ratios.ratios,
                assessment: year_ratios.assessment,
            })
            .collect();

        Self {
            plan_name: plan.name().to_string(),
            horizon: plan.horizon(),
            years,
        }
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Financing Plan - {}\n\n", self.plan_name));
        output.push_str(&format!("**Horizon:** {} year(s)\n\n", self.horizon));

        output.push_str("| Year | Uses | Sources | Balance | Cumulative | Coverage | Autonomy | Debt |\n");
        output.push_str("|---|---|---|---|---|---|---|---|\n");
        for year in &self.years {
            output.push_str(&format!(
                "| {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2}% | {:.2}% | {:.2}% |\n",
                year.metrics.year,
                year.metrics.total_uses,
                year.metrics.total_sources,
                year.metrics.balance,
                year.metrics.cumulative_balance,
                year.ratios.coverage,
                year.ratios.autonomy,
                year.ratios.debt
            ));
        }
        output.push('\n');

        for year in &self.years {
            output.push_str(&format!("## Year {}\n\n", year.metrics.year));
            let status = match year.metrics.status {
                FinancialStatus::Surplus => "Surplus",
                FinancialStatus::Deficit => "Deficit",
            };
            output.push_str(&format!("- Status: {} ({:.2})\n", status, year.metrics.balance));
            output.push_str(&format!("- Coverage: {}\n", year.assessment.coverage.label()));
            output.push_str(&format!("- Autonomy: {}\n", year.assessment.autonomy.label()));
            output.push_str(&format!("- Debt: {}\n", year.assessment.debt.label()));
            output.push('\n');
        }

        output
    }
}

/// A plan's year series, as consumed by chart renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSeries {
    pub plan_name: String,
    pub cumulative_balance: Vec<(u32, f64)>,
    pub coverage_ratio: Vec<(u32, f64)>,
}

impl PlanSeries {
    pub fn build(plan: &Plan) -> Self {
        let metrics = year_metrics(plan);
        Self {
            plan_name: plan.name().to_string(),
            cumulative_balance: metrics.iter().map(|m| (m.year, m.cumulative_balance)).collect(),
            coverage_ratio: metrics.iter().map(|m| (m.year, m.coverage_ratio)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub summaries: Vec<ComparativeSummary>,
    pub recommendation: Recommendation,
    pub series: Vec<PlanSeries>,
}

impl ComparisonReport {
    pub fn build<P: Borrow<Plan>>(plans: &[P]) -> Result<Self> {
        let Comparison {
            summaries,
            recommendation,
        } = compare(plans)?;

        Ok(Self {
            summaries,
            recommendation,
            series: plans.iter().map(|p| PlanSeries::build(p.borrow())).collect(),
        })
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// One summary per row. Plan names are quoted when they contain delimiters.
    pub fn to_csv(&self) -> Result<String> {
        let mut buffer = Vec::new();
        {
            let mut wrt = WriterBuilder::new().from_writer(&mut buffer);
            wrt.write_record([
                "Plan",
                "Final Cumulative Balance",
                "Mean Coverage",
                "Overall Autonomy",
                "Overall Debt",
                "Total Uses",
                "Total Sources",
                "Qualified",
            ])?;

            for summary in &self.summaries {
                wrt.write_record([
                    summary.plan_name.clone(),
                    format!("{:.2}", summary.final_cumulative_balance),
                    format!("{:.2}", summary.mean_coverage_ratio),
                    format!("{:.2}", summary.overall_autonomy),
                    format!("{:.2}", summary.overall_debt),
                    format!("{:.2}", summary.total_uses),
                    format!("{:.2}", summary.total_sources),
                    summary.is_qualified().to_string(),
                ])?;
            }
            wrt.flush()?;
        }

        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str("# Financing Plan Comparison\n\n");

        output.push_str("| Plan | Final Cumulative Balance | Mean Coverage | Autonomy | Debt | Total Uses | Total Sources |\n");
        output.push_str("|---|---|---|---|---|---|---|\n");
        for summary in &self.summaries {
            output.push_str(&format!(
                "| {} | {:.2} | {:.1}% | {:.1}% | {:.1}% | {:.2} | {:.2} |\n",
                summary.plan_name,
                summary.final_cumulative_balance,
                summary.mean_coverage_ratio,
                summary.overall_autonomy,
                summary.overall_debt,
                summary.total_uses,
                summary.total_sources
            ));
        }
        output.push('\n');

        let recommendation = &self.recommendation;
        output.push_str("## Recommendation\n\n");
        match recommendation.kind {
            RecommendationKind::Qualified => output.push_str(&format!(
                "**{}** meets every financial-health threshold and has the highest final cumulative balance.\n\n",
                recommendation.plan_name
            )),
            RecommendationKind::Fallback => output.push_str(&format!(
                "No plan meets every threshold. **{}** is the least unfavourable (fallback).\n\n",
                recommendation.plan_name
            )),
        }
        output.push_str(&format!(
            "- Final cumulative balance: {:.2}\n",
            recommendation.summary.final_cumulative_balance
        ));
        output.push_str(&format!(
            "- Mean coverage ratio: {:.1}%\n",
            recommendation.summary.mean_coverage_ratio
        ));
        output.push_str(&format!("- Structure: {}\n", recommendation.assessment.structure.label()));
        output.push_str(&format!("- Autonomy: {}\n", recommendation.assessment.autonomy.label()));
        output.push_str(&format!("- Debt: {}\n", recommendation.assessment.debt.label()));

        output
    }
}
