//! # Financing Plan Builder
//!
//! A library for entering multi-year financing plans (uses of funds vs. sources of funds),
//! computing per-year totals, balances and ratios, and comparing several plans to pick the
//! best one.
//!
//! ## Core Concepts
//!
//! - **Uses** (Emplois): fund consumption, e.g. investments, loan repayments, dividends
//! - **Sources** (Ressources): fund provision, e.g. self-financing capacity, loans, subsidies
//! - **Balance**: sources minus uses for one year; the **cumulative balance** is its running sum
//! - **Ratios**: coverage (sources / uses), autonomy (self-financing / uses) and
//!   debt (medium/long-term loans / sources), all as percentages, 0 on a zero denominator
//! - **Recommendation**: the qualified plan with the highest final cumulative balance, or a
//!   clearly-tagged fallback when no plan meets every threshold
//!
//! Every derived figure is a pure function of a committed [`Plan`]; nothing is cached.
//!
//! ## Example
//!
//! ```rust
//! use financing_plan_builder::*;
//!
//! # fn main() -> financing_plan_builder::Result<()> {
//! let mut uses = UsesGrid::new();
//! uses.insert((UseCategory::Investments, 1), 500_000.0);
//!
//! let mut sources = SourcesGrid::new();
//! sources.insert((SourceCategory::SelfFinancingCapacity, 1), 200_000.0);
//! sources.insert((SourceCategory::MediumLongTermLoans, 1), 350_000.0);
//!
//! let mut repository = PlanRepository::new();
//! repository.add(create_plan("Expansion", 1, &uses, &sources)?)?;
//!
//! if let Some(plan) = repository.get("Expansion") {
//!     let report = analyze_plan(plan);
//!     println!("{}", report.to_markdown());
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregation;
pub mod comparator;
pub mod error;
pub mod ingestion;
pub mod plan;
pub mod ratios;
pub mod report;
pub mod schema;
pub mod session;
pub mod taxonomy;
pub mod utils;

pub use aggregation::{
    plan_totals, year_metrics, FinancialStatus, PlanAggregator, PlanTotals, YearMetrics,
};
pub use comparator::{
    compare, ComparativeSummary, Comparison, PlanComparator, Recommendation, RecommendationKind,
    StructureAssessment, SummaryAssessment,
};
pub use error::{FinancingPlanError, Result};
pub use ingestion::*;
pub use plan::*;
pub use ratios::*;
pub use report::*;
pub use schema::*;
pub use session::PlanRepository;
pub use taxonomy::*;
pub use utils::*;

use log::{debug, info};
use std::borrow::Borrow;
use std::io::Read;

pub struct FinancingPlanProcessor;

impl FinancingPlanProcessor {
    /// Per-year metrics, ratios and assessments for one plan.
    pub fn analyze(plan: &Plan) -> PlanReport {
        info!("Analyzing financing plan: {}", plan.name());
        let report = PlanReport::build(plan);
        debug!(
            "Plan '{}' final cumulative balance: {:.2}",
            plan.name(),
            report
                .years
                .last()
                .map_or(0.0, |y| y.metrics.cumulative_balance)
        );
        report
    }

    /// Summaries, recommendation and chart series for two or more plans.
    pub fn compare<P: Borrow<Plan>>(plans: &[P]) -> Result<ComparisonReport> {
        ComparisonReport::build(plans)
    }

    /// Builds a plan from a JSON [`PlanInput`] document.
    pub fn plan_from_json(json: &str) -> Result<Plan> {
        PlanInput::from_json(json)?.to_plan()
    }

    /// Reads and classifies a row-labelled CSV table, then commits it as a plan.
    ///
    /// With `strict`, any row matching no category aborts the import.
    pub fn import_csv<R: Read>(reader: R, name: &str, strict: bool) -> Result<ImportOutcome> {
        info!("Importing financing plan '{}' from table", name);
        let rows = read_rows_csv(reader)?;
        let classified = if strict {
            classify_strict(&rows)?
        } else {
            classify(&rows)?
        };

        let unclassified = classified.unclassified.clone();
        let assignments = classified.assignments.clone();
        let plan = classified.into_plan(name)?;

        Ok(ImportOutcome {
            plan,
            assignments,
            unclassified,
        })
    }
}

/// A committed imported plan plus the classification audit trail.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub plan: Plan,
    pub assignments: Vec<ClassifiedRow>,
    pub unclassified: Vec<RawRow>,
}

pub fn analyze_plan(plan: &Plan) -> PlanReport {
    FinancingPlanProcessor::analyze(plan)
}

pub fn compare_plans<P: Borrow<Plan>>(plans: &[P]) -> Result<ComparisonReport> {
    FinancingPlanProcessor::compare(plans)
}
