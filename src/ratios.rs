use crate::plan::{Plan, SourcesRecord, UsesRecord};
use crate::taxonomy::SourceCategory;
use crate::utils::percentage;
use serde::{Deserialize, Serialize};

/// Sources must cover at least this share of uses (percent).
pub const COVERAGE_THRESHOLD: f64 = 100.0;
/// Minimum self-financing share of uses (percent).
pub const AUTONOMY_THRESHOLD: f64 = 30.0;
/// Maximum borrowing share of sources (percent).
pub const DEBT_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ratios {
    /// Total sources / total uses × 100
    pub coverage: f64,
    /// Self-financing capacity / total uses × 100
    pub autonomy: f64,
    /// Medium/long-term loans / total sources × 100
    pub debt: f64,
}

/// Ratio triple for one year. Each ratio is 0 when its denominator is 0.
pub fn ratios(uses: &UsesRecord, sources: &SourcesRecord) -> Ratios {
    let total_uses = uses.total();
    let total_sources = sources.total();

    Ratios {
        coverage: percentage(total_sources, total_uses),
        autonomy: percentage(
            sources.get(SourceCategory::SelfFinancingCapacity),
            total_uses,
        ),
        debt: percentage(
            sources.get(SourceCategory::MediumLongTermLoans),
            total_sources,
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoverageAssessment {
    Adequate {
        /// Points above 100.
        margin_points: f64,
    },
    Deficit {
        /// Points below 100.
        deficit_points: f64,
        /// Uses minus sources for the year.
        shortfall: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutonomyAssessment {
    Sufficient,
    ExternalDependency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtAssessment {
    Controlled,
    Elevated,
}

impl CoverageAssessment {
    pub fn is_adequate(&self) -> bool {
        matches!(self, CoverageAssessment::Adequate { .. })
    }

    pub fn label(&self) -> String {
        match self {
            CoverageAssessment::Adequate { margin_points } => {
                format!("Adequate: sources fully cover uses (margin {:.2} points)", margin_points)
            }
            CoverageAssessment::Deficit {
                deficit_points,
                shortfall,
            } => format!(
                "Deficit of {:.2} points: additional financing of {:.2} required",
                deficit_points, shortfall
            ),
        }
    }
}

impl AutonomyAssessment {
    pub fn from_ratio(autonomy: f64) -> Self {
        if autonomy >= AUTONOMY_THRESHOLD {
            AutonomyAssessment::Sufficient
        } else {
            AutonomyAssessment::ExternalDependency
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AutonomyAssessment::Sufficient => "Sufficient self-financing",
            AutonomyAssessment::ExternalDependency => {
                "External-dependency warning: strengthen self-financing capacity"
            }
        }
    }
}

impl DebtAssessment {
    pub fn from_ratio(debt: f64) -> Self {
        if debt <= DEBT_THRESHOLD {
            DebtAssessment::Controlled
        } else {
            DebtAssessment::Elevated
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DebtAssessment::Controlled => "Controlled debt level",
            DebtAssessment::Elevated => "Elevated debt warning: limit recourse to borrowing",
        }
    }
}

/// Advisory, human-readable judgement of a year's ratios. Never stored on the plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioAssessment {
    pub coverage: CoverageAssessment,
    pub autonomy: AutonomyAssessment,
    pub debt: DebtAssessment,
}

impl Ratios {
    pub fn assess(&self, total_uses: f64, total_sources: f64) -> RatioAssessment {
        let coverage = if self.coverage >= COVERAGE_THRESHOLD {
            CoverageAssessment::Adequate {
                margin_points: self.coverage - COVERAGE_THRESHOLD,
            }
        } else {
            CoverageAssessment::Deficit {
                deficit_points: COVERAGE_THRESHOLD - self.coverage,
                shortfall: total_uses - total_sources,
            }
        };

        RatioAssessment {
            coverage,
            autonomy: AutonomyAssessment::from_ratio(self.autonomy),
            debt: DebtAssessment::from_ratio(self.debt),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRatios {
    pub year: u32,
    pub ratios: Ratios,
    pub assessment: RatioAssessment,
}

/// Ratios and assessments for every year of a plan, in year order.
pub fn plan_ratios(plan: &Plan) -> Vec<YearRatios> {
    plan.years()
        .iter()
        .map(|allocation| {
            let year_ratios = ratios(&allocation.uses, &allocation.sources);
            YearRatios {
                year: allocation.year,
                ratios: year_ratios,
                assessment: year_ratios
                    .assess(allocation.uses.total(), allocation.sources.total()),
            }
        })
        .collect()
}
