use crate::error::Result;
use csv::WriterBuilder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the financing plan a category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum FlowGroup {
    #[schemars(description = "Fund consumption (Emplois)")]
    Uses,
    #[schemars(description = "Fund provision (Ressources)")]
    Sources,
}

impl fmt::Display for FlowGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowGroup::Uses => write!(f, "Uses"),
            FlowGroup::Sources => write!(f, "Sources"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "PascalCase")]
pub enum UseCategory {
    #[schemars(description = "Amounts still to be financed from earlier plans (Reliquat des plans antérieurs)")]
    CarryForward,

    #[schemars(description = "Equipment, construction, renovation, patents and licences (Investissements)")]
    Investments,

    #[schemars(description = "Principal repaid on existing borrowings (Remboursement emprunts)")]
    LoanRepayments,

    #[schemars(description = "Increase in the working-capital requirement: stock, receivables (BFR)")]
    WorkingCapitalRequirement,

    #[schemars(description = "Distributions to shareholders (Dividendes)")]
    Dividends,
}

impl UseCategory {
    /// Declaration order. Classification walks categories in this order.
    pub const ALL: [UseCategory; 5] = [
        UseCategory::CarryForward,
        UseCategory::Investments,
        UseCategory::LoanRepayments,
        UseCategory::WorkingCapitalRequirement,
        UseCategory::Dividends,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UseCategory::CarryForward => "Carry-forward from prior plans",
            UseCategory::Investments => "Investments",
            UseCategory::LoanRepayments => "Loan repayments",
            UseCategory::WorkingCapitalRequirement => "Working-capital requirement",
            UseCategory::Dividends => "Dividends",
        }
    }

    pub fn french_label(self) -> &'static str {
        match self {
            UseCategory::CarryForward => "Reliquat des plans antérieurs",
            UseCategory::Investments => "Investissements",
            UseCategory::LoanRepayments => "Remboursement emprunts",
            UseCategory::WorkingCapitalRequirement => "BFR",
            UseCategory::Dividends => "Dividendes",
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            UseCategory::CarryForward => &["Reliquat", "Plans antérieurs"],
            UseCategory::Investments => &[
                "Matériels",
                "Équipements",
                "Construction",
                "Rénovation",
                "Brevets",
                "Licences",
            ],
            UseCategory::LoanRepayments => &["Remboursement", "Échéance"],
            UseCategory::WorkingCapitalRequirement => &[
                "BFR",
                "Fonds de roulement",
                "Stocks",
                "Créances",
                "Dettes",
            ],
            UseCategory::Dividends => &["Dividendes", "Rémunération actionnaires"],
        }
    }

    /// Resolves an English label, French label or variant name, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| {
            c.label().to_lowercase() == wanted
                || c.french_label().to_lowercase() == wanted
                || format!("{:?}", c).to_lowercase() == wanted
        })
    }
}

impl fmt::Display for UseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "PascalCase")]
pub enum SourceCategory {
    #[schemars(description = "Internally generated funds: profits plus depreciation (CAF). Drives the autonomy ratio.")]
    SelfFinancingCapacity,

    #[schemars(description = "Grants and public aid (Subventions)")]
    Subsidies,

    #[schemars(description = "New equity contributed by shareholders (Augmentation capital)")]
    CapitalIncrease,

    #[schemars(description = "New medium/long-term borrowing (Emprunts LMT). Drives the debt ratio.")]
    MediumLongTermLoans,

    #[schemars(description = "Proceeds from selling fixed assets (Cessions actifs)")]
    AssetDisposals,

    #[schemars(description = "Drawdown of existing working capital (Prélèvement FR)")]
    WorkingCapitalDrawdown,
}

impl SourceCategory {
    pub const ALL: [SourceCategory; 6] = [
        SourceCategory::SelfFinancingCapacity,
        SourceCategory::Subsidies,
        SourceCategory::CapitalIncrease,
        SourceCategory::MediumLongTermLoans,
        SourceCategory::AssetDisposals,
        SourceCategory::WorkingCapitalDrawdown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SourceCategory::SelfFinancingCapacity => "Self-financing capacity",
            SourceCategory::Subsidies => "Subsidies",
            SourceCategory::CapitalIncrease => "Capital increase",
            SourceCategory::MediumLongTermLoans => "Medium/long-term loans",
            SourceCategory::AssetDisposals => "Asset disposals",
            SourceCategory::WorkingCapitalDrawdown => "Working-capital drawdown",
        }
    }

    pub fn french_label(self) -> &'static str {
        match self {
            SourceCategory::SelfFinancingCapacity => "CAF",
            SourceCategory::Subsidies => "Subventions",
            SourceCategory::CapitalIncrease => "Augmentation capital",
            SourceCategory::MediumLongTermLoans => "Emprunts LMT",
            SourceCategory::AssetDisposals => "Cessions actifs",
            SourceCategory::WorkingCapitalDrawdown => "Prélèvement FR",
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            SourceCategory::SelfFinancingCapacity => {
                &["Capacité autofinancement", "Bénéfices", "Amortissements"]
            }
            SourceCategory::Subsidies => &["Subventions", "Aides"],
            SourceCategory::CapitalIncrease => &["Capital", "Apport"],
            SourceCategory::MediumLongTermLoans => &["Emprunt", "Crédit"],
            SourceCategory::AssetDisposals => &["Cession", "Vente"],
            SourceCategory::WorkingCapitalDrawdown => &["Prélèvement", "Fonds roulement"],
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| {
            c.label().to_lowercase() == wanted
                || c.french_label().to_lowercase() == wanted
                || format!("{:?}", c).to_lowercase() == wanted
        })
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A category from either group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "group", content = "category")]
pub enum Category {
    Use(UseCategory),
    Source(SourceCategory),
}

impl Category {
    pub fn group(self) -> FlowGroup {
        match self {
            Category::Use(_) => FlowGroup::Uses,
            Category::Source(_) => FlowGroup::Sources,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Use(c) => c.label(),
            Category::Source(c) => c.label(),
        }
    }

    pub fn french_label(self) -> &'static str {
        match self {
            Category::Use(c) => c.french_label(),
            Category::Source(c) => c.french_label(),
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Use(c) => c.keywords(),
            Category::Source(c) => c.keywords(),
        }
    }

    /// Case-insensitive substring match against any keyword of this category.
    pub fn matches(self, label: &str) -> bool {
        let haystack = label.to_lowercase();
        self.keywords()
            .iter()
            .any(|keyword| haystack.contains(&keyword.to_lowercase()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The fixed Uses/Sources taxonomy used to classify imported rows.
pub struct Taxonomy;

impl Taxonomy {
    /// Every category, Uses first, each group in declaration order.
    pub fn categories() -> impl Iterator<Item = Category> {
        UseCategory::ALL
            .into_iter()
            .map(Category::Use)
            .chain(SourceCategory::ALL.into_iter().map(Category::Source))
    }

    /// First matching category in declaration order.
    pub fn classify(label: &str) -> Option<Category> {
        Self::categories().find(|c| c.matches(label))
    }

    /// All matching categories, for callers that want to disambiguate manually.
    pub fn all_matches(label: &str) -> Vec<Category> {
        Self::categories().filter(|c| c.matches(label)).collect()
    }

    pub fn to_csv() -> Result<String> {
        let mut buffer = Vec::new();
        {
            let mut wrt = WriterBuilder::new().from_writer(&mut buffer);
            wrt.write_record(["Group", "Category", "Label", "Keywords"])?;

            for category in Self::categories() {
                wrt.write_record([
                    category.group().to_string(),
                    category.label().to_string(),
                    category.french_label().to_string(),
                    category.keywords().join(";"),
                ])?;
            }
            wrt.flush()?;
        }

        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn to_markdown() -> String {
        let mut output = String::new();
        output.push_str("# Financing Plan Taxonomy\n\n");

        output.push_str("## Uses\n\n");
        for category in UseCategory::ALL {
            output.push_str(&format!(
                "- **{}** ({}): {}\n",
                category.label(),
                category.french_label(),
                category.keywords().join(", ")
            ));
        }
        output.push('\n');

        output.push_str("## Sources\n\n");
        for category in SourceCategory::ALL {
            output.push_str(&format!(
                "- **{}** ({}): {}\n",
                category.label(),
                category.french_label(),
                category.keywords().join(", ")
            ));
        }
        output.push('\n');

        output
    }
}
