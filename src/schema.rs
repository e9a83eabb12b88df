use crate::error::{FinancingPlanError, Result};
use crate::plan::{create_plan, Plan, SourcesGrid, UsesGrid};
use crate::taxonomy::{FlowGroup, SourceCategory, UseCategory};
use crate::utils::validate_amount;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AmountEntry {
    #[schemars(
        description = "Category name. Accepts the English label (e.g. 'Investments'), the French label (e.g. 'CAF', 'Emprunts LMT') or the variant name, case-insensitively."
    )]
    pub category: String,

    #[schemars(description = "1-based year within the plan horizon")]
    pub year: u32,

    #[schemars(description = "Non-negative monetary amount")]
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlanInput {
    #[schemars(description = "Unique plan name within the session")]
    pub name: String,

    #[schemars(description = "Number of years covered by the plan, between 1 and 5")]
    pub horizon: u32,

    #[serde(default)]
    #[schemars(
        description = "Uses (Emplois) amounts. Categories: Carry-forward from prior plans, Investments, Loan repayments, Working-capital requirement, Dividends. Omitted entries are 0."
    )]
    pub uses: Vec<AmountEntry>,

    #[serde(default)]
    #[schemars(
        description = "Sources (Ressources) amounts. Categories: Self-financing capacity, Subsidies, Capital increase, Medium/long-term loans, Asset disposals, Working-capital drawdown. Omitted entries are 0."
    )]
    pub sources: Vec<AmountEntry>,
}

impl PlanInput {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolves category names and builds the plan.
    ///
    /// Each entry is validated on its own; repeated `(category, year)` entries are then summed.
    pub fn to_plan(&self) -> Result<Plan> {
        let mut uses = UsesGrid::new();
        for entry in &self.uses {
            let category = UseCategory::from_label(&entry.category)
                .ok_or_else(|| FinancingPlanError::UnknownCategory(entry.category.clone()))?;
            validate_amount(FlowGroup::Uses, category.label(), entry.year, entry.amount)?;
            *uses.entry((category, entry.year)).or_insert(0.0) += entry.amount;
        }

        let mut sources = SourcesGrid::new();
        for entry in &self.sources {
            let category = SourceCategory::from_label(&entry.category)
                .ok_or_else(|| FinancingPlanError::UnknownCategory(entry.category.clone()))?;
            validate_amount(FlowGroup::Sources, category.label(), entry.year, entry.amount)?;
            *sources.entry((category, entry.year)).or_insert(0.0) += entry.amount;
        }

        create_plan(self.name.clone(), self.horizon, &uses, &sources)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(PlanInput)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let schema_json = PlanInput::schema_as_json().unwrap();
        assert!(schema_json.contains("horizon"));
        assert!(schema_json.contains("uses"));
        assert!(schema_json.contains("sources"));
        assert!(schema_json.contains("AmountEntry"));
    }

    #[test]
    fn test_from_json_to_plan() {
        let json = r#"{
            "name": "Expansion",
            "horizon": 2,
            "uses": [
                {"category": "Investissements", "year": 1, "amount": 1000.0},
                {"category": "dividends", "year": 2, "amount": 50.0}
            ],
            "sources": [
                {"category": "CAF", "year": 1, "amount": 600.0},
                {"category": "Emprunts LMT", "year": 1, "amount": 400.0},
                {"category": "caf", "year": 1, "amount": 100.0}
            ]
        }"#;

        let plan = PlanInput::from_json(json).unwrap().to_plan().unwrap();
        assert_eq!(plan.name(), "Expansion");
        assert_eq!(plan.horizon(), 2);
        assert_eq!(plan.years()[0].uses.investments, 1000.0);
        assert_eq!(plan.years()[1].uses.dividends, 50.0);
        assert_eq!(plan.years()[0].sources.self_financing_capacity, 700.0);
        assert_eq!(plan.years()[0].sources.medium_long_term_loans, 400.0);
    }

    #[test]
    fn test_unknown_category() {
        let input = PlanInput {
            name: "Typo".to_string(),
            horizon: 1,
            uses: vec![AmountEntry {
                category: "Investmnts".to_string(),
                year: 1,
                amount: 1.0,
            }],
            sources: vec![],
        };
        assert!(matches!(
            input.to_plan(),
            Err(FinancingPlanError::UnknownCategory(name)) if name == "Investmnts"
        ));
    }

    #[test]
    fn test_repeated_entries_cannot_offset_a_negative_amount() {
        let json = r#"{
            "name": "Offset",
            "horizon": 1,
            "uses": [
                {"category": "Investments", "year": 1, "amount": -500.0},
                {"category": "Investments", "year": 1, "amount": 800.0}
            ]
        }"#;

        match PlanInput::from_json(json).unwrap().to_plan() {
            Err(FinancingPlanError::InvalidAmount {
                group,
                category,
                year,
                amount,
            }) => {
                assert_eq!(group, "Uses");
                assert_eq!(category, "Investments");
                assert_eq!(year, 1);
                assert_eq!(amount, -500.0);
            }
            other => panic!("expected InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_groups_default_to_empty() {
        let plan = PlanInput::from_json(r#"{"name": "Blank", "horizon": 3}"#)
            .unwrap()
            .to_plan()
            .unwrap();
        assert_eq!(plan.years().len(), 3);
    }
}
