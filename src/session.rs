use crate::comparator::{compare, Comparison};
use crate::error::{FinancingPlanError, Result};
use crate::plan::Plan;
use log::info;

/// The caller-owned, ordered collection of committed plans.
///
/// Plans are only ever appended; names are unique.
#[derive(Debug, Clone, Default)]
pub struct PlanRepository {
    plans: Vec<Plan>,
}

impl PlanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, plan: Plan) -> Result<()> {
        if self.get(plan.name()).is_some() {
            return Err(FinancingPlanError::DuplicatePlanName(plan.name().to_string()));
        }
        info!("Committed plan '{}' ({} plans in session)", plan.name(), self.plans.len() + 1);
        self.plans.push(plan);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.name() == name)
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn names(&self) -> Vec<&str> {
        self.plans.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Resolves names in selection order.
    pub fn select(&self, names: &[&str]) -> Result<Vec<&Plan>> {
        names
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| FinancingPlanError::PlanNotFound(name.to_string()))
            })
            .collect()
    }

    pub fn compare_selected(&self, names: &[&str]) -> Result<Comparison> {
        let selected = self.select(names)?;
        compare(&selected)
    }

    pub fn compare_all(&self) -> Result<Comparison> {
        compare(&self.plans)
    }
}
