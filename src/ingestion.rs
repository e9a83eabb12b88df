use crate::error::{FinancingPlanError, Result};
use crate::plan::{create_plan, Plan, SourcesGrid, UsesGrid};
use crate::taxonomy::{Category, Taxonomy};
use crate::utils::{parse_amount, validate_amount};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// A labelled row from an imported table. `values[0]` is year 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub label: String,
    pub values: Vec<f64>,
}

impl RawRow {
    /// A single-year row.
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            values: vec![value],
        }
    }

    pub fn with_values(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRow {
    pub label: String,
    pub category: Category,
}

/// Result of keyword classification: a plan skeleton plus an audit trail.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassifiedImport {
    /// Widest row seen, in years.
    pub horizon: u32,
    pub uses: UsesGrid,
    pub sources: SourcesGrid,
    pub assignments: Vec<ClassifiedRow>,
    /// Rows that matched no category, kept for the caller to review.
    pub unclassified: Vec<RawRow>,
}

impl ClassifiedImport {
    pub fn is_fully_classified(&self) -> bool {
        self.unclassified.is_empty()
    }

    /// Commits the skeleton as a plan. Horizon and amounts are validated as for manual entry.
    pub fn into_plan(self, name: impl Into<String>) -> Result<Plan> {
        create_plan(name, self.horizon, &self.uses, &self.sources)
    }
}

/// Assigns each row to the first taxonomy category whose keyword occurs in its label.
///
/// Every cell is validated as an amount before matching rows for the same category and
/// year are summed. Only classified rows contribute to the horizon.
pub fn classify(rows: &[RawRow]) -> Result<ClassifiedImport> {
    let mut result = ClassifiedImport::default();

    for row in rows {
        let Some(category) = Taxonomy::classify(&row.label) else {
            warn!("Import row '{}' matched no category", row.label);
            result.unclassified.push(row.clone());
            continue;
        };

        debug!("Import row '{}' classified as {}", row.label, category);

        for (idx, &value) in row.values.iter().enumerate() {
            let year = idx as u32 + 1;
            validate_amount(category.group(), category.label(), year, value)?;
            match category {
                Category::Use(c) => *result.uses.entry((c, year)).or_insert(0.0) += value,
                Category::Source(c) => *result.sources.entry((c, year)).or_insert(0.0) += value,
            }
        }

        result.horizon = result.horizon.max(row.values.len() as u32);
        result.assignments.push(ClassifiedRow {
            label: row.label.clone(),
            category,
        });
    }

    info!(
        "Classified {} of {} import rows ({} unclassified)",
        result.assignments.len(),
        rows.len(),
        result.unclassified.len()
    );

    Ok(result)
}

/// Like [`classify`], but the first unmatched row is an error.
pub fn classify_strict(rows: &[RawRow]) -> Result<ClassifiedImport> {
    let result = classify(rows)?;
    if let Some(row) = result.unclassified.first() {
        return Err(FinancingPlanError::UnclassifiedRow {
            label: row.label.clone(),
        });
    }
    Ok(result)
}

/// Reads a row-labelled numeric table: a header row, then one row per item with the
/// label in the first column and one amount per year in the following columns.
///
/// All-or-nothing: any malformed row aborts the whole import.
pub fn read_rows_csv<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();

    for (idx, record) in rdr.records().enumerate() {
        let line = idx + 2;
        let record = record.map_err(|e| {
            FinancingPlanError::ImportParseFailure(format!("row {}: {}", line, e))
        })?;

        let label = match record.get(0) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => {
                // Blank separator lines carry no data.
                if record.iter().all(|cell| cell.is_empty()) {
                    continue;
                }
                return Err(FinancingPlanError::ImportParseFailure(format!(
                    "row {}: missing label",
                    line
                )));
            }
        };

        let values = record
            .iter()
            .skip(1)
            .map(parse_amount)
            .collect::<std::result::Result<Vec<f64>, String>>()
            .map_err(|e| FinancingPlanError::ImportParseFailure(format!("row {}: {}", line, e)))?;

        rows.push(RawRow { label, values });
    }

    info!("Read {} rows from imported table", rows.len());
    Ok(rows)
}
