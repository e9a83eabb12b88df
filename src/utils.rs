use crate::error::{FinancingPlanError, Result};
use crate::taxonomy::FlowGroup;

pub const MIN_HORIZON: u32 = 1;
pub const MAX_HORIZON: u32 = 5;

/// `numerator / denominator * 100`, or 0 when the denominator is not positive.
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

/// Arithmetic mean, 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn validate_horizon(horizon: u32) -> Result<()> {
    if !(MIN_HORIZON..=MAX_HORIZON).contains(&horizon) {
        return Err(FinancingPlanError::InvalidHorizon(horizon));
    }
    Ok(())
}

pub fn validate_year(year: u32, horizon: u32) -> Result<()> {
    if year < 1 || year > horizon {
        return Err(FinancingPlanError::YearOutOfRange { year, horizon });
    }
    Ok(())
}

pub fn validate_amount(group: FlowGroup, category: &str, year: u32, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(FinancingPlanError::InvalidAmount {
            group: group.to_string(),
            category: category.to_string(),
            year,
            amount,
        });
    }
    Ok(())
}

/// Parses a spreadsheet cell as an amount.
///
/// Accepts thousands separators made of spaces (including non-breaking ones) or commas,
/// and a trailing currency marker (`€`, `DA`). Without a dot, a single comma followed by
/// one or two digits is a decimal comma ("1 200,50"); any other comma groups thousands
/// ("1,200", "12,500,000"). An empty cell is 0.
pub fn parse_amount(cell: &str) -> std::result::Result<f64, String> {
    let mut cleaned: String = cell
        .trim()
        .trim_end_matches('€')
        .trim_end_matches("DA")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Ok(0.0);
    }

    cleaned = if is_decimal_comma(&cleaned) {
        cleaned.replace(',', ".")
    } else {
        cleaned.replace(',', "")
    };

    cleaned
        .parse::<f64>()
        .map_err(|e| format!("'{}' is not a number: {}", cell.trim(), e))
}

fn is_decimal_comma(cleaned: &str) -> bool {
    if cleaned.contains('.') {
        return false;
    }
    match cleaned.split_once(',') {
        Some((_, fraction)) => {
            (1..=2).contains(&fraction.len()) && fraction.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_zero_denominator() {
        assert_eq!(percentage(500.0, 0.0), 0.0);
        assert!((percentage(50.0, 200.0) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[90.0, 110.0, 130.0]) - 110.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_horizon_bounds() {
        assert!(validate_horizon(0).is_err());
        assert!(validate_horizon(1).is_ok());
        assert!(validate_horizon(5).is_ok());
        assert!(matches!(
            validate_horizon(6),
            Err(FinancingPlanError::InvalidHorizon(6))
        ));
    }

    #[test]
    fn test_validate_amount_rejects_negative_and_nan() {
        assert!(validate_amount(FlowGroup::Uses, "Investments", 1, 0.0).is_ok());
        assert!(validate_amount(FlowGroup::Uses, "Investments", 1, -1.0).is_err());
        assert!(validate_amount(FlowGroup::Sources, "Subsidies", 2, f64::NAN).is_err());
        assert!(validate_amount(FlowGroup::Sources, "Subsidies", 2, f64::INFINITY).is_err());
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("").unwrap(), 0.0);
        assert_eq!(parse_amount("1500").unwrap(), 1500.0);
        assert_eq!(parse_amount("1 200,50").unwrap(), 1200.5);
        assert_eq!(parse_amount("1,200.50").unwrap(), 1200.5);
        assert_eq!(parse_amount("250 000 €").unwrap(), 250_000.0);
        assert_eq!(parse_amount("3,5").unwrap(), 3.5);
        assert_eq!(parse_amount("1 200,5").unwrap(), 1200.5);
        assert_eq!(parse_amount("1,200").unwrap(), 1200.0);
        assert_eq!(parse_amount("12,500,000").unwrap(), 12_500_000.0);
        assert_eq!(parse_amount("12,500,000 DA").unwrap(), 12_500_000.0);
        assert!(parse_amount("abc").is_err());
    }
}
