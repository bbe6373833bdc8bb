//! Transaction-related types for the ledger engine
//!
//! This module defines the parsed form of one source line and the field-level
//! parsers shared by the ingestion passes and the query layer.

use crate::types::error::LedgerError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Account identifier as it appears in the source
pub type AccountId = String;

/// Date format used by transaction lines and date queries
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of fractional digits carried by every amount
pub const AMOUNT_SCALE: u32 = 2;

/// Number of comma-separated fields in a transaction line
pub const FIELD_COUNT: usize = 4;

/// One parsed transaction line
///
/// Moves `amount` from `source_id` to `dest_id` on `date`. The amount is a
/// magnitude and is never negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Posting date of both legs
    pub date: NaiveDate,

    /// Account debited by the transaction
    pub source_id: AccountId,

    /// Account credited by the transaction
    pub dest_id: AccountId,

    /// Magnitude moved, always at scale 2
    pub amount: Decimal,
}

impl Transaction {
    /// Parse a line and tag any error with its 1-based line number
    pub fn parse_line(line: &str, number: usize) -> Result<Self, LedgerError> {
        line.parse().map_err(|e: LedgerError| e.at_line(number))
    }
}

impl FromStr for Transaction {
    type Err = LedgerError;

    /// Parse `date,source_id,dest_id,amount`
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let [date, source_id, dest_id, amount] = split_fields(line)?;

        Ok(Transaction {
            date: parse_date(date)?,
            source_id: source_id.to_string(),
            dest_id: dest_id.to_string(),
            amount: parse_amount(amount)?,
        })
    }
}

/// Split a line into its four trimmed fields
///
/// Only the field count is validated, so the discovery pass can use this
/// without parsing dates or amounts.
pub fn split_fields(line: &str) -> Result<[&str; FIELD_COUNT], LedgerError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();

    <[&str; FIELD_COUNT]>::try_from(fields.as_slice()).map_err(|_| {
        LedgerError::format(format!(
            "expected {} comma-separated fields, found {} in '{}'",
            FIELD_COUNT,
            fields.len(),
            line
        ))
    })
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| LedgerError::format(format!("invalid date '{}': {}", value, e)))
}

/// Parse an unsigned amount with at most two fractional digits
///
/// The result is rescaled so that `125` and `125.00` compare and print alike.
pub fn parse_amount(value: &str) -> Result<Decimal, LedgerError> {
    let value = value.trim();

    if value.starts_with(['-', '+']) {
        return Err(LedgerError::format(format!(
            "amount '{}' must be an unsigned magnitude",
            value
        )));
    }

    let mut amount = Decimal::from_str(value)
        .map_err(|_| LedgerError::format(format!("invalid amount '{}'", value)))?;

    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(LedgerError::format(format!(
            "amount '{}' has more than {} fractional digits",
            value, AMOUNT_SCALE
        )));
    }

    // rescale leaves the scale untouched when the mantissa cannot grow
    amount.rescale(AMOUNT_SCALE);
    if amount.scale() != AMOUNT_SCALE {
        return Err(LedgerError::format(format!(
            "amount '{}' is too large to hold {} fractional digits",
            value, AMOUNT_SCALE
        )));
    }

    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_transaction() {
        let trx: Transaction = "2015-01-16,john,mary,125.00".parse().unwrap();

        assert_eq!(trx.date, NaiveDate::from_ymd_opt(2015, 1, 16).unwrap());
        assert_eq!(trx.source_id, "john");
        assert_eq!(trx.dest_id, "mary");
        assert_eq!(trx.amount, Decimal::new(12500, 2));
    }

    #[test]
    fn test_parse_trims_fields() {
        let trx: Transaction = " 2015-01-16 , john ,  mary , 125.00 ".parse().unwrap();

        assert_eq!(trx.source_id, "john");
        assert_eq!(trx.dest_id, "mary");
    }

    #[rstest]
    #[case::integer("125", "125.00")]
    #[case::one_digit("125.5", "125.50")]
    #[case::two_digits("0.01", "0.01")]
    #[case::zero("0", "0.00")]
    #[case::trailing_zeros("125.000", "125.00")]
    #[case::many_trailing_zeros("0.1000000", "0.10")]
    fn test_parse_amount_normalizes_scale(#[case] input: &str, #[case] expected: &str) {
        let amount = parse_amount(input).unwrap();
        assert_eq!(amount.to_string(), expected);
        assert_eq!(amount.scale(), AMOUNT_SCALE);
    }

    #[rstest]
    #[case::too_few_fields("2015-01-16,john,mary", "expected 4 comma-separated fields, found 3")]
    #[case::too_many_fields("2015-01-16,john,mary,1.00,x", "found 5")]
    #[case::empty_line("", "found 1")]
    #[case::bad_date("2015-13-16,john,mary,125.00", "invalid date")]
    #[case::wrong_date_format("16/01/2015,john,mary,125.00", "invalid date")]
    #[case::bad_amount("2015-01-16,john,mary,abc", "invalid amount")]
    #[case::negative_amount("2015-01-16,john,mary,-5.00", "unsigned magnitude")]
    #[case::too_precise("2015-01-16,john,mary,1.001", "more than 2 fractional digits")]
    #[case::too_precise_with_zeros("2015-01-16,john,mary,1.0010", "more than 2 fractional digits")]
    #[case::too_large("2015-01-16,john,mary,79228162514264337593543950335", "too large")]
    fn test_parse_errors(#[case] line: &str, #[case] expected: &str) {
        let error = line.parse::<Transaction>().unwrap_err();

        assert!(matches!(error, LedgerError::Format { line: None, .. }));
        assert!(
            error.to_string().contains(expected),
            "'{}' should contain '{}'",
            error,
            expected
        );
    }

    #[test]
    fn test_parse_line_reports_line_number() {
        let error = Transaction::parse_line("2015-01-16,john,mary", 12).unwrap_err();
        assert!(matches!(error, LedgerError::Format { line: Some(12), .. }));
    }

    #[test]
    fn test_split_fields_ignores_field_content() {
        let fields = split_fields("not-a-date,john,mary,not-an-amount").unwrap();
        assert_eq!(fields, ["not-a-date", "john", "mary", "not-an-amount"]);
    }
}
