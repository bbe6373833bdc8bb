//! Output formatting for query results
//!
//! Every query writes to a caller-supplied `Write`, which is stdout for the
//! CLI. Tabular results are written as CSV with a header row. Amounts are
//! always printed with two fractional digits.

use crate::core::AccountRegistry;
use crate::types::{Account, LedgerError};
use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct EntryRow {
    date: String,
    amount: String,
}

#[derive(Debug, Serialize)]
struct HistoryRow {
    date: String,
    balance: String,
}

#[derive(Debug, Serialize)]
struct AccountBalanceRow<'a> {
    account: &'a str,
    balance: String,
}

fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

/// Write account identifiers, one per line, in creation order
pub fn write_account_ids(registry: &AccountRegistry, output: &mut dyn Write) -> Result<(), LedgerError> {
    for id in registry.account_ids() {
        writeln!(output, "{}", id)?;
    }
    Ok(())
}

/// Write a single balance
pub fn write_balance(balance: Decimal, output: &mut dyn Write) -> Result<(), LedgerError> {
    writeln!(output, "{}", format_amount(balance))?;
    Ok(())
}

/// Write the retained entries of an account as `date,amount` CSV
pub fn write_entries_csv(account: &Account, output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    for entry in account.entries() {
        writer.serialize(EntryRow {
            date: entry.date.to_string(),
            amount: format_amount(entry.amount),
        })?;
    }

    if account.entries().is_empty() {
        writer.write_record(["date", "amount"])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the per-date balances of an account as `date,balance` CSV
pub fn write_balance_history_csv(
    account: &Account,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);
    let mut empty = true;

    for (date, balance) in account.balance_history() {
        empty = false;
        writer.serialize(HistoryRow {
            date: date.to_string(),
            balance: format_amount(balance),
        })?;
    }

    if empty {
        writer.write_record(["date", "balance"])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write every account with its total balance as `account,balance` CSV
///
/// Accounts appear in creation order.
///
/// # Errors
///
/// Returns `ArithmeticOverflow` if a total cannot be computed, or `Io` if
/// writing fails.
pub fn write_account_balances_csv(
    registry: &AccountRegistry,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    writer.write_record(["account", "balance"])?;
    for account in registry.accounts() {
        writer.serialize(AccountBalanceRow {
            account: account.id(),
            balance: format_amount(account.get_balance(None)?),
        })?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 1, d).unwrap()
    }

    fn sample_registry() -> AccountRegistry {
        let mut registry = AccountRegistry::new();
        let john = registry.create("john");
        john.add_entry(Decimal::new(-12500, 2), date(16), true).unwrap();
        john.add_entry(Decimal::new(-12500, 2), date(17), true).unwrap();
        registry
            .create("mary")
            .add_entry(Decimal::new(25000, 2), date(16), false)
            .unwrap();
        registry.create("bank");
        registry
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> Result<(), LedgerError>,
    {
        let mut output = Vec::new();
        f(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[rstest]
    #[case::whole(Decimal::new(150, 0), "150.00\n")]
    #[case::negative(Decimal::new(-25000, 2), "-250.00\n")]
    #[case::zero(Decimal::ZERO, "0.00\n")]
    #[case::one_digit(Decimal::new(15, 1), "1.50\n")]
    fn test_write_balance(#[case] balance: Decimal, #[case] expected: &str) {
        assert_eq!(render(|out| write_balance(balance, out)), expected);
    }

    #[test]
    fn test_write_account_ids_in_creation_order() {
        let registry = sample_registry();

        assert_eq!(
            render(|out| write_account_ids(&registry, out)),
            "john\nmary\nbank\n"
        );
    }

    #[test]
    fn test_write_entries_csv() {
        let registry = sample_registry();
        let john = registry.get("john").unwrap();

        assert_eq!(
            render(|out| write_entries_csv(john, out)),
            "date,amount\n2015-01-16,-125.00\n2015-01-17,-125.00\n"
        );
    }

    #[test]
    fn test_write_entries_csv_without_entries_has_header_only() {
        let registry = sample_registry();
        let mary = registry.get("mary").unwrap();

        assert_eq!(render(|out| write_entries_csv(mary, out)), "date,amount\n");
    }

    #[test]
    fn test_write_balance_history_csv() {
        let registry = sample_registry();
        let john = registry.get("john").unwrap();

        assert_eq!(
            render(|out| write_balance_history_csv(john, out)),
            "date,balance\n2015-01-16,-125.00\n2015-01-17,-125.00\n"
        );
    }

    #[test]
    fn test_write_balance_history_csv_for_untouched_account() {
        let registry = sample_registry();
        let bank = registry.get("bank").unwrap();

        assert_eq!(render(|out| write_balance_history_csv(bank, out)), "date,balance\n");
    }

    #[test]
    fn test_write_account_balances_csv() {
        let registry = sample_registry();

        assert_eq!(
            render(|out| write_account_balances_csv(&registry, out)),
            "account,balance\njohn,-250.00\nmary,250.00\nbank,0.00\n"
        );
    }
}
