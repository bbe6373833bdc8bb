//! Transaction processing
//!
//! This module provides the TransactionProcessor that turns parsed
//! transactions into balanced pairs of account postings.
//!
//! The processor enforces:
//! - Both referenced accounts exist before anything is posted
//! - The two postings of a transaction sum to exactly zero
//! - Lines are posted in source order, with no rollback on failure

use crate::core::account_registry::AccountRegistry;
use crate::types::{AccountEntry, Batch, LedgerError, Transaction};
use log::debug;
use rust_decimal::Decimal;

/// Posts transactions into the accounts of an owned registry
pub struct TransactionProcessor {
    registry: AccountRegistry,

    /// Whether postings are retained as entries on their accounts
    store_entries: bool,
}

impl TransactionProcessor {
    /// Create a processor over a registry whose accounts are already discovered
    pub fn new(registry: AccountRegistry, store_entries: bool) -> Self {
        TransactionProcessor {
            registry,
            store_entries,
        }
    }

    /// Create a processor that does not retain entries
    pub fn from_registry(registry: AccountRegistry) -> Self {
        Self::new(registry, false)
    }

    pub fn store_entries(&self) -> bool {
        self.store_entries
    }

    pub fn set_store_entries(&mut self, store_entries: bool) {
        self.store_entries = store_entries;
    }

    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> AccountRegistry {
        self.registry
    }

    /// Post one transaction
    ///
    /// Debits the source account and credits the destination account by the
    /// transaction amount, both on the transaction date.
    ///
    /// # Returns
    ///
    /// The `(debit, credit)` entries that were posted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either account is not registered (`UnknownAccount`)
    /// - Either balance bucket would overflow (`ArithmeticOverflow`)
    /// - The two postings do not sum to zero (`InvariantViolation`)
    ///
    /// Both legs are checked before either is posted, so on the first two
    /// errors neither account is touched.
    pub fn process(
        &mut self,
        transaction: &Transaction,
    ) -> Result<(AccountEntry, AccountEntry), LedgerError> {
        let legs = [
            (&transaction.source_id, -transaction.amount),
            (&transaction.dest_id, transaction.amount),
        ];
        // A self-transfer returns its bucket to where it was, so only the
        // debit needs room
        let checked = if transaction.source_id == transaction.dest_id {
            &legs[..1]
        } else {
            &legs[..]
        };
        for (id, amount) in checked {
            self.registry
                .get(id)
                .ok_or_else(|| LedgerError::unknown_account(id))?
                .can_post(*amount, transaction.date)?;
        }

        let debit = self.post(&transaction.source_id, -transaction.amount, transaction)?;
        let credit = self.post(&transaction.dest_id, transaction.amount, transaction)?;

        check_zero_sum(&debit, &credit)?;
        Ok((debit, credit))
    }

    /// Parse and post every line of a batch in order
    ///
    /// Stops at the first failing line. Lines before it stay posted.
    ///
    /// # Returns
    ///
    /// The number of transactions posted. Blank lines are not counted.
    pub fn process_batch(&mut self, batch: &Batch) -> Result<usize, LedgerError> {
        let mut posted = 0;

        for (number, line) in batch.numbered() {
            let transaction = Transaction::parse_line(line, number)?;
            self.process(&transaction).map_err(|e| e.at_line(number))?;
            posted += 1;
        }

        debug!(
            "Posted {} transactions starting at line {}",
            posted, batch.start_line
        );
        Ok(posted)
    }

    fn post(
        &mut self,
        id: &str,
        amount: Decimal,
        transaction: &Transaction,
    ) -> Result<AccountEntry, LedgerError> {
        let store = self.store_entries;
        self.registry
            .get_mut(id)
            .ok_or_else(|| LedgerError::unknown_account(id))?
            .add_entry(amount, transaction.date, store)
    }
}

/// Verify that the two legs of a transaction cancel out exactly
pub fn check_zero_sum(debit: &AccountEntry, credit: &AccountEntry) -> Result<(), LedgerError> {
    if debit.amount + credit.amount != Decimal::ZERO {
        return Err(LedgerError::InvariantViolation {
            date: debit.date,
            debit: debit.amount,
            credit: credit.amount,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_batch() -> Batch {
        Batch::from_lines([
            "2015-01-16,john,mary,125.00",
            "2015-01-16,john,mary,125.00",
            "2015-01-17,mary,insurance,100.00",
        ])
    }

    fn processor(store_entries: bool) -> TransactionProcessor {
        let mut registry = AccountRegistry::new();
        registry.discover_accounts(&sample_batch()).unwrap();
        TransactionProcessor::new(registry, store_entries)
    }

    fn balance(processor: &TransactionProcessor, id: &str) -> Decimal {
        processor
            .registry()
            .get(id)
            .unwrap()
            .get_balance(None)
            .unwrap()
    }

    #[test]
    fn test_process_batch_of_transactions_entries() {
        let mut processor = processor(true);

        processor.process_batch(&sample_batch()).unwrap();

        let registry = processor.registry();
        assert_eq!(registry.get("john").unwrap().entries().len(), 2);
        assert_eq!(registry.get("mary").unwrap().entries().len(), 3);
        assert_eq!(registry.get("insurance").unwrap().entries().len(), 1);
        assert_eq!(balance(&processor, "john"), Decimal::new(-25000, 2));
        assert_eq!(balance(&processor, "mary"), Decimal::new(15000, 2));
        assert_eq!(balance(&processor, "insurance"), Decimal::new(10000, 2));
    }

    #[test]
    fn test_process_batch_without_storing_entries() {
        let mut processor = processor(true);
        processor.set_store_entries(false);

        processor.process_batch(&sample_batch()).unwrap();

        let registry = processor.registry();
        assert!(registry.accounts().all(|account| account.entries().is_empty()));
        assert_eq!(balance(&processor, "john"), Decimal::new(-25000, 2));
        assert_eq!(balance(&processor, "mary"), Decimal::new(15000, 2));
    }

    #[test]
    fn test_store_entries_defaults_are_respected() {
        assert!(!processor(false).store_entries());
        assert!(processor(true).store_entries());
        assert!(!TransactionProcessor::from_registry(AccountRegistry::new()).store_entries());
    }

    #[test]
    fn test_process_single_transaction() {
        let mut processor = processor(true);
        let trx: Transaction = "2015-01-16,john,mary,125.00".parse().unwrap();

        let (debit, credit) = processor.process(&trx).unwrap();

        assert_eq!(debit.amount + credit.amount, Decimal::ZERO);
        assert_eq!(balance(&processor, "john"), Decimal::new(-12500, 2));
        assert_eq!(balance(&processor, "mary"), Decimal::new(12500, 2));

        let john = processor.registry().get("john").unwrap();
        let mary = processor.registry().get("mary").unwrap();
        assert_eq!(john.entries()[0].amount, Decimal::new(-12500, 2));
        assert_eq!(mary.entries()[0].amount, Decimal::new(12500, 2));
        assert_eq!(john.entries()[0].date.to_string(), "2015-01-16");
        assert_eq!(mary.entries()[0].date.to_string(), "2015-01-16");
    }

    #[test]
    fn test_process_unknown_account_fails_without_posting() {
        let mut processor = processor(true);
        let trx: Transaction = "2015-01-16,john,stranger,10.00".parse().unwrap();

        let result = processor.process(&trx);

        assert_eq!(result.unwrap_err(), LedgerError::unknown_account("stranger"));
        assert!(processor.registry().get("john").unwrap().entries().is_empty());
        assert_eq!(balance(&processor, "john"), Decimal::ZERO);
    }

    #[test]
    fn test_process_overflow_on_credit_leaves_both_accounts_untouched() {
        let mut registry = AccountRegistry::new();
        for id in ["a", "b", "c"] {
            registry.create(id);
        }
        let mut processor = TransactionProcessor::new(registry, true);
        let date = NaiveDate::from_ymd_opt(2015, 1, 16).unwrap();
        let transfer = |source: &str, amount: Decimal| Transaction {
            date,
            source_id: source.to_string(),
            dest_id: "b".to_string(),
            amount,
        };

        processor.process(&transfer("a", Decimal::MAX)).unwrap();
        let result = processor.process(&transfer("c", Decimal::ONE));

        assert_eq!(
            result.unwrap_err(),
            LedgerError::arithmetic_overflow("b", date)
        );
        let c = processor.registry().get("c").unwrap();
        assert!(c.entries().is_empty());
        assert_eq!(c.balance_history().count(), 0);
        assert_eq!(processor.registry().get("b").unwrap().entries().len(), 1);

        let ledger_sum: Decimal = ["a", "b", "c"]
            .iter()
            .map(|id| balance(&processor, id))
            .sum();
        assert_eq!(ledger_sum, Decimal::ZERO);
    }

    #[test]
    fn test_self_transfer_near_bucket_limit_still_posts() {
        let mut processor = processor(false);
        let date = NaiveDate::from_ymd_opt(2015, 1, 16).unwrap();
        let fill = Transaction {
            date,
            source_id: "mary".to_string(),
            dest_id: "john".to_string(),
            amount: Decimal::MAX,
        };
        let self_transfer = Transaction {
            date,
            source_id: "john".to_string(),
            dest_id: "john".to_string(),
            amount: Decimal::ONE,
        };

        processor.process(&fill).unwrap();
        processor.process(&self_transfer).unwrap();

        assert_eq!(balance(&processor, "john"), Decimal::MAX);
    }

    #[test]
    fn test_process_batch_counts_posted_lines_only() {
        let mut processor = processor(false);
        let batch = Batch::from_lines(["2015-01-16,john,mary,1.00", "", "2015-01-17,mary,john,1.00"]);

        assert_eq!(processor.process_batch(&batch).unwrap(), 2);
    }

    #[test]
    fn test_process_batch_reports_line_of_unknown_account() {
        let mut processor = processor(false);
        let batch = Batch::new(
            20,
            vec![
                "2015-01-16,john,mary,1.00".to_string(),
                "2015-01-16,ghost,mary,1.00".to_string(),
            ],
        );

        let result = processor.process_batch(&batch);

        assert_eq!(
            result.unwrap_err(),
            LedgerError::UnknownAccount {
                account: "ghost".to_string(),
                line: Some(21),
            }
        );
        // No rollback: the first line stays posted
        assert_eq!(balance(&processor, "john"), Decimal::new(-100, 2));
    }

    #[test]
    fn test_process_batch_stops_at_malformed_line() {
        let mut processor = processor(false);
        let batch = Batch::from_lines([
            "2015-01-16,john,mary,1.00",
            "2015-01-16,john,mary,one",
            "2015-01-16,john,mary,1.00",
        ]);

        let result = processor.process_batch(&batch);

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::Format { line: Some(2), .. }
        ));
        assert_eq!(balance(&processor, "john"), Decimal::new(-100, 2));
    }

    #[test]
    fn test_check_zero_sum_rejects_unbalanced_pair() {
        let date = NaiveDate::from_ymd_opt(2015, 1, 16).unwrap();
        let debit = AccountEntry::new(Decimal::new(-12500, 2), date);
        let credit = AccountEntry::new(Decimal::new(12400, 2), date);

        let result = check_zero_sum(&debit, &credit);

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::InvariantViolation { .. }
        ));
        assert!(check_zero_sum(&debit, &AccountEntry::new(Decimal::new(12500, 2), date)).is_ok());
    }

    #[test]
    fn test_self_transfer_nets_to_zero() {
        let mut processor = processor(true);
        let trx: Transaction = "2015-01-16,john,john,40.00".parse().unwrap();

        processor.process(&trx).unwrap();

        let john = processor.registry().get("john").unwrap();
        assert_eq!(john.entries().len(), 2);
        assert_eq!(balance(&processor, "john"), Decimal::ZERO);
    }
}
