//! Monthly income/expense totals

use chrono::Datelike;
use serde::Serialize;

use crate::models::{parse_record_date, Transaction, TransactionKind};

/// Totals for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
    /// Transactions that fell inside the month
    pub count: usize,
}

/// Sum the transactions dated in `year`/`month`
///
/// Transactions whose date does not parse are left out.
pub fn month_summary(transactions: &[Transaction], year: i32, month: u32) -> MonthSummary {
    let mut income = 0.0;
    let mut expense = 0.0;
    let mut count = 0;

    for tx in transactions {
        let Some(date) = parse_record_date(&tx.date) else {
            continue;
        };
        if date.year() != year || date.month() != month {
            continue;
        }

        count += 1;
        match tx.kind {
            TransactionKind::Income => income += tx.amount,
            TransactionKind::Expense => expense += tx.amount,
        }
    }

    MonthSummary {
        year,
        month,
        income,
        expense,
        balance: income - expense,
        count,
    }
}

/// Parse `YYYY-MM` into `(year, month)`
pub fn parse_month(text: &str) -> Option<(i32, u32)> {
    let (year, month) = text.trim().split_once('-')?;
    let year = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Record, TransactionDraft};
    use chrono::Utc;

    fn tx(draft: TransactionDraft) -> Transaction {
        Transaction::from_draft(uuid::Uuid::new_v4().to_string(), Utc::now(), draft)
    }

    #[test]
    fn test_balance_for_month() {
        let transactions = vec![
            tx(TransactionDraft::income(100.0, "2026-10-03")),
            tx(TransactionDraft::expense(40.0, "2026-10-15T12:00:00.000Z")),
        ];

        let summary = month_summary(&transactions, 2026, 10);
        assert_eq!(summary.income, 100.0);
        assert_eq!(summary.expense, 40.0);
        assert_eq!(summary.balance, 60.0);
        assert_eq!(summary.count, 2);
    }

    #[test]
    fn test_other_months_and_years_excluded() {
        let transactions = vec![
            tx(TransactionDraft::income(100.0, "2026-10-03")),
            tx(TransactionDraft::income(500.0, "2026-09-30")),
            tx(TransactionDraft::income(700.0, "2025-10-03")),
        ];

        let summary = month_summary(&transactions, 2026, 10);
        assert_eq!(summary.income, 100.0);
        assert_eq!(summary.count, 1);
    }

    #[test]
    fn test_empty_month() {
        let summary = month_summary(&[], 2026, 2);
        assert_eq!(summary.balance, 0.0);
        assert_eq!(summary.count, 0);
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2026-10"), Some((2026, 10)));
        assert_eq!(parse_month("2026-13"), None);
        assert_eq!(parse_month("october"), None);
    }
}
