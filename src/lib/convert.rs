use chrono::NaiveDate;

use crate::types::{
    BalanceHistory, BankTransaction, MonarchExport, MonetaryAmount, ProcessedTransaction,
};

/// Tried in order; the first one that parses wins, so `01/02/2024` is always
/// read as January 2nd.
const DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%d/%m/%Y"];

/// Rewrites a bank date as `YYYY-MM-DD`, or returns it untouched when none of
/// the known formats match.
pub fn normalize_date(raw: &str) -> String {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| {
            tracing::debug!("could not parse date {raw:?}, passing it through");
            raw.to_string()
        })
}

/// Debits always come out negative whatever sign the bank used; otherwise
/// the credit, otherwise zero. A zero debit counts as no debit, since many
/// banks fill the unused column with `0.00`.
pub fn signed_amount(transaction: &BankTransaction) -> MonetaryAmount {
    match (transaction.debit, transaction.credit) {
        (Some(debit), _) if !debit.value().is_zero() => -debit.abs(),
        (_, Some(credit)) => credit,
        _ => MonetaryAmount::zero(),
    }
}

fn to_processed(transaction: &BankTransaction, date: &str, account: &str) -> ProcessedTransaction {
    ProcessedTransaction {
        date: date.to_string(),
        merchant: transaction.transaction.clone(),
        category: String::new(),
        account: account.to_string(),
        original_statement: transaction.transaction.clone(),
        notes: String::new(),
        amount: signed_amount(transaction),
        tags: String::new(),
    }
}

fn to_balance(transaction: &BankTransaction, date: &str, account: &str) -> BalanceHistory {
    BalanceHistory {
        date: date.to_string(),
        account: account.to_string(),
        balance: transaction.balance,
    }
}

/// Builds both Monarch ledgers, one entry per input transaction.
///
/// Balance history is sorted by the date *string*. Normalized dates sort
/// chronologically; a date that could not be normalized keeps its raw text
/// and lands wherever that text sorts.
pub fn convert_to_monarch_format(
    transactions: &[BankTransaction],
    account_name: &str,
) -> MonarchExport {
    let (transactions, mut balance_history): (Vec<_>, Vec<_>) = transactions
        .iter()
        .map(|t| {
            let date = normalize_date(&t.date);
            (
                to_processed(t, &date, account_name),
                to_balance(t, &date, account_name),
            )
        })
        .unzip();

    balance_history.sort_by(|a, b| a.date.cmp(&b.date));

    tracing::info!(
        "converted {} transaction(s) for account {account_name:?}",
        transactions.len()
    );

    MonarchExport {
        transactions,
        balance_history,
    }
}
