use crate::types::{ColumnMapping, Field};

const KEYWORDS: [(Field, &[&str]); 5] = [
    (Field::Date, &["date"]),
    (Field::Transaction, &["description", "transaction"]),
    (Field::Debit, &["debit", "withdrawal"]),
    (Field::Credit, &["credit", "deposit"]),
    (Field::Balance, &["balance"]),
];

/// Guesses the mapping from a header row by case-insensitive substring match.
///
/// A header may match several fields, and a later header replaces an earlier
/// match for the same field. Returns `None` unless all five fields are found,
/// in which case columns have to be assigned by hand.
pub fn detect_column_mapping<S: AsRef<str>>(headers: &[S]) -> Option<ColumnMapping> {
    let mut mapping = ColumnMapping::empty();

    for (idx, header) in headers.iter().enumerate() {
        let lower = header.as_ref().to_lowercase();
        for (field, words) in KEYWORDS {
            if words.iter().any(|w| lower.contains(w)) {
                mapping.set(field, idx);
            }
        }
    }

    if mapping.is_complete() {
        Some(mapping)
    } else {
        tracing::warn!(
            "could not detect columns from header: missing {:?}",
            mapping
                .unassigned()
                .iter()
                .map(Field::name)
                .collect::<Vec<_>>()
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_standard_header() {
        let mapping =
            detect_column_mapping(&["Date", "Description", "Debit", "Credit", "Balance"]).unwrap();

        assert_eq!(mapping.get(Field::Date), Some(0));
        assert_eq!(mapping.get(Field::Transaction), Some(1));
        assert_eq!(mapping.get(Field::Debit), Some(2));
        assert_eq!(mapping.get(Field::Credit), Some(3));
        assert_eq!(mapping.get(Field::Balance), Some(4));
    }

    #[test]
    fn detects_alternate_keywords_in_any_order() {
        let mapping = detect_column_mapping(&[
            "Running BALANCE",
            "Withdrawals",
            "Deposits",
            "Transaction Details",
            "Posting Date",
        ])
        .unwrap();

        assert_eq!(mapping.get(Field::Balance), Some(0));
        assert_eq!(mapping.get(Field::Debit), Some(1));
        assert_eq!(mapping.get(Field::Credit), Some(2));
        assert_eq!(mapping.get(Field::Transaction), Some(3));
        assert_eq!(mapping.get(Field::Date), Some(4));
    }

    #[test]
    fn last_matching_header_wins() {
        let mapping = detect_column_mapping(&[
            "Transaction Date",
            "Post Date",
            "Description",
            "Debit",
            "Credit",
            "Balance",
        ])
        .unwrap();

        // "Transaction Date" matches both date and transaction; both are
        // overwritten by later columns.
        assert_eq!(mapping.get(Field::Date), Some(1));
        assert_eq!(mapping.get(Field::Transaction), Some(2));
    }

    #[test]
    fn one_header_can_claim_several_fields() {
        let mapping =
            detect_column_mapping(&["Date", "Transaction", "Debit/Credit", "Balance", "Memo"])
                .unwrap();

        assert_eq!(mapping.get(Field::Debit), Some(2));
        assert_eq!(mapping.get(Field::Credit), Some(2));
    }

    #[test]
    fn incomplete_header_yields_no_mapping() {
        assert_eq!(
            detect_column_mapping(&["Date", "Description", "Amount", "Balance", "Memo"]),
            None
        );
        assert_eq!(detect_column_mapping::<&str>(&[]), None);
    }
}
