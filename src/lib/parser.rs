use crate::types::{BankTransaction, MonetaryAmount, ResolvedMapping};

/// Rows shorter than this are treated as trailing noise (blank lines, footers).
pub const MIN_ROW_LEN: usize = 5;

/// Takes the longest numeric prefix of `raw`, after leading whitespace.
///
/// `"12.50 CR"` reads as 12.50, `"$4"` and `"abc"` read as nothing. There is
/// no currency or thousands-separator handling: `"1,200"` reads as 1.
pub fn parse_amount(raw: &str) -> Option<MonetaryAmount> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut pos = 0;

    let sign = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            "-"
        }
        Some(b'+') => {
            pos += 1;
            ""
        }
        _ => "",
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &s[int_start..pos];

    let mut frac_digits = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_digits = &s[frac_start..end];
        if !int_digits.is_empty() || !frac_digits.is_empty() {
            pos = end;
        }
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    // An exponent only counts when at least one digit follows it.
    let mut exponent = "";
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut end = pos + 1;
        if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > digits_start {
            exponent = &s[pos + 1..end];
        }
    }

    let int_part = if int_digits.is_empty() { "0" } else { int_digits };
    let mut canonical = format!("{sign}{int_part}");
    if !frac_digits.is_empty() {
        canonical.push('.');
        canonical.push_str(frac_digits);
    }
    if !exponent.is_empty() {
        canonical.push('e');
        canonical.push_str(exponent.trim_start_matches('+'));
    }

    canonical.parse().ok()
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

fn optional_amount(raw: &str) -> Option<MonetaryAmount> {
    if raw.is_empty() {
        None
    } else {
        parse_amount(raw)
    }
}

fn into_bank_transaction(row: &[String], mapping: &ResolvedMapping) -> BankTransaction {
    BankTransaction {
        date: cell(row, mapping.date).to_string(),
        transaction: cell(row, mapping.transaction).to_string(),
        debit: optional_amount(cell(row, mapping.debit)),
        credit: optional_amount(cell(row, mapping.credit)),
        balance: parse_amount(cell(row, mapping.balance)).unwrap_or_default(),
        raw_data: row.to_vec(),
    }
}

/// Projects the grid through `mapping`. The header row is skipped when
/// `skip_header` is set and rows shorter than [MIN_ROW_LEN] are dropped.
pub fn parse_transactions(
    grid: &[Vec<String>],
    mapping: &ResolvedMapping,
    skip_header: bool,
) -> Vec<BankTransaction> {
    let start = usize::from(skip_header);
    let rows = grid.get(start..).unwrap_or_default();

    let transactions: Vec<BankTransaction> = rows
        .iter()
        .filter(|row| row.len() >= MIN_ROW_LEN)
        .map(|row| into_bank_transaction(row, mapping))
        .collect();

    let dropped = rows.len() - transactions.len();
    if dropped > 0 {
        tracing::debug!("dropped {dropped} row(s) with fewer than {MIN_ROW_LEN} cells");
    }
    tracing::debug!("parsed {} transaction(s)", transactions.len());

    transactions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn amount(s: &str) -> MonetaryAmount {
        s.parse().unwrap()
    }

    fn identity() -> ResolvedMapping {
        ResolvedMapping {
            date: 0,
            transaction: 1,
            debit: 2,
            credit: 3,
            balance: 4,
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("4.50"), Some(amount("4.50")));
        assert_eq!(parse_amount("  -42.5"), Some(amount("-42.5")));
        assert_eq!(parse_amount("+7"), Some(amount("7")));
        assert_eq!(parse_amount(".5"), Some(amount("0.5")));
        assert_eq!(parse_amount("5."), Some(amount("5")));
        assert_eq!(parse_amount("0"), Some(MonetaryAmount::zero()));
    }

    #[test]
    fn test_parse_amount_takes_numeric_prefix() {
        assert_eq!(parse_amount("12.50 CR"), Some(amount("12.50")));
        assert_eq!(parse_amount("1,200.00"), Some(amount("1")));
        assert_eq!(parse_amount("2e3"), Some(amount("2000")));
        assert_eq!(parse_amount("2e"), Some(amount("2")));
        assert_eq!(parse_amount("3.1e-1x"), Some(amount("0.31")));
    }

    #[test]
    fn test_parse_amount_rejects_non_numeric() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("$4.00"), None);
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount("."), None);
    }

    #[test]
    fn coffee_shop_row_is_projected() {
        let grid = vec![row(&["01/15/2024", "Coffee Shop", "4.50", "", "1200.00"])];

        let txns = parse_transactions(&grid, &identity(), false);

        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date, "01/15/2024");
        assert_eq!(txns[0].transaction, "Coffee Shop");
        assert_eq!(txns[0].debit, Some(amount("4.50")));
        assert_eq!(txns[0].credit, None);
        assert_eq!(txns[0].balance, amount("1200.00"));
        assert_eq!(txns[0].raw_data, grid[0]);
    }

    #[test]
    fn header_row_is_skipped_only_when_flagged() {
        let grid = vec![
            row(&["Date", "Description", "Debit", "Credit", "Balance"]),
            row(&["01/15/2024", "Coffee Shop", "4.50", "", "1200.00"]),
        ];

        assert_eq!(parse_transactions(&grid, &identity(), true).len(), 1);
        assert_eq!(parse_transactions(&grid, &identity(), false).len(), 2);
    }

    #[test]
    fn short_rows_are_dropped() {
        let grid = vec![
            row(&["01/15/2024", "Coffee Shop", "4.50", "", "1200.00"]),
            row(&[""]),
            row(&["01/16/2024", "Payroll", "", "2000"]),
            row(&["01/17/2024", "Rent", "900", "", "2300", "extra"]),
        ];

        let txns = parse_transactions(&grid, &identity(), false);

        assert_eq!(txns.len(), 2);
        assert_eq!(txns[1].transaction, "Rent");
    }

    #[test]
    fn empty_grid_with_header_flag_yields_nothing() {
        assert!(parse_transactions(&[], &identity(), true).is_empty());
    }

    #[test]
    fn unparsable_numbers_degrade_per_field() {
        let grid = vec![row(&["someday", " Refund ", "n/a", "abc", "unknown"])];

        let txns = parse_transactions(&grid, &identity(), false);

        assert_eq!(txns[0].date, "someday");
        assert_eq!(txns[0].transaction, " Refund ");
        assert_eq!(txns[0].debit, None);
        assert_eq!(txns[0].credit, None);
        assert_eq!(txns[0].balance, MonetaryAmount::zero());
    }

    #[test]
    fn zero_debit_is_present_not_absent() {
        let grid = vec![row(&["2024-01-01", "Fee waived", "0", "", "10"])];

        let txns = parse_transactions(&grid, &identity(), false);

        assert_eq!(txns[0].debit, Some(MonetaryAmount::zero()));
    }

    #[test]
    fn mapping_past_row_end_reads_empty_cell() {
        let mapping = ResolvedMapping {
            balance: 7,
            ..identity()
        };
        let grid = vec![row(&["01/15/2024", "Coffee Shop", "4.50", "", "1200.00"])];

        let txns = parse_transactions(&grid, &mapping, false);

        assert_eq!(txns[0].balance, MonetaryAmount::zero());
    }
}
