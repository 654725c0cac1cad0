use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRow {
    date: &'static str,
    merchant: &'static str,
    category: &'static str,
    account: &'static str,
    original_statement: &'static str,
    notes: &'static str,
    amount: &'static str,
    tags: &'static str,
}

impl TransactionRow {
    fn new(date: &'static str, merchant: &'static str, account: &'static str, amount: &'static str) -> Self {
        Self {
            date,
            merchant,
            category: "",
            account,
            original_statement: merchant,
            notes: "",
            amount,
            tags: "",
        }
    }
}

#[derive(Serialize)]
struct BalanceRow {
    date: &'static str,
    account: &'static str,
    balance: &'static str,
}

// Only used during testing so no need to return result
fn to_csv<T: Serialize>(rows: Vec<T>) -> String {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for r in rows {
        wtr.serialize(r).unwrap();
    }
    wtr.flush().unwrap();
    String::from_utf8(wtr.into_inner().unwrap()).unwrap()
}

/// Expected `monarch_transactions.csv` content from `[date, merchant, account, amount]`
/// rows. Category, notes and tags are always empty and originalStatement repeats
/// the merchant.
pub fn create_transactions_csv(rows: Vec<[&'static str; 4]>) -> String {
    to_csv(
        rows.into_iter()
            .map(|r| TransactionRow::new(r[0], r[1], r[2], r[3]))
            .collect(),
    )
}

/// Expected `monarch_balance_history.csv` content from `[date, account, balance]` rows.
pub fn create_balance_csv(rows: Vec<[&'static str; 3]>) -> String {
    to_csv(
        rows.into_iter()
            .map(|r| BalanceRow {
                date: r[0],
                account: r[1],
                balance: r[2],
            })
            .collect(),
    )
}

/// Data rows of a CSV string, header excluded, for checks that only care
/// about which rows are present.
pub fn data_rows(csv: &str) -> Vec<String> {
    csv.lines().skip(1).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use crate::{create_balance_csv, create_transactions_csv, data_rows};

    #[test]
    fn create_transactions_csv_fills_empty_columns() {
        let sut = create_transactions_csv(vec![["2024-01-15", "Coffee Shop", "Checking", "-4.5"]]);
        let expected = String::from(
            "date,merchant,category,account,originalStatement,notes,amount,tags\n\
             2024-01-15,Coffee Shop,,Checking,Coffee Shop,,-4.5,\n",
        );
        assert_eq!(sut, expected);
    }

    #[test]
    fn create_balance_csv_creates_multiple_rows() {
        let sut = create_balance_csv(vec![
            ["2024-01-14", "Checking", "1204.5"],
            ["2024-01-15", "Checking", "1200"],
        ]);
        let expected =
            String::from("date,account,balance\n2024-01-14,Checking,1204.5\n2024-01-15,Checking,1200\n");
        assert_eq!(sut, expected);
    }

    #[test]
    fn data_rows_skip_header() {
        let csv = "date,account,balance\n2024-01-14,Checking,1\n";
        assert_eq!(data_rows(csv), vec!["2024-01-14,Checking,1".to_string()]);
    }
}
