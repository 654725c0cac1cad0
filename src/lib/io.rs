use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use ::serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ConvertError, Result};
use crate::types::{BalanceHistory, MonetaryAmount, ProcessedTransaction};

fn plain_number<S: Serializer>(x: &MonetaryAmount, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&x.to_plain_string())
}

fn number_from_str<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<MonetaryAmount, D::Error> {
    let raw = String::deserialize(d)?;
    raw.parse().map_err(de::Error::custom)
}

/// Row layout of `monarch_transactions.csv`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRowEntity {
    date: String,
    merchant: String,
    category: String,
    account: String,
    original_statement: String,
    notes: String,
    #[serde(serialize_with = "plain_number", deserialize_with = "number_from_str")]
    amount: MonetaryAmount,
    tags: String,
}

impl TransactionRowEntity {
    pub fn from_domain(tx: &ProcessedTransaction) -> Self {
        Self {
            date: tx.date.clone(),
            merchant: tx.merchant.clone(),
            category: tx.category.clone(),
            account: tx.account.clone(),
            original_statement: tx.original_statement.clone(),
            notes: tx.notes.clone(),
            amount: tx.amount,
            tags: tx.tags.clone(),
        }
    }

    pub fn into_domain(self) -> ProcessedTransaction {
        ProcessedTransaction {
            date: self.date,
            merchant: self.merchant,
            category: self.category,
            account: self.account,
            original_statement: self.original_statement,
            notes: self.notes,
            amount: self.amount,
            tags: self.tags,
        }
    }
}

/// Row layout of `monarch_balance_history.csv`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceRowEntity {
    date: String,
    account: String,
    #[serde(serialize_with = "plain_number", deserialize_with = "number_from_str")]
    balance: MonetaryAmount,
}

impl BalanceRowEntity {
    pub fn from_domain(entry: &BalanceHistory) -> Self {
        Self {
            date: entry.date.clone(),
            account: entry.account.clone(),
            balance: entry.balance,
        }
    }

    pub fn into_domain(self) -> BalanceHistory {
        BalanceHistory {
            date: self.date,
            account: self.account,
            balance: self.balance,
        }
    }
}

/// Reads every line of a CSV source into a grid of untrimmed cells.
///
/// The header row, if any, is returned as row 0; rows may differ in length.
/// Bytes that are not valid UTF-8 (Windows-1252 exports, for instance) are
/// replaced with U+FFFD rather than rejecting the file.
pub fn read_grid<R: Read>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut grid = Vec::new();
    for record in reader.byte_records() {
        // fail on the first bad record, a partial grid would silently lose rows
        let record = record?;
        grid.push(
            record
                .iter()
                .map(|cell| String::from_utf8_lossy(cell).into_owned())
                .collect(),
        );
    }

    tracing::info!("read {} row(s) from CSV", grid.len());
    Ok(grid)
}

pub fn read_grid_from_path(path: &Path) -> Result<Vec<Vec<String>>> {
    tracing::debug!("opening {}", path.display());
    let file = File::open(path)?;
    read_grid(file)
}

fn write_records<W, T>(wtr: &mut csv::Writer<W>, records: &[T]) -> Result<()>
where
    W: std::io::Write,
    T: Serialize,
{
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Renders records as CSV text. The header comes from the first record's
/// field names, so an empty slice renders as an empty string.
pub fn to_csv_string<T: Serialize>(records: &[T]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    write_records(&mut wtr, records)?;

    let bytes = wtr
        .into_inner()
        .map_err(|e| ConvertError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))?;
    String::from_utf8(bytes).map_err(|e| ConvertError::Encoding(e.to_string()))
}

/// Writes records to `dir/file_name` and returns the written path.
pub fn export_to_csv<T: Serialize>(records: &[T], dir: &Path, file_name: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    let mut wtr = csv::Writer::from_path(&path)?;
    write_records(&mut wtr, records)?;

    tracing::info!("wrote {} row(s) to {}", records.len(), path.display());
    Ok(path)
}

pub fn transaction_rows(transactions: &[ProcessedTransaction]) -> Vec<TransactionRowEntity> {
    transactions
        .iter()
        .map(TransactionRowEntity::from_domain)
        .collect()
}

pub fn balance_rows(history: &[BalanceHistory]) -> Vec<BalanceRowEntity> {
    history.iter().map(BalanceRowEntity::from_domain).collect()
}

/// Reads a previously exported transactions file back into domain records.
pub fn read_transactions_csv<R: Read>(reader: R) -> Result<Vec<ProcessedTransaction>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for row in reader.deserialize::<TransactionRowEntity>() {
        rows.push(row?.into_domain());
    }
    Ok(rows)
}

/// Reads a previously exported balance history file back into domain records.
pub fn read_balance_csv<R: Read>(reader: R) -> Result<Vec<BalanceHistory>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for row in reader.deserialize::<BalanceRowEntity>() {
        rows.push(row?.into_domain());
    }
    Ok(rows)
}
