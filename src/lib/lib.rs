mod convert;
mod error;
mod io;
mod mapping;
mod parser;
mod session;
mod types;

use std::path::{Path, PathBuf};

pub use convert::{convert_to_monarch_format, normalize_date, signed_amount};
pub use error::{ConvertError, Result};
pub use io::{
    balance_rows, export_to_csv, read_balance_csv, read_grid, read_grid_from_path,
    read_transactions_csv, to_csv_string, transaction_rows,
};
pub use mapping::detect_column_mapping;
pub use parser::{parse_amount, parse_transactions, MIN_ROW_LEN};
pub use session::{ExportState, Session};
pub use types::{
    BalanceHistory, BankTransaction, ColumnMapping, ExportKind, Field, MonarchExport,
    MonetaryAmount, ProcessedTransaction, ResolvedMapping,
};

/// What the user supplies alongside the bank file.
#[derive(Debug, Default, Clone)]
pub struct ConvertOptions {
    pub account_name: String,
    pub has_header: bool,
    /// Manual column choices, applied in order after header detection.
    pub assignments: Vec<(Field, usize)>,
}

/// Loads `csv_path` into a session configured by `options`.
pub fn open_session(csv_path: &Path, options: &ConvertOptions) -> Result<Session> {
    let mut session = Session::new(options.has_header);
    session.load_path(csv_path)?;
    for (field, column) in &options.assignments {
        session.assign(*field, Some(*column));
    }
    session.set_account_name(options.account_name.clone());

    Ok(session)
}

/// Converts one bank export into the requested Monarch files inside `out_dir`.
pub fn convert_file(
    csv_path: &Path,
    options: &ConvertOptions,
    out_dir: &Path,
    kinds: &[ExportKind],
) -> Result<Vec<PathBuf>> {
    let mut session = open_session(csv_path, options)?;
    session.validate()?;

    kinds
        .iter()
        .map(|kind| session.export(*kind, out_dir))
        .collect()
}
