use std::{
    io::Read,
    path::{Path, PathBuf},
};

use crate::convert::convert_to_monarch_format;
use crate::error::{ConvertError, Result};
use crate::io::{balance_rows, export_to_csv, read_grid, read_grid_from_path, transaction_rows};
use crate::mapping::detect_column_mapping;
use crate::parser::parse_transactions;
use crate::types::{BankTransaction, ColumnMapping, ExportKind, Field};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    #[default]
    Idle,
    Exporting,
}

/// Everything the user has configured for one uploaded file.
///
/// Each edit re-parses the grid so `transactions()` always reflects the
/// current mapping and header flag.
#[derive(Debug, Default)]
pub struct Session {
    grid: Vec<Vec<String>>,
    has_header: bool,
    mapping: ColumnMapping,
    account_name: String,
    transactions: Vec<BankTransaction>,
    export_state: ExportState,
}

impl Session {
    pub fn new(has_header: bool) -> Self {
        Self {
            has_header,
            ..Self::default()
        }
    }

    pub fn grid(&self) -> &[Vec<String>] {
        &self.grid
    }

    pub fn has_header(&self) -> bool {
        self.has_header
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// Parsed rows for the current mapping; empty while any field is unassigned.
    pub fn transactions(&self) -> &[BankTransaction] {
        &self.transactions
    }

    pub fn export_state(&self) -> ExportState {
        self.export_state
    }

    /// Replaces the grid with a freshly read file. On failure the previous
    /// grid and mapping are left as they were.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<()> {
        let grid = read_grid(reader)?;
        self.replace_grid(grid);
        Ok(())
    }

    /// Same as [Session::load], reading from a file on disk.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        let grid = read_grid_from_path(path)?;
        self.replace_grid(grid);
        Ok(())
    }

    fn replace_grid(&mut self, grid: Vec<Vec<String>>) {
        self.grid = grid;
        self.mapping = ColumnMapping::empty();
        if self.has_header {
            self.infer_mapping();
        }
        self.reparse();
    }

    /// Re-runs header detection against row 0. Returns whether a full mapping
    /// was found; the current mapping is kept when it was not.
    pub fn infer_mapping(&mut self) -> bool {
        let Some(header) = self.grid.first() else {
            return false;
        };
        match detect_column_mapping(header) {
            Some(mapping) => {
                tracing::info!("detected column mapping from header row");
                self.mapping = mapping;
                self.reparse();
                true
            }
            None => false,
        }
    }

    pub fn set_has_header(&mut self, has_header: bool) {
        self.has_header = has_header;
        self.reparse();
    }

    pub fn assign(&mut self, field: Field, column: Option<usize>) {
        self.mapping.assign(field, column);
        self.reparse();
    }

    pub fn set_account_name(&mut self, name: impl Into<String>) {
        self.account_name = name.into();
    }

    fn reparse(&mut self) {
        self.transactions = match self.mapping.resolve() {
            Ok(resolved) => parse_transactions(&self.grid, &resolved, self.has_header),
            Err(_) => Vec::new(),
        };
    }

    /// Checks that an export could run: an account name, then a full mapping.
    pub fn validate(&self) -> Result<()> {
        if self.account_name.trim().is_empty() {
            return Err(ConvertError::MissingAccountName);
        }
        self.mapping.resolve().map(|_| ())
    }

    /// Writes the requested Monarch file into `out_dir` and returns its path.
    ///
    /// Rejected while another export is running. The state is back to
    /// [ExportState::Idle] when this returns, whatever the outcome.
    pub fn export(&mut self, kind: ExportKind, out_dir: &Path) -> Result<PathBuf> {
        if self.export_state == ExportState::Exporting {
            return Err(ConvertError::ExportInProgress);
        }
        self.validate()?;

        self.export_state = ExportState::Exporting;
        let result = self.write_export(kind, out_dir);
        self.export_state = ExportState::Idle;

        if let Err(e) = &result {
            tracing::error!("export of {} failed: {e}", kind.file_name());
        }
        result
    }

    fn write_export(&self, kind: ExportKind, out_dir: &Path) -> Result<PathBuf> {
        let export = convert_to_monarch_format(&self.transactions, &self.account_name);
        match kind {
            ExportKind::Transactions => export_to_csv(
                &transaction_rows(&export.transactions),
                out_dir,
                kind.file_name(),
            ),
            ExportKind::Balance => export_to_csv(
                &balance_rows(&export.balance_history),
                out_dir,
                kind.file_name(),
            ),
        }
    }
}
