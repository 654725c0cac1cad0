use thiserror::Error;

use crate::types::Field;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// The input file could not be opened or the output file could not be written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input could not be read as CSV, or a record could not be written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("please provide an account name before exporting")]
    MissingAccountName,

    /// Export was requested while at least one field has no column assigned.
    ///
    /// Fields are listed in their canonical order so the message is stable.
    #[error("please map the following columns: {}", join_fields(.0))]
    UnmappedColumns(Vec<Field>),

    #[error("an export is already in progress")]
    ExportInProgress,

    #[error("serialized CSV is not valid UTF-8: {0}")]
    Encoding(String),
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_columns_lists_field_names() {
        let err = ConvertError::UnmappedColumns(vec![Field::Debit, Field::Balance]);
        assert_eq!(
            err.to_string(),
            "please map the following columns: debit, balance"
        );
    }
}
