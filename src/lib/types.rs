use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{ConvertError, Result};

/// The five semantic columns every bank export must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Transaction,
    Debit,
    Credit,
    Balance,
}

impl Field {
    /// Canonical order, used for iteration and for error reporting.
    pub const ALL: [Field; 5] = [
        Field::Date,
        Field::Transaction,
        Field::Debit,
        Field::Credit,
        Field::Balance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Transaction => "transaction",
            Self::Debit => "debit",
            Self::Credit => "credit",
            Self::Balance => "balance",
        }
    }

    fn slot(&self) -> usize {
        match self {
            Self::Date => 0,
            Self::Transaction => 1,
            Self::Debit => 2,
            Self::Credit => 3,
            Self::Balance => 4,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Assignment of each [Field] to a source column, `None` meaning unassigned.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping([Option<usize>; 5]);

impl ColumnMapping {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        self.0[field.slot()]
    }

    /// The column index as the preview renders it, with -1 for unassigned.
    pub fn index_or_sentinel(&self, field: Field) -> i64 {
        self.get(field).map_or(-1, |idx| idx as i64)
    }

    /// Sets a field without touching the others. Used by header detection,
    /// where a later header overwrites an earlier one for the same field.
    pub(crate) fn set(&mut self, field: Field, column: usize) {
        self.0[field.slot()] = Some(column);
    }

    /// Manual assignment: any other field pointing at `column` is cleared,
    /// so no two fields ever share an index after this call.
    pub fn assign(&mut self, field: Field, column: Option<usize>) {
        if let Some(idx) = column {
            for other in Field::ALL {
                if other != field && self.get(other) == Some(idx) {
                    self.0[other.slot()] = None;
                }
            }
        }
        self.0[field.slot()] = column;
    }

    pub fn unassigned(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    pub fn resolve(&self) -> Result<ResolvedMapping> {
        match self.0 {
            [Some(date), Some(transaction), Some(debit), Some(credit), Some(balance)] => {
                Ok(ResolvedMapping {
                    date,
                    transaction,
                    debit,
                    credit,
                    balance,
                })
            }
            _ => Err(ConvertError::UnmappedColumns(self.unassigned())),
        }
    }
}

/// A mapping with every field assigned. Only obtainable through
/// [ColumnMapping::resolve], so the row parser never sees a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMapping {
    pub date: usize,
    pub transaction: usize,
    pub debit: usize,
    pub credit: usize,
    pub balance: usize,
}

#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Debug)]
pub struct MonetaryAmount(Decimal);

impl MonetaryAmount {
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Shortest plain rendering: `-4.5`, `1200`, never `-0`.
    pub fn to_plain_string(&self) -> String {
        let normalized = self.0.normalize();
        if normalized.is_zero() {
            "0".to_string()
        } else {
            normalized.to_string()
        }
    }
}

impl Neg for MonetaryAmount {
    type Output = MonetaryAmount;

    fn neg(self) -> Self::Output {
        MonetaryAmount(-self.0)
    }
}

impl FromStr for MonetaryAmount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map(MonetaryAmount)
    }
}

impl fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_plain_string())
    }
}

/// One source row projected through a mapping. Date and description are kept
/// exactly as they appeared in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct BankTransaction {
    pub date: String,
    pub transaction: String,
    /// Absent when the cell was empty or not numeric, which is distinct from
    /// a debit of zero.
    pub debit: Option<MonetaryAmount>,
    pub credit: Option<MonetaryAmount>,
    pub balance: MonetaryAmount,
    pub raw_data: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedTransaction {
    pub date: String,
    pub merchant: String,
    pub category: String,
    pub account: String,
    pub original_statement: String,
    pub notes: String,
    pub amount: MonetaryAmount,
    pub tags: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceHistory {
    pub date: String,
    pub account: String,
    pub balance: MonetaryAmount,
}

#[derive(Debug, Default)]
pub struct MonarchExport {
    pub transactions: Vec<ProcessedTransaction>,
    pub balance_history: Vec<BalanceHistory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Transactions,
    Balance,
}

impl ExportKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Transactions => "monarch_transactions.csv",
            Self::Balance => "monarch_balance_history.csv",
        }
    }
}
