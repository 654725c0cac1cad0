use std::{path::PathBuf, process};

use bank_to_monarch_lib::{convert_file, ConvertOptions, ExportKind, Field};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportChoice {
    Transactions,
    Balance,
    Both,
}

impl ExportChoice {
    fn kinds(self) -> Vec<ExportKind> {
        match self {
            Self::Transactions => vec![ExportKind::Transactions],
            Self::Balance => vec![ExportKind::Balance],
            Self::Both => vec![ExportKind::Transactions, ExportKind::Balance],
        }
    }
}

#[derive(Parser)]
#[command(version, about = "Convert a bank CSV export into Monarch transaction and balance history files", long_about = None)]
struct Cli {
    /// Bank CSV file to convert
    csv_path: PathBuf,

    /// Account name written into every output row
    #[arg(short, long)]
    account: String,

    /// Treat the first row as column headers and detect the mapping from it
    #[arg(long)]
    has_header: bool,

    /// Column index holding the date
    #[arg(long)]
    date: Option<usize>,

    /// Column index holding the transaction description
    #[arg(long)]
    transaction: Option<usize>,

    /// Column index holding debits (money out)
    #[arg(long)]
    debit: Option<usize>,

    /// Column index holding credits (money in)
    #[arg(long)]
    credit: Option<usize>,

    /// Column index holding the running balance
    #[arg(long)]
    balance: Option<usize>,

    /// Directory the Monarch files are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Which file(s) to produce
    #[arg(long, value_enum, default_value_t = ExportChoice::Both)]
    export: ExportChoice,
}

impl Cli {
    fn options(&self) -> ConvertOptions {
        let assignments = [
            (Field::Date, self.date),
            (Field::Transaction, self.transaction),
            (Field::Debit, self.debit),
            (Field::Credit, self.credit),
            (Field::Balance, self.balance),
        ]
        .into_iter()
        .filter_map(|(field, column)| column.map(|c| (field, c)))
        .collect();

        ConvertOptions {
            account_name: self.account.clone(),
            has_header: self.has_header,
            assignments,
        }
    }
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                ),
        )
        .init();
}

fn main() {
    setup_logging();
    let cli = Cli::parse();

    match convert_file(
        &cli.csv_path,
        &cli.options(),
        &cli.output_dir,
        &cli.export.kinds(),
    ) {
        Ok(paths) => {
            for path in paths {
                println!("{}", path.display());
            }
            process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
