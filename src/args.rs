//! These structs provide the CLI interface for the armap CLI.

use crate::model::FifoMode;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// armap: A command-line tool for reconciling bank payments against accounts-receivable
/// invoices.
///
/// The program takes an AR invoice file and a bank statement file (CSV), asks for (or reads from
/// a plan file) the customer and payment type of each bank payment, and writes a mapping file
/// plus an untouched copy of the AR table to the output directory.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate that both input files have the required columns, without mapping anything.
    Check(CheckArgs),
    /// Map each bank payment to a customer and payment type, then write the output files.
    Map(MapArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the mapping output is written. Defaults to ~/ar-mapping
    #[arg(long, env = "ARMAP_OUT_DIR", default_value_t = default_out_dir())]
    out_dir: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, out_dir: PathBuf) -> Self {
        Self {
            log_level,
            out_dir: DisplayPath::new(out_dir),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn out_dir(&self) -> &DisplayPath {
        &self.out_dir
    }
}

/// Args for the `armap check` command.
#[derive(Debug, Parser, Clone)]
pub struct CheckArgs {
    /// The path to the AR invoice CSV file.
    #[arg(long)]
    ar: PathBuf,

    /// The path to the bank statement CSV file.
    #[arg(long)]
    bank: PathBuf,
}

impl CheckArgs {
    pub fn new(ar: impl Into<PathBuf>, bank: impl Into<PathBuf>) -> Self {
        Self {
            ar: ar.into(),
            bank: bank.into(),
        }
    }

    pub fn ar(&self) -> &Path {
        &self.ar
    }

    pub fn bank(&self) -> &Path {
        &self.bank
    }
}

/// Args for the `armap map` command.
#[derive(Debug, Parser, Clone)]
pub struct MapArgs {
    /// The path to the AR invoice CSV file.
    #[arg(long)]
    ar: PathBuf,

    /// The path to the bank statement CSV file.
    #[arg(long)]
    bank: PathBuf,

    /// A JSON assignment plan for a headless run. Without it, each payment is assigned
    /// interactively.
    #[arg(long)]
    plan: Option<PathBuf>,

    /// What a FIFO selection does: "tag" records the tag with no invoice reference, "apply"
    /// records the customer's oldest open invoice.
    #[arg(long, value_enum, default_value_t = FifoMode::Tag)]
    fifo: FifoMode,
}

impl MapArgs {
    pub fn new(
        ar: impl Into<PathBuf>,
        bank: impl Into<PathBuf>,
        plan: Option<PathBuf>,
        fifo: FifoMode,
    ) -> Self {
        Self {
            ar: ar.into(),
            bank: bank.into(),
            plan,
            fifo,
        }
    }

    pub fn ar(&self) -> &Path {
        &self.ar
    }

    pub fn bank(&self) -> &Path {
        &self.bank
    }

    pub fn plan(&self) -> Option<&PathBuf> {
        self.plan.as_ref()
    }

    pub fn fifo(&self) -> FifoMode {
        self.fifo
    }
}

fn default_out_dir() -> DisplayPath {
    DisplayPath::new(match dirs::home_dir() {
        Some(home) => home.join("ar-mapping"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --out-dir or ARMAP_OUT_DIR instead of relying on the default \
                output directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("ar-mapping")
        }
    })
}

/// A `PathBuf` wrapper that knows how to display itself, for use as a clap default value.
#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
