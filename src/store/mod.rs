mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::models::{Kind, Transaction, MAX_AMOUNT};

pub(crate) use schema::{COLUMNS, DATE_FORMAT};

/// Ways the backing table can fail to parse. All of them trigger recovery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum MalformedTable {
    #[error("table has no header row")]
    MissingHeader,
    #[error("unexpected header '{found}'")]
    Header { found: String },
    #[error("line {line}: {reason}")]
    Row { line: u64, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum RecoveryPolicy {
    /// Overwrite the unreadable table with an empty one. Prior rows are lost.
    #[default]
    Reset,
    /// Move the unreadable table aside before starting a new empty one.
    Quarantine,
}

impl RecoveryPolicy {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Quarantine => "quarantine",
        }
    }
}

/// What happened when a malformed table was recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Recovery {
    pub(crate) cause: MalformedTable,
    pub(crate) quarantined: Option<PathBuf>,
}

impl Recovery {
    pub(crate) fn message(&self) -> String {
        match &self.quarantined {
            Some(path) => format!(
                "Error reading data ({}). The unreadable file was moved to {} and a new table was started.",
                self.cause,
                path.display()
            ),
            None => format!(
                "Error reading data ({}). The file may be corrupted; it has been reset to an empty table.",
                self.cause
            ),
        }
    }
}

/// Result of [`Store::read_all`]: the records in file order, plus a notice when
/// the table had to be recovered (in which case `transactions` is empty).
#[derive(Debug, Default)]
pub(crate) struct Loaded {
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) recovered: Option<Recovery>,
}

pub(crate) struct Store {
    path: PathBuf,
    recovery: RecoveryPolicy,
}

impl Store {
    pub(crate) fn new(path: impl Into<PathBuf>, recovery: RecoveryPolicy) -> Self {
        Self {
            path: path.into(),
            recovery,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Create the table with just its header if it does not exist yet.
    /// Returns `true` when a new file was written.
    pub(crate) fn initialize(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        self.write_header()?;
        tracing::info!(path = %self.path.display(), "created transaction table");
        Ok(true)
    }

    /// Append one row. Earlier rows are never rewritten.
    pub(crate) fn append(&self, txn: &Transaction) -> Result<()> {
        self.initialize()?;

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open table: {}", self.path.display()))?;
        terminate_last_line(&mut file)
            .with_context(|| format!("Failed to prepare table: {}", self.path.display()))?;
        let mut wtr = writer(file);
        wtr.write_record([
            txn.date.format(DATE_FORMAT).to_string(),
            txn.description.clone(),
            format!("{:.2}", txn.amount),
            txn.kind.as_str().to_string(),
            txn.category.clone(),
        ])
        .context("Failed to write transaction")?;
        wtr.flush().context("Failed to flush transaction table")?;

        tracing::info!(
            kind = %txn.kind,
            date = %txn.date,
            amount = %txn.amount,
            "appended transaction"
        );
        Ok(())
    }

    /// Read every record in file order. A malformed table is recovered
    /// according to the configured policy and reported through
    /// [`Loaded::recovered`]; only I/O failures are returned as errors.
    pub(crate) fn read_all(&self) -> Result<Loaded> {
        if !self.path.exists() {
            self.initialize()?;
            return Ok(Loaded::default());
        }

        let bytes = fs::read(&self.path)
            .with_context(|| format!("Failed to read table: {}", self.path.display()))?;

        match parse_table(&bytes) {
            Ok(transactions) => {
                tracing::debug!(count = transactions.len(), "loaded transactions");
                Ok(Loaded {
                    transactions,
                    recovered: None,
                })
            }
            Err(cause) => {
                tracing::warn!(path = %self.path.display(), %cause, "malformed transaction table");
                let recovery = self.recover(cause)?;
                Ok(Loaded {
                    transactions: Vec::new(),
                    recovered: Some(recovery),
                })
            }
        }
    }

    fn recover(&self, cause: MalformedTable) -> Result<Recovery> {
        let quarantined = match self.recovery {
            RecoveryPolicy::Reset => None,
            RecoveryPolicy::Quarantine => {
                let target = self.quarantine_path();
                fs::rename(&self.path, &target).with_context(|| {
                    format!(
                        "Failed to move {} to {}",
                        self.path.display(),
                        target.display()
                    )
                })?;
                Some(target)
            }
        };
        self.write_header()?;
        tracing::warn!(
            policy = self.recovery.as_str(),
            quarantined = ?quarantined,
            "transaction table reset to header only"
        );
        Ok(Recovery { cause, quarantined })
    }

    fn quarantine_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("table");
        let stamp = chrono::Local::now().format("%Y%m%dT%H%M%S").to_string();
        let dir = self.path.parent().unwrap_or_else(|| Path::new(""));

        let mut candidate = dir.join(format!("{stem}.corrupt-{stamp}.csv"));
        let mut n = 1;
        while candidate.exists() {
            candidate = dir.join(format!("{stem}.corrupt-{stamp}-{n}.csv"));
            n += 1;
        }
        candidate
    }

    fn write_header(&self) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create table: {}", self.path.display()))?;
        let mut wtr = writer(file);
        wtr.write_record(COLUMNS)
            .context("Failed to write table header")?;
        wtr.flush().context("Failed to flush table header")?;
        Ok(())
    }
}

fn writer(file: File) -> csv::Writer<File> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file)
}

fn parse_table(bytes: &[u8]) -> std::result::Result<Vec<Transaction>, MalformedTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut records = rdr.records();

    let header = match records.next() {
        Some(result) => result.map_err(csv_error)?,
        None => return Err(MalformedTable::MissingHeader),
    };
    if !header.iter().eq(COLUMNS.iter().copied()) {
        return Err(MalformedTable::Header {
            found: header.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut transactions = Vec::new();
    for result in records {
        let record = result.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let txn = parse_record(&record).map_err(|reason| MalformedTable::Row { line, reason })?;
        transactions.push(txn);
    }
    Ok(transactions)
}

fn parse_record(record: &csv::StringRecord) -> std::result::Result<Transaction, String> {
    if record.len() != COLUMNS.len() {
        return Err(format!(
            "expected {} fields, found {}",
            COLUMNS.len(),
            record.len()
        ));
    }

    let field = |i: usize| record.get(i).unwrap_or_default();

    let date = NaiveDate::parse_from_str(field(0).trim(), DATE_FORMAT)
        .map_err(|_| format!("invalid date '{}'", field(0)))?;
    let amount = Decimal::from_str(field(2).trim())
        .map_err(|_| format!("invalid amount '{}'", field(2)))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(format!("negative amount '{}'", field(2)));
    }
    if amount > MAX_AMOUNT {
        return Err(format!("amount out of range '{}'", field(2)));
    }
    let kind = Kind::parse(field(3)).ok_or_else(|| format!("invalid type '{}'", field(3)))?;

    Ok(Transaction {
        date,
        description: field(1).to_string(),
        amount,
        kind,
        category: field(4).to_string(),
    })
}

/// A table saved without a trailing newline would glue the next row onto its
/// last one, so add the missing line break before appending.
fn terminate_last_line(file: &mut File) -> std::io::Result<()> {
    if file.metadata()?.len() == 0 {
        return Ok(());
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    if last[0] != b'\n' {
        file.write_all(b"\n")?;
    }
    Ok(())
}

fn csv_error(err: csv::Error) -> MalformedTable {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    MalformedTable::Row {
        line,
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests;
