use anyhow::Result;
use chrono::Local;
use std::io::{self, Write};

use crate::aggregate::{self, Analysis, DateRange};
use crate::config::Config;
use crate::models::{Kind, Transaction};
use crate::store::{Loaded, Store, DATE_FORMAT};
use crate::ui::app::{NO_RECORDS, NO_RECORDS_FOR_ANALYSIS, NO_RECORDS_IN_RANGE, NO_SERIES};
use crate::ui::form::EntryForm;
use crate::ui::util::{format_amount, format_percent, truncate};

pub(crate) fn as_cli(args: &[String], store: &Store, config: &Config) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&args[1..], store, config, &mut out)
}

fn run(args: &[String], store: &Store, config: &Config, out: &mut impl Write) -> Result<()> {
    let Some(command) = args.first() else {
        print_usage(out)?;
        return Ok(());
    };
    tracing::info!(command = %command, "running command");
    match command.as_str() {
        "report" => cli_report(store, out),
        "analyze" => cli_analyze(&args[1..], store, config, out),
        "add" => cli_add(&args[1..], store, out),
        "path" => {
            writeln!(out, "{}", store.path().display())?;
            Ok(())
        }
        "--help" | "-h" | "help" => print_usage(out),
        "--version" | "-V" | "version" => {
            writeln!(out, "tally {}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
        other => {
            print_usage(out)?;
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage(out: &mut impl Write) -> Result<()> {
    let lines = [
        "Tally - income and expense tracker",
        "",
        "Usage: tally [command]",
        "",
        "Commands:",
        "  (none)                              Launch interactive TUI",
        "  report                              Print balance, totals and all records",
        "  analyze [START] [END]               Per-date sums and shares for a date range",
        "  add <income|expense> <DATE> <DESCRIPTION> <AMOUNT> <CATEGORY>",
        "                                      Append one record",
        "  path                                Print the data file location",
        "  --help, -h                          Show this help",
        "  --version, -V                       Show version",
        "",
        "Environment:",
        "  TALLY_DATA_FILE      Data file path",
        "  TALLY_RECOVERY       reset (default) or quarantine",
        "  TALLY_ANALYZE_RANGE  Default analyze window, YYYY-MM-DD..YYYY-MM-DD",
        "  TALLY_LOG            Log filter, e.g. debug",
    ];
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Read the table, printing a recovery notice the same way the UI shows one.
fn load(store: &Store, out: &mut impl Write) -> Result<Vec<Transaction>> {
    let Loaded {
        transactions,
        recovered,
    } = store.read_all()?;
    if let Some(recovery) = recovered {
        writeln!(out, "{}", recovery.message())?;
    }
    Ok(transactions)
}

fn cli_report(store: &Store, out: &mut impl Write) -> Result<()> {
    let transactions = load(store, out)?;
    if transactions.is_empty() {
        writeln!(out, "{NO_RECORDS}")?;
        return Ok(());
    }

    let totals = aggregate::balance(&transactions);
    writeln!(out, "Financial Report")?;
    writeln!(out, "{}", "─".repeat(40))?;
    writeln!(out, "  Balance:         {:>14}", format_amount(totals.net))?;
    writeln!(out, "  Total Income:    {:>14}", format_amount(totals.total_income))?;
    writeln!(out, "  Total Expenses:  {:>14}", format_amount(totals.total_expense))?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<10}  {:<30}  {:>14}  {:<7}  Category",
        "Date", "Description", "Amount", "Type"
    )?;
    writeln!(out, "{}", "─".repeat(80))?;
    for txn in &transactions {
        writeln!(
            out,
            "{:<10}  {:<30}  {:>14}  {:<7}  {}",
            txn.date.format(DATE_FORMAT),
            truncate(&txn.description, 30),
            format_amount(txn.amount),
            txn.kind.as_str(),
            txn.category,
        )?;
    }
    Ok(())
}

fn cli_analyze(
    args: &[String],
    store: &Store,
    config: &Config,
    out: &mut impl Write,
) -> Result<()> {
    let start = match args.first() {
        Some(s) => aggregate::parse_date(s)?,
        None => config.default_range.start,
    };
    let end = match args.get(1) {
        Some(s) => aggregate::parse_date(s)?,
        None => config.default_range.end,
    };
    let range = DateRange::new(start, end);

    let transactions = load(store, out)?;
    if transactions.is_empty() {
        writeln!(out, "{NO_RECORDS_FOR_ANALYSIS}")?;
        return Ok(());
    }
    let filtered = aggregate::in_range(&transactions, range);
    if filtered.is_empty() {
        writeln!(out, "{NO_RECORDS_IN_RANGE}")?;
        return Ok(());
    }
    let analysis = Analysis::compute(&filtered);
    if analysis.is_empty() {
        writeln!(out, "{NO_SERIES}")?;
        return Ok(());
    }

    writeln!(out, "Data Analysis {range}")?;
    writeln!(out, "{}", "─".repeat(44))?;
    writeln!(out, "{:<10}  {:>14}  {:>14}", "Date", "Income", "Expenses")?;
    for (date, income, expense) in analysis.grouped() {
        writeln!(
            out,
            "{:<10}  {:>14}  {:>14}",
            date.format(DATE_FORMAT),
            format_amount(income),
            format_amount(expense),
        )?;
    }
    if let Some((income_share, expense_share)) = analysis.shares() {
        writeln!(out)?;
        writeln!(
            out,
            "  Total Income:    {:>14}  {:>6}",
            format_amount(analysis.total_income()),
            format_percent(income_share)
        )?;
        writeln!(
            out,
            "  Total Expenses:  {:>14}  {:>6}",
            format_amount(analysis.total_expense()),
            format_percent(expense_share)
        )?;
    }
    Ok(())
}

fn cli_add(args: &[String], store: &Store, out: &mut impl Write) -> Result<()> {
    let [kind, date, description, amount, category] = args else {
        anyhow::bail!(
            "Usage: tally add <income|expense> <DATE> <DESCRIPTION> <AMOUNT> <CATEGORY>"
        );
    };
    let kind = Kind::all()
        .iter()
        .copied()
        .find(|k| k.as_str().eq_ignore_ascii_case(kind))
        .ok_or_else(|| {
            anyhow::anyhow!("Unknown record type '{kind}' (expected income or expense)")
        })?;

    let mut form = EntryForm::new(Local::now().date_naive());
    form.date = date.clone();
    form.description = description.clone();
    form.amount = amount.clone();
    form.category = category.clone();
    let txn = form.validate(kind)?;

    store.append(&txn)?;
    writeln!(
        out,
        "{kind} of {} added successfully!",
        format_amount(txn.amount)
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
