use anyhow::Result;
use chrono::{Local, NaiveDate};

use crate::aggregate::{self, Analysis, Balance, DateRange};
use crate::models::{Kind, Transaction};
use crate::store::{Loaded, Store, DATE_FORMAT};
use crate::ui::form::EntryForm;
use crate::ui::util::format_amount;

pub(crate) const FAREWELL: &str = "Thank you for using the Income and Expense Tracker!";
pub(crate) const NO_RECORDS: &str = "No records found.";
pub(crate) const NO_RECORDS_FOR_ANALYSIS: &str = "No records found for analysis.";
pub(crate) const NO_RECORDS_IN_RANGE: &str = "No records found for the selected date range.";
pub(crate) const NO_SERIES: &str = "No income or expense data available for plotting.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    AddIncome,
    AddExpense,
    ViewReport,
    Analyze,
    Exit,
}

impl Mode {
    pub(crate) fn all() -> &'static [Mode] {
        &[
            Self::AddIncome,
            Self::AddExpense,
            Self::ViewReport,
            Self::Analyze,
            Self::Exit,
        ]
    }

    /// Record type written by the entry modes.
    pub(crate) fn kind(&self) -> Option<Kind> {
        match self {
            Self::AddIncome => Some(Kind::Income),
            Self::AddExpense => Some(Kind::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddIncome => write!(f, "Add Income"),
            Self::AddExpense => write!(f, "Add Expense"),
            Self::ViewReport => write!(f, "View Report"),
            Self::Analyze => write!(f, "Analyze"),
            Self::Exit => write!(f, "Exit"),
        }
    }
}

/// Which pane receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Menu,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notice {
    pub(crate) severity: Severity,
    pub(crate) text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ReportView {
    Empty,
    Records {
        balance: Balance,
        transactions: Vec<Transaction>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AnalyzeView {
    NoRecords,
    NoneInRange,
    NoSeries,
    Charts(Analysis),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RangeField {
    Start,
    End,
}

pub(crate) struct AnalyzeState {
    pub(crate) start: String,
    pub(crate) end: String,
    pub(crate) field: RangeField,
    pub(crate) range: DateRange,
    pub(crate) view: AnalyzeView,
}

impl AnalyzeState {
    fn new(range: DateRange) -> Self {
        Self {
            start: range.start.format(DATE_FORMAT).to_string(),
            end: range.end.format(DATE_FORMAT).to_string(),
            field: RangeField::Start,
            range,
            view: AnalyzeView::NoRecords,
        }
    }

    pub(crate) fn input_mut(&mut self) -> &mut String {
        match self.field {
            RangeField::Start => &mut self.start,
            RangeField::End => &mut self.end,
        }
    }

    pub(crate) fn toggle_field(&mut self) {
        self.field = match self.field {
            RangeField::Start => RangeField::End,
            RangeField::End => RangeField::Start,
        };
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) mode: Mode,
    pub(crate) focus: Focus,
    pub(crate) menu_index: usize,
    pub(crate) show_help: bool,
    pub(crate) notice: Option<Notice>,
    pub(crate) table_path: String,
    pub(crate) today: NaiveDate,

    // Add Income / Add Expense
    pub(crate) form: EntryForm,

    // View Report
    pub(crate) report: ReportView,
    pub(crate) report_index: usize,
    pub(crate) report_scroll: usize,

    // Analyze
    pub(crate) default_range: DateRange,
    pub(crate) analyze: AnalyzeState,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(table_path: String, default_range: DateRange) -> Self {
        let today = Local::now().date_naive();
        Self {
            running: true,
            mode: Mode::AddIncome,
            focus: Focus::Menu,
            menu_index: 0,
            show_help: false,
            notice: None,
            table_path,
            today,

            form: EntryForm::new(today),

            report: ReportView::Empty,
            report_index: 0,
            report_scroll: 0,

            default_range,
            analyze: AnalyzeState::new(default_range),

            visible_rows: 20,
        }
    }

    /// Enter `mode`, loading whatever its view needs. One mode is active at a time
    /// and nothing carries over between them.
    pub(crate) fn switch_mode(&mut self, mode: Mode, store: &Store) -> Result<()> {
        self.mode = mode;
        self.menu_index = Mode::all().iter().position(|m| *m == mode).unwrap_or(0);
        self.notice = None;
        tracing::info!(%mode, "switched mode");

        match mode {
            Mode::AddIncome | Mode::AddExpense => {
                self.form = EntryForm::new(self.today);
            }
            Mode::ViewReport => self.refresh_report(store)?,
            Mode::Analyze => {
                self.analyze = AnalyzeState::new(self.default_range);
                self.run_analysis(store)?;
            }
            Mode::Exit => self.set_info(FAREWELL),
        }
        Ok(())
    }

    /// Validate the form and append it. A rejected form writes nothing.
    pub(crate) fn submit_entry(&mut self, store: &Store) -> Result<()> {
        let Some(kind) = self.mode.kind() else {
            return Ok(());
        };
        match self.form.validate(kind) {
            Ok(txn) => {
                store.append(&txn)?;
                self.set_success(format!(
                    "{kind} of {} added successfully!",
                    format_amount(txn.amount)
                ));
                self.form = EntryForm::new(txn.date);
            }
            Err(e) => {
                tracing::debug!(%kind, error = %e, "entry rejected");
                self.set_error(e.to_string());
            }
        }
        Ok(())
    }

    pub(crate) fn refresh_report(&mut self, store: &Store) -> Result<()> {
        let transactions = self.load(store)?;
        self.report = if transactions.is_empty() {
            if self.notice.is_none() {
                self.set_info(NO_RECORDS);
            }
            ReportView::Empty
        } else {
            ReportView::Records {
                balance: aggregate::balance(&transactions),
                transactions,
            }
        };
        self.report_index = 0;
        self.report_scroll = 0;
        Ok(())
    }

    /// Parse the range inputs and rebuild the charts from a fresh read.
    pub(crate) fn run_analysis(&mut self, store: &Store) -> Result<()> {
        let start = aggregate::parse_date(&self.analyze.start);
        let end = aggregate::parse_date(&self.analyze.end);
        let (start, end) = match (start, end) {
            (Ok(s), Ok(e)) => (s, e),
            (Err(e), _) | (_, Err(e)) => {
                self.set_error(e.to_string());
                return Ok(());
            }
        };
        self.analyze.range = DateRange::new(start, end);

        let transactions = self.load(store)?;
        self.analyze.view = if transactions.is_empty() {
            if self.notice.is_none() {
                self.set_info(NO_RECORDS_FOR_ANALYSIS);
            }
            AnalyzeView::NoRecords
        } else {
            let filtered = aggregate::in_range(&transactions, self.analyze.range);
            if filtered.is_empty() {
                self.set_info(NO_RECORDS_IN_RANGE);
                AnalyzeView::NoneInRange
            } else {
                let analysis = Analysis::compute(&filtered);
                if analysis.is_empty() {
                    self.set_info(NO_SERIES);
                    AnalyzeView::NoSeries
                } else {
                    tracing::debug!(
                        range = %self.analyze.range,
                        records = filtered.len(),
                        "analysis computed"
                    );
                    self.notice = None;
                    AnalyzeView::Charts(analysis)
                }
            }
        };
        Ok(())
    }

    /// Read the table, surfacing a recovery as an error notice.
    fn load(&mut self, store: &Store) -> Result<Vec<Transaction>> {
        let Loaded {
            transactions,
            recovered,
        } = store.read_all()?;
        match recovered {
            Some(recovery) => self.set_error(recovery.message()),
            None => self.notice = None,
        }
        Ok(transactions)
    }

    pub(crate) fn report_len(&self) -> usize {
        match &self.report {
            ReportView::Records { transactions, .. } => transactions.len(),
            ReportView::Empty => 0,
        }
    }

    pub(crate) fn set_info(&mut self, msg: impl Into<String>) {
        self.notice = Some(Notice {
            severity: Severity::Info,
            text: msg.into(),
        });
    }

    pub(crate) fn set_success(&mut self, msg: impl Into<String>) {
        self.notice = Some(Notice {
            severity: Severity::Success,
            text: msg.into(),
        });
    }

    pub(crate) fn set_error(&mut self, msg: impl Into<String>) {
        self.notice = Some(Notice {
            severity: Severity::Error,
            text: msg.into(),
        });
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
