use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::{Kind, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Balance {
    pub(crate) net: Decimal,
    pub(crate) total_income: Decimal,
    pub(crate) total_expense: Decimal,
}

pub(crate) fn balance(transactions: &[Transaction]) -> Balance {
    let total_income = sum_kind(transactions, Kind::Income);
    let total_expense = sum_kind(transactions, Kind::Expense);
    Balance {
        net: total_income - total_expense,
        total_income,
        total_expense,
    }
}

fn sum_kind(transactions: &[Transaction], kind: Kind) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
}

/// Sum amounts of one kind per date. Dates with no matching transaction have no entry.
pub(crate) fn by_date(transactions: &[Transaction], kind: Kind) -> BTreeMap<NaiveDate, Decimal> {
    let mut out = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.kind == kind) {
        let sum = out.entry(t.date).or_insert(Decimal::ZERO);
        *sum = sum.saturating_add(t.amount);
    }
    out
}

/// Inclusive calendar date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DateRange {
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
}

impl DateRange {
    pub(crate) fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Parse `YYYY-MM-DD..YYYY-MM-DD`.
    pub(crate) fn parse(s: &str) -> anyhow::Result<Self> {
        let (start, end) = s
            .split_once("..")
            .ok_or_else(|| anyhow::anyhow!("Expected START..END, got '{s}'"))?;
        Ok(Self {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default(),
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

pub(crate) fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), crate::store::DATE_FORMAT)
        .map_err(|_| anyhow::anyhow!("Invalid date '{}' (expected YYYY-MM-DD)", s.trim()))
}

/// Transactions inside `range`, in file order.
pub(crate) fn in_range(transactions: &[Transaction], range: DateRange) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| range.contains(t.date))
        .cloned()
        .collect()
}

/// Chart data for a filtered set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Analysis {
    pub(crate) income: BTreeMap<NaiveDate, Decimal>,
    pub(crate) expense: BTreeMap<NaiveDate, Decimal>,
}

impl Analysis {
    pub(crate) fn compute(transactions: &[Transaction]) -> Self {
        Self {
            income: by_date(transactions, Kind::Income),
            expense: by_date(transactions, Kind::Expense),
        }
    }

    /// Nothing to plot: no dates at all, or every amount in the window is zero.
    pub(crate) fn is_empty(&self) -> bool {
        self.total_income().is_zero() && self.total_expense().is_zero()
    }

    pub(crate) fn total_income(&self) -> Decimal {
        total(&self.income)
    }

    pub(crate) fn total_expense(&self) -> Decimal {
        total(&self.expense)
    }

    /// Every date present in either series with its (income, expense) sums.
    pub(crate) fn grouped(&self) -> Vec<(NaiveDate, Decimal, Decimal)> {
        let mut dates: Vec<NaiveDate> = self
            .income
            .keys()
            .chain(self.expense.keys())
            .copied()
            .collect();
        dates.sort();
        dates.dedup();
        dates
            .into_iter()
            .map(|d| {
                (
                    d,
                    self.income.get(&d).copied().unwrap_or(Decimal::ZERO),
                    self.expense.get(&d).copied().unwrap_or(Decimal::ZERO),
                )
            })
            .collect()
    }

    /// Income and expense shares of the combined total, in percent.
    /// `None` when there is nothing to divide.
    pub(crate) fn shares(&self) -> Option<(Decimal, Decimal)> {
        let income = self.total_income();
        let expense = self.total_expense();
        let combined = income.checked_add(expense)?;
        if combined.is_zero() {
            return None;
        }
        let hundred = Decimal::ONE_HUNDRED;
        Some((
            income.checked_mul(hundred)?.checked_div(combined)?,
            expense.checked_mul(hundred)?.checked_div(combined)?,
        ))
    }
}

fn total(series: &BTreeMap<NaiveDate, Decimal>) -> Decimal {
    series
        .values()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v))
}
