use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Largest amount a single record may carry (one quadrillion). Keeps every
/// total and chart scale far inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// Exact match on the stored literal. Anything else is not a record type.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Income" => Some(Self::Income),
            "Expense" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn all() -> &'static [Kind] {
        &[Self::Income, Self::Expense]
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub kind: Kind,
    pub category: String,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
        kind: Kind,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            kind,
            category: category.into(),
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == Kind::Expense
    }
}
