use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::models::{Kind, Transaction, MAX_AMOUNT};
use crate::store::DATE_FORMAT;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum EntryError {
    #[error("Please provide description, amount, and category.")]
    Incomplete,
    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("Amount must be a non-negative number, got '{0}'")]
    InvalidAmount(String),
    #[error("Amount must not exceed 1,000,000,000,000,000.00, got '{0}'")]
    AmountTooLarge(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Date,
    Description,
    Amount,
    Category,
}

impl FormField {
    pub(crate) fn all() -> &'static [FormField] {
        &[
            Self::Date,
            Self::Description,
            Self::Amount,
            Self::Category,
        ]
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Description => "Description",
            Self::Amount => "Amount",
            Self::Category => "Category",
        }
    }

    pub(crate) fn next(&self) -> Self {
        match self {
            Self::Date => Self::Description,
            Self::Description => Self::Amount,
            Self::Amount => Self::Category,
            Self::Category => Self::Date,
        }
    }

    pub(crate) fn prev(&self) -> Self {
        match self {
            Self::Date => Self::Category,
            Self::Description => Self::Date,
            Self::Amount => Self::Description,
            Self::Category => Self::Amount,
        }
    }
}

/// Text inputs behind the Add Income / Add Expense screens.
#[derive(Debug, Clone)]
pub(crate) struct EntryForm {
    pub(crate) date: String,
    pub(crate) description: String,
    pub(crate) amount: String,
    pub(crate) category: String,
    pub(crate) field: FormField,
}

impl EntryForm {
    pub(crate) fn new(today: NaiveDate) -> Self {
        Self {
            date: today.format(DATE_FORMAT).to_string(),
            description: String::new(),
            amount: String::new(),
            category: String::new(),
            field: FormField::Date,
        }
    }

    pub(crate) fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Date => &self.date,
            FormField::Description => &self.description,
            FormField::Amount => &self.amount,
            FormField::Category => &self.category,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Date => &mut self.date,
            FormField::Description => &mut self.description,
            FormField::Amount => &mut self.amount,
            FormField::Category => &mut self.category,
        }
    }

    pub(crate) fn push(&mut self, c: char) {
        let field = self.field;
        // Amount and date only ever hold numbers and separators
        let allowed = match field {
            FormField::Amount => c.is_ascii_digit() || c == '.' || c == '-',
            FormField::Date => c.is_ascii_digit() || c == '-',
            _ => true,
        };
        if allowed {
            self.value_mut(field).push(c);
        }
    }

    pub(crate) fn pop(&mut self) {
        let field = self.field;
        self.value_mut(field).pop();
    }

    pub(crate) fn clear_field(&mut self) {
        let field = self.field;
        self.value_mut(field).clear();
    }

    pub(crate) fn is_last_field(&self) -> bool {
        self.field == FormField::Category
    }

    /// Turn the inputs into a transaction of `kind`. Amounts are rounded to
    /// cents first, so anything below half a cent counts as zero and, like an
    /// empty amount, blocks the entry.
    pub(crate) fn validate(&self, kind: Kind) -> Result<Transaction, EntryError> {
        let date_text = self.date.trim();
        let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT)
            .map_err(|_| EntryError::InvalidDate(date_text.to_string()))?;

        let amount_text = self.amount.trim();
        let amount = if amount_text.is_empty() {
            Decimal::ZERO
        } else {
            let parsed = Decimal::from_str(amount_text)
                .map_err(|_| EntryError::InvalidAmount(amount_text.to_string()))?;
            if parsed.is_sign_negative() && !parsed.is_zero() {
                return Err(EntryError::InvalidAmount(amount_text.to_string()));
            }
            let rounded =
                parsed.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            if rounded > MAX_AMOUNT {
                return Err(EntryError::AmountTooLarge(amount_text.to_string()));
            }
            rounded
        };

        let description = self.description.trim();
        let category = self.category.trim();
        if description.is_empty() || amount.is_zero() || category.is_empty() {
            return Err(EntryError::Incomplete);
        }

        Ok(Transaction::new(date, description, amount, kind, category))
    }
}

#[cfg(test)]
#[path = "form_tests.rs"]
mod tests;
