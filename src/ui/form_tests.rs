#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn form(date: &str, description: &str, amount: &str, category: &str) -> EntryForm {
    EntryForm {
        date: date.into(),
        description: description.into(),
        amount: amount.into(),
        category: category.into(),
        field: FormField::Date,
    }
}

// ── validate ──────────────────────────────────────────────────

#[test]
fn test_validate_complete_form() {
    let txn = form("2023-03-01", "Salary", "1000", "Job")
        .validate(Kind::Income)
        .unwrap();
    assert_eq!(txn.date, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
    assert_eq!(txn.description, "Salary");
    assert_eq!(txn.amount, dec!(1000));
    assert_eq!(txn.kind, Kind::Income);
    assert_eq!(txn.category, "Job");
}

#[test]
fn test_validate_trims_text() {
    let txn = form(" 2023-03-01 ", "  Rent ", " 400.5 ", " Housing")
        .validate(Kind::Expense)
        .unwrap();
    assert_eq!(txn.description, "Rent");
    assert_eq!(txn.category, "Housing");
    assert_eq!(txn.amount, dec!(400.50));
}

#[test]
fn test_validate_zero_amount_is_incomplete() {
    for amount in ["0", "0.00", "-0", "0.004", ""] {
        assert_eq!(
            form("2023-03-01", "Rent", amount, "Housing").validate(Kind::Expense),
            Err(EntryError::Incomplete),
            "amount {amount:?}"
        );
    }
}

#[test]
fn test_validate_rounds_to_cents() {
    let txn = form("2023-03-01", "Coffee", "3.456", "Food")
        .validate(Kind::Expense)
        .unwrap();
    assert_eq!(txn.amount, dec!(3.46));
}

#[test]
fn test_validate_rounds_half_cents_up() {
    let cases = [("0.005", dec!(0.01)), ("1.005", dec!(1.01)), ("2.675", dec!(2.68))];
    for (input, expected) in cases {
        let txn = form("2023-03-01", "Tip", input, "Food")
            .validate(Kind::Expense)
            .unwrap();
        assert_eq!(txn.amount, expected, "amount {input:?}");
    }
}

#[test]
fn test_validate_amount_ceiling() {
    let txn = form("2023-03-01", "Windfall", "1000000000000000", "Misc")
        .validate(Kind::Income)
        .unwrap();
    assert_eq!(txn.amount, MAX_AMOUNT);

    for amount in ["1000000000000000.01", "50000000000000000000000000000"] {
        assert_eq!(
            form("2023-03-01", "Windfall", amount, "Misc").validate(Kind::Income),
            Err(EntryError::AmountTooLarge(amount.into())),
            "amount {amount:?}"
        );
    }
}

#[test]
fn test_validate_missing_description_or_category() {
    assert_eq!(
        form("2023-03-01", "", "5", "Food").validate(Kind::Expense),
        Err(EntryError::Incomplete)
    );
    assert_eq!(
        form("2023-03-01", "Lunch", "5", "").validate(Kind::Expense),
        Err(EntryError::Incomplete)
    );
}

#[test]
fn test_validate_negative_amount() {
    assert_eq!(
        form("2023-03-01", "Refund", "-5", "Food").validate(Kind::Income),
        Err(EntryError::InvalidAmount("-5".into()))
    );
}

#[test]
fn test_validate_unparsable_amount() {
    assert_eq!(
        form("2023-03-01", "Lunch", "1.2.3", "Food").validate(Kind::Expense),
        Err(EntryError::InvalidAmount("1.2.3".into()))
    );
}

#[test]
fn test_validate_bad_date() {
    assert_eq!(
        form("2023-3-1x", "Lunch", "5", "Food").validate(Kind::Expense),
        Err(EntryError::InvalidDate("2023-3-1x".into()))
    );
    assert_eq!(
        form("", "Lunch", "5", "Food").validate(Kind::Expense),
        Err(EntryError::InvalidDate(String::new()))
    );
}

#[test]
fn test_incomplete_message() {
    assert_eq!(
        EntryError::Incomplete.to_string(),
        "Please provide description, amount, and category."
    );
}

// ── editing ───────────────────────────────────────────────────

#[test]
fn test_new_form_defaults_to_date() {
    let f = EntryForm::new(NaiveDate::from_ymd_opt(2024, 7, 4).unwrap());
    assert_eq!(f.date, "2024-07-04");
    assert_eq!(f.field, FormField::Date);
    assert!(f.description.is_empty());
}

#[test]
fn test_push_and_pop_follow_focus() {
    let mut f = form("", "", "", "");
    f.field = FormField::Description;
    for c in "Tea".chars() {
        f.push(c);
    }
    f.pop();
    assert_eq!(f.description, "Te");
    assert_eq!(f.value(FormField::Description), "Te");
}

#[test]
fn test_amount_field_filters_characters() {
    let mut f = form("", "", "", "");
    f.field = FormField::Amount;
    for c in "$1,2a3.50".chars() {
        f.push(c);
    }
    assert_eq!(f.amount, "123.50");
}

#[test]
fn test_date_field_filters_characters() {
    let mut f = form("", "", "", "");
    for c in "2024/01-0x2".chars() {
        f.push(c);
    }
    assert_eq!(f.date, "202401-02");
}

#[test]
fn test_clear_field() {
    let mut f = form("2024-01-01", "x", "1", "y");
    f.field = FormField::Amount;
    f.clear_field();
    assert!(f.amount.is_empty());
    assert_eq!(f.description, "x");
}

#[test]
fn test_field_cycle() {
    let mut field = FormField::Date;
    let mut seen = Vec::new();
    for _ in 0..FormField::all().len() {
        seen.push(field);
        field = field.next();
    }
    assert_eq!(seen, FormField::all());
    assert_eq!(field, FormField::Date);
    assert_eq!(FormField::Date.prev(), FormField::Category);
    assert_eq!(FormField::Category.prev().label(), "Amount");
}

#[test]
fn test_last_field() {
    let mut f = form("", "", "", "");
    assert!(!f.is_last_field());
    f.field = FormField::Category;
    assert!(f.is_last_field());
}
