#![allow(clippy::unwrap_used)]

use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

const HEADER: &str = "Date,Description,Amount,Type,Category\n";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup(policy: RecoveryPolicy) -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(dir.path().join("financial_data.csv"), policy);
    (dir, store)
}

fn salary() -> Transaction {
    Transaction::new(date(2023, 3, 1), "Salary", dec!(1000), Kind::Income, "Job")
}

fn rent() -> Transaction {
    Transaction::new(date(2023, 3, 2), "Rent", dec!(400), Kind::Expense, "Housing")
}

// ── initialize ────────────────────────────────────────────────

#[test]
fn test_initialize_creates_header_only_table() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    assert!(store.initialize().unwrap());
    assert_eq!(fs::read_to_string(store.path()).unwrap(), HEADER);
}

#[test]
fn test_initialize_is_idempotent() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    store.initialize().unwrap();
    store.append(&salary()).unwrap();
    let before = fs::read_to_string(store.path()).unwrap();

    assert!(!store.initialize().unwrap());
    assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
}

#[test]
fn test_initialize_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(
        dir.path().join("nested").join("deeper").join("data.csv"),
        RecoveryPolicy::Reset,
    );
    store.initialize().unwrap();
    assert!(store.path().exists());
}

#[test]
fn test_header_line_matches_columns() {
    assert_eq!(format!("{}\n", COLUMNS.join(",")), HEADER);
}

// ── append / read_all ─────────────────────────────────────────

#[test]
fn test_append_writes_expected_rows() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    store.initialize().unwrap();
    store.append(&salary()).unwrap();
    store.append(&rent()).unwrap();

    let content = fs::read_to_string(store.path()).unwrap();
    assert_eq!(
        content,
        format!(
            "{HEADER}2023-03-01,Salary,1000.00,Income,Job\n2023-03-02,Rent,400.00,Expense,Housing\n"
        )
    );
}

#[test]
fn test_read_all_preserves_append_order() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    store.initialize().unwrap();

    let txns = vec![
        rent(),
        salary(),
        Transaction::new(date(2022, 12, 31), "Coffee", dec!(3.75), Kind::Expense, "Food"),
        salary(),
    ];
    for t in &txns {
        store.append(t).unwrap();
    }

    let loaded = store.read_all().unwrap();
    assert!(loaded.recovered.is_none());
    assert_eq!(loaded.transactions, txns);
}

#[test]
fn test_append_allows_duplicates() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    store.append(&salary()).unwrap();
    store.append(&salary()).unwrap();
    assert_eq!(store.read_all().unwrap().transactions.len(), 2);
}

#[test]
fn test_append_initializes_missing_table() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    store.append(&rent()).unwrap();
    let content = fs::read_to_string(store.path()).unwrap();
    assert!(content.starts_with(HEADER));
    assert_eq!(store.read_all().unwrap().transactions, vec![rent()]);
}

#[test]
fn test_fields_with_commas_and_quotes_survive() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    let txn = Transaction::new(
        date(2024, 5, 6),
        "Dinner, \"fancy\"",
        dec!(58.10),
        Kind::Expense,
        "Food, Drink",
    );
    store.append(&txn).unwrap();
    assert_eq!(store.read_all().unwrap().transactions, vec![txn]);
}

#[test]
fn test_amount_stored_with_two_decimals() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    store
        .append(&Transaction::new(date(2024, 1, 1), "Tip", dec!(2.5), Kind::Expense, "Food"))
        .unwrap();
    let content = fs::read_to_string(store.path()).unwrap();
    assert!(content.contains(",2.50,"));
    assert_eq!(store.read_all().unwrap().transactions[0].amount, dec!(2.50));
}

#[test]
fn test_read_all_empty_table() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    store.initialize().unwrap();
    let loaded = store.read_all().unwrap();
    assert!(loaded.transactions.is_empty());
    assert!(loaded.recovered.is_none());
}

#[test]
fn test_read_all_missing_file_initializes() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    let loaded = store.read_all().unwrap();
    assert!(loaded.transactions.is_empty());
    assert!(loaded.recovered.is_none());
    assert_eq!(fs::read_to_string(store.path()).unwrap(), HEADER);
}

#[test]
fn test_read_accepts_crlf_and_blank_lines() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    fs::write(
        store.path(),
        "Date,Description,Amount,Type,Category\r\n2023-03-01,Salary,1000,Income,Job\r\n\r\n",
    )
    .unwrap();
    let loaded = store.read_all().unwrap();
    assert!(loaded.recovered.is_none());
    assert_eq!(loaded.transactions, vec![salary()]);
}

#[test]
fn test_append_after_missing_final_newline() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    fs::write(store.path(), format!("{HEADER}2023-03-01,Salary,1000.00,Income,Job")).unwrap();

    store.append(&rent()).unwrap();

    let loaded = store.read_all().unwrap();
    assert!(loaded.recovered.is_none());
    assert_eq!(loaded.transactions, vec![salary(), rent()]);
    assert_eq!(
        fs::read_to_string(store.path()).unwrap(),
        format!("{HEADER}2023-03-01,Salary,1000.00,Income,Job\n2023-03-02,Rent,400.00,Expense,Housing\n")
    );
}

#[test]
fn test_append_to_header_without_newline() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    fs::write(store.path(), HEADER.trim_end()).unwrap();
    store.append(&salary()).unwrap();
    assert_eq!(store.read_all().unwrap().transactions, vec![salary()]);
}

// ── recovery ──────────────────────────────────────────────────

#[test]
fn test_unparsable_row_resets_table() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    fs::write(
        store.path(),
        format!("{HEADER}2023-03-01,Salary,1000,Income,Job\n2023-03-02,Rent,400\n"),
    )
    .unwrap();

    let loaded = store.read_all().unwrap();
    assert!(loaded.transactions.is_empty());
    let recovery = loaded.recovered.unwrap();
    assert!(recovery.quarantined.is_none());
    assert_eq!(
        recovery.cause,
        MalformedTable::Row {
            line: 3,
            reason: "expected 5 fields, found 3".into()
        }
    );
    assert_eq!(fs::read_to_string(store.path()).unwrap(), HEADER);

    // The reset sticks: a second read is clean and empty
    let again = store.read_all().unwrap();
    assert!(again.transactions.is_empty());
    assert!(again.recovered.is_none());
}

#[test]
fn test_amount_above_ceiling_is_malformed() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    fs::write(
        store.path(),
        format!("{HEADER}2023-03-01,Salary,50000000000000000000000000000,Income,Job\n"),
    )
    .unwrap();
    let cause = store.read_all().unwrap().recovered.unwrap().cause;
    assert_eq!(
        cause,
        MalformedTable::Row {
            line: 2,
            reason: "amount out of range '50000000000000000000000000000'".into()
        }
    );
}

#[test]
fn test_header_mismatch_is_malformed() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    fs::write(store.path(), "Date,Amount,Type\n2023-03-01,5,Income\n").unwrap();
    let loaded = store.read_all().unwrap();
    assert_eq!(
        loaded.recovered.unwrap().cause,
        MalformedTable::Header {
            found: "Date,Amount,Type".into()
        }
    );
}

#[test]
fn test_zero_byte_file_is_missing_header() {
    let (_dir, store) = setup(RecoveryPolicy::Reset);
    fs::write(store.path(), "").unwrap();
    let loaded = store.read_all().unwrap();
    assert_eq!(loaded.recovered.unwrap().cause, MalformedTable::MissingHeader);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), HEADER);
}

#[test]
fn test_bad_field_values_are_malformed() {
    let cases = [
        ("2023-13-01,X,1,Income,C", "invalid date"),
        ("03/01/2023,X,1,Income,C", "invalid date"),
        ("2023-03-01,X,abc,Income,C", "invalid amount"),
        ("2023-03-01,X,-5,Expense,C", "negative amount"),
        ("2023-03-01,X,5,Transfer,C", "invalid type"),
    ];
    for (row, expected) in cases {
        let (_dir, store) = setup(RecoveryPolicy::Reset);
        fs::write(store.path(), format!("{HEADER}{row}\n")).unwrap();
        let cause = store.read_all().unwrap().recovered.unwrap().cause;
        match cause {
            MalformedTable::Row { line, reason } => {
                assert_eq!(line, 2, "row {row}");
                assert!(reason.starts_with(expected), "row {row}: {reason}");
            }
            other => panic!("row {row}: unexpected {other:?}"),
        }
    }
}

#[test]
fn test_quarantine_preserves_unreadable_bytes() {
    let (dir, store) = setup(RecoveryPolicy::Quarantine);
    let corrupt = format!("{HEADER}2023-03-01,Salary,1000,Income,Job\nnot,a,valid\n");
    fs::write(store.path(), &corrupt).unwrap();

    let loaded = store.read_all().unwrap();
    assert!(loaded.transactions.is_empty());
    let quarantined = loaded.recovered.unwrap().quarantined.unwrap();

    assert_eq!(quarantined.parent().unwrap(), dir.path());
    let name = quarantined.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("financial_data.corrupt-"), "{name}");
    assert!(name.ends_with(".csv"), "{name}");
    assert_eq!(fs::read_to_string(&quarantined).unwrap(), corrupt);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), HEADER);
}

#[test]
fn test_quarantine_does_not_overwrite_previous_quarantine() {
    let (dir, store) = setup(RecoveryPolicy::Quarantine);
    fs::write(store.path(), "garbage\n").unwrap();
    let first = store.read_all().unwrap().recovered.unwrap().quarantined.unwrap();
    fs::write(store.path(), "more garbage\n").unwrap();
    let second = store.read_all().unwrap().recovered.unwrap().quarantined.unwrap();

    assert_ne!(first, second);
    assert_eq!(fs::read_to_string(first).unwrap(), "garbage\n");
    assert_eq!(fs::read_to_string(second).unwrap(), "more garbage\n");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
}

#[test]
fn test_recovery_message_mentions_cause() {
    let recovery = Recovery {
        cause: MalformedTable::MissingHeader,
        quarantined: None,
    };
    let msg = recovery.message();
    assert!(msg.starts_with("Error reading data"));
    assert!(msg.contains("no header row"));
    assert!(msg.contains("reset"));
}
