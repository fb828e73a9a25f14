#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::*;

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_thousands() {
    assert_eq!(format_amount(dec!(1234567.89)), "1,234,567.89");
    assert_eq!(format_amount(dec!(1000)), "1,000.00");
    assert_eq!(format_amount(dec!(999.5)), "999.50");
}

#[test]
fn test_format_amount_small() {
    assert_eq!(format_amount(Decimal::ZERO), "0.00");
    assert_eq!(format_amount(dec!(0.01)), "0.01");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-15.2)), "-15.20");
    assert_eq!(format_amount(dec!(-1234)), "-1,234.00");
}

#[test]
fn test_format_amount_negative_rounding_to_zero_has_no_sign() {
    assert_eq!(format_amount(dec!(-0.001)), "0.00");
}

// ── format_percent / cents ────────────────────────────────────

#[test]
fn test_format_percent() {
    assert_eq!(format_percent(dec!(75)), "75.0%");
    assert_eq!(format_percent(dec!(33.3333)), "33.3%");
    assert_eq!(format_percent(dec!(66.6666)), "66.7%");
}

#[test]
fn test_cents() {
    assert_eq!(cents(dec!(3.75)), 375);
    assert_eq!(cents(dec!(1000)), 100_000);
    assert_eq!(cents(dec!(0.004)), 0);
    assert_eq!(cents(Decimal::ZERO), 0);
}

#[test]
fn test_cents_saturates_on_huge_amounts() {
    assert_eq!(cents(dec!(1000000000000000000000000000)), u64::MAX);
    assert_eq!(cents(Decimal::MAX), u64::MAX);
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 5), "hell…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_unicode() {
    assert_eq!(truncate("日本語テスト", 4), "日本語…");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 3, 5);
    assert_eq!(index, 2);
    assert_eq!(scroll, 0);
}

#[test]
fn test_scroll_up_pulls_window() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!(index, 2);
    assert_eq!(scroll, 2);
}

#[test]
fn test_scroll_to_edges() {
    let (mut index, mut scroll) = (4, 2);
    scroll_to_bottom(&mut index, &mut scroll, 20, 5);
    assert_eq!((index, scroll), (19, 15));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_to_bottom_empty_list() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 0, 5);
    assert_eq!((index, scroll), (0, 0));
}
