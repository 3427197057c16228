//! Card details extraction from the published PDF document.
//!
//! The PDF carries one table repeated across pages with the columns
//! card_number, expiry_date, card_provider, date_payment_confirmed. Text is
//! pulled with `pdf-extract`; rows are recovered line by line. Provider names
//! contain spaces ("Diners Club / Carte Blanche", "JCB 16 digit"), so a row
//! is anchored on its first token (card number), second token (expiry) and
//! last token (payment date), with everything between folded into the
//! provider field.

use std::sync::OnceLock;

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame};
use regex::Regex;
use tracing::debug;

/// Column names of the extracted card table, in source order.
pub const CARD_COLUMNS: [&str; 4] = [
    "card_number",
    "expiry_date",
    "card_provider",
    "date_payment_confirmed",
];

fn expiry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{2}/\d{2}$").expect("valid expiry pattern"))
}

fn payment_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"))
}

/// Download the card details PDF and extract its table.
pub async fn fetch_document_table(client: &reqwest::Client, url: &str) -> Result<DataFrame> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("fetch document '{url}'"))?
        .error_for_status()
        .with_context(|| format!("fetch document '{url}'"))?;
    let bytes = response.bytes().await.context("read document body")?;
    let text = pdf_extract::extract_text_from_mem(&bytes)
        .with_context(|| format!("extract text from '{url}'"))?;
    let rows = parse_card_lines(&text);
    debug!(url, rows = rows.len(), "extracted card table from document");
    frame_from_card_rows(&rows)
}

/// Recover card rows from extracted PDF text.
///
/// A line is a data row when its first token is a card number (digits, or
/// the NULL sentinel, possibly prefixed with stray `?` marks from the
/// extraction), its second token is an MM/YY expiry, and its last token is a
/// YYYY-MM-DD payment date; sentinel-only rows (all four fields NULL) are
/// kept so the cleaner sees them.
pub fn parse_card_lines(text: &str) -> Vec<[String; 4]> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 4 {
            continue;
        }
        let card_number = tokens[0];
        let expiry = tokens[1];
        let payment_date = tokens[tokens.len() - 1];
        if !is_card_number(card_number) {
            continue;
        }
        if !(expiry_pattern().is_match(expiry) || expiry == "NULL") {
            continue;
        }
        if !(payment_date_pattern().is_match(payment_date) || payment_date == "NULL") {
            continue;
        }
        let provider = tokens[2..tokens.len() - 1].join(" ");
        rows.push([
            card_number.to_string(),
            expiry.to_string(),
            provider,
            payment_date.to_string(),
        ]);
    }
    rows
}

fn is_card_number(token: &str) -> bool {
    if token == "NULL" {
        return true;
    }
    let stripped = token.trim_start_matches('?');
    !stripped.is_empty() && stripped.chars().all(|ch| ch.is_ascii_digit())
}

fn frame_from_card_rows(rows: &[[String; 4]]) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(CARD_COLUMNS.len());
    for (idx, name) in CARD_COLUMNS.iter().enumerate() {
        let values: Vec<String> = rows.iter().map(|row| row[idx].clone()).collect();
        columns.push(Column::new((*name).into(), values));
    }
    DataFrame::new(columns).context("build card details frame")
}
