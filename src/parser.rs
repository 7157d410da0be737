//! Heuristic parsing of raw OCR text into structured receipt fields.
//!
//! Pure and total: any input string (including empty) yields a
//! `ParsedReceipt`, with empty strings / 0 / no items for fields that
//! could not be extracted. Extraction rules are independent regex passes
//! over the raw text; first match wins for scalar fields.
//!
//! Known imprecision, accepted by design: the item rule also captures
//! Total/Tax lines as pseudo-items, and the total rule matches the
//! "total" inside "Subtotal" when it appears first.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::ReceiptItem;

/// Currency codes recognized as whole, case-sensitive tokens.
pub const CURRENCY_CODES: &[&str] = &[
    "USD", "SGD", "EUR", "INR", "GBP", "MYR", "AUD", "CAD", "JPY", "CNY",
];

/// Date-shaped token: 1-4 digits, separator, 1-2 digits, separator, 1-4 digits.
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,4}[/\-.]\d{1,2}[/\-.]\d{1,4}").unwrap());

static CURRENCY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:USD|SGD|EUR|INR|GBP|MYR|AUD|CAD|JPY|CNY)\b").unwrap());

/// "Total", optional colon, optional whitespace/currency symbol, amount.
static TOTAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)total\s*:?[\s$]*(\d+(?:\.\d+)?)").unwrap());

/// "GST" or "Tax", optional colon, optional whitespace/currency symbol, amount.
static TAX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:gst|tax)\s*:?[\s$]*(\d+(?:\.\d+)?)").unwrap());

/// A priced line: a run of letters/digits/spaces, then an amount. Names
/// stay within one line so the vendor header cannot fuse with the first
/// priced line below it.
static ITEM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z0-9][A-Za-z0-9 \t]*)[ \t]+(\d+(?:\.\d+)?)").unwrap());

/// Structured fields extracted from one receipt's OCR text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReceipt {
    pub date: String,
    pub currency: String,
    pub vendor_name: String,
    pub items: Vec<ReceiptItem>,
    pub tax: f64,
    pub total: f64,
}

/// Parse raw OCR text into receipt fields.
pub fn parse_receipt_text(text: &str) -> ParsedReceipt {
    ParsedReceipt {
        date: extract_date(text),
        currency: extract_currency(text),
        vendor_name: extract_vendor(text),
        items: extract_items(text),
        tax: extract_tax(text),
        total: extract_total(text),
    }
}

fn extract_date(text: &str) -> String {
    DATE_PATTERN
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn extract_currency(text: &str) -> String {
    CURRENCY_PATTERN
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn extract_vendor(text: &str) -> String {
    text.lines().next().unwrap_or("").trim().to_string()
}

fn extract_total(text: &str) -> f64 {
    TOTAL_PATTERN
        .captures(text)
        .map(|c| parse_amount(&c[1]))
        .unwrap_or_default()
}

fn extract_tax(text: &str) -> f64 {
    TAX_PATTERN
        .captures(text)
        .map(|c| parse_amount(&c[1]))
        .unwrap_or_default()
}

fn extract_items(text: &str) -> Vec<ReceiptItem> {
    ITEM_PATTERN
        .captures_iter(text)
        .map(|c| ReceiptItem {
            item_name: c[1].trim().to_string(),
            item_cost: parse_amount(&c[2]),
        })
        .collect()
}

/// Captured amounts are digit/decimal-point runs, so parsing cannot fail;
/// the fallback keeps the function total anyway.
fn parse_amount(s: &str) -> f64 {
    s.parse().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STARBUCKS: &str =
        "STARBUCKS COFFEE\n12/25/2023\nCoffee Large 4.99\nMuffin 3.50\nTax 0.68\nTotal 9.17";

    #[test]
    fn empty_text_yields_all_defaults() {
        let parsed = parse_receipt_text("");
        assert_eq!(parsed, ParsedReceipt::default());
        assert_eq!(parsed.date, "");
        assert_eq!(parsed.currency, "");
        assert_eq!(parsed.vendor_name, "");
        assert!(parsed.items.is_empty());
        assert_eq!(parsed.tax, 0.0);
        assert_eq!(parsed.total, 0.0);
    }

    #[test]
    fn parses_a_typical_receipt() {
        let parsed = parse_receipt_text(STARBUCKS);
        assert_eq!(parsed.vendor_name, "STARBUCKS COFFEE");
        assert_eq!(parsed.date, "12/25/2023");
        assert_eq!(parsed.tax, 0.68);
        assert_eq!(parsed.total, 9.17);

        let coffee = parsed
            .items
            .iter()
            .position(|i| i.item_name == "Coffee Large" && i.item_cost == 4.99);
        let muffin = parsed
            .items
            .iter()
            .position(|i| i.item_name == "Muffin" && i.item_cost == 3.50);
        assert!(coffee.is_some());
        assert!(muffin.is_some());
        assert!(coffee.unwrap() < muffin.unwrap());
    }

    #[test]
    fn items_keep_document_order_and_include_tax_total_lines() {
        let parsed = parse_receipt_text(STARBUCKS);
        let names: Vec<&str> = parsed.items.iter().map(|i| i.item_name.as_str()).collect();
        assert_eq!(names, vec!["Coffee Large", "Muffin", "Tax", "Total"]);
    }

    #[test]
    fn date_accepts_all_separators() {
        assert_eq!(extract_date("paid 2023-12-25 thanks"), "2023-12-25");
        assert_eq!(extract_date("25.12.2023"), "25.12.2023");
        assert_eq!(extract_date("1/2/23"), "1/2/23");
        assert_eq!(extract_date("no date here"), "");
    }

    #[test]
    fn date_first_match_wins() {
        assert_eq!(extract_date("01/02/2023 and 02/03/2024"), "01/02/2023");
    }

    #[test]
    fn currency_matches_anywhere_as_whole_token() {
        assert_eq!(extract_currency("Milk USD 3.25"), "USD");
        assert_eq!(extract_currency("prefix\nmid SGD line\nend"), "SGD");
        assert_eq!(extract_currency(""), "");
    }

    #[test]
    fn currency_is_case_sensitive_and_token_bounded() {
        assert_eq!(extract_currency("usd 5.00"), "");
        assert_eq!(extract_currency("USDX 5.00"), "");
        assert_eq!(extract_currency("AUSD 5.00"), "");
    }

    #[test]
    fn vendor_is_first_line_trimmed() {
        assert_eq!(extract_vendor("  7-ELEVEN  \nrest"), "7-ELEVEN");
        assert_eq!(extract_vendor("\nsecond line"), "");
        assert_eq!(extract_vendor(""), "");
    }

    #[test]
    fn total_tolerates_colon_and_currency_symbol() {
        assert_eq!(extract_total("Total: $9.17"), 9.17);
        assert_eq!(extract_total("TOTAL 42"), 42.0);
        assert_eq!(extract_total("grand total   $ 10.00"), 10.0);
        assert_eq!(extract_total("nothing to see"), 0.0);
    }

    #[test]
    fn total_takes_first_match_even_inside_subtotal() {
        // "Subtotal" contains "total"; the rule is a plain first-match scan.
        assert_eq!(extract_total("Subtotal 8.49\nTotal 9.17"), 8.49);
    }

    #[test]
    fn tax_accepts_gst_and_tax_spellings() {
        assert_eq!(extract_tax("GST 1.50"), 1.50);
        assert_eq!(extract_tax("Tax: 0.68"), 0.68);
        assert_eq!(extract_tax("tax $2"), 2.0);
        assert_eq!(extract_tax("no levy"), 0.0);
    }

    #[test]
    fn items_do_not_span_lines() {
        let parsed = parse_receipt_text("ACME MART\nBread 2.50");
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].item_name, "Bread");
        assert_eq!(parsed.items[0].item_cost, 2.50);
    }

    #[test]
    fn item_names_may_contain_digits_and_spaces() {
        let items = extract_items("2 Egg Sandwich 5.25");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_name, "2 Egg Sandwich");
        assert_eq!(items[0].item_cost, 5.25);
    }

    #[test]
    fn integer_costs_parse_without_decimal_point() {
        let items = extract_items("Water 2");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_cost, 2.0);
    }
}
