//! CSV product import.
//!
//! Sellers upload semicolon-separated CSVs, typically exported from
//! spreadsheet tools. Headers are matched case-insensitively after
//! stripping the Excel BOM, and prices tolerate currency symbols and
//! decimal commas ("R$ 19,90" parses as 19.90). Rows without a usable
//! name or price are skipped rather than failing the whole file.

use rust_decimal::Decimal;

use bazaar_core::Price;

use crate::models::NewProduct;

/// Parse product rows out of a semicolon-separated CSV file.
///
/// # Errors
///
/// Returns `csv::Error` if the file is not readable as CSV at all;
/// individual bad rows are skipped, not errors.
pub fn parse_products_csv(data: &[u8]) -> Result<Vec<NewProduct>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let header_names: Vec<String> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
        .collect();

    let column = |name: &str| header_names.iter().position(|h| h == name);
    let (Some(name_col), Some(price_col)) = (column("name"), column("price")) else {
        return Ok(Vec::new());
    };
    let description_col = column("description");
    let url_col = column("url");

    let mut products = Vec::new();
    for record in reader.records() {
        let record = record?;

        let Some(name) = record.get(name_col).map(str::trim).filter(|n| !n.is_empty()) else {
            continue;
        };
        let Some(price) = record.get(price_col).and_then(parse_price) else {
            continue;
        };

        let field = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .map(str::trim)
                .unwrap_or_default()
                .to_owned()
        };

        products.push(NewProduct {
            name: name.to_owned(),
            description: field(description_col),
            price,
            url: field(url_col),
        });
    }

    Ok(products)
}

/// Parse a price cell, tolerating currency symbols, whitespace, and a
/// decimal comma.
fn parse_price(raw: &str) -> Option<Price> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    let normalized = cleaned.replacen(',', ".", 1);

    let value = normalized.parse::<Decimal>().ok()?;
    if value.is_sign_negative() {
        return None;
    }

    Some(Price::new(value))
}
