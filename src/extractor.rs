// 🧾 Cost Extractor - Upstream HTML → CostRecord list
//
// Tolerant scanning: find the price tables, walk their rows, keep the first
// two cells. Whitespace, attribute order and markup inside cells don't matter.

use crate::sheet::CostRecord;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Class marking the upstream's price tables.
pub const PRICE_TABLE_CLASS: &str = "data_wide_table";

fn table_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<table\b([^>]*)>(.*?)</table>").unwrap())
}

fn row_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").unwrap())
}

fn cell_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td>").unwrap())
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").unwrap())
}

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap())
}

fn class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)class\s*=\s*["']([^"']*)["']"#).unwrap())
}

/// Extract (label, price) records from an upstream cost-of-living page
///
/// Rows without a label or without a price are skipped. Prices keep only
/// digits, `.` and `,`.
pub fn extract_costs(html: &str) -> Vec<CostRecord> {
    let mut records = Vec::new();

    for table in table_re().captures_iter(html) {
        if !is_price_table(&table[1]) {
            continue;
        }

        for row in row_re().captures_iter(&table[2]) {
            let mut cells = cell_re().captures_iter(&row[1]).map(|c| cell_text(&c[1]));

            let name = cells.next().unwrap_or_default();
            let price = cells.next().unwrap_or_default();

            if name.is_empty() || price.is_empty() {
                continue;
            }

            records.push(CostRecord::new(name, clean_price(&price)));
        }
    }

    records
}

fn is_price_table(attrs: &str) -> bool {
    class_re()
        .captures(attrs)
        .map(|c| c[1].split_whitespace().any(|class| class == PRICE_TABLE_CLASS))
        .unwrap_or(false)
}

/// Visible text of a cell: tags dropped, entities decoded, whitespace collapsed
fn cell_text(inner: &str) -> String {
    let without_tags = tag_re().replace_all(inner, "");
    let decoded = decode_entities(&without_tags);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop currency symbols and anything else that is not part of a number
pub fn clean_price(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect()
}

fn decode_entities(text: &str) -> String {
    entity_re()
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    "euro" => Some('€'),
                    "pound" => Some('£'),
                    _ => None,
                }
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
