// 📄 City Cost Sheet - Data Model
// Labeled price records for one city, as produced by the extractor

use serde::{Deserialize, Serialize};

// ============================================================================
// CORE TYPES
// ============================================================================

/// CostRecord - One (label, price) pair from the upstream page
///
/// `cost` keeps the upstream text minus currency symbols, e.g. "1,234.56".
/// Numeric parsing happens at lookup time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRecord {
    pub item: String,
    pub cost: String,
}

impl CostRecord {
    pub fn new(item: impl Into<String>, cost: impl Into<String>) -> Self {
        CostRecord {
            item: item.into(),
            cost: cost.into(),
        }
    }
}

/// CityCostSheet - All cost records for one city, in page order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCostSheet {
    pub city: String,
    pub costs: Vec<CostRecord>,
}

impl CityCostSheet {
    pub fn new(city: impl Into<String>, costs: Vec<CostRecord>) -> Self {
        CityCostSheet {
            city: city.into(),
            costs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

// ============================================================================
// CITY NAMES
// ============================================================================

/// Normalize a user-supplied city name into the upstream URL slug
///
/// Words are split on any non-alphanumeric character and on lower→upper
/// case transitions, the first letter of each word is upper-cased and the
/// words are joined with `-`:
/// - "new york" → "New-York"
/// - "rio_de_janeiro" → "Rio-De-Janeiro"
/// - "sanFrancisco" → "San-Francisco"
///
/// Apostrophes are dropped rather than split on: "Xi'an" → "Xian".
pub fn normalize_city_name(raw: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in raw.chars() {
        if matches!(ch, '\'' | '\u{2019}') {
            continue;
        }

        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }

        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }

        current.push(ch);
        prev_lower = ch.is_lowercase() || ch.is_numeric();
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| capitalize_first(w))
        .collect::<Vec<_>>()
        .join("-")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
