// 🔎 Item Lookup - Labels as Data
// Case-insensitive substring matching from canonical items to upstream prices

use crate::sheet::CostRecord;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// PRICE PARSING
// ============================================================================

/// Parse a cost string into a price
///
/// Every character that is not a digit or `.` is dropped first, so
/// "$1,234.56" parses as 1234.56. The longest numeric prefix of what remains
/// is read ("1.234.5" → 1.234). Returns `None` when nothing numeric is left.
pub fn parse_cost(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;
    for (i, c) in cleaned.char_indices() {
        if c == '.' {
            if seen_dot {
                break;
            }
            seen_dot = true;
        } else {
            seen_digit = true;
        }
        end = i + 1;
    }

    if !seen_digit {
        return None;
    }

    cleaned[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

// ============================================================================
// LOOKUP
// ============================================================================

/// Find the first record whose label contains `fragment` (case-insensitive)
pub fn find_record<'a>(records: &'a [CostRecord], fragment: &str) -> Option<&'a CostRecord> {
    let needle = fragment.to_lowercase();
    records
        .iter()
        .find(|r| r.item.to_lowercase().contains(&needle))
}

/// Price of the first record matching `fragment`
///
/// `None` means "no data": either nothing matched, or the first match had
/// an unparseable cost. A verified zero price is `Some(0.0)`.
pub fn lookup(records: &[CostRecord], fragment: &str) -> Option<f64> {
    find_record(records, fragment).and_then(|r| parse_cost(&r.cost))
}

/// Collapse a lookup result to a price, treating missing data as free
pub fn price_or_zero(price: Option<f64>) -> f64 {
    price.unwrap_or(0.0)
}

/// `find(records, fragment)`: lookup with absence modelled as zero cost
pub fn find(records: &[CostRecord], fragment: &str) -> f64 {
    price_or_zero(lookup(records, fragment))
}

// ============================================================================
// LABEL TABLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Housing,
    Food,
    Transport,
}

/// ItemKey - Canonical items the budget model knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKey {
    RentCityCentre,
    RentOutsideCentre,
    Utilities,
    Internet,
    TransportPass,
    Milk,
    Bread,
    Rice,
    Eggs,
    Cheese,
    Chicken,
    Beef,
    Apples,
    Bananas,
    Oranges,
    Tomatoes,
    Potatoes,
    Onions,
    DiningOut,
}

impl ItemKey {
    pub fn category(&self) -> Category {
        match self {
            ItemKey::RentCityCentre
            | ItemKey::RentOutsideCentre
            | ItemKey::Utilities
            | ItemKey::Internet => Category::Housing,
            ItemKey::TransportPass => Category::Transport,
            _ => Category::Food,
        }
    }

    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            ItemKey::RentCityCentre => "Rent (1 bedroom, city centre)",
            ItemKey::RentOutsideCentre => "Rent (1 bedroom, outside centre)",
            ItemKey::Utilities => "Basic utilities",
            ItemKey::Internet => "Internet",
            ItemKey::TransportPass => "Monthly transport pass",
            ItemKey::Milk => "Milk (1 liter)",
            ItemKey::Bread => "Bread (500g)",
            ItemKey::Rice => "Rice (1kg)",
            ItemKey::Eggs => "Eggs (12)",
            ItemKey::Cheese => "Local cheese (1kg)",
            ItemKey::Chicken => "Chicken fillets (1kg)",
            ItemKey::Beef => "Beef round (1kg)",
            ItemKey::Apples => "Apples (1kg)",
            ItemKey::Bananas => "Bananas (1kg)",
            ItemKey::Oranges => "Oranges (1kg)",
            ItemKey::Tomatoes => "Tomatoes (1kg)",
            ItemKey::Potatoes => "Potatoes (1kg)",
            ItemKey::Onions => "Onions (1kg)",
            ItemKey::DiningOut => "Inexpensive restaurant meal",
        }
    }
}

/// LabelRule - Acceptable upstream label fragments for one item, in priority order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelRule {
    pub key: ItemKey,
    pub fragments: Vec<String>,
}

impl LabelRule {
    pub fn new(key: ItemKey, fragments: &[&str]) -> Self {
        LabelRule {
            key,
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// LabelTable - Maps canonical items to upstream label vocabulary
///
/// Upstream label drift is handled by editing the table (or loading a
/// different one from JSON), not by touching the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelTable {
    rules: Vec<LabelRule>,
}

impl LabelTable {
    pub fn from_rules(rules: Vec<LabelRule>) -> Self {
        LabelTable { rules }
    }

    /// Load a table from JSON (`{"rules": [{"key": "milk", "fragments": [..]}]}`)
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load a table from a JSON file on disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read label table: {:?}", path.as_ref()))?;

        Self::from_json(&content).context("Failed to parse label table JSON")
    }

    pub fn rule(&self, key: ItemKey) -> Option<&LabelRule> {
        self.rules.iter().find(|r| r.key == key)
    }

    /// Resolve an item against the records
    ///
    /// Fragments are tried in order; the first fragment that matches any
    /// record decides the result, even if that record's cost is unparseable.
    pub fn lookup(&self, records: &[CostRecord], key: ItemKey) -> Option<f64> {
        let rule = self.rule(key)?;
        rule.fragments
            .iter()
            .find_map(|fragment| find_record(records, fragment))
            .and_then(|record| parse_cost(&record.cost))
    }

    /// Resolve an item, treating missing data as zero cost
    pub fn price(&self, records: &[CostRecord], key: ItemKey) -> f64 {
        price_or_zero(self.lookup(records, key))
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        LabelTable::from_rules(vec![
            LabelRule::new(
                ItemKey::RentCityCentre,
                &[
                    "Apartment (1 bedroom) in City Centre",
                    "1 bedroom apartment in city centre",
                ],
            ),
            LabelRule::new(
                ItemKey::RentOutsideCentre,
                &[
                    "Apartment (1 bedroom) Outside of Centre",
                    "1 bedroom apartment outside of centre",
                ],
            ),
            LabelRule::new(
                ItemKey::Utilities,
                &[
                    "Basic (Electricity, Heating, Cooling, Water, Garbage)",
                    "Basic utilities",
                ],
            ),
            LabelRule::new(
                ItemKey::Internet,
                &[
                    "Internet (60 Mbps or More, Unlimited Data, Cable/ADSL)",
                    "Internet (60 Mbps",
                ],
            ),
            LabelRule::new(ItemKey::TransportPass, &["Monthly Pass"]),
            LabelRule::new(ItemKey::Milk, &["Milk (regular), (1 liter)"]),
            LabelRule::new(ItemKey::Bread, &["Loaf of Fresh White Bread (500g)"]),
            LabelRule::new(ItemKey::Rice, &["Rice (white), (1kg)"]),
            LabelRule::new(ItemKey::Eggs, &["Eggs (regular) (12)"]),
            LabelRule::new(ItemKey::Cheese, &["Local Cheese (1kg)"]),
            LabelRule::new(ItemKey::Chicken, &["Chicken Fillets (1kg)"]),
            LabelRule::new(ItemKey::Beef, &["Beef Round (1kg)"]),
            LabelRule::new(ItemKey::Apples, &["Apples"]),
            LabelRule::new(ItemKey::Bananas, &["Banana"]),
            LabelRule::new(ItemKey::Oranges, &["Oranges"]),
            LabelRule::new(ItemKey::Tomatoes, &["Tomato"]),
            LabelRule::new(ItemKey::Potatoes, &["Potato"]),
            LabelRule::new(ItemKey::Onions, &["Onion"]),
            LabelRule::new(
                ItemKey::DiningOut,
                &[
                    "Meal, Inexpensive Restaurant",
                    "Meal at an Inexpensive Restaurant",
                ],
            ),
        ])
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<CostRecord> {
        vec![
            CostRecord::new("Meal, Inexpensive Restaurant", "25.00"),
            CostRecord::new("Milk (regular), (1 liter)", "1.20"),
            CostRecord::new("Milk (regular), (1 liter)", "9.99"),
            CostRecord::new("Apartment (1 bedroom) in City Centre", "2,450.00"),
            CostRecord::new("Broken Price Item", "n/a"),
            CostRecord::new("Free Item", "0.00"),
        ]
    }

    #[test]
    fn test_parse_cost_strips_currency() {
        assert_eq!(parse_cost("$1,234.56"), Some(1234.56));
        assert_eq!(parse_cost("1,234.56 €"), Some(1234.56));
        assert_eq!(parse_cost("12"), Some(12.0));
    }

    #[test]
    fn test_parse_cost_reads_numeric_prefix() {
        assert_eq!(parse_cost("1.234.5"), Some(1.234));
        assert_eq!(parse_cost("7."), Some(7.0));
        assert_eq!(parse_cost(".5"), Some(0.5));
    }

    #[test]
    fn test_parse_cost_invalid() {
        assert_eq!(parse_cost(""), None);
        assert_eq!(parse_cost("n/a"), None);
        assert_eq!(parse_cost("."), None);
    }

    #[test]
    fn test_parse_cost_drops_minus_sign() {
        assert_eq!(parse_cost("-45.99"), Some(45.99));
    }

    #[test]
    fn test_find_case_insensitive_substring() {
        let records = records();
        assert_eq!(find(&records, "inexpensive restaurant"), 25.0);
        assert_eq!(find(&records, "CITY CENTRE"), 2450.0);
    }

    #[test]
    fn test_find_first_match_wins() {
        let records = records();
        assert_eq!(find(&records, "Milk"), 1.2);
    }

    #[test]
    fn test_find_missing_is_zero() {
        let records = records();
        assert_eq!(find(&records, "Cappuccino"), 0.0);
        assert_eq!(find(&[], "Milk"), 0.0);
    }

    #[test]
    fn test_find_unparseable_is_zero() {
        let records = records();
        assert_eq!(find(&records, "Broken Price"), 0.0);
    }

    #[test]
    fn test_lookup_distinguishes_missing_from_zero() {
        let records = records();
        assert_eq!(lookup(&records, "Free Item"), Some(0.0));
        assert_eq!(lookup(&records, "Cappuccino"), None);
        assert_eq!(lookup(&records, "Broken Price"), None);
    }

    #[test]
    fn test_find_is_never_negative() {
        let records = vec![
            CostRecord::new("A", "-10"),
            CostRecord::new("B", "--"),
            CostRecord::new("C", "1e5"),
        ];
        for fragment in ["A", "B", "C", "Z"] {
            assert!(find(&records, fragment) >= 0.0);
        }
    }

    #[test]
    fn test_label_table_uses_fallback_fragment() {
        let table = LabelTable::default();
        let records = vec![CostRecord::new("Meal at an Inexpensive Restaurant", "18")];

        assert_eq!(table.lookup(&records, ItemKey::DiningOut), Some(18.0));
        assert_eq!(table.lookup(&records, ItemKey::Milk), None);
        assert_eq!(table.price(&records, ItemKey::Milk), 0.0);
    }

    #[test]
    fn test_label_table_fragment_priority() {
        let table = LabelTable::from_rules(vec![LabelRule::new(
            ItemKey::Internet,
            &["Fibre", "Internet"],
        )]);
        let records = vec![
            CostRecord::new("Internet (60 Mbps)", "50"),
            CostRecord::new("Fibre broadband", "70"),
        ];

        assert_eq!(table.lookup(&records, ItemKey::Internet), Some(70.0));
    }

    #[test]
    fn test_label_table_from_json() {
        let json = r#"{"rules": [{"key": "transport_pass", "fragments": ["Abonnement"]}]}"#;
        let table = LabelTable::from_json(json).unwrap();
        let records = vec![CostRecord::new("Abonnement mensuel", "75.20")];

        assert_eq!(table.rule_count(), 1);
        assert_eq!(table.price(&records, ItemKey::TransportPass), 75.2);
        assert_eq!(table.lookup(&records, ItemKey::Milk), None);
    }

    #[test]
    fn test_label_table_from_file() {
        let path = std::env::temp_dir().join(format!("costlens-labels-{}.json", std::process::id()));
        fs::write(&path, r#"{"rules": [{"key": "bananas", "fragments": ["Plátano"]}]}"#).unwrap();

        let table = LabelTable::from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let records = vec![CostRecord::new("Plátano (1kg)", "1.10")];
        assert_eq!(table.lookup(&records, ItemKey::Bananas), Some(1.1));
    }

    #[test]
    fn test_label_table_from_missing_file() {
        let err = LabelTable::from_file("/nonexistent/labels.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read label table"));
    }

    #[test]
    fn test_item_categories() {
        assert_eq!(ItemKey::Internet.category(), Category::Housing);
        assert_eq!(ItemKey::TransportPass.category(), Category::Transport);
        assert_eq!(ItemKey::DiningOut.category(), Category::Food);
    }
}
