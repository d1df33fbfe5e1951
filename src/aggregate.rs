// 🧮 Category Aggregator - Monthly Consumption Model
// Turns looked-up unit prices into housing / food / transport totals

use crate::lookup::{price_or_zero, Category, ItemKey, LabelTable};
use crate::sheet::CostRecord;
use serde::{Deserialize, Serialize};

// ============================================================================
// CONSUMPTION PROFILE
// ============================================================================

/// Monthly quantities for a single resident
///
/// Housing and transport items count once; food is a grocery basket plus
/// four inexpensive restaurant meals. `RentOutsideCentre` is not part of the
/// profile: it is only used to price the "move out" lever.
pub const MONTHLY_PROFILE: &[(ItemKey, f64)] = &[
    (ItemKey::RentCityCentre, 1.0),
    (ItemKey::Utilities, 1.0),
    (ItemKey::Internet, 1.0),
    (ItemKey::TransportPass, 1.0),
    (ItemKey::Milk, 4.0),
    (ItemKey::Bread, 2.0),
    (ItemKey::Rice, 1.0),
    (ItemKey::Eggs, 1.0),
    (ItemKey::Cheese, 0.5),
    (ItemKey::Chicken, 2.0),
    (ItemKey::Beef, 0.5),
    (ItemKey::Apples, 1.0),
    (ItemKey::Bananas, 1.0),
    (ItemKey::Oranges, 1.0),
    (ItemKey::Tomatoes, 1.0),
    (ItemKey::Potatoes, 1.0),
    (ItemKey::Onions, 1.0),
    (ItemKey::DiningOut, 4.0),
];

// ============================================================================
// DERIVED COSTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryCosts {
    pub housing: f64,
    pub food: f64,
    pub transport: f64,
}

impl CategoryCosts {
    pub fn total(&self) -> f64 {
        self.housing + self.food + self.transport
    }

    fn add(&mut self, category: Category, amount: f64) {
        match category {
            Category::Housing => self.housing += amount,
            Category::Food => self.food += amount,
            Category::Transport => self.transport += amount,
        }
    }
}

/// One line of the itemized breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCost {
    pub key: ItemKey,
    pub label: String,
    pub category: Category,
    /// `None` when the sheet had no usable price for this item
    pub unit_price: Option<f64>,
    pub quantity: f64,
    pub monthly: f64,
}

/// CostBreakdown - Category totals plus the raw lookups the verdict needs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub categories: CategoryCosts,
    pub rent_city_centre: Option<f64>,
    pub rent_outside_centre: Option<f64>,
    /// Monthly dining-out spend (unit price × 4)
    pub dining_out: f64,
    pub items: Vec<ItemCost>,
}

impl CostBreakdown {
    /// Build a breakdown straight from category totals and levers
    ///
    /// Used when costs come from somewhere other than a cost sheet.
    pub fn from_parts(
        categories: CategoryCosts,
        rent_city_centre: Option<f64>,
        rent_outside_centre: Option<f64>,
        dining_out: f64,
    ) -> Self {
        CostBreakdown {
            categories,
            rent_city_centre,
            rent_outside_centre,
            dining_out,
            items: Vec::new(),
        }
    }

    pub fn total(&self) -> f64 {
        self.categories.total()
    }

    /// Monthly saving from renting outside the centre instead of in it
    ///
    /// Missing rents price at zero. Signed: negative when the outside rent
    /// is dearer.
    pub fn rent_savings(&self) -> f64 {
        price_or_zero(self.rent_city_centre) - price_or_zero(self.rent_outside_centre)
    }
}

/// Aggregate a cost sheet into monthly category costs
pub fn aggregate(records: &[CostRecord], table: &LabelTable) -> CostBreakdown {
    let mut categories = CategoryCosts::default();
    let mut items = Vec::with_capacity(MONTHLY_PROFILE.len());
    let mut dining_out = 0.0;

    for &(key, quantity) in MONTHLY_PROFILE {
        let unit_price = table.lookup(records, key);
        let monthly = price_or_zero(unit_price) * quantity;

        categories.add(key.category(), monthly);
        if key == ItemKey::DiningOut {
            dining_out = monthly;
        }

        items.push(ItemCost {
            key,
            label: key.name().to_string(),
            category: key.category(),
            unit_price,
            quantity,
            monthly,
        });
    }

    CostBreakdown {
        categories,
        rent_city_centre: table.lookup(records, ItemKey::RentCityCentre),
        rent_outside_centre: table.lookup(records, ItemKey::RentOutsideCentre),
        dining_out,
        items,
    }
}
