// ⚖️ Budget Verdict Engine
// Surplus/deficit plus prioritized savings suggestions for a salary
//
// Suggestions come from a fixed, ordered pipeline of rules. Every rule runs
// on every evaluation and yields zero or one suggestion, so the emitted order
// is the pipeline order.

use crate::aggregate::{CategoryCosts, CostBreakdown};
use crate::error::BudgetError;
use serde::{Deserialize, Serialize};

/// Housing above this share of income is flagged.
pub const HOUSING_RATIO_LIMIT: f64 = 30.0;

/// Food above this share of income is flagged.
pub const FOOD_RATIO_LIMIT: f64 = 30.0;

// ============================================================================
// INPUTS
// ============================================================================

/// Salary - Monthly income, validated to be finite and strictly positive
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Salary(f64);

impl Salary {
    pub fn new(amount: f64) -> Result<Self, BudgetError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(BudgetError::InvalidSalary(amount.to_string()));
        }
        Ok(Salary(amount))
    }

    /// Parse a salary from request text ("5000", "5,000.50", "$4200")
    pub fn parse(raw: &str) -> Result<Self, BudgetError> {
        let cleaned: String = raw
            .trim()
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();

        let amount = cleaned
            .parse::<f64>()
            .map_err(|_| BudgetError::InvalidSalary(raw.to_string()))?;

        Salary::new(amount).map_err(|_| BudgetError::InvalidSalary(raw.to_string()))
    }

    pub fn amount(&self) -> f64 {
        self.0
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Good,
    Neutral,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub severity: Severity,
}

impl Suggestion {
    pub fn good(text: String) -> Self {
        Suggestion { text, severity: Severity::Good }
    }

    pub fn neutral(text: String) -> Self {
        Suggestion { text, severity: Severity::Neutral }
    }

    pub fn bad(text: String) -> Self {
        Suggestion { text, severity: Severity::Bad }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub total: f64,
    pub diff: f64,
    pub summary: String,
    pub suggestions: Vec<Suggestion>,
    pub category_costs: CategoryCosts,
}

impl Verdict {
    pub fn is_deficit(&self) -> bool {
        self.diff < 0.0
    }
}

// ============================================================================
// RULE PIPELINE
// ============================================================================

/// Everything a rule may look at
struct RuleContext<'a> {
    salary: f64,
    costs: &'a CategoryCosts,
    diff: f64,
    rent_savings: f64,
    dining_out: f64,
}

impl RuleContext<'_> {
    fn in_surplus(&self) -> bool {
        self.diff >= 0.0
    }

    fn ratio(&self, amount: f64) -> f64 {
        amount * 100.0 / self.salary
    }
}

type Rule = fn(&RuleContext) -> Option<Suggestion>;

const RULES: &[Rule] = &[
    savings_ratio,
    housing_ratio,
    deficit_notice,
    move_out,
    cook_more,
    walk_or_bike,
    survival_mode,
    food_ratio,
];

/// Whole-number display, halves rounded away from zero
fn whole(amount: f64) -> String {
    format!("{:.0}", amount.round())
}

fn savings_ratio(ctx: &RuleContext) -> Option<Suggestion> {
    if !ctx.in_surplus() {
        return None;
    }
    Some(Suggestion::good(format!(
        "Potential Savings: {}%. You can build wealth here.",
        whole(ctx.ratio(ctx.diff))
    )))
}

fn housing_ratio(ctx: &RuleContext) -> Option<Suggestion> {
    if !ctx.in_surplus() {
        return None;
    }
    let ratio = ctx.ratio(ctx.costs.housing);
    if ratio > HOUSING_RATIO_LIMIT {
        Some(Suggestion::neutral(format!(
            "Housing is {}% of income (Ideal < 30%).",
            whole(ratio)
        )))
    } else {
        Some(Suggestion::good(format!(
            "Housing is safe at {}% of income.",
            whole(ratio)
        )))
    }
}

fn deficit_notice(ctx: &RuleContext) -> Option<Suggestion> {
    if ctx.in_surplus() {
        return None;
    }
    Some(Suggestion::bad(format!(
        "Current Deficit: -${}/mo. You cannot live comfortably with current choices.",
        whole(ctx.diff.abs())
    )))
}

fn move_out(ctx: &RuleContext) -> Option<Suggestion> {
    if ctx.in_surplus() || ctx.rent_savings <= 0.0 {
        return None;
    }
    let new_diff = ctx.diff + ctx.rent_savings;
    if new_diff > 0.0 {
        Some(Suggestion::good(format!(
            "MOVE OUT: Renting \"Outside City Centre\" saves ${}/mo. This alone fixes your budget! (Surplus: ${})",
            whole(ctx.rent_savings),
            whole(new_diff)
        )))
    } else {
        Some(Suggestion::neutral(format!(
            "MOVE OUT: Renting \"Outside City Centre\" saves ${}/mo. It helps, but you need more changes.",
            whole(ctx.rent_savings)
        )))
    }
}

fn cook_more(ctx: &RuleContext) -> Option<Suggestion> {
    if ctx.in_surplus() || ctx.dining_out <= 0.0 {
        return None;
    }
    if ctx.diff + ctx.dining_out > 0.0 {
        Some(Suggestion::good(format!(
            "COOK MORE: Cutting the 4 restaurant meals/mo saves ${}. You'd be profitable!",
            whole(ctx.dining_out)
        )))
    } else {
        Some(Suggestion::neutral(format!(
            "COOK MORE: Cooking every meal saves ${}.",
            whole(ctx.dining_out)
        )))
    }
}

fn walk_or_bike(ctx: &RuleContext) -> Option<Suggestion> {
    if ctx.in_surplus() || ctx.costs.transport <= 0.0 {
        return None;
    }
    Some(Suggestion::neutral(format!(
        "WALK/BIKE: Ditching the monthly pass saves ${}.",
        whole(ctx.costs.transport)
    )))
}

fn survival_mode(ctx: &RuleContext) -> Option<Suggestion> {
    if ctx.in_surplus() {
        return None;
    }
    let survival_diff = ctx.diff + ctx.rent_savings + ctx.dining_out + ctx.costs.transport;
    if survival_diff > 0.0 {
        Some(Suggestion::good(format!(
            "SURVIVAL MODE: If you Move Outside ({}) + Cook Only ({}) + Walk ({}), you can save ${}/mo.",
            whole(ctx.rent_savings),
            whole(ctx.dining_out),
            whole(ctx.costs.transport),
            whole(survival_diff)
        )))
    } else {
        Some(Suggestion::bad(format!(
            "CRITICAL: Even with cheapest housing and strict lifestyle, you are short by ${}. You need a higher salary or a cheaper city.",
            whole(survival_diff.abs())
        )))
    }
}

fn food_ratio(ctx: &RuleContext) -> Option<Suggestion> {
    let ratio = ctx.ratio(ctx.costs.food);
    if ratio > FOOD_RATIO_LIMIT {
        Some(Suggestion::neutral(format!(
            "Food is {}% of your income. High.",
            whole(ratio)
        )))
    } else {
        None
    }
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Evaluate a salary against a city's cost breakdown
///
/// Pure: the same inputs always produce the same verdict.
pub fn evaluate(salary: Salary, breakdown: &CostBreakdown) -> Verdict {
    let salary = salary.amount();
    let costs = breakdown.categories;
    let total = costs.total();
    let diff = salary - total;

    let ctx = RuleContext {
        salary,
        costs: &costs,
        diff,
        rent_savings: breakdown.rent_savings(),
        dining_out: breakdown.dining_out,
    };

    let suggestions = RULES.iter().filter_map(|rule| rule(&ctx)).collect();

    let summary = if diff < 0.0 {
        format!("Estimated monthly costs: ${}. You are in deficit.", whole(total))
    } else {
        format!("Estimated monthly costs: ${}. Sustainable.", whole(total))
    };

    Verdict {
        total,
        diff,
        summary,
        suggestions,
        category_costs: costs,
    }
}

// ============================================================================
// TESTS
// ============================================================================
