// 🏷️ Scoring Rules - Rules as Data
// Seven independent, additive rules that turn a receipt into loyalty points

use crate::error::{ReceiptError, Result};
use crate::receipt::Receipt;
use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const ROUND_TOTAL_POINTS: i64 = 50;
const QUARTER_MULTIPLE_POINTS: i64 = 25;
const ITEM_PAIR_POINTS: i64 = 5;
const ODD_DAY_POINTS: i64 = 6;
const AFTERNOON_POINTS: i64 = 10;

/// Only this hour qualifies. 15:00-15:59 does not.
const AFTERNOON_HOUR: u32 = 14;

const QUARTER: Decimal = dec!(0.25);

/// price * 0.2 == price / 5
const DESCRIPTION_PRICE_DIVISOR: i128 = 5;

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringRule {
    /// One point per alphanumeric character in the retailer name
    RetailerName,

    /// 50 points if the total has no cents
    RoundTotal,

    /// 25 points if the total is a multiple of 0.25
    QuarterMultipleTotal,

    /// 5 points for every two items
    ItemPairs,

    /// ceil(price * 0.2) for each item whose trimmed description length is a multiple of 3
    DescriptionLength,

    /// 6 points if the purchase day is odd
    OddPurchaseDay,

    /// 10 points if purchased during the 14:00 hour
    AfternoonPurchase,
}

impl ScoringRule {
    pub const ALL: [ScoringRule; 7] = [
        ScoringRule::RetailerName,
        ScoringRule::RoundTotal,
        ScoringRule::QuarterMultipleTotal,
        ScoringRule::ItemPairs,
        ScoringRule::DescriptionLength,
        ScoringRule::OddPurchaseDay,
        ScoringRule::AfternoonPurchase,
    ];

    /// Stable rule id for logs and breakdowns
    pub fn id(&self) -> &'static str {
        match self {
            ScoringRule::RetailerName => "retailer_name",
            ScoringRule::RoundTotal => "round_total",
            ScoringRule::QuarterMultipleTotal => "quarter_multiple_total",
            ScoringRule::ItemPairs => "item_pairs",
            ScoringRule::DescriptionLength => "description_length",
            ScoringRule::OddPurchaseDay => "odd_purchase_day",
            ScoringRule::AfternoonPurchase => "afternoon_purchase",
        }
    }

    /// Points this rule awards for the receipt
    pub fn points(&self, receipt: &Receipt) -> Result<i64> {
        let points = match self {
            ScoringRule::RetailerName => receipt
                .retailer
                .chars()
                .filter(|c| c.is_alphanumeric())
                .count() as i64,

            ScoringRule::RoundTotal => {
                if receipt.total.fract().is_zero() {
                    ROUND_TOTAL_POINTS
                } else {
                    0
                }
            }

            ScoringRule::QuarterMultipleTotal => {
                if (receipt.total % QUARTER).is_zero() {
                    QUARTER_MULTIPLE_POINTS
                } else {
                    0
                }
            }

            ScoringRule::ItemPairs => (receipt.items.len() / 2) as i64 * ITEM_PAIR_POINTS,

            ScoringRule::DescriptionLength => {
                let mut sum: i64 = 0;
                for (idx, item) in receipt.items.iter().enumerate() {
                    if item.trimmed_description_len() % 3 != 0 {
                        continue;
                    }

                    let bonus = description_bonus(item.price).ok_or_else(|| {
                        ReceiptError::validation(
                            format!("items[{}].price", idx),
                            "price is too large to score",
                        )
                    })?;
                    sum = sum.checked_add(bonus).ok_or_else(total_overflow)?;
                }
                sum
            }

            ScoringRule::OddPurchaseDay => {
                if receipt.purchase_date.day() % 2 == 1 {
                    ODD_DAY_POINTS
                } else {
                    0
                }
            }

            ScoringRule::AfternoonPurchase => {
                if receipt.purchase_time.hour() == AFTERNOON_HOUR {
                    AFTERNOON_POINTS
                } else {
                    0
                }
            }
        };

        Ok(points)
    }
}

/// ceil(price * 0.2), computed on the scaled integer so no digit is rounded away
fn description_bonus(price: Decimal) -> Option<i64> {
    let divisor = 10i128
        .checked_pow(price.scale())?
        .checked_mul(DESCRIPTION_PRICE_DIVISOR)?;
    i64::try_from(div_ceil(price.mantissa(), divisor)).ok()
}

/// Ceiling division for a positive divisor
fn div_ceil(numerator: i128, divisor: i128) -> i128 {
    let quotient = numerator / divisor;
    if numerator % divisor > 0 {
        quotient + 1
    } else {
        quotient
    }
}

fn total_overflow() -> ReceiptError {
    ReceiptError::validation("total", "score does not fit in a 64-bit integer")
}

// ============================================================================
// SCORE BREAKDOWN
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleContribution {
    pub rule_id: &'static str,
    pub points: i64,
}

/// Per-rule contributions, in engine order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub contributions: Vec<RuleContribution>,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i64 {
        self.contributions.iter().map(|c| c.points).sum()
    }

    pub fn points_for(&self, rule: ScoringRule) -> Option<i64> {
        self.contributions
            .iter()
            .find(|c| c.rule_id == rule.id())
            .map(|c| c.points)
    }
}

// ============================================================================
// RULE ENGINE
// ============================================================================

#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<ScoringRule>,
}

impl RuleEngine {
    /// Engine with all seven rules
    pub fn standard() -> Self {
        RuleEngine {
            rules: ScoringRule::ALL.to_vec(),
        }
    }

    /// Create engine from a list of rules
    pub fn from_rules(rules: Vec<ScoringRule>) -> Self {
        RuleEngine { rules }
    }

    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }

    /// Get number of rules loaded
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Evaluate every rule against the receipt
    pub fn breakdown(&self, receipt: &Receipt) -> Result<ScoreBreakdown> {
        let mut contributions = Vec::with_capacity(self.rules.len());
        let mut running: i64 = 0;

        for rule in &self.rules {
            let points = rule.points(receipt)?;
            running = running.checked_add(points).ok_or_else(total_overflow)?;
            contributions.push(RuleContribution {
                rule_id: rule.id(),
                points,
            });
        }

        tracing::debug!(retailer = %receipt.retailer, total = running, ?contributions, "receipt scored");
        Ok(ScoreBreakdown { contributions })
    }

    /// Total points for the receipt
    pub fn score(&self, receipt: &Receipt) -> Result<i64> {
        Ok(self.breakdown(receipt)?.total())
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// TESTS
// ============================================================================
