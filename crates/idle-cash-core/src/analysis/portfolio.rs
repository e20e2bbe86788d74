//! Actual-versus-target ratio analysis of a holdings snapshot.
//!
//! Framework buckets are measured against the total of all seven amounts;
//! the four funds against the fund-portfolio subtotal. A category whose
//! actual ratio strays more than [`DEVIATION_BAND`] from its target is
//! flagged for reduction or increase.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::categories::{FrameworkCategory, FundCategory};
use crate::config::AllocationConfig;
use crate::types::{
    require_amount, round_money, to_percent, with_metadata, ComputationOutput, Money,
    Percent, Rate,
};
use crate::IdleCashResult;

/// Deviation (as a fraction, not percent) tolerated before suggesting action.
pub const DEVIATION_BAND: Decimal = dec!(0.05);

pub const EMPTY_PORTFOLIO_WARNING: &str = "total holdings are zero; nothing to analyze";

/// Current amounts held per category. Missing categories count as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    #[serde(default)]
    pub bond_fund: Money,
    #[serde(default)]
    pub dividend_fund: Money,
    #[serde(default)]
    pub us_index_fund: Money,
    #[serde(default)]
    pub gold_etf: Money,
    #[serde(default)]
    pub bank_fixed_income: Money,
    #[serde(default)]
    pub physical_gold: Money,
    #[serde(default)]
    pub reserve_fund: Money,
}

impl PortfolioSnapshot {
    pub fn fund_amount(&self, category: FundCategory) -> Money {
        match category {
            FundCategory::BondFund => self.bond_fund,
            FundCategory::DividendFund => self.dividend_fund,
            FundCategory::UsIndexFund => self.us_index_fund,
            FundCategory::GoldEtf => self.gold_etf,
        }
    }

    pub fn fund_portfolio_total(&self) -> Money {
        FundCategory::ALL.iter().map(|c| self.fund_amount(*c)).sum()
    }

    pub fn framework_amount(&self, category: FrameworkCategory) -> Money {
        match category {
            FrameworkCategory::FundPortfolio => self.fund_portfolio_total(),
            FrameworkCategory::BankFixedIncome => self.bank_fixed_income,
            FrameworkCategory::PhysicalGold => self.physical_gold,
            FrameworkCategory::ReserveFund => self.reserve_fund,
        }
    }

    pub fn total(&self) -> Money {
        FrameworkCategory::ALL
            .iter()
            .map(|c| self.framework_amount(*c))
            .sum()
    }

    /// Every amount must lie in `0..=MAX_AMOUNT`, which keeps [`Self::total`]
    /// and the per-category products inside `Decimal`'s range.
    pub fn validate(&self) -> IdleCashResult<()> {
        for c in FundCategory::ALL {
            require_amount(c.key(), self.fund_amount(c))?;
        }
        require_amount("bank_fixed_income", self.bank_fixed_income)?;
        require_amount("physical_gold", self.physical_gold)?;
        require_amount("reserve_fund", self.reserve_fund)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentStatus {
    Balanced,
    Reduce,
    Increase,
}

impl AdjustmentStatus {
    pub fn action(self) -> &'static str {
        match self {
            AdjustmentStatus::Balanced => "No adjustment needed",
            AdjustmentStatus::Reduce => "Reduce position",
            AdjustmentStatus::Increase => "Increase position",
        }
    }
}

/// One category's comparison. Ratio fields are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAnalysis {
    pub name: String,
    pub expected_ratio: Percent,
    pub actual_ratio: Percent,
    pub expected_amount: Money,
    pub actual_amount: Money,
    pub deviation: Percent,
    pub diff_amount: Money,
    pub status: AdjustmentStatus,
    pub action: String,
    pub adjust_amount: Money,
    pub need_adjustment: bool,
}

/// Per-category results, keyed by category so iteration and serialization
/// follow the category declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    pub total_amount: Money,
    pub framework_analysis: BTreeMap<FrameworkCategory, CategoryAnalysis>,
    pub fund_portfolio_analysis: BTreeMap<FundCategory, CategoryAnalysis>,
}

impl PortfolioAnalysis {
    pub fn is_empty(&self) -> bool {
        self.framework_analysis.is_empty() && self.fund_portfolio_analysis.is_empty()
    }
}

/// Compare one category amount against its share of `denominator`.
/// `denominator` must be non-zero.
pub fn analyze_category(
    name: &str,
    amount: Money,
    denominator: Money,
    expected_ratio: Rate,
) -> CategoryAnalysis {
    let actual_ratio = amount / denominator;
    let deviation = actual_ratio - expected_ratio;
    let expected_amount = denominator * expected_ratio;
    let diff_amount = amount - expected_amount;

    let (status, adjust_amount) = if deviation.abs() <= DEVIATION_BAND {
        (AdjustmentStatus::Balanced, Decimal::ZERO)
    } else if deviation > DEVIATION_BAND {
        (AdjustmentStatus::Reduce, round_money(diff_amount))
    } else {
        (AdjustmentStatus::Increase, round_money(diff_amount.abs()))
    };

    CategoryAnalysis {
        name: name.to_string(),
        expected_ratio: to_percent(expected_ratio),
        actual_ratio: to_percent(actual_ratio),
        expected_amount: round_money(expected_amount),
        actual_amount: round_money(amount),
        deviation: to_percent(deviation),
        diff_amount: round_money(diff_amount),
        status,
        action: status.action().to_string(),
        adjust_amount,
        need_adjustment: status != AdjustmentStatus::Balanced,
    }
}

/// Analyze a holdings snapshot against the configured targets.
///
/// A zero total returns empty analysis maps with a warning instead of an
/// error. The fund breakdown is omitted when the fund subtotal is zero.
pub fn analyze_portfolio(
    snapshot: &PortfolioSnapshot,
    config: &AllocationConfig,
) -> IdleCashResult<ComputationOutput<PortfolioAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    config.check()?;
    snapshot.validate()?;

    let total = snapshot.total();
    let mut framework_analysis = BTreeMap::new();
    let mut fund_portfolio_analysis = BTreeMap::new();

    if total.is_zero() {
        tracing::warn!("portfolio analysis requested for empty holdings");
        warnings.push(EMPTY_PORTFOLIO_WARNING.to_string());
    } else {
        for c in FrameworkCategory::ALL {
            framework_analysis.insert(
                c,
                analyze_category(
                    c.label(),
                    snapshot.framework_amount(c),
                    total,
                    config.framework.ratio(c),
                ),
            );
        }

        let fund_total = snapshot.fund_portfolio_total();
        if fund_total.is_zero() {
            tracing::debug!("fund subtotal is zero, skipping fund breakdown");
        } else {
            for c in FundCategory::ALL {
                fund_portfolio_analysis.insert(
                    c,
                    analyze_category(
                        c.label(),
                        snapshot.fund_amount(c),
                        fund_total,
                        config.fund_portfolio.ratio(c),
                    ),
                );
            }
        }
    }

    let output = PortfolioAnalysis {
        total_amount: round_money(total),
        framework_analysis,
        fund_portfolio_analysis,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Holdings ratio analysis: actual vs target per framework bucket and fund type, ±5% tolerance band",
        config,
        warnings,
        elapsed,
        output,
    ))
}
