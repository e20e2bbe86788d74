//! Allocation strategy parameters and the process-wide store that hands out
//! immutable snapshots of them.
//!
//! A configuration is only usable once both ratio groups sum to 1.0 within
//! [`RATIO_TOLERANCE`]. Updates never mutate a live configuration: they build
//! a new one, check it, and swap the shared reference.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

use crate::categories::{FrameworkCategory, FundCategory};
use crate::error::IdleCashError;
use crate::types::Rate;
use crate::IdleCashResult;

/// Allowed distance of a ratio group's sum from 1.0.
pub const RATIO_TOLERANCE: Decimal = dec!(0.0001);

// ---------------------------------------------------------------------------
// Ratio groups
// ---------------------------------------------------------------------------

/// Split of the investable amount across the four framework buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkRatios {
    pub fund_portfolio: Rate,
    pub bank_fixed_income: Rate,
    pub physical_gold: Rate,
    pub reserve_fund: Rate,
}

impl Default for FrameworkRatios {
    fn default() -> Self {
        Self {
            fund_portfolio: dec!(0.30),
            bank_fixed_income: dec!(0.60),
            physical_gold: dec!(0.05),
            reserve_fund: dec!(0.05),
        }
    }
}

impl FrameworkRatios {
    pub fn ratio(&self, category: FrameworkCategory) -> Rate {
        match category {
            FrameworkCategory::FundPortfolio => self.fund_portfolio,
            FrameworkCategory::BankFixedIncome => self.bank_fixed_income,
            FrameworkCategory::PhysicalGold => self.physical_gold,
            FrameworkCategory::ReserveFund => self.reserve_fund,
        }
    }

    pub fn sum(&self) -> Rate {
        FrameworkCategory::ALL.iter().map(|c| self.ratio(*c)).sum()
    }
}

/// Split of the fund-portfolio bucket across the four fund types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundRatios {
    pub bond_fund: Rate,
    pub dividend_fund: Rate,
    pub us_index_fund: Rate,
    pub gold_etf: Rate,
}

impl Default for FundRatios {
    fn default() -> Self {
        Self {
            bond_fund: dec!(0.40),
            dividend_fund: dec!(0.30),
            us_index_fund: dec!(0.15),
            gold_etf: dec!(0.15),
        }
    }
}

impl FundRatios {
    pub fn ratio(&self, category: FundCategory) -> Rate {
        match category {
            FundCategory::BondFund => self.bond_fund,
            FundCategory::DividendFund => self.dividend_fund,
            FundCategory::UsIndexFund => self.us_index_fund,
            FundCategory::GoldEtf => self.gold_etf,
        }
    }

    pub fn sum(&self) -> Rate {
        FundCategory::ALL.iter().map(|c| self.ratio(*c)).sum()
    }
}

fn within_tolerance(sum: Rate) -> bool {
    (sum - Decimal::ONE).abs() <= RATIO_TOLERANCE
}

// ---------------------------------------------------------------------------
// Trading rules
// ---------------------------------------------------------------------------

/// Drawdown threshold (a return rate, usually negative) and the fraction of
/// the held amount to buy when it is reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AddPositionRule {
    pub threshold: Rate,
    pub add_ratio: Rate,
}

/// Add-position rules kept in ascending threshold order, most severe
/// drawdown first. Evaluation walks this order and stops at the first match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<AddPositionRule>", into = "Vec<AddPositionRule>")]
pub struct AddPositionRules(Vec<AddPositionRule>);

impl AddPositionRules {
    pub fn new(mut rules: Vec<AddPositionRule>) -> Self {
        rules.sort_by(|a, b| a.threshold.cmp(&b.threshold));
        Self(rules)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AddPositionRule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most severe rule satisfied by `return_rate <= threshold`.
    pub fn first_match(&self, return_rate: Rate) -> Option<&AddPositionRule> {
        self.0.iter().find(|rule| return_rate <= rule.threshold)
    }
}

impl Default for AddPositionRules {
    fn default() -> Self {
        Self::new(vec![
            AddPositionRule {
                threshold: dec!(-0.05),
                add_ratio: dec!(0.10),
            },
            AddPositionRule {
                threshold: dec!(-0.10),
                add_ratio: dec!(0.15),
            },
            AddPositionRule {
                threshold: dec!(-0.15),
                add_ratio: dec!(0.20),
            },
        ])
    }
}

impl From<Vec<AddPositionRule>> for AddPositionRules {
    fn from(rules: Vec<AddPositionRule>) -> Self {
        Self::new(rules)
    }
}

impl From<AddPositionRules> for Vec<AddPositionRule> {
    fn from(rules: AddPositionRules) -> Self {
        rules.0
    }
}

/// Gain threshold and the fraction of the held amount to sell once reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeProfitRule {
    pub threshold: Rate,
    pub ratio: Rate,
}

impl Default for TakeProfitRule {
    fn default() -> Self {
        Self {
            threshold: dec!(0.30),
            ratio: dec!(0.20),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Complete strategy configuration read by every calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationConfig {
    pub framework: FrameworkRatios,
    pub fund_portfolio: FundRatios,
    #[serde(default)]
    pub add_position_rules: AddPositionRules,
    #[serde(default)]
    pub take_profit: TakeProfitRule,
}

impl AllocationConfig {
    /// True iff both ratio groups sum to 1.0 within tolerance.
    pub fn validate(&self) -> bool {
        within_tolerance(self.framework.sum()) && within_tolerance(self.fund_portfolio.sum())
    }

    /// Full check before a configuration is accepted: ratio groups plus
    /// trading-rule sanity, reported with the offending field.
    pub fn check(&self) -> IdleCashResult<()> {
        for c in FrameworkCategory::ALL {
            check_ratio(&format!("framework.{}", c.key()), self.framework.ratio(c))?;
        }
        for c in FundCategory::ALL {
            check_ratio(&format!("fund_portfolio.{}", c.key()), self.fund_portfolio.ratio(c))?;
        }

        let framework_sum = self.framework.sum();
        if !within_tolerance(framework_sum) {
            return Err(IdleCashError::RatioSum {
                group: "framework".into(),
                sum: framework_sum,
            });
        }
        let fund_sum = self.fund_portfolio.sum();
        if !within_tolerance(fund_sum) {
            return Err(IdleCashError::RatioSum {
                group: "fund_portfolio".into(),
                sum: fund_sum,
            });
        }

        let mut previous: Option<Rate> = None;
        for rule in self.add_position_rules.iter() {
            if rule.add_ratio <= Decimal::ZERO {
                return Err(IdleCashError::InvalidRule(format!(
                    "add ratio for threshold {} must be positive",
                    rule.threshold
                )));
            }
            if previous == Some(rule.threshold) {
                return Err(IdleCashError::InvalidRule(format!(
                    "duplicate add-position threshold {}",
                    rule.threshold
                )));
            }
            previous = Some(rule.threshold);
        }

        if self.take_profit.ratio <= Decimal::ZERO || self.take_profit.ratio > Decimal::ONE {
            return Err(IdleCashError::InvalidRule(format!(
                "take-profit ratio {} must be in (0, 1]",
                self.take_profit.ratio
            )));
        }
        Ok(())
    }

    /// A new configuration with only the fields present in `update`
    /// overwritten. The result is unchecked.
    pub fn with_update(&self, update: &ConfigUpdate) -> Self {
        let mut next = self.clone();
        if let Some(f) = &update.framework {
            set(&mut next.framework.fund_portfolio, f.fund_portfolio);
            set(&mut next.framework.bank_fixed_income, f.bank_fixed_income);
            set(&mut next.framework.physical_gold, f.physical_gold);
            set(&mut next.framework.reserve_fund, f.reserve_fund);
        }
        if let Some(p) = &update.fund_portfolio {
            set(&mut next.fund_portfolio.bond_fund, p.bond_fund);
            set(&mut next.fund_portfolio.dividend_fund, p.dividend_fund);
            set(&mut next.fund_portfolio.us_index_fund, p.us_index_fund);
            set(&mut next.fund_portfolio.gold_etf, p.gold_etf);
        }
        if let Some(rules) = &update.add_position_rules {
            next.add_position_rules = AddPositionRules::new(rules.clone());
        }
        if let Some(tp) = &update.take_profit {
            set(&mut next.take_profit.threshold, tp.threshold);
            set(&mut next.take_profit.ratio, tp.ratio);
        }
        next
    }
}

fn set(slot: &mut Rate, value: Option<Rate>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn check_ratio(field: &str, ratio: Rate) -> IdleCashResult<()> {
    if ratio < Decimal::ZERO {
        return Err(IdleCashError::InvalidInput {
            field: field.into(),
            reason: "ratio must not be negative".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameworkRatiosUpdate {
    #[serde(default)]
    pub fund_portfolio: Option<Rate>,
    #[serde(default)]
    pub bank_fixed_income: Option<Rate>,
    #[serde(default)]
    pub physical_gold: Option<Rate>,
    #[serde(default)]
    pub reserve_fund: Option<Rate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundRatiosUpdate {
    #[serde(default)]
    pub bond_fund: Option<Rate>,
    #[serde(default)]
    pub dividend_fund: Option<Rate>,
    #[serde(default)]
    pub us_index_fund: Option<Rate>,
    #[serde(default)]
    pub gold_etf: Option<Rate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TakeProfitUpdate {
    #[serde(default)]
    pub threshold: Option<Rate>,
    #[serde(default)]
    pub ratio: Option<Rate>,
}

/// Fields to overwrite on the current configuration. Absent fields keep
/// their current value; a present rule list replaces the whole list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub framework: Option<FrameworkRatiosUpdate>,
    #[serde(default)]
    pub fund_portfolio: Option<FundRatiosUpdate>,
    #[serde(default)]
    pub add_position_rules: Option<Vec<AddPositionRule>>,
    #[serde(default)]
    pub take_profit: Option<TakeProfitUpdate>,
}

// ---------------------------------------------------------------------------
// Shared store
// ---------------------------------------------------------------------------

/// Process-wide configuration. Readers take an `Arc` snapshot and never see
/// a partially applied update; writers swap the whole reference.
#[derive(Debug)]
pub struct ConfigStore {
    current: RwLock<Arc<AllocationConfig>>,
}

impl ConfigStore {
    /// Create a store from a configuration that passes [`AllocationConfig::check`].
    pub fn new(config: AllocationConfig) -> IdleCashResult<Self> {
        config.check()?;
        Ok(Self {
            current: RwLock::new(Arc::new(config)),
        })
    }

    pub fn snapshot(&self) -> Arc<AllocationConfig> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merge `update` into the current configuration and swap it in. A
    /// rejected update leaves the current snapshot untouched.
    pub fn update(&self, update: &ConfigUpdate) -> IdleCashResult<Arc<AllocationConfig>> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = guard.with_update(update);
        if let Err(e) = next.check() {
            tracing::warn!(error = %e, "rejected configuration update");
            return Err(e);
        }
        let next = Arc::new(next);
        *guard = next.clone();
        tracing::info!(
            framework_sum = %next.framework.sum(),
            fund_sum = %next.fund_portfolio.sum(),
            rules = next.add_position_rules.len(),
            "configuration updated"
        );
        Ok(next)
    }

    /// Replace the configuration wholesale after checking it.
    pub fn replace(&self, config: AllocationConfig) -> IdleCashResult<Arc<AllocationConfig>> {
        config.check()?;
        let next = Arc::new(config);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next.clone();
        tracing::info!("configuration replaced");
        Ok(next)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self {
            current: RwLock::new(Arc::new(AllocationConfig::default())),
        }
    }
}
