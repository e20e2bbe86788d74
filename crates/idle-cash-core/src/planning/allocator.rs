use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories::{FrameworkCategory, FundCategory};
use crate::config::AllocationConfig;
use crate::types::{round_money, Money};

/// Amounts per framework bucket, each rounded independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkAllocation {
    pub fund_portfolio: Money,
    pub bank_fixed_income: Money,
    pub physical_gold: Money,
    pub reserve_fund: Money,
}

impl FrameworkAllocation {
    pub fn amount(&self, category: FrameworkCategory) -> Money {
        match category {
            FrameworkCategory::FundPortfolio => self.fund_portfolio,
            FrameworkCategory::BankFixedIncome => self.bank_fixed_income,
            FrameworkCategory::PhysicalGold => self.physical_gold,
            FrameworkCategory::ReserveFund => self.reserve_fund,
        }
    }
}

/// Amounts per fund type inside the fund-portfolio bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundAllocation {
    pub bond_fund: Money,
    pub dividend_fund: Money,
    pub us_index_fund: Money,
    pub gold_etf: Money,
}

impl FundAllocation {
    pub fn amount(&self, category: FundCategory) -> Money {
        match category {
            FundCategory::BondFund => self.bond_fund,
            FundCategory::DividendFund => self.dividend_fund,
            FundCategory::UsIndexFund => self.us_index_fund,
            FundCategory::GoldEtf => self.gold_etf,
        }
    }
}

/// Living-expense gap = max(0, target - current).
pub fn compute_gap(target: Money, current: Money) -> Money {
    (target - current).max(Decimal::ZERO)
}

/// Investable = income - gap - debt. Negative when income cannot cover the
/// gap and the debt.
pub fn compute_investable(income: Money, gap: Money, debt: Money) -> Money {
    income - gap - debt
}

/// Split the investable amount across the framework buckets. Each bucket is
/// rounded on its own; the rounded parts may not add back to the input.
/// Expects an amount derived from inputs within `MAX_AMOUNT` and a checked
/// configuration.
pub fn allocate_framework(investable: Money, config: &AllocationConfig) -> FrameworkAllocation {
    let ratios = &config.framework;
    FrameworkAllocation {
        fund_portfolio: round_money(investable * ratios.fund_portfolio),
        bank_fixed_income: round_money(investable * ratios.bank_fixed_income),
        physical_gold: round_money(investable * ratios.physical_gold),
        reserve_fund: round_money(investable * ratios.reserve_fund),
    }
}

/// Split the fund-portfolio amount across the four fund types, rounding
/// each part on its own.
pub fn allocate_fund_portfolio(fund_portfolio_amount: Money, config: &AllocationConfig) -> FundAllocation {
    let ratios = &config.fund_portfolio;
    FundAllocation {
        bond_fund: round_money(fund_portfolio_amount * ratios.bond_fund),
        dividend_fund: round_money(fund_portfolio_amount * ratios.dividend_fund),
        us_index_fund: round_money(fund_portfolio_amount * ratios.us_index_fund),
        gold_etf: round_money(fund_portfolio_amount * ratios.gold_etf),
    }
}
