//! The fixed category vocabulary: four framework buckets and the four fund
//! types inside the fund-portfolio bucket.

use serde::{Deserialize, Serialize};

/// Top-level buckets of the investable amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameworkCategory {
    FundPortfolio,
    BankFixedIncome,
    PhysicalGold,
    ReserveFund,
}

impl FrameworkCategory {
    pub const ALL: [FrameworkCategory; 4] = [
        FrameworkCategory::FundPortfolio,
        FrameworkCategory::BankFixedIncome,
        FrameworkCategory::PhysicalGold,
        FrameworkCategory::ReserveFund,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FrameworkCategory::FundPortfolio => "fund_portfolio",
            FrameworkCategory::BankFixedIncome => "bank_fixed_income",
            FrameworkCategory::PhysicalGold => "physical_gold",
            FrameworkCategory::ReserveFund => "reserve_fund",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FrameworkCategory::FundPortfolio => "Fund Portfolio",
            FrameworkCategory::BankFixedIncome => "Bank Fixed Income (R2)",
            FrameworkCategory::PhysicalGold => "Physical Gold",
            FrameworkCategory::ReserveFund => "Reserve Fund",
        }
    }
}

/// Fund types inside the fund-portfolio bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundCategory {
    BondFund,
    DividendFund,
    UsIndexFund,
    GoldEtf,
}

impl FundCategory {
    pub const ALL: [FundCategory; 4] = [
        FundCategory::BondFund,
        FundCategory::DividendFund,
        FundCategory::UsIndexFund,
        FundCategory::GoldEtf,
    ];

    /// Funds that add-position and take-profit rules apply to. The bond fund
    /// is never traded on drawdown or gain signals.
    pub const RULE_ELIGIBLE: [FundCategory; 3] = [
        FundCategory::DividendFund,
        FundCategory::UsIndexFund,
        FundCategory::GoldEtf,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FundCategory::BondFund => "bond_fund",
            FundCategory::DividendFund => "dividend_fund",
            FundCategory::UsIndexFund => "us_index_fund",
            FundCategory::GoldEtf => "gold_etf",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FundCategory::BondFund => "Short/Medium-Term Bond Fund",
            FundCategory::DividendFund => "Low-Volatility Dividend / CSI 300",
            FundCategory::UsIndexFund => "S&P 500 / Nasdaq",
            FundCategory::GoldEtf => "Gold ETF Feeder C",
        }
    }

    pub fn is_rule_eligible(self) -> bool {
        Self::RULE_ELIGIBLE.contains(&self)
    }

    /// Resolve a holding's fund name, accepting either the category key or
    /// its display label (case-insensitive, surrounding whitespace ignored).
    pub fn from_name(name: &str) -> Option<FundCategory> {
        let needle = name.trim();
        Self::ALL.into_iter().find(|c| {
            c.key().eq_ignore_ascii_case(needle) || c.label().eq_ignore_ascii_case(needle)
        })
    }
}
