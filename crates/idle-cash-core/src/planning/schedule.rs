//! Weekly contribution schedule for the fund portfolio.
//!
//! The day assignment is fixed policy: the US index fund is bought on
//! Tuesday, the other three funds together on Thursday.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories::FundCategory;
use crate::planning::allocator::FundAllocation;
use crate::types::{round_money, Money};

/// Weekday a contribution is made on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributionDay {
    Tuesday,
    Thursday,
}

/// Order in which scheduled contributions are listed.
pub const SCHEDULE_ORDER: [FundCategory; 4] = [
    FundCategory::UsIndexFund,
    FundCategory::BondFund,
    FundCategory::DividendFund,
    FundCategory::GoldEtf,
];

pub fn contribution_day(fund: FundCategory) -> ContributionDay {
    match fund {
        FundCategory::UsIndexFund => ContributionDay::Tuesday,
        FundCategory::BondFund | FundCategory::DividendFund | FundCategory::GoldEtf => {
            ContributionDay::Thursday
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledContribution {
    pub fund: FundCategory,
    pub name: String,
    pub amount: Money,
    pub day: ContributionDay,
}

/// Per-day amounts plus the flat list of contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPlan {
    pub tuesday_amount: Money,
    pub thursday_amount: Money,
    pub weekly_total: Money,
    pub funds: Vec<ScheduledContribution>,
}

impl InvestmentPlan {
    /// Zeroed plan used when there is nothing to invest.
    pub fn empty() -> Self {
        Self {
            tuesday_amount: Decimal::ZERO,
            thursday_amount: Decimal::ZERO,
            weekly_total: Decimal::ZERO,
            funds: Vec::new(),
        }
    }
}

/// Map fund amounts onto the weekly schedule.
pub fn generate_plan(allocation: &FundAllocation) -> InvestmentPlan {
    let funds: Vec<ScheduledContribution> = SCHEDULE_ORDER
        .iter()
        .map(|fund| ScheduledContribution {
            fund: *fund,
            name: fund.label().to_string(),
            amount: round_money(allocation.amount(*fund)),
            day: contribution_day(*fund),
        })
        .collect();

    let day_total = |day: ContributionDay| -> Money {
        SCHEDULE_ORDER
            .iter()
            .filter(|f| contribution_day(**f) == day)
            .map(|f| allocation.amount(*f))
            .sum()
    };
    let tuesday_amount = round_money(day_total(ContributionDay::Tuesday));
    let thursday_amount = round_money(day_total(ContributionDay::Thursday));

    InvestmentPlan {
        tuesday_amount,
        thursday_amount,
        weekly_total: tuesday_amount + thursday_amount,
        funds,
    }
}
