use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::AllocationConfig;
use crate::planning::allocator::{
    allocate_framework, allocate_fund_portfolio, compute_gap, compute_investable,
    FrameworkAllocation, FundAllocation,
};
use crate::planning::schedule::{generate_plan, InvestmentPlan};
use crate::planning::suggestions::{
    evaluate_holdings, validate_holdings, Holding, SuggestionSummary,
};
use crate::types::{require_amount, round_money, with_metadata, ComputationOutput, Money};
use crate::IdleCashResult;

pub const INSUFFICIENT_WARNING: &str = "investable amount is not positive; no allocation performed";

/// Financial figures for one planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Living-expense reserve to hold (1.5 months of expenses)
    pub target_living_expense: Money,
    /// Living-expense reserve currently held
    pub current_living_expense: Money,
    pub debt: Money,
    pub new_income: Money,
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
    Funded,
    Insufficient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationOutput {
    pub status: PlanStatus,
    pub living_expense_gap: Money,
    pub investable_amount: Money,
    /// Written as `{}` on the insufficient path
    #[serde(default, with = "crate::types::empty_map_when_none")]
    pub framework_allocation: Option<FrameworkAllocation>,
    #[serde(default, with = "crate::types::empty_map_when_none")]
    pub fund_allocation: Option<FundAllocation>,
    pub regular_investment_plan: InvestmentPlan,
    pub suggestions: SuggestionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl CalculationOutput {
    pub fn is_insufficient(&self) -> bool {
        self.status == PlanStatus::Insufficient
    }
}

/// Run the full planning pipeline: gap, investable amount, framework and
/// fund splits, weekly schedule and holding suggestions.
///
/// A non-positive investable amount is not an error; it yields the
/// `Insufficient` shape with zeroed sub-structures and a warning. The
/// configuration is checked before use; every amount must lie in
/// `0..=MAX_AMOUNT`.
pub fn calculate(
    input: &CalculationInput,
    config: &AllocationConfig,
) -> IdleCashResult<ComputationOutput<CalculationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    config.check()?;
    require_amount("target_living_expense", input.target_living_expense)?;
    require_amount("current_living_expense", input.current_living_expense)?;
    require_amount("debt", input.debt)?;
    require_amount("new_income", input.new_income)?;
    validate_holdings(&input.holdings)?;

    let gap = compute_gap(input.target_living_expense, input.current_living_expense);
    let investable = compute_investable(input.new_income, gap, input.debt);
    tracing::debug!(%gap, %investable, "computed investable amount");

    let output = if investable <= Decimal::ZERO {
        tracing::warn!(%investable, "insufficient investable amount");
        warnings.push(INSUFFICIENT_WARNING.to_string());
        CalculationOutput {
            status: PlanStatus::Insufficient,
            living_expense_gap: round_money(gap),
            investable_amount: round_money(investable),
            framework_allocation: None,
            fund_allocation: None,
            regular_investment_plan: InvestmentPlan::empty(),
            suggestions: SuggestionSummary::empty(),
            warning: Some(INSUFFICIENT_WARNING.to_string()),
        }
    } else {
        let framework = allocate_framework(investable, config);
        let funds = allocate_fund_portfolio(framework.fund_portfolio, config);
        let plan = generate_plan(&funds);
        let suggestions = evaluate_holdings(&input.holdings, config)?;
        CalculationOutput {
            status: PlanStatus::Funded,
            living_expense_gap: round_money(gap),
            investable_amount: round_money(investable),
            framework_allocation: Some(framework),
            fund_allocation: Some(funds),
            regular_investment_plan: plan,
            suggestions,
            warning: None,
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Idle-cash allocation: living-expense gap, framework and fund splits, weekly schedule, threshold suggestions",
        config,
        warnings,
        elapsed,
        output,
    ))
}
