use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use idle_cash_core::planning::calculator::{self, CalculationInput};
use idle_cash_core::planning::suggestions::Holding;
use idle_cash_core::AllocationConfig;

use crate::input;

/// Arguments for an allocation plan calculation
#[derive(Args)]
pub struct CalculateArgs {
    /// Path to JSON input file with all figures (and optional holdings)
    #[arg(long)]
    pub input: Option<String>,

    /// Living-expense reserve to hold (1.5 months of expenses)
    #[arg(long)]
    pub target_living_expense: Option<Decimal>,

    /// Living-expense reserve currently held
    #[arg(long)]
    pub current_living_expense: Option<Decimal>,

    /// Outstanding debt to pay off first
    #[arg(long)]
    pub debt: Option<Decimal>,

    /// Newly received income
    #[arg(long)]
    pub new_income: Option<Decimal>,

    /// Path to JSON file with an array of fund holdings
    #[arg(long)]
    pub holdings: Option<String>,
}

impl CalculateArgs {
    fn has_figures(&self) -> bool {
        self.target_living_expense.is_some()
            || self.current_living_expense.is_some()
            || self.debt.is_some()
            || self.new_income.is_some()
    }

    fn figures_input(&self) -> Result<CalculationInput, Box<dyn std::error::Error>> {
        let missing: Vec<&str> = [
            ("--target-living-expense", self.target_living_expense),
            ("--current-living-expense", self.current_living_expense),
            ("--debt", self.debt),
            ("--new-income", self.new_income),
        ]
        .iter()
        .filter(|(_, v)| v.is_none())
        .map(|(name, _)| *name)
        .collect();
        if !missing.is_empty() {
            return Err(format!("missing required fields: {}", missing.join(", ")).into());
        }

        let holdings: Vec<Holding> = match self.holdings {
            Some(ref path) => input::file::read_json(path)?,
            None => Vec::new(),
        };

        Ok(CalculationInput {
            target_living_expense: self.target_living_expense.unwrap_or_default(),
            current_living_expense: self.current_living_expense.unwrap_or_default(),
            debt: self.debt.unwrap_or_default(),
            new_income: self.new_income.unwrap_or_default(),
            holdings,
        })
    }
}

pub fn run_calculate(
    args: CalculateArgs,
    config: &AllocationConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let calc_input: CalculationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if args.has_figures() {
        args.figures_input()?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err(
            "Provide --target-living-expense, --current-living-expense, --debt and --new-income, \
             or --input <file.json>, or pipe JSON via stdin"
                .into(),
        );
    };

    let output = calculator::calculate(&calc_input, config)?;
    Ok(serde_json::to_value(output)?)
}
