use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::IdleCashError;
use crate::IdleCashResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Rates already scaled for display (5.00 = 5%).
pub type Percent = Decimal;

/// Decimal places kept on every monetary or percentage output field.
pub const OUTPUT_DP: u32 = 2;

/// Largest accepted input amount. Sums and products of a handful of
/// amounts this size stay far inside `Decimal`'s range.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000_000);

/// Round a monetary amount for output.
pub fn round_money(amount: Money) -> Money {
    amount.round_dp(OUTPUT_DP)
}

/// Scale a rate to a percentage and round it for output.
pub fn to_percent(rate: Rate) -> Percent {
    (rate * Decimal::ONE_HUNDRED).round_dp(OUTPUT_DP)
}

/// Checked variant of [`to_percent`] for rates derived from unbounded inputs.
pub fn try_percent(field: &str, rate: Rate) -> IdleCashResult<Percent> {
    let scaled = checked(field, rate.checked_mul(Decimal::ONE_HUNDRED))?;
    Ok(scaled.round_dp(OUTPUT_DP))
}

/// Unwrap the result of a `checked_*` operation, reporting overflow
/// against `field`.
pub fn checked(field: &str, value: Option<Decimal>) -> IdleCashResult<Decimal> {
    value.ok_or_else(|| IdleCashError::InvalidInput {
        field: field.into(),
        reason: "arithmetic overflow".into(),
    })
}

/// Reject a named input amount that is negative or above [`MAX_AMOUNT`].
pub fn require_amount(field: &str, value: Decimal) -> IdleCashResult<()> {
    if value < Decimal::ZERO {
        return Err(IdleCashError::InvalidInput {
            field: field.into(),
            reason: "must not be negative".into(),
        });
    }
    if value > MAX_AMOUNT {
        return Err(IdleCashError::InvalidInput {
            field: field.into(),
            reason: format!("must not exceed {MAX_AMOUNT}"),
        });
    }
    Ok(())
}

/// Serde adapter that writes `None` as an empty object and reads an empty
/// object (or `null`) back as `None`.
pub mod empty_map_when_none {
    use serde::de::{DeserializeOwned, Error as _};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match &value {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Object(map) if map.is_empty() => Ok(None),
            _ => serde_json::from_value(value).map(Some).map_err(D::Error::custom),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
