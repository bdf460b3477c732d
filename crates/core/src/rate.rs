use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

pub const ZERO_RATE: &str = "0.00";

/// Percentage with two decimals, truncated rather than rounded:
/// `floor(success * 10000 / total)` hundredths of a percent.
pub fn exact_rate(success: &BigUint, total: &BigUint) -> String {
    if total.is_zero() {
        return ZERO_RATE.to_string();
    }
    let scaled = (success * 10_000u32 / total).to_u64().unwrap_or(0);
    format!("{}.{:02}", scaled / 100, scaled % 100)
}

/// Percentage with two decimals, rounded to nearest with ties going up.
pub fn simulated_rate(success: u64, trials: u64) -> String {
    if trials == 0 {
        return ZERO_RATE.to_string();
    }
    // twice the hundredths, so the halfway bit survives the division
    let doubled = u128::from(success) * 20_000 / u128::from(trials);
    let hundredths = (doubled + 1) / 2;
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}
