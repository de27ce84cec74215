//! Decimal rounding for reported voltages

/// Round to `decimals` places, ties to even
///
/// Rounding is applied to the exact decimal expansion of the binary value,
/// so `2.675` (stored as 2.67499...) becomes `2.67` and the exact tie
/// `0.125` becomes `0.12`. Non-finite values pass through unchanged.
pub fn round_half_even(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals, value)
        .parse()
        .unwrap_or(value)
}
