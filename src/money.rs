//! Money
//!
//! Every amount in the storefront is held as integer minor units of a single
//! currency. [`Money`] values are only built at the edges, for display.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{
    Money,
    iso::{self, Currency},
};

/// Currency every storefront price is quoted in.
pub const CURRENCY: &Currency = iso::MUR;

/// Wrap an amount in minor units as [`Money`] in the storefront currency.
pub fn to_money(minor: i64) -> Money<'static, Currency> {
    Money::from_minor(minor, CURRENCY)
}

/// Format an amount in minor units for display, e.g. `₨2,499.00`.
pub fn format_minor(minor: i64) -> String {
    format!("{}", to_money(minor))
}

/// Convert a major-unit amount as delivered by the CMS (e.g. `764.15`) into
/// minor units.
///
/// Non-finite input converts to zero.
pub fn minor_from_major(major: f64) -> i64 {
    let Some(major) = Decimal::from_f64_retain(major) else {
        return 0;
    };

    let scale = Decimal::from(10_i64.pow(CURRENCY.exponent));

    major.checked_mul(scale).map_or(0, saturating_i64)
}

/// Calculate `percent` of an amount in minor units, rounded half away from zero.
///
/// Saturates at the `i64` bounds rather than overflowing.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> i64 {
    saturating_i64(percent.clone() * Decimal::from(minor))
}

/// Build a fractional [`Percentage`] from percent points, e.g. `15.0` → 15 %.
pub fn percentage_from_points(points: f64) -> Percentage {
    let points = Decimal::from_f64_retain(points).unwrap_or(Decimal::ZERO);

    Percentage::from(points / Decimal::ONE_HUNDRED)
}

fn saturating_i64(value: Decimal) -> i64 {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Multiply a unit price by a quantity, saturating on overflow.
pub(crate) fn line_total(unit_price: i64, quantity: u32) -> i64 {
    unit_price.saturating_mul(i64::from(quantity))
}

/// Ratio of `part` to `whole` as percent points, clamped to `0..=100`.
pub(crate) fn progress_points(part: i64, whole: i64) -> u8 {
    if whole <= 0 {
        return 100;
    }

    let (Some(part), Some(whole)) = (Decimal::from_i64(part), Decimal::from_i64(whole)) else {
        return 0;
    };

    let points = (part * Decimal::ONE_HUNDRED / whole)
        .floor()
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    points.to_u8().unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_from_major_scales_by_currency_exponent() {
        assert_eq!(minor_from_major(2499.0), 249_900);
        assert_eq!(minor_from_major(764.15), 76_415);
    }

    #[test]
    fn minor_from_major_non_finite_is_zero() {
        assert_eq!(minor_from_major(f64::NAN), 0);
    }

    #[test]
    fn percent_of_minor_rounds_half_away_from_zero() {
        let eight = Percentage::from(Decimal::new(8, 2));

        assert_eq!(percent_of_minor(&eight, 25_000), 2_000);
        assert_eq!(percent_of_minor(&eight, 1_256), 100);
        assert_eq!(percent_of_minor(&eight, 1_250), 100);
        assert_eq!(percent_of_minor(&eight, -1_250), -100);
    }

    #[test]
    fn percentage_from_points_is_fractional() {
        assert_eq!(
            percent_of_minor(&percentage_from_points(15.0), 89_900),
            13_485
        );
    }

    #[test]
    fn line_total_saturates() {
        assert_eq!(line_total(100, 3), 300);
        assert_eq!(line_total(i64::MAX, 2), i64::MAX);
    }

    #[test]
    fn progress_points_clamps() {
        assert_eq!(progress_points(50_000, 200_000), 25);
        assert_eq!(progress_points(500_000, 200_000), 100);
        assert_eq!(progress_points(0, 200_000), 0);
        assert_eq!(progress_points(10, 0), 100);
    }

    #[test]
    fn format_minor_uses_store_currency() {
        assert_eq!(format_minor(250_000), format!("{}", to_money(250_000)));
        assert_eq!(to_money(250_000).to_minor_units(), 250_000);
    }
}
