use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::types::{Money, Rate};

/// Constant payment that fully retires `principal` over `periods` at
/// `periodic_rate` (a decimal per period, e.g. 0.01 for 1%/period).
///
/// The annuity formula degenerates to 0/0 at a zero rate, so interest-free
/// loans take the straight-line branch instead of evaluating it.
///
/// Callers must have validated `periods > 0` and `periodic_rate >= 0`.
pub fn annuity_payment(principal: Money, periodic_rate: Rate, periods: u32) -> Money {
    debug_assert!(periods > 0);

    if periodic_rate.is_zero() {
        return principal / Decimal::from(periods);
    }

    let factor = (Decimal::ONE + periodic_rate).powu(u64::from(periods));
    principal * periodic_rate * factor / (factor - Decimal::ONE)
}
