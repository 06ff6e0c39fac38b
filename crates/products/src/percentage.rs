//! Potency percentage value object.

use rust_decimal::Decimal;
use serde::Serialize;

use cannareg_core::{DomainError, DomainResult};

/// Fractional digits kept for stored percentages.
pub const PERCENT_SCALE: u32 = 2;

/// A THC/CBD percentage in `[0, 100]` with at most two fractional digits.
///
/// Always held at scale 2, so `0.8` is stored and rendered as `0.80`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Percentage(Decimal);

impl Percentage {
    /// Validate a raw decimal for `field`.
    pub fn try_new(field: &str, value: Decimal) -> DomainResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::validation(format!("{field} cannot be negative")));
        }
        if value > Decimal::ONE_HUNDRED {
            return Err(DomainError::validation(format!("{field} cannot exceed 100")));
        }
        if value.normalize().scale() > PERCENT_SCALE {
            return Err(DomainError::validation(format!(
                "{field} allows at most {PERCENT_SCALE} decimal places"
            )));
        }

        let mut v = value.normalize();
        v.rescale(PERCENT_SCALE);
        Ok(Self(v))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl core::fmt::Display for Percentage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
