use std::{
    fmt,
    ops::{Neg, Sub},
};

use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::EngineError;

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (prices, net worth,
/// budget totals) to avoid floating-point drift. Decimals only exist at the
/// edges (wire format and exchange rates).
///
/// The value is signed:
/// - positive = income / increase
/// - negative = expense / decrease
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
/// use rust_decimal::Decimal;
///
/// let amount = MoneyCents::try_from(Decimal::new(1234, 2)).unwrap();
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// assert!(MoneyCents::try_from(Decimal::new(12345, 3)).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns the amount as a decimal with two fraction digits.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl TryFrom<Decimal> for MoneyCents {
    type Error = EngineError;

    /// Converts a decimal amount into cents.
    ///
    /// Rejects amounts with more than two fraction digits and amounts that do
    /// not fit in an `i64` number of cents.
    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        let scaled = value
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))?;
        if !scaled.fract().is_zero() {
            return Err(EngineError::InvalidAmount(
                "at most two decimal places are allowed".to_string(),
            ));
        }
        scaled
            .to_i64()
            .map(MoneyCents)
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> Self::Output {
        MoneyCents(-self.0)
    }
}
