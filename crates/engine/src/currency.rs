use crate::EngineError;

/// ISO-like currency code attached to an expense.
///
/// Expenses may be recorded in any currency, but every aggregate (net worth,
/// budgets) is denominated in the base currency, `CAD`. Codes are normalized
/// to upper case on construction, so comparisons are effectively
/// case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Currency(String);

impl Currency {
    /// Code of the currency every aggregate is denominated in.
    pub const BASE_CODE: &'static str = "CAD";

    /// Canonical (upper case) currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is the base currency.
    #[must_use]
    pub fn is_base(&self) -> bool {
        self.0.eq_ignore_ascii_case(Self::BASE_CODE)
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EngineError::InvalidCurrency(format!(
                "expected a three-letter code, got \"{code}\""
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_upper_cased() {
        let currency = Currency::try_from(" usd ").unwrap();
        assert_eq!(currency.code(), "USD");
        assert!(!currency.is_base());
    }

    #[test]
    fn base_matches_case_insensitively() {
        assert!(Currency::try_from("cad").unwrap().is_base());
        assert!(Currency::try_from("CaD").unwrap().is_base());
        assert_eq!(Currency::try_from("cad").unwrap().code(), Currency::BASE_CODE);
    }

    #[test]
    fn rejects_malformed_codes() {
        assert!(Currency::try_from("").is_err());
        assert!(Currency::try_from("CA").is_err());
        assert!(Currency::try_from("C4D").is_err());
        assert!(Currency::try_from("CADX").is_err());
    }
}
