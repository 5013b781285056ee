//! Command inputs for expense writes.
//!
//! Inputs arrive with every field optional so that validation can report all
//! missing and malformed fields at once, before any aggregate is touched.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::{BudgetPeriod, Currency, EngineError, FieldError, MoneyCents, ResultEngine};

/// Largest price a single expense may carry (one billion).
///
/// Keeps every aggregate delta far away from the `i64` range of the totals.
pub const MAX_PRICE: MoneyCents = MoneyCents::new(100_000_000_000);

/// Input for creating an expense.
#[derive(Clone, Debug, Default)]
pub struct ExpenseDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub category: Option<String>,
}

/// Input for a partial update. `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default)]
pub struct ExpensePatch {
    pub name: Option<String>,
    /// A blank description clears the stored one.
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub category: Option<String>,
}

#[derive(Clone, Debug)]
pub(crate) struct ValidExpense {
    pub name: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub price: MoneyCents,
    pub currency: Currency,
    pub category: String,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ValidPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub date: Option<NaiveDate>,
    pub price: Option<MoneyCents>,
    pub currency: Option<Currency>,
    pub category: Option<String>,
}

impl ValidPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.price.is_none()
            && self.currency.is_none()
            && self.category.is_none()
    }
}

fn non_blank(field: &'static str, value: String, errors: &mut Vec<FieldError>) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::invalid(field, format!("{field} must not be empty")));
        return None;
    }
    Some(trimmed.to_string())
}

fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn positive_price(value: Decimal, errors: &mut Vec<FieldError>) -> Option<MoneyCents> {
    match MoneyCents::try_from(value) {
        Ok(price) if price > MAX_PRICE => {
            errors.push(FieldError::invalid(
                "price",
                format!("price must be at most {MAX_PRICE}"),
            ));
            None
        }
        Ok(price) if price.is_positive() => Some(price),
        Ok(_) => {
            errors.push(FieldError::invalid("price", "price must be > 0"));
            None
        }
        Err(err) => {
            errors.push(FieldError::invalid("price", err.to_string()));
            None
        }
    }
}

/// Dates must fall in a month a budget can be kept for (years 1 to 9999).
fn storable_date(value: NaiveDate, errors: &mut Vec<FieldError>) -> Option<NaiveDate> {
    match BudgetPeriod::new(value.year(), value.month()) {
        Ok(_) => Some(value),
        Err(err) => {
            errors.push(FieldError::invalid("date", err.to_string()));
            None
        }
    }
}

fn currency(value: &str, errors: &mut Vec<FieldError>) -> Option<Currency> {
    match Currency::try_from(value) {
        Ok(currency) => Some(currency),
        Err(err) => {
            errors.push(FieldError::invalid("currency", err.to_string()));
            None
        }
    }
}

fn required<T>(field: &'static str, value: Option<T>, errors: &mut Vec<FieldError>) -> Option<T> {
    if value.is_none() {
        errors.push(FieldError::missing(field));
    }
    value
}

impl ExpenseDraft {
    pub(crate) fn validate(self) -> ResultEngine<ValidExpense> {
        let mut errors = Vec::new();

        let name = required("name", self.name, &mut errors)
            .and_then(|name| non_blank("name", name, &mut errors));
        let date = required("date", self.date, &mut errors)
            .and_then(|date| storable_date(date, &mut errors));
        let price = required("price", self.price, &mut errors)
            .and_then(|price| positive_price(price, &mut errors));
        let currency = required("currency", self.currency, &mut errors)
            .and_then(|code| currency(&code, &mut errors));
        let category = required("category", self.category, &mut errors)
            .and_then(|category| non_blank("category", category, &mut errors));

        match (name, date, price, currency, category) {
            (Some(name), Some(date), Some(price), Some(currency), Some(category))
                if errors.is_empty() =>
            {
                Ok(ValidExpense {
                    name,
                    description: self.description.and_then(optional_text),
                    date,
                    price,
                    currency,
                    category,
                })
            }
            _ => Err(EngineError::Validation(errors)),
        }
    }
}

impl ExpensePatch {
    pub(crate) fn validate(self) -> ResultEngine<ValidPatch> {
        let mut errors = Vec::new();

        let patch = ValidPatch {
            name: self.name.and_then(|name| non_blank("name", name, &mut errors)),
            description: self.description.map(optional_text),
            date: self.date.and_then(|date| storable_date(date, &mut errors)),
            price: self.price.and_then(|price| positive_price(price, &mut errors)),
            currency: self
                .currency
                .and_then(|code| currency(&code, &mut errors)),
            category: self
                .category
                .and_then(|category| non_blank("category", category, &mut errors)),
        };

        if !errors.is_empty() {
            return Err(EngineError::Validation(errors));
        }
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldErrorKind;

    fn draft() -> ExpenseDraft {
        ExpenseDraft {
            name: Some("Lunch".to_string()),
            description: Some("  ".to_string()),
            date: NaiveDate::from_ymd_opt(2023, 5, 1),
            price: Some(Decimal::new(1250, 2)),
            currency: Some("cad".to_string()),
            category: Some(" food ".to_string()),
        }
    }

    fn fields(err: EngineError) -> Vec<(&'static str, FieldErrorKind)> {
        match err {
            EngineError::Validation(errors) => errors.into_iter().map(|e| (e.field, e.kind)).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_draft_is_normalized() {
        let valid = draft().validate().unwrap();
        assert_eq!(valid.price.cents(), 1250);
        assert_eq!(valid.currency.code(), "CAD");
        assert_eq!(valid.category, "food");
        assert_eq!(valid.description, None);
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let err = ExpenseDraft::default().validate().unwrap_err();
        assert_eq!(
            fields(err),
            vec![
                ("name", FieldErrorKind::Missing),
                ("date", FieldErrorKind::Missing),
                ("price", FieldErrorKind::Missing),
                ("currency", FieldErrorKind::Missing),
                ("category", FieldErrorKind::Missing),
            ]
        );
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = ExpenseDraft {
            name: Some(" ".to_string()),
            price: Some(Decimal::new(-5, 0)),
            currency: Some("dollars".to_string()),
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            fields(err),
            vec![
                ("name", FieldErrorKind::Invalid),
                ("price", FieldErrorKind::Invalid),
                ("currency", FieldErrorKind::Invalid),
            ]
        );
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(ExpensePatch::default().validate().unwrap().is_empty());
    }

    #[test]
    fn patch_validates_only_supplied_fields() {
        let patch = ExpensePatch {
            price: Some(Decimal::new(80, 0)),
            description: Some(String::new()),
            ..ExpensePatch::default()
        }
        .validate()
        .unwrap();
        assert_eq!(patch.price, Some(MoneyCents::new(8000)));
        assert_eq!(patch.description, Some(None));
        assert!(patch.name.is_none());

        let err = ExpensePatch {
            price: Some(Decimal::new(1, 3)),
            ..ExpensePatch::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(fields(err), vec![("price", FieldErrorKind::Invalid)]);
    }

    #[test]
    fn prices_above_the_cap_are_rejected() {
        let err = ExpenseDraft {
            price: Some(Decimal::new(i64::MAX, 2)),
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert_eq!(fields(err), vec![("price", FieldErrorKind::Invalid)]);

        let at_cap = ExpenseDraft {
            price: Some(MAX_PRICE.to_decimal()),
            ..draft()
        }
        .validate()
        .unwrap();
        assert_eq!(at_cap.price, MAX_PRICE);

        let err = ExpensePatch {
            price: Some(Decimal::new(1_000_000_001, 0)),
            ..ExpensePatch::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(fields(err), vec![("price", FieldErrorKind::Invalid)]);
    }

    #[test]
    fn dates_outside_four_digit_years_are_rejected() {
        for date in [
            NaiveDate::from_ymd_opt(10000, 1, 1),
            NaiveDate::from_ymd_opt(0, 12, 31),
        ] {
            let err = ExpenseDraft { date, ..draft() }.validate().unwrap_err();
            assert_eq!(fields(err), vec![("date", FieldErrorKind::Invalid)]);

            let err = ExpensePatch {
                date,
                ..ExpensePatch::default()
            }
            .validate()
            .unwrap_err();
            assert_eq!(fields(err), vec![("date", FieldErrorKind::Invalid)]);
        }

        let last = NaiveDate::from_ymd_opt(9999, 12, 31);
        assert_eq!(ExpenseDraft { date: last, ..draft() }.validate().unwrap().date, last.unwrap());
    }
}
