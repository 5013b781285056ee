use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use crate::{Currency, EngineError, ExchangeRateProvider, FixedRates, ResultEngine};

mod aggregates;
mod expenses;
mod list;

pub use list::DEFAULT_PAGE_LIMIT;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    exchange_rates: Arc<dyn ExchangeRateProvider>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Rate freezing `currency` into the base currency.
    ///
    /// The base currency is always exactly 1; anything else is asked to the
    /// configured provider, which must answer with a positive rate.
    pub async fn resolve_exchange_rate(&self, currency: &Currency) -> ResultEngine<Decimal> {
        if currency.is_base() {
            return Ok(Decimal::ONE);
        }

        let rate = self.exchange_rates.rate_to_base(currency).await?;
        if rate <= Decimal::ZERO {
            return Err(EngineError::ExchangeRate(format!(
                "non-positive rate {rate} for {}",
                currency.code()
            )));
        }
        Ok(rate)
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    exchange_rates: Option<Arc<dyn ExchangeRateProvider>>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass the exchange rate source. Without one, only base currency
    /// expenses can be recorded.
    pub fn exchange_rates(mut self, provider: Arc<dyn ExchangeRateProvider>) -> EngineBuilder {
        self.exchange_rates = Some(provider);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let exchange_rates = self
            .exchange_rates
            .unwrap_or_else(|| Arc::new(FixedRates::new()));
        Ok(Engine {
            database: self.database,
            exchange_rates,
        })
    }
}
