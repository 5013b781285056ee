use std::{net::SocketAddr, sync::Arc, time::Duration};

use engine::{Currency, ExchangeRateProvider, FRANKFURTER_URL, FixedRates, FrankfurterRates};
use migration::{Migrator, MigratorTrait};
use settings::{Database, Exchange};

mod settings;

const DEFAULT_EXCHANGE_TIMEOUT_SECS: u64 = 10;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tally={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;
    let exchange_rates = parse_exchange(settings.exchange)?;

    let engine = engine::Engine::builder()
        .database(db)
        .exchange_rates(exchange_rates)
        .build()
        .await?;

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr: SocketAddr = format!("{}:{}", bind, settings.server.port).parse()?;
    server::run(engine, addr).await;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

fn parse_exchange(
    config: Exchange,
) -> Result<Arc<dyn ExchangeRateProvider>, Box<dyn std::error::Error + Send + Sync>> {
    match config {
        Exchange::Frankfurter {
            base_url,
            timeout_secs,
        } => {
            let base_url = base_url.unwrap_or_else(|| FRANKFURTER_URL.to_string());
            tracing::info!("Using exchange rates from {base_url}");
            let timeout =
                Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_EXCHANGE_TIMEOUT_SECS));
            Ok(Arc::new(FrankfurterRates::new(base_url, timeout)?))
        }
        Exchange::Fixed { rates } => {
            tracing::info!("Using {} fixed exchange rates", rates.len());
            let mut fixed = FixedRates::new();
            for (code, rate) in rates {
                fixed = fixed.with_rate(Currency::try_from(code.as_str())?, rate);
            }
            Ok(Arc::new(fixed))
        }
    }
}
