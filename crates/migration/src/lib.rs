pub use sea_orm_migration::prelude::*;

mod m20261015_000001_init;

/// SQLite file used when no database is configured.
pub const DEFAULT_DATABASE_FILE: &str = "tally.db";

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20261015_000001_init::Migration)]
    }
}
