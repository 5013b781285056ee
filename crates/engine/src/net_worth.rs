//! The net worth singleton and its adjustment log.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, expenses::DATE_FORMAT};

/// Running total of assets minus liabilities, in the base currency.
///
/// Exactly one row is expected in storage. Every expense write adjusts it
/// through a signed delta.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetWorth {
    pub id: Uuid,
    pub total: MoneyCents,
    pub updated_at: DateTime<Utc>,
}

/// One applied adjustment of the net worth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetWorthEntry {
    pub id: Uuid,
    pub delta: MoneyCents,
    pub occurred_on: NaiveDate,
    pub is_expense: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "net_worth")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub total_minor: i64,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "entries::Entity")]
    Entries,
}

impl Related<entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for NetWorth {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::NotFound("Net worth not found".to_string()))?;
        Ok(Self {
            id,
            total: MoneyCents::new(model.total_minor),
            updated_at: model.updated_at,
        })
    }
}

pub(crate) mod entries {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "net_worth_entries")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub net_worth_id: String,
        pub delta_minor: i64,
        pub occurred_on: String,
        pub is_expense: bool,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::Entity",
            from = "Column::NetWorthId",
            to = "super::Column::Id"
        )]
        NetWorth,
    }

    impl Related<super::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::NetWorth.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

impl TryFrom<entries::Model> for NetWorthEntry {
    type Error = EngineError;

    fn try_from(model: entries::Model) -> ResultEngine<Self> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::NotFound(format!("invalid entry id {}", model.id)))?;
        let occurred_on = NaiveDate::parse_from_str(&model.occurred_on, DATE_FORMAT)
            .map_err(|_| EngineError::InvalidDate(format!("stored date {}", model.occurred_on)))?;
        Ok(Self {
            id,
            delta: MoneyCents::new(model.delta_minor),
            occurred_on,
            is_expense: model.is_expense,
            created_at: model.created_at,
        })
    }
}
