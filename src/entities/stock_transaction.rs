use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "Stock In")]
    StockIn,
    #[serde(rename = "Stock Out")]
    StockOut,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::StockIn => "Stock In",
            TransactionType::StockOut => "Stock Out",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Stock In" => Some(TransactionType::StockIn),
            "Stock Out" => Some(TransactionType::StockOut),
            _ => None,
        }
    }
}

/// A single row in the append-only stock movement ledger.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    // Stored as string in the DB, converted to/from TransactionType at the edges
    pub transaction_type: String,
    pub quantity: i32,
    pub notes: Option<String>,
    pub transaction_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // No DB-level foreign key: ledger rows outlive their product.
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        if let ActiveValue::NotSet = active_model.transaction_date {
            active_model.transaction_date = Set(Utc::now());
        }
        Ok(active_model)
    }
}
