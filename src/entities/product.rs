use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Stock level classification relative to the configured low-stock threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "out-of-stock")]
    OutOfStock,
    #[serde(rename = "low-stock")]
    LowStock,
    #[serde(rename = "in-stock")]
    InStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "out-of-stock",
            StockStatus::LowStock => "low-stock",
            StockStatus::InStock => "in-stock",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "out-of-stock" => Some(StockStatus::OutOfStock),
            "low-stock" => Some(StockStatus::LowStock),
            "in-stock" => Some(StockStatus::InStock),
            _ => None,
        }
    }

    /// Classifies a quantity against a threshold:
    /// 0 is out of stock, (0, threshold] is low, above threshold is in stock.
    pub fn classify(quantity: i32, threshold: i32) -> Self {
        if quantity == 0 {
            StockStatus::OutOfStock
        } else if quantity <= threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

/// Product entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Product name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: String,

    /// Owning category, optional
    pub category_id: Option<i32>,

    /// Units currently on hand, never negative
    pub quantity: i32,

    /// Unit price
    pub price: Decimal,

    /// Supplier name
    pub supplier: Option<String>,

    /// Date the product entered the catalog
    pub date_added: Option<Date>,

    /// Creation timestamp
    pub created_at: DateTimeUtc,

    /// Last update timestamp
    pub updated_at: Option<DateTimeUtc>,
}

impl Model {
    /// Derived stock status for the given low-stock threshold.
    pub fn status(&self, threshold: i32) -> StockStatus {
        StockStatus::classify(self.quantity, threshold)
    }

    /// Derived total value: quantity times unit price.
    pub fn total_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if let ActiveValue::NotSet = active_model.created_at {
                active_model.created_at = Set(Utc::now());
            }
        }

        active_model.updated_at = Set(Some(Utc::now()));

        let model: Model = active_model.clone().try_into().map_err(|_| {
            DbErr::Custom("Failed to convert ActiveModel to Model for validation".to_string())
        })?;

        if let Err(err) = model.validate() {
            return Err(DbErr::Custom(format!("Validation error: {}", err)));
        }

        Ok(active_model)
    }
}
