use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::entities::category::{Column as CategoryColumn, Entity as Category};
use crate::entities::product::{Entity as Product, StockStatus};
use crate::errors::ServiceError;
use crate::services::settings::SettingsService;

/// Aggregate statistics over the current catalog state.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: u64,
    pub total_categories: u64,
    /// Sum of quantity times unit price over all products
    #[schema(value_type = String, example = "15099.77")]
    pub inventory_value: Decimal,
    pub low_stock_count: u64,
    pub stock_by_category: Vec<CategoryStock>,
    pub status_distribution: StatusDistribution,
}

/// Product count for one category; categories without products report zero.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryStock {
    pub name: String,
    pub count: u64,
}

/// Product counts per stock status bucket.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct StatusDistribution {
    pub out_of_stock: u64,
    pub low_stock: u64,
    pub in_stock: u64,
}

/// Read-only aggregator over the product, category, and settings stores.
///
/// Holds no state of its own; every call recomputes from the latest committed
/// rows, so results always reflect mutations from the same request cycle.
#[derive(Clone)]
pub struct DashboardService {
    db_pool: Arc<DbPool>,
    settings: SettingsService,
}

impl DashboardService {
    /// Creates a new dashboard service instance
    pub fn new(db_pool: Arc<DbPool>, settings: SettingsService) -> Self {
        Self { db_pool, settings }
    }

    /// Computes the full dashboard aggregate.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats, ServiceError> {
        let db = &*self.db_pool;
        let threshold = self.settings.low_stock_threshold().await?;

        let products = Product::find().all(db).await.map_err(|e| {
            error!(error = %e, "Database error when fetching products for dashboard");
            ServiceError::DatabaseError(e)
        })?;

        let categories = Category::find()
            .order_by_asc(CategoryColumn::Name)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error when fetching categories for dashboard");
                ServiceError::DatabaseError(e)
            })?;

        let mut inventory_value = Decimal::ZERO;
        let mut distribution = StatusDistribution::default();
        let mut per_category: HashMap<i32, u64> = HashMap::new();

        for product in &products {
            inventory_value += product.total_value();
            match product.status(threshold) {
                StockStatus::OutOfStock => distribution.out_of_stock += 1,
                StockStatus::LowStock => distribution.low_stock += 1,
                StockStatus::InStock => distribution.in_stock += 1,
            }
            if let Some(category_id) = product.category_id {
                *per_category.entry(category_id).or_insert(0) += 1;
            }
        }

        let stock_by_category = categories
            .iter()
            .map(|category| CategoryStock {
                name: category.name.clone(),
                count: per_category.get(&category.id).copied().unwrap_or(0),
            })
            .collect();

        Ok(DashboardStats {
            total_products: products.len() as u64,
            total_categories: categories.len() as u64,
            inventory_value,
            low_stock_count: distribution.low_stock,
            stock_by_category,
            status_distribution: distribution,
        })
    }
}
