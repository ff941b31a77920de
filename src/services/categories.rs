use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{error, info, instrument, warn};

use crate::db::DbPool;
use crate::entities::category::{self, Column as CategoryColumn, Entity as Category};
use crate::entities::product::{self, Column as ProductColumn, Entity as Product};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Service for managing categories
#[derive(Clone)]
pub struct CategoryService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl CategoryService {
    /// Creates a new category service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Lists all categories ordered by name, each with its live product count.
    ///
    /// The count is computed by joining against current products, never stored.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<(category::Model, u64)>, ServiceError> {
        let db = &*self.db_pool;

        let categories = Category::find()
            .order_by_asc(CategoryColumn::Name)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error when fetching categories");
                ServiceError::DatabaseError(e)
            })?;

        let counts: Vec<(Option<i32>, i64)> = Product::find()
            .select_only()
            .column(ProductColumn::CategoryId)
            .column_as(ProductColumn::Id.count(), "count")
            .filter(ProductColumn::CategoryId.is_not_null())
            .group_by(ProductColumn::CategoryId)
            .into_tuple()
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error when counting products per category");
                ServiceError::DatabaseError(e)
            })?;

        let counts: HashMap<i32, u64> = counts
            .into_iter()
            .filter_map(|(category_id, count)| category_id.map(|id| (id, count as u64)))
            .collect();

        Ok(categories
            .into_iter()
            .map(|cat| {
                let count = counts.get(&cat.id).copied().unwrap_or(0);
                (cat, count)
            })
            .collect())
    }

    /// Creates a category with a unique, non-empty name and returns its id.
    #[instrument(skip(self))]
    pub async fn create(&self, name: String) -> Result<i32, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Category name is required".to_string(),
            ));
        }

        let db = &*self.db_pool;

        // Case-sensitive exact match, same rule the unique index enforces.
        let existing = Category::find()
            .filter(CategoryColumn::Name.eq(&name))
            .one(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error when checking for existing category");
                ServiceError::DatabaseError(e)
            })?;

        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "Category already exists".to_string(),
            ));
        }

        let created = category::ActiveModel {
            name: Set(name.clone()),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error when creating category");
            ServiceError::DatabaseError(e)
        })?;

        if let Err(e) = self
            .event_sender
            .send(Event::CategoryCreated {
                category_id: created.id,
                name,
            })
            .await
        {
            warn!(error = %e, "Failed to publish category created event");
        }

        info!(category_id = %created.id, "Category created successfully");

        Ok(created.id)
    }

    /// Deletes a category that has no referencing products.
    ///
    /// The product-count check and the delete run inside one transaction so a
    /// concurrent product creation cannot slip between them.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let category = Category::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Category with ID {} not found", id))
                    })?;

                let product_count = Product::find()
                    .filter(ProductColumn::CategoryId.eq(id))
                    .count(txn)
                    .await?;

                if product_count > 0 {
                    return Err(ServiceError::Conflict(
                        "Cannot delete category with products".to_string(),
                    ));
                }

                category.delete(txn).await?;
                Ok(())
            })
        })
        .await
        .map_err(ServiceError::from)?;

        if let Err(e) = self
            .event_sender
            .send(Event::CategoryDeleted { category_id: id })
            .await
        {
            warn!(error = %e, "Failed to publish category deleted event");
        }

        info!(category_id = %id, "Category deleted successfully");

        Ok(())
    }
}
