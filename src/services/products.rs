use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Alias, Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{error, info, instrument, warn};

use crate::db::DbPool;
use crate::entities::category::{Column as CategoryColumn, Entity as Category};
use crate::entities::product::{self, Column as ProductColumn, Entity as Product, StockStatus};
use crate::entities::stock_transaction::{self, TransactionType};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::settings::SettingsService;

/// Sentinel category filter matching products without a category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Ledger notes written by product lifecycle operations.
pub const NOTE_PRODUCT_ADDED: &str = "New product added";
pub const NOTE_PRODUCT_UPDATED: &str = "Product updated";
pub const NOTE_PRODUCT_DELETED: &str = "Product deleted";

/// Field values accepted by create and update.
#[derive(Clone, Debug)]
pub struct ProductInput {
    pub name: String,
    pub category_id: Option<i32>,
    pub quantity: i32,
    pub price: Decimal,
    pub supplier: Option<String>,
    pub date_added: Option<NaiveDate>,
}

impl ProductInput {
    /// Validates field constraints, collecting every failing field into one
    /// message.
    fn validate(&self) -> Result<(), ServiceError> {
        let mut invalid = Vec::new();
        if self.name.trim().is_empty() {
            invalid.push("name must not be empty");
        }
        if self.quantity < 0 {
            invalid.push("quantity must be zero or greater");
        }
        if self.price < Decimal::ZERO {
            invalid.push("price must be zero or greater");
        }

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::ValidationError(invalid.join(", ")))
        }
    }
}

/// Optional list filters; all default to "no filtering".
#[derive(Clone, Debug, Default)]
pub struct ProductFilters {
    /// Case-insensitive substring match against name or id-as-string
    pub search: Option<String>,
    /// Exact category name, or [`UNCATEGORIZED`]
    pub category: Option<String>,
    pub status: Option<StockStatus>,
}

/// A product joined with its category name and derived attributes.
#[derive(Clone, Debug)]
pub struct ProductListItem {
    pub product: product::Model,
    pub category_name: Option<String>,
    pub status: StockStatus,
    pub total_value: Decimal,
}

impl ProductListItem {
    fn build(product: product::Model, category_name: Option<String>, threshold: i32) -> Self {
        let status = product.status(threshold);
        let total_value = product.total_value();
        Self {
            product,
            category_name,
            status,
            total_value,
        }
    }
}

/// One page of the product list.
#[derive(Clone, Debug)]
pub struct ProductPage {
    pub items: Vec<ProductListItem>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Service for the product catalog.
///
/// Every mutation that touches stock also appends to the transaction ledger,
/// inside the same database transaction, so the ledger and the stored
/// quantities cannot drift apart.
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    settings: SettingsService,
}

impl ProductService {
    /// Creates a new product service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, settings: SettingsService) -> Self {
        Self {
            db_pool,
            event_sender,
            settings,
        }
    }

    /// Lists products matching the given filters, ordered by id ascending so
    /// repeated calls paginate deterministically. Out-of-range pages return
    /// an empty page, never an error.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filters: &ProductFilters,
        page: u64,
        per_page: u64,
    ) -> Result<ProductPage, ServiceError> {
        let db = &*self.db_pool;
        let threshold = self.settings.low_stock_threshold().await?;
        let page = page.max(1);
        let per_page = per_page.max(1);

        let mut query = Product::find();

        if let Some(term) = filters
            .search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            let pattern = format!("%{}%", term.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col((Product, ProductColumn::Name))))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(
                            Expr::col((Product, ProductColumn::Id)).cast_as(Alias::new("TEXT")),
                        )
                        .like(pattern),
                    ),
            );
        }

        if let Some(category) = filters
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            if category.eq_ignore_ascii_case(UNCATEGORIZED) {
                query = query.filter(ProductColumn::CategoryId.is_null());
            } else {
                let matched = Category::find()
                    .filter(CategoryColumn::Name.eq(category))
                    .one(db)
                    .await
                    .map_err(|e| {
                        error!(error = %e, "Database error when resolving category filter");
                        ServiceError::DatabaseError(e)
                    })?;
                match matched {
                    Some(cat) => query = query.filter(ProductColumn::CategoryId.eq(cat.id)),
                    None => {
                        return Ok(ProductPage {
                            items: Vec::new(),
                            total: 0,
                            page,
                            per_page,
                        })
                    }
                }
            }
        }

        if let Some(status) = filters.status {
            query = query.filter(match status {
                StockStatus::OutOfStock => Condition::all().add(ProductColumn::Quantity.eq(0)),
                StockStatus::LowStock => Condition::all()
                    .add(ProductColumn::Quantity.gt(0))
                    .add(ProductColumn::Quantity.lte(threshold)),
                StockStatus::InStock => Condition::all().add(ProductColumn::Quantity.gt(threshold)),
            });
        }

        let paginator = query
            .order_by_asc(ProductColumn::Id)
            .find_also_related(Category)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Database error when counting products");
            ServiceError::DatabaseError(e)
        })?;

        let rows = paginator.fetch_page(page - 1).await.map_err(|e| {
            error!(page, per_page, error = %e, "Database error when fetching products");
            ServiceError::DatabaseError(e)
        })?;

        let items = rows
            .into_iter()
            .map(|(product, category)| {
                ProductListItem::build(product, category.map(|c| c.name), threshold)
            })
            .collect();

        Ok(ProductPage {
            items,
            total,
            page,
            per_page,
        })
    }

    /// Fetches a single product with its derived attributes.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<ProductListItem, ServiceError> {
        let db = &*self.db_pool;
        let threshold = self.settings.low_stock_threshold().await?;

        let (product, category) = Product::find_by_id(id)
            .find_also_related(Category)
            .one(db)
            .await
            .map_err(|e| {
                error!(product_id = id, error = %e, "Database error when fetching product");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with ID {} not found", id)))?;

        Ok(ProductListItem::build(
            product,
            category.map(|c| c.name),
            threshold,
        ))
    }

    /// Creates a product and, when the initial quantity is nonzero, appends
    /// the matching "Stock In" ledger entry in the same transaction.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ProductInput) -> Result<product::Model, ServiceError> {
        input.validate()?;
        let db = &*self.db_pool;

        let created = db
            .transaction::<_, product::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    if let Some(category_id) = input.category_id {
                        ensure_category_exists(txn, category_id).await?;
                    }

                    let product = product::ActiveModel {
                        name: Set(input.name),
                        category_id: Set(input.category_id),
                        quantity: Set(input.quantity),
                        price: Set(input.price),
                        supplier: Set(input.supplier),
                        date_added: Set(input.date_added),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    // The ledger records only nonzero movements.
                    if product.quantity > 0 {
                        append_ledger_entry(
                            txn,
                            product.id,
                            TransactionType::StockIn,
                            product.quantity,
                            NOTE_PRODUCT_ADDED,
                        )
                        .await?;
                    }

                    Ok(product)
                })
            })
            .await
            .map_err(ServiceError::from)?;

        if let Err(e) = self
            .event_sender
            .send(Event::ProductCreated {
                product_id: created.id,
                name: created.name.clone(),
                initial_quantity: created.quantity,
            })
            .await
        {
            warn!(error = %e, "Failed to publish product created event");
        }

        info!(product_id = created.id, "Product created successfully");

        Ok(created)
    }

    /// Updates a product. A changed quantity appends a ledger entry whose
    /// direction follows the sign of the delta.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn update(&self, id: i32, input: ProductInput) -> Result<product::Model, ServiceError> {
        input.validate()?;
        let db = &*self.db_pool;

        let (updated, delta) = db
            .transaction::<_, (product::Model, i32), ServiceError>(move |txn| {
                Box::pin(async move {
                    let existing = Product::find_by_id(id).one(txn).await?.ok_or_else(|| {
                        ServiceError::NotFound(format!("Product with ID {} not found", id))
                    })?;

                    if let Some(category_id) = input.category_id {
                        ensure_category_exists(txn, category_id).await?;
                    }

                    let delta = input.quantity - existing.quantity;

                    let mut active: product::ActiveModel = existing.into();
                    active.name = Set(input.name);
                    active.category_id = Set(input.category_id);
                    active.quantity = Set(input.quantity);
                    active.price = Set(input.price);
                    active.supplier = Set(input.supplier);
                    active.date_added = Set(input.date_added);
                    let updated = active.update(txn).await?;

                    if delta != 0 {
                        let transaction_type = if delta > 0 {
                            TransactionType::StockIn
                        } else {
                            TransactionType::StockOut
                        };
                        append_ledger_entry(
                            txn,
                            updated.id,
                            transaction_type,
                            delta.abs(),
                            NOTE_PRODUCT_UPDATED,
                        )
                        .await?;
                    }

                    Ok((updated, delta))
                })
            })
            .await
            .map_err(ServiceError::from)?;

        if let Err(e) = self
            .event_sender
            .send(Event::ProductUpdated {
                product_id: id,
                quantity_delta: delta,
            })
            .await
        {
            warn!(error = %e, "Failed to publish product updated event");
        }

        info!(product_id = id, quantity_delta = delta, "Product updated successfully");

        Ok(updated)
    }

    /// Deletes a product, first recording the removal of any remaining stock
    /// in the ledger.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let product = Product::find_by_id(id).one(txn).await?.ok_or_else(|| {
                    ServiceError::NotFound(format!("Product with ID {} not found", id))
                })?;

                if product.quantity > 0 {
                    append_ledger_entry(
                        txn,
                        product.id,
                        TransactionType::StockOut,
                        product.quantity,
                        NOTE_PRODUCT_DELETED,
                    )
                    .await?;
                }

                product.delete(txn).await?;
                Ok(())
            })
        })
        .await
        .map_err(ServiceError::from)?;

        if let Err(e) = self
            .event_sender
            .send(Event::ProductDeleted { product_id: id })
            .await
        {
            warn!(error = %e, "Failed to publish product deleted event");
        }

        info!(product_id = id, "Product deleted successfully");

        Ok(())
    }
}

async fn ensure_category_exists<C>(conn: &C, category_id: i32) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    Category::find_by_id(category_id)
        .one(conn)
        .await?
        .ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "Category with ID {} does not exist",
                category_id
            ))
        })?;
    Ok(())
}

pub(crate) async fn append_ledger_entry<C>(
    conn: &C,
    product_id: i32,
    transaction_type: TransactionType,
    quantity: i32,
    note: &str,
) -> Result<stock_transaction::Model, DbErr>
where
    C: ConnectionTrait,
{
    stock_transaction::ActiveModel {
        product_id: Set(product_id),
        transaction_type: Set(transaction_type.as_str().to_string()),
        quantity: Set(quantity),
        notes: Set(Some(note.to_string())),
        ..Default::default()
    }
    .insert(conn)
    .await
}
