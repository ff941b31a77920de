use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use tracing::{error, info, instrument, warn};

use crate::db::DbPool;
use crate::entities::product::{Column as ProductColumn, Entity as Product};
use crate::entities::stock_transaction::{
    self, Column as TransactionColumn, Entity as StockTransaction, TransactionType,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// A ledger row joined with the referencing product's current name.
///
/// The name is resolved at read time; rows whose product has since been
/// deleted carry `None`.
#[derive(Clone, Debug)]
pub struct LedgerEntry {
    pub entry: stock_transaction::Model,
    pub product_name: Option<String>,
}

/// Service for the append-only stock movement ledger.
#[derive(Clone)]
pub struct TransactionService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl TransactionService {
    /// Creates a new transaction service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Returns the most recent `limit` ledger entries, newest first, with id
    /// as the tie-breaker for entries sharing a timestamp.
    #[instrument(skip(self))]
    pub async fn list(&self, limit: u64) -> Result<Vec<LedgerEntry>, ServiceError> {
        let db = &*self.db_pool;

        let rows = StockTransaction::find()
            .find_also_related(Product)
            .order_by_desc(TransactionColumn::TransactionDate)
            .order_by_desc(TransactionColumn::Id)
            .limit(limit)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error when fetching transactions");
                ServiceError::DatabaseError(e)
            })?;

        Ok(rows
            .into_iter()
            .map(|(entry, product)| LedgerEntry {
                entry,
                product_name: product.map(|p| p.name),
            })
            .collect())
    }

    /// Records a stock movement and adjusts the referenced product's quantity.
    ///
    /// The adjustment runs as an in-database increment so concurrent
    /// movements serialize on the stored value rather than racing through a
    /// stale read. A "Stock Out" larger than the current stock is rejected
    /// with `InsufficientStock` and leaves no ledger row behind; quantities
    /// never go negative and are never clamped.
    #[instrument(skip(self, notes))]
    pub async fn record(
        &self,
        product_id: i32,
        transaction_type: TransactionType,
        quantity: i32,
        notes: Option<String>,
    ) -> Result<stock_transaction::Model, ServiceError> {
        if quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "Quantity must be greater than zero".to_string(),
            ));
        }

        let db = &*self.db_pool;

        let entry = db
            .transaction::<_, stock_transaction::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let product =
                        Product::find_by_id(product_id).one(txn).await?.ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Product with ID {} not found",
                                product_id
                            ))
                        })?;

                    let entry = stock_transaction::ActiveModel {
                        product_id: Set(product_id),
                        transaction_type: Set(transaction_type.as_str().to_string()),
                        quantity: Set(quantity),
                        notes: Set(notes),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    let mut update = Product::update_many()
                        .col_expr(
                            ProductColumn::Quantity,
                            match transaction_type {
                                TransactionType::StockIn => {
                                    Expr::col(ProductColumn::Quantity).add(quantity)
                                }
                                TransactionType::StockOut => {
                                    Expr::col(ProductColumn::Quantity).sub(quantity)
                                }
                            },
                        )
                        .col_expr(ProductColumn::UpdatedAt, Expr::value(Utc::now()))
                        .filter(ProductColumn::Id.eq(product_id));

                    if transaction_type == TransactionType::StockOut {
                        // Guard inside the same statement: the decrement only
                        // applies while enough stock remains.
                        update = update.filter(ProductColumn::Quantity.gte(quantity));
                    }

                    let result = update.exec(txn).await?;
                    if result.rows_affected == 0 {
                        return Err(ServiceError::InsufficientStock(format!(
                            "Cannot remove {} units of '{}': only {} in stock",
                            quantity, product.name, product.quantity
                        )));
                    }

                    Ok(entry)
                })
            })
            .await
            .map_err(ServiceError::from)?;

        if let Err(e) = self
            .event_sender
            .send(Event::StockRecorded {
                product_id,
                transaction_type,
                quantity,
            })
            .await
        {
            warn!(error = %e, "Failed to publish stock recorded event");
        }

        info!(
            product_id,
            transaction_type = transaction_type.as_str(),
            quantity,
            "Stock movement recorded successfully"
        );

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, DbConfig};
    use crate::services::products::{ProductInput, ProductService};
    use crate::services::settings::SettingsService;
    use rust_decimal_macros::dec;
    use tokio::sync::mpsc;

    async fn setup() -> (TransactionService, ProductService, Arc<DbPool>) {
        let pool = db::establish_connection_with_config(&DbConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        })
        .await
        .expect("in-memory database");
        db::run_migrations(&pool).await.expect("migrations");
        let pool = Arc::new(pool);

        let (tx, mut rx) = mpsc::channel(64);
        tokio::spawn(async move { while rx.recv().await.is_some() {} });
        let sender = EventSender::new(tx);

        let settings = SettingsService::new(pool.clone());
        let products = ProductService::new(pool.clone(), sender.clone(), settings);
        let transactions = TransactionService::new(pool.clone(), sender);
        (transactions, products, pool)
    }

    async fn seed_product(products: &ProductService, quantity: i32) -> i32 {
        products
            .create(ProductInput {
                name: "Laptop".into(),
                category_id: None,
                quantity,
                price: dec!(899.99),
                supplier: None,
                date_added: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn stock_in_and_out_adjust_the_stored_quantity() {
        let (transactions, products, pool) = setup().await;
        let id = seed_product(&products, 10).await;

        transactions
            .record(id, TransactionType::StockIn, 5, None)
            .await
            .unwrap();
        transactions
            .record(id, TransactionType::StockOut, 3, Some("damaged".into()))
            .await
            .unwrap();

        let stored = Product::find_by_id(id).one(&*pool).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 12);
    }

    #[tokio::test]
    async fn overdraw_is_rejected_and_leaves_no_trace() {
        let (transactions, products, pool) = setup().await;
        let id = seed_product(&products, 3).await;

        let result = transactions
            .record(id, TransactionType::StockOut, 10, None)
            .await;
        assert!(matches!(result, Err(ServiceError::InsufficientStock(_))));

        let stored = Product::find_by_id(id).one(&*pool).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 3);

        // Only the creation entry survives; the rejected movement rolled back.
        let ledger = StockTransaction::find().all(&*pool).await.unwrap();
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn draining_to_exactly_zero_is_allowed() {
        let (transactions, products, pool) = setup().await;
        let id = seed_product(&products, 3).await;

        transactions
            .record(id, TransactionType::StockOut, 3, None)
            .await
            .unwrap();

        let stored = Product::find_by_id(id).one(&*pool).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 0);
    }

    #[tokio::test]
    async fn nonpositive_quantity_and_missing_product_are_rejected() {
        let (transactions, products, _pool) = setup().await;
        let id = seed_product(&products, 3).await;

        let zero = transactions.record(id, TransactionType::StockIn, 0, None).await;
        assert!(matches!(zero, Err(ServiceError::ValidationError(_))));

        let negative = transactions
            .record(id, TransactionType::StockIn, -4, None)
            .await;
        assert!(matches!(negative, Err(ServiceError::ValidationError(_))));

        let missing = transactions
            .record(9999, TransactionType::StockIn, 1, None)
            .await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_returns_newest_first_and_resolves_deleted_products_to_none() {
        let (transactions, products, _pool) = setup().await;
        let id = seed_product(&products, 10).await;
        transactions
            .record(id, TransactionType::StockOut, 4, None)
            .await
            .unwrap();

        let entries = transactions.list(50).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entry.transaction_type, "Stock Out");
        assert_eq!(entries[0].product_name.as_deref(), Some("Laptop"));

        products.delete(id).await.unwrap();

        let entries = transactions.list(50).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.product_name.is_none()));

        let limited = transactions.list(1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }
}
