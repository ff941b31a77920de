pub mod categories;
pub mod common;
pub mod dashboard;
pub mod health;
pub mod products;
pub mod settings;
pub mod transactions;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::categories::CategoryService;
use crate::services::dashboard::DashboardService;
use crate::services::products::ProductService;
use crate::services::settings::SettingsService;
use crate::services::transactions::TransactionService;

/// Aggregates the per-resource services used by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub categories: CategoryService,
    pub products: ProductService,
    pub transactions: TransactionService,
    pub settings: SettingsService,
    pub dashboard: DashboardService,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        let settings = SettingsService::new(db_pool.clone());
        Self {
            categories: CategoryService::new(db_pool.clone(), event_sender.clone()),
            products: ProductService::new(db_pool.clone(), event_sender.clone(), settings.clone()),
            transactions: TransactionService::new(db_pool.clone(), event_sender),
            dashboard: DashboardService::new(db_pool, settings.clone()),
            settings,
        }
    }
}
