use std::collections::BTreeMap;
use std::sync::Arc;

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::{error, instrument};

use crate::db::DbPool;
use crate::entities::setting::{self, Column as SettingColumn, Entity as Setting};
use crate::errors::ServiceError;

/// Recognized setting keys
pub const LOW_STOCK_THRESHOLD_KEY: &str = "low_stock_threshold";
pub const CURRENCY_SYMBOL_KEY: &str = "currency_symbol";

/// Built-in defaults served before any write
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Service for the key/value settings store
#[derive(Clone)]
pub struct SettingsService {
    db_pool: Arc<DbPool>,
}

impl SettingsService {
    /// Creates a new settings service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Returns all settings as a key/value map, with built-in defaults for
    /// recognized keys that have never been written.
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<BTreeMap<String, String>, ServiceError> {
        let db = &*self.db_pool;

        let mut result: BTreeMap<String, String> = BTreeMap::from([
            (
                LOW_STOCK_THRESHOLD_KEY.to_string(),
                DEFAULT_LOW_STOCK_THRESHOLD.to_string(),
            ),
            (
                CURRENCY_SYMBOL_KEY.to_string(),
                DEFAULT_CURRENCY_SYMBOL.to_string(),
            ),
        ]);

        let stored = Setting::find().all(db).await.map_err(|e| {
            error!(error = %e, "Database error when fetching settings");
            ServiceError::DatabaseError(e)
        })?;

        for setting in stored {
            result.insert(setting.setting_key, setting.setting_value);
        }

        Ok(result)
    }

    /// Upserts every key/value pair in the given map.
    #[instrument(skip(self, values))]
    pub async fn update(&self, values: BTreeMap<String, String>) -> Result<(), ServiceError> {
        if values.is_empty() {
            return Err(ServiceError::ValidationError(
                "No settings provided".to_string(),
            ));
        }

        let db = &*self.db_pool;

        for (key, value) in values {
            let row = setting::ActiveModel {
                setting_key: Set(key),
                setting_value: Set(value),
            };
            Setting::insert(row)
                .on_conflict(
                    OnConflict::column(SettingColumn::SettingKey)
                        .update_column(SettingColumn::SettingValue)
                        .to_owned(),
                )
                .exec(db)
                .await
                .map_err(|e| {
                    error!(error = %e, "Database error when upserting setting");
                    ServiceError::DatabaseError(e)
                })?;
        }

        Ok(())
    }

    /// The configured low-stock threshold. Missing, non-numeric, or negative
    /// stored values fall back to the default.
    #[instrument(skip(self))]
    pub async fn low_stock_threshold(&self) -> Result<i32, ServiceError> {
        let db = &*self.db_pool;

        let stored = Setting::find()
            .filter(SettingColumn::SettingKey.eq(LOW_STOCK_THRESHOLD_KEY))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(stored
            .and_then(|s| s.setting_value.parse::<i32>().ok())
            .filter(|v| *v >= 0)
            .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, DbConfig};

    async fn setup_db() -> Arc<DbPool> {
        let pool = db::establish_connection_with_config(&DbConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        })
        .await
        .expect("in-memory database");
        db::run_migrations(&pool).await.expect("migrations");
        Arc::new(pool)
    }

    #[tokio::test]
    async fn reads_before_any_write_return_defaults() {
        let service = SettingsService::new(setup_db().await);

        let all = service.get_all().await.unwrap();
        assert_eq!(all.get(LOW_STOCK_THRESHOLD_KEY).unwrap(), "10");
        assert_eq!(all.get(CURRENCY_SYMBOL_KEY).unwrap(), "$");
        assert_eq!(service.low_stock_threshold().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn update_overwrites_and_preserves_unrecognized_keys() {
        let service = SettingsService::new(setup_db().await);

        service
            .update(BTreeMap::from([
                (LOW_STOCK_THRESHOLD_KEY.to_string(), "5".to_string()),
                ("theme".to_string(), "dark".to_string()),
            ]))
            .await
            .unwrap();
        service
            .update(BTreeMap::from([(
                LOW_STOCK_THRESHOLD_KEY.to_string(),
                "7".to_string(),
            )]))
            .await
            .unwrap();

        let all = service.get_all().await.unwrap();
        assert_eq!(all.get(LOW_STOCK_THRESHOLD_KEY).unwrap(), "7");
        assert_eq!(all.get("theme").unwrap(), "dark");
        assert_eq!(service.low_stock_threshold().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn malformed_threshold_falls_back_to_default() {
        let service = SettingsService::new(setup_db().await);

        service
            .update(BTreeMap::from([(
                LOW_STOCK_THRESHOLD_KEY.to_string(),
                "lots".to_string(),
            )]))
            .await
            .unwrap();
        assert_eq!(service.low_stock_threshold().await.unwrap(), 10);

        service
            .update(BTreeMap::from([(
                LOW_STOCK_THRESHOLD_KEY.to_string(),
                "-3".to_string(),
            )]))
            .await
            .unwrap();
        assert_eq!(service.low_stock_threshold().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let service = SettingsService::new(setup_db().await);

        let result = service.update(BTreeMap::new()).await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }
}
