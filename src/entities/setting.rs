use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key/value configuration row.
///
/// Recognized keys are `low_stock_threshold` and `currency_symbol`; anything
/// else is stored verbatim and ignored by derived computations.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub setting_key: String,
    pub setting_value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
