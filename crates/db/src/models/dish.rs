//! Dish (menu entry) rows.

use std::collections::BTreeMap;

use brigade_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `dishes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DishRow {
    pub id: DbId,
    pub workspace_id: DbId,
    pub name: String,
    pub prep_time_minutes: i32,
    /// Opaque reference to an externally hosted image.
    pub image_ref: Option<String>,
    /// Ordered, order-significant; duplicates permitted.
    pub ingredients: Vec<String>,
    /// ingredient → suggested replacement; keys are a subset of
    /// `ingredients`. JSONB column.
    pub substitutions: Json<BTreeMap<String, String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DishRow {
    /// The substitution map without the JSONB wrapper.
    pub fn substitutions(&self) -> &BTreeMap<String, String> {
        &self.substitutions.0
    }
}

/// Insert/update payload for a dish. Fields arrive already validated
/// and canonicalized (ingredients normalized, substitutions filtered).
#[derive(Debug, Clone)]
pub struct NewDish {
    pub workspace_id: DbId,
    pub name: String,
    pub prep_time_minutes: i32,
    pub image_ref: Option<String>,
    pub ingredients: Vec<String>,
    pub substitutions: BTreeMap<String, String>,
}
