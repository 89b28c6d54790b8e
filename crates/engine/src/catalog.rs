//! Menu management operations.

use std::collections::BTreeMap;

use brigade_core::dish::{filter_substitutions, validate_dish};
use brigade_core::ingredient::{self, AnnotatedIngredient, IngredientsInput};
use brigade_core::types::DbId;
use brigade_core::CoreError;
use brigade_db::models::dish::{DishRow, NewDish};
use serde::Deserialize;

use crate::error::EngineResult;
use crate::state::Engine;

/// Request body for dish create/update. No `id` means create.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertDishRequest {
    pub workspace_id: DbId,
    pub id: Option<DbId>,
    pub name: String,
    pub prep_time_minutes: i32,
    #[serde(default)]
    pub image_ref: Option<String>,
    /// Accepts a structured list or a comma-delimited string.
    #[serde(default)]
    pub ingredients: IngredientsInput,
    #[serde(default)]
    pub substitutions: BTreeMap<String, String>,
}

impl Engine {
    /// All dishes of a workspace, ascending id.
    pub async fn list_dishes(&self, workspace_id: DbId) -> EngineResult<Vec<DishRow>> {
        Ok(self.store.list_dishes(workspace_id).await?)
    }

    /// Create or update a dish.
    ///
    /// Ingredients are canonicalized here, once; the substitution map
    /// is filtered to keys present in the canonical ingredient list.
    pub async fn upsert_dish(&self, request: UpsertDishRequest) -> EngineResult<DishRow> {
        validate_dish(&request.name, request.prep_time_minutes)?;

        let ingredients = request.ingredients.canonicalize();
        let substitutions = filter_substitutions(request.substitutions, &ingredients);
        let image_ref = request
            .image_ref
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let new = NewDish {
            workspace_id: request.workspace_id,
            name: request.name.trim().to_string(),
            prep_time_minutes: request.prep_time_minutes,
            image_ref,
            ingredients,
            substitutions,
        };

        match request.id {
            None => {
                let row = self.store.insert_dish(&new).await?;
                tracing::info!(workspace_id = row.workspace_id, dish_id = row.id, "dish created");
                Ok(row)
            }
            Some(id) => self
                .store
                .update_dish(request.workspace_id, id, &new)
                .await?
                .ok_or_else(|| CoreError::NotFound { entity: "Dish", id }.into()),
        }
    }

    /// Delete one dish from a workspace.
    pub async fn delete_dish(&self, workspace_id: DbId, id: DbId) -> EngineResult<()> {
        if self.store.delete_dish(workspace_id, id).await? {
            Ok(())
        } else {
            Err(CoreError::NotFound { entity: "Dish", id }.into())
        }
    }

    /// Delete every dish of a workspace. Returns how many were removed.
    pub async fn unload_menu(&self, workspace_id: DbId) -> EngineResult<u64> {
        let removed = self.store.delete_all_dishes(workspace_id).await?;
        tracing::info!(workspace_id, removed, "menu unloaded");
        Ok(removed)
    }

    /// Seed the demo menu. Idempotence guard: refuses (and changes
    /// nothing) when the catalog already has any dish.
    pub async fn load_sample_catalog(&self, workspace_id: DbId) -> EngineResult<()> {
        if self.store.count_dishes(workspace_id).await? > 0 {
            return Err(CoreError::Conflict(
                "Sample catalog not loaded: the menu is not empty".to_string(),
            )
            .into());
        }
        for dish in SAMPLE_MENU {
            self.store
                .insert_dish(&NewDish {
                    workspace_id,
                    name: dish.name.to_string(),
                    prep_time_minutes: dish.prep_time_minutes,
                    image_ref: Some(dish.image_ref.to_string()),
                    ingredients: dish.ingredients.iter().map(|s| s.to_string()).collect(),
                    substitutions: dish
                        .substitutions
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                })
                .await?;
        }
        tracing::info!(workspace_id, dishes = SAMPLE_MENU.len(), "sample catalog loaded");
        Ok(())
    }

    /// Annotate a catalog dish against an allergy set without admitting
    /// anything — the pre-admission "is this dish safe" view.
    pub async fn preview_substitutions(
        &self,
        workspace_id: DbId,
        dish_id: DbId,
        allergies: &[String],
    ) -> EngineResult<Vec<AnnotatedIngredient>> {
        let dish = self
            .store
            .find_dish(workspace_id, dish_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Dish",
                id: dish_id,
            })?;
        let allergies = ingredient::normalize_allergies(allergies, &dish.ingredients);
        Ok(ingredient::annotate(
            &dish.ingredients,
            dish.substitutions(),
            &allergies,
        ))
    }
}

struct SampleDish {
    name: &'static str,
    prep_time_minutes: i32,
    image_ref: &'static str,
    ingredients: &'static [&'static str],
    substitutions: &'static [(&'static str, &'static str)],
}

/// The ten-dish demo menu.
const SAMPLE_MENU: &[SampleDish] = &[
    SampleDish {
        name: "Grilled Steak",
        prep_time_minutes: 20,
        image_ref: "https://images.unsplash.com/photo-1600891964092-4316c288032e?auto=format&fit=crop&w=800&q=80",
        ingredients: &["Meat", "Pepper"],
        substitutions: &[("Meat", "Portobello Steak")],
    },
    SampleDish {
        name: "Pad Thai",
        prep_time_minutes: 12,
        image_ref: "https://images.unsplash.com/photo-1559314809-0d155014e29e?auto=format&fit=crop&w=800&q=80",
        ingredients: &["Peanuts", "Eggs", "Shrimp"],
        substitutions: &[("Peanuts", "Sunflower Seeds"), ("Shrimp", "Tofu")],
    },
    SampleDish {
        name: "Seafood Risotto",
        prep_time_minutes: 25,
        image_ref: "https://images.unsplash.com/photo-1534422298391-e4f8c172dddb?auto=format&fit=crop&w=800&q=80",
        ingredients: &["Shellfish", "Dairy", "Rice"],
        substitutions: &[("Shellfish", "King Oyster Mushroom"), ("Dairy", "Oat Cream")],
    },
    SampleDish {
        name: "Chicken Parmesan",
        prep_time_minutes: 18,
        image_ref: "https://images.unsplash.com/photo-1632778149955-e80f8ceca2e8?auto=format&fit=crop&w=800&q=80",
        ingredients: &["Chicken", "Dairy", "Gluten"],
        substitutions: &[("Dairy", "Cashew Mozzarella"), ("Gluten", "GF Breadcrumbs")],
    },
    SampleDish {
        name: "Caesar Salad",
        prep_time_minutes: 5,
        image_ref: "https://images.unsplash.com/photo-1550304943-4f24f54ddde9?auto=format&fit=crop&w=800&q=80",
        ingredients: &["Dairy", "Nuts", "Lettuce"],
        substitutions: &[("Dairy", "Nutritional Yeast"), ("Nuts", "Toasted Croutons")],
    },
    SampleDish {
        name: "Tomato Basil Soup",
        prep_time_minutes: 8,
        image_ref: "https://images.unsplash.com/photo-1547592166-23acbe3a624b?auto=format&fit=crop&w=800&q=80",
        ingredients: &["Tomatoes", "Garlic"],
        substitutions: &[],
    },
    SampleDish {
        name: "Garlic Bread",
        prep_time_minutes: 4,
        image_ref: "https://images.unsplash.com/photo-1573140247632-f84660f67627?auto=format&fit=crop&w=800&q=80",
        ingredients: &["Gluten", "Dairy", "Garlic"],
        substitutions: &[("Gluten", "GF Baguette"), ("Dairy", "Olive Oil")],
    },
    SampleDish {
        name: "Chocolate Lava Cake",
        prep_time_minutes: 15,
        image_ref: "https://images.unsplash.com/photo-1624353365286-3f8d62daad51?auto=format&fit=crop&w=800&q=80",
        ingredients: &["Dairy", "Gluten", "Chocolate", "Eggs"],
        substitutions: &[("Dairy", "Coconut Butter"), ("Eggs", "Flax Egg")],
    },
    SampleDish {
        name: "Tropical Fruit Platter",
        prep_time_minutes: 6,
        image_ref: "https://images.unsplash.com/photo-1567306301408-9b74779a11af?auto=format&fit=crop&w=800&q=80",
        ingredients: &["Melon", "Berries", "Pineapple"],
        substitutions: &[],
    },
    SampleDish {
        name: "Vanilla Sundae",
        prep_time_minutes: 3,
        image_ref: "https://images.unsplash.com/photo-1563805042-7684c019e1cb?auto=format&fit=crop&w=800&q=80",
        ingredients: &["Dairy", "Sugar"],
        substitutions: &[("Dairy", "Coconut Ice Cream")],
    },
];
