//! Ingredient canonicalization and the allergy substitution resolver.
//!
//! Ingredient lists reach the engine in two shapes: a structured list, or
//! a single comma-delimited string. Both are canonicalized exactly once
//! (at dish upsert or ticket admission) into an ordered `Vec<String>`;
//! nothing downstream ever re-parses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Wire shape for an ingredient list: either already structured, or a
/// comma-delimited string.
///
/// Deserialized untagged so callers can send `["Dairy", "Gluten"]` or
/// `"Dairy, Gluten"` interchangeably.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IngredientsInput {
    /// A structured list of ingredient names.
    List(Vec<String>),
    /// A single comma-delimited string.
    Delimited(String),
}

impl IngredientsInput {
    /// Canonicalize into the single ordered-sequence representation:
    /// entries trimmed, empties dropped, order preserved, duplicates
    /// permitted.
    pub fn canonicalize(self) -> Vec<String> {
        match self {
            IngredientsInput::List(items) => normalize_ingredients(items),
            IngredientsInput::Delimited(s) => {
                normalize_ingredients(s.split(',').map(str::to_string))
            }
        }
    }
}

impl Default for IngredientsInput {
    fn default() -> Self {
        IngredientsInput::List(Vec::new())
    }
}

/// Trim every entry, drop empties, preserve order. Duplicates are kept:
/// ingredient order and multiplicity are recipe-significant.
pub fn normalize_ingredients<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    raw.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Canonicalize a requested-allergy set against an ingredient snapshot.
///
/// Entries are trimmed; empties dropped; duplicates collapsed
/// case-insensitively (first spelling wins); entries matching no
/// ingredient are dropped, keeping the stored set a subset of the
/// snapshot.
pub fn normalize_allergies(raw: &[String], ingredients: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for entry in raw {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.iter().any(|s| s.eq_ignore_ascii_case(trimmed)) {
            continue;
        }
        if ingredients
            .iter()
            .any(|ing| ing.trim().eq_ignore_ascii_case(trimmed))
        {
            seen.push(trimmed.to_string());
        }
    }
    seen
}

/// One ingredient of a dish, annotated against a requested-allergy set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedIngredient {
    /// Ingredient name as it appears in the dish snapshot.
    pub name: String,
    /// Whether this ingredient is in the requested-allergy set.
    pub excluded: bool,
    /// Suggested replacement from the dish's substitution map, if any.
    pub substitute: Option<String>,
}

/// Annotate each ingredient of a dish against a requested-allergy set.
///
/// Pure and stateless. Allergy matching is case-insensitive on the
/// trimmed names; the substitute is attached whenever the substitution
/// map carries the ingredient, excluded or not.
pub fn annotate(
    ingredients: &[String],
    substitutions: &BTreeMap<String, String>,
    allergies: &[String],
) -> Vec<AnnotatedIngredient> {
    ingredients
        .iter()
        .map(|ing| {
            let excluded = allergies
                .iter()
                .any(|a| a.trim().eq_ignore_ascii_case(ing.trim()));
            AnnotatedIngredient {
                name: ing.clone(),
                excluded,
                substitute: substitutions.get(ing).cloned(),
            }
        })
        .collect()
}
