//! Dish field validation and prep-time revision.

use std::collections::BTreeMap;

use crate::error::CoreError;

/// Maximum length of a dish name.
const MAX_NAME_LEN: usize = 200;

/// Weight given to the historical prep estimate when revising.
const PREP_HISTORY_WEIGHT: f64 = 0.9;

/// Weight given to the newly observed fulfillment time when revising.
const PREP_OBSERVATION_WEIGHT: f64 = 0.1;

/// A revised prep estimate never drops below one minute.
const MIN_PREP_MINUTES: i32 = 1;

/// Validate dish fields prior to insert or update.
///
/// Rules:
/// - Name must not be empty (after trimming) and must not exceed
///   `MAX_NAME_LEN` characters.
/// - Prep time must be strictly positive.
pub fn validate_dish(name: &str, prep_time_minutes: i32) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Dish name must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Dish name must not exceed {MAX_NAME_LEN} characters"
        )));
    }
    if prep_time_minutes <= 0 {
        return Err(CoreError::Validation(
            "Prep time must be a positive number of minutes".to_string(),
        ));
    }
    Ok(())
}

/// Restrict a substitution map to keys present in the ingredient list,
/// trimming replacement values and dropping empty ones.
pub fn filter_substitutions(
    substitutions: BTreeMap<String, String>,
    ingredients: &[String],
) -> BTreeMap<String, String> {
    substitutions
        .into_iter()
        .filter_map(|(ingredient, replacement)| {
            let replacement = replacement.trim().to_string();
            if replacement.is_empty() {
                return None;
            }
            if !ingredients.iter().any(|ing| ing == &ingredient) {
                return None;
            }
            Some((ingredient, replacement))
        })
        .collect()
}

/// Revise a dish's expected prep time from an observed fulfillment time.
///
/// Exponential moving average, 9:1 old:new. Observations under one
/// minute are discarded (accidental double-clicks on the completion
/// button); the result never drops below [`MIN_PREP_MINUTES`].
///
/// Returns `None` when the observation is discarded.
pub fn revise_prep_estimate(current_minutes: i32, observed_minutes: i64) -> Option<i32> {
    if observed_minutes < 1 {
        return None;
    }
    let revised = (f64::from(current_minutes) * PREP_HISTORY_WEIGHT
        + observed_minutes as f64 * PREP_OBSERVATION_WEIGHT)
        .round() as i32;
    Some(revised.max(MIN_PREP_MINUTES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_is_rejected() {
        assert!(validate_dish("", 10).is_err());
        assert!(validate_dish("   ", 10).is_err());
    }

    #[test]
    fn non_positive_prep_time_is_rejected() {
        assert!(validate_dish("Steak", 0).is_err());
        assert!(validate_dish("Steak", -5).is_err());
    }

    #[test]
    fn valid_dish_passes() {
        assert!(validate_dish("Grilled Steak", 20).is_ok());
    }

    #[test]
    fn oversized_name_is_rejected() {
        let name = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_dish(&name, 5).is_err());
    }

    #[test]
    fn substitutions_are_restricted_to_ingredients() {
        let ingredients = vec!["Dairy".to_string(), "Gluten".to_string()];
        let subs = BTreeMap::from([
            ("Dairy".to_string(), " Oat Milk ".to_string()),
            ("Peanuts".to_string(), "Sunflower Seeds".to_string()),
            ("Gluten".to_string(), "   ".to_string()),
        ]);

        let filtered = filter_substitutions(subs, &ingredients);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.get("Dairy").map(String::as_str), Some("Oat Milk"));
    }

    #[test]
    fn prep_revision_blends_nine_to_one() {
        // 0.9 * 20 + 0.1 * 40 = 22
        assert_eq!(revise_prep_estimate(20, 40), Some(22));
    }

    #[test]
    fn prep_revision_discards_sub_minute_observations() {
        assert_eq!(revise_prep_estimate(20, 0), None);
        assert_eq!(revise_prep_estimate(20, -3), None);
    }

    #[test]
    fn prep_revision_never_drops_below_one_minute() {
        assert_eq!(revise_prep_estimate(1, 1), Some(1));
    }
}
