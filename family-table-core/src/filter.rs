//! Filtering, sorting, and searching over an already-loaded recipe list.
//!
//! Everything here is pure: the full list is fetched once and narrowed in
//! memory.

use crate::types::{Meal, Recipe};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Whose recipes to show.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    #[default]
    All,
    Mine,
    Others,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Newest first
    #[default]
    Recent,
    /// Easiest first
    Difficulty,
    /// Quickest first
    Time,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchBy {
    #[default]
    Title,
    Ingredient,
    Category,
}

/// Dashboard filter state. `None` means "all" for category and difficulty.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeFilters {
    pub show: Ownership,
    pub category: Option<String>,
    pub difficulty: Option<u8>,
    pub sort_by: SortBy,
}

impl RecipeFilters {
    fn matches(&self, recipe: &Recipe, current_user: Option<&str>) -> bool {
        let owner_ok = match (self.show, current_user) {
            (Ownership::All, _) => true,
            (Ownership::Mine, Some(email)) => recipe.is_owned_by(email),
            (Ownership::Mine, None) => false,
            (Ownership::Others, Some(email)) => !recipe.is_owned_by(email),
            (Ownership::Others, None) => true,
        };
        let category_ok = self
            .category
            .as_ref()
            .is_none_or(|c| recipe.data.categories.contains(c));
        let difficulty_ok = self
            .difficulty
            .is_none_or(|d| recipe.data.difficulty_level == d);

        owner_ok && category_ok && difficulty_ok
    }
}

/// Apply ownership, category, and difficulty filters, then sort.
///
/// The sort is stable, so recipes that tie keep their input order.
pub fn apply_filters<'a>(
    recipes: &'a [Recipe],
    filters: &RecipeFilters,
    current_user: Option<&str>,
) -> Vec<&'a Recipe> {
    let mut out: Vec<&Recipe> = recipes
        .iter()
        .filter(|r| filters.matches(r, current_user))
        .collect();
    sort_recipes(&mut out, filters.sort_by);
    out
}

pub fn sort_recipes(recipes: &mut [&Recipe], sort_by: SortBy) {
    match sort_by {
        SortBy::Recent => recipes.sort_by_key(|r| Reverse(r.created_date)),
        SortBy::Difficulty => recipes.sort_by_key(|r| r.data.difficulty_level),
        SortBy::Time => recipes.sort_by_key(|r| r.data.estimated_time),
    }
}

/// Case-insensitive substring search on one field. A blank query matches everything;
/// otherwise surrounding whitespace is part of the needle.
pub fn search<'a>(recipes: &'a [Recipe], query: &str, by: SearchBy) -> Vec<&'a Recipe> {
    if query.trim().is_empty() {
        return recipes.iter().collect();
    }
    let needle = query.to_lowercase();

    recipes
        .iter()
        .filter(|r| match by {
            SearchBy::Title => r.data.title.to_lowercase().contains(&needle),
            SearchBy::Ingredient => r
                .data
                .ingredients
                .iter()
                .any(|i| i.name.to_lowercase().contains(&needle)),
            SearchBy::Category => r
                .data
                .categories
                .iter()
                .any(|c| c.to_lowercase().contains(&needle)),
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OwnerCounts {
    pub total: usize,
    pub mine: usize,
    pub community: usize,
}

pub fn owner_counts(recipes: &[Recipe], current_user: Option<&str>) -> OwnerCounts {
    let mine = current_user
        .map(|email| recipes.iter().filter(|r| r.is_owned_by(email)).count())
        .unwrap_or(0);
    OwnerCounts {
        total: recipes.len(),
        mine,
        community: recipes.len() - mine,
    }
}

/// Recipes that could be added to `meal`, optionally narrowed by title. The query
/// is matched as typed, spaces included.
pub fn available_for_meal<'a>(recipes: &'a [Recipe], meal: &Meal, query: &str) -> Vec<&'a Recipe> {
    let needle = query.to_lowercase();
    recipes
        .iter()
        .filter(|r| !meal.data.contains(&r.id))
        .filter(|r| needle.is_empty() || r.data.title.to_lowercase().contains(&needle))
        .collect()
}

/// Resolve a meal's recipe ids in order, skipping ids with no loaded recipe.
pub fn resolve_meal_recipes<'a>(recipes: &'a [Recipe], meal: &Meal) -> Vec<&'a Recipe> {
    meal.data
        .recipe_ids
        .iter()
        .filter_map(|id| recipes.iter().find(|r| r.id == *id))
        .collect()
}
