//! JSON shapes of the HTTP API, converted to and from the core records.

use chrono::{DateTime, Utc};
use family_table_core::types::{
    DEFAULT_DIFFICULTY, DEFAULT_ESTIMATED_TIME, DEFAULT_SERVINGS,
};
use family_table_core::{Meal, MealFields, Recipe, RecipeFields, RecipeStory, StoryFields, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl From<family_table_core::Ingredient> for Ingredient {
    fn from(i: family_table_core::Ingredient) -> Self {
        Self {
            name: i.name,
            quantity: i.quantity,
            unit: i.unit,
        }
    }
}

impl From<Ingredient> for family_table_core::Ingredient {
    fn from(i: Ingredient) -> Self {
        Self {
            name: i.name,
            quantity: i.quantity,
            unit: i.unit,
        }
    }
}

/// Editable recipe fields, used by both create and update.
/// Omitted numbers take the editor's defaults (difficulty 3, 30 minutes, 4 servings).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RecipeContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub full_instructions: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub categories: Vec<String>,
    /// 1 (easy) to 5 (hard)
    #[serde(default)]
    pub difficulty_level: Option<u8>,
    /// Minutes
    #[serde(default)]
    pub estimated_time: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub media_urls: Vec<String>,
}

impl From<RecipeContent> for RecipeFields {
    fn from(c: RecipeContent) -> Self {
        Self {
            title: c.title,
            short_description: c.short_description,
            full_instructions: c.full_instructions,
            ingredients: c.ingredients.into_iter().map(Into::into).collect(),
            categories: c.categories,
            difficulty_level: c.difficulty_level.unwrap_or(DEFAULT_DIFFICULTY),
            estimated_time: c.estimated_time.unwrap_or(DEFAULT_ESTIMATED_TIME),
            servings: c.servings.unwrap_or(DEFAULT_SERVINGS),
            media_urls: c.media_urls,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: String,
    pub created_by: String,
    pub created_date: DateTime<Utc>,
    pub title: String,
    pub short_description: Option<String>,
    pub full_instructions: String,
    pub ingredients: Vec<Ingredient>,
    pub categories: Vec<String>,
    pub difficulty_level: u8,
    pub estimated_time: u32,
    pub servings: u32,
    pub media_urls: Vec<String>,
    /// First media URL, if any
    pub thumbnail: Option<String>,
}

impl From<Recipe> for RecipeResponse {
    fn from(r: Recipe) -> Self {
        let thumbnail = r.data.thumbnail().map(str::to_string);
        let d = r.data;
        Self {
            id: r.id,
            created_by: r.created_by,
            created_date: r.created_date,
            title: d.title,
            short_description: d.short_description,
            full_instructions: d.full_instructions,
            ingredients: d.ingredients.into_iter().map(Into::into).collect(),
            categories: d.categories,
            difficulty_level: d.difficulty_level,
            estimated_time: d.estimated_time,
            servings: d.servings,
            media_urls: d.media_urls,
            thumbnail,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct MealContent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub recipe_ids: Vec<String>,
}

impl From<MealContent> for MealFields {
    fn from(c: MealContent) -> Self {
        Self {
            name: c.name,
            description: c.description,
            recipe_ids: c.recipe_ids,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MealResponse {
    pub id: String,
    pub created_by: String,
    pub created_date: DateTime<Utc>,
    pub name: String,
    pub description: Option<String>,
    pub recipe_ids: Vec<String>,
}

impl From<Meal> for MealResponse {
    fn from(m: Meal) -> Self {
        Self {
            id: m.id,
            created_by: m.created_by,
            created_date: m.created_date,
            name: m.data.name,
            description: m.data.description,
            recipe_ids: m.data.recipe_ids,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct StoryContent {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
}

impl From<StoryContent> for StoryFields {
    fn from(c: StoryContent) -> Self {
        Self {
            recipe_id: String::new(),
            text: c.text,
            author_name: c.author_name,
            media_url: c.media_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoryResponse {
    pub id: String,
    pub created_by: String,
    pub created_date: DateTime<Utc>,
    pub recipe_id: String,
    pub text: String,
    pub author_name: Option<String>,
    /// Author name, or "Anonymous"
    pub display_author: String,
    pub avatar_initial: String,
    pub media_url: Option<String>,
}

impl From<RecipeStory> for StoryResponse {
    fn from(s: RecipeStory) -> Self {
        let display_author = s.display_author().to_string();
        let avatar_initial = s.avatar_initial().to_string();
        Self {
            id: s.id,
            created_by: s.created_by,
            created_date: s.created_date,
            recipe_id: s.data.recipe_id,
            text: s.data.text,
            author_name: s.data.author_name,
            display_author,
            avatar_initial,
            media_url: s.data.media_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub email: String,
    pub full_name: Option<String>,
    /// Full name, falling back to email
    pub display_name: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            display_name: u.display_name().to_string(),
            email: u.email,
            full_name: u.full_name,
        }
    }
}
