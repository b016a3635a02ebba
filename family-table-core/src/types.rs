//! Typed copies of the backend's documents.
//!
//! The backend stores loosely shaped JSON. Documents are mapped to these
//! records at the boundary, with missing optional fields taking the same
//! defaults the recipe form starts from.

use crate::categories::normalize_categories;
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DIFFICULTY: u8 = 3;
pub const DEFAULT_ESTIMATED_TIME: u32 = 30;
pub const DEFAULT_SERVINGS: u32 = 4;
pub const MAX_DIFFICULTY: u8 = 5;

/// A stored document: backend-assigned metadata plus the entity's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<F> {
    pub id: String,
    /// Email of the user who created the document.
    pub created_by: String,
    pub created_date: DateTime<Utc>,
    #[serde(flatten)]
    pub data: F,
}

impl<F> Record<F> {
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.created_by == email
    }
}

pub type Recipe = Record<RecipeFields>;
pub type Meal = Record<MealFields>;
pub type RecipeStory = Record<StoryFields>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFields {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default)]
    pub full_instructions: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty_level: u8,
    /// Minutes.
    #[serde(default = "default_estimated_time")]
    pub estimated_time: u32,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default)]
    pub media_urls: Vec<String>,
}

fn default_difficulty() -> u8 {
    DEFAULT_DIFFICULTY
}

fn default_estimated_time() -> u32 {
    DEFAULT_ESTIMATED_TIME
}

fn default_servings() -> u32 {
    DEFAULT_SERVINGS
}

impl Default for RecipeFields {
    fn default() -> Self {
        Self {
            title: String::new(),
            short_description: None,
            full_instructions: String::new(),
            ingredients: Vec::new(),
            categories: Vec::new(),
            difficulty_level: DEFAULT_DIFFICULTY,
            estimated_time: DEFAULT_ESTIMATED_TIME,
            servings: DEFAULT_SERVINGS,
            media_urls: Vec::new(),
        }
    }
}

impl RecipeFields {
    /// Check required fields and ranges, then tidy what can be tidied.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.full_instructions.trim().is_empty() {
            return Err(ValidationError::MissingField("fullInstructions"));
        }
        if !(1..=MAX_DIFFICULTY).contains(&self.difficulty_level) {
            return Err(ValidationError::OutOfRange {
                field: "difficultyLevel",
                min: 1,
                max: MAX_DIFFICULTY as u32,
            });
        }
        if self.estimated_time == 0 {
            return Err(ValidationError::OutOfRange {
                field: "estimatedTime",
                min: 1,
                max: u32::MAX,
            });
        }
        if self.servings == 0 {
            return Err(ValidationError::OutOfRange {
                field: "servings",
                min: 1,
                max: u32::MAX,
            });
        }
        for (index, ingredient) in self.ingredients.iter().enumerate() {
            if ingredient.name.trim().is_empty() {
                return Err(ValidationError::InvalidIngredient {
                    index,
                    reason: "name is required".to_string(),
                });
            }
            if !ingredient.quantity.is_finite() || ingredient.quantity <= 0.0 {
                return Err(ValidationError::InvalidIngredient {
                    index,
                    reason: "quantity must be greater than zero".to_string(),
                });
            }
        }

        self.title = self.title.trim().to_string();
        self.short_description = non_blank(self.short_description);
        self.categories = normalize_categories(self.categories);
        self.media_urls.retain(|u| !u.trim().is_empty());
        Ok(self)
    }

    /// First image, used as the card thumbnail.
    pub fn thumbnail(&self) -> Option<&str> {
        self.media_urls.first().map(String::as_str)
    }

    /// Five slots, the first `difficulty_level` of them filled.
    pub fn difficulty_stars(&self) -> [bool; 5] {
        std::array::from_fn(|i| i < self.difficulty_level as usize)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealFields {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub recipe_ids: Vec<String>,
}

impl MealFields {
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        self.name = self.name.trim().to_string();
        self.description = non_blank(self.description);
        let mut seen = std::collections::HashSet::new();
        self.recipe_ids.retain(|id| seen.insert(id.clone()));
        Ok(self)
    }

    pub fn contains(&self, recipe_id: &str) -> bool {
        self.recipe_ids.iter().any(|id| id == recipe_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryFields {
    #[serde(default)]
    pub recipe_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

impl StoryFields {
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        if self.recipe_id.trim().is_empty() {
            return Err(ValidationError::MissingField("recipeId"));
        }
        if self.text.trim().is_empty() {
            return Err(ValidationError::MissingField("text"));
        }
        self.author_name = non_blank(self.author_name);
        self.media_url = non_blank(self.media_url);
        Ok(self)
    }
}

impl RecipeStory {
    pub fn display_author(&self) -> &str {
        self.data.author_name.as_deref().unwrap_or("Anonymous")
    }

    pub fn avatar_initial(&self) -> char {
        self.data
            .author_name
            .as_deref()
            .and_then(first_char)
            .or_else(|| first_char(&self.created_by))
            .unwrap_or('A')
    }
}

/// The signed-in user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }

    pub fn initial(&self) -> char {
        first_char(self.display_name()).unwrap_or('U')
    }
}

/// Credentials for one request: the bearer token and who it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn first_char(s: &str) -> Option<char> {
    s.chars().next().map(|c| c.to_ascii_uppercase())
}
