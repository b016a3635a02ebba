//! Backend smoke checks: create one sample document of each kind and report
//! the outcome. Failures are reported in the result, never raised.

use crate::context::AppContext;
use crate::types::{Ingredient, MealFields, RecipeFields, Session, StoryFields};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCheck {
    Recipe,
    Story,
    Meal,
}

impl DiagnosticCheck {
    pub const ALL: [DiagnosticCheck; 3] = [
        DiagnosticCheck::Recipe,
        DiagnosticCheck::Story,
        DiagnosticCheck::Meal,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DiagnosticResult {
    fn from_outcome<T: Serialize, E: std::fmt::Display>(outcome: Result<T, E>) -> Self {
        match outcome.map(serde_json::to_value) {
            Ok(Ok(data)) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Ok(Err(e)) => Self::failed(e.to_string()),
            Err(e) => Self::failed(e.to_string()),
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

pub const NO_RECIPES_MESSAGE: &str = "No recipes found. Create a recipe first.";

pub async fn run_check(ctx: &AppContext, session: &Session, check: DiagnosticCheck) -> DiagnosticResult {
    let stamp = Utc::now().timestamp_millis();

    let result = match check {
        DiagnosticCheck::Recipe => {
            let fields = sample_recipe(stamp);
            DiagnosticResult::from_outcome(ctx.save_recipe(session, None, fields).await)
        }
        DiagnosticCheck::Story => match ctx.recipes(session).await {
            Ok(recipes) => match recipes.first() {
                Some(recipe) => {
                    let fields = StoryFields {
                        text: "This is a test story".to_string(),
                        author_name: Some("Test Author".to_string()),
                        ..Default::default()
                    };
                    DiagnosticResult::from_outcome(ctx.add_story(session, &recipe.id, fields).await)
                }
                None => DiagnosticResult::failed(NO_RECIPES_MESSAGE.to_string()),
            },
            Err(e) => DiagnosticResult::failed(e.to_string()),
        },
        DiagnosticCheck::Meal => {
            let fields = MealFields {
                name: format!("Test Meal {}", stamp),
                description: Some("A test meal collection".to_string()),
                recipe_ids: Vec::new(),
            };
            DiagnosticResult::from_outcome(ctx.create_meal(session, fields).await)
        }
    };

    if result.success {
        tracing::info!(?check, "diagnostic check passed");
    } else {
        tracing::warn!(?check, error = ?result.error, "diagnostic check failed");
    }
    result
}

fn sample_recipe(stamp: i64) -> RecipeFields {
    RecipeFields {
        title: format!("Test Recipe {}", stamp),
        short_description: Some("A test recipe".to_string()),
        full_instructions: "Step 1: Test\nStep 2: Done".to_string(),
        ingredients: vec![Ingredient {
            name: "Test Ingredient".to_string(),
            quantity: 1.0,
            unit: "cup".to_string(),
        }],
        categories: vec!["test".to_string()],
        ..Default::default()
    }
}
