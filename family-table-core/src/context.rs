//! Application operations over the backend, with cached reads.
//!
//! `AppContext` is shared by every request. Each operation takes the caller's
//! [`Session`] explicitly; reads go through the [`QueryCache`] and every
//! mutation invalidates the lists it affects.

use crate::backend::{Backend, FieldQuery, SortSpec, UploadFile, UploadedFile};
use crate::cache::{QueryCache, QueryKey};
use crate::cooking::{ingredient_preview, CookingAction, CookingKey, CookingSession};
use crate::error::{AppError, AppResult, BackendError, ValidationError};
use crate::filter::{
    apply_filters, available_for_meal, owner_counts, resolve_meal_recipes, search, OwnerCounts,
    RecipeFilters, SearchBy,
};
use crate::steps::parse_steps;
use crate::types::{Meal, MealFields, Recipe, RecipeFields, RecipeStory, Session, StoryFields};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info_span, Instrument};

/// Recipe titles shown on a meal card before "+N more".
pub const MEAL_CARD_PREVIEW: usize = 3;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub recipes: Vec<Recipe>,
    pub counts: OwnerCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub steps: Vec<String>,
    pub stories: Vec<RecipeStory>,
    pub is_owner: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealSummary {
    pub meal: Meal,
    /// The meal's recipes that still exist, in meal order.
    pub recipes: Vec<Recipe>,
}

impl MealSummary {
    /// Up to three titles, plus how many more are not shown.
    pub fn preview_titles(&self) -> (Vec<&str>, usize) {
        let titles = self
            .recipes
            .iter()
            .take(MEAL_CARD_PREVIEW)
            .map(|r| r.data.title.as_str())
            .collect();
        (titles, self.recipes.len().saturating_sub(MEAL_CARD_PREVIEW))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MealView {
    pub meal: Meal,
    pub recipes: Vec<Recipe>,
    /// Recipes not yet in the meal, matching the picker's query.
    pub available: Vec<Recipe>,
    pub is_owner: bool,
}

/// Where the cook is, what they have ticked off, and what they just did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookingInput {
    pub step: usize,
    pub completed: Vec<usize>,
    /// Flip the completed mark on `step` before `key` is applied.
    pub toggle: bool,
    pub key: Option<CookingKey>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CookingView {
    pub recipe_id: String,
    pub title: String,
    pub step_index: usize,
    pub total_steps: usize,
    pub step: Option<String>,
    pub progress_percent: f64,
    pub is_first: bool,
    pub is_last: bool,
    pub completed: Vec<usize>,
    /// Only filled on the first step.
    pub ingredients_preview: Vec<String>,
    /// Escape was pressed; leave cooking mode.
    pub exit: bool,
}

pub struct AppContext {
    backend: Backend,
    cache: QueryCache,
}

impl AppContext {
    pub fn new(backend: Backend) -> Self {
        Self::with_cache(backend, QueryCache::new())
    }

    pub fn with_cache(backend: Backend, cache: QueryCache) -> Self {
        Self { backend, cache }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    // ---- Auth ----

    /// Resolve a bearer token to a session.
    pub async fn authenticate(&self, token: &str) -> AppResult<Session> {
        let user = self
            .backend
            .auth
            .me(token)
            .instrument(info_span!("backend.call", entity = "User", op = "me"))
            .await?;
        Ok(Session::new(token, user))
    }

    pub fn login_url(&self, return_path: &str) -> String {
        self.backend.auth.login_url(return_path)
    }

    pub async fn logout(&self, session: &Session) -> AppResult<()> {
        self.backend.auth.logout(&session.token).await?;
        Ok(())
    }

    // ---- Recipes ----

    pub async fn recipes(&self, session: &Session) -> AppResult<Arc<Vec<Recipe>>> {
        if let Some(cached) = self.cache.get::<Vec<Recipe>>(&QueryKey::Recipes) {
            return Ok(cached);
        }
        let ticket = self.cache.ticket();
        let recipes = Arc::new(
            self.backend
                .recipes
                .list(session, &SortSpec::newest_first())
                .await?,
        );
        self.cache.fill(QueryKey::Recipes, ticket, recipes.clone());
        Ok(recipes)
    }

    pub async fn recipe(&self, session: &Session, id: &str) -> AppResult<Recipe> {
        self.recipes(session)
            .await?
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found("Recipe", id))
    }

    pub async fn dashboard(&self, session: &Session, filters: &RecipeFilters) -> AppResult<Dashboard> {
        let all = self.recipes(session).await?;
        let email = Some(session.email());
        Ok(Dashboard {
            recipes: apply_filters(&all, filters, email)
                .into_iter()
                .cloned()
                .collect(),
            counts: owner_counts(&all, email),
        })
    }

    pub async fn search(&self, session: &Session, query: &str, by: SearchBy) -> AppResult<Vec<Recipe>> {
        let all = self.recipes(session).await?;
        Ok(search(&all, query, by).into_iter().cloned().collect())
    }

    pub async fn recipe_view(&self, session: &Session, id: &str) -> AppResult<RecipeView> {
        let recipe = self.recipe(session, id).await?;
        let stories = self.stories(session, id).await?;
        Ok(RecipeView {
            steps: parse_steps(&recipe.data.full_instructions),
            is_owner: recipe.is_owned_by(session.email()),
            stories: stories.to_vec(),
            recipe,
        })
    }

    /// Create a recipe, or replace one the caller owns when `id` is given.
    pub async fn save_recipe(
        &self,
        session: &Session,
        id: Option<&str>,
        fields: RecipeFields,
    ) -> AppResult<Recipe> {
        let fields = fields.validate()?;

        let saved = match id {
            Some(id) => {
                let existing = self.recipe(session, id).await?;
                ensure_owner(&existing.created_by, session, "recipe")?;
                self.backend.recipes.update(session, id, &fields).await?
            }
            None => self.backend.recipes.create(session, &fields).await?,
        };

        self.cache.invalidate(&QueryKey::Recipes);
        tracing::info!(recipe_id = %saved.id, created = id.is_none(), "recipe saved");
        Ok(saved)
    }

    /// Meals that reference the recipe keep its id; views skip it.
    pub async fn delete_recipe(&self, session: &Session, id: &str) -> AppResult<()> {
        let existing = self.recipe(session, id).await?;
        ensure_owner(&existing.created_by, session, "recipe")?;

        self.backend.recipes.delete(session, id).await?;
        self.cache.invalidate(&QueryKey::Recipes);
        self.cache.invalidate(&QueryKey::Stories {
            recipe_id: id.to_string(),
        });
        tracing::info!(recipe_id = %id, "recipe deleted");
        Ok(())
    }

    pub async fn cooking(
        &self,
        session: &Session,
        id: &str,
        input: &CookingInput,
    ) -> AppResult<CookingView> {
        let recipe = self.recipe(session, id).await?;
        let mut cooking = CookingSession::for_recipe(&recipe.data);
        cooking.jump_to(input.step);
        cooking.set_completed(input.completed.iter().copied());
        if input.toggle {
            cooking.toggle_complete();
        }
        let exit = input
            .key
            .is_some_and(|key| cooking.handle_key(key) == CookingAction::Exit);

        let ingredients_preview = if cooking.is_first() {
            ingredient_preview(&recipe.data)
                .into_iter()
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };

        Ok(CookingView {
            step_index: cooking.current(),
            total_steps: cooking.steps().len(),
            step: cooking.current_step().map(str::to_string),
            progress_percent: cooking.progress_percent(),
            is_first: cooking.is_first(),
            is_last: cooking.is_last(),
            completed: cooking.completed().collect(),
            ingredients_preview,
            exit,
            recipe_id: recipe.id,
            title: recipe.data.title,
        })
    }

    // ---- Stories ----

    /// Stories of an existing recipe, newest first.
    pub async fn stories(&self, session: &Session, recipe_id: &str) -> AppResult<Arc<Vec<RecipeStory>>> {
        let key = QueryKey::Stories {
            recipe_id: recipe_id.to_string(),
        };
        if let Some(cached) = self.cache.get::<Vec<RecipeStory>>(&key) {
            return Ok(cached);
        }
        let ticket = self.cache.ticket();
        self.recipe(session, recipe_id).await?;
        let query = FieldQuery::new().eq("recipeId", recipe_id);
        let stories = Arc::new(
            self.backend
                .stories
                .filter(session, &query, &SortSpec::newest_first())
                .await?,
        );
        self.cache.fill(key, ticket, stories.clone());
        Ok(stories)
    }

    /// Anyone signed in may add a story to any recipe.
    pub async fn add_story(
        &self,
        session: &Session,
        recipe_id: &str,
        mut fields: StoryFields,
    ) -> AppResult<RecipeStory> {
        self.recipe(session, recipe_id).await?;
        fields.recipe_id = recipe_id.to_string();
        let fields = fields.validate()?;

        let story = self.backend.stories.create(session, &fields).await?;
        self.cache.invalidate(&QueryKey::Stories {
            recipe_id: recipe_id.to_string(),
        });
        Ok(story)
    }

    // ---- Meals ----

    /// Every meal the backend lets this user see, newest first.
    async fn visible_meals(&self, session: &Session) -> AppResult<Arc<Vec<Meal>>> {
        let key = QueryKey::Meals {
            user: session.email().to_string(),
        };
        if let Some(cached) = self.cache.get::<Vec<Meal>>(&key) {
            return Ok(cached);
        }
        let ticket = self.cache.ticket();
        let meals = Arc::new(
            self.backend
                .meals
                .list(session, &SortSpec::newest_first())
                .await?,
        );
        self.cache.fill(key, ticket, meals.clone());
        Ok(meals)
    }

    /// The caller's own meals.
    pub async fn meals(&self, session: &Session) -> AppResult<Vec<Meal>> {
        Ok(self
            .visible_meals(session)
            .await?
            .iter()
            .filter(|m| m.is_owned_by(session.email()))
            .cloned()
            .collect())
    }

    pub async fn my_meals(&self, session: &Session) -> AppResult<Vec<MealSummary>> {
        let meals = self.meals(session).await?;
        let recipes = self.recipes(session).await?;
        Ok(meals
            .into_iter()
            .map(|meal| MealSummary {
                recipes: resolve_meal_recipes(&recipes, &meal)
                    .into_iter()
                    .cloned()
                    .collect(),
                meal,
            })
            .collect())
    }

    /// One of the caller's meals. Other people's meals are not found.
    pub async fn meal(&self, session: &Session, id: &str) -> AppResult<Meal> {
        self.visible_meals(session)
            .await?
            .iter()
            .find(|m| m.id == id && m.is_owned_by(session.email()))
            .cloned()
            .ok_or_else(|| not_found("Meal", id))
    }

    pub async fn meal_view(&self, session: &Session, id: &str, query: &str) -> AppResult<MealView> {
        let meal = self.meal(session, id).await?;
        let recipes = self.recipes(session).await?;
        Ok(MealView {
            recipes: resolve_meal_recipes(&recipes, &meal)
                .into_iter()
                .cloned()
                .collect(),
            available: available_for_meal(&recipes, &meal, query)
                .into_iter()
                .cloned()
                .collect(),
            is_owner: meal.is_owned_by(session.email()),
            meal,
        })
    }

    pub async fn create_meal(&self, session: &Session, fields: MealFields) -> AppResult<Meal> {
        let fields = fields.validate()?;
        let meal = self.backend.meals.create(session, &fields).await?;
        self.cache.invalidate_meals();
        tracing::info!(meal_id = %meal.id, "meal created");
        Ok(meal)
    }

    pub async fn delete_meal(&self, session: &Session, id: &str) -> AppResult<()> {
        let meal = self.meal(session, id).await?;
        self.backend.meals.delete(session, id).await?;
        self.cache.invalidate_meals();
        Ok(())
    }

    /// Adding a recipe already in the meal leaves it unchanged.
    pub async fn add_recipe_to_meal(&self, session: &Session, meal_id: &str, recipe_id: &str) -> AppResult<Meal> {
        let meal = self.meal(session, meal_id).await?;
        self.recipe(session, recipe_id).await?;

        if meal.data.contains(recipe_id) {
            return Ok(meal);
        }
        let mut fields = meal.data;
        fields.recipe_ids.push(recipe_id.to_string());
        self.replace_meal(session, meal_id, fields).await
    }

    pub async fn remove_recipe_from_meal(
        &self,
        session: &Session,
        meal_id: &str,
        recipe_id: &str,
    ) -> AppResult<Meal> {
        let meal = self.meal(session, meal_id).await?;

        if !meal.data.contains(recipe_id) {
            return Ok(meal);
        }
        let mut fields = meal.data;
        fields.recipe_ids.retain(|id| id != recipe_id);
        self.replace_meal(session, meal_id, fields).await
    }

    async fn replace_meal(&self, session: &Session, id: &str, fields: MealFields) -> AppResult<Meal> {
        let fields = fields.validate()?;
        let meal = self.backend.meals.update(session, id, &fields).await?;
        self.cache.invalidate_meals();
        Ok(meal)
    }

    // ---- Files ----

    pub async fn upload(&self, session: &Session, file: UploadFile) -> AppResult<UploadedFile> {
        if file.bytes.is_empty() {
            return Err(ValidationError::MissingField("file").into());
        }
        if file.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ValidationError::TooLarge {
                field: "file",
                max_bytes: MAX_UPLOAD_BYTES,
            }
            .into());
        }
        let uploaded = self.backend.files.upload(session, file).await?;
        tracing::info!(file_url = %uploaded.file_url, "file uploaded");
        Ok(uploaded)
    }
}

fn not_found(kind: &'static str, id: &str) -> AppError {
    BackendError::NotFound {
        kind,
        id: id.to_string(),
    }
    .into()
}

fn ensure_owner(created_by: &str, session: &Session, what: &'static str) -> AppResult<()> {
    if created_by != session.email() {
        return Err(AppError::Forbidden(what));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryAuth;
    use crate::types::User;

    fn session(email: &str) -> Session {
        Session::new(
            format!("token-{}", email),
            User {
                email: email.to_string(),
                full_name: None,
            },
        )
    }

    fn context() -> AppContext {
        AppContext::new(Backend::in_memory(MemoryAuth::new()))
    }

    #[tokio::test]
    async fn test_preview_titles() {
        let ctx = context();
        let me = session("me@example.com");
        let mut recipes = Vec::new();
        for i in 0..5 {
            let fields = RecipeFields {
                title: format!("Dish {}", i),
                full_instructions: "Cook".to_string(),
                ..Default::default()
            };
            recipes.push(ctx.save_recipe(&me, None, fields).await.unwrap());
        }
        let summary = MealSummary {
            meal: ctx
                .create_meal(
                    &me,
                    MealFields {
                        name: "Feast".to_string(),
                        ..Default::default()
                    },
                )
                .await
                .unwrap(),
            recipes,
        };
        let (titles, more) = summary.preview_titles();
        assert_eq!(titles, vec!["Dish 0", "Dish 1", "Dish 2"]);
        assert_eq!(more, 2);
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_file() {
        let ctx = context();
        let err = ctx
            .upload(
                &session("me@example.com"),
                UploadFile {
                    file_name: "x.jpg".to_string(),
                    content_type: None,
                    bytes: vec![],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::MissingField("file"))
        ));
    }
}
