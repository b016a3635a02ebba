pub mod backend;
pub mod cache;
pub mod categories;
pub mod context;
pub mod cooking;
pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod steps;
pub mod types;
pub mod units;

pub use backend::{Backend, BackendConfig, EntityStore, FieldQuery, SortSpec, UploadFile, UploadedFile};
pub use context::{AppContext, CookingInput, CookingView, Dashboard, MealSummary, MealView, RecipeView};
pub use error::{AppError, AppResult, BackendError, ConversionError, ValidationError};
pub use cooking::CookingKey;
pub use filter::{Ownership, RecipeFilters, SearchBy, SortBy};
pub use steps::{parse_steps, steps};
pub use types::{
    Ingredient, Meal, MealFields, Recipe, RecipeFields, RecipeStory, Record, Session, StoryFields,
    User,
};
pub use units::{convert, find_unit, Dimension};
