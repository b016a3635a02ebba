//! Step-by-step cooking mode.

use crate::steps::parse_steps;
use crate::types::RecipeFields;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ingredient names listed on the first step.
pub const INGREDIENT_PREVIEW_LIMIT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookingKey {
    ArrowRight,
    ArrowLeft,
    Space,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookingAction {
    Moved,
    Unchanged,
    Exit,
}

/// Tracks the current step and which steps the cook has ticked off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookingSession {
    steps: Vec<String>,
    current: usize,
    completed: BTreeSet<usize>,
}

impl CookingSession {
    pub fn new(steps: Vec<String>) -> Self {
        Self {
            steps,
            current: 0,
            completed: BTreeSet::new(),
        }
    }

    pub fn for_recipe(recipe: &RecipeFields) -> Self {
        Self::new(parse_steps(&recipe.full_instructions))
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> Option<&str> {
        self.steps.get(self.current).map(String::as_str)
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.steps.len()
    }

    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Move to `index`, clamped to the last step.
    pub fn jump_to(&mut self, index: usize) {
        self.current = index.min(self.steps.len().saturating_sub(1));
    }

    /// Flip the completed mark on the current step.
    pub fn toggle_complete(&mut self) -> bool {
        if self.steps.is_empty() {
            return false;
        }
        if !self.completed.remove(&self.current) {
            self.completed.insert(self.current);
        }
        self.completed.contains(&self.current)
    }

    /// Mark the given step indices completed; out-of-range indices are ignored.
    pub fn set_completed(&mut self, indices: impl IntoIterator<Item = usize>) {
        let len = self.steps.len();
        self.completed = indices.into_iter().filter(|&i| i < len).collect();
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    pub fn completed(&self) -> impl Iterator<Item = usize> + '_ {
        self.completed.iter().copied()
    }

    pub fn progress_percent(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        (self.current + 1) as f64 / self.steps.len() as f64 * 100.0
    }

    pub fn handle_key(&mut self, key: CookingKey) -> CookingAction {
        let moved = match key {
            CookingKey::ArrowRight | CookingKey::Space => self.next(),
            CookingKey::ArrowLeft => self.previous(),
            CookingKey::Escape => return CookingAction::Exit,
        };
        if moved {
            CookingAction::Moved
        } else {
            CookingAction::Unchanged
        }
    }
}

/// Names shown under "You'll need" on the first step.
pub fn ingredient_preview(recipe: &RecipeFields) -> Vec<&str> {
    recipe
        .ingredients
        .iter()
        .take(INGREDIENT_PREVIEW_LIMIT)
        .map(|i| i.name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Ingredient;

    fn session(n: usize) -> CookingSession {
        CookingSession::new((1..=n).map(|i| format!("step {}", i)).collect())
    }

    #[test]
    fn test_navigation_bounds() {
        let mut s = session(3);
        assert!(!s.previous());
        assert!(s.next());
        assert!(s.next());
        assert!(s.is_last());
        assert!(!s.next());
        assert_eq!(s.current(), 2);
    }

    #[test]
    fn test_progress() {
        let mut s = session(4);
        assert_eq!(s.progress_percent(), 25.0);
        s.jump_to(99);
        assert_eq!(s.current(), 3);
        assert_eq!(s.progress_percent(), 100.0);
        assert_eq!(CookingSession::new(vec![]).progress_percent(), 0.0);
    }

    #[test]
    fn test_toggle_complete() {
        let mut s = session(2);
        assert!(s.toggle_complete());
        assert!(s.is_completed(0));
        assert!(!s.toggle_complete());
        assert!(!s.is_completed(0));
    }

    #[test]
    fn test_keys() {
        let mut s = session(2);
        assert_eq!(s.handle_key(CookingKey::Space), CookingAction::Moved);
        assert_eq!(s.handle_key(CookingKey::ArrowRight), CookingAction::Unchanged);
        assert_eq!(s.handle_key(CookingKey::ArrowLeft), CookingAction::Moved);
        assert_eq!(s.handle_key(CookingKey::Escape), CookingAction::Exit);
    }

    #[test]
    fn test_empty_session() {
        let mut s = CookingSession::new(vec![]);
        assert!(s.is_first());
        assert!(s.is_last());
        assert!(!s.next());
        assert!(!s.toggle_complete());
        assert_eq!(s.current_step(), None);
    }

    #[test]
    fn test_ingredient_preview_limit() {
        let recipe = RecipeFields {
            ingredients: (0..8)
                .map(|i| Ingredient {
                    name: format!("item {}", i),
                    quantity: 1.0,
                    unit: "cup".to_string(),
                })
                .collect(),
            ..Default::default()
        };
        let preview = ingredient_preview(&recipe);
        assert_eq!(preview.len(), 6);
        assert_eq!(preview[0], "item 0");
    }
}
