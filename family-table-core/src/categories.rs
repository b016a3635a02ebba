//! Category tags.

/// Suggestions offered by the recipe editor.
pub const COMMON_CATEGORIES: &[&str] = &[
    "vegan",
    "vegetarian",
    "gluten-free",
    "dairy-free",
    "dessert",
    "main-course",
    "appetizer",
    "soup",
    "salad",
    "breakfast",
    "lunch",
    "dinner",
    "quick-meal",
    "comfort-food",
    "healthy",
];

/// Choices in the dashboard's category filter, after "all".
pub const FILTER_CATEGORIES: &[&str] = &[
    "vegan",
    "vegetarian",
    "gluten-free",
    "dairy-free",
    "dessert",
    "main-course",
    "appetizer",
    "soup",
    "salad",
    "breakfast",
];

pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Normalize every tag, dropping blanks and later duplicates.
pub fn normalize_categories(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = normalize_tag(&tag);
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Add the tag if absent, remove it if present.
pub fn toggle_category(categories: &mut Vec<String>, tag: &str) {
    let tag = normalize_tag(tag);
    if let Some(pos) = categories.iter().position(|c| *c == tag) {
        categories.remove(pos);
    } else if !tag.is_empty() {
        categories.push(tag);
    }
}

/// Add a user-typed tag. Returns false when it was blank or already present.
pub fn add_custom_tag(categories: &mut Vec<String>, input: &str) -> bool {
    let tag = normalize_tag(input);
    if tag.is_empty() || categories.contains(&tag) {
        return false;
    }
    categories.push(tag);
    true
}

/// "main-course" -> "Main course"
pub fn category_label(tag: &str) -> String {
    let spaced = tag.replacen('-', " ", 1);
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
