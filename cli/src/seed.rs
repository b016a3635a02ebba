use crate::client::ApiClient;
use anyhow::{Context, Result};
use serde_json::{json, Value};

struct SeedRecipe {
    title: &'static str,
    description: Option<&'static str>,
    instructions: &'static str,
    ingredients: &'static [(&'static str, f64, &'static str)], // (name, quantity, unit)
    categories: &'static [&'static str],
    difficulty: u8,
    minutes: u32,
    servings: u32,
}

const SAMPLE_RECIPES: &[SeedRecipe] = &[
    SeedRecipe {
        title: "Grandma's Banana Bread",
        description: Some("The loaf that shows up at every family brunch."),
        instructions: "1. Preheat oven to 350°F (175°C). Grease a 9x5 inch loaf pan.
2. Mash bananas in a large bowl until smooth.
3. Mix in melted butter, then sugar, egg, and vanilla.
4. Stir in baking soda and salt, then fold in flour until just combined.
5. Bake for 55-65 minutes until a toothpick comes out clean.",
        ingredients: &[
            ("ripe bananas", 3.0, "piece"),
            ("butter", 0.33, "cup"),
            ("sugar", 0.75, "cup"),
            ("egg", 1.0, "piece"),
            ("vanilla extract", 1.0, "tsp"),
            ("baking soda", 1.0, "tsp"),
            ("all-purpose flour", 1.5, "cup"),
        ],
        categories: &["breakfast", "baking", "dessert"],
        difficulty: 2,
        minutes: 75,
        servings: 8,
    },
    SeedRecipe {
        title: "Sunday Pot Roast",
        description: Some("Slow braised beef with carrots and potatoes."),
        instructions: "Step 1: Season the roast generously and sear on all sides.
Step 2: Add onions, carrots, and potatoes around the roast.
Step 3: Pour in broth until halfway up the meat.
Step 4: Cover and braise at 300°F for 3 to 4 hours.
Step 5: Rest 15 minutes before slicing.",
        ingredients: &[
            ("chuck roast", 1.5, "kg"),
            ("carrots", 500.0, "g"),
            ("potatoes", 750.0, "g"),
            ("onion", 2.0, "piece"),
            ("beef broth", 2.0, "cup"),
        ],
        categories: &["dinner", "comfort-food", "holiday"],
        difficulty: 3,
        minutes: 240,
        servings: 6,
    },
    SeedRecipe {
        title: "Weeknight Chicken Tacos",
        description: None,
        instructions: "1. Toss chicken with spices and a squeeze of lime.
2. Cook in a hot skillet until charred and cooked through.
3. Warm the tortillas.
4. Fill with chicken, cabbage, and a spoon of crema.",
        ingredients: &[
            ("chicken thighs", 600.0, "g"),
            ("chili powder", 2.0, "tsp"),
            ("cumin", 1.0, "tsp"),
            ("corn tortillas", 12.0, "piece"),
            ("shredded cabbage", 2.0, "cup"),
            ("sour cream", 0.5, "cup"),
        ],
        categories: &["dinner", "quick", "mexican"],
        difficulty: 1,
        minutes: 25,
        servings: 4,
    },
    SeedRecipe {
        title: "Aunt Rosa's Tomato Sauce",
        description: Some("Simmered all afternoon, frozen in batches for later."),
        instructions: "1. Sweat garlic in olive oil without browning.
2. Add crushed tomatoes and a pinch of salt.
3. Simmer uncovered for at least 2 hours, stirring now and then.
4. Finish with torn basil.",
        ingredients: &[
            ("olive oil", 60.0, "ml"),
            ("garlic", 6.0, "clove"),
            ("crushed tomatoes", 1.6, "kg"),
            ("basil", 1.0, "cup"),
        ],
        categories: &["italian", "vegetarian", "vegan"],
        difficulty: 2,
        minutes: 150,
        servings: 10,
    },
];

/// Create the sample recipes plus one meal for the token's user.
/// Does nothing when the user already has recipes.
pub async fn seed(client: &ApiClient) -> Result<()> {
    let me: Value = client.get("/api/me").await.context("Failed to authenticate")?;
    let email = me["email"].as_str().unwrap_or_default().to_string();

    let existing: Value = client
        .get("/api/recipes?show=mine&limit=1")
        .await
        .context("Failed to list recipes")?;
    if existing["counts"]["mine"].as_u64().unwrap_or(0) > 0 {
        println!("{} already has recipes, skipping seed", email);
        return Ok(());
    }

    println!("Creating {} sample recipes...", SAMPLE_RECIPES.len());

    let mut recipe_ids = Vec::new();
    for recipe in SAMPLE_RECIPES {
        let ingredients: Vec<Value> = recipe
            .ingredients
            .iter()
            .map(|(name, quantity, unit)| json!({"name": name, "quantity": quantity, "unit": unit}))
            .collect();

        let request = json!({
            "title": recipe.title,
            "short_description": recipe.description,
            "full_instructions": recipe.instructions,
            "ingredients": ingredients,
            "categories": recipe.categories,
            "difficulty_level": recipe.difficulty,
            "estimated_time": recipe.minutes,
            "servings": recipe.servings,
        });

        let created: Value = client
            .post("/api/recipes", &request)
            .await
            .with_context(|| format!("Failed to create recipe: {}", recipe.title))?;

        if let Some(id) = created["id"].as_str() {
            recipe_ids.push(id.to_string());
        }
        println!("  Created: {}", recipe.title);
    }

    // Roast, sauce, then bread for dessert
    let sunday_dinner: Vec<&String> = [1, 3, 0]
        .iter()
        .filter_map(|&i| recipe_ids.get(i))
        .collect();
    let meal: Value = client
        .post(
            "/api/meals",
            &json!({
                "name": "Sunday Dinner",
                "description": "The whole family, every week",
                "recipe_ids": sunday_dinner,
            }),
        )
        .await
        .context("Failed to create meal")?;
    println!("  Created meal: {}", meal["name"].as_str().unwrap_or_default());

    println!();
    println!("{}", "=".repeat(50));
    println!("SEED DATA COMPLETE");
    println!("{}", "=".repeat(50));
    println!("User: {}", email);
    println!("Recipes: {}", recipe_ids.len());
    println!("{}", "=".repeat(50));

    Ok(())
}
