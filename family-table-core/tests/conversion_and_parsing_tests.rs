//! Behavior of the pure helpers as the dashboard, editor, and converter use them.

use chrono::{TimeZone, Utc};
use family_table_core::filter::{apply_filters, RecipeFilters, SortBy};
use family_table_core::units::{self, convert, Dimension};
use family_table_core::{parse_steps, ConversionError, Recipe, RecipeFields};

fn recipe(id: &str, categories: &[&str], minutes: u32) -> Recipe {
    Recipe {
        id: id.to_string(),
        created_by: "cook@example.com".to_string(),
        created_date: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        data: RecipeFields {
            title: id.to_string(),
            full_instructions: "Cook".to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            estimated_time: minutes,
            ..Default::default()
        },
    }
}

#[test]
fn test_every_same_dimension_pair_round_trips() {
    for amount in [0.25, 1.0, 12.0, 1000.0] {
        for dimension in [Dimension::Weight, Dimension::Volume] {
            for from in units::units_for(dimension) {
                for to in units::units_for(dimension) {
                    let there = convert(amount, from.name, to.name).unwrap();
                    let back = convert(there, to.name, from.name).unwrap();
                    assert!(
                        (back - amount).abs() <= 1e-9 * amount.max(1.0),
                        "{} {} -> {} -> {}",
                        amount,
                        from.name,
                        to.name,
                        back
                    );
                }
            }
        }
    }
}

#[test]
fn test_every_cross_dimension_pair_fails() {
    for weight in units::units_for(Dimension::Weight) {
        for volume in units::units_for(Dimension::Volume) {
            assert!(matches!(
                convert(1.0, weight.name, volume.name),
                Err(ConversionError::DimensionMismatch { .. })
            ));
            assert!(matches!(
                convert(1.0, volume.name, weight.name),
                Err(ConversionError::DimensionMismatch { .. })
            ));
        }
    }
}

#[test]
fn test_reference_values() {
    assert!((convert(1.0, "cup", "ml").unwrap() - 236.588).abs() < 1e-9);
    assert!((convert(1.0, "oz", "grams").unwrap() - 28.35).abs() < 0.01);
    assert!((convert(1.0, "tbsp", "ml").unwrap() - 14.79).abs() < 0.01);
    assert!((convert(1.0, "tsp", "ml").unwrap() - 4.93).abs() < 0.01);
    assert!((convert(1.0, "lb", "grams").unwrap() - 453.59).abs() < 0.01);
    assert!(convert(1.0, "cup", "oz").is_err());
    assert_eq!(convert(0.0, "gallon", "tsp").unwrap(), 0.0);
}

#[test]
fn test_step_parser_example() {
    assert_eq!(
        parse_steps("1. Preheat\n\nStep 2: Mix\n3 Bake"),
        vec!["Preheat", "Mix", "Bake"]
    );
}

#[test]
fn test_category_filter_keeps_order() {
    let recipes = vec![
        recipe("first", &["vegan"], 30),
        recipe("second", &["dessert"], 30),
        recipe("third", &["vegan", "dessert"], 30),
    ];
    let filters = RecipeFilters {
        category: Some("vegan".to_string()),
        sort_by: SortBy::Time,
        ..Default::default()
    };
    let ids: Vec<_> = apply_filters(&recipes, &filters, None)
        .into_iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(ids, vec!["first", "third"]);
}

#[test]
fn test_time_sort() {
    let recipes = vec![
        recipe("a", &[], 45),
        recipe("b", &[], 10),
        recipe("c", &[], 30),
    ];
    let filters = RecipeFilters {
        sort_by: SortBy::Time,
        ..Default::default()
    };
    let times: Vec<_> = apply_filters(&recipes, &filters, None)
        .into_iter()
        .map(|r| r.data.estimated_time)
        .collect();
    assert_eq!(times, vec![10, 30, 45]);
}
