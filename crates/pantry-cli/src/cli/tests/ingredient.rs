//! Tests for ingredient subcommands.

use super::parse;
use crate::cli::{CliCommand, IngredientCommand};
use pantry_core::models::IngredientInput;

#[test]
fn cli_parse_ingredient_add_with_defaults() {
    match parse(&[
        "pantry",
        "ingredient",
        "add",
        "--user-id",
        "1",
        "--name",
        "Oats",
        "--kcal",
        "379",
    ]) {
        CliCommand::Ingredient {
            action: IngredientCommand::Add(fields),
        } => {
            let input: IngredientInput = fields.into();
            assert_eq!(input.user_id, 1);
            assert_eq!(input.name, "Oats");
            assert_eq!(input.energy_kcal_per_100, 379.0);
            assert_eq!(input.protein_per_100, 0.0);
            assert_eq!(input.unit_id, 1);
        }
        _ => panic!("expected Ingredient Add"),
    }
}

#[test]
fn cli_parse_ingredient_update() {
    match parse(&[
        "pantry",
        "ingredient",
        "update",
        "12",
        "--user-id",
        "2",
        "--name",
        "Rice",
        "--carbs",
        "80.5",
        "--unit-id",
        "3",
    ]) {
        CliCommand::Ingredient {
            action: IngredientCommand::Update { id, fields },
        } => {
            assert_eq!(id, 12);
            assert_eq!(fields.user_id, 2);
            assert_eq!(fields.carbs, 80.5);
            assert_eq!(fields.unit_id, 3);
        }
        _ => panic!("expected Ingredient Update"),
    }
}

#[test]
fn cli_parse_ingredient_lookups() {
    match parse(&["pantry", "ingredient", "get", "4"]) {
        CliCommand::Ingredient {
            action: IngredientCommand::Get { id },
        } => assert_eq!(id, 4),
        _ => panic!("expected Ingredient Get"),
    }
    match parse(&["pantry", "ingredient", "find", "Rolled oats"]) {
        CliCommand::Ingredient {
            action: IngredientCommand::Find { name },
        } => assert_eq!(name, "Rolled oats"),
        _ => panic!("expected Ingredient Find"),
    }
    match parse(&["pantry", "ingredient", "delete", "9"]) {
        CliCommand::Ingredient {
            action: IngredientCommand::Delete { id },
        } => assert_eq!(id, 9),
        _ => panic!("expected Ingredient Delete"),
    }
}
