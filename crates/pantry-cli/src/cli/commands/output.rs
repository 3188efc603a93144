//! Shared printing for command results.

use anyhow::Result;
use pantry_core::models::{Ingredient, User};
use serde::Serialize;

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_user(user: &User, json: bool) -> Result<()> {
    if json {
        return print_json(user);
    }
    println!("{:<8} {:<32} {}", "ID", "EMAIL", "CREATED");
    println!(
        "{:<8} {:<32} {}",
        user.user_id,
        user.email,
        user.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}

pub(crate) fn print_ingredient(i: &Ingredient, json: bool) -> Result<()> {
    if json {
        return print_json(i);
    }
    println!(
        "{:<6} {:<24} {:>8} {:>8} {:>8} {:>8}  (per 100, unit {}, user {})",
        "ID", "NAME", "KCAL", "PROTEIN", "CARBS", "FAT", i.unit_id, i.user_id
    );
    println!(
        "{:<6} {:<24} {:>8.1} {:>8.1} {:>8.1} {:>8.1}",
        i.ingredient_id,
        i.name,
        i.energy_kcal_per_100,
        i.protein_per_100,
        i.carbs_per_100,
        i.fat_per_100
    );
    Ok(())
}
