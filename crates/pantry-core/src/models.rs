//! Row types for the `"User"` and `"Ingredient"` tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i32;
pub type IngredientId = i32;

/// Stored user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    #[sqlx(rename = "userid")]
    pub user_id: UserId,
    pub email: String,
    #[sqlx(rename = "passwordhash")]
    pub password_hash: String,
    #[sqlx(rename = "createdat")]
    pub created_at: DateTime<Utc>,
}

/// Input to `UserRepository::create_user`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
}

/// Nutrition values are per 100 g (or 100 ml) of the ingredient.
///
/// The table was created by an ORM, so its columns are quoted PascalCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ingredient {
    #[sqlx(rename = "IngredientId")]
    pub ingredient_id: IngredientId,
    #[sqlx(rename = "UserID")]
    pub user_id: UserId,
    #[sqlx(rename = "Name")]
    pub name: String,
    #[sqlx(rename = "EnergyKcalPer100")]
    pub energy_kcal_per_100: f32,
    #[sqlx(rename = "ProteinPer100")]
    pub protein_per_100: f32,
    #[sqlx(rename = "CarbsPer100")]
    pub carbs_per_100: f32,
    #[sqlx(rename = "FatPer100")]
    pub fat_per_100: f32,
    #[sqlx(rename = "UnitID")]
    pub unit_id: i32,
    #[sqlx(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating or replacing an ingredient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientInput {
    pub user_id: UserId,
    pub name: String,
    pub energy_kcal_per_100: f32,
    pub protein_per_100: f32,
    pub carbs_per_100: f32,
    pub fat_per_100: f32,
    pub unit_id: i32,
}
