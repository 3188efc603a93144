//! Ingredients in the ORM-created `"Ingredient"` table.

use super::{release, ConnectionSource, RepoError, RepoResult};
use crate::models::{Ingredient, IngredientId, IngredientInput};

const INSERT_INGREDIENT: &str = r#"
    INSERT INTO "Ingredient" (
        "UserID", "Name", "EnergyKcalPer100", "ProteinPer100",
        "CarbsPer100", "FatPer100", "UnitID", "CreatedAt"
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, now())
    RETURNING "IngredientId", "UserID", "Name", "EnergyKcalPer100", "ProteinPer100",
              "CarbsPer100", "FatPer100", "UnitID", "CreatedAt"::timestamptz AS "CreatedAt"
"#;

const SELECT_INGREDIENT_BY_ID: &str = r#"
    SELECT "IngredientId", "UserID", "Name", "EnergyKcalPer100", "ProteinPer100",
           "CarbsPer100", "FatPer100", "UnitID", "CreatedAt"::timestamptz AS "CreatedAt"
    FROM "Ingredient"
    WHERE "IngredientId" = $1
"#;

const SELECT_INGREDIENT_BY_NAME: &str = r#"
    SELECT "IngredientId", "UserID", "Name", "EnergyKcalPer100", "ProteinPer100",
           "CarbsPer100", "FatPer100", "UnitID", "CreatedAt"::timestamptz AS "CreatedAt"
    FROM "Ingredient"
    WHERE "Name" = $1
    ORDER BY "IngredientId" ASC
    LIMIT 1
"#;

const UPDATE_INGREDIENT: &str = r#"
    UPDATE "Ingredient"
    SET "UserID" = $1,
        "Name" = $2,
        "EnergyKcalPer100" = $3,
        "ProteinPer100" = $4,
        "CarbsPer100" = $5,
        "FatPer100" = $6,
        "UnitID" = $7
    WHERE "IngredientId" = $8
"#;

const DELETE_INGREDIENT: &str = r#"
    DELETE FROM "Ingredient"
    WHERE "IngredientId" = $1
"#;

fn validate_id(id: IngredientId) -> RepoResult<()> {
    if id <= 0 {
        return Err(RepoError::Validation(
            "Ingredient ID must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

fn validate_name(name: &str) -> RepoResult<()> {
    if name.trim().is_empty() {
        return Err(RepoError::Validation(
            "Ingredient name is required".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_input(input: &IngredientInput) -> RepoResult<()> {
    validate_name(&input.name)?;
    if input.user_id <= 0 {
        return Err(RepoError::Validation(
            "User ID must be a positive integer".to_string(),
        ));
    }
    let values = [
        ("energy", input.energy_kcal_per_100),
        ("protein", input.protein_per_100),
        ("carbs", input.carbs_per_100),
        ("fat", input.fat_per_100),
    ];
    for (label, v) in values {
        if !v.is_finite() || v < 0.0 {
            return Err(RepoError::Validation(format!(
                "{label} per 100 must be a non-negative number"
            )));
        }
    }
    Ok(())
}

pub struct IngredientRepository<S> {
    source: S,
}

impl<S: ConnectionSource> IngredientRepository<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn create_ingredient(&self, input: &IngredientInput) -> RepoResult<Ingredient> {
        validate_input(input)?;

        let mut conn = self.source.acquire().await?;
        let res = sqlx::query_as::<_, Ingredient>(INSERT_INGREDIENT)
            .bind(input.user_id)
            .bind(input.name.trim())
            .bind(input.energy_kcal_per_100)
            .bind(input.protein_per_100)
            .bind(input.carbs_per_100)
            .bind(input.fat_per_100)
            .bind(input.unit_id)
            .fetch_optional(&mut *conn)
            .await;
        release(conn).await;

        let ingredient = res?.ok_or(RepoError::NoRowReturned("create ingredient"))?;
        tracing::info!(ingredient_id = ingredient.ingredient_id, "created ingredient");
        Ok(ingredient)
    }

    pub async fn get_ingredient_by_id(&self, id: IngredientId) -> RepoResult<Option<Ingredient>> {
        validate_id(id)?;

        let mut conn = self.source.acquire().await?;
        let res = sqlx::query_as::<_, Ingredient>(SELECT_INGREDIENT_BY_ID)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await;
        release(conn).await;
        Ok(res?)
    }

    /// First ingredient (lowest id) with exactly this name.
    pub async fn get_ingredient_by_name(&self, name: &str) -> RepoResult<Option<Ingredient>> {
        validate_name(name)?;

        let mut conn = self.source.acquire().await?;
        let res = sqlx::query_as::<_, Ingredient>(SELECT_INGREDIENT_BY_NAME)
            .bind(name.trim())
            .fetch_optional(&mut *conn)
            .await;
        release(conn).await;
        Ok(res?)
    }

    /// Replace all editable fields. `false` when the id does not exist.
    pub async fn update_ingredient(
        &self,
        id: IngredientId,
        input: &IngredientInput,
    ) -> RepoResult<bool> {
        validate_id(id)?;
        validate_input(input)?;

        let mut conn = self.source.acquire().await?;
        let res = sqlx::query(UPDATE_INGREDIENT)
            .bind(input.user_id)
            .bind(input.name.trim())
            .bind(input.energy_kcal_per_100)
            .bind(input.protein_per_100)
            .bind(input.carbs_per_100)
            .bind(input.fat_per_100)
            .bind(input.unit_id)
            .bind(id)
            .execute(&mut *conn)
            .await;
        release(conn).await;
        Ok(res?.rows_affected() > 0)
    }

    /// `false` when the id does not exist.
    pub async fn delete_ingredient(&self, id: IngredientId) -> RepoResult<bool> {
        validate_id(id)?;

        let mut conn = self.source.acquire().await?;
        let res = sqlx::query(DELETE_INGREDIENT)
            .bind(id)
            .execute(&mut *conn)
            .await;
        release(conn).await;
        Ok(res?.rows_affected() > 0)
    }
}
