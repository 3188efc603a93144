//! `pantry ingredient ...` – CRUD over ingredients.

use anyhow::Result;
use pantry_core::connect::{ConnectionAcquirer, PgOpener};
use pantry_core::repo::IngredientRepository;

use super::output::print_ingredient;
use crate::cli::IngredientCommand;

pub async fn run_ingredient(
    acquirer: ConnectionAcquirer<PgOpener>,
    action: IngredientCommand,
    json: bool,
) -> Result<()> {
    let repo = IngredientRepository::new(acquirer);
    match action {
        IngredientCommand::Add(fields) => {
            let created = repo.create_ingredient(&fields.into()).await?;
            print_ingredient(&created, json)?;
        }
        IngredientCommand::Get { id } => match repo.get_ingredient_by_id(id).await? {
            Some(i) => print_ingredient(&i, json)?,
            None => println!("No ingredient with id {id}"),
        },
        IngredientCommand::Find { name } => match repo.get_ingredient_by_name(&name).await? {
            Some(i) => print_ingredient(&i, json)?,
            None => println!("No ingredient named {name:?}"),
        },
        IngredientCommand::Update { id, fields } => {
            if repo.update_ingredient(id, &fields.into()).await? {
                println!("Updated ingredient {id}");
            } else {
                println!("No ingredient with id {id}");
            }
        }
        IngredientCommand::Delete { id } => {
            if repo.delete_ingredient(id).await? {
                println!("Deleted ingredient {id}");
            } else {
                println!("No ingredient with id {id}");
            }
        }
    }
    Ok(())
}
