//! `pantry user ...` – create, look up and update user accounts.

use anyhow::Result;
use pantry_core::connect::{ConnectionAcquirer, PgOpener};
use pantry_core::models::CreateUserRequest;
use pantry_core::repo::UserRepository;

use super::output::print_user;
use crate::cli::UserCommand;

pub async fn run_user(
    acquirer: ConnectionAcquirer<PgOpener>,
    action: UserCommand,
    json: bool,
) -> Result<()> {
    let repo = UserRepository::new(acquirer);
    match action {
        UserCommand::Create { email, password } => {
            let user = repo
                .create_user(&CreateUserRequest { email, password })
                .await?;
            print_user(&user, json)?;
        }
        UserCommand::Get { id, email } => {
            let found = match (id, email) {
                (Some(id), _) => repo.get_user_by_id(id).await?,
                (None, Some(email)) => repo.get_user_by_email(&email).await?,
                (None, None) => anyhow::bail!("pass --id or --email"),
            };
            match found {
                Some(user) => print_user(&user, json)?,
                None => println!("No such user."),
            }
        }
        UserCommand::Verify { email, password } => {
            match repo.verify_credentials(&email, &password).await? {
                Some(user) => print_user(&user, json)?,
                None => anyhow::bail!("invalid email or password"),
            }
        }
        UserCommand::SetEmail { id, email } => {
            if repo.update_user_email(id, &email).await? {
                println!("Updated email for user {id}");
            } else {
                println!("No user with id {id}");
            }
        }
    }
    Ok(())
}
