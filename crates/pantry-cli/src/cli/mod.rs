//! CLI for the Pantry database client.

mod commands;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use pantry_core::config::{self, PantryConfig};
use pantry_core::connect::{ConnectionAcquirer, PgOpener};
use pantry_core::models::IngredientInput;

use commands::{run_completions, run_config, run_ingredient, run_ping, run_user};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pantry")]
#[command(about = "Pantry: resilient PostgreSQL client for users and ingredients", long_about = None)]
pub struct Cli {
    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log to stderr instead of the state-dir log file.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Open a connection (with retries), report it and run `SELECT 1`.
    Ping,

    /// Show the config file path and effective settings (password redacted).
    Config,

    /// Print shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Manage user accounts.
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Manage ingredients.
    Ingredient {
        #[command(subcommand)]
        action: IngredientCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user.
    Create {
        #[arg(long)]
        email: String,
        /// At least 8 characters; stored hashed.
        #[arg(long)]
        password: String,
    },
    /// Look up a user by id or email.
    Get {
        #[arg(long, conflicts_with = "email", required_unless_present = "email")]
        id: Option<i32>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Check an email/password pair against the stored hash.
    Verify {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Change a user's email.
    SetEmail {
        /// User identifier.
        id: i32,
        /// New email address.
        email: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum IngredientCommand {
    /// Add an ingredient.
    Add(IngredientArgs),
    /// Show an ingredient by id.
    Get {
        /// Ingredient identifier.
        id: i32,
    },
    /// Find an ingredient by exact name.
    Find {
        /// Ingredient name.
        name: String,
    },
    /// Replace an ingredient's fields.
    Update {
        /// Ingredient identifier.
        id: i32,
        #[command(flatten)]
        fields: IngredientArgs,
    },
    /// Delete an ingredient by id.
    Delete {
        /// Ingredient identifier.
        id: i32,
    },
}

/// Ingredient fields; nutrition values are per 100 g.
#[derive(Debug, Clone, Args)]
pub struct IngredientArgs {
    /// Owning user id.
    #[arg(long)]
    pub user_id: i32,
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value_t = 0.0)]
    pub kcal: f32,
    #[arg(long, default_value_t = 0.0)]
    pub protein: f32,
    #[arg(long, default_value_t = 0.0)]
    pub carbs: f32,
    #[arg(long, default_value_t = 0.0)]
    pub fat: f32,
    #[arg(long, default_value_t = 1)]
    pub unit_id: i32,
}

impl From<IngredientArgs> for IngredientInput {
    fn from(a: IngredientArgs) -> Self {
        IngredientInput {
            user_id: a.user_id,
            name: a.name,
            energy_kcal_per_100: a.kcal,
            protein_per_100: a.protein,
            carbs_per_100: a.carbs,
            fat_per_100: a.fat,
            unit_id: a.unit_id,
        }
    }
}

fn build_acquirer(cfg: &PantryConfig) -> Result<ConnectionAcquirer<PgOpener>> {
    cfg.acquirer()
        .with_context(|| format!("check {}", config_location()))
}

fn config_location() -> String {
    config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "the pantry config file".to_string())
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // Completions never touch (or create) the config file.
        let command = match self.command {
            CliCommand::Completions { shell } => {
                run_completions(shell, &mut std::io::stdout())?;
                return Ok(());
            }
            command => command,
        };

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg.redacted());

        match command {
            CliCommand::Config => run_config(&cfg, self.json)?,
            CliCommand::Completions { shell } => run_completions(shell, &mut std::io::stdout())?,
            CliCommand::Ping => run_ping(&build_acquirer(&cfg)?).await?,
            CliCommand::User { action } => run_user(build_acquirer(&cfg)?, action, self.json).await?,
            CliCommand::Ingredient { action } => {
                run_ingredient(build_acquirer(&cfg)?, action, self.json).await?
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
