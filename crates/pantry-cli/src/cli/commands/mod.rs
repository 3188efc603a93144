//! CLI command handlers, one file per command group.

mod completions;
mod config;
mod ingredient;
mod output;
mod ping;
mod user;

pub use completions::run_completions;
pub use config::run_config;
pub use ingredient::run_ingredient;
pub use ping::run_ping;
pub use user::run_user;
