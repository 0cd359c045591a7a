//! # Aula CLI
//!
//! Administrative helpers and database seeding for development and testing.
//!
//! ## Usage
//!
//! ```ignore
//! use aula_cli::seeder::{SeedConfig, seed_all};
//!
//! let config = SeedConfig::new(8); // 8 courses with defaults
//! seed_all(&pool, &config).await?;
//! ```

pub mod admin;
pub mod seeder;

/// Error type shared by the CLI commands.
pub type CliError = Box<dyn std::error::Error + Send + Sync>;
