//! # Edudesk CLI
//!
//! Administration and database seeding utilities for Edudesk.
//!
//! ## Usage
//!
//! ```ignore
//! use edudesk_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(40, 5).with_classes(4);
//! seed_all(&pool, &config, bcrypt_cost).await?;
//! ```

pub mod admin;
pub mod seeder;
