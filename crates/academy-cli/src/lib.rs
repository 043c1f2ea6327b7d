//! # Academy CLI
//!
//! Administrative tooling used by the `academy-cli` binary: creating admin
//! accounts and seeding reference or fake data for development.
//!
//! ```ignore
//! use academy_cli::seeder;
//!
//! seeder::seed_reference(&pool).await?;
//! seeder::seed_registrations_only(&pool, 200).await?;
//! ```

pub mod admin;
pub mod seeder;
