//! Adapters between project records and engine assumptions.

pub mod migration;
pub mod seeding;
