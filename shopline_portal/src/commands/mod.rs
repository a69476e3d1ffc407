//! CLI subcommand implementations.

pub mod hash_password;
pub mod serve;
