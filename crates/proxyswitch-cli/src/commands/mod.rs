//! Implementations behind each binary.

pub mod disable;
pub mod enable;
pub mod generate_env;
