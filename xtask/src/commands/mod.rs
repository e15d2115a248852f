//! Top-level xtask command families.

pub mod codegen;
