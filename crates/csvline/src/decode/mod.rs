//! Splitting, quote handling and record assembly

pub(crate) mod assembler;
pub mod matcher;
pub mod quote;
pub mod scanner;
