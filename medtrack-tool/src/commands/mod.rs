//! Command handlers. Each one prints its own result; errors bubble up to
//! `main` as a single message.

pub mod account;
pub mod medicine;
mod output;
