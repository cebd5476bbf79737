//! Domain models

pub mod book;
pub mod user;
