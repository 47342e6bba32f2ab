//! Wire and domain types shared by the Avida client crates.

pub mod api;
pub mod events;
pub mod models;
