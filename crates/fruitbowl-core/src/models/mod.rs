//! Data models for catalog entities.
//!
//! - `Fruit`: a catalog entry as returned by the API
//! - `FruitInput`: request body for creating or updating a fruit

pub mod fruit;

pub use fruit::{Fruit, FruitInput};
