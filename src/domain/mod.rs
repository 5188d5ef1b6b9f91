//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod book;
pub mod password;
pub mod user;

pub use book::{Book, BookId, BookPatch, InvalidBookId, NewBook};
pub use password::Password;
pub use user::{User, UserProfile};
