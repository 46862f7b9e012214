//! # chatty-entity
//!
//! Domain entity models for Chatty.

pub mod group;
pub mod message;
pub mod user;

pub use group::{Group, NewGroup};
pub use message::{Message, NewMessage};
pub use user::{NewUser, PublicUser, User};
