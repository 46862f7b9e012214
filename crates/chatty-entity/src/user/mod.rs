//! Identity models.

pub mod model;

pub use model::{NewUser, PublicUser, User};
