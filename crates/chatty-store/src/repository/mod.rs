//! Repository traits.
//!
//! The concrete backend is interchangeable. Every method is async and
//! reports backend failures through `AppError`.

pub mod group;
pub mod message;
pub mod user;

pub use group::GroupRepository;
pub use message::MessageRepository;
pub use user::UserRepository;
