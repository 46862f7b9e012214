//! Subscription authorization filter.

pub mod authorizer;

pub use authorizer::SubscriptionAuthorizer;
