//! Tower layers applied to the router.

pub mod cors;
