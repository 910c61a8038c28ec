//! GraphQL types built on top of the domain model.

pub(crate) mod book;
pub(crate) mod post;
