//! Definition of the GraphQL API.

use self::{
    mutation::Mutation,
    query::Query,
    subscription::Subscription,
};

pub(crate) mod err;
pub(crate) mod model;

mod common;
mod context;
mod mutation;
mod query;
mod subscription;

pub(crate) use self::context::Context;


/// Creates and returns the API root node.
pub(crate) fn root_node() -> RootNode {
    RootNode::new(Query, Mutation::new(), Subscription::new())
}

/// Type of our API root node.
pub(crate) type RootNode = juniper::RootNode<'static, Query, Mutation, Subscription>;


#[cfg(test)]
mod tests;
