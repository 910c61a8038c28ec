use juniper::GraphQLObject;
use serde::{Deserialize, Serialize};

use super::Identified;


/// A book of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, GraphQLObject)]
#[serde(deny_unknown_fields)]
pub(crate) struct Book {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) author: String,
}

impl Identified for Book {
    const KIND: &'static str = "book";

    fn id(&self) -> &str {
        &self.id
    }
}
