use juniper::GraphQLObject;

use crate::{
    api::{
        Context,
        err::{invalid_cursor, ApiResult},
    },
    paginate::{self, Page},
    prelude::*,
};


/// Information about the current page and how to get the next one.
#[derive(Debug, Clone, PartialEq, Eq, GraphQLObject)]
pub(crate) struct PageInfo {
    /// Whether there is at least one more item after this page.
    pub(crate) has_next_page: bool,

    /// The cursor to pass as `after` to get the next page. Empty string if
    /// there is no next page.
    pub(crate) end_cursor: String,
}

impl From<paginate::PageInfo> for PageInfo {
    fn from(src: paginate::PageInfo) -> Self {
        Self {
            has_next_page: src.has_next_page,
            end_cursor: src.end_cursor.into(),
        }
    }
}

/// Defines the edge and connection GraphQL types for a node type, plus a
/// conversion from a `Page` of node references into the connection.
///
/// ```
/// define_connection!(Book, BookEdge, BookConnection);
/// ```
macro_rules! define_connection {
    ($node:ty, $edge:ident, $connection:ident) => {
        #[derive(Debug, Clone, juniper::GraphQLObject)]
        pub(crate) struct $edge {
            pub(crate) node: $node,

            /// Cursor of this node's position, usable as `after` argument.
            pub(crate) cursor: String,
        }

        #[derive(Debug, Clone, juniper::GraphQLObject)]
        pub(crate) struct $connection {
            pub(crate) edges: Vec<$edge>,
            pub(crate) page_info: $crate::api::common::PageInfo,
        }

        impl From<$crate::paginate::Page<&$node>> for $connection {
            fn from(page: $crate::paginate::Page<&$node>) -> Self {
                Self {
                    edges: page.edges.into_iter()
                        .map(|edge| $edge {
                            node: edge.node.clone(),
                            cursor: edge.cursor.into(),
                        })
                        .collect(),
                    page_info: page.page_info.into(),
                }
            }
        }
    };
}

pub(crate) use define_connection;


/// Paginates `items` according to the `first` and `after` arguments of a
/// connection field and the API configuration.
///
/// A missing `first` means `api.default_page_size`, values above
/// `api.max_page_size` are lowered to it. A missing `after` starts at the
/// beginning.
pub(crate) fn paginate_connection<'a, T>(
    items: &'a [T],
    first: Option<i32>,
    after: Option<&str>,
    context: &Context,
) -> ApiResult<Page<&'a T>> {
    let config = &context.config;
    let max = i32::try_from(config.max_page_size).unwrap_or(i32::MAX);
    let page_size = match first {
        None => i32::try_from(config.default_page_size).unwrap_or(max),
        Some(first) if first > max => {
            debug!("Requested page size {first} exceeds maximum, using {max}");
            max
        }
        Some(first) => first,
    };

    paginate::paginate_with_policy(
        items,
        page_size,
        after.unwrap_or_default(),
        config.cursor_policy,
    ).map_err(|e| invalid_cursor!(key = "pagination.invalid-cursor", "{}", e))
}
