use std::cmp::Ordering;

use juniper::{GraphQLEnum, GraphQLInputObject};

use crate::{
    api::{Context, common::{define_connection, paginate_connection}, err::ApiResult},
    model::Post,
};


define_connection!(Post, PostEdge, PostConnection);

/// Filter and ordering options for `posts`.
#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub(crate) struct WhereInput {
    /// If not given, posts are returned in their stored order.
    pub(crate) orderby: Option<OrderByInput>,
}

#[derive(Debug, Clone, Copy, Default, GraphQLInputObject)]
pub(crate) struct OrderByInput {
    /// Defaults to `DATE`.
    pub(crate) field: Option<OrderByField>,

    /// Defaults to `ASC`.
    pub(crate) order: Option<OrderDirection>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, GraphQLEnum)]
pub(crate) enum OrderByField {
    /// Publication date.
    #[default]
    Date,
    Title,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, GraphQLEnum)]
pub(crate) enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderByInput {
    fn compare(&self, a: &Post, b: &Post) -> Ordering {
        let ordering = match self.field.unwrap_or_default() {
            OrderByField::Date => a.date.cmp(&b.date),
            OrderByField::Title => a.title.cmp(&b.title),
        };

        match self.order.unwrap_or_default() {
            OrderDirection::Asc => ordering,
            OrderDirection::Desc => ordering.reverse(),
        }
    }
}

/// Returns references to all posts in the requested order. The sort is
/// stable: posts that compare equal keep their stored order.
fn ordered<'a>(posts: &'a [Post], filter: &WhereInput) -> Vec<&'a Post> {
    let mut out = posts.iter().collect::<Vec<_>>();
    if let Some(order) = &filter.orderby {
        out.sort_by(|a, b| order.compare(a, b));
    }
    out
}

impl PostConnection {
    /// Loads one page of posts. Cursors refer to positions in the ordered
    /// sequence, so the same `filter` has to be passed for all pages.
    pub(crate) fn load(
        first: Option<i32>,
        after: Option<&str>,
        filter: WhereInput,
        context: &Context,
    ) -> ApiResult<Self> {
        let posts = ordered(context.store.posts(), &filter);
        paginate_connection(&posts, first, after, context)
            .map(|page| page.map(|post| *post))
            .map(Into::into)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Store;

    fn titles(posts: Vec<&Post>) -> Vec<&str> {
        posts.into_iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn no_order_keeps_stored_order() {
        let store = Store::seed();
        let posts = ordered(store.posts(), &WhereInput::default());
        assert_eq!(titles(posts), ["Post 1", "Post 2", "Post 3", "Post 4"]);
    }

    #[test]
    fn order_by_date() {
        let store = Store::seed();
        let by = |order| WhereInput {
            orderby: Some(OrderByInput { field: Some(OrderByField::Date), order: Some(order) }),
        };

        let desc = ordered(store.posts(), &by(OrderDirection::Desc));
        assert_eq!(titles(desc), ["Post 4", "Post 2", "Post 1", "Post 3"]);

        let asc = ordered(store.posts(), &by(OrderDirection::Asc));
        assert_eq!(titles(asc), ["Post 3", "Post 1", "Post 2", "Post 4"]);
    }

    #[test]
    fn equal_keys_keep_stored_order() {
        let mut posts = Store::seed().posts().to_vec();
        for p in &mut posts {
            p.title = "same".into();
        }
        let filter = WhereInput {
            orderby: Some(OrderByInput {
                field: Some(OrderByField::Title),
                order: Some(OrderDirection::Desc),
            }),
        };
        let ids = ordered(&posts, &filter).into_iter()
            .map(|p| p.database_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["1", "2", "3", "4"]);
    }

    #[test]
    fn missing_field_and_order_use_defaults() {
        let store = Store::seed();
        let by = |orderby| WhereInput { orderby: Some(orderby) };

        let all_default = ordered(store.posts(), &by(OrderByInput::default()));
        assert_eq!(titles(all_default), ["Post 3", "Post 1", "Post 2", "Post 4"]);

        let only_order = OrderByInput { field: None, order: Some(OrderDirection::Desc) };
        assert_eq!(titles(ordered(store.posts(), &by(only_order))), ["Post 4", "Post 2", "Post 1", "Post 3"]);

        let only_field = OrderByInput { field: Some(OrderByField::Title), order: None };
        assert_eq!(titles(ordered(store.posts(), &by(only_field))), ["Post 1", "Post 2", "Post 3", "Post 4"]);
    }
}
