use juniper::graphql_object;

use super::{
    Context,
    err::ApiResult,
    model::{
        book::BookConnection,
        post::{PostConnection, WhereInput},
    },
};


/// The root query object.
pub(crate) struct Query;

#[graphql_object(context = Context)]
impl Query {
    /// Returns a page of books in catalog order.
    ///
    /// `first` is the maximum number of books to return, `after` the
    /// `endCursor` of the previous page (or omitted/empty for the first
    /// page).
    fn books(
        first: Option<i32>,
        after: Option<String>,
        context: &Context,
    ) -> ApiResult<BookConnection> {
        BookConnection::load(first, after.as_deref(), context)
    }

    /// Returns a page of posts, optionally ordered by `where.orderby`.
    ///
    /// Cursors refer to positions in the ordered sequence, so pass the same
    /// `where` argument when fetching subsequent pages.
    fn posts(
        first: Option<i32>,
        after: Option<String>,
        #[graphql(name = "where")] filter: Option<WhereInput>,
        context: &Context,
    ) -> ApiResult<PostConnection> {
        PostConnection::load(first, after.as_deref(), filter.unwrap_or_default(), context)
    }
}
