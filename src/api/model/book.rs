use crate::{
    api::{Context, common::{define_connection, paginate_connection}, err::ApiResult},
    model::Book,
};


define_connection!(Book, BookEdge, BookConnection);

impl BookConnection {
    /// Loads one page of all books in catalog order.
    pub(crate) fn load(
        first: Option<i32>,
        after: Option<&str>,
        context: &Context,
    ) -> ApiResult<Self> {
        paginate_connection(context.store.books(), first, after, context).map(Into::into)
    }
}
