use http_body_util::{BodyExt, Limited};
use hyper::{body::Body, Method, StatusCode};
use juniper::{
    http::{graphiql::graphiql_source, GraphQLBatchRequest, GraphQLRequest},
    InputValue,
};
use std::{sync::Arc, time::Instant};

use crate::{api::err::ApiErrorKind, prelude::*};
use super::{Context, Request, Response, log, response};


/// Maximum size of a GraphQL request body in bytes.
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// This is the main HTTP entry point, called for each incoming request.
///
/// Generic over the body type so that tests can pass in-memory bodies.
pub(super) async fn handle<B>(req: Request<B>, ctx: Arc<Context>) -> Response
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    log::req::log(&req);
    if ctx.log_headers {
        log::headers::log(&req);
    }

    let method = req.method().clone();
    let path = req.uri().path().trim_end_matches('/');
    let is_get = method == Method::GET || method == Method::HEAD;

    match path {
        "/graphql" if method == Method::POST => handle_post(req, &ctx).await,
        "/graphql" if is_get => match parse_get_request(req.uri().query().unwrap_or_default()) {
            Ok(request) => execute(GraphQLBatchRequest::Single(request), &ctx).await,
            Err(msg) => response::bad_request(&msg),
        },

        // From this point on, we only support GET and HEAD requests.
        _ if !is_get => response::method_not_allowed(),

        // The interactive GraphQL API explorer/IDE.
        "/~graphiql" => response::html(graphiql_source("/graphql", None)),

        path => {
            debug!("Responding with 404 to {:?} '{}'", method, path);
            response::not_found()
        }
    }
}

/// Handles a `POST` to `/graphql`, with a single or batch request as JSON body.
async fn handle_post<B>(req: Request<B>, ctx: &Context) -> Response
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let body = match Limited::new(req.into_body(), MAX_BODY_SIZE).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => return response::bad_request(&format!("failed to read request body: {e}")),
    };

    match serde_json::from_slice::<GraphQLBatchRequest>(&body) {
        Ok(request) => execute(request, ctx).await,
        Err(e) => response::bad_request(&format!("invalid GraphQL request: {e}")),
    }
}

/// Reads a GraphQL request from the query parameters `query`, `variables`
/// (JSON encoded) and `operationName`.
fn parse_get_request(query_string: &str) -> Result<GraphQLRequest, String> {
    let mut query = None;
    let mut variables = None;
    let mut operation_name = None;

    for (key, value) in form_urlencoded::parse(query_string.as_bytes()) {
        match &*key {
            "query" => query = Some(value.into_owned()),
            "operationName" => operation_name = Some(value.into_owned()),
            "variables" => {
                let parsed = serde_json::from_str::<InputValue>(&value)
                    .map_err(|e| format!("invalid 'variables' parameter: {e}"))?;
                variables = Some(parsed);
            }
            _ => {}
        }
    }

    let query = query.ok_or("missing 'query' parameter")?;
    Ok(GraphQLRequest::new(query, operation_name, variables))
}

async fn execute(request: GraphQLBatchRequest, ctx: &Context) -> Response {
    let before = Instant::now();
    let out = request.execute(&ctx.api_root, &ctx.api).await;

    // `is_ok` is only false if the request was rejected before execution.
    // Field errors are part of an "ok" response, so we look for those we
    // want to answer with 400 ourselves.
    let ok = out.is_ok();
    let json = match serde_json::to_value(&out) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize GraphQL response: {e}");
            return response::internal_server_error();
        }
    };
    let status = if ok && !has_invalid_cursor_error(&json) {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    debug!("Finished /graphql query in {:.2?} (status {})", before.elapsed(), status);
    response::json(status, json.to_string().into_bytes())
}

/// Whether any error in the (possibly batched) response has the
/// `INVALID_CURSOR` kind.
fn has_invalid_cursor_error(json: &serde_json::Value) -> bool {
    let responses = match json {
        serde_json::Value::Array(responses) => responses.as_slice(),
        single => std::slice::from_ref(single),
    };

    responses.iter()
        .filter_map(|single| single.get("errors")?.as_array())
        .flatten()
        .any(|error| error["extensions"]["kind"] == ApiErrorKind::InvalidCursor.kind_str())
}
