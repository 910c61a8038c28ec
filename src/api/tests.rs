use std::sync::Arc;

use serde_json::{json, Value};

use crate::{
    config::ApiConfig,
    model::Store,
    paginate::CursorPolicy,
};
use super::{root_node, Context};


fn config(cursor_policy: CursorPolicy) -> ApiConfig {
    ApiConfig {
        default_page_size: 3,
        max_page_size: 4,
        cursor_policy,
    }
}

/// Executes `query` against the built-in seed data and returns `data` and
/// `errors` as JSON.
async fn execute(query: &str, config: ApiConfig) -> (Value, Value) {
    let context = Context {
        store: Arc::new(Store::seed()),
        config: Arc::new(config),
    };
    let root = root_node();
    let (data, errors) = juniper::execute(query, None, &root, &Default::default(), &context)
        .await
        .expect("query failed to validate");

    (serde_json::to_value(&data).unwrap(), serde_json::to_value(&errors).unwrap())
}

async fn books(args: &str, config: ApiConfig) -> (Value, Value) {
    let query = format!("{{
        books{args} {{
            edges {{ cursor node {{ id title author }} }}
            pageInfo {{ hasNextPage endCursor }}
        }}
    }}");
    execute(&query, config).await
}

fn book(i: u32) -> Value {
    json!({ "id": i.to_string(), "title": format!("Book {i}"), "author": format!("Author {i}") })
}

#[tokio::test]
async fn first_page_of_books() {
    let (data, errors) = books("(first: 2)", config(CursorPolicy::Strict)).await;
    assert_eq!(errors, json!([]));
    assert_eq!(data, json!({
        "books": {
            "edges": [
                { "cursor": "0", "node": book(1) },
                { "cursor": "1", "node": book(2) },
            ],
            "pageInfo": { "hasNextPage": true, "endCursor": "2" },
        }
    }));
}

#[tokio::test]
async fn walk_all_books() {
    let mut after = String::new();
    let mut ids = vec![];
    loop {
        let (data, _) = books(&format!("(first: 2, after: {after:?})"), config(CursorPolicy::Strict))
            .await;
        let conn = &data["books"];
        for edge in conn["edges"].as_array().unwrap() {
            ids.push(edge["node"]["id"].as_str().unwrap().to_owned());
        }
        if conn["pageInfo"]["hasNextPage"] == json!(false) {
            assert_eq!(conn["pageInfo"]["endCursor"], json!(""));
            break;
        }
        after = conn["pageInfo"]["endCursor"].as_str().unwrap().to_owned();
    }

    assert_eq!(ids, ["1", "2", "3", "4", "5"]);
}

#[tokio::test]
async fn default_and_max_page_size() {
    let (data, _) = books("", config(CursorPolicy::Strict)).await;
    assert_eq!(data["books"]["edges"].as_array().unwrap().len(), 3);
    assert_eq!(data["books"]["pageInfo"]["endCursor"], json!("3"));

    let (data, _) = books("(first: 1000)", config(CursorPolicy::Strict)).await;
    assert_eq!(data["books"]["edges"].as_array().unwrap().len(), 4);
    assert_eq!(data["books"]["pageInfo"], json!({ "hasNextPage": true, "endCursor": "4" }));
}

#[tokio::test]
async fn non_positive_page_size() {
    for first in [0, -3] {
        let (data, errors) = books(&format!("(first: {first})"), config(CursorPolicy::Strict))
            .await;
        assert_eq!(errors, json!([]));
        assert_eq!(data["books"], json!({
            "edges": [],
            "pageInfo": { "hasNextPage": true, "endCursor": "0" },
        }));
    }
}

#[tokio::test]
async fn past_the_end() {
    let (data, errors) = books("(first: 2, after: \"5\")", config(CursorPolicy::Strict)).await;
    assert_eq!(errors, json!([]));
    assert_eq!(data["books"], json!({
        "edges": [],
        "pageInfo": { "hasNextPage": false, "endCursor": "" },
    }));
}

#[tokio::test]
async fn invalid_cursor_strict() {
    let (data, errors) = books("(first: 2, after: \"bogus\")", config(CursorPolicy::Strict)).await;
    assert_eq!(data, Value::Null);
    assert_eq!(errors.as_array().unwrap().len(), 1);
    assert_eq!(errors[0]["path"], json!(["books"]));
    assert_eq!(errors[0]["extensions"], json!({
        "kind": "INVALID_CURSOR",
        "key": "pagination.invalid-cursor",
    }));
}

#[tokio::test]
async fn invalid_cursor_lenient() {
    let (bogus, errors) = books("(first: 2, after: \"bogus\")", config(CursorPolicy::Lenient)).await;
    let (start, _) = books("(first: 2)", config(CursorPolicy::Lenient)).await;
    assert_eq!(errors, json!([]));
    assert_eq!(bogus, start);
}

#[tokio::test]
async fn posts_with_all_fields() {
    let query = r#"{
        posts(first: 1) {
            edges {
                cursor
                node {
                    databaseId slug status title excerpt date
                    featuredImage { node { sourceUrl } }
                    author { node { name firstName lastName avatar { url } } }
                }
            }
            pageInfo { hasNextPage endCursor }
        }
    }"#;
    let (data, errors) = execute(query, config(CursorPolicy::Strict)).await;
    assert_eq!(errors, json!([]));
    assert_eq!(data, json!({
        "posts": {
            "edges": [{
                "cursor": "0",
                "node": {
                    "databaseId": "1",
                    "slug": "post-1",
                    "status": "published",
                    "title": "Post 1",
                    "excerpt": "This is the excerpt of Post 1",
                    "date": "2023-08-15",
                    "featuredImage": { "node": { "sourceUrl": "https://example.com/image1.jpg" } },
                    "author": { "node": {
                        "name": "Author 1",
                        "firstName": "John",
                        "lastName": "Doe",
                        "avatar": { "url": "https://example.com/avatar1.jpg" },
                    }},
                },
            }],
            "pageInfo": { "hasNextPage": true, "endCursor": "1" },
        }
    }));
}

#[tokio::test]
async fn posts_ordered_by_date() {
    let page = |after: &str| format!(r#"{{
        posts(first: 2, after: "{after}", where: {{ orderby: {{ field: DATE, order: DESC }} }}) {{
            edges {{ cursor node {{ date }} }}
            pageInfo {{ hasNextPage endCursor }}
        }}
    }}"#);

    let (data, errors) = execute(&page(""), config(CursorPolicy::Strict)).await;
    assert_eq!(errors, json!([]));
    assert_eq!(data["posts"], json!({
        "edges": [
            { "cursor": "0", "node": { "date": "2023-10-11" } },
            { "cursor": "1", "node": { "date": "2023-09-02" } },
        ],
        "pageInfo": { "hasNextPage": true, "endCursor": "2" },
    }));

    let (data, _) = execute(&page("2"), config(CursorPolicy::Strict)).await;
    assert_eq!(data["posts"], json!({
        "edges": [
            { "cursor": "2", "node": { "date": "2023-08-15" } },
            { "cursor": "3", "node": { "date": "2023-07-30" } },
        ],
        "pageInfo": { "hasNextPage": false, "endCursor": "" },
    }));
}

async fn post_ids(where_arg: &str) -> Vec<String> {
    let query = format!("{{
        posts(where: {where_arg}) {{ edges {{ node {{ databaseId }} }} }}
    }}");
    let (data, errors) = execute(&query, config(CursorPolicy::Strict)).await;
    assert_eq!(errors, json!([]), "where: {where_arg}");
    data["posts"]["edges"].as_array().unwrap()
        .iter()
        .map(|edge| edge["node"]["databaseId"].as_str().unwrap().to_owned())
        .collect()
}

#[tokio::test]
async fn posts_ordered_by_title_and_ascending() {
    assert_eq!(post_ids("{ orderby: { field: TITLE, order: DESC } }").await, ["4", "3", "2"]);
    assert_eq!(post_ids("{ orderby: { field: TITLE, order: ASC } }").await, ["1", "2", "3"]);
    assert_eq!(post_ids("{ orderby: { field: DATE, order: ASC } }").await, ["3", "1", "2"]);
}

#[tokio::test]
async fn orderby_fields_are_optional() {
    // Missing `order` means ascending, missing `field` means by date.
    assert_eq!(post_ids("{ orderby: { field: DATE } }").await, ["3", "1", "2"]);
    assert_eq!(post_ids("{ orderby: { field: TITLE } }").await, ["1", "2", "3"]);
    assert_eq!(post_ids("{ orderby: { order: DESC } }").await, ["4", "2", "1"]);
    assert_eq!(post_ids("{ orderby: {} }").await, ["3", "1", "2"]);
    assert_eq!(post_ids("{}").await, ["1", "2", "3"]);
}

#[tokio::test]
async fn where_input_as_variable() {
    let query = r#"query($where: WhereInput) {
        posts(first: 1, where: $where) { edges { node { databaseId } } }
    }"#;
    // Enum values arrive as JSON strings, like over HTTP.
    let where_value = serde_json::from_value(json!({ "orderby": { "field": "DATE" } })).unwrap();
    let variables: juniper::Variables = [("where".to_owned(), where_value)].into_iter().collect();

    let context = Context {
        store: Arc::new(Store::seed()),
        config: Arc::new(config(CursorPolicy::Strict)),
    };
    let (data, errors) = juniper::execute(query, None, &root_node(), &variables, &context)
        .await
        .expect("query failed to validate");
    assert!(errors.is_empty());
    assert_eq!(
        serde_json::to_value(&data).unwrap()["posts"]["edges"],
        json!([{ "node": { "databaseId": "3" } }]),
    );
}

#[test]
fn schema_contains_connection_types() {
    let sdl = root_node().as_sdl();
    for needle in [
        "type BookConnection",
        "BookConnection!",
        "type PageInfo",
        "endCursor: String!",
        "type PostEdge",
        "enum OrderDirection",
        "input WhereInput",
    ] {
        assert!(sdl.contains(needle), "schema does not contain '{needle}':\n{sdl}");
    }
}
