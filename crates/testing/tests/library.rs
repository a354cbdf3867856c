// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql::{PathSegment, Request, value};
use test_log::test;

use graph_model::{
    value::Val,
    wire::{SchemaModel, WireType},
};
use graph_schema::{GraphSchema, SchemaOptions};
use graph_testing::{LibraryStore, library_schema};

fn schema() -> GraphSchema {
    library_schema(&LibraryStore::default(), SchemaOptions::default()).unwrap()
}

fn input_field_names(model: &SchemaModel, type_name: &str) -> Vec<String> {
    match model.get(type_name) {
        Some(WireType::InputObject(input)) => {
            input.fields.iter().map(|field| field.name.clone()).collect()
        }
        _ => panic!("`{type_name}` is not an input object"),
    }
}

#[test(tokio::test)]
async fn connections_count_and_page() {
    let response = schema()
        .execute(Request::new(
            "{ booksConnection(first: 2) { totalCount edges { cursor node { id title } } pageInfo { hasNext hasPrevious } } }",
        ))
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data,
        value!({
            "booksConnection": {
                "totalCount": 2,
                "edges": [
                    { "cursor": "0", "node": { "id": "MQ==", "title": "X" } },
                    { "cursor": "1", "node": { "id": "Mg==", "title": "Y" } },
                ],
                "pageInfo": { "hasNext": false, "hasPrevious": false },
            }
        })
    );
}

#[test(tokio::test)]
async fn pagination_arguments_reach_the_connection_resolver() {
    let response = schema()
        .execute(Request::new(
            r#"{ booksConnection(first: 1, after: "0") { edges { node { title } } pageInfo { hasNext hasPrevious startCursor endCursor } } }"#,
        ))
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data,
        value!({
            "booksConnection": {
                "edges": [{ "node": { "title": "Y" } }],
                "pageInfo": {
                    "hasNext": false,
                    "hasPrevious": true,
                    "startCursor": "1",
                    "endCursor": "1",
                },
            }
        })
    );
}

#[test(tokio::test)]
async fn plain_connections_use_the_parent_value() {
    let response = schema()
        .execute(Request::new(
            "{ authorsConnection { edges { cursor node { name } } pageInfo { hasNext } } }",
        ))
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data,
        value!({
            "authorsConnection": {
                "edges": [
                    { "cursor": "1", "node": { "name": "Ada" } },
                    { "cursor": "2", "node": { "name": "Leo" } },
                ],
                "pageInfo": null,
            }
        })
    );
}

#[test(tokio::test)]
async fn scalars_are_encoded_for_the_wire() {
    let response = schema()
        .execute(Request::new(
            "{ booksConnection(first: 1) { edges { node { price published pageCount category { name } author { name } } } } }",
        ))
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data,
        value!({
            "booksConnection": {
                "edges": [{
                    "node": {
                        "price": 12.5,
                        "published": "2019-07-01T09:30:00+02:00",
                        "pageCount": 100,
                        "category": { "name": "Fiction" },
                        "author": null,
                    }
                }]
            }
        })
    );
}

#[test(tokio::test)]
async fn enums_and_nested_records() {
    let response = schema()
        .execute(Request::new(
            r#"{ author(id: "MQ==") { name gender location { latitude } books { title } } booksByGender(gender: MALE) { title } }"#,
        ))
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data,
        value!({
            "author": {
                "name": "Ada",
                "gender": "FEMALE",
                "location": { "latitude": 51.5 },
                "books": [{ "title": "X" }],
            },
            "booksByGender": [{ "title": "Y" }],
        })
    );
}

#[test(tokio::test)]
async fn missing_records_are_null() {
    let response = schema()
        .execute(Request::new(r#"{ author(id: "OQ==") { name } }"#))
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data, value!({ "author": null }));
}

#[test(tokio::test)]
async fn resolver_failures_are_reported_with_their_path() {
    let response = schema()
        .execute(Request::new(r#"{ author(id: "MQ==") { name age } }"#))
        .await;

    assert_eq!(
        response.data,
        value!({ "author": { "name": "Ada", "age": null } })
    );
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "Ada does not disclose their age");
    assert_eq!(
        response.errors[0].path,
        vec![
            PathSegment::Field("author".to_string()),
            PathSegment::Field("age".to_string()),
        ]
    );
}

#[test(tokio::test)]
async fn mutations_receive_decoded_inputs() {
    let store = LibraryStore::default();
    let schema = library_schema(&store, SchemaOptions::default()).unwrap();

    let response = schema
        .execute(Request::new(
            r#"mutation { createBooks(books: [{title: "New", authorId: "MQ=="}]) }"#,
        ))
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data, value!({ "createBooks": ["Mw=="] }));

    let created = store.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].get("title"), Some(&Val::from("New")));
    assert_eq!(created[0].get("author_id"), Some(&Val::from("1")));
    assert_eq!(created[0].get("page_count"), Some(&Val::from(0i64)));
    assert!(created[0].get("authorId").is_none());
}

#[test(tokio::test)]
async fn single_inputs_are_accepted_for_list_arguments() {
    let store = LibraryStore::default();
    let schema = library_schema(&store, SchemaOptions::default()).unwrap();

    let response = schema
        .execute(Request::new(
            r#"mutation { createBooks(books: {title: "Solo", authorId: "Mg==", pageCount: 12}) }"#,
        ))
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data, value!({ "createBooks": ["Mw=="] }));
    assert_eq!(store.created()[0].get("page_count"), Some(&Val::from(12i64)));
}

#[test(tokio::test)]
async fn mutation_roots_share_the_store() {
    let store = LibraryStore::default();
    let schema = library_schema(&store, SchemaOptions::default()).unwrap();
    let mutation = r#"mutation($books: [BookInput]!) { createBooks(books: $books) }"#;

    for expected in ["Mw==", "NA=="] {
        let response = schema
            .run(
                mutation,
                None,
                None,
                Some(serde_json::json!({ "books": [{ "title": "Again", "authorId": "MQ==" }] })),
                None,
            )
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(response.data, value!({ "createBooks": [expected] }));
    }
    assert_eq!(store.created().len(), 2);
}

#[test]
fn field_visibility_follows_the_field_flags() {
    let schema = schema();
    let model = schema.model();

    assert!(model.field("Book", "id").is_some());
    assert!(model.field("Book", "author").is_some());
    assert!(model.field("Book", "authorId").is_none());
    assert!(model.field("Book", "_shelf").is_none());

    let inputs = input_field_names(model, "BookInput");
    assert!(inputs.contains(&"authorId".to_string()));
    assert!(inputs.contains(&"pageCount".to_string()));
    assert!(!inputs.contains(&"id".to_string()));
    assert!(!inputs.contains(&"author".to_string()));
    assert!(!inputs.contains(&"_shelf".to_string()));

    assert!(!schema.sdl().contains("_shelf"));
}

#[test]
fn self_referential_records_are_defined_once() {
    let sdl = schema().sdl();

    assert_eq!(sdl.matches("type Author {").count(), 1);
    assert_eq!(sdl.matches("type Book {").count(), 1);
    assert!(sdl.contains("A person who wrote at least one book"));
    assert!(sdl.contains("type BookConnection"));
    assert!(sdl.contains("type AuthorConnection"));
    assert_eq!(sdl.matches("type PageInfo {").count(), 1);
}

#[test(tokio::test)]
async fn schemas_are_independent() {
    let camel = schema();
    let verbatim =
        library_schema(&LibraryStore::default(), SchemaOptions::default().camelcase(false))
            .unwrap();

    assert!(camel.sdl().contains("booksConnection"));
    assert!(!camel.sdl().contains("books_connection"));
    assert!(verbatim.sdl().contains("books_connection"));

    let response = verbatim
        .execute(Request::new("{ books_connection { total_count } }"))
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data,
        value!({ "books_connection": { "total_count": 2 } })
    );

    let _subscription = camel.pubsub().subscribe("books_added");
    assert_eq!(camel.pubsub().subscriber_count("books_added"), 1);
    assert_eq!(verbatim.pubsub().subscriber_count("books_added"), 0);
}

#[test(tokio::test)]
async fn introspection_can_be_disabled() {
    let schema =
        library_schema(&LibraryStore::default(), SchemaOptions::default().introspection(false))
            .unwrap();

    let response = schema
        .execute(Request::new("{ __schema { queryType { name } } }"))
        .await;
    let data = response.data.into_json().unwrap();
    assert!(data.get("__schema").is_none_or(serde_json::Value::is_null));
}
