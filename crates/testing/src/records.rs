// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use futures::FutureExt;

use graph_model::{
    field::{ArgumentDescriptor, FieldDescriptor},
    host_type::{
        Connection, ConnectionDescriptor, ConnectionKind, ConnectionRequest, HostEnum, HostType,
        Record, RecordDescriptor,
    },
    source::{HookFuture, HookKind},
    value::Val,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gender {
    Male,
    Female,
}

impl HostEnum for Gender {
    const NAME: &'static str = "Gender";

    fn members() -> &'static [Self] {
        &[Gender::Male, Gender::Female]
    }

    fn member(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

pub struct GeoLocation;

impl Record for GeoLocation {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("GeoLocation")
            .field(FieldDescriptor::new("latitude", HostType::float()))
            .field(FieldDescriptor::new("longitude", HostType::float()))
    }
}

pub struct Category;

impl Record for Category {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Category")
            .field(FieldDescriptor::new("id", HostType::id()))
            .field(FieldDescriptor::new("name", HostType::string()))
    }
}

pub struct Author;

impl Record for Author {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Author")
            .description("A person who wrote at least one book")
            .field(FieldDescriptor::new("id", HostType::id()))
            .field(FieldDescriptor::new("name", HostType::string()))
            .field(FieldDescriptor::new(
                "gender",
                HostType::optional(HostType::enumeration::<Gender>()),
            ))
            .field(FieldDescriptor::new("age", HostType::optional(HostType::int())))
            .field(FieldDescriptor::new(
                "location",
                HostType::optional(HostType::record::<GeoLocation>()),
            ))
            .field(
                FieldDescriptor::new("books", HostType::list(HostType::record::<Book>()))
                    .readonly(),
            )
    }
}

pub struct Book;

impl Record for Book {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Book")
            .field(FieldDescriptor::new("id", HostType::id()).readonly())
            .field(FieldDescriptor::new("title", HostType::string()))
            .field(FieldDescriptor::new("author_id", HostType::id()).inputonly())
            .field(
                FieldDescriptor::new("author", HostType::optional(HostType::record::<Author>()))
                    .readonly(),
            )
            .field(
                FieldDescriptor::new(
                    "category",
                    HostType::optional(HostType::record::<Category>()),
                )
                .readonly(),
            )
            .field(FieldDescriptor::new("price", HostType::optional(HostType::decimal())))
            .field(FieldDescriptor::new(
                "published",
                HostType::optional(HostType::date_time()),
            ))
            .field(FieldDescriptor::new("page_count", HostType::int()).default(0i64))
            .field(FieldDescriptor::new("_shelf", HostType::string()))
    }
}

/// Connections that count all elements and paginate with `first` and `after`.
///
/// The elements come from the parent's resolve hook for the connection field. Cursors are element
/// offsets.
pub struct CountedConnection;

impl ConnectionKind for CountedConnection {
    fn describe() -> ConnectionDescriptor {
        ConnectionDescriptor::new()
            .field(FieldDescriptor::new("total_count", HostType::int()))
            .resolver(paginate)
    }
}

fn paginate(request: ConnectionRequest) -> HookFuture {
    async move {
        let elements = match request.source.invoke(
            HookKind::Resolve,
            &request.field_name,
            request.info.clone(),
            request.arguments.clone(),
        ) {
            Some(hook) => hook.await?.into_val().await?,
            None => Val::List(vec![]),
        };
        let elements = elements.as_list().unwrap_or_default().to_vec();

        let total = elements.len();
        let start = request
            .arguments
            .get_str("after")
            .and_then(|cursor| cursor.parse::<usize>().ok())
            .map_or(0, |after| after + 1);
        let first = request
            .arguments
            .get_i64("first")
            .map_or(total, |first| first.max(0) as usize);

        let edges: Vec<Val> = elements
            .into_iter()
            .enumerate()
            .skip(start)
            .take(first)
            .map(|(offset, node)| Val::object([("node", node), ("cursor", offset.to_string().into())]))
            .collect();
        let end = start + edges.len();
        let cursor_of = |edge: Option<&Val>| edge.and_then(|e| e.get("cursor")).cloned().unwrap_or(Val::Null);

        let page_info = Val::object([
            ("has_next", Val::from(end < total)),
            ("has_previous", Val::from(start > 0)),
            ("start_cursor", cursor_of(edges.first())),
            ("end_cursor", cursor_of(edges.last())),
        ]);

        Ok(Val::object([
            ("total_count", Val::from(total)),
            ("page_info", page_info),
            ("edges", Val::List(edges)),
        ])
        .into())
    }
    .boxed()
}

pub struct Query;

impl Record for Query {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Query")
            .field(
                FieldDescriptor::new("author", HostType::optional(HostType::record::<Author>()))
                    .argument(ArgumentDescriptor::required("id", HostType::id())),
            )
            .field(FieldDescriptor::new(
                "authors",
                HostType::list(HostType::record::<Author>()),
            ))
            .field(
                FieldDescriptor::new(
                    "books_by_gender",
                    HostType::list(HostType::record::<Book>()),
                )
                .argument(ArgumentDescriptor::required(
                    "gender",
                    HostType::enumeration::<Gender>(),
                )),
            )
            .field(FieldDescriptor::new(
                "books_connection",
                HostType::connection::<CountedConnection>(HostType::record::<Book>()),
            ))
            .field(FieldDescriptor::new(
                "authors_connection",
                HostType::connection::<Connection>(HostType::record::<Author>()),
            ))
            .field(FieldDescriptor::new(
                "categories",
                HostType::list(HostType::record::<Category>()),
            ))
    }
}

pub struct Mutation;

impl Record for Mutation {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Mutation").field(
            FieldDescriptor::new("create_books", HostType::list(HostType::id())).argument(
                ArgumentDescriptor::required_list_input("books", HostType::record::<Book>()),
            ),
        )
    }
}

pub struct Subscription;

impl Record for Subscription {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Subscription")
            .field(FieldDescriptor::new("books_added", HostType::string()))
            .field(FieldDescriptor::new("reviews_posted", HostType::string()))
    }
}
