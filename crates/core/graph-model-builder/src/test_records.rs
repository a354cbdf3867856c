// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use graph_model::{
    field::{ArgumentDescriptor, FieldDescriptor},
    host_type::{ConnectionDescriptor, ConnectionKind, HostEnum, HostType, Record, RecordDescriptor},
};

pub struct Author;

impl Record for Author {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Author")
            .field(FieldDescriptor::new("id", HostType::id()))
            .field(FieldDescriptor::new("name", HostType::string()))
            .field(FieldDescriptor::new("books", HostType::list(HostType::record::<Book>())).readonly())
    }
}

pub struct Book;

impl Record for Book {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Book")
            .field(FieldDescriptor::new("id", HostType::id()))
            .field(FieldDescriptor::new("title", HostType::string()))
            .field(FieldDescriptor::new("rating", HostType::optional(HostType::float())))
            .field(FieldDescriptor::new("page_count", HostType::int()).default(0i64))
            .field(
                FieldDescriptor::new("author", HostType::optional(HostType::record::<Author>()))
                    .readonly(),
            )
            .field(FieldDescriptor::new("author_id", HostType::id()).inputonly())
            .field(FieldDescriptor::new("_secret", HostType::string()))
    }
}

pub struct Hidden;

impl Record for Hidden {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Hidden")
            .field(FieldDescriptor::new("_internal", HostType::string()))
            .field(FieldDescriptor::new("skipped", HostType::string()).skip())
    }
}

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

pub struct CountedConnection;

impl ConnectionKind for CountedConnection {
    fn describe() -> ConnectionDescriptor {
        ConnectionDescriptor::new().field(FieldDescriptor::new("total_count", HostType::int()))
    }
}

pub struct Library;

impl Record for Library {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Library")
            .field(FieldDescriptor::new(
                "books_connection",
                HostType::connection::<CountedConnection>(HostType::record::<Book>()),
            ))
            .field(FieldDescriptor::new(
                "authors_connection",
                HostType::connection::<CountedConnection>(HostType::record::<Author>()),
            ))
    }
}

pub struct Query;

impl Record for Query {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Query")
            .field(FieldDescriptor::new("books", HostType::list(HostType::record::<Book>())))
            .field(
                FieldDescriptor::new("book", HostType::optional(HostType::record::<Book>()))
                    .argument(ArgumentDescriptor::required("id", HostType::id())),
            )
            .field(FieldDescriptor::new(
                "books_connection",
                HostType::connection::<CountedConnection>(HostType::record::<Book>()),
            ))
            .field(FieldDescriptor::new("gender", HostType::enumeration::<Gender>()))
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

pub struct LooseMutation;

impl Record for LooseMutation {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("LooseMutation").field(
            FieldDescriptor::new("create_books", HostType::list(HostType::id()))
                .argument(ArgumentDescriptor::list("books", HostType::record::<Book>())),
        )
    }
}
