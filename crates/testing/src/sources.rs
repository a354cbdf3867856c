// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    str::FromStr,
    sync::{Arc, LazyLock, Mutex},
};

use bigdecimal::BigDecimal;
use chrono::DateTime;

use graph_model::{
    error::FieldError,
    host_type::HostEnum,
    source::{Arguments, HookFuture, HookKind, HookTable, ResolveInfo, Source},
    value::Val,
};
use graph_schema::{GraphSchema, RootType, RootTypes, SchemaBuildError, SchemaOptions};

use crate::records::{Gender, Mutation, Query, Subscription};

/// Books created through the `createBooks` mutation, shared by every root value of a schema.
#[derive(Clone, Default)]
pub struct LibraryStore {
    created: Arc<Mutex<Vec<Val>>>,
}

impl LibraryStore {
    pub fn created(&self) -> Vec<Val> {
        self.created
            .lock()
            .map(|created| created.clone())
            .unwrap_or_default()
    }

    fn add(&self, books: &[Val]) -> Result<Vec<Val>, FieldError> {
        let mut created = self
            .created
            .lock()
            .map_err(|e| FieldError::new(e.to_string()))?;
        let first_id = BOOKS.len() + created.len() + 1;
        created.extend(books.iter().cloned());

        Ok((first_id..first_id + books.len())
            .map(|id| Val::from(id.to_string()))
            .collect())
    }
}

/// The library schema with every root type.
pub fn library_schema(
    store: &LibraryStore,
    options: SchemaOptions,
) -> Result<GraphSchema, SchemaBuildError> {
    let mutation_store = store.clone();
    let roots = RootTypes::new(RootType::record::<Query>(|| Val::source(Library)))
        .mutation(RootType::record::<Mutation>(move || {
            Val::source(LibraryMutation {
                store: mutation_store.clone(),
            })
        }))
        .subscription(RootType::record::<Subscription>(|| Val::source(LibraryEvents)));

    GraphSchema::build(roots, options)
}

fn book(id: &str, title: &str, author_id: &str) -> Val {
    Val::object([
        ("id", Val::from(id)),
        ("title", Val::from(title)),
        ("author_id", Val::from(author_id)),
        ("page_count", Val::from(100i64)),
    ])
}

static BOOKS: LazyLock<Vec<Val>> = LazyLock::new(|| {
    let mut first = book("1", "X", "1");
    if let Val::Object(entries) = &mut first {
        entries.insert(
            "price".to_string(),
            BigDecimal::from_str("12.50").map(Val::from).unwrap_or(Val::Null),
        );
        entries.insert(
            "published".to_string(),
            DateTime::parse_from_rfc3339("2019-07-01T09:30:00+02:00")
                .map(Val::from)
                .unwrap_or(Val::Null),
        );
        entries.insert(
            "category".to_string(),
            Val::object([("id", "1"), ("name", "Fiction")]),
        );
    }
    vec![first, book("2", "Y", "2")]
});

/// An author row. Fields come from attributes, except `age` which is never disclosed.
pub struct AuthorRow {
    id: &'static str,
    name: &'static str,
    gender: Gender,
    location: Option<(f64, f64)>,
}

static AUTHORS: LazyLock<Vec<Arc<AuthorRow>>> = LazyLock::new(|| {
    vec![
        Arc::new(AuthorRow {
            id: "1",
            name: "Ada",
            gender: Gender::Female,
            location: Some((51.5, -0.12)),
        }),
        Arc::new(AuthorRow {
            id: "2",
            name: "Leo",
            gender: Gender::Male,
            location: None,
        }),
    ]
});

fn author(id: &str) -> Option<&'static Arc<AuthorRow>> {
    AUTHORS.iter().find(|author| author.id == id)
}

fn books_of(author_id: &str) -> Vec<Val> {
    BOOKS
        .iter()
        .filter(|book| book.get("author_id").and_then(Val::as_str) == Some(author_id))
        .cloned()
        .collect()
}

static AUTHOR_HOOKS: LazyLock<HookTable<AuthorRow>> = LazyLock::new(|| {
    HookTable::new().resolve("age", |author: Arc<AuthorRow>, _, _| async move {
        Err::<Val, _>(FieldError::new(format!("{} does not disclose their age", author.name)))
    })
});

impl Source for AuthorRow {
    fn type_name(&self) -> &str {
        "Author"
    }

    fn attribute(&self, field_name: &str) -> Option<Val> {
        match field_name {
            "id" => Some(Val::from(self.id)),
            "name" => Some(Val::from(self.name)),
            "gender" => Some(self.gender.to_val()),
            "location" => self.location.map(|(latitude, longitude)| {
                Val::object([("latitude", latitude), ("longitude", longitude)])
            }),
            "books" => Some(Val::List(books_of(self.id))),
            _ => None,
        }
    }

    fn invoke(
        self: Arc<Self>,
        kind: HookKind,
        field_name: &str,
        info: ResolveInfo,
        arguments: Arguments,
    ) -> Option<HookFuture> {
        AUTHOR_HOOKS.call(self, kind, field_name, info, arguments)
    }
}

fn author_val(author: &Arc<AuthorRow>) -> Val {
    Val::Source(author.clone())
}

/// The query root
pub struct Library;

static LIBRARY_HOOKS: LazyLock<HookTable<Library>> = LazyLock::new(|| {
    HookTable::new()
        .resolve("author", |_, _, arguments: Arguments| async move {
            Ok(arguments
                .get_str("id")
                .and_then(author)
                .map_or(Val::Null, author_val))
        })
        .resolve("authors", |_, _, _| async move {
            Ok(Val::list(AUTHORS.iter().map(author_val)))
        })
        .resolve("books_by_gender", |_, _, arguments: Arguments| async move {
            let gender = arguments
                .get("gender")
                .map(Gender::from_val)
                .transpose()?;
            let books = AUTHORS
                .iter()
                .filter(|author| Some(author.gender) == gender)
                .flat_map(|author| books_of(author.id));
            Ok(Val::list(books))
        })
        .resolve("books_connection", |_, _, _| async move {
            Ok(Val::List(BOOKS.clone()))
        })
        .resolve("authors_connection", |_, _, _| async move {
            let edges = AUTHORS.iter().map(|author| {
                Val::object([
                    ("node", author_val(author)),
                    ("cursor", Val::from(author.id)),
                ])
            });
            Ok(Val::object([("edges", Val::list(edges))]))
        })
});

impl Source for Library {
    fn type_name(&self) -> &str {
        "Query"
    }

    fn attribute(&self, field_name: &str) -> Option<Val> {
        (field_name == "categories").then(|| Val::list([Val::object([("id", "1"), ("name", "Fiction")])]))
    }

    fn invoke(
        self: Arc<Self>,
        kind: HookKind,
        field_name: &str,
        info: ResolveInfo,
        arguments: Arguments,
    ) -> Option<HookFuture> {
        LIBRARY_HOOKS.call(self, kind, field_name, info, arguments)
    }
}

/// The mutation root
pub struct LibraryMutation {
    store: LibraryStore,
}

static MUTATION_HOOKS: LazyLock<HookTable<LibraryMutation>> = LazyLock::new(|| {
    HookTable::new().mutate(
        "create_books",
        |root: Arc<LibraryMutation>, _, arguments: Arguments| async move {
            let books = arguments.get_list("books").unwrap_or_default();
            Ok(Val::List(root.store.add(books)?))
        },
    )
});

impl Source for LibraryMutation {
    fn type_name(&self) -> &str {
        "Mutation"
    }

    fn invoke(
        self: Arc<Self>,
        kind: HookKind,
        field_name: &str,
        info: ResolveInfo,
        arguments: Arguments,
    ) -> Option<HookFuture> {
        MUTATION_HOOKS.call(self, kind, field_name, info, arguments)
    }
}

/// The subscription root. `books_added` messages are delivered as published.
pub struct LibraryEvents;

static EVENT_HOOKS: LazyLock<HookTable<LibraryEvents>> = LazyLock::new(|| {
    HookTable::new().on("reviews_posted", |_, _, message: Val| async move {
        Ok(Val::from(format!(
            "review: {}",
            message.as_str().unwrap_or_default()
        )))
    })
});

impl Source for LibraryEvents {
    fn type_name(&self) -> &str {
        "Subscription"
    }

    fn on_message(
        self: Arc<Self>,
        field_name: &str,
        info: ResolveInfo,
        message: Val,
    ) -> Option<HookFuture> {
        EVENT_HOOKS.call_on(self, field_name, info, message)
    }
}
