// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::{Arc, LazyLock, Mutex};

use futures::{FutureExt, stream};

use graph_model::{
    error::FieldError,
    field::{ArgumentDescriptor, FieldDescriptor},
    host_type::{
        ConnectionDescriptor, ConnectionKind, ConnectionRequest, HostEnum, HostType, Record,
        RecordDescriptor,
    },
    source::{Arguments, HookFuture, HookKind, HookTable, ResolveInfo, Resolved, Source},
    value::Val,
    wire::{SchemaModel, WireField},
};
use graph_model_builder::{BuildOptions, RootRecords};

pub struct Book;

impl Record for Book {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Book")
            .field(FieldDescriptor::new("id", HostType::id()))
            .field(FieldDescriptor::new("title", HostType::string()))
            .field(FieldDescriptor::new("page_count", HostType::int()).default(0i64))
            .field(FieldDescriptor::new("price", HostType::optional(HostType::decimal())))
            .field(FieldDescriptor::new("author_id", HostType::id()).inputonly())
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

/// Connections that report the number of all elements
pub struct CountedConnection;

impl ConnectionKind for CountedConnection {
    fn describe() -> ConnectionDescriptor {
        ConnectionDescriptor::new()
            .field(FieldDescriptor::new("total_count", HostType::int()))
            .resolver(|request: ConnectionRequest| -> HookFuture {
                async move {
                    let hook = request.source.invoke(
                        HookKind::Resolve,
                        "books",
                        request.info.clone(),
                        Arguments::new(),
                    );
                    let books = match hook {
                        Some(hook) => hook.await?.into_val().await?,
                        None => Val::List(vec![]),
                    };
                    let books = books.as_list().unwrap_or_default().to_vec();
                    let first = request
                        .arguments
                        .get_i64("first")
                        .map_or(books.len(), |n| n as usize);

                    Ok(Val::object([
                        ("total_count", Val::from(books.len())),
                        (
                            "edges",
                            Val::list(
                                books
                                    .into_iter()
                                    .take(first)
                                    .map(|book| Val::object([("node", book)])),
                            ),
                        ),
                    ])
                    .into())
                }
                .boxed()
            })
    }
}

struct Named;

impl Record for Named {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Named").field(FieldDescriptor::new("name", HostType::string()))
    }
}

struct Person;

impl Record for Person {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Person")
            .field(FieldDescriptor::new("name", HostType::string()))
            .implements("Named")
    }
}

struct Query;

impl Record for Query {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Query")
            .field(FieldDescriptor::new("title", HostType::string()))
            .field(FieldDescriptor::new(
                "books",
                HostType::list(HostType::record::<Book>()),
            ))
            .field(FieldDescriptor::new(
                "titles",
                HostType::list(HostType::string()),
            ))
            .field(
                FieldDescriptor::new("book", HostType::optional(HostType::record::<Book>()))
                    .argument(ArgumentDescriptor::required("id", HostType::id())),
            )
            .field(
                FieldDescriptor::new(
                    "books_by_gender",
                    HostType::list(HostType::record::<Book>()),
                )
                .argument(ArgumentDescriptor::new(
                    "gender",
                    HostType::enumeration::<Gender>(),
                )),
            )
            .field(FieldDescriptor::new(
                "books_connection",
                HostType::connection::<CountedConnection>(HostType::record::<Book>()),
            ))
            .field(FieldDescriptor::new(
                "broken",
                HostType::optional(HostType::string()),
            ))
    }
}

struct Mutation;

impl Record for Mutation {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Mutation").field(
            FieldDescriptor::new("create_books", HostType::list(HostType::id())).argument(
                ArgumentDescriptor::required_list_input("books", HostType::record::<Book>()),
            ),
        )
    }
}

struct Subscription;

impl Record for Subscription {
    fn describe() -> RecordDescriptor {
        RecordDescriptor::new("Subscription")
            .field(FieldDescriptor::new("books_added", HostType::string()))
    }
}

pub fn library_model() -> SchemaModel {
    let options = BuildOptions::default()
        .interface(Named::describe())
        .query_type(Person::describe());
    let roots = RootRecords::new(Query::describe())
        .mutation(Mutation::describe())
        .subscription(Subscription::describe());

    graph_model_builder::build(&roots, &options).unwrap()
}

pub fn query_field<'a>(model: &'a SchemaModel, name: &str) -> &'a WireField {
    model.field("Query", name).unwrap()
}

pub fn mutation_field<'a>(model: &'a SchemaModel, name: &str) -> &'a WireField {
    model.field("Mutation", name).unwrap()
}

fn book(id: &str, title: &str) -> Val {
    Val::object([("id", id), ("title", title)])
}

pub struct Catalog {
    books: Vec<Val>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            books: vec![book("1", "X"), book("2", "Y")],
        }
    }
}

static CATALOG_HOOKS: LazyLock<HookTable<Catalog>> = LazyLock::new(|| {
    HookTable::new()
        .resolve("books", |catalog: Arc<Catalog>, _, _| async move {
            Ok(Val::List(catalog.books.clone()))
        })
        .resolve("titles", |catalog: Arc<Catalog>, _, _| async move {
            let titles: Vec<Result<Val, FieldError>> = catalog
                .books
                .iter()
                .map(|book| Ok(book.get("title").cloned().unwrap_or(Val::Null)))
                .collect();
            Ok(Resolved::stream(stream::iter(titles)))
        })
        .resolve("broken", |_, _, _| async move {
            Err::<Val, _>(FieldError::new("shelf collapsed"))
        })
});

impl Source for Catalog {
    fn type_name(&self) -> &str {
        "Query"
    }

    fn attribute(&self, field_name: &str) -> Option<Val> {
        match field_name {
            "title" => Some(Val::from("Catalog")),
            "book" => {
                let books = self.books.clone();
                Some(Val::Thunk(Arc::new(
                    move |_info: ResolveInfo, arguments: Arguments| -> HookFuture {
                        let found = books
                            .iter()
                            .find(|book| book.get("id").and_then(Val::as_str) == arguments.get_str("id"))
                            .cloned()
                            .unwrap_or(Val::Null);
                        async move { Ok(found.into()) }.boxed()
                    },
                )))
            }
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
        CATALOG_HOOKS.call(self, kind, field_name, info, arguments)
    }
}

/// A mutation root that records the books it is asked to create
#[derive(Default)]
pub struct RecordingMutation {
    pub recorded: Arc<Mutex<Vec<Val>>>,
}

static MUTATION_HOOKS: LazyLock<HookTable<RecordingMutation>> = LazyLock::new(|| {
    HookTable::new().mutate(
        "create_books",
        |root: Arc<RecordingMutation>, _, arguments: Arguments| async move {
            let books = arguments.get_list("books").unwrap_or_default().to_vec();
            let mut recorded = root
                .recorded
                .lock()
                .map_err(|e| FieldError::new(e.to_string()))?;
            let first_id = recorded.len() + 3;
            let ids: Vec<Val> = (first_id..first_id + books.len())
                .map(|id| Val::from(id.to_string()))
                .collect();
            recorded.extend(books);
            Ok(Val::List(ids))
        },
    )
});

impl Source for RecordingMutation {
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

/// A subscription root that wraps each published title
pub struct Alerts;

static ALERT_HOOKS: LazyLock<HookTable<Alerts>> = LazyLock::new(|| {
    HookTable::new().on("books_added", |_, _, message: Val| async move {
        Ok(Val::from(format!("added: {}", message.as_str().unwrap_or_default())))
    })
});

impl Source for Alerts {
    fn type_name(&self) -> &str {
        "Subscription"
    }

    fn on_message(
        self: Arc<Self>,
        field_name: &str,
        info: ResolveInfo,
        message: Val,
    ) -> Option<HookFuture> {
        ALERT_HOOKS.call_on(self, field_name, info, message)
    }
}
