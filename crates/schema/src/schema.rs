// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{any::Any, sync::Arc};

use async_graphql::{
    Request, Response, Variables,
    dynamic::{DynamicRequestExt, FieldValue, Schema},
};
use async_graphql_parser::{parse_query, types::{DocumentOperations, OperationType}};
use futures::{StreamExt, stream::BoxStream};
use tracing::{debug, instrument};

use graph_model::{source::OperationKind, value::Val, wire::SchemaModel};
use graph_pubsub::PubSub;
use graph_resolver::FieldDispatcher;

use crate::{
    assembly::{RequestContext, register_types, restore_error_paths},
    error::SchemaBuildError,
    options::SchemaOptions,
    roots::{RootFactory, RootTypes},
};

/// An executable schema built from host type descriptions.
#[derive(Clone)]
pub struct GraphSchema {
    schema: Schema,
    model: Arc<SchemaModel>,
    roots: RootTypes,
    pubsub: PubSub,
}

impl GraphSchema {
    /// Build the wire type graph for `roots` and hand it to the engine, which validates it.
    #[instrument(skip_all, fields(query = %roots.query.descriptor.name))]
    pub fn build(roots: RootTypes, options: SchemaOptions) -> Result<Self, SchemaBuildError> {
        let model = Arc::new(graph_model_builder::build(
            &roots.records(),
            &options.build_options(),
        )?);
        let dispatcher = FieldDispatcher::new(model.clone());

        let builder = Schema::build(
            &model.query,
            model.mutation.as_deref(),
            model.subscription.as_deref(),
        );
        let mut builder = register_types(builder, &dispatcher, &options.pubsub);

        if let Some(depth) = options.limit_depth {
            builder = builder.limit_depth(depth);
        }
        if let Some(complexity) = options.limit_complexity {
            builder = builder.limit_complexity(complexity);
        }
        if !options.introspection {
            builder = builder.disable_introspection();
        }

        let schema = builder.finish()?;
        debug!(types = model.types.len(), "Schema built");

        Ok(Self {
            schema,
            model,
            roots,
            pubsub: options.pubsub,
        })
    }

    /// Execute `query`.
    ///
    /// Without an explicit `root`, mutations run against a value of the mutation root and every
    /// other operation against a value of the query root.
    pub async fn run(
        &self,
        query: &str,
        root: Option<Val>,
        context: Option<Arc<dyn Any + Send + Sync>>,
        variables: Option<serde_json::Value>,
        operation_name: Option<&str>,
    ) -> Response {
        let mut request = Request::new(query);
        if let Some(variables) = variables {
            request = request.variables(Variables::from_json(variables));
        }
        if let Some(operation_name) = operation_name {
            request = request.operation_name(operation_name);
        }
        if let Some(context) = context {
            request = request.data(RequestContext(context));
        }

        self.execute_with_root(request, root).await
    }

    /// Execute an engine request against the root value of its operation.
    pub async fn execute(&self, request: Request) -> Response {
        self.execute_with_root(request, None).await
    }

    #[instrument(skip_all, fields(operation_name = request.operation_name.as_deref()))]
    async fn execute_with_root(&self, request: Request, root: Option<Val>) -> Response {
        let (request, root) = self.prepare(request, root);
        restore_error_paths(self.schema.execute(request.root_value(root)).await)
    }

    /// Execute a subscription. Each message published to a subscribed field's channel produces one
    /// response; dropping the stream unsubscribes.
    pub fn subscribe(&self, request: Request) -> BoxStream<'static, Response> {
        let (request, root) = self.prepare(request, None);
        self.schema
            .execute_stream(request.root_value(root))
            .map(restore_error_paths)
            .boxed()
    }

    fn prepare(&self, request: Request, root: Option<Val>) -> (Request, FieldValue<'static>) {
        let operation = operation_kind(&request.query, request.operation_name.as_deref());
        let root = root.or_else(|| self.root_factory(operation).map(|factory| factory()));

        let root = match root {
            Some(root) => FieldValue::owned_any(root),
            None => FieldValue::NULL,
        };
        (request.data(operation), root)
    }

    fn root_factory(&self, operation: OperationKind) -> Option<&RootFactory> {
        match operation {
            OperationKind::Query => Some(&self.roots.query.factory),
            OperationKind::Mutation => self.roots.mutation.as_ref().map(|root| &root.factory),
            OperationKind::Subscription => {
                self.roots.subscription.as_ref().map(|root| &root.factory)
            }
        }
    }

    /// The schema in GraphQL schema definition language
    pub fn sdl(&self) -> String {
        self.schema.sdl()
    }

    pub fn model(&self) -> &SchemaModel {
        &self.model
    }

    pub fn pubsub(&self) -> &PubSub {
        &self.pubsub
    }
}

/// The kind of the operation that `query` will run. Documents that do not parse are reported by
/// the engine, so they count as queries here.
pub fn operation_kind(query: &str, operation_name: Option<&str>) -> OperationKind {
    let Ok(document) = parse_query(query) else {
        return OperationKind::Query;
    };

    let operation = match (&document.operations, operation_name) {
        (DocumentOperations::Single(operation), _) => Some(operation),
        (DocumentOperations::Multiple(operations), Some(name)) => operations
            .iter()
            .find(|(operation_name, _)| operation_name.as_str() == name)
            .map(|(_, operation)| operation),
        (DocumentOperations::Multiple(operations), None) if operations.len() == 1 => {
            operations.values().next()
        }
        (DocumentOperations::Multiple(_), None) => None,
    };

    match operation.map(|operation| operation.node.ty) {
        Some(OperationType::Mutation) => OperationKind::Mutation,
        Some(OperationType::Subscription) => OperationKind::Subscription,
        Some(OperationType::Query) | None => OperationKind::Query,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use async_graphql::{PathSegment, value};
    use test_log::test;

    use graph_model::{
        error::{FieldError, ModelBuildingError},
        field::{ArgumentDescriptor, FieldDescriptor},
        host_type::{HostType, Record, RecordDescriptor},
        source::{Arguments, HookFuture, HookKind, HookTable, ResolveInfo, Source},
    };

    use super::*;
    use crate::roots::RootType;

    struct Query;

    impl Record for Query {
        fn describe() -> RecordDescriptor {
            RecordDescriptor::new("Query")
                .field(FieldDescriptor::new("name", HostType::string()))
                .field(FieldDescriptor::new("age", HostType::optional(HostType::int())))
                .field(FieldDescriptor::new("nickname", HostType::string()))
                .field(FieldDescriptor::new(
                    "greeting",
                    HostType::optional(HostType::string()),
                ))
                .field(FieldDescriptor::new("point_x_y", HostType::int()))
                .field(
                    FieldDescriptor::new("rank", HostType::string())
                        .argument(ArgumentDescriptor::new("is_a_b", HostType::boolean())),
                )
        }
    }

    struct Mutation;

    impl Record for Mutation {
        fn describe() -> RecordDescriptor {
            RecordDescriptor::new("Mutation").field(
                FieldDescriptor::new("rename_profile", HostType::string())
                    .argument(ArgumentDescriptor::required("name", HostType::string())),
            )
        }
    }

    struct Profile;

    static PROFILE_HOOKS: LazyLock<HookTable<Profile>> = LazyLock::new(|| {
        HookTable::new()
            .resolve("age", |_, _, _| async move {
                Err::<Val, _>(FieldError::new("age is unknown"))
            })
            .resolve("nickname", |_, _, _| async move {
                Err::<Val, _>(FieldError::new("no nickname"))
            })
            .resolve("greeting", |_, info: ResolveInfo, _| async move {
                let visitor = info.context::<String>().cloned().unwrap_or_default();
                Ok(Val::from(format!("Hello, {visitor}")))
            })
            .resolve("rank", |_, _, arguments: Arguments| async move {
                let received = arguments.get("is_a_b").is_some();
                Ok(Val::from(if received { "flag received" } else { "flag missing" }))
            })
            .mutate("rename_profile", |_, _, arguments: Arguments| async move {
                Ok(Val::from(format!(
                    "renamed to {}",
                    arguments.get_str("name").unwrap_or_default()
                )))
            })
    });

    impl Source for Profile {
        fn type_name(&self) -> &str {
            "Query"
        }

        fn attribute(&self, field_name: &str) -> Option<Val> {
            match field_name {
                "name" => Some(Val::from("Ada")),
                "point_x_y" => Some(Val::from(3)),
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
            PROFILE_HOOKS.call(self, kind, field_name, info, arguments)
        }
    }

    fn roots() -> RootTypes {
        RootTypes::new(RootType::record::<Query>(|| Val::source(Profile)))
            .mutation(RootType::record::<Mutation>(|| Val::source(Profile)))
    }

    fn schema() -> GraphSchema {
        GraphSchema::build(roots(), SchemaOptions::default()).unwrap()
    }

    #[test]
    fn operation_kinds() {
        assert_eq!(operation_kind("{ name }", None), OperationKind::Query);
        assert_eq!(
            operation_kind("mutation { renameProfile(name: \"B\") }", None),
            OperationKind::Mutation
        );
        assert_eq!(
            operation_kind(
                "query A { name } subscription B { booksAdded }",
                Some("B")
            ),
            OperationKind::Subscription
        );
        assert_eq!(operation_kind("mutation {", None), OperationKind::Query);
    }

    #[test]
    fn records_without_fields_are_rejected() {
        let roots = RootTypes::new(RootType::new(RecordDescriptor::new("Query"), || Val::Null));

        assert!(matches!(
            GraphSchema::build(roots, SchemaOptions::default()),
            Err(SchemaBuildError::Model(ModelBuildingError::EmptyType(_)))
        ));
    }

    #[test]
    fn sdl_uses_wire_names() {
        let sdl = schema().sdl();

        assert!(sdl.contains("type Query"));
        assert!(sdl.contains("renameProfile(name: String!): String!"));
    }

    #[test(tokio::test)]
    async fn failing_nullable_fields_are_null() {
        let response = schema().run("{ name age }", None, None, None, None).await;

        assert_eq!(response.data, value!({ "name": "Ada", "age": null }));
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "age is unknown");
        assert_eq!(
            response.errors[0].path,
            vec![PathSegment::Field("age".to_string())]
        );
    }

    #[test(tokio::test)]
    async fn failing_non_null_fields_are_dropped() {
        let response = schema().run("{ name nickname }", None, None, None, None).await;

        assert_eq!(response.data, value!({ "name": "Ada" }));
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "no nickname");
        assert_eq!(
            response.errors[0].path,
            vec![PathSegment::Field("nickname".to_string())]
        );
    }

    #[test(tokio::test)]
    async fn single_letter_segments_keep_their_host_name() {
        let response = schema()
            .run("{ pointXY rank(isAB: true) }", None, None, None, None)
            .await;

        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(response.data, value!({ "pointXY": 3, "rank": "flag received" }));
    }

    #[test(tokio::test)]
    async fn context_reaches_resolvers() {
        let context: Arc<dyn Any + Send + Sync> = Arc::new("Grace".to_string());
        let response = schema()
            .run("{ greeting }", None, Some(context), None, None)
            .await;

        assert!(response.errors.is_empty());
        assert_eq!(response.data, value!({ "greeting": "Hello, Grace" }));
    }

    #[test(tokio::test)]
    async fn mutations_run_against_the_mutation_root() {
        let response = schema()
            .run(
                "mutation Rename($name: String!) { renameProfile(name: $name) }",
                None,
                None,
                Some(serde_json::json!({ "name": "Bea" })),
                Some("Rename"),
            )
            .await;

        assert!(response.errors.is_empty());
        assert_eq!(response.data, value!({ "renameProfile": "renamed to Bea" }));
    }

    #[test(tokio::test)]
    async fn explicit_roots_replace_the_factories() {
        let root = Val::object([("name", "Lin")]);
        let response = schema().run("{ name }", Some(root), None, None, None).await;

        assert_eq!(response.data, value!({ "name": "Lin" }));
    }

    #[test(tokio::test)]
    async fn engine_limits_are_applied() {
        let schema = GraphSchema::build(
            roots(),
            SchemaOptions::default().limit_complexity(1),
        )
        .unwrap();

        let response = schema.execute(Request::new("{ name age }")).await;
        assert!(!response.errors.is_empty());
    }
}
