// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, instrument};

use graph_model::{
    error::FieldError,
    host_type::ConnectionRequest,
    source::{Arguments, HookKind, OperationKind, ResolveInfo},
    value::Val,
    wire::{SchemaModel, WireField},
};

use crate::{
    arguments::decode_arguments,
    field_resolver::{FieldRequest, FieldResolver},
    output::{Output, encode},
};

/// Resolves every field of a schema.
///
/// Resolution order for a field:
/// 1. on the mutation root, the `Mutate` hook of the field
/// 2. for a connection-typed field, the resolver of its connection kind
/// 3. the key of a mapping parent, or else the `Resolve` hook of the field, or else the plain
///    attribute of the same name
///
/// A callable result is then invoked with the field arguments, and a streamed result is collected
/// into a list.
#[derive(Clone, Debug)]
pub struct FieldDispatcher {
    model: Arc<SchemaModel>,
}

impl FieldDispatcher {
    pub fn new(model: Arc<SchemaModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &SchemaModel {
        &self.model
    }

    fn wire_field(&self, parent_type: &str, wire_name: &str) -> Result<&WireField, FieldError> {
        self.model.field(parent_type, wire_name).ok_or_else(|| {
            FieldError::new(format!(
                "Field `{wire_name}` is not defined on type `{parent_type}`"
            ))
        })
    }

    fn is_mutation_root(&self, type_name: &str) -> bool {
        self.model.mutation.as_deref() == Some(type_name)
    }

    async fn resolve_generic(
        &self,
        parent: &Val,
        info: ResolveInfo,
        arguments: Arguments,
    ) -> Result<Val, FieldError> {
        let field_name = info.field_name.clone();

        let value = match parent {
            Val::Object(entries) => entries.get(&field_name).cloned().unwrap_or(Val::Null),
            Val::Source(source) => {
                match source
                    .clone()
                    .invoke(HookKind::Resolve, &field_name, info.clone(), arguments.clone())
                {
                    Some(hook) => hook.await?.into_val().await?,
                    None => source.attribute(&field_name).unwrap_or(Val::Null),
                }
            }
            _ => Val::Null,
        };

        match value {
            Val::Thunk(resolver) => resolver(info, arguments).await?.into_val().await,
            value => Ok(value),
        }
    }
}

#[async_trait]
impl FieldResolver for FieldDispatcher {
    #[instrument(
        name = "FieldDispatcher::resolve_field",
        skip_all,
        fields(parent_type = request.parent_type, field = request.wire_name)
    )]
    async fn resolve_field(
        &self,
        parent: &Val,
        request: &FieldRequest<'_>,
    ) -> Result<Val, FieldError> {
        let field = self.wire_field(request.parent_type, request.wire_name)?;
        let field_name = field.host_name.clone();
        let arguments = decode_arguments(&self.model, field, request.arguments)?;
        let info = ResolveInfo::new(
            &field_name,
            request.wire_name,
            request.parent_type,
            request.operation,
        )
        .with_context(request.context.clone());

        if request.operation == OperationKind::Mutation && self.is_mutation_root(request.parent_type)
        {
            if let Some(hook) =
                parent.invoke(HookKind::Mutate, &field_name, info.clone(), arguments.clone())
            {
                debug!("Dispatching to mutate hook");
                return hook.await?.into_val().await;
            }
        }

        if let Some(binding) = &field.connection {
            match &binding.resolver {
                Some(resolver) => {
                    debug!("Dispatching to connection resolver");
                    return resolver(ConnectionRequest {
                        source: parent.clone(),
                        field_name,
                        element_type: binding.element_type.clone(),
                        info,
                        arguments,
                    })
                    .await?
                    .into_val()
                    .await;
                }
                None => {
                    error!(
                        element_type = binding.element_type.as_str(),
                        "Connection field has no connection resolver, using the parent value"
                    );
                }
            }
        }

        self.resolve_generic(parent, info, arguments).await
    }

    async fn resolve_output(
        &self,
        parent: &Val,
        request: &FieldRequest<'_>,
    ) -> Result<Output, FieldError> {
        let value = self.resolve_field(parent, request).await?;
        let field = self.wire_field(request.parent_type, request.wire_name)?;
        encode(&self.model, &field.ty, value)
    }
}

#[cfg(test)]
mod tests {
    use async_graphql_value::{ConstValue, Name, value};
    use indexmap::IndexMap;
    use test_log::test;

    use super::*;
    use crate::test_support::{Catalog, RecordingMutation, library_model};

    fn dispatcher() -> FieldDispatcher {
        FieldDispatcher::new(Arc::new(library_model()))
    }

    fn no_arguments() -> IndexMap<Name, ConstValue> {
        IndexMap::new()
    }

    fn request<'a>(
        parent_type: &'a str,
        wire_name: &'a str,
        operation: OperationKind,
        arguments: &'a IndexMap<Name, ConstValue>,
    ) -> FieldRequest<'a> {
        FieldRequest {
            parent_type,
            wire_name,
            operation,
            arguments,
            context: None,
        }
    }

    #[test(tokio::test)]
    async fn mapping_parents_are_looked_up_by_host_name() {
        let parent = Val::object([("page_count", 12i64)]);
        let arguments = no_arguments();

        let value = dispatcher()
            .resolve_field(
                &parent,
                &request("Book", "pageCount", OperationKind::Query, &arguments),
            )
            .await
            .unwrap();
        assert_eq!(value, Val::from(12i64));
    }

    #[test(tokio::test)]
    async fn resolve_hooks_win_over_attributes() {
        let catalog = Val::source(Catalog::default());
        let arguments = no_arguments();
        let dispatcher = dispatcher();

        let books = dispatcher
            .resolve_field(
                &catalog,
                &request("Query", "books", OperationKind::Query, &arguments),
            )
            .await
            .unwrap();
        assert_eq!(books.as_list().map(<[Val]>::len), Some(2));

        // `title` has no hook, so the attribute is used
        let title = dispatcher
            .resolve_field(
                &catalog,
                &request("Query", "title", OperationKind::Query, &arguments),
            )
            .await
            .unwrap();
        assert_eq!(title, Val::from("Catalog"));
    }

    #[test(tokio::test)]
    async fn streamed_results_are_collected() {
        let catalog = Val::source(Catalog::default());
        let arguments = no_arguments();

        let output = dispatcher()
            .resolve_output(
                &catalog,
                &request("Query", "titles", OperationKind::Query, &arguments),
            )
            .await
            .unwrap();
        assert_eq!(
            output,
            Output::List(vec![
                Output::Value(ConstValue::String("X".to_string())),
                Output::Value(ConstValue::String("Y".to_string())),
            ])
        );
    }

    #[test(tokio::test)]
    async fn callable_values_are_invoked_with_arguments() {
        let catalog = Val::source(Catalog::default());
        let arguments = match value!({ "id": "Mg==" }) {
            ConstValue::Object(entries) => entries,
            _ => unreachable!(),
        };

        let book = dispatcher()
            .resolve_field(
                &catalog,
                &request("Query", "book", OperationKind::Query, &arguments),
            )
            .await
            .unwrap();
        assert_eq!(book.get("title"), Some(&Val::from("Y")));
    }

    #[test(tokio::test)]
    async fn mutate_hooks_run_only_for_mutations() {
        let root = RecordingMutation::default();
        let recorded = root.recorded.clone();
        let root = Val::source(root);
        let arguments = match value!({ "books": [{ "title": "New", "authorId": "MQ==" }] }) {
            ConstValue::Object(entries) => entries,
            _ => unreachable!(),
        };

        let ids = dispatcher()
            .resolve_field(
                &root,
                &request("Mutation", "createBooks", OperationKind::Mutation, &arguments),
            )
            .await
            .unwrap();
        assert_eq!(ids, Val::list(["3"]));

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].get("author_id"), Some(&Val::from("1")));
    }

    #[test(tokio::test)]
    async fn connection_fields_use_the_connection_resolver() {
        let catalog = Val::source(Catalog::default());
        let arguments = match value!({ "first": 1 }) {
            ConstValue::Object(entries) => entries,
            _ => unreachable!(),
        };

        let connection = dispatcher()
            .resolve_field(
                &catalog,
                &request("Query", "booksConnection", OperationKind::Query, &arguments),
            )
            .await
            .unwrap();
        assert_eq!(connection.get("total_count"), Some(&Val::from(2i64)));
        assert_eq!(
            connection
                .get("edges")
                .and_then(Val::as_list)
                .map(<[Val]>::len),
            Some(1)
        );
    }

    #[test(tokio::test)]
    async fn resolver_failures_are_field_errors() {
        let catalog = Val::source(Catalog::default());
        let arguments = no_arguments();

        let error = dispatcher()
            .resolve_field(
                &catalog,
                &request("Query", "broken", OperationKind::Query, &arguments),
            )
            .await
            .unwrap_err();
        assert_eq!(error, FieldError::new("shelf collapsed"));
    }

    #[test(tokio::test)]
    async fn unknown_fields_are_errors() {
        let arguments = no_arguments();

        assert!(
            dispatcher()
                .resolve_field(
                    &Val::Null,
                    &request("Query", "missing", OperationKind::Query, &arguments),
                )
                .await
                .is_err()
        );
    }
}
