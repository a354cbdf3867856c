// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Conversion of the wire type graph into the execution engine's dynamic schema.
//!
//! Every object field resolves through the [`FieldDispatcher`], and every subscription field
//! listens to the pub/sub channel named after it. Host values travel between fields as
//! [`FieldValue::owned_any`] wrappers around [`Val`].

use std::{any::Any, sync::Arc};

use async_graphql::{
    Error, Name, PathSegment, Response, Value,
    dynamic::{
        Enum, EnumItem, Field, FieldFuture, FieldValue, InputObject, InputValue, Interface,
        InterfaceField, Object, ResolverContext, Scalar, SchemaBuilder, Subscription,
        SubscriptionField, SubscriptionFieldFuture, TypeRef,
    },
};
use futures::StreamExt;
use indexmap::IndexMap;
use tracing::debug;

use graph_model::{
    error::FieldError,
    host_type::EnumDescriptor,
    scalar::ScalarType,
    source::{OperationKind, ResolveInfo},
    value::Val,
    wire::{
        InputObjectType, InterfaceType, ObjectType, WireArgument, WireField, WireType,
        WireTypeRef,
    },
};
use graph_pubsub::PubSub;
use graph_resolver::{FieldDispatcher, FieldRequest, FieldResolver, Output, output::encode};

/// Per-request context value handed to resolvers through [`ResolveInfo::context`].
#[derive(Clone)]
pub struct RequestContext(pub Arc<dyn Any + Send + Sync>);

impl RequestContext {
    pub fn new(context: impl Any + Send + Sync) -> Self {
        Self(Arc::new(context))
    }
}

/// Register every type of the dispatcher's model with `builder`.
pub(crate) fn register_types(
    mut builder: SchemaBuilder,
    dispatcher: &FieldDispatcher,
    pubsub: &PubSub,
) -> SchemaBuilder {
    let model = dispatcher.model();

    for (_, wire_type) in model.types.iter() {
        builder = match wire_type {
            WireType::Scalar(scalar) if scalar.builtin => continue,
            WireType::Scalar(scalar) => builder.register(scalar_type(scalar)),
            WireType::Enum(descriptor) => builder.register(enum_type(descriptor)),
            WireType::Object(object) if model.subscription.as_deref() == Some(&object.name) => {
                builder.register(subscription_type(object, dispatcher, pubsub))
            }
            WireType::Object(object) => builder.register(object_type(object, dispatcher)),
            WireType::Interface(interface) => builder.register(interface_type(interface)),
            WireType::InputObject(input) => builder.register(input_object_type(input)),
        };
    }

    builder
}

fn type_ref(ty: &WireTypeRef) -> TypeRef {
    match ty {
        WireTypeRef::Named(name) => TypeRef::named(name.clone()),
        WireTypeRef::NonNull(inner) => TypeRef::NonNull(Box::new(type_ref(inner))),
        WireTypeRef::List(inner) => TypeRef::List(Box::new(type_ref(inner))),
    }
}

fn scalar_type(scalar: &ScalarType) -> Scalar {
    let codec = scalar.codec.clone();
    let wire = Scalar::new(scalar.wire_name.as_str())
        .validator(move |value| matches!(value, Value::Null) || codec.accepts(value));

    match &scalar.description {
        Some(description) => wire.description(description.as_str()),
        None => wire,
    }
}

fn enum_type(descriptor: &EnumDescriptor) -> Enum {
    let wire = Enum::new(descriptor.name.as_str())
        .items(descriptor.members.iter().map(|member| EnumItem::new(member.as_str())));

    match &descriptor.description {
        Some(description) => wire.description(description.as_str()),
        None => wire,
    }
}

fn input_value(argument: &WireArgument) -> InputValue {
    let mut value = InputValue::new(argument.name.as_str(), type_ref(&argument.ty));
    if let Some(default) = &argument.default {
        value = value.default_value(default.clone());
    }
    if let Some(description) = &argument.description {
        value = value.description(description.as_str());
    }
    value
}

fn input_object_type(input: &InputObjectType) -> InputObject {
    let mut wire = InputObject::new(input.name.as_str());
    if let Some(description) = &input.description {
        wire = wire.description(description.as_str());
    }

    input.fields.iter().fold(wire, |wire, field| {
        let mut value = InputValue::new(field.name.as_str(), type_ref(&field.ty));
        if let Some(default) = &field.default {
            value = value.default_value(default.clone());
        }
        if let Some(description) = &field.description {
            value = value.description(description.as_str());
        }
        wire.field(value)
    })
}

fn interface_type(interface: &InterfaceType) -> Interface {
    let mut wire = Interface::new(interface.name.as_str());
    if let Some(description) = &interface.description {
        wire = wire.description(description.as_str());
    }

    interface.fields.iter().fold(wire, |wire, field| {
        let mut wire_field = InterfaceField::new(field.name.as_str(), type_ref(&field.ty));
        if let Some(description) = &field.description {
            wire_field = wire_field.description(description.as_str());
        }
        wire.field(
            field
                .arguments
                .iter()
                .fold(wire_field, |wire_field, argument| {
                    wire_field.argument(input_value(argument))
                }),
        )
    })
}

fn object_type(object: &ObjectType, dispatcher: &FieldDispatcher) -> Object {
    let mut wire = Object::new(object.name.as_str());
    if let Some(description) = &object.description {
        wire = wire.description(description.as_str());
    }
    for interface in &object.interfaces {
        wire = wire.implement(interface.as_str());
    }

    object.fields.iter().fold(wire, |wire, field| {
        wire.field(object_field(&object.name, field, dispatcher))
    })
}

/// Where a field sits in the schema, shared by every invocation of its resolver.
struct FieldSite {
    parent_type: String,
    wire_name: String,
    nullable: bool,
}

fn object_field(parent_type: &str, field: &WireField, dispatcher: &FieldDispatcher) -> Field {
    let dispatcher = dispatcher.clone();
    let site = Arc::new(FieldSite {
        parent_type: parent_type.to_string(),
        wire_name: field.name.clone(),
        nullable: !field.ty.is_non_null(),
    });

    let mut wire = Field::new(field.name.as_str(), type_ref(&field.ty), move |ctx| {
        let dispatcher = dispatcher.clone();
        let site = site.clone();

        FieldFuture::new(async move {
            let arguments = owned_arguments(&ctx);
            let request = FieldRequest {
                parent_type: &site.parent_type,
                wire_name: &site.wire_name,
                operation: operation_kind(&ctx),
                arguments: &arguments,
                context: request_context(&ctx),
            };
            let parent = ctx
                .parent_value
                .downcast_ref::<Val>()
                .cloned()
                .unwrap_or(Val::Null);

            match dispatcher.resolve_output(&parent, &request).await {
                Ok(output) => Ok(field_value(output)),
                Err(error) => field_failure(&ctx, &site, error),
            }
        })
    });

    if let Some(description) = &field.description {
        wire = wire.description(description.as_str());
    }
    field
        .arguments
        .iter()
        .fold(wire, |wire, argument| wire.argument(input_value(argument)))
}

fn subscription_type(
    object: &ObjectType,
    dispatcher: &FieldDispatcher,
    pubsub: &PubSub,
) -> Subscription {
    let mut wire = Subscription::new(object.name.as_str());
    if let Some(description) = &object.description {
        wire = wire.description(description.as_str());
    }

    object.fields.iter().fold(wire, |wire, field| {
        wire.field(subscription_field(&object.name, field, dispatcher, pubsub))
    })
}

fn subscription_field(
    parent_type: &str,
    field: &WireField,
    dispatcher: &FieldDispatcher,
    pubsub: &PubSub,
) -> SubscriptionField {
    let dispatcher = dispatcher.clone();
    let pubsub = pubsub.clone();
    let parent_type = parent_type.to_string();
    let wire_name = field.name.clone();
    let host_name = field.host_name.clone();
    let ty = field.ty.clone();

    let mut wire = SubscriptionField::new(field.name.as_str(), type_ref(&field.ty), move |ctx| {
        let dispatcher = dispatcher.clone();
        let ty = ty.clone();
        let root = ctx
            .parent_value
            .downcast_ref::<Val>()
            .cloned()
            .unwrap_or(Val::Null);
        let info = ResolveInfo::new(
            host_name.as_str(),
            wire_name.as_str(),
            parent_type.as_str(),
            OperationKind::Subscription,
        )
        .with_context(request_context(&ctx));
        let messages = graph_resolver::subscription::subscribe_field(&pubsub, root, info);

        SubscriptionFieldFuture::new(async move {
            Ok(messages.map(move |message| {
                let output = encode(dispatcher.model(), &ty, message?)?;
                Ok::<_, FieldError>(field_value(output).unwrap_or(FieldValue::NULL))
            })
            .map(|item| item.map_err(|error| Error::new(error.to_string()))))
        })
    });

    if let Some(description) = &field.description {
        wire = wire.description(description.as_str());
    }
    field
        .arguments
        .iter()
        .fold(wire, |wire, argument| wire.argument(input_value(argument)))
}

fn owned_arguments(ctx: &ResolverContext<'_>) -> IndexMap<Name, Value> {
    ctx.args
        .iter()
        .map(|(name, value)| (name.clone(), value.as_value().clone()))
        .collect()
}

fn operation_kind(ctx: &ResolverContext<'_>) -> OperationKind {
    ctx.data_opt::<OperationKind>()
        .copied()
        .unwrap_or(OperationKind::Query)
}

fn request_context(ctx: &ResolverContext<'_>) -> Option<Arc<dyn Any + Send + Sync>> {
    ctx.data_opt::<RequestContext>()
        .map(|context| context.0.clone())
}

fn field_value<'a>(output: Output) -> Option<FieldValue<'a>> {
    match output {
        Output::Null => None,
        Output::Value(value) => Some(FieldValue::value(value)),
        Output::Object {
            type_name: None,
            value,
        } => Some(FieldValue::owned_any(value)),
        Output::Object {
            type_name: Some(type_name),
            value,
        } => Some(FieldValue::owned_any(value).with_type(type_name)),
        Output::List(items) => Some(FieldValue::list(
            items
                .into_iter()
                .map(|item| field_value(item).unwrap_or(FieldValue::NULL)),
        )),
    }
}

/// A failed nullable field is recorded at its path and resolves to null. A failed non-null field
/// is handed to the engine, which drops it from the result.
fn field_failure<'a>(
    ctx: &ResolverContext<'_>,
    site: &FieldSite,
    error: FieldError,
) -> async_graphql::Result<Option<FieldValue<'a>>> {
    debug!(
        parent_type = site.parent_type.as_str(),
        field = site.wire_name.as_str(),
        %error,
        "Field resolution failed"
    );

    let located =
        ctx.set_error_path(Error::new(error.to_string()).into_server_error(ctx.item.pos));
    if site.nullable {
        ctx.add_error(located);
        Ok(None)
    } else {
        Err(Error {
            message: located.message,
            source: Some(Arc::new(FieldPath(located.path))),
            extensions: located.extensions,
        })
    }
}

/// Path of a failed non-null field. The engine reports errors returned by a field future without
/// their path, so the path travels as the error source until [`restore_error_paths`].
#[derive(Debug)]
struct FieldPath(Vec<PathSegment>);

pub(crate) fn restore_error_paths(mut response: Response) -> Response {
    for error in response.errors.iter_mut().filter(|e| e.path.is_empty()) {
        let restored = error.source::<FieldPath>().map(|located| located.0.clone());
        if let Some(path) = restored {
            error.path = path;
        }
    }
    response
}
