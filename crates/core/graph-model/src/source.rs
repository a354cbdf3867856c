// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Resolver capabilities of object-shaped host values.
//!
//! A host type exposes its resolvers through a [`HookTable`], a dispatch table keyed by hook kind
//! and host field name. The dispatcher checks the table explicitly instead of probing for
//! methods: `Mutate` hooks for mutation root fields, `Resolve` hooks for everything else, then
//! plain attributes, and `on_message` handlers for subscription payloads.

use std::{any::Any, collections::HashMap, future::Future, sync::Arc};

use futures::{
    FutureExt, Stream, StreamExt, TryStreamExt,
    future::BoxFuture,
    stream::BoxStream,
};
use indexmap::IndexMap;

use crate::{error::FieldError, value::Val};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Resolve,
    Mutate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

/// The outcome of a resolver: a single value, or a sequence of values produced over time.
pub enum Resolved {
    Value(Val),
    Stream(BoxStream<'static, Result<Val, FieldError>>),
}

impl Resolved {
    pub fn stream(stream: impl Stream<Item = Result<Val, FieldError>> + Send + 'static) -> Self {
        Resolved::Stream(stream.boxed())
    }

    /// Collapse into a single value. Streams are drained into a list.
    pub async fn into_val(self) -> Result<Val, FieldError> {
        match self {
            Resolved::Value(val) => Ok(val),
            Resolved::Stream(stream) => Ok(Val::List(stream.try_collect().await?)),
        }
    }
}

impl From<Val> for Resolved {
    fn from(value: Val) -> Self {
        Resolved::Value(value)
    }
}

impl std::fmt::Debug for Resolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolved::Value(val) => f.debug_tuple("Value").field(val).finish(),
            Resolved::Stream(_) => f.write_str("Stream"),
        }
    }
}

pub type HookFuture = BoxFuture<'static, Result<Resolved, FieldError>>;

/// A callable value, invoked with the resolution info and arguments of the field it was found in.
pub type Resolver = Arc<dyn Fn(ResolveInfo, Arguments) -> HookFuture + Send + Sync>;

/// What a resolver knows about the field being resolved.
#[derive(Clone, Debug)]
pub struct ResolveInfo {
    /// Host (de-cased) field name
    pub field_name: String,
    pub wire_name: String,
    pub parent_type: String,
    pub operation: OperationKind,
    context: Option<Arc<dyn Any + Send + Sync>>,
}

impl ResolveInfo {
    pub fn new(
        field_name: impl Into<String>,
        wire_name: impl Into<String>,
        parent_type: impl Into<String>,
        operation: OperationKind,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            wire_name: wire_name.into(),
            parent_type: parent_type.into(),
            operation,
            context: None,
        }
    }

    pub fn with_context(mut self, context: Option<Arc<dyn Any + Send + Sync>>) -> Self {
        self.context = context;
        self
    }

    /// The per-request context value, if one of type `T` was supplied.
    pub fn context<T: Any>(&self) -> Option<&T> {
        self.context.as_deref()?.downcast_ref::<T>()
    }
}

/// Decoded arguments of a field, keyed by host name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments(IndexMap<String, Val>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Val> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Val::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Val::as_i64)
    }

    pub fn get_list(&self, name: &str) -> Option<&[Val]> {
        self.get(name).and_then(Val::as_list)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Val) {
        self.0.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Val)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, Val> {
        self.0
    }
}

impl FromIterator<(String, Val)> for Arguments {
    fn from_iter<T: IntoIterator<Item = (String, Val)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An object-shaped host value.
pub trait Source: Send + Sync + 'static {
    /// Name of the record this value belongs to. Used to pick the concrete type behind an
    /// interface.
    fn type_name(&self) -> &str;

    /// Plain field or property lookup
    fn attribute(&self, _field_name: &str) -> Option<Val> {
        None
    }

    /// Run the `kind` hook registered for `field_name`, if any.
    fn invoke(
        self: Arc<Self>,
        _kind: HookKind,
        _field_name: &str,
        _info: ResolveInfo,
        _arguments: Arguments,
    ) -> Option<HookFuture> {
        None
    }

    /// Shape a published message before it is delivered to a subscriber of `field_name`.
    fn on_message(
        self: Arc<Self>,
        _field_name: &str,
        _info: ResolveInfo,
        _message: Val,
    ) -> Option<HookFuture> {
        None
    }
}

type Hook<S> = Arc<dyn Fn(Arc<S>, ResolveInfo, Arguments) -> HookFuture + Send + Sync>;
type Handler<S> = Arc<dyn Fn(Arc<S>, ResolveInfo, Val) -> HookFuture + Send + Sync>;

/// Dispatch table of the resolver hooks of one host type.
pub struct HookTable<S> {
    hooks: HashMap<(HookKind, String), Hook<S>>,
    handlers: HashMap<String, Handler<S>>,
}

impl<S: Send + Sync + 'static> HookTable<S> {
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
            handlers: HashMap::new(),
        }
    }

    pub fn resolve<F, Fut, R>(self, field_name: &str, hook: F) -> Self
    where
        F: Fn(Arc<S>, ResolveInfo, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, FieldError>> + Send + 'static,
        R: Into<Resolved>,
    {
        self.with(HookKind::Resolve, field_name, hook)
    }

    pub fn mutate<F, Fut, R>(self, field_name: &str, hook: F) -> Self
    where
        F: Fn(Arc<S>, ResolveInfo, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, FieldError>> + Send + 'static,
        R: Into<Resolved>,
    {
        self.with(HookKind::Mutate, field_name, hook)
    }

    pub fn on<F, Fut, R>(mut self, field_name: &str, handler: F) -> Self
    where
        F: Fn(Arc<S>, ResolveInfo, Val) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, FieldError>> + Send + 'static,
        R: Into<Resolved>,
    {
        self.handlers.insert(
            field_name.to_string(),
            Arc::new(move |source, info, message| {
                handler(source, info, message)
                    .map(|result| result.map(Into::into))
                    .boxed()
            }),
        );
        self
    }

    fn with<F, Fut, R>(mut self, kind: HookKind, field_name: &str, hook: F) -> Self
    where
        F: Fn(Arc<S>, ResolveInfo, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, FieldError>> + Send + 'static,
        R: Into<Resolved>,
    {
        self.hooks.insert(
            (kind, field_name.to_string()),
            Arc::new(move |source, info, arguments| {
                hook(source, info, arguments)
                    .map(|result| result.map(Into::into))
                    .boxed()
            }),
        );
        self
    }

    pub fn contains(&self, kind: HookKind, field_name: &str) -> bool {
        self.hooks.contains_key(&(kind, field_name.to_string()))
    }

    pub fn call(
        &self,
        source: Arc<S>,
        kind: HookKind,
        field_name: &str,
        info: ResolveInfo,
        arguments: Arguments,
    ) -> Option<HookFuture> {
        self.hooks
            .get(&(kind, field_name.to_string()))
            .map(|hook| hook(source, info, arguments))
    }

    pub fn call_on(
        &self,
        source: Arc<S>,
        field_name: &str,
        info: ResolveInfo,
        message: Val,
    ) -> Option<HookFuture> {
        self.handlers
            .get(field_name)
            .map(|handler| handler(source, info, message))
    }
}

impl<S: Send + Sync + 'static> Default for HookTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use futures::stream;
    use test_log::test;

    use super::*;

    struct Shelf {
        titles: Vec<&'static str>,
    }

    static SHELF_HOOKS: LazyLock<HookTable<Shelf>> = LazyLock::new(|| {
        HookTable::new()
            .resolve("count", |shelf: Arc<Shelf>, _, _| async move {
                Ok(Val::from(shelf.titles.len()))
            })
            .resolve("titles", |shelf: Arc<Shelf>, _, _| async move {
                let items: Vec<Result<Val, FieldError>> =
                    shelf.titles.iter().map(|t| Ok(Val::from(*t))).collect();
                Ok(Resolved::stream(stream::iter(items)))
            })
            .mutate("clear", |_, _, arguments: Arguments| async move {
                Ok(Val::from(arguments.get_i64("limit").unwrap_or(0)))
            })
    });

    impl Source for Shelf {
        fn type_name(&self) -> &str {
            "Shelf"
        }

        fn attribute(&self, field_name: &str) -> Option<Val> {
            (field_name == "name").then(|| Val::from("main"))
        }

        fn invoke(
            self: Arc<Self>,
            kind: HookKind,
            field_name: &str,
            info: ResolveInfo,
            arguments: Arguments,
        ) -> Option<HookFuture> {
            SHELF_HOOKS.call(self, kind, field_name, info, arguments)
        }
    }

    fn info(field_name: &str) -> ResolveInfo {
        ResolveInfo::new(field_name, field_name, "Shelf", OperationKind::Query)
    }

    #[test(tokio::test)]
    async fn hooks_are_keyed_by_kind_and_name() {
        let shelf = Val::source(Shelf {
            titles: vec!["X", "Y"],
        });

        let count = shelf
            .invoke(HookKind::Resolve, "count", info("count"), Arguments::new())
            .unwrap()
            .await
            .unwrap();
        assert_eq!(count.into_val().await.unwrap(), Val::from(2i64));

        assert!(
            shelf
                .invoke(HookKind::Mutate, "count", info("count"), Arguments::new())
                .is_none()
        );
        assert!(SHELF_HOOKS.contains(HookKind::Mutate, "clear"));
    }

    #[test(tokio::test)]
    async fn streams_collapse_into_lists() {
        let shelf = Val::source(Shelf {
            titles: vec!["X", "Y"],
        });

        let titles = shelf
            .invoke(HookKind::Resolve, "titles", info("titles"), Arguments::new())
            .unwrap()
            .await
            .unwrap()
            .into_val()
            .await
            .unwrap();
        assert_eq!(titles, Val::list(["X", "Y"]));
    }

    #[test]
    fn context_is_downcast_by_type() {
        let info = info("count").with_context(Some(Arc::new(42u32)));
        assert_eq!(info.context::<u32>(), Some(&42));
        assert_eq!(info.context::<String>(), None);
    }
}
