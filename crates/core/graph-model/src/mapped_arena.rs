// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! An append-only `typed_generational_arena::Arena` with lookup by name.
//!
//! The builder registers each wire type under its name and refers to it through a typed index.
//! Registering a name twice returns the index of the first registration, which is what makes the
//! type walker idempotent: the same host type always maps to the same wire type.

use std::{
    collections::{HashMap, hash_map::Keys},
    ops,
};

use typed_generational_arena::{Arena, IgnoreGeneration, Index};

/// Wire types are never removed, so generations are not tracked.
pub type TypeSlab<T> = Arena<T, usize, IgnoreGeneration>;
pub type TypeSlabIndex<T> = Index<T, usize, IgnoreGeneration>;

#[derive(Debug, Clone)]
pub struct MappedArena<V> {
    values: TypeSlab<V>,
    map: HashMap<String, TypeSlabIndex<V>>,
}

impl<V> MappedArena<V> {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn keys(&self) -> Keys<'_, String, TypeSlabIndex<V>> {
        self.map.keys()
    }

    pub fn get_id(&self, key: &str) -> Option<TypeSlabIndex<V>> {
        self.map.get(key).copied()
    }

    pub fn get_by_key(&self, key: &str) -> Option<&V> {
        self.get_id(key).map(|id| &self[id])
    }

    pub fn get_by_key_mut(&mut self, key: &str) -> Option<&mut V> {
        self.get_id(key).map(|id| &mut self[id])
    }

    pub fn get_by_id_mut(&mut self, id: TypeSlabIndex<V>) -> &mut V {
        &mut self.values[id]
    }

    pub fn add(&mut self, key: &str, value: V) -> TypeSlabIndex<V> {
        if let Some(existing) = self.get_id(key) {
            return existing;
        }

        let id = self.values.insert(value);
        self.map.insert(key.to_string(), id);
        id
    }

    /// Values in registration order
    pub fn iter(&self) -> typed_generational_arena::Iter<'_, V, usize, IgnoreGeneration> {
        self.values.iter()
    }
}

impl<V> Default for MappedArena<V> {
    fn default() -> Self {
        MappedArena {
            values: TypeSlab::new(),
            map: HashMap::default(),
        }
    }
}

impl<V> ops::Index<TypeSlabIndex<V>> for MappedArena<V> {
    type Output = V;

    #[inline]
    fn index(&self, id: TypeSlabIndex<V>) -> &V {
        &self.values[id]
    }
}

impl<V> ops::IndexMut<TypeSlabIndex<V>> for MappedArena<V> {
    #[inline]
    fn index_mut(&mut self, id: TypeSlabIndex<V>) -> &mut V {
        &mut self.values[id]
    }
}
