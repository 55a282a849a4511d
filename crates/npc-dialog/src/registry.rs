//! Shared handle to a `DialogFormStore`.
//!
//! The store itself is a plain `&mut self` structure. Hosts that dispatch
//! events from more than one thread share it through this handle, which
//! runs every check-then-act sequence (evict, then pair) under one write
//! lock.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::form::DialogForm;
use crate::host::{Entity, EntityId, EntityLookup, Player};
use crate::store::{DialogFormStore, OpenOverrides};

/// Cloneable handle; every clone sees the same forms.
#[derive(Clone, Default)]
pub struct DialogRegistry {
    inner: Arc<RwLock<DialogFormStore>>,
}

impl DialogRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_store(store: DialogFormStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Run `f` with shared access to the store.
    ///
    /// Do not call back into the registry from `f`.
    pub fn read<R>(&self, f: impl FnOnce(&DialogFormStore) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access to the store.
    ///
    /// Do not call back into the registry from `f`.
    pub fn write<R>(&self, f: impl FnOnce(&mut DialogFormStore) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Register `form` and return its id.
    pub fn register(&self, form: DialogForm, overwrite: bool) -> Result<String> {
        self.write(|store| store.register(form, overwrite).map(|form| form.id().to_owned()))
    }

    pub fn unregister(&self, id: &str) -> Result<DialogForm> {
        self.write(|store| store.unregister(id))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.read(|store| store.contains(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read(DialogFormStore::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read(DialogFormStore::is_empty)
    }

    /// Copy of form `id`. Listeners on the copy can be run without holding
    /// the lock.
    #[must_use]
    pub fn snapshot(&self, id: &str) -> Option<DialogForm> {
        self.read(|store| store.get(id).cloned())
    }

    /// Copy of the form paired with `entity`.
    #[must_use]
    pub fn snapshot_by_entity(&self, entity: EntityId) -> Option<DialogForm> {
        self.read(|store| store.form_by_entity(entity).cloned())
    }

    pub fn pair_with_entity<E: Entity + ?Sized>(
        &self,
        id: &str,
        entity: &E,
        interactive_tag: &str,
        world: &dyn EntityLookup,
    ) -> Result<()> {
        self.write(|store| store.pair_with_entity(id, entity, interactive_tag, world))
    }

    pub fn unpair(&self, id: &str, world: &dyn EntityLookup) -> Result<()> {
        self.write(|store| store.unpair(id, world))
    }

    pub fn open(
        &self,
        id: &str,
        player: &dyn Player,
        world: &dyn EntityLookup,
        overrides: &OpenOverrides,
    ) -> Result<()> {
        self.write(|store| store.open(id, player, world, overrides))
    }

    /// Open the form paired with `entity`, looked up under the same lock.
    pub fn open_by_entity(
        &self,
        entity: EntityId,
        player: &dyn Player,
        world: &dyn EntityLookup,
    ) -> Result<Option<String>> {
        self.write(|store| store.open_by_entity(entity, player, world))
    }

    pub fn clear(&self) {
        self.write(DialogFormStore::clear);
    }
}

impl fmt::Debug for DialogRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogRegistry")
            .field("forms", &self.len())
            .finish()
    }
}
