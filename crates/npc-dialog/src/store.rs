//! Form registry
//!
//! Maps form id -> form, and answers "which form is paired with this
//! entity" by scanning. Pairing keeps at most one form per entity: the most
//! recent pairing wins and the previous form is unregistered.

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use tracing::{debug, info, warn};

use crate::error::{DialogError, Result};
use crate::form::DialogForm;
use crate::host::{self, Entity, EntityId, EntityLookup, MetadataProperty, MetadataValue, Player};

/// Overrides for [`DialogFormStore::open`].
#[derive(Debug, Clone, Default)]
pub struct OpenOverrides {
    /// Entity the dialog is shown on, instead of the paired one
    pub target: Option<EntityId>,
    /// Title, instead of the paired entity's nametag
    pub nametag: Option<String>,
}

#[derive(Debug, Default)]
pub struct DialogFormStore {
    forms: HashMap<String, DialogForm>,
}

impl DialogFormStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `form` under its id.
    ///
    /// Fails with `AlreadyRegistered` if the id is taken and `overwrite` is
    /// false; the registered form is left as it was.
    pub fn register(&mut self, form: DialogForm, overwrite: bool) -> Result<&mut DialogForm> {
        match self.forms.entry(form.id().to_owned()) {
            Entry::Occupied(mut entry) => {
                if !overwrite {
                    return Err(DialogError::AlreadyRegistered {
                        id: entry.key().clone(),
                    });
                }
                info!(form = %entry.key(), "replacing registered dialog form");
                entry.insert(form);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                info!(form = %entry.key(), "registering dialog form");
                Ok(entry.insert(form))
            }
        }
    }

    pub fn unregister(&mut self, id: &str) -> Result<DialogForm> {
        let form = self
            .forms
            .remove(id)
            .ok_or_else(|| DialogError::not_registered(id))?;
        info!(form = %id, "unregistered dialog form");
        Ok(form)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DialogForm> {
        self.forms.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut DialogForm> {
        self.forms.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.forms.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.forms.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DialogForm> {
        self.forms.values()
    }

    /// The form paired with `entity`.
    ///
    /// Linear scan. If several forms claim the entity (only possible when
    /// pairing was bypassed) which one is returned is unspecified.
    #[must_use]
    pub fn form_by_entity(&self, entity: EntityId) -> Option<&DialogForm> {
        self.forms.values().find(|form| form.entity() == Some(entity))
    }

    /// Pair form `id` with `entity` so interacting with it opens the dialog.
    ///
    /// Any other form paired with `entity` is unregistered. If this form was
    /// paired elsewhere, that entity loses its NPC metadata.
    pub fn pair_with_entity<E: Entity + ?Sized>(
        &mut self,
        id: &str,
        entity: &E,
        interactive_tag: &str,
        world: &dyn EntityLookup,
    ) -> Result<()> {
        let target = entity.runtime_id();
        self.bind(id, target, world)?;

        let actions = self.form(id)?.actions_json()?;
        host::push_pairing(entity, &actions, interactive_tag);
        info!(form = %id, entity = target, "paired dialog form with entity");
        Ok(())
    }

    /// Drop the pairing of form `id` and reset the entity's NPC metadata.
    pub fn unpair(&mut self, id: &str, world: &dyn EntityLookup) -> Result<()> {
        let form = self
            .forms
            .get_mut(id)
            .ok_or_else(|| DialogError::not_registered(id))?;

        if let Some(previous) = form.entity() {
            form.set_entity(None);
            if let Some(entity) = world.entity(previous) {
                host::clear_pairing(entity);
            }
            debug!(form = %id, entity = previous, "unpaired dialog form");
        }
        Ok(())
    }

    /// Push the current button list of form `id` to its paired entity.
    pub fn refresh_entity(&self, id: &str, world: &dyn EntityLookup) -> Result<()> {
        let form = self.form(id)?;
        let Some(entity) = form.entity().and_then(|eid| world.entity(eid)) else {
            return Ok(());
        };
        entity.set_metadata(
            MetadataProperty::NpcActions,
            MetadataValue::String(form.actions_json()?),
        );
        Ok(())
    }

    /// Show form `id` to `player`.
    ///
    /// An unpaired form is paired with the player itself first, evicting any
    /// other form paired with that player. The packet targets
    /// `overrides.target`, then the paired entity, then the player; the title
    /// is `overrides.nametag`, then the paired entity's nametag, then the
    /// player's.
    pub fn open(
        &mut self,
        id: &str,
        player: &dyn Player,
        world: &dyn EntityLookup,
        overrides: &OpenOverrides,
    ) -> Result<()> {
        if self.form(id)?.entity().is_none() {
            let target = player.runtime_id();
            self.bind(id, target, world)?;
            let actions = self.form(id)?.actions_json()?;
            host::push_pairing(player, &actions, "");
            debug!(form = %id, player = %player.name(), "paired dialog form with its viewer");
        }

        let form = self.form(id)?;
        let paired = form.entity();
        let target = overrides
            .target
            .or(paired)
            .unwrap_or_else(|| player.runtime_id());
        let nametag = match &overrides.nametag {
            Some(nametag) => nametag.clone(),
            None => paired
                .and_then(|eid| nametag_of(eid, player, world))
                .unwrap_or_else(|| player.nametag()),
        };

        debug!(form = %id, player = %player.name(), target, "opening dialog");
        player.send_dialogue(form.open_packet(target, nametag)?);
        Ok(())
    }

    /// Show the form paired with `entity` to `player`.
    ///
    /// Lookup and open happen on the same `&mut self`, so the form cannot be
    /// evicted or moved in between. Returns the id of the opened form, or
    /// `None` if nothing is paired with `entity`.
    pub fn open_by_entity(
        &mut self,
        entity: EntityId,
        player: &dyn Player,
        world: &dyn EntityLookup,
    ) -> Result<Option<String>> {
        let Some(id) = self.form_by_entity(entity).map(|form| form.id().to_owned()) else {
            return Ok(None);
        };
        self.open(&id, player, world, &OpenOverrides::default())?;
        Ok(Some(id))
    }

    /// Forget every form.
    pub fn clear(&mut self) {
        self.forms.clear();
    }

    fn form(&self, id: &str) -> Result<&DialogForm> {
        self.forms
            .get(id)
            .ok_or_else(|| DialogError::not_registered(id))
    }

    /// Record `target` as the entity of form `id`, evicting rival forms and
    /// clearing the metadata of the entity the form leaves behind.
    fn bind(&mut self, id: &str, target: EntityId, world: &dyn EntityLookup) -> Result<()> {
        if !self.forms.contains_key(id) {
            return Err(DialogError::not_registered(id));
        }

        let rivals: Vec<String> = self
            .forms
            .values()
            .filter(|form| form.id() != id && form.entity() == Some(target))
            .map(|form| form.id().to_owned())
            .collect();
        for rival in rivals {
            warn!(
                form = %rival,
                entity = target,
                replaced_by = %id,
                "evicting dialog form paired with the same entity"
            );
            self.forms.remove(&rival);
        }

        let form = self
            .forms
            .get_mut(id)
            .ok_or_else(|| DialogError::not_registered(id))?;
        if let Some(previous) = form.entity() {
            if previous != target {
                if let Some(entity) = world.entity(previous) {
                    host::clear_pairing(entity);
                }
            }
        }
        form.set_entity(Some(target));
        Ok(())
    }
}

fn nametag_of(entity: EntityId, player: &dyn Player, world: &dyn EntityLookup) -> Option<String> {
    if entity == player.runtime_id() {
        return Some(player.nametag());
    }
    world.entity(entity).map(|e| e.nametag())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::packets::{DialogueAction, NpcDialoguePacket};
    use crate::testing::{MockEntity, MockWorld};

    const PLAYER: EntityId = 1;
    const VILLAGER: EntityId = 10;
    const GOLEM: EntityId = 11;

    fn world() -> MockWorld {
        MockWorld::with(vec![
            MockEntity::new(PLAYER, "Steve"),
            MockEntity::new(VILLAGER, "Villager"),
            MockEntity::new(GOLEM, "Golem"),
        ])
    }

    fn store_with(ids: &[&str]) -> DialogFormStore {
        let mut store = DialogFormStore::new();
        for id in ids {
            store
                .register(DialogForm::with_id(format!("text of {id}"), *id), false)
                .unwrap();
        }
        store
    }

    #[test]
    fn test_register_then_lookup() {
        let mut store = DialogFormStore::new();
        let form = DialogForm::new("hello");
        let id = form.id().to_owned();

        store.register(form, false).unwrap();
        assert_eq!(store.get(&id).map(DialogForm::dialog_text), Some("hello"));
        assert!(store.contains(&id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut store = store_with(&["menu"]);

        let err = store
            .register(DialogForm::with_id("impostor", "menu"), false)
            .unwrap_err();
        assert!(matches!(err, DialogError::AlreadyRegistered { ref id } if id == "menu"));
        assert_eq!(store.get("menu").unwrap().dialog_text(), "text of menu");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_overwrite_replaces() {
        let mut store = store_with(&["menu"]);
        store
            .register(DialogForm::with_id("second", "menu"), true)
            .unwrap()
            .add_button("New", "");

        let form = store.get("menu").unwrap();
        assert_eq!(form.dialog_text(), "second");
        assert_eq!(form.button_count(), 1);
    }

    #[test]
    fn test_unregister_missing_leaves_store_unchanged() {
        let mut store = store_with(&["a", "b"]);

        let err = store.unregister("c").unwrap_err();
        assert!(matches!(err, DialogError::NotRegistered { ref id } if id == "c"));
        assert_eq!(store.len(), 2);

        let removed = store.unregister("a").unwrap();
        assert_eq!(removed.id(), "a");
        assert!(!store.contains("a"));
    }

    #[test]
    fn test_pairing_sets_metadata() {
        let world = world();
        let mut store = store_with(&["shop"]);
        store.get_mut("shop").unwrap().add_button("Buy", "/buy");

        store
            .pair_with_entity("shop", world.get(VILLAGER), "Talk", &world)
            .unwrap();

        let villager = world.get(VILLAGER);
        assert!(villager.has_npc_component());
        assert_eq!(
            villager.metadata(MetadataProperty::NpcActions),
            Some(MetadataValue::String(
                store.get("shop").unwrap().actions_json().unwrap()
            ))
        );
        assert_eq!(
            villager.metadata(MetadataProperty::InteractiveTag),
            Some(MetadataValue::String("Talk".into()))
        );
        assert_eq!(
            store.form_by_entity(VILLAGER).map(DialogForm::id),
            Some("shop")
        );
    }

    #[test]
    fn test_last_pairing_wins() {
        let world = world();
        let mut store = store_with(&["a", "b"]);

        store.pair_with_entity("a", world.get(VILLAGER), "", &world).unwrap();
        store.pair_with_entity("b", world.get(VILLAGER), "", &world).unwrap();

        assert!(!store.contains("a"));
        assert_eq!(store.form_by_entity(VILLAGER).map(DialogForm::id), Some("b"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_repairing_clears_previous_entity() {
        let world = world();
        let mut store = store_with(&["a"]);

        store.pair_with_entity("a", world.get(VILLAGER), "", &world).unwrap();
        store.pair_with_entity("a", world.get(GOLEM), "", &world).unwrap();

        assert!(!world.get(VILLAGER).has_npc_component());
        assert_eq!(
            world.get(VILLAGER).metadata(MetadataProperty::NpcActions),
            Some(MetadataValue::String(String::new()))
        );
        assert!(world.get(GOLEM).has_npc_component());
        assert!(store.form_by_entity(VILLAGER).is_none());
        assert_eq!(store.form_by_entity(GOLEM).map(DialogForm::id), Some("a"));
    }

    #[test]
    fn test_pairing_unknown_form_fails() {
        let world = world();
        let mut store = DialogFormStore::new();
        let err = store
            .pair_with_entity("ghost", world.get(VILLAGER), "", &world)
            .unwrap_err();
        assert!(matches!(err, DialogError::NotRegistered { .. }));
        assert!(!world.get(VILLAGER).has_npc_component());
    }

    #[test]
    fn test_unpair() {
        let world = world();
        let mut store = store_with(&["a"]);
        store.pair_with_entity("a", world.get(VILLAGER), "", &world).unwrap();

        store.unpair("a", &world).unwrap();
        assert_eq!(store.get("a").unwrap().entity(), None);
        assert!(!world.get(VILLAGER).has_npc_component());
        assert!(store.unpair("missing", &world).is_err());
    }

    #[test]
    fn test_refresh_entity_pushes_new_actions() {
        let world = world();
        let mut store = store_with(&["a"]);
        store.pair_with_entity("a", world.get(VILLAGER), "", &world).unwrap();

        store.get_mut("a").unwrap().add_button("Late", "/late");
        store.refresh_entity("a", &world).unwrap();

        let Some(MetadataValue::String(json)) =
            world.get(VILLAGER).metadata(MetadataProperty::NpcActions)
        else {
            panic!("actions metadata missing");
        };
        assert!(json.contains("Late"));
    }

    #[test]
    fn test_open_paired_form() {
        let world = world();
        let mut store = store_with(&["shop"]);
        store.pair_with_entity("shop", world.get(VILLAGER), "", &world).unwrap();

        let player = world.get(PLAYER);
        store
            .open("shop", player, &world, &OpenOverrides::default())
            .unwrap();

        let sent = player.take_sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].action, DialogueAction::Open);
        assert_eq!(sent[0].actor_runtime_id, VILLAGER);
        assert_eq!(sent[0].npc_name, "[Villager]");
        assert_eq!(sent[0].scene_name, "shop");
        assert_eq!(sent[0].dialogue, "text of shop");
    }

    #[test]
    fn test_open_overrides() {
        let world = world();
        let mut store = store_with(&["shop"]);
        store.pair_with_entity("shop", world.get(VILLAGER), "", &world).unwrap();

        let player = world.get(PLAYER);
        let overrides = OpenOverrides {
            target: Some(GOLEM),
            nametag: Some("Boss".into()),
        };
        store.open("shop", player, &world, &overrides).unwrap();

        let sent = player.take_sent();
        assert_eq!(sent[0].actor_runtime_id, GOLEM);
        assert_eq!(sent[0].npc_name, "Boss");
    }

    #[test]
    fn test_open_unpaired_pairs_with_player() {
        let world = world();
        let mut store = store_with(&["old", "new"]);
        let player = world.get(PLAYER);

        store.open("old", player, &world, &OpenOverrides::default()).unwrap();
        assert_eq!(store.get("old").unwrap().entity(), Some(PLAYER));
        assert!(player.has_npc_component());

        store.open("new", player, &world, &OpenOverrides::default()).unwrap();
        assert!(!store.contains("old"));
        assert_eq!(store.form_by_entity(PLAYER).map(DialogForm::id), Some("new"));

        let sent = player.take_sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].actor_runtime_id, PLAYER);
        assert_eq!(sent[1].npc_name, "[Steve]");
    }

    #[test]
    fn test_open_unknown_form_fails() {
        let world = world();
        let mut store = DialogFormStore::new();
        let player = world.get(PLAYER);

        assert!(
            store
                .open("ghost", player, &world, &OpenOverrides::default())
                .is_err()
        );
        assert_eq!(player.take_sent(), Vec::<NpcDialoguePacket>::new());
    }

    #[test]
    fn test_open_by_entity() {
        let world = world();
        let mut store = store_with(&["trade"]);
        store
            .pair_with_entity("trade", world.get(VILLAGER), "Trade", &world)
            .unwrap();
        let player = world.get(PLAYER);

        assert_eq!(
            store.open_by_entity(VILLAGER, player, &world).unwrap(),
            Some("trade".to_owned())
        );
        assert_eq!(store.open_by_entity(GOLEM, player, &world).unwrap(), None);

        let sent = player.take_sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].actor_runtime_id, VILLAGER);
        assert_eq!(sent[0].scene_name, "trade");
    }

    #[test]
    fn test_clear() {
        let mut store = store_with(&["a", "b", "c"]);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.ids().count(), 0);
    }
}
