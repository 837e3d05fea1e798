//! ECS components for the player, and the observer view the engine reads.

use glam::DVec3;
use hecs::{Entity, World};

use prospector_engine::source::ObserverSource;

/// Marks the player entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player;

/// Continuous world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub DVec3);

/// Hotbar of item identities. `None` is an empty slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    pub slots: Vec<Option<String>>,
}

impl Inventory {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            slots: items.into_iter().map(|i| i.map(Into::into)).collect(),
        }
    }

    pub fn item(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).and_then(|s| s.as_deref())
    }
}

/// Index of the held hotbar slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectedSlot(pub usize);

pub fn spawn_player(world: &mut World, position: DVec3, inventory: Inventory) -> Entity {
    world.spawn((Player, Position(position), inventory, SelectedSlot(0)))
}

/// Borrowed view of one player entity, as seen by the engine.
pub struct PlayerObserver<'w> {
    pub world: &'w World,
    pub entity: Entity,
}

impl ObserverSource for PlayerObserver<'_> {
    fn observer_position(&self) -> Option<DVec3> {
        self.world.get::<&Position>(self.entity).ok().map(|p| p.0)
    }

    fn active_detector(&self) -> Option<String> {
        let inventory = self.world.get::<&Inventory>(self.entity).ok()?;
        let slot = self.world.get::<&SelectedSlot>(self.entity).ok()?;
        inventory.item(slot.0).map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observer_reads_held_item() {
        let mut world = World::new();
        let player = spawn_player(
            &mut world,
            DVec3::new(1.5, 2.0, -3.0),
            Inventory::new([Some("prospector:cave_detector"), None]),
        );
        let observer = PlayerObserver { world: &world, entity: player };
        assert_eq!(observer.observer_position(), Some(DVec3::new(1.5, 2.0, -3.0)));
        assert_eq!(observer.active_detector().as_deref(), Some("prospector:cave_detector"));
    }

    #[test]
    fn test_empty_or_missing_slot_has_no_detector() {
        let mut world = World::new();
        let player = spawn_player(&mut world, DVec3::ZERO, Inventory::new([None::<String>]));
        let observer = PlayerObserver { world: &world, entity: player };
        assert!(observer.active_detector().is_none());

        world.get::<&mut SelectedSlot>(player).unwrap().0 = 7;
        let observer = PlayerObserver { world: &world, entity: player };
        assert!(observer.active_detector().is_none());
    }

    #[test]
    fn test_despawned_player_is_no_observer() {
        let mut world = World::new();
        let player = spawn_player(&mut world, DVec3::ZERO, Inventory::default());
        world.despawn(player).unwrap();
        let observer = PlayerObserver { world: &world, entity: player };
        assert!(observer.observer_position().is_none());
        assert!(observer.active_detector().is_none());
    }
}
