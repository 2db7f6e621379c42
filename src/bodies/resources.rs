//! Entity table for orbiting bodies

use std::collections::HashMap;

use bevy::prelude::*;

use crate::bodies::components::BodyId;

/// Maps body identity to its entity. Filled at scene construction; bodies
/// are never despawned during a session.
#[derive(Resource, Default)]
pub struct BodyRegistry {
    pub entities: HashMap<BodyId, Entity>,
}

impl BodyRegistry {
    pub fn get(&self, id: BodyId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    pub fn insert(&mut self, id: BodyId, entity: Entity) {
        self.entities.insert(id, entity);
    }
}
