//! Components for orbiting bodies and the central object

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Identity of an orbiting body. The set is fixed for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyId {
    Satellite,
    Shuttle,
    Moon,
}

impl BodyId {
    pub const ALL: [BodyId; 3] = [BodyId::Satellite, BodyId::Shuttle, BodyId::Moon];

    pub fn key(self) -> &'static str {
        match self {
            BodyId::Satellite => "satellite",
            BodyId::Shuttle => "shuttle",
            BodyId::Moon => "moon",
        }
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Marker + identity for an orbiting body entity.
#[derive(Component, Clone, Copy, Debug)]
pub struct OrbitingBody {
    pub id: BodyId,
    /// Visual scale factor applied to the body's transform.
    pub scale: f32,
}

/// Marker for the object at the origin.
#[derive(Component)]
pub struct CentralBody;

/// Enlarges a body while its hover label is shown.
#[derive(Component, Default)]
pub struct HoverHighlight {
    pub active: bool,
}
