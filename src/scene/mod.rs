//! Append-only scene of textured image planes.
//!
//! Meshes are addressed by [`MeshId`] and rendered in insertion order. Each
//! mesh is owned by exactly one [`ImagePlane`], which writes its transform
//! every frame; nothing is ever removed.

mod plane;

use std::sync::Arc;

pub use plane::{ImagePlane, PlaneState};
use serde::Serialize;

use crate::{host::TextureData, layout::PlaneTransform};

/// Stable handle to a mesh in a [`Scene`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub struct MeshId(u32);

impl MeshId {
    /// Position of the mesh in draw order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A unit quad scaled and positioned to cover one image.
#[derive(Debug, Clone)]
pub struct PlaneMesh {
    /// Current placement.
    pub transform: PlaneTransform,
    /// Pixels sampled across the quad.
    pub texture: Arc<TextureData>,
    /// Source identifier, for logs.
    pub label: String,
}

/// The renderable set.
#[derive(Debug, Default)]
pub struct Scene {
    /// Meshes in insertion order.
    meshes: Vec<PlaneMesh>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mesh and return its handle.
    pub fn add(&mut self, mesh: PlaneMesh) -> MeshId {
        let id = MeshId(self.meshes.len() as u32);
        log::debug!("scene: added mesh {} ({})", id.0, mesh.label);
        self.meshes.push(mesh);
        id
    }

    /// Look up a mesh.
    #[must_use]
    pub fn mesh(&self, id: MeshId) -> Option<&PlaneMesh> {
        self.meshes.get(id.index())
    }

    /// Look up a mesh for mutation.
    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut PlaneMesh> {
        self.meshes.get_mut(id.index())
    }

    /// Number of meshes (the scene's children).
    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the scene has no meshes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Meshes with their handles, in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &PlaneMesh)> {
        self.meshes
            .iter()
            .enumerate()
            .map(|(i, mesh)| (MeshId(i as u32), mesh))
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;

    fn mesh(label: &str) -> PlaneMesh {
        PlaneMesh {
            transform: PlaneTransform {
                position: Vec3::ZERO,
                scale: Vec2::ONE,
            },
            texture: Arc::new(TextureData::solid(1, 1, [0, 0, 0, 255])),
            label: label.into(),
        }
    }

    #[test]
    fn ids_follow_insertion_order() {
        let mut scene = Scene::new();
        let a = scene.add(mesh("a"));
        let b = scene.add(mesh("b"));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(scene.len(), 2);
        let labels: Vec<_> =
            scene.iter().map(|(_, m)| m.label.as_str()).collect();
        assert_eq!(labels, ["a", "b"]);
    }

    #[test]
    fn mesh_mut_writes_through() {
        let mut scene = Scene::new();
        let id = scene.add(mesh("a"));
        scene.mesh_mut(id).unwrap().transform.position.y = 42.0;
        assert_eq!(scene.mesh(id).unwrap().transform.position.y, 42.0);
    }
}
