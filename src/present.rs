//! Presentation sync
//!
//! The simulation never talks to a renderer. The host owns one renderable
//! proxy per disc through a `ProxyTable` and pushes positions to it once per
//! frame. The renderer is reached only through the `Presenter` and
//! `SceneQuery` traits.

use glam::{Vec2, Vec3};

use crate::sim::arena::Aabb;
use crate::sim::disc::{Disc, DiscId, Team};

/// Opaque handle to a renderer-side object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProxyHandle(pub u32);

/// What the renderer needs to build a disc proxy
#[derive(Debug, Clone, PartialEq)]
pub struct ProxySpec {
    pub name: String,
    pub team: Team,
    pub position: Vec3,
    pub radius: f32,
    pub height: f32,
}

impl ProxySpec {
    pub fn for_disc(disc: &Disc) -> Self {
        Self {
            name: disc.name.clone(),
            team: disc.team,
            position: disc.position,
            radius: disc.radius,
            height: disc.height,
        }
    }
}

/// Renderer side effects
pub trait Presenter {
    fn create_proxy(&mut self, spec: &ProxySpec) -> ProxyHandle;
    fn set_position(&mut self, proxy: ProxyHandle, position: Vec3);
    fn dispose(&mut self, proxy: ProxyHandle);
}

/// Renderer queries
pub trait SceneQuery {
    /// World boxes of the static scene
    fn static_bounds(&self) -> Vec<Aabb>;
    /// Direction the camera looks along
    fn camera_forward(&self) -> Vec3;
    /// Proxy under a screen position
    fn pick(&self, screen: Vec2) -> Option<ProxyHandle>;
}

/// Disc to proxy ownership
#[derive(Debug, Default)]
pub struct ProxyTable {
    entries: Vec<(DiscId, ProxyHandle)>,
}

impl ProxyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a proxy for every disc that has none yet
    pub fn attach<P: Presenter + ?Sized>(&mut self, presenter: &mut P, discs: &[Disc]) {
        for disc in discs {
            if self.proxy_for(disc.id).is_some() {
                continue;
            }
            let handle = presenter.create_proxy(&ProxySpec::for_disc(disc));
            self.entries.push((disc.id, handle));
        }
        log::debug!("Attached {} proxies", self.entries.len());
    }

    /// Push disc positions to their proxies
    pub fn sync<P: Presenter + ?Sized>(&self, presenter: &mut P, discs: &[Disc]) {
        for disc in discs {
            if let Some(handle) = self.proxy_for(disc.id) {
                presenter.set_position(handle, disc.position);
            }
        }
    }

    pub fn disc_for(&self, proxy: ProxyHandle) -> Option<DiscId> {
        self.entries.iter().find(|(_, h)| *h == proxy).map(|(id, _)| *id)
    }

    pub fn proxy_for(&self, disc: DiscId) -> Option<ProxyHandle> {
        self.entries.iter().find(|(id, _)| *id == disc).map(|(_, h)| *h)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dispose every proxy. Calling again does nothing.
    pub fn teardown<P: Presenter + ?Sized>(&mut self, presenter: &mut P) {
        for (_, handle) in self.entries.drain(..) {
            presenter.dispose(handle);
        }
    }
}

/// Renderer stand-in that records what it was asked to do.
///
/// Drives the native demo and tests.
#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    pub created: Vec<ProxySpec>,
    pub disposed: Vec<ProxyHandle>,
    /// Last position pushed per proxy, indexed by handle
    pub positions: Vec<Vec3>,
    pub bounds: Vec<Aabb>,
    pub forward: Vec3,
    /// Proxy returned by every pick
    pub pick_target: Option<ProxyHandle>,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self {
            created: Vec::new(),
            disposed: Vec::new(),
            positions: Vec::new(),
            bounds: Vec::new(),
            forward: Vec3::new(0.0, -1.0, -1.0),
            pick_target: None,
        }
    }
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(mut self, bounds: Vec<Aabb>) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn position_of(&self, proxy: ProxyHandle) -> Option<Vec3> {
        self.positions.get(proxy.0 as usize).copied()
    }
}

impl Presenter for HeadlessRenderer {
    fn create_proxy(&mut self, spec: &ProxySpec) -> ProxyHandle {
        let handle = ProxyHandle(self.created.len() as u32);
        self.created.push(spec.clone());
        self.positions.push(spec.position);
        handle
    }

    fn set_position(&mut self, proxy: ProxyHandle, position: Vec3) {
        if let Some(slot) = self.positions.get_mut(proxy.0 as usize) {
            *slot = position;
        }
    }

    fn dispose(&mut self, proxy: ProxyHandle) {
        self.disposed.push(proxy);
    }
}

impl SceneQuery for HeadlessRenderer {
    fn static_bounds(&self) -> Vec<Aabb> {
        self.bounds.clone()
    }

    fn camera_forward(&self) -> Vec3 {
        self.forward
    }

    fn pick(&self, _screen: Vec2) -> Option<ProxyHandle> {
        self.pick_target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::disc::DiscSpec;

    fn discs() -> Vec<Disc> {
        vec![
            Disc::new(DiscId(1), &DiscSpec::new("a", Team::Player), 0.0, 5.0),
            Disc::new(DiscId(2), &DiscSpec::new("b", Team::Npc), 0.0, -5.0),
        ]
    }

    #[test]
    fn test_attach_creates_one_proxy_per_disc() {
        let discs = discs();
        let mut renderer = HeadlessRenderer::new();
        let mut table = ProxyTable::new();
        table.attach(&mut renderer, &discs);
        table.attach(&mut renderer, &discs);
        assert_eq!(renderer.created.len(), 2);
        assert_eq!(table.len(), 2);
        assert_eq!(renderer.created[1].name, "b");
    }

    #[test]
    fn test_lookup_both_ways() {
        let discs = discs();
        let mut renderer = HeadlessRenderer::new();
        let mut table = ProxyTable::new();
        table.attach(&mut renderer, &discs);

        let proxy = table.proxy_for(DiscId(2)).unwrap();
        assert_eq!(table.disc_for(proxy), Some(DiscId(2)));
        assert_eq!(table.disc_for(ProxyHandle(77)), None);
        assert_eq!(table.proxy_for(DiscId(9)), None);
    }

    #[test]
    fn test_sync_pushes_positions() {
        let mut discs = discs();
        let mut renderer = HeadlessRenderer::new();
        let mut table = ProxyTable::new();
        table.attach(&mut renderer, &discs);

        discs[0].position.x = 3.5;
        table.sync(&mut renderer, &discs);
        let proxy = table.proxy_for(discs[0].id).unwrap();
        assert_eq!(renderer.position_of(proxy), Some(discs[0].position));
    }

    #[test]
    fn test_teardown_disposes_exactly_once() {
        let discs = discs();
        let mut renderer = HeadlessRenderer::new();
        let mut table = ProxyTable::new();
        table.attach(&mut renderer, &discs);

        table.teardown(&mut renderer);
        table.teardown(&mut renderer);
        assert_eq!(renderer.disposed.len(), 2);
        assert!(table.is_empty());
    }
}
