use colplot_common::{Margins, PlotConfig};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    pub width: u32,
    pub height: u32,
    pub margins: Margins,
}

impl Default for SurfaceGeometry {
    fn default() -> Self {
        Self { width: 800, height: 600, margins: Margins::default() }
    }
}

impl SurfaceGeometry {
    pub fn from_config(cfg: &PlotConfig) -> Self {
        Self { width: cfg.canvas_width, height: cfg.canvas_height, margins: cfg.margins }
    }
}

/// A rendering target. Dropping it releases it.
#[derive(Debug)]
pub struct Surface {
    id: SurfaceId,
    name: String,
    pub title: String,
    pub geometry: SurfaceGeometry,
    refreshes: u64,
}

impl Surface {
    fn open(id: SurfaceId, geometry: SurfaceGeometry) -> Self {
        let name = format!("canvas_{}", id.0);
        tracing::debug!(surface = %name, width = geometry.width, height = geometry.height, "surface opened");
        Self { id, name, title: "Plot".into(), geometry, refreshes: 0 }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn margins(&self) -> &Margins {
        &self.geometry.margins
    }

    /// Mark the surface as needing presentation after its content changed.
    pub fn update(&mut self) {
        self.refreshes += 1;
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        tracing::debug!(surface = %self.name, "surface released");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acquisition {
    pub surface: SurfaceId,
    pub evicted: Option<SurfaceId>,
}

/// Bounded FIFO of surfaces. When full, the oldest is closed before a new one is opened.
#[derive(Debug)]
pub struct CanvasPool {
    surfaces: VecDeque<Surface>,
    max_canvases: usize,
    geometry: SurfaceGeometry,
    next_id: u64,
}

impl CanvasPool {
    pub fn new(max_canvases: usize, geometry: SurfaceGeometry) -> Self {
        let max_canvases = max_canvases.max(1);
        Self { surfaces: VecDeque::with_capacity(max_canvases), max_canvases, geometry, next_id: 1 }
    }

    pub fn from_config(cfg: &PlotConfig) -> Self {
        Self::new(cfg.max_canvases, SurfaceGeometry::from_config(cfg))
    }

    pub fn acquire(&mut self) -> Acquisition {
        let evicted = self.evict_oldest_if_full();
        let id = SurfaceId(self.next_id);
        self.next_id += 1;
        self.surfaces.push_back(Surface::open(id, self.geometry));
        debug_assert!(self.surfaces.len() <= self.max_canvases);
        Acquisition { surface: id, evicted }
    }

    fn evict_oldest_if_full(&mut self) -> Option<SurfaceId> {
        if self.surfaces.len() < self.max_canvases {
            return None;
        }
        let oldest = self.surfaces.pop_front()?;
        let id = oldest.id();
        tracing::debug!(surface = %oldest.name(), "evicting oldest surface");
        drop(oldest);
        Some(id)
    }

    /// The most recently acquired surface.
    pub fn active(&self) -> Option<&Surface> {
        self.surfaces.back()
    }

    pub fn get(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surfaces.iter_mut().find(|s| s.id == id)
    }

    pub fn ids(&self) -> Vec<SurfaceId> {
        self.surfaces.iter().map(|s| s.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.iter()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_canvases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_acquires_keep_last_three() {
        let mut pool = CanvasPool::new(3, SurfaceGeometry::default());
        let evicted: Vec<Option<SurfaceId>> = (0..5).map(|_| pool.acquire().evicted).collect();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.ids(), vec![SurfaceId(3), SurfaceId(4), SurfaceId(5)]);
        assert_eq!(evicted, vec![None, None, None, Some(SurfaceId(1)), Some(SurfaceId(2))]);
        assert_eq!(pool.active().map(|s| s.id()), Some(SurfaceId(5)));
    }

    #[test]
    fn ids_and_names_never_repeat() {
        let mut pool = CanvasPool::new(2, SurfaceGeometry::default());
        let mut names = std::collections::HashSet::new();
        for _ in 0..20 {
            let acq = pool.acquire();
            assert!(names.insert(pool.get(acq.surface).map(|s| s.name().to_owned()).unwrap()));
            assert!(pool.len() <= pool.capacity());
        }
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut pool = CanvasPool::new(0, SurfaceGeometry::default());
        assert_eq!(pool.capacity(), 1);
        pool.acquire();
        let acq = pool.acquire();
        assert_eq!(acq.evicted, Some(SurfaceId(1)));
        assert_eq!(pool.ids(), vec![SurfaceId(2)]);
    }

    #[test]
    fn surfaces_take_configured_geometry() {
        let cfg = PlotConfig { canvas_width: 1024, max_canvases: 4, ..PlotConfig::default() };
        let mut pool = CanvasPool::from_config(&cfg);
        let id = pool.acquire().surface;
        let s = pool.get_mut(id).unwrap();
        assert_eq!(s.geometry.width, 1024);
        assert_eq!(s.name(), "canvas_1");
        assert_eq!(s.title, "Plot");
        s.update();
        assert_eq!(pool.get(id).unwrap().refreshes(), 1);
        assert_eq!(pool.capacity(), 4);
    }
}
