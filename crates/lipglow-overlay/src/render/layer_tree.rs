//! In-memory display surface.
//!
//! Layers live in slots above a video background. Handles index into the
//! slot list and stay valid until the layer is detached; `replace` overwrites
//! a slot without freeing it.

use image::RgbaImage;
use std::path::Path;
use tracing::info;

use super::raster::fill_path;
use super::{DisplaySurface, LayerHandle, OverlayShape};
use crate::error::OverlayResult;

#[derive(Debug, Default)]
pub struct LayerTree {
    slots: Vec<Option<OverlayShape>>,
    free: Vec<usize>,
    /// Bumped on every mutation
    revision: u64,
}

impl LayerTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached layers.
    pub fn attached_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Mutation counter, useful for detecting changes between presents.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Attached shapes in z-order, bottom first.
    pub fn shapes(&self) -> impl Iterator<Item = &OverlayShape> {
        self.slots.iter().flatten()
    }

    /// Shape behind `handle`, if still attached.
    pub fn get(&self, handle: LayerHandle) -> Option<&OverlayShape> {
        self.slots.get(handle.id() as usize).and_then(Option::as_ref)
    }

    /// Draw every layer over `background` in place.
    pub fn compose(&self, background: &mut RgbaImage) {
        for shape in self.shapes() {
            fill_path(background, &shape.path, shape.fill);
        }
    }

    /// Draw every layer over a copy of `background`.
    pub fn snapshot(&self, background: &RgbaImage) -> RgbaImage {
        let mut out = background.clone();
        self.compose(&mut out);
        out
    }

    /// Composite over `background` and save as PNG.
    pub fn write_snapshot(&self, background: &RgbaImage, path: &Path) -> OverlayResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.snapshot(background)
            .save_with_format(path, image::ImageFormat::Png)?;
        info!(path = %path.display(), layers = self.attached_count(), "Wrote overlay snapshot");
        Ok(())
    }
}

impl DisplaySurface for LayerTree {
    fn attach(&mut self, shape: OverlayShape) -> LayerHandle {
        self.revision += 1;
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(shape);
                index
            }
            None => {
                self.slots.push(Some(shape));
                self.slots.len() - 1
            }
        };
        LayerHandle::new(index as u64)
    }

    fn detach(&mut self, handle: LayerHandle) {
        let index = handle.id() as usize;
        if let Some(slot) = self.slots.get_mut(index) {
            if slot.take().is_some() {
                self.free.push(index);
                self.revision += 1;
            }
        }
    }

    fn replace(&mut self, handle: LayerHandle, shape: OverlayShape) -> LayerHandle {
        let index = handle.id() as usize;
        if let Some(slot) = self.slots.get_mut(index).filter(|s| s.is_some()) {
            *slot = Some(shape);
            self.revision += 1;
            return handle;
        }
        self.attach(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{OverlayPath, Subpath};
    use crate::render::OVERLAY_FILL;
    use image::Rgba;
    use lipglow_models::ScreenPoint;

    fn square(x: f64) -> OverlayShape {
        let mut path = OverlayPath::new();
        path.append(Subpath::closed_polygon(vec![
            ScreenPoint::new(x, 0.0),
            ScreenPoint::new(x + 4.0, 0.0),
            ScreenPoint::new(x + 4.0, 4.0),
            ScreenPoint::new(x, 4.0),
        ]));
        OverlayShape::new(path, OVERLAY_FILL)
    }

    #[test]
    fn test_attach_detach_reuses_slots() {
        let mut tree = LayerTree::new();
        let a = tree.attach(square(0.0));
        let b = tree.attach(square(5.0));
        assert_eq!(tree.attached_count(), 2);

        tree.detach(a);
        assert_eq!(tree.attached_count(), 1);
        assert!(tree.get(a).is_none());
        assert!(tree.get(b).is_some());

        let c = tree.attach(square(0.0));
        assert_eq!(c, a);
    }

    #[test]
    fn test_detach_unknown_handle_is_ignored() {
        let mut tree = LayerTree::new();
        let rev = tree.revision();
        tree.detach(LayerHandle::new(42));
        assert_eq!(tree.revision(), rev);
    }

    #[test]
    fn test_replace_keeps_handle() {
        let mut tree = LayerTree::new();
        let a = tree.attach(square(0.0));
        let b = tree.replace(a, square(5.0));
        assert_eq!(a, b);
        assert_eq!(tree.attached_count(), 1);
        let bounds = tree.get(b).and_then(|s| s.path.bounds()).unwrap();
        assert_eq!(bounds.0, 5.0);
    }

    #[test]
    fn test_replace_stale_handle_attaches() {
        let mut tree = LayerTree::new();
        let a = tree.attach(square(0.0));
        tree.detach(a);
        tree.replace(a, square(1.0));
        assert_eq!(tree.attached_count(), 1);
    }

    #[test]
    fn test_snapshot_draws_overlay() {
        let mut tree = LayerTree::new();
        tree.attach(square(0.0));
        let bg = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));

        let out = tree.snapshot(&bg);
        assert_eq!(out.get_pixel(1, 1)[0], 128);
        assert_eq!(out.get_pixel(6, 6)[0], 0);
        // Background untouched
        assert_eq!(bg.get_pixel(1, 1)[0], 0);
    }

    #[test]
    fn test_write_snapshot_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames").join("snapshot.png");

        let mut tree = LayerTree::new();
        tree.attach(square(0.0));
        let bg = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
        tree.write_snapshot(&bg, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (8, 8));
        assert_eq!(decoded.get_pixel(1, 1)[0], 128);
    }
}
