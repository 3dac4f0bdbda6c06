//! Overlay rendering.
//!
//! The [`OverlayRenderer`] owns the single overlay slot on a
//! [`DisplaySurface`] and is driven only from the render context through
//! [`run_render_loop`]. The detection worker never touches the surface; it
//! sends [`RenderCommand`]s over a channel instead.
//!
//! # Atomic swap
//! Replacing the overlay happens under one lock of the surface, so a
//! compositor reading the surface sees either the old shape or the new one,
//! never both and never neither.

pub mod layer_tree;
pub mod raster;

use image::Rgba;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::metrics;
use crate::path::OverlayPath;

pub use layer_tree::LayerTree;

/// Translucent red at 50% alpha.
pub const OVERLAY_FILL: Rgba<u8> = Rgba([255, 0, 0, 128]);

/// A filled shape attached to the display surface.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayShape {
    pub path: OverlayPath,
    pub fill: Rgba<u8>,
}

impl OverlayShape {
    pub fn new(path: OverlayPath, fill: Rgba<u8>) -> Self {
        Self { path, fill }
    }
}

/// Opaque handle to an attached layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerHandle(u64);

impl LayerHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A layer tree the renderer attaches overlay shapes to.
pub trait DisplaySurface: Send + 'static {
    /// Attach a shape above the video preview.
    fn attach(&mut self, shape: OverlayShape) -> LayerHandle;

    /// Remove a previously attached shape. Unknown handles are ignored.
    fn detach(&mut self, handle: LayerHandle);

    /// Swap the shape behind `handle` for `shape`.
    ///
    /// Surfaces that can overwrite a slot in place should override this.
    fn replace(&mut self, handle: LayerHandle, shape: OverlayShape) -> LayerHandle {
        self.detach(handle);
        self.attach(shape)
    }
}

/// Surface shared between the render loop and whatever presents it.
pub type SharedSurface<S> = Arc<Mutex<S>>;

/// Lock a shared surface, recovering the guard if a holder panicked.
pub fn lock_surface<S>(surface: &SharedSurface<S>) -> MutexGuard<'_, S> {
    surface.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Command sent from the detection worker to the render context.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Show `path`, or clear the overlay when `None`
    Publish {
        frame_id: u64,
        path: Option<OverlayPath>,
    },
}

/// Owns the single active overlay on a display surface.
pub struct OverlayRenderer<S: DisplaySurface> {
    surface: SharedSurface<S>,
    active: Option<LayerHandle>,
    fill: Rgba<u8>,
}

impl<S: DisplaySurface> OverlayRenderer<S> {
    /// Create a renderer with the standard overlay fill.
    pub fn new(surface: SharedSurface<S>) -> Self {
        Self {
            surface,
            active: None,
            fill: OVERLAY_FILL,
        }
    }

    /// Handle to the surface, for presenting or inspection.
    pub fn surface(&self) -> SharedSurface<S> {
        Arc::clone(&self.surface)
    }

    /// Whether an overlay is currently attached.
    pub fn has_overlay(&self) -> bool {
        self.active.is_some()
    }

    /// Replace or clear the overlay.
    ///
    /// `None` detaches the current overlay. `Some` swaps the new shape into
    /// the overlay slot in one locked step.
    pub fn publish(&mut self, path: Option<OverlayPath>) {
        let mut surface = lock_surface(&self.surface);
        match (path, self.active.take()) {
            (Some(path), previous) => {
                let shape = OverlayShape::new(path, self.fill);
                let handle = match previous {
                    Some(handle) => surface.replace(handle, shape),
                    None => surface.attach(shape),
                };
                self.active = Some(handle);
                metrics::record_overlay_published();
            }
            (None, Some(handle)) => surface.detach(handle),
            (None, None) => {}
        }
    }
}

/// Apply render commands in order until every sender is dropped.
///
/// Returns the renderer so callers can inspect the final state.
pub async fn run_render_loop<S: DisplaySurface>(
    mut renderer: OverlayRenderer<S>,
    mut commands: mpsc::Receiver<RenderCommand>,
) -> OverlayRenderer<S> {
    info!("Render loop started");
    while let Some(command) = commands.recv().await {
        match command {
            RenderCommand::Publish { frame_id, path } => {
                debug!(frame_id, visible = path.is_some(), "Publishing overlay");
                renderer.publish(path);
            }
        }
    }
    info!("Render loop stopped");
    renderer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Subpath;
    use lipglow_models::ScreenPoint;

    /// Surface that records how many layers are attached after every call.
    #[derive(Default)]
    struct RecordingSurface {
        next_id: u64,
        attached: Vec<LayerHandle>,
        history: Vec<usize>,
    }

    impl DisplaySurface for RecordingSurface {
        fn attach(&mut self, _shape: OverlayShape) -> LayerHandle {
            self.next_id += 1;
            let handle = LayerHandle::new(self.next_id);
            self.attached.push(handle);
            self.history.push(self.attached.len());
            handle
        }

        fn detach(&mut self, handle: LayerHandle) {
            self.attached.retain(|h| *h != handle);
            self.history.push(self.attached.len());
        }
    }

    fn triangle() -> OverlayPath {
        let mut path = OverlayPath::new();
        path.append(Subpath::closed_polygon(vec![
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(10.0, 0.0),
            ScreenPoint::new(5.0, 8.0),
        ]));
        path
    }

    #[test]
    fn test_publish_twice_leaves_one_overlay() {
        let surface = Arc::new(Mutex::new(LayerTree::new()));
        let mut renderer = OverlayRenderer::new(Arc::clone(&surface));

        renderer.publish(Some(triangle()));
        let first = lock_surface(&surface).revision();
        renderer.publish(Some(triangle()));

        let tree = lock_surface(&surface);
        assert_eq!(tree.attached_count(), 1);
        // The slot was overwritten in place, one revision per publish
        assert_eq!(tree.revision(), first + 1);
    }

    #[test]
    fn test_publish_none_clears() {
        let surface = Arc::new(Mutex::new(LayerTree::new()));
        let mut renderer = OverlayRenderer::new(Arc::clone(&surface));

        renderer.publish(Some(triangle()));
        assert!(renderer.has_overlay());
        renderer.publish(None);
        assert!(!renderer.has_overlay());
        assert_eq!(lock_surface(&surface).attached_count(), 0);

        // Clearing an empty surface is a no-op
        renderer.publish(None);
        assert_eq!(lock_surface(&surface).attached_count(), 0);
    }

    #[test]
    fn test_fill_is_half_alpha_red() {
        let surface = Arc::new(Mutex::new(LayerTree::new()));
        let mut renderer = OverlayRenderer::new(Arc::clone(&surface));
        renderer.publish(Some(triangle()));

        let tree = lock_surface(&surface);
        let shape = tree.shapes().next().unwrap();
        assert_eq!(shape.fill, Rgba([255, 0, 0, 128]));
    }

    #[test]
    fn test_default_replace_detaches_before_attaching() {
        let surface = Arc::new(Mutex::new(RecordingSurface::default()));
        let mut renderer = OverlayRenderer::new(Arc::clone(&surface));

        renderer.publish(Some(triangle()));
        renderer.publish(Some(triangle()));

        let recorded = lock_surface(&surface);
        assert_eq!(recorded.attached.len(), 1);
        // The transient zero happens inside one locked publish call
        assert_eq!(recorded.history, vec![1, 0, 1]);
    }

    #[tokio::test]
    async fn test_render_loop_applies_commands_in_order() {
        let surface = Arc::new(Mutex::new(LayerTree::new()));
        let renderer = OverlayRenderer::new(Arc::clone(&surface));
        let (tx, rx) = mpsc::channel(4);

        let handle = tokio::spawn(run_render_loop(renderer, rx));
        tx.send(RenderCommand::Publish { frame_id: 1, path: Some(triangle()) })
            .await
            .unwrap();
        tx.send(RenderCommand::Publish { frame_id: 2, path: None })
            .await
            .unwrap();
        drop(tx);

        let renderer = handle.await.unwrap();
        assert!(!renderer.has_overlay());
        assert_eq!(lock_surface(&surface).attached_count(), 0);
    }
}
