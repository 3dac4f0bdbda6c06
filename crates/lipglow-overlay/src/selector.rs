//! Currently selected feature, shared between the UI and the detection worker.

use lipglow_models::Feature;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::info;

const NONE_SELECTED: u8 = 0;

/// Single-writer, multi-reader selection cell.
///
/// Written from the UI on menu taps and read once per frame by the detection
/// worker. A stale read only affects one frame.
#[derive(Debug, Clone, Default)]
pub struct FeatureSelector {
    current: Arc<AtomicU8>,
}

impl FeatureSelector {
    /// Create a selector with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selector with an initial value.
    pub fn with_initial(feature: Option<Feature>) -> Self {
        let selector = Self::new();
        if let Some(feature) = feature {
            selector.current.store(feature.code(), Ordering::Relaxed);
        }
        selector
    }

    /// Replace the selection. Takes effect on the next frame's completion.
    pub fn select(&self, feature: Feature) {
        let previous = self.current.swap(feature.code(), Ordering::Release);
        info!(
            feature = %feature,
            previous = ?Feature::from_code(previous),
            "Feature selected"
        );
    }

    /// Select by menu label. Unknown labels are ignored.
    pub fn select_label(&self, label: &str) -> bool {
        match label.parse::<Feature>() {
            Ok(feature) => {
                self.select(feature);
                true
            }
            Err(_) => false,
        }
    }

    /// Clear the selection.
    pub fn clear(&self) {
        self.current.store(NONE_SELECTED, Ordering::Release);
    }

    /// The current selection, if any.
    pub fn current(&self) -> Option<Feature> {
        Feature::from_code(self.current.load(Ordering::Acquire))
    }

    /// Whether the current selection has an overlay wired to it.
    pub fn is(&self, feature: Feature) -> bool {
        self.current() == Some(feature)
    }
}
