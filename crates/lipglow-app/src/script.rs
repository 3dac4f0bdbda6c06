//! Scripted menu taps.
//!
//! A selection script stands in for the user tapping the feature menu. It is
//! a comma-separated list of `Label@frame` entries, e.g.
//! `Lips@0,Chin@60,Lips@90`: select Lips immediately, Chin once 60 frame
//! intervals have elapsed, and Lips again at 90.

use std::str::FromStr;
use std::time::Duration;

use lipglow_models::Feature;
use lipglow_overlay::FeatureSelector;
use tracing::debug;

use crate::error::AppError;

/// One scheduled selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionStep {
    pub at_frame: u64,
    pub feature: Feature,
}

/// Ordered list of scheduled selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionScript {
    steps: Vec<SelectionStep>,
}

impl SelectionScript {
    pub fn new(mut steps: Vec<SelectionStep>) -> Self {
        steps.sort_by_key(|s| s.at_frame);
        Self { steps }
    }

    pub fn steps(&self) -> &[SelectionStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply each step to `selector` once its frame time has elapsed.
    pub async fn play(&self, selector: FeatureSelector, frame_interval: Duration) {
        let start = tokio::time::Instant::now();
        for step in &self.steps {
            let offset = frame_interval.saturating_mul(step.at_frame.min(u32::MAX as u64) as u32);
            tokio::time::sleep_until(start + offset).await;
            debug!(frame = step.at_frame, feature = %step.feature, "Menu tap");
            selector.select(step.feature);
        }
    }
}

impl FromStr for SelectionScript {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut steps = Vec::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (label, frame) = match entry.split_once('@') {
                Some((label, frame)) => (label.trim(), frame.trim()),
                None => (entry, "0"),
            };
            let feature = label
                .parse::<Feature>()
                .map_err(|e| AppError::script(e.to_string()))?;
            let at_frame = frame
                .parse::<u64>()
                .map_err(|_| AppError::script(format!("bad frame index in '{}'", entry)))?;
            steps.push(SelectionStep { at_frame, feature });
        }
        Ok(Self::new(steps))
    }
}
