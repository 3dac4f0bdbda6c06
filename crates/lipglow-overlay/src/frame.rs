//! Captured video frames.

use std::sync::Arc;
use std::time::Duration;

/// Pixel layout of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Bgra8,
    Rgba8,
    /// Bi-planar 4:2:0 luma/chroma
    Nv12,
}

impl PixelFormat {
    /// Bytes needed for a frame of the given size.
    pub fn buffer_len(&self, width: u32, height: u32) -> usize {
        let pixels = width as usize * height as usize;
        match self {
            PixelFormat::Bgra8 | PixelFormat::Rgba8 => pixels * 4,
            PixelFormat::Nv12 => pixels + pixels / 2,
        }
    }
}

/// One captured image.
///
/// The pixel buffer is shared, so cloning a frame is cheap. A frame is held
/// only for the duration of one detection call.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Monotonic frame number assigned by the capture session
    pub id: u64,
    /// Capture time relative to session start
    pub timestamp: Duration,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    data: Arc<[u8]>,
}

impl Frame {
    pub fn new(
        id: u64,
        timestamp: Duration,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            id,
            timestamp,
            width,
            height,
            format,
            data: data.into(),
        }
    }

    /// A zero-filled frame of the given size.
    pub fn blank(id: u64, timestamp: Duration, width: u32, height: u32, format: PixelFormat) -> Self {
        let data = vec![0u8; format.buffer_len(width, height)];
        Self::new(id, timestamp, width, height, format, data)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the buffer length matches the declared size and format.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == self.format.buffer_len(self.width, self.height)
    }
}
