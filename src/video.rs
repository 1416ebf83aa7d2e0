// Video module - frame output capability
//
// The PPU does not own a frame buffer. It emits pixels one at a time and
// announces frame completion through the `VideoSink` capability; the host
// decides whether those pixels land in a texture, a WASM canvas, or the
// headless recorder below.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Screen width in pixels
pub const SCREEN_WIDTH: usize = 256;

/// Screen height in pixels
pub const SCREEN_HEIGHT: usize = 240;

/// Receiver for the PPU's pixel and frame events
///
/// `push_pixel` is called once per rendered dot while rendering is enabled;
/// `push_frame` is called exactly once per frame at the start of VBlank,
/// whether or not rendering produced any pixels. Both are invoked
/// synchronously from inside the emulation loop and must return quickly.
pub trait VideoSink {
    /// Accept one rendered pixel
    ///
    /// # Arguments
    ///
    /// * `x` - Horizontal position, 0..256
    /// * `y` - Scanline, 0..240
    /// * `color` - 24-bit RGB value
    fn push_pixel(&mut self, x: usize, y: usize, color: u32);

    /// Mark the current frame as complete
    fn push_frame(&mut self);
}

/// Errors that can occur while dumping a recorded frame
#[derive(Debug, Error)]
pub enum DumpError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding error
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),
}

/// Headless video sink that records the most recent frame
///
/// Keeps a 256x240 RGB buffer and a count of completed frames. Useful for
/// unit tests and for dumping frames to disk while debugging.
///
/// # Example
///
/// ```
/// use rp2c02::{FrameRecorder, VideoSink};
///
/// let mut recorder = FrameRecorder::new();
/// recorder.push_pixel(10, 20, 0xFF00FF);
/// recorder.push_frame();
/// assert_eq!(recorder.pixel(10, 20), 0xFF00FF);
/// assert_eq!(recorder.frames(), 1);
/// ```
pub struct FrameRecorder {
    pixels: Vec<u32>,
    frames: u64,
}

impl FrameRecorder {
    /// Create a recorder with a black frame
    pub fn new() -> Self {
        FrameRecorder {
            pixels: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
            frames: 0,
        }
    }

    /// Read back one recorded pixel
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    /// The full 256x240 RGB buffer, row-major
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Number of completed frames seen so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Save the recorded frame as a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), DumpError> {
        let file = File::create(path.as_ref())?;
        let writer = BufWriter::new(file);

        let mut encoder = png::Encoder::new(writer, SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let mut rgb = Vec::with_capacity(SCREEN_WIDTH * SCREEN_HEIGHT * 3);
        for &pixel in &self.pixels {
            rgb.push((pixel >> 16) as u8);
            rgb.push((pixel >> 8) as u8);
            rgb.push(pixel as u8);
        }

        encoder.write_header()?.write_image_data(&rgb)?;
        Ok(())
    }

    /// Save the recorded frame into `dir` with a timestamped filename
    ///
    /// # Returns
    ///
    /// The path of the written file, e.g. `frames/frame_20260801_120000.png`
    pub fn save_timestamped<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf, DumpError> {
        std::fs::create_dir_all(dir.as_ref())?;

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.as_ref().join(format!("frame_{}.png", timestamp));
        self.save_png(&path)?;
        tracing::debug!(path = %path.display(), "frame dumped");
        Ok(path)
    }
}

impl Default for FrameRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoSink for FrameRecorder {
    fn push_pixel(&mut self, x: usize, y: usize, color: u32) {
        self.pixels[y * SCREEN_WIDTH + x] = color;
    }

    fn push_frame(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_stores_pixels() {
        let mut recorder = FrameRecorder::new();
        recorder.push_pixel(0, 0, 0x112233);
        recorder.push_pixel(255, 239, 0x445566);

        assert_eq!(recorder.pixel(0, 0), 0x112233);
        assert_eq!(recorder.pixel(255, 239), 0x445566);
        assert_eq!(recorder.pixel(128, 120), 0);
    }

    #[test]
    fn test_recorder_counts_frames() {
        let mut recorder = FrameRecorder::new();
        assert_eq!(recorder.frames(), 0);

        recorder.push_frame();
        recorder.push_frame();
        assert_eq!(recorder.frames(), 2);
    }
}
