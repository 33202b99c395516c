use std::path::Path;

use image::imageops::FilterType;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{SegueError, SegueResult};

/// Decoded, analysis-sized RGB frame with a precomputed luma plane.
///
/// All detectors operate on this type; decoding and downscaling happen exactly once per shot.
#[derive(Clone, Debug)]
pub struct Raster {
    width: u32,
    height: u32,
    rgb: Vec<Rgb8>,
    luma: Vec<f32>,
}

impl Raster {
    /// Build a raster from row-major RGB pixels.
    pub fn from_rgb(width: u32, height: u32, rgb: Vec<Rgb8>) -> SegueResult<Self> {
        if width == 0 || height == 0 {
            return Err(SegueError::input("raster dimensions must be non-zero"));
        }
        let expected = (width as usize) * (height as usize);
        if rgb.len() != expected {
            return Err(SegueError::input(format!(
                "raster pixel count mismatch: expected {expected}, got {}",
                rgb.len()
            )));
        }
        let luma = rgb.iter().map(|px| px.luma() as f32).collect();
        Ok(Self {
            width,
            height,
            rgb,
            luma,
        })
    }

    /// Single-color raster. Mostly useful for synthetic inputs.
    pub fn solid(width: u32, height: u32, color: Rgb8) -> SegueResult<Self> {
        let n = (width as usize) * (height as usize);
        Self::from_rgb(width, height, vec![color; n])
    }

    /// Convert a decoded image, downscaling so the longest side is at most `max_dim`.
    pub fn from_dynamic(img: &image::DynamicImage, max_dim: u32) -> SegueResult<Self> {
        let max_dim = max_dim.max(8);
        let (w, h) = (img.width(), img.height());
        let rgb = if w.max(h) > max_dim {
            img.resize(max_dim, max_dim, FilterType::Triangle).to_rgb8()
        } else {
            img.to_rgb8()
        };
        let (width, height) = rgb.dimensions();
        let pixels = rgb.pixels().map(|p| Rgb8::from_array(p.0)).collect();
        Self::from_rgb(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.rgb.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rgb.is_empty()
    }

    pub fn pixels(&self) -> &[Rgb8] {
        &self.rgb
    }

    /// Luma plane in `[0, 255]`.
    pub fn luma(&self) -> &[f32] {
        &self.luma
    }

    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    pub fn luma_at(&self, x: u32, y: u32) -> f32 {
        self.luma[self.index(x, y)]
    }

    pub fn mean_luma(&self) -> f64 {
        self.luma.iter().map(|&v| f64::from(v)).sum::<f64>() / self.luma.len() as f64
    }

    /// Population standard deviation of luma, on the `[0, 255]` scale.
    pub fn luma_std(&self) -> f64 {
        let m = self.mean_luma();
        let var = self
            .luma
            .iter()
            .map(|&v| (f64::from(v) - m).powi(2))
            .sum::<f64>()
            / self.luma.len() as f64;
        var.sqrt()
    }
}

/// Decode encoded image bytes into an analysis raster.
pub fn decode_raster(bytes: &[u8], max_dim: u32) -> SegueResult<Raster> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| SegueError::input(format!("decode image from memory: {e}")))?;
    Raster::from_dynamic(&img, max_dim)
}

/// Read and decode an image file into an analysis raster.
pub fn load_raster(path: &Path, max_dim: u32) -> SegueResult<Raster> {
    let bytes = std::fs::read(path)
        .map_err(|e| SegueError::input(format!("read image '{}': {e}", path.display())))?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| SegueError::input(format!("decode image '{}': {e}", path.display())))?;
    Raster::from_dynamic(&img, max_dim)
}

#[cfg(test)]
#[path = "../../tests/unit/vision/raster.rs"]
mod tests;
