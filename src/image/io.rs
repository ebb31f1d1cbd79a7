//! I/O helpers for grids and JSON.
//!
//! - `load_grid`: read a PNG/JPEG/etc. into a 1–4 channel grid scaled to `[0, max_value]`.
//! - `save_grid`: write a 1–4 channel grid as an 8-bit image.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::Grid;
use image::ColorType;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk as gray, gray+alpha, RGB or RGBA samples.
pub fn load_grid(path: &Path, max_value: f64) -> Result<Grid, String> {
    let img = image::open(path).map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    let (width, height) = (img.width() as usize, img.height() as usize);
    let (channels, raw) = match img.color().channel_count() {
        1 => (1, img.into_luma8().into_raw()),
        2 => (2, img.into_luma_alpha8().into_raw()),
        3 => (3, img.into_rgb8().into_raw()),
        _ => (4, img.into_rgba8().into_raw()),
    };
    let scale = max_value / 255.0;
    let data = raw.into_iter().map(|v| v as f64 * scale).collect();
    Grid::from_vec(width, height, channels, data)
        .map_err(|e| format!("Invalid image {}: {e}", path.display()))
}

/// Save a grid as an 8-bit image, mapping `[0, max_value]` to `[0, 255]`.
pub fn save_grid(grid: &Grid, path: &Path, max_value: f64) -> Result<(), String> {
    let color = match grid.channels {
        1 => ColorType::L8,
        2 => ColorType::La8,
        3 => ColorType::Rgb8,
        4 => ColorType::Rgba8,
        n => return Err(format!("Cannot save {n}-channel grid to {}", path.display())),
    };
    ensure_parent_dir(path)?;
    let scale = 255.0 / max_value;
    let bytes: Vec<u8> = grid
        .data
        .iter()
        .map(|&v| (v * scale).round().clamp(0.0, 255.0) as u8)
        .collect();
    image::save_buffer(path, &bytes, grid.w as u32, grid.h as u32, color)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
