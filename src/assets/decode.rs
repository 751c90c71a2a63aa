use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{TickreelError, TickreelResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded image pixels, premultiplied RGBA8, tightly packed and row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> TickreelResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Read and decode an image file synchronously.
///
/// A missing or undecodable file is an asset error.
pub fn load_image(path: &Path) -> TickreelResult<Arc<PreparedImage>> {
    let bytes = std::fs::read(path).map_err(|e| {
        TickreelError::asset(format!("failed to read image '{}': {e}", path.display()))
    })?;
    let img = decode_image(&bytes).map_err(|e| {
        TickreelError::asset(format!("failed to decode image '{}': {e}", path.display()))
    })?;
    if img.width == 0 || img.height == 0 {
        return Err(TickreelError::asset(format!(
            "image '{}' has zero size",
            path.display()
        )));
    }
    Ok(Arc::new(img))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
