//! Image and image-sequence loading.

/// Eager image decoding into premultiplied pixels.
pub mod decode;
/// Frame sequences backing video objects.
pub mod sequence;
