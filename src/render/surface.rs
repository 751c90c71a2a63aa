use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Affine, Canvas, Point, Rect};
use crate::foundation::error::TickreelResult;
use crate::scene::color::Color;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha** by default. The `premultiplied` flag is included to make
/// this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Read the RGBA8 value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|px| [px[0], px[1], px[2], px[3]])
    }
}

/// Axis-aligned box `(x, y, w, h)` rotated about its own centre.
///
/// `w`/`h` may be negative, which mirrors the content along that axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Left edge before rotation (right edge when `w < 0`).
    pub x: f64,
    /// Top edge before rotation (bottom edge when `h < 0`).
    pub y: f64,
    /// Signed width.
    pub w: f64,
    /// Signed height.
    pub h: f64,
    /// Rotation in radians about the centre.
    pub rotation: f64,
}

impl Placement {
    /// Centre of the box.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Unrotated bounds with non-negative extent.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h).abs()
    }

    /// Rotation about the centre.
    pub fn pivot(&self) -> Affine {
        let c = self.center().to_vec2();
        Affine::translate(c) * Affine::rotate(self.rotation) * Affine::translate(-c)
    }

    /// Map a `src_w x src_h` source (image pixels) onto this box.
    pub fn source_transform(&self, src_w: f64, src_h: f64) -> Affine {
        self.pivot()
            * Affine::translate((self.x, self.y))
            * Affine::scale_non_uniform(self.w / src_w, self.h / src_h)
    }
}

/// Text draw request. Text is centred horizontally on `(x, y)`, with its baseline at `y`, and
/// rotated about that point.
#[derive(Clone, Copy, Debug)]
pub struct TextDraw<'a> {
    /// Content.
    pub content: &'a str,
    /// Registered font family.
    pub font_family: &'a str,
    /// Size in pixels.
    pub font_size: f64,
    /// Fill color.
    pub color: Color,
    /// Anchor x (horizontal centre).
    pub x: f64,
    /// Anchor y (baseline).
    pub y: f64,
    /// Rotation in radians about the anchor.
    pub rotation: f64,
}

/// 2D raster target the painter draws one frame into.
pub trait DrawSurface {
    /// Surface size.
    fn canvas(&self) -> Canvas;
    /// Start a new frame filled with `color`.
    fn clear(&mut self, color: Color) -> TickreelResult<()>;
    /// Opacity applied to subsequent draws, in `[0, 1]`.
    fn set_global_alpha(&mut self, alpha: f64);
    /// Draw text.
    fn draw_text(&mut self, text: &TextDraw<'_>) -> TickreelResult<()>;
    /// Draw an image stretched onto `placement`.
    fn draw_image(&mut self, image: &PreparedImage, placement: Placement) -> TickreelResult<()>;
    /// Fill a (rounded) rectangle. `radius` is already clamped to half the box size.
    fn draw_rounded_rect(
        &mut self,
        placement: Placement,
        radius: f64,
        color: Color,
    ) -> TickreelResult<()>;
    /// Finish the frame and read back its pixels.
    fn snapshot(&mut self) -> TickreelResult<FrameRGBA>;
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
