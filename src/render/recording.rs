use crate::assets::decode::PreparedImage;
use crate::foundation::core::Canvas;
use crate::foundation::error::TickreelResult;
use crate::render::surface::{DrawSurface, FrameRGBA, Placement, TextDraw};
use crate::scene::color::Color;

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    /// Frame cleared to a color.
    Clear(Color),
    /// Text drawn.
    Text {
        /// Content.
        content: String,
        /// Anchor x.
        x: f64,
        /// Anchor y.
        y: f64,
        /// Rotation.
        rotation: f64,
        /// Font size.
        font_size: f64,
        /// Global alpha at draw time.
        alpha: f64,
    },
    /// Image or video frame drawn.
    Image {
        /// Source pixel size.
        source: (u32, u32),
        /// Destination.
        placement: Placement,
        /// Global alpha at draw time.
        alpha: f64,
    },
    /// Box drawn.
    Rect {
        /// Destination.
        placement: Placement,
        /// Clamped corner radius.
        radius: f64,
        /// Fill color.
        color: Color,
        /// Global alpha at draw time.
        alpha: f64,
    },
}

/// Surface that records draw calls instead of rasterizing, for tests and dry runs.
///
/// Snapshots are transparent frames of the canvas size.
#[derive(Debug)]
pub struct RecordingSurface {
    canvas: Canvas,
    alpha: f64,
    current: Vec<DrawCall>,
    frames: Vec<Vec<DrawCall>>,
}

impl RecordingSurface {
    /// Create a recorder for `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            alpha: 1.0,
            current: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Draw calls of every snapshotted frame, in order.
    pub fn frames(&self) -> &[Vec<DrawCall>] {
        &self.frames
    }
}

impl DrawSurface for RecordingSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn clear(&mut self, color: Color) -> TickreelResult<()> {
        self.current.clear();
        self.alpha = 1.0;
        self.current.push(DrawCall::Clear(color));
        Ok(())
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    fn draw_text(&mut self, text: &TextDraw<'_>) -> TickreelResult<()> {
        self.current.push(DrawCall::Text {
            content: text.content.to_owned(),
            x: text.x,
            y: text.y,
            rotation: text.rotation,
            font_size: text.font_size,
            alpha: self.alpha,
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &PreparedImage, placement: Placement) -> TickreelResult<()> {
        self.current.push(DrawCall::Image {
            source: (image.width, image.height),
            placement,
            alpha: self.alpha,
        });
        Ok(())
    }

    fn draw_rounded_rect(
        &mut self,
        placement: Placement,
        radius: f64,
        color: Color,
    ) -> TickreelResult<()> {
        self.current.push(DrawCall::Rect {
            placement,
            radius,
            color,
            alpha: self.alpha,
        });
        Ok(())
    }

    fn snapshot(&mut self) -> TickreelResult<FrameRGBA> {
        self.frames.push(std::mem::take(&mut self.current));
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: vec![0; (self.canvas.width as usize) * (self.canvas.height as usize) * 4],
            premultiplied: true,
        })
    }
}
