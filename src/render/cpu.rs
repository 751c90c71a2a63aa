use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Affine, BezPath, Canvas};
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::render::surface::{DrawSurface, FrameRGBA, Placement, TextDraw};
use crate::render::text::TextEngine;
use crate::scene::color::Color;
use crate::scene::stage::Stage;

const IMAGE_CACHE_LIMIT: usize = 256;

/// CPU raster surface powered by `vello_cpu`.
///
/// Draw calls are recorded into a `vello_cpu::RenderContext`; [`DrawSurface::snapshot`]
/// flushes them into a premultiplied RGBA8 pixmap.
pub struct CpuSurface {
    canvas: Canvas,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    alpha: f32,
    text: TextEngine,
    image_cache: HashMap<usize, (Arc<Vec<u8>>, vello_cpu::Image)>,
}

impl CpuSurface {
    /// Create a surface for `canvas` with no fonts registered.
    pub fn new(canvas: Canvas) -> TickreelResult<Self> {
        Self::with_text_engine(canvas, TextEngine::new())
    }

    /// Create a surface for the stage canvas with the stage fonts registered.
    pub fn from_stage(stage: &Stage) -> TickreelResult<Self> {
        Self::with_text_engine(stage.canvas, TextEngine::from_stage(stage)?)
    }

    /// Create a surface with a prepared text engine.
    pub fn with_text_engine(canvas: Canvas, text: TextEngine) -> TickreelResult<Self> {
        canvas.validate()?;
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| TickreelError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| TickreelError::render("canvas height exceeds u16"))?;
        Ok(Self {
            canvas,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
            alpha: 1.0,
            text,
            image_cache: HashMap::new(),
        })
    }

    /// Text engine used for text draws.
    pub fn text_engine(&mut self) -> &mut TextEngine {
        &mut self.text
    }

    fn image_paint_for(&mut self, image: &PreparedImage) -> TickreelResult<vello_cpu::Image> {
        let key = Arc::as_ptr(&image.rgba8_premul) as usize;
        if let Some((_, paint)) = self.image_cache.get(&key) {
            return Ok(paint.clone());
        }
        if self.image_cache.len() >= IMAGE_CACHE_LIMIT {
            self.image_cache.clear();
        }
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache
            .insert(key, (image.rgba8_premul.clone(), paint.clone()));
        Ok(paint)
    }

    fn with_alpha(&mut self, draw: impl FnOnce(&mut vello_cpu::RenderContext)) {
        let opacity = self.alpha;
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        draw(&mut self.ctx);
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
    }
}

impl DrawSurface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn clear(&mut self, color: Color) -> TickreelResult<()> {
        self.ctx.reset();
        self.alpha = 1.0;
        clear_pixmap_to_transparent(&mut self.pixmap);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
        Ok(())
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0) as f32;
    }

    fn draw_text(&mut self, text: &TextDraw<'_>) -> TickreelResult<()> {
        let shaped = self
            .text
            .shape(text.content, text.font_family, text.font_size, text.color)?;
        let tr = Affine::translate((text.x, text.y))
            * Affine::rotate(text.rotation)
            * Affine::translate((-shaped.width / 2.0, -shaped.baseline));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(tr));
        self.with_alpha(|ctx| {
            for line in shaped.layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&shaped.font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &PreparedImage, placement: Placement) -> TickreelResult<()> {
        let paint = self.image_paint_for(image)?;
        let (w, h) = (f64::from(image.width), f64::from(image.height));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_transform(affine_to_cpu(placement.source_transform(w, h)));
        self.ctx.set_paint(paint);
        self.with_alpha(|ctx| ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h)));
        Ok(())
    }

    fn draw_rounded_rect(
        &mut self,
        placement: Placement,
        radius: f64,
        color: Color,
    ) -> TickreelResult<()> {
        let path = kurbo::Shape::to_path(
            &kurbo::RoundedRect::from_rect(placement.bounds(), radius.max(0.0)),
            0.1,
        );
        let cpu_path = bezpath_to_cpu(&path);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(placement.pivot()));
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a));
        self.with_alpha(|ctx| ctx.fill_path(&cpu_path));
        Ok(())
    }

    fn snapshot(&mut self) -> TickreelResult<FrameRGBA> {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn clear_pixmap_to_transparent(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> TickreelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| TickreelError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| TickreelError::render("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(TickreelError::render("image byte length mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
