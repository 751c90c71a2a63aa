use crate::assets::sequence::SequenceLibrary;
use crate::foundation::error::TickreelResult;
use crate::render::surface::{DrawSurface, Placement, TextDraw};
use crate::scene::object::{Frame, ObjectKind, RenderObject};
use crate::scene::stage::Stage;

/// Opacity below which an object is skipped entirely.
pub const MIN_VISIBLE_OPACITY: f64 = 0.01;

/// Paints object lists onto a [`DrawSurface`].
///
/// Painting is read-only with respect to objects: it never mutates animation state.
#[derive(Default)]
pub struct Painter {
    sequences: SequenceLibrary,
}

impl Painter {
    /// Create a painter with an empty video-frame cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the surface to the stage background and draw `frame` in order.
    pub fn paint(
        &mut self,
        surface: &mut dyn DrawSurface,
        stage: &Stage,
        frame: &Frame,
    ) -> TickreelResult<()> {
        surface.clear(stage.background)?;
        for obj in frame {
            let obj = obj.borrow();
            self.draw_object(surface, stage, &obj)?;
        }
        Ok(())
    }

    fn draw_object(
        &mut self,
        surface: &mut dyn DrawSurface,
        stage: &Stage,
        obj: &RenderObject,
    ) -> TickreelResult<()> {
        if obj.opacity < MIN_VISIBLE_OPACITY {
            return Ok(());
        }
        let sized = |w: f64, h: f64| Placement {
            x: obj.x,
            y: obj.y,
            w,
            h,
            rotation: obj.rotation,
        };
        surface.set_global_alpha(obj.opacity.min(1.0));
        match &obj.kind {
            ObjectKind::Text(t) => surface.draw_text(&TextDraw {
                content: &t.content,
                font_family: &t.font_family,
                font_size: t.font_size,
                color: t.color,
                x: obj.x,
                y: obj.y,
                rotation: obj.rotation,
            }),
            ObjectKind::Image(i) => {
                let placement = sized(i.w, i.h);
                if !on_stage(stage, placement) {
                    return Ok(());
                }
                surface.draw_image(&i.decoded, placement)
            }
            ObjectKind::Video(v) => {
                let placement = sized(v.w, v.h);
                if !on_stage(stage, placement) {
                    return Ok(());
                }
                let image = self.sequences.frame_at(
                    &v.source_folder,
                    &v.extension,
                    v.current_time,
                    v.framerate,
                )?;
                surface.draw_image(&image, placement)
            }
            ObjectKind::Box(b) => {
                let placement = sized(b.w, b.h);
                if !on_stage(stage, placement) {
                    return Ok(());
                }
                surface.draw_rounded_rect(placement, clamp_radius(b.corner_radius, b.w, b.h), b.color)
            }
        }
    }
}

/// Clamp a corner radius to half the smaller box dimension.
pub fn clamp_radius(radius: f64, w: f64, h: f64) -> f64 {
    radius.max(0.0).min(w.abs() / 2.0).min(h.abs() / 2.0)
}

/// Return `true` when the unrotated bounds intersect the stage.
fn on_stage(stage: &Stage, placement: Placement) -> bool {
    let r = placement.bounds();
    r.x0 <= stage.width() && r.y0 <= stage.height() && r.x1 >= 0.0 && r.y1 >= 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/render/paint.rs"]
mod tests;
