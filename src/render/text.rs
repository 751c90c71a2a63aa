use std::collections::HashMap;

use crate::foundation::error::{TickreelError, TickreelResult};
use crate::scene::color::Color;
use crate::scene::stage::Stage;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Color> for TextBrushRgba8 {
    fn from(c: Color) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

struct RegisteredFamily {
    /// Family name as reported by the font collection.
    collection_name: String,
    font: vello_cpu::peniko::FontData,
}

/// Laid-out single-line text plus the font needed to rasterize its glyphs.
pub(crate) struct ShapedText {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    pub(crate) font: vello_cpu::peniko::FontData,
    pub(crate) width: f64,
    pub(crate) baseline: f64,
}

/// Parley-backed text shaping over an explicit set of registered font files.
///
/// Objects name fonts by family (`"Arial"`). Each family must be registered from font bytes
/// first. There is no system font fallback.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<String, RegisteredFamily>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    /// Engine with no registered fonts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    /// Engine with every font listed by the stage registered.
    pub fn from_stage(stage: &Stage) -> TickreelResult<Self> {
        let mut engine = Self::new();
        for spec in &stage.fonts {
            let path = stage.resolve(&spec.path);
            let bytes = std::fs::read(&path).map_err(|e| {
                TickreelError::asset(format!("failed to read font '{}': {e}", path.display()))
            })?;
            engine.register_font(&spec.family, bytes)?;
        }
        Ok(engine)
    }

    /// Register font bytes under `family`, replacing any earlier registration.
    pub fn register_font(&mut self, family: &str, bytes: Vec<u8>) -> TickreelResult<()> {
        let registered = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = registered.first().map(|(id, _)| *id).ok_or_else(|| {
            TickreelError::asset(format!("no font faces found for family '{family}'"))
        })?;
        let collection_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TickreelError::asset("registered font family has no name"))?
            .to_string();
        tracing::debug!(family, collection_name, "registered font");
        self.families.insert(
            family.to_owned(),
            RegisteredFamily {
                collection_name,
                font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
            },
        );
        Ok(())
    }

    /// Return `true` when `family` has been registered.
    pub fn has_family(&self, family: &str) -> bool {
        self.families.contains_key(family)
    }

    /// Advance width of `text` in pixels.
    pub fn text_width(&mut self, text: &str, family: &str, font_size: f64) -> TickreelResult<f64> {
        Ok(self.shape(text, family, font_size, Color::WHITE)?.width)
    }

    pub(crate) fn shape(
        &mut self,
        text: &str,
        family: &str,
        font_size: f64,
        color: Color,
    ) -> TickreelResult<ShapedText> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(TickreelError::render(format!(
                "font size must be finite and > 0, got {font_size}"
            )));
        }
        let registered = self.families.get(family).ok_or_else(|| {
            TickreelError::asset(format!("font family '{family}' is not registered"))
        })?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(
                registered.collection_name.clone(),
            )),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font_size as f32));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            color,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let width = f64::from(layout.width());
        let baseline = layout
            .lines()
            .next()
            .map(|line| f64::from(line.metrics().baseline))
            .unwrap_or(0.0);
        Ok(ShapedText {
            layout,
            font: registered.font.clone(),
            width,
            baseline,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
