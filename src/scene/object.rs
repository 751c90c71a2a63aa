//! Render Object Model: plain records describing one drawable thing per frame.
//!
//! Objects are created once per scene and mutated in place by coroutines. They are shared
//! through [`ObjectRef`] (`Rc<RefCell<_>>`): execution is single-threaded, and every
//! mutation is visible to the next reader immediately.

use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;

use crate::assets::decode::{PreparedImage, load_image};
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::scene::color::Color;
use crate::scene::stage::Stage;

/// Shared, mutable handle to a render object.
pub type ObjectRef = Rc<RefCell<RenderObject>>;

/// Ordered object list for one tick. Later entries paint on top.
pub type Frame = Vec<ObjectRef>;

/// Numeric object property addressable by coroutines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prop {
    /// Horizontal position.
    X,
    /// Vertical position.
    Y,
    /// Rotation in radians.
    Rotation,
    /// Opacity in `[0, 1]`.
    Opacity,
    /// Width (image, video, box). Negative mirrors horizontally.
    W,
    /// Height (image, video, box). Negative mirrors vertically.
    H,
    /// Font size in pixels (text).
    FontSize,
    /// Corner radius (box).
    CornerRadius,
    /// Playback position (video).
    CurrentTime,
    /// Source frame rate (video).
    Framerate,
}

impl Prop {
    /// Canonical property name.
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Rotation => "rotation",
            Self::Opacity => "opacity",
            Self::W => "w",
            Self::H => "h",
            Self::FontSize => "font_size",
            Self::CornerRadius => "corner_radius",
            Self::CurrentTime => "current_time",
            Self::Framerate => "framerate",
        }
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Prop {
    type Err = TickreelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "x" => Self::X,
            "y" => Self::Y,
            "rotation" => Self::Rotation,
            "opacity" => Self::Opacity,
            "w" | "width" => Self::W,
            "h" | "height" => Self::H,
            "font_size" | "fontSize" => Self::FontSize,
            "r" | "corner_radius" | "cornerRadius" => Self::CornerRadius,
            "current_time" | "currentTime" => Self::CurrentTime,
            "framerate" => Self::Framerate,
            other => {
                return Err(TickreelError::animation(format!(
                    "unknown property \"{other}\""
                )));
            }
        })
    }
}

/// Object variant discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectType {
    /// Text run.
    Text,
    /// Decoded still image.
    Image,
    /// Frame of a pre-rendered image sequence.
    Video,
    /// Solid rounded rectangle.
    Box,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Box => "box",
        })
    }
}

/// Styling for text objects.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f64,
    /// Registered font family name.
    pub font_family: String,
    /// Fill color.
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 48.0,
            font_family: "Arial".to_owned(),
            color: Color::WHITE,
        }
    }
}

/// Text variant fields.
#[derive(Clone, Debug, PartialEq)]
pub struct TextObject {
    /// Displayed string.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Registered font family name.
    pub font_family: String,
    /// Fill color.
    pub color: Color,
}

/// Image variant fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageObject {
    /// Source path as given by the scene.
    pub source_path: PathBuf,
    /// Drawn width.
    pub w: f64,
    /// Drawn height.
    pub h: f64,
    /// Pixels, decoded eagerly at construction.
    pub decoded: Arc<PreparedImage>,
}

/// Video-frame variant fields.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoObject {
    /// Folder holding `frameNNNNN.<ext>` images.
    pub source_folder: PathBuf,
    /// Drawn width.
    pub w: f64,
    /// Drawn height.
    pub h: f64,
    /// Source frame rate.
    pub framerate: f64,
    /// Playback position; the shown frame is `floor(current_time / 60 * framerate) + 1`.
    pub current_time: f64,
    /// Extension of the sequence files.
    pub extension: String,
}

/// Box variant fields.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxObject {
    /// Fill color.
    pub color: Color,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
    /// Corner radius, clamped to half the width/height when drawn.
    pub corner_radius: f64,
}

/// Variant-specific object data.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectKind {
    /// Text run.
    Text(TextObject),
    /// Decoded image.
    Image(ImageObject),
    /// Image-sequence frame.
    Video(VideoObject),
    /// Solid rounded rectangle.
    Box(BoxObject),
}

/// One drawable thing. Shared fields live here; variant fields in [`ObjectKind`].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderObject {
    /// Horizontal position (text anchor, or left edge).
    pub x: f64,
    /// Vertical position (text baseline, or top edge).
    pub y: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Variant data.
    pub kind: ObjectKind,
}

impl RenderObject {
    fn with_kind(x: f64, y: f64, kind: ObjectKind) -> Self {
        Self {
            x,
            y,
            rotation: 0.0,
            opacity: 1.0,
            kind,
        }
    }

    /// Text in the default style (48 px Arial, white), centred on `x` with its baseline at `y`.
    pub fn text(content: impl Into<String>, x: f64, y: f64) -> Self {
        Self::text_styled(content, x, y, TextStyle::default())
    }

    /// Text with an explicit style.
    pub fn text_styled(content: impl Into<String>, x: f64, y: f64, style: TextStyle) -> Self {
        Self::with_kind(
            x,
            y,
            ObjectKind::Text(TextObject {
                content: content.into(),
                font_size: style.font_size,
                font_family: style.font_family,
                color: style.color,
            }),
        )
    }

    /// Image loaded from `path` (relative to the stage assets root).
    ///
    /// Decoding happens here, synchronously: the call returns only once pixels are available.
    pub fn image(
        stage: &Stage,
        path: impl Into<PathBuf>,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    ) -> TickreelResult<Self> {
        let source_path = path.into();
        let decoded = load_image(&stage.resolve(&source_path))?;
        Ok(Self::with_kind(
            x,
            y,
            ObjectKind::Image(ImageObject {
                source_path,
                w,
                h,
                decoded,
            }),
        ))
    }

    /// Video-frame object backed by `folder/frameNNNNN.jpeg` (60 fps, starting at time 0).
    pub fn video(
        stage: &Stage,
        folder: impl Into<PathBuf>,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    ) -> TickreelResult<Self> {
        Self::video_sequence(stage, folder, "jpeg", x, y, w, h)
    }

    /// Video-frame object with an explicit sequence file extension.
    pub fn video_sequence(
        stage: &Stage,
        folder: impl Into<PathBuf>,
        extension: impl Into<String>,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    ) -> TickreelResult<Self> {
        let source_folder = stage.resolve(folder.into());
        if !source_folder.is_dir() {
            return Err(TickreelError::asset(format!(
                "video frame folder '{}' does not exist",
                source_folder.display()
            )));
        }
        Ok(Self::with_kind(
            x,
            y,
            ObjectKind::Video(VideoObject {
                source_folder,
                w,
                h,
                framerate: 60.0,
                current_time: 0.0,
                extension: extension.into(),
            }),
        ))
    }

    /// Solid box with square corners.
    pub fn rect(color: Color, x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::rounded_rect(color, x, y, w, h, 0.0)
    }

    /// Solid box with rounded corners.
    pub fn rounded_rect(color: Color, x: f64, y: f64, w: f64, h: f64, radius: f64) -> Self {
        Self::with_kind(
            x,
            y,
            ObjectKind::Box(BoxObject {
                color,
                w,
                h,
                corner_radius: radius,
            }),
        )
    }

    /// Set the initial rotation (radians).
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the initial opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Wrap into a shared handle.
    pub fn share(self) -> ObjectRef {
        Rc::new(RefCell::new(self))
    }

    /// Variant discriminant.
    pub fn object_type(&self) -> ObjectType {
        match self.kind {
            ObjectKind::Text(_) => ObjectType::Text,
            ObjectKind::Image(_) => ObjectType::Image,
            ObjectKind::Video(_) => ObjectType::Video,
            ObjectKind::Box(_) => ObjectType::Box,
        }
    }

    /// Drawn `(w, h)` for sized variants; `None` for text.
    pub fn size(&self) -> Option<(f64, f64)> {
        match &self.kind {
            ObjectKind::Text(_) => None,
            ObjectKind::Image(i) => Some((i.w, i.h)),
            ObjectKind::Video(v) => Some((v.w, v.h)),
            ObjectKind::Box(b) => Some((b.w, b.h)),
        }
    }

    /// Read a numeric property. Fails when this variant has no such property.
    pub fn get(&self, prop: Prop) -> TickreelResult<f64> {
        match self.slot(prop) {
            Some(v) => Ok(v),
            None => Err(self.missing(prop)),
        }
    }

    /// Write a numeric property. Fails when this variant has no such property or `value` is
    /// not finite.
    pub fn set(&mut self, prop: Prop, value: f64) -> TickreelResult<()> {
        if !value.is_finite() {
            return Err(TickreelError::animation(format!(
                "refusing to set {} of {} object to non-finite value {value}",
                prop,
                self.object_type()
            )));
        }
        match self.slot_mut(prop) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(self.missing(prop)),
        }
    }

    /// Return `true` when this variant carries `prop`.
    pub fn has(&self, prop: Prop) -> bool {
        self.slot(prop).is_some()
    }

    fn missing(&self, prop: Prop) -> TickreelError {
        TickreelError::animation(format!(
            "{} object has no property \"{}\"",
            self.object_type(),
            prop
        ))
    }

    fn slot(&self, prop: Prop) -> Option<f64> {
        let v = match (prop, &self.kind) {
            (Prop::X, _) => self.x,
            (Prop::Y, _) => self.y,
            (Prop::Rotation, _) => self.rotation,
            (Prop::Opacity, _) => self.opacity,
            (Prop::FontSize, ObjectKind::Text(t)) => t.font_size,
            (Prop::W, ObjectKind::Image(i)) => i.w,
            (Prop::H, ObjectKind::Image(i)) => i.h,
            (Prop::W, ObjectKind::Video(v)) => v.w,
            (Prop::H, ObjectKind::Video(v)) => v.h,
            (Prop::Framerate, ObjectKind::Video(v)) => v.framerate,
            (Prop::CurrentTime, ObjectKind::Video(v)) => v.current_time,
            (Prop::W, ObjectKind::Box(b)) => b.w,
            (Prop::H, ObjectKind::Box(b)) => b.h,
            (Prop::CornerRadius, ObjectKind::Box(b)) => b.corner_radius,
            _ => return None,
        };
        Some(v)
    }

    fn slot_mut(&mut self, prop: Prop) -> Option<&mut f64> {
        let slot = match (prop, &mut self.kind) {
            (Prop::X, _) => &mut self.x,
            (Prop::Y, _) => &mut self.y,
            (Prop::Rotation, _) => &mut self.rotation,
            (Prop::Opacity, _) => &mut self.opacity,
            (Prop::FontSize, ObjectKind::Text(t)) => &mut t.font_size,
            (Prop::W, ObjectKind::Image(i)) => &mut i.w,
            (Prop::H, ObjectKind::Image(i)) => &mut i.h,
            (Prop::W, ObjectKind::Video(v)) => &mut v.w,
            (Prop::H, ObjectKind::Video(v)) => &mut v.h,
            (Prop::Framerate, ObjectKind::Video(v)) => &mut v.framerate,
            (Prop::CurrentTime, ObjectKind::Video(v)) => &mut v.current_time,
            (Prop::W, ObjectKind::Box(b)) => &mut b.w,
            (Prop::H, ObjectKind::Box(b)) => &mut b.h,
            (Prop::CornerRadius, ObjectKind::Box(b)) => &mut b.corner_radius,
            _ => return None,
        };
        Some(slot)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/object.rs"]
mod tests;
