use std::path::{Path, PathBuf};

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::foundation::core::Canvas;
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::scene::color::Color;

/// A font file registered under a family name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Family name used by text objects (`font_family`).
    pub family: String,
    /// Font file path, relative to the assets root unless absolute.
    pub path: PathBuf,
}

/// Output stage configuration threaded into scene construction.
///
/// Replaces process-wide screen constants: every fractional position helper derives from
/// [`Stage::canvas`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stage {
    /// Output canvas size.
    pub canvas: Canvas,
    /// Directory that relative asset paths resolve against.
    pub assets_root: PathBuf,
    /// Color painted before any object on every frame.
    pub background: Color,
    /// Base seed for randomized coroutines.
    pub seed: u64,
    /// Fonts available to text objects.
    pub fonts: Vec<FontSpec>,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            assets_root: PathBuf::from("."),
            background: Color::BLACK,
            seed: 0,
            fonts: Vec::new(),
        }
    }
}

impl Stage {
    /// Stage with the given canvas and defaults elsewhere.
    pub fn with_canvas(width: u32, height: u32) -> Self {
        Self {
            canvas: Canvas { width, height },
            ..Self::default()
        }
    }

    /// Validate the canvas and font table.
    pub fn validate(&self) -> TickreelResult<()> {
        self.canvas.validate()?;
        for font in &self.fonts {
            if font.family.trim().is_empty() {
                return Err(TickreelError::validation("font family must be non-empty"));
            }
        }
        Ok(())
    }

    /// Resolve an asset path against [`Stage::assets_root`].
    pub fn resolve(&self, rel: impl AsRef<Path>) -> PathBuf {
        let rel = rel.as_ref();
        if rel.is_absolute() {
            rel.to_path_buf()
        } else {
            self.assets_root.join(rel)
        }
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> f64 {
        f64::from(self.canvas.width)
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> f64 {
        f64::from(self.canvas.height)
    }

    /// `f` of the canvas width.
    pub fn frac_x(&self, f: f64) -> f64 {
        self.width() * f
    }

    /// `f` of the canvas height.
    pub fn frac_y(&self, f: f64) -> f64 {
        self.height() * f
    }

    /// Horizontal centre.
    pub fn center_x(&self) -> f64 {
        self.frac_x(0.5)
    }

    /// Vertical centre.
    pub fn center_y(&self) -> f64 {
        self.frac_y(0.5)
    }

    /// Canvas centre point.
    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// One third of the width.
    pub fn third_x(&self) -> f64 {
        self.width() / 3.0
    }

    /// One third of the height.
    pub fn third_y(&self) -> f64 {
        self.height() / 3.0
    }

    /// Two thirds of the width.
    pub fn two_thirds_x(&self) -> f64 {
        self.width() / 3.0 * 2.0
    }

    /// Two thirds of the height.
    pub fn two_thirds_y(&self) -> f64 {
        self.height() / 3.0 * 2.0
    }

    /// One quarter of the width.
    pub fn quarter_x(&self) -> f64 {
        self.width() / 4.0
    }

    /// One quarter of the height.
    pub fn quarter_y(&self) -> f64 {
        self.height() / 4.0
    }

    /// Three quarters of the width.
    pub fn three_quarters_x(&self) -> f64 {
        self.width() / 4.0 * 3.0
    }

    /// Three quarters of the height.
    pub fn three_quarters_y(&self) -> f64 {
        self.height() / 4.0 * 3.0
    }

    /// Derive a per-coroutine seed from the stage seed.
    pub fn seed_for(&self, stream: u64) -> u64 {
        // SplitMix64 finalizer.
        let mut z = self.seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/stage.rs"]
mod tests;
