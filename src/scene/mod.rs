//! What gets drawn: objects, colors, stage geometry and scene scripts.

/// CSS-style colors.
pub mod color;
/// Render objects and their animatable properties.
pub mod object;
/// Scenes and the script builder.
pub mod script;
/// Stage configuration.
pub mod stage;
