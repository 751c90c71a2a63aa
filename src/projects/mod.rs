//! Built-in demo projects selectable from the command line.

use std::path::PathBuf;

use crate::config::ProjectConfig;
use crate::foundation::error::{TickreelError, TickreelResult};
use crate::scene::script::Scene;
use crate::scene::stage::Stage;

pub mod shapes;
pub mod videotest;

/// A named list of scenes plus the settings it is meant to be rendered with.
#[derive(Clone, Copy)]
pub struct Project {
    /// Name used on the command line.
    pub name: &'static str,
    /// One-line summary for `tickreel list`.
    pub description: &'static str,
    scenes: fn(&Stage) -> TickreelResult<Vec<Scene>>,
    configure: fn(&mut ProjectConfig),
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project").field("name", &self.name).finish()
    }
}

impl Project {
    /// Scenes in play order.
    pub fn scenes(&self, stage: &Stage) -> TickreelResult<Vec<Scene>> {
        (self.scenes)(stage)
    }

    /// Settings used when no config file is given.
    pub fn default_config(&self) -> ProjectConfig {
        let mut cfg = ProjectConfig::default();
        cfg.stage.assets_root = PathBuf::from("projects");
        (self.configure)(&mut cfg);
        cfg
    }
}

const PROJECTS: &[Project] = &[
    Project {
        name: "test",
        description: "text and image tweens, timed waits, spawned tweens, soundtrack",
        scenes: test::scenes,
        configure: test::configure,
    },
    Project {
        name: "videotest",
        description: "tweened video-frame object with a spawned playback tween",
        scenes: videotest::scenes,
        configure: videotest::configure,
    },
    Project {
        name: "shapes",
        description: "boxes only: pin_to, random_move, spawned tweens (no assets needed)",
        scenes: shapes::scenes,
        configure: shapes::configure,
    },
];

/// Every built-in project.
pub fn all() -> &'static [Project] {
    PROJECTS
}

/// Look up a project by name.
pub fn find(name: &str) -> TickreelResult<&'static Project> {
    PROJECTS.iter().find(|p| p.name == name).ok_or_else(|| {
        let known: Vec<&str> = PROJECTS.iter().map(|p| p.name).collect();
        TickreelError::validation(format!(
            "unknown project '{name}' (known: {})",
            known.join(", ")
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/projects/mod.rs"]
mod tests;
