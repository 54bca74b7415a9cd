//! # DrawKit
//!
//! Interactive 2D vector-drawing core: artefacts with bounding overlays,
//! rotate and bounce animations, a bounded undo/redo history and a tool
//! dispatch state machine, driven headless through a [`Session`].
//!
//! ## Architecture
//!
//! DrawKit is organized as a workspace with multiple crates:
//!
//! 1. **drawkit-core** - Geometry, colors, input events, scene graph contract
//! 2. **drawkit-settings** - Tunables and their JSON/TOML persistence
//! 3. **drawkit-designer** - Artefacts, animations, history, tools, session
//! 4. **drawkit** - Binary running a scripted headless session

use std::fmt;
use std::path::PathBuf;

pub use drawkit_core as core;
pub use drawkit_designer as designer;
pub use drawkit_settings as settings;

pub use drawkit_core::{Bounds, Color, KeyEvent, Modifiers, Point, PointerEvent, Scene};
pub use drawkit_designer::{AnimationKind, ArtefactId, DesignerError, Session};
pub use drawkit_settings::Settings;

use drawkit_settings::SettingsPersistence;

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV: &str = "DRAWKIT_CONFIG";

/// Initialize logging with tracing subscriber
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

/// Settings file to load: `DRAWKIT_CONFIG` if set, else the per-user default.
pub fn config_path() -> anyhow::Result<PathBuf> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(drawkit_settings::default_config_path()?),
    }
}

/// Loads settings from `path`, falling back to defaults when it is absent.
pub fn load_settings(path: &std::path::Path) -> anyhow::Result<Settings> {
    let settings = SettingsPersistence::load_or_default(path)?.into_settings();
    settings.validate()?;
    Ok(settings)
}

/// Outcome of [`run_demo`].
#[derive(Debug, Clone, PartialEq)]
pub struct DemoReport {
    pub artefacts: usize,
    pub top_level: usize,
    pub frames_advanced: usize,
    pub history_len: usize,
    pub undo_description: Option<String>,
    pub group_bounds: Option<Bounds>,
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "artefacts:       {}", self.artefacts)?;
        writeln!(f, "top level:       {}", self.top_level)?;
        writeln!(f, "frames advanced: {}", self.frames_advanced)?;
        writeln!(f, "history entries: {}", self.history_len)?;
        if let Some(bounds) = &self.group_bounds {
            writeln!(
                f,
                "group bounds:    ({:.1}, {:.1}) - ({:.1}, {:.1})",
                bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y
            )?;
        }
        write!(
            f,
            "next undo:       {}",
            self.undo_description.as_deref().unwrap_or("-")
        )
    }
}

fn drag(session: &mut Session, from: Point, to: Point) -> Result<(), DesignerError> {
    session.pointer_down(&PointerEvent::down(from))?;
    session.pointer_drag(&PointerEvent::moved(from, from, to))?;
    session.pointer_up(&PointerEvent::moved(from, to, to))
}

/// Scripted session: draws a rectangle and a circle, groups them, spins
/// the group for `frames` frames, stops it and drags it aside.
pub fn run_demo(settings: Settings, frames: usize) -> Result<DemoReport, DesignerError> {
    let mut session = Session::new(Scene::new(), settings);

    session.activate_tool("rectangle")?;
    drag(&mut session, Point::new(20.0, 30.0), Point::new(120.0, 170.0))?;
    session.activate_tool("circle")?;
    drag(&mut session, Point::new(200.0, 100.0), Point::new(240.0, 100.0))?;
    session.activate_tool("select")?;

    session.invoke_action("select-all")?;
    let ctrl = Modifiers::control();
    session.handle_key(&KeyEvent::new("g", ctrl))?;
    session.invoke_action("animate-rotate")?;
    session.invoke_action("start-animation")?;

    let mut frames_advanced = 0;
    for _ in 0..frames {
        frames_advanced += session.advance(1.0 / 60.0)?;
    }
    session.invoke_action("stop-animation")?;

    // Grab the group by its rectangle and drag it to the right.
    let group = session.selected().first().copied();
    if group.is_some() {
        let grab = Point::new(70.0, 100.0);
        drag(&mut session, grab, grab + Point::new(50.0, 0.0))?;
    }
    let group_bounds = match group {
        Some(id) => Some(session.canvas().world_shadow_bounds(id)?),
        None => None,
    };

    Ok(DemoReport {
        artefacts: session.canvas().artefact_count(),
        top_level: session.canvas().top_level().len(),
        frames_advanced,
        history_len: session.history().len(),
        undo_description: session.undo_description().map(str::to_string),
        group_bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_runs_headless() {
        let report = run_demo(Settings::default(), 12).unwrap();
        assert_eq!(report.artefacts, 3);
        assert_eq!(report.top_level, 1);
        assert_eq!(report.frames_advanced, 12);
        // create, create, group, animate, move
        assert_eq!(report.history_len, 5);
        assert_eq!(report.undo_description.as_deref(), Some("Move"));
        let bounds = report.group_bounds.unwrap();
        assert!((bounds.min_x - 70.0).abs() < 1e-6);
        assert!((bounds.max_x - 290.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_settings_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
