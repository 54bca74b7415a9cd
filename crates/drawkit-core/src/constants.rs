//! Shared defaults for the drawing surface.

/// Gap between an artefact's shadow bounds and its selection border.
pub const BORDER_MARGIN: f64 = 12.0;

/// Edge length of a square resize handle.
pub const HANDLE_SIZE: f64 = 8.0;

/// Width or height below which a resize freezes that axis.
pub const MIN_SIZE: f64 = 3.0;

/// Pointer slop used when hit-testing fills and strokes.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Number of undoable actions kept by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Opacity of the translucent footprint drawn under a selected artefact.
pub const FOOTPRINT_OPACITY: f32 = 0.15;

/// Default fill for new shapes when no palette is configured.
pub const DEFAULT_FILL_HEX: &str = "#4f46e5";

/// Default theme accent used for selection decorations.
pub const DEFAULT_ACCENT_HEX: &str = "#0ea5e9";

/// Dash pattern (on, off) for dashed strokes.
pub const DASH_PATTERN: [f64; 2] = [4.0, 4.0];

/// Grid that rectangle coordinates snap to after an animation is reversed.
pub const ROUNDING_PRECISION: f64 = 1e-4;

/// Flattening tolerance handed to lyon when hit-testing curves.
pub const FLATTENING_TOLERANCE: f32 = 0.05;
