//! Window-less editor glue for the tile map editor: the map canvas facade,
//! actions and key bindings, the shell interface, styling and egui painting.

pub mod editor;
pub mod logging;
pub mod paint;
pub mod style;

pub use editor::{Action, EditorSession, EditorShell, Keymap, MapCanvas};
pub use paint::{to_shapes, PaintList};
pub use style::EditorStyle;
