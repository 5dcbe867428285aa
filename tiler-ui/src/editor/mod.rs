// Editor module for the tile map UI.

pub mod actions;
pub mod canvas;
pub mod keymap;
pub mod session;

pub use actions::{dispatch_menu, Action, MenuCallbacks, MenuSpec, MENU_LAYOUT};
pub use canvas::MapCanvas;
pub use keymap::{InputChord, Key, Keymap};
pub use session::{EditorSession, EditorShell, FilePicker, Notice, PickRequest, PickResult};
