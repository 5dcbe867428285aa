// Named editor actions and the menu callback interface.
// The application shell implements MenuCallbacks; menus and the keymap only ever
// talk in terms of Action.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    New,
    Open,
    ImportProject,
    ImportMatrix,
    ExportProject,
    GenerateMatrix,
    ChangeGrid,
    ChangeCellSize,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Undo,
    ScrollLeft,
    ScrollRight,
    ScrollUp,
    ScrollDown,
    ToggleTilesPanel,
    SelectAll,
    ClearSelection,
    IncreaseTileArea,
    DecreaseTileArea,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::New => "New",
            Action::Open => "Open...",
            Action::ImportProject => "Import Project...",
            Action::ImportMatrix => "Import...",
            Action::ExportProject => "Project...",
            Action::GenerateMatrix => "Map Matrix...",
            Action::ChangeGrid => "Change Grid",
            Action::ChangeCellSize => "Change Cell",
            Action::ZoomIn => "Zoom in",
            Action::ZoomOut => "Zoom out",
            Action::ResetZoom => "Reset zoom",
            Action::Undo => "Undo",
            Action::ScrollLeft => "Scroll left",
            Action::ScrollRight => "Scroll right",
            Action::ScrollUp => "Scroll up",
            Action::ScrollDown => "Scroll down",
            Action::ToggleTilesPanel => "Toggle tiles panel",
            Action::SelectAll => "Select all tiles",
            Action::ClearSelection => "Clear selection",
            Action::IncreaseTileArea => "Increase brush area",
            Action::DecreaseTileArea => "Decrease brush area",
        }
    }

    // Actions reachable from the menu bar go through MenuCallbacks
    pub fn is_menu_action(&self) -> bool {
        MENU_LAYOUT
            .iter()
            .any(|menu| menu.items.iter().flatten().any(|a| a == self))
    }
}

/// A top-level menu. `None` items are separators.
#[derive(Debug, Clone, Copy)]
pub struct MenuSpec {
    pub title: &'static str,
    pub items: &'static [Option<Action>],
}

pub const MENU_LAYOUT: &[MenuSpec] = &[
    MenuSpec {
        title: "File",
        items: &[
            Some(Action::New),
            Some(Action::Open),
            None,
            Some(Action::ImportProject),
            Some(Action::ImportMatrix),
        ],
    },
    MenuSpec {
        title: "File/Export",
        items: &[Some(Action::ExportProject), Some(Action::GenerateMatrix)],
    },
    MenuSpec {
        title: "Grid",
        items: &[
            Some(Action::ChangeGrid),
            Some(Action::ChangeCellSize),
            None,
            Some(Action::ZoomIn),
            Some(Action::ZoomOut),
            Some(Action::ResetZoom),
        ],
    },
];

/// What the menu bar needs from the application shell.
pub trait MenuCallbacks {
    fn on_new(&mut self);
    fn on_open(&mut self);
    fn on_import(&mut self);
    fn on_export(&mut self);
    fn on_generate_map_matrix(&mut self);
    fn on_change_grid(&mut self);
    fn on_change_cell(&mut self);
    fn on_zoom_in(&mut self);
    fn on_zoom_out(&mut self);
    fn on_reset_zoom(&mut self);
    fn on_import_project(&mut self);
}

/// Route a menu action to its callback. Returns false for non-menu actions.
pub fn dispatch_menu(action: Action, callbacks: &mut impl MenuCallbacks) -> bool {
    match action {
        Action::New => callbacks.on_new(),
        Action::Open => callbacks.on_open(),
        Action::ImportMatrix => callbacks.on_import(),
        Action::ExportProject => callbacks.on_export(),
        Action::GenerateMatrix => callbacks.on_generate_map_matrix(),
        Action::ChangeGrid => callbacks.on_change_grid(),
        Action::ChangeCellSize => callbacks.on_change_cell(),
        Action::ZoomIn => callbacks.on_zoom_in(),
        Action::ZoomOut => callbacks.on_zoom_out(),
        Action::ResetZoom => callbacks.on_reset_zoom(),
        Action::ImportProject => callbacks.on_import_project(),
        _ => return false,
    }
    true
}
