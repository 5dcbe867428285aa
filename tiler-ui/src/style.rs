//! Immutable look-and-layout settings for the editor shell.
//!
//! The defaults reproduce the dark theme the editor ships with. Shells that
//! let users tweak it can persist the struct with serde.

use egui::Color32;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorStyle {
    pub window_width: f32,
    pub window_height: f32,
    pub sidebar_width: f32,
    pub tile_preview_size: f32,
    pub tile_container_size: f32,
    /// Wheel scroll step of the tiles panel.
    pub scroll_increment: f32,
    /// Pan distance of one scroll shortcut.
    pub scroll_amount: f32,
    pub background: Color32,
    pub grid_line: Color32,
    pub panel: Color32,
    pub button_background: Color32,
    pub button_text: Color32,
    pub selection: Color32,
    pub label: Color32,
    pub grid_line_width: f32,
}

impl Default for EditorStyle {
    fn default() -> Self {
        Self {
            window_width: 1200.0,
            window_height: 800.0,
            sidebar_width: 200.0,
            tile_preview_size: 64.0,
            tile_container_size: 74.0,
            scroll_increment: 16.0,
            scroll_amount: 32.0,
            background: Color32::from_rgb(18, 18, 18),
            grid_line: Color32::from_rgb(70, 70, 70),
            panel: Color32::from_rgb(30, 30, 30),
            button_background: Color32::from_rgb(45, 45, 45),
            button_text: Color32::from_rgb(200, 200, 200),
            selection: Color32::from_rgb(70, 70, 100),
            label: Color32::WHITE,
            grid_line_width: 1.0,
        }
    }
}

impl EditorStyle {
    /// Canvas area left once the sidebar is taken out of the window.
    pub fn canvas_size(&self) -> (f32, f32) {
        (
            (self.window_width - self.sidebar_width).max(0.0),
            self.window_height,
        )
    }

    /// Background of a tile slot in the palette.
    pub fn tile_slot_fill(&self, selected: bool) -> Color32 {
        if selected {
            self.selection
        } else {
            self.button_background
        }
    }
}
