// This is the editor session: it owns the map canvas and drives it from actions
// Dialogs, file pickers and notifications belong to the host shell, reached through
// the EditorShell trait so the session stays window-less

use std::path::PathBuf;

use tiler_codec::{MATRIX_FILE_EXT, PROJECT_FILE_EXT};
use tracing::{debug, error, info, warn};

use super::actions::{dispatch_menu, Action, MenuCallbacks};
use super::canvas::MapCanvas;
use crate::style::EditorStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickRequest {
    /// One or more tile images to add to the palette.
    TileImages,
    TilesFolder,
    OpenMatrix,
    SaveMatrix,
    OpenProject,
    SaveProject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResult {
    Picked(Vec<PathBuf>),
    Cancelled,
}

impl PickResult {
    pub fn first(self) -> Option<PathBuf> {
        match self {
            PickResult::Picked(paths) => paths.into_iter().next(),
            PickResult::Cancelled => None,
        }
    }
}

pub trait FilePicker {
    fn pick(&mut self, request: PickRequest) -> PickResult;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Everything the session needs from the window it lives in.
pub trait EditorShell: FilePicker {
    /// Ask for a new grid size as raw (cols, rows) text. `None` on cancel.
    fn prompt_grid_size(&mut self, cols: u32, rows: u32) -> Option<(String, String)>;
    fn prompt_cell_size(&mut self, current: u32) -> Option<String>;
    fn notify(&mut self, notice: Notice);
    fn toggle_tiles_panel(&mut self);
}

pub struct EditorSession<S: EditorShell> {
    canvas: MapCanvas,
    shell: S,
    style: EditorStyle,
}

impl<S: EditorShell> EditorSession<S> {
    pub fn new(shell: S) -> Self {
        Self::with_style(shell, EditorStyle::default())
    }

    pub fn with_style(shell: S, style: EditorStyle) -> Self {
        let mut canvas = MapCanvas::new();
        let (width, height) = style.canvas_size();
        canvas.set_viewport(width, height);
        Self {
            canvas,
            shell,
            style,
        }
    }

    /// Run an action from the keymap or the menu bar.
    pub fn dispatch(&mut self, action: Action) {
        debug!("Dispatching {:?}", action);
        if dispatch_menu(action, self) {
            return;
        }
        let step = self.style.scroll_amount;
        match action {
            Action::Undo => {
                self.canvas.undo();
            }
            Action::ScrollLeft => self.canvas.pan(step, 0.0),
            Action::ScrollRight => self.canvas.pan(-step, 0.0),
            Action::ScrollUp => self.canvas.pan(0.0, step),
            Action::ScrollDown => self.canvas.pan(0.0, -step),
            Action::ToggleTilesPanel => self.shell.toggle_tiles_panel(),
            Action::SelectAll => self.canvas.select_all(),
            Action::ClearSelection => self.canvas.clear_selection(),
            Action::IncreaseTileArea => self.canvas.increase_brush_area(),
            Action::DecreaseTileArea => self.canvas.decrease_brush_area(),
            _ => {}
        }
    }

    pub fn canvas(&self) -> &MapCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut MapCanvas {
        &mut self.canvas
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn style(&self) -> &EditorStyle {
        &self.style
    }

    fn report(&mut self, what: &str, result: anyhow::Result<()>) {
        if let Err(err) = result {
            error!("{} failed: {:#}", what, err);
            self.shell.notify(Notice::Error(format!("{what} failed: {err:#}")));
        }
    }
}

fn with_extension(path: PathBuf, ext: &str) -> PathBuf {
    let suffix = format!(".{ext}");
    if path.to_string_lossy().to_lowercase().ends_with(&suffix) {
        return path;
    }
    let mut name = path.into_os_string();
    name.push(&suffix);
    PathBuf::from(name)
}

impl<S: EditorShell> MenuCallbacks for EditorSession<S> {
    fn on_new(&mut self) {
        self.canvas.new_map();
    }

    fn on_open(&mut self) {
        if let PickResult::Picked(paths) = self.shell.pick(PickRequest::TileImages) {
            let report = self.canvas.load_tiles(&paths);
            for failure in &report.failures {
                warn!("Skipped {}: {}", failure.path.display(), failure.reason);
            }
            info!("Loaded {} tiles", report.loaded.len());
        }
    }

    fn on_import(&mut self) {
        let Some(path) = self.shell.pick(PickRequest::OpenMatrix).first() else {
            return;
        };
        let result = self.canvas.import_matrix_file(&path).map(|summary| {
            if summary.unresolved > 0 {
                warn!("{} matrix cells name unknown tiles", summary.unresolved);
            }
        });
        self.report("Import map matrix", result);
    }

    fn on_export(&mut self) {
        let Some(path) = self.shell.pick(PickRequest::SaveProject).first() else {
            return;
        };
        let path = with_extension(path, PROJECT_FILE_EXT);

        if self.canvas.tiles_folder().is_none() {
            let folder = self.shell.pick(PickRequest::TilesFolder).first();
            self.canvas.set_tiles_folder(folder);
        }
        if self.canvas.matrix_path().is_none() {
            let matrix = self.shell.pick(PickRequest::OpenMatrix).first();
            self.canvas.set_matrix_path(matrix);
        }

        let result = self.canvas.export_project(&path).map(|written| {
            self.shell.notify(Notice::Info(format!(
                "Project exported to {}",
                written.display()
            )));
        });
        self.report("Export project", result);
    }

    fn on_generate_map_matrix(&mut self) {
        let Some(path) = self.shell.pick(PickRequest::SaveMatrix).first() else {
            return;
        };
        let path = with_extension(path, MATRIX_FILE_EXT);
        let result = self.canvas.save_matrix(&path);
        self.report("Save map matrix", result);
    }

    fn on_change_grid(&mut self) {
        let Some((cols, rows)) = self
            .shell
            .prompt_grid_size(self.canvas.cols(), self.canvas.rows())
        else {
            return;
        };
        let parsed = cols.trim().parse::<i64>().ok().zip(rows.trim().parse::<i64>().ok());
        let applied = parsed.map(|(cols, rows)| self.canvas.resize(rows, cols));
        if !matches!(applied, Some(Ok(()))) {
            warn!("Rejected grid size input {:?}x{:?}", cols, rows);
            self.shell
                .notify(Notice::Error("Please enter valid numbers".to_string()));
        }
    }

    fn on_change_cell(&mut self) {
        let Some(size) = self.shell.prompt_cell_size(self.canvas.cell_size()) else {
            return;
        };
        let applied = size
            .trim()
            .parse::<i64>()
            .ok()
            .map(|s| self.canvas.resize_cell_size(s));
        if !matches!(applied, Some(Ok(()))) {
            warn!("Rejected cell size input {:?}", size);
            self.shell.notify(Notice::Error(
                "Please enter a valid positive number".to_string(),
            ));
        }
    }

    fn on_zoom_in(&mut self) {
        self.canvas.zoom_in();
    }

    fn on_zoom_out(&mut self) {
        self.canvas.zoom_out();
    }

    fn on_reset_zoom(&mut self) {
        self.canvas.reset_zoom();
    }

    fn on_import_project(&mut self) {
        let Some(path) = self.shell.pick(PickRequest::OpenProject).first() else {
            return;
        };
        let result = self.canvas.import_project(&path).map(|outcome| {
            info!(
                "Project loaded with {} tiles, matrix: {}",
                outcome.tiles.loaded.len(),
                outcome.matrix.is_some()
            );
        });
        self.report("Import project", result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tiler_core::Point;

    #[derive(Default)]
    struct MockShell {
        picks: VecDeque<PickResult>,
        requests: Vec<PickRequest>,
        grid_input: Option<(String, String)>,
        cell_input: Option<String>,
        notices: Vec<Notice>,
        panel_toggles: usize,
    }

    impl FilePicker for MockShell {
        fn pick(&mut self, request: PickRequest) -> PickResult {
            self.requests.push(request);
            self.picks.pop_front().unwrap_or(PickResult::Cancelled)
        }
    }

    impl EditorShell for MockShell {
        fn prompt_grid_size(&mut self, _cols: u32, _rows: u32) -> Option<(String, String)> {
            self.grid_input.take()
        }
        fn prompt_cell_size(&mut self, _current: u32) -> Option<String> {
            self.cell_input.take()
        }
        fn notify(&mut self, notice: Notice) {
            self.notices.push(notice);
        }
        fn toggle_tiles_panel(&mut self) {
            self.panel_toggles += 1;
        }
    }

    #[test]
    fn test_scroll_actions_pan_by_style_amount() {
        let mut session = EditorSession::new(MockShell::default());
        session.dispatch(Action::ScrollLeft);
        session.dispatch(Action::ScrollUp);
        session.dispatch(Action::ScrollUp);
        assert_eq!(session.canvas().grid().pan(), Point::new(32.0, 64.0));
        session.dispatch(Action::ScrollRight);
        session.dispatch(Action::ScrollDown);
        assert_eq!(session.canvas().grid().pan(), Point::new(0.0, 32.0));
    }

    #[test]
    fn test_change_grid_parses_input() {
        let mut shell = MockShell::default();
        shell.grid_input = Some(("20".into(), " 10 ".into()));
        let mut session = EditorSession::new(shell);
        session.dispatch(Action::ChangeGrid);
        assert_eq!((session.canvas().cols(), session.canvas().rows()), (20, 10));
        assert!(session.shell().notices.is_empty());
    }

    #[test]
    fn test_change_grid_rejects_garbage() {
        let mut shell = MockShell::default();
        shell.grid_input = Some(("abc".into(), "10".into()));
        let mut session = EditorSession::new(shell);
        session.dispatch(Action::ChangeGrid);
        assert_eq!((session.canvas().cols(), session.canvas().rows()), (16, 16));
        assert_eq!(
            session.shell().notices,
            vec![Notice::Error("Please enter valid numbers".into())]
        );
    }

    #[test]
    fn test_change_cell_rejects_zero() {
        let mut shell = MockShell::default();
        shell.cell_input = Some("0".into());
        let mut session = EditorSession::new(shell);
        session.dispatch(Action::ChangeCellSize);
        assert_eq!(session.canvas().cell_size(), 16);
        assert_eq!(session.shell().notices.len(), 1);
    }

    #[test]
    fn test_cancelled_pick_does_nothing() {
        let mut session = EditorSession::new(MockShell::default());
        session.dispatch(Action::ImportMatrix);
        session.dispatch(Action::GenerateMatrix);
        assert_eq!(
            session.shell().requests,
            vec![PickRequest::OpenMatrix, PickRequest::SaveMatrix]
        );
        assert!(session.shell().notices.is_empty());
    }

    #[test]
    fn test_generate_matrix_adds_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = MockShell::default();
        shell
            .picks
            .push_back(PickResult::Picked(vec![dir.path().join("level")]));
        let mut session = EditorSession::new(shell);
        session.dispatch(Action::GenerateMatrix);

        let written = dir.path().join("level.txt");
        assert!(written.exists());
        assert_eq!(session.canvas().matrix_path(), Some(written.as_path()));
    }

    #[test]
    fn test_export_asks_for_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = MockShell::default();
        shell
            .picks
            .push_back(PickResult::Picked(vec![dir.path().join("demo")]));
        let mut session = EditorSession::new(shell);
        session.dispatch(Action::ExportProject);

        assert_eq!(
            session.shell().requests,
            vec![
                PickRequest::SaveProject,
                PickRequest::TilesFolder,
                PickRequest::OpenMatrix
            ]
        );
        assert!(dir.path().join("demo.tiling.json").exists());
        assert!(matches!(session.shell().notices[0], Notice::Info(_)));
    }

    #[test]
    fn test_import_with_unknown_tiles_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let matrix = dir.path().join("map.txt");
        std::fs::write(&matrix, "[f:ghost.png, s:true], .\n., .\n").unwrap();
        let mut shell = MockShell::default();
        shell.picks.push_back(PickResult::Picked(vec![matrix.clone()]));
        let mut session = EditorSession::new(shell);
        session.dispatch(Action::ImportMatrix);

        assert!(session.shell().notices.is_empty());
        assert_eq!((session.canvas().rows(), session.canvas().cols()), (2, 2));
        assert!(session.canvas().entries().is_empty());
        assert_eq!(session.canvas().matrix_path(), Some(matrix.as_path()));
    }

    #[test]
    fn test_import_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.txt");
        std::fs::write(&bad, "").unwrap();
        let mut shell = MockShell::default();
        shell.picks.push_back(PickResult::Picked(vec![bad]));
        let mut session = EditorSession::new(shell);
        session.dispatch(Action::ImportMatrix);
        assert!(matches!(session.shell().notices[0], Notice::Error(_)));
    }

    #[test]
    fn test_panel_toggle_goes_to_shell() {
        let mut session = EditorSession::new(MockShell::default());
        session.dispatch(Action::ToggleTilesPanel);
        assert_eq!(session.shell().panel_toggles, 1);
    }
}
