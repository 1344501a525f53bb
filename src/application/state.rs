//! Application state management for the terminal grid editor.
//!
//! This module contains the main application state and mode management
//! for the terminal user interface.

use crate::domain::{CellAddress, FormulaEvaluator, Grid, content_for_copy, is_formula};

/// Represents the current mode of the application.
///
/// The mode determines how user input is interpreted and what UI elements
/// are displayed.
#[derive(Debug)]
pub enum AppMode {
    /// Normal navigation mode - arrow keys move selection, shortcuts available
    Normal,
    /// Cell editing mode - user is typing into a cell
    Editing,
    /// Help screen is displayed
    Help,
    /// Save dialog is open
    SaveAs,
    /// Load dialog is open
    LoadFile,
    /// CSV export dialog is open
    ExportCsv,
    /// CSV import dialog is open
    ImportCsv,
}

/// Main application state containing the grid and UI state.
///
/// # Examples
///
/// ```
/// use gridcalc::application::App;
///
/// let app = App::default();
/// assert_eq!(app.selected_row, 0);
/// assert_eq!(app.selected_col, 0);
/// ```
#[derive(Debug)]
pub struct App {
    /// The grid data structure
    pub grid: Grid,
    /// Currently selected row (zero-based)
    pub selected_row: usize,
    /// Currently selected column (zero-based)
    pub selected_col: usize,
    /// Top-left row visible in the viewport
    pub scroll_row: usize,
    /// Left-most column visible in the viewport
    pub scroll_col: usize,
    /// Current application mode
    pub mode: AppMode,
    /// Current input buffer (for editing mode)
    pub input: String,
    /// Cursor position within the input buffer
    pub cursor_position: usize,
    /// Current filename (if file has been saved/loaded)
    pub filename: Option<String>,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Input buffer for filename entry
    pub filename_input: String,
    /// Source address of the last yank, consumed by paste
    pub copy_source: Option<CellAddress>,
    /// Viewport height in rows (for scrolling calculations)
    pub viewport_rows: usize,
    /// Viewport width in columns (for scrolling calculations)
    pub viewport_cols: usize,
}

impl Default for App {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            selected_row: 0,
            selected_col: 0,
            scroll_row: 0,
            scroll_col: 0,
            mode: AppMode::Normal,
            input: String::new(),
            cursor_position: 0,
            filename: None,
            help_scroll: 0,
            status_message: None,
            filename_input: String::new(),
            copy_source: None,
            viewport_rows: 20,
            viewport_cols: 8,
        }
    }
}

impl App {
    /// Address of the currently selected cell.
    pub fn selected_address(&self) -> CellAddress {
        CellAddress::new(self.selected_row, self.selected_col)
    }

    /// Switches to editing mode for the currently selected cell.
    ///
    /// Loads the cell's stored content into the input buffer and positions
    /// the cursor at the end.
    pub fn start_editing(&mut self) {
        self.mode = AppMode::Editing;
        self.input = self.grid.get(self.selected_row, self.selected_col).to_string();
        self.cursor_position = self.input.len();
    }

    /// Completes editing and updates the cell with the input content.
    ///
    /// Input starting with '=' is evaluated against the current grid and
    /// only the result is stored; the formula text itself is not retained.
    /// Literal input is stored verbatim. Returns to normal mode and moves
    /// the selection down one row.
    pub fn finish_editing(&mut self) {
        let content = if is_formula(&self.input) {
            let evaluator = FormulaEvaluator::new(&self.grid);
            evaluator.evaluate_formula(&self.input)
        } else {
            self.input.clone()
        };

        self.grid.set(self.selected_row, self.selected_col, content);

        if self.selected_row < self.grid.rows() - 1 {
            self.selected_row += 1;
        }

        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Cancels editing and returns to normal mode without saving changes.
    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Clears the selected cell's content.
    pub fn clear_selected_cell(&mut self) {
        self.grid.clear(self.selected_row, self.selected_col);
    }

    /// Marks the selected cell as the copy source and returns its stored
    /// content, so the caller can also push it to the system clipboard.
    pub fn yank_cell(&mut self) -> String {
        let source = self.selected_address();
        self.copy_source = Some(source);
        self.status_message = Some(format!("Yanked {}", source));
        self.grid.value_at(source).to_string()
    }

    /// Pastes the yanked cell into the selected cell.
    ///
    /// Literal content is copied verbatim; formula content has its cell
    /// references shifted by the source-to-target delta, the same rewrite
    /// the original applies on drag-and-drop. A formula whose translation
    /// fails is copied unchanged. The pasted content is stored as-is and
    /// not evaluated; committing an edit of the target cell evaluates it.
    pub fn paste_cell(&mut self) {
        let Some(source) = self.copy_source else {
            self.status_message = Some("Nothing yanked".to_string());
            return;
        };

        let target = self.selected_address();
        let content = content_for_copy(self.grid.value_at(source), source, target);
        self.grid.set(target.row, target.col, content);
        self.status_message = Some(format!("Pasted {} to {}", source, target));
    }

    /// Switches to save-as mode to prompt for a filename.
    pub fn start_save_as(&mut self) {
        self.mode = AppMode::SaveAs;
        self.filename_input = self.filename.clone().unwrap_or_else(|| "grid.gridcalc".to_string());
        self.cursor_position = self.filename_input.len();
        self.status_message = None;
    }

    /// Switches to load-file mode to prompt for a filename.
    pub fn start_load_file(&mut self) {
        self.mode = AppMode::LoadFile;
        self.filename_input = self.filename.clone().unwrap_or_else(|| "grid.gridcalc".to_string());
        self.cursor_position = self.filename_input.len();
        self.status_message = None;
    }

    /// Cancels filename input and returns to normal mode.
    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    /// Processes the result of a save operation.
    pub fn set_save_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(filename) => {
                self.filename = Some(filename.clone());
                self.status_message = Some(format!("Saved to {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Save failed: {}", error));
            }
        }

        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    /// Processes the result of a load operation.
    ///
    /// Replaces the grid and resets the view on success.
    pub fn set_load_result(&mut self, result: Result<(Grid, String), String>) {
        match result {
            Ok((grid, filename)) => {
                self.grid = grid;
                self.filename = Some(filename.clone());
                self.reset_view();
                self.status_message = Some(format!("Loaded from {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Load failed: {}", error));
            }
        }

        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    /// Gets the filename to use for saving.
    pub fn get_save_filename(&self) -> String {
        if self.filename_input.is_empty() {
            "grid.gridcalc".to_string()
        } else {
            self.filename_input.clone()
        }
    }

    /// Gets the filename to use for loading.
    pub fn get_load_filename(&self) -> String {
        if self.filename_input.is_empty() {
            "grid.gridcalc".to_string()
        } else {
            self.filename_input.clone()
        }
    }

    /// Switches to CSV export mode to prompt for a filename.
    pub fn start_csv_export(&mut self) {
        self.mode = AppMode::ExportCsv;
        self.filename_input = self
            .filename
            .as_ref()
            .map(|f| f.replace(".gridcalc", ".csv"))
            .unwrap_or_else(|| "grid.csv".to_string());
        self.cursor_position = self.filename_input.len();
        self.status_message = None;
    }

    /// Gets the filename to use for CSV export.
    pub fn get_csv_export_filename(&self) -> String {
        if self.filename_input.is_empty() {
            "grid.csv".to_string()
        } else {
            self.filename_input.clone()
        }
    }

    /// Processes the result of a CSV export operation.
    pub fn set_csv_export_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(filename) => {
                self.status_message = Some(format!("Exported to {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Export failed: {}", error));
            }
        }

        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    /// Switches to CSV import mode to prompt for a filename.
    pub fn start_csv_import(&mut self) {
        self.mode = AppMode::ImportCsv;
        self.filename_input = "data.csv".to_string();
        self.cursor_position = self.filename_input.len();
        self.status_message = None;
    }

    /// Gets the filename to use for CSV import.
    pub fn get_csv_import_filename(&self) -> String {
        if self.filename_input.is_empty() {
            "data.csv".to_string()
        } else {
            self.filename_input.clone()
        }
    }

    /// Processes the result of a CSV import operation.
    ///
    /// Replaces the grid and resets the view on success. The filename is
    /// not adopted; imported CSV data is not a saved grid file.
    pub fn set_csv_import_result(&mut self, result: Result<Grid, String>) {
        match result {
            Ok(grid) => {
                self.grid = grid;
                self.reset_view();
                self.status_message = Some("CSV data imported successfully".to_string());
            }
            Err(error) => {
                self.status_message = Some(format!("Import failed: {}", error));
            }
        }

        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    fn reset_view(&mut self) {
        self.selected_row = 0;
        self.selected_col = 0;
        self.scroll_row = 0;
        self.scroll_col = 0;
        self.copy_source = None;
    }

    /// Updates the viewport size for proper scrolling calculations.
    pub fn update_viewport_size(&mut self, rows: usize, cols: usize) {
        self.viewport_rows = rows;
        self.viewport_cols = cols;
    }

    /// Ensures the selected cell is visible by adjusting scroll position.
    pub fn ensure_cursor_visible(&mut self) {
        if self.selected_row < self.scroll_row {
            self.scroll_row = self.selected_row;
        } else if self.selected_row >= self.scroll_row + self.viewport_rows {
            self.scroll_row = self.selected_row.saturating_sub(self.viewport_rows - 1);
        }

        if self.selected_col < self.scroll_col {
            self.scroll_col = self.selected_col;
        } else if self.selected_col >= self.scroll_col + self.viewport_cols {
            self.scroll_col = self.selected_col.saturating_sub(self.viewport_cols - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_default() {
        let app = App::default();
        assert_eq!(app.selected_row, 0);
        assert_eq!(app.selected_col, 0);
        assert_eq!(app.scroll_row, 0);
        assert_eq!(app.scroll_col, 0);
        assert!(matches!(app.mode, AppMode::Normal));
        assert!(app.input.is_empty());
        assert_eq!(app.cursor_position, 0);
        assert!(app.filename.is_none());
        assert!(app.status_message.is_none());
        assert!(app.copy_source.is_none());
    }

    #[test]
    fn test_start_editing_loads_stored_content() {
        let mut app = App::default();
        app.grid.set(0, 0, "Hello".to_string());

        app.start_editing();

        assert!(matches!(app.mode, AppMode::Editing));
        assert_eq!(app.input, "Hello");
        assert_eq!(app.cursor_position, 5);
    }

    #[test]
    fn test_finish_editing_literal() {
        let mut app = App::default();
        app.start_editing();
        app.input = "Test Value".to_string();

        app.finish_editing();

        assert!(matches!(app.mode, AppMode::Normal));
        assert!(app.input.is_empty());
        assert_eq!(app.grid.get(0, 0), "Test Value");
        // Selection moved down one row.
        assert_eq!(app.selected_row, 1);
    }

    #[test]
    fn test_finish_editing_formula_stores_result_only() {
        let mut app = App::default();
        app.grid.set(1, 0, "2".to_string());
        app.grid.set(2, 0, "3".to_string());

        app.start_editing();
        app.input = "=SUM(A2:A3)".to_string();
        app.finish_editing();

        // Only the evaluated result is stored; the formula text is gone.
        assert_eq!(app.grid.get(0, 0), "5");
    }

    #[test]
    fn test_finish_editing_bad_formula_stores_error_value() {
        let mut app = App::default();
        app.start_editing();
        app.input = "=A1+B1".to_string();
        app.finish_editing();

        assert_eq!(app.grid.get(0, 0), "#ERROR: Invalid formula format");
    }

    #[test]
    fn test_cancel_editing_keeps_cell() {
        let mut app = App::default();
        app.grid.set(0, 0, "original".to_string());
        app.start_editing();
        app.input = "changed".to_string();

        app.cancel_editing();

        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.grid.get(0, 0), "original");
    }

    #[test]
    fn test_yank_then_paste_translates_formula() {
        let mut app = App::default();
        // B5 holds a formula over A1:A3 (stored as text, like a drop).
        app.grid.set(4, 1, "=SUM(A1:A3)".to_string());

        app.selected_row = 4;
        app.selected_col = 1;
        let yanked = app.yank_cell();
        assert_eq!(yanked, "=SUM(A1:A3)");

        app.selected_col = 2;
        app.paste_cell();

        assert_eq!(app.grid.get(4, 2), "=SUM(B1:B3)");
        // Source cell is untouched.
        assert_eq!(app.grid.get(4, 1), "=SUM(A1:A3)");
    }

    #[test]
    fn test_paste_literal_verbatim() {
        let mut app = App::default();
        app.grid.set(0, 0, "plain".to_string());

        app.yank_cell();
        app.selected_row = 3;
        app.selected_col = 3;
        app.paste_cell();

        assert_eq!(app.grid.get(3, 3), "plain");
    }

    #[test]
    fn test_paste_without_yank_is_a_noop() {
        let mut app = App::default();
        app.paste_cell();

        assert_eq!(app.grid.get(0, 0), "");
        assert_eq!(app.status_message.as_deref(), Some("Nothing yanked"));
    }

    #[test]
    fn test_paste_keeps_formula_on_failed_translation() {
        let mut app = App::default();
        // Pasting this one column left would shift A1 off the sheet.
        app.grid.set(0, 1, "=SUM(A1)".to_string());

        app.selected_col = 1;
        app.yank_cell();
        app.selected_col = 0;
        app.paste_cell();

        assert_eq!(app.grid.get(0, 0), "=SUM(A1)");
    }

    #[test]
    fn test_clear_selected_cell() {
        let mut app = App::default();
        app.grid.set(0, 0, "gone".to_string());
        app.clear_selected_cell();
        assert_eq!(app.grid.get(0, 0), "");
    }

    #[test]
    fn test_start_save_as_defaults() {
        let mut app = App::default();
        app.start_save_as();

        assert!(matches!(app.mode, AppMode::SaveAs));
        assert_eq!(app.filename_input, "grid.gridcalc");
        assert_eq!(app.cursor_position, "grid.gridcalc".len());
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_start_save_as_with_existing_filename() {
        let mut app = App::default();
        app.filename = Some("existing.gridcalc".to_string());

        app.start_save_as();

        assert_eq!(app.filename_input, "existing.gridcalc");
    }

    #[test]
    fn test_set_save_result() {
        let mut app = App::default();
        app.start_save_as();
        app.set_save_result(Ok("test.gridcalc".to_string()));

        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.filename.as_deref(), Some("test.gridcalc"));
        assert!(app.status_message.unwrap().contains("Saved to test.gridcalc"));

        let mut app = App::default();
        app.start_save_as();
        app.set_save_result(Err("Permission denied".to_string()));

        assert!(app.filename.is_none());
        assert!(app.status_message.unwrap().contains("Save failed: Permission denied"));
    }

    #[test]
    fn test_set_load_result_resets_view() {
        let mut app = App::default();
        app.selected_row = 5;
        app.selected_col = 3;
        app.scroll_row = 2;
        app.scroll_col = 1;

        let mut grid = Grid::default();
        grid.set(0, 0, "Loaded".to_string());

        app.set_load_result(Ok((grid, "loaded.gridcalc".to_string())));

        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.filename.as_deref(), Some("loaded.gridcalc"));
        assert_eq!(app.selected_row, 0);
        assert_eq!(app.selected_col, 0);
        assert_eq!(app.scroll_row, 0);
        assert_eq!(app.scroll_col, 0);
        assert_eq!(app.grid.get(0, 0), "Loaded");
    }

    #[test]
    fn test_csv_dialog_defaults() {
        let mut app = App::default();

        app.start_csv_export();
        assert!(matches!(app.mode, AppMode::ExportCsv));
        assert_eq!(app.get_csv_export_filename(), "grid.csv");
        app.cancel_filename_input();

        app.filename = Some("budget.gridcalc".to_string());
        app.start_csv_export();
        assert_eq!(app.filename_input, "budget.csv");
        app.cancel_filename_input();

        app.start_csv_import();
        assert!(matches!(app.mode, AppMode::ImportCsv));
        assert_eq!(app.get_csv_import_filename(), "data.csv");
    }

    #[test]
    fn test_set_csv_import_result_replaces_grid() {
        let mut app = App::default();
        app.grid.set(0, 0, "old".to_string());

        let mut imported = Grid::default();
        imported.set(0, 0, "new".to_string());
        app.set_csv_import_result(Ok(imported));

        assert_eq!(app.grid.get(0, 0), "new");
        assert!(app.status_message.unwrap().contains("imported successfully"));
        // Imported data is not a saved grid file.
        assert!(app.filename.is_none());
    }

    #[test]
    fn test_ensure_cursor_visible() {
        let mut app = App::default();
        app.update_viewport_size(15, 10);

        app.selected_row = 5;
        app.selected_col = 3;
        app.ensure_cursor_visible();
        assert_eq!(app.scroll_row, 0);
        assert_eq!(app.scroll_col, 0);

        app.selected_row = 19;
        app.selected_col = 12;
        app.ensure_cursor_visible();
        assert_eq!(app.scroll_row, 5);
        assert_eq!(app.scroll_col, 3);

        app.selected_row = 2;
        app.selected_col = 1;
        app.ensure_cursor_visible();
        assert_eq!(app.scroll_row, 2);
        assert_eq!(app.scroll_col, 1);
    }
}
