use crate::application::{App, AppMode};
use crate::infrastructure::{CsvStore, FileRepository, SystemClipboard};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::SaveAs => Self::handle_filename_input_mode(app, key, "save"),
            AppMode::LoadFile => Self::handle_filename_input_mode(app, key, "load"),
            AppMode::ExportCsv => Self::handle_filename_input_mode(app, key, "csv_export"),
            AppMode::ImportCsv => Self::handle_filename_input_mode(app, key, "csv_import"),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('s') => {
                    app.start_save_as();
                    return;
                }
                KeyCode::Char('o') => {
                    app.start_load_file();
                    return;
                }
                KeyCode::Char('e') => {
                    app.start_csv_export();
                    return;
                }
                KeyCode::Char('i') | KeyCode::Char('l') => {
                    app.start_csv_import();
                    return;
                }
                _ => {}
            }
        }

        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                if app.selected_row > 0 {
                    app.selected_row -= 1;
                    app.ensure_cursor_visible();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.selected_row < app.grid.rows() - 1 {
                    app.selected_row += 1;
                    app.ensure_cursor_visible();
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if app.selected_col > 0 {
                    app.selected_col -= 1;
                    app.ensure_cursor_visible();
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if app.selected_col < app.grid.cols() - 1 {
                    app.selected_col += 1;
                    app.ensure_cursor_visible();
                }
            }
            KeyCode::Enter | KeyCode::F(2) => {
                app.start_editing();
            }
            KeyCode::Char('y') => {
                let content = app.yank_cell();
                if let Err(err) = SystemClipboard::copy_text(&content) {
                    app.status_message =
                        Some(format!("Yanked {} (clipboard unavailable: {})", app.selected_address(), err));
                }
            }
            KeyCode::Char('p') => {
                app.paste_cell();
            }
            KeyCode::Backspace => {
                app.clear_selected_cell();
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Esc => {
                app.copy_source = None;
            }
            KeyCode::Char('q') => {
                // Handled by the main loop.
            }
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                app.finish_editing();
            }
            KeyCode::Esc => {
                app.cancel_editing();
            }
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    app.input.remove(app.cursor_position - 1);
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < app.input.len() {
                    app.input.remove(app.cursor_position);
                }
            }
            KeyCode::Left => {
                if app.cursor_position > 0 {
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Right => {
                if app.cursor_position < app.input.len() {
                    app.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.input.len();
            }
            KeyCode::Char(c) => {
                app.input.insert(app.cursor_position, c);
                app.cursor_position += 1;
            }
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_filename_input_mode(app: &mut App, key: KeyCode, mode: &str) {
        match key {
            KeyCode::Enter => match mode {
                "save" => {
                    let filename = app.get_save_filename();
                    let result = FileRepository::save_grid(&app.grid, &filename)
                        .map_err(|e| e.to_string());
                    app.set_save_result(result);
                }
                "load" => {
                    let filename = app.get_load_filename();
                    let result = FileRepository::load_grid(&filename).map_err(|e| e.to_string());
                    app.set_load_result(result);
                }
                "csv_export" => {
                    let filename = app.get_csv_export_filename();
                    let result =
                        CsvStore::export(&app.grid, &filename).map_err(|e| e.to_string());
                    app.set_csv_export_result(result);
                }
                "csv_import" => {
                    let filename = app.get_csv_import_filename();
                    let result = CsvStore::import(&filename).map_err(|e| e.to_string());
                    app.set_csv_import_result(result);
                }
                _ => {}
            },
            KeyCode::Esc => {
                app.cancel_filename_input();
            }
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    app.filename_input.remove(app.cursor_position - 1);
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < app.filename_input.len() {
                    app.filename_input.remove(app.cursor_position);
                }
            }
            KeyCode::Left => {
                if app.cursor_position > 0 {
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Right => {
                if app.cursor_position < app.filename_input.len() {
                    app.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.filename_input.len();
            }
            KeyCode::Char(c) => {
                app.filename_input.insert(app.cursor_position, c);
                app.cursor_position += 1;
            }
            _ => {}
        }
    }
}
