use crate::application::{App, AppMode};
use crate::domain::CellAddress;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
};

/// Fixed display width of one grid column.
const CELL_WIDTH: usize = 10;

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_grid(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let content = app.grid.get(app.selected_row, app.selected_col);
    let header = Paragraph::new(format!(
        "gridcalc - Terminal Grid Editor | Cell: {} | {}",
        app.selected_address(),
        content
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_grid(f: &mut Frame, app: &App, area: Rect) {
    let visible_rows = area.height.saturating_sub(3) as usize;

    let mut total_width = 4;
    let mut visible_cols = 0;
    let available_width = area.width as usize;

    for _ in app.scroll_col..app.grid.cols() {
        if total_width + CELL_WIDTH + 1 > available_width {
            break;
        }
        total_width += CELL_WIDTH + 1;
        visible_cols += 1;
    }

    let mut headers = vec![Cell::from("")];
    for col in app.scroll_col..app.scroll_col + visible_cols {
        let header_style = if col == app.selected_col {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        };
        headers.push(Cell::from(CellAddress::column_letter(col).to_string()).style(header_style));
    }

    let mut rows = vec![Row::new(headers).height(1)];

    for row in app.scroll_row..std::cmp::min(app.scroll_row + visible_rows, app.grid.rows()) {
        let row_number_style = if row == app.selected_row {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let mut cells = vec![Cell::from(format!("{}", row + 1)).style(row_number_style)];

        for col in app.scroll_col..app.scroll_col + visible_cols {
            let content = app.grid.get(row, col);
            let cell_value = if content.is_empty() { " " } else { content };

            let style = if row == app.selected_row && col == app.selected_col {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else if Some(CellAddress::new(row, col)) == app.copy_source {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };

            cells.push(Cell::from(cell_value.to_string()).style(style));
        }

        rows.push(Row::new(cells).height(1));
    }

    let mut widths = vec![Constraint::Length(4)];
    widths.extend(
        (app.scroll_col..app.scroll_col + visible_cols).map(|_| Constraint::Length(CELL_WIDTH as u16)),
    );
    let table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::ALL).title("Grid"))
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                let filename = app.filename.as_deref().unwrap_or("unsaved");
                format!(
                    "File: {} | Ctrl+S: save | Ctrl+O: load | Ctrl+E: export CSV | Ctrl+L: import CSV | y: yank | p: paste | F1/?: help | q: quit",
                    filename
                )
            }
        }
        AppMode::Editing => format!(
            "Editing {}: {} (Enter to save, Esc to cancel)",
            app.selected_address(),
            app.input
        ),
        AppMode::Help => {
            "Up/Down/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string()
        }
        AppMode::SaveAs => format!("Save as: {} (Enter to save, Esc to cancel)", app.filename_input),
        AppMode::LoadFile => format!("Load file: {} (Enter to load, Esc to cancel)", app.filename_input),
        AppMode::ExportCsv => format!("Export CSV as: {} (Enter to export, Esc to cancel)", app.filename_input),
        AppMode::ImportCsv => format!("Import CSV from: {} (Enter to import, Esc to cancel)", app.filename_input),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::SaveAs | AppMode::LoadFile => Style::default().fg(Color::Yellow),
            AppMode::ExportCsv => Style::default().fg(Color::Magenta),
            AppMode::ImportCsv => Style::default().fg(Color::Green),
        });
    f.render_widget(input, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "gridcalc Formula Help (Line {}/{})",
                    start_line + 1,
                    help_lines.len()
                ))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> String {
    r#"GRIDCALC FORMULA REFERENCE

=== BASIC CONCEPTS ===
- A cell holds plain text, a number, or a formula starting with =
- A formula is a single function call: =FUNC(arguments)
- Cell references are a column letter plus a row number (A1, B2, C7)
- Function names are case insensitive (=sum(...) works)
- Formulas are evaluated once, when you press Enter; the cell then
  stores the result. Arithmetic expressions like =A1+B1 are not
  supported and show an error value.

=== FUNCTIONS ===
SUM(...)        Sum of numeric values        =SUM(A1:A5) or =SUM(A1,B1,5)
AVERAGE(...)    Mean of numeric values       =AVERAGE(A1:C1)
COUNT(...)      How many values are numeric  =COUNT(A1:A9)
TRIM(x)         First argument, trimmed      =TRIM(A1)
UPPER(x)        First argument, uppercased   =UPPER(A1)
LOWER(x)        First argument, lowercased   =LOWER(hello)

Non-numeric and empty values count as 0 for SUM and are skipped by
AVERAGE and COUNT. An empty argument list is fine: =SUM() is 0.

=== ARGUMENTS ===
A1:C3           One rectangular range, row by row
A1,B2,5,text    Comma list of references and literal values
                A range cannot be mixed into a comma list.
References outside the grid read as empty values, never as errors.

=== ERROR VALUES ===
Failures show in the cell as an error value, for example:
#ERROR: Invalid formula format
#ERROR: Unknown function: FOO
#ERROR: Invalid cell reference: A0

=== COPYING CELLS ===
y               Yank the selected cell (also copies to the clipboard)
p               Paste into the selected cell
Pasting a formula shifts every reference by the distance moved, so
=SUM(A1:A3) yanked from B5 and pasted at C5 becomes =SUM(B1:B3).
The pasted formula stays as text until you commit it with Enter.
Esc             Cancel the pending yank

=== FILE OPERATIONS ===
Ctrl+S          Save grid to file (JSON, "grid.gridcalc" by default)
Ctrl+O          Load grid from file
Ctrl+E          Export displayed values to CSV
Ctrl+L          Import data from CSV (replaces the current grid)

=== NAVIGATION ===
Arrow keys      Move between cells (hjkl also work)
Enter/F2        Edit the selected cell
Backspace       Clear the selected cell
F1 or ?         Show this help (scroll with arrows, PgUp/PgDn, Home)
q               Quit

=== HELP NAVIGATION ===
Up/Down or j/k  Scroll help text one line
Page Up/Down    Scroll help text five lines
Home            Jump to top
Esc/F1/?/q      Close this help window"#
        .to_string()
}
