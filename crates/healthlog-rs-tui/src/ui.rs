//! Rendering routines for the Healthlog TUI.

use crate::app::{App, Tab};
use crate::dialog::{FIELD_ORDER, RecordDialog, field_label};
use healthlog_rs_core::{
    Category, HealthRecord, IdGenerator, RecordField, RecordStorage, TrendSeries,
};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, BorderType, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row,
    Table, TableState, Tabs,
};

const PRIMARY: Color = Color::Rgb(46, 134, 222); // #2E86DE
const SECONDARY: Color = Color::Rgb(231, 76, 60); // #E74C3C
const TEXT: Color = Color::Rgb(238, 238, 238); // #eeeeee
const TEXT_MUTED: Color = Color::Rgb(128, 128, 128); // #808080
const BORDER: Color = Color::Rgb(60, 60, 60); // #3c3c3c
const BORDER_ACTIVE: Color = Color::Rgb(84, 160, 255); // #54A0FF
const YELLOW: Color = Color::Rgb(229, 192, 123); // #e5c07b
const ERROR: Color = Color::Rgb(255, 110, 110);

const TITLE: &str = "Health Records Dashboard";
const DIALOG_WIDTH: u16 = 60;
/// Two lines per field, plus borders and the button row.
const DIALOG_HEIGHT: u16 = FIELD_ORDER.len() as u16 * 2 + 4;
const LABEL_WIDTH: usize = 18;

/// Draw the entire TUI frame.
pub fn draw<S: RecordStorage, G: IdGenerator>(frame: &mut Frame<'_>, app: &App<S, G>) {
    let area = frame.area();
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // tabs
            Constraint::Min(0),    // tab content
            Constraint::Length(1), // status bar
        ])
        .split(area);

    draw_header(frame, app, root[0]);
    draw_tabs(frame, app, root[1]);
    match app.tab {
        Tab::Records => draw_records(frame, app, root[2]),
        Tab::Charts => draw_charts(frame, &app.trend(), root[2]),
    }
    draw_status_bar(frame, app, root[3]);

    if let Some(dialog) = app.dialog.as_ref() {
        draw_dialog(frame, dialog, area);
    }
}

/// Title on the left, the placeholder profile on the right.
fn draw_header<S: RecordStorage, G: IdGenerator>(
    frame: &mut Frame<'_>,
    app: &App<S, G>,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(40)])
        .split(inner);

    let title = Line::from(vec![
        Span::styled(
            format!(" {TITLE}"),
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", app.storage_label),
            Style::default().fg(TEXT_MUTED),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), cols[0]);

    let mut profile = vec![Span::styled(
        format!(" {} ", app.user.initials()),
        Style::default()
            .fg(Color::Rgb(10, 10, 10))
            .bg(PRIMARY)
            .add_modifier(Modifier::BOLD),
    )];
    if !app.user.name.is_empty() {
        profile.push(Span::styled(
            format!(" {}", app.user.name),
            Style::default().fg(TEXT),
        ));
    }
    if !app.user.email.is_empty() {
        profile.push(Span::styled(
            format!(" <{}>", app.user.email),
            Style::default().fg(TEXT_MUTED),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(profile)).right_aligned(),
        cols[1],
    );
}

fn draw_tabs<S: RecordStorage, G: IdGenerator>(
    frame: &mut Frame<'_>,
    app: &App<S, G>,
    area: Rect,
) {
    let selected = Tab::ALL
        .iter()
        .position(|tab| *tab == app.tab)
        .unwrap_or_default();
    let tabs = Tabs::new(Tab::ALL.iter().map(|tab| tab.title()))
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER)),
        )
        .style(Style::default().fg(TEXT_MUTED))
        .highlight_style(Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD))
        .divider(Span::styled("|", Style::default().fg(BORDER)));
    frame.render_widget(tabs, area);
}

fn draw_records<S: RecordStorage, G: IdGenerator>(
    frame: &mut Frame<'_>,
    app: &App<S, G>,
    area: Rect,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search
            Constraint::Length(3), // category filter
            Constraint::Min(0),    // table
        ])
        .split(area);

    draw_search(frame, app, rows[0]);
    draw_category_filter(frame, app, rows[1]);
    draw_table(frame, app, rows[2]);
}

fn draw_search<S: RecordStorage, G: IdGenerator>(
    frame: &mut Frame<'_>,
    app: &App<S, G>,
    area: Rect,
) {
    let border = if app.search_focused {
        BORDER_ACTIVE
    } else {
        BORDER
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(" Search ", Style::default().fg(TEXT_MUTED)));
    let inner = block.inner(area);

    let text = if app.filter.search.is_empty() && !app.search_focused {
        Span::styled(
            "Press / to search records...",
            Style::default().fg(TEXT_MUTED),
        )
    } else {
        Span::styled(app.filter.search.as_str(), Style::default().fg(TEXT))
    };
    frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);

    if app.search_focused {
        let width = app.filter.search.chars().count() as u16;
        frame.set_cursor_position((inner.x + width.min(inner.width), inner.y));
    }
}

fn draw_category_filter<S: RecordStorage, G: IdGenerator>(
    frame: &mut Frame<'_>,
    app: &App<S, G>,
    area: Rect,
) {
    let mut spans = Vec::new();
    for (idx, category) in Category::ALL.iter().enumerate() {
        let checked = app.filter.is_selected(*category);
        let mark = if checked { "[x]" } else { "[ ]" };
        let style = if checked {
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT)
        };
        spans.push(Span::styled(format!(" {mark} "), style));
        spans.push(Span::styled(
            format!("{} ", idx + 1),
            Style::default().fg(TEXT_MUTED),
        ));
        spans.push(Span::styled(format!("{category} "), style));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(" Category ", Style::default().fg(TEXT_MUTED)));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_table<S: RecordStorage, G: IdGenerator>(
    frame: &mut Frame<'_>,
    app: &App<S, G>,
    area: Rect,
) {
    let visible = app.visible();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(
            format!(" Records ({}/{}) ", visible.len(), app.store.len()),
            Style::default().fg(TEXT_MUTED),
        ));

    if visible.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No records found",
            Style::default().fg(TEXT_MUTED),
        )))
        .centered()
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(FIELD_ORDER.iter().map(|field| Cell::from(field_label(*field))))
        .style(Style::default().fg(TEXT_MUTED).add_modifier(Modifier::BOLD));
    let rows = visible.iter().map(|record| record_row(record));
    let widths = [
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(18),
        Constraint::Length(16),
        Constraint::Min(16),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .style(Style::default().fg(TEXT))
        .row_highlight_style(
            Style::default()
                .fg(Color::Rgb(10, 10, 10))
                .bg(BORDER_ACTIVE),
        )
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn record_row(record: &HealthRecord) -> Row<'static> {
    Row::new(vec![
        Cell::from(record.date.clone()),
        Cell::from(record.category.as_str()),
        Cell::from(record.temperature.to_string()),
        Cell::from(record.blood_pressure.clone()),
        Cell::from(record.heart_rate.to_string()),
    ])
}

/// Temperature and heart rate stacked, each on its own y axis.
fn draw_charts(frame: &mut Frame<'_>, trend: &TrendSeries, area: Rect) {
    if trend.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER))
            .title(Span::styled(" Trends ", Style::default().fg(TEXT_MUTED)));
        let empty = Paragraph::new(Line::from(Span::styled(
            "No records to chart yet",
            Style::default().fg(TEXT_MUTED),
        )))
        .centered()
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let temperature_title = match trend.temperature_summary() {
        Some(summary) => format!(
            " Temperature (°C)  min {:.1}  max {:.1}  avg {:.1} ",
            summary.min, summary.max, summary.mean
        ),
        None => " Temperature (°C) ".to_string(),
    };
    let heart_rate_title = match trend.heart_rate_summary() {
        Some(summary) => format!(
            " Heart Rate (bpm)  min {:.0}  max {:.0}  avg {:.0} ",
            summary.min, summary.max, summary.mean
        ),
        None => " Heart Rate (bpm) ".to_string(),
    };

    draw_series(
        frame,
        rows[0],
        SeriesView {
            title: temperature_title,
            name: "Temperature",
            color: SECONDARY,
            points: &trend.temperature,
            labels: &trend.labels,
            x_bounds: trend.x_bounds(),
            y_bounds: trend.temperature_bounds(),
            precision: 1,
        },
    );
    draw_series(
        frame,
        rows[1],
        SeriesView {
            title: heart_rate_title,
            name: "Heart Rate",
            color: PRIMARY,
            points: &trend.heart_rate,
            labels: &trend.labels,
            x_bounds: trend.x_bounds(),
            y_bounds: trend.heart_rate_bounds(),
            precision: 0,
        },
    );
}

struct SeriesView<'a> {
    title: String,
    name: &'static str,
    color: Color,
    points: &'a [(f64, f64)],
    labels: &'a [String],
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    precision: usize,
}

fn draw_series(frame: &mut Frame<'_>, area: Rect, view: SeriesView<'_>) {
    let dataset = Dataset::default()
        .name(view.name)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(view.color))
        .data(view.points);

    let first = view.labels.first().cloned().unwrap_or_default();
    let last = view.labels.last().cloned().unwrap_or_default();
    let [low, high] = view.y_bounds;
    let precision = view.precision;

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER))
                .title(Span::styled(view.title, Style::default().fg(TEXT_MUTED))),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(TEXT_MUTED))
                .bounds(view.x_bounds)
                .labels([first, last]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(TEXT_MUTED))
                .bounds(view.y_bounds)
                .labels([
                    format!("{low:.precision$}"),
                    format!("{:.precision$}", (low + high) / 2.0),
                    format!("{high:.precision$}"),
                ]),
        );
    frame.render_widget(chart, area);
}

fn draw_dialog(frame: &mut Frame<'_>, dialog: &RecordDialog, area: Rect) {
    let popup = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_ACTIVE))
        .title(Span::styled(
            format!(" {} ", dialog.title()),
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let focused = dialog.focused_field();
    let label_width = LABEL_WIDTH;
    let mut lines = Vec::new();
    for field in FIELD_ORDER {
        let is_focused = field == focused;
        let label_style = if is_focused {
            Style::default().fg(BORDER_ACTIVE).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_MUTED)
        };
        let value = match field {
            RecordField::Category => format!("< {} >", dialog.value(field)),
            _ => dialog.value(field).to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<label_width$}", field_label(field)),
                label_style,
            ),
            Span::styled(value, Style::default().fg(TEXT)),
        ]));
        let error = dialog.errors.get(field).unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!("{:label_width$}{error}", ""),
            Style::default().fg(ERROR),
        )));
    }
    lines.push(Line::from(vec![
        Span::styled(" Enter", Style::default().fg(TEXT_MUTED)),
        Span::styled(
            format!(" {}", dialog.submit_label()),
            Style::default().fg(YELLOW),
        ),
        Span::styled("  Esc", Style::default().fg(TEXT_MUTED)),
        Span::styled(" cancel", Style::default().fg(BORDER)),
        Span::styled("  Tab", Style::default().fg(TEXT_MUTED)),
        Span::styled(" next field", Style::default().fg(BORDER)),
    ]));
    frame.render_widget(Paragraph::new(lines), inner);

    if focused != RecordField::Category {
        let row = FIELD_ORDER
            .iter()
            .position(|field| *field == focused)
            .unwrap_or_default() as u16;
        let column = (LABEL_WIDTH + dialog.value(focused).chars().count()) as u16;
        frame.set_cursor_position((
            inner.x + column.min(inner.width.saturating_sub(1)),
            inner.y + row * 2,
        ));
    }
}

/// A `width` x `height` rectangle centered in `area`, clipped to it.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_status_bar<S: RecordStorage, G: IdGenerator>(
    frame: &mut Frame<'_>,
    app: &App<S, G>,
    area: Rect,
) {
    let status_color = if app.status.starts_with("failed") {
        ERROR
    } else {
        YELLOW
    };

    let shortcuts = vec![
        Span::styled(" q", Style::default().fg(TEXT_MUTED)),
        Span::styled(" quit", Style::default().fg(BORDER)),
        Span::styled("  Tab", Style::default().fg(TEXT_MUTED)),
        Span::styled(" tabs", Style::default().fg(BORDER)),
        Span::styled("  a", Style::default().fg(TEXT_MUTED)),
        Span::styled(" add", Style::default().fg(BORDER)),
        Span::styled("  Enter", Style::default().fg(TEXT_MUTED)),
        Span::styled(" edit", Style::default().fg(BORDER)),
        Span::styled("  d", Style::default().fg(TEXT_MUTED)),
        Span::styled(" delete", Style::default().fg(BORDER)),
        Span::styled("  /", Style::default().fg(TEXT_MUTED)),
        Span::styled(" search", Style::default().fg(BORDER)),
        Span::styled("  1-5", Style::default().fg(TEXT_MUTED)),
        Span::styled(" categories", Style::default().fg(BORDER)),
    ];

    let right_text = format!(" {} ", app.status);

    let right_len = right_text.chars().count() as u16;
    let left_area = Rect {
        width: area.width.saturating_sub(right_len),
        ..area
    };
    let right_area = Rect {
        x: area.x + area.width.saturating_sub(right_len),
        width: right_len.min(area.width),
        ..area
    };

    let left = Paragraph::new(Line::from(shortcuts));
    let right = Paragraph::new(Line::from(Span::styled(
        right_text,
        Style::default().fg(status_color),
    )));

    frame.render_widget(left, left_area);
    frame.render_widget(right, right_area);
}

#[cfg(test)]
mod tests {
    use super::{centered_rect, draw};
    use crate::TuiConfig;
    use crate::app::{App, Tab};
    use healthlog_rs_core::{MemoryStorage, NewHealthRecord, RecordStore, SequentialIdGenerator};
    use healthlog_rs_test_utils::new_record;
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    fn render(app: &App<MemoryStorage, SequentialIdGenerator>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 36)).expect("terminal");
        terminal.draw(|frame| draw(frame, app)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App<MemoryStorage, SequentialIdGenerator> {
        let mut store = RecordStore::open(MemoryStorage::new(), SequentialIdGenerator::default());
        store.add(new_record("2024-01-01")).expect("add");
        store.add(new_record("2024-01-02")).expect("add");
        App::new(store, &TuiConfig::default())
    }

    #[test]
    fn records_tab_renders_rows() {
        let screen = render(&app());
        assert!(screen.contains("Health Records Dashboard"));
        assert!(screen.contains("2024-01-02"));
        assert!(screen.contains("120/80"));
    }

    #[test]
    fn temperature_cell_matches_searchable_text() {
        let mut store = RecordStore::open(MemoryStorage::new(), SequentialIdGenerator::default());
        let record = NewHealthRecord {
            temperature: 37.0,
            ..new_record("2024-02-01")
        };
        store.add(record).expect("add");
        let mut app = App::new(store, &TuiConfig::default());

        let screen = render(&app);
        assert!(screen.contains("37"));
        assert!(!screen.contains("37.0"));

        app.filter.search = "37".to_string();
        assert!(render(&app).contains("2024-02-01"));
    }

    #[test]
    fn empty_filter_result_renders_placeholder() {
        let mut app = app();
        app.filter.search = "zzz".to_string();
        assert!(render(&app).contains("No records found"));
    }

    #[test]
    fn charts_and_dialog_render() {
        let mut app = app();
        app.tab = Tab::Charts;
        assert!(render(&app).contains("Temperature"));

        app.tab = Tab::Records;
        app.open_add_dialog();
        let screen = render(&app);
        assert!(screen.contains("Add New Health Record"));
        assert!(screen.contains("Add Record"));
    }

    #[test]
    fn centered_rect_clips_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(60, 14, area), area);
        assert_eq!(centered_rect(20, 4, area), Rect::new(10, 3, 20, 4));
    }
}
