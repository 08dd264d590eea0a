//! Dashboard layout and widgets.

use ff5::{EQUATION, TITLE};
use ff5_model::{Factor, format_input};
use ff5_output::excess_return_line;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::app::{App, InputMode, View};
use super::chart::{Trace, line_chart};

const FACTOR_COLORS: [Color; 5] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Red,
];

/// Draw the main UI layout.
pub(crate) fn draw_ui(frame: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(11), // Stock selector and inputs
            Constraint::Length(3),  // Result
            Constraint::Min(10),    // Charts
            Constraint::Length(2),  // Footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0]);

    let controls = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(40)])
        .split(chunks[1]);
    draw_stock_selector(frame, controls[0], app);
    draw_inputs(frame, controls[1], app);

    draw_result(frame, chunks[2], app);
    draw_charts(frame, chunks[3], app);
    draw_footer(frame, chunks[4], app);
}

fn draw_header(frame: &mut Frame<'_>, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            TITLE,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(EQUATION, Style::default().fg(Color::Gray))),
    ];

    let header = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));

    frame.render_widget(header, area);
}

fn draw_stock_selector(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let items: Vec<ListItem<'_>> = app
        .session
        .stocks()
        .iter()
        .map(|symbol| ListItem::new(symbol.as_str()))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Stock "))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.session.selected_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Mkt-RF on its own row, then SMB/HML and RMW/CMA side by side.
fn draw_inputs(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Factor inputs ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(inner);
    let columns = |row: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row)
    };
    let middle = columns(rows[1]);
    let bottom = columns(rows[2]);

    draw_input(frame, rows[0], app, Factor::MarketExcess);
    draw_input(frame, middle[0], app, Factor::Smb);
    draw_input(frame, middle[1], app, Factor::Hml);
    draw_input(frame, bottom[0], app, Factor::Rmw);
    draw_input(frame, bottom[1], app, Factor::Cma);
}

fn draw_input(frame: &mut Frame<'_>, area: Rect, app: &App, factor: Factor) {
    let focused = app.focus == factor;
    let editing = focused && app.input_mode == InputMode::Editing;

    let text = if editing {
        format!("{}_", app.edit_buffer)
    } else {
        format_input(app.session.inputs().get(factor))
    };

    let border = match (focused, editing) {
        (_, true) => Style::default().fg(Color::Green),
        (true, false) => Style::default().fg(Color::Yellow),
        _ => Style::default().fg(Color::DarkGray),
    };

    let input = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ({}) ", factor, factor.description())),
    );

    frame.render_widget(input, area);
}

fn draw_result(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let line = match &app.view {
        Ok(view) => Line::from(vec![
            Span::styled(
                excess_return_line(view.prediction),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "   {} | {} observations | R-squared {:.4}",
                    app.session.selected(),
                    view.nobs,
                    view.r_squared
                ),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Err(message) => Line::from(Span::styled(
            format!("{}: {}", app.session.selected(), message),
            Style::default().fg(Color::Red),
        )),
    };

    let result = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Prediction "));

    frame.render_widget(result, area);
}

fn draw_charts(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let view = match &app.view {
        Ok(view) => view,
        Err(_) => {
            let placeholder = Paragraph::new("No fit for the selected stock")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(placeholder, area);
            return;
        }
    };

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_fit_chart(frame, halves[0], app.session.selected(), view);
    draw_growth_chart(frame, halves[1], view);
}

fn draw_fit_chart(frame: &mut Frame<'_>, area: Rect, symbol: &str, view: &View) {
    let traces = [
        Trace {
            name: symbol.to_string(),
            color: Color::Cyan,
            points: &view.actual,
        },
        Trace {
            name: "Fitted".to_string(),
            color: Color::Yellow,
            points: &view.fitted,
        },
    ];

    let chart = line_chart(
        "Excess return: actual vs fitted",
        &traces,
        view.date_labels(),
    );
    frame.render_widget(chart, area);
}

fn draw_growth_chart(frame: &mut Frame<'_>, area: Rect, view: &View) {
    let traces: Vec<Trace<'_>> = view
        .growth
        .iter()
        .zip(FACTOR_COLORS)
        .map(|((factor, points), color)| Trace {
            name: factor.to_string(),
            color,
            points,
        })
        .collect();

    let chart = line_chart("Cumulative factor returns", &traces, view.date_labels());
    frame.render_widget(chart, area);
}

/// Draw the footer bar with context-sensitive help.
fn draw_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let help_text = match app.input_mode {
        InputMode::Editing => "Enter: Confirm | Esc: Cancel".to_string(),
        InputMode::Normal => format!(
            "[↑↓/jk] Stock  [Tab] Next input  [+/-] ±{}  [PgUp/PgDn] ±1000 steps  [e] Edit  [q] Quit",
            format_input(app.session.bounds().step)
        ),
    };

    // Add status message if present
    let display_text = match &app.status_message {
        Some((status, _)) => format!("{} | {}", status, help_text),
        None => help_text,
    };

    let footer = Paragraph::new(display_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));

    frame.render_widget(footer, area);
}
