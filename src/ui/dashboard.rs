// src/ui/dashboard.rs
// Renders the statistics dashboard.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Gauge, Paragraph, Wrap};
use ratatui::Frame;

use super::state::UiState;
use super::utils::{format_elapsed, format_in_unit};

pub fn draw(frame: &mut Frame, state: &UiState) {
    let [header, settings, progress, stats, help] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(6),
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(frame, header, state);
    draw_settings(frame, settings, state);
    draw_progress(frame, progress, state);
    draw_stats(frame, stats, state);
    frame.render_widget(
        Paragraph::new("s start  x stop  1/2/3 cycle units  q quit").dark_gray(),
        help,
    );

    if let Some(err) = state.error {
        draw_error(frame, err.user_message());
    }
}

fn draw_header(frame: &mut Frame, area: Rect, state: &UiState) {
    let (text, color) = if state.is_running() {
        ("Running", Color::Green)
    } else {
        ("Stopped", Color::Gray)
    };
    let line = Line::from(vec![
        Span::raw("Status: "),
        Span::styled(text, Style::default().fg(color).bold()),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(Block::bordered().title(" Traffic Generator ")),
        area,
    );
}

fn draw_settings(frame: &mut Frame, area: Rect, state: &UiState) {
    let s = &state.snapshot;
    let lines = vec![
        Line::from(format!("Destination: {}", s.destination_dir.display())),
        Line::from(format!(
            "Every {}s, {} file(s) per interval, infected probability {:.2}",
            s.generate_interval_secs, s.files_per_interval, s.infected_probability
        )),
        Line::from(format!(
            "Pools: {} clean, {} infected",
            s.clean_pool_len, s.infected_pool_len
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title(" Settings ")),
        area,
    );
}

fn draw_progress(frame: &mut Frame, area: Rect, state: &UiState) {
    let gauge = Gauge::default()
        .block(Block::bordered().title(" Current batch "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .percent(u16::from(state.progress.min(100)));
    frame.render_widget(gauge, area);
}

fn draw_stats(frame: &mut Frame, area: Rect, state: &UiState) {
    let s = &state.snapshot;
    let row = |label: &str, value: String| {
        Line::from(vec![Span::raw(format!("{:<22}", label)), Span::raw(value).bold()])
    };
    let lines = vec![
        row("Files generated:", s.copied_files.to_string()),
        row("Infected files:", s.infected_files.to_string()),
        row("Work time:", format_elapsed(s.elapsed_secs)),
        row(
            "[1] Current speed:",
            format_in_unit(s.current_speed_bytes, state.current_speed_unit),
        ),
        row(
            "[2] Average speed:",
            format!("{}/s", format_in_unit(s.average_speed_bytes, state.average_speed_unit)),
        ),
        row(
            "[3] Total volume:",
            format_in_unit(s.total_volume_bytes as f64, state.total_volume_unit),
        ),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(" Statistics ")),
        area,
    );
}

fn draw_error(frame: &mut Frame, message: &str) {
    let [area] = Layout::vertical([Constraint::Length(5)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [area] = Layout::horizontal([Constraint::Percentage(60)])
        .flex(Flex::Center)
        .areas(area);

    let text = vec![
        Line::from(message).red().bold(),
        Line::from("Press Enter to dismiss").dark_gray(),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title(" Error ").red()),
        area,
    );
}
