use chrono::{DateTime, Duration, Utc};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Clear, Gauge, Paragraph, Wrap};
use thatsit_core::{color_for, format_remaining, Phase, Rgb};

use super::app::{App, SetupFocus};

const SLATE: Color = Color::Rgb(15, 23, 42);
const ERROR: Color = Color::Rgb(239, 68, 68);
const MUTED: Color = Color::Rgb(148, 163, 184);

pub fn render(frame: &mut Frame<'_>, app: &App, now: DateTime<Utc>) {
    match app.phase() {
        Phase::Configuring => render_setup(frame, app),
        Phase::CountingDown => render_countdown(frame, app, now),
        Phase::Locked => render_lock(frame, app, now),
    }
}

fn render_setup(frame: &mut Frame<'_>, app: &App) {
    let area = centered(frame.area(), 56, 17);
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title(" That's It ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let [subtitle, _, cutoff, password, gauge, error, _, note, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .margin(1)
    .areas(inner);

    frame.render_widget(
        Paragraph::new("Set your cutoff time. Stick to it.")
            .fg(MUTED)
            .alignment(Alignment::Center),
        subtitle,
    );

    frame.render_widget(
        input(
            " Cutoff Time ",
            app.cutoff().value().to_string(),
            app.focus() == SetupFocus::Cutoff,
        ),
        cutoff,
    );

    let required = app.config().lock.password_length;
    let typed = app.password().len();
    frame.render_widget(
        input(
            &format!(" Unlock Password ({typed}/{required}) "),
            "•".repeat(typed),
            app.focus() == SetupFocus::Password,
        ),
        password,
    );

    let ratio = if required == 0 {
        0.0
    } else {
        (typed as f64 / required as f64).min(1.0)
    };
    let gauge_color = if typed == required { Color::Green } else { MUTED };
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::new().fg(gauge_color))
            .ratio(ratio)
            .label(""),
        gauge,
    );

    if let Some(message) = app.setup_error() {
        frame.render_widget(Paragraph::new(message).fg(ERROR), error);
    }

    let cutoff_text = if app.cutoff().is_empty() {
        "--:--"
    } else {
        app.cutoff().value()
    };
    frame.render_widget(
        Paragraph::new(format!(
            "The lock screen will activate automatically at {cutoff_text}."
        ))
        .fg(MUTED)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true }),
        note,
    );
    frame.render_widget(
        Paragraph::new("Tab switch field · Enter start · Ctrl+Q quit")
            .fg(MUTED)
            .alignment(Alignment::Center),
        help,
    );
}

fn render_countdown(frame: &mut Frame<'_>, app: &App, now: DateTime<Utc>) {
    let area = frame.area();
    let remaining = app.remaining(now).unwrap_or_else(Duration::zero);
    let thresholds = app.thresholds();
    let background = rgb(color_for(thresholds.fraction(remaining)));

    let mut style = Style::new().fg(Color::White).bg(background).bold();
    if thresholds.is_critical(remaining) {
        style = style.add_modifier(Modifier::SLOW_BLINK);
    }

    // Small widget pinned to the top-right corner.
    let width = 11u16.min(area.width);
    let height = 3u16.min(area.height);
    let widget = Rect::new(area.right().saturating_sub(width), area.y, width, height);
    frame.render_widget(Clear, widget);
    frame.render_widget(
        Paragraph::new(format_remaining(remaining))
            .alignment(Alignment::Center)
            .block(Block::bordered().border_type(BorderType::Rounded))
            .style(style),
        widget,
    );

    if let Some(target) = app.target_local() {
        let hint = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
        frame.render_widget(
            Paragraph::new(format!(
                "Locking at {} · Ctrl+Q quit",
                target.format("%H:%M")
            ))
            .fg(MUTED),
            hint,
        );
    }
}

fn render_lock(frame: &mut Frame<'_>, app: &App, now: DateTime<Utc>) {
    let area = frame.area();
    frame.render_widget(Block::new().style(Style::new().bg(SLATE)), area);

    let body = centered(area, 60, 13);
    let [headline, _, message, _, instruction, input_row, counter] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(body);

    let ui = &app.config().ui;
    frame.render_widget(
        Paragraph::new(ui.lock_headline.as_str())
            .fg(Color::White)
            .bold()
            .alignment(Alignment::Center),
        headline,
    );
    frame.render_widget(
        Paragraph::new(ui.lock_message.as_str())
            .fg(MUTED)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        message,
    );
    frame.render_widget(
        Paragraph::new("If you really must continue, type the password manually.")
            .fg(MUTED)
            .alignment(Alignment::Center),
        instruction,
    );

    let shaking = app.shaking(now);
    let field = centered(input_row, 32, 3);
    let field = shift(field, if shaking { shake_offset(now) } else { 0 }, input_row);
    let border = if shaking { ERROR } else { MUTED };
    frame.render_widget(
        Paragraph::new("•".repeat(app.attempt().len()))
            .fg(Color::White)
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::new().fg(border)),
            ),
        field,
    );

    frame.render_widget(
        Paragraph::new(format!(
            "{} / {} chars",
            app.attempt().len(),
            app.unlock_len()
        ))
        .fg(MUTED)
        .alignment(Alignment::Center),
        counter,
    );
}

fn input<'a>(title: &'a str, value: String, focused: bool) -> Paragraph<'a> {
    let border = if focused { Color::White } else { MUTED };
    Paragraph::new(value).block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(border))
            .title(title),
    )
}

fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Horizontal jitter while shaking, stepping every 50ms.
fn shake_offset(now: DateTime<Utc>) -> i32 {
    const STEPS: [i32; 4] = [-2, 2, -1, 1];
    let step = (now.timestamp_subsec_millis() / 50) as usize % STEPS.len();
    STEPS[step]
}

fn shift(area: Rect, dx: i32, bounds: Rect) -> Rect {
    let max_x = bounds.right().saturating_sub(area.width);
    let x = (i32::from(area.x) + dx).clamp(i32::from(bounds.x), i32::from(max_x.max(bounds.x)));
    Rect {
        x: u16::try_from(x).unwrap_or(area.x),
        ..area
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
