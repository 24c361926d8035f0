// TUI module for rendering the terminal interface
pub mod colors;
pub mod helpers;
pub mod input;

// Re-exports
pub use colors::*;
pub use helpers::{calculate_progress, format_duration, format_file_size};
pub use input::{handle_settings_input, Intent, KeyTarget, KeyboardRouter, Routed, SettingsKey};

use crate::animation::CardAnimator;
use crate::app::{PlaybackState, SessionSummary, SettingsForm, Toast, ToastKind};
use crate::config::SwipeConfig;
use crate::domain::{Action, Direction, Item, QueueSnapshot};
use ratatui::{
    layout::{Alignment, Constraint, Direction as Axis, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

/// UI view state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Reviewing clips
    Browsing,
    /// Help overlay visible
    Help,
    /// Swipe mapping editor
    Settings,
    /// Summary screen at the end
    Summary,
    /// Welcome screen shown on first launch
    Welcome,
}

/// Everything one frame needs, borrowed from the app
pub struct Screen<'a> {
    pub view: ViewState,
    pub current: Option<&'a Item>,
    pub snapshot: QueueSnapshot,
    pub swipe: &'a SwipeConfig,
    pub card: &'a CardAnimator,
    pub playback: PlaybackState,
    pub toast: Option<&'a Toast>,
    pub settings: Option<&'a SettingsForm>,
    pub summary: SessionSummary,
}

const HINT_WIDTH: u16 = 14;

/// Renders the review surface and whichever overlay is active
pub fn render(frame: &mut Frame, screen: &Screen) {
    let chunks = Layout::default()
        .direction(Axis::Vertical)
        .constraints([
            Constraint::Length(4), // Header with progress
            Constraint::Min(0),    // Card and hints
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], screen);
    render_stage(frame, chunks[1], screen);
    render_footer(frame, chunks[2], screen);

    match screen.view {
        ViewState::Help => render_help_overlay(frame),
        ViewState::Settings => {
            if let Some(form) = screen.settings {
                render_settings_overlay(frame, form);
            }
        }
        ViewState::Welcome => render_welcome_overlay(frame, screen.swipe),
        ViewState::Summary => render_summary(frame, &screen.summary),
        ViewState::Browsing => {}
    }
}

/// Colour that goes with an action wherever it is shown
fn action_color(action: &Action) -> Color {
    match action {
        Action::Move { .. } => ACCENT_SECONDARY,
        Action::Delete => ACCENT_PRIMARY,
        Action::Skip => TEXT_SECONDARY,
    }
}

fn render_header(frame: &mut Frame, area: Rect, screen: &Screen) {
    let chunks = Layout::default()
        .direction(Axis::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let snapshot = screen.snapshot;
    let total = snapshot.total();

    let (title_text, clip_info) = match screen.current {
        Some(item) => (
            format!(" Clip {} / {} ", snapshot.processed_count + 1, total),
            vec![
                Span::styled(
                    item.filename.clone(),
                    Style::default()
                        .fg(TEXT_PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format!(
                        "({} • {})",
                        format_file_size(item.size),
                        item.format.to_uppercase()
                    ),
                    Style::default().fg(TEXT_SECONDARY),
                ),
            ],
        ),
        None => (
            " Sortie ".to_string(),
            vec![Span::styled(
                "Nothing left to review",
                Style::default().fg(TEXT_SECONDARY),
            )],
        ),
    };

    let mut title_spans = vec![Span::styled(
        title_text,
        Style::default()
            .fg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD),
    )];
    if screen.summary.dry_run {
        title_spans.push(Span::styled(
            "[DRY RUN]",
            Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(vec![Line::from(title_spans), Line::from(clip_info)])
        .block(
            Block::default()
                .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(header, chunks[0]);

    let processed = snapshot.processed_count;
    let progress = calculate_progress(processed, total);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .gauge_style(Style::default().fg(ACCENT_SECONDARY).bg(BG_DARK))
        .ratio(progress)
        .label(format!(
            "{}% ({}/{})",
            (progress * 100.0) as u16,
            processed,
            total
        ));

    frame.render_widget(gauge, chunks[1]);
}

/// Card in the middle, one action hint on each side
fn render_stage(frame: &mut Frame, area: Rect, screen: &Screen) {
    let rows = Layout::default()
        .direction(Axis::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Axis::Horizontal)
        .constraints([
            Constraint::Length(HINT_WIDTH),
            Constraint::Min(0),
            Constraint::Length(HINT_WIDTH),
        ])
        .split(rows[1]);

    let active = screen.card.active_direction();
    let hint_area = |direction: Direction| match direction {
        Direction::Up => rows[0],
        Direction::Down => rows[2],
        Direction::Left => columns[0],
        Direction::Right => columns[2],
    };

    for direction in Direction::ALL {
        let hint = direction_hint(direction, screen.swipe, active == Some(direction));
        let target = hint_area(direction);
        let target = if direction.is_horizontal() {
            // Vertically centre the side hints
            Rect {
                y: target.y + target.height / 2,
                height: target.height.min(1),
                ..target
            }
        } else {
            target
        };
        frame.render_widget(hint, target);
    }

    render_card(frame, columns[1], area, screen);
}

fn direction_hint(direction: Direction, swipe: &SwipeConfig, active: bool) -> Paragraph<'static> {
    let action = swipe.action_for(direction);
    let text = format!("{} {}", direction.arrow(), action.label());

    let style = if active {
        Style::default()
            .fg(BG_DARK)
            .bg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(action_color(action))
    };

    Paragraph::new(Line::from(Span::styled(text, style))).alignment(Alignment::Center)
}

/// Shifts `rect` by whole cells and clips it to `bounds`
fn offset_rect(rect: Rect, dx: i32, dy: i32, bounds: Rect) -> Option<Rect> {
    let left = (i32::from(rect.x) + dx).max(i32::from(bounds.x));
    let top = (i32::from(rect.y) + dy).max(i32::from(bounds.y));
    let right = (i32::from(rect.x) + i32::from(rect.width) + dx).min(i32::from(bounds.right()));
    let bottom =
        (i32::from(rect.y) + i32::from(rect.height) + dy).min(i32::from(bounds.bottom()));

    if right <= left || bottom <= top {
        return None;
    }

    Some(Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

fn render_card(frame: &mut Frame, stage: Rect, bounds: Rect, screen: &Screen) {
    let card = screen.card;
    let home = centered_rect(70, 80, stage);

    let (mut dx, dy) = helpers::offset_to_cells(card.display_offset());
    if card.is_shaking() {
        dx += 1;
    }

    let Some(area) = offset_rect(home, dx, dy, bounds) else {
        return;
    };

    let Some(item) = screen.current else {
        frame.render_widget(all_caught_up_widget(), area);
        return;
    };

    let border_color = if card.is_shaking() {
        ACCENT_PRIMARY
    } else {
        match card.active_direction() {
            Some(direction) => action_color(screen.swipe.action_for(direction)),
            None => BORDER_COLOR,
        }
    };

    let text_color = if card.opacity() < 0.9 {
        TEXT_DIM
    } else {
        TEXT_PRIMARY
    };

    let rotation = card.rotation_degrees();
    let tilt = if rotation >= 2.0 {
        " ↻"
    } else if rotation <= -2.0 {
        " ↺"
    } else {
        ""
    };

    let label = |name: &'static str| Span::styled(name, Style::default().fg(TEXT_SECONDARY));
    let value = |text: String| Span::styled(text, Style::default().fg(text_color));

    let playback = &screen.playback;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            item.filename.clone(),
            Style::default().fg(text_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![label("  Format:   "), value(item.format.to_uppercase())]),
        Line::from(vec![
            label("  Duration: "),
            value(format_duration(item.duration_secs)),
        ]),
        Line::from(vec![label("  Size:     "), value(format_file_size(item.size))]),
        Line::from(vec![
            label("  Path:     "),
            value(item.path.display().to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                if playback.playing {
                    "  ▶ Playing"
                } else {
                    "  ⏸ Paused"
                },
                Style::default().fg(ACCENT_HIGHLIGHT),
            ),
            Span::styled(
                format!("  {}x", playback.speed),
                Style::default().fg(TEXT_SECONDARY),
            ),
            Span::styled("   o: open in player", Style::default().fg(TEXT_SECONDARY)),
        ]),
    ];

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border_color))
                .title(format!(" {}{} ", item.filename, tilt))
                .style(Style::default().bg(BG_DARK)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(widget, area);
}

fn all_caught_up_widget() -> Paragraph<'static> {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "All caught up!",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Every clip in this folder has been sorted.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press z to undo the last decision, q to finish.",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

fn render_footer(frame: &mut Frame, area: Rect, screen: &Screen) {
    let line = match screen.toast {
        Some(toast) => {
            let color = match toast.kind {
                ToastKind::Info => ACCENT_SECONDARY,
                ToastKind::Error => ACCENT_PRIMARY,
            };
            Line::from(Span::styled(
                toast.message.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        None => Line::from(vec![
            Span::styled(
                "←↑↓→ ",
                Style::default()
                    .fg(ACCENT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("Swipe", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("  │  "),
            Span::styled("z ", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled("Undo", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("  │  "),
            Span::styled("s ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled("Settings", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("  │  "),
            Span::styled("? ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled("Help", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("  │  "),
            Span::styled("q ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled("Quit", Style::default().fg(TEXT_SECONDARY)),
        ]),
    };

    let footer = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

/// Renders the summary screen at the end
pub fn render_summary(frame: &mut Frame, summary: &SessionSummary) {
    let summary_area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, summary_area);

    let block = Block::default()
        .title(" Session Complete ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(summary_area);
    frame.render_widget(block, summary_area);

    let stats = summary.stats;
    let count_row = |marker: &'static str, name: &'static str, count: usize, color: Color| {
        Line::from(vec![
            Span::styled(marker, Style::default().fg(color)),
            Span::raw(name),
            Span::styled(
                count.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ])
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Summary",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Total clips:  "),
            Span::styled(
                stats.total.to_string(),
                Style::default()
                    .fg(ACCENT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        count_row("→ ", "Moved:    ", stats.moved, ACCENT_SECONDARY),
        count_row("✗ ", "Deleted:  ", stats.deleted, ACCENT_PRIMARY),
        count_row("○ ", "Skipped:  ", stats.skipped, TEXT_SECONDARY),
        Line::from(""),
        Line::from(vec![
            Span::styled("Time: ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw(format_duration(summary.elapsed_secs.max(0) as f64)),
        ]),
    ];

    if summary.dry_run {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Dry run: no clip was moved",
            Style::default().fg(ACCENT_PRIMARY),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to exit",
        Style::default().fg(TEXT_SECONDARY),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let help_area = centered_rect(60, 80, frame.area());
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let shortcuts: [(&str, &str); 8] = [
        ("←↑↓→ / drag", "Swipe the clip"),
        ("Space", "Play / pause"),
        ("1-5", "Speed 0.25x 0.5x 1x 1.5x 2x"),
        ("z / Ctrl+Z", "Undo last decision"),
        ("s", "Edit swipe actions"),
        ("o", "Open clip in player"),
        ("?", "Toggle help"),
        ("q / Esc", "Quit"),
    ];

    let mut help_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (keys, description) in shortcuts {
        help_lines.push(Line::from(vec![
            Span::styled(
                format!("{:>12}  ", keys),
                Style::default().fg(ACCENT_SECONDARY),
            ),
            Span::styled(format!("{:<28}", description), Style::default().fg(TEXT_PRIMARY)),
        ]));
    }

    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(TEXT_SECONDARY),
    )));

    let paragraph = Paragraph::new(help_lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Renders the swipe mapping editor
pub fn render_settings_overlay(frame: &mut Frame, form: &SettingsForm) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Swipe Actions ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "skip, delete, or a folder name (move:<folder> also works)",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
    ];

    for (index, (direction, field)) in Direction::ALL.iter().zip(&form.fields).enumerate() {
        let focused = index == form.focus;
        let marker = if focused { "▸ " } else { "  " };
        let field_style = if focused {
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(TEXT_SECONDARY)
        };
        let cursor = if focused { "▏" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled(
                format!("{} {:<6} ", direction.arrow(), direction.label()),
                Style::default().fg(ACCENT_HIGHLIGHT),
            ),
            Span::styled(format!("{}{}", field, cursor), field_style),
        ]));
    }

    lines.push(Line::from(""));
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Tab/↓ next  •  Shift+Tab/↑ previous  •  Enter save  •  Esc cancel",
        Style::default().fg(TEXT_SECONDARY),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, inner);
}

/// Renders the welcome dialog overlay
pub fn render_welcome_overlay(frame: &mut Frame, swipe: &SwipeConfig) {
    let area = centered_rect(85, 85, frame.area());
    frame.render_widget(Clear, area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let mut lines = vec![
        Line::from(""),
        heading("Welcome to Sortie!"),
        Line::from(""),
        Line::from("Sortie shows your clips one at a time. Drag the card with the mouse,"),
        Line::from("or press an arrow key, to send the clip where it belongs."),
        Line::from(""),
        heading("Your swipes:"),
        Line::from(""),
    ];

    for direction in Direction::ALL {
        let action = swipe.action_for(direction);
        let meaning = match action {
            Action::Move { target } => format!("move to {}", target),
            Action::Delete => "move to _Trash".to_string(),
            Action::Skip => "leave it where it is".to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {} {:<6}", direction.arrow(), direction.label()),
                Style::default().fg(action_color(action)),
            ),
            Span::raw(format!("  {}", meaning)),
        ]));
    }

    lines.extend([
        Line::from(""),
        heading("Safety:"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("Deleted clips go to a "),
            Span::styled("_Trash", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" folder next to them, not the void"),
        ]),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("Press "),
            Span::styled("z", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" to undo, as many times as you like"),
        ]),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("Run with "),
            Span::styled("--dry-run", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" to try it without moving anything"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to start...",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
    ]);

    let welcome = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Welcome ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
                .style(Style::default().bg(BG_DARK)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(welcome, area);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Axis::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Axis::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DecisionStatistics;
    use crate::gesture::PointerEvent;
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::PathBuf;

    fn create_test_item(name: &str) -> Item {
        Item {
            id: name.to_string(),
            path: PathBuf::from("/clips").join(name),
            filename: name.to_string(),
            size: 1536,
            duration_secs: 75.0,
            format: "mov".to_string(),
        }
    }

    fn create_test_screen<'a>(
        current: Option<&'a Item>,
        swipe: &'a SwipeConfig,
        card: &'a CardAnimator,
    ) -> Screen<'a> {
        Screen {
            view: ViewState::Browsing,
            current,
            snapshot: QueueSnapshot {
                remaining: 3,
                current_index: 0,
                processed_count: 1,
                undo_depth: 1,
            },
            swipe,
            card,
            playback: PlaybackState::default(),
            toast: None,
            settings: None,
            summary: SessionSummary {
                stats: DecisionStatistics::default(),
                elapsed_secs: 0,
                dry_run: false,
            },
        }
    }

    fn draw(screen: &Screen, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| {
                render(frame, screen);
            })
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    mod layout_tests {
        use super::*;

        #[test]
        fn test_render_card_and_header() {
            let item = create_test_item("take_07.mov");
            let swipe = SwipeConfig::default();
            let card = CardAnimator::new(800.0, 480.0);
            let screen = create_test_screen(Some(&item), &swipe, &card);

            let buffer_str = draw(&screen, 100, 30);

            assert!(buffer_str.contains("Clip 2 / 4"));
            assert!(buffer_str.contains("take_07.mov"));
            assert!(buffer_str.contains("1.50 KB"));
            assert!(buffer_str.contains("1:15"));
            assert!(buffer_str.contains("MOV"));
        }

        #[test]
        fn test_render_direction_hints() {
            let item = create_test_item("a.mp4");
            let swipe = SwipeConfig::default();
            let card = CardAnimator::new(800.0, 480.0);
            let screen = create_test_screen(Some(&item), &swipe, &card);

            let buffer_str = draw(&screen, 100, 30);

            assert!(buffer_str.contains("A-Roll"));
            assert!(buffer_str.contains("B-Roll"));
            assert!(buffer_str.contains("Skip"));
            assert!(buffer_str.contains("Delete"));
        }

        #[test]
        fn test_render_all_caught_up() {
            let swipe = SwipeConfig::default();
            let card = CardAnimator::new(800.0, 480.0);
            let mut screen = create_test_screen(None, &swipe, &card);
            screen.snapshot = QueueSnapshot {
                remaining: 0,
                current_index: 0,
                processed_count: 3,
                undo_depth: 3,
            };

            let buffer_str = draw(&screen, 100, 30);

            assert!(buffer_str.contains("All caught up"));
            assert!(buffer_str.contains("100%"));
        }

        #[test]
        fn test_render_toast_replaces_controls() {
            let item = create_test_item("a.mp4");
            let swipe = SwipeConfig::default();
            let card = CardAnimator::new(800.0, 480.0);
            let toast = Toast {
                message: "Failed to process clip: disk full".to_string(),
                kind: ToastKind::Error,
                expires_at: std::time::Instant::now(),
            };
            let mut screen = create_test_screen(Some(&item), &swipe, &card);

            let buffer_str = draw(&screen, 100, 30);
            assert!(buffer_str.contains("Settings"));

            screen.toast = Some(&toast);
            let buffer_str = draw(&screen, 100, 30);
            assert!(buffer_str.contains("disk full"));
        }

        #[test]
        fn test_dragged_card_stays_in_bounds() {
            let item = create_test_item("a.mp4");
            let swipe = SwipeConfig::default();
            let mut card = CardAnimator::new(800.0, 240.0);
            card.pointer_down(PointerEvent::primary(1, 0.0, 0.0));
            card.pointer_move(PointerEvent::primary(1, 5000.0, 0.0));
            let screen = create_test_screen(Some(&item), &swipe, &card);

            // Rendering must not panic even with the card far off-screen
            let buffer_str = draw(&screen, 80, 24);
            assert!(buffer_str.contains("Clip 2 / 4"));
        }

        #[test]
        fn test_offset_rect_clips() {
            let bounds = Rect::new(0, 0, 80, 20);
            let rect = Rect::new(20, 5, 40, 10);

            assert_eq!(offset_rect(rect, 0, 0, bounds), Some(rect));
            assert_eq!(
                offset_rect(rect, 30, 0, bounds),
                Some(Rect::new(50, 5, 30, 10))
            );
            assert_eq!(
                offset_rect(rect, -25, -8, bounds),
                Some(Rect::new(0, 0, 35, 7))
            );
            assert_eq!(offset_rect(rect, 100, 0, bounds), None);
        }
    }

    mod overlay_tests {
        use super::*;

        #[test]
        fn test_render_help_overlay() {
            let swipe = SwipeConfig::default();
            let card = CardAnimator::new(800.0, 480.0);
            let mut screen = create_test_screen(None, &swipe, &card);
            screen.view = ViewState::Help;

            let buffer_str = draw(&screen, 100, 34);

            assert!(buffer_str.contains("Keyboard Shortcuts"));
            assert!(buffer_str.contains("Undo last decision"));
            assert!(buffer_str.contains("Play / pause"));
        }

        #[test]
        fn test_render_settings_overlay() {
            let swipe = SwipeConfig::default();
            let card = CardAnimator::new(800.0, 480.0);
            let mut form = SettingsForm::from_swipe(&swipe);
            form.error = Some("Up needs an action or a folder name".to_string());
            let mut screen = create_test_screen(None, &swipe, &card);
            screen.view = ViewState::Settings;
            screen.settings = Some(&form);

            let buffer_str = draw(&screen, 120, 34);

            assert!(buffer_str.contains("Swipe Actions"));
            assert!(buffer_str.contains("A-Roll"));
            assert!(buffer_str.contains("needs an action"));
        }

        #[test]
        fn test_render_summary() {
            let swipe = SwipeConfig::default();
            let card = CardAnimator::new(800.0, 480.0);
            let mut screen = create_test_screen(None, &swipe, &card);
            screen.view = ViewState::Summary;
            screen.summary = SessionSummary {
                stats: DecisionStatistics {
                    total: 10,
                    moved: 6,
                    deleted: 3,
                    skipped: 1,
                },
                elapsed_secs: 125,
                dry_run: true,
            };

            let buffer_str = draw(&screen, 100, 34);

            assert!(buffer_str.contains("Session Complete"));
            assert!(buffer_str.contains("Moved:"));
            assert!(buffer_str.contains("2:05"));
            assert!(buffer_str.contains("Dry run"));
        }

        #[test]
        fn test_render_welcome() {
            let swipe = SwipeConfig::default();
            let card = CardAnimator::new(800.0, 480.0);
            let mut screen = create_test_screen(None, &swipe, &card);
            screen.view = ViewState::Welcome;

            let buffer_str = draw(&screen, 110, 36);

            assert!(buffer_str.contains("Welcome to Sortie"));
            assert!(buffer_str.contains("move to A-Roll"));
        }
    }
}
