// src/ui.rs

use crate::app::App;
use crate::chat::{ChatMessage, Role};
use crate::render::{self, JobCard, RenderNode};
use crate::suggestions::{SEARCH_TIPS, SUGGESTIONS};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

enum Event {
    Input(CEvent),
    Tick,
}

/// Runs the terminal UI until the user quits.
pub async fn run_ui(app: App) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel::<Event>(100);

    // Input reader + ticker. Ticks drive the spinner, the visual timeout
    // and the draining of finished rounds.
    tokio::spawn(async move {
        let mut last_tick = Instant::now();
        loop {
            let timeout = Duration::from_millis(100);
            if event::poll(timeout).unwrap_or(false) {
                if let Ok(event) = event::read() {
                    if tx.send(Event::Input(event)).await.is_err() {
                        return;
                    }
                }
            }

            if last_tick.elapsed() >= Duration::from_millis(250) {
                if tx.send(Event::Tick).await.is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });

    loop {
        terminal.draw(|f| draw(f, &mut app))?;

        if let Some(event) = rx.recv().await {
            match event {
                Event::Input(event) => handle_input(event, &mut app),
                Event::Tick => {
                    app.session.pump();
                    app.update_spinner_animation();
                }
            }
        } else {
            break;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_input(event: CEvent, app: &mut App) {
    if let CEvent::Key(key) = event {
        match key.code {
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.dismiss_tips();
            }
            // Chord presses are commands, not text.
            KeyCode::Char(c)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                app.input.push(c);
            }
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Tab => {
                app.next_suggestion();
            }
            KeyCode::Up => app.scroll_up(),
            KeyCode::Down => app.scroll_down(),
            KeyCode::Enter => {
                // Rejections (blank input, round still pending) are silent;
                // the timeline stays as-is.
                let _ = app.submit();
            }
            KeyCode::Esc => {
                app.should_quit = true;
            }
            _ => {}
        }
    }
}

fn draw(f: &mut Frame, app: &mut App) {
    let tips_height = if app.tips_visible() {
        SEARCH_TIPS.len() as u16 + 2
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Min(1),               // timeline
                Constraint::Length(tips_height),  // tips panel
                Constraint::Length(1),            // suggestion chips
                Constraint::Length(1),            // typing indicator
                Constraint::Length(3),            // input box
            ]
            .as_ref(),
        )
        .split(f.area());

    draw_messages(f, app, chunks[0]);
    if app.tips_visible() {
        draw_tips(f, chunks[1]);
    }
    draw_suggestions(f, app, chunks[2]);
    draw_indicator(f, app, chunks[3]);
    draw_input(f, app, chunks[4]);
}

fn draw_messages(f: &mut Frame, app: &mut App, area: Rect) {
    let mut lines = Vec::new();
    for message in app.session.store().messages() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(message_lines(message, area));
    }

    let total_lines = lines.len() as u16;
    let max_scroll = total_lines.saturating_sub(area.height);
    let scroll = app.clamp_scroll(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Job Search Assistant "))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph.scroll((scroll, 0)), area);
}

/// Renders one message's tree into styled terminal lines.
fn message_lines(message: &ChatMessage, area: Rect) -> Vec<Line<'static>> {
    let base_style = match message.role {
        Role::User => Style::default().fg(Color::Rgb(255, 223, 128)),
        Role::Assistant => Style::default().fg(Color::Rgb(144, 238, 144)),
    };
    let who = match message.role {
        Role::User => "You",
        Role::Assistant => "Assistant",
    };

    let mut lines = vec![Line::from(vec![
        Span::styled("┌─ ".to_string(), base_style),
        Span::styled(who.to_string(), base_style.add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(" {}", message.timestamp.format("%H:%M")),
            base_style.add_modifier(Modifier::DIM),
        ),
    ])];

    let tree = render::render(message);
    let wrap_width = (area.width as usize).saturating_sub(4);

    push_node_lines(&mut lines, &tree.preamble, base_style, wrap_width);
    for card in &tree.cards {
        lines.extend(card_lines(card, base_style));
    }
    push_node_lines(&mut lines, &tree.epilogue, base_style, wrap_width);

    lines.push(Line::from(Span::styled("╰─".to_string(), base_style)));
    lines
}

/// Flattens render nodes into gutter-prefixed lines. Pure-text runs are
/// wrapped here; runs with inline styling keep their spans and overflow is
/// left to the paragraph wrap.
fn push_node_lines(
    lines: &mut Vec<Line<'static>>,
    nodes: &[RenderNode],
    style: Style,
    wrap_width: usize,
) {
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut plain = true;

    for node in nodes {
        match node {
            RenderNode::LineBreak => {
                flush_line(lines, &mut current, plain, style, wrap_width);
                plain = true;
            }
            RenderNode::Text(text) => {
                current.push(Span::styled(text.clone(), style));
            }
            RenderNode::Bold(text) => {
                plain = false;
                current.push(Span::styled(
                    text.clone(),
                    style.add_modifier(Modifier::BOLD),
                ));
            }
            RenderNode::Link { label, url } => {
                plain = false;
                current.push(Span::styled(
                    label.clone(),
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::UNDERLINED),
                ));
                current.push(Span::styled(
                    format!(" ({})", url),
                    style.add_modifier(Modifier::DIM),
                ));
            }
            RenderNode::Heading(text) => {
                flush_line(lines, &mut current, plain, style, wrap_width);
                plain = true;
                lines.push(Line::from(vec![
                    Span::styled("│ ".to_string(), style),
                    Span::styled(
                        text.clone(),
                        style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    ),
                ]));
            }
        }
    }

    flush_line(lines, &mut current, plain, style, wrap_width);
}

fn flush_line(
    lines: &mut Vec<Line<'static>>,
    current: &mut Vec<Span<'static>>,
    plain: bool,
    style: Style,
    wrap_width: usize,
) {
    if current.is_empty() {
        return;
    }

    if plain {
        let text: String = current.iter().map(|s| s.content.as_ref()).collect();
        for wrapped in textwrap::wrap(&text, wrap_width.max(1)) {
            lines.push(Line::from(vec![
                Span::styled("│ ".to_string(), style),
                Span::styled(wrapped.to_string(), style),
            ]));
        }
        current.clear();
    } else {
        let mut spans = vec![Span::styled("│ ".to_string(), style)];
        spans.append(current);
        lines.push(Line::from(spans));
    }
}

/// One job posting as a boxed card in the timeline.
fn card_lines(card: &JobCard, style: Style) -> Vec<Line<'static>> {
    let accent = Style::default().fg(Color::Cyan);
    let mut lines = vec![Line::from(vec![
        Span::styled("│ ".to_string(), style),
        Span::styled(card.title.clone(), accent.add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {}", card.company), style),
    ])];

    let mut badges: Vec<String> = Vec::new();
    if let Some(location) = &card.location {
        badges.push(format!("📍 {}", location));
    }
    if let Some(job_type) = &card.job_type {
        badges.push(format!("💼 {}", job_type));
    }
    if let Some(date) = &card.posting_date {
        badges.push(format!("🗓 {}", date));
    }
    if let Some(salary) = &card.salary_range {
        badges.push(format!("💰 {}", salary));
    }
    if !badges.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("│   ".to_string(), style),
            Span::styled(badges.join("  "), style.add_modifier(Modifier::DIM)),
        ]));
    }

    if card.women_friendly {
        lines.push(Line::from(vec![
            Span::styled("│   ".to_string(), style),
            Span::styled(
                "✓ Women-friendly workplace".to_string(),
                Style::default().fg(Color::Green),
            ),
        ]));
    }

    if !card.skills.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("│   ".to_string(), style),
            Span::styled(
                format!("Skills: {}", card.skills.join(", ")),
                style.add_modifier(Modifier::DIM),
            ),
        ]));
    }

    lines.push(Line::from(vec![
        Span::styled("│   ".to_string(), style),
        Span::styled(
            "Apply → ".to_string(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            card.apply_url.clone(),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        ),
    ]));

    lines
}

fn draw_tips(f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = SEARCH_TIPS
        .iter()
        .map(|tip| {
            Line::from(vec![
                Span::styled("• ", Style::default().fg(Color::Blue)),
                Span::raw(*tip),
            ])
        })
        .collect();

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search Tips (ctrl-t to dismiss) "),
    );
    f.render_widget(panel, area);
}

fn draw_suggestions(f: &mut Frame, app: &App, area: Rect) {
    use unicode_width::UnicodeWidthStr;

    let mut spans = Vec::new();
    let mut used = 0usize;
    for (idx, suggestion) in SUGGESTIONS.iter().enumerate() {
        let chip = format!(" {} ", suggestion);
        let width = chip.width() + 1;
        if used + width > area.width as usize {
            break;
        }
        used += width;

        let style = if idx == app.selected_suggestion {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::styled(chip, style));
        spans.push(Span::raw(" "));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_indicator(f: &mut Frame, app: &App, area: Rect) {
    let indicator = app.session.indicator();
    let line = if indicator.is_pending() {
        Line::from(vec![
            Span::styled(indicator.spinner_frame(), Style::default().fg(Color::Gray)),
            Span::styled(" Thinking...", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Ask about job opportunities (Esc quits, Tab cycles chips) "),
        );
    f.render_widget(input, area);
    f.set_cursor_position((
        area.x + 1 + input_cursor_offset(&app.input, area.width),
        area.y + 1,
    ));
}

/// Column offset of the cursor inside the input box: the display width of
/// the typed text, clamped so long input cannot walk the cursor onto the
/// border.
fn input_cursor_offset(input: &str, box_width: u16) -> u16 {
    use unicode_width::UnicodeWidthStr;
    (input.width() as u16).min(box_width.saturating_sub(3))
}
