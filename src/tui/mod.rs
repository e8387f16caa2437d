// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Interactive demo host for the engine: a compose field with live shortcode
//! suggestions, a feed pane showing the rendered document, and a catalog listing
//! with copy-to-clipboard. The shell routes keys to the engine first; unconsumed
//! keys edit the compose buffer.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use smol_str::SmolStr;

use crate::engine::{Engine, Key, EMOJI_CLASS};
use crate::model::{Catalog, Document, NodeId, Settings};
use crate::resolve::resolve;

const FOCUS_COLOR: Color = Color::LightGreen;
const EMOJI_COLOR: Color = Color::LightMagenta;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const SUGGESTION_MAX_WIDTH: u16 = 32;

/// Runs the interactive terminal UI against the built-in demo catalog.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    run_with(demo_catalog(), Settings::default())
}

pub fn run_with(catalog: Catalog, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(catalog, settings);

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}

/// A small built-in catalog exercising every entry shape: terminal URLs, an
/// alias chain, a bare-name reference, and a cycle that must stay invisible.
pub fn demo_catalog() -> Catalog {
    [
        ("part", "http://emoji.test/part.png"),
        ("party", "http://emoji.test/party.png"),
        ("partyparrot", "http://emoji.test/partyparrot.gif"),
        ("sparkle", "http://emoji.test/sparkle.png"),
        ("shipit", "http://emoji.test/shipit.png"),
        ("ship", "alias:shipit"),
        ("squirrel", "ship"),
        ("tumbleweed", "alias:sagebrush"),
        ("sagebrush", "alias:tumbleweed"),
    ]
    .into_iter()
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Compose,
    Listing,
}

struct App {
    doc: Document,
    engine: Engine,
    field: NodeId,
    feed: NodeId,
    focus: Focus,
    listing_filter: String,
    listing_state: ListState,
    toast: Option<String>,
    should_quit: bool,
}

impl App {
    fn new(catalog: Catalog, settings: Settings) -> Self {
        let mut doc = Document::new();
        let feed = doc.create_element("div");
        let root = doc.root();
        doc.append_child(root, feed);
        let welcome = doc.create_text("welcome! try :sparkle: or type ':' below");
        let message = doc.create_element("p");
        doc.append_child(feed, message);
        doc.append_child(message, welcome);

        let field = doc.create_input("textarea");
        doc.append_child(root, field);

        let mut engine = Engine::new(catalog);
        engine.document_ready(&mut doc);
        if !settings.enabled {
            engine.set_enabled(&mut doc, false);
        }

        let mut listing_state = ListState::default();
        listing_state.select(Some(0));

        Self {
            doc,
            engine,
            field,
            feed,
            focus: Focus::Compose,
            listing_filter: String::new(),
            listing_state,
            toast: None,
            should_quit: false,
        }
    }

    fn compose_value(&self) -> String {
        self.doc
            .input(self.field)
            .map(|input| input.value.clone())
            .unwrap_or_default()
    }

    fn compose_caret(&self) -> usize {
        self.doc.input(self.field).map(|input| input.caret).unwrap_or(0)
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(message.into());
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('c') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('e') => {
                    let enabled = !self.engine.enabled();
                    self.engine.set_enabled(&mut self.doc, enabled);
                    self.set_toast(if enabled {
                        "emoji rendering on"
                    } else {
                        "emoji rendering off"
                    });
                    return;
                }
                _ => return,
            }
        }

        match self.focus {
            Focus::Compose => self.handle_compose_key(key.code),
            Focus::Listing => self.handle_listing_key(key.code),
        }
    }

    fn handle_compose_key(&mut self, code: KeyCode) {
        if self.engine.session().is_some() {
            let engine_key = match code {
                KeyCode::Down => Some(Key::Down),
                KeyCode::Up => Some(Key::Up),
                KeyCode::Enter => Some(Key::Enter),
                KeyCode::Tab => Some(Key::Tab),
                KeyCode::Esc => Some(Key::Escape),
                _ => None,
            };
            if let Some(engine_key) = engine_key {
                let outcome = self.engine.key_pressed(&mut self.doc, engine_key);
                if outcome.consumed {
                    if outcome.committed.is_some() {
                        // The commit's synthesized change notification.
                        self.engine.input_settled(&mut self.doc, self.field);
                    }
                    return;
                }
            }
        }

        match code {
            KeyCode::Char(ch) => self.insert_char(ch),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Left => self.move_caret(-1),
            KeyCode::Right => self.move_caret(1),
            KeyCode::Enter => self.post_message(),
            KeyCode::Tab => {
                self.focus = Focus::Listing;
                self.listing_state.select(Some(0));
            }
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_listing_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Tab | KeyCode::Esc => self.focus = Focus::Compose,
            KeyCode::Down => self.move_listing_selection(1),
            KeyCode::Up => self.move_listing_selection(-1),
            KeyCode::Enter => self.copy_selected_shortcode(),
            KeyCode::Char(ch) => {
                self.listing_filter.push(ch);
                self.listing_state.select(Some(0));
            }
            KeyCode::Backspace => {
                self.listing_filter.pop();
                self.listing_state.select(Some(0));
            }
            _ => {}
        }
    }

    fn insert_char(&mut self, ch: char) {
        let value = self.compose_value();
        let caret = self.compose_caret();
        let at = byte_offset(&value, caret);
        let mut next = value;
        next.insert(at, ch);
        self.doc.set_input(self.field, next, caret + 1);
        self.engine.input_settled(&mut self.doc, self.field);
    }

    fn backspace(&mut self) {
        let value = self.compose_value();
        let caret = self.compose_caret();
        if caret == 0 {
            return;
        }
        let start = byte_offset(&value, caret - 1);
        let end = byte_offset(&value, caret);
        let mut next = value;
        next.replace_range(start..end, "");
        self.doc.set_input(self.field, next, caret - 1);
        self.engine.input_settled(&mut self.doc, self.field);
    }

    fn move_caret(&mut self, delta: i64) {
        let value = self.compose_value();
        let len = value.chars().count() as i64;
        let caret = (self.compose_caret() as i64 + delta).clamp(0, len) as usize;
        self.doc.set_input(self.field, value, caret);
        // Caret movement re-evaluates the session: leaving the pattern closes it.
        self.engine.input_settled(&mut self.doc, self.field);
    }

    fn post_message(&mut self) {
        let value = self.compose_value();
        if value.trim().is_empty() {
            return;
        }

        let message = self.doc.create_element("p");
        let text = self.doc.create_text(value);
        self.doc.append_child(self.feed, message);
        self.doc.append_child(message, text);
        self.engine.nodes_added(&mut self.doc, &[message]);

        self.doc.set_input(self.field, "", 0);
        self.engine.input_settled(&mut self.doc, self.field);
    }

    /// Resolvable catalog entries matching the listing filter, catalog order.
    fn listing_entries(&self) -> Vec<(SmolStr, String)> {
        let filter = self.listing_filter.to_lowercase();
        self.engine
            .resolvable_names()
            .into_iter()
            .filter(|name| filter.is_empty() || name.to_lowercase().contains(&filter))
            .filter_map(|name| {
                resolve(&name, self.engine.catalog()).map(|url| (name, url.to_owned()))
            })
            .collect()
    }

    fn move_listing_selection(&mut self, delta: i64) {
        let count = self.listing_entries().len();
        if count == 0 {
            return;
        }
        let current = self.listing_state.selected().unwrap_or(0) as i64;
        let next = (current + delta).rem_euclid(count as i64) as usize;
        self.listing_state.select(Some(next));
    }

    fn copy_selected_shortcode(&mut self) {
        let entries = self.listing_entries();
        let Some(selected) = self.listing_state.selected() else {
            return;
        };
        let Some((name, _)) = entries.get(selected) else {
            return;
        };

        let token = format!(":{name}:");
        match copy_to_clipboard(&token) {
            Ok(_) => self.set_toast(format!("copied {token}")),
            Err(err) => self.set_toast(format!("copy failed: {err}")),
        }
    }

    /// One feed message as styled spans; inline images render as their alt token.
    fn message_line(&self, message: NodeId) -> Line<'static> {
        let mut spans = Vec::new();
        for node in self.doc.descendants(message) {
            if let Some(text) = self.doc.text(node) {
                spans.push(Span::raw(text.to_owned()));
            } else if self.doc.has_class(node, EMOJI_CLASS) {
                let alt = self.doc.attr(node, "alt").unwrap_or_default().to_owned();
                spans.push(Span::styled(alt, Style::default().fg(EMOJI_COLOR)));
            }
        }
        Line::from(spans)
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(at, _)| at)
        .unwrap_or(text.len())
}

fn draw(frame: &mut Frame, app: &mut App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.size());
    let (main_area, compose_area, footer_area) = (layout[0], layout[1], layout[2]);

    match app.focus {
        Focus::Compose => draw_feed(frame, app, main_area),
        Focus::Listing => draw_listing(frame, app, main_area),
    }
    draw_compose(frame, app, compose_area);
    frame.render_widget(Paragraph::new(footer_line(app)), footer_area);

    if app.focus == Focus::Compose {
        draw_suggestions(frame, app, compose_area);
    }
}

fn draw_feed(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .doc
        .children(app.feed)
        .iter()
        .map(|&message| app.message_line(message))
        .collect();
    let feed = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Feed"));
    frame.render_widget(feed, area);
}

fn draw_listing(frame: &mut Frame, app: &mut App, area: Rect) {
    let entries = app.listing_entries();
    let items: Vec<ListItem> = entries
        .iter()
        .map(|(name, url)| ListItem::new(format!(":{name}:  {url}")))
        .collect();

    let title = if app.listing_filter.is_empty() {
        format!("Emojis ({})", entries.len())
    } else {
        format!("Emojis ({}) /{}", entries.len(), app.listing_filter)
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(FOCUS_COLOR)),
        )
        .highlight_style(Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut app.listing_state);
}

fn draw_compose(frame: &mut Frame, app: &App, area: Rect) {
    let style = if app.focus == Focus::Compose {
        Style::default().fg(FOCUS_COLOR)
    } else {
        Style::default()
    };
    let compose = Paragraph::new(app.compose_value())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Compose")
                .border_style(style),
        );
    frame.render_widget(compose, area);

    if app.focus == Focus::Compose {
        let column = (app.compose_caret() as u16).min(area.width.saturating_sub(2));
        frame.set_cursor(area.x + 1 + column, area.y + 1);
    }
}

/// Suggestion popup anchored at the caret column, floating above the compose
/// box: cleared background, selected row reversed.
fn draw_suggestions(frame: &mut Frame, app: &App, compose_area: Rect) {
    let Some(session) = app.engine.session() else {
        return;
    };
    let items = session.items();
    if items.is_empty() {
        return;
    }

    let width = items
        .iter()
        .map(|name| name.chars().count() as u16 + 4)
        .max()
        .unwrap_or(8)
        .min(SUGGESTION_MAX_WIDTH);
    let height = (items.len() as u16).saturating_add(2);
    let column = (app.compose_caret() as u16).min(compose_area.width.saturating_sub(width));
    let y = compose_area.y.saturating_sub(height);

    let popup = Rect {
        x: compose_area.x + 1 + column,
        y,
        width,
        height,
    }
    .intersection(frame.size());

    let rows: Vec<ListItem> = items
        .iter()
        .map(|name| ListItem::new(format!(":{name}:")))
        .collect();
    let mut state = ListState::default();
    state.select(Some(session.selected()));

    frame.render_widget(Clear, popup);
    let list = List::new(rows)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, popup, &mut state);
}

fn footer_line(app: &App) -> Line<'static> {
    let mut spans = vec![
        Span::styled("^Q", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::styled(" quit  ", Style::default().fg(FOOTER_LABEL_COLOR)),
        Span::styled("^E", Style::default().fg(FOOTER_KEY_COLOR)),
        Span::styled(
            if app.engine.enabled() {
                " emoji off  "
            } else {
                " emoji on  "
            },
            Style::default().fg(FOOTER_LABEL_COLOR),
        ),
        Span::styled("Tab", Style::default().fg(FOOTER_KEY_COLOR)),
    ];
    spans.push(Span::styled(
        match app.focus {
            Focus::Compose => " emoji list  ",
            Focus::Listing => " compose  ",
        },
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    if app.focus == Focus::Listing {
        spans.push(Span::styled("Enter", Style::default().fg(FOOTER_KEY_COLOR)));
        spans.push(Span::styled(
            " copy shortcode  ",
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    if let Some(toast) = &app.toast {
        spans.push(Span::styled(
            format!("· {toast}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

fn copy_to_clipboard(text: &str) -> Result<&'static str, String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text))).map_err(|err| err.to_string())?;
    Ok("osc52")
}

fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, io::Error> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<(), io::Error> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}
