//! Interactive task list view.
//!
//! One full-screen view with three regions:
//! - Composer input for new tasks (placeholder while empty)
//! - Task rows with a `[x]`/`[ ]` checkbox, text, and delete action
//! - Footer with the remaining-count summary and key hints
//!
//! Key bindings: `a`/`i` focus the composer, Enter submits, Esc returns to
//! the list, `j`/`k` or arrows move, Space/Enter toggles, `d`/Delete
//! deletes, `q` quits.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use ticklist_core::{SnapshotRepository, TaskStore};

const TAGLINE: &str = "Add, check, delete.";
const COMPOSER_PLACEHOLDER: &str = "What needs doing?";

/// Which region receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputMode {
    /// Keys navigate and mutate the task list.
    #[default]
    List,
    /// Keys edit the composer buffer.
    Compose,
}

/// Application state for the task list view.
pub struct App<R: SnapshotRepository> {
    store: TaskStore<R>,
    input_mode: InputMode,
    /// Composer buffer being typed.
    compose_buf: String,
    /// Cursor position in `compose_buf`, in chars.
    compose_cursor: usize,
    /// List navigation state (selected row index).
    list_state: ListState,
    should_quit: bool,
}

impl<R: SnapshotRepository> App<R> {
    pub fn new(store: TaskStore<R>) -> Self {
        let mut list_state = ListState::default();
        if !store.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            store,
            input_mode: InputMode::default(),
            compose_buf: String::new(),
            compose_cursor: 0,
            list_state,
            should_quit: false,
        }
    }

    // -----------------------------------------------------------------------
    // Key event handling
    // -----------------------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.input_mode {
            InputMode::List => self.handle_list_key(key),
            InputMode::Compose => self.handle_compose_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,

            KeyCode::Char('a') | KeyCode::Char('i') => {
                self.input_mode = InputMode::Compose;
            }

            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('g') | KeyCode::Home => self.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.select_last(),

            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),

            _ => {}
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::List;
            }
            KeyCode::Enter => self.submit_compose(),
            KeyCode::Left => self.compose_cursor = self.compose_cursor.saturating_sub(1),
            KeyCode::Right => {
                self.compose_cursor = (self.compose_cursor + 1).min(char_len(&self.compose_buf));
            }
            KeyCode::Home => self.compose_cursor = 0,
            KeyCode::End => self.compose_cursor = char_len(&self.compose_buf),
            KeyCode::Backspace => {
                if self.compose_cursor > 0 {
                    let remove_idx = self.compose_cursor - 1;
                    remove_char_at(&mut self.compose_buf, remove_idx);
                    self.compose_cursor = remove_idx;
                }
            }
            KeyCode::Delete => {
                remove_char_at(&mut self.compose_buf, self.compose_cursor);
            }
            KeyCode::Char(c) => {
                insert_char_at(&mut self.compose_buf, self.compose_cursor, c);
                self.compose_cursor += 1;
            }
            _ => {}
        }
    }

    /// Submits the composer buffer.
    ///
    /// On success the buffer clears, the composer stays focused, and the
    /// selection moves to the new row. Blank input leaves the buffer as
    /// typed so nothing is silently discarded from under the cursor.
    fn submit_compose(&mut self) {
        if self.store.add(&self.compose_buf).is_some() {
            self.compose_buf.clear();
            self.compose_cursor = 0;
            self.list_state.select(Some(0));
        }
    }

    // -----------------------------------------------------------------------
    // Selection and mutations
    // -----------------------------------------------------------------------

    fn select_next(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let i = self
            .list_state
            .selected()
            .map_or(0, |i| if i + 1 >= len { len - 1 } else { i + 1 });
        self.list_state.select(Some(i));
    }

    fn select_prev(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let i = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(i));
    }

    fn select_first(&mut self) {
        if !self.store.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        let len = self.store.len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self
            .list_state
            .selected()
            .and_then(|i| self.store.tasks().get(i))
            .map(|task| task.id.clone())
        else {
            return;
        };
        self.store.toggle(&id);
    }

    fn delete_selected(&mut self) {
        let Some(id) = self
            .list_state
            .selected()
            .and_then(|i| self.store.tasks().get(i))
            .map(|task| task.id.clone())
        else {
            return;
        };
        self.store.delete(&id);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.store.len();
        match self.list_state.selected() {
            Some(_) if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            None if len > 0 => self.list_state.select(Some(0)),
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn render(&mut self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.render_composer(frame, chunks[1]);
        self.render_list(frame, chunks[2]);
        self.render_footer(frame, chunks[3]);
    }

    fn render_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = Line::from(vec![
            Span::styled("TickList", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(" v{}", ticklist_core::core_version()),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]);
        let tagline = Line::from(Span::styled(
            TAGLINE,
            Style::default().add_modifier(Modifier::DIM),
        ));
        frame.render_widget(Paragraph::new(vec![title, tagline]), area);
    }

    fn render_composer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let focused = self.input_mode == InputMode::Compose;

        let content = if focused {
            Line::from(with_cursor(&self.compose_buf, self.compose_cursor))
        } else if self.compose_buf.is_empty() {
            Line::from(Span::styled(
                COMPOSER_PLACEHOLDER,
                Style::default().add_modifier(Modifier::DIM),
            ))
        } else {
            Line::from(self.compose_buf.as_str())
        };

        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("New task");
        frame.render_widget(Paragraph::new(content).block(block), area);
    }

    fn render_list(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem<'_>> = self
            .store
            .tasks()
            .iter()
            .map(|task| {
                let checkbox = if task.done { "[x] " } else { "[ ] " };
                let text_style = if task.done {
                    Style::default().add_modifier(Modifier::CROSSED_OUT | Modifier::DIM)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::raw(checkbox),
                    Span::styled(task.text.clone(), text_style),
                ]))
            })
            .collect();

        let highlight_style = if self.input_mode == InputMode::List {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Tasks"))
            .highlight_style(highlight_style)
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let hints = match self.input_mode {
            InputMode::List => "a add · space toggle · d delete · q quit",
            InputMode::Compose => "enter add · esc back",
        };
        let footer = Line::from(vec![
            Span::raw(self.store.remaining_label()),
            Span::styled(
                format!("   {hints}"),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]);
        frame.render_widget(Paragraph::new(footer), area);
    }
}

// ---------------------------------------------------------------------------
// Terminal lifecycle
// ---------------------------------------------------------------------------

/// Runs the task list view until the user quits.
///
/// Sets up raw mode and the alternate screen, installs a panic hook that
/// restores the terminal, and drives the synchronous event loop.
pub fn run<R: SnapshotRepository>(store: TaskStore<R>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(store);
    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<R: SnapshotRepository>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<R>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| app.render(frame))?;

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

// ---------------------------------------------------------------------------
// Single-line editing helpers
// ---------------------------------------------------------------------------

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    value
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}

fn insert_char_at(value: &mut String, char_idx: usize, ch: char) {
    let idx = byte_index_at_char(value, char_idx);
    value.insert(idx, ch);
}

fn remove_char_at(value: &mut String, char_idx: usize) {
    if char_idx >= char_len(value) {
        return;
    }
    let start = byte_index_at_char(value, char_idx);
    let end = byte_index_at_char(value, char_idx + 1);
    value.replace_range(start..end, "");
}

fn with_cursor(value: &str, char_idx: usize) -> String {
    let mut out = String::new();
    let mut inserted = false;
    for (idx, ch) in value.chars().enumerate() {
        if idx == char_idx {
            out.push('█');
            inserted = true;
        }
        out.push(ch);
    }
    if !inserted {
        out.push('█');
    }
    out
}
