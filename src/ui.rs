use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use tokio::runtime::Runtime;

use crate::client::ApiClient;
use crate::models::CardColor;
use crate::sync::SyncController;

pub struct App {
    rt: Runtime,
    controller: SyncController<ApiClient>,
    pub list_state: ListState,
    pub input_active: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: SyncController<ApiClient>, rt: Runtime) -> Result<Self> {
        let mut app = App {
            rt,
            controller,
            list_state: ListState::default(),
            input_active: false,
            should_quit: false,
        };
        // Initial mount: fetch the list before the first draw.
        app.rt.block_on(app.controller.refresh())?;
        app.clamp_selection();
        Ok(app)
    }

    pub fn refresh(&mut self) {
        if let Err(err) = self.rt.block_on(self.controller.refresh()) {
            log::warn!("List refresh failed: {:#}", err);
        }
        self.clamp_selection();
    }

    pub fn submit(&mut self) {
        if let Err(err) = self.rt.block_on(self.controller.submit()) {
            log::warn!("Create failed: {:#}", err);
        }
        self.input_active = false;
        self.clamp_selection();
    }

    pub fn mark_done_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        if let Err(err) = self.rt.block_on(self.controller.mark_done(&id)) {
            log::warn!("Mark done failed: {:#}", err);
        }
        self.clamp_selection();
    }

    pub fn undo_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        if let Err(err) = self.rt.block_on(self.controller.undo(&id)) {
            log::warn!("Undo failed: {:#}", err);
        }
        self.clamp_selection();
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        if let Err(err) = self.rt.block_on(self.controller.delete(&id)) {
            log::warn!("Delete failed: {:#}", err);
        }
        self.clamp_selection();
    }

    pub fn next_item(&mut self) {
        let len = self.controller.cards().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous_item(&mut self) {
        let len = self.controller.cards().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn selected_id(&self) -> Option<String> {
        self.list_state
            .selected()
            .and_then(|i| self.controller.cards().get(i))
            .map(|card| card.id.clone())
    }

    fn clamp_selection(&mut self) {
        let len = self.controller.cards().len();
        match self.list_state.selected() {
            Some(_) if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            None if len > 0 => self.list_state.select(Some(0)),
            _ => {}
        }
    }

    pub fn handle_input_char(&mut self, c: char) {
        self.controller.push_input(c);
    }

    pub fn handle_backspace(&mut self) {
        self.controller.pop_input();
    }
}

pub fn run_tui(controller: SyncController<ApiClient>, rt: Runtime) -> Result<()> {
    let mut app = App::new(controller, rt)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                if app.input_active {
                    match key.code {
                        KeyCode::Esc => {
                            app.input_active = false;
                        }
                        KeyCode::Enter => {
                            app.submit();
                        }
                        KeyCode::Backspace => {
                            app.handle_backspace();
                        }
                        KeyCode::Char(c) => {
                            app.handle_input_char(c);
                        }
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Char('q') => {
                            app.should_quit = true;
                        }
                        KeyCode::Char('a') => {
                            app.input_active = true;
                        }
                        KeyCode::Down => {
                            app.next_item();
                        }
                        KeyCode::Up => {
                            app.previous_item();
                        }
                        KeyCode::Char('d') => {
                            app.mark_done_selected();
                        }
                        KeyCode::Char('u') => {
                            app.undo_selected();
                        }
                        KeyCode::Char('x') | KeyCode::Delete => {
                            app.delete_selected();
                        }
                        KeyCode::Char('r') => {
                            app.refresh();
                        }
                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let input_style = if app.input_active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input_text = if app.input_active {
        format!("{}█", app.controller.input())
    } else {
        app.controller.input().to_string()
    };
    let input = Paragraph::new(input_text).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Create Task")
            .border_style(input_style),
    );
    f.render_widget(input, chunks[0]);

    let cards: Vec<ListItem> = app
        .controller
        .cards()
        .iter()
        .map(|card| {
            let color = match card.color {
                CardColor::Green => Color::Green,
                CardColor::Yellow => Color::Yellow,
            };
            ListItem::new(vec![Line::from(vec![
                Span::styled(
                    format!("{} ", card.title),
                    Style::default().fg(color),
                ),
                Span::styled(
                    format!("[{}]", card.color.name()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])])
        })
        .collect();

    let card_list = List::new(cards)
        .block(Block::default().borders(Borders::ALL).title("Articles"))
        .highlight_style(
            Style::default()
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(card_list, chunks[1], &mut app.list_state);

    let help_text = if app.input_active {
        "Type to edit • Enter: Create task • ESC: Cancel"
    } else {
        "↑/↓: Navigate • a: New task • d: Done • u: Undo • x: Delete • r: Refresh • q: Quit"
    };
    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title("Controls"))
        .style(Style::default().fg(Color::White));
    f.render_widget(help, chunks[2]);
}
