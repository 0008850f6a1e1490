//! Terminal-based farm explorer using ratatui
//!
//! Shows the grid, ticks the world at a fixed cadence and steers the octopus
//! with the arrow keys. Only cells reported by `World::update` (plus held
//! prey, whose highlight can change without their cell changing) are
//! re-rendered into the glyph cache.

use std::error::Error;
use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::Rng;
use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tracing::info;

use crate::simulation::World;
use crate::tilemap::Tilemap;

/// Terminal columns per grid cell; emoji glyphs are double width
const CELL_WIDTH: u16 = 2;

/// A rendered cell as cached by the explorer
#[derive(Clone, Debug, PartialEq)]
struct DisplayCell {
    symbol: String,
    held: bool,
}

/// Explorer state
struct Explorer<R: Rng> {
    world: World,
    rng: R,
    glyphs: Tilemap<Option<DisplayCell>>,
    paused: bool,
    show_help: bool,
    /// Message to display temporarily
    message: Option<String>,
}

impl<R: Rng> Explorer<R> {
    fn new(world: World, rng: R) -> Self {
        let glyphs = Tilemap::new(world.width(), world.height());
        Explorer {
            world,
            rng,
            glyphs,
            paused: false,
            show_help: false,
            message: None,
        }
    }

    /// Run one tick and repaint what changed
    fn step(&mut self) {
        let changed = self.world.update(&mut self.rng);
        for &(row, col) in &changed {
            self.paint(row, col);
        }

        let highlighted: Vec<(usize, usize)> = self
            .glyphs
            .iter()
            .filter(|(_, _, cell)| cell.as_ref().is_some_and(|c| c.held))
            .map(|(x, y, _)| (y, x))
            .collect();
        let held: Vec<(usize, usize)> = self
            .world
            .predator()
            .held_prey(self.world.clusters())
            .map(|prey| (prey.pos.y as usize, prey.pos.x as usize))
            .collect();
        for (row, col) in highlighted.into_iter().chain(held) {
            self.paint(row, col);
        }
    }

    fn paint(&mut self, row: usize, col: usize) {
        let cell = self.world.render(row, col).map(|glyph| DisplayCell {
            symbol: glyph.symbol.to_string(),
            held: glyph.held,
        });
        if self.glyphs.contains(col, row) {
            self.glyphs.set(col, row, cell);
        }
    }

    fn move_octopus(&mut self, drow: i32, dcol: i32) {
        self.world.move_octopus(drow, dcol);
    }

    fn header(&self) -> String {
        let predator = self.world.predator();
        format!(
            " Octopus Farmer | Moves: {} | Held: {}/{} | ({},{}){}",
            self.world.moves(),
            predator.held_count(),
            predator.tentacles().len(),
            predator.pos.x,
            predator.pos.y,
            if self.paused { " | PAUSED" } else { "" },
        )
    }

    /// Render the grid from the glyph cache
    fn render_map(&self, area: Rect, buf: &mut Buffer) {
        let water = Style::default().bg(Color::Rgb(8, 24, 48));
        for (col, row, cell) in self.glyphs.iter() {
            let screen_x = area.x as usize + col * CELL_WIDTH as usize;
            let screen_y = area.y as usize + row;
            if screen_x + CELL_WIDTH as usize > (area.x + area.width) as usize
                || screen_y >= (area.y + area.height) as usize
            {
                continue;
            }
            let (symbol, style) = match cell {
                Some(c) if c.held => (c.symbol.as_str(), water.bg(Color::Red)),
                Some(c) => (c.symbol.as_str(), water),
                None => ("  ", water),
            };
            buf.set_string(screen_x as u16, screen_y as u16, symbol, style);
        }
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let help_text = vec![
            Line::from(Span::styled("Octopus Farmer", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from("Arrows / WASD / HJKL   Move the octopus"),
            Line::from("P / Space              Pause or resume"),
            Line::from(".                      Single step while paused"),
            Line::from("?                      Toggle this help"),
            Line::from("Q / Esc                Quit"),
            Line::from(""),
            Line::from("Prey inside the octopus' reach are grabbed,"),
            Line::from("nearest first, and lit red while held."),
        ];

        let width = 50.min(area.width);
        let height = (help_text.len() as u16 + 2).min(area.height);
        let popup = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };
        Clear.render(popup, buf);
        Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title(" Help "))
            .render(popup, buf);
    }

    fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
            .split(f.area());

        f.render_widget(
            Paragraph::new(self.header()).style(Style::default().bg(Color::Blue).fg(Color::White)),
            chunks[0],
        );

        self.render_map(chunks[1], f.buffer_mut());

        let msg_str = self.message.as_ref().map(|m| format!(" | {}", m)).unwrap_or_default();
        let status = format!(" Arrows:Move  P:Pause  ?:Help  Q:Quit{}", msg_str);
        f.render_widget(
            Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White)),
            chunks[2],
        );

        if self.show_help {
            self.render_help(chunks[1], f.buffer_mut());
        }
    }

    /// Handle a key press; returns false when the explorer should exit
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.show_help {
            self.show_help = false;
            return true;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => self.move_octopus(-1, 0),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => self.move_octopus(1, 0),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => self.move_octopus(0, -1),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => self.move_octopus(0, 1),
            KeyCode::Char('p') | KeyCode::Char(' ') => {
                self.paused = !self.paused;
                self.message = Some(if self.paused { "Paused".to_string() } else { "Resumed".to_string() });
            }
            KeyCode::Char('.') if self.paused => self.step(),
            _ => {}
        }
        true
    }
}

/// Run the explorer until the user quits, ticking the world every `tick`.
pub fn run_explorer<R: Rng>(world: World, rng: R, tick: Duration) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut explorer = Explorer::new(world, rng);
    let result = event_loop(&mut terminal, &mut explorer, tick);

    // Cleanup
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(moves = explorer.world.moves(), "explorer closed");
    result
}

fn event_loop<B: Backend, R: Rng>(
    terminal: &mut Terminal<B>,
    explorer: &mut Explorer<R>,
    tick: Duration,
) -> Result<(), Box<dyn Error>> {
    let mut last_tick = Instant::now();
    explorer.step();

    loop {
        terminal.draw(|f| explorer.draw(f))?;

        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    explorer.message = None;
                    if !explorer.handle_key(key.code) {
                        return Ok(());
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick {
            if !explorer.paused {
                explorer.step();
            }
            last_tick = Instant::now();
        }
    }
}
