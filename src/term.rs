use std::io::{stdout, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use crate::world::World;
use crate::TermInt;

type Cell = (TermInt, TermInt);

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    message_center: Cell,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Cell,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let stdout = stdout();
        let screen = vec![' '; width as usize * height as usize];
        let message_center = (width / 2, height / 2);
        Ok(TermManager { width, height, stdout, screen, message_center, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Error hiding cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Error disabling raw mode")?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Error leaving alt screen")?;
        Ok(())
    }

    pub fn get_terminal_size(&self) -> Cell {
        (self.width, self.height)
    }

    /// Where message boxes are centered; the middle of the terminal by default.
    pub fn set_message_center(&mut self, center: Cell) {
        self.message_center = center;
    }

    pub fn draw_walls(&mut self, world: &World) -> Result<()> {
        let bounds = world.bounds();

        for pos in world.cells().filter(|&pos| world.is_wall(pos)) {
            let on_x_edge = pos.0 == 0 || pos.0 == bounds.width;
            let on_y_edge = pos.1 == 0 || pos.1 == bounds.height;
            let ch = match (on_x_edge, on_y_edge) {
                (true, true) => '+',
                (false, true) => '-',
                (true, false) => '|',
                (false, false) => '#',
            };
            if let Some(cell) = world.to_screen(pos) {
                self.print_at(cell, ch)?;
            }
        }

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = self.message_center;
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for &y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let pos = (top_left.0 + x_diff, top_left.1 + y_diff);
                if let Some(idx) = self.index(pos) {
                    let ch = self.screen[idx];
                    self.print_at_no_save(pos, ch)?;
                }
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: Cell, ch: char) -> Result<()> {
        if let Some(idx) = self.index(pos) {
            self.screen[idx] = ch;
            self.print_at_no_save(pos, ch)?;
        }
        Ok(())
    }

    pub fn print_text(&mut self, pos: Cell, text: &str) -> Result<()> {
        for (x_diff, ch) in text.chars().enumerate() {
            self.print_at((pos.0 + x_diff as TermInt, pos.1), ch)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Error clearing")?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, pos: Cell) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }

    fn print_at_no_save(&mut self, pos: Cell, ch: char) -> Result<()> {
        // Used for messages, so the buffer keeps what lies underneath them
        if self.index(pos).is_none() {
            return Ok(());
        }
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))
            .context("Error printing")?;
        Ok(())
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Cell) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Cell {
        self.top_left
    }
}
