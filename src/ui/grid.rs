/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossterm::style::{Color, ResetColor, SetForegroundColor};
use crossterm::{cursor, terminal, QueueableCommand};
use std::io::Write;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::Result;
use crate::shared::{ElevatorSnapshot, Status};

const GRID_WIDTH: usize = 34;
const HEADER_ROWS: u16 = 3;

/// Live table of the fleet, redrawn in place on every `render`.
pub struct StatusGrid<W: Write> {
    out: W,
    drawn_rows: u16,
}

impl<W: Write> StatusGrid<W> {
    pub fn new(out: W) -> Self {
        StatusGrid { out, drawn_rows: 0 }
    }

    pub fn render(&mut self, elevators: &[ElevatorSnapshot]) -> Result<()> {
        if self.drawn_rows > 0 {
            self.out.queue(cursor::MoveUp(self.drawn_rows))?;
            self.out.queue(cursor::MoveToColumn(0))?;
        }
        self.out
            .queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;

        writeln!(self.out, "{}", "=".repeat(GRID_WIDTH))?;
        writeln!(
            self.out,
            "{:<width$}",
            format!("| {:>3} | {:>5} | {:<16} |", "ID", "Floor", "Status"),
            width = GRID_WIDTH
        )?;
        writeln!(self.out, "{}", "-".repeat(GRID_WIDTH))?;

        for elevator in elevators {
            self.out.queue(SetForegroundColor(row_color(elevator)))?;
            write!(self.out, "{}", format_row(elevator))?;
            self.out.queue(ResetColor)?;
            writeln!(self.out)?;
        }
        self.out.flush()?;

        self.drawn_rows = HEADER_ROWS + elevators.len() as u16;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn format_row(elevator: &ElevatorSnapshot) -> String {
    format!(
        "{:<width$}",
        format!(
            "| {:>3} | {:>5} | {:<16} |",
            elevator.id, elevator.current_floor, elevator.status
        ),
        width = GRID_WIDTH
    )
}

pub fn row_color(elevator: &ElevatorSnapshot) -> Color {
    match elevator.status {
        Status::Moving => Color::Yellow,
        _ => Color::Green,
    }
}
