/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::info;
use std::io::{BufRead, Write};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::Result;
use crate::system::ElevatorSystem;

const RULE: &str = "========================================";

/**
 * Interactive console front end.
 *
 * Reads choices from `input` and writes prompts to `output`, so the same
 * loop runs against a terminal or against buffers in tests. Bad input is
 * reported and the menu carries on; end of input exits like option 3.
 */
pub struct ConsoleMenu<'a, R: BufRead, W: Write> {
    system: &'a ElevatorSystem,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> ConsoleMenu<'a, R, W> {
    pub fn new(system: &'a ElevatorSystem, input: R, output: W) -> Self {
        ConsoleMenu {
            system,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        info!("Application started. Showing main menu.");
        loop {
            self.print_menu()?;
            let Some(choice) = self.read_line()? else {
                info!("Input closed. Leaving the menu.");
                return Ok(());
            };
            writeln!(self.output)?;

            match choice.as_str() {
                "1" => self.request_elevator()?,
                "2" => self.check_elevator_status()?,
                "3" => {
                    info!("User exited the menu.");
                    return Ok(());
                }
                other => {
                    writeln!(self.output, "Invalid option. Please select 1, 2, or 3.")?;
                    info!("Invalid menu option selected: {}", other);
                }
            }

            writeln!(self.output, "\nPress Enter to continue...")?;
            self.output.flush()?;
            if self.read_line()?.is_none() {
                return Ok(());
            }
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        let elevators = self.system.list_elevators()?.len();
        writeln!(self.output, "{}", RULE)?;
        writeln!(self.output, "  Elevator System")?;
        writeln!(
            self.output,
            "  Elevators: {} | Floors: 0 - {}",
            elevators,
            self.system.max_floor()
        )?;
        writeln!(self.output, "{}", RULE)?;
        writeln!(self.output, "1. Request Elevator")?;
        writeln!(self.output, "2. Check Elevator Status")?;
        writeln!(self.output, "3. Exit")?;
        writeln!(self.output, "{}", RULE)?;
        write!(self.output, "Select an option: ")?;
        self.output.flush()?;
        Ok(())
    }

    fn request_elevator(&mut self) -> Result<()> {
        let max_floor = self.system.max_floor();
        write!(self.output, "Enter requested floor (0 - {}): ", max_floor)?;
        self.output.flush()?;

        let line = self.read_line()?.unwrap_or_default();
        let Ok(floor) = line.parse::<i32>() else {
            writeln!(self.output, "Invalid floor number.")?;
            return Ok(());
        };
        if !(0..=max_floor).contains(&floor) {
            writeln!(self.output, "Invalid floor selected.")?;
            info!("Invalid floor selected: {}", floor);
            return Ok(());
        }

        info!("User requested elevator to floor {}.", floor);
        match self.system.submit(floor) {
            Ok(_) => writeln!(self.output, "Elevator requested to floor {}.", floor)?,
            Err(e) => writeln!(self.output, "Request for floor {} failed: {}", floor, e)?,
        }
        Ok(())
    }

    fn check_elevator_status(&mut self) -> Result<()> {
        write!(self.output, "Enter elevator ID: ")?;
        self.output.flush()?;

        let line = self.read_line()?.unwrap_or_default();
        let Ok(id) = line.parse::<usize>() else {
            writeln!(self.output, "Invalid elevator ID.")?;
            return Ok(());
        };

        match self.system.get_elevator(id)? {
            Some(elevator) => writeln!(
                self.output,
                "Elevator {} is on floor {} and is {}.",
                elevator.id, elevator.current_floor, elevator.status
            )?,
            None => writeln!(self.output, "Elevator not found.")?,
        }
        Ok(())
    }

    /// Next trimmed line, `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
