//! Text Menu
//! Reads menu choices line by line and dispatches to a chart renderer.

use crate::data::MergedTable;
use log::error;
use std::fmt::Display;
use std::io::{self, BufRead, Write};

pub const PROMPT: &str = "Enter your choice (1/2/3): ";
pub const INVALID_CHOICE: &str = "Invalid input. Please enter 1, 2, or 3.";
pub const EXIT_MESSAGE: &str = "Exiting the program.";

/// Displays charts for the merged table. Each call blocks until the chart is closed.
pub trait ChartRenderer {
    type Error: Display;

    fn show_scatter(&mut self, table: &MergedTable) -> Result<(), Self::Error>;
    fn show_top_suburbs(&mut self, table: &MergedTable) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Scatter,
    TopSuburbs,
    Exit,
}

impl MenuChoice {
    /// Parse a line of input; surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Scatter),
            "2" => Some(MenuChoice::TopSuburbs),
            "3" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

fn write_menu<W: Write>(output: &mut W, top_suburbs: usize) -> io::Result<()> {
    writeln!(output, "Welcome! Choose a visual to display:")?;
    writeln!(output, "1. Scatter Plot (Income vs Crime)")?;
    writeln!(output, "2. Bar Graph (Top {} Suburbs by Crime)", top_suburbs)?;
    writeln!(output, "3. Exit the program")?;
    write!(output, "{}", PROMPT)?;
    output.flush()
}

/// Run the menu until the user chooses exit or input ends.
///
/// Renderer failures are logged and the menu is shown again.
pub fn run_menu<R, W, C>(
    table: &MergedTable,
    renderer: &mut C,
    top_suburbs: usize,
    mut input: R,
    mut output: W,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    C: ChartRenderer,
{
    let mut line = String::new();

    loop {
        write_menu(&mut output, top_suburbs)?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            writeln!(output, "{}", EXIT_MESSAGE)?;
            return Ok(());
        }

        match MenuChoice::parse(&line) {
            Some(MenuChoice::Scatter) => {
                if let Err(e) = renderer.show_scatter(table) {
                    error!("Scatter plot failed: {}", e);
                }
            }
            Some(MenuChoice::TopSuburbs) => {
                if let Err(e) = renderer.show_top_suburbs(table) {
                    error!("Bar graph failed: {}", e);
                }
            }
            Some(MenuChoice::Exit) => {
                writeln!(output, "{}", EXIT_MESSAGE)?;
                return Ok(());
            }
            None => {
                writeln!(output, "{}\n", INVALID_CHOICE)?;
            }
        }
    }
}
