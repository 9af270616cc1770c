//! Operator prompt loop

use std::io::{self, BufRead, Write};

use stockcast_core::{parse_sales, SalesRow};

use crate::pipeline::Stage;

const PROMPT: &str = "Please enter sales data from the last market.\n\
                      Data should be six numbers, separated by commas.\n\
                      Example: 10,20,30,40,50,60\n";

/// Prompt until a line validates, then return the row.
///
/// There is no retry limit. End of input fails with
/// [`io::ErrorKind::UnexpectedEof`] so a closed stdin cannot spin forever.
pub fn collect_sales<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<SalesRow> {
    collect_sales_with(input, output, |_| {})
}

/// [`collect_sales`], reporting each [`Stage::AwaitingInput`] and
/// [`Stage::Validating`] transition to `on_stage`
pub fn collect_sales_with<R, W, F>(input: &mut R, output: &mut W, mut on_stage: F) -> io::Result<SalesRow>
where
    R: BufRead,
    W: Write,
    F: FnMut(Stage),
{
    let mut attempts = 0u32;
    loop {
        on_stage(Stage::AwaitingInput);
        writeln!(output, "{}", PROMPT)?;
        write!(output, "Enter your data here: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before valid sales data was entered",
            ));
        }
        attempts += 1;
        on_stage(Stage::Validating);

        match parse_sales(&line) {
            Ok(row) => {
                writeln!(output, "Data is valid!")?;
                tracing::debug!(attempts, sales = %row, "sales input accepted");
                return Ok(row);
            }
            Err(e) => {
                tracing::debug!(attempts, error = %e, "sales input rejected");
                writeln!(output, "Invalid data: {}, please try again!\n", e)?;
            }
        }
    }
}
