pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Render a report envelope in the requested format.
///
/// Colour is only emitted for table output on an interactive terminal.
pub fn format_output(format: &OutputFormat, value: &Value) {
    let colour = matches!(format, OutputFormat::Table) && atty::is(atty::Stream::Stdout);
    colored::control::set_override(colour);

    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}
