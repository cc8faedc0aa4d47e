//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders command results in the format selected by `--output`. Table
//! output is a key/value detail view built with `tabled`, structured
//! formats use serde, plain emits the one value a script wants.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use couponly_core::{Message, Severity};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Render a single serde-serializable item in the chosen format.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data).map_err(serialize_err)?,
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(serialize_err)?,
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(serialize_err)?,
        OutputFormat::Plain => id_fn(data),
    })
}

fn serialize_err(e: impl std::fmt::Display) -> CliError {
    CliError::InvalidResponse {
        message: format!("failed to serialize output: {e}"),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Detail tables ────────────────────────────────────────────────────

#[derive(Tabled)]
struct DetailRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Two-column key/value table for single-item views.
pub fn detail_table(rows: &[(&str, String)]) -> String {
    let rows: Vec<DetailRow> = rows
        .iter()
        .map(|(field, value)| DetailRow {
            field: (*field).to_owned(),
            value: value.clone(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// A status message, coloured by severity when `color` is set.
pub fn paint_message(message: &Message, color: bool) -> String {
    if !color {
        return message.text.clone();
    }
    match message.severity {
        Severity::Info => message.text.blue().to_string(),
        Severity::Success => message.text.green().to_string(),
        Severity::Warning => message.text.yellow().to_string(),
        Severity::Error => message.text.red().to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Item {
        code: String,
    }

    fn item() -> Item {
        Item {
            code: "SAVE10".into(),
        }
    }

    #[test]
    fn plain_uses_id_fn() {
        let out = render_single(
            &OutputFormat::Plain,
            &item(),
            |_| unreachable!(),
            |i| i.code.clone(),
        )
        .unwrap();
        assert_eq!(out, "SAVE10");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_single(
            &OutputFormat::JsonCompact,
            &item(),
            |_| String::new(),
            |_| String::new(),
        )
        .unwrap();
        assert_eq!(out, r#"{"code":"SAVE10"}"#);
    }

    #[test]
    fn detail_table_contains_fields() {
        let table = detail_table(&[("Coupon", "SAVE10".into())]);
        assert!(table.contains("Coupon"));
        assert!(table.contains("SAVE10"));
    }

    #[test]
    fn uncoloured_message_is_verbatim() {
        let msg = Message::warning("Please wait before claiming another coupon");
        assert_eq!(paint_message(&msg, false), msg.text);
    }
}
