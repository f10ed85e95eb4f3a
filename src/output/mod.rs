//
//  bamboo-cli
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Formatting
//!
//! Every command prints either human-readable output (tables and labelled
//! fields, colored when the terminal supports it) or, with `--json`,
//! pretty-printed JSON.
//!
//! ## Formats
//!
//! | Format | Flag | Use |
//! |--------|------|-----|
//! | Table | default | Interactive terminals |
//! | JSON | `--json` | Scripting, `jq` |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bamboo_cli::output::{OutputFormat, OutputWriter, TableOutput};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Number {
//!     number: String,
//! }
//!
//! impl TableOutput for Number {
//!     fn print_table(&self, _color: bool) {
//!         println!("{}", self.number);
//!     }
//! }
//!
//! let writer = OutputWriter::new(OutputFormat::Table);
//! writer.write(&Number { number: "22".into() })?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! Warnings go to stderr so `--json` stdout stays parseable.

mod json;
mod table;

pub use json::*;
pub use table::*;

use console::style;
use serde::Serialize;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    /// Maps the global `--json` flag to a format.
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Table
        }
    }
}

/// Writes command results in the selected format.
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Writes a single value.
    pub fn write<T: Serialize + TableOutput>(&self, value: &T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(value),
            OutputFormat::Table => {
                value.print_table(self.color);
                Ok(())
            }
        }
    }

    /// Writes a list; as JSON it is a single array.
    pub fn write_list<T: Serialize + TableOutput>(&self, values: &[T]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(values),
            OutputFormat::Table => {
                for value in values {
                    value.print_table(self.color);
                }
                Ok(())
            }
        }
    }

    pub fn write_warning(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", style("warning:").yellow().bold(), msg);
        } else {
            eprintln!("warning: {}", msg);
        }
    }

    pub fn write_success(&self, msg: &str) {
        if self.color {
            println!("{} {}", style("✓").green().bold(), msg);
        } else {
            println!("✓ {}", msg);
        }
    }
}

/// Human-readable rendering of a value.
pub trait TableOutput {
    fn print_table(&self, color: bool);
}

impl TableOutput for String {
    fn print_table(&self, _color: bool) {
        println!("{}", self);
    }
}

/// Prints a bold header underlined with dashes.
pub fn print_header(text: &str) {
    println!("{}", style(text).bold());
    println!("{}", "-".repeat(text.chars().count()));
}

/// Prints a `key: value` line with a dimmed key.
pub fn print_field(key: &str, value: &str, color: bool) {
    if color {
        println!("{}: {}", style(key).dim(), value);
    } else {
        println!("{}: {}", key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_json_flag() {
        assert_eq!(OutputFormat::from_json_flag(true), OutputFormat::Json);
        assert_eq!(OutputFormat::from_json_flag(false), OutputFormat::Table);
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_writer_format() {
        assert!(OutputWriter::new(OutputFormat::Json).is_json());
        assert_eq!(
            OutputWriter::new(OutputFormat::Table).format(),
            OutputFormat::Table
        );
    }
}
