//
//  bitbucket-provider
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Formatting Module
//!
//! Renders plans, state and schemas for the terminal or as JSON.
//!
//! ## Supported Formats
//!
//! | Format | Description | Use Case |
//! |--------|-------------|----------|
//! | Table | Coloured, human-readable text and tables | Interactive terminal use |
//! | JSON | Pretty-printed JSON | Scripting, CI pipelines |
//!
//! ## Sensitive Values
//!
//! Views are built through [`views`], which replaces every attribute the
//! schema marks sensitive with `(sensitive)` before anything is printed,
//! whatever the format.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_provider::output::{OutputFormat, OutputWriter};
//!
//! let writer = OutputWriter::new(OutputFormat::Table);
//! writer.write_success("Apply complete");
//! ```

mod json;
mod table;
pub mod views;

pub use json::*;
pub use table::*;

use serde::Serialize;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Writes command results in the selected format.
///
/// Colour follows `console`'s detection (TTY, `NO_COLOR`, `CLICOLOR`).
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

    /// Writes a value as JSON or through its [`TableOutput`] rendering.
    pub fn write<T: Serialize + TableOutput>(&self, value: &T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(value)?,
            OutputFormat::Table => value.print_table(self.color),
        }
        Ok(())
    }

    pub fn write_error(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("error:").red().bold(), msg);
        } else {
            eprintln!("error: {}", msg);
        }
    }

    pub fn write_warning(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("warning:").yellow().bold(), msg);
        } else {
            eprintln!("warning: {}", msg);
        }
    }

    /// Informational text; suppressed in JSON mode so stdout stays parseable.
    pub fn write_info(&self, msg: &str) {
        if !self.is_json() {
            println!("{}", msg);
        }
    }

    pub fn write_success(&self, msg: &str) {
        use console::style;
        if self.is_json() {
            return;
        }
        if self.color {
            println!("{} {}", style("✓").green().bold(), msg);
        } else {
            println!("✓ {}", msg);
        }
    }
}

/// Human-readable rendering of a command result.
pub trait TableOutput {
    fn print_table(&self, color: bool);
}

pub fn print_header(text: &str) {
    use console::style;
    println!("{}", style(text).bold());
    println!("{}", "-".repeat(text.len()));
}

pub fn print_field(key: &str, value: &str, color: bool) {
    use console::style;
    if color {
        println!("{}: {}", style(key).dim(), value);
    } else {
        println!("{}: {}", key, value);
    }
}
