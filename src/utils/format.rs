//! Table formatting and output utilities
//!
//! This module provides console output for the config commands, with color
//! support that can be switched off for plain terminals and pipes.

use crate::config::manager::KeyInfo;
use crate::error::Result;
use crossterm::style::{Color as CrosstermColor, Stylize};
use tabled::{
    settings::{
        object::{Columns, Rows},
        Alignment, Color, Modify, Padding, Style, Width,
    },
    Table,
};

/// Width of the description column in the key table
const DESCRIPTION_WIDTH: usize = 43;

/// Color theme for console output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: CrosstermColor,
    pub warning: CrosstermColor,
    pub accent: CrosstermColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: CrosstermColor::Green,
            warning: CrosstermColor::Yellow,
            accent: CrosstermColor::Magenta,
        }
    }
}

/// Display utilities for command output
pub struct DisplayUtils {
    theme: ColorTheme,
    no_color: bool,
}

impl DisplayUtils {
    /// Create new display utilities
    pub fn new(no_color: bool) -> Self {
        Self {
            theme: ColorTheme::default(),
            no_color,
        }
    }

    pub fn format_success(&self, message: &str) -> String {
        if self.no_color {
            format!("✓ {}", message)
        } else {
            format!("✓ {}", message.with(self.theme.success))
        }
    }

    pub fn format_warning(&self, message: &str) -> String {
        if self.no_color {
            format!("⚠ {}", message)
        } else {
            format!("⚠ {}", message.with(self.theme.warning))
        }
    }

    /// Print a success message
    pub fn print_success(&self, message: &str) -> Result<()> {
        println!("{}", self.format_success(message));
        Ok(())
    }

    /// Print a warning message
    pub fn print_warning(&self, message: &str) -> Result<()> {
        println!("{}", self.format_warning(message));
        Ok(())
    }

    /// Format a single `key: value` line
    pub fn format_key_value(&self, key: &str, value: &str) -> String {
        if self.no_color {
            format!("{}: {}", key, value)
        } else {
            format!("{}: {}", key.with(self.theme.accent).bold(), value)
        }
    }

    /// Render the key description table shown by `config info`
    pub fn format_key_table(&self, rows: &[KeyInfo]) -> String {
        let mut table = Table::new(rows);
        table
            .with(Style::modern())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::single(1)).with(Width::wrap(DESCRIPTION_WIDTH).keep_words()))
            .with(Modify::new(Rows::first()).with(Alignment::left()));

        if !self.no_color {
            table.with(Modify::new(Rows::first()).with(Color::FG_BLUE));
        }

        table.to_string()
    }
}
