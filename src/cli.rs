//! Command-line interface parser for the vacation planner.
//! 
//! MIT License
//! 
//! Copyright (c) 2026 66f94eae
//! 
//! Permission is hereby granted, free of charge, to any person obtaining a copy
//! of this software and associated documentation files (the "Software"), to deal
//! in the Software without restriction, including without limitation the rights
//! to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
//! copies of the Software, and to permit persons to whom the Software is
//! furnished to do so, subject to the following conditions:
//! 
//! The above copyright notice and this permission notice shall be included in all
//! copies or substantial portions of the Software.
//! 
//! THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
//! IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//! FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//! AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//! LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
//! OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
//! SOFTWARE.

use std::{fs::File, io::Read, path::PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, builder::TypedValueParser};
use pto_planner::{CalendarDate, Strategy};

use crate::conf::Conf;

/// Help message for date format specification
const HELP_MSG: &str = "Date format must be one of: \"YYYY-mm-DD\", \"YYYYmmDD\" or \"today\"";
/// Compact date format string (YYYYmmDD)
const DATE_FORMAT: &str = "%Y%m%d";

const TODAY: &str = "today";

/// Command-line interface structure
#[derive(Parser)]
#[command(
    version(env!("CARGO_PKG_VERSION")),
    author(env!("CARGO_PKG_AUTHORS")),
    about(env!("CARGO_PKG_DESCRIPTION")),
    long_about = "Vacation planner that finds bridge days around public and \
                  company holidays and keeps a PTO ledger across saved plans."
)]
pub struct Cli {
    /// Configuration file path
    ///
    /// TOML configuration file containing country, year, holiday
    /// sources, company holidays and the storage directory.
    #[arg(
        long,
        short,
        required = true,
        value_parser = ConfParser,
        help = "Path to TOML configuration file"
    )]
    conf: Conf,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Returns a reference to the parsed configuration
    pub fn conf(&self) -> &Conf {
        &self.conf
    }

    pub fn json(&self) -> bool {
        self.json
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Suggest vacation periods
    Suggest {
        /// balanced, long-weekends, mini-breaks, week-long or extended
        #[arg(long, short)]
        strategy: Option<Strategy>,
        /// First day of the planning window
        #[arg(long, value_parser = DateParser, help = HELP_MSG)]
        from: Option<CalendarDate>,
        /// Last day of the planning window
        #[arg(long, value_parser = DateParser, help = HELP_MSG)]
        to: Option<CalendarDate>,
        /// Use the plain bridge-day finder over the whole year
        #[arg(long)]
        simple: bool,
    },
    /// Days off gained by a set of vacation days
    Efficiency {
        #[arg(required = true, value_parser = DateParser, help = HELP_MSG)]
        dates: Vec<CalendarDate>,
    },
    /// Turn a date range into vacation days and save it as a plan
    Apply {
        #[arg(value_parser = DateParser, help = HELP_MSG)]
        start: CalendarDate,
        #[arg(value_parser = DateParser, help = HELP_MSG)]
        end: CalendarDate,
        #[arg(long, short)]
        name: String,
        #[arg(long, short)]
        description: Option<String>,
        /// Strategy recorded on the plan
        #[arg(long, short)]
        strategy: Option<Strategy>,
    },
    /// Manage saved plans
    Plans {
        #[command(subcommand)]
        action: PlansCommand,
    },
    /// Manage the PTO budget
    Pto {
        #[command(subcommand)]
        action: PtoCommand,
    },
    /// Vacation days shared between plans
    Overlaps {
        /// Plan to check; all plans if omitted
        id: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PlansCommand {
    List,
    Show { id: String },
    Delete { id: String },
    Clear,
    /// Write a plan as an iCalendar file
    Export {
        id: String,
        /// Output file; stdout if omitted
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum PtoCommand {
    /// Replace the total PTO budget
    Set {
        #[arg(allow_negative_numbers = true)]
        days: i64,
    },
    Show,
    /// Forget the budget and the recorded input
    Reset,
}

/// Custom parser for date values
#[derive(Clone)]
struct DateParser;

impl TypedValueParser for DateParser {
    type Value = CalendarDate;

    /// Parses date strings from command-line arguments
    ///
    /// # Supported Formats
    /// * "today": Today's local date
    /// * "YYYY-mm-DD": e.g. 2024-12-25
    /// * "YYYYmmDD": e.g. 20241225
    fn parse_ref(
        &self,
        _cmd: &clap::Command,
        _arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let Some(value_str) = value.to_str() else {
            return Err(clap::Error::new(clap::error::ErrorKind::DisplayHelp));
        };

        if value_str == TODAY {
            return Ok(Local::now().date_naive().into());
        }

        if let Ok(date) = value_str.parse::<CalendarDate>() {
            return Ok(date);
        }

        if let Ok(date) = NaiveDate::parse_from_str(value_str, DATE_FORMAT) {
            return Ok(date.into());
        }

        Err(clap::Error::raw(clap::error::ErrorKind::InvalidValue, HELP_MSG))
    }
}

/// Custom parser for configuration file loading
#[derive(Clone)]
struct ConfParser;

impl TypedValueParser for ConfParser {
    type Value = Conf;

    /// Parses configuration file path and loads the configuration
    ///
    /// # Errors
    /// * File not found or permission denied
    /// * Invalid TOML format
    fn parse_ref(
        &self,
        _cmd: &clap::Command,
        _arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let Some(file_path) = value.to_str() else {
            return Err(clap::Error::new(clap::error::ErrorKind::DisplayHelp));
        };

        let mut file = File::open(file_path).map_err(|e| {
            let error_msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("Configuration file '{}' not found", file_path),
                std::io::ErrorKind::PermissionDenied => format!("Permission denied for '{}'", file_path),
                _ => format!("Cannot access configuration file '{}': {}", file_path, e),
            };
            clap::Error::raw(clap::error::ErrorKind::InvalidValue, error_msg)
        })?;

        let mut config_content = String::new();
        file.read_to_string(&mut config_content).map_err(|e| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!("Failed to read configuration file '{}': {}", file_path, e),
            )
        })?;

        toml::from_str(&config_content).map_err(|e| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!("Invalid configuration in '{}': {}", file_path, e),
            )
        })
    }
}
