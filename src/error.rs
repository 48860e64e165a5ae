//! Error type shared by the planner library.
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

use thiserror::Error;

use crate::date::CalendarDate;

/// Errors raised by the planner library.
///
/// Sparse data (no holidays, no vacation days, malformed stored dates) is
/// never an error; these variants cover contract violations and I/O.
#[derive(Error, Debug)]
pub enum Error {
    /// A date string is not a canonical `YYYY-MM-DD` calendar date
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// PTO day counts can't be negative
    #[error("PTO day count must not be negative, got {0}")]
    NegativePtoDays(i64),

    /// PTO day counts must fit the ledger's day counter
    #[error("PTO day count {0} is out of range")]
    PtoDaysOutOfRange(i64),

    /// A stored ledger value can't be a PTO day count
    #[error("Stored value {value} for '{key}' is not a valid PTO day count")]
    CorruptLedgerValue { key: String, value: i64 },

    /// Range start lies after its end
    #[error("Invalid range: {start} is after {end}")]
    InvalidRange { start: CalendarDate, end: CalendarDate },

    /// Applying a suggestion left no workday to take off
    #[error("No applicable vacation dates between {start} and {end}")]
    NoApplicableDates { start: CalendarDate, end: CalendarDate },

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage data is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
