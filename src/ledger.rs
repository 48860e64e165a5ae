//! PTO ledger: total, used and remaining days across saved plans.
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

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{
    date::CalendarDate,
    error::{Error, Result},
    plan::HolidayPlan,
    store::KeyValueStore,
};

/// Total PTO budget
pub const TOTAL_PTO_KEY: &str = "total-pto-days";
/// First total ever set, kept for reference
pub const INITIAL_PTO_KEY: &str = "initial-pto-days";
/// Last raw value the user typed, independent of derived values
pub const PTO_INPUT_KEY: &str = "available-pto-days-input";

/// Point-in-time view of the ledger.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub total: u32,
    pub used: u32,
    pub remaining: u32,
}

/// PTO bookkeeping over an injected key-value store.
///
/// Usage is never stored; it is derived from the plans passed in, so the
/// ledger can't drift from the saved plans.
pub struct PtoLedger<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PtoLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Replaces the total PTO budget.
    ///
    /// The first value ever set is also recorded as the initial budget.
    ///
    /// # Errors
    /// * `Error::NegativePtoDays` for negative input
    /// * `Error::PtoDaysOutOfRange` for input above `u32::MAX`
    pub fn set_total_pto_days(&mut self, days: i64) -> Result<()> {
        let days = checked_days(days)?;
        self.store.set_int(TOTAL_PTO_KEY, days)?;
        if self.store.get_int(INITIAL_PTO_KEY)?.is_none() {
            self.store.set_int(INITIAL_PTO_KEY, days)?;
        }
        Ok(())
    }

    pub fn total_pto_days(&self) -> Result<u32> {
        self.read(TOTAL_PTO_KEY)
    }

    pub fn initial_pto_days(&self) -> Result<u32> {
        self.read(INITIAL_PTO_KEY)
    }

    /// Stores the raw PTO input without touching the total.
    pub fn set_available_pto_days_input(&mut self, days: i64) -> Result<()> {
        let days = checked_days(days)?;
        self.store.set_int(PTO_INPUT_KEY, days)
    }

    pub fn available_pto_days_input(&self) -> Result<u32> {
        self.read(PTO_INPUT_KEY)
    }

    /// Distinct vacation days across all plans.
    pub fn used_pto_days(&self, plans: &[HolidayPlan]) -> u32 {
        unique_vacation_days(plans).len() as u32
    }

    /// `max(0, total - used)`
    pub fn remaining_pto_days(&self, plans: &[HolidayPlan]) -> Result<u32> {
        Ok(self.total_pto_days()?.saturating_sub(self.used_pto_days(plans)))
    }

    pub fn snapshot(&self, plans: &[HolidayPlan]) -> Result<LedgerSnapshot> {
        let total = self.total_pto_days()?;
        let used = self.used_pto_days(plans);
        Ok(LedgerSnapshot {
            total,
            used,
            remaining: total.saturating_sub(used),
        })
    }

    pub fn has_saved_plans_with_pto(&self, plans: &[HolidayPlan]) -> Result<bool> {
        Ok(!plans.is_empty() && self.total_pto_days()? > 0)
    }

    /// Clears every ledger key.
    pub fn reset_all_pto_data(&mut self) -> Result<()> {
        self.store.remove(TOTAL_PTO_KEY)?;
        self.store.remove(INITIAL_PTO_KEY)?;
        self.store.remove(PTO_INPUT_KEY)
    }

    /// Missing keys read as 0; values outside `u32` are reported.
    fn read(&self, key: &str) -> Result<u32> {
        let Some(value) = self.store.get_int(key)? else {
            return Ok(0);
        };
        u32::try_from(value).map_err(|_| Error::CorruptLedgerValue {
            key: key.to_string(),
            value,
        })
    }
}

fn checked_days(days: i64) -> Result<i64> {
    if days < 0 {
        return Err(Error::NegativePtoDays(days));
    }
    if u32::try_from(days).is_err() {
        return Err(Error::PtoDaysOutOfRange(days));
    }
    Ok(days)
}

/// Union of every plan's vacation days.
///
/// Canonical strings are taken as-is, other parseable strings are
/// normalised, and anything unparseable is dropped with a warning.
pub fn unique_vacation_days(plans: &[HolidayPlan]) -> BTreeSet<CalendarDate> {
    let mut days = BTreeSet::new();
    for plan in plans {
        for raw in &plan.vacation_days {
            match CalendarDate::normalize(raw) {
                Some(date) => {
                    if !CalendarDate::is_canonical(raw) {
                        tracing::debug!(plan = %plan.id, raw = %raw, normalized = %date, "normalized vacation day");
                    }
                    days.insert(date);
                }
                None => {
                    tracing::warn!(plan = %plan.id, raw = %raw, "dropping unparseable vacation day");
                }
            }
        }
    }
    days
}
