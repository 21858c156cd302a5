//! Admin-side filtering over an appointment snapshot.
//!
//! Quick filters and manual filters are mutually exclusive: picking a quick
//! filter discards any manual fields, and typing a manual field leaves quick
//! mode. [`ViewFilter`] encodes that as a sum type.

use crate::domain::appointment::Appointment;
use chrono::{Days, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Predefined date-range shortcuts of the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuickFilter {
    /// Today and later.
    #[default]
    Pending,
    Today,
    /// Today through seven days from today, inclusive.
    Week,
    All,
}

impl FromStr for QuickFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(QuickFilter::Pending),
            "today" => Ok(QuickFilter::Today),
            "week" => Ok(QuickFilter::Week),
            "all" => Ok(QuickFilter::All),
            other => Err(format!(
                "unknown quick filter {other:?} (expected pending, today, week or all)"
            )),
        }
    }
}

impl fmt::Display for QuickFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuickFilter::Pending => "pending",
            QuickFilter::Today => "today",
            QuickFilter::Week => "week",
            QuickFilter::All => "all",
        })
    }
}

/// Manually entered filter fields. Empty fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub date: Option<String>,
    pub service: Option<String>,
    pub search: Option<String>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        [&self.date, &self.service, &self.search]
            .iter()
            .all(|field| field.as_deref().is_none_or(str::is_empty))
    }

    fn matches(&self, appointment: &Appointment) -> bool {
        if let Some(date) = self.date.as_deref().filter(|d| !d.is_empty())
            && appointment.date != date
        {
            return false;
        }
        if let Some(service) = self.service.as_deref().filter(|s| !s.is_empty())
            && appointment.service != service
        {
            return false;
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            // Phone numbers are matched raw, without case folding.
            return appointment.name.to_lowercase().contains(&needle)
                || appointment.email.to_lowercase().contains(&needle)
                || appointment.phone.contains(search);
        }
        true
    }
}

/// The filter currently applied to the admin list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewFilter {
    Quick(QuickFilter),
    Manual(FilterState),
}

impl Default for ViewFilter {
    fn default() -> Self {
        ViewFilter::Quick(QuickFilter::Pending)
    }
}

impl ViewFilter {
    /// Builds the filter from optional manual fields, falling back to `quick`
    /// when no manual field is set.
    pub fn from_parts(quick: Option<QuickFilter>, manual: FilterState) -> Self {
        match quick {
            Some(quick) => ViewFilter::Quick(quick),
            None if manual.is_empty() => ViewFilter::default(),
            None => ViewFilter::Manual(manual),
        }
    }

    pub fn matches(&self, appointment: &Appointment, today: NaiveDate) -> bool {
        match self {
            ViewFilter::Quick(quick) => quick_matches(*quick, &appointment.date, today),
            ViewFilter::Manual(state) => state.matches(appointment),
        }
    }
}

fn quick_matches(quick: QuickFilter, date: &str, today: NaiveDate) -> bool {
    let today_iso = iso(today);
    match quick {
        QuickFilter::Pending => date >= today_iso.as_str(),
        QuickFilter::Today => date == today_iso,
        QuickFilter::Week => {
            let week_end = today
                .checked_add_days(Days::new(7))
                .map(iso)
                .unwrap_or_else(|| today_iso.clone());
            date >= today_iso.as_str() && date <= week_end.as_str()
        }
        QuickFilter::All => true,
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Filtered subset of `appointments`, in collection order.
pub fn apply<'a>(
    appointments: &'a [Appointment],
    filter: &ViewFilter,
    today: NaiveDate,
) -> Vec<&'a Appointment> {
    appointments
        .iter()
        .filter(|appointment| filter.matches(appointment, today))
        .collect()
}

/// Sorts ascending by (date, time). Ties keep their collection order.
pub fn sort_for_display(appointments: &mut [&Appointment]) {
    appointments.sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));
}
