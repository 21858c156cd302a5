//! Plain-text views over immutable snapshots.
//!
//! Nothing here touches the engine; callers pass what they already read.

use crate::application::engine::Stats;
use crate::domain::admin::AdminAccount;
use crate::domain::appointment::{Appointment, service_label};
use crate::domain::slot::SlotAvailability;
use chrono::NaiveDate;
use std::fmt::{self, Write};

/// `YYYY-MM-DD` shown as `DD/MM/YYYY`. Values already in `DD/MM/YYYY` pass
/// through unchanged.
pub fn display_date(date: &str) -> String {
    if date.is_empty() {
        return "Date not provided".to_string();
    }
    if NaiveDate::parse_from_str(date, "%d/%m/%Y").is_ok() {
        return date.to_string();
    }
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%d/%m/%Y").to_string(),
        Err(_) => "Invalid date".to_string(),
    }
}

/// Collects `write` into a fresh buffer, keeping whatever was written if a
/// `Display` impl fails.
fn render(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    if write(&mut out).is_err() {
        tracing::debug!("renderer stopped early");
    }
    out
}

/// One line per appointment, in the order given.
pub fn appointment_list(appointments: &[&Appointment]) -> String {
    if appointments.is_empty() {
        return "No appointments found.\n".to_string();
    }
    render(|out| {
        for a in appointments {
            writeln!(
                out,
                "{}  {}  {:<5}  {:<20}  {}  [{}]",
                a.id,
                display_date(&a.date),
                a.time,
                a.name,
                service_label(&a.service),
                a.phone
            )?;
        }
        Ok(())
    })
}

pub fn appointment_detail(a: &Appointment) -> String {
    render(|out| {
        writeln!(out, "Id:       {}", a.id)?;
        writeln!(out, "Name:     {}", a.name)?;
        writeln!(out, "Email:    {}", a.email)?;
        writeln!(out, "Phone:    {}", a.phone)?;
        writeln!(out, "Date:     {}", display_date(&a.date))?;
        writeln!(out, "Time:     {}", a.time)?;
        writeln!(out, "Service:  {}", service_label(&a.service))?;
        if let Some(notes) = &a.notes {
            writeln!(out, "Notes:    {notes}")?;
        }
        writeln!(out, "Created:  {}", a.created_at)
    })
}

/// The slot grid for one date. Taken slots name who holds them.
pub fn slot_grid(date: &str, slots: &[SlotAvailability]) -> String {
    render(|out| {
        writeln!(out, "Slots for {}", display_date(date))?;
        for slot in slots {
            match (&slot.occupied_by, slot.available) {
                (_, true) => writeln!(out, "  {}  available", slot.time)?,
                (Some(holder), false) => writeln!(out, "  {}  taken by {holder}", slot.time)?,
                (None, false) => writeln!(out, "  {}  taken", slot.time)?,
            }
        }
        Ok(())
    })
}

/// Account list with the session user marked.
pub fn admin_list(admins: &[AdminAccount], current_user: &str) -> String {
    render(|out| {
        for admin in admins {
            if admin.username == current_user {
                writeln!(out, "{} (you)", admin.username)?;
            } else {
                writeln!(out, "{}", admin.username)?;
            }
        }
        Ok(())
    })
}

pub fn stats(stats: &Stats) -> String {
    format!(
        "Total: {}\nToday: {}\nUpcoming: {}\n",
        stats.total, stats.today, stats.upcoming
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(id: &str, date: &str, time: &str) -> Appointment {
        Appointment {
            id: id.into(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: "11999990000".into(),
            date: date.into(),
            time: time.into(),
            service: "manicure".into(),
            notes: None,
            created_at: "2025-06-01T10:00:00.000Z".into(),
        }
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2025-06-10"), "10/06/2025");
        assert_eq!(display_date(""), "Date not provided");
        assert_eq!(display_date("10/06/2025"), "10/06/2025");
        assert_eq!(display_date("2025-13-40"), "Invalid date");
        assert_eq!(display_date("garbage"), "Invalid date");
    }

    #[test]
    fn test_appointment_list() {
        let a = appointment("a1", "2025-06-10", "09:00");
        let out = appointment_list(&[&a]);
        assert!(out.starts_with("a1  10/06/2025  09:00"));
        assert!(out.contains("Manicure"));
        assert_eq!(appointment_list(&[]), "No appointments found.\n");
    }

    #[test]
    fn test_detail_shows_notes_only_when_present() {
        let mut a = appointment("a1", "2025-06-10", "09:00");
        assert!(!appointment_detail(&a).contains("Notes:"));
        a.notes = Some("bring photo".into());
        assert!(appointment_detail(&a).contains("Notes:    bring photo"));
    }

    #[test]
    fn test_slot_grid() {
        let slots = [
            SlotAvailability::free("08:00"),
            SlotAvailability::taken("08:30", "Ana"),
        ];
        let out = slot_grid("2025-06-10", &slots);
        assert_eq!(
            out,
            "Slots for 10/06/2025\n  08:00  available\n  08:30  taken by Ana\n"
        );
    }

    #[test]
    fn test_admin_list_marks_current_user() {
        let admins = [AdminAccount::seed(), AdminAccount::new("maria", "x")];
        assert_eq!(admin_list(&admins, "maria"), "admin\nmaria (you)\n");
    }

    #[test]
    fn test_stats() {
        let s = Stats {
            total: 3,
            today: 1,
            upcoming: 1,
        };
        assert_eq!(stats(&s), "Total: 3\nToday: 1\nUpcoming: 1\n");
    }
}
