use crate::domain::slot::is_catalog_slot;
use crate::error::{BookingError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Service keys offered by the booking form, with their display labels.
pub const SERVICES: [(&str, &str); 7] = [
    ("corte", "Corte de Cabelo"),
    ("coloracao", "Coloração"),
    ("manicure", "Manicure"),
    ("pedicure", "Pedicure"),
    ("depilacao", "Depilação"),
    ("massagem", "Massagem"),
    ("outro", "Outro"),
];

/// Display label for a service key. Unknown keys are shown verbatim.
pub fn service_label(service: &str) -> &str {
    SERVICES
        .iter()
        .find(|(key, _)| *key == service)
        .map(|(_, label)| *label)
        .unwrap_or(service)
}

/// A booked appointment as stored under the `appointments` key.
///
/// Text fields tolerate `null`, absence and scalar values in stored data so
/// that records written by older front-ends still load; numbers and booleans
/// are kept as their text form. The loader decides which records are
/// well-formed enough to keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    /// ISO `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    /// One of the slot catalog entries.
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub service: String,
    #[serde(
        default,
        deserialize_with = "lenient_notes",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    /// ISO-8601 UTC timestamp.
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_notes(deserializer)?.unwrap_or_default())
}

fn lenient_notes<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

impl Appointment {
    pub fn occupies(&self, date: &str, time: &str) -> bool {
        self.date == date && self.time == time
    }
}

/// User-editable part of an appointment, as collected by a booking or edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub service: String,
    pub notes: Option<String>,
}

impl AppointmentFields {
    /// Trims free text and turns blank notes into `None`.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            service: self.service.trim().to_string(),
            notes: self
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        }
    }

    /// Checks required fields, the date format and the slot, returning the parsed date.
    pub fn validate(&self) -> Result<NaiveDate> {
        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("date", &self.date),
            ("time", &self.time),
            ("service", &self.service),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(BookingError::MissingField(*field));
        }

        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|_| BookingError::InvalidDate(self.date.clone()))?;
        // chrono accepts unpadded fields, the stored form must stay canonical.
        if date.format("%Y-%m-%d").to_string() != self.date {
            return Err(BookingError::InvalidDate(self.date.clone()));
        }

        if !is_catalog_slot(&self.time) {
            return Err(BookingError::InvalidSlot(self.time.clone()));
        }

        Ok(date)
    }

    pub fn into_appointment(self, id: String, created_at: String) -> Appointment {
        Appointment {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            date: self.date,
            time: self.time,
            service: self.service,
            notes: self.notes,
            created_at,
        }
    }
}

impl From<&Appointment> for AppointmentFields {
    fn from(appointment: &Appointment) -> Self {
        Self {
            name: appointment.name.clone(),
            email: appointment.email.clone(),
            phone: appointment.phone.clone(),
            date: appointment.date.clone(),
            time: appointment.time.clone(),
            service: appointment.service.clone(),
            notes: appointment.notes.clone(),
        }
    }
}
