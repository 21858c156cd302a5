use crate::domain::appointment::{Appointment, AppointmentFields};
use crate::domain::filter::{self, ViewFilter};
use crate::domain::ports::{APPOINTMENTS_KEY, ClockBox, KeyValueStoreBox};
use crate::domain::slot::{SLOT_CATALOG, SlotAvailability};
use crate::error::{BookingError, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::{NoContext, Timestamp, Uuid};

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub today: usize,
    /// Strictly after today.
    pub upcoming: usize,
}

/// Single source of truth for the appointment collection.
///
/// `BookingEngine` owns the in-memory collection and writes it back to the
/// injected store after every mutation. Both the public and the admin front-end
/// build one of these over the same store; there is no change notification
/// between instances, so the last writer wins.
pub struct BookingEngine {
    store: KeyValueStoreBox,
    clock: ClockBox,
    appointments: Vec<Appointment>,
}

enum Parsed {
    Clean(Vec<Appointment>),
    Dropped { kept: Vec<Appointment>, dropped: usize },
    Corrupt(String),
}

impl BookingEngine {
    /// Creates an engine with an empty collection. Call
    /// [`load_appointments`](Self::load_appointments) to read the store.
    pub fn new(store: KeyValueStoreBox, clock: ClockBox) -> Self {
        Self {
            store,
            clock,
            appointments: Vec::new(),
        }
    }

    /// Creates an engine and loads the stored collection.
    ///
    /// The second element carries the recoverable load warning, if any.
    pub fn open(store: KeyValueStoreBox, clock: ClockBox) -> Result<(Self, Option<BookingError>)> {
        let mut engine = Self::new(store, clock);
        let warning = engine.load_appointments()?;
        Ok((engine, warning))
    }

    /// Replaces the in-memory collection with the stored one.
    ///
    /// Fails soft: an unreadable value resets the collection to empty and is
    /// reported as [`BookingError::Deserialization`]. Malformed records are
    /// dropped, the cleaned list is written back, and
    /// [`BookingError::RecordsDropped`] is reported once. Only storage
    /// failures are returned as `Err`.
    pub fn load_appointments(&mut self) -> Result<Option<BookingError>> {
        let Some(raw) = self.store.get(APPOINTMENTS_KEY)? else {
            self.appointments.clear();
            return Ok(None);
        };

        match parse_stored(&raw) {
            Parsed::Clean(appointments) => {
                debug!(count = appointments.len(), "loaded appointments");
                self.appointments = appointments;
                Ok(None)
            }
            Parsed::Dropped { kept, dropped } => {
                warn!(dropped, kept = kept.len(), "dropped malformed appointments");
                self.appointments = kept;
                self.persist()?;
                Ok(Some(BookingError::RecordsDropped { dropped }))
            }
            Parsed::Corrupt(reason) => {
                warn!(%reason, "stored appointments unreadable, starting empty");
                self.appointments.clear();
                Ok(Some(BookingError::Deserialization {
                    key: APPOINTMENTS_KEY,
                    reason,
                }))
            }
        }
    }

    /// Read-only snapshot of the collection, in storage order.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn get(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn occupant(&self, date: &str, time: &str, exclude_id: Option<&str>) -> Option<&Appointment> {
        self.appointments
            .iter()
            .find(|a| a.occupies(date, time) && exclude_id.is_none_or(|id| a.id != id))
    }

    /// Whether another appointment already holds `date` at `time`.
    ///
    /// Pass the id of the record being edited as `exclude_id` so it does not
    /// conflict with itself.
    pub fn is_slot_booked(&self, date: &str, time: &str, exclude_id: Option<&str>) -> bool {
        self.occupant(date, time, exclude_id).is_some()
    }

    /// The whole slot catalog for `date`, in catalog order.
    ///
    /// When `exclude_id` names a record on `date`, that record's own slot is
    /// always reported free so it can be re-selected.
    pub fn available_slots(&self, date: &str, exclude_id: Option<&str>) -> Vec<SlotAvailability> {
        let own_time = exclude_id
            .and_then(|id| self.get(id))
            .filter(|a| a.date == date)
            .map(|a| a.time.as_str());

        SLOT_CATALOG
            .iter()
            .map(|&time| {
                if own_time == Some(time) {
                    return SlotAvailability::free(time);
                }
                match self.occupant(date, time, exclude_id) {
                    Some(holder) => SlotAvailability::taken(time, holder.name.clone()),
                    None => SlotAvailability::free(time),
                }
            })
            .collect()
    }

    /// Books a new appointment.
    pub fn create(&mut self, fields: AppointmentFields) -> Result<Appointment> {
        let fields = fields.normalized();
        let date = fields.validate()?;
        let today = self.clock.today();
        if date < today {
            return Err(BookingError::PastDate {
                date: fields.date,
                today: today.format("%Y-%m-%d").to_string(),
            });
        }
        if let Some(holder) = self.occupant(&fields.date, &fields.time, None) {
            return Err(conflict(&fields, holder));
        }

        let now = self.clock.now();
        let appointment = fields.into_appointment(new_id(now), timestamp(now));
        self.appointments.push(appointment.clone());
        if let Err(e) = self.persist() {
            self.appointments.pop();
            return Err(e);
        }

        info!(
            id = %appointment.id,
            date = %appointment.date,
            time = %appointment.time,
            "appointment created"
        );
        Ok(appointment)
    }

    /// Replaces an existing appointment's fields, keeping its id and `createdAt`.
    ///
    /// Conflicts are checked before existence, so a stale id that collides with
    /// another booking reports the conflict.
    pub fn update(&mut self, id: &str, fields: AppointmentFields) -> Result<Appointment> {
        let fields = fields.normalized();
        fields.validate()?;
        if let Some(holder) = self.occupant(&fields.date, &fields.time, Some(id)) {
            return Err(conflict(&fields, holder));
        }

        let index = self
            .appointments
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        let created_at = self.appointments[index].created_at.clone();
        let updated = fields.into_appointment(id.to_string(), created_at);
        let previous = std::mem::replace(&mut self.appointments[index], updated.clone());
        if let Err(e) = self.persist() {
            self.appointments[index] = previous;
            return Err(e);
        }

        info!(id, date = %updated.date, time = %updated.time, "appointment updated");
        Ok(updated)
    }

    /// Removes the appointment with `id`, reporting whether one was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.appointments.len();
        self.appointments.retain(|a| a.id != id);
        let removed = self.appointments.len() != before;
        self.persist()?;
        if removed {
            info!(id, "appointment deleted");
        }
        Ok(removed)
    }

    /// Writes the whole collection to the store.
    pub fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.appointments)?;
        self.store.set(APPOINTMENTS_KEY, &json)?;
        debug!(count = self.appointments.len(), "appointments persisted");
        Ok(())
    }

    /// Appointments matching `filter`, sorted by (date, time).
    pub fn display(&self, filter: &ViewFilter) -> Vec<&Appointment> {
        let mut view = filter::apply(&self.appointments, filter, self.today());
        filter::sort_for_display(&mut view);
        view
    }

    pub fn stats(&self) -> Stats {
        let today = self.today().format("%Y-%m-%d").to_string();
        Stats {
            total: self.appointments.len(),
            today: self.appointments.iter().filter(|a| a.date == today).count(),
            upcoming: self
                .appointments
                .iter()
                .filter(|a| a.date.as_str() > today.as_str())
                .count(),
        }
    }
}

fn conflict(fields: &AppointmentFields, holder: &Appointment) -> BookingError {
    let occupant = if holder.name.is_empty() {
        "another appointment".to_string()
    } else {
        holder.name.clone()
    };
    BookingError::Conflict {
        date: fields.date.clone(),
        time: fields.time.clone(),
        occupant,
    }
}

fn new_id(now: DateTime<Utc>) -> String {
    let ts = Timestamp::from_unix(
        NoContext,
        now.timestamp().max(0) as u64,
        now.timestamp_subsec_nanos(),
    );
    Uuid::new_v7(ts).to_string()
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_stored(raw: &str) -> Parsed {
    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(Value::Null) => return Parsed::Clean(Vec::new()),
        Ok(other) => {
            return Parsed::Corrupt(format!("expected a JSON array, found {}", json_kind(&other)));
        }
        Err(e) => return Parsed::Corrupt(e.to_string()),
    };

    let total = items.len();
    let kept: Vec<Appointment> = items.into_iter().filter_map(well_formed).collect();
    match total - kept.len() {
        0 => Parsed::Clean(kept),
        dropped => Parsed::Dropped { kept, dropped },
    }
}

/// Keeps records with an id and at least one way to identify the client.
///
/// A field counts as filled when it holds a truthy value of any JSON type.
fn well_formed(item: Value) -> Option<Appointment> {
    let identifiable = {
        let record = item.as_object()?;
        let filled = |key: &str| record.get(key).is_some_and(truthy);
        filled("id") && (filled("name") || filled("email") || filled("phone"))
    };
    if !identifiable {
        return None;
    }
    serde_json::from_value(item).ok()
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
