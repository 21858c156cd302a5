use crate::domain::appointment::{Appointment, service_label};
use crate::error::{BookingError, Result};
use chrono::NaiveDate;
use std::io::Write;

/// Column headers of the spreadsheet export.
pub const EXPORT_HEADERS: [&str; 8] = [
    "Nome",
    "Email",
    "Telefone",
    "Data",
    "Horário",
    "Serviço",
    "Observações",
    "Data de Criação",
];

/// Default file name for an export made on `today`.
pub fn export_filename(today: NaiveDate) -> String {
    format!("agendamentos_{}.csv", today.format("%Y-%m-%d"))
}

/// Writes appointments as CSV for spreadsheet export.
///
/// Free-text columns (name, email, phone, service label, notes) are always
/// wrapped in double quotes with embedded quotes doubled; date, time and
/// creation timestamp are written bare. Quoting is applied per column here, so
/// the underlying `csv::Writer` runs with `QuoteStyle::Never`.
pub struct AppointmentWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AppointmentWriter<W> {
    pub fn new(sink: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(sink);
        Self { writer }
    }

    /// Writes the header row followed by one row per appointment, in the given order.
    pub fn write_appointments<'a, I>(&mut self, appointments: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Appointment>,
    {
        self.writer.write_record(EXPORT_HEADERS)?;
        for appointment in appointments {
            self.writer.write_record([
                quoted(&appointment.name),
                quoted(&appointment.email),
                quoted(&appointment.phone),
                appointment.date.clone(),
                appointment.time.clone(),
                quoted(service_label(&appointment.service)),
                quoted(appointment.notes.as_deref().unwrap_or_default()),
                appointment.created_at.clone(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| BookingError::Io(e.into_error()))
    }
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
