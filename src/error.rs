use miette::Diagnostic;
use thiserror::Error;

/// Every recoverable condition the booking core can report.
///
/// Domain variants are surfaced to the user as notifications; none of them
/// are fatal. Infrastructure variants wrap failures of the storage backend.
#[derive(Error, Debug, Diagnostic)]
pub enum BookingError {
    #[error("stored {key} could not be read, the list was reset: {reason}")]
    #[diagnostic(code(agenda::deserialization))]
    Deserialization { key: &'static str, reason: String },

    #[error("{dropped} appointment(s) with invalid data were removed")]
    #[diagnostic(code(agenda::records_dropped))]
    RecordsDropped { dropped: usize },

    #[error("{date} at {time} is already booked by {occupant}")]
    #[diagnostic(
        code(agenda::conflict),
        help("pick a different slot, `agenda slots --date <DATE>` lists the free ones")
    )]
    Conflict {
        date: String,
        time: String,
        occupant: String,
    },

    #[error("appointment {0} not found")]
    #[diagnostic(code(agenda::not_found))]
    NotFound(String),

    #[error("user {0} already exists")]
    #[diagnostic(code(agenda::duplicate_username))]
    DuplicateUsername(String),

    #[error("the last administrator cannot be removed")]
    #[diagnostic(code(agenda::last_admin))]
    LastAdmin,

    #[error("you cannot remove your own user")]
    #[diagnostic(code(agenda::self_removal))]
    SelfRemoval,

    #[error("invalid username or password")]
    #[diagnostic(code(agenda::invalid_credentials))]
    InvalidCredentials,

    #[error("passwords do not match")]
    #[diagnostic(code(agenda::password_mismatch))]
    PasswordMismatch,

    #[error("administrator {0} not found")]
    #[diagnostic(code(agenda::admin_not_found))]
    AdminNotFound(String),

    #[error("{0} is required")]
    #[diagnostic(code(agenda::missing_field))]
    MissingField(&'static str),

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    #[diagnostic(code(agenda::invalid_date))]
    InvalidDate(String),

    #[error("{0:?} is not a bookable time slot")]
    #[diagnostic(code(agenda::invalid_slot), help("valid slots run 08:00-11:30 and 14:00-17:30 every 30 minutes"))]
    InvalidSlot(String),

    #[error("cannot book {date}, dates before {today} are closed")]
    #[diagnostic(code(agenda::past_date))]
    PastDate { date: String, today: String },

    #[error("storage error: {0}")]
    #[diagnostic(code(agenda::storage))]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    #[diagnostic(code(agenda::config))]
    Config(#[from] config::ConfigError),
}

impl BookingError {
    /// Whether this is a failure of the environment (storage, files,
    /// configuration) rather than a rejected request.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            BookingError::Storage(_)
                | BookingError::Io(_)
                | BookingError::Csv(_)
                | BookingError::Json(_)
                | BookingError::Config(_)
        )
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for BookingError {
    fn from(err: rocksdb::Error) -> Self {
        BookingError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
