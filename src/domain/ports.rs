use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};

/// Key holding the JSON array of appointments.
pub const APPOINTMENTS_KEY: &str = "appointments";
/// Key holding the JSON array of admin accounts.
pub const ADMINS_KEY: &str = "admins";
/// Key holding the signed-in username as a plain string.
pub const CURRENT_USER_KEY: &str = "currentUser";
/// Presence flag consumed by the login gate.
pub const AUTHENTICATED_KEY: &str = "adminAuthenticated";

/// A local string-to-string store, the only persistence the booking core uses.
///
/// Implementations must be safe to share between two engine instances in the
/// same process. There is no cross-process locking: the last writer wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Source of the current instant. Injected so "today"-relative logic is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub type KeyValueStoreBox = Box<dyn KeyValueStore>;
pub type ClockBox = Box<dyn Clock>;
pub type KeyValueStoreFactory = Box<dyn Fn() -> KeyValueStoreBox + Send + Sync>;
