use crate::domain::admin::{AdminAccount, DEFAULT_USER};
use crate::domain::ports::{ADMINS_KEY, AUTHENTICATED_KEY, CURRENT_USER_KEY, KeyValueStoreBox};
use crate::error::{BookingError, Result};
use tracing::{info, warn};

/// Administrator accounts and the dashboard session.
///
/// Keeps the invariant that at least one account exists and that the
/// signed-in user cannot remove their own account.
pub struct AdminAccountManager {
    store: KeyValueStoreBox,
    admins: Vec<AdminAccount>,
    current_user: String,
}

impl AdminAccountManager {
    /// Loads accounts and the session user from `store`.
    ///
    /// A missing, empty or unreadable account list is replaced by the seed
    /// account and written back. An unreadable list is also reported as a
    /// recoverable warning.
    pub fn open(store: KeyValueStoreBox) -> Result<(Self, Option<BookingError>)> {
        let current_user = store
            .get(CURRENT_USER_KEY)?
            .filter(|user| !user.is_empty())
            .unwrap_or_else(|| DEFAULT_USER.to_string());

        let mut warning = None;
        let admins = match store.get(ADMINS_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Option<Vec<AdminAccount>>>(&raw) {
                Ok(admins) => admins.unwrap_or_default(),
                Err(e) => {
                    warn!(error = %e, "stored admins unreadable, reseeding");
                    warning = Some(BookingError::Deserialization {
                        key: ADMINS_KEY,
                        reason: e.to_string(),
                    });
                    Vec::new()
                }
            },
        };

        let mut manager = Self {
            store,
            admins,
            current_user,
        };
        if manager.admins.is_empty() {
            manager.admins.push(AdminAccount::seed());
            manager.persist()?;
            info!("seeded default administrator account");
        }
        Ok((manager, warning))
    }

    pub fn list(&self) -> &[AdminAccount] {
        &self.admins
    }

    /// The session user, `admin` when none was recorded.
    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.store.get(AUTHENTICATED_KEY)?.is_some())
    }

    /// Plain string comparison against the stored accounts.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.admins.iter().any(|a| a.matches(username, password))
    }

    /// Records `username` as the session user and raises the login flag.
    pub fn sign_in(&mut self, username: &str, password: &str) -> Result<()> {
        if !self.verify(username, password) {
            return Err(BookingError::InvalidCredentials);
        }
        self.store.set(CURRENT_USER_KEY, username)?;
        self.store.set(AUTHENTICATED_KEY, "true")?;
        self.current_user = username.to_string();
        info!(username, "administrator signed in");
        Ok(())
    }

    /// Clears the login flag. The last session user is remembered.
    pub fn sign_out(&mut self) -> Result<()> {
        self.store.remove(AUTHENTICATED_KEY)?;
        info!(username = %self.current_user, "administrator signed out");
        Ok(())
    }

    /// Adds an account. Usernames are compared exactly, case included.
    pub fn add(&mut self, username: &str, password: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(BookingError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(BookingError::MissingField("password"));
        }
        if self.admins.iter().any(|a| a.username == username) {
            return Err(BookingError::DuplicateUsername(username.to_string()));
        }

        self.admins.push(AdminAccount::new(username, password));
        if let Err(e) = self.persist() {
            self.admins.pop();
            return Err(e);
        }
        info!(username, "administrator added");
        Ok(())
    }

    /// Removes an account other than the session user's, never the last one.
    pub fn remove(&mut self, username: &str) -> Result<()> {
        if username == self.current_user {
            return Err(BookingError::SelfRemoval);
        }
        if self.admins.len() <= 1 {
            return Err(BookingError::LastAdmin);
        }
        let index = self
            .admins
            .iter()
            .position(|a| a.username == username)
            .ok_or_else(|| BookingError::AdminNotFound(username.to_string()))?;

        let removed = self.admins.remove(index);
        if let Err(e) = self.persist() {
            self.admins.insert(index, removed);
            return Err(e);
        }
        info!(username, "administrator removed");
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.admins)?;
        self.store.set(ADMINS_KEY, &json)
    }
}
