//! Local-only accounts.
//!
//! Three independent records: the credential table, the current session and
//! the list of remembered profiles offered for quick switching. Passwords
//! are kept as Argon2 PHC strings, never in clear text. This is still a
//! single-device convenience login, not an authentication service.

use crate::error::AccountError;
use crate::storage::{self, KeyValueStore, SAVED_ACCOUNTS_KEY, SESSION_KEY, USERS_KEY};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use cinenote_models::User;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAccount {
    id: String,
    username: String,
    password_hash: String,
}

impl StoredAccount {
    fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }
}

pub struct AccountStore {
    storage: Arc<dyn KeyValueStore>,
}

impl AccountStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<User, AccountError> {
        let username = username.trim();
        let accounts = self.accounts()?;

        let Some(account) = accounts.iter().find(|a| a.username == username) else {
            debug!("Login failed: unknown user {}", username);
            return Err(AccountError::InvalidCredentials);
        };
        if !verify_password(password, &account.password_hash) {
            debug!("Login failed: wrong password for {}", username);
            return Err(AccountError::InvalidCredentials);
        }

        let user = account.to_user();
        self.open_session(&user)?;
        self.remember(&user)?;
        info!("Logged in as {}", user.username);
        Ok(user)
    }

    pub fn signup(&self, username: &str, password: &str) -> Result<User, AccountError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(AccountError::MissingField("password"));
        }

        let mut accounts = self.accounts()?;
        if accounts.iter().any(|a| a.username == username) {
            return Err(AccountError::UsernameTaken);
        }

        let account = StoredAccount {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: hash_password(password)?,
        };
        let user = account.to_user();
        accounts.push(account);
        storage::write_json(self.storage.as_ref(), USERS_KEY, &accounts)?;

        self.open_session(&user)?;
        self.remember(&user)?;
        info!("Created account {}", user.username);
        Ok(user)
    }

    /// Switch to a remembered profile without asking for the password
    pub fn quick_login(&self, user: &User) -> Result<User, AccountError> {
        self.open_session(user)?;
        info!("Switched to {}", user.username);
        Ok(user.clone())
    }

    pub fn logout(&self) -> Result<(), AccountError> {
        self.storage.remove(SESSION_KEY)?;
        info!("Logged out");
        Ok(())
    }

    pub fn current_user(&self) -> Result<Option<User>, AccountError> {
        Ok(storage::read_json(self.storage.as_ref(), SESSION_KEY)?)
    }

    pub fn list_saved(&self) -> Result<Vec<User>, AccountError> {
        Ok(storage::read_json(self.storage.as_ref(), SAVED_ACCOUNTS_KEY)?.unwrap_or_default())
    }

    /// Add a profile to the quick-switch list; already remembered ids are left alone
    pub fn remember(&self, user: &User) -> Result<(), AccountError> {
        let mut saved = self.list_saved()?;
        if saved.iter().any(|u| u.id == user.id) {
            return Ok(());
        }
        saved.push(user.clone());
        storage::write_json(self.storage.as_ref(), SAVED_ACCOUNTS_KEY, &saved)?;
        Ok(())
    }

    /// Drop a profile from the quick-switch list. The account itself stays.
    pub fn forget(&self, user_id: &str) -> Result<(), AccountError> {
        let mut saved = self.list_saved()?;
        let before = saved.len();
        saved.retain(|u| u.id != user_id);
        if saved.len() != before {
            storage::write_json(self.storage.as_ref(), SAVED_ACCOUNTS_KEY, &saved)?;
            info!("Forgot saved profile {}", user_id);
        }
        Ok(())
    }

    fn open_session(&self, user: &User) -> Result<(), AccountError> {
        storage::write_json(self.storage.as_ref(), SESSION_KEY, user)?;
        Ok(())
    }

    fn accounts(&self) -> Result<Vec<StoredAccount>, AccountError> {
        Ok(storage::read_json(self.storage.as_ref(), USERS_KEY)?.unwrap_or_default())
    }
}

fn hash_password(password: &str) -> Result<String, AccountError> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AccountError::PasswordHash(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            warn!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> (Arc<dyn KeyValueStore>, AccountStore) {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (storage.clone(), AccountStore::new(storage))
    }

    #[test]
    fn test_signup_then_login() {
        let (_, accounts) = store();
        let created = accounts.signup("rina", "popcorn").unwrap();
        assert_eq!(accounts.current_user().unwrap(), Some(created.clone()));

        accounts.logout().unwrap();
        assert_eq!(accounts.current_user().unwrap(), None);

        let logged_in = accounts.login("rina", "popcorn").unwrap();
        assert_eq!(logged_in, created);
    }

    #[test]
    fn test_password_is_not_stored_in_clear() {
        let (storage, accounts) = store();
        accounts.signup("rina", "popcorn").unwrap();
        let raw = storage.get(USERS_KEY).unwrap().unwrap();
        assert!(!raw.contains("popcorn"));
        assert!(raw.contains("$argon2"));
    }

    #[test]
    fn test_invalid_credentials() {
        let (_, accounts) = store();
        accounts.signup("rina", "popcorn").unwrap();
        assert!(matches!(accounts.login("rina", "nachos"), Err(AccountError::InvalidCredentials)));
        assert!(matches!(accounts.login("budi", "popcorn"), Err(AccountError::InvalidCredentials)));
    }

    #[test]
    fn test_username_taken() {
        let (_, accounts) = store();
        accounts.signup("rina", "popcorn").unwrap();
        assert!(matches!(accounts.signup("rina", "other"), Err(AccountError::UsernameTaken)));
    }

    #[test]
    fn test_missing_fields() {
        let (_, accounts) = store();
        assert!(matches!(accounts.signup("  ", "x"), Err(AccountError::MissingField("username"))));
        assert!(matches!(accounts.signup("rina", ""), Err(AccountError::MissingField("password"))));
    }

    #[test]
    fn test_saved_profiles_and_quick_login() {
        let (_, accounts) = store();
        let rina = accounts.signup("rina", "popcorn").unwrap();
        let budi = accounts.signup("budi", "nachos").unwrap();
        accounts.login("rina", "popcorn").unwrap();

        let saved = accounts.list_saved().unwrap();
        assert_eq!(saved, vec![rina.clone(), budi.clone()]);

        accounts.logout().unwrap();
        let switched = accounts.quick_login(&budi).unwrap();
        assert_eq!(switched, budi);
        assert_eq!(accounts.current_user().unwrap(), Some(budi.clone()));

        accounts.forget(&budi.id).unwrap();
        accounts.forget(&budi.id).unwrap();
        assert_eq!(accounts.list_saved().unwrap(), vec![rina]);
        // Forgetting a profile does not end the session or delete the account
        assert_eq!(accounts.current_user().unwrap(), Some(budi));
        assert!(accounts.login("budi", "nachos").is_ok());
    }

    #[test]
    fn test_corrupt_session_reads_as_logged_out() {
        let (storage, accounts) = store();
        storage.set(SESSION_KEY, "not json").unwrap();
        assert_eq!(accounts.current_user().unwrap(), None);
    }
}
