use std::path::PathBuf;

use roshambo_types::{account::UserAccount, timestamp_now, AuthError, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::workbook::{read_workbook, write_workbook};

#[derive(Debug, Default, Serialize, Deserialize)]
struct UsersBook {
    #[serde(rename = "Users", default)]
    rows: Vec<UserAccount>,
}

/// Credential registry plus the session's logged-in marker.
///
/// Outer `Result` carries I/O failures; inner `Result` carries the
/// user-facing outcome.
pub struct UserStore {
    path: PathBuf,
    current_user: Option<String>,
}

impl UserStore {
    /// Opens the registry, creating an empty one if the file is missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            write_workbook(&path, &UsersBook::default())?;
            info!("Created empty user registry at {:?}", path);
        }
        Ok(Self {
            path,
            current_user: None,
        })
    }

    pub fn register(
        &mut self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<Result<(), AuthError>> {
        let mut book: UsersBook = read_workbook(&self.path)?;
        if book.rows.iter().any(|account| account.username == username) {
            info!("Registration rejected: '{}' already exists", username);
            return Ok(Err(AuthError::AlreadyExists));
        }
        book.rows.push(UserAccount {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            created_at: timestamp_now(),
            last_login: String::new(),
        });
        write_workbook(&self.path, &book)?;
        info!("Registered user '{}'", username);
        Ok(Ok(()))
    }

    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<Result<(), AuthError>> {
        let mut book: UsersBook = read_workbook(&self.path)?;
        let Some(account) = book
            .rows
            .iter_mut()
            .find(|account| account.username == username)
        else {
            info!("Login failed: unknown user '{}'", username);
            return Ok(Err(AuthError::NotFound));
        };
        if account.password != password {
            info!("Login failed: wrong password for '{}'", username);
            return Ok(Err(AuthError::WrongPassword));
        }
        account.last_login = timestamp_now();
        write_workbook(&self.path, &book)?;
        self.current_user = Some(username.to_string());
        info!("User '{}' logged in", username);
        Ok(Ok(()))
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.current_user.take() {
            info!("User '{}' logged out", user);
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub fn account(&self, username: &str) -> Result<Option<UserAccount>> {
        let book: UsersBook = read_workbook(&self.path)?;
        Ok(book.rows.into_iter().find(|account| account.username == username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::testing::scratch_dir;
    use std::fs;

    #[test]
    fn open_creates_registry_file() {
        let dir = scratch_dir("users-open");
        let path = dir.join("users.json");
        let store = UserStore::open(&path).expect("open");
        assert!(path.exists());
        assert!(!store.is_authenticated());
        assert_eq!(store.current_user(), None);
        fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn duplicate_registration_fails() {
        let dir = scratch_dir("users-duplicate");
        let mut store = UserStore::open(dir.join("users.json")).expect("open");
        assert_eq!(store.register("alice", "pw", "a@x.io").expect("io"), Ok(()));
        assert_eq!(
            store.register("alice", "other", "b@x.io").expect("io"),
            Err(AuthError::AlreadyExists)
        );
        assert_eq!(store.register("Alice", "pw", "c@x.io").expect("io"), Ok(()));

        let account = store.account("alice").expect("io").expect("present");
        assert_eq!(account.email, "a@x.io");
        assert!(account.last_login.is_empty());
        assert!(!account.created_at.is_empty());
        fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn authenticate_outcomes() {
        let dir = scratch_dir("users-auth");
        let mut store = UserStore::open(dir.join("users.json")).expect("open");
        store.register("alice", "pw", "a@x.io").expect("io").expect("registered");

        assert_eq!(
            store.authenticate("bob", "pw").expect("io"),
            Err(AuthError::NotFound)
        );
        assert_eq!(
            store.authenticate("alice", "nope").expect("io"),
            Err(AuthError::WrongPassword)
        );
        assert!(!store.is_authenticated());

        assert_eq!(store.authenticate("alice", "pw").expect("io"), Ok(()));
        assert_eq!(store.current_user(), Some("alice"));
        let account = store.account("alice").expect("io").expect("present");
        assert!(!account.last_login.is_empty());

        store.logout();
        assert!(!store.is_authenticated());
        fs::remove_dir_all(&dir).expect("cleanup");
    }
}
