//! JSON-file-backed credential store.
//!
//! The whole user set lives in a single JSON array on disk. Every mutation
//! loads the file, rewrites the full set, and renames the result into place;
//! the load-mutate-write sequence runs under one async mutex so two
//! concurrent registrations cannot overwrite each other's append. Reads go
//! straight to the file: the rename keeps them consistent, and an absent
//! file reads as an empty store (only [`UserStore::initialize`] seeds).

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};
use utoipa::ToSchema;

pub mod password;

/// Demo accounts written on first start when the store file is absent.
/// They all share [`SEED_PASSWORD`], hashed at seed time.
const SEED_USERS: &[(&str, &str, &str, &str)] = &[
    (
        "1",
        "John Doe",
        "john@example.com",
        "https://placehold.co/60x60/0f172a/white?text=JD",
    ),
    (
        "2",
        "Jane Smith",
        "jane@example.com",
        "https://placehold.co/60x60/0f172a/white?text=JS",
    ),
];

const SEED_PASSWORD: &str = "password123";

/// A registered user as persisted in the store file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Decimal string, unique and strictly increasing.
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2id PHC string. The serialized field keeps the original file's
    /// `password` name so the on-disk schema is unchanged.
    #[serde(rename = "password")]
    pub password_hash: String,
    /// Placeholder avatar URL derived from the user's initials.
    pub image: String,
}

impl User {
    /// The password-free projection handed to API callers.
    #[must_use]
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
        }
    }
}

/// The subset of a user record that is safe to return in responses.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: String,
}

/// Fields for a user about to be created; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("credential store file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("a user with this email already exists")]
    EmailExists,
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Handle to the JSON-file-backed user store.
pub struct UserStore {
    path: PathBuf,
    /// Serializes every load-mutate-write sequence. Without it the second of
    /// two concurrent registrations silently discards the first.
    write_lock: Mutex<()>,
}

impl UserStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the store file exists, seeding the demo users when absent.
    ///
    /// Called once at server start; read paths never seed.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] if the directory or file cannot be
    /// created, or [`StoreError::Hash`] if seeding fails to hash.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let users = seed_users()?;
        self.write_all(&users).await?;
        info!(
            path = %self.path.display(),
            "seeded credential store with demo users"
        );
        Ok(())
    }

    /// Load every user record.
    ///
    /// # Errors
    /// Returns [`StoreError::Corrupt`] when the file content is not a valid
    /// user array, [`StoreError::Io`] on filesystem failure. An absent file
    /// is an empty store, not an error.
    pub async fn load_all(&self) -> Result<Vec<User>, StoreError> {
        read_users(&self.path).await
    }

    /// Append a new user, assigning the next id.
    ///
    /// The duplicate check, id assignment, and rewrite all happen under the
    /// store's write lock.
    ///
    /// # Errors
    /// Returns [`StoreError::EmailExists`] when the email is already
    /// registered (exact, case-sensitive match), or an I/O or corruption
    /// error from the underlying file.
    pub async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut users = read_users(&self.path).await?;
        if users.iter().any(|user| user.email == new_user.email) {
            return Err(StoreError::EmailExists);
        }
        let user = User {
            id: next_id(&users),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            image: new_user.image,
        };
        users.push(user.clone());
        self.write_all(&users).await?;
        debug!(user.id = %user.id, "appended user to credential store");
        Ok(user)
    }

    /// Find the first user whose email matches exactly and whose stored hash
    /// verifies against the supplied password. File order breaks ties.
    ///
    /// # Errors
    /// Returns an I/O or corruption error from the underlying file; a
    /// credential mismatch is `Ok(None)`.
    pub async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, StoreError> {
        let users = read_users(&self.path).await?;
        Ok(users
            .into_iter()
            .find(|user| user.email == email && password::verify(password, &user.password_hash)))
    }

    /// Rewrite the whole store. Writes go to a sibling temp path first and
    /// are renamed into place, so an interrupted write cannot leave a
    /// truncated store behind.
    async fn write_all(&self, users: &[User]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(users)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json.as_bytes()).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

async fn read_users(path: &Path) -> Result<Vec<User>, StoreError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(StoreError::Io(err)),
    };
    Ok(serde_json::from_str(&contents)?)
}

/// Next id is one past the highest numeric id, "1" for an empty store.
/// Non-numeric ids are ignored rather than poisoning the sequence.
fn next_id(users: &[User]) -> String {
    let max = users
        .iter()
        .filter_map(|user| user.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    (max + 1).to_string()
}

fn seed_users() -> Result<Vec<User>, StoreError> {
    SEED_USERS
        .iter()
        .map(|&(id, name, email, image)| {
            let password_hash =
                password::hash(SEED_PASSWORD).map_err(|e| StoreError::Hash(e.to_string()))?;
            Ok(User {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                image: image.to_string(),
            })
        })
        .collect()
}
