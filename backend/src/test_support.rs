//! Test utilities for the registry crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and when the `test-support` feature is enabled.

pub mod fixtures {
    //! Builders for well-formed payloads and users.

    use serde_json::{Map, Value, json};

    use crate::domain::{User, UserId, UserProfile};

    /// A complete create payload using `email` and `username`.
    ///
    /// # Panics
    /// Never in practice; the literal is always a JSON object.
    #[must_use]
    pub fn payload(email: &str, username: &str) -> Map<String, Value> {
        let value = json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": email,
            "phone_number": "123",
            "birthdate": "2000-01-01",
            "username": username,
        });
        match value {
            Value::Object(map) => map,
            other => panic!("payload fixture must be an object, got {other}"),
        }
    }

    /// A validated profile using `email` and `username`.
    ///
    /// # Panics
    /// Panics if the fixture payload stops satisfying validation.
    #[must_use]
    pub fn profile(email: &str, username: &str) -> UserProfile {
        UserProfile::try_from_payload(payload(email, username))
            .unwrap_or_else(|err| panic!("fixture profile must validate: {err}"))
    }

    /// A stored user with a fixed identifier.
    ///
    /// # Panics
    /// Panics if `id` is empty.
    #[must_use]
    pub fn user_with_id(id: &str, profile: UserProfile) -> User {
        let id = UserId::new(id).unwrap_or_else(|err| panic!("fixture id must validate: {err}"));
        User::new(id, profile)
    }
}

pub mod memory {
    //! In-memory repository double.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use async_trait::async_trait;

    use crate::domain::User;
    use crate::domain::ports::{UserPersistenceError, UserRepository};

    /// Repository keeping the collection in memory and counting writes.
    #[derive(Debug, Default)]
    pub struct InMemoryUserRepository {
        users: Mutex<Vec<User>>,
        saves: AtomicUsize,
    }

    impl InMemoryUserRepository {
        /// Seed the repository with `users`.
        #[must_use]
        pub fn with_users(users: Vec<User>) -> Self {
            Self {
                users: Mutex::new(users),
                saves: AtomicUsize::new(0),
            }
        }

        /// Snapshot of the stored collection.
        #[must_use]
        pub fn snapshot(&self) -> Vec<User> {
            self.lock().clone()
        }

        /// Number of completed `save_all` calls.
        #[must_use]
        pub fn save_count(&self) -> usize {
            self.saves.load(Ordering::Acquire)
        }

        fn lock(&self) -> MutexGuard<'_, Vec<User>> {
            self.users.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn load_all(&self) -> Result<Vec<User>, UserPersistenceError> {
            Ok(self.snapshot())
        }

        async fn save_all(&self, users: &[User]) -> Result<(), UserPersistenceError> {
            *self.lock() = users.to_vec();
            self.saves.fetch_add(1, Ordering::AcqRel);
            Ok(())
        }
    }
}

pub mod document {
    //! Temporary JSON documents backing the real file adapter.

    use std::io;
    use std::path::{Path, PathBuf};

    use cap_std::{ambient_authority, fs::Dir};
    use tempfile::TempDir;

    use crate::outbound::persistence::JsonFileUserRepository;

    /// A users document inside a private temporary directory.
    ///
    /// The directory is removed when the value is dropped.
    #[derive(Debug)]
    pub struct TempUserDocument {
        dir: TempDir,
        file_name: &'static str,
    }

    impl TempUserDocument {
        /// Create a document holding `contents`.
        ///
        /// # Errors
        /// Propagates failures creating the directory or writing the file.
        pub fn with_contents(contents: &str) -> io::Result<Self> {
            let document = Self {
                dir: TempDir::new()?,
                file_name: "db.json",
            };
            document.write(contents)?;
            Ok(document)
        }

        /// Create a document holding an empty collection.
        ///
        /// # Errors
        /// Propagates failures creating the directory or writing the file.
        pub fn empty() -> io::Result<Self> {
            Self::with_contents("[]")
        }

        /// Full path of the document.
        #[must_use]
        pub fn path(&self) -> PathBuf {
            self.dir.path().join(self.file_name)
        }

        /// Repository bound to this document.
        ///
        /// # Panics
        /// Never in practice; the path always ends in a UTF-8 file name.
        #[must_use]
        pub fn repository(&self) -> JsonFileUserRepository {
            JsonFileUserRepository::new(self.path())
                .unwrap_or_else(|err| panic!("temp document path must be valid: {err}"))
        }

        /// Overwrite the raw document text.
        ///
        /// # Errors
        /// Propagates I/O failures.
        pub fn write(&self, contents: &str) -> io::Result<()> {
            self.directory()?.write(Path::new(self.file_name), contents)
        }

        /// Read the raw document text.
        ///
        /// # Errors
        /// Propagates I/O failures, including a missing document.
        pub fn read(&self) -> io::Result<String> {
            self.directory()?.read_to_string(Path::new(self.file_name))
        }

        /// Parse the document as a JSON value.
        ///
        /// # Errors
        /// Propagates I/O failures and reports malformed JSON as
        /// [`io::ErrorKind::InvalidData`].
        pub fn read_json(&self) -> io::Result<serde_json::Value> {
            let contents = self.read()?;
            serde_json::from_str(&contents)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
        }

        fn directory(&self) -> io::Result<Dir> {
            Dir::open_ambient_dir(self.dir.path(), ambient_authority())
        }
    }
}
