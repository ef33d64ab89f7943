//! JSON document adapter for the [`UserRepository`] port.
//!
//! The collection lives in one file holding a bare JSON array: no envelope,
//! no metadata. Reads parse the entire file. Writes serialise the entire
//! collection into a staging file beside the document and rename it into
//! place, so a reader sees either the old array or the new one.
//!
//! File access goes through `cap_std::fs::Dir` scoped to the document's
//! directory, and runs on Tokio's blocking pool.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::User;
use crate::domain::ports::{UserPersistenceError, UserRepository};

const EMPTY_COLLECTION: &[u8] = b"[]";

#[derive(Debug)]
struct Document {
    directory: PathBuf,
    file_name: String,
    location: String,
}

impl Document {
    fn open_directory(&self) -> io::Result<Dir> {
        Dir::open_ambient_dir(&self.directory, ambient_authority())
    }

    fn staging_name(&self) -> String {
        format!(".{}.tmp-{}", self.file_name, Uuid::new_v4().simple())
    }
}

/// User repository persisting the collection as one JSON file.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use user_registry::domain::UserDirectoryService;
/// use user_registry::outbound::persistence::JsonFileUserRepository;
///
/// let repository = JsonFileUserRepository::new("db.json").expect("valid path");
/// let service = UserDirectoryService::new(Arc::new(repository));
/// # drop(service);
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileUserRepository {
    document: Arc<Document>,
}

impl JsonFileUserRepository {
    /// Point the repository at the document stored at `path`.
    ///
    /// The file itself need not exist yet; see [`Self::ensure_document`].
    ///
    /// # Errors
    /// Returns [`UserPersistenceError::Read`] when `path` has no UTF-8 file
    /// name component.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, UserPersistenceError> {
        let path = path.into();
        let location = path.display().to_string();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                UserPersistenceError::read(
                    location.as_str(),
                    "path must end in a UTF-8 file name",
                )
            })?
            .to_owned();
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self {
            document: Arc::new(Document {
                directory,
                file_name,
                location,
            }),
        })
    }

    /// Full path of the backing document.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.document.directory.join(&self.document.file_name)
    }

    /// Create the document holding an empty collection when it is absent.
    ///
    /// Missing parent directories are created too. Returns `true` when a new
    /// document was written and `false` when one already existed.
    ///
    /// # Errors
    /// Returns [`UserPersistenceError::Write`] when the directory or file
    /// cannot be created.
    pub async fn ensure_document(&self) -> Result<bool, UserPersistenceError> {
        let document = Arc::clone(&self.document);
        let created = run_blocking(&self.document, UserPersistenceError::write, move || {
            ensure_document(&document)
        })
        .await?;
        if created {
            info!(location = %self.document.location, "created empty users document");
        }
        Ok(created)
    }
}

#[async_trait]
impl UserRepository for JsonFileUserRepository {
    async fn load_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let document = Arc::clone(&self.document);
        let users = run_blocking(&self.document, UserPersistenceError::read, move || {
            read_users(&document)
        })
        .await?;
        debug!(location = %self.document.location, count = users.len(), "loaded users");
        Ok(users)
    }

    async fn save_all(&self, users: &[User]) -> Result<(), UserPersistenceError> {
        let payload = serde_json::to_vec(users).map_err(|err| {
            UserPersistenceError::write(self.document.location.as_str(), err.to_string())
        })?;
        let count = users.len();
        let document = Arc::clone(&self.document);
        run_blocking(&self.document, UserPersistenceError::write, move || {
            write_users(&document, &payload)
        })
        .await?;
        debug!(location = %self.document.location, count, "saved users");
        Ok(())
    }
}

async fn run_blocking<T, F>(
    document: &Document,
    on_join_error: fn(String, String) -> UserPersistenceError,
    operation: F,
) -> Result<T, UserPersistenceError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, UserPersistenceError> + Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(|err| on_join_error(document.location.clone(), err.to_string()))?
}

fn read_users(document: &Document) -> Result<Vec<User>, UserPersistenceError> {
    let read_error =
        |err: io::Error| UserPersistenceError::read(document.location.as_str(), err.to_string());
    let directory = document.open_directory().map_err(read_error)?;
    let contents = directory
        .read_to_string(Path::new(&document.file_name))
        .map_err(read_error)?;
    serde_json::from_str(&contents).map_err(|err| {
        UserPersistenceError::malformed(document.location.as_str(), err.to_string())
    })
}

fn write_users(document: &Document, payload: &[u8]) -> Result<(), UserPersistenceError> {
    let write_error =
        |err: io::Error| UserPersistenceError::write(document.location.as_str(), err.to_string());
    let directory = document.open_directory().map_err(write_error)?;
    let staging = document.staging_name();

    directory.write(&staging, payload).map_err(write_error)?;
    if let Err(err) = directory.rename(&staging, &directory, &document.file_name) {
        let _cleanup_result = directory.remove_file(&staging);
        return Err(write_error(err));
    }
    Ok(())
}

fn ensure_document(document: &Document) -> Result<bool, UserPersistenceError> {
    let write_error =
        |err: io::Error| UserPersistenceError::write(document.location.as_str(), err.to_string());
    Dir::create_ambient_dir_all(&document.directory, ambient_authority()).map_err(write_error)?;
    let directory = document.open_directory().map_err(write_error)?;
    if directory.exists(&document.file_name) {
        return Ok(false);
    }
    directory
        .write(&document.file_name, EMPTY_COLLECTION)
        .map_err(write_error)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures::{profile, user_with_id};
    use crate::domain::UserId;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Workspace {
        _dir: TempDir,
        repository: JsonFileUserRepository,
        directory: Dir,
    }

    impl Workspace {
        fn write_raw(&self, contents: &str) {
            self.directory
                .write("db.json", contents)
                .expect("raw document written");
        }

        fn read_raw(&self) -> String {
            self.directory
                .read_to_string("db.json")
                .expect("document readable")
        }

        fn entries(&self) -> Vec<String> {
            self.directory
                .entries()
                .expect("directory listing")
                .map(|entry| {
                    entry
                        .expect("directory entry")
                        .file_name()
                        .to_string_lossy()
                        .into_owned()
                })
                .collect()
        }
    }

    #[fixture]
    fn workspace() -> Workspace {
        let dir = TempDir::new().expect("temp dir");
        let repository =
            JsonFileUserRepository::new(dir.path().join("db.json")).expect("repository path");
        let directory =
            Dir::open_ambient_dir(dir.path(), ambient_authority()).expect("open temp dir");
        Workspace {
            _dir: dir,
            repository,
            directory,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn saves_compact_array_and_loads_it_back(workspace: Workspace) {
        let users = vec![
            user_with_id("u-1", profile("ada@example.com", "ada")),
            user_with_id("u-2", profile("grace@example.com", "grace")),
        ];

        workspace
            .repository
            .save_all(&users)
            .await
            .expect("save succeeds");

        let raw = workspace.read_raw();
        assert!(raw.starts_with("[{\"id\":\"u-1\""));
        assert!(!raw.contains('\n'));
        let loaded = workspace.repository.load_all().await.expect("load succeeds");
        assert_eq!(loaded, users);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_document_is_a_read_error(workspace: Workspace) {
        let err = workspace
            .repository
            .load_all()
            .await
            .expect_err("document absent");
        assert!(matches!(err, UserPersistenceError::Read { .. }));
    }

    #[rstest]
    #[case("{\"users\": []}")]
    #[case("[{\"id\": \"u-1\"}]")]
    #[case("not json")]
    #[case(
        r#"[{"id": 5, "first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com",
            "phone_number": "123", "birthdate": "2000-01-01", "username": "ada"}]"#
    )]
    #[tokio::test]
    async fn unexpected_shapes_are_malformed(workspace: Workspace, #[case] contents: &str) {
        workspace.write_raw(contents);
        let err = workspace
            .repository
            .load_all()
            .await
            .expect_err("document malformed");
        assert!(matches!(err, UserPersistenceError::Malformed { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn save_leaves_no_staging_files(workspace: Workspace) {
        workspace.write_raw("[]");
        let users = vec![user_with_id("u-1", profile("ada@example.com", "ada"))];
        workspace
            .repository
            .save_all(&users)
            .await
            .expect("save succeeds");
        assert_eq!(workspace.entries(), vec!["db.json".to_owned()]);
    }

    #[rstest]
    #[tokio::test]
    async fn ensure_document_creates_empty_collection_once(workspace: Workspace) {
        assert!(workspace.repository.ensure_document().await.expect("created"));
        assert_eq!(workspace.read_raw(), "[]");

        let users = vec![user_with_id("u-1", profile("ada@example.com", "ada"))];
        workspace
            .repository
            .save_all(&users)
            .await
            .expect("save succeeds");
        assert!(!workspace.repository.ensure_document().await.expect("exists"));
        let loaded = workspace.repository.load_all().await.expect("load succeeds");
        assert_eq!(loaded.first().map(User::id), Some(&UserId::new("u-1").expect("id")));
    }

    #[rstest]
    fn bare_file_names_resolve_to_current_directory() {
        let repository = JsonFileUserRepository::new("db.json").expect("valid path");
        assert_eq!(repository.path(), PathBuf::from(".").join("db.json"));
    }

    #[rstest]
    fn paths_without_file_names_are_rejected() {
        let err = JsonFileUserRepository::new("/").expect_err("no file name");
        assert!(matches!(err, UserPersistenceError::Read { .. }));
    }
}
