//! Tests for the directory service's use-cases and write serialisation.

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockUserRepository;
use crate::test_support::fixtures::{profile, user_with_id};
use crate::test_support::memory::InMemoryUserRepository;
use futures_util::future::join_all;
use rstest::{fixture, rstest};

/// Repository that yields between load and save so unserialised writers
/// would interleave.
#[derive(Default)]
struct YieldingRepository {
    inner: InMemoryUserRepository,
}

#[async_trait]
impl UserRepository for YieldingRepository {
    async fn load_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let users = self.inner.load_all().await;
        tokio::task::yield_now().await;
        users
    }

    async fn save_all(&self, users: &[User]) -> Result<(), UserPersistenceError> {
        tokio::task::yield_now().await;
        self.inner.save_all(users).await
    }
}

#[fixture]
fn repository() -> Arc<InMemoryUserRepository> {
    Arc::new(InMemoryUserRepository::with_users(vec![user_with_id(
        "u-1",
        profile("ada@example.com", "ada"),
    )]))
}

fn id(value: &str) -> UserId {
    UserId::new(value).expect("fixture id")
}

#[rstest]
#[tokio::test]
async fn create_returns_whole_collection(repository: Arc<InMemoryUserRepository>) {
    let service = UserDirectoryService::new(Arc::clone(&repository));
    let users = service
        .create_user(profile("grace@example.com", "grace"))
        .await
        .expect("create succeeds");
    assert_eq!(users.len(), 2);
    assert_eq!(repository.snapshot(), users);
}

#[rstest]
#[case("ada@example.com", "newcomer")]
#[case("newcomer@example.com", "ada")]
#[case("ada", "newcomer")]
#[case("newcomer@example.com", "ada@example.com")]
#[tokio::test]
async fn create_rejects_claimed_identity(
    repository: Arc<InMemoryUserRepository>,
    #[case] email: &str,
    #[case] username: &str,
) {
    let service = UserDirectoryService::new(Arc::clone(&repository));
    let before = repository.snapshot();

    let err = service
        .create_user(profile(email, username))
        .await
        .expect_err("identity already claimed");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), DUPLICATE_IDENTITY_MESSAGE);
    assert_eq!(repository.snapshot(), before);
    assert_eq!(repository.save_count(), 0);
}

#[rstest]
#[tokio::test]
async fn find_user_returns_none_for_unknown_id(repository: Arc<InMemoryUserRepository>) {
    let service = UserDirectoryService::new(repository);
    let found = service.find_user(&id("u-404")).await.expect("lookup succeeds");
    assert!(found.is_none());
}

#[rstest]
#[tokio::test]
async fn edit_unknown_user_is_not_found(repository: Arc<InMemoryUserRepository>) {
    let service = UserDirectoryService::new(Arc::clone(&repository));
    let err = service
        .edit_user(user_with_id("u-404", profile("x@example.com", "x")))
        .await
        .expect_err("unknown user");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), USER_NOT_FOUND_MESSAGE);
    assert_eq!(repository.save_count(), 0);
}

#[rstest]
#[tokio::test]
async fn edit_does_not_recheck_uniqueness(repository: Arc<InMemoryUserRepository>) {
    let service = UserDirectoryService::new(Arc::clone(&repository));
    service
        .create_user(profile("grace@example.com", "grace"))
        .await
        .expect("create succeeds");

    let users = service
        .edit_user(user_with_id("u-1", profile("grace@example.com", "grace")))
        .await
        .expect("edit succeeds");
    assert_eq!(
        users
            .iter()
            .filter(|user| user.profile().email() == "grace@example.com")
            .count(),
        2
    );
}

#[rstest]
#[tokio::test]
async fn delete_then_delete_again_is_not_found(repository: Arc<InMemoryUserRepository>) {
    let service = UserDirectoryService::new(Arc::clone(&repository));
    let users = service.delete_user(&id("u-1")).await.expect("delete succeeds");
    assert!(users.is_empty());

    let err = service
        .delete_user(&id("u-1"))
        .await
        .expect_err("already deleted");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(repository.save_count(), 1);
}

#[rstest]
#[tokio::test]
async fn storage_failures_become_internal_errors() {
    let mut repository = MockUserRepository::new();
    repository
        .expect_load_all()
        .returning(|| Err(UserPersistenceError::malformed("db.json", "expected array")));
    let service = UserDirectoryService::new(Arc::new(repository));

    let err = service.list_users().await.expect_err("document malformed");
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert!(err.message().contains("expected array"));
}

#[rstest]
#[tokio::test]
async fn concurrent_creates_are_all_persisted() {
    let repository = Arc::new(YieldingRepository::default());
    let service = UserDirectoryService::new(Arc::clone(&repository));

    let results = join_all((0..8).map(|n| {
        let service = &service;
        async move {
            service
                .create_user(profile(&format!("user{n}@example.com"), &format!("user{n}")))
                .await
        }
    }))
    .await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(repository.inner.snapshot().len(), 8);
}

#[rstest]
#[tokio::test]
async fn concurrent_duplicate_creates_admit_exactly_one() {
    let repository = Arc::new(YieldingRepository::default());
    let service = UserDirectoryService::new(Arc::clone(&repository));

    let results = join_all(
        (0..4).map(|_| service.create_user(profile("same@example.com", "same"))),
    )
    .await;

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert_eq!(repository.inner.snapshot().len(), 1);
}
