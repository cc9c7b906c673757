/// Repository tests over the public lookup surface, using a mock directory
/// that counts collaborator invocations.
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use userdir::{
    AttributeSet, DirectoryConfig, DirectorySearch, ProfileCache, UserDirError, UserDirResult,
    UserInfoRepository,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "userdir=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Mock directory with fixed records, an invocation counter, a switchable
/// failure mode, and an optional per-call delay to widen race windows.
struct MockDirectory {
    records: HashMap<String, AttributeSet>,
    calls: AtomicUsize,
    failing: AtomicBool,
    delay: Option<Duration>,
}

impl MockDirectory {
    fn new() -> Self {
        Self {
            records: HashMap::new(),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            delay: None,
        }
    }

    fn with_user(mut self, username: &str) -> Self {
        let attrs: AttributeSet = [
            ("uid", username.to_string()),
            ("mail", format!("{username}@example.com")),
            ("displayName", format!("User {username}")),
        ]
        .into_iter()
        .collect();
        self.records.insert(username.to_string(), attrs);
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectorySearch for MockDirectory {
    async fn search_for_user(&self, username: &str) -> UserDirResult<Option<AttributeSet>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(UserDirError::Directory("connection refused".to_string()));
        }

        Ok(self.records.get(username).cloned())
    }
}

fn repository(directory: Arc<MockDirectory>) -> UserInfoRepository {
    UserInfoRepository::new(directory, DirectoryConfig::default())
}

#[tokio::test]
async fn test_repeated_username_lookup_hits_directory_once() {
    init_tracing();
    let directory = Arc::new(MockDirectory::new().with_user("alice"));
    let repo = repository(Arc::clone(&directory));

    let first = repo.get_by_username("alice").await;
    let second = repo.get_by_username("alice").await;

    assert_eq!(first, second);
    let profile = first.expect("alice should resolve");
    assert_eq!(profile.sub, "alice");
    assert_eq!(profile.preferred_username, "alice");
    assert_eq!(directory.calls(), 1);
}

#[tokio::test]
async fn test_unknown_user_is_negatively_cached() {
    let directory = Arc::new(MockDirectory::new());
    let repo = repository(Arc::clone(&directory));

    assert!(repo.get_by_username("nobody").await.is_none());
    assert!(repo.get_by_username("nobody").await.is_none());

    assert_eq!(directory.calls(), 1);
}

#[tokio::test]
async fn test_unmappable_record_is_negatively_cached() {
    // A record without uid/sAMAccountName/cn maps to not-found, which is
    // cached like any other resolution.
    let mut directory = MockDirectory::new();
    let attrs: AttributeSet = [("mail", "orphan@example.com")].into_iter().collect();
    directory.records.insert("orphan".to_string(), attrs);
    let directory = Arc::new(directory);
    let repo = repository(Arc::clone(&directory));

    assert!(repo.get_by_username("orphan").await.is_none());
    assert!(repo.get_by_username("orphan").await.is_none());

    assert_eq!(directory.calls(), 1);
}

#[tokio::test]
async fn test_email_short_circuits_skip_the_directory() {
    let directory = Arc::new(MockDirectory::new().with_user("joe"));
    let repo = repository(Arc::clone(&directory));

    assert!(repo.get_by_email_address("").await.is_none());
    assert!(repo.get_by_email_address("joe@other.org").await.is_none());

    assert_eq!(directory.calls(), 0);
}

#[tokio::test]
async fn test_email_lookup_delegates_to_username() {
    let directory = Arc::new(MockDirectory::new().with_user("joe"));
    let repo = repository(Arc::clone(&directory));

    let profile = repo
        .get_by_email_address("joe@example.com")
        .await
        .expect("joe should resolve");
    assert_eq!(profile.preferred_username, "joe");

    // Both paths share the same cache key.
    assert!(repo.get_by_username("joe").await.is_some());
    assert_eq!(directory.calls(), 1);
}

#[tokio::test]
async fn test_email_suffix_matching_is_exact() {
    let directory = Arc::new(MockDirectory::new().with_user("joe"));
    let config = DirectoryConfig {
        email_suffix: "@corp.example.com".to_string(),
    };
    let repo =
        UserInfoRepository::new(Arc::clone(&directory) as Arc<dyn DirectorySearch>, config);

    // No case folding, no trimming.
    assert!(repo.get_by_email_address("joe@EXAMPLE.COM").await.is_none());
    assert!(repo.get_by_email_address("joe@example.com").await.is_none());
    assert_eq!(directory.calls(), 0);

    assert!(repo
        .get_by_email_address("joe@corp.example.com")
        .await
        .is_some());
    assert_eq!(directory.calls(), 1);
}

#[tokio::test]
async fn test_concurrent_lookups_share_one_directory_call() {
    init_tracing();
    let directory = Arc::new(
        MockDirectory::new()
            .with_user("alice")
            .with_delay(Duration::from_millis(50)),
    );
    let repo = Arc::new(repository(Arc::clone(&directory)));

    let mut handles = Vec::new();
    for _ in 0..10 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(
            async move { repo.get_by_username("alice").await },
        ));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.expect("lookup task panicked"));
    }

    assert_eq!(directory.calls(), 1);
    let first = results[0].clone().expect("alice should resolve");
    for result in results {
        assert_eq!(result.as_ref(), Some(&first));
    }
}

#[tokio::test]
async fn test_capacity_overflow_evicts_least_recently_accessed() {
    let mut directory = MockDirectory::new();
    for i in 0..101 {
        directory = directory.with_user(&format!("user{i}"));
    }
    let directory = Arc::new(directory);
    let repo = repository(Arc::clone(&directory));

    for i in 0..101 {
        assert!(repo.get_by_username(&format!("user{i}")).await.is_some());
    }

    assert_eq!(directory.calls(), 101);
    assert_eq!(repo.cached_entries().await, 100);

    // The most recent entry is still cached...
    assert!(repo.get_by_username("user100").await.is_some());
    assert_eq!(directory.calls(), 101);

    // ...while the least recently accessed one reloads.
    assert!(repo.get_by_username("user0").await.is_some());
    assert_eq!(directory.calls(), 102);
}

#[tokio::test]
async fn test_directory_failure_is_not_cached() {
    let directory = Arc::new(MockDirectory::new().with_user("alice"));
    let repo = repository(Arc::clone(&directory));

    directory.set_failing(true);
    assert!(repo.get_by_username("alice").await.is_none());
    assert_eq!(directory.calls(), 1);

    // The failed load left no entry behind; the next call retries and the
    // recovered result is served from cache afterwards.
    directory.set_failing(false);
    assert!(repo.get_by_username("alice").await.is_some());
    assert_eq!(directory.calls(), 2);

    assert!(repo.get_by_username("alice").await.is_some());
    assert_eq!(directory.calls(), 2);
}

#[tokio::test]
async fn test_invalidate_forces_directory_reload() {
    let directory = Arc::new(MockDirectory::new().with_user("alice"));
    let repo = repository(Arc::clone(&directory));

    assert!(repo.get_by_username("alice").await.is_some());
    repo.invalidate("alice").await;
    assert!(repo.get_by_username("alice").await.is_some());

    assert_eq!(directory.calls(), 2);
}

#[tokio::test]
async fn test_custom_cache_bounds() {
    let directory = Arc::new(MockDirectory::new().with_user("a").with_user("b"));
    let repo = UserInfoRepository::with_cache(
        Arc::clone(&directory) as Arc<dyn DirectorySearch>,
        DirectoryConfig::default(),
        ProfileCache::with_capacity_and_ttl(1, Duration::from_secs(60)),
    );

    assert!(repo.get_by_username("a").await.is_some());
    assert!(repo.get_by_username("b").await.is_some());
    assert_eq!(repo.cached_entries().await, 1);

    // "a" was evicted by "b".
    assert!(repo.get_by_username("a").await.is_some());
    assert_eq!(directory.calls(), 3);
}
