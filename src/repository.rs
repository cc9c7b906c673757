/// Resolving user-info repository
///
/// Public lookup surface for the embedding identity provider: username and
/// email lookups backed by the directory collaborator and the profile cache.
use crate::cache::ProfileCache;
use crate::config::DirectoryConfig;
use crate::directory::DirectorySearch;
use crate::error::UserDirResult;
use crate::mapper::map_attributes;
use crate::metrics;
use crate::profile::{Resolution, UserProfile};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache-backed repository of directory user profiles
pub struct UserInfoRepository {
    directory: Arc<dyn DirectorySearch>,
    cache: ProfileCache,
    config: DirectoryConfig,
}

impl UserInfoRepository {
    /// Create a repository with the standard cache bounds.
    pub fn new(directory: Arc<dyn DirectorySearch>, config: DirectoryConfig) -> Self {
        Self::with_cache(directory, config, ProfileCache::new())
    }

    /// Create a repository around a pre-configured cache.
    pub fn with_cache(
        directory: Arc<dyn DirectorySearch>,
        config: DirectoryConfig,
        cache: ProfileCache,
    ) -> Self {
        Self {
            directory,
            cache,
            config,
        }
    }

    /// Resolve a username to a profile.
    ///
    /// Served from the cache when possible; a miss loads from the directory
    /// under single-flight semantics and caches the outcome, including a
    /// clean not-found. Returns `None` for absent users and for transient
    /// directory failures alike; the distinction is recorded only in logs
    /// and metrics.
    pub async fn get_by_username(&self, username: &str) -> Option<UserProfile> {
        let directory = Arc::clone(&self.directory);
        let result = self
            .cache
            .get_or_load(username, || Self::load(directory, username))
            .await;

        match result {
            Ok(resolution) => resolution.into_profile(),
            Err(e) => {
                warn!(username, error = %e, "directory lookup failed");
                None
            }
        }
    }

    /// Resolve an email address to a profile.
    ///
    /// Only addresses ending with the configured suffix are resolved; the
    /// suffix is stripped off the end and the remainder looked up as a
    /// username. Anything else returns `None` without a directory call.
    pub async fn get_by_email_address(&self, email: &str) -> Option<UserProfile> {
        if email.is_empty() {
            return None;
        }

        let Some(username) = email.strip_suffix(&self.config.email_suffix) else {
            debug!(email, "email outside configured domain");
            return None;
        };

        self.get_by_username(username).await
    }

    /// Drop a cached entry so the next lookup reloads from the directory.
    pub async fn invalidate(&self, username: &str) {
        self.cache.invalidate(username).await;
    }

    /// Remove cache entries unaccessed past the sliding window.
    pub async fn purge_expired(&self) {
        self.cache.purge_expired().await;
    }

    /// Number of cached entries.
    pub async fn cached_entries(&self) -> usize {
        self.cache.len().await
    }

    /// Single load cycle for a cache miss: directory search, then attribute
    /// mapping. A clean no-match and an unmappable record both resolve to
    /// `NotFound`; transport failures propagate and stay uncached.
    async fn load(
        directory: Arc<dyn DirectorySearch>,
        username: &str,
    ) -> UserDirResult<Resolution> {
        match directory.search_for_user(username).await {
            Ok(Some(attrs)) => {
                let resolution = map_attributes(&attrs);
                let result = match resolution {
                    Resolution::Found(_) => "found",
                    Resolution::NotFound => "not_found",
                };
                metrics::DIRECTORY_SEARCHES_TOTAL
                    .with_label_values(&[result])
                    .inc();
                Ok(resolution)
            }
            Ok(None) => {
                metrics::DIRECTORY_SEARCHES_TOTAL
                    .with_label_values(&["not_found"])
                    .inc();
                debug!(username, "no directory record");
                Ok(Resolution::NotFound)
            }
            Err(e) => {
                metrics::DIRECTORY_SEARCHES_TOTAL
                    .with_label_values(&["error"])
                    .inc();
                Err(e)
            }
        }
    }
}
