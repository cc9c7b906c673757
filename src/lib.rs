/// UserDir - cached directory-backed user profiles
///
/// Resolves external identity-directory records into normalized user
/// profiles and shields the directory from repeated lookups with a bounded,
/// sliding-expiration cache under single-flight loading.

pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod mapper;
pub mod metrics;
pub mod profile;
pub mod repository;

pub use cache::ProfileCache;
pub use config::DirectoryConfig;
pub use directory::{AttributeSet, DirectorySearch};
pub use error::{UserDirError, UserDirResult};
pub use mapper::map_attributes;
pub use profile::{Resolution, UserProfile};
pub use repository::UserInfoRepository;
