//! Repository descriptors and clone credentials

use std::fmt;
use std::path::PathBuf;

/// One clonable repository, as produced by the group lister
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDescriptor {
    /// Display name, also the last component of the clone target
    pub name: String,
    /// Namespace path the repository lives under
    pub namespace: String,
    /// HTTP(S) URL to clone from
    pub url: String,
}

impl RepositoryDescriptor {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            url: url.into(),
        }
    }
}

/// Relative clone target for a descriptor: `namespace/name`
///
/// No sanitization is applied. Names containing `..` or absolute segments
/// are passed through unchanged.
pub fn clone_target(descriptor: &RepositoryDescriptor) -> PathBuf {
    PathBuf::from(format!("{}/{}", descriptor.namespace, descriptor.name))
}

/// HTTP credentials applied to every clone of a run
#[derive(Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.token.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &if self.token.is_empty() { "" } else { "***" })
            .finish()
    }
}
