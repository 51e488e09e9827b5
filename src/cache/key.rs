// Cache keys.
// Structured keys pairing an optional project scope with the requested resource.

use std::fmt;

use crate::api::Resource;

/// Identity of a cached response.
///
/// Equality and hashing are structural, so a slug containing `:` can never
/// collide with another key. The `Display` form is the familiar
/// `project:operation:params` string, useful for logging.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub project: Option<String>,
    pub resource: Resource,
}

impl CacheKey {
    pub fn new(resource: Resource) -> Self {
        Self {
            project: None,
            resource,
        }
    }

    pub fn scoped(project: impl Into<String>, resource: Resource) -> Self {
        Self {
            project: Some(project.into()),
            resource,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.project {
            Some(project) => write!(f, "{}:{}", project, self.resource),
            None => write!(f, "{}", self.resource),
        }
    }
}
