//! Dynamic/static request classification.

/// Which backend class a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Route to a backend from the discovered pool.
    Dynamic,
    /// Delegate to the fixed static origin.
    Static,
}

impl RequestClass {
    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestClass::Dynamic => "dynamic",
            RequestClass::Static => "static",
        }
    }
}

/// Splits traffic on a single path prefix.
#[derive(Debug, Clone)]
pub struct Classifier {
    dynamic_prefix: String,
}

impl Classifier {
    /// Create a classifier for the given dynamic-content prefix.
    pub fn new(dynamic_prefix: impl Into<String>) -> Self {
        Self {
            dynamic_prefix: dynamic_prefix.into(),
        }
    }

    /// Classify a request path. Prefix semantics, case-sensitive.
    pub fn classify(&self, path: &str) -> RequestClass {
        if path.starts_with(&self.dynamic_prefix) {
            RequestClass::Dynamic
        } else {
            RequestClass::Static
        }
    }
}
