//! Parse Options
//!
//! Switches read by the dispatcher for the duration of one build.

/// Options for a single build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Resolve element and attribute names to their local part
    pub namespace_aware: bool,
    /// Drop scanner warnings instead of failing the build
    pub ignore_warnings: bool,
    /// Run the validation hook once the tree is complete
    pub validate_data: bool,
    /// Attached to every parse error (file name, URI, ...)
    pub source_id: Option<String>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace_aware(mut self, enabled: bool) -> Self {
        self.namespace_aware = enabled;
        self
    }

    pub fn ignore_warnings(mut self, ignore: bool) -> Self {
        self.ignore_warnings = ignore;
        self
    }

    pub fn validate_data(mut self, validate: bool) -> Self {
        self.validate_data = validate;
        self
    }

    pub fn source_id(mut self, source: impl Into<String>) -> Self {
        self.source_id = Some(source.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ParseOptions::default();
        assert!(!opts.namespace_aware);
        assert!(!opts.ignore_warnings);
        assert!(!opts.validate_data);
        assert!(opts.source_id.is_none());
    }

    #[test]
    fn test_builder_setters() {
        let opts = ParseOptions::new()
            .namespace_aware(true)
            .ignore_warnings(true)
            .validate_data(true)
            .source_id("catalog.xml");
        assert!(opts.namespace_aware && opts.ignore_warnings && opts.validate_data);
        assert_eq!(opts.source_id.as_deref(), Some("catalog.xml"));
    }
}
