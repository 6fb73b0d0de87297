//! Explicit back-end registry.
//!
//! Maps `(schema version, target qualifier)` to script and markup
//! composers. Registration is explicit and duplicate registration fails
//! immediately; lookup falls back to the [`ANY_VERSION`] entry for the
//! same qualifier, logged as a warning because it can mask a genuine
//! version incompatibility.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::error::{TranslateError, TranslateResult};
use crate::traits::{MarkupComposer, ScriptComposer};

/// Version key matching any schema version.
pub const ANY_VERSION: &str = "*";

type Key = (String, String);

/// Registry of translation back-ends, owned by the caller.
#[derive(Default)]
pub struct BackendRegistry {
    scripts: HashMap<Key, Arc<dyn ScriptComposer + Send + Sync>>,
    markups: HashMap<Key, Arc<dyn MarkupComposer + Send + Sync>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script composer for a `(version, qualifier)` pair.
    pub fn register_script(
        &mut self,
        version: &str,
        qualifier: &str,
        composer: Arc<dyn ScriptComposer + Send + Sync>,
    ) -> TranslateResult<()> {
        let key = (version.to_string(), qualifier.to_string());
        if self.scripts.contains_key(&key) {
            return Err(TranslateError::AmbiguousComponent {
                capability: "script",
                version: version.to_string(),
            });
        }
        self.scripts.insert(key, composer);
        Ok(())
    }

    /// Register a markup composer for a `(version, qualifier)` pair.
    pub fn register_markup(
        &mut self,
        version: &str,
        qualifier: &str,
        composer: Arc<dyn MarkupComposer + Send + Sync>,
    ) -> TranslateResult<()> {
        let key = (version.to_string(), qualifier.to_string());
        if self.markups.contains_key(&key) {
            return Err(TranslateError::AmbiguousComponent {
                capability: "markup",
                version: version.to_string(),
            });
        }
        self.markups.insert(key, composer);
        Ok(())
    }

    /// Resolve a script composer, falling back to [`ANY_VERSION`].
    pub fn script(
        &self,
        version: &str,
        qualifier: &str,
    ) -> TranslateResult<Arc<dyn ScriptComposer + Send + Sync>> {
        if let Some(composer) = self.scripts.get(&key(version, qualifier)) {
            return Ok(Arc::clone(composer));
        }
        if let Some(composer) = self.scripts.get(&key(ANY_VERSION, qualifier)) {
            warn!(version, qualifier, "no exact script back-end; using the any-version entry");
            return Ok(Arc::clone(composer));
        }
        Err(TranslateError::ComponentResolution {
            capability: "script",
            version: version.to_string(),
        })
    }

    /// Resolve a markup composer, falling back to [`ANY_VERSION`].
    pub fn markup(
        &self,
        version: &str,
        qualifier: &str,
    ) -> TranslateResult<Arc<dyn MarkupComposer + Send + Sync>> {
        if let Some(composer) = self.markups.get(&key(version, qualifier)) {
            return Ok(Arc::clone(composer));
        }
        if let Some(composer) = self.markups.get(&key(ANY_VERSION, qualifier)) {
            warn!(version, qualifier, "no exact markup back-end; using the any-version entry");
            return Ok(Arc::clone(composer));
        }
        Err(TranslateError::ComponentResolution {
            capability: "markup",
            version: version.to_string(),
        })
    }
}

fn key(version: &str, qualifier: &str) -> Key {
    (version.to_string(), qualifier.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeMarkup, FakeScript};

    #[test]
    fn test_exact_match_wins() {
        let mut registry = BackendRegistry::new();
        registry.register_script("1.0", "xpath", Arc::new(FakeScript)).unwrap();
        registry.register_script(ANY_VERSION, "xpath", Arc::new(FakeScript)).unwrap();
        assert!(registry.script("1.0", "xpath").is_ok());
    }

    #[test]
    fn test_fallback_to_any_version() {
        let mut registry = BackendRegistry::new();
        registry.register_script(ANY_VERSION, "xpath", Arc::new(FakeScript)).unwrap();
        assert!(registry.script("9.9", "xpath").is_ok());
    }

    #[test]
    fn test_unresolvable_component() {
        let registry = BackendRegistry::new();
        let err = registry.markup("1.0", "xslt").map(|_| ()).unwrap_err();
        assert!(matches!(
            err,
            TranslateError::ComponentResolution { capability: "markup", .. }
        ));
    }

    #[test]
    fn test_duplicate_registration_is_ambiguous() {
        let mut registry = BackendRegistry::new();
        registry.register_markup("1.0", "xslt", Arc::new(FakeMarkup)).unwrap();
        let err = registry.register_markup("1.0", "xslt", Arc::new(FakeMarkup)).unwrap_err();
        assert!(matches!(err, TranslateError::AmbiguousComponent { .. }));
    }

    #[test]
    fn test_qualifier_is_part_of_the_key() {
        let mut registry = BackendRegistry::new();
        registry.register_script("1.0", "xpath", Arc::new(FakeScript)).unwrap();
        assert!(registry.script("1.0", "sql").is_err());
    }
}
