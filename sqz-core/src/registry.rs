//! Registry of available codec algorithms.

use crate::codec::{CodecFactory, Lz4Factory, ZlibFactory, ZstdFactory};

/// Lookup table mapping algorithm names to codec factories.
///
/// Names are matched case-insensitively; the canonical lowercase name
/// reported by each factory doubles as the file extension for its
/// compressed output.
pub struct CodecRegistry {
    factories: Vec<Box<dyn CodecFactory>>,
}

impl CodecRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Creates a registry with every built-in algorithm registered.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ZlibFactory));
        registry.register(Box::new(Lz4Factory));
        registry.register(Box::new(ZstdFactory));
        registry
    }

    /// Adds a factory; a factory registered later under an existing name
    /// shadows the earlier one.
    pub fn register(&mut self, factory: Box<dyn CodecFactory>) {
        self.factories.push(factory);
    }

    /// Looks up a factory by name, ignoring ASCII case.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&dyn CodecFactory> {
        self.factories
            .iter()
            .rev()
            .find(|factory| factory.name().eq_ignore_ascii_case(name))
            .map(Box::as_ref)
    }

    /// Canonical names of every registered algorithm, sorted.
    #[must_use]
    pub fn supported_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.iter().map(|f| f.name()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_knows_all_algorithms() {
        let registry = CodecRegistry::with_builtin();
        assert_eq!(registry.supported_names(), vec!["lz4", "zlib", "zstd"]);
    }

    #[test]
    fn lookup_ignores_case() {
        let registry = CodecRegistry::with_builtin();
        for name in ["zstd", "ZSTD", "ZsTd"] {
            let factory = registry.find(name).expect("factory");
            assert_eq!(factory.name(), "zstd");
        }
    }

    #[test]
    fn unknown_name_is_absent() {
        let registry = CodecRegistry::with_builtin();
        assert!(registry.find("brotli").is_none());
        assert!(CodecRegistry::new().find("zlib").is_none());
    }

    #[test]
    fn later_registration_shadows_earlier() {
        struct Shadow;
        impl CodecFactory for Shadow {
            fn name(&self) -> &'static str {
                "zlib"
            }
            fn create(
                &self,
                _mode: crate::codec::Mode,
                _level: crate::config::CompressionLevel,
            ) -> Result<Box<dyn crate::codec::Codec>, crate::codec::CodecError> {
                Err(crate::codec::CodecError::new("shadowed"))
            }
        }

        let mut registry = CodecRegistry::with_builtin();
        registry.register(Box::new(Shadow));
        let factory = registry.find("zlib").expect("factory");
        assert!(factory
            .create(
                crate::codec::Mode::Encode,
                crate::config::CompressionLevel::Default
            )
            .is_err());
        assert_eq!(registry.supported_names(), vec!["lz4", "zlib", "zstd"]);
    }
}
