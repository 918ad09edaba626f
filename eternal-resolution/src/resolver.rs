use std::path::Path;
use std::sync::Arc;
use arc_swap::ArcSwapOption;
use tracing::info;
use crate::{ArchiveRegistry, Result};

/// Result of [ArchiveResolver::load()]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A registry has been loaded
    Loaded {
        /// Number of archives
        archives: usize,
        /// Number of entries
        entries: usize,
    },
    /// No usable mapping file, resolution is disabled
    Absent,
}


/// Shared handle on the current [ArchiveRegistry]
///
/// The handle starts unloaded: resolution returns no archives until a registry is loaded.
/// Registries are never modified: reloading builds a new registry then swaps it atomically.
/// Readers keep using the registry they started with, and never see a partial state.
///
/// ```
/// use eternal_resolution::{ArchiveRegistryBuilder, ArchiveResolver};
///
/// let resolver = ArchiveResolver::new();
/// assert!(resolver.resolve_archives("foo.decl").is_empty());
///
/// let mut builder = ArchiveRegistryBuilder::new();
/// let index = builder.add_archive("gameresources.resources").unwrap();
/// builder.insert_path("foo.decl", &[index]).unwrap();
/// resolver.replace(Some(builder.build()));
/// assert_eq!(resolver.resolve_archives("foo.decl"), ["gameresources.resources"]);
/// ```
pub struct ArchiveResolver {
    registry: ArcSwapOption<ArchiveRegistry>,
}

impl Default for ArchiveResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveResolver {
    /// Create an unloaded resolver
    pub fn new() -> Self {
        Self { registry: ArcSwapOption::empty() }
    }

    /// Create a resolver using the given registry
    pub fn from_registry(registry: ArchiveRegistry) -> Self {
        Self { registry: ArcSwapOption::new(Some(Arc::new(registry))) }
    }

    /// Load a mapping file, replace the current registry
    ///
    /// If the file is missing or its version is not supported, resolution is disabled.
    /// On error, the current registry is kept.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadOutcome> {
        let registry = ArchiveRegistry::load(path.as_ref())?;
        let outcome = match &registry {
            Some(registry) => LoadOutcome::Loaded {
                archives: registry.archive_names().len(),
                entries: registry.len(),
            },
            None => LoadOutcome::Absent,
        };
        info!(path = %path.as_ref().display(), ?outcome, "archive mapping replaced");
        self.replace(registry);
        Ok(outcome)
    }

    /// Replace the current registry, return the previous one
    pub fn replace(&self, registry: Option<ArchiveRegistry>) -> Option<Arc<ArchiveRegistry>> {
        self.registry.swap(registry.map(Arc::new))
    }

    /// Return `true` if a registry is loaded
    pub fn is_loaded(&self) -> bool {
        self.registry.load().is_some()
    }

    /// Get the current registry
    pub fn snapshot(&self) -> Option<Arc<ArchiveRegistry>> {
        self.registry.load_full()
    }

    /// Get the names of the archives containing a resource
    ///
    /// Return an empty list if no registry is loaded.
    pub fn resolve_archives(&self, path: &str) -> Vec<String> {
        match &*self.registry.load() {
            Some(registry) => registry.resolve_archives(path).into_iter().map(String::from).collect(),
            None => Vec::new(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArchiveRegistryBuilder;

    fn registry_with(archive: &str) -> ArchiveRegistry {
        let mut builder = ArchiveRegistryBuilder::new();
        let other = builder.add_archive("common.resources").unwrap();
        let index = builder.add_archive(archive).unwrap();
        builder.insert_path("foo.decl", &[index, other]).unwrap();
        builder.build()
    }

    #[test]
    fn unloaded_resolver() {
        let resolver = ArchiveResolver::default();
        assert!(!resolver.is_loaded());
        assert!(resolver.snapshot().is_none());
        assert!(resolver.resolve_archives("foo.decl").is_empty());
    }

    #[test]
    fn replace_registry() {
        let resolver = ArchiveResolver::from_registry(registry_with("a.resources"));
        assert!(resolver.is_loaded());
        let snapshot = resolver.snapshot().unwrap();

        let previous = resolver.replace(Some(registry_with("b.resources")));
        assert!(Arc::ptr_eq(&previous.unwrap(), &snapshot));
        assert_eq!(resolver.resolve_archives("foo.decl"), ["b.resources", "common.resources"]);
        // Old snapshot is not affected
        assert_eq!(snapshot.resolve_archives("foo.decl"), ["a.resources", "common.resources"]);

        resolver.replace(None);
        assert!(!resolver.is_loaded());
        assert!(resolver.resolve_archives("foo.decl").is_empty());
    }

    #[test]
    fn concurrent_readers_see_complete_registries() {
        let resolver = ArchiveResolver::from_registry(registry_with("a.resources"));
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..1000 {
                        let names = resolver.resolve_archives("foo.decl");
                        assert_eq!(names.len(), 2);
                        assert!(names[0] == "a.resources" || names[0] == "b.resources");
                        assert_eq!(names[1], "common.resources");
                    }
                });
            }
            for i in 0..100 {
                let archive = if i % 2 == 0 { "b.resources" } else { "a.resources" };
                resolver.replace(Some(registry_with(archive)));
            }
        });
    }
}
