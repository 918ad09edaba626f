use std::collections::HashMap;
use eternal_hashes::resource::compute_resource_hash;
use crate::{ArchiveIndex, ArchiveRegistry, MappingError, Result};

/// Build an [ArchiveRegistry] from scratch
///
/// Values are checked on insertion, so that the built registry can always be written back using
/// the binary format.
#[derive(Debug, Default)]
pub struct ArchiveRegistryBuilder {
    archive_names: Vec<String>,
    file_mapping: HashMap<u64, Vec<ArchiveIndex>>,
}

impl ArchiveRegistryBuilder {
    /// Maximum number of archives, indices are stored as `i16`
    const MAX_ARCHIVES: usize = i16::MAX as usize;
    /// Maximum length of names and of archive lists
    const MAX_LEN: usize = i16::MAX as usize;

    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an archive name, return its index
    ///
    /// Names must be ASCII.
    pub fn add_archive<S: Into<String>>(&mut self, name: S) -> Result<ArchiveIndex> {
        let name = name.into();
        if !name.is_ascii() || name.len() > Self::MAX_LEN {
            return Err(MappingError::InvalidArchiveName(name));
        }
        if self.archive_names.len() >= Self::MAX_ARCHIVES {
            return Err(MappingError::FormatLimit("archives"));
        }
        let index = self.archive_names.len() as ArchiveIndex;
        self.archive_names.push(name);
        Ok(index)
    }

    /// Add an entry for a hash
    ///
    /// Indices are kept in the given order.
    /// Each hash can be inserted only once.
    pub fn insert(&mut self, hash: u64, indices: &[ArchiveIndex]) -> Result<()> {
        if indices.len() > Self::MAX_LEN {
            return Err(MappingError::FormatLimit("archive indices"));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= self.archive_names.len()) {
            return Err(MappingError::ArchiveIndexOutOfRange(index));
        }
        if self.file_mapping.contains_key(&hash) {
            return Err(MappingError::DuplicateEntry(hash));
        }
        self.file_mapping.insert(hash, indices.to_vec());
        Ok(())
    }

    /// Add an entry for a resource path
    ///
    /// The path is hashed the same way [ArchiveRegistry::resolve_archives()] does.
    pub fn insert_path(&mut self, path: &str, indices: &[ArchiveIndex]) -> Result<()> {
        self.insert(compute_resource_hash(path), indices)
    }

    /// Build the registry
    pub fn build(self) -> ArchiveRegistry {
        ArchiveRegistry {
            archive_names: self.archive_names,
            file_mapping: self.file_mapping,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_and_resolve() {
        let mut builder = ArchiveRegistryBuilder::new();
        assert_eq!(builder.add_archive("gameresources.resources").unwrap(), 0);
        assert_eq!(builder.add_archive("e1m1_intro.resources").unwrap(), 1);
        builder.insert_path("generated/decls/weapon/shotgun.decl", &[1, 0]).unwrap();
        builder.insert(0x42, &[0, 0]).unwrap();
        let registry = builder.build();

        assert_eq!(
            registry.resolve_archives("generated/decls/weapon/shotgun.decl"),
            ["e1m1_intro.resources", "gameresources.resources"],
        );
        assert_eq!(registry.lookup(0x0bfff292149bd975), [1, 0]);
        // Duplicates are kept
        assert_eq!(registry.lookup(0x42), [0, 0]);
    }

    #[test]
    fn invalid_insertions() {
        let mut builder = ArchiveRegistryBuilder::new();
        builder.add_archive("a").unwrap();
        assert!(matches!(builder.insert(1, &[0, 1]), Err(MappingError::ArchiveIndexOutOfRange(1))));
        builder.insert(1, &[0]).unwrap();
        assert!(matches!(builder.insert(1, &[0]), Err(MappingError::DuplicateEntry(1))));
        assert!(matches!(builder.add_archive("caf\u{e9}"), Err(MappingError::InvalidArchiveName(_))));
        assert!(matches!(builder.insert(2, &vec![0; 40000]), Err(MappingError::FormatLimit(_))));
        let registry = builder.build();
        assert_eq!(registry.archive_names(), ["a"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn built_registry_round_trips() {
        let mut builder = ArchiveRegistryBuilder::new();
        let a = builder.add_archive("a.resources").unwrap();
        let b = builder.add_archive("b.resources").unwrap();
        builder.insert_path("foo.decl", &[b, a]).unwrap();
        builder.insert_path("maps/game/e1m1_intro/e1m1_intro.entities", &[a]).unwrap();
        builder.insert(0, &[]).unwrap();
        let registry = builder.build();

        let mut data = Vec::new();
        registry.write(&mut data).unwrap();
        assert_eq!(ArchiveRegistry::read(&data).unwrap(), Some(registry));
    }
}
