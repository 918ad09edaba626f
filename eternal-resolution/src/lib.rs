//! Resolve the archives containing a game resource
//!
//! An archive mapping file (`archiveresolution`) associates hashed resource paths to the list of
//! archives containing them. Use [ArchiveRegistry] to load such a file and query it, or
//! [ArchiveResolver] to share a registry between threads and reload it.
//!
//! # Example
//! ```no_run
//! use eternal_resolution::ArchiveRegistry;
//! let registry = ArchiveRegistry::load("archiveresolution")
//!     .expect("failed to read archive mapping")
//!     .expect("archive mapping not available");
//! for name in registry.resolve_archives("generated/decls/weapon/shotgun.decl") {
//!     println!("{name}");
//! }
//! ```
//!
//! # File format
//!
//! All integers are little-endian.
//! - header: `version: i32` (always 1), `archive_count: i32`, `mapping_count: i32`
//! - `archive_count` archive names: `length: i16`, followed by `length` ASCII bytes
//! - `mapping_count` entries: `hash: u64`, `index_count: i16`, followed by `index_count` archive
//!   indices (`i16`)
//!
//! Archive indices refer to the position of archive names in the file. Order of indices in an
//! entry is significant and preserved.

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use byteorder::{LittleEndian, WriteBytesExt};
use nom::{
    number::streaming::{le_i16, le_i32, le_u64},
    Parser,
};
use thiserror::Error;
use tracing::{debug, warn};
use eternal_hashes::{
    resource::ResourceHash,
    HashDef,
};
use eternal_utils::{
    parsing::{Cursor, ParseError},
    GuardedFile,
};

mod builder;
mod resolver;
pub use builder::ArchiveRegistryBuilder;
pub use resolver::{ArchiveResolver, LoadOutcome};


/// Result type for archive mapping errors
type Result<T, E = MappingError> = std::result::Result<T, E>;

/// Default name of the archive mapping file
pub const DEFAULT_MAPPING_FILE: &str = "archiveresolution";

/// Index of an archive in [ArchiveRegistry::archive_names()]
pub type ArchiveIndex = u16;


/// Archive names and hash-to-archives mapping
///
/// A registry is immutable once loaded.
/// Indices stored in entries are guaranteed to be valid archive indices.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArchiveRegistry {
    archive_names: Vec<String>,
    file_mapping: HashMap<u64, Vec<ArchiveIndex>>,
}

impl ArchiveRegistry {
    /// Only supported file version
    pub const VERSION: i32 = 1;

    /// Load a mapping file
    ///
    /// Return `None` if the file does not exist or if its version is not supported.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "archive mapping file not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        Self::read(&data)
    }

    /// Read a mapping from a reader
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Option<Self>> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::read(&data)
    }

    /// Parse a mapping from its binary content
    ///
    /// Return `None` if the version is not supported.
    /// Data after the last declared entry is ignored.
    pub fn read(data: &[u8]) -> Result<Option<Self>> {
        let mut parser = MappingParser::new(data);

        let version = parser.read("version", le_i32)?;
        if version != Self::VERSION {
            warn!(version, "unsupported archive mapping version");
            return Ok(None);
        }
        let archive_count = parser.read_count32("archive count")?;
        let mapping_count = parser.read_count32("mapping count")?;

        // Don't trust counts for preallocation, they could be corrupted
        let mut archive_names = Vec::with_capacity(archive_count.min(data.len() / 2));
        for _ in 0..archive_count {
            let len = parser.read_count16("archive name length")?;
            let name = parser.take("archive name", len)?;
            archive_names.push(decode_ascii(name));
        }

        let mut file_mapping = HashMap::with_capacity(mapping_count.min(data.len() / 10));
        for _ in 0..mapping_count {
            let entry_offset = parser.offset();
            let hash = parser.read("entry hash", le_u64)?;
            let index_count = parser.read_count16("archive index count")?;
            let mut indices = Vec::with_capacity(index_count);
            for _ in 0..index_count {
                let offset = parser.offset();
                let index = parser.read("archive index", le_i16)?;
                match ArchiveIndex::try_from(index) {
                    Ok(i) if (i as usize) < archive_names.len() => indices.push(i),
                    _ => return Err(MappingError::corrupt(offset, CorruptReason::ArchiveIndexOutOfRange(index))),
                }
            }
            if file_mapping.insert(hash, indices).is_some() {
                return Err(MappingError::corrupt(entry_offset, CorruptReason::DuplicateHash(hash)));
            }
        }

        if parser.remaining() > 0 {
            debug!(remaining = parser.remaining(), "ignore trailing data in archive mapping");
        }
        debug!(archives = archive_names.len(), entries = file_mapping.len(), "archive mapping loaded");
        Ok(Some(Self { archive_names, file_mapping }))
    }

    /// Write the mapping, using the binary format
    ///
    /// Entries are sorted by hash, so that output is reproducible.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        // Lengths and indices fit in an `i16`: registries are either read from a file or checked
        // by the builder
        writer.write_i32::<LittleEndian>(Self::VERSION)?;
        writer.write_i32::<LittleEndian>(self.archive_names.len() as i32)?;
        writer.write_i32::<LittleEndian>(self.file_mapping.len() as i32)?;
        for name in &self.archive_names {
            writer.write_i16::<LittleEndian>(name.len() as i16)?;
            writer.write_all(name.as_bytes())?;
        }

        let mut entries: Vec<_> = self.file_mapping.iter().collect();
        entries.sort_unstable_by_key(|(hash, _)| **hash);
        for (hash, indices) in entries {
            writer.write_u64::<LittleEndian>(*hash)?;
            writer.write_i16::<LittleEndian>(indices.len() as i16)?;
            for index in indices {
                writer.write_i16::<LittleEndian>(*index as i16)?;
            }
        }
        Ok(())
    }

    /// Write the mapping to a file
    ///
    /// File is updated atomically.
    pub fn write_path<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        GuardedFile::for_scope(path, |file| {
            let mut writer = BufWriter::new(file);
            self.write(&mut writer)?;
            writer.flush()
        })
    }

    /// Get archive names, ordered by index
    pub fn archive_names(&self) -> &[String] {
        &self.archive_names
    }

    /// Get the name of an archive from its index
    pub fn archive_name(&self, index: ArchiveIndex) -> Option<&str> {
        self.archive_names.get(index as usize).map(String::as_str)
    }

    /// Return the number of entries
    pub fn len(&self) -> usize {
        self.file_mapping.len()
    }

    /// Return `true` if there is no entry
    pub fn is_empty(&self) -> bool {
        self.file_mapping.is_empty()
    }

    /// Return `true` if the given hash has an entry
    pub fn contains(&self, hash: u64) -> bool {
        self.file_mapping.contains_key(&hash)
    }

    /// Get archive indices for a hash
    ///
    /// Return an empty slice if the hash is unknown.
    pub fn lookup(&self, hash: u64) -> &[ArchiveIndex] {
        self.file_mapping.get(&hash).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate on entries, in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item=(u64, &[ArchiveIndex])> + '_ {
        self.file_mapping.iter().map(|(hash, indices)| (*hash, indices.as_slice()))
    }

    /// Get the names of the archives containing a resource hash
    ///
    /// Names are returned in the order of the entry.
    pub fn resolve_hash(&self, hash: ResourceHash) -> Vec<&str> {
        self.lookup(hash.hash)
            .iter()
            .map(|&index| self.archive_names[index as usize].as_str())
            .collect()
    }

    /// Get the names of the archives containing a resource
    ///
    /// The path is normalized before being hashed.
    /// ```
    /// use eternal_hashes::resource::compute_resource_hash;
    /// use eternal_resolution::ArchiveRegistryBuilder;
    ///
    /// let mut builder = ArchiveRegistryBuilder::new();
    /// let common = builder.add_archive("gameresources.resources").unwrap();
    /// let e1m1 = builder.add_archive("e1m1_intro.resources").unwrap();
    /// builder.insert(compute_resource_hash("foo.decl"), &[e1m1, common]).unwrap();
    /// let registry = builder.build();
    ///
    /// assert_eq!(registry.resolve_archives("foo.decl"), ["e1m1_intro.resources", "gameresources.resources"]);
    /// assert_eq!(registry.resolve_archives("rs_streamfile/foo.decl"), registry.resolve_archives("foo.decl"));
    /// assert!(registry.resolve_archives("nonexistent/path").is_empty());
    /// ```
    pub fn resolve_archives(&self, path: &str) -> Vec<&str> {
        self.resolve_hash(ResourceHash::hashed(path))
    }
}


/// Decode ASCII bytes, replace other bytes by `?`
fn decode_ascii(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| if b.is_ascii() { b as char } else { '?' }).collect()
}


/// Read mapping fields, report failures with their position
struct MappingParser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> MappingParser<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { cursor: Cursor::new(data) }
    }

    fn offset(&self) -> usize {
        self.cursor.offset()
    }

    fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    fn read<O, P>(&mut self, field: &'static str, parser: P) -> Result<O>
    where P: Parser<&'a [u8], O, ()> {
        let offset = self.cursor.offset();
        self.cursor.read(parser).map_err(|e| MappingError::parsing(offset, field, e))
    }

    fn take(&mut self, field: &'static str, n: usize) -> Result<&'a [u8]> {
        let offset = self.cursor.offset();
        self.cursor.take(n).map_err(|e| MappingError::parsing(offset, field, e))
    }

    fn read_count32(&mut self, field: &'static str) -> Result<usize> {
        let offset = self.cursor.offset();
        let n = self.read(field, le_i32)?;
        usize::try_from(n).map_err(|_| MappingError::corrupt(offset, CorruptReason::Negative(field, n)))
    }

    fn read_count16(&mut self, field: &'static str) -> Result<usize> {
        let offset = self.cursor.offset();
        let n = self.read(field, le_i16)?;
        usize::try_from(n).map_err(|_| MappingError::corrupt(offset, CorruptReason::Negative(field, n.into())))
    }
}


/// Error on archive mappings
#[allow(missing_docs)]
#[derive(Error, Debug)]
pub enum MappingError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("corrupt archive mapping at offset {offset}: {reason}")]
    CorruptMapping { offset: usize, reason: CorruptReason },
    #[error("archive index {0} out of range")]
    ArchiveIndexOutOfRange(ArchiveIndex),
    #[error("duplicate archive mapping entry: {0:016x}")]
    DuplicateEntry(u64),
    #[error("invalid archive name: {0:?}")]
    InvalidArchiveName(String),
    #[error("too many {0} for the mapping format")]
    FormatLimit(&'static str),
}

impl MappingError {
    fn corrupt(offset: usize, reason: CorruptReason) -> Self {
        Self::CorruptMapping { offset, reason }
    }

    fn parsing(offset: usize, field: &'static str, e: ParseError) -> Self {
        let reason = match e {
            ParseError::NotEnoughData => CorruptReason::Truncated(field),
            ParseError::Error => CorruptReason::Invalid(field),
        };
        Self::corrupt(offset, reason)
    }
}

/// Detail of a [MappingError::CorruptMapping] error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorruptReason {
    /// Data ends before the end of a field
    #[error("truncated {0}")]
    Truncated(&'static str),
    /// Field could not be parsed
    #[error("invalid {0}")]
    Invalid(&'static str),
    /// Negative count or length
    #[error("negative {0}: {1}")]
    Negative(&'static str, i32),
    /// Entry refers to an archive that does not exist
    #[error("archive index {0} out of range")]
    ArchiveIndexOutOfRange(i16),
    /// Hash already used by a previous entry
    #[error("duplicate hash {0:016x}")]
    DuplicateHash(u64),
}
