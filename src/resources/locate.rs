//! Resource location for vertex data blobs that were streamed out of the
//! record into an external resource.

use std::{
    collections::HashMap,
    fs::File,
    io::{Read, Seek, SeekFrom},
    path::PathBuf,
    sync::Mutex,
};

use crate::error::AssetError;

/// Reference to a mesh's vertex data blob.
#[derive(Clone, Copy, Debug)]
pub enum StreamRef<'a> {
    /// The record carries the bytes itself.
    Inline(&'a [u8]),
    /// The bytes live in an external resource.
    External { path: &'a str, offset: u64, size: u64 },
}

/// Resolves a stream reference to the raw bytes it names. Called exactly
/// once per assembled mesh.
pub trait ResourceLocator {
    fn locate(&self, stream: StreamRef<'_>) -> Result<Vec<u8>, AssetError>;
}

/// Anything we can seek around in. Boxed so archives and bundles opened from
/// files, memory or elsewhere all fit.
pub trait ReadSeek: Read + Seek + Send {}
impl<T: Read + Seek + Send> ReadSeek for T {}

/// A by-name index over one opened archive stream.
///
/// Several meshes of one load may resolve against the same stream, so the
/// reader is behind a mutex and every slice read holds it for the whole
/// seek+read pair.
pub struct ArchiveIndex {
    reader: Mutex<Box<dyn ReadSeek>>,
    /// Entry name to base offset of the entry's payload within the stream.
    entries: HashMap<String, u64>,
}

impl ArchiveIndex {
    pub fn new(reader: Box<dyn ReadSeek>, entries: HashMap<String, u64>) -> Self {
        Self {
            reader: Mutex::new(reader),
            entries,
        }
    }

    pub fn has_entry(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Read `size` bytes at `entry.base + offset`.
    fn read_slice(&self, name: &str, offset: u64, size: u64) -> Result<Vec<u8>, String> {
        let base = self
            .entries
            .get(name)
            .ok_or_else(|| format!("no archive entry named `{name}`"))?;
        let mut reader = self
            .reader
            .lock()
            .map_err(|_| "archive reader lock poisoned".to_string())?;
        reader
            .seek(SeekFrom::Start(base + offset))
            .map_err(|error| error.to_string())?;
        let mut buffer = vec![0u8; size as usize];
        reader
            .read_exact(&mut buffer)
            .map_err(|error| error.to_string())?;
        Ok(buffer)
    }
}

/// Stock locator for containers loaded from an archive or a loose file.
///
/// External references resolve in order against
/// 1. the archive the container came from, by entry name,
/// 2. a file next to the container on disk,
/// 3. a sibling bundle's entries.
///
/// Whichever source is not configured is skipped; exhausting all three fails
/// the mesh with `MissingResource`.
#[derive(Default)]
pub struct ContainerLocator {
    archive: Option<ArchiveIndex>,
    directory: Option<PathBuf>,
    bundle: Option<ArchiveIndex>,
}

impl ContainerLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The archive the container itself was read from.
    pub fn with_archive(mut self, archive: ArchiveIndex) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Directory of the container file on disk, for loose sibling resources.
    pub fn with_directory(mut self, directory: PathBuf) -> Self {
        self.directory = Some(directory);
        self
    }

    /// A sibling bundle to fall back to.
    pub fn with_bundle(mut self, bundle: ArchiveIndex) -> Self {
        self.bundle = Some(bundle);
        self
    }

    fn locate_file(&self, name: &str, offset: u64, size: u64) -> Option<Vec<u8>> {
        let path = self.directory.as_ref()?.join(name);
        if !path.is_file() {
            return None;
        }
        let slice = (|| -> std::io::Result<Vec<u8>> {
            let mut file = File::open(&path)?;
            file.seek(SeekFrom::Start(offset))?;
            let mut buffer = vec![0u8; size as usize];
            file.read_exact(&mut buffer)?;
            Ok(buffer)
        })();
        match slice {
            Ok(buffer) => Some(buffer),
            Err(error) => {
                log::warn!("Failed to read {} bytes from {:?}: {}", size, path, error);
                None
            }
        }
    }
}

impl ResourceLocator for ContainerLocator {
    fn locate(&self, stream: StreamRef<'_>) -> Result<Vec<u8>, AssetError> {
        match stream {
            StreamRef::Inline(bytes) => Ok(bytes.to_vec()),
            StreamRef::External { path, offset, size } => {
                // Paths may carry an archive scheme prefix; lookups use the
                // bare entry/file name.
                let name = path.rsplit('/').next().unwrap_or(path);

                if let Some(archive) = &self.archive {
                    if archive.has_entry(name) {
                        match archive.read_slice(name, offset, size) {
                            Ok(buffer) => return Ok(buffer),
                            Err(reason) => {
                                log::warn!("Archive entry `{}` unreadable: {}", name, reason)
                            }
                        }
                    }
                }
                if let Some(buffer) = self.locate_file(name, offset, size) {
                    return Ok(buffer);
                }
                if let Some(bundle) = &self.bundle {
                    if bundle.has_entry(name) {
                        match bundle.read_slice(name, offset, size) {
                            Ok(buffer) => return Ok(buffer),
                            Err(reason) => {
                                log::warn!("Bundle entry `{}` unreadable: {}", name, reason)
                            }
                        }
                    }
                }
                Err(AssetError::MissingResource(format!(
                    "no source for `{path}` ({size} bytes at offset {offset})"
                )))
            }
        }
    }
}
