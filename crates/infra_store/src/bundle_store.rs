//! Model bundle persistence
//!
//! A bundle is stored as a single binary file:
//!
//! ```text
//! +----------+----------------+-------------------------+
//! | MAGIC(8) | format version | bincode(ModelBundle)    |
//! +----------+----------------+-------------------------+
//! ```
//!
//! Saves write to a temporary file in the target directory and rename it
//! over the previous artifact, so a concurrent `load` observes either the
//! old bundle or the new one, never a partial write.

use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use domain_intake::{ModelBundle, ModelStatus};

use crate::error::StoreError;

/// Leading bytes of every bundle file
pub const MAGIC: &[u8; 8] = b"CLMINTK\0";

/// Bumped whenever the serialized bundle layout changes
pub const FORMAT_VERSION: u32 = 1;

/// File-backed store holding the single active bundle
#[derive(Debug)]
pub struct BundleStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl BundleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Atomically replaces the stored bundle
    ///
    /// Creates the parent directory when needed. Concurrent saves are
    /// serialised; the last one to finish wins.
    pub fn save(&self, bundle: &ModelBundle) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();

        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let temp_file = NamedTempFile::new_in(parent)?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            writer.write_all(MAGIC)?;
            bincode::serialize_into(&mut writer, &FORMAT_VERSION)?;
            bincode::serialize_into(&mut writer, bundle)?;
            writer.flush()?;
        }
        temp_file.as_file().sync_all()?;
        temp_file
            .persist(&self.path)
            .map_err(|err| StoreError::Io(err.error))?;

        info!(
            path = %self.path.display(),
            bundle_id = %bundle.meta().bundle_id,
            training_count = bundle.meta().training_count,
            "Model bundle saved"
        );
        Ok(())
    }

    /// Reads the stored bundle, or `None` when nothing has been saved yet
    pub fn load(&self) -> Result<Option<ModelBundle>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No model bundle on disk");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 8];
        if let Err(err) = reader.read_exact(&mut magic) {
            return Err(match err.kind() {
                io::ErrorKind::UnexpectedEof => self.incompatible("truncated header"),
                _ => err.into(),
            });
        }
        if &magic != MAGIC {
            return Err(self.incompatible(format!("magic {:02x?}", magic)));
        }

        let version: u32 = bincode::deserialize_from(&mut reader)?;
        if version != FORMAT_VERSION {
            return Err(StoreError::IncompatibleFormat {
                path: self.path.clone(),
                found: format!("version {version}"),
                expected: format!("version {FORMAT_VERSION}"),
            });
        }

        let bundle: ModelBundle = bincode::deserialize_from(&mut reader)?;
        debug!(
            path = %self.path.display(),
            bundle_id = %bundle.meta().bundle_id,
            "Model bundle loaded"
        );
        Ok(Some(bundle))
    }

    /// Reports whether a bundle is stored and its metadata
    pub fn status(&self) -> Result<ModelStatus, StoreError> {
        Ok(ModelStatus::of(self.load()?.as_ref()))
    }

    fn incompatible(&self, found: impl Into<String>) -> StoreError {
        StoreError::IncompatibleFormat {
            path: self.path.clone(),
            found: found.into(),
            expected: format!("magic {:02x?}", MAGIC),
        }
    }
}
