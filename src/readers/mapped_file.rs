use crate::error::Result;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Read-only memory map of the input file, unmapped when dropped.
pub struct MappedFile {
    path: PathBuf,
    mmap: Option<Mmap>,
}

impl MappedFile {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();

        // Zero-length maps are rejected on some platforms
        let mmap = if len == 0 {
            None
        } else {
            // SAFETY: the input is treated as immutable for the whole run
            Some(unsafe { Mmap::map(&file)? })
        };

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_maps_file_contents() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "Hamburg;12.0\n")?;
        temp_file.flush()?;

        let mapped = MappedFile::open(temp_file.path())?;
        assert_eq!(mapped.bytes(), b"Hamburg;12.0\n");
        assert_eq!(mapped.len(), 13);

        Ok(())
    }

    #[test]
    fn test_empty_file_maps_to_empty_slice() -> Result<()> {
        let temp_file = NamedTempFile::new()?;

        let mapped = MappedFile::open(temp_file.path())?;
        assert!(mapped.is_empty());
        assert_eq!(mapped.bytes(), b"");

        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = MappedFile::open(Path::new("does/not/exist/measurements.txt"));
        assert!(matches!(result, Err(ProcessingError::Io(_))));
    }
}
