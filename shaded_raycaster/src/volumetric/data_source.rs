use std::{fs::File, path::Path};

use memmap::{Mmap, MmapOptions};

use crate::RenderError;

/// Memory mapped bytes of a volume file.
pub struct DataSource {
    mmap: Mmap,
}

impl DataSource {
    pub fn get_slice(&self) -> &[u8] {
        &self.mmap[..]
    }

    /// Memory map file at `path`
    pub fn from_file<P>(path: P) -> Result<DataSource, RenderError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(RenderError::Parse("path does not lead to a file"));
        }

        let file = File::open(path)?;

        // Safety: the map is read only and lives only while the volume is being parsed
        let mmap = unsafe { MmapOptions::new().map(&file)? };

        Ok(DataSource { mmap })
    }
}
