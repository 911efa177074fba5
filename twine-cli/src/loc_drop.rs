//! Zip archives exchanged with translators.
//!
//! An archive holds a `Locales/` directory with one file per language, named
//! `<lang><extension>`.

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use zip::{ZipArchive, ZipWriter, write::SimpleFileOptions};

use crate::error::CliError;

pub const LOCALES_DIR: &str = "Locales";

pub struct LocDropWriter {
    zip: ZipWriter<File>,
    options: SimpleFileOptions,
}

impl LocDropWriter {
    /// Creates the archive at `path` with an empty `Locales/` directory.
    pub fn create(path: &Path) -> Result<Self, CliError> {
        let mut zip = ZipWriter::new(File::create(path)?);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        zip.add_directory(LOCALES_DIR, options)?;
        Ok(LocDropWriter { zip, options })
    }

    /// Adds `Locales/<file_name>`.
    pub fn add_file(&mut self, file_name: &str, content: &[u8]) -> Result<(), CliError> {
        self.zip
            .start_file(format!("{LOCALES_DIR}/{file_name}"), self.options)?;
        self.zip.write_all(content)?;
        Ok(())
    }

    pub fn finish(self) -> Result<(), CliError> {
        self.zip.finish()?;
        Ok(())
    }
}

/// One file found in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocDropEntry {
    /// Path inside the archive, e.g. `Locales/fr.xml`.
    pub name: String,
    pub content: Vec<u8>,
}

/// Reads every file of the archive at `path`, skipping directories and
/// hidden files.
pub fn read_entries(path: &Path) -> Result<Vec<LocDropEntry>, CliError> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let mut entries = Vec::new();

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_string();
        let base_name = name.rsplit('/').next().unwrap_or(&name);
        if base_name.starts_with('.') {
            continue;
        }

        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        entries.push(LocDropEntry { name, content });
    }

    tracing::debug!(path = %path.display(), entries = entries.len(), "read loc drop");
    Ok(entries)
}
