//! Bundling generated documents into a single download.
//!
//! One document is served as-is; several are packed into a deflated zip
//! archive with one member per document.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use bytes::Bytes;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Name of the archive served for multi-activity requests.
pub const ARCHIVE_NAME: &str = "runs.zip";

pub const TCX_CONTENT_TYPE: &str = "application/xml";
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

#[derive(Debug, thiserror::Error)]
pub enum PackagingError {
    #[error("nothing to package")]
    Empty,
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A named document ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct Download {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

/// Packages named documents for download.
pub fn package(mut files: Vec<(String, Vec<u8>)>) -> Result<Download, PackagingError> {
    match files.len() {
        0 => Err(PackagingError::Empty),
        1 => {
            let (file_name, bytes) = files.remove(0);
            Ok(Download {
                file_name,
                content_type: TCX_CONTENT_TYPE,
                bytes: Bytes::from(bytes),
            })
        }
        _ => Ok(Download {
            file_name: ARCHIVE_NAME.to_string(),
            content_type: ZIP_CONTENT_TYPE,
            bytes: Bytes::from(zip_archive(files)?),
        }),
    }
}

/// Writes every document into a deflated zip archive.
fn zip_archive(files: Vec<(String, Vec<u8>)>) -> Result<Vec<u8>, PackagingError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, bytes) in unique_names(files) {
        writer.start_file(name, options)?;
        writer.write_all(&bytes)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Suffixes repeated names (`run_x.tcx`, `run_x_2.tcx`, ...) so no member is
/// overwritten.
fn unique_names(files: Vec<(String, Vec<u8>)>) -> Vec<(String, Vec<u8>)> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    files
        .into_iter()
        .map(|(name, bytes)| {
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                return (name, bytes);
            }

            let renamed = match name.rsplit_once('.') {
                Some((stem, ext)) => format!("{stem}_{count}.{ext}"),
                None => format!("{name}_{count}"),
            };
            (renamed, bytes)
        })
        .collect()
}
