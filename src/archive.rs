//! Solution archives.
//!
//! A finished solution is written as a markdown file, optionally next to the
//! problem image, and both are bundled into a zip file.

use crate::error::{IoError, Result};
use crate::formula::convert;
use crate::image::ImageInput;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Default output directory for archives.
pub const DEFAULT_OUTPUT_DIR: &str = "solutions";

/// Timestamp format embedded in archive file names.
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Location of a written archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArchive {
    /// Full path of the zip file.
    pub zip_path: PathBuf,
    /// File name of the zip file.
    pub zip_name: String,
}

/// Saves a solution and returns the written archive.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be written.
pub fn save_solution(
    output_dir: &Path,
    problem: &str,
    image: Option<&ImageInput>,
    solution: &str,
) -> Result<SavedArchive> {
    let stamp = chrono::Local::now().format(STAMP_FORMAT).to_string();
    save_solution_stamped(output_dir, &stamp, problem, image, solution)
}

/// Same as [`save_solution`] with an explicit file name stamp.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be written.
pub fn save_solution_stamped(
    output_dir: &Path,
    stamp: &str,
    problem: &str,
    image: Option<&ImageInput>,
    solution: &str,
) -> Result<SavedArchive> {
    std::fs::create_dir_all(output_dir).map_err(|e| IoError::WriteFailed {
        path: output_dir.to_string_lossy().to_string(),
        reason: e.to_string(),
    })?;

    let image_file = match image {
        Some(image) => {
            let name = format!("image_{stamp}.{}", image.extension());
            write_file(&output_dir.join(&name), image.bytes())?;
            Some(name)
        }
        None => None,
    };

    let markdown_name = format!("solution_{stamp}.md");
    let markdown = render_markdown(problem, image_file.as_deref(), solution);
    write_file(&output_dir.join(&markdown_name), markdown.as_bytes())?;

    let zip_name = format!("solution_{stamp}.zip");
    let zip_path = output_dir.join(&zip_name);
    let file = File::create(&zip_path).map_err(|e| IoError::WriteFailed {
        path: zip_path.to_string_lossy().to_string(),
        reason: e.to_string(),
    })?;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(file);
    zip.start_file(markdown_name.as_str(), options)?;
    zip.write_all(markdown.as_bytes())?;
    if let (Some(name), Some(image)) = (image_file.as_deref(), image) {
        zip.start_file(name, options)?;
        zip.write_all(image.bytes())?;
    }
    zip.finish()?;

    tracing::info!(path = %zip_path.display(), "saved solution archive");
    Ok(SavedArchive { zip_path, zip_name })
}

/// Builds the markdown body of a saved solution.
#[must_use]
pub fn render_markdown(problem: &str, image_file: Option<&str>, solution: &str) -> String {
    let mut markdown = String::from("# Theoretical mechanics problem\n\n## Problem\n\n");
    markdown.push_str(problem);
    markdown.push_str("\n\n");
    if let Some(name) = image_file {
        markdown.push_str(&format!("![problem image](./{name})\n\n"));
    }
    markdown.push_str(&convert(solution));
    markdown
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| {
        IoError::WriteFailed {
            path: path.to_string_lossy().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
