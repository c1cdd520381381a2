//! Candidate URL input
//!
//! A CSV file supplies URLs directly: the first field of every row is a URL.
//! There is no header handling, and rows may have any number of fields.

use crate::Result;
use std::io::Read;
use std::path::Path;

/// Reads the URLs listed in the first column of a CSV file
///
/// # Example
///
/// ```no_run
/// use gsc_reindex::input::read_csv_urls;
/// use std::path::Path;
///
/// let urls = read_csv_urls(Path::new("urls.csv")).unwrap();
/// println!("{} URLs to submit", urls.len());
/// ```
pub fn read_csv_urls(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path)?;
    read_csv_urls_from(file)
}

/// Reads first-column URLs from any CSV source
pub fn read_csv_urls_from<R: Read>(source: R) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(url) = record.get(0).map(str::trim).filter(|f| !f.is_empty()) {
            urls.push(url.to_string());
        }
    }

    tracing::debug!("Read {} URLs from CSV input", urls.len());
    Ok(urls)
}
