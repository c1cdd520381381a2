//! Sitemap XML parsing
//!
//! Handles both `<urlset>` documents (page lists) and `<sitemapindex>`
//! documents (lists of nested sitemaps). Only `<loc>` values are read.

use crate::{ReindexError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<urlset>`: page URLs
    UrlSet(Vec<String>),

    /// `<sitemapindex>`: URLs of nested sitemaps
    Index(Vec<String>),
}

/// Parses a sitemap document fetched from `url`
///
/// # Examples
///
/// ```
/// use gsc_reindex::gsc::{parse_sitemap, SitemapDocument};
///
/// let xml = r#"<urlset><url><loc>https://example.com/a</loc></url></urlset>"#;
/// let doc = parse_sitemap("https://example.com/sitemap.xml", xml).unwrap();
/// assert_eq!(doc, SitemapDocument::UrlSet(vec!["https://example.com/a".to_string()]));
/// ```
pub fn parse_sitemap(url: &str, xml: &str) -> Result<SitemapDocument> {
    let sitemap_err = |message: String| ReindexError::Sitemap {
        url: url.to_string(),
        message,
    };

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut is_index = false;
    let mut in_loc = false;
    let mut locs = Vec::new();

    loop {
        match reader.read_event().map_err(|e| sitemap_err(e.to_string()))? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sitemapindex" => is_index = true,
                b"loc" => in_loc = true,
                _ => {}
            },
            Event::End(e) => {
                if e.local_name().as_ref() == b"loc" {
                    in_loc = false;
                }
            }
            Event::Text(text) if in_loc => {
                let value = text.unescape().map_err(|e| sitemap_err(e.to_string()))?;
                push_loc(&mut locs, &value);
            }
            Event::CData(data) if in_loc => {
                push_loc(&mut locs, &String::from_utf8_lossy(&data));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if is_index {
        Ok(SitemapDocument::Index(locs))
    } else {
        Ok(SitemapDocument::UrlSet(locs))
    }
}

fn push_loc(locs: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        locs.push(value.to_string());
    }
}
