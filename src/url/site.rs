/// Prefix Search Console uses for domain properties
pub const DOMAIN_PROPERTY_PREFIX: &str = "sc-domain:";

/// Converts user input into a Search Console property identifier
///
/// URL-prefix properties (`http://` or `https://`) always end with a slash;
/// anything else is treated as a bare domain and becomes a domain property.
///
/// # Examples
///
/// ```
/// use gsc_reindex::url::convert_to_site_url;
///
/// assert_eq!(convert_to_site_url("https://example.com"), "https://example.com/");
/// assert_eq!(convert_to_site_url("https://example.com/"), "https://example.com/");
/// assert_eq!(convert_to_site_url("example.com"), "sc-domain:example.com");
/// ```
pub fn convert_to_site_url(input: &str) -> String {
    let input = input.trim();
    if input.starts_with("http://") || input.starts_with("https://") {
        if input.ends_with('/') {
            input.to_string()
        } else {
            format!("{}/", input)
        }
    } else {
        format!("{}{}", DOMAIN_PROPERTY_PREFIX, input)
    }
}

/// Derives the filesystem-safe cache file name for a site
///
/// The scheme becomes an `http_`/`https_` prefix and every remaining path
/// separator or colon becomes `_`.
///
/// # Examples
///
/// ```
/// use gsc_reindex::url::cache_file_name;
///
/// assert_eq!(cache_file_name("https://example.com/"), "https_example.com_.json");
/// assert_eq!(cache_file_name("sc-domain:example.com"), "sc-domain_example.com.json");
/// ```
pub fn cache_file_name(site_url: &str) -> String {
    let key = if let Some(rest) = site_url.strip_prefix("https://") {
        format!("https_{}", rest)
    } else if let Some(rest) = site_url.strip_prefix("http://") {
        format!("http_{}", rest)
    } else {
        site_url.to_string()
    };

    let key: String = key
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            other => other,
        })
        .collect();

    format!("{}.json", key)
}
