use url::Url;

/// Resolves a raw `href` attribute value into an absolute, fetchable URL.
///
/// # Resolution Rules
///
/// Applied in priority order:
///
/// 1. Empty string or `/` alone → the origin root (`origin` + `/`)
/// 2. Starts with `/` (length > 1) → `origin` + href
/// 3. Starts with `?`, or `#` with length > 1 → appended to the *current
///    page's* URL, preserving its path context for query/fragment-only links
/// 4. Starts with `http` → used verbatim (already absolute)
/// 5. Anything else (bare relative paths, `mailto:`, `javascript:`,
///    protocol-relative `//`) → rejected
///
/// A rejected link is dropped by the caller, never queued.
///
/// # Arguments
///
/// * `href` - The raw href value as extracted from the page
/// * `page_url` - Absolute URL of the page the href was found on
/// * `origin` - The crawl origin, without a trailing slash
///
/// # Examples
///
/// ```
/// use linkscout::url::resolve_href;
///
/// let origin = "https://example.com";
/// let page = "https://example.com/about";
///
/// assert_eq!(
///     resolve_href("/team", page, origin),
///     Some("https://example.com/team".to_string())
/// );
/// assert_eq!(resolve_href("mailto:hi@example.com", page, origin), None);
/// ```
pub fn resolve_href(href: &str, page_url: &str, origin: &str) -> Option<String> {
    if href.is_empty() || href == "/" {
        return Some(format!("{}/", origin));
    }

    if href.starts_with("//") {
        // Protocol-relative links fall through to rejection, not rule 2.
        return None;
    }

    if href.starts_with('/') {
        return Some(format!("{}{}", origin, href));
    }

    if href.starts_with('?') || (href.starts_with('#') && href.len() > 1) {
        return Some(format!("{}{}", page_url, href));
    }

    if href.starts_with("http") {
        return Some(href.to_string());
    }

    None
}

/// Returns the fragment identifier of a URL, if it carries a non-empty one.
pub fn anchor_fragment(url: &str) -> Option<&str> {
    let (_, fragment) = url.split_once('#')?;
    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}

/// Returns the URL with any fragment removed.
///
/// Used for redirect detection: servers report final URLs without the
/// fragment, so comparing raw strings would misreport every `page#frag`
/// target as a redirect.
pub fn strip_fragment(url: &str) -> &str {
    match url.split_once('#') {
        Some((base, _)) => base,
        None => url,
    }
}

/// Extracts the pathname of an absolute URL for scope matching.
///
/// Falls back to `/` when the URL cannot be parsed.
pub fn url_pathname(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => "/".to_string(),
    }
}
