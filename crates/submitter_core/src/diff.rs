use std::collections::HashSet;

/// URLs from the sitemap that are not yet in the submission history.
///
/// Comparison is exact string equality. Each URL appears once, at the position of its
/// first occurrence in `all_urls`.
pub fn new_urls(all_urls: &[String], submitted: &HashSet<String>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(all_urls.len());
    all_urls
        .iter()
        .filter(|url| !submitted.contains(url.as_str()) && seen.insert(url.as_str()))
        .cloned()
        .collect()
}
