/// Path of the search endpoint, relative to the page/base URL.
pub const SEARCH_ENDPOINT: &str = "db/obj/search";
/// Name of the single query-string parameter carrying the search text.
pub const QUERY_PARAM: &str = "q";

/// Trims the field value; `None` means nothing worth searching for.
pub fn normalize_query(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
