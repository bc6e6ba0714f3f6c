//! Icon search and SVG markup lookup.

mod iconify;

pub use self::iconify::IconifyClient;

use futures::future::BoxFuture;

use crate::dao::error::LookupResult;

/// Abstraction over an icon search service keyed by `prefix:name` identifiers.
pub trait IconSearch: Send + Sync {
    /// Search `query` within the collections named by `prefixes`, returning icon identifiers.
    fn search(
        &self,
        query: &str,
        prefixes: &[String],
        limit: usize,
    ) -> BoxFuture<'static, LookupResult<Vec<String>>>;
    /// Download the SVG markup of one icon.
    fn fetch_markup(&self, icon_id: &str) -> BoxFuture<'static, LookupResult<String>>;
}

/// Split an icon identifier into its collection prefix and icon name.
pub fn split_icon_id(icon_id: &str) -> Option<(&str, &str)> {
    let (prefix, name) = icon_id.split_once(':')?;
    if prefix.is_empty() || name.is_empty() {
        return None;
    }
    Some((prefix, name))
}
