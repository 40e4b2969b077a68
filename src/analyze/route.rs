//! Route naming.
//!
//! A page's route is its file stem. Directory structure is not part of the
//! name, so `src/blog/index.njk` and `src/index.njk` share the route `index`
//! and collide (see [`super::scan`]).

use std::path::Path;

/// Route name for the page at `path` under `source_root`.
///
/// Returns `None` for paths without a usable UTF-8 stem.
pub fn route_name(path: &Path, source_root: &Path) -> Option<String> {
    let relative = path.strip_prefix(source_root).unwrap_or(path);
    let stem = relative.file_stem()?.to_str()?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(path: &str) -> Option<String> {
        route_name(Path::new(path), Path::new("src"))
    }

    #[test]
    fn test_index_route() {
        assert_eq!(route("src/index.njk").as_deref(), Some("index"));
    }

    #[test]
    fn test_stem_route() {
        assert_eq!(route("src/pricing.njk").as_deref(), Some("pricing"));
        assert_eq!(route("src/about.html").as_deref(), Some("about"));
    }

    #[test]
    fn test_nested_directories_collapse() {
        assert_eq!(route("src/a/pricing.njk").as_deref(), Some("pricing"));
        assert_eq!(route("src/blog/index.njk"), route("src/index.njk"));
    }

    #[test]
    fn test_path_outside_source_root() {
        assert_eq!(route("pages/contact.njk").as_deref(), Some("contact"));
    }
}
