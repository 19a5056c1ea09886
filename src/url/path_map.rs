use crate::PathError;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Maps URLs to local file paths under a fixed output root.
///
/// The mapping is deterministic and directory-safe: a URL ending in `/` or
/// lacking a file extension maps under an `index.html` leaf, so a page and a
/// sibling asset with the same name never collide. Percent-escapes are
/// decoded before path construction, and any decoded `..` segment is
/// rejected before a filesystem path is ever produced.
#[derive(Debug, Clone)]
pub struct PathMapper {
    root: PathBuf,
}

impl PathMapper {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a URL to its canonical local file path.
    ///
    /// Rules, applied to the decoded URL path (query and fragment are never
    /// part of the mapping):
    /// - a path ending in `/` gains an `index.html` leaf
    /// - a last segment without an extension gains a `/index.html` leaf
    /// - the result is joined under the output root segment by segment
    ///
    /// # Errors
    ///
    /// * `PathError::Traversal` - the decoded path contains a `..` segment
    /// * `PathError::Unmappable` - the URL has no hierarchical path
    pub fn local_path(&self, url: &Url) -> Result<PathBuf, PathError> {
        if url.cannot_be_a_base() {
            return Err(PathError::Unmappable {
                url: url.to_string(),
            });
        }

        let mut mapped = percent_decode_str(url.path())
            .decode_utf8_lossy()
            .into_owned();

        if mapped.ends_with('/') {
            mapped.push_str("index.html");
        } else if !last_segment_has_extension(&mapped) {
            mapped.push_str("/index.html");
        }

        let mut result = self.root.clone();
        for segment in mapped.trim_start_matches('/').split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    return Err(PathError::Traversal {
                        url: url.to_string(),
                    })
                }
                _ => result.push(segment),
            }
        }

        Ok(result)
    }

    /// Computes the relative link from `from`'s mapped directory to `to`'s
    /// mapped path, using forward slashes regardless of platform.
    ///
    /// Falls back to `to`'s absolute mapped path when no relative path can
    /// be computed; that link is degraded but never wrong.
    pub fn relative_link(&self, from: &Url, to: &Url) -> Result<String, PathError> {
        let from_path = self.local_path(from)?;
        let to_path = self.local_path(to)?;
        let from_dir = from_path.parent().unwrap_or(&self.root);

        match relative_from(&to_path, from_dir) {
            Some(rel) => Ok(forward_slashes(&rel)),
            None => Ok(forward_slashes(&to_path)),
        }
    }
}

/// Whether the last `/`-separated segment carries a file extension
fn last_segment_has_extension(path: &str) -> bool {
    let segment = path.rsplit('/').next().unwrap_or("");
    match segment.rsplit_once('.') {
        Some((stem, ext)) => !stem.is_empty() && !ext.is_empty(),
        None => false,
    }
}

/// Computes `target` relative to the `base` directory.
///
/// Returns `None` when the two paths share no common prefix at all (e.g.
/// one absolute, one relative) and a `..` chain cannot bridge them.
fn relative_from(target: &Path, base: &Path) -> Option<PathBuf> {
    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    let mut common = 0;
    while common < target_parts.len()
        && common < base_parts.len()
        && target_parts[common] == base_parts[common]
    {
        common += 1;
    }

    let rooted = |c: Option<&Component>| {
        matches!(c, Some(Component::RootDir) | Some(Component::Prefix(_)))
    };
    if common == 0 && (rooted(target_parts.first()) || rooted(base_parts.first())) {
        return None;
    }

    let mut result = PathBuf::new();
    for comp in &base_parts[common..] {
        if matches!(comp, Component::Normal(_)) {
            result.push("..");
        }
    }
    for comp in &target_parts[common..] {
        result.push(comp.as_os_str());
    }

    Some(result)
}

fn forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
