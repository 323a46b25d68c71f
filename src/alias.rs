// src/alias.rs

// dependencies
use std::path::{Component, Path, PathBuf};

// resolve `target` against `base` without touching the filesystem, folding away
// `.` and `..` components; an absolute `target` replaces `base` entirely
pub fn resolve_relative(base: &Path, target: &Path) -> PathBuf {
    let joined = base.join(target);
    let mut resolved = PathBuf::new();

    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // never climb above the root
                if !matches!(
                    resolved.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    resolved.pop();
                }
            }
            other => resolved.push(other.as_os_str()),
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_current_and_parent_components() {
        let resolved = resolve_relative(Path::new("/app/config"), Path::new("./../static/./css"));
        assert_eq!(resolved, PathBuf::from("/app/static/css"));
    }

    #[test]
    fn parent_components_stop_at_root() {
        let resolved = resolve_relative(Path::new("/"), Path::new("../../etc"));
        assert_eq!(resolved, PathBuf::from("/etc"));
    }

    #[test]
    fn absolute_target_replaces_base() {
        let resolved = resolve_relative(Path::new("/app"), Path::new("/srv/css"));
        assert_eq!(resolved, PathBuf::from("/srv/css"));
    }
}
