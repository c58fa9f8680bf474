//! Environment configuration

use std::path::PathBuf;

/// Environment variable overriding the database location
pub const DATABASE_PATH_VAR: &str = "NUTRIABCD_DATABASE_PATH";

const DATABASE_FILE: &str = "nutriabcd.db";

/// Get the database path from environment or use default
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_database_path())
}

/// `<project>/data/nutriabcd.db`, resolved from the executable location
pub fn default_database_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    let mut path = project_root(exe_dir);
    path.push("data");
    path.push(DATABASE_FILE);
    path
}

/// Go up from target/release or target/debug to project root
fn project_root(mut dir: PathBuf) -> PathBuf {
    if dir.ends_with("deps") {
        dir.pop();
    }
    if dir.ends_with("release") || dir.ends_with("debug") {
        if let Some(grandparent) = dir.parent().and_then(|p| p.parent()) {
            return grandparent.to_path_buf();
        }
    }
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_root_walks_out_of_target() {
        assert_eq!(
            project_root(PathBuf::from("/srv/nutriabcd/target/release")),
            PathBuf::from("/srv/nutriabcd")
        );
        assert_eq!(
            project_root(PathBuf::from("/srv/nutriabcd/target/debug/deps")),
            PathBuf::from("/srv/nutriabcd")
        );
        assert_eq!(
            project_root(PathBuf::from("/opt/bin")),
            PathBuf::from("/opt/bin")
        );
    }

    #[test]
    fn test_default_path_ends_in_data_dir() {
        let path = default_database_path();
        assert!(path.ends_with("data/nutriabcd.db"));
    }
}
