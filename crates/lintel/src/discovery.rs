use std::path::{Path, PathBuf};

use anyhow::anyhow;
use ignore::WalkBuilder;
use path_absolutize::Absolutize;

/// Extensions of the files picked up when walking a directory.
pub const JS_EXTENSIONS: &[&str] = &["js", "mjs", "cjs"];

pub fn has_js_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| JS_EXTENSIONS.contains(&extension))
}

/// Find the files to lint under `paths`.
///
/// Files named explicitly are kept whatever their extension. Directories are
/// walked recursively, skipping hidden and git-ignored entries.
pub fn discover_js_files(paths: &[String]) -> Vec<anyhow::Result<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        let path = Path::new(path);
        if path.is_file() {
            files.push(Ok(path.to_path_buf()));
            continue;
        }
        if !path.exists() {
            files.push(Err(anyhow!("No such file or directory: {}", path.display())));
            continue;
        }

        for entry in WalkBuilder::new(path).build() {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|file_type| file_type.is_file());
                    if is_file && has_js_extension(entry.path()) {
                        files.push(Ok(entry.into_path()));
                    }
                }
                Err(err) => files.push(Err(err.into())),
            }
        }
    }

    tracing::debug!(count = files.len(), "Discovered files");
    files
}

/// `path` relative to the working directory when it is below it, for display.
pub fn relativize_path(path: &Path) -> String {
    let Ok(absolute) = path.absolutize() else {
        return path.display().to_string();
    };
    if let Ok(cwd) = std::env::current_dir()
        && let Ok(relative) = absolute.strip_prefix(&cwd)
    {
        return relative.display().to_string();
    }
    absolute.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_js_extension() {
        assert!(has_js_extension(Path::new("src/app.js")));
        assert!(has_js_extension(Path::new("build.mjs")));
        assert!(has_js_extension(Path::new("config.cjs")));
        assert!(!has_js_extension(Path::new("notes.txt")));
        assert!(!has_js_extension(Path::new("Makefile")));
    }

    #[test]
    fn test_discover_js_files() -> anyhow::Result<()> {
        let directory = tempfile::TempDir::new()?;
        let root = directory.path();
        std::fs::create_dir(root.join("src"))?;
        std::fs::write(root.join("src/app.js"), "")?;
        std::fs::write(root.join("src/notes.txt"), "")?;
        std::fs::write(root.join("index.mjs"), "")?;
        std::fs::write(root.join("script.txt"), "")?;

        let mut found: Vec<PathBuf> = discover_js_files(&[
            root.display().to_string(),
            root.join("script.txt").display().to_string(),
        ])
        .into_iter()
        .collect::<anyhow::Result<_>>()?;
        found.sort();

        assert_eq!(
            found,
            vec![root.join("index.mjs"), root.join("script.txt"), root.join("src/app.js")]
        );
        Ok(())
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let found = discover_js_files(&["does/not/exist".to_string()]);
        assert_eq!(found.len(), 1);
        let error = found[0].as_ref().unwrap_err();
        assert_eq!(error.to_string(), "No such file or directory: does/not/exist");
    }
}
