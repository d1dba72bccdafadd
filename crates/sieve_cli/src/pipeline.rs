//! Shared pipeline helpers for CLI commands.
//!
//! Project root resolution, configuration loading, and discovery of the
//! paths handed to each tool.

use std::path::{Path, PathBuf};

use sieve_config::{ProjectConfig, CONFIG_FILE_NAME};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `sieve.toml`.
///
/// Returns `None` if no ancestor has one.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
        .map(Path::to_path_buf)
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `sieve.toml`,
/// falling back to the current directory itself.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        let cwd = std::env::current_dir()?;
        Ok(find_project_root(&cwd).unwrap_or(cwd))
    }
}

/// Loads the project configuration.
///
/// An explicit `--config` file is read as-is and must exist; otherwise
/// `sieve.toml` in `project_dir` is optional.
pub fn load_project_config(
    global: &GlobalArgs,
    project_dir: &Path,
) -> Result<ProjectConfig, Box<dyn std::error::Error>> {
    match global.config.as_deref().map(Path::new) {
        Some(path) if path.is_file() => {
            let content = std::fs::read_to_string(path)?;
            Ok(sieve_config::load_config_from_str(&content)?)
        }
        _ => Ok(sieve_config::load_config_or_default(project_dir)?),
    }
}

/// Chooses the paths every tool is run against.
///
/// Explicit command-line paths win, then `lint.paths` from the config
/// (relative to `project_dir`), then whichever of `src` and `tests` exist.
pub fn discover_paths(
    project_dir: &Path,
    explicit: &[String],
    configured: &[String],
    include_tests: bool,
) -> Vec<PathBuf> {
    if !explicit.is_empty() {
        return explicit.iter().map(PathBuf::from).collect();
    }
    if !configured.is_empty() {
        return configured.iter().map(|p| project_dir.join(p)).collect();
    }

    let mut defaults = vec!["src"];
    if include_tests {
        defaults.push("tests");
    }
    defaults
        .into_iter()
        .map(|name| project_dir.join(name))
        .filter(|path| path.is_dir())
        .collect()
}

/// Returns `true` for a directory that holds packages without being one.
///
/// Such "src-dir" roots are import roots rather than code, so mypy is given
/// the packages inside them instead.
pub fn is_src_dir(path: &Path) -> bool {
    path.is_dir() && !path.join("__init__.py").exists() && !package_dirs(path).is_empty()
}

/// Expands src-dir roots into their package directories; other paths pass through.
pub fn module_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for path in paths {
        if is_src_dir(path) {
            out.extend(package_dirs(path));
        } else {
            out.push(path.clone());
        }
    }
    out
}

/// Lists visible subdirectories of `dir`, sorted by path.
fn package_dirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| !n.starts_with('.') && n != "__pycache__")
        })
        .collect();
    dirs.sort();
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: false,
            verbose: false,
            color: false,
            config,
        }
    }

    // -- find_project_root tests --

    #[test]
    fn find_project_root_in_current_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("sieve.toml"), "").unwrap();
        assert_eq!(find_project_root(tmp.path()).unwrap(), tmp.path());
    }

    #[test]
    fn find_project_root_in_parent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("sieve.toml"), "[lint]\n").unwrap();
        let sub = tmp.path().join("src").join("pkg");
        fs::create_dir_all(&sub).unwrap();
        assert_eq!(find_project_root(&sub).unwrap(), tmp.path());
    }

    #[test]
    fn find_project_root_not_found() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("deeper");
        fs::create_dir_all(&sub).unwrap();
        // Some ancestor of a temp dir could in theory hold a sieve.toml;
        // the temp dir itself must not be reported.
        assert_ne!(find_project_root(&sub).as_deref(), Some(sub.as_path()));
    }

    #[test]
    fn resolve_root_from_config_file() {
        let tmp = TempDir::new().unwrap();
        let cfg = tmp.path().join("custom.toml");
        fs::write(&cfg, "").unwrap();
        let root = resolve_project_root(&global(Some(cfg.display().to_string()))).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn load_custom_config_file() {
        let tmp = TempDir::new().unwrap();
        let cfg = tmp.path().join("custom.toml");
        fs::write(&cfg, "[lint]\ntools = [\"mypy\"]\n").unwrap();
        let config = load_project_config(&global(Some(cfg.display().to_string())), tmp.path()).unwrap();
        assert!(config.lint.is_enabled("mypy"));
        assert!(!config.lint.is_enabled("flake8"));
    }

    #[test]
    fn load_config_defaults_without_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_project_config(&global(None), tmp.path()).unwrap();
        assert!(config.lint.tools.is_none());
    }

    // -- discover_paths tests --

    #[test]
    fn explicit_paths_win() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        let paths = discover_paths(tmp.path(), &["lib/a.py".to_string()], &["src".to_string()], true);
        assert_eq!(paths, vec![PathBuf::from("lib/a.py")]);
    }

    #[test]
    fn configured_paths_are_project_relative() {
        let tmp = TempDir::new().unwrap();
        let paths = discover_paths(tmp.path(), &[], &["app".to_string()], true);
        assert_eq!(paths, vec![tmp.path().join("app")]);
    }

    #[test]
    fn default_paths_exist_only() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::create_dir_all(tmp.path().join("tests")).unwrap();

        let with_tests = discover_paths(tmp.path(), &[], &[], true);
        assert_eq!(with_tests, vec![tmp.path().join("src"), tmp.path().join("tests")]);

        let without_tests = discover_paths(tmp.path(), &[], &[], false);
        assert_eq!(without_tests, vec![tmp.path().join("src")]);
    }

    #[test]
    fn default_paths_empty_project() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_paths(tmp.path(), &[], &[], true).is_empty());
    }

    // -- module_paths tests --

    #[test]
    fn src_dir_expands_to_packages() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("beta")).unwrap();
        fs::create_dir_all(src.join("alpha")).unwrap();
        fs::create_dir_all(src.join("__pycache__")).unwrap();
        fs::create_dir_all(src.join(".hidden")).unwrap();
        fs::write(src.join("setup_helper.py"), "").unwrap();

        assert!(is_src_dir(&src));
        assert_eq!(module_paths(&[src.clone()]), vec![src.join("alpha"), src.join("beta")]);
    }

    #[test]
    fn package_dir_is_kept() {
        let tmp = TempDir::new().unwrap();
        let pkg = tmp.path().join("pkg");
        fs::create_dir_all(pkg.join("sub")).unwrap();
        fs::write(pkg.join("__init__.py"), "").unwrap();
        assert!(!is_src_dir(&pkg));
        assert_eq!(module_paths(&[pkg.clone()]), vec![pkg]);
    }

    #[test]
    fn files_and_missing_paths_pass_through() {
        let paths = vec![PathBuf::from("does/not/exist"), PathBuf::from("script.py")];
        assert_eq!(module_paths(&paths), paths);
    }
}
