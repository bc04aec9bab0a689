//! Engine service traits and the local filesystem implementation.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use atrium_types::config::EngineConfig;
use atrium_types::error::Result;

// ---------------------------------------------------------------------------
// Cache store
// ---------------------------------------------------------------------------

/// Abstraction over the engine's cache store.
pub trait CacheStore {
    /// Number of cached entries.
    fn entry_count(&self) -> Result<usize>;

    /// Remove every cached entry. Returns how many were removed.
    fn clear(&self) -> Result<usize>;
}

// ---------------------------------------------------------------------------
// Asset pipeline
// ---------------------------------------------------------------------------

/// Abstraction over asset publication and bundling.
pub trait AssetPipeline {
    /// Publish asset sources into the public directory, preserving the
    /// relative layout. Returns how many files were copied.
    fn install(&self) -> Result<usize>;

    /// Bundle stylesheet and script sources into single files under the
    /// public directory. Returns how many source files were bundled.
    fn compile(&self) -> Result<usize>;
}

// ---------------------------------------------------------------------------
// Schema migrator
// ---------------------------------------------------------------------------

/// Abstraction over schema migration bookkeeping.
///
/// Migration files are identified by file name and ordered lexicographically.
/// Executing the SQL itself belongs to the ORM layer behind this seam.
pub trait SchemaMigrator {
    /// Names of migrations already applied, in application order.
    fn applied(&self) -> Result<Vec<String>>;

    /// Names of migrations present on disk but not yet applied, in
    /// file-name order.
    fn pending(&self) -> Result<Vec<String>>;

    /// Apply every pending migration. Returns how many were applied.
    fn migrate(&self) -> Result<usize>;
}

// ---------------------------------------------------------------------------
// Local implementation
// ---------------------------------------------------------------------------

/// Filesystem-backed implementation of all engine services, rooted at the
/// directories named in the engine config.
pub struct LocalEngine {
    cache_dir: PathBuf,
    assets_dir: PathBuf,
    public_dir: PathBuf,
    migrations_dir: PathBuf,
    state_file: PathBuf,
}

impl LocalEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            cache_dir: config.cache_dir.clone(),
            assets_dir: config.assets_dir.clone(),
            public_dir: config.public_dir.clone(),
            migrations_dir: config.migrations_dir.clone(),
            state_file: config.data_dir.join("migrations.state"),
        }
    }
}

impl CacheStore for LocalEngine {
    fn entry_count(&self) -> Result<usize> {
        // A cache directory that was never created is an empty cache.
        if !self.cache_dir.exists() {
            return Ok(0);
        }
        let mut count = 0;
        for entry in fs::read_dir(&self.cache_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                count += 1;
            }
        }
        Ok(count)
    }

    fn clear(&self) -> Result<usize> {
        if !self.cache_dir.exists() {
            return Ok(0);
        }
        let mut removed = 0;
        for entry in fs::read_dir(&self.cache_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        log::info!("cache cleared: {removed} entries removed");
        Ok(removed)
    }
}

impl AssetPipeline for LocalEngine {
    fn install(&self) -> Result<usize> {
        if !self.assets_dir.exists() {
            return Ok(0);
        }
        let mut copied = 0;
        copy_tree(&self.assets_dir, &self.public_dir, &mut copied)?;
        log::info!("assets installed: {copied} files");
        Ok(copied)
    }

    fn compile(&self) -> Result<usize> {
        let mut stylesheets = Vec::new();
        let mut scripts = Vec::new();
        if self.assets_dir.exists() {
            collect_sources(&self.assets_dir, &mut stylesheets, &mut scripts)?;
        }
        if stylesheets.is_empty() && scripts.is_empty() {
            return Ok(0);
        }
        // Sort by path so bundle contents are deterministic.
        stylesheets.sort();
        scripts.sort();

        fs::create_dir_all(&self.public_dir)?;
        let mut bundled = 0;
        bundled += write_bundle(&self.public_dir.join("bundle.css"), &stylesheets)?;
        bundled += write_bundle(&self.public_dir.join("bundle.js"), &scripts)?;
        log::info!("assets compiled: {bundled} sources bundled");
        Ok(bundled)
    }
}

impl SchemaMigrator for LocalEngine {
    fn applied(&self) -> Result<Vec<String>> {
        if !self.state_file.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.state_file)?;
        Ok(raw
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn pending(&self) -> Result<Vec<String>> {
        let applied: BTreeSet<String> = self.applied()?.into_iter().collect();
        let mut names = Vec::new();
        if !self.migrations_dir.exists() {
            return Ok(names);
        }
        for entry in fs::read_dir(&self.migrations_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "sql")
                && let Some(name) = path.file_name().and_then(|n| n.to_str())
                && !applied.contains(name)
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn migrate(&self) -> Result<usize> {
        let pending = self.pending()?;
        if pending.is_empty() {
            return Ok(0);
        }
        if let Some(parent) = self.state_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut state = if self.state_file.exists() {
            fs::read_to_string(&self.state_file)?
        } else {
            String::new()
        };
        for name in &pending {
            log::info!("applying migration {name}");
            if !state.is_empty() && !state.ends_with('\n') {
                state.push('\n');
            }
            state.push_str(name);
            state.push('\n');
        }
        fs::write(&self.state_file, state)?;
        Ok(pending.len())
    }
}

// ---------------------------------------------------------------------------
// Filesystem helpers
// ---------------------------------------------------------------------------

/// Copy a directory tree, creating destination directories as needed.
fn copy_tree(src: &Path, dst: &Path, copied: &mut usize) -> Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&from, &to, copied)?;
        } else {
            fs::copy(&from, &to)?;
            *copied += 1;
        }
    }
    Ok(())
}

/// Recursively collect stylesheet and script source paths.
fn collect_sources(
    dir: &Path,
    stylesheets: &mut Vec<PathBuf>,
    scripts: &mut Vec<PathBuf>,
) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_sources(&path, stylesheets, scripts)?;
        } else if path.extension().is_some_and(|ext| ext == "css") {
            stylesheets.push(path);
        } else if path.extension().is_some_and(|ext| ext == "js") {
            scripts.push(path);
        }
    }
    Ok(())
}

/// Concatenate sources into one bundle file. Returns how many sources went
/// in; writes nothing when the source list is empty.
fn write_bundle(target: &Path, sources: &[PathBuf]) -> Result<usize> {
    if sources.is_empty() {
        return Ok(0);
    }
    let mut bundle = String::new();
    for source in sources {
        let text = fs::read_to_string(source)?;
        bundle.push_str(&text);
        if !bundle.ends_with('\n') {
            bundle.push('\n');
        }
    }
    fs::write(target, bundle)?;
    Ok(sources.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_in(root: &Path) -> LocalEngine {
        let config = EngineConfig {
            data_dir: root.join("data"),
            cache_dir: root.join("cache"),
            assets_dir: root.join("assets"),
            public_dir: root.join("public"),
            migrations_dir: root.join("migrations"),
            ..EngineConfig::default()
        };
        LocalEngine::new(&config)
    }

    #[test]
    fn cache_missing_dir_counts_zero() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(tmp.path());
        assert_eq!(engine.entry_count().unwrap(), 0);
        assert_eq!(engine.clear().unwrap(), 0);
    }

    #[test]
    fn cache_clear_removes_files() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(tmp.path());
        let cache = tmp.path().join("cache");
        fs::create_dir_all(&cache).unwrap();
        fs::write(cache.join("a.cache"), b"one").unwrap();
        fs::write(cache.join("b.cache"), b"two").unwrap();
        fs::create_dir_all(cache.join("sub")).unwrap();

        assert_eq!(engine.entry_count().unwrap(), 2);
        assert_eq!(engine.clear().unwrap(), 2);
        assert_eq!(engine.entry_count().unwrap(), 0);
        // Subdirectories are left alone.
        assert!(cache.join("sub").exists());
    }

    #[test]
    fn assets_install_copies_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(tmp.path());
        let assets = tmp.path().join("assets");
        fs::create_dir_all(assets.join("css")).unwrap();
        fs::write(assets.join("css/site.css"), b"body{}").unwrap();
        fs::write(assets.join("logo.svg"), b"<svg/>").unwrap();

        assert_eq!(engine.install().unwrap(), 2);
        let public = tmp.path().join("public");
        assert!(public.join("css/site.css").exists());
        assert!(public.join("logo.svg").exists());
    }

    #[test]
    fn assets_install_missing_dir_is_zero() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(tmp.path());
        assert_eq!(engine.install().unwrap(), 0);
        assert!(!tmp.path().join("public").exists());
    }

    #[test]
    fn assets_compile_bundles_in_path_order() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(tmp.path());
        let assets = tmp.path().join("assets");
        fs::create_dir_all(assets.join("js")).unwrap();
        fs::write(assets.join("b.css"), b".b{}").unwrap();
        fs::write(assets.join("a.css"), b".a{}").unwrap();
        fs::write(assets.join("js/app.js"), b"app();").unwrap();

        assert_eq!(engine.compile().unwrap(), 3);
        let css = fs::read_to_string(tmp.path().join("public/bundle.css")).unwrap();
        assert_eq!(css, ".a{}\n.b{}\n");
        let js = fs::read_to_string(tmp.path().join("public/bundle.js")).unwrap();
        assert_eq!(js, "app();\n");
    }

    #[test]
    fn assets_compile_nothing_to_do() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(tmp.path());
        assert_eq!(engine.compile().unwrap(), 0);
        assert!(!tmp.path().join("public/bundle.css").exists());
    }

    #[test]
    fn migrations_pending_sorted_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(tmp.path());
        let migrations = tmp.path().join("migrations");
        fs::create_dir_all(&migrations).unwrap();
        fs::write(migrations.join("002_posts.sql"), b"--").unwrap();
        fs::write(migrations.join("001_users.sql"), b"--").unwrap();
        fs::write(migrations.join("notes.txt"), b"ignored").unwrap();

        assert_eq!(
            engine.pending().unwrap(),
            vec!["001_users.sql", "002_posts.sql"]
        );
        assert!(engine.applied().unwrap().is_empty());
    }

    #[test]
    fn migrate_records_applied_set() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(tmp.path());
        let migrations = tmp.path().join("migrations");
        fs::create_dir_all(&migrations).unwrap();
        fs::write(migrations.join("001_users.sql"), b"--").unwrap();
        fs::write(migrations.join("002_posts.sql"), b"--").unwrap();

        assert_eq!(engine.migrate().unwrap(), 2);
        assert_eq!(
            engine.applied().unwrap(),
            vec!["001_users.sql", "002_posts.sql"]
        );
        assert!(engine.pending().unwrap().is_empty());

        // A second run finds nothing to apply.
        assert_eq!(engine.migrate().unwrap(), 0);
    }

    #[test]
    fn migrate_picks_up_new_files() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(tmp.path());
        let migrations = tmp.path().join("migrations");
        fs::create_dir_all(&migrations).unwrap();
        fs::write(migrations.join("001_users.sql"), b"--").unwrap();
        assert_eq!(engine.migrate().unwrap(), 1);

        fs::write(migrations.join("002_posts.sql"), b"--").unwrap();
        assert_eq!(engine.pending().unwrap(), vec!["002_posts.sql"]);
        assert_eq!(engine.migrate().unwrap(), 1);
        assert_eq!(
            engine.applied().unwrap(),
            vec!["001_users.sql", "002_posts.sql"]
        );
    }

    #[test]
    fn migrations_missing_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = engine_in(tmp.path());
        assert!(engine.pending().unwrap().is_empty());
        assert_eq!(engine.migrate().unwrap(), 0);
    }
}
