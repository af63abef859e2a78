//! File-backed persistence for a [`VarMap`]
//!
//! A [`VarStore`] binds a path to a framing (plain text or gzip) and moves a
//! whole map through the text codec in one read or one write.
//!
//! `load` and `save` never halt the caller: they log and report success as a
//! `bool`. `try_load` and `try_save` return the structured error instead.

use crate::codec::{self, LoadReport};
use crate::config::StoreConfig;
use crate::disk::{self, DEFAULT_COMPRESSION_LEVEL, Framing};
use crate::error::StoreError;
use crate::map::VarMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarStore {
    path: PathBuf,
    framing: Framing,
}

impl VarStore {
    /// Plain-text store at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        VarStore {
            path: path.into(),
            framing: Framing::Plain,
        }
    }

    /// Gzip-framed store at `path`
    pub fn gzip(path: impl Into<PathBuf>) -> Self {
        Self::new(path).with_gzip(true)
    }

    pub fn with_gzip(mut self, gzip: bool) -> Self {
        self.framing = match (gzip, self.framing) {
            (false, _) => Framing::Plain,
            (true, Framing::Gzip(level)) => Framing::Gzip(level),
            (true, Framing::Plain) => Framing::Gzip(DEFAULT_COMPRESSION_LEVEL),
        };
        self
    }

    /// Select the gzip level; has no effect on a plain store
    pub fn with_compression_level(mut self, level: u32) -> Self {
        if self.framing.is_gzip() {
            self.framing = Framing::Gzip(level.clamp(1, 9));
        }
        self
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        VarStore {
            path: config.path.clone(),
            framing: config.framing(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_gzip(&self) -> bool {
        self.framing.is_gzip()
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Merge the file into `map`
    ///
    /// Entries are stored with [`VarMap::put`], so existing keys are
    /// overwritten and keys absent from the file are left alone. A missing
    /// file is [`StoreError::NotFound`] and leaves `map` untouched.
    pub fn try_load(&self, map: &mut VarMap) -> Result<LoadReport, StoreError> {
        let lines = disk::read_lines(&self.path, self.framing)?;
        let report = Self::load_lines(map, &lines);
        debug!(
            "loaded {} entries from {}",
            report.loaded,
            self.path.display()
        );
        Ok(report)
    }

    /// Merge the file into `map`, returning false when nothing could be read
    pub fn load(&self, map: &mut VarMap) -> bool {
        match self.try_load(map) {
            Ok(_) => true,
            Err(e) if e.is_not_found() => {
                debug!("nothing to load: {}", e);
                false
            }
            Err(e) => {
                error!("load failed: {}", e);
                false
            }
        }
    }

    /// Write every field of `map`, replacing the file
    pub fn try_save(&self, map: &VarMap) -> Result<(), StoreError> {
        let content = Self::save_to_string(map);
        disk::write_text(&self.path, &content, self.framing)?;
        debug!("saved {} entries to {}", map.len(), self.path.display());
        Ok(())
    }

    pub fn save(&self, map: &VarMap) -> bool {
        match self.try_save(map) {
            Ok(()) => true,
            Err(e) => {
                error!("save failed: {}", e);
                false
            }
        }
    }

    /// Encode `map` without touching the filesystem
    pub fn save_to_string(map: &VarMap) -> String {
        codec::encode(map)
    }

    /// Decode already-split lines into `map`
    pub fn load_lines<I, S>(map: &mut VarMap, lines: I) -> LoadReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        codec::decode(map, lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_builder_framing() {
        let store = VarStore::new("a.ini");
        assert!(!store.is_gzip());

        let store = VarStore::gzip("a.ini.gz").with_compression_level(3);
        assert_eq!(store.framing(), Framing::Gzip(3));
        assert_eq!(store.path(), Path::new("a.ini.gz"));

        let store = store.with_gzip(true);
        assert_eq!(store.framing(), Framing::Gzip(3));
        assert_eq!(store.with_gzip(false).framing(), Framing::Plain);
    }

    #[test]
    fn test_compression_level_ignored_for_plain() {
        let store = VarStore::new("a.ini").with_compression_level(9);
        assert_eq!(store.framing(), Framing::Plain);
    }

    #[test]
    fn test_from_config() {
        let config = StoreConfig::new("c.ini").with_gzip(true).with_compression_level(2);
        let store = VarStore::from_config(&config);
        assert_eq!(store.path(), Path::new("c.ini"));
        assert_eq!(store.framing(), Framing::Gzip(2));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = VarStore::new(dir.path().join("vars.ini"));

        let mut map = VarMap::new();
        map.put("name", "dyn").put("count", 3);
        assert!(store.save(&map));
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "&name=dyn\n$count=3"
        );

        let mut loaded = VarMap::new();
        assert!(store.load(&mut loaded));
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_missing_file_leaves_map_untouched() {
        let dir = tempdir().unwrap();
        let store = VarStore::new(dir.path().join("absent.ini"));

        let mut map = VarMap::new();
        map.put("kept", 1);
        assert!(!store.load(&mut map));
        assert_eq!(map.len(), 1);
        assert!(store.try_load(&mut map).unwrap_err().is_not_found());
    }

    #[test]
    fn test_load_merges_into_existing_map() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vars.ini");
        fs::write(&path, "$a=2\nb=x").unwrap();

        let mut map = VarMap::new();
        map.put("a", 1).put("c", true);
        let report = VarStore::new(&path).try_load(&mut map).unwrap();

        assert_eq!(report.loaded, 2);
        assert_eq!(map.get_int("a"), 2);
        assert_eq!(map.get_value("c"), Some(Value::Bool(true)));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_save_failure_returns_false() {
        let dir = tempdir().unwrap();
        let store = VarStore::new(dir.path().join("missing").join("vars.ini"));
        assert!(!store.save(&VarMap::new()));
    }

    #[test]
    fn test_gzip_store_rejects_plain_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vars.ini");
        fs::write(&path, "a=1").unwrap();

        let mut map = VarMap::new();
        let err = VarStore::gzip(&path).try_load(&mut map).unwrap_err();
        assert!(!err.is_not_found());
        assert!(map.is_empty());
    }
}
