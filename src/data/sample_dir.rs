// ============================================================
// Layer 4 — Directory Sample Store
// ============================================================
// Stores every sample as its own JSON file:
//
//   landmarks/
//     paper/
//       paper_20260114093012123456.json
//       paper_20260114093012456789.json
//     rock/
//       rock_20260114093101000042.json
//
// The directory name is the label. File names carry a UTC
// timestamp with microsecond resolution so concurrent uploads
// to the same label get distinct names; files are opened with
// create_new, so in the rare case of a collision a numeric
// suffix is appended instead of overwriting.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::domain::sample::{Label, Landmarks};
use crate::domain::traits::SampleStore;

/// Extension of sample files. Anything else in a label directory is ignored.
pub const SAMPLE_EXTENSION: &str = "json";

pub struct DirSampleStore {
    root: PathBuf,
}

impl DirSampleStore {
    /// Open (and create if needed) a sample root directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Cannot create sample directory '{}'", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// (label, path) for every subdirectory of the root, sorted by label.
    /// A missing root is treated as an empty store.
    fn label_dirs(&self) -> Result<Vec<(String, PathBuf)>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Cannot read sample directory '{}'", self.root.display())
                })
            }
        };

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => dirs.push((name, entry.path())),
                Err(name) => {
                    tracing::warn!("Skipping non UTF-8 label directory {:?}", name);
                }
            }
        }
        dirs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(dirs)
    }

    fn write_new(&self, dir: &Path, stem: &str, bytes: &[u8]) -> Result<PathBuf> {
        let mut attempt = 0usize;
        loop {
            let name = if attempt == 0 {
                format!("{stem}.{SAMPLE_EXTENSION}")
            } else {
                format!("{stem}_{attempt}.{SAMPLE_EXTENSION}")
            };
            let path = dir.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(bytes)
                        .with_context(|| format!("Cannot write sample '{}'", path.display()))?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Cannot create sample '{}'", path.display()))
                }
            }
        }
    }
}

/// Sample files in a label directory, sorted by file name (oldest first)
fn sample_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Cannot read label directory '{}'", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(SAMPLE_EXTENSION)
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_sample(path: &Path) -> Result<Landmarks> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read sample '{}'", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("Corrupt sample file '{}'", path.display()))
}

impl SampleStore for DirSampleStore {
    fn save(&self, label: &Label, landmarks: &Landmarks) -> Result<PathBuf> {
        let dir = self.root.join(label.as_str());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create label directory '{}'", dir.display()))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S%6f");
        let stem      = format!("{label}_{timestamp}");
        let bytes     = serde_json::to_vec(landmarks)?;

        let path = self.write_new(&dir, &stem, &bytes)?;
        tracing::debug!("Saved sample '{}'", path.display());
        Ok(path)
    }

    fn counts(&self) -> Result<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        for (label, dir) in self.label_dirs()? {
            counts.insert(label, sample_files(&dir)?.len());
        }
        Ok(counts)
    }

    fn labels(&self) -> Result<Vec<String>> {
        Ok(self.label_dirs()?.into_iter().map(|(label, _)| label).collect())
    }

    fn load_label(&self, label: &str) -> Result<Vec<Landmarks>> {
        sample_files(&self.root.join(label))?
            .iter()
            .map(|path| read_sample(path))
            .collect()
    }

    /// Unreadable sample files are skipped so one bad file does not
    /// block every later upload.
    fn feature_width(&self) -> Result<Option<usize>> {
        for (_, dir) in self.label_dirs()? {
            for path in sample_files(&dir)? {
                match read_sample(&path) {
                    Ok(sample) => return Ok(Some(sample.width())),
                    Err(e) => tracing::warn!("Skipping unreadable sample: {:#}", e),
                }
            }
        }
        Ok(None)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, DirSampleStore) {
        let tmp   = TempDir::new().unwrap();
        let store = DirSampleStore::open(tmp.path().join("landmarks")).unwrap();
        (tmp, store)
    }

    fn label(s: &str) -> Label {
        Label::parse(s).unwrap()
    }

    #[test]
    fn test_open_creates_root() {
        let (_tmp, store) = store();
        assert!(store.root().is_dir());
        assert!(store.counts().unwrap().is_empty());
    }

    #[test]
    fn test_save_writes_into_label_directory() {
        let (_tmp, store) = store();
        let path = store
            .save(&label("rock"), &Landmarks::from_flat(vec![1.0, 2.0]))
            .unwrap();

        assert_eq!(path.parent().unwrap(), store.root().join("rock"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("rock_"));
        assert!(name.ends_with(".json"));
        // rock_ + 14 digit date/time + 6 digit microseconds
        assert_eq!(name.len(), "rock_".len() + 20 + ".json".len());
    }

    #[test]
    fn test_each_save_adds_exactly_one() {
        let (_tmp, store) = store();
        let lm = Landmarks::from_flat(vec![0.5; 6]);
        for _ in 0..5 {
            store.save(&label("paper"), &lm).unwrap();
        }
        store.save(&label("rock"), &lm).unwrap();

        let counts = store.counts().unwrap();
        assert_eq!(counts.get("paper"), Some(&5));
        assert_eq!(counts.get("rock"), Some(&1));
    }

    #[test]
    fn test_count_ignores_stray_files() {
        let (_tmp, store) = store();
        store.save(&label("a"), &Landmarks::from_flat(vec![1.0])).unwrap();
        fs::write(store.root().join("notes.txt"), "top-level file").unwrap();
        fs::write(store.root().join("a").join("readme.md"), "not a sample").unwrap();
        fs::create_dir_all(store.root().join("empty")).unwrap();

        let counts = store.counts().unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["a"], 1);
        assert_eq!(counts["empty"], 0);
        assert_eq!(store.labels().unwrap(), vec!["a", "empty"]);
    }

    #[test]
    fn test_missing_root_counts_as_empty() {
        let (tmp, store) = store();
        fs::remove_dir_all(tmp.path().join("landmarks")).unwrap();
        assert!(store.counts().unwrap().is_empty());
        assert_eq!(store.feature_width().unwrap(), None);
    }

    #[test]
    fn test_load_label_restores_values() {
        let (_tmp, store) = store();
        let lm = Landmarks {
            shape:  vec![2, 3],
            values: vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
        };
        store.save(&label("A"), &lm).unwrap();

        let loaded = store.load_label("A").unwrap();
        assert_eq!(loaded, vec![lm]);
    }

    #[test]
    fn test_feature_width_from_first_sample() {
        let (_tmp, store) = store();
        assert_eq!(store.feature_width().unwrap(), None);
        store.save(&label("b"), &Landmarks::from_flat(vec![1.0; 63])).unwrap();
        assert_eq!(store.feature_width().unwrap(), Some(63));
    }

    #[test]
    fn test_feature_width_skips_corrupt_file() {
        let (_tmp, store) = store();
        let dir = store.root().join("a");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a_00000000000000000000.json"), "{not json").unwrap();
        store.save(&label("b"), &Landmarks::from_flat(vec![1.0; 4])).unwrap();

        assert_eq!(store.feature_width().unwrap(), Some(4));
    }

    #[test]
    fn test_collision_gets_suffix() {
        let (_tmp, store) = store();
        let dir = store.root().join("x");
        fs::create_dir_all(&dir).unwrap();

        let first  = store.write_new(&dir, "x_1", b"{}").unwrap();
        let second = store.write_new(&dir, "x_1", b"{}").unwrap();
        assert_ne!(first, second);
        assert!(second.ends_with("x_1_1.json"));
    }
}
