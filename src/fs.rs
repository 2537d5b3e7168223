//! File access behind a trait, so reports, snapshots and config files can be
//! read and written against an in-memory store in tests.

use std::io;
use std::path::Path;

pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write `content`, creating missing parent directories.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;
}

/// The operating system's filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

pub fn default_fs() -> &'static RealFs {
    static INSTANCE: RealFs = RealFs;
    &INSTANCE
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// In-memory filesystem keyed by the path's string form.
    #[derive(Debug, Default)]
    pub struct MockFs {
        files: RwLock<HashMap<String, String>>,
    }

    impl MockFs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_files<I, P, C>(files: I) -> Self
        where
            I: IntoIterator<Item = (P, C)>,
            P: AsRef<Path>,
            C: Into<String>,
        {
            let files = files
                .into_iter()
                .map(|(p, c)| (key(p.as_ref()), c.into()))
                .collect();
            Self {
                files: RwLock::new(files),
            }
        }

        pub fn files(&self) -> HashMap<String, String> {
            self.files.read().unwrap().clone()
        }
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    impl FileSystem for MockFs {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.files.read().unwrap().get(&key(path)).cloned().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("file not found: {}", path.display()),
                )
            })
        }

        fn write(&self, path: &Path, content: &str) -> io::Result<()> {
            self.files
                .write()
                .unwrap()
                .insert(key(path), content.to_string());
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.read().unwrap().contains_key(&key(path))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_mock_fs_overwrites() {
            let fs = MockFs::with_files([(Path::new("/out/graph.svg"), "<svg/>")]);
            assert!(fs.exists(Path::new("/out/graph.svg")));

            fs.write(Path::new("/out/graph.svg"), "<svg></svg>").unwrap();
            assert_eq!(
                fs.read_to_string(Path::new("/out/graph.svg")).unwrap(),
                "<svg></svg>"
            );
            assert_eq!(fs.files().len(), 1);
        }

        #[test]
        fn test_mock_fs_missing_file() {
            let fs = MockFs::new();
            let err = fs.read_to_string(Path::new("/stats.json")).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::NotFound);
        }
    }
}
