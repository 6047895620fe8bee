//! Mesh cache keyed by file path and modification time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::mesh::{try_load_mesh, Mesh};

struct CachedMesh {
    modified: Option<SystemTime>,
    mesh: Arc<Mesh>,
}

/// Shares loaded meshes between models and across frames.
///
/// A cached entry is reused until the file's modification time changes or
/// it is invalidated explicitly. Failed loads are not cached, so a file that
/// appears later is picked up on the next request.
#[derive(Default)]
pub struct MeshCache {
    entries: HashMap<PathBuf, CachedMesh>,
}

impl MeshCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the mesh at `path`, loading it if missing or stale.
    ///
    /// Returns an empty mesh (logged, not cached) if the file cannot be read.
    pub fn get(&mut self, path: impl AsRef<Path>) -> Arc<Mesh> {
        let path = path.as_ref();
        let modified = std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .ok();

        if let Some(entry) = self.entries.get(path) {
            if entry.modified == modified {
                return Arc::clone(&entry.mesh);
            }
            log::debug!("{} changed on disk, reloading", path.display());
        }

        match try_load_mesh(path) {
            Ok(mesh) => {
                let mesh = Arc::new(mesh);
                self.entries.insert(
                    path.to_path_buf(),
                    CachedMesh {
                        modified,
                        mesh: Arc::clone(&mesh),
                    },
                );
                mesh
            }
            Err(err) => {
                log::error!("{}", err);
                self.entries.remove(path);
                Arc::new(Mesh::default())
            }
        }
    }

    /// Forget one cached mesh. Returns true if it was cached.
    pub fn invalidate(&mut self, path: impl AsRef<Path>) -> bool {
        self.entries.remove(path.as_ref()).is_some()
    }

    /// Forget every cached mesh.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached meshes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_mesh(name: &str, source: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "cinder_cache_{}_{}.obj",
            name,
            std::process::id()
        ));
        std::fs::write(&path, source).unwrap();
        path
    }

    #[test]
    fn test_cache_shares_meshes() {
        let path = temp_mesh("shared", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mut cache = MeshCache::new();

        let a = cache.get(&path);
        let b = cache.get(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_invalidate_reloads() {
        let path = temp_mesh("invalidate", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let mut cache = MeshCache::new();

        let first = cache.get(&path);
        assert!(cache.invalidate(&path));
        assert!(!cache.invalidate(&path));

        let second = cache.get(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn test_cache_does_not_keep_failures() {
        let path = std::env::temp_dir().join("cinder_cache_missing.obj");
        let mut cache = MeshCache::new();

        assert!(cache.get(&path).is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_clear() {
        let path = temp_mesh("clear", "v 0 0 0\n");
        let mut cache = MeshCache::new();
        cache.get(&path);
        std::fs::remove_file(&path).unwrap();

        cache.clear();
        assert!(cache.is_empty());
    }
}
