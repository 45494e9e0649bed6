use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Write `content` to `root/rel`, creating parent directories.
pub(crate) fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    path
}

/// A repository checkout with the default layout: a version file, and train
/// and inference scenarios with one component each plus their pipelines.
pub(crate) fn create_release_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write_file(root, "version.yaml", "version: '1.0'\n");
    for (scenario, unit) in [("train", "prep"), ("inference", "score")] {
        write_file(
            root,
            &format!("src/{}/components/{}/env.yaml", scenario, unit),
            &format!("name: {}-env\nversion: '1.0'\nimage: base:latest\n", unit),
        );
        write_file(
            root,
            &format!("src/{}/components/{}/config.yaml", scenario, unit),
            &format!(
                "name: {unit}\nversion: '1.0'\nenvironment:\n  name: {unit}-env\n  version: '1.0'\n"
            ),
        );
        write_file(
            root,
            &format!("src/{}/pipeline.yaml", scenario),
            &format!(
                "name: {scenario}_pipeline\nversion: '1.0'\njobs:\n  - name: {unit}\n    version: '1.0'\n"
            ),
        );
    }

    temp_dir
}
