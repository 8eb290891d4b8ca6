// src/infra/paths.rs — XDG-compliant path management
//
// All paths respect the COPYBLOOM_HOME environment variable for isolation.
// When COPYBLOOM_HOME is set, config and data both live under that directory.
// When unset, config uses ~/.copybloom/ and data uses XDG_DATA_HOME/copybloom.

use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::OnceLock;

static PROJECT_DIRS: OnceLock<ProjectDirs> = OnceLock::new();

fn project_dirs() -> &'static ProjectDirs {
    PROJECT_DIRS.get_or_init(|| {
        ProjectDirs::from("", "", "copybloom").expect("Could not determine home directory")
    })
}

/// Returns the COPYBLOOM_HOME override, if set.
fn copybloom_home() -> Option<PathBuf> {
    std::env::var_os("COPYBLOOM_HOME").map(PathBuf::from)
}

/// Configuration directory: $COPYBLOOM_HOME/ or ~/.copybloom/
pub fn config_dir() -> PathBuf {
    if let Some(home) = copybloom_home() {
        return home;
    }
    dirs_home().join(".copybloom")
}

/// Data directory: $COPYBLOOM_HOME/data/ or XDG_DATA_HOME/copybloom
pub fn data_dir() -> PathBuf {
    if let Some(home) = copybloom_home() {
        return home.join("data");
    }
    project_dirs().data_local_dir().to_path_buf()
}

/// Home directory
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .expect("Could not determine home directory")
        .home_dir()
        .to_path_buf()
}

/// Campaign history database path
pub fn db_path() -> PathBuf {
    data_dir().join("copybloom.db")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Local profile path (who is signed in, if anyone)
pub fn profile_path() -> PathBuf {
    config_dir().join("profile.json")
}

/// Ensure all required directories exist
pub async fn ensure_dirs() -> anyhow::Result<()> {
    let dirs = [config_dir(), data_dir()];

    for dir in &dirs {
        tokio::fs::create_dir_all(dir).await?;
    }

    Ok(())
}
