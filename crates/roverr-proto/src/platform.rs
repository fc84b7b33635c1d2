use std::path::PathBuf;

const APP_DIR: &str = "roverr";

pub fn data_dir() -> PathBuf {
    // On macOS and Linux, use ~/.local/share/roverr/ (XDG standard)
    // instead of macOS Application Support for consistency
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join(APP_DIR)
    }
    #[cfg(windows)]
    {
        // Portable installs keep data beside the executable
        if let Some(dir) = beside_exe("data") {
            return dir;
        }

        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(windows)]
    {
        if beside_exe("config.toml").is_some() {
            if let Some(dir) = exe_dir() {
                return dir;
            }
        }
    }

    // On macOS and Linux, always use ~/.config/roverr/
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(APP_DIR)
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

pub fn log_path() -> PathBuf {
    data_dir().join("roverr.log")
}

#[cfg(windows)]
fn exe_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(|p| p.to_path_buf())
}

#[cfg(windows)]
fn beside_exe(name: &str) -> Option<PathBuf> {
    let p = exe_dir()?.join(name);
    p.exists().then_some(p)
}
