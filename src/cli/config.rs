use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The server-issued session cookie, kept between CLI invocations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFile {
    pub cookie: String,
    pub saved_at: DateTime<Utc>,
}

impl SessionFile {
    pub fn new(cookie: String) -> Self {
        Self {
            cookie,
            saved_at: Utc::now(),
        }
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("DIGINOTES_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("diginotes").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<Option<SessionFile>> {
    load_session_from(&get_config_dir()?)
}

pub fn save_session(cookie: &str) -> anyhow::Result<()> {
    save_session_in(&get_config_dir()?, cookie)
}

pub fn clear_session() -> anyhow::Result<()> {
    let session_file = get_config_dir()?.join("session.json");
    if session_file.exists() {
        fs::remove_file(session_file)?;
    }
    Ok(())
}

fn load_session_from(dir: &Path) -> anyhow::Result<Option<SessionFile>> {
    let session_file = dir.join("session.json");
    if !session_file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&session_file)?;
    match serde_json::from_str(&content) {
        Ok(session) => Ok(Some(session)),
        Err(err) => {
            tracing::warn!(path = %session_file.display(), error = %err, "ignoring unreadable session file");
            Ok(None)
        }
    }
}

/// The file holds a live credential: owner read/write only
fn save_session_in(dir: &Path, cookie: &str) -> anyhow::Result<()> {
    let session_file = dir.join("session.json");
    let content = serde_json::to_string_pretty(&SessionFile::new(cookie.to_string()))?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        // mode() only applies on creation
        if session_file.exists() {
            fs::set_permissions(&session_file, fs::Permissions::from_mode(0o600))?;
        }
    }

    let mut file = options.open(&session_file)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
