use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use taskboard_shared::Credentials;

/// Where the authenticated user's credentials live. The settings flow reads
/// the current name/email from here and writes the replacement payload back
/// after a profile update.
pub trait SessionStore {
    fn current(&self) -> Option<&Credentials>;
    fn replace(&mut self, creds: Credentials) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// Disk-backed session, persisted as JSON under the user config directory.
pub struct FileSession {
    path: PathBuf,
    creds: Option<Credentials>,
}

impl FileSession {
    /// Get the path to the session file
    fn session_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("taskboard");

        fs::create_dir_all(&config_dir).context("Could not create config directory")?;

        Ok(config_dir.join("session.json"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(Self::session_path()?)
    }

    pub fn load_from(path: PathBuf) -> Result<Self> {
        let creds = if path.exists() {
            let contents = fs::read_to_string(&path).context("Could not read session file")?;
            Some(serde_json::from_str(&contents).context("Could not parse session file")?)
        } else {
            None
        };

        Ok(Self { path, creds })
    }
}

impl SessionStore for FileSession {
    fn current(&self) -> Option<&Credentials> {
        self.creds.as_ref()
    }

    fn replace(&mut self, creds: Credentials) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(&creds).context("Could not serialize session")?;
        fs::write(&self.path, contents).context("Could not write session file")?;
        self.creds = Some(creds);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context("Could not delete session file")?;
        }
        self.creds = None;
        Ok(())
    }
}

/// In-memory session for tests.
#[cfg(test)]
pub struct MemorySession(pub Option<Credentials>);

#[cfg(test)]
impl SessionStore for MemorySession {
    fn current(&self) -> Option<&Credentials> {
        self.0.as_ref()
    }

    fn replace(&mut self, creds: Credentials) -> Result<()> {
        self.0 = Some(creds);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.0 = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_session_round_trips_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = FileSession::load_from(path.clone()).unwrap();
        assert!(session.current().is_none());

        let creds = Credentials {
            name: "Riya".into(),
            email: "riya@example.com".into(),
            token: "tok".into(),
        };
        session.replace(creds.clone()).unwrap();

        let reloaded = FileSession::load_from(path.clone()).unwrap();
        assert_eq!(reloaded.current(), Some(&creds));

        session.clear().unwrap();
        assert!(!path.exists());
        assert!(FileSession::load_from(path).unwrap().current().is_none());
    }
}
