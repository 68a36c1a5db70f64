//! Single-account sign-in.
//!
//! Only the configured email may hold a session. The session lives in
//! `session.json` inside the data directory.

use std::fs;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Error, Result};

/// The signed-in identity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Session {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Whether `email` is the whitelisted account (case-insensitive, trimmed).
pub fn is_allowed(config: &Config, email: &str) -> bool {
    match &config.allowed_email {
        Some(allowed) => allowed.trim().eq_ignore_ascii_case(email.trim()),
        None => false,
    }
}

/// Starts a session for `email`, replacing any existing one.
///
/// The stored email is lowercased so the same account maps to one user.
pub fn sign_in(config: &Config, email: &str, name: Option<&str>) -> Result<Session> {
    let email = email.trim().to_ascii_lowercase();
    let email = email.as_str();
    if !is_allowed(config, email) {
        warn!(email, "sign-in refused");
        return Err(Error::AccessDenied(email.to_string()));
    }
    config.ensure_data_dir()?;
    let session = Session {
        email: email.to_string(),
        name: name.map(str::to_string),
        image: None,
    };
    fs::write(config.session_path(), serde_json::to_string_pretty(&session)?)?;
    info!(email, "signed in");
    Ok(session)
}

/// Ends the current session. Returns whether there was one.
pub fn sign_out(config: &Config) -> Result<bool> {
    let path = config.session_path();
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    info!("signed out");
    Ok(true)
}

/// The current session, if any.
///
/// An unreadable session file, or one for an email that is no longer
/// whitelisted, counts as signed out.
pub fn current_session(config: &Config) -> Option<Session> {
    let path = config.session_path();
    if !path.exists() {
        return None;
    }
    let session: Session = match fs::read_to_string(&path)
        .map_err(Error::from)
        .and_then(|s| serde_json::from_str::<Session>(&s).map_err(Error::from))
    {
        Ok(session) => session,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable session");
            return None;
        }
    };
    if !is_allowed(config, &session.email) {
        warn!(email = %session.email, "session email is not allowed");
        return None;
    }
    Some(session)
}

/// Guard for operations that need a signed-in user.
pub fn require_session(session: Option<&Session>) -> Result<&Session> {
    session.ok_or(Error::NotSignedIn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> Config {
        Config::load_from(dir.path())
            .unwrap()
            .with_allowed_email("casa@example.com")
    }

    #[test]
    fn only_the_whitelisted_email_signs_in() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        let err = sign_in(&config, "intruso@example.com", None).unwrap_err();
        assert!(matches!(err, Error::AccessDenied(_)));
        assert_eq!(current_session(&config), None);

        let session = sign_in(&config, " Casa@Example.com ", Some("Casa")).unwrap();
        assert_eq!(session.email, "casa@example.com");
        assert_eq!(current_session(&config), Some(session));
    }

    #[test]
    fn nobody_signs_in_without_a_configured_email() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert!(sign_in(&config, "casa@example.com", None).is_err());
    }

    #[test]
    fn sign_out_clears_the_session() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        sign_in(&config, "casa@example.com", None).unwrap();

        assert!(sign_out(&config).unwrap());
        assert_eq!(current_session(&config), None);
        assert!(!sign_out(&config).unwrap());
    }

    #[test]
    fn corrupt_session_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        fs::write(config.session_path(), "not json").unwrap();
        assert_eq!(current_session(&config), None);
    }

    #[test]
    fn require_session_rejects_absence() {
        assert!(matches!(require_session(None), Err(Error::NotSignedIn)));
    }
}
