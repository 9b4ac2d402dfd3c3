use anyhow::{bail, Context, Result};
use log::info;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::state::{auth_path, users_path};

pub const DUPLICATE_EMAIL: &str = "Account with this email already exists.";
pub const INVALID_LOGIN: &str = "Invalid email or password. Please sign up if you don't have an account.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";

const DEFAULT_NAME: &str = "User";
const API_KEY_VARS: [&str; 2] = ["SPENDWISE_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthState {
    pub api_key: Option<String>,
}

pub fn load_auth() -> Result<AuthState> {
    let p = auth_path()?;
    if !p.exists() {
        return Ok(AuthState::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_auth(auth: &AuthState) -> Result<()> {
    let p = auth_path()?;
    let s = serde_json::to_string_pretty(auth)?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Environment wins over the stored key.
pub fn resolve_api_key() -> Result<Option<String>> {
    for var in API_KEY_VARS {
        if let Ok(v) = std::env::var(var) {
            if !v.trim().is_empty() {
                return Ok(Some(v.trim().to_string()));
            }
        }
    }
    Ok(load_auth()?.api_key.filter(|k| !k.trim().is_empty()))
}

pub fn prompt_line(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s).context("read stdin")?;
    Ok(s.trim().to_string())
}

pub fn paste_api_key() -> Result<()> {
    let mut auth = load_auth()?;
    let key = prompt_line("Paste Gemini API key")?;
    if key.is_empty() {
        bail!("no key entered");
    }
    auth.api_key = Some(key);
    save_auth(&auth)?;
    println!("Saved API key to ~/.spendwise/auth.json");
    Ok(())
}

pub fn auth_status() -> Result<()> {
    let from_env = API_KEY_VARS.iter().find(|v| std::env::var(v).is_ok_and(|s| !s.trim().is_empty()));
    match (from_env, resolve_api_key()?) {
        (Some(var), _) => println!("API key: set (from ${var})"),
        (None, Some(_)) => println!("API key: set (~/.spendwise/auth.json)"),
        (None, None) => println!("API key: not set. Run: spendwise auth paste-api-key"),
    }
    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    Regex::new(r"\S+@\S+\.\S+").is_ok_and(|re| re.is_match(email))
}

fn hash_password(password: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Local mock account list; there is no server.
#[derive(Debug)]
pub struct UserStore {
    path: PathBuf,
    users: Vec<StoredUser>,
}

impl UserStore {
    pub fn open_default() -> Result<Self> {
        Self::open(&users_path()?)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let users = if path.exists() {
            let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?
        } else {
            Vec::new()
        };
        Ok(Self { path: path.to_path_buf(), users })
    }

    fn save(&self) -> Result<()> {
        let s = serde_json::to_string_pretty(&self.users)?;
        fs::write(&self.path, s).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }

    fn find(&self, email: &str) -> Option<&StoredUser> {
        let email = email.trim();
        self.users.iter().find(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// Returns the display name of the new account.
    pub fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<String> {
        let email = email.trim();
        if !is_valid_email(email) {
            bail!(INVALID_EMAIL);
        }
        if self.find(email).is_some() {
            bail!(DUPLICATE_EMAIL);
        }
        let name = match name.trim() {
            "" => DEFAULT_NAME.to_string(),
            n => n.to_string(),
        };
        self.users.push(StoredUser {
            name: name.clone(),
            email: email.to_string(),
            password_hash: hash_password(password),
        });
        self.save()?;
        info!("registered {email}");
        Ok(name)
    }

    /// Returns the stored display name.
    pub fn login(&self, email: &str, password: &str) -> Result<String> {
        match self.find(email) {
            Some(u) if u.password_hash == hash_password(password) => Ok(u.name.clone()),
            _ => bail!(INVALID_LOGIN),
        }
    }

    pub fn forgot_password(&self, email: &str) -> Result<String> {
        let email = email.trim();
        if !is_valid_email(email) {
            bail!(INVALID_EMAIL);
        }
        Ok(format!("If an account exists for {email}, a password reset link has been sent."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, UserStore) {
        let dir = tempfile::tempdir().unwrap();
        let s = UserStore::open(&dir.path().join("users.json")).unwrap();
        (dir, s)
    }

    #[test]
    fn test_signup_then_login() {
        let (dir, mut s) = store();
        assert_eq!(s.signup("Sam", "sam@example.com", "hunter2").unwrap(), "Sam");

        // Reopen from disk
        let s = UserStore::open(&dir.path().join("users.json")).unwrap();
        assert_eq!(s.login("sam@example.com", "hunter2").unwrap(), "Sam");
        assert_eq!(s.login("SAM@example.com", "hunter2").unwrap(), "Sam");
    }

    #[test]
    fn test_password_is_not_stored_in_clear() {
        let (dir, mut s) = store();
        s.signup("Sam", "sam@example.com", "hunter2").unwrap();
        let raw = fs::read_to_string(dir.path().join("users.json")).unwrap();
        assert!(!raw.contains("hunter2"));
        assert!(raw.contains("password_hash"));
    }

    #[test]
    fn test_duplicate_email() {
        let (_dir, mut s) = store();
        s.signup("Sam", "sam@example.com", "a").unwrap();
        let err = s.signup("Other", "sam@example.com", "b").unwrap_err();
        assert_eq!(err.to_string(), DUPLICATE_EMAIL);
    }

    #[test]
    fn test_blank_name_defaults() {
        let (_dir, mut s) = store();
        assert_eq!(s.signup("  ", "x@y.io", "pw").unwrap(), "User");
    }

    #[test]
    fn test_bad_login() {
        let (_dir, mut s) = store();
        s.signup("Sam", "sam@example.com", "right").unwrap();
        assert_eq!(s.login("sam@example.com", "wrong").unwrap_err().to_string(), INVALID_LOGIN);
        assert_eq!(s.login("nobody@example.com", "right").unwrap_err().to_string(), INVALID_LOGIN);
    }

    #[test]
    fn test_forgot_password_validates_email() {
        let (_dir, s) = store();
        assert_eq!(s.forgot_password("not-an-email").unwrap_err().to_string(), INVALID_EMAIL);
        assert!(s.forgot_password("a@b.co").unwrap().contains("a@b.co"));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.c"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.c"));
    }
}
