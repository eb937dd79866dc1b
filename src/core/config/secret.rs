use std::io::Write;
use std::{
    fs,
    path::{Path, PathBuf},
};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

const SECRET_KEY_FILE: &str = ".secret_key";

/// Token-signing key fallback when `SECRET_KEY` is not set: reuse the
/// on-disk key, or generate one and persist it for the next start.
pub(super) fn load_or_create_secret_key() -> String {
    let path = key_path();
    if let Some(key) = read_key(&path) {
        return key;
    }

    let key = random_key();
    match persist_key(&path, &key) {
        Ok(()) => key,
        // Lost the race to another process; its key wins.
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            read_key(&path).unwrap_or(key)
        }
        Err(err) => {
            tracing::warn!(
                error = %err,
                path = %path.display(),
                "Failed to persist generated secret key"
            );
            key
        }
    }
}

fn read_key(path: &Path) -> Option<String> {
    let value = fs::read_to_string(path).ok()?;
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn persist_key(path: &Path, key: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::OpenOptions::new().write(true).create_new(true).open(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        if let Err(err) = file.set_permissions(fs::Permissions::from_mode(0o600)) {
            tracing::warn!(
                error = %err,
                path = %path.display(),
                "Failed to restrict secret key file permissions"
            );
        }
    }

    file.write_all(key.as_bytes())
}

fn random_key() -> String {
    let mut bytes = [0u8; 64];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn key_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(SECRET_KEY_FILE)
}
