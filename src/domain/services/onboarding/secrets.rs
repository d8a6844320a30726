use base64::{engine::general_purpose::STANDARD, Engine as _};
use crypto_box::{aead::OsRng, PublicKey};
use tracing::info;

use crate::domain::ports::ForgeService;
use crate::error::AppError;

pub const NETLIFY_AUTH_TOKEN: &str = "NETLIFY_AUTH_TOKEN";
pub const NETLIFY_SITE_ID: &str = "NETLIFY_SITE_ID";

pub fn seal_secret(public_key_b64: &str, plaintext: &str) -> Result<String, AppError> {
    let key_bytes = STANDARD
        .decode(public_key_b64)
        .map_err(|e| AppError::Upstream(format!("Malformed repository public key: {}", e)))?;
    let key_bytes: [u8; 32] = key_bytes
        .try_into()
        .map_err(|_| AppError::Upstream("Repository public key must be 32 bytes".to_string()))?;

    let sealed = PublicKey::from(key_bytes)
        .seal(&mut OsRng, plaintext.as_bytes())
        .map_err(|e| AppError::InternalWithMsg(format!("Sealing secret failed: {}", e)))?;

    Ok(STANDARD.encode(sealed))
}

pub async fn inject_secrets(
    forge: &dyn ForgeService,
    repo: &str,
    secrets: &[(&str, &str)],
    injected: &mut Vec<String>,
) -> Result<(), AppError> {
    for (name, value) in secrets {
        let public_key = forge.secrets_public_key(repo).await?;
        let encrypted_value = seal_secret(&public_key.key, value)?;
        forge.put_secret(repo, name, &encrypted_value, &public_key.key_id).await?;

        info!(repo = %repo, secret = %name, "Injected repository secret");
        injected.push(name.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypto_box::SecretKey;

    fn repo_keypair() -> (SecretKey, String) {
        let secret_key = SecretKey::generate(&mut OsRng);
        let public_b64 = STANDARD.encode(secret_key.public_key().as_bytes());
        (secret_key, public_b64)
    }

    fn open(secret_key: &SecretKey, sealed_b64: &str) -> Vec<u8> {
        let sealed = STANDARD.decode(sealed_b64).unwrap();
        secret_key.unseal(&sealed).unwrap()
    }

    #[test]
    fn repository_owner_can_open_sealed_values() {
        let (secret_key, public_b64) = repo_keypair();
        let long_value = "x".repeat(48 * 1024);

        for value in ["site-1234", "", long_value.as_str(), "ünïcødé tøken"] {
            let sealed = seal_secret(&public_b64, value).unwrap();
            assert_eq!(open(&secret_key, &sealed), value.as_bytes());
        }
    }

    #[test]
    fn sealing_is_randomized() {
        let (_, public_b64) = repo_keypair();
        let a = seal_secret(&public_b64, "same").unwrap();
        let b = seal_secret(&public_b64, "same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn other_keys_cannot_open() {
        let (_, public_b64) = repo_keypair();
        let (intruder, _) = repo_keypair();
        let sealed = STANDARD.decode(seal_secret(&public_b64, "token").unwrap()).unwrap();
        assert!(intruder.unseal(&sealed).is_err());
    }

    #[test]
    fn rejects_malformed_public_keys() {
        assert!(matches!(seal_secret("%%%", "v"), Err(AppError::Upstream(_))));
        let short = STANDARD.encode([7u8; 16]);
        assert!(matches!(seal_secret(&short, "v"), Err(AppError::Upstream(_))));
    }
}
