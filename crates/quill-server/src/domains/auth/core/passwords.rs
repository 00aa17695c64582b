use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, Version};

use crate::config::KdfConfig;

fn hasher(kdf: &KdfConfig) -> Result<Argon2<'static>, &'static str> {
    let params = Params::new(kdf.memory_kb, kdf.iterations, kdf.parallelism, None)
        .map_err(|_| "kdf_params_invalid")?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Produces a PHC-format Argon2id hash. The parameters travel inside the
/// hash string, so verification does not depend on the current config.
pub fn hash_password(password: &str, kdf: &KdfConfig) -> Result<String, &'static str> {
    let salt = SaltString::generate(&mut OsRng);
    hasher(kdf)?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| "kdf_failed")
}

pub fn verify_password(password: &str, stored: &str) -> Result<bool, &'static str> {
    let parsed = PasswordHash::new(stored).map_err(|_| "hash_invalid")?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_kdf() -> KdfConfig {
        KdfConfig {
            iterations: 1,
            memory_kb: 8,
            parallelism: 1,
        }
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let kdf = test_kdf();
        let hash = hash_password("correct horse", &kdf).expect("hash");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).expect("verify"));
        assert!(!verify_password("wrong horse", &hash).expect("verify"));
    }

    #[test]
    fn hashes_are_salted() {
        let kdf = test_kdf();
        let first = hash_password("same input", &kdf).expect("hash");
        let second = hash_password("same input", &kdf).expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn garbage_stored_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
