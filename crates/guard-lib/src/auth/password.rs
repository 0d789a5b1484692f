// ============================
// crates/guard-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng}, Scrypt};
use zeroize::Zeroize;

/// Hash a password using scrypt.
///
/// Every call draws a fresh random salt, so hashing the same password twice
/// yields different encodings.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password(plain.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored hash.
///
/// A malformed hash or a mismatch is simply `false`; the PHC comparison does
/// not short-circuit on the first differing byte.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

/// Hash a password and zeroize the plaintext.
pub fn hash_password_secure(plain: &mut String) -> anyhow::Result<String> {
    let hash = hash_password(plain)?;
    plain.zeroize();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("p@ss").unwrap();
        assert_ne!(hash, "p@ss");
        assert!(verify_password(&hash, "p@ss"));
        assert!(!verify_password(&hash, "wrong"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("p@ss").unwrap();
        let second = hash_password("p@ss").unwrap();
        assert_ne!(first, second);
        assert!(verify_password(&first, "p@ss"));
        assert!(verify_password(&second, "p@ss"));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("not-a-phc-string", "p@ss"));
        assert!(!verify_password("", "p@ss"));
    }

    #[test]
    fn test_hash_password_secure_wipes_plaintext() {
        let mut plain = "p@ss".to_string();
        let hash = hash_password_secure(&mut plain).unwrap();
        assert!(plain.is_empty());
        assert!(verify_password(&hash, "p@ss"));
    }
}
