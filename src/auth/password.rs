use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash.
/// Supports both Argon2 (new) and bcrypt (accounts imported from the old
/// bcryptjs-based signup) hashes.
pub fn verify_password(password: &str, hash: &str) -> bool {
    if hash.starts_with("$argon2") {
        return verify_argon2(password, hash);
    }

    if hash.starts_with("$2") {
        return verify_bcrypt(password, hash);
    }

    false
}

fn verify_argon2(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

fn verify_bcrypt(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Verify password and optionally migrate from bcrypt to Argon2.
/// Returns (is_valid, new_hash_if_migrated)
pub fn verify_and_migrate(password: &str, hash: &str) -> (bool, Option<String>) {
    if hash.starts_with("$argon2") {
        return (verify_argon2(password, hash), None);
    }

    if hash.starts_with("$2") && verify_bcrypt(password, hash) {
        match hash_password(password) {
            Ok(new_hash) => return (true, Some(new_hash)),
            Err(_) => return (true, None),
        }
    }

    (false, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_bcrypt_hash_verifies_and_migrates() {
        let legacy = bcrypt::hash("legacy-password", 4).unwrap();

        let (valid, migrated) = verify_and_migrate("legacy-password", &legacy);
        assert!(valid);
        let new_hash = migrated.expect("bcrypt hash should migrate");
        assert!(new_hash.starts_with("$argon2"));
        assert!(verify_password("legacy-password", &new_hash));
    }

    #[test]
    fn test_unknown_hash_format_rejected() {
        let (valid, migrated) = verify_and_migrate("anything", "plaintext-not-a-hash");
        assert!(!valid);
        assert!(migrated.is_none());
    }
}
