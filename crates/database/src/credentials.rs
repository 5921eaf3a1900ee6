//! Student credential hashing.

use crate::error::ServiceError;
use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

/// Hashes a password with Argon2id and a random salt
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::Internal(format!("hash password: {e}")))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod test {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    #[test]
    fn test_hash_matches_only_its_password() {
        let hash = hash_password("s3cret").unwrap();
        assert_ne!(hash, "s3cret");

        let parsed = PasswordHash::new(&hash).unwrap();
        let argon2 = Argon2::default();
        assert!(argon2.verify_password(b"s3cret", &parsed).is_ok());
        assert!(argon2.verify_password(b"wrong", &parsed).is_err());
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("s3cret").unwrap(), hash_password("s3cret").unwrap());
    }
}
