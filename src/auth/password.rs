/// Password Hashing and Verification
///
/// bcrypt with a per-call random salt embedded in the hash output.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, AuthError, ValidationError};

/// Hash a password using bcrypt
///
/// # Errors
/// Returns error if:
/// - Password is empty
/// - Bcrypt hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField(
            "password".to_string(),
        )));
    }

    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Auth(AuthError::Internal(format!("Password hashing failed: {}", e))))
}

/// Verify a password against a stored bcrypt hash
///
/// The comparison itself is bcrypt's. Callers decide what "user not found"
/// looks like; this function only knows about hashes.
///
/// # Errors
/// - `AuthenticationFailed` if the password does not match
/// - `Internal` if the stored hash cannot be parsed
pub fn verify_password(password_hash: &str, password: &str) -> Result<(), AuthError> {
    match verify(password, password_hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::AuthenticationFailed),
        Err(e) => Err(AuthError::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = "password123";
        let hash = hash_password(password).expect("Failed to hash password");

        // Hash should not be the same as password
        assert_ne!(password, hash);
        // Hash should start with bcrypt identifier
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let first = hash_password("password123").expect("Failed to hash password");
        let second = hash_password("password123").expect("Failed to hash password");

        assert_ne!(first, second);
        assert!(verify_password(&first, "password123").is_ok());
        assert!(verify_password(&second, "password123").is_ok());
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("ValidPassword123").expect("Failed to hash password");

        assert_eq!(verify_password(&hash, "ValidPassword123"), Ok(()));
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("ValidPassword123").expect("Failed to hash password");

        assert_eq!(
            verify_password(&hash, "WrongPassword123"),
            Err(AuthError::AuthenticationFailed)
        );
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = hash_password("");
        assert!(matches!(
            result,
            Err(AppError::Validation(ValidationError::EmptyField(_)))
        ));
    }

    #[test]
    fn test_garbage_hash_is_internal() {
        let result = verify_password("not-a-bcrypt-hash", "password123");
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}
