/// Input validators
///
/// 1. Email format and length checks for account creation and updates
/// 2. Chirp body length limit and profanity masking

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MAX_CHIRP_LENGTH: usize = 140;
const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const MASK: &str = "****";

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).expect("email regex is valid");
}

/// Validates an email address and returns it trimmed
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Enforce the chirp length limit and mask profane words.
///
/// Words are split on single spaces and compared case-insensitively;
/// a word with punctuation attached (`Sharbert!`) is left alone.
pub fn clean_chirp_body(body: &str) -> Result<String, ValidationError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::TooLong("chirp".to_string(), MAX_CHIRP_LENGTH));
    }

    let cleaned = body
        .split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if PROFANE_WORDS.contains(&lowered.as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert_eq!(
            is_valid_email("  walt@breakingbad.com "),
            Ok("walt@breakingbad.com".to_string())
        );
    }

    #[test]
    fn test_invalid_emails() {
        for email in ["", "notanemail", "user@", "@example.com", "user@@example.com"] {
            assert!(is_valid_email(email).is_err(), "{:?} should be rejected", email);
        }
    }

    #[test]
    fn test_profanity_masked() {
        assert_eq!(
            clean_chirp_body("I had something interesting for breakfast"),
            Ok("I had something interesting for breakfast".to_string())
        );
        assert_eq!(
            clean_chirp_body("I hear Mastodon is better than Chirpy. sharbert I need to migrate"),
            Ok("I hear Mastodon is better than Chirpy. **** I need to migrate".to_string())
        );
        assert_eq!(
            clean_chirp_body("I really need a kerfuffle to go to bed sooner, Fornax !"),
            Ok("I really need a **** to go to bed sooner, **** !".to_string())
        );
    }

    #[test]
    fn test_punctuation_attached_word_kept() {
        assert_eq!(clean_chirp_body("Sharbert!"), Ok("Sharbert!".to_string()));
    }

    #[test]
    fn test_chirp_length_limit() {
        let exact = "a".repeat(140);
        assert_eq!(clean_chirp_body(&exact), Ok(exact.clone()));

        let too_long = "a".repeat(141);
        assert_eq!(
            clean_chirp_body(&too_long),
            Err(ValidationError::TooLong("chirp".to_string(), 140))
        );
    }
}
