/// Authentication module
///
/// Password hashing, JWT access tokens, refresh token lifecycle,
/// credential extraction and ownership checks.

mod admin;
mod claims;
mod credentials;
mod extractor;
mod guard;
mod jwt;
mod password;
mod refresh_token;

pub use admin::purge_all;
pub use claims::{Claims, ISSUER};
pub use credentials::{extract_credential, extract_from_headers, CredentialScheme};
pub use extractor::AuthenticatedUser;
pub use guard::{authorize, authorize_mutation, OwnedResource};
pub use jwt::{
    clamp_access_token_ttl, issue_access_token, issue_access_token_at, validate_access_token,
    validate_access_token_at, MAX_ACCESS_TOKEN_TTL_SECONDS,
};
pub use password::{hash_password, verify_password};
pub use refresh_token::{
    generate_refresh_token, RefreshToken, RefreshTokenLedger, REFRESH_TOKEN_LIFETIME_DAYS,
};
