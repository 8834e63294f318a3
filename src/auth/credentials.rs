/// Credential extraction from the `Authorization` header
///
/// Two schemes share the one header: `Bearer <token>` for end users and
/// `ApiKey <key>` for trusted services.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use crate::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialScheme {
    Bearer,
    ApiKey,
}

impl CredentialScheme {
    pub fn prefix(&self) -> &'static str {
        match self {
            CredentialScheme::Bearer => "Bearer ",
            CredentialScheme::ApiKey => "ApiKey ",
        }
    }
}

/// Strip `scheme`'s prefix from a raw header value.
///
/// A value without the prefix comes back unchanged: the scheme is not
/// validated here, only at the point where the credential is checked.
///
/// # Errors
/// `MissingCredential` if the header is absent, empty, or holds nothing
/// after the prefix
pub fn extract_credential(
    header_value: Option<&str>,
    scheme: CredentialScheme,
) -> Result<String, AuthError> {
    let value = match header_value {
        Some(v) if !v.is_empty() => v,
        _ => return Err(AuthError::MissingCredential),
    };

    let credential = value.strip_prefix(scheme.prefix()).unwrap_or(value);
    if credential.is_empty() {
        return Err(AuthError::MissingCredential);
    }

    Ok(credential.to_string())
}

/// Read the `Authorization` header and extract the credential for `scheme`.
///
/// # Errors
/// `MissingCredential` as for [`extract_credential`]; `Malformed` if the
/// header is not visible ASCII
pub fn extract_from_headers(
    headers: &HeaderMap,
    scheme: CredentialScheme,
) -> Result<String, AuthError> {
    let header_value = match headers.get(AUTHORIZATION) {
        None => None,
        Some(raw) => Some(raw.to_str().map_err(|_| AuthError::Malformed)?),
    };

    extract_credential(header_value, scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;

    #[test]
    fn test_bearer_token() {
        assert_eq!(
            extract_credential(Some("Bearer abc123"), CredentialScheme::Bearer),
            Ok("abc123".to_string())
        );
    }

    #[test]
    fn test_api_key() {
        assert_eq!(
            extract_credential(Some("ApiKey f271c81ff7084ee5"), CredentialScheme::ApiKey),
            Ok("f271c81ff7084ee5".to_string())
        );
    }

    #[test]
    fn test_missing_or_empty_header() {
        assert_eq!(
            extract_credential(None, CredentialScheme::Bearer),
            Err(AuthError::MissingCredential)
        );
        assert_eq!(
            extract_credential(Some(""), CredentialScheme::Bearer),
            Err(AuthError::MissingCredential)
        );
        assert_eq!(
            extract_credential(Some("Bearer "), CredentialScheme::Bearer),
            Err(AuthError::MissingCredential)
        );
    }

    #[test]
    fn test_wrong_prefix_returned_as_is() {
        assert_eq!(
            extract_credential(Some("Basic dXNlcjpwYXNz"), CredentialScheme::Bearer),
            Ok("Basic dXNlcjpwYXNz".to_string())
        );
        assert_eq!(
            extract_credential(Some("Bearer abc"), CredentialScheme::ApiKey),
            Ok("Bearer abc".to_string())
        );
    }

    #[test]
    fn test_extract_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(
            extract_from_headers(&headers, CredentialScheme::Bearer),
            Err(AuthError::MissingCredential)
        );

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer token-value"));
        assert_eq!(
            extract_from_headers(&headers, CredentialScheme::Bearer),
            Ok("token-value".to_string())
        );
    }

    #[test]
    fn test_non_ascii_header_is_malformed() {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_bytes(b"Bearer \xfftoken").expect("opaque bytes are allowed");
        headers.insert(AUTHORIZATION, value);

        assert_eq!(
            extract_from_headers(&headers, CredentialScheme::Bearer),
            Err(AuthError::Malformed)
        );
    }
}
