/// Request extractor for routes that need a signed-in user
///
/// Pulls the bearer token from `Authorization`, validates it with the
/// configured secret and hands the handler the caller's identity.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::credentials::{extract_from_headers, CredentialScheme};
use crate::auth::jwt::validate_access_token;
use crate::configuration::AuthSettings;
use crate::error::AppError;

/// The identity proven by a valid access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl AuthenticatedUser {
    fn from_http_request(req: &HttpRequest) -> Result<Self, AppError> {
        let settings = req
            .app_data::<web::Data<AuthSettings>>()
            .ok_or_else(|| AppError::Internal("auth settings are not registered".to_string()))?;

        let token = extract_from_headers(req.headers(), CredentialScheme::Bearer)?;
        let user_id = validate_access_token(&token, &settings.jwt_secret)?;

        tracing::debug!(user_id = %user_id, "Access token validated");
        Ok(Self { user_id })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::issue_access_token;
    use crate::error::AuthError;
    use actix_web::test::TestRequest;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    fn settings() -> web::Data<AuthSettings> {
        web::Data::new(AuthSettings {
            jwt_secret: SECRET.to_string(),
            polka_key: "polka".to_string(),
            access_token_ttl_seconds: 3600,
        })
    }

    #[test]
    fn test_valid_bearer_token() {
        let user_id = Uuid::new_v4();
        let token = issue_access_token(user_id, SECRET, Duration::seconds(60))
            .expect("Failed to generate token");
        let req = TestRequest::default()
            .app_data(settings())
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request();

        let user = AuthenticatedUser::from_http_request(&req).expect("token is valid");
        assert_eq!(user.user_id, user_id);
    }

    #[test]
    fn test_missing_header() {
        let req = TestRequest::default().app_data(settings()).to_http_request();

        let result = AuthenticatedUser::from_http_request(&req);
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::MissingCredential))
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret() {
        let token = issue_access_token(Uuid::new_v4(), "some-other-secret", Duration::seconds(60))
            .expect("Failed to generate token");
        let req = TestRequest::default()
            .app_data(settings())
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request();

        let result = AuthenticatedUser::from_http_request(&req);
        assert!(matches!(
            result,
            Err(AppError::Auth(AuthError::SignatureInvalid))
        ));
    }
}
