use actix_web::{web, HttpResponse};

use crate::auth::purge_all;
use crate::configuration::ApplicationSettings;
use crate::error::AppError;
use crate::middleware::FileserverHits;
use crate::store::UserStore;

/// GET /admin/metrics
pub async fn metrics(hits: web::Data<FileserverHits>) -> HttpResponse {
    let page = format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>",
        hits.count()
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page)
}

/// POST /admin/reset
///
/// Wipes every user (and with them chirps and refresh tokens) and zeroes the
/// hit counter. Refused with 403 outside the dev environment, in which case
/// nothing is changed.
pub async fn reset(
    hits: web::Data<FileserverHits>,
    users: web::Data<dyn UserStore>,
    application: web::Data<ApplicationSettings>,
) -> Result<HttpResponse, AppError> {
    let removed = purge_all(application.environment, users.get_ref()).await?;
    hits.reset();

    tracing::warn!(users_removed = removed, "Application state reset");
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Hits reset to 0 and database reset to initial state."))
}
