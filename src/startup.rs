use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;

use crate::auth::RefreshTokenLedger;
use crate::configuration::Settings;
use crate::logger::LoggerMiddleware;
use crate::middleware::{FileserverHits, HitCounter};
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp, health_check, list_chirps, login,
    metrics, polka_webhook, refresh, reset, revoke, update_user,
};
use crate::store::{ChirpStore, Stores, UserStore};

pub fn run(
    listener: TcpListener,
    stores: Stores,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let users: web::Data<dyn UserStore> = web::Data::from(stores.users);
    let chirps: web::Data<dyn ChirpStore> = web::Data::from(stores.chirps);
    let ledger = web::Data::new(RefreshTokenLedger::new(stores.refresh_tokens));
    let auth_settings = web::Data::new(settings.auth);
    let application_settings = web::Data::new(settings.application);
    let hits = FileserverHits::new();
    let hits_data = web::Data::new(hits.clone());

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)

            // Shared state
            .app_data(users.clone())
            .app_data(chirps.clone())
            .app_data(ledger.clone())
            .app_data(auth_settings.clone())
            .app_data(application_settings.clone())
            .app_data(hits_data.clone())

            // Routes that need a signed-in user take an `AuthenticatedUser`
            .route("/api/healthz", web::get().to(health_check))
            .service(
                web::resource("/api/users")
                    .route(web::post().to(create_user))
                    .route(web::put().to(update_user)),
            )
            .route("/api/login", web::post().to(login))
            .route("/api/refresh", web::post().to(refresh))
            .route("/api/revoke", web::post().to(revoke))
            .service(
                web::resource("/api/chirps")
                    .route(web::get().to(list_chirps))
                    .route(web::post().to(create_chirp)),
            )
            .service(
                web::resource("/api/chirps/{chirp_id}")
                    .route(web::get().to(get_chirp))
                    .route(web::delete().to(delete_chirp)),
            )
            .route("/api/polka/webhooks", web::post().to(polka_webhook))
            .route("/admin/metrics", web::get().to(metrics))
            .route("/admin/reset", web::post().to(reset))

            // Static file serving, counted for /admin/metrics
            .service(
                web::scope("/app")
                    .wrap(HitCounter::new(hits.clone()))
                    .service(fs::Files::new("/", "./public").index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
