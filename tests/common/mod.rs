#![allow(dead_code)]

use chirpy::configuration::{
    ApplicationSettings, AuthSettings, DatabaseSettings, Environment, Settings, StorageBackend,
};
use chirpy::startup::run;
use chirpy::store::Stores;
use serde_json::{json, Value};
use std::net::TcpListener;

pub const JWT_SECRET: &str = "integration-test-secret-key-32-chars-min";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

pub fn test_settings(environment: Environment) -> Settings {
    Settings {
        database: DatabaseSettings {
            username: "postgres".to_string(),
            password: "password".to_string(),
            port: 5432,
            host: "localhost".to_string(),
            database_name: "chirpy".to_string(),
        },
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment,
            storage: StorageBackend::Memory,
        },
        auth: AuthSettings {
            jwt_secret: JWT_SECRET.to_string(),
            polka_key: POLKA_KEY.to_string(),
            access_token_ttl_seconds: 3600,
        },
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_in(Environment::Development)
}

pub fn spawn_app_in(environment: Environment) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server = run(listener, Stores::in_memory(), test_settings(environment))
        .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_user(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/users"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Registers a user and returns the created user body
    pub async fn create_user(&self, email: &str, password: &str) -> Value {
        let response = self.post_user(email, password).await;
        assert_eq!(201, response.status().as_u16());
        response.json().await.expect("Failed to parse response")
    }

    pub async fn post_login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Logs in and returns the body carrying `token` and `refresh_token`
    pub async fn login(&self, email: &str, password: &str) -> Value {
        let response = self.post_login(email, password).await;
        assert_eq!(200, response.status().as_u16());
        response.json().await.expect("Failed to parse response")
    }

    /// Registers and logs in a user, returning (user_id, access token, refresh token)
    pub async fn signed_in_user(&self, email: &str) -> (String, String, String) {
        self.create_user(email, "04234").await;
        let body = self.login(email, "04234").await;
        (
            body["id"].as_str().unwrap().to_string(),
            body["token"].as_str().unwrap().to_string(),
            body["refresh_token"].as_str().unwrap().to_string(),
        )
    }

    pub async fn post_chirp(&self, token: &str, body: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/chirps"))
            .bearer_auth(token)
            .json(&json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
