//! Integration tests for posting, listing and deleting chirps

mod common;

use common::spawn_app;
use serde_json::Value;

#[tokio::test]
async fn create_chirp_masks_profanity_and_records_author() {
    let app = spawn_app();
    let (user_id, token, _) = app.signed_in_user("walt@breakingbad.com").await;

    let response = app
        .post_chirp(&token, "I hear Mastodon is better than Chirpy. sharbert I need to migrate")
        .await;
    assert_eq!(201, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["body"],
        "I hear Mastodon is better than Chirpy. **** I need to migrate"
    );
    assert_eq!(body["user_id"], user_id.as_str());
}

#[tokio::test]
async fn create_chirp_rejects_long_body() {
    let app = spawn_app();
    let (_, token, _) = app.signed_in_user("walt@breakingbad.com").await;

    let response = app.post_chirp(&token, &"a".repeat(141)).await;
    assert_eq!(400, response.status().as_u16());

    let response = app.post_chirp(&token, &"a".repeat(140)).await;
    assert_eq!(201, response.status().as_u16());
}

#[tokio::test]
async fn create_chirp_requires_valid_access_token() {
    let app = spawn_app();

    let response = app.post_chirp("not.a.token", "hello").await;
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn list_chirps_sorts_and_filters() {
    let app = spawn_app();
    let (walt, walt_token, _) = app.signed_in_user("walt@breakingbad.com").await;
    let (_, jesse_token, _) = app.signed_in_user("jesse@breakingbad.com").await;

    for (token, body) in [
        (&walt_token, "first"),
        (&jesse_token, "second"),
        (&walt_token, "third"),
    ] {
        assert_eq!(201, app.post_chirp(token, body).await.status().as_u16());
    }

    let bodies = |listed: &Value| -> Vec<String> {
        listed
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["body"].as_str().unwrap().to_string())
            .collect()
    };

    let ascending: Value = app
        .client
        .get(app.url("/api/chirps"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(bodies(&ascending), vec!["first", "second", "third"]);

    let descending: Value = app
        .client
        .get(app.url("/api/chirps?sort=desc"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(bodies(&descending), vec!["third", "second", "first"]);

    let by_walt: Value = app
        .client
        .get(app.url(&format!("/api/chirps?author_id={}", walt)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(bodies(&by_walt), vec!["first", "third"]);
}

#[tokio::test]
async fn list_chirps_rejects_malformed_author_id() {
    let app = spawn_app();

    let response = app
        .client
        .get(app.url("/api/chirps?author_id=heisenberg"))
        .send()
        .await
        .unwrap();
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn get_chirp_by_id() {
    let app = spawn_app();
    let (_, token, _) = app.signed_in_user("walt@breakingbad.com").await;
    let created: Value = app.post_chirp(&token, "say my name").await.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let found = app.client.get(app.url(&format!("/api/chirps/{}", id))).send().await.unwrap();
    assert_eq!(200, found.status().as_u16());
    let found: Value = found.json().await.unwrap();
    assert_eq!(found["body"], "say my name");

    let missing = app
        .client
        .get(app.url(&format!("/api/chirps/{}", uuid::Uuid::new_v4())))
        .send()
        .await
        .unwrap();
    assert_eq!(404, missing.status().as_u16());

    let malformed = app.client.get(app.url("/api/chirps/not-a-uuid")).send().await.unwrap();
    assert_eq!(400, malformed.status().as_u16());
}

#[tokio::test]
async fn only_the_author_can_delete_a_chirp() {
    let app = spawn_app();
    let (_, walt_token, _) = app.signed_in_user("walt@breakingbad.com").await;
    let (_, jesse_token, _) = app.signed_in_user("jesse@breakingbad.com").await;

    let created: Value = app.post_chirp(&walt_token, "tread lightly").await.json().await.unwrap();
    let path = format!("/api/chirps/{}", created["id"].as_str().unwrap());

    let forbidden = app
        .client
        .delete(app.url(&path))
        .bearer_auth(&jesse_token)
        .send()
        .await
        .unwrap();
    assert_eq!(403, forbidden.status().as_u16());

    let unauthenticated = app.client.delete(app.url(&path)).send().await.unwrap();
    assert_eq!(401, unauthenticated.status().as_u16());

    let deleted = app
        .client
        .delete(app.url(&path))
        .bearer_auth(&walt_token)
        .send()
        .await
        .unwrap();
    assert_eq!(204, deleted.status().as_u16());

    let again = app
        .client
        .delete(app.url(&path))
        .bearer_auth(&walt_token)
        .send()
        .await
        .unwrap();
    assert_eq!(404, again.status().as_u16());
}
