//! GitHub client against a mock server

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use profile_viewer::{FetchError, GithubClient, ProfileFetcher, ProfileView};
use request_lifecycle_core::subject::Subject;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GithubClient {
    GithubClient::new(server.uri(), "profile-viewer-tests", Duration::from_secs(2)).unwrap()
}

async fn respond(status: u16, body: serde_json::Value) -> (MockServer, GithubClient) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    let client = client_for(&server);
    (server, client)
}

#[tokio::test]
async fn test_ok_decodes_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .and(header("user-agent", "profile-viewer-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "octocat",
            "name": "The Octocat",
            "bio": null,
            "avatar_url": "https://avatars.example/octocat.png",
            "followers": 100,
            "public_repos": 8,
            "created_at": "2011-01-25T18:44:36Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client_for(&server).get_user("octocat").await.unwrap();

    assert_eq!(profile.display_name(), "The Octocat");
    assert_eq!(profile.followers, 100);
}

#[tokio::test]
async fn test_not_found() {
    let (_server, client) = respond(404, json!({ "message": "Not Found" })).await;
    assert_eq!(client.get_user("octocat").await, Err(FetchError::NotFound));
}

#[tokio::test]
async fn test_unauthorized() {
    let (_server, client) = respond(401, json!({ "message": "Bad credentials" })).await;
    assert_eq!(client.get_user("octocat").await, Err(FetchError::Unauthorized));
}

#[tokio::test]
async fn test_forbidden_with_exhausted_quota_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .set_body_json(json!({ "message": "API rate limit exceeded" })),
        )
        .mount(&server)
        .await;

    let result = client_for(&server).get_user("octocat").await;
    assert_eq!(result, Err(FetchError::RateLimited));
}

#[tokio::test]
async fn test_forbidden_without_quota_header_is_api_error() {
    let (_server, client) = respond(403, json!({ "message": "Forbidden" })).await;
    assert_eq!(
        client.get_user("octocat").await,
        Err(FetchError::Api {
            status: 403,
            message: "Forbidden".to_string()
        })
    );
}

#[tokio::test]
async fn test_server_error_keeps_message() {
    let (_server, client) = respond(502, json!({ "message": "Server Error" })).await;
    assert_eq!(
        client.get_user("octocat").await,
        Err(FetchError::Api {
            status: 502,
            message: "Server Error".to_string()
        })
    );
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let (_server, client) = respond(200, json!({ "followers": "many" })).await;
    assert!(matches!(
        client.get_user("octocat").await,
        Err(FetchError::Decode(_))
    ));
}

#[tokio::test]
async fn test_login_cannot_escape_the_users_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "octocat",
            "avatar_url": "https://avatars.example/octocat.png",
            "followers": 100,
            "public_repos": 8
        })))
        .expect(0)
        .mount(&server)
        .await;
    let client = client_for(&server);

    for login in ["ghost/../octocat", "octocat?x=ghost", "octocat#ghost", ".."] {
        let subject = Subject::parse(login).unwrap();
        assert_eq!(
            client.fetch(&subject).await,
            Err(FetchError::NotFound),
            "login {login:?} reached another endpoint"
        );
    }
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = GithubClient::new(server.uri(), "tests", Duration::from_millis(50)).unwrap();
    assert_eq!(client.get_user("octocat").await, Err(FetchError::Timeout));
}

#[tokio::test]
async fn test_view_over_http_shows_failure_text() {
    let (_server, client) = respond(404, json!({ "message": "Not Found" })).await;

    let subject = Subject::parse("octocat");
    let operation = client.fetch(subject.as_ref().unwrap());
    assert_eq!(operation.await, Err(FetchError::NotFound));

    let mut view = ProfileView::mount(client, subject).await;
    view.settled(Duration::from_secs(5)).await.unwrap();
    assert_eq!(
        view.present().await.render_html(),
        "<div>There was an error<pre style=\"white-space: normal\">Not Found</pre></div>"
    );
}
