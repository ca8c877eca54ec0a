//! Integration tests for `MoodMapClient` using wiremock HTTP mocks.

use moodmap_client::{ApiError, DetailsQuery, MoodMapClient};
use moodmap_core::{Coordinates, FavoriteRecord, Mood};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> MoodMapClient {
    MoodMapClient::with_base_url(base_url, 30, "moodmap-test", Some("session=abc123"))
        .expect("client construction should not fail")
}

#[tokio::test]
async fn recommend_posts_mood_and_coordinates() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "place_id": "node/11",
            "name": "Third Wave Coffee",
            "category": "cafe",
            "distance": 0.82,
            "lat": 18.5204,
            "lon": 73.8567,
            "opening_hours": "Mo-Su 08:00-23:00",
            "osm_type": "node",
            "osm_id": 11
        },
        {
            "name": "Unnamed spot",
            "distance": "n/a"
        }
    ]);

    Mock::given(method("POST"))
        .and(path("/api/recommend"))
        .and(header("cookie", "session=abc123"))
        .and(body_json(serde_json::json!({
            "mood": "work",
            "latitude": 18.52,
            "longitude": 73.85
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let places = client
        .recommend(Mood::Work, Coordinates::new(18.52, 73.85))
        .await
        .expect("should parse places");

    assert_eq!(places.len(), 2);
    assert_eq!(places[0].stable_id(), "node/11");
    assert_eq!(places[0].distance_km, Some(0.82));
    assert_eq!(places[0].osm_id.as_deref(), Some("11"));
    assert_eq!(places[1].distance_km, None);
}

#[tokio::test]
async fn recommend_logged_out_object_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/recommend"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": false })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let places = client
        .recommend(Mood::Budget, Coordinates::new(1.0, 2.0))
        .await
        .expect("non-array should read as empty");
    assert!(places.is_empty());
}

#[tokio::test]
async fn favorites_returns_records() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        { "place_id": "node/1", "name": "Blue Tokai", "category": "cafe", "lat": 18.5, "lon": 73.8, "created_at": 1700000000 },
        { "place_id": "p_Tapri_18.51_73.82", "name": "Tapri", "category": null, "lat": null, "lon": null, "created_at": 1690000000 }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let favorites = client.favorites().await.expect("should parse favorites");

    assert_eq!(favorites.len(), 2);
    assert_eq!(favorites[0].place_id, "node/1");
    assert_eq!(favorites[1].category, None);
    assert_eq!(favorites[1].lat, None);
}

#[tokio::test]
async fn add_favorite_sends_full_record() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/favorites/add"))
        .and(body_json(serde_json::json!({
            "place_id": "node/1",
            "name": "Blue Tokai",
            "category": "cafe",
            "lat": 18.5,
            "lon": 73.8
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let record = FavoriteRecord {
        place_id: "node/1".into(),
        name: Some("Blue Tokai".into()),
        category: Some("cafe".into()),
        lat: Some(18.5),
        lon: Some(73.8),
    };
    assert!(client.add_favorite(&record).await.unwrap());
}

#[tokio::test]
async fn remove_favorite_reports_backend_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/favorites/remove"))
        .and(body_json(serde_json::json!({ "place_id": "node/1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": false })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(!client.remove_favorite("node/1").await.unwrap());
}

#[tokio::test]
async fn set_mood_sends_wire_value() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/mood/set"))
        .and(body_json(serde_json::json!({ "mood": "quick_bite" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.set_mood(Mood::QuickBite).await.unwrap());
}

#[tokio::test]
async fn place_details_by_osm_reference() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "success": true,
        "place": {
            "id": "node/11",
            "osm_type": "node",
            "osm_id": 11,
            "name": "Third Wave Coffee",
            "category": "cafe",
            "address": "FC Road, Pune",
            "lat": 18.5204,
            "lon": 73.8567,
            "opening_hours": "Mo-Su 08:00-23:00",
            "cuisine": "coffee_shop",
            "gallery": ["https://img.example/1.jpg"],
            "maps_url": "https://www.google.com/maps?q=18.5204,73.8567",
            "phone": "",
            "website": "https://thirdwavecoffee.in",
            "contact": { "website": "https://thirdwavecoffee.in" },
            "tags": { "brand": "Third Wave Coffee" }
        }
    });

    Mock::given(method("GET"))
        .and(path("/api/place_details"))
        .and(query_param("type", "node"))
        .and(query_param("id", "11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let details = client
        .place_details(&DetailsQuery::Osm {
            osm_type: "node".into(),
            osm_id: "11".into(),
        })
        .await
        .expect("request should succeed")
        .expect("place should be present");

    assert_eq!(details.name, "Third Wave Coffee");
    assert_eq!(details.osm_id, Some(11));
    assert_eq!(details.gallery.len(), 1);
    assert_eq!(details.tags.get("brand").map(String::as_str), Some("Third Wave Coffee"));
}

#[tokio::test]
async fn place_details_by_location_and_unsuccessful_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/place_details"))
        .and(query_param("lat", "18.5"))
        .and(query_param("lon", "73.8"))
        .and(query_param("name", "Chai & Co"))
        .and(query_param("category", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": false })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let details = client
        .place_details(&DetailsQuery::Location {
            lat: 18.5,
            lon: 73.8,
            name: "Chai & Co".into(),
            category: String::new(),
        })
        .await
        .unwrap();
    assert!(details.is_none());
}

#[tokio::test]
async fn place_details_forbidden_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/place_details"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(serde_json::json!({ "ok": false, "message": "Login required" })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .place_details(&DetailsQuery::Osm {
            osm_type: "way".into(),
            osm_id: "9".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http(_)), "expected HTTP error, got {err:?}");
}

#[tokio::test]
async fn profile_me_success_and_logged_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/profile/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "name": "Asha",
            "username": "asha",
            "is_private": 0,
            "current_mood": "date",
            "profile_pic": ""
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/profile/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": false })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let me = client.profile_me().await.unwrap().expect("first call is logged in");
    assert_eq!(me.username(), Some("asha"));
    assert!(!me.is_private);

    assert!(client.profile_me().await.unwrap().is_none());
}

#[tokio::test]
async fn follow_requests_list_accept_reject() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/follow/requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "req_id": 4, "username": "ravi", "name": "Ravi", "created_at": 1700000000 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/follow/requests/accept"))
        .and(body_json(serde_json::json!({ "req_id": 4 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/follow/requests/reject"))
        .and(body_json(serde_json::json!({ "req_id": 5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": false })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let requests = client.follow_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].username, "ravi");

    assert!(client.accept_follow_request(4).await.unwrap());
    assert!(!client.reject_follow_request(5).await.unwrap());
}

#[tokio::test]
async fn search_users_passes_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/search"))
        .and(query_param("q", "as"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "username": "asha", "name": "Asha", "is_private": 1, "profile_pic": "" },
            { "username": "aswin", "name": "Aswin", "is_private": 0, "profile_pic": "/static/p.png" }
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let users = client.search_users("as").await.unwrap();
    assert_eq!(users.len(), 2);
    assert!(users[0].is_private);
    assert!(!users[1].is_private);
}

#[tokio::test]
async fn invalid_json_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.favorites().await.unwrap_err();
    assert!(
        matches!(err, ApiError::Deserialize { ref context, .. } if context == "/api/favorites"),
        "unexpected error: {err:?}"
    );
}
