//! Integration tests for the StayNest HTTP client

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use staynest_core::types::{BookingStatus, HotelSearchRequest, LoginRequest, SignupRequest};
use staynest_core::{FileStore, KeyValueStore, MemoryStore, Session, keys};
use staynest_http::{ClientError, LoginRedirect, StayNestClient};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingRedirect {
    calls: AtomicUsize,
}

impl LoginRedirect for RecordingRedirect {
    fn redirect_to_login(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn client_with(
    server: &MockServer,
    storage: Arc<dyn KeyValueStore>,
    redirect: Arc<RecordingRedirect>,
) -> StayNestClient {
    StayNestClient::builder()
        .base_url(server.uri())
        .storage(storage)
        .redirect(redirect)
        .build()
        .unwrap()
}

fn token_for(sub: &str, roles: serde_json::Value) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &json!({
            "sub": sub,
            "email": "ana@example.com",
            "name": "Ana",
            "roles": roles,
            "iat": 1_700_000_000,
            "exp": 1_700_000_600,
        }),
        &jsonwebtoken::EncodingKey::from_secret(b"backend-secret"),
    )
    .unwrap()
}

#[tokio::test]
async fn test_client_builder() {
    let client = StayNestClient::builder()
        .base_url("http://localhost:8080/api/v1")
        .timeout(std::time::Duration::from_secs(5))
        .user_agent("staynest-test")
        .build();

    assert!(client.is_ok());
    assert_eq!(client.unwrap().base_url(), "http://localhost:8080/api/v1");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = StayNestClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_no_token_sends_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/guests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(
        &server,
        Arc::new(MemoryStore::new()),
        Arc::new(RecordingRedirect::default()),
    );
    let guests = client.guests().await.unwrap();
    assert!(guests.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_stored_token_is_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .and(header("authorization", "Bearer stored-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": 7, "name": "Ana", "email": "ana@example.com", "gender": "FEMALE" },
            "error": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage.set(keys::ACCESS_TOKEN, "stored-token").unwrap();
    let client = client_with(&server, storage, Arc::new(RecordingRedirect::default()));

    let profile = client.profile().await.unwrap();
    assert_eq!(profile.id, Some(7));
    assert_eq!(profile.name.as_deref(), Some("Ana"));
}

#[tokio::test]
async fn test_401_refreshes_once_and_replays() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/myBookings"))
        .and(header("authorization", "Bearer expired"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/myBookings"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 3,
            "checkInDate": "2026-11-02",
            "checkOutDate": "2026-11-05T00:00:00",
            "roomsCount": 1,
            "amount": 450.5,
            "bookingStatus": "CONFIRMED",
            "guests": null,
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "fresh" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage.set(keys::ACCESS_TOKEN, "expired").unwrap();
    let redirect = Arc::new(RecordingRedirect::default());
    let client = client_with(&server, storage.clone(), redirect.clone());

    let bookings = client.my_bookings().await.unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].booking_status, BookingStatus::Confirmed);
    assert_eq!(bookings[0].nights(), 3);
    assert_eq!(bookings[0].amount, Some(Decimal::from_str("450.5").unwrap()));
    assert_eq!(
        storage.get(keys::ACCESS_TOKEN).unwrap().as_deref(),
        Some("fresh")
    );
    assert_eq!(redirect.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_replayed_401_is_not_retried_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/hotels"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "accessToken": "fresh" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage.set(keys::ACCESS_TOKEN, "expired").unwrap();
    let redirect = Arc::new(RecordingRedirect::default());
    let client = client_with(&server, storage, redirect.clone());

    let result = client.admin_hotels().await;
    assert!(matches!(result, Err(ClientError::AuthenticationFailed(_))));
    assert_eq!(redirect.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_refresh_clears_session_and_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/guests"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let session = Session::restore(storage.clone()).unwrap();
    session.login(&token_for("5", json!("[ROLE_GUEST]"))).unwrap();
    assert!(session.is_authenticated());

    let redirect = Arc::new(RecordingRedirect::default());
    let client = client_with(&server, storage.clone(), redirect.clone());

    let result = client.guests().await;
    assert!(matches!(result, Err(ClientError::SessionExpired(_))));
    assert_eq!(redirect.calls.load(Ordering::SeqCst), 1);
    assert_eq!(storage.get(keys::ACCESS_TOKEN).unwrap(), None);
    assert_eq!(storage.get(keys::USER).unwrap(), None);
    assert_eq!(session.reload().unwrap(), None);
}

#[tokio::test]
async fn test_login_never_carries_authorization() {
    let server = MockServer::start().await;
    let token = token_for("9", json!(["HOTEL_MANAGER"]));
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "ana@example.com", "password": "Secret1!" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "accessToken": token } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage.set(keys::ACCESS_TOKEN, "left-over").unwrap();
    let client = client_with(&server, storage.clone(), Arc::new(RecordingRedirect::default()));

    let response = client
        .login(&LoginRequest {
            email: "ana@example.com".into(),
            password: "Secret1!".into(),
        })
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("authorization"));

    let session = Session::restore(storage).unwrap();
    let user = session.login(&response.access_token).unwrap();
    assert!(user.is_manager());
}

#[tokio::test]
async fn test_signup_never_carries_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .and(body_json(json!({
            "email": "ana@example.com",
            "password": "Secret1!",
            "name": "Ana",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": 1, "email": "ana@example.com", "name": "Ana" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage.set(keys::ACCESS_TOKEN, "left-over").unwrap();
    let client = client_with(&server, storage, Arc::new(RecordingRedirect::default()));

    let profile = client
        .signup(&SignupRequest {
            email: "ana@example.com".into(),
            password: "Secret1!".into(),
            name: "Ana".into(),
        })
        .await
        .unwrap();

    assert_eq!(profile.id, Some(1));
    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_signup_401_does_not_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "x" })))
        .expect(0)
        .mount(&server)
        .await;

    let redirect = Arc::new(RecordingRedirect::default());
    let client = client_with(&server, Arc::new(MemoryStore::new()), redirect.clone());

    let result = client
        .signup(&SignupRequest {
            email: "ana@example.com".into(),
            password: "Secret1!".into(),
            name: "Ana".into(),
        })
        .await;

    assert!(result.is_err());
    assert_eq!(redirect.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_login_401_does_not_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "data": null,
            "error": { "status": "UNAUTHORIZED", "message": "Bad credentials", "subErrors": null },
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "x" })))
        .expect(0)
        .mount(&server)
        .await;

    let redirect = Arc::new(RecordingRedirect::default());
    let client = client_with(&server, Arc::new(MemoryStore::new()), redirect.clone());

    let result = client
        .login(&LoginRequest {
            email: "ana@example.com".into(),
            password: "wrong".into(),
        })
        .await;

    match result {
        Err(ClientError::AuthenticationFailed(message)) => assert_eq!(message, "Bad credentials"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(redirect.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_refresh_uses_login_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "refreshToken=cookie-value; Path=/; HttpOnly")
                .set_body_json(json!({ "accessToken": "first" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .and(header("cookie", "refreshToken=cookie-value"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "second" })))
        .expect(1)
        .mount(&server)
        .await;

    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let client = client_with(&server, storage.clone(), Arc::new(RecordingRedirect::default()));

    client
        .login(&LoginRequest {
            email: "ana@example.com".into(),
            password: "Secret1!".into(),
        })
        .await
        .unwrap();
    let refreshed = client.refresh().await.unwrap();

    assert_eq!(refreshed.access_token, "second");
    assert_eq!(
        storage.get(keys::ACCESS_TOKEN).unwrap().as_deref(),
        Some("second")
    );
}

#[tokio::test]
async fn test_search_hotels_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hotels/search"))
        .and(body_json(json!({
            "city": "lisbon",
            "startDate": "2026-11-02",
            "endDate": "2026-11-05",
            "roomsCount": 2,
            "page": 0,
            "size": 10,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "content": [{
                    "id": 1,
                    "name": "Alfama Stay",
                    "city": "lisbon",
                    "photos": ["a.jpg"],
                    "amenities": ["wifi"],
                    "contactInfo": { "address": "Rua 1", "phoneNumber": null, "email": null, "location": "alfama" },
                    "active": true,
                    "price": 120.0,
                }],
                "totalElements": 1,
                "totalPages": 1,
                "number": 0,
                "size": 10,
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = StayNestClient::new(server.uri()).unwrap();
    let request = HotelSearchRequest::new(
        " Lisbon ",
        NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
        NaiveDate::from_ymd_opt(2026, 11, 5).unwrap(),
        2,
    );

    let page = client.search_hotels(&request).await.unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].hotel.name, "Alfama Stay");
    assert_eq!(page.content[0].price, Some(Decimal::from(120)));
}

#[tokio::test]
async fn test_add_guests_sends_id_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bookings/12/addGuests"))
        .and(body_json(json!([4, 5])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": 12,
                "checkInDate": "2026-11-02",
                "checkOutDate": "2026-11-04",
                "roomsCount": 1,
                "bookingStatus": "GUESTS_ADDED",
                "guests": [
                    { "id": 4, "name": "Ana", "dateOfBirth": "1990-01-01", "gender": "FEMALE" },
                    { "id": 5, "name": "Rui", "gender": "MALE" },
                ],
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = StayNestClient::new(server.uri()).unwrap();
    let booking = client.add_guests(12, &[4, 5]).await.unwrap();

    assert_eq!(booking.booking_status, BookingStatus::GuestsAdded);
    assert_eq!(booking.guests.len(), 2);
}

#[tokio::test]
async fn test_cancel_and_inventory_accept_empty_responses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bookings/12/cancel"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/admin/inventory/rooms/8"))
        .and(body_json(json!({
            "startDate": "2026-12-20",
            "endDate": "2026-12-31",
            "surgeFactor": 1.5,
            "closed": false,
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = StayNestClient::new(server.uri()).unwrap();
    client.cancel_booking(12).await.unwrap();
    client
        .update_inventory(
            8,
            &staynest_core::types::InventoryUpdate {
                start_date: NaiveDate::from_ymd_opt(2026, 12, 20).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
                surge_factor: Decimal::from_str("1.5").unwrap(),
                closed: false,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_error_message_from_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/hotels/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "data": null,
            "error": { "status": "NOT_FOUND", "message": "Hotel not found with id: 99", "subErrors": [] },
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/hotels/1/reports"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = StayNestClient::new(server.uri()).unwrap();

    match client.admin_hotel(99).await {
        Err(ClientError::NotFound(message)) => assert_eq!(message, "Hotel not found with id: 99"),
        other => panic!("unexpected result: {other:?}"),
    }
    match client.hotel_report(1).await {
        Err(ClientError::ServerError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "500 Internal Server Error");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_refresh_cookie_survives_restart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "refreshToken=cookie-value; Path=/; HttpOnly")
                .set_body_json(json!({ "data": { "accessToken": "first" } })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/refresh"))
        .and(header("cookie", "refreshToken=cookie-value"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "accessToken": "fresh" } })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .and(header("authorization", "Bearer expired"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/profile"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": 1, "email": "ana@example.com", "name": "Ana" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();

    let first_run: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let client = client_with(&server, first_run.clone(), Arc::new(RecordingRedirect::default()));
    client
        .login(&LoginRequest {
            email: "ana@example.com".into(),
            password: "Secret1!".into(),
        })
        .await
        .unwrap();
    first_run.set(keys::ACCESS_TOKEN, "expired").unwrap();
    drop(client);

    let second_run: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let redirect = Arc::new(RecordingRedirect::default());
    let client = client_with(&server, second_run.clone(), redirect.clone());

    let profile = client.profile().await.unwrap();

    assert_eq!(profile.name.as_deref(), Some("Ana"));
    assert_eq!(redirect.calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        second_run.get(keys::ACCESS_TOKEN).unwrap().as_deref(),
        Some("fresh")
    );
}
