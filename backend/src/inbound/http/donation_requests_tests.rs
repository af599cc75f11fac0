//! Tests for donation request HTTP handlers over in-memory adapters.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::{AccountStatus, DirectoryEntry, Email, Role};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::test_utils::in_memory_state;
use crate::outbound::memory::InMemoryUserDirectory;

fn entry(raw: &str, role: Role, status: AccountStatus) -> DirectoryEntry {
    DirectoryEntry {
        email: Email::new(raw).expect("valid email"),
        role,
        status,
    }
}

#[fixture]
fn state() -> HttpState {
    in_memory_state(InMemoryUserDirectory::with_entries([
        entry("alice@x.org", Role::Donor, AccountStatus::Active),
        entry("bob@x.org", Role::Donor, AccountStatus::Active),
        entry("charlie@x.org", Role::Volunteer, AccountStatus::Active),
        entry("mallory@x.org", Role::Donor, AccountStatus::Blocked),
        entry("root@x.org", Role::Admin, AccountStatus::Active),
    ]))
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(web::scope("/api/v1").configure(configure))
}

fn sample_payload() -> Value {
    json!({
        "recipientName": "Rahim",
        "recipientDistrict": "Dhaka",
        "recipientUpazila": "Savar",
        "bloodGroup": "O+",
        "donationDate": "2026-11-02",
        "donationTime": "10:30",
        "hospitalName": "Dhaka Medical",
        "unexpected": "ignored"
    })
}

async fn send(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    request: actix_test::TestRequest,
    caller: Option<&str>,
) -> (StatusCode, Value) {
    let request = match caller {
        Some(email) => request.insert_header(("Authorization", format!("Bearer {email}"))),
        None => request,
    };
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

async fn create_as(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    caller: &str,
) -> String {
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/donation-requests")
            .set_json(sample_payload()),
        Some(caller),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["insertedId"]
        .as_str()
        .expect("insertedId string")
        .to_owned()
}

fn patch_to(id: &str, body: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::patch()
        .uri(&format!("/api/v1/donation-requests/{id}"))
        .set_json(body)
}

fn get_one(id: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::get().uri(&format!("/api/v1/donation-requests/{id}"))
}

#[rstest]
#[actix_web::test]
async fn create_returns_inserted_id_and_pending_record(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let id = create_as(&app, "alice@x.org").await;

    let (status, body) = send(&app, get_one(&id), Some("alice@x.org")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requestStatus"], json!("pending"));
    assert_eq!(body["requesterEmail"], json!("alice@x.org"));
    assert_eq!(body["donorName"], Value::Null);
    assert_eq!(body["donorEmail"], Value::Null);
    assert!(body.get("unexpected").is_none());
}

#[rstest]
#[actix_web::test]
async fn create_without_token_is_unauthorized(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/donation-requests")
            .set_json(sample_payload()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("unauthorized"));
}

#[rstest]
#[actix_web::test]
async fn blocked_account_cannot_create(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/donation-requests")
            .set_json(sample_payload()),
        Some("mallory@x.org"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], json!("account_blocked"));
}

#[rstest]
#[actix_web::test]
async fn create_reports_missing_fields(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/donation-requests")
            .set_json(json!({ "recipientName": "Rahim", "bloodGroup": "O+" })),
        Some("alice@x.org"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["details"]["missingFields"],
        json!(["recipientDistrict", "recipientUpazila", "donationDate", "donationTime"])
    );
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_invalid_request(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/donation-requests")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json"),
        Some("alice@x.org"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid_request"));
}

#[rstest]
#[actix_web::test]
async fn malformed_id_is_rejected(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let (status, body) = send(&app, get_one("64b7f0c2e1"), Some("alice@x.org")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Invalid Request ID format."));
}

#[rstest]
#[actix_web::test]
async fn third_party_sees_redacted_pending_request(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let id = create_as(&app, "alice@x.org").await;

    let (status, body) = send(&app, get_one(&id), Some("charlie@x.org")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("requesterEmail").is_none());

    let (_, admin_view) = send(&app, get_one(&id), Some("root@x.org")).await;
    assert_eq!(admin_view["requesterEmail"], json!("alice@x.org"));
}

#[rstest]
#[actix_web::test]
async fn pending_board_is_public_and_redacted(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    create_as(&app, "alice@x.org").await;
    create_as(&app, "bob@x.org").await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/donation-requests/pending"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().expect("array body");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.get("requesterEmail").is_none()));
}

#[rstest]
#[actix_web::test]
async fn overlong_donor_email_is_a_validation_error(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let id = create_as(&app, "alice@x.org").await;
    let donor_email = format!("{}@x.org", "b".repeat(315));
    assert_eq!(donor_email.len(), 321);

    let (status, body) = send(
        &app,
        patch_to(
            &id,
            json!({ "requestStatus": "inprogress", "donorName": "Bob", "donorEmail": donor_email }),
        ),
        Some("bob@x.org"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["details"]["field"], json!("donorEmail"));

    let (_, view) = send(&app, get_one(&id), Some("alice@x.org")).await;
    assert_eq!(view["requestStatus"], json!("pending"));
}

#[rstest]
#[actix_web::test]
async fn self_assignment_then_completion(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let id = create_as(&app, "alice@x.org").await;

    let (status, body) = send(
        &app,
        patch_to(&id, json!({ "requestStatus": "inprogress" })),
        Some("bob@x.org"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = send(
        &app,
        patch_to(
            &id,
            json!({ "requestStatus": "inprogress", "donorName": "Bob", "donorEmail": "bob@x.org" }),
        ),
        Some("bob@x.org"),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["modifiedCount"], json!(1));

    let (status, donor_view) = send(&app, get_one(&id), Some("bob@x.org")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(donor_view["donorEmail"], json!("bob@x.org"));

    let (status, _) = send(
        &app,
        patch_to(&id, json!({ "requestStatus": "done" })),
        Some("alice@x.org"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        patch_to(&id, json!({ "requestStatus": "pending" })),
        Some("alice@x.org"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid_transition"));
}

#[rstest]
#[actix_web::test]
async fn details_are_ignored_when_status_is_present(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let id = create_as(&app, "alice@x.org").await;

    let (status, _) = send(
        &app,
        patch_to(&id, json!({ "requestStatus": "canceled", "recipientName": "Karim" })),
        Some("alice@x.org"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get_one(&id), Some("alice@x.org")).await;
    assert_eq!(body["requestStatus"], json!("canceled"));
    assert_eq!(body["recipientName"], json!("Rahim"));
}

#[rstest]
#[actix_web::test]
async fn requester_edits_and_clears_details(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let id = create_as(&app, "alice@x.org").await;

    let (status, _) = send(
        &app,
        patch_to(&id, json!({ "recipientName": "Karim", "hospitalName": null })),
        Some("alice@x.org"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get_one(&id), Some("alice@x.org")).await;
    assert_eq!(body["recipientName"], json!("Karim"));
    assert_eq!(body["hospitalName"], Value::Null);
}

#[rstest]
#[case(json!({}), StatusCode::BAD_REQUEST, "no_op")]
#[case(json!({ "requesterEmail": "mallory@x.org" }), StatusCode::BAD_REQUEST, "no_op")]
#[case(json!({ "bloodGroup": "Z+" }), StatusCode::BAD_REQUEST, "invalid_request")]
#[case(json!({ "requestStatus": "archived" }), StatusCode::BAD_REQUEST, "invalid_request")]
#[actix_web::test]
async fn rejected_updates(
    state: HttpState,
    #[case] body: Value,
    #[case] expected_status: StatusCode,
    #[case] expected_code: &str,
) {
    let app = actix_test::init_service(test_app(state)).await;
    let id = create_as(&app, "alice@x.org").await;

    let (status, response) = send(&app, patch_to(&id, body), Some("alice@x.org")).await;

    assert_eq!(status, expected_status);
    assert_eq!(response["code"], json!(expected_code));
}

#[rstest]
#[actix_web::test]
async fn non_requester_cannot_edit_details(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let id = create_as(&app, "alice@x.org").await;

    let (status, _) = send(
        &app,
        patch_to(&id, json!({ "recipientName": "Karim" })),
        Some("root@x.org"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn stranger_cannot_delete_pending_request(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let id = create_as(&app, "alice@x.org").await;

    let (status, _) = send(
        &app,
        actix_test::TestRequest::delete().uri(&format!("/api/v1/donation-requests/{id}")),
        Some("charlie@x.org"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, get_one(&id), Some("alice@x.org")).await;
    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn requester_cannot_delete_in_progress_but_admin_can(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let id = create_as(&app, "alice@x.org").await;
    send(
        &app,
        patch_to(
            &id,
            json!({ "requestStatus": "inprogress", "donorName": "Bob", "donorEmail": "bob@x.org" }),
        ),
        Some("bob@x.org"),
    )
    .await;

    let delete = || actix_test::TestRequest::delete().uri(&format!("/api/v1/donation-requests/{id}"));
    let (status, body) = send(&app, delete(), Some("alice@x.org")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid_state"));

    let (status, body) = send(&app, delete(), Some("root@x.org")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Donation request deleted successfully."));

    let (status, _) = send(&app, get_one(&id), Some("root@x.org")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn admin_routes_require_admin(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    let id = create_as(&app, "alice@x.org").await;

    let (status, _) = send(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/donation-requests/admin/all-requests"),
        Some("alice@x.org"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/donation-requests/admin/all-requests"),
        Some("root@x.org"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, _) = send(
        &app,
        actix_test::TestRequest::delete().uri(&format!("/api/v1/donation-requests/admin/{id}")),
        Some("root@x.org"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn my_requests_lists_only_callers_records(state: HttpState) {
    let app = actix_test::init_service(test_app(state)).await;
    create_as(&app, "alice@x.org").await;
    create_as(&app, "alice@x.org").await;
    create_as(&app, "bob@x.org").await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/donation-requests/my-requests"),
        Some("alice@x.org"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().expect("array body");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item["requesterEmail"] == json!("alice@x.org")));
}
