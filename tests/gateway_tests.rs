//! HTTP gateway behavior against an in-process mock of the remote API.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use mediplus::prelude::*;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

const TOKEN: &str = "test-token";

fn bearer_ok(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {}", TOKEN))
}

/// Bind the router on an ephemeral port and return its base URL
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn gateway<R: Resource>(base_url: &str, token: Option<&str>) -> HttpGateway<R> {
    HttpGateway::new(
        reqwest::Client::new(),
        base_url,
        Arc::new(StaticTokenProvider(token.map(str::to_string))),
    )
}

// === Client-side guards: these never reach the network, so the base URL
// === points nowhere routable

#[tokio::test]
async fn test_protected_operation_without_token_fails_client_side() {
    let gateway: HttpGateway<Department> = gateway("http://127.0.0.1:9", None);
    let err = gateway
        .create(&DepartmentDraft {
            name: "Cardiology".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::MissingToken));
    assert_eq!(err.message(), "no authentication token found");
}

#[tokio::test]
async fn test_unsupported_operation_fails_client_side() {
    let gateway: HttpGateway<Reservation> = gateway("http://127.0.0.1:9", Some(TOKEN));
    let err = gateway.get(1).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Unsupported {
            entity: "reservation",
            operation: Operation::Get
        }
    ));
}

#[tokio::test]
async fn test_invalid_draft_fails_client_side() {
    let gateway: HttpGateway<Department> = gateway("http://127.0.0.1:9", Some(TOKEN));
    let err = gateway
        .create(&DepartmentDraft { name: String::new() })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

// === Requests that do reach the mock server

#[tokio::test]
async fn test_list_decodes_public_collection() {
    let router = Router::new().route(
        "/Department/GetAll",
        get(|| async {
            Json(json!([
                { "id": 1, "name": "Neurology" },
                { "id": 2, "name": "Cardiology" }
            ]))
        }),
    );
    let base = serve(router).await;

    let gateway: HttpGateway<Department> = gateway(&base, None);
    let departments = gateway.list(&Department::list_route()).await.unwrap();
    assert_eq!(departments.len(), 2);
    assert_eq!(departments[1].name, "Cardiology");
}

#[tokio::test]
async fn test_protected_get_carries_bearer_token() {
    let router = Router::new().route(
        "/Doctor/Get/{id}",
        get(|headers: HeaderMap, Path(id): Path<i64>| async move {
            if !bearer_ok(&headers) {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "message": "unauthorized" })),
                );
            }
            (
                StatusCode::OK,
                Json(json!({
                    "id": id,
                    "name": "Dr. Nour",
                    "description": "",
                    "openingHours": "9-5"
                })),
            )
        }),
    );
    let base = serve(router).await;

    let with_token: HttpGateway<Doctor> = gateway(&base, Some(TOKEN));
    let doctor = with_token.get(5).await.unwrap();
    assert_eq!(doctor.id, 5);
    assert_eq!(doctor.opening_hours, "9-5");

    let wrong_token: HttpGateway<Doctor> = gateway(&base, Some("stale"));
    let err = wrong_token.get(5).await.unwrap_err();
    match err {
        ApiError::Remote(message) => assert_eq!(message, "unauthorized"),
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_remote_message_is_passed_through() {
    let router = Router::new().route(
        "/Department/Create",
        post(|headers: HeaderMap, Json(_body): Json<Value>| async move {
            if !bearer_ok(&headers) {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "message": "unauthorized" })),
                );
            }
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Department already exists" })),
            )
        }),
    );
    let base = serve(router).await;

    let gateway: HttpGateway<Department> = gateway(&base, Some(TOKEN));
    let err = gateway
        .create(&DepartmentDraft {
            name: "Cardiology".to_string(),
        })
        .await
        .unwrap_err();
    match err {
        ApiError::Remote(message) => assert_eq!(message, "Department already exists"),
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_maps_404_to_not_found() {
    let router = Router::new().route(
        "/Doctor/Get/{id}",
        get(|_headers: HeaderMap, Path(_id): Path<i64>| async { StatusCode::NOT_FOUND }),
    );
    let base = serve(router).await;

    let gateway: HttpGateway<Doctor> = gateway(&base, Some(TOKEN));
    let err = gateway.get(99).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::NotFound {
            entity: "doctor",
            id: 99
        }
    ));
}

#[tokio::test]
async fn test_multipart_create_sends_expected_fields() {
    let seen = Arc::new(Mutex::new(Vec::<(String, Option<String>)>::new()));
    let router = Router::new()
        .route(
            "/Treatment/Create",
            post(
                |State(seen): State<Arc<Mutex<Vec<(String, Option<String>)>>>>,
                 headers: HeaderMap,
                 mut multipart: Multipart| async move {
                    if !bearer_ok(&headers) {
                        return (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({ "message": "unauthorized" })),
                        );
                    }
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().unwrap_or_default().to_string();
                        let file_name = field.file_name().map(str::to_string);
                        field.bytes().await.unwrap();
                        seen.lock().unwrap().push((name, file_name));
                    }
                    (
                        StatusCode::OK,
                        Json(json!({
                            "id": 3,
                            "title": "Dental cleaning",
                            "icon": "/uploads/icon.png",
                            "price": 120.0
                        })),
                    )
                },
            ),
        )
        .with_state(seen.clone());
    let base = serve(router).await;

    let gateway: HttpGateway<Treatment> = gateway(&base, Some(TOKEN));
    let created = gateway
        .create(&TreatmentDraft {
            title: "Dental cleaning".to_string(),
            price: 120.0,
            image: ImageSource::Upload(FileAttachment::new(
                "icon.png",
                "image/png",
                vec![1, 2, 3],
            )),
        })
        .await
        .unwrap();

    assert_eq!(created.id, 3);
    assert_eq!(created.icon, "/uploads/icon.png");
    let fields = seen.lock().unwrap().clone();
    assert_eq!(
        fields,
        vec![
            ("title".to_string(), None),
            ("price".to_string(), None),
            ("file".to_string(), Some("icon.png".to_string())),
        ]
    );
}

#[tokio::test]
async fn test_blog_collection_routes() {
    let router = Router::new()
        .route(
            "/Blog/GetRecent",
            get(|| async {
                Json(json!([{ "id": 1, "title": "Recent", "categoryId": 2 }]))
            }),
        )
        .route(
            "/Blog/Search/{query}",
            get(|Path(query): Path<String>| async move {
                Json(json!([{ "id": 2, "title": query, "categoryId": 2 }]))
            }),
        )
        .route(
            "/Blog/GetByCategoryId/{id}",
            get(|Path(id): Path<i64>| async move {
                Json(json!([{ "id": 3, "title": "Categorised", "categoryId": id }]))
            }),
        );
    let base = serve(router).await;

    let gateway: HttpGateway<Blog> = gateway(&base, None);
    let recent = gateway.list(&Blog::recent_route()).await.unwrap();
    assert_eq!(recent[0].title, "Recent");

    let found = gateway.list(&Blog::search_route("cardio")).await.unwrap();
    assert_eq!(found[0].title, "cardio");

    let by_category = gateway.list(&Blog::by_category_route(7)).await.unwrap();
    assert_eq!(by_category[0].category_id, 7);
}
