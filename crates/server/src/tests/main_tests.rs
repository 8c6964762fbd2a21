use super::*;
use axum::{body, body::Body, http::Request, response::Response};
use shared::domain::{Question, QuestionGroups};
use tower::ServiceExt;

async fn test_app() -> (Router, Storage) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let mut groups = QuestionGroups::new();
    groups.push(
        "personal",
        Question::new("p1", "How old is your child?", ["Under 3", "3 to 5"])
            .with_kind("personal")
            .with_imagekey("personal1"),
    );
    groups.push(
        "behavioral",
        Question::new("b1", "Avoids eye contact?", ["Often", "Rarely"]),
    );
    storage.import_groups(&groups).await.expect("seed");

    let app = build_router(Arc::new(AppState {
        api: ApiContext {
            storage: storage.clone(),
        },
    }));
    (app, storage)
}

async fn json_body(response: Response) -> serde_json::Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

fn post_json(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

#[tokio::test]
async fn healthz_reports_ok_when_storage_is_ready() {
    let (app, _storage) = test_app().await;
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn root_greets() {
    let (app, _storage) = test_app().await;
    let request = Request::get("/").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"Welcome to Neurocare");
}

#[tokio::test]
async fn questions_route_returns_groups_in_order() {
    let (app, _storage) = test_app().await;
    let request = Request::get("/api/questions")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let text = {
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf8")
    };
    let personal = text.find("\"personal\":").expect("personal group");
    let behavioral = text.find("\"behavioral\":").expect("behavioral group");
    assert!(personal < behavioral, "group order lost: {text}");

    let dto: QuestionGroupsResponse = serde_json::from_str(&text).expect("json");
    let p1 = dto.groups.questions().next().expect("p1");
    assert_eq!(p1.kind.as_deref(), Some("personal"));
    assert_eq!(p1.image_key(), Some("personal1"));
}

#[tokio::test]
async fn submitted_answers_are_stored_and_readable() {
    let (app, storage) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/responses",
            serde_json::json!({ "answers": { "p1": "3 to 5", "b1": "Often" } }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Responses saved successfully");
    let response_id = body["response_id"].as_i64().expect("response id");

    let stored = storage
        .response(ResponseId(response_id))
        .await
        .expect("read")
        .expect("stored");
    assert_eq!(stored.answers.len(), 2);

    let request = Request::get(format!("/api/responses/{response_id}"))
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let dto: StoredResponsePayload =
        serde_json::from_value(json_body(response).await).expect("payload");
    assert_eq!(dto.response_id, ResponseId(response_id));
    assert_eq!(dto.answers, stored.answers);
}

#[tokio::test]
async fn empty_answers_are_a_bad_request() {
    let (app, _storage) = test_app().await;
    let response = app
        .oneshot(post_json(
            "/api/responses",
            serde_json::json!({ "answers": {} }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ApiError = serde_json::from_value(json_body(response).await).expect("error");
    assert_eq!(err.code, ErrorCode::Validation);
}

#[tokio::test]
async fn missing_answers_field_is_a_bad_request() {
    let (app, _storage) = test_app().await;
    let response = app
        .oneshot(post_json(
            "/api/responses",
            serde_json::json!({ "p1": "3 to 5" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ApiError = serde_json::from_value(json_body(response).await).expect("error");
    assert_eq!(err.code, ErrorCode::Validation);
}

#[tokio::test]
async fn option_not_offered_is_a_bad_request() {
    let (app, _storage) = test_app().await;
    let response = app
        .oneshot(post_json(
            "/api/responses",
            serde_json::json!({ "answers": { "p1": "Over 80" } }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_response_is_not_found() {
    let (app, _storage) = test_app().await;
    let request = Request::get("/api/responses/99")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let err: ApiError = serde_json::from_value(json_body(response).await).expect("error");
    assert_eq!(err.code, ErrorCode::NotFound);
}
