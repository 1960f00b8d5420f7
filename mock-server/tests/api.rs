use axum::http::{self, Request, StatusCode};
use blb_mock_server::{app, CreateLoadBalancerResponse, ErrorBody, ListResponse};
use http_body_util::BodyExt;
use tower::{Service, ServiceExt};

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

async fn call(
    app: &mut axum::routing::RouterIntoService<String>,
    request: Request<String>,
) -> axum::response::Response {
    ServiceExt::ready(app).await.unwrap().call(request).await.unwrap()
}

// --- describe ---

#[tokio::test]
async fn list_empty() {
    let resp = app().oneshot(get("/v1/blb")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list: ListResponse = body_json(resp).await;
    assert!(list.blb_list.is_empty());
    assert!(!list.is_truncated);
    assert_eq!(list.max_keys, 1000);
}

#[tokio::test]
async fn list_with_empty_filters_matches_everything() {
    let mut app = app().into_service();
    call(&mut app, json_request("POST", "/v1/blb?clientToken=a", r#"{"name":"web"}"#)).await;

    let resp = call(
        &mut app,
        get("/v1/blb?blbId=&name=&bccId=&address=&exactlyMatch=true"),
    )
    .await;
    let list: ListResponse = body_json(resp).await;
    assert_eq!(list.blb_list.len(), 1);
}

#[tokio::test]
async fn list_exact_and_fuzzy_name() {
    let mut app = app().into_service();
    call(&mut app, json_request("POST", "/v1/blb?clientToken=a", r#"{"name":"web-1"}"#)).await;
    call(&mut app, json_request("POST", "/v1/blb?clientToken=b", r#"{"name":"db"}"#)).await;

    let resp = call(&mut app, get("/v1/blb?name=web&exactlyMatch=true")).await;
    let list: ListResponse = body_json(resp).await;
    assert!(list.blb_list.is_empty());

    let resp = call(&mut app, get("/v1/blb?name=web&exactlyMatch=false")).await;
    let list: ListResponse = body_json(resp).await;
    assert_eq!(list.blb_list.len(), 1);
    assert_eq!(list.blb_list[0].name, "web-1");
}

#[tokio::test]
async fn list_paginates_by_marker() {
    let mut app = app().into_service();
    for token in ["a", "b", "c"] {
        call(
            &mut app,
            json_request("POST", &format!("/v1/blb?clientToken={token}"), "{}"),
        )
        .await;
    }

    let resp = call(&mut app, get("/v1/blb?maxKeys=2")).await;
    let first: ListResponse = body_json(resp).await;
    assert_eq!(first.blb_list.len(), 2);
    assert!(first.is_truncated);
    assert!(!first.next_marker.is_empty());

    let resp = call(
        &mut app,
        get(&format!("/v1/blb?maxKeys=2&marker={}", first.next_marker)),
    )
    .await;
    let second: ListResponse = body_json(resp).await;
    assert_eq!(second.blb_list.len(), 1);
    assert!(!second.is_truncated);
    assert_eq!(second.marker, first.next_marker);
    assert_eq!(second.blb_list[0].blb_id, first.next_marker);
}

// --- create ---

#[tokio::test]
async fn create_returns_id_and_address() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/v1/blb?clientToken=t-1",
            r#"{"name":"web","desc":"front","vpcId":"vpc-1","allocateVip":true}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let created: CreateLoadBalancerResponse = body_json(resp).await;
    assert!(created.blb_id.starts_with("lb-"));
    assert_eq!(created.address, "10.0.0.1");
    assert_eq!(created.name, "web");
    assert_eq!(created.desc, "front");
}

#[tokio::test]
async fn create_accepts_null_body() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/blb", "null"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let created: CreateLoadBalancerResponse = body_json(resp).await;
    assert_eq!(created.name, created.blb_id);
}

#[tokio::test]
async fn create_replays_known_client_token() {
    let mut app = app().into_service();
    let resp = call(&mut app, json_request("POST", "/v1/blb?clientToken=same", "{}")).await;
    let first: CreateLoadBalancerResponse = body_json(resp).await;
    let resp = call(&mut app, json_request("POST", "/v1/blb?clientToken=same", "{}")).await;
    let second: CreateLoadBalancerResponse = body_json(resp).await;
    assert_eq!(first, second);

    let resp = call(&mut app, get("/v1/blb")).await;
    let list: ListResponse = body_json(resp).await;
    assert_eq!(list.blb_list.len(), 1);
}

#[tokio::test]
async fn create_malformed_json_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/blb?clientToken=x", "{not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/v1/blb/lb-missing?clientToken=t",
            r#"{"name":"nope"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(err.code, "NoSuchObject");
    assert!(!err.request_id.is_empty());
}

#[tokio::test]
async fn update_requires_client_token() {
    let resp = app()
        .oneshot(json_request("PUT", "/v1/blb/lb-1", r#"{"name":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(err.code, "MissingClientToken");
}

#[tokio::test]
async fn update_with_empty_desc_clears_it() {
    let mut app = app().into_service();
    let resp = call(
        &mut app,
        json_request("POST", "/v1/blb?clientToken=c1", r#"{"name":"web","desc":"front"}"#),
    )
    .await;
    let created: CreateLoadBalancerResponse = body_json(resp).await;
    let id = created.blb_id;

    let resp = call(
        &mut app,
        json_request("PUT", &format!("/v1/blb/{id}?clientToken=u1"), r#"{"desc":""}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = call(&mut app, get(&format!("/v1/blb?blbId={id}"))).await;
    let list: ListResponse = body_json(resp).await;
    assert_eq!(list.blb_list[0].desc, "");
    assert_eq!(list.blb_list[0].name, "web");
}

// --- delete ---

#[tokio::test]
async fn delete_not_found() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/v1/blb/lb-missing?clientToken=t")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn blb_lifecycle() {
    let mut app = app().into_service();

    // create
    let resp = call(
        &mut app,
        json_request("POST", "/v1/blb?clientToken=c1", r#"{"name":"web","desc":"front"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: CreateLoadBalancerResponse = body_json(resp).await;
    let id = created.blb_id;

    // update only the name; desc stays
    let resp = call(
        &mut app,
        json_request("PUT", &format!("/v1/blb/{id}?clientToken=u1"), r#"{"name":"web-2"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = call(&mut app, get(&format!("/v1/blb?blbId={id}"))).await;
    let list: ListResponse = body_json(resp).await;
    assert_eq!(list.blb_list.len(), 1);
    assert_eq!(list.blb_list[0].name, "web-2");
    assert_eq!(list.blb_list[0].desc, "front");
    assert_eq!(list.blb_list[0].status, "available");

    // delete
    let resp = call(
        &mut app,
        Request::builder()
            .method("DELETE")
            .uri(&format!("/v1/blb/{id}?clientToken=d1"))
            .body(String::new())
            .unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());

    // list after delete: empty
    let resp = call(&mut app, get("/v1/blb")).await;
    let list: ListResponse = body_json(resp).await;
    assert!(list.blb_list.is_empty());
}
