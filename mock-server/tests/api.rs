use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, seed_people, DetailResponse, ListResponse, OperationResult};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
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

const NEW_PERSON: &str = r#"{"name":"Ada","email":"ada@example.com","phone":"555",
    "department":"Engineering","position":"Engineer","joinDate":"2023-01-01",
    "status":"active","location":"London","skills":["rust"]}"#;

// --- list ---

#[tokio::test]
async fn list_persons_empty() {
    let resp = app().oneshot(get("/persons")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list: ListResponse = body_json(resp).await;
    assert!(list.data.is_empty());
    assert_eq!(list.total, 0);
    assert_eq!(list.page, 1);
    assert_eq!(list.page_size, 10);
}

#[tokio::test]
async fn list_persons_paginates_with_total() {
    let resp = app_with(seed_people())
        .oneshot(get("/persons?page=2&pageSize=4&keyword=&department=&status="))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list: ListResponse = body_json(resp).await;
    assert_eq!(list.total, 6);
    assert_eq!(list.data.len(), 2);
    assert_eq!(list.page, 2);
    assert_eq!(list.page_size, 4);
}

#[tokio::test]
async fn list_persons_orders_by_join_date() {
    let resp = app_with(seed_people()).oneshot(get("/persons")).await.unwrap();
    let list: ListResponse = body_json(resp).await;
    let dates: Vec<_> = list.data.iter().map(|p| p.join_date.clone()).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
}

#[tokio::test]
async fn list_persons_filters() {
    let resp = app_with(seed_people())
        .oneshot(get("/persons?department=Engineering&status=active"))
        .await
        .unwrap();
    let list: ListResponse = body_json(resp).await;
    assert_eq!(list.total, 2);
    assert!(list.data.iter().all(|p| p.department == "Engineering"));
}

#[tokio::test]
async fn list_persons_page_zero_is_first_page() {
    let resp = app_with(seed_people())
        .oneshot(get("/persons?page=0&pageSize=0"))
        .await
        .unwrap();
    let list: ListResponse = body_json(resp).await;
    assert_eq!(list.page, 1);
    assert_eq!(list.page_size, 10);
    assert_eq!(list.data.len(), 6);
}

// --- create ---

#[tokio::test]
async fn create_person_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/createPerson", NEW_PERSON))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: DetailResponse = body_json(resp).await;
    assert_eq!(created.data.name, "Ada");
    assert!(!created.data.id.is_empty());
    assert_eq!(created.data.skills, Some(vec!["rust".to_string()]));
}

#[tokio::test]
async fn create_person_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/createPerson", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get / update / delete on missing ids ---

#[tokio::test]
async fn get_person_not_found() {
    let resp = app().oneshot(get("/getPerson/nonexistent-id")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: OperationResult = body_json(resp).await;
    assert!(!body.success);
}

#[tokio::test]
async fn update_person_not_found() {
    let resp = app()
        .oneshot(json_request("PUT", "/updatePerson/nope", r#"{"name":"Nope"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_person_not_found() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/deletePerson/nope")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- batch delete ---

#[tokio::test]
async fn batch_delete_empty_is_noop() {
    let resp = app_with(seed_people())
        .oneshot(json_request("POST", "/batchDeletePersons", r#"{"ids":[]}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let result: OperationResult = body_json(resp).await;
    assert!(result.success);
    assert_eq!(result.message, "deleted 0 of 0 persons");
}

#[tokio::test]
async fn batch_delete_reports_partial_counts() {
    let resp = app_with(seed_people())
        .oneshot(json_request(
            "POST",
            "/batchDeletePersons",
            r#"{"ids":["1","2","missing"]}"#,
        ))
        .await
        .unwrap();

    let result: OperationResult = body_json(resp).await;
    assert!(!result.success);
    assert_eq!(result.message, "deleted 2 of 3 persons");
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/createPerson", NEW_PERSON))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: DetailResponse = body_json(resp).await;
    let id = created.data.id.clone();

    // list contains the one person
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/persons"))
        .await
        .unwrap();
    let list: ListResponse = body_json(resp).await;
    assert_eq!(list.total, 1);
    assert_eq!(list.data[0].id, id);

    // partial update: only position
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/updatePerson/{id}"),
            r#"{"position":"Staff Engineer"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: DetailResponse = body_json(resp).await;
    assert_eq!(updated.data.position, "Staff Engineer");
    assert_eq!(updated.data.name, "Ada"); // unchanged
    assert_eq!(updated.data.id, id);

    // get reflects the update
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/getPerson/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: DetailResponse = body_json(resp).await;
    assert_eq!(fetched.data, updated.data);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/deletePerson/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let result: OperationResult = body_json(resp).await;
    assert!(result.success);

    // get after delete: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/getPerson/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete: empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/persons"))
        .await
        .unwrap();
    let list: ListResponse = body_json(resp).await;
    assert!(list.data.is_empty());
}
