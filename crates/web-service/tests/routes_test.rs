//! 路由集成测试
//!
//! 使用内存仓库和临时目录中的本地存储，通过 `oneshot` 直接调用路由。

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use database::{MemoryDatabase, ProjectRepositoryTrait};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use web_service::routes::create_app_router;
use web_service::services::ProjectService;
use web_service::storage::LocalStorage;
use web_service::AppState;

const BOUNDARY: &str = "portfolio-test-boundary";

struct TestApp {
    router: Router,
    db: MemoryDatabase,
    storage_root: TempDir,
}

impl TestApp {
    fn new() -> Self {
        let db = MemoryDatabase::new();
        let storage_root = tempfile::tempdir().unwrap();
        let project_service =
            ProjectService::new(db.clone(), db.clone(), db.clone(), LocalStorage::new(storage_root.path()));

        Self { router: create_app_router(AppState { project_service }), db, storage_root }
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    async fn multipart(&self, method: &str, uri: &str, form: MultipartForm) -> Response<Body> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(form.finish()))
            .unwrap();
        self.send(request).await
    }
}

/// 手工拼接 multipart 请求体
#[derive(Default)]
struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
        self
    }

    fn file(mut self, name: &str, file_name: &str, content_type: &str, content: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

fn new_project(title: &str) -> MultipartForm {
    MultipartForm::default()
        .text("title", title)
        .text("description", "A portfolio project")
        .file("thumb", "cover.png", "image/png", b"\x89PNG test image")
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn store_creates_project_with_unique_slug() {
    let app = TestApp::new();

    let first = app.multipart("POST", "/api/v1/projects", new_project("My Cool Project")).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(location(&first), "/api/v1/projects/my-cool-project");

    let second = app.multipart("POST", "/api/v1/projects", new_project("My Cool Project")).await;
    assert_eq!(second.status(), StatusCode::CREATED);
    assert_eq!(location(&second), "/api/v1/projects/my-cool-project-1");

    let body = json_body(second).await;
    assert_eq!(body["data"]["slug"], "my-cool-project-1");

    let thumb = body["data"]["thumb"].as_str().unwrap();
    assert!(thumb.starts_with("projects/"));
    assert!(app.storage_root.path().join(thumb).exists());
}

#[tokio::test]
async fn project_titled_create_stays_reachable() {
    let app = TestApp::new();

    let created = app.multipart("POST", "/api/v1/projects", new_project("Create")).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(location(&created), "/api/v1/projects/create-1");

    let shown = json_body(app.get("/api/v1/projects/create-1").await).await;
    assert_eq!(shown["data"]["title"], "Create");

    let form = MultipartForm::default().text("title", "Create Again").text("technologies[]", "");
    let updated = app.multipart("PUT", "/api/v1/projects/create-1", form).await;
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(location(&updated), "/api/v1/projects/create-again");

    let destroyed = app
        .send(Request::builder().method("DELETE").uri("/api/v1/projects/create-again").body(Body::empty()).unwrap())
        .await;
    assert_eq!(destroyed.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn store_with_long_title_fits_slug_column() {
    let app = TestApp::new();
    let title = "ß".repeat(255);

    app.multipart("POST", "/api/v1/projects", new_project(&title)).await;
    let second = app.multipart("POST", "/api/v1/projects", new_project(&title)).await;

    assert_eq!(second.status(), StatusCode::CREATED);
    let slug = json_body(second).await["data"]["slug"].as_str().unwrap().to_string();
    assert!(slug.ends_with("-1"));
    assert!(slug.len() <= 255);
}

#[tokio::test]
async fn store_without_thumb_is_rejected() {
    let app = TestApp::new();

    let form = MultipartForm::default().text("title", "Blog");
    let response = app.multipart("POST", "/api/v1/projects", form).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.db.list_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn show_returns_detail_or_null() {
    let app = TestApp::new();
    let web = app.db.add_type("Web").await;
    let rust = app.db.add_technology("Rust").await;

    let form = new_project("Blog")
        .text("type_id", &web.id.to_string())
        .text("release", "2024-06-01")
        .text("technologies[]", &rust.id.to_string());
    let created = app.multipart("POST", "/api/v1/projects", form).await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let response = app.get("/api/v1/projects/blog").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["title"], "Blog");
    assert_eq!(body["data"]["release"], "2024-06-01");
    assert_eq!(body["data"]["type"]["name"], "Web");
    assert_eq!(body["data"]["technologies"][0]["name"], "Rust");

    let missing = app.get("/api/v1/projects/missing").await;
    assert_eq!(missing.status(), StatusCode::OK);
    assert!(json_body(missing).await["data"].is_null());
}

#[tokio::test]
async fn update_renames_and_replaces_thumb() {
    let app = TestApp::new();
    let created = json_body(app.multipart("POST", "/api/v1/projects", new_project("Blog")).await).await;
    let old_thumb = created["data"]["thumb"].as_str().unwrap().to_string();

    let form = MultipartForm::default()
        .text("title", "Personal Blog")
        .text("technologies[]", "")
        .file("thumb", "new.jpg", "image/jpeg", b"jpeg bytes");
    let response = app.multipart("PATCH", "/api/v1/projects/blog", form).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(location(&response), "/api/v1/projects/personal-blog");

    let body = json_body(response).await;
    let new_thumb = body["data"]["thumb"].as_str().unwrap();
    assert!(new_thumb.ends_with(".jpg"));
    assert!(app.storage_root.path().join(new_thumb).exists());
    assert!(!app.storage_root.path().join(&old_thumb).exists());
}

#[tokio::test]
async fn update_with_empty_values_clears_fields() {
    let app = TestApp::new();
    let web = app.db.add_type("Web").await;
    let form = new_project("Blog")
        .text("link", "https://example.com")
        .text("release", "2024-06-01")
        .text("type_id", &web.id.to_string());
    app.multipart("POST", "/api/v1/projects", form).await;

    let form = MultipartForm::default()
        .text("description", "")
        .text("link", "")
        .text("technologies[]", "");
    let response = app.multipart("PUT", "/api/v1/projects/blog", form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(app.get("/api/v1/projects/blog").await).await;
    assert!(body["data"]["description"].is_null());
    assert!(body["data"]["link"].is_null());
    assert_eq!(body["data"]["release"], "2024-06-01");
    assert_eq!(body["data"]["type"]["name"], "Web");

    let form = MultipartForm::default()
        .text("release", "")
        .text("type_id", "")
        .text("technologies[]", "");
    app.multipart("PATCH", "/api/v1/projects/blog", form).await;

    let body = json_body(app.get("/api/v1/projects/blog").await).await;
    assert!(body["data"]["release"].is_null());
    assert!(body["data"]["type"].is_null());
}

#[tokio::test]
async fn update_requires_technologies() {
    let app = TestApp::new();
    app.multipart("POST", "/api/v1/projects", new_project("Blog")).await;

    let form = MultipartForm::default().text("title", "Renamed");
    let response = app.multipart("PUT", "/api/v1/projects/blog", form).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(app.get("/api/v1/projects/blog").await).await;
    assert_eq!(body["data"]["title"], "Blog");
}

#[tokio::test]
async fn update_and_destroy_unknown_project_are_not_found() {
    let app = TestApp::new();

    let form = MultipartForm::default().text("technologies[]", "");
    let update = app.multipart("PUT", "/api/v1/projects/missing", form).await;
    assert_eq!(update.status(), StatusCode::NOT_FOUND);

    let destroy = app
        .send(Request::builder().method("DELETE").uri("/api/v1/projects/missing").body(Body::empty()).unwrap())
        .await;
    assert_eq!(destroy.status(), StatusCode::NOT_FOUND);

    assert_eq!(app.get("/api/v1/projects/missing/edit").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn destroy_redirects_and_hides_project() {
    let app = TestApp::new();
    let created = json_body(app.multipart("POST", "/api/v1/projects", new_project("Blog")).await).await;
    let thumb = created["data"]["thumb"].as_str().unwrap().to_string();

    let response = app
        .send(Request::builder().method("DELETE").uri("/api/v1/projects/blog").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/api/v1/projects");
    assert!(!app.storage_root.path().join(&thumb).exists());

    let list = json_body(app.get("/api/v1/projects").await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 0);
    assert!(app.db.find_project_with_trashed("blog").await.is_some());
}

#[tokio::test]
async fn form_endpoints_list_options() {
    let app = TestApp::new();
    app.db.add_type("Web").await;
    app.db.add_technology("Rust").await;
    app.db.add_technology("Vue").await;

    let create = json_body(app.get("/api/v1/projects/create").await).await;
    assert_eq!(create["data"]["types"].as_array().unwrap().len(), 1);
    assert_eq!(create["data"]["technologies"].as_array().unwrap().len(), 2);

    app.multipart("POST", "/api/v1/projects", new_project("Blog")).await;
    let edit = json_body(app.get("/api/v1/projects/blog/edit").await).await;
    assert_eq!(edit["data"]["project"]["slug"], "blog");
    assert_eq!(edit["data"]["technologies"].as_array().unwrap().len(), 2);

    let technologies = json_body(app.get("/api/v1/technologies").await).await;
    assert_eq!(technologies["data"][1]["name"], "Vue");

    let types = json_body(app.get("/api/v1/types").await).await;
    assert_eq!(types["data"][0]["name"], "Web");
}
