//! Router tests against a real PostgreSQL instance, covering the paths whose
//! outcome depends on what is stored. Run with:
//!
//! ```text
//! DATABASE_URL=postgres://postgres@localhost/postgres cargo test -p web-server -- --ignored
//! ```

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use core_types::StudentInput;
use database::DbRepository;
use sqlx::PgPool;
use tower::ServiceExt;
use web_server::{app, AppState};

struct Fixture {
    router: Router,
    repo: DbRepository,
    ana: i32,
    budi: i32,
}

async fn fixture(pool: PgPool) -> Fixture {
    let repo = DbRepository::new(pool);
    let ana = repo
        .create_student(&StudentInput {
            nim: "22001".to_string(),
            name: "Ana Putri".to_string(),
            score: 3.8,
        })
        .await
        .unwrap();
    let budi = repo
        .create_student(&StudentInput {
            nim: "22002".to_string(),
            name: "Budi Santoso".to_string(),
            score: 2.9,
        })
        .await
        .unwrap();
    let router = app(AppState {
        db_repo: repo.clone(),
    });
    Fixture {
        router,
        repo,
        ana,
        budi,
    }
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Sends a request and returns status, `Location` header (if any) and body.
async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, location, String::from_utf8(bytes.to_vec()).unwrap())
}

#[sqlx::test(migrations = "../database/migrations")]
#[ignore = "requires a PostgreSQL server via DATABASE_URL"]
async fn add_redirects_and_stores_the_student(pool: PgPool) {
    let fx = fixture(pool).await;

    let (status, location, _) = send(
        &fx.router,
        form_post("/add", "nama=Citra&nim=22003&nilai=4.0"),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));
    assert!(fx.repo.exists_by_nim("22003").await.unwrap());
}

#[sqlx::test(migrations = "../database/migrations")]
#[ignore = "requires a PostgreSQL server via DATABASE_URL"]
async fn add_with_taken_nim_shows_the_list_with_an_error(pool: PgPool) {
    let fx = fixture(pool).await;

    let (status, _, body) = send(
        &fx.router,
        form_post("/add", "nama=Someone&nim=22001&nilai=3"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("<h1>Student Records</h1>"));
    assert!(body.contains("NIM 22001 is already registered"));
    assert!(body.contains("Total: 2"));
}

#[sqlx::test(migrations = "../database/migrations")]
#[ignore = "requires a PostgreSQL server via DATABASE_URL"]
async fn delete_redirects_with_the_deleted_nim(pool: PgPool) {
    let fx = fixture(pool).await;

    let (status, location, _) =
        send(&fx.router, form_post("/delete", &format!("id={}", fx.ana))).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/?deleted=true&nim=22001"));
    assert!(!fx.repo.exists_by_nim("22001").await.unwrap());

    let (status, _, body) = send(&fx.router, get("/?deleted=true&nim=22001")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Student with NIM 22001 was deleted."));
    assert!(body.contains("Total: 1"));
}

#[sqlx::test(migrations = "../database/migrations")]
#[ignore = "requires a PostgreSQL server via DATABASE_URL"]
async fn unknown_ids_are_not_found(pool: PgPool) {
    let fx = fixture(pool).await;

    let (status, _, body) = send(&fx.router, form_post("/delete", "id=9999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Student not found"));
    assert!(body.contains("Total: 2"));

    let (status, _, body) = send(&fx.router, get("/edit/9999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("<h1>Student Records</h1>"));

    let (status, _, _) = send(
        &fx.router,
        form_post("/edit", "id=9999&nama=Nobody&nim=00000&nilai=1"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../database/migrations")]
#[ignore = "requires a PostgreSQL server via DATABASE_URL"]
async fn edit_page_shows_the_stored_record(pool: PgPool) {
    let fx = fixture(pool).await;

    let (status, _, body) = send(&fx.router, get(&format!("/edit/{}?success=true", fx.budi))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("value=\"Budi Santoso\""));
    assert!(body.contains("value=\"22002\""));
    assert!(body.contains("Student updated."));
}

#[sqlx::test(migrations = "../database/migrations")]
#[ignore = "requires a PostgreSQL server via DATABASE_URL"]
async fn update_to_another_students_nim_is_rejected(pool: PgPool) {
    let fx = fixture(pool).await;

    let (status, _, body) = send(
        &fx.router,
        form_post("/edit", &format!("id={}&nama=Ana+P&nim=22002&nilai=3.9", fx.ana)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("<h1>Edit Student</h1>"));
    assert!(body.contains("NIM 22002 is already registered"));
    // The submitted values are echoed; the stored record is untouched.
    assert!(body.contains("value=\"Ana P\""));
    assert_eq!(fx.repo.get_student(fx.ana).await.unwrap().nim, "22001");
}

#[sqlx::test(migrations = "../database/migrations")]
#[ignore = "requires a PostgreSQL server via DATABASE_URL"]
async fn update_keeping_own_nim_succeeds(pool: PgPool) {
    let fx = fixture(pool).await;

    let (status, _, body) = send(
        &fx.router,
        form_post("/edit", &format!("id={}&nama=Ana+Putri+S&nim=22001&nilai=4", fx.ana)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Student updated."));
    assert!(body.contains("value=\"Ana Putri S\""));

    let stored = fx.repo.get_student(fx.ana).await.unwrap();
    assert_eq!(stored.name, "Ana Putri S");
    assert_eq!(stored.score, 4.0);
}

#[sqlx::test(migrations = "../database/migrations")]
#[ignore = "requires a PostgreSQL server via DATABASE_URL"]
async fn index_sorts_and_searches(pool: PgPool) {
    let fx = fixture(pool).await;

    let (status, _, body) = send(&fx.router, get("/?sort_by=nilai&order=desc")).await;
    assert_eq!(status, StatusCode::OK);
    let ana = body.find("Ana Putri").unwrap();
    let budi = body.find("Budi Santoso").unwrap();
    assert!(ana < budi);

    let (status, _, body) = send(&fx.router, get("/?search=budi")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Total: 1"));
    assert!(body.contains("Budi Santoso"));

    let (_, _, body) = send(&fx.router, get("/?search=%20")).await;
    assert!(body.contains("Total: 0"));
}
