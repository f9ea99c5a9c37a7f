use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use super::common::*;
use crate::applications::application_router;
use crate::uploads::testing::{pdf_bytes, MultipartBody};

fn application_form(email: &str, mobile: &str) -> MultipartBody {
    MultipartBody::new()
        .text("fullname", "Jane Doe")
        .text("email", email)
        .text("mobile", mobile)
        .text("coverLetter", "hi")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn submit_returns_created_then_duplicate() {
    let fixture = fixture().await;
    let app = application_router(fixture.service.clone());

    let response = app
        .clone()
        .oneshot(
            application_form("JANE@x.com", "9876543210")
                .file("resume", "cv.pdf", "application/pdf", &pdf_bytes())
                .into_request("/applyjobs/J1"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Job application submitted successfully");
    assert_eq!(body["application"]["email"], "jane@x.com");
    assert_eq!(body["application"]["jobId"], "J1");
    assert!(body["application"]["resumeUrl"]
        .as_str()
        .expect("resume url")
        .starts_with("/uploads/"));
    assert!(body["application"]["appliedAt"].is_string());

    let repeated = app
        .oneshot(
            application_form("jane@x.com", "9876543210")
                .file("resume", "cv.pdf", "application/pdf", &pdf_bytes())
                .into_request("/applyjobs/J1"),
        )
        .await
        .expect("router responds");
    assert_eq!(repeated.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(repeated).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "duplicate");
    assert_eq!(fixture.stored_files().len(), 1);
}

#[tokio::test]
async fn short_mobile_is_rejected_without_a_record() {
    let fixture = fixture().await;
    let app = application_router(fixture.service.clone());

    let response = app
        .clone()
        .oneshot(
            application_form("jane@x.com", "12345")
                .file("resume", "cv.pdf", "application/pdf", &pdf_bytes())
                .into_request("/applyjobs/J1"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await["error"], "format");

    let listed = app
        .oneshot(get("/applications/J1"))
        .await
        .expect("router responds");
    let body = read_json_body(listed).await;
    assert_eq!(body["count"], 0);
    assert!(fixture.stored_files().is_empty());
}

#[tokio::test]
async fn stored_resume_takes_the_extension_of_its_content_type() {
    let fixture = fixture().await;
    let app = application_router(fixture.service.clone());

    let response = app
        .oneshot(
            application_form("jane@x.com", "9876543210")
                .file(
                    "resume",
                    "cv.html",
                    "application/pdf",
                    b"<script>alert(1)</script>",
                )
                .into_request("/applyjobs/J1"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    let resume_url = body["application"]["resumeUrl"]
        .as_str()
        .expect("resume url");
    assert!(resume_url.ends_with(".pdf"), "{resume_url}");

    let stored = fixture.stored_files();
    assert_eq!(stored.len(), 1);
    assert_eq!(
        stored[0].extension().and_then(|ext| ext.to_str()),
        Some("pdf")
    );
}

#[tokio::test]
async fn upload_errors_keep_distinct_kinds() {
    let fixture = fixture().await;
    let app = application_router(fixture.service.clone());

    let cases = [
        (
            application_form("a@x.com", "9876543210")
                .file("resume", "cv.txt", "text/plain", b"plain text"),
            "file_type_invalid",
        ),
        (
            application_form("b@x.com", "9876543210")
                .file("resume", "a.pdf", "application/pdf", &pdf_bytes())
                .file("resume", "b.pdf", "application/pdf", &pdf_bytes()),
            "too_many_files",
        ),
        (
            application_form("c@x.com", "9876543210").file(
                "resume",
                "big.pdf",
                "application/pdf",
                &vec![b'%'; 5 * 1024 * 1024 + 1],
            ),
            "file_too_large",
        ),
        (
            application_form("d@x.com", "9876543210").file(
                "portfolio",
                "cv.pdf",
                "application/pdf",
                &pdf_bytes(),
            ),
            "upload",
        ),
        (application_form("e@x.com", "9876543210"), "missing_file"),
    ];

    for (form, expected) in cases {
        let response = app
            .clone()
            .oneshot(form.into_request("/applyjobs/J1"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{expected}");
        assert_eq!(read_json_body(response).await["error"], expected);
    }
    assert!(fixture.stored_files().is_empty());
}

#[tokio::test]
async fn non_multipart_bodies_are_upload_errors() {
    let fixture = fixture().await;
    let response = application_router(fixture.service.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/applyjobs/J1")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"fullname":"Jane Doe"}"#))
                .expect("request"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await["error"], "upload");
}

#[tokio::test]
async fn listing_and_detail_join_the_job() {
    let fixture = fixture().await;
    let job = seed_job(&fixture.database, "Platform Engineer").await;
    let app = application_router(fixture.service.clone());

    let created = app
        .clone()
        .oneshot(
            application_form("jane@x.com", "9876543210")
                .file("resume", "cv.docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document", b"PK")
                .into_request(&format!("/applyjobs/{}", job.id)),
        )
        .await
        .expect("router responds");
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = read_json_body(created).await;
    assert_eq!(created["application"]["job"]["title"], "Platform Engineer");
    let id = created["application"]["id"]
        .as_str()
        .expect("application id")
        .to_string();

    let listed = app
        .clone()
        .oneshot(get(&format!("/applications/{}", job.id)))
        .await
        .expect("router responds");
    assert_eq!(listed.status(), StatusCode::OK);
    let listed = read_json_body(listed).await;
    assert_eq!(listed["success"], true);
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["applications"][0]["job"]["location"], "Hyderabad");
    assert!(listed["applications"][0]["resumeUrl"]
        .as_str()
        .expect("resume url")
        .ends_with(".docx"));

    let detail = app
        .clone()
        .oneshot(get(&format!("/application/{id}")))
        .await
        .expect("router responds");
    assert_eq!(detail.status(), StatusCode::OK);
    let detail = read_json_body(detail).await;
    assert_eq!(
        detail["application"]["job"]["description"],
        "Design resilient services"
    );
    assert_eq!(detail["application"]["coverLetter"], "hi");

    let missing = app
        .oneshot(get("/application/nope"))
        .await
        .expect("router responds");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json_body(missing).await["error"], "not_found");
}
