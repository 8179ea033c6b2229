use std::sync::Arc;

use crate::{
    error::Error,
    wrappers::{Config as ConfigHwprojHttp, StudentMarks, TeacherMarks},
};
use axum::{
    Extension, Json, Router,
    extract::Path,
    http::StatusCode,
    routing::{get, post},
};
use hwproj_bridge::Bridge;
use tower::ServiceBuilder;

use crate::doc::ApiDoc;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Register Student
///
/// Registers a student on a subject. The student and the subject entry are
/// created when missing; registering twice changes nothing.
///
/// # Parameters
///
/// * `Extension(bridge): Extension<Arc<Bridge>>` - The Bridge extension wrapped in an `Arc`.
/// * `Path((student, subject)): Path<(String, String)>` - Student and subject names.
///
/// # Returns
///
/// * `StatusCode` - Always `200 OK`.
#[utoipa::path(
    post,
    path = "/students/{student}/register/{subject}",
    operation_id = "Register Student",
    tag = "Student",
    params(
        ("student" = String, Path, description = "Student name"),
        ("subject" = String, Path, description = "Subject name"),
    ),
    responses(
        (status = 200, description = "Student registered on the subject"),
    )
)]
async fn register_student_on_subject(
    Extension(bridge): Extension<Arc<Bridge>>,
    Path((student, subject)): Path<(String, String)>,
) -> StatusCode {
    bridge.register_student_on_subject(&student, &subject);
    StatusCode::OK
}

/// Student Marks
///
/// Allows obtaining every mark of a student grouped by subject.
///
/// # Parameters
///
/// * `Extension(bridge): Extension<Arc<Bridge>>` - The Bridge extension wrapped in an `Arc`.
/// * `Path(student): Path<String>` - Student name.
///
/// # Returns
///
/// * `Result<Json<StudentMarks>, Error>` - Marks by subject, or not found if the student was never registered.
#[utoipa::path(
    get,
    path = "/students/{student}/marks",
    operation_id = "Student Marks",
    tag = "Student",
    params(
        ("student" = String, Path, description = "Student name"),
    ),
    responses(
        (status = 200, description = "Marks by subject", body = StudentMarks,
        example = json!(
            {
                "math": [5, 7],
                "physics": []
            }
        )),
        (status = 404, description = "Unknown student"),
    )
)]
async fn get_student_marks(
    Extension(bridge): Extension<Arc<Bridge>>,
    Path(student): Path<String>,
) -> Result<Json<StudentMarks>, Error> {
    match bridge.get_marks(&student) {
        Some(marks) => Ok(Json(StudentMarks::from(marks))),
        None => Err(Error::NotFound(format!("Unknown student {}", student))),
    }
}

/// Student Marks On Subject
///
/// Allows obtaining the marks of a student on one subject, in the order they
/// were given.
///
/// # Parameters
///
/// * `Extension(bridge): Extension<Arc<Bridge>>` - The Bridge extension wrapped in an `Arc`.
/// * `Path((student, subject)): Path<(String, String)>` - Student and subject names.
///
/// # Returns
///
/// * `Result<Json<Vec<i32>>, Error>` - The marks, or not found if the student is not registered on the subject.
#[utoipa::path(
    get,
    path = "/students/{student}/marks/{subject}",
    operation_id = "Student Marks On Subject",
    tag = "Student",
    params(
        ("student" = String, Path, description = "Student name"),
        ("subject" = String, Path, description = "Subject name"),
    ),
    responses(
        (status = 200, description = "Marks on the subject", body = [i32],
        example = json!([5, 7])),
        (status = 404, description = "Unknown student or subject"),
    )
)]
async fn get_student_marks_on_subject(
    Extension(bridge): Extension<Arc<Bridge>>,
    Path((student, subject)): Path<(String, String)>,
) -> Result<Json<Vec<i32>>, Error> {
    match bridge.get_marks_from_subject(&student, &subject) {
        Some(marks) => Ok(Json(marks)),
        None => Err(Error::NotFound(format!(
            "Student {} is not registered on {}",
            student, subject
        ))),
    }
}

/// Student Average On Subject
///
/// # Parameters
///
/// * `Extension(bridge): Extension<Arc<Bridge>>` - The Bridge extension wrapped in an `Arc`.
/// * `Path((student, subject)): Path<(String, String)>` - Student and subject names.
///
/// # Returns
///
/// * `Result<Json<f64>, Error>` - The mean of the marks. Not found if the student is not registered on the subject or has no marks on it.
#[utoipa::path(
    get,
    path = "/students/{student}/marks/{subject}/avg",
    operation_id = "Student Average On Subject",
    tag = "Student",
    params(
        ("student" = String, Path, description = "Student name"),
        ("subject" = String, Path, description = "Subject name"),
    ),
    responses(
        (status = 200, description = "Average mark", body = f64,
        example = json!(6.0)),
        (status = 404, description = "Unknown student or subject, or no marks yet"),
    )
)]
async fn get_student_marks_on_subject_avg(
    Extension(bridge): Extension<Arc<Bridge>>,
    Path((student, subject)): Path<(String, String)>,
) -> Result<Json<f64>, Error> {
    match bridge.get_marks_from_subject_avg(&student, &subject) {
        Some(avg) => Ok(Json(avg)),
        None => Err(Error::NotFound(format!(
            "No marks for student {} on {}",
            student, subject
        ))),
    }
}

/// Set Mark
///
/// A teacher gives a mark to a student on the teacher's subject. The mark is
/// silently dropped when the teacher is unknown or the student is not
/// registered on that subject.
///
/// # Parameters
///
/// * `Extension(bridge): Extension<Arc<Bridge>>` - The Bridge extension wrapped in an `Arc`.
/// * `Path((teacher, student, mark)): Path<(String, String, i32)>` - Teacher, student and mark.
///
/// # Returns
///
/// * `StatusCode` - Always `200 OK`.
#[utoipa::path(
    post,
    path = "/teachers/{teacher}/marks/{student}/{mark}",
    operation_id = "Set Mark",
    tag = "Teacher",
    params(
        ("teacher" = String, Path, description = "Teacher name"),
        ("student" = String, Path, description = "Student name"),
        ("mark" = i32, Path, description = "Mark"),
    ),
    responses(
        (status = 200, description = "Mark accepted"),
        (status = 400, description = "Mark is not an integer"),
    )
)]
async fn set_mark_to_student(
    Extension(bridge): Extension<Arc<Bridge>>,
    Path((teacher, student, mark)): Path<(String, String, i32)>,
) -> StatusCode {
    bridge.set_mark_to_student(&teacher, &student, mark);
    StatusCode::OK
}

/// Assign Subject
///
/// Sets the subject of a teacher, replacing the previous one.
///
/// # Parameters
///
/// * `Extension(bridge): Extension<Arc<Bridge>>` - The Bridge extension wrapped in an `Arc`.
/// * `Path((teacher, subject)): Path<(String, String)>` - Teacher and subject names.
///
/// # Returns
///
/// * `StatusCode` - Always `200 OK`.
#[utoipa::path(
    post,
    path = "/teachers/{teacher}/register/{subject}",
    operation_id = "Assign Subject",
    tag = "Teacher",
    params(
        ("teacher" = String, Path, description = "Teacher name"),
        ("subject" = String, Path, description = "Subject name"),
    ),
    responses(
        (status = 200, description = "Subject assigned"),
    )
)]
async fn add_subject(
    Extension(bridge): Extension<Arc<Bridge>>,
    Path((teacher, subject)): Path<(String, String)>,
) -> StatusCode {
    bridge.add_subject(&teacher, &subject);
    StatusCode::OK
}

/// Teacher Marks
///
/// Allows obtaining the marks of every student registered on the teacher's
/// subject. Unknown teachers get an empty object.
///
/// # Parameters
///
/// * `Extension(bridge): Extension<Arc<Bridge>>` - The Bridge extension wrapped in an `Arc`.
/// * `Path(teacher): Path<String>` - Teacher name.
///
/// # Returns
///
/// * `Json<TeacherMarks>` - Marks by student.
#[utoipa::path(
    get,
    path = "/teachers/{teacher}/marks",
    operation_id = "Teacher Marks",
    tag = "Teacher",
    params(
        ("teacher" = String, Path, description = "Teacher name"),
    ),
    responses(
        (status = 200, description = "Marks by student", body = TeacherMarks,
        example = json!(
            {
                "alice": [5, 7],
                "carol": []
            }
        )),
    )
)]
async fn get_marks_by_teacher(
    Extension(bridge): Extension<Arc<Bridge>>,
    Path(teacher): Path<String>,
) -> Json<TeacherMarks> {
    Json(TeacherMarks::from(bridge.get_marks_by_teacher(&teacher)))
}

/// Config
///
/// Allows obtaining the effective configuration of the service.
#[utoipa::path(
    get,
    path = "/config",
    operation_id = "Config",
    tag = "Other",
    responses(
        (status = 200, description = "Effective configuration", body = ConfigHwprojHttp),
    )
)]
async fn get_config(
    Extension(bridge): Extension<Arc<Bridge>>,
) -> Json<ConfigHwprojHttp> {
    Json(ConfigHwprojHttp::from(bridge.config()))
}

pub fn build_routes(bridge: Bridge, doc: bool) -> Router {
    let bridge = Arc::new(bridge);
    let routes = Router::new()
        .route(
            "/students/{student}/register/{subject}",
            post(register_student_on_subject),
        )
        .route("/students/{student}/marks", get(get_student_marks))
        .route(
            "/students/{student}/marks/{subject}",
            get(get_student_marks_on_subject),
        )
        .route(
            "/students/{student}/marks/{subject}/avg",
            get(get_student_marks_on_subject_avg),
        )
        .route(
            "/teachers/{teacher}/marks/{student}/{mark}",
            post(set_mark_to_student),
        )
        .route("/teachers/{teacher}/register/{subject}", post(add_subject))
        .route("/teachers/{teacher}/marks", get(get_marks_by_teacher))
        .route("/teachers/{teacher}/marks/", get(get_marks_by_teacher))
        .route("/config", get(get_config))
        .layer(ServiceBuilder::new().layer(Extension(bridge)));

    if doc {
        Router::new().merge(routes).merge(
            RapiDoc::with_openapi("/doc/hwprojapi.json", ApiDoc::openapi())
                .path("/doc"),
        )
    } else {
        Router::new().merge(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request},
    };
    use hwproj_bridge::Config;
    use serde_json::{Value, json};
    use test_log::test;
    use tower::ServiceExt;

    async fn routes() -> Router {
        let bridge = Bridge::build(Config::default(), None).await.unwrap();
        build_routes(bridge, false)
    }

    async fn call(
        routes: &Router,
        method: Method,
        uri: &str,
    ) -> (StatusCode, Option<Value>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = routes.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if body.is_empty() {
            None
        } else {
            serde_json::from_slice(&body).ok()
        };

        (status, value)
    }

    #[test(tokio::test)]
    async fn test_alice_and_bob_scenario() {
        let routes = routes().await;

        let (status, body) =
            call(&routes, Method::POST, "/students/alice/register/math").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_none());

        let (status, _) =
            call(&routes, Method::POST, "/teachers/bob/register/math").await;
        assert_eq!(status, StatusCode::OK);

        for mark in [5, 7] {
            let uri = format!("/teachers/bob/marks/alice/{}", mark);
            let (status, _) = call(&routes, Method::POST, &uri).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) =
            call(&routes, Method::GET, "/students/alice/marks/math").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Some(json!([5, 7])));

        let (status, body) =
            call(&routes, Method::GET, "/students/alice/marks/math/avg").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Some(json!(6.0)));

        let (status, body) =
            call(&routes, Method::GET, "/students/alice/marks").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Some(json!({ "math": [5, 7] })));

        for uri in ["/teachers/bob/marks", "/teachers/bob/marks/"] {
            let (status, body) = call(&routes, Method::GET, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, Some(json!({ "alice": [5, 7] })));
        }
    }

    #[test(tokio::test)]
    async fn test_not_found_differs_from_empty() {
        let routes = routes().await;

        let (status, _) =
            call(&routes, Method::GET, "/students/unknown_student/marks").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        call(&routes, Method::POST, "/students/alice/register/math").await;

        let (status, body) =
            call(&routes, Method::GET, "/students/alice/marks/math").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Some(json!([])));

        let (status, _) =
            call(&routes, Method::GET, "/students/alice/marks/art").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) =
            call(&routes, Method::GET, "/students/alice/marks/math/avg").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) =
            call(&routes, Method::GET, "/teachers/nobody/marks").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Some(json!({})));
    }

    #[test(tokio::test)]
    async fn test_dropped_mark_still_succeeds() {
        let routes = routes().await;
        call(&routes, Method::POST, "/students/alice/register/art").await;
        call(&routes, Method::POST, "/teachers/bob/register/math").await;

        let (status, _) =
            call(&routes, Method::POST, "/teachers/bob/marks/alice/5").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) =
            call(&routes, Method::POST, "/teachers/nobody/marks/alice/5").await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) =
            call(&routes, Method::GET, "/students/alice/marks").await;
        assert_eq!(body, Some(json!({ "art": [] })));
    }

    #[test(tokio::test)]
    async fn test_negative_mark_and_invalid_mark() {
        let routes = routes().await;
        call(&routes, Method::POST, "/students/alice/register/math").await;
        call(&routes, Method::POST, "/teachers/bob/register/math").await;

        let (status, _) =
            call(&routes, Method::POST, "/teachers/bob/marks/alice/-3").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) =
            call(&routes, Method::POST, "/teachers/bob/marks/alice/five").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) =
            call(&routes, Method::GET, "/students/alice/marks/math").await;
        assert_eq!(body, Some(json!([-3])));
    }

    #[test(tokio::test)]
    async fn test_reassigned_teacher_roster() {
        let routes = routes().await;
        call(&routes, Method::POST, "/students/alice/register/math").await;
        call(&routes, Method::POST, "/students/carol/register/physics").await;
        call(&routes, Method::POST, "/teachers/bob/register/math").await;
        call(&routes, Method::POST, "/teachers/bob/register/physics").await;

        let (_, body) =
            call(&routes, Method::GET, "/teachers/bob/marks").await;
        assert_eq!(body, Some(json!({ "carol": [] })));
    }

    #[test(tokio::test)]
    async fn test_config() {
        let routes = routes().await;

        let (status, body) = call(&routes, Method::GET, "/config").await;
        assert_eq!(status, StatusCode::OK);

        let body = body.unwrap();
        assert_eq!(body["prometheus"], json!(""));
        assert_eq!(body["logging"]["rotation"], json!("size"));
        assert_eq!(body["logging"]["output"]["stdout"], json!(true));
    }

    #[test(tokio::test)]
    async fn test_doc_routes() {
        let bridge = Bridge::build(Config::default(), None).await.unwrap();

        let without_doc = build_routes(bridge.clone(), false);
        let (status, _) =
            call(&without_doc, Method::GET, "/doc/hwprojapi.json").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let with_doc = build_routes(bridge, true);
        let (status, body) =
            call(&with_doc, Method::GET, "/doc/hwprojapi.json").await;
        assert_eq!(status, StatusCode::OK);
        let body = body.unwrap();
        assert!(body["paths"]["/students/{student}/marks"].is_object());
        assert!(body["paths"]["/teachers/{teacher}/marks"].is_object());
    }
}
