mod common;

use common::{bearer, body_json, client_with, store_with, ScriptedTransport, BASE_URL};
use reqwest::Method;
use serde_json::json;
use unitrack::api::UnitrackApi;
use unitrack::models::{NewGroup, NewStudent, NewSubject};
use unitrack::session::SessionStore;
use unitrack::UnitrackError;
use uuid::Uuid;

const SUBJECT_ID: &str = "0b9c3f4e-8a1d-4d7e-9c2b-5f6a7b8c9d01";
const GROUP_ID: &str = "1c2d3e4f-5a6b-4c7d-8e9f-0a1b2c3d4e5f";
const STUDENT_ID: &str = "2d3e4f5a-6b7c-4d8e-9f0a-1b2c3d4e5f60";
const SESSION_ID: &str = "3e4f5a6b-7c8d-4e9f-8a1b-2c3d4e5f6a7b";

fn subjects_payload() -> serde_json::Value {
    json!([{
        "id": SUBJECT_ID,
        "nombre": "Cálculo I",
        "codigo": "MAT101",
        "grupos": [{
            "id": GROUP_ID,
            "nombre": "Grupo A",
            "materia": SUBJECT_ID,
            "estudiantes": [
                {"id": STUDENT_ID, "nombre": "Ana Pérez", "studentId": "A001"}
            ],
            "sesiones": [{
                "id": SESSION_ID,
                "fecha": "2025-03-04T10:00:00Z",
                "nombre": "Sesión 1",
                "asistencias": [{"studentId": STUDENT_ID, "status": "Tarde"}],
                "grupo": GROUP_ID
            }]
        }]
    }])
}

#[tokio::test]
async fn test_login_stores_both_tokens_without_bearer() {
    let transport = ScriptedTransport::new();
    let store = store_with(None, None);
    transport.respond(200, json!({"access": "acc", "refresh": "ref"}));

    let api = UnitrackApi::new(client_with(&transport, &store));
    api.login(" docente@uni.edu ", "secret").await.unwrap();

    assert_eq!(store.access_token().as_deref(), Some("acc"));
    assert_eq!(store.refresh_token().as_deref(), Some("ref"));

    let sent = transport.sent_to("/api/auth/login/");
    assert_eq!(sent.len(), 1);
    assert_eq!(bearer(&sent[0]), None);
    assert_eq!(
        body_json(&sent[0]),
        json!({"email": "docente@uni.edu", "password": "secret"})
    );
}

#[tokio::test]
async fn test_login_accepts_bare_token_field() {
    let transport = ScriptedTransport::new();
    let store = store_with(None, Some("stale"));
    transport.respond(200, json!({"token": "legacy"}));

    let api = UnitrackApi::new(client_with(&transport, &store));
    api.login("docente@uni.edu", "secret").await.unwrap();

    assert_eq!(store.access_token().as_deref(), Some("legacy"));
    assert!(store.refresh_token().is_none());
}

#[tokio::test]
async fn test_login_failure_surfaces_server_message() {
    let transport = ScriptedTransport::new();
    let store = store_with(None, None);
    transport.respond(
        400,
        json!({"non_field_errors": ["No existe un usuario con ese correo."]}),
    );

    let api = UnitrackApi::new(client_with(&transport, &store));
    let err = api.login("nobody@uni.edu", "secret").await.unwrap_err();

    match err {
        UnitrackError::ApiError { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "No existe un usuario con ese correo.");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(!store.has_session());
}

#[tokio::test]
async fn test_login_requires_credentials_before_any_request() {
    let transport = ScriptedTransport::new();
    let store = store_with(None, None);

    let api = UnitrackApi::new(client_with(&transport, &store));
    let err = api.login("", "secret").await.unwrap_err();

    assert!(matches!(err, UnitrackError::InvalidInput(_)));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_logout_clears_session_even_when_server_fails() {
    let transport = ScriptedTransport::new();
    let store = store_with(Some("acc"), Some("ref"));
    transport.fail("connection refused");

    let api = UnitrackApi::new(client_with(&transport, &store));
    api.logout().await.unwrap();

    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
    assert_eq!(transport.sent_to("/api/auth/logout/").len(), 1);
}

#[tokio::test]
async fn test_list_subjects_decodes_nested_records() {
    let transport = ScriptedTransport::new();
    let store = store_with(Some("acc"), Some("ref"));
    transport.respond(200, subjects_payload());

    let api = UnitrackApi::new(client_with(&transport, &store));
    let subjects = api.list_subjects().await.unwrap();

    assert_eq!(subjects.len(), 1);
    let group = &subjects[0].groups[0];
    assert_eq!(group.name, "Grupo A");
    assert_eq!(group.subject_id.to_string(), SUBJECT_ID);
    assert_eq!(group.students[0].enrollment, "A001");
    assert_eq!(group.sessions[0].present_count(), 1);
}

#[tokio::test]
async fn test_list_subjects_refreshes_expired_token() {
    let transport = ScriptedTransport::new();
    let store = store_with(Some("expired"), Some("valid-refresh"));
    transport.respond_empty(401);
    transport.respond(200, json!({"access": "fresh-token"}));
    transport.respond(200, subjects_payload());

    let api = UnitrackApi::new(client_with(&transport, &store));
    let subjects = api.list_subjects().await.unwrap();

    assert_eq!(subjects.len(), 1);
    assert_eq!(store.access_token().as_deref(), Some("fresh-token"));
}

#[tokio::test]
async fn test_final_401_becomes_unauthorized_error() {
    let transport = ScriptedTransport::new();
    let store = store_with(Some("expired"), None);
    transport.respond(401, json!({"detail": "Given token not valid for any token type"}));

    let api = UnitrackApi::new(client_with(&transport, &store));
    let err = api.list_subjects().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(err.to_string().contains("Given token not valid"));
}

#[tokio::test]
async fn test_create_group_sends_subject_reference() {
    let transport = ScriptedTransport::new();
    let store = store_with(Some("acc"), None);
    transport.respond(
        201,
        json!({"id": GROUP_ID, "nombre": "Grupo B", "materia": SUBJECT_ID}),
    );

    let api = UnitrackApi::new(client_with(&transport, &store));
    let group = api
        .create_group(&NewGroup {
            name: "Grupo B".to_string(),
            subject_id: Uuid::parse_str(SUBJECT_ID).unwrap(),
        })
        .await
        .unwrap();

    assert!(group.students.is_empty());
    let sent = transport.sent_to("/api/grupos/");
    assert_eq!(sent[0].method, Method::POST);
    assert_eq!(body_json(&sent[0]), json!({"nombre": "Grupo B", "materia": SUBJECT_ID}));
}

#[tokio::test]
async fn test_create_subject_and_student_payloads() {
    let transport = ScriptedTransport::new();
    let store = store_with(Some("acc"), None);
    transport.respond(
        201,
        json!({"id": SUBJECT_ID, "nombre": "Probabilidad", "codigo": "EST201", "grupos": []}),
    );
    transport.respond(
        201,
        json!({"id": STUDENT_ID, "nombre": "Luis García", "studentId": "A002"}),
    );

    let api = UnitrackApi::new(client_with(&transport, &store));
    api.create_subject(&NewSubject {
        name: "Probabilidad".to_string(),
        code: "EST201".to_string(),
    })
    .await
    .unwrap();
    let student = api
        .create_student(&NewStudent {
            name: "Luis García".to_string(),
            enrollment: "A002".to_string(),
            group_id: Uuid::parse_str(GROUP_ID).unwrap(),
        })
        .await
        .unwrap();

    assert_eq!(student.enrollment, "A002");
    assert_eq!(
        body_json(&transport.sent_to("/api/materias/")[0]),
        json!({"nombre": "Probabilidad", "codigo": "EST201"})
    );
    assert_eq!(
        body_json(&transport.sent_to("/api/estudiantes/")[0]),
        json!({"nombre": "Luis García", "studentId": "A002", "grupo": GROUP_ID})
    );
}

#[tokio::test]
async fn test_update_session_goes_through_dispatch() {
    let transport = ScriptedTransport::new();
    let store = store_with(Some("expired"), Some("valid-refresh"));
    transport.respond(200, subjects_payload());
    transport.respond_empty(401);
    transport.respond(200, json!({"access": "fresh-token"}));
    transport.respond(200, json!({}));

    let api = UnitrackApi::new(client_with(&transport, &store));
    let subjects = api.list_subjects().await.unwrap();
    let session = subjects[0].groups[0].sessions[0].clone();
    let group_id = Uuid::parse_str(GROUP_ID).unwrap();

    api.update_session(group_id, &session).await.unwrap();

    let path = format!("/api/sesiones/{}/", SESSION_ID);
    let sent = transport.sent_to(&path);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].method, Method::PUT);
    assert_eq!(bearer(&sent[1]), Some("Bearer fresh-token"));
    assert_eq!(body_json(&sent[1])["grupo"], GROUP_ID);
}

#[tokio::test]
async fn test_snapshot_loads_all_collections() {
    let transport = ScriptedTransport::new();
    let store = store_with(Some("acc"), None);
    transport.respond(200, json!([]));
    transport.respond(200, json!([]));
    transport.respond(200, json!([]));

    let api = UnitrackApi::new(client_with(&transport, &store));
    let snapshot = api.snapshot().await.unwrap();

    assert!(snapshot.subjects.is_empty());
    assert_eq!(transport.sent().len(), 3);
    assert!(transport
        .sent()
        .iter()
        .all(|r| r.url.starts_with(BASE_URL) && bearer(r) == Some("Bearer acc")));
}
