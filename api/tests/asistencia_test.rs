mod helpers;

use api::auth::generate_jwt;
use axum::http::StatusCode;
use chrono::Utc;
use db::models::{
    aprendiz::Model as AprendizModel,
    asistencia_cambio::Model as CambioModel,
    ficha::Model as FichaModel,
    ficha_aprendiz::Model as FichaAprendizModel,
    user::{Model as UserModel, Role},
};
use helpers::app::{bearer_request, body_json, make_test_app};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower::ServiceExt;

struct Ctx {
    instructor_token: String,
    aprendiz_token: String,
    ficha: FichaModel,
    aprendices: Vec<AprendizModel>,
}

async fn setup(db: &DatabaseConnection) -> Ctx {
    let instructor = UserModel::create(
        db,
        "instructor1",
        "instructor1@sena.edu.co",
        "password",
        Role::Instructor,
    )
    .await
    .unwrap();
    let aprendiz_user = UserModel::create(
        db,
        "aprendiz1",
        "aprendiz1@misena.edu.co",
        "password",
        Role::Aprendiz,
    )
    .await
    .unwrap();

    let ficha = FichaModel::create(db, "2558104", "Análisis y Desarrollo de Software")
        .await
        .unwrap();

    let mut aprendices = Vec::new();
    for (doc, nombres, apellidos) in [
        ("1001", "Laura", "Arango"),
        ("1002", "Mateo", "Builes"),
        ("1003", "Valentina", "Correa"),
    ] {
        let a = AprendizModel::create(db, doc, nombres, apellidos, None)
            .await
            .unwrap();
        FichaAprendizModel::assign(db, ficha.id, a.id).await.unwrap();
        aprendices.push(a);
    }

    Ctx {
        instructor_token: generate_jwt(instructor.id, instructor.role).0,
        aprendiz_token: generate_jwt(aprendiz_user.id, aprendiz_user.role).0,
        ficha,
        aprendices,
    }
}

#[tokio::test]
async fn registrar_creates_record_and_rejects_duplicate() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;
    let hoy = Utc::now().date_naive();

    let body = json!({
        "id_aprendiz": ctx.aprendices[0].id,
        "id_ficha": ctx.ficha.id,
        "estado": "presente",
        "fecha": hoy.to_string(),
    });

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/asistencia/registrar",
            &ctx.instructor_token,
            body.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["estado"], "presente");

    // Same aprendiz, ficha and fecha again: conflict.
    let resp = app
        .oneshot(bearer_request(
            "POST",
            "/api/asistencia/registrar",
            &ctx.instructor_token,
            body,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let json = body_json(resp).await;
    assert_eq!(json["error_type"], "duplicate");
}

#[tokio::test]
async fn registrar_rejects_future_date() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;
    let manana = Utc::now().date_naive() + chrono::Duration::days(1);

    let resp = app
        .oneshot(bearer_request(
            "POST",
            "/api/asistencia/registrar",
            &ctx.instructor_token,
            json!({
                "id_aprendiz": ctx.aprendices[0].id,
                "id_ficha": ctx.ficha.id,
                "estado": "presente",
                "fecha": manana.to_string(),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registrar_forbidden_for_aprendiz_role() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;

    let resp = app
        .oneshot(bearer_request(
            "POST",
            "/api/asistencia/registrar",
            &ctx.aprendiz_token,
            json!({
                "id_aprendiz": ctx.aprendices[0].id,
                "id_ficha": ctx.ficha.id,
                "estado": "presente",
                "fecha": Utc::now().date_naive().to_string(),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn guardar_reports_partial_failures() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;
    let hoy = Utc::now().date_naive();

    let body = json!({
        "id_ficha": ctx.ficha.id,
        "fecha": hoy.to_string(),
        "asistencias": [
            { "id_aprendiz": ctx.aprendices[0].id, "estado": "presente" },
            { "id_aprendiz": ctx.aprendices[1].id, "estado": "ausente" },
            { "id_aprendiz": 999_999, "estado": "presente" },
        ],
    });

    let resp = app
        .oneshot(bearer_request(
            "POST",
            "/api/asistencia/guardar",
            &ctx.instructor_token,
            body,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["data"]["guardadas"], 2);
    assert_eq!(json["data"]["errores"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["errores"][0]["error_type"], "not_found");
}

#[tokio::test]
async fn roster_merges_attendance_into_member_list() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;
    let hoy = Utc::now().date_naive();

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/asistencia/registrar",
            &ctx.instructor_token,
            json!({
                "id_aprendiz": ctx.aprendices[0].id,
                "id_ficha": ctx.ficha.id,
                "estado": "tardanza",
                "fecha": hoy.to_string(),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let uri = format!("/api/asistencia/aprendices/{}?fecha={hoy}", ctx.ficha.id);
    let resp = app
        .oneshot(bearer_request("GET", &uri, &ctx.instructor_token, json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let roster = json["data"].as_array().unwrap();
    assert_eq!(roster.len(), 3);

    let marcado = roster
        .iter()
        .find(|r| r["id_aprendiz"] == ctx.aprendices[0].id)
        .unwrap();
    assert_eq!(marcado["estado"], "tardanza");
    let sin_marcar = roster
        .iter()
        .find(|r| r["id_aprendiz"] == ctx.aprendices[1].id)
        .unwrap();
    assert!(sin_marcar["estado"].is_null());
}

#[tokio::test]
async fn cambiar_estado_updates_and_audits() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;
    let hoy = Utc::now().date_naive();

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/asistencia/registrar",
            &ctx.instructor_token,
            json!({
                "id_aprendiz": ctx.aprendices[0].id,
                "id_ficha": ctx.ficha.id,
                "estado": "ausente",
                "fecha": hoy.to_string(),
            }),
        ))
        .await
        .unwrap();
    let creado = body_json(resp).await;
    let id = creado["data"]["id"].as_i64().unwrap();

    let resp = app
        .oneshot(bearer_request(
            "PUT",
            &format!("/api/asistencia/{id}"),
            &ctx.instructor_token,
            json!({ "estado": "presente", "motivo": "Llegó con excusa médica" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["no_change"], false);

    let cambios = CambioModel::for_asistencia(app_state.db(), id).await.unwrap();
    assert_eq!(cambios.len(), 1);
    assert_eq!(cambios[0].motivo, "Llegó con excusa médica");
    assert_eq!(cambios[0].ip.as_deref(), Some("192.168.0.7"));
}

#[tokio::test]
async fn cambiar_estado_requires_motivo() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;
    let hoy = Utc::now().date_naive();

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/asistencia/registrar",
            &ctx.instructor_token,
            json!({
                "id_aprendiz": ctx.aprendices[0].id,
                "id_ficha": ctx.ficha.id,
                "estado": "ausente",
                "fecha": hoy.to_string(),
            }),
        ))
        .await
        .unwrap();
    let creado = body_json(resp).await;
    let id = creado["data"]["id"].as_i64().unwrap();

    let resp = app
        .oneshot(bearer_request(
            "PUT",
            &format!("/api/asistencia/{id}"),
            &ctx.instructor_token,
            json!({ "estado": "presente", "motivo": "   " }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
