mod helpers;

use api::auth::generate_jwt;
use axum::http::StatusCode;
use db::models::{
    aprendiz::Model as AprendizModel,
    ficha::Model as FichaModel,
    ficha_aprendiz::Model as FichaAprendizModel,
    qr_token::Entity as QrTokenEntity,
    user::{Model as UserModel, Role},
};
use helpers::app::{bearer_request, body_json, make_test_app};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::json;
use tower::ServiceExt;

struct Ctx {
    portero_token: String,
    ficha: FichaModel,
    aprendiz: AprendizModel,
}

async fn setup(db: &DatabaseConnection) -> Ctx {
    let portero = UserModel::create(
        db,
        "portero1",
        "portero1@sena.edu.co",
        "password",
        Role::Portero,
    )
    .await
    .unwrap();

    let ficha = FichaModel::create(db, "2558106", "Mesa y Bar").await.unwrap();
    let aprendiz = AprendizModel::create(db, "3001", "Pedro", "Mejía", None)
        .await
        .unwrap();
    FichaAprendizModel::assign(db, ficha.id, aprendiz.id)
        .await
        .unwrap();

    Ctx {
        portero_token: generate_jwt(portero.id, portero.role).0,
        ficha,
        aprendiz,
    }
}

#[tokio::test]
async fn generar_then_procesar_records_attendance_once() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/qr/generar",
            &ctx.portero_token,
            json!({ "id_aprendiz": ctx.aprendiz.id }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let json = body_json(resp).await;
    let payload = json["data"]["payload"].as_str().unwrap().to_owned();
    assert_eq!(json["data"]["token"].as_str().unwrap().len(), 64);
    assert_eq!(json["data"]["email_sent"], false);

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/qr/procesar",
            &ctx.portero_token,
            json!({ "payload": payload }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let json = body_json(resp).await;
    assert_eq!(json["data"]["id_aprendiz"], ctx.aprendiz.id);
    assert_eq!(json["data"]["id_ficha"], ctx.ficha.id);
    assert!(json["data"]["time_remaining_seconds"].as_i64().unwrap() > 0);

    // Single use: a second scan of the same payload conflicts.
    let resp = app
        .oneshot(bearer_request(
            "POST",
            "/api/qr/procesar",
            &ctx.portero_token,
            json!({ "payload": payload }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let json = body_json(resp).await;
    assert_eq!(json["error_type"], "duplicate");
}

#[tokio::test]
async fn procesar_rejects_unknown_and_malformed_payloads() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/qr/procesar",
            &ctx.portero_token,
            json!({ "payload": format!("{}|{}|2026-08-29", "ab".repeat(32), ctx.aprendiz.id) }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .oneshot(bearer_request(
            "POST",
            "/api/qr/procesar",
            &ctx.portero_token,
            json!({ "payload": "sin-separadores" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn procesar_needs_ficha_when_membership_is_ambiguous() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;

    let otra = FichaModel::create(app_state.db(), "2558107", "Panadería")
        .await
        .unwrap();
    FichaAprendizModel::assign(app_state.db(), otra.id, ctx.aprendiz.id)
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/qr/generar",
            &ctx.portero_token,
            json!({ "id_aprendiz": ctx.aprendiz.id }),
        ))
        .await
        .unwrap();
    let payload = body_json(resp).await["data"]["payload"]
        .as_str()
        .unwrap()
        .to_owned();

    // Without id_ficha the scan is rejected as ambiguous.
    let resp = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/qr/procesar",
            &ctx.portero_token,
            json!({ "payload": payload }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The rejection did not consume the token; an explicit ficha works.
    let resp = app
        .oneshot(bearer_request(
            "POST",
            "/api/qr/procesar",
            &ctx.portero_token,
            json!({ "payload": payload, "id_ficha": otra.id }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn generar_fails_when_email_requested_without_address() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;

    // The seeded aprendiz has no email on file.
    let resp = app
        .oneshot(bearer_request(
            "POST",
            "/api/qr/generar",
            &ctx.portero_token,
            json!({ "id_aprendiz": ctx.aprendiz.id, "enviar_email": true }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = body_json(resp).await;
    assert_eq!(json["error_type"], "validation");

    // No token was spent on the failed request.
    let tokens = QrTokenEntity::find().all(app_state.db()).await.unwrap();
    assert!(tokens.is_empty());
}

#[tokio::test]
async fn generar_forbidden_without_capability() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;

    let instructor = UserModel::create(
        app_state.db(),
        "instructor2",
        "instructor2@sena.edu.co",
        "password",
        Role::Instructor,
    )
    .await
    .unwrap();
    let (token, _) = generate_jwt(instructor.id, instructor.role);

    let resp = app
        .oneshot(bearer_request(
            "POST",
            "/api/qr/generar",
            &token,
            json!({ "id_aprendiz": ctx.aprendiz.id }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn historial_diario_lists_scans() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/qr/generar",
            &ctx.portero_token,
            json!({ "id_aprendiz": ctx.aprendiz.id }),
        ))
        .await
        .unwrap();
    let payload = body_json(resp).await["data"]["payload"]
        .as_str()
        .unwrap()
        .to_owned();

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/qr/procesar",
            &ctx.portero_token,
            json!({ "payload": payload }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let hoy = chrono::Utc::now().date_naive();
    let uri = format!("/api/qr/historial-diario?ficha_id={}&fecha={hoy}", ctx.ficha.id);
    let resp = app
        .oneshot(bearer_request("GET", &uri, &ctx.portero_token, json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let registros = json["data"].as_array().unwrap();
    assert_eq!(registros.len(), 1);
    assert_eq!(registros[0]["id_aprendiz"], ctx.aprendiz.id);
}
