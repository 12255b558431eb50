mod helpers;

use api::auth::generate_jwt;
use axum::http::StatusCode;
use db::models::user::{Model as UserModel, Role};
use helpers::app::{bearer_request, body_json, make_test_app};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower::ServiceExt;

async fn admin_token(db: &DatabaseConnection) -> String {
    let admin = UserModel::create(db, "admin1", "admin1@sena.edu.co", "password", Role::Admin)
        .await
        .unwrap();
    generate_jwt(admin.id, admin.role).0
}

fn turnos_body() -> serde_json::Value {
    json!({
        "turnos": [
            {
                "nombre": "manana",
                "hora_inicio": "07:00:00",
                "hora_fin": "13:00:00",
                "hora_limite_llegada": "07:20:00",
                "active": true
            },
            {
                "nombre": "tarde",
                "hora_inicio": "13:00:00",
                "hora_fin": "19:00:00",
                "hora_limite_llegada": "13:20:00",
                "active": true
            },
            {
                "nombre": "noche",
                "hora_inicio": "19:00:00",
                "hora_fin": "23:00:00",
                "hora_limite_llegada": "19:20:00",
                "active": false
            }
        ]
    })
}

#[tokio::test]
async fn horarios_lists_seeded_shifts() {
    let (app, app_state) = make_test_app().await;
    let token = admin_token(app_state.db()).await;

    let resp = app
        .oneshot(bearer_request(
            "GET",
            "/api/configuracion/horarios",
            &token,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let turnos = json["data"].as_array().unwrap();
    assert_eq!(turnos.len(), 3);
    assert_eq!(turnos[0]["nombre"], "manana");
}

#[tokio::test]
async fn actualizar_horarios_applies_batch() {
    let (app, app_state) = make_test_app().await;
    let token = admin_token(app_state.db()).await;

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "PUT",
            "/api/configuracion/horarios",
            &token,
            turnos_body(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let turnos = json["data"].as_array().unwrap();
    assert_eq!(turnos[0]["hora_inicio"], "07:00:00");
    assert_eq!(turnos[2]["active"], false);
}

#[tokio::test]
async fn actualizar_horarios_rejects_limit_before_start() {
    let (app, app_state) = make_test_app().await;
    let token = admin_token(app_state.db()).await;

    // Morning cutoff earlier than the shift start: whole batch rejected.
    let mut body = turnos_body();
    body["turnos"][0]["hora_limite_llegada"] = json!("06:30:00");

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "PUT",
            "/api/configuracion/horarios",
            &token,
            body,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Nothing was written: defaults survive.
    let resp = app
        .oneshot(bearer_request(
            "GET",
            "/api/configuracion/horarios",
            &token,
            json!({}),
        ))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"][0]["hora_inicio"], "06:00:00");
}

#[tokio::test]
async fn horarios_forbidden_for_non_admin() {
    let (app, app_state) = make_test_app().await;
    let coordinador = UserModel::create(
        app_state.db(),
        "coord2",
        "coord2@sena.edu.co",
        "password",
        Role::Coordinador,
    )
    .await
    .unwrap();
    let (token, _) = generate_jwt(coordinador.id, coordinador.role);

    let resp = app
        .oneshot(bearer_request(
            "GET",
            "/api/configuracion/horarios",
            &token,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
