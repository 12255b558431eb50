mod helpers;

use api::auth::generate_jwt;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use db::models::{
    aprendiz::Model as AprendizModel,
    ficha::Model as FichaModel,
    ficha_aprendiz::Model as FichaAprendizModel,
    user::{Model as UserModel, Role},
};
use helpers::app::{bearer_request, body_json, make_test_app};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower::ServiceExt;

struct Ctx {
    coordinador_token: String,
    ficha: FichaModel,
    aprendices: Vec<AprendizModel>,
}

async fn setup(db: &DatabaseConnection) -> Ctx {
    let coordinador = UserModel::create(
        db,
        "coord1",
        "coord1@sena.edu.co",
        "password",
        Role::Coordinador,
    )
    .await
    .unwrap();

    let ficha = FichaModel::create(db, "2558105", "Cocina").await.unwrap();

    let mut aprendices = Vec::new();
    for (doc, nombres, apellidos) in [("2001", "Sara", "Acosta"), ("2002", "Julián", "Bedoya")] {
        let a = AprendizModel::create(db, doc, nombres, apellidos, None)
            .await
            .unwrap();
        FichaAprendizModel::assign(db, ficha.id, a.id).await.unwrap();
        aprendices.push(a);
    }

    Ctx {
        coordinador_token: generate_jwt(coordinador.id, coordinador.role).0,
        ficha,
        aprendices,
    }
}

#[tokio::test]
async fn tipos_returns_fixed_catalog() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;

    let resp = app
        .oneshot(bearer_request(
            "GET",
            "/api/asistencia/anomalia/tipos",
            &ctx.coordinador_token,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let tipos = json["data"].as_array().unwrap();
    assert_eq!(tipos.len(), 2);
    assert_eq!(tipos[0]["code"], "falla_no_justificada");
    assert_eq!(tipos[1]["code"], "falla_justificada");
}

#[tokio::test]
async fn registrar_aprendiz_within_window() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;
    // Two days ago: still inside the three-day grace window.
    let fecha = Utc::now().date_naive() - Duration::days(2);

    let body = json!({
        "id_aprendiz": ctx.aprendices[0].id,
        "id_ficha": ctx.ficha.id,
        "fecha_asistencia": fecha.to_string(),
        "tipo": "falla_justificada",
        "descripcion": "Cita médica con soporte",
    });

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/asistencia/anomalia/aprendiz",
            &ctx.coordinador_token,
            body.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["tipo"], "falla_justificada");

    // Same type for the same aprendiz and date: conflict.
    let resp = app
        .oneshot(bearer_request(
            "POST",
            "/api/asistencia/anomalia/aprendiz",
            &ctx.coordinador_token,
            body,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn registrar_aprendiz_outside_window_fails() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;
    let fecha = Utc::now().date_naive() - Duration::days(4);

    let resp = app
        .oneshot(bearer_request(
            "POST",
            "/api/asistencia/anomalia/aprendiz",
            &ctx.coordinador_token,
            json!({
                "id_aprendiz": ctx.aprendices[0].id,
                "id_ficha": ctx.ficha.id,
                "fecha_asistencia": fecha.to_string(),
                "tipo": "falla_no_justificada",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = body_json(resp).await;
    assert_eq!(json["error_type"], "window_expired");
}

#[tokio::test]
async fn registrar_ficha_broadcasts_to_non_present_members() {
    let (app, app_state) = make_test_app().await;
    let ctx = setup(app_state.db()).await;
    let hoy = Utc::now().date_naive();

    // First aprendiz was present; only the second (no record) is covered.
    db::models::asistencia::Model::record(
        app_state.db(),
        db::models::asistencia::NuevaAsistencia {
            aprendiz_id: ctx.aprendices[0].id,
            ficha_id: ctx.ficha.id,
            fecha: hoy,
            estado: db::models::asistencia::EstadoAsistencia::Presente,
            observaciones: None,
            registrado_por: 1,
        },
        Utc::now(),
    )
    .await
    .unwrap();

    let resp = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/asistencia/anomalia/ficha",
            &ctx.coordinador_token,
            json!({
                "id_ficha": ctx.ficha.id,
                "fecha_asistencia": hoy.to_string(),
                "tipo": "falla_no_justificada",
                "descripcion": "Paro de transporte",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Umbrella row plus one per affected aprendiz.
    let json = body_json(resp).await;
    assert_eq!(json["data"]["anomalies_created"], 2);
    assert_eq!(json["data"]["students_affected"], 1);

    let uri = format!(
        "/api/asistencia/anomalias?ficha_id={}&fecha={hoy}",
        ctx.ficha.id
    );
    let resp = app
        .oneshot(bearer_request("GET", &uri, &ctx.coordinador_token, json!({})))
        .await
        .unwrap();
    let json = body_json(resp).await;
    let listado = json["data"].as_array().unwrap();
    assert_eq!(listado.len(), 2);
    assert!(listado.iter().any(|a| a["id_aprendiz"].is_null()));
}
