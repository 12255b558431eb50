use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::generate_jwt;
use crate::response::ApiResponse;
use crate::routes::common::domain_error;
use db::models::user::{Model as UserModel, Role};
use util::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Default)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Option<Role>,
}

#[derive(Serialize, Default)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: UserInfo,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> (StatusCode, Json<ApiResponse<LoginResponse>>) {
    let db = state.db();

    match UserModel::verify_credentials(db, &body.username, &body.password).await {
        Ok(user) => {
            let (token, expires_at) = generate_jwt(user.id, user.role);
            tracing::info!(user = user.id, "Login");
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    LoginResponse {
                        token,
                        expires_at,
                        user: UserInfo {
                            id: user.id,
                            username: user.username,
                            email: user.email,
                            role: Some(user.role),
                        },
                    },
                    "Autenticación exitosa",
                )),
            )
        }
        Err(e) => domain_error(e),
    }
}
