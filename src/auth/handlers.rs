use axum::{
    extract::{rejection::FormRejection, rejection::JsonRejection, FromRef, State},
    routing::{get, post},
    Form, Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, MessageResponse, PublicUser, RegisterRequest, TokenResponse},
        jwt::{AuthUser, JwtKeys},
        services::{authenticate_user, create_user},
    },
    error::{ApiError, ApiResult},
    state::AppState,
    validation::{normalize_email, validate_email_format, validate_password_strength},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/user/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(payload) = payload?;
    let email = normalize_email(&payload.email);

    validate_email_format(&email).inspect_err(|_| warn!(%email, "invalid email"))?;
    validate_password_strength(&payload.password)
        .inspect_err(|_| warn!(%email, "weak password"))?;

    let name = payload.name.trim().to_string();
    let user = create_user(state.store.as_ref(), name, email, &payload.password)
        .await
        .map_err(|e| {
            warn!(error = %e, "registration failed");
            ApiError::Unexpected(format!("Error registering user: {e}"))
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(MessageResponse {
        message: format!("User {} registered successfully", user.name),
    }))
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Form(form) = form?;
    let email = normalize_email(&form.username);

    let Some(user) = authenticate_user(state.store.as_ref(), &email, &form.password).await? else {
        warn!(%email, "login failed");
        return Err(ApiError::Authentication);
    };

    let token = JwtKeys::from_ref(&state).sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<PublicUser>> {
    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| {
            warn!(%user_id, "token subject no longer exists");
            ApiError::Unauthorized("Could not validate credentials".into())
        })?;

    Ok(Json(PublicUser {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}
