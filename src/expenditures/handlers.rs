use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{dto::MessageResponse, repo_types::User},
    error::{ApiError, ApiResult},
    expenditures::{
        dto::{AddExpenditureRequest, EmailQuery, ExpenditureAdded, UpdateExpenditureRequest},
        repo_types::{iso_date, Expenditure, ExpenditureChanges, NewExpenditure},
    },
    state::AppState,
    validation::{normalize_email, require_email_param, validate_email_format, validate_value},
};

pub fn expenditure_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/expenditure",
            post(add_expenditure)
                .get(list_expenditures)
                .fallback(method_not_allowed),
        )
        .route(
            "/update/expenditure",
            put(update_expenditure).fallback(method_not_allowed),
        )
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn find_owner(state: &AppState, email: &str) -> ApiResult<User> {
    state
        .store
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Email not found: {email}")))
}

#[instrument(skip(state, payload))]
pub async fn add_expenditure(
    State(state): State<AppState>,
    payload: Result<Json<AddExpenditureRequest>, JsonRejection>,
) -> ApiResult<Json<ExpenditureAdded>> {
    let Json(payload) = payload?;
    let email = normalize_email(&payload.email_id);
    validate_email_format(&email)?;
    let owner = find_owner(&state, &email).await?;
    validate_value(payload.value)?;

    let exp = state
        .store
        .add_expenditure(NewExpenditure {
            email: owner.email,
            item_type: payload.item_type,
            value: payload.value,
            annotation: payload.annotation,
            date: payload.date,
        })
        .await?;

    info!(id = %exp.id, email = %exp.email, "expenditure added");
    Ok(Json(ExpenditureAdded {
        message: "Expenditure added successfully!".into(),
        id: exp.id,
    }))
}

#[instrument(skip(state, query))]
pub async fn list_expenditures(
    State(state): State<AppState>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Expenditure>>> {
    let Query(query) = query?;
    let email = require_email_param(query.email.as_deref())?;
    let owner = find_owner(&state, &email).await?;
    let rows = state.store.list_expenditures(&owner.email).await?;
    Ok(Json(rows))
}

/// The email checks run before the body is looked at, so a missing
/// `email` is reported even when the body is unusable.
#[instrument(skip(state, query, payload))]
pub async fn update_expenditure(
    State(state): State<AppState>,
    query: Result<Query<EmailQuery>, QueryRejection>,
    payload: Result<Json<UpdateExpenditureRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Query(query) = query?;
    let email = require_email_param(query.email.as_deref())?;
    let owner = find_owner(&state, &email).await?;
    let Json(payload) = payload?;
    validate_value(payload.value)?;

    let date = payload.date;
    let changes = ExpenditureChanges {
        item_type: payload.item_type,
        value: payload.value,
        annotation: payload.annotation,
        date,
    };
    let Some(exp) = state
        .store
        .update_expenditure(&owner.email, date, changes)
        .await?
    else {
        let day = iso_date::format(&date).unwrap_or_else(|_| date.to_string());
        warn!(email = %owner.email, date = %day, "no expenditure on date");
        return Err(ApiError::NotFound(format!(
            "No expenditure found for {} on {day}",
            owner.email
        )));
    };

    info!(id = %exp.id, email = %exp.email, "expenditure updated");
    Ok(Json(MessageResponse {
        message: "Expenditure updated successfully!".into(),
    }))
}
