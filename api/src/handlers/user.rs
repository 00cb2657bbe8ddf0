use crate::db::find_by_id_mut;
use crate::errors::ApiError;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::{BoxInfo, PublicProfile, SaveBoxInfoRequest, VerifyResponse};
use crate::state::AppState;
use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

/// `GET /user`. The caller's public profile.
///
/// A valid token for a user that has since vanished from the store is a 404,
/// not a 401. The token itself is fine.
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PublicProfile>, ApiError> {
    let users = state.users.load().await;
    let user = users
        .iter()
        .find(|u| u.id == auth.user_id)
        .ok_or_else(user_not_found)?;

    Ok(Json(user.profile()))
}

/// `GET /verify-token`. If the extractor let us in, the token is good.
pub async fn verify_token(_auth: AuthenticatedUser) -> Json<VerifyResponse> {
    Json(VerifyResponse { is_valid: true })
}

pub async fn get_box_info(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<BoxInfo>, ApiError> {
    let users = state.users.load().await;
    let user = users
        .iter()
        .find(|u| u.id == auth.user_id)
        .ok_or_else(user_not_found)?;

    Ok(Json(BoxInfo::from(user)))
}

/// `POST /user/saveBoxInfo`.
///
/// With `isReset` the grid goes back to 100 empty boxes and everything else in
/// the body is ignored. Otherwise missing fields keep their stored value.
/// Indices beyond `totalSquares` are stored as-is.
pub async fn save_box_info(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    WithRejection(Json(payload), _): WithRejection<Json<SaveBoxInfoRequest>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let mut users = state.users.load().await;
    let user = find_by_id_mut(&mut users, &auth.user_id).ok_or_else(user_not_found)?;

    if payload.is_reset {
        user.reset_boxes();
    } else {
        if let Some(total) = payload.total_squares {
            user.total_squares = total;
        }
        if let Some(selection) = payload.selected_squares {
            user.selected_squares = selection;
        }
    }

    let info = BoxInfo::from(&*user);
    tracing::debug!(
        user_id = %auth.user_id,
        reset = payload.is_reset,
        total = info.total_squares,
        selected = %info.selected_squares,
        "saving box state"
    );

    state.users.save(&users).await.map_err(ApiError::internal)?;

    Ok(Json(json!({
        "status": "success",
        "message": if payload.is_reset { "Box info reset" } else { "Box info saved" },
        "totalSquares": info.total_squares,
        "selectedSquares": info.selected_squares,
    })))
}
