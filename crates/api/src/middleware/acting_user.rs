//! Acting-user extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use breakdown_core::error::CoreError;
use breakdown_core::types::DbId;
use breakdown_db::repositories::UserRepo;

use crate::error::AppError;
use crate::state::AppState;

/// The user a request acts on behalf of.
///
/// Resolves the single configured user by email. Every movie-scoped
/// operation takes this id explicitly:
///
/// ```ignore
/// async fn my_handler(user: ActingUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ActingUser {
    pub user_id: DbId,
    pub email: String,
}

impl FromRequestParts<AppState> for ActingUser {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let email = &state.config.acting_user_email;
        let user = UserRepo::find_by_email(&state.pool, email)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Internal(format!(
                    "Acting user '{email}' does not exist"
                )))
            })?;

        Ok(ActingUser {
            user_id: user.id,
            email: user.email,
        })
    }
}
