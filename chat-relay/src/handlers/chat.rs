use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::models::{ChatRequest, ChatResponse};
use crate::services::RelayError;
use crate::startup::AppState;

/// `POST /chat`: relay one message and its history to the model.
///
/// A body that is not a JSON object of the expected shape is treated the
/// same as a blank message.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, RelayError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejecting malformed chat payload");
            return Err(RelayError::InvalidInput);
        }
    };

    state.relay.relay(request).await.map(Json)
}
