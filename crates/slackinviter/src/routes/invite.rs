use axum::{
    extract::{Extension, Form, State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::debug;

use slackinviter_core::{InviteRequest, RejectionKind};

use crate::middleware::ClientAddr;
use crate::state::AppState;

/// Fields posted by the invite form. Absent fields are empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InviteForm {
    pub fname: String,
    pub lname: String,
    pub email: String,
    pub coc: String,
    #[serde(rename = "g-recaptcha-response")]
    pub captcha_response: String,
}

/// Run admission. `200` with an empty body on success; otherwise the
/// rejection message as plain text with `412` or `500`.
pub async fn invite_handler(
    State(state): State<AppState>,
    Extension(ClientAddr(remote_addr)): Extension<ClientAddr>,
    form: Result<Form<InviteForm>, FormRejection>,
) -> Response {
    let form = form.map_or_else(
        |rejection| {
            debug!(%rejection, "unreadable invite form, treating as empty");
            InviteForm::default()
        },
        |Form(form)| form,
    );

    let request = InviteRequest {
        first_name: form.fname,
        last_name: form.lname,
        email: form.email,
        coc: form.coc,
        captcha_response: form.captcha_response,
        remote_addr,
    };

    match state.admission.admit(&request).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            let status = match e.kind() {
                RejectionKind::Precondition => StatusCode::PRECONDITION_FAILED,
                RejectionKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string()).into_response()
        }
    }
}
