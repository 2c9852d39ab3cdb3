use consulta_engine::traits::GatewayError;
use consulta_providers::request::HttpRequest;
use consulta_providers::runtime::{self, HttpResponse};

// Keep error payloads displayable without dumping a whole HTML error page.
const MAX_DETAIL_LEN: usize = 512;

/// Runs one request and folds transport and status outcomes into the
/// gateway taxonomy: 401/403 mean the credential was rejected, any other
/// non-2xx (or a network failure) is a transport problem.
pub async fn execute_checked(req: &HttpRequest) -> Result<Vec<u8>, GatewayError> {
    log::debug!("gateway call: {req:?}");

    let HttpResponse { status, body } =
        runtime::execute(req)
            .await
            .map_err(|e| GatewayError::TransportFailed {
                status: None,
                detail: e.to_string(),
            })?;

    log::debug!("gateway response: status={status} body_len={}", body.len());

    match status {
        401 | 403 => Err(GatewayError::AuthenticationFailed),
        s if !(200..=299).contains(&s) => Err(GatewayError::TransportFailed {
            status: Some(s),
            detail: truncate_detail(&body),
        }),
        _ => Ok(body),
    }
}

fn truncate_detail(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut detail: String = text.chars().take(MAX_DETAIL_LEN).collect();
    if text.chars().count() > MAX_DETAIL_LEN {
        detail.push('…');
    }
    detail
}
