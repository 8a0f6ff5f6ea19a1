//! Status-code classification of raw responses.

use crate::error::KayakoError;
use crate::logger::Logger;
use crate::transport::RawResponse;

/// Splits responses into success, client error, and server error.
///
/// - below 400: returned unchanged
/// - 400 to 499: `KayakoError::Client`
/// - 500 and above: `KayakoError::Server`
///
/// Errors are logged at error level before being returned. The logged line
/// carries status and reason only; the body goes into the error value,
/// truncated.
pub fn classify(response: RawResponse, logger: &dyn Logger) -> Result<RawResponse, KayakoError> {
    if response.status < 400 {
        return Ok(response);
    }

    let message = format!(
        "Kayako responded with error ({} - {}).",
        response.status, response.reason
    );
    logger.error(&message);

    let body = KayakoError::truncate_body(&response.body);
    if response.status >= 500 {
        return Err(KayakoError::Server {
            message: format!("{}\n{}", message, body),
            status: Some(response.status),
        });
    }

    Err(KayakoError::Client {
        status: response.status,
        reason: response.reason,
        body,
    })
}
