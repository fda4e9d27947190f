//! Master-key request signing.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use tally_core::error::{Result, TallyError};

type HmacSha256 = Hmac<Sha256>;

/// API version sent with every request.
pub const API_VERSION: &str = "2018-12-31";

/// `x-ms-date` value for the current instant (RFC 1123, GMT).
pub fn request_date() -> String {
    chrono::Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Build the URL-encoded `authorization` header value.
///
/// `resource_link` is the unencoded link of the addressed resource (for
/// document creates, the owning collection).
pub fn master_key_token(
    verb: &str,
    resource_type: &str,
    resource_link: &str,
    date: &str,
    key: &[u8],
) -> Result<String> {
    let payload = format!(
        "{}\n{}\n{}\n{}\n\n",
        verb.to_lowercase(),
        resource_type.to_lowercase(),
        resource_link,
        date.to_lowercase()
    );

    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| TallyError::Internal(format!("signing key rejected: {e}")))?;
    mac.update(payload.as_bytes());
    let sig = STANDARD.encode(mac.finalize().into_bytes());

    Ok(urlencoding::encode(&format!("type=master&ver=1.0&sig={sig}")).into_owned())
}
