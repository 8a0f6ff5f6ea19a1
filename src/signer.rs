//! Request signing.
//!
//! Kayako authenticates each call with three parameters: the public API key,
//! a random salt, and a signature computed as
//!
//! ```text
//! urlencode(base64(HMAC-SHA256(key = secret, message = decimal(salt))))
//! ```
//!
//! The server recomputes the same value from the salt it receives, so the
//! decimal string used as HMAC input must be byte-identical to the `salt`
//! parameter that goes on the wire.

use base64::Engine;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Parameter name for the API key.
pub const API_KEY_PARAM: &str = "apiKey";
/// Parameter name for the salt.
pub const SALT_PARAM: &str = "salt";
/// Parameter name for the signature.
pub const SIGNATURE_PARAM: &str = "signature";

/// API key and shared secret for one Kayako account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    secret_key: String,
}

impl Credentials {
    /// Creates credentials from an API key and its shared secret.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Returns the public API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the shared secret.
    ///
    /// Only for signing and log redaction.
    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Authentication parameters for exactly one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedParams {
    /// The public API key.
    pub api_key: String,
    /// The salt the signature was computed over.
    pub salt: u32,
    /// The percent-encoded base64 HMAC digest.
    pub signature: String,
}

impl SignedParams {
    /// Returns the salt exactly as it was fed to the HMAC.
    pub fn salt_param(&self) -> String {
        self.salt.to_string()
    }

    /// Converts into `(name, value)` request parameters.
    pub fn into_params(self) -> [(&'static str, String); 3] {
        let salt = self.salt_param();
        [
            (API_KEY_PARAM, self.api_key),
            (SALT_PARAM, salt),
            (SIGNATURE_PARAM, self.signature),
        ]
    }
}

/// Produces [`SignedParams`] from a set of credentials.
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
}

impl Signer {
    /// Creates a signer for the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Returns the credentials this signer uses.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Signs with a freshly drawn salt.
    ///
    /// The salt is taken from the thread-local RNG, so concurrent callers
    /// never share generator state.
    pub fn sign(&self) -> SignedParams {
        let salt = rand::thread_rng().gen_range(0..=i32::MAX as u32);
        self.sign_with_salt(salt)
    }

    /// Signs with a caller-chosen salt. Deterministic.
    pub fn sign_with_salt(&self, salt: u32) -> SignedParams {
        let signature = compute_signature(self.credentials.secret_key(), &salt.to_string());
        SignedParams {
            api_key: self.credentials.api_key().to_string(),
            salt,
            signature,
        }
    }
}

/// Computes the wire signature for a salt rendered as text.
pub fn compute_signature(secret_key: &str, salt: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(salt.as_bytes());
    let digest = mac.finalize().into_bytes();

    let encoded = base64::engine::general_purpose::STANDARD.encode(digest);
    urlencoding::encode(&encoded).into_owned()
}
