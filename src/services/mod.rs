//! Entity services.
//!
//! Each service is a thin list of endpoint paths on top of
//! [`BaseService`](crate::service::BaseService): it picks the path and
//! parameters, and maps the response into models.

mod department;
mod ticket;
mod user;

pub use department::*;
pub use ticket::*;
pub use user::*;

use crate::error::KayakoError;
use crate::xml::Parsed;

/// Unwraps a response that must contain exactly one model.
pub(crate) fn expect_single<T>(parsed: Parsed<T>, what: &str) -> Result<T, KayakoError> {
    match parsed {
        Parsed::Single(item) => Ok(item),
        Parsed::Many(items) => Err(KayakoError::parse(format!(
            "expected exactly one {} in response, found {}",
            what,
            items.len()
        ))),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use reqwest::Method;

    use crate::error::TransportError;
    use crate::logger::NullLogger;
    use crate::service::ServiceConfig;
    use crate::signer::Credentials;
    use crate::transport::{Params, RawResponse, Transport};

    /// Transport that answers every call with the same body.
    pub(crate) struct CannedTransport {
        pub(crate) status: u16,
        pub(crate) body: String,
        pub(crate) sent: Mutex<Vec<(Method, Params)>>,
    }

    impl CannedTransport {
        pub(crate) fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.to_string(),
                sent: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn last(&self) -> (Method, Params) {
            self.sent.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn send(
            &self,
            method: Method,
            _address: &str,
            params: &Params,
        ) -> Result<RawResponse, TransportError> {
            self.sent.lock().unwrap().push((method, params.clone()));
            Ok(RawResponse::new(self.status, "Status", self.body.clone()))
        }
    }

    pub(crate) fn config(transport: Arc<CannedTransport>) -> ServiceConfig {
        ServiceConfig::new(
            transport,
            Arc::new(NullLogger),
            "https://helpdesk.example.com/api/index.php",
            Credentials::new("api-key", "secret-key"),
        )
    }
}
