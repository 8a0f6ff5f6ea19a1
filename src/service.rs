//! Request orchestration shared by every entity service.
//!
//! [`BaseService`] runs each call through the same pipeline:
//!
//! 1. merge the action path (`e`) and fresh signing parameters into the
//!    caller's parameters,
//! 2. send through the [`Transport`],
//! 3. log the body at debug level, then classify the status,
//! 4. optionally decode the body as XML and map it into models.
//!
//! Network failures are reported as `KayakoError::Server`: the request
//! never reached the point where the remote side could reject it.
//!
//! The body is logged before classification, so a debug line showing a body
//! is not proof that the call succeeded.

use std::fmt;
use std::sync::Arc;

use reqwest::Method;

use crate::classifier::classify;
use crate::error::KayakoError;
use crate::logger::Logger;
use crate::signer::{Credentials, Signer};
use crate::transport::{Params, Transport};
use crate::xml::{FromXml, Parsed, XmlDocument, XmlElement};

/// Reserved parameter naming the remote action. Callers cannot override it.
pub const ACTION_PARAM: &str = "e";

/// Everything a service needs to talk to one Kayako instance.
#[derive(Clone)]
pub struct ServiceConfig {
    /// HTTP transport, shared between services.
    pub transport: Arc<dyn Transport>,
    /// Sink for debug and error lines.
    pub logger: Arc<dyn Logger>,
    /// Address of the REST endpoint.
    pub address: String,
    /// API key and secret.
    pub credentials: Credentials,
}

impl ServiceConfig {
    /// Creates a service configuration.
    pub fn new(
        transport: Arc<dyn Transport>,
        logger: Arc<dyn Logger>,
        address: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            transport,
            logger,
            address: address.into(),
            credentials,
        }
    }

    /// Returns a copy with other credentials.
    pub fn with_credentials(&self, credentials: Credentials) -> Self {
        Self {
            credentials,
            ..self.clone()
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("address", &self.address)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Signing, dispatch, and classification for Kayako API calls.
#[derive(Clone)]
pub struct BaseService {
    transport: Arc<dyn Transport>,
    logger: Arc<dyn Logger>,
    address: String,
    signer: Signer,
}

impl fmt::Debug for BaseService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseService")
            .field("address", &self.address)
            .field("credentials", self.signer.credentials())
            .finish_non_exhaustive()
    }
}

impl BaseService {
    /// Creates a service from its configuration.
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            transport: config.transport,
            logger: config.logger,
            address: config.address,
            signer: Signer::new(config.credentials),
        }
    }

    /// Returns the address requests are sent to.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the credentials requests are signed with.
    pub fn credentials(&self) -> &Credentials {
        self.signer.credentials()
    }

    /// Sends a GET request and returns the raw body.
    pub async fn get(&self, path: &str, params: Params) -> Result<String, KayakoError> {
        self.request(Method::GET, path, params).await
    }

    /// Sends a POST request and returns the raw body.
    pub async fn post(&self, path: &str, params: Params) -> Result<String, KayakoError> {
        self.request(Method::POST, path, params).await
    }

    /// Sends a PUT request and returns the raw body.
    pub async fn put(&self, path: &str, params: Params) -> Result<String, KayakoError> {
        self.request(Method::PUT, path, params).await
    }

    /// Sends a DELETE request and returns the raw body.
    pub async fn delete(&self, path: &str, params: Params) -> Result<String, KayakoError> {
        self.request(Method::DELETE, path, params).await
    }

    /// Signs and sends a request, returning the body of a successful response.
    ///
    /// # Errors
    ///
    /// - `KayakoError::Server` if the transport failed or the status is 5xx
    /// - `KayakoError::Client` if the status is 4xx
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: Params,
    ) -> Result<String, KayakoError> {
        let params = self.prepare_params(path, params);

        let response = match self.transport.send(method, &self.address, &params).await {
            Ok(response) => response,
            Err(e) => {
                let message = format!(
                    "Failed to perform request to kayako ({}).",
                    self.sanitize(&e.message)
                );
                self.logger.error(&message);
                return Err(KayakoError::unreachable(message));
            }
        };

        self.logger
            .debug(&format!("Response:\n{}", self.sanitize(&response.body)));

        let response = classify(response, self.logger.as_ref())?;
        Ok(response.body)
    }

    /// Like [`request`](Self::request), but decodes the body as XML.
    ///
    /// Structural problems in the document are logged at debug level and
    /// left on the returned document for the caller to inspect.
    pub async fn request_document(
        &self,
        method: Method,
        path: &str,
        params: Params,
    ) -> Result<XmlDocument, KayakoError> {
        let body = self.request(method, path, params).await?;
        self.decode(&body)
    }

    /// Maps the `collection_tag` children of `body` through `factory`.
    ///
    /// Exactly one match comes back as [`Parsed::Single`], anything else as
    /// [`Parsed::Many`].
    pub fn parse_response<T, F>(
        &self,
        body: &str,
        collection_tag: &str,
        factory: F,
    ) -> Result<Parsed<T>, KayakoError>
    where
        F: FnMut(&XmlElement) -> Result<T, KayakoError>,
    {
        self.decode(body)?.collect(collection_tag, factory)
    }

    /// [`parse_response`](Self::parse_response) for types implementing [`FromXml`].
    pub fn parse_models<T: FromXml>(
        &self,
        body: &str,
        collection_tag: &str,
    ) -> Result<Parsed<T>, KayakoError> {
        self.parse_response(body, collection_tag, T::from_xml)
    }

    /// Merges the action path and fresh signing parameters into `params`.
    ///
    /// Reserved names always win over caller-supplied values.
    pub fn prepare_params(&self, path: &str, mut params: Params) -> Params {
        params.insert(ACTION_PARAM.to_string(), path.to_string());
        for (name, value) in self.signer.sign().into_params() {
            params.insert(name.to_string(), value);
        }
        params
    }

    fn decode(&self, body: &str) -> Result<XmlDocument, KayakoError> {
        let document = XmlDocument::parse(body).inspect_err(|e| {
            self.logger.debug(&format!("Unable to decode response: {}", e));
        })?;
        for diagnostic in document.diagnostics() {
            self.logger
                .debug(&format!("XML problem in response {}", diagnostic));
        }
        Ok(document)
    }

    fn sanitize(&self, message: &str) -> String {
        let credentials = self.signer.credentials();
        KayakoError::sanitize_message(message, &[credentials.secret_key(), credentials.api_key()])
    }
}
