//! Service registry.
//!
//! Resolves a service name (`user`, `ticket`, `department`) to a ready
//! service sharing the registry's transport, logger, address, and
//! credentials. The set of services is closed: lookup is a `match` over
//! [`ServiceKind`].

use std::fmt;
use std::str::FromStr;

use crate::error::KayakoError;
use crate::service::{BaseService, ServiceConfig};
use crate::services::{DepartmentService, TicketService, UserService};
use crate::signer::Credentials;

/// The services the registry can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// [`UserService`]
    User,
    /// [`TicketService`]
    Ticket,
    /// [`DepartmentService`]
    Department,
}

impl ServiceKind {
    /// Every registered kind.
    pub const ALL: [ServiceKind; 3] = [ServiceKind::User, ServiceKind::Ticket, ServiceKind::Department];

    /// Returns the registry name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::User => "user",
            ServiceKind::Ticket => "ticket",
            ServiceKind::Department => "department",
        }
    }

    fn build(self, config: ServiceConfig) -> Service {
        match self {
            ServiceKind::User => Service::User(UserService::new(config)),
            ServiceKind::Ticket => Service::Ticket(TicketService::new(config)),
            ServiceKind::Department => Service::Department(DepartmentService::new(config)),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ServiceKind {
    type Err = KayakoError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ServiceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| KayakoError::UnknownService(name.to_string()))
    }
}

/// A service resolved by the registry.
#[derive(Debug, Clone)]
pub enum Service {
    /// User endpoints.
    User(UserService),
    /// Ticket endpoints.
    Ticket(TicketService),
    /// Department endpoints.
    Department(DepartmentService),
}

impl Service {
    /// Returns which kind of service this is.
    pub fn kind(&self) -> ServiceKind {
        match self {
            Service::User(_) => ServiceKind::User,
            Service::Ticket(_) => ServiceKind::Ticket,
            Service::Department(_) => ServiceKind::Department,
        }
    }

    /// Returns the shared request helper.
    pub fn base(&self) -> &BaseService {
        match self {
            Service::User(s) => s.base(),
            Service::Ticket(s) => s.base(),
            Service::Department(s) => s.base(),
        }
    }

    /// Returns the user service, if this is one.
    pub fn as_user(&self) -> Option<&UserService> {
        match self {
            Service::User(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the ticket service, if this is one.
    pub fn as_ticket(&self) -> Option<&TicketService> {
        match self {
            Service::Ticket(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the department service, if this is one.
    pub fn as_department(&self) -> Option<&DepartmentService> {
        match self {
            Service::Department(s) => Some(s),
            _ => None,
        }
    }
}

/// Builds services that share one configuration.
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    config: ServiceConfig,
}

impl ServiceRegistry {
    /// Creates a registry around a shared configuration.
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    /// Returns the shared configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Resolves a service by name.
    ///
    /// # Errors
    ///
    /// Returns `KayakoError::UnknownService` if the name is not registered.
    pub fn get(&self, name: &str) -> Result<Service, KayakoError> {
        Ok(self.service(name.parse()?))
    }

    /// Resolves a service by name, signing with other credentials.
    pub fn get_with_credentials(
        &self,
        name: &str,
        credentials: Credentials,
    ) -> Result<Service, KayakoError> {
        let kind: ServiceKind = name.parse()?;
        Ok(kind.build(self.config.with_credentials(credentials)))
    }

    /// Builds a service of a known kind.
    pub fn service(&self, kind: ServiceKind) -> Service {
        kind.build(self.config.clone())
    }

    /// Builds the user service.
    pub fn users(&self) -> UserService {
        UserService::new(self.config.clone())
    }

    /// Builds the ticket service.
    pub fn tickets(&self) -> TicketService {
        TicketService::new(self.config.clone())
    }

    /// Builds the department service.
    pub fn departments(&self) -> DepartmentService {
        DepartmentService::new(self.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{config, CannedTransport};

    fn registry() -> ServiceRegistry {
        ServiceRegistry::new(config(CannedTransport::new(200, "")))
    }

    #[test]
    fn test_unknown_service() {
        let err = registry().get("bogus").unwrap_err();
        assert!(matches!(err, KayakoError::UnknownService(ref name) if name == "bogus"));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!(registry().get("User").is_err());
    }

    #[test]
    fn test_user_service_shares_configuration() {
        let registry = registry();
        let service = registry.get("user").unwrap();
        assert_eq!(service.kind(), ServiceKind::User);
        assert!(service.as_user().is_some());
        assert!(service.as_ticket().is_none());
        assert_eq!(service.base().address(), registry.config().address);
        assert_eq!(service.base().credentials(), &registry.config().credentials);
    }

    #[test]
    fn test_every_kind_resolves_by_name() {
        let registry = registry();
        for kind in ServiceKind::ALL {
            assert_eq!(registry.get(kind.name()).unwrap().kind(), kind);
            assert_eq!(kind.to_string().parse::<ServiceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_get_with_credentials_overrides_keys() {
        let service = registry()
            .get_with_credentials("ticket", Credentials::new("other", "other-secret"))
            .unwrap();
        assert_eq!(service.base().credentials().api_key(), "other");
        assert!(service.as_ticket().is_some());
    }

    #[test]
    fn test_get_with_credentials_unknown_service() {
        let result = registry().get_with_credentials("bogus", Credentials::new("a", "b"));
        assert!(matches!(result, Err(KayakoError::UnknownService(_))));
    }
}
