//! Ticket endpoints.

use crate::error::KayakoError;
use crate::models::{NewTicket, Ticket, TicketFilter, TicketUpdate};
use crate::service::{BaseService, ServiceConfig};
use crate::transport::Params;
use crate::xml::Parsed;

use super::expect_single;

/// Endpoint for tickets.
pub const TICKET_PATH: &str = "/Tickets/Ticket";

/// Element name of one ticket in responses.
pub const TICKET_TAG: &str = "ticket";

/// Access to helpdesk tickets.
#[derive(Debug, Clone)]
pub struct TicketService {
    base: BaseService,
}

impl TicketService {
    /// Creates the service.
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            base: BaseService::new(config),
        }
    }

    /// Returns the underlying request helper.
    pub fn base(&self) -> &BaseService {
        &self.base
    }

    /// Lists the tickets matching `filter`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let open = tickets
    ///     .list(&TicketFilter::department(3).with_status(1))
    ///     .await?;
    /// ```
    pub async fn list(&self, filter: &TicketFilter) -> Result<Parsed<Ticket>, KayakoError> {
        let path = format!("{}/ListAll{}", TICKET_PATH, filter.path_segments());
        let body = self.base.get(&path, Params::new()).await?;
        self.base.parse_models(&body, TICKET_TAG)
    }

    /// Fetches one ticket.
    pub async fn get(&self, id: u64) -> Result<Ticket, KayakoError> {
        let path = format!("{}/{}", TICKET_PATH, id);
        let body = self.base.get(&path, Params::new()).await?;
        expect_single(self.base.parse_models(&body, TICKET_TAG)?, TICKET_TAG)
    }

    /// Opens a ticket and returns it as stored.
    pub async fn create(&self, ticket: &NewTicket) -> Result<Ticket, KayakoError> {
        ticket.validate()?;
        let body = self.base.post(TICKET_PATH, ticket.to_params()).await?;
        expect_single(self.base.parse_models(&body, TICKET_TAG)?, TICKET_TAG)
    }

    /// Changes fields of an existing ticket.
    pub async fn update(&self, id: u64, update: &TicketUpdate) -> Result<Ticket, KayakoError> {
        if update.is_empty() {
            return Err(KayakoError::validation(
                "at least one field must be provided for update",
            ));
        }
        let path = format!("{}/{}", TICKET_PATH, id);
        let body = self.base.put(&path, update.to_params()).await?;
        expect_single(self.base.parse_models(&body, TICKET_TAG)?, TICKET_TAG)
    }

    /// Deletes a ticket.
    pub async fn delete(&self, id: u64) -> Result<(), KayakoError> {
        let path = format!("{}/{}", TICKET_PATH, id);
        self.base.delete(&path, Params::new()).await?;
        Ok(())
    }
}
