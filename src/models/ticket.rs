//! Ticket models.
//!
//! Kayako puts the ticket id in an attribute (`<ticket id="7">`) while the
//! rest of the fields are child elements.

use serde::Serialize;

use super::{optional_text, optional_u64, required_id};
use crate::error::KayakoError;
use crate::transport::Params;
use crate::xml::{FromXml, XmlElement};

/// A helpdesk ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    /// Unique ticket ID.
    pub id: u64,

    /// Human-facing mask, e.g. `ABC-123-45678`.
    pub display_id: Option<String>,

    /// Subject line.
    pub subject: Option<String>,

    /// Department the ticket belongs to.
    pub department_id: Option<u64>,

    /// Status ID.
    pub status_id: Option<u64>,

    /// Priority ID.
    pub priority_id: Option<u64>,

    /// Ticket type ID.
    pub type_id: Option<u64>,

    /// Requesting user, `0` if the ticket was opened by staff.
    pub user_id: Option<u64>,

    /// Assigned staff member, `0` if unassigned.
    pub owner_staff_id: Option<u64>,

    /// Requester's name.
    pub full_name: Option<String>,

    /// Requester's email.
    pub email: Option<String>,

    /// Creation time as a Unix timestamp.
    pub creation_time: Option<u64>,

    /// Last activity as a Unix timestamp.
    pub last_activity: Option<u64>,
}

impl Ticket {
    /// Returns the subject or a placeholder.
    pub fn display_subject(&self) -> &str {
        self.subject.as_deref().unwrap_or("(no subject)")
    }

    /// Returns true if a staff member owns the ticket.
    pub fn is_assigned(&self) -> bool {
        matches!(self.owner_staff_id, Some(id) if id != 0)
    }
}

impl FromXml for Ticket {
    fn from_xml(element: &XmlElement) -> Result<Self, KayakoError> {
        Ok(Ticket {
            id: required_id(element, "id")?,
            display_id: optional_text(element, "displayid"),
            subject: optional_text(element, "subject"),
            department_id: optional_u64(element, "departmentid"),
            status_id: optional_u64(element, "statusid"),
            priority_id: optional_u64(element, "priorityid"),
            type_id: optional_u64(element, "typeid"),
            user_id: optional_u64(element, "userid"),
            owner_staff_id: optional_u64(element, "ownerstaffid"),
            full_name: optional_text(element, "fullname"),
            email: optional_text(element, "email"),
            creation_time: optional_u64(element, "creationtime"),
            last_activity: optional_u64(element, "lastactivity"),
        })
    }
}

/// Who opens a new ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketCreator {
    /// An existing user.
    User(u64),
    /// A staff member acting on behalf of the requester.
    Staff(u64),
    /// Look up or create the user from the requester's email.
    AutoUser,
}

/// Fields for creating a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    /// Subject line.
    pub subject: String,
    /// Requester's name.
    pub full_name: String,
    /// Requester's email.
    pub email: String,
    /// First post of the ticket.
    pub contents: String,
    /// Target department.
    pub department_id: u64,
    /// Initial status.
    pub status_id: u64,
    /// Initial priority.
    pub priority_id: u64,
    /// Ticket type.
    pub type_id: u64,
    /// Creator of the ticket.
    pub creator: TicketCreator,
    /// Optional owner.
    pub owner_staff_id: Option<u64>,
}

impl NewTicket {
    /// Validates required text fields.
    pub fn validate(&self) -> Result<(), KayakoError> {
        if self.subject.trim().is_empty() {
            return Err(KayakoError::validation("subject is required"));
        }
        if self.contents.trim().is_empty() {
            return Err(KayakoError::validation("contents is required"));
        }
        if !self.email.contains('@') {
            return Err(KayakoError::validation("email must be an email address"));
        }
        Ok(())
    }

    /// Converts into request parameters.
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert("subject".to_string(), self.subject.trim().to_string());
        params.insert("fullname".to_string(), self.full_name.trim().to_string());
        params.insert("email".to_string(), self.email.trim().to_string());
        params.insert("contents".to_string(), self.contents.clone());
        params.insert("departmentid".to_string(), self.department_id.to_string());
        params.insert("ticketstatusid".to_string(), self.status_id.to_string());
        params.insert("ticketpriorityid".to_string(), self.priority_id.to_string());
        params.insert("tickettypeid".to_string(), self.type_id.to_string());
        match self.creator {
            TicketCreator::User(id) => {
                params.insert("userid".to_string(), id.to_string());
            }
            TicketCreator::Staff(id) => {
                params.insert("staffid".to_string(), id.to_string());
            }
            TicketCreator::AutoUser => {
                params.insert("autouserid".to_string(), "1".to_string());
            }
        }
        if let Some(owner) = self.owner_staff_id {
            params.insert("ownerstaffid".to_string(), owner.to_string());
        }
        params
    }
}

/// Fields to change on an existing ticket. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketUpdate {
    /// New subject.
    pub subject: Option<String>,
    /// Move to another department.
    pub department_id: Option<u64>,
    /// New status.
    pub status_id: Option<u64>,
    /// New priority.
    pub priority_id: Option<u64>,
    /// New type.
    pub type_id: Option<u64>,
    /// New owner, `0` to unassign.
    pub owner_staff_id: Option<u64>,
}

impl TicketUpdate {
    /// Returns true if nothing would change.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Converts into request parameters.
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(ref subject) = self.subject {
            params.insert("subject".to_string(), subject.trim().to_string());
        }
        let ids = [
            ("departmentid", self.department_id),
            ("ticketstatusid", self.status_id),
            ("ticketpriorityid", self.priority_id),
            ("tickettypeid", self.type_id),
            ("ownerstaffid", self.owner_staff_id),
        ];
        for (name, value) in ids {
            if let Some(value) = value {
                params.insert(name.to_string(), value.to_string());
            }
        }
        params
    }
}

/// Filter for listing tickets. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    department_id: Option<u64>,
    status_id: Option<u64>,
    owner_staff_id: Option<u64>,
    user_id: Option<u64>,
}

impl TicketFilter {
    /// Creates a filter that matches every ticket of a department.
    pub fn department(department_id: u64) -> Self {
        Self {
            department_id: Some(department_id),
            ..Self::default()
        }
    }

    /// Restricts to one status.
    pub fn with_status(mut self, status_id: u64) -> Self {
        self.status_id = Some(status_id);
        self
    }

    /// Restricts to one owner.
    pub fn with_owner(mut self, owner_staff_id: u64) -> Self {
        self.owner_staff_id = Some(owner_staff_id);
        self
    }

    /// Restricts to one requester.
    pub fn with_user(mut self, user_id: u64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Renders the `/{department}/{status}/{owner}/{user}` path suffix,
    /// with `-1` standing for "any".
    pub fn path_segments(&self) -> String {
        let segment = |value: Option<u64>| value.map_or_else(|| "-1".to_string(), |v| v.to_string());
        format!(
            "/{}/{}/{}/{}",
            segment(self.department_id),
            segment(self.status_id),
            segment(self.owner_staff_id),
            segment(self.user_id)
        )
    }
}
