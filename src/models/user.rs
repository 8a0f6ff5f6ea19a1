//! User models.
//!
//! Users are the end customers who open tickets. A user can carry several
//! email addresses; the first one is treated as primary.

use serde::Serialize;

use super::{optional_flag, optional_text, optional_u64, required_id};
use crate::error::KayakoError;
use crate::transport::Params;
use crate::xml::{FromXml, XmlElement};

/// A helpdesk user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: u64,

    /// Full display name.
    pub full_name: Option<String>,

    /// Email addresses, primary first.
    pub emails: Vec<String>,

    /// User group the user belongs to.
    pub user_group_id: Option<u64>,

    /// Organization the user belongs to, `0` if none.
    pub organization_id: Option<u64>,

    /// Role: "user" or "manager".
    pub role: Option<String>,

    /// Job title.
    pub designation: Option<String>,

    /// Phone number.
    pub phone: Option<String>,

    /// Whether the account is enabled.
    pub is_enabled: Option<bool>,
}

impl User {
    /// Returns the display name, falling back to the primary email or the ID.
    pub fn display_name(&self) -> String {
        self.full_name
            .clone()
            .or_else(|| self.primary_email().map(str::to_string))
            .unwrap_or_else(|| self.id.to_string())
    }

    /// Returns the first email address, if any.
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }
}

impl FromXml for User {
    fn from_xml(element: &XmlElement) -> Result<Self, KayakoError> {
        let emails = element
            .children_named("email")
            .map(|e| e.text().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(User {
            id: required_id(element, "id")?,
            full_name: optional_text(element, "fullname"),
            emails,
            user_group_id: optional_u64(element, "usergroupid"),
            organization_id: optional_u64(element, "userorganizationid"),
            role: optional_text(element, "userrole"),
            designation: optional_text(element, "designation"),
            phone: optional_text(element, "phone"),
            is_enabled: optional_flag(element, "isenabled"),
        })
    }
}

/// Fields for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Full display name.
    pub full_name: String,
    /// Primary email address.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// User group to place the user in.
    pub user_group_id: u64,
    /// Optional organization.
    pub organization_id: Option<u64>,
    /// Optional job title.
    pub designation: Option<String>,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Whether to send the welcome email.
    pub send_welcome_email: bool,
}

impl NewUser {
    /// Creates the required part of a new user.
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        user_group_id: u64,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            password: password.into(),
            user_group_id,
            organization_id: None,
            designation: None,
            phone: None,
            send_welcome_email: false,
        }
    }

    /// Sets the organization.
    pub fn with_organization(mut self, organization_id: u64) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    /// Sets the job title.
    pub fn with_designation(mut self, designation: impl Into<String>) -> Self {
        self.designation = Some(designation.into());
        self
    }

    /// Sets the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Asks Kayako to send the welcome email.
    pub fn with_welcome_email(mut self) -> Self {
        self.send_welcome_email = true;
        self
    }

    /// Validates required fields.
    pub fn validate(&self) -> Result<(), KayakoError> {
        if self.full_name.trim().is_empty() {
            return Err(KayakoError::validation("full name is required"));
        }
        if !self.email.contains('@') {
            return Err(KayakoError::validation("email must be an email address"));
        }
        if self.password.is_empty() {
            return Err(KayakoError::validation("password is required"));
        }
        Ok(())
    }

    /// Converts into request parameters.
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert("fullname".to_string(), self.full_name.trim().to_string());
        params.insert("email".to_string(), self.email.trim().to_string());
        params.insert("password".to_string(), self.password.clone());
        params.insert("usergroupid".to_string(), self.user_group_id.to_string());
        if let Some(organization_id) = self.organization_id {
            params.insert("userorganizationid".to_string(), organization_id.to_string());
        }
        if let Some(ref designation) = self.designation {
            params.insert("designation".to_string(), designation.clone());
        }
        if let Some(ref phone) = self.phone {
            params.insert("phone".to_string(), phone.clone());
        }
        params.insert(
            "sendwelcomeemail".to_string(),
            if self.send_welcome_email { "1" } else { "0" }.to_string(),
        );
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlDocument;

    #[test]
    fn test_user_from_xml_with_multiple_emails() {
        let doc = XmlDocument::parse(
            "<user><id>12</id><usergroupid>2</usergroupid><userrole>user</userrole>\
             <userorganizationid>0</userorganizationid><fullname>Ann Lee</fullname>\
             <email>ann@example.com</email><email>ann.lee@example.com</email>\
             <designation></designation><isenabled>1</isenabled></user>",
        )
        .unwrap();
        let user = User::from_xml(doc.root()).unwrap();
        assert_eq!(user.id, 12);
        assert_eq!(user.emails.len(), 2);
        assert_eq!(user.primary_email(), Some("ann@example.com"));
        assert_eq!(user.designation, None);
        assert_eq!(user.is_enabled, Some(true));
        assert_eq!(user.display_name(), "Ann Lee");
    }

    #[test]
    fn test_user_display_name_fallbacks() {
        let doc = XmlDocument::parse("<user><id>4</id><email>x@example.com</email></user>").unwrap();
        assert_eq!(User::from_xml(doc.root()).unwrap().display_name(), "x@example.com");

        let doc = XmlDocument::parse("<user><id>4</id></user>").unwrap();
        assert_eq!(User::from_xml(doc.root()).unwrap().display_name(), "4");
    }

    #[test]
    fn test_new_user_params() {
        let params = NewUser::new(" Ann ", "ann@example.com", "pw", 2)
            .with_organization(9)
            .with_welcome_email()
            .to_params();
        assert_eq!(params["fullname"], "Ann");
        assert_eq!(params["usergroupid"], "2");
        assert_eq!(params["userorganizationid"], "9");
        assert_eq!(params["sendwelcomeemail"], "1");
        assert!(!params.contains_key("phone"));
    }

    #[test]
    fn test_new_user_validation() {
        assert!(NewUser::new("Ann", "ann@example.com", "pw", 2).validate().is_ok());
        assert!(NewUser::new(" ", "ann@example.com", "pw", 2).validate().is_err());
        assert!(NewUser::new("Ann", "not-an-email", "pw", 2).validate().is_err());
        assert!(NewUser::new("Ann", "ann@example.com", "", 2).validate().is_err());
    }
}
