//! Department models.

use serde::Serialize;

use super::{optional_text, optional_u64, required_id};
use crate::error::KayakoError;
use crate::xml::{FromXml, XmlElement};

/// A helpdesk department tickets and live chats are routed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Department {
    /// Unique department ID.
    pub id: u64,

    /// Display title.
    pub title: String,

    /// Visibility: "public" or "private".
    pub department_type: Option<String>,

    /// Owning module: "tickets" or "livechat".
    pub module: Option<String>,

    /// Parent department, `0` for top-level departments.
    pub parent_department_id: Option<u64>,

    /// Sort position in the UI.
    pub display_order: Option<u64>,
}

impl Department {
    /// Returns true if the department is nested under another one.
    pub fn is_child(&self) -> bool {
        matches!(self.parent_department_id, Some(id) if id != 0)
    }
}

impl FromXml for Department {
    fn from_xml(element: &XmlElement) -> Result<Self, KayakoError> {
        Ok(Department {
            id: required_id(element, "id")?,
            title: optional_text(element, "title").unwrap_or_default(),
            department_type: optional_text(element, "type"),
            module: optional_text(element, "module"),
            parent_department_id: optional_u64(element, "parentdepartmentid"),
            display_order: optional_u64(element, "displayorder"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlDocument;

    #[test]
    fn test_department_from_xml() {
        let doc = XmlDocument::parse(
            "<department><id>3</id><title>Support</title><type>public</type>\
             <module>tickets</module><displayorder>2</displayorder>\
             <parentdepartmentid>1</parentdepartmentid></department>",
        )
        .unwrap();
        let department = Department::from_xml(doc.root()).unwrap();
        assert_eq!(department.id, 3);
        assert_eq!(department.title, "Support");
        assert_eq!(department.department_type.as_deref(), Some("public"));
        assert_eq!(department.module.as_deref(), Some("tickets"));
        assert_eq!(department.display_order, Some(2));
        assert!(department.is_child());
    }

    #[test]
    fn test_top_level_department() {
        let doc = XmlDocument::parse(
            "<department><id>1</id><title>General</title><parentdepartmentid>0</parentdepartmentid></department>",
        )
        .unwrap();
        assert!(!Department::from_xml(doc.root()).unwrap().is_child());
    }
}
