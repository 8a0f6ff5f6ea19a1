//! Data models for the Kayako REST API.
//!
//! Each model maps one XML element into a typed struct through
//! [`FromXml`](crate::xml::FromXml). Only the fields needed to identify and
//! display an entity are captured; unknown children are ignored.

mod department;
mod ticket;
mod user;

pub use department::*;
pub use ticket::*;
pub use user::*;

use crate::error::KayakoError;
use crate::xml::XmlElement;

/// Reads a required numeric id from a child element, falling back to an
/// attribute of the same name.
pub(crate) fn required_id(element: &XmlElement, field: &str) -> Result<u64, KayakoError> {
    let raw = element
        .child_text(field)
        .or_else(|| element.attribute(field))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            KayakoError::parse(format!("<{}> is missing required field {}", element.name, field))
        })?;

    raw.parse::<u64>().map_err(|_| {
        KayakoError::parse(format!(
            "<{}> field {} is not a number: {:?}",
            element.name,
            field,
            raw.chars().take(50).collect::<String>()
        ))
    })
}

/// Reads a child's text, treating empty elements as absent.
pub(crate) fn optional_text(element: &XmlElement, field: &str) -> Option<String> {
    element
        .child_text(field)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Reads a numeric child. Kayako uses `0` for "none" in several places, which
/// is kept as-is.
pub(crate) fn optional_u64(element: &XmlElement, field: &str) -> Option<u64> {
    element
        .child_text(field)
        .and_then(|s| s.trim().parse::<u64>().ok())
}

/// Reads a `0`/`1` flag.
pub(crate) fn optional_flag(element: &XmlElement, field: &str) -> Option<bool> {
    match element.child_text(field).map(str::trim) {
        Some("1") => Some(true),
        Some("0") => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlDocument;

    #[test]
    fn test_required_id_from_child_or_attribute() {
        let doc = XmlDocument::parse(r#"<r><a><id>5</id></a><b id="6"/><c/></r>"#).unwrap();
        let root = doc.root();
        assert_eq!(required_id(root.child("a").unwrap(), "id").unwrap(), 5);
        assert_eq!(required_id(root.child("b").unwrap(), "id").unwrap(), 6);
        assert!(required_id(root.child("c").unwrap(), "id").is_err());
    }

    #[test]
    fn test_required_id_rejects_non_numeric() {
        let doc = XmlDocument::parse("<a><id>abc</id></a>").unwrap();
        let err = required_id(doc.root(), "id").unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn test_optional_helpers() {
        let doc = XmlDocument::parse(
            "<a><name> Ann </name><empty/><n>3</n><bad>x</bad><on>1</on><off>0</off></a>",
        )
        .unwrap();
        let a = doc.root();
        assert_eq!(optional_text(a, "name").as_deref(), Some("Ann"));
        assert_eq!(optional_text(a, "empty"), None);
        assert_eq!(optional_u64(a, "n"), Some(3));
        assert_eq!(optional_u64(a, "bad"), None);
        assert_eq!(optional_flag(a, "on"), Some(true));
        assert_eq!(optional_flag(a, "off"), Some(false));
        assert_eq!(optional_flag(a, "missing"), None);
    }
}
