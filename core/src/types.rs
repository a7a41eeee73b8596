//! Domain DTOs for the pets API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! A persisted `Pet` always carries a server-assigned id; a record that has
//! not been saved yet is a `Draft`, so "id absent" is a type distinction
//! rather than an `Option` every caller has to check. Integration tests catch
//! any schema drift between the two crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identity of a persisted pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(pub u64);

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PetId {
    fn from(id: u64) -> Self {
        PetId(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Cat,
    Dog,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Cat => "cat",
            Kind::Dog => "dog",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cat" => Ok(Kind::Cat),
            "dog" => Ok(Kind::Dog),
            other => Err(format!("unknown kind `{other}`, expected `cat` or `dog`")),
        }
    }
}

/// A single pet returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    #[serde(default)]
    pub kind: Option<Kind>,
    /// Photo as a text encoding (typically a data URL).
    #[serde(default)]
    pub photo: Option<String>,
}

impl Pet {
    /// The editable fields of this pet, detached from its id.
    pub fn draft(&self) -> Draft {
        Draft {
            name: self.name.clone(),
            kind: self.kind,
            photo: self.photo.clone(),
        }
    }

    /// Combine a persisted id with edited field values.
    pub fn with_draft(id: PetId, draft: Draft) -> Self {
        Pet {
            id,
            name: draft.name,
            kind: draft.kind,
            photo: draft.photo,
        }
    }
}

/// User-entered field values for a pet that may not exist on the server yet.
///
/// Also the request payload for `POST /pets`. `kind` and `photo` serialize as
/// `null` when unset so the server sees every field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Draft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: Option<Kind>,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Per-field rejection messages returned by the server on a failed save.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationErrors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.kind.is_none()
    }

    /// Message for `field` (`"name"` or `"kind"`), if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        match field {
            "name" => self.name.as_deref(),
            "kind" => self.kind.as_deref(),
            _ => None,
        }
    }

    /// `(field, message)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [("name", self.name.as_deref()), ("kind", self.kind.as_deref())]
            .into_iter()
            .filter_map(|(field, msg)| msg.map(|m| (field, m)))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, msg) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {msg}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pet_without_kind_or_photo_deserializes() {
        let pet: Pet = serde_json::from_str(r#"{"id":1,"name":"Rex"}"#).unwrap();
        assert_eq!(pet.id, PetId(1));
        assert!(pet.kind.is_none());
        assert!(pet.photo.is_none());
    }

    #[test]
    fn draft_serializes_unset_fields_as_null() {
        let json = serde_json::to_value(Draft::default()).unwrap();
        assert_eq!(json, serde_json::json!({"name": "", "kind": null, "photo": null}));
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Dog".parse::<Kind>().unwrap(), Kind::Dog);
        assert_eq!(" cat ".parse::<Kind>().unwrap(), Kind::Cat);
        assert!("bird".parse::<Kind>().is_err());
    }

    #[test]
    fn validation_errors_display_in_field_order() {
        let errors = ValidationErrors {
            name: Some("Name can't be blank".to_string()),
            kind: Some("Kind must be 'cat' or 'dog'".to_string()),
        };
        assert_eq!(
            errors.to_string(),
            "name: Name can't be blank; kind: Kind must be 'cat' or 'dog'"
        );
        assert_eq!(errors.get("kind"), Some("Kind must be 'cat' or 'dog'"));
        assert_eq!(errors.get("photo"), None);
    }

    #[test]
    fn empty_validation_errors() {
        let errors: ValidationErrors = serde_json::from_str("{}").unwrap();
        assert!(errors.is_empty());
        assert_eq!(errors.iter().count(), 0);
    }
}
