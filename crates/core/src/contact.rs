//! Contact information gathered incrementally over a conversation

use serde::{Deserialize, Serialize};

/// The individual contact fields, in collection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Email,
    Phone,
    CompanyName,
}

impl ContactField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::CompanyName => "company_name",
        }
    }
}

/// Contact info populated incrementally from free text.
///
/// Fields are never overwritten once set (first-write-wins per field).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

impl ContactInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge an extraction result, keeping existing values (first-write-wins).
    ///
    /// Returns the fields that were newly set.
    pub fn absorb(&mut self, update: &ContactUpdate) -> Vec<ContactField> {
        let mut set = Vec::new();
        if self.name.is_none() {
            if let Some(ref name) = update.name {
                self.name = Some(name.clone());
                set.push(ContactField::Name);
            }
        }
        if self.email.is_none() {
            if let Some(ref email) = update.email {
                self.email = Some(email.clone());
                set.push(ContactField::Email);
            }
        }
        if self.phone.is_none() {
            if let Some(ref phone) = update.phone {
                self.phone = Some(phone.clone());
                set.push(ContactField::Phone);
            }
        }
        if self.company_name.is_none() {
            if let Some(ref company) = update.company_name {
                self.company_name = Some(company.clone());
                set.push(ContactField::CompanyName);
            }
        }
        set
    }

    /// Whether any field has been captured
    pub fn has_any(&self) -> bool {
        self.name.is_some()
            || self.email.is_some()
            || self.phone.is_some()
            || self.company_name.is_some()
    }

    /// Whether the lead-capture fields (name, email, company) are all set.
    /// Phone is opportunistic and not required.
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.email.is_some() && self.company_name.is_some()
    }

    /// Next field to ask for, in collection order: name, then email, then company
    pub fn next_missing(&self) -> Option<ContactField> {
        if self.name.is_none() {
            Some(ContactField::Name)
        } else if self.email.is_none() {
            Some(ContactField::Email)
        } else if self.company_name.is_none() {
            Some(ContactField::CompanyName)
        } else {
            None
        }
    }

    /// First name for personalized replies, if a name was captured
    pub fn first_name(&self) -> Option<&str> {
        self.name.as_deref().and_then(|n| n.split_whitespace().next())
    }
}

/// Partial contact info produced by a single extraction pass.
///
/// An empty update is the normal "nothing found" result, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
}

impl ContactUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.company_name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_wins() {
        let mut contact = ContactInfo::new();

        let set = contact.absorb(&ContactUpdate {
            email: Some("john@acme.com".to_string()),
            ..Default::default()
        });
        assert_eq!(set, vec![ContactField::Email]);

        // A different email later must not overwrite
        let set = contact.absorb(&ContactUpdate {
            email: Some("other@elsewhere.com".to_string()),
            ..Default::default()
        });
        assert!(set.is_empty());
        assert_eq!(contact.email.as_deref(), Some("john@acme.com"));
    }

    #[test]
    fn test_next_missing_order() {
        let mut contact = ContactInfo::new();
        assert_eq!(contact.next_missing(), Some(ContactField::Name));

        contact.name = Some("John Smith".to_string());
        assert_eq!(contact.next_missing(), Some(ContactField::Email));

        contact.email = Some("john@acme.com".to_string());
        assert_eq!(contact.next_missing(), Some(ContactField::CompanyName));

        contact.company_name = Some("Acme Corp".to_string());
        assert_eq!(contact.next_missing(), None);
        assert!(contact.is_complete());
    }

    #[test]
    fn test_phone_not_required_for_completion() {
        let contact = ContactInfo {
            name: Some("John Smith".to_string()),
            email: Some("john@acme.com".to_string()),
            phone: None,
            company_name: Some("Acme Corp".to_string()),
        };
        assert!(contact.is_complete());
    }

    #[test]
    fn test_first_name() {
        let contact = ContactInfo {
            name: Some("John Smith".to_string()),
            ..Default::default()
        };
        assert_eq!(contact.first_name(), Some("John"));
    }
}
