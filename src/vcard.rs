//! Contact records and vCard 3.0 encoding

use serde::{Deserialize, Serialize};

/// A business contact as embedded in the exported QR code.
///
/// Constructed once at startup from configuration and never mutated. Field
/// values are carried verbatim into the vCard text; nothing beyond presence
/// of the required fields is ever checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRecord {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Job title
    pub title: String,
    /// Organization name
    pub organization: String,
    /// Phone number, any formatting
    pub phone: String,
    /// Email address
    pub email: String,
    /// Postal address as a single line
    pub address: String,
    /// Optional website URL; omitted from the vCard when absent or empty
    pub website: Option<String>,
}

impl ContactRecord {
    /// Formatted name as used in the vCard `FN` field.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Names of required fields that are currently empty.
    pub(crate) fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (name, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("title", &self.title),
            ("organization", &self.organization),
            ("phone", &self.phone),
            ("email", &self.email),
            ("address", &self.address),
        ] {
            if value.is_empty() {
                missing.push(name);
            }
        }
        missing
    }

    /// Encode this record as a vCard 3.0 text block.
    ///
    /// The `URL` line is emitted only when a non-empty website is present.
    /// The result carries no trailing whitespace.
    pub fn to_vcard(&self) -> String {
        let mut lines = vec![
            "BEGIN:VCARD".to_string(),
            "VERSION:3.0".to_string(),
            format!("N:{};{};;;", self.last_name, self.first_name),
            format!("FN:{}", self.full_name()),
            format!("TITLE:{}", self.title),
            format!("ORG:{}", self.organization),
            format!("TEL:{}", self.phone),
            format!("EMAIL:{}", self.email),
            format!("ADR:;;{};;;;", self.address),
        ];

        if let Some(website) = self.website.as_deref() {
            if !website.is_empty() {
                lines.push(format!("URL:{}", website));
            }
        }

        lines.push("END:VCARD".to_string());
        lines.join("\n").trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane_doe() -> ContactRecord {
        ContactRecord {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            title: "CEO".to_string(),
            organization: "Acme".to_string(),
            phone: "+1-555-0100".to_string(),
            email: "jane@acme.com".to_string(),
            address: "1 Main St".to_string(),
            website: None,
        }
    }

    #[test]
    fn test_vcard_delimiters_and_whitespace() {
        let vcard = jane_doe().to_vcard();
        assert!(vcard.starts_with("BEGIN:VCARD"));
        assert!(vcard.ends_with("END:VCARD"));
        assert_eq!(vcard, vcard.trim_end());
    }

    #[test]
    fn test_vcard_without_website() {
        let vcard = jane_doe().to_vcard();
        let lines: Vec<&str> = vcard.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(!lines.iter().any(|line| line.starts_with("URL:")));
        assert!(!lines.iter().any(|line| line.is_empty()));
    }

    #[test]
    fn test_vcard_with_website() {
        let mut record = jane_doe();
        record.website = Some("https://acme.com".to_string());
        let vcard = record.to_vcard();
        let lines: Vec<&str> = vcard.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[9], "URL:https://acme.com");
        assert_eq!(lines[10], "END:VCARD");
    }

    #[test]
    fn test_empty_website_is_omitted() {
        let mut record = jane_doe();
        record.website = Some(String::new());
        let vcard = record.to_vcard();
        assert!(!vcard.contains("URL:"));
        assert_eq!(vcard.lines().count(), 10);
    }

    #[test]
    fn test_structured_fields() {
        let vcard = jane_doe().to_vcard();
        let lines: Vec<&str> = vcard.lines().collect();
        assert_eq!(lines[1], "VERSION:3.0");
        assert_eq!(lines[2], "N:Doe;Jane;;;");
        assert_eq!(lines[3], "FN:Jane Doe");
        assert_eq!(lines[8], "ADR:;;1 Main St;;;;");
    }

    #[test]
    fn test_missing_fields() {
        let mut record = jane_doe();
        assert!(record.missing_fields().is_empty());
        record.phone.clear();
        record.email.clear();
        assert_eq!(record.missing_fields(), vec!["phone", "email"]);
    }
}
