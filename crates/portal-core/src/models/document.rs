use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The five KYC documents tracked by the checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChecklistCategory {
    PanCard,
    AadharCard,
    IncomeProof,
    ResidentialVerification,
    Photograph,
}

impl ChecklistCategory {
    /// Every checklist category, in display order.
    pub const ALL: [ChecklistCategory; 5] = [
        ChecklistCategory::PanCard,
        ChecklistCategory::AadharCard,
        ChecklistCategory::IncomeProof,
        ChecklistCategory::ResidentialVerification,
        ChecklistCategory::Photograph,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChecklistCategory::PanCard => "Pan Card",
            ChecklistCategory::AadharCard => "Aadhar Card",
            ChecklistCategory::IncomeProof => "Income & Financial Proof",
            ChecklistCategory::ResidentialVerification => "Residential Background Verification",
            ChecklistCategory::Photograph => "Passport Size Photograph",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            ChecklistCategory::PanCard => "pan-card",
            ChecklistCategory::AadharCard => "aadhar-card",
            ChecklistCategory::IncomeProof => "income-proof",
            ChecklistCategory::ResidentialVerification => "residential-verification",
            ChecklistCategory::Photograph => "photograph",
        }
    }
}

impl Serialize for ChecklistCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}

/// Category of an uploaded document.
///
/// The checklist set is closed. Milestone documents are open: the known
/// `DemandLetter` and `Invoice` labels plus any other label the service
/// accepts. Serialized as the label sent in the `DocumentType` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DocumentCategory {
    Checklist(ChecklistCategory),
    DemandLetter,
    Invoice,
    Other(CustomLabel),
}

/// Label of a category outside the known set. Only built by label parsing,
/// so it never spells a known category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomLabel(String);

impl CustomLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DocumentCategory {
    pub const PAN_CARD: DocumentCategory = DocumentCategory::Checklist(ChecklistCategory::PanCard);
    pub const AADHAR_CARD: DocumentCategory =
        DocumentCategory::Checklist(ChecklistCategory::AadharCard);
    pub const INCOME_PROOF: DocumentCategory =
        DocumentCategory::Checklist(ChecklistCategory::IncomeProof);
    pub const RESIDENTIAL_VERIFICATION: DocumentCategory =
        DocumentCategory::Checklist(ChecklistCategory::ResidentialVerification);
    pub const PHOTOGRAPH: DocumentCategory =
        DocumentCategory::Checklist(ChecklistCategory::Photograph);

    /// Label sent to the file service and shown to the user.
    pub fn label(&self) -> &str {
        match self {
            DocumentCategory::Checklist(c) => c.label(),
            DocumentCategory::DemandLetter => "Demand Letter",
            DocumentCategory::Invoice => "Invoice",
            DocumentCategory::Other(label) => label.as_str(),
        }
    }

    /// Category for a free-form label. Labels naming a known category
    /// resolve to it.
    pub fn other(label: impl AsRef<str>) -> Self {
        DocumentCategory::parse_label(label.as_ref())
    }

    /// The checklist category this document satisfies, if any.
    pub fn checklist(&self) -> Option<ChecklistCategory> {
        match self {
            DocumentCategory::Checklist(c) => Some(*c),
            _ => None,
        }
    }

    fn parse_label(s: &str) -> Self {
        let trimmed = s.trim();
        let lower = trimmed.to_lowercase();

        for category in ChecklistCategory::ALL {
            if lower == category.label().to_lowercase() || lower == category.slug() {
                return DocumentCategory::Checklist(category);
            }
        }

        match lower.as_str() {
            "demand letter" | "demand-letter" => DocumentCategory::DemandLetter,
            "invoice" => DocumentCategory::Invoice,
            _ => DocumentCategory::Other(CustomLabel(trimmed.to_string())),
        }
    }
}

impl Default for DocumentCategory {
    fn default() -> Self {
        DocumentCategory::PAN_CARD
    }
}

impl From<ChecklistCategory> for DocumentCategory {
    fn from(category: ChecklistCategory) -> Self {
        DocumentCategory::Checklist(category)
    }
}

impl From<String> for DocumentCategory {
    fn from(s: String) -> Self {
        DocumentCategory::parse_label(&s)
    }
}

impl From<DocumentCategory> for String {
    fn from(category: DocumentCategory) -> Self {
        match category {
            DocumentCategory::Other(label) => label.0,
            other => other.label().to_string(),
        }
    }
}

impl FromStr for DocumentCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(anyhow::anyhow!("Document category cannot be empty"));
        }
        Ok(DocumentCategory::parse_label(s))
    }
}

impl Display for DocumentCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

/// Identifier returned by the file service for a stored upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub file_id: String,
    pub file_url: Option<String>,
}

/// One successfully uploaded file tied to a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: Uuid,
    pub booking_id: String,
    pub category: DocumentCategory,
    pub display_name: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    /// Local copy opened during this process; never persisted.
    #[serde(skip)]
    pub retrieval_handle: Option<PathBuf>,
}

impl DocumentRecord {
    /// Build the record for a completed upload. `uploaded_at` is kept at
    /// millisecond precision so it survives persistence unchanged.
    pub fn from_upload(
        booking_id: &str,
        category: DocumentCategory,
        display_name: &str,
        size_bytes: u64,
        remote: RemoteFile,
    ) -> Self {
        DocumentRecord {
            id: Uuid::new_v4(),
            booking_id: booking_id.to_string(),
            category,
            display_name: display_name.to_string(),
            size_bytes,
            uploaded_at: Utc::now().trunc_subsecs(3),
            remote_file_id: Some(remote.file_id),
            remote_url: remote.file_url,
            retrieval_handle: None,
        }
    }

    /// Whether view/download can be attempted for this record.
    pub fn is_retrievable(&self) -> bool {
        self.remote_file_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(id: &str) -> RemoteFile {
        RemoteFile {
            file_id: id.to_string(),
            file_url: None,
        }
    }

    #[test]
    fn test_category_labels_round_trip() {
        for category in ChecklistCategory::ALL {
            let doc: DocumentCategory = category.into();
            let label: String = doc.clone().into();
            assert_eq!(DocumentCategory::from(label), doc);
        }
        assert_eq!(
            DocumentCategory::from("Demand Letter".to_string()),
            DocumentCategory::DemandLetter
        );
        assert_eq!(
            DocumentCategory::from("Invoice".to_string()),
            DocumentCategory::Invoice
        );
    }

    #[test]
    fn test_category_parse_accepts_slugs_and_case() {
        assert_eq!(
            "pan-card".parse::<DocumentCategory>().unwrap(),
            DocumentCategory::PAN_CARD
        );
        assert_eq!(
            "income & financial proof".parse::<DocumentCategory>().unwrap(),
            DocumentCategory::INCOME_PROOF
        );
        assert_eq!(
            "Site Photo".parse::<DocumentCategory>().unwrap(),
            DocumentCategory::other("Site Photo")
        );
        assert!("  ".parse::<DocumentCategory>().is_err());
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&DocumentCategory::RESIDENTIAL_VERIFICATION).unwrap();
        assert_eq!(json, "\"Residential Background Verification\"");
        let back: DocumentCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DocumentCategory::RESIDENTIAL_VERIFICATION);
    }

    #[test]
    fn test_other_naming_known_label_resolves() {
        let category = DocumentCategory::other("Pan Card");
        assert_eq!(category, DocumentCategory::PAN_CARD);
        assert_eq!(category.checklist(), Some(ChecklistCategory::PanCard));

        let json = serde_json::to_string(&category).unwrap();
        let back: DocumentCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, category);
        assert_eq!(back.checklist(), category.checklist());

        let custom = DocumentCategory::other("  Site Photo ");
        assert!(matches!(
            &custom,
            DocumentCategory::Other(label) if label.as_str() == "Site Photo"
        ));
        let back: DocumentCategory =
            serde_json::from_str(&serde_json::to_string(&custom).unwrap()).unwrap();
        assert_eq!(back, custom);
    }

    #[test]
    fn test_checklist_mapping() {
        assert_eq!(
            DocumentCategory::PHOTOGRAPH.checklist(),
            Some(ChecklistCategory::Photograph)
        );
        assert_eq!(DocumentCategory::Invoice.checklist(), None);
        assert_eq!(DocumentCategory::other("x").checklist(), None);
    }

    #[test]
    fn test_record_timestamp_is_millisecond_precision() {
        let record = DocumentRecord::from_upload(
            "BK-1",
            DocumentCategory::PAN_CARD,
            "pan.pdf",
            10,
            remote("f1"),
        );
        assert_eq!(record.uploaded_at.timestamp_subsec_nanos() % 1_000_000, 0);
        assert!(record.is_retrievable());
    }

    #[test]
    fn test_record_without_remote_id_is_not_retrievable() {
        let mut record = DocumentRecord::from_upload(
            "BK-1",
            DocumentCategory::PAN_CARD,
            "pan.pdf",
            10,
            remote("f1"),
        );
        record.remote_file_id = None;
        assert!(!record.is_retrievable());
        record.remote_file_id = Some("  ".to_string());
        assert!(!record.is_retrievable());
    }

    #[test]
    fn test_retrieval_handle_is_not_serialized() {
        let mut record = DocumentRecord::from_upload(
            "BK-1",
            DocumentCategory::PAN_CARD,
            "pan.pdf",
            10,
            remote("f1"),
        );
        record.retrieval_handle = Some(PathBuf::from("/tmp/pan.pdf"));

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("retrievalHandle").is_none());
        assert_eq!(json["remoteFileId"], "f1");

        let back: DocumentRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.retrieval_handle, None);
        assert_eq!(back.uploaded_at, record.uploaded_at);
    }
}
