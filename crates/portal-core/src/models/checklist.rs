use serde::Serialize;

use super::document::{ChecklistCategory, DocumentRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecklistStatus {
    Complete,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistEntry {
    pub category: ChecklistCategory,
    pub label: &'static str,
    pub status: ChecklistStatus,
    pub record_count: usize,
}

/// Completion state of the KYC checklist for one booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checklist {
    pub entries: Vec<ChecklistEntry>,
}

impl Checklist {
    /// Evaluate the checklist over a live record list. A category is
    /// complete as soon as one record of it exists.
    pub fn evaluate(records: &[DocumentRecord]) -> Self {
        let entries = ChecklistCategory::ALL
            .iter()
            .map(|&category| {
                let record_count = records
                    .iter()
                    .filter(|r| r.category.checklist() == Some(category))
                    .count();
                let status = if record_count > 0 {
                    ChecklistStatus::Complete
                } else {
                    ChecklistStatus::Pending
                };
                ChecklistEntry {
                    category,
                    label: category.label(),
                    status,
                    record_count,
                }
            })
            .collect();

        Checklist { entries }
    }

    pub fn status_of(&self, category: ChecklistCategory) -> ChecklistStatus {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.status)
            .unwrap_or(ChecklistStatus::Pending)
    }

    pub fn complete_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == ChecklistStatus::Complete)
            .count()
    }

    pub fn pending_count(&self) -> usize {
        self.entries.len() - self.complete_count()
    }

    pub fn is_complete(&self) -> bool {
        self.pending_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{DocumentCategory, RemoteFile};

    fn record(category: DocumentCategory) -> DocumentRecord {
        DocumentRecord::from_upload(
            "BK-1",
            category,
            "file.pdf",
            100,
            RemoteFile {
                file_id: "f".to_string(),
                file_url: None,
            },
        )
    }

    #[test]
    fn test_empty_list_is_all_pending() {
        let checklist = Checklist::evaluate(&[]);
        assert_eq!(checklist.entries.len(), 5);
        assert_eq!(checklist.pending_count(), 5);
        assert!(!checklist.is_complete());
    }

    #[test]
    fn test_one_record_completes_its_category() {
        let records = vec![record(DocumentCategory::PAN_CARD)];
        let checklist = Checklist::evaluate(&records);
        assert_eq!(
            checklist.status_of(ChecklistCategory::PanCard),
            ChecklistStatus::Complete
        );
        assert_eq!(
            checklist.status_of(ChecklistCategory::AadharCard),
            ChecklistStatus::Pending
        );
        assert_eq!(checklist.complete_count(), 1);
    }

    #[test]
    fn test_second_record_keeps_category_complete() {
        let mut records = vec![record(DocumentCategory::PAN_CARD)];
        let before = Checklist::evaluate(&records);
        records.push(record(DocumentCategory::PAN_CARD));
        let after = Checklist::evaluate(&records);

        assert_eq!(
            before.status_of(ChecklistCategory::PanCard),
            after.status_of(ChecklistCategory::PanCard)
        );
        assert_eq!(after.entries[0].record_count, 2);
        assert_eq!(after.complete_count(), 1);
    }

    #[test]
    fn test_milestone_documents_do_not_count() {
        let records = vec![
            record(DocumentCategory::Invoice),
            record(DocumentCategory::DemandLetter),
            record(DocumentCategory::other("Site Photo")),
        ];
        let checklist = Checklist::evaluate(&records);
        assert_eq!(checklist.complete_count(), 0);
    }

    #[test]
    fn test_all_categories_complete() {
        let records: Vec<_> = ChecklistCategory::ALL
            .iter()
            .map(|&c| record(c.into()))
            .collect();
        assert!(Checklist::evaluate(&records).is_complete());
    }
}
