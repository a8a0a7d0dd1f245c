//! The document currently open in the form.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Signatory;
use crate::models::DocumentPreview;
use crate::services::derivation::{self, EditAction};
use crate::services::input_check::{check_action, InputWarning};
use crate::services::projection::project;
use crate::types::{DocumentRecord, DocumentType, FieldSet};

/// What the webview re-renders after every event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub record: DocumentRecord,
    pub preview: DocumentPreview,
    pub warnings: Vec<InputWarning>,
}

/// Entry of the document type picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeInfo {
    pub key: &'static str,
    pub label: &'static str,
    pub number_label: &'static str,
    pub fields: FieldSet,
}

pub fn document_types() -> Vec<DocumentTypeInfo> {
    DocumentType::ALL
        .iter()
        .map(|doc_type| DocumentTypeInfo {
            key: doc_type.key(),
            label: doc_type.menu_label(),
            number_label: doc_type.number_label(),
            fields: doc_type.fields(),
        })
        .collect()
}

pub struct DocumentSession {
    record: DocumentRecord,
    signatory: Signatory,
}

impl DocumentSession {
    pub fn new(document_type: DocumentType, today: NaiveDate, signatory: Signatory) -> Self {
        Self {
            record: DocumentRecord::new(document_type, today),
            signatory,
        }
    }

    pub fn record(&self) -> &DocumentRecord {
        &self.record
    }

    pub fn document_type(&self) -> DocumentType {
        self.record.document_type
    }

    pub fn view(&self) -> DocumentView {
        self.view_with(Vec::new())
    }

    fn view_with(&self, warnings: Vec<InputWarning>) -> DocumentView {
        DocumentView {
            record: self.record.clone(),
            preview: project(&self.record, &self.signatory),
            warnings,
        }
    }

    pub fn apply(&mut self, action: &EditAction) -> DocumentView {
        let warnings = check_action(action).into_iter().collect();
        self.record = derivation::apply(&self.record, action);
        self.view_with(warnings)
    }

    /// Replace the open document with a restored draft.
    pub fn restore(&mut self, record: DocumentRecord) -> DocumentView {
        self.record = record;
        self.view()
    }
}
