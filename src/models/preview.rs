use serde::{Deserialize, Serialize};

use crate::types::{DocumentType, FieldSet};

/// Everything the print layout shows, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPreview {
    pub document_type: DocumentType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_line: Option<String>,
    pub details: Vec<DetailRow>,
    pub fields: FieldSet,
    pub rows: Vec<PreviewRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<TotalsBlock>,
    pub terms: Vec<String>,
    pub signatures: Vec<SignatureBlock>,
    /// Caption of the print action, e.g. "Generate Challan".
    pub generate_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRow {
    pub id: u32,
    pub product: String,
    pub description: String,
    pub quantity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsBlock {
    pub subtotal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureBlock {
    pub name: String,
    pub caption: String,
}
