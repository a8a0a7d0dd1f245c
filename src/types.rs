use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Description every freshly added line item starts with.
pub const DEFAULT_ITEM_DESCRIPTION: &str = "As per Sample";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    Invoice,
    DeliveryChallan,
    Quotation,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::Invoice,
        DocumentType::DeliveryChallan,
        DocumentType::Quotation,
    ];

    /// Storage key, identical to the serialized form.
    pub fn key(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::DeliveryChallan => "delivery-challan",
            DocumentType::Quotation => "quotation",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "invoice" => Some(DocumentType::Invoice),
            "delivery-challan" => Some(DocumentType::DeliveryChallan),
            "quotation" => Some(DocumentType::Quotation),
            _ => None,
        }
    }

    /// Heading printed at the top of the document.
    pub fn title(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "INVOICE",
            DocumentType::DeliveryChallan => "DELIVERY CHALLAN",
            DocumentType::Quotation => "QUOTATION",
        }
    }

    /// Name shown in the document type picker.
    pub fn menu_label(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "Invoice",
            DocumentType::DeliveryChallan => "Delivery Challan",
            DocumentType::Quotation => "Quotation",
        }
    }

    /// Short name used on the number line and the generate action ("Generate Challan").
    pub fn short_name(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "Invoice",
            DocumentType::DeliveryChallan => "Challan",
            DocumentType::Quotation => "Quotation",
        }
    }

    pub fn number_label(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "Invoice #",
            DocumentType::DeliveryChallan => "Challan #",
            DocumentType::Quotation => "Quotation #",
        }
    }

    pub fn fields(&self) -> FieldSet {
        match self {
            DocumentType::Invoice => FieldSet {
                pricing: true,
                charges: true,
                advance: true,
                totals_toggle: false,
                terms: false,
                recipient_signature: false,
            },
            DocumentType::DeliveryChallan => FieldSet {
                pricing: false,
                charges: false,
                advance: false,
                totals_toggle: false,
                terms: false,
                recipient_signature: true,
            },
            DocumentType::Quotation => FieldSet {
                pricing: true,
                charges: true,
                advance: false,
                totals_toggle: true,
                terms: true,
                recipient_signature: false,
            },
        }
    }
}

/// Which optional parts of the form and the printed layout are active for a document type.
/// The record itself always carries every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSet {
    /// Rate and amount columns.
    pub pricing: bool,
    /// Delivery cost and discount.
    pub charges: bool,
    pub advance: bool,
    pub totals_toggle: bool,
    pub terms: bool,
    pub recipient_signature: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: u32,
    pub product: String,
    pub description: String,
    pub quantity: f64,
    pub rate: f64,
    pub amount: f64,
}

impl LineItem {
    pub fn blank(id: u32) -> Self {
        Self {
            id,
            product: String::new(),
            description: DEFAULT_ITEM_DESCRIPTION.to_string(),
            quantity: 0.0,
            rate: 0.0,
            amount: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub document_type: DocumentType,
    pub document_number: String,
    pub recipient: String,
    pub subject: String,
    pub address: String,
    pub phone: String,
    /// ISO-8601 date (YYYY-MM-DD) as entered; parsed only for display.
    pub date: String,
    pub line_items: Vec<LineItem>,
    pub subtotal: f64,
    pub delivery_cost: f64,
    pub discount: f64,
    pub total: f64,
    pub show_totals: bool,
    pub advance: f64,
}

impl DocumentRecord {
    /// Fresh record with the defaults of `document_type`, dated `today`.
    pub fn new(document_type: DocumentType, today: chrono::NaiveDate) -> Self {
        Self {
            document_type,
            document_number: String::new(),
            recipient: String::new(),
            subject: String::new(),
            address: String::new(),
            phone: String::new(),
            date: today.format("%Y-%m-%d").to_string(),
            line_items: vec![LineItem::blank(1)],
            subtotal: 0.0,
            delivery_cost: 0.0,
            discount: 0.0,
            total: 0.0,
            show_totals: true,
            advance: 0.0,
        }
    }

    /// Next free item id: one past the largest id in use, or the lowest free id once
    /// the largest is `u32::MAX` (only reachable through a hand-edited draft).
    pub fn next_item_id(&self) -> u32 {
        let max = self.line_items.iter().map(|item| item.id).max().unwrap_or(0);
        max.checked_add(1).unwrap_or_else(|| {
            let used: HashSet<u32> = self.line_items.iter().map(|item| item.id).collect();
            (1..=u32::MAX).find(|id| !used.contains(id)).unwrap_or(0)
        })
    }
}

/// Raw input from a form control: text boxes send strings, some widgets send numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn as_text(&self) -> String {
        match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineField {
    Product,
    Description,
    Quantity,
    Rate,
}
