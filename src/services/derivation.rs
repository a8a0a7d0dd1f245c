//! Pure edit transitions for a [`DocumentRecord`].
//!
//! Every form event becomes an [`EditAction`]; [`apply`] returns the next record
//! and leaves the input untouched. Derived values (item amount, subtotal, total)
//! are recomputed here and nowhere else. No transition can fail: bad numbers
//! are read as zero and impossible structural edits are no-ops.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::numeric::raw_to_number;
use crate::types::{DocumentRecord, DocumentType, LineField, LineItem, RawValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EditAction {
    /// Replaces the whole record with the defaults of `document_type`.
    #[serde(rename_all = "camelCase")]
    SwitchDocumentType {
        document_type: DocumentType,
        today: NaiveDate,
    },
    SetDocumentNumber { value: String },
    SetRecipient { value: String },
    SetSubject { value: String },
    SetAddress { value: String },
    SetPhone { value: String },
    SetDate { value: String },
    SetShowTotals { value: bool },
    EditLineField {
        index: usize,
        field: LineField,
        value: RawValue,
    },
    EditDeliveryCost { value: RawValue },
    EditDiscount { value: RawValue },
    EditAdvance { value: RawValue },
    AddLineItem,
    RemoveLineItem { id: u32 },
}

pub fn apply(record: &DocumentRecord, action: &EditAction) -> DocumentRecord {
    match action {
        EditAction::SwitchDocumentType {
            document_type,
            today,
        } => DocumentRecord::new(*document_type, *today),
        EditAction::SetDocumentNumber { value } => DocumentRecord {
            document_number: value.clone(),
            ..record.clone()
        },
        EditAction::SetRecipient { value } => DocumentRecord {
            recipient: value.clone(),
            ..record.clone()
        },
        EditAction::SetSubject { value } => DocumentRecord {
            subject: value.clone(),
            ..record.clone()
        },
        EditAction::SetAddress { value } => DocumentRecord {
            address: value.clone(),
            ..record.clone()
        },
        EditAction::SetPhone { value } => DocumentRecord {
            phone: value.clone(),
            ..record.clone()
        },
        EditAction::SetDate { value } => DocumentRecord {
            date: value.clone(),
            ..record.clone()
        },
        EditAction::SetShowTotals { value } => DocumentRecord {
            show_totals: *value,
            ..record.clone()
        },
        EditAction::EditLineField {
            index,
            field,
            value,
        } => edit_line_field(record, *index, *field, value),
        EditAction::EditDeliveryCost { value } => edit_delivery_cost(record, value),
        EditAction::EditDiscount { value } => edit_discount(record, value),
        EditAction::EditAdvance { value } => edit_advance(record, value),
        EditAction::AddLineItem => add_line_item(record),
        EditAction::RemoveLineItem { id } => remove_line_item(record, *id),
    }
}

/// Applies actions in order, as a sequence of form events would.
pub fn apply_all<'a, I>(record: &DocumentRecord, actions: I) -> DocumentRecord
where
    I: IntoIterator<Item = &'a EditAction>,
{
    actions
        .into_iter()
        .fold(record.clone(), |current, action| apply(&current, action))
}

pub fn edit_line_field(
    record: &DocumentRecord,
    index: usize,
    field: LineField,
    value: &RawValue,
) -> DocumentRecord {
    if index >= record.line_items.len() {
        return record.clone();
    }
    let mut line_items = record.line_items.clone();
    let item = &mut line_items[index];
    match field {
        LineField::Product => item.product = value.as_text(),
        LineField::Description => item.description = value.as_text(),
        LineField::Quantity => {
            item.quantity = raw_to_number(value);
            item.amount = item.quantity * item.rate;
        }
        LineField::Rate => {
            item.rate = raw_to_number(value);
            item.amount = item.quantity * item.rate;
        }
    }
    with_items(record, line_items)
}

/// Only the total moves; the subtotal is taken as it stands.
pub fn edit_delivery_cost(record: &DocumentRecord, value: &RawValue) -> DocumentRecord {
    let delivery_cost = raw_to_number(value);
    DocumentRecord {
        delivery_cost,
        total: record.subtotal + delivery_cost - record.discount,
        ..record.clone()
    }
}

/// Only the total moves; the subtotal is taken as it stands.
pub fn edit_discount(record: &DocumentRecord, value: &RawValue) -> DocumentRecord {
    let discount = raw_to_number(value);
    DocumentRecord {
        discount,
        total: record.subtotal + record.delivery_cost - discount,
        ..record.clone()
    }
}

/// Advance is informational: it is not deducted from the total.
pub fn edit_advance(record: &DocumentRecord, value: &RawValue) -> DocumentRecord {
    DocumentRecord {
        advance: raw_to_number(value),
        ..record.clone()
    }
}

pub fn add_line_item(record: &DocumentRecord) -> DocumentRecord {
    let mut line_items = record.line_items.clone();
    line_items.push(LineItem::blank(record.next_item_id()));
    DocumentRecord {
        line_items,
        ..record.clone()
    }
}

/// Removing the last remaining item is refused.
pub fn remove_line_item(record: &DocumentRecord, id: u32) -> DocumentRecord {
    if record.line_items.len() <= 1 {
        return record.clone();
    }
    let line_items: Vec<LineItem> = record
        .line_items
        .iter()
        .filter(|item| item.id != id)
        .cloned()
        .collect();
    if line_items.is_empty() {
        return record.clone();
    }
    with_items(record, line_items)
}

fn with_items(record: &DocumentRecord, line_items: Vec<LineItem>) -> DocumentRecord {
    let subtotal = subtotal_of(&line_items);
    DocumentRecord {
        line_items,
        subtotal,
        total: subtotal + record.delivery_cost - record.discount,
        ..record.clone()
    }
}

pub fn subtotal_of(items: &[LineItem]) -> f64 {
    items.iter().map(|item| item.amount).sum()
}
