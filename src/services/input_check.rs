//! Non-blocking checks on numeric form input.
//!
//! Edits never fail; a mistyped rate silently becomes zero. These checks let the
//! form point that out next to the field without changing what gets stored.

use serde::Serialize;

use crate::numeric::{parse_number, ParseQuality};
use crate::services::derivation::EditAction;
use crate::types::{LineField, RawValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NumericField {
    Quantity,
    Rate,
    DeliveryCost,
    Discount,
    Advance,
}

impl NumericField {
    pub fn label(&self) -> &'static str {
        match self {
            NumericField::Quantity => "Quantity",
            NumericField::Rate => "Rate",
            NumericField::DeliveryCost => "Delivery Cost",
            NumericField::Discount => "Discount",
            NumericField::Advance => "Advance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    /// Nothing numeric in the input; stored as 0.
    NotANumber,
    /// Trailing characters were dropped.
    TrailingText,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputWarning {
    pub field: NumericField,
    /// Line index for quantity/rate edits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub kind: WarningKind,
    pub message: String,
}

pub fn check_action(action: &EditAction) -> Option<InputWarning> {
    let (field, index, value) = match action {
        EditAction::EditLineField {
            index,
            field: LineField::Quantity,
            value,
        } => (NumericField::Quantity, Some(*index), value),
        EditAction::EditLineField {
            index,
            field: LineField::Rate,
            value,
        } => (NumericField::Rate, Some(*index), value),
        EditAction::EditDeliveryCost { value } => (NumericField::DeliveryCost, None, value),
        EditAction::EditDiscount { value } => (NumericField::Discount, None, value),
        EditAction::EditAdvance { value } => (NumericField::Advance, None, value),
        _ => return None,
    };
    check_value(field, value).map(|(kind, message)| InputWarning {
        field,
        index,
        kind,
        message,
    })
}

fn check_value(field: NumericField, value: &RawValue) -> Option<(WarningKind, String)> {
    let parsed = match value {
        RawValue::Number(n) if !n.is_finite() => {
            return Some((
                WarningKind::NotANumber,
                format!("{} is not a number and was set to 0.", field.label()),
            ))
        }
        RawValue::Number(n) => *n,
        RawValue::Text(text) => {
            let parsed = parse_number(text);
            match parsed.quality {
                ParseQuality::Empty | ParseQuality::Exact => {}
                ParseQuality::Invalid => {
                    return Some((
                        WarningKind::NotANumber,
                        format!("{} \"{}\" is not a number and was set to 0.", field.label(), text.trim()),
                    ))
                }
                ParseQuality::Prefix => {
                    return Some((
                        WarningKind::TrailingText,
                        format!(
                            "{} \"{}\" was read as {}.",
                            field.label(),
                            text.trim(),
                            parsed.value
                        ),
                    ))
                }
            }
            parsed.value
        }
    };
    if parsed < 0.0 {
        return Some((
            WarningKind::Negative,
            format!("{} is negative.", field.label()),
        ));
    }
    None
}
