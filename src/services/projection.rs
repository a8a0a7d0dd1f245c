//! Print layout projection.
//!
//! [`project`] turns a record into the strings the preview shows. Placeholder
//! text fills empty fields here only; it is never written back into the record.

use chrono::NaiveDate;

use crate::config::Signatory;
use crate::models::{DetailRow, DocumentPreview, PreviewRow, SignatureBlock, TotalsBlock};
use crate::types::{DocumentRecord, DocumentType, LineItem};

pub const PLACEHOLDER_RECIPIENT: &str = "Bangladesh Swimming Federation";
pub const PLACEHOLDER_SUBJECT: &str = "Quotation for Visiting Card, Bottle Labels, Bottle Packet.";
pub const PLACEHOLDER_DATE: &str = "28 Feb, 2025";
pub const PLACEHOLDER_PRODUCT: &str = "Visiting Card";
pub const PLACEHOLDER_QUANTITY: &str = "1000";
pub const PLACEHOLDER_AMOUNT: &str = "0000";
pub const PLACEHOLDER_TOTAL: &str = "00,000";

/// Suffix printed after every money value.
pub const MONEY_SUFFIX: &str = "/-";

pub const QUOTATION_TERMS: [&str; 5] = [
    "A 50% advance payment is required. Remaining 50% due upon completion within 15 days of delivery.",
    "Valid for 15 days from issue date unless specified (*depends on raw materials price).",
    "Changes after confirmation may incur additional costs.",
    "Delivery dates agreed upon at order confirmation.",
    "Prices exclude Vat & Taxes. A carrying charge will be added.",
];

pub fn project(record: &DocumentRecord, signatory: &Signatory) -> DocumentPreview {
    let doc_type = record.document_type;
    let fields = doc_type.fields();

    let number_line = (!record.document_number.is_empty())
        .then(|| format!("{} #: {}", doc_type.short_name(), record.document_number));

    let rows = record
        .line_items
        .iter()
        .map(|item| preview_row(item, fields.pricing))
        .collect();

    let totals = match doc_type {
        DocumentType::DeliveryChallan => None,
        DocumentType::Quotation if !record.show_totals => None,
        DocumentType::Invoice | DocumentType::Quotation => Some(totals_block(record)),
    };

    let terms = match doc_type {
        DocumentType::Quotation => QUOTATION_TERMS.iter().map(|t| t.to_string()).collect(),
        DocumentType::Invoice | DocumentType::DeliveryChallan => Vec::new(),
    };

    DocumentPreview {
        document_type: doc_type,
        title: doc_type.title().to_string(),
        number_line,
        details: detail_rows(record),
        fields,
        rows,
        totals,
        terms,
        signatures: signature_blocks(doc_type, signatory),
        generate_label: format!("Generate {}", doc_type.short_name()),
    }
}

fn detail_rows(record: &DocumentRecord) -> Vec<DetailRow> {
    let mut details = vec![
        detail("RECIPIENT", or_placeholder(&record.recipient, PLACEHOLDER_RECIPIENT)),
        detail("SUBJECT", or_placeholder(&record.subject, PLACEHOLDER_SUBJECT)),
        detail(
            "DATE",
            format_date(&record.date).unwrap_or_else(|| PLACEHOLDER_DATE.to_string()),
        ),
    ];
    if !record.address.trim().is_empty() {
        details.push(detail("ADDRESS", record.address.clone()));
    }
    if !record.phone.trim().is_empty() {
        details.push(detail("PHONE", record.phone.clone()));
    }
    details
}

fn detail(label: &str, value: String) -> DetailRow {
    DetailRow {
        label: label.to_string(),
        value,
    }
}

fn preview_row(item: &LineItem, pricing: bool) -> PreviewRow {
    let quantity = if item.quantity == 0.0 {
        PLACEHOLDER_QUANTITY.to_string()
    } else {
        item.quantity.to_string()
    };
    let (rate, amount) = if pricing {
        let amount = if item.amount == 0.0 {
            PLACEHOLDER_AMOUNT.to_string()
        } else {
            format_whole(item.amount)
        };
        (
            Some(format!("{}{}", format_rate(item.rate), MONEY_SUFFIX)),
            Some(format!("{}{}", amount, MONEY_SUFFIX)),
        )
    } else {
        (None, None)
    };
    PreviewRow {
        id: item.id,
        product: or_placeholder(&item.product, PLACEHOLDER_PRODUCT),
        description: item.description.clone(),
        quantity,
        rate,
        amount,
    }
}

fn totals_block(record: &DocumentRecord) -> TotalsBlock {
    let subtotal = if record.subtotal == 0.0 {
        "0".to_string()
    } else {
        format_whole(record.subtotal)
    };
    let total = if record.total == 0.0 {
        PLACEHOLDER_TOTAL.to_string()
    } else {
        format_whole(record.total)
    };
    TotalsBlock {
        subtotal: format!("{}{}", subtotal, MONEY_SUFFIX),
        delivery_cost: (record.delivery_cost > 0.0)
            .then(|| format!("{}{}", format_whole(record.delivery_cost), MONEY_SUFFIX)),
        discount: (record.discount > 0.0)
            .then(|| format!("-{}{}", format_whole(record.discount), MONEY_SUFFIX)),
        total: format!("{}{}", total, MONEY_SUFFIX),
    }
}

fn signature_blocks(doc_type: DocumentType, signatory: &Signatory) -> Vec<SignatureBlock> {
    let mut blocks = Vec::with_capacity(2);
    if doc_type.fields().recipient_signature {
        blocks.push(SignatureBlock {
            name: "Recipient's Signature".to_string(),
            caption: "I have received all items properly".to_string(),
        });
    }
    blocks.push(SignatureBlock {
        name: signatory.name.clone(),
        caption: signatory.title.clone(),
    });
    blocks
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// "2025-02-28" -> "28 Feb, 2025". `None` when the text is not a calendar date.
pub fn format_date(iso: &str) -> Option<String> {
    NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%-d %b, %Y").to_string())
}

/// Two decimals, for rates.
pub fn format_rate(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.2}", value)
}

/// No decimals, rounding half away from zero. Display only.
pub fn format_whole(value: f64) -> String {
    let rounded = value.round();
    // avoid printing "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.0}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::derivation::{apply_all, EditAction};
    use crate::types::LineField;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
    }

    fn priced(doc_type: DocumentType) -> DocumentRecord {
        apply_all(
            &DocumentRecord::new(doc_type, today()),
            &[
                EditAction::EditLineField {
                    index: 0,
                    field: LineField::Quantity,
                    value: "1000".into(),
                },
                EditAction::EditLineField {
                    index: 0,
                    field: LineField::Rate,
                    value: "2.25".into(),
                },
            ],
        )
    }

    #[test]
    fn titles_follow_document_type() {
        let signatory = Signatory::default();
        for (doc_type, title) in [
            (DocumentType::Invoice, "INVOICE"),
            (DocumentType::DeliveryChallan, "DELIVERY CHALLAN"),
            (DocumentType::Quotation, "QUOTATION"),
        ] {
            let preview = project(&DocumentRecord::new(doc_type, today()), &signatory);
            assert_eq!(preview.title, title);
        }
    }

    #[test]
    fn empty_fields_show_placeholders_without_touching_the_record() {
        let record = DocumentRecord::new(DocumentType::Invoice, today());
        let before = record.clone();
        let preview = project(&record, &Signatory::default());

        assert_eq!(preview.details[0].value, PLACEHOLDER_RECIPIENT);
        assert_eq!(preview.details[1].value, PLACEHOLDER_SUBJECT);
        assert_eq!(preview.details[2].value, "4 Mar, 2025");
        assert_eq!(preview.details.len(), 3);
        assert_eq!(preview.number_line, None);

        let row = &preview.rows[0];
        assert_eq!(row.product, PLACEHOLDER_PRODUCT);
        assert_eq!(row.quantity, "1000");
        assert_eq!(row.rate.as_deref(), Some("0.00/-"));
        assert_eq!(row.amount.as_deref(), Some("0000/-"));

        let totals = preview.totals.unwrap();
        assert_eq!(totals.subtotal, "0/-");
        assert_eq!(totals.total, "00,000/-");
        assert_eq!(record, before);
    }

    #[test]
    fn bad_date_falls_back_to_placeholder() {
        let mut record = DocumentRecord::new(DocumentType::Invoice, today());
        record.date = "not a date".to_string();
        let preview = project(&record, &Signatory::default());
        assert_eq!(preview.details[2].value, PLACEHOLDER_DATE);
        assert_eq!(format_date("2025-02-28").as_deref(), Some("28 Feb, 2025"));
    }

    #[test]
    fn money_uses_fixed_decimals() {
        let mut record = priced(DocumentType::Invoice);
        record.document_number = "INV-7".to_string();
        let preview = project(&record, &Signatory::default());
        assert_eq!(preview.number_line.as_deref(), Some("Invoice #: INV-7"));
        assert_eq!(preview.rows[0].rate.as_deref(), Some("2.25/-"));
        assert_eq!(preview.rows[0].amount.as_deref(), Some("2250/-"));
        assert_eq!(preview.totals.unwrap().total, "2250/-");
        assert_eq!(format_whole(2.5), "3");
        assert_eq!(format_whole(-0.4), "0");
        assert_eq!(format_rate(1.0), "1.00");
    }

    #[test]
    fn charge_rows_only_when_positive() {
        let record = priced(DocumentType::Invoice);
        let totals = project(&record, &Signatory::default()).totals.unwrap();
        assert_eq!(totals.delivery_cost, None);
        assert_eq!(totals.discount, None);

        let record = apply_all(
            &record,
            &[
                EditAction::EditDeliveryCost { value: "100".into() },
                EditAction::EditDiscount { value: "50".into() },
            ],
        );
        let totals = project(&record, &Signatory::default()).totals.unwrap();
        assert_eq!(totals.delivery_cost.as_deref(), Some("100/-"));
        assert_eq!(totals.discount.as_deref(), Some("-50/-"));
        assert_eq!(totals.total, "2300/-");
    }

    #[test]
    fn quotation_can_hide_totals_and_shows_terms() {
        let record = priced(DocumentType::Quotation);
        let preview = project(&record, &Signatory::default());
        assert!(preview.totals.is_some());
        assert_eq!(preview.terms.len(), QUOTATION_TERMS.len());

        let hidden = apply_all(&record, &[EditAction::SetShowTotals { value: false }]);
        let preview = project(&hidden, &Signatory::default());
        assert_eq!(preview.totals, None);
        assert_eq!(preview.generate_label, "Generate Quotation");
    }

    #[test]
    fn invoice_ignores_show_totals() {
        let mut record = priced(DocumentType::Invoice);
        record.show_totals = false;
        let preview = project(&record, &Signatory::default());
        assert!(preview.totals.is_some());
        assert!(preview.terms.is_empty());
    }

    #[test]
    fn challan_drops_pricing_and_adds_recipient_signature() {
        let record = priced(DocumentType::DeliveryChallan);
        let preview = project(&record, &Signatory::default());
        assert_eq!(preview.rows[0].rate, None);
        assert_eq!(preview.rows[0].amount, None);
        assert_eq!(preview.rows[0].quantity, "1000");
        assert_eq!(preview.totals, None);
        assert!(preview.terms.is_empty());
        assert_eq!(preview.signatures.len(), 2);
        assert_eq!(preview.signatures[0].name, "Recipient's Signature");
        assert_eq!(preview.signatures[1].name, Signatory::default().name);
        assert_eq!(preview.generate_label, "Generate Challan");
    }

    #[test]
    fn address_and_phone_render_when_present() {
        let record = apply_all(
            &DocumentRecord::new(DocumentType::Invoice, today()),
            &[
                EditAction::SetAddress {
                    value: "Dhaka".into(),
                },
                EditAction::SetPhone {
                    value: "+880 1711".into(),
                },
            ],
        );
        let preview = project(&record, &Signatory::default());
        let labels: Vec<&str> = preview.details.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["RECIPIENT", "SUBJECT", "DATE", "ADDRESS", "PHONE"]);
    }

    #[test]
    fn fractional_quantity_is_shown_as_entered() {
        let record = apply_all(
            &DocumentRecord::new(DocumentType::Invoice, today()),
            &[EditAction::EditLineField {
                index: 0,
                field: LineField::Quantity,
                value: "2.5".into(),
            }],
        );
        assert_eq!(project(&record, &Signatory::default()).rows[0].quantity, "2.5");
    }

    #[test]
    fn negative_zero_rate_prints_as_zero() {
        let record = apply_all(
            &DocumentRecord::new(DocumentType::Invoice, today()),
            &[EditAction::EditLineField {
                index: 0,
                field: LineField::Rate,
                value: "-0".into(),
            }],
        );
        let preview = project(&record, &Signatory::default());
        assert_eq!(preview.rows[0].rate.as_deref(), Some("0.00/-"));
        assert_eq!(format_rate(-0.0), "0.00");
    }
}
