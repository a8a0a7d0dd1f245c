use chrono::NaiveDate;
use docgen_lib::config::{AppConfig, Signatory};
use docgen_lib::services::derivation::apply_all;
use docgen_lib::{
    apply, open_draft_store, project, DocumentRecord, DocumentSession, DocumentType, EditAction,
    LineField,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
}

fn edit(index: usize, field: LineField, value: &str) -> EditAction {
    EditAction::EditLineField {
        index,
        field,
        value: value.into(),
    }
}

#[test]
fn quotation_from_blank_form_to_printed_totals() {
    let mut session = DocumentSession::new(DocumentType::Invoice, today(), Signatory::default());

    session.apply(&EditAction::SwitchDocumentType {
        document_type: DocumentType::Quotation,
        today: today(),
    });
    session.apply(&EditAction::SetRecipient {
        value: "Bangladesh Swimming Federation".into(),
    });
    session.apply(&edit(0, LineField::Product, "Visiting Card"));
    session.apply(&edit(0, LineField::Quantity, "1000"));
    session.apply(&edit(0, LineField::Rate, "2.25"));
    session.apply(&EditAction::AddLineItem);
    session.apply(&edit(1, LineField::Product, "Bottle Labels"));
    session.apply(&edit(1, LineField::Quantity, "500"));
    session.apply(&edit(1, LineField::Rate, "3"));
    session.apply(&EditAction::EditDeliveryCost { value: "100".into() });
    let view = session.apply(&EditAction::EditDiscount { value: "50".into() });

    assert_eq!(view.record.subtotal, 3750.0);
    assert_eq!(view.record.total, 3800.0);
    let totals = view.preview.totals.expect("quotation shows totals by default");
    assert_eq!(totals.subtotal, "3750/-");
    assert_eq!(totals.delivery_cost.as_deref(), Some("100/-"));
    assert_eq!(totals.discount.as_deref(), Some("-50/-"));
    assert_eq!(totals.total, "3800/-");
    assert_eq!(view.preview.terms.len(), 5);

    let view = session.apply(&EditAction::SetShowTotals { value: false });
    assert!(view.preview.totals.is_none());
}

#[test]
fn switching_type_discards_edits() {
    let record = apply_all(
        &DocumentRecord::new(DocumentType::Invoice, today()),
        &[
            edit(0, LineField::Quantity, "1000"),
            edit(0, LineField::Rate, "2.25"),
            EditAction::EditAdvance { value: "500".into() },
        ],
    );
    assert_eq!(record.total, 2250.0);
    assert_eq!(record.advance, 500.0);

    let switched = apply(
        &record,
        &EditAction::SwitchDocumentType {
            document_type: DocumentType::DeliveryChallan,
            today: today(),
        },
    );
    assert_eq!(switched.document_type, DocumentType::DeliveryChallan);
    assert_eq!(switched.line_items.len(), 1);
    assert_eq!(switched.line_items[0].quantity, 0.0);
    assert_eq!(switched.total, 0.0);
    assert_eq!(switched.advance, 0.0);
    assert_eq!(switched.date, "2025-02-28");
}

#[test]
fn drafts_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::with_data_dir(dir.path().to_path_buf());

    let record = apply_all(
        &DocumentRecord::new(DocumentType::Invoice, today()),
        &[
            EditAction::SetDocumentNumber { value: "INV-42".into() },
            edit(0, LineField::Quantity, "12"),
            edit(0, LineField::Rate, "7.5"),
        ],
    );
    {
        let drafts = open_draft_store(&config);
        let outcome = drafts.save_or_notice(DocumentType::Invoice, &record);
        assert!(outcome.saved);
    }

    let drafts = open_draft_store(&config);
    let restored = drafts.load_latest(DocumentType::Invoice).unwrap();
    assert_eq!(restored, Some(record));
    assert_eq!(drafts.load_latest(DocumentType::Quotation).unwrap(), None);
    assert_eq!(drafts.list(DocumentType::Invoice).unwrap()[0].total, 90.0);
}

#[test]
fn advance_is_tracked_but_never_deducted_or_printed() {
    let record = apply_all(
        &DocumentRecord::new(DocumentType::Invoice, today()),
        &[
            edit(0, LineField::Quantity, "10"),
            edit(0, LineField::Rate, "100"),
            EditAction::EditAdvance { value: "400".into() },
        ],
    );
    assert_eq!(record.total, 1000.0);
    let preview = project(&record, &Signatory::default());
    assert_eq!(preview.totals.unwrap().total, "1000/-");
    let json = serde_json::to_string(&preview.details).unwrap();
    assert!(!json.contains("400"));
}
