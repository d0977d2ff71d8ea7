use formstage_model::{bank_fields::*, FieldSpec, FormConfig, FormSchema, RecordDraft};
use formstage_session::mock::InMemoryBackend;
use formstage_session::{
    EditSession, FileHandle, PicklistOption, ProviderKind, Providers, SessionError, StatusTone,
};
use formstage_types::{ContentId, ExistingFileRef, FileKey, RecordId};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn account_id() -> RecordId {
    RecordId::new("001Dn00000A1b2C").unwrap()
}

fn letter() -> ExistingFileRef {
    ExistingFileRef::new(ContentId::new("069LETTER").unwrap(), "Bank letter")
}

fn complete_account() -> RecordDraft {
    [
        ("Id", "001Dn00000A1b2C"),
        (BANK_NAME, "First National"),
        (BANK_COUNTRY, "US"),
        (ACCOUNT_NUMBER, "000123456"),
        (SWIFT_CODE, "FNBAUS33"),
        (IBAN, "US00FNBA000123456"),
        (CURRENCY, "USD"),
    ]
    .into_iter()
    .collect()
}

fn backend(draft: RecordDraft) -> InMemoryBackend {
    InMemoryBackend::new()
        .with_record(account_id(), draft)
        .with_record_type("012000000000000AAA")
        .with_label(BANK_NAME, "Bank Name")
        .with_label(IBAN, "IBAN")
        .with_picklist(
            CURRENCY,
            vec![PicklistOption::new("US Dollar", "USD"), PicklistOption::new("Euro", "EUR")],
        )
        .with_picklist(BANK_COUNTRY, vec![PicklistOption::new("United States", "US")])
        .with_blob("blob:statement", b"%PDF-statement".as_slice())
        .with_blob("blob:letter2", b"%PDF-letter2".as_slice())
}

async fn open(backend: Arc<InMemoryBackend>) -> EditSession {
    init_tracing();
    EditSession::open(account_id(), FormConfig::default(), Providers::from_backend(backend))
        .await
        .unwrap()
}

// ── Opening ──────────────────────────────────────────────────────

#[tokio::test]
async fn open_loads_record_files_and_metadata() {
    let backend = Arc::new(backend(complete_account()).with_existing_file(account_id(), letter()));
    let session = open(backend).await;

    assert_eq!(session.record_id(), &account_id());
    assert_eq!(session.engine().draft(), &complete_account());
    assert_eq!(session.engine().existing_files(), &[letter()]);
    assert_eq!(session.record_type_id(), Some("012000000000000AAA"));
    assert_eq!(session.label(BANK_NAME), "Bank Name");
    assert_eq!(session.label(SWIFT_CODE), SWIFT_CODE);
    assert_eq!(session.options(CURRENCY).len(), 2);
    assert_eq!(session.options(BANK_COUNTRY)[0].value, "US");
    assert!(session.options(IBAN).is_empty());
    assert!(session.can_save());
    assert!(session.panel().complete);
    assert!(session.panel().edit_mode);
}

#[tokio::test]
async fn open_missing_record_fails() {
    init_tracing();
    let backend = Arc::new(InMemoryBackend::new());
    let err = EditSession::open(account_id(), FormConfig::default(), Providers::from_backend(backend))
        .await
        .err()
        .unwrap();
    match err {
        SessionError::Provider(e) => assert_eq!(e.provider, ProviderKind::RecordFetch),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn open_listing_failure_is_returned() {
    init_tracing();
    let backend = Arc::new(backend(complete_account()));
    backend.fail(ProviderKind::FileListing);
    let result =
        EditSession::open(account_id(), FormConfig::default(), Providers::from_backend(backend)).await;
    assert!(matches!(
        result,
        Err(SessionError::Provider(ref e)) if e.provider == ProviderKind::FileListing
    ));
}

#[tokio::test]
async fn open_tolerates_metadata_failure() {
    let backend = Arc::new(backend(complete_account()));
    backend.fail(ProviderKind::Metadata);
    let session = open(backend).await;
    assert!(session.labels().is_empty());
    assert_eq!(session.record_type_id(), None);
    assert!(session.options(CURRENCY).is_empty());
    assert_eq!(session.label(BANK_NAME), BANK_NAME);
}

#[tokio::test]
async fn open_tolerates_picklist_failure() {
    let backend = Arc::new(backend(complete_account()));
    backend.fail(ProviderKind::Picklist);
    let session = open(backend).await;
    assert_eq!(session.label(IBAN), "IBAN");
    assert!(session.options(CURRENCY).is_empty());
}

#[tokio::test]
async fn open_with_custom_schema() {
    init_tracing();
    let backend = Arc::new(backend(complete_account()).with_existing_file(account_id(), letter()));
    let schema = FormSchema::bank_details().with_field(FieldSpec::required("Tax_Id__c"));
    let session = EditSession::open_with_schema(
        account_id(),
        FormConfig::default(),
        schema,
        Providers::from_backend(backend),
    )
    .await
    .unwrap();
    assert!(!session.can_save());
    assert!(!session.panel().complete);
}

// ── Editing ──────────────────────────────────────────────────────

#[tokio::test]
async fn set_field_updates_panel() {
    let backend = Arc::new(backend(complete_account()).with_existing_file(account_id(), letter()));
    let mut session = open(backend).await;
    assert_eq!(session.panel().status_tone(), StatusTone::Success);

    let result = session.set_field(BANK_NAME, json!("")).unwrap();
    assert!(!result.can_save);
    assert!(!session.panel().complete);
    assert_eq!(session.panel().status_message(), "Please complete your details here ");

    session.set_field(BANK_NAME, json!("Second National")).unwrap();
    assert!(session.panel().complete);
    assert_eq!(session.panel().status_message(), "Details completed ");
}

#[tokio::test]
async fn set_unknown_field_is_engine_error() {
    let mut session = open(Arc::new(backend(complete_account()))).await;
    let err = session.set_field("Name", json!("ACME")).unwrap_err();
    assert!(matches!(err, SessionError::Engine(_)));
}

#[tokio::test]
async fn attach_files_stages_in_order() {
    let mut session = open(Arc::new(backend(complete_account()))).await;
    assert!(!session.can_save());

    let added = session
        .attach_files(&[
            FileHandle::new("statement.pdf", "blob:statement"),
            FileHandle::new("letter2.pdf", "blob:letter2"),
        ])
        .await
        .unwrap();
    assert_eq!(added.len(), 2);
    assert_eq!(added[0].file_name, "statement.pdf");
    assert_eq!(added[0].content.as_bytes(), b"%PDF-statement");
    assert_eq!(added[1].file_name, "letter2.pdf");
    assert!(session.can_save());
    assert!(session.panel().complete);
}

#[tokio::test]
async fn attach_files_is_all_or_nothing() {
    let mut session = open(Arc::new(backend(complete_account()))).await;
    let err = session
        .attach_files(&[
            FileHandle::new("statement.pdf", "blob:statement"),
            FileHandle::new("missing.pdf", "blob:missing"),
        ])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Provider(ref e) if e.provider == ProviderKind::FileRead
    ));
    assert!(session.engine().staged_files().is_empty());
}

#[tokio::test]
async fn remove_file_updates_panel() {
    let backend = Arc::new(backend(complete_account()).with_existing_file(account_id(), letter()));
    let mut session = open(backend).await;
    assert!(session.remove_file(&FileKey::from(&letter())));
    assert!(!session.can_save());
    assert!(!session.panel().complete);
    assert_eq!(
        session.engine().pending_deletions(),
        &[ContentId::new("069LETTER").unwrap()]
    );
}

// ── Saving ───────────────────────────────────────────────────────

#[tokio::test]
async fn save_not_ready_highlights_and_fails() {
    let backend = Arc::new(backend(RecordDraft::new()));
    let mut session = open(backend.clone()).await;
    assert_eq!(session.validation().visible_errors().count(), 0);

    let err = session.save().await.unwrap_err();
    assert!(matches!(err, SessionError::NotReady));
    assert_eq!(session.validation().visible_errors().count(), 6);
    assert!(backend.saves().is_empty());
    assert!(session.panel().edit_mode);
}

#[tokio::test]
async fn save_commits_and_refreshes() {
    let backend = Arc::new(backend(complete_account()).with_existing_file(account_id(), letter()));
    let mut session = open(backend.clone()).await;

    session.set_field(CURRENCY, json!("EUR")).unwrap();
    session
        .attach_files(&[FileHandle::new("statement.pdf", "blob:statement")])
        .await
        .unwrap();
    session.remove_file(&FileKey::from(&letter()));

    session.save().await.unwrap();

    let saves = backend.saves();
    assert_eq!(saves.len(), 1);
    let (saved_id, snapshot) = &saves[0];
    assert_eq!(saved_id, &account_id());
    assert_eq!(snapshot.record.get_str(CURRENCY), Some("EUR"));
    assert_eq!(snapshot.files_to_add.len(), 1);
    assert_eq!(snapshot.files_to_delete, vec![letter().content_id]);

    assert!(session.engine().staged_files().is_empty());
    assert!(session.engine().pending_deletions().is_empty());
    let shown: Vec<_> = session
        .engine()
        .existing_files()
        .iter()
        .map(|f| f.label.as_str())
        .collect();
    assert_eq!(shown, vec!["statement.pdf"]);
    assert_eq!(session.engine().draft().get_str(CURRENCY), Some("EUR"));
    assert!(session.can_save());
    assert!(session.panel().complete);
    assert!(!session.panel().edit_mode);
}

#[tokio::test]
async fn save_failure_leaves_state_for_retry() {
    let backend = Arc::new(backend(complete_account()).with_existing_file(account_id(), letter()));
    let mut session = open(backend.clone()).await;
    session
        .attach_files(&[FileHandle::new("statement.pdf", "blob:statement")])
        .await
        .unwrap();
    session.remove_file(&FileKey::from(&letter()));
    let before = session.engine().snapshot_for_save();

    backend.fail(ProviderKind::Persistence);
    let err = session.save().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Provider(ref e) if e.provider == ProviderKind::Persistence
    ));
    assert_eq!(session.engine().snapshot_for_save(), before);
    assert!(session.panel().edit_mode);
    assert!(backend.saves().is_empty());

    backend.recover(ProviderKind::Persistence);
    session.save().await.unwrap();
    assert_eq!(backend.saves().len(), 1);
    assert!(session.engine().staged_files().is_empty());
}

#[tokio::test]
async fn save_succeeds_even_if_refresh_fails() {
    let backend = Arc::new(backend(complete_account()));
    let mut session = open(backend.clone()).await;
    session
        .attach_files(&[FileHandle::new("statement.pdf", "blob:statement")])
        .await
        .unwrap();

    backend.fail(ProviderKind::FileListing);
    session.save().await.unwrap();
    assert_eq!(backend.saves().len(), 1);
    assert!(session.engine().staged_files().is_empty());
    // The new file is stored but the listing could not be re-read.
    assert!(session.engine().existing_files().is_empty());
    assert_eq!(backend.files(&account_id()).len(), 1);
    assert!(session.panel().complete);
    assert_eq!(session.panel().status_message(), "Details completed ");
    assert!(!session.panel().edit_mode);
}

#[tokio::test]
async fn refresh_fetches_record_when_listing_fails() {
    let backend = Arc::new(backend(complete_account()).with_existing_file(account_id(), letter()));
    let mut session = open(backend.clone()).await;
    session.set_field(CURRENCY, json!("EUR")).unwrap();

    backend.fail(ProviderKind::FileListing);
    let err = session.refresh().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Provider(ref e) if e.provider == ProviderKind::FileListing
    ));
    assert_eq!(session.engine().draft().get_str(CURRENCY), Some("USD"));
    assert_eq!(session.engine().existing_files(), &[letter()]);
}

#[tokio::test]
async fn refresh_reports_listing_error_before_record_error() {
    let backend = Arc::new(backend(complete_account()));
    let mut session = open(backend.clone()).await;

    backend.fail(ProviderKind::FileListing);
    backend.fail(ProviderKind::RecordFetch);
    let err = session.refresh().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Provider(ref e) if e.provider == ProviderKind::FileListing
    ));

    backend.recover(ProviderKind::FileListing);
    let err = session.refresh().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Provider(ref e) if e.provider == ProviderKind::RecordFetch
    ));
}

#[tokio::test]
async fn edit_after_save_returns_to_form() {
    let backend = Arc::new(backend(complete_account()).with_existing_file(account_id(), letter()));
    let mut session = open(backend).await;
    session.save().await.unwrap();
    assert!(!session.panel().edit_mode);
    session.edit();
    assert!(session.panel().edit_mode);
}

// ── Viewing ──────────────────────────────────────────────────────

#[tokio::test]
async fn view_lists_labelled_fields_and_links() {
    let backend = Arc::new(backend(complete_account()).with_existing_file(account_id(), letter()));
    let session = open(backend).await;
    let view = session.view();

    assert_eq!(view.rows.len(), 9);
    let bank = view.row(BANK_NAME).unwrap();
    assert_eq!(bank.label, "Bank Name");
    assert_eq!(bank.value, json!("First National"));
    let routing = view.row(ROUTING_NUMBER).unwrap();
    assert_eq!(routing.label, ROUTING_NUMBER);
    assert_eq!(routing.value, serde_json::Value::Null);
    assert!(view.row("Id").is_none());

    assert_eq!(view.files.len(), 1);
    assert_eq!(
        view.files[0].download_url,
        "/sfc/servlet.shepherd/document/download/069LETTER"
    );
}

#[tokio::test]
async fn panel_toggle_through_session() {
    let mut session = open(Arc::new(backend(complete_account()))).await;
    assert_eq!(session.panel().status_icon(), "utility:chevronright");
    session.panel_mut().toggle_section();
    assert_eq!(session.panel().status_icon(), "utility:chevrondown");
}
