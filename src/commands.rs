use serde::Serialize;
use std::path::Path;
use std::sync::Mutex;
use tauri::{AppHandle, Manager, State};

use crate::config::AppConfig;
use crate::drafts::{BlobStore, DraftStore, DraftSummary, SaveOutcome};
use crate::excel;
use crate::services::derivation::EditAction;
use crate::session::{self, DocumentSession, DocumentTypeInfo, DocumentView};
use crate::types::DocumentType;

pub struct AppState {
    pub config: AppConfig,
    pub session: Mutex<DocumentSession>,
    pub drafts: DraftStore<Box<dyn BlobStore + Send + Sync>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadDraftResponse {
    pub restored: bool,
    pub notice: String,
    pub view: DocumentView,
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

#[tauri::command]
pub fn get_app_data_path(app: AppHandle) -> Result<String, String> {
    let path = app.path().app_data_dir().map_err(|e| e.to_string())?;
    path.to_str()
        .map(String::from)
        .ok_or_else(|| "Invalid path".to_string())
}

#[tauri::command]
pub fn get_app_version(app: AppHandle) -> String {
    app.package_info().version.to_string()
}

#[tauri::command]
pub fn open_app_data_folder(app: AppHandle) -> Result<(), String> {
    let path = app.path().app_data_dir().map_err(|e| e.to_string())?;
    opener::open(&path).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_document_types() -> Vec<DocumentTypeInfo> {
    session::document_types()
}

#[tauri::command]
pub fn get_document(state: State<AppState>) -> Result<DocumentView, String> {
    let session = state.session.lock().map_err(|e| e.to_string())?;
    Ok(session.view())
}

/// One form event. Never fails on bad input; warnings ride along in the view.
#[tauri::command]
pub fn apply_edit(state: State<AppState>, action: EditAction) -> Result<DocumentView, String> {
    let mut session = state.session.lock().map_err(|e| e.to_string())?;
    Ok(session.apply(&action))
}

/// Switch type and reset to its defaults, dated today. Unsaved edits are dropped.
#[tauri::command]
pub fn switch_document_type(
    state: State<AppState>,
    document_type: String,
) -> Result<DocumentView, String> {
    let document_type = DocumentType::from_key(&document_type)
        .ok_or_else(|| format!("Unknown document type: {}", document_type))?;
    let mut session = state.session.lock().map_err(|e| e.to_string())?;
    Ok(session.apply(&EditAction::SwitchDocumentType {
        document_type,
        today: today(),
    }))
}

#[tauri::command]
pub fn save_draft(state: State<AppState>) -> Result<SaveOutcome, String> {
    let session = state.session.lock().map_err(|e| e.to_string())?;
    Ok(state
        .drafts
        .save_or_notice(session.document_type(), session.record()))
}

#[tauri::command]
pub fn load_latest_draft(state: State<AppState>) -> Result<LoadDraftResponse, String> {
    let mut session = state.session.lock().map_err(|e| e.to_string())?;
    let outcome = state.drafts.load_latest_or_notice(session.document_type());
    let (restored, view) = match outcome.record {
        Some(record) => (true, session.restore(record)),
        None => (false, session.view()),
    };
    Ok(LoadDraftResponse {
        restored,
        notice: outcome.notice,
        view,
    })
}

#[tauri::command]
pub fn list_drafts(state: State<AppState>) -> Result<Vec<DraftSummary>, String> {
    let session = state.session.lock().map_err(|e| e.to_string())?;
    Ok(state.drafts.list_or_empty(session.document_type()))
}

/// Write the current preview to an .xlsx file on a background thread.
#[tauri::command]
pub async fn export_document(
    state: State<'_, AppState>,
    path: Option<String>,
) -> Result<String, String> {
    let preview = {
        let session = state.session.lock().map_err(|e| e.to_string())?;
        session.view().preview
    };
    tauri::async_runtime::spawn_blocking(move || {
        excel::export_document_to_excel(&preview, path.as_deref()).map_err(String::from)
    })
    .await
    .map_err(|e| e.to_string())?
}

#[tauri::command]
pub fn open_exported_file(path: String) -> Result<(), String> {
    if !Path::new(&path).exists() {
        return Err("File not found.".to_string());
    }
    opener::open(&path).map_err(|e| e.to_string())
}

/// Effective configuration, for the settings screen.
#[tauri::command]
pub fn get_config(state: State<AppState>) -> AppConfig {
    state.config.clone()
}
