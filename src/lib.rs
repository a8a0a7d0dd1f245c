pub mod config;
pub mod db;
pub mod drafts;
pub mod error;
pub mod excel;
pub mod logging;
pub mod models;
pub mod numeric;
pub mod services;
pub mod session;
pub mod types;

#[cfg(feature = "desktop")]
mod commands;

pub use drafts::{BlobStore, DraftStore, MemoryBlobStore};
pub use services::derivation::{apply, EditAction};
pub use services::projection::project;
pub use session::{DocumentSession, DocumentView};
pub use types::{DocumentRecord, DocumentType, LineField, LineItem, RawValue};

/// Open the draft database, falling back to an in-memory store so the form keeps working
/// (drafts then last only for this run).
pub fn open_draft_store(config: &config::AppConfig) -> DraftStore<Box<dyn BlobStore + Send + Sync>> {
    let store: Box<dyn BlobStore + Send + Sync> = match db::Db::new(config.db_path()) {
        Ok(db) => Box::new(db),
        Err(e) => {
            tracing::error!(path = %config.db_path().display(), error = %e, "draft database unavailable");
            Box::new(MemoryBlobStore::default())
        }
    };
    DraftStore::new(store, config.drafts_key.clone())
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::AppState;
    use std::sync::Mutex;
    use tauri::Manager;

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let app_data_dir = app.path().app_data_dir().map_err(|e| e.to_string())?;
            // Reads <app data>/.env so users can override settings without rebuilding
            let config = config::AppConfig::load(Some(&app_data_dir));
            logging::init_logging(&config.log_filter);
            tracing::info!(data_dir = %config.data_dir.display(), "starting document generator");

            let drafts = open_draft_store(&config);
            let session = DocumentSession::new(
                DocumentType::Invoice,
                chrono::Local::now().date_naive(),
                config.signatory.clone(),
            );
            app.manage(AppState {
                config,
                session: Mutex::new(session),
                drafts,
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_app_data_path,
            commands::open_app_data_folder,
            commands::get_app_version,
            commands::get_config,
            commands::get_document_types,
            commands::get_document,
            commands::apply_edit,
            commands::switch_document_type,
            commands::save_draft,
            commands::load_latest_draft,
            commands::list_drafts,
            commands::export_document,
            commands::open_exported_file,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
