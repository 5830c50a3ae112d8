// Prevents additional console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::sync::Arc;

use log::{error, info, warn};
use potluck_board::{
    Board, Config, EntityKind, FormValues, PanelView, RestStore, SubmitResponse, SyncOptions,
};
use serde::Serialize;
use tauri::{command, Manager};

pub struct AppState {
    pub config: Config,
    pub board: Result<Board<RestStore>, String>,
}

impl AppState {
    fn load() -> Self {
        let config = Config::load_or_default();
        let board = RestStore::from_config(&config)
            .map(|store| Board::new(Arc::new(store), SyncOptions::from(&config)))
            .map_err(|e| e.to_string());
        Self { config, board }
    }

    fn board(&self) -> Result<&Board<RestStore>, String> {
        self.board.as_ref().map_err(|e| e.clone())
    }
}

fn parse_kind(kind: &str) -> Result<EntityKind, String> {
    kind.parse()
}

// ============ Config Commands ============

#[derive(Serialize)]
pub struct ConfigSummary {
    pub target: String,
    pub base_url: Option<String>,
    pub seed_mode: bool,
    pub request_timeout_secs: u64,
}

#[command]
fn get_config(state: tauri::State<'_, AppState>) -> ConfigSummary {
    let config = &state.config;
    ConfigSummary {
        target: config.target.to_string(),
        base_url: config.base_url().ok(),
        seed_mode: config.seed_mode,
        request_timeout_secs: config.request_timeout_secs,
    }
}

// ============ Panel Commands ============

#[command]
async fn select_page(
    page: String,
    state: tauri::State<'_, AppState>,
) -> Result<PanelView, String> {
    let page = parse_kind(&page)?;
    Ok(state.board()?.select(page).await)
}

#[command]
async fn get_panel(kind: String, state: tauri::State<'_, AppState>) -> Result<PanelView, String> {
    let kind = parse_kind(&kind)?;
    Ok(state.board()?.view(kind))
}

#[command]
async fn refresh_panel(
    kind: String,
    state: tauri::State<'_, AppState>,
) -> Result<PanelView, String> {
    let kind = parse_kind(&kind)?;
    info!("[refresh_panel] Manual refresh of {}", kind);
    Ok(state.board()?.refresh(kind).await)
}

#[command]
async fn submit_panel(
    kind: String,
    values: FormValues,
    state: tauri::State<'_, AppState>,
) -> Result<SubmitResponse, String> {
    let kind = parse_kind(&kind)?;
    Ok(state.board()?.submit(kind, &values).await)
}

// ============ Frontend Logging ============

#[command]
fn log_from_frontend(level: String, message: String) {
    match level.as_str() {
        "error" => error!("[Frontend] {}", message),
        "warn" => warn!("[Frontend] {}", message),
        _ => info!("[Frontend] {}", message),
    }
}

fn main() {
    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .target(tauri_plugin_log::Target::new(
                    tauri_plugin_log::TargetKind::LogDir {
                        file_name: Some("potluck".into()),
                    },
                ))
                .level(log::LevelFilter::Info)
                .build(),
        )
        .setup(|app| {
            info!("=== Potluck Board Starting ===");
            let state = AppState::load();
            info!("[startup] Target: {}", state.config.target);
            match &state.board {
                Ok(_) => info!("[startup] Store: {:?}", state.config.base_url().ok()),
                Err(e) => error!("[startup] Board unavailable: {}", e),
            }
            app.manage(state);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            get_config,
            select_page,
            get_panel,
            refresh_panel,
            submit_panel,
            log_from_frontend,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
