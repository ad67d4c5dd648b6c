//! HTTP surface: the admin API behind a bearer key and the public
//! endpoints used by visitors' pages.

use axum::body::Bytes;
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::css;
use crate::db::{Database, NewTranslation};
use crate::error::{ApiError, ApiResult};
use crate::frontend::{collect_language_styles, frontend_payload, render_style_block};
use crate::language::LanguageCode;
use crate::overrides::{override_string, translation_map};
use crate::sanitize::{sanitize_text, sanitize_textarea};
use crate::security::verify_admin_key;
use crate::settings::{Priority, Settings};
use crate::styles::StyleStore;
use crate::transfer::{export_csv, export_filename, parse_bulk, parse_csv};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub styles: StyleStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            styles: StyleStore::new(db.clone()),
            db,
            config: Arc::new(config),
        }
    }
}

/// `{"success": true, "data": ...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

type JsonResult = ApiResult<Json<ApiResponse<Value>>>;

/// Marker extractor for admin routes. Rejects with 401 unless the request
/// carries `Authorization: Bearer <ADMIN_API_KEY>`.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        verify_admin_key(state.config.admin_api_key.as_deref(), header)?;
        Ok(AdminAuth)
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route(
            "/translations",
            post(create_translation).get(search_translations),
        )
        .route("/translations/bulk", post(bulk_add_translations))
        .route("/translations/import", post(import_translations))
        .route("/translations/export", get(export_translations))
        .route(
            "/translations/:id",
            get(get_translation)
                .put(update_translation)
                .delete(delete_translation),
        )
        .route("/statistics", get(statistics))
        .route("/settings", get(get_settings).put(save_settings))
        .route("/css/preview", post(preview_css))
        .route("/css/validate", post(validate_css))
        .route("/css/format", post(format_css))
        .route("/css/:language_code", get(get_css).put(save_css));

    let frontend = Router::new()
        .route("/translations/:language_code", get(frontend_translations))
        .route("/config", get(frontend_config))
        .route("/styles", get(frontend_styles))
        .route("/override", post(frontend_override));

    Router::new()
        .route("/health", get(health))
        .nest("/api", admin)
        .nest("/frontend", frontend)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn message(text: impl Into<String>) -> Json<ApiResponse<Value>> {
    ApiResponse::ok(json!({ "message": text.into() }))
}

/// Parse an optional language filter; blank means no filter.
fn optional_language(value: Option<&str>) -> ApiResult<Option<LanguageCode>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(code) => Ok(Some(LanguageCode::parse(code)?)),
        None => Ok(None),
    }
}

async fn health() -> Json<ApiResponse<Value>> {
    ApiResponse::ok(json!({ "status": "ok" }))
}

// ==================== Translations ====================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TranslationRequest {
    original_text: String,
    translated_text: String,
    language_code: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchQuery {
    search_term: String,
    language_code: Option<String>,
}

async fn create_translation(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Json(body): Json<TranslationRequest>,
) -> JsonResult {
    let translation = NewTranslation::new(
        &body.original_text,
        &body.translated_text,
        &body.language_code,
    );
    let language = translation.check()?;

    let id = state
        .db
        .save_translation(
            &translation.original_text,
            &translation.translated_text,
            language.as_str(),
        )
        .await?;
    let saved = state.db.get_translation_by_id(id).await?;

    info!(id, language = %language, "Translation added");

    Ok(ApiResponse::ok(json!({
        "message": "Translation added successfully.",
        "translation": saved,
    })))
}

async fn search_translations(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> JsonResult {
    let language = optional_language(query.language_code.as_deref())?;
    let term = sanitize_text(&query.search_term);

    let translations = state
        .db
        .search_translations(&term, language.as_ref().map(LanguageCode::as_str))
        .await?;

    Ok(ApiResponse::ok(json!(translations)))
}

async fn get_translation(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> JsonResult {
    let translation = state
        .db
        .get_translation_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Translation not found."))?;

    Ok(ApiResponse::ok(json!(translation)))
}

/// Replace the translated text (and language) of an existing pair. The
/// original text of a stored pair never changes.
async fn update_translation(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<TranslationRequest>,
) -> JsonResult {
    let current = state
        .db
        .get_translation_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Translation not found."))?;

    let translation = NewTranslation {
        original_text: current.original_text,
        translated_text: sanitize_textarea(&body.translated_text),
        language_code: sanitize_text(&body.language_code),
    };
    let language = translation.check()?;

    let id = state
        .db
        .save_translation(
            &translation.original_text,
            &translation.translated_text,
            language.as_str(),
        )
        .await?;
    let saved = state.db.get_translation_by_id(id).await?;

    info!(id, language = %language, "Translation updated");

    Ok(ApiResponse::ok(json!({
        "message": "Translation updated successfully.",
        "translation": saved,
    })))
}

async fn delete_translation(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> JsonResult {
    if !state.db.delete_translation(id).await? {
        return Err(ApiError::not_found("Translation not found."));
    }

    info!(id, "Translation deleted");
    Ok(message("Translation deleted successfully."))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BulkRequest {
    bulk_data: String,
}

async fn bulk_add_translations(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Json(body): Json<BulkRequest>,
) -> JsonResult {
    if body.bulk_data.trim().is_empty() {
        return Err(ApiError::bad_request("No data provided."));
    }

    let translations = parse_bulk(&body.bulk_data)?;
    let result = state.db.bulk_import(&translations).await?;

    info!(success = result.success, errors = result.errors, "Bulk import finished");

    Ok(ApiResponse::ok(json!({
        "message": format!(
            "Bulk import completed. {} translations added, {} errors.",
            result.success, result.errors
        ),
        "result": result,
    })))
}

async fn import_translations(
    _admin: AdminAuth,
    State(state): State<AppState>,
    body: Bytes,
) -> JsonResult {
    let translations = parse_csv(&body).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let result = state.db.bulk_import(&translations).await?;

    info!(success = result.success, errors = result.errors, "CSV import finished");

    Ok(ApiResponse::ok(json!({
        "message": format!(
            "Import completed. {} translations added, {} errors.",
            result.success, result.errors
        ),
        "result": result,
    })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExportQuery {
    language_code: Option<String>,
}

async fn export_translations(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> JsonResult {
    let language = optional_language(query.language_code.as_deref())?;

    let translations = state
        .db
        .export_translations(language.as_ref().map(LanguageCode::as_str))
        .await?;
    if translations.is_empty() {
        return Err(ApiError::not_found("No translations found to export."));
    }

    let content = export_csv(&translations)?;

    Ok(ApiResponse::ok(json!({
        "filename": export_filename(language.as_ref(), Utc::now()),
        "content": content,
        "count": translations.len(),
    })))
}

async fn statistics(_admin: AdminAuth, State(state): State<AppState>) -> JsonResult {
    let counts = state.db.translation_counts().await?;
    Ok(ApiResponse::ok(json!(counts)))
}

// ==================== Settings ====================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsRequest {
    enable_frontend: bool,
    translation_priority: String,
}

async fn get_settings(_admin: AdminAuth, State(state): State<AppState>) -> JsonResult {
    let settings = Settings::load(&state.db).await?;
    Ok(ApiResponse::ok(json!(settings)))
}

async fn save_settings(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Json(body): Json<SettingsRequest>,
) -> JsonResult {
    let settings = Settings {
        enable_frontend: body.enable_frontend,
        translation_priority: Priority::from_option(&body.translation_priority),
    };
    settings.save(&state.db).await?;

    info!(
        enable_frontend = settings.enable_frontend,
        priority = settings.translation_priority.as_str(),
        "Settings saved"
    );

    Ok(ApiResponse::ok(json!({
        "message": "Settings saved successfully.",
        "settings": settings,
    })))
}

// ==================== CSS ====================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SaveCssRequest {
    custom_css: String,
    minify: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PreviewRequest {
    css: String,
    language_code: String,
    minify: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CssBody {
    css: String,
}

async fn get_css(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(language_code): Path<String>,
) -> JsonResult {
    let language = LanguageCode::parse(&language_code)?;
    let stored = state.styles.load(&language).await?;
    Ok(ApiResponse::ok(json!(stored)))
}

async fn save_css(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(language_code): Path<String>,
    Json(body): Json<SaveCssRequest>,
) -> JsonResult {
    let language = LanguageCode::parse(&language_code)?;
    let saved = state
        .styles
        .save(&language, &body.custom_css, body.minify)
        .await?;

    Ok(ApiResponse::ok(json!({
        "message": "CSS saved successfully!",
        "css": saved,
    })))
}

/// Show what a stylesheet becomes once scoped, without storing it.
async fn preview_css(_admin: AdminAuth, Json(body): Json<PreviewRequest>) -> JsonResult {
    let processed = css::process(&body.css, &body.language_code, body.minify)?;
    Ok(ApiResponse::ok(json!({ "css": processed })))
}

async fn validate_css(_admin: AdminAuth, Json(body): Json<CssBody>) -> JsonResult {
    if body.css.trim().is_empty() {
        return Err(ApiError::bad_request("No CSS content to validate."));
    }

    let report = css::validate(&body.css);
    Ok(ApiResponse::ok(json!({
        "valid": !report.has_errors(),
        "message": report.summary(),
        "errors": report.errors,
        "warnings": report.warnings,
    })))
}

async fn format_css(_admin: AdminAuth, Json(body): Json<CssBody>) -> JsonResult {
    if body.css.trim().is_empty() {
        return Err(ApiError::bad_request("No CSS content to format."));
    }

    Ok(ApiResponse::ok(json!({ "css": css::format_css(&body.css) })))
}

// ==================== Frontend ====================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigQuery {
    lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OverrideRequest {
    original_text: String,
    engine_translation: Option<String>,
    language_code: String,
}

async fn frontend_translations(
    State(state): State<AppState>,
    Path(language_code): Path<String>,
) -> JsonResult {
    let language = LanguageCode::parse(&language_code)?;
    let map = translation_map(&state.db, &language).await?;
    Ok(ApiResponse::ok(json!(map)))
}

async fn frontend_config(
    State(state): State<AppState>,
    Query(query): Query<ConfigQuery>,
) -> JsonResult {
    let current = optional_language(query.lang.as_deref())?;
    let settings = Settings::load(&state.db).await?;

    let payload = frontend_payload(
        &state.db,
        &settings,
        current.as_ref(),
        &state.config.default_language,
    )
    .await?;

    Ok(ApiResponse::ok(json!(payload)))
}

async fn frontend_styles(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let styles =
        collect_language_styles(&state.styles, &state.config.translation_languages).await?;
    Ok(Html(render_style_block(&styles)))
}

/// Resolve one string the host engine is about to output.
async fn frontend_override(
    State(state): State<AppState>,
    Json(body): Json<OverrideRequest>,
) -> JsonResult {
    let language = LanguageCode::parse(&body.language_code)?;
    let settings = Settings::load(&state.db).await?;

    let translation = if settings.enable_frontend {
        override_string(
            &state.db,
            &sanitize_text(&body.original_text),
            body.engine_translation.as_deref(),
            &language,
            settings.translation_priority,
        )
        .await?
    } else {
        body.engine_translation
    };

    Ok(ApiResponse::ok(json!({ "translation": translation })))
}
