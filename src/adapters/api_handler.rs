//! REST API handlers for the form schema catalog.
//!
//! Serves schema documents and option lookups; submitting field values to a
//! schema's endpoint is the client's job.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::adapters::metrics_handler::MetricsCollector;
use crate::adapters::options::{self, CallbackRegistry};
use crate::config::Settings;
use crate::domain::{DataSource, FormSchema, OptionItem};

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub settings: Arc<RwLock<Settings>>,
    pub callbacks: Arc<CallbackRegistry>,
    pub metrics: Arc<MetricsCollector>,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Catalog entry returned by the list endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub activity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub argument_count: usize,
}

impl From<&FormSchema> for FormSummary {
    fn from(form: &FormSchema) -> Self {
        Self {
            activity: form.activity.clone(),
            title: form.title.clone(),
            description: form.description.clone(),
            argument_count: form.arguments.len(),
        }
    }
}

/// GET /api/forms
pub async fn list_forms(State(state): State<ApiState>) -> impl IntoResponse {
    let settings = state.settings.read().await;
    let summaries: Vec<FormSummary> = settings.forms.iter().map(FormSummary::from).collect();
    (StatusCode::OK, Json(ApiResponse::success(summaries)))
}

/// GET /api/forms/:activity
pub async fn get_form(
    State(state): State<ApiState>,
    Path(activity): Path<String>,
) -> Response {
    let settings = state.settings.read().await;
    match settings.form(&activity) {
        Some(form) => {
            state
                .metrics
                .forms_served
                .with_label_values(&[&activity])
                .inc();
            (StatusCode::OK, Json(ApiResponse::success(form.clone()))).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<FormSchema>::error(format!(
                "Form not found: {}",
                activity
            ))),
        )
            .into_response(),
    }
}

/// GET /api/forms/:activity/fields/:field/options
///
/// Query parameters carry the current values of the source's dependency
/// fields; the autocomplete search string arrives in `q`, or in the
/// source's `searchParam` when one is declared.
pub async fn get_field_options(
    State(state): State<ApiState>,
    Path((activity, field)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    // Clone the source out so the settings lock is not held across awaits.
    let source = {
        let settings = state.settings.read().await;
        let Some(form) = settings.form(&activity) else {
            return not_found(format!("Form not found: {}", activity));
        };
        let Some(arg) = form.argument(&field) else {
            return not_found(format!("Field not found: {}.{}", activity, field));
        };
        match &arg.data_source {
            Some(source) => source.clone(),
            None => {
                return unprocessable(format!("Field '{}' has no data source", field));
            }
        }
    };

    state
        .metrics
        .option_lookups
        .with_label_values(&[&activity, source.kind()])
        .inc();

    match source {
        DataSource::Static {
            data,
            search_param,
            label_key,
            value_key,
        } => {
            let search_key = search_param.as_deref().unwrap_or("q");
            let search = params.get(search_key).map(String::as_str);
            let items = options::resolve_static(
                &data,
                label_key.as_deref(),
                value_key.as_deref(),
                search,
            );
            (StatusCode::OK, Json(ApiResponse::success(items))).into_response()
        }
        DataSource::Remote { .. } => unprocessable(
            "Remote data sources are resolved by the client against their URL",
        ),
        DataSource::Callback { dependencies } => {
            let Some(provider) = state.callbacks.get(&activity, &field) else {
                return not_found(format!(
                    "No callback provider registered for {}.{}",
                    activity, field
                ));
            };

            let mut deps: HashMap<String, Value> = HashMap::new();
            for dep in &dependencies {
                if let Some(value) = params.get(dep) {
                    deps.insert(dep.clone(), Value::String(value.clone()));
                }
            }

            match provider.options(&deps).await {
                Ok(items) => (StatusCode::OK, Json(ApiResponse::success(items))).into_response(),
                Err(e) => {
                    tracing::error!(
                        activity = %activity,
                        field = %field,
                        "Callback provider failed: {}",
                        e
                    );
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ApiResponse::<Vec<OptionItem>>::error(e.to_string())),
                    )
                        .into_response()
                }
            }
        }
    }
}

fn not_found(message: impl Into<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<Vec<OptionItem>>::error(message)),
    )
        .into_response()
}

fn unprocessable(message: impl Into<String>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::<Vec<OptionItem>>::error(message)),
    )
        .into_response()
}
