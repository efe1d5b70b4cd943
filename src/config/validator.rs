use std::collections::HashMap;
use thiserror::Error;

use crate::config::Settings;
use crate::domain::{FormSchema, SchemaError};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Form '{activity}': {error}")]
    Schema {
        activity: String,
        #[source]
        error: SchemaError,
    },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_server(&settings.server) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_forms(&settings.forms) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &crate::config::ServerSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_forms(forms: &[FormSchema]) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen_activities = HashMap::new();

        for (idx, form) in forms.iter().enumerate() {
            if let Some(prev_idx) = seen_activities.insert(&form.activity, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Form activity '{}' appears at indices {} and {}",
                    form.activity, prev_idx, idx
                )));
            }

            if let Err(schema_errors) = form.validate() {
                errors.extend(schema_errors.into_iter().map(|error| ValidationError::Schema {
                    activity: form.activity.clone(),
                    error,
                }));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
