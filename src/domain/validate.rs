use std::collections::HashSet;
use thiserror::Error;

use crate::domain::data_source::DataSource;
use crate::domain::schema::FormSchema;
use crate::domain::validation::ValidationRule;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Duplicate argument name '{0}'")]
    DuplicateArgument(String),

    #[error("Argument '{argument}' references unknown field '{field}' in {context}")]
    UnknownFieldRef {
        argument: String,
        field: String,
        context: &'static str,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl FormSchema {
    /// Checks the cross-field invariants the type shapes alone cannot
    /// express: argument names unique, every `dependsOn`/`dependencies`
    /// reference resolvable, URLs non-empty. All violations are reported,
    /// not just the first.
    pub fn validate(&self) -> Result<(), Vec<SchemaError>> {
        let mut errors = Vec::new();

        if self.activity.is_empty() {
            errors.push(SchemaError::MissingField("activity".to_string()));
        }
        if self.endpoint.is_empty() {
            errors.push(SchemaError::MissingField("endpoint".to_string()));
        }

        let mut seen = HashSet::new();
        for arg in &self.arguments {
            if arg.name.is_empty() {
                errors.push(SchemaError::MissingField("arguments[].name".to_string()));
            } else if !seen.insert(arg.name.as_str()) {
                errors.push(SchemaError::DuplicateArgument(arg.name.clone()));
            }
        }

        let names: HashSet<&str> = self.argument_names().collect();
        for arg in &self.arguments {
            self.validate_argument(arg, &names, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_argument(
        &self,
        arg: &crate::domain::Argument,
        names: &HashSet<&str>,
        errors: &mut Vec<SchemaError>,
    ) {
        for condition in &arg.depends_on {
            if !names.contains(condition.field.as_str()) {
                errors.push(SchemaError::UnknownFieldRef {
                    argument: arg.name.clone(),
                    field: condition.field.clone(),
                    context: "dependsOn",
                });
            }
        }

        if let Some(source) = &arg.data_source {
            for dep in source.dependencies() {
                if !names.contains(dep.as_str()) {
                    errors.push(SchemaError::UnknownFieldRef {
                        argument: arg.name.clone(),
                        field: dep.clone(),
                        context: "dataSource.dependencies",
                    });
                }
            }
            if let DataSource::Remote { url, .. } = source {
                if url.is_empty() {
                    errors.push(SchemaError::InvalidValue {
                        field: format!("{}.dataSource.url", arg.name),
                        reason: "URL must not be empty".to_string(),
                    });
                }
            }
        }

        for rule in &arg.validation {
            for dep in rule.dependencies() {
                if !names.contains(dep.as_str()) {
                    errors.push(SchemaError::UnknownFieldRef {
                        argument: arg.name.clone(),
                        field: dep.clone(),
                        context: "validation.dependencies",
                    });
                }
            }
            match rule {
                ValidationRule::Remote { url, .. } if url.is_empty() => {
                    errors.push(SchemaError::InvalidValue {
                        field: format!("{}.validation.url", arg.name),
                        reason: "URL must not be empty".to_string(),
                    });
                }
                ValidationRule::Pattern { value, .. } if value.is_empty() => {
                    errors.push(SchemaError::InvalidValue {
                        field: format!("{}.validation.pattern", arg.name),
                        reason: "pattern must not be empty".to_string(),
                    });
                }
                _ => {}
            }
        }
    }
}
