use crate::error::{SarError, SarResult};
use std::path::Path;
use validator::{Validate, ValidationErrors};

pub fn validate_model<T: Validate>(field: &str, model: &T) -> SarResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_messages = format_validation_errors(&errors);
            Err(SarError::validation(field, error_messages))
        }
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match &error.message {
                Some(message) => format!("{}: {}", field, message),
                None => match error.code.as_ref() {
                    "length" => format!("Length validation failed for field '{}'", field),
                    "required" => format!("Field '{}' is required", field),
                    code => format!("Validation failed for field '{}': {}", field, code),
                },
            };
            messages.push(message);
        }
    }

    messages.join(", ")
}

/// Inputs must exist before anything is parsed; a missing file ends the run.
pub fn validate_file_exists(path: &Path, what: &str) -> SarResult<()> {
    if !path.is_file() {
        return Err(SarError::validation(
            what,
            format!("{} is not found: {}", what, path.display()),
        ));
    }

    Ok(())
}

pub fn validate_file_type(path: &Path, allowed_types: &[&str]) -> SarResult<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if !allowed_types.contains(&extension.to_lowercase().as_str()) {
        return Err(SarError::validation(
            "file_type",
            format!(
                "File type '{}' not allowed. Allowed types: {}",
                extension,
                allowed_types.join(", ")
            ),
        ));
    }

    Ok(())
}
