use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::navigation::{Navigation, NavigationMode};
use crate::validation::FieldErrors;
use crate::views::{MessageKind, StatusMessage};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output a banner produced by a page action
pub fn output_status(output_format: &OutputFormat, status: &StatusMessage) -> anyhow::Result<()> {
    match status.kind {
        MessageKind::Success => output_success(output_format, &status.text, None),
        MessageKind::Error => output_error(output_format, &status.text, None),
    }
}

/// Output per-field form errors, then fail the command
pub fn output_field_errors(output_format: &OutputFormat, errors: &FieldErrors) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let fields: serde_json::Map<String, Value> = errors
                .iter()
                .map(|(field, message)| (field.to_string(), json!(message)))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "error_code": "VALIDATION_ERROR",
                    "errors": fields
                }))?
            );
        }
        OutputFormat::Text => {
            for (field, message) in errors.iter() {
                if field == "general" {
                    eprintln!("Error: {}", message);
                } else {
                    eprintln!("Error: {}: {}", field, message);
                }
            }
        }
    }
    Err(anyhow::anyhow!("{}", errors))
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Output one record: pretty JSON, or labelled lines for text
pub fn output_record(
    output_format: &OutputFormat,
    name: &str,
    data: Value,
    lines: &[(&str, String)],
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ name: data }))?);
        }
        OutputFormat::Text => {
            for (label, value) in lines {
                println!("{}: {}", label, value);
            }
        }
    }
    Ok(())
}

/// Output a list with a footer line (pagination summary) in text mode
pub fn output_rows(
    output_format: &OutputFormat,
    collection_name: &str,
    data: Value,
    rows: &[String],
    footer: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({ collection_name: data });
            if let Some(footer) = footer {
                response["summary"] = json!(footer);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            for row in rows {
                println!("{}", row);
            }
            if let Some(footer) = footer {
                println!("{}", footer);
            }
        }
    }
    Ok(())
}

/// Output a redirect the session asked for
pub fn output_navigation(output_format: &OutputFormat, navigation: &Navigation) -> anyhow::Result<()> {
    let mode = match navigation.mode {
        NavigationMode::Push => "push",
        NavigationMode::FullReload => "reload",
    };
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "redirect": navigation.route.path(),
                    "mode": mode
                }))?
            );
        }
        OutputFormat::Text => {
            println!("→ {} ({})", navigation.route.path(), mode);
        }
    }
    Ok(())
}

/// Text fallback for optional fields
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}
