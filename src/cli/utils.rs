use serde::Serialize;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};

use crate::cli::OutputFormat;

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

            if let (Some(Value::Object(extra)), Some(obj)) = (data, response.as_object_mut()) {
                obj.extend(extra);
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

/// Output a collection: pretty JSON under `collection_name`, or one text row
/// per item
pub fn output_collection<T: Serialize>(
    output_format: &OutputFormat,
    collection_name: &str,
    items: &[T],
    empty_message: &str,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: items
            }))?);
        }
        OutputFormat::Text if items.is_empty() => {
            println!("{}", empty_message);
        }
        OutputFormat::Text => {
            for item in items {
                println!("{}", row(item));
            }
            println!("\n{} {}", items.len(), collection_name);
        }
    }
    Ok(())
}

/// Output a single record as labelled lines, or as JSON under `item_type`
pub fn output_record(
    output_format: &OutputFormat,
    item_type: &str,
    record: Value,
    fields: &[(&str, String)],
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                item_type: record
            }))?);
        }
        OutputFormat::Text => {
            let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
            for (label, value) in fields {
                if !value.is_empty() {
                    println!("{:width$}  {}", label, value, width = width);
                }
            }
        }
    }
    Ok(())
}

/// Ask a yes/no question on stderr; anything but `y`/`yes` is a no
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{} [y/N] ", prompt);
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Read a secret from stdin when it was not given on the command line
pub fn prompt_value(label: &str, provided: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = provided {
        return Ok(value);
    }
    eprint!("{}: ", label);
    io::stderr().flush()?;

    let mut value = String::new();
    io::stdin().lock().read_line(&mut value)?;
    Ok(value.trim_end_matches(['\r', '\n']).to_string())
}
