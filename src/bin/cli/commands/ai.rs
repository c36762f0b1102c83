use anyhow::{bail, Context, Result};

use marginalia_lib::ai::AiOperation;
use marginalia_lib::workspace;

use crate::app::App;
use crate::OutputFormat;

pub async fn run(app: &App, operation: AiOperation, text: &str, format: &OutputFormat) -> Result<()> {
    let gateway = app.gateway()?;
    let Some(result) = workspace::run_operation(&app.workspace, &gateway, operation, text)
        .await
        .with_context(|| format!("Failed to {} text", operation))?
    else {
        bail!("The {} request was superseded by a newer one", operation);
    };

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "operation": operation.as_str(),
                "result": result,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", result);
        }
    }

    Ok(())
}
