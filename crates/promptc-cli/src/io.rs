//! Reading workflows and writing prompts.

use std::path::Path;

use anyhow::Context;
use promptc_compiler::{CompiledPrompt, WorkflowGraph};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::TRACING_TARGET_COMPILE;

/// Reads a workflow graph from `path`, or from stdin when `None`.
pub async fn read_workflow(path: Option<&Path>) -> anyhow::Result<WorkflowGraph> {
    let bytes = match path {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read workflow {}", path.display()))?,
        None => {
            let mut bytes = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut bytes)
                .await
                .context("failed to read workflow from stdin")?;
            bytes
        }
    };

    let workflow = WorkflowGraph::from_slice(&bytes).context("failed to parse workflow")?;

    tracing::debug!(
        target: TRACING_TARGET_COMPILE,
        bytes = bytes.len(),
        nodes = workflow.nodes.len(),
        links = workflow.links.len(),
        "Workflow loaded"
    );

    Ok(workflow)
}

/// Serializes a prompt, terminated by a newline.
pub fn render_prompt(prompt: &CompiledPrompt, pretty: bool) -> anyhow::Result<Vec<u8>> {
    let mut bytes = if pretty {
        serde_json::to_vec_pretty(prompt)
    } else {
        serde_json::to_vec(prompt)
    }
    .context("failed to serialize prompt")?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Writes a prompt to `path`, or to stdout when `None`.
pub async fn write_prompt(
    prompt: &CompiledPrompt,
    path: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<()> {
    let bytes = render_prompt(prompt, pretty)?;

    match path {
        Some(path) => tokio::fs::write(path, &bytes)
            .await
            .with_context(|| format!("failed to write prompt {}", path.display()))?,
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(&bytes)
                .await
                .context("failed to write prompt to stdout")?;
            stdout.flush().await.context("failed to flush stdout")?;
        }
    }

    tracing::debug!(
        target: TRACING_TARGET_COMPILE,
        bytes = bytes.len(),
        output = %path.map_or_else(|| "stdout".into(), |path| path.display().to_string()),
        "Prompt written"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn prompt() -> CompiledPrompt {
        serde_json::from_value(json!({
            "4": {"class_type": "KSampler", "inputs": {"model": ["3", 0], "steps": 20}}
        }))
        .unwrap()
    }

    #[test]
    fn test_render_prompt() {
        let compact = render_prompt(&prompt(), false).unwrap();
        assert_eq!(
            String::from_utf8(compact).unwrap(),
            "{\"4\":{\"class_type\":\"KSampler\",\"inputs\":{\"model\":[\"3\",0],\"steps\":20}}}\n"
        );

        let pretty = render_prompt(&prompt(), true).unwrap();
        assert!(String::from_utf8(pretty).unwrap().contains("\n  \"4\": {"));
    }

    #[tokio::test]
    async fn test_read_workflow_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        tokio::fs::write(
            &path,
            r#"{"nodes": [{"id": 1, "type": "Note"}], "links": []}"#,
        )
        .await
        .unwrap();

        let workflow = read_workflow(Some(path.as_path())).await.unwrap();
        assert_eq!(workflow.nodes.len(), 1);
    }

    #[tokio::test]
    async fn test_read_workflow_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let error = read_workflow(Some(missing.as_path())).await.unwrap_err();
        assert!(error.to_string().contains("failed to read workflow"));

        let invalid = dir.path().join("invalid.json");
        tokio::fs::write(&invalid, "not json").await.unwrap();
        let error = read_workflow(Some(invalid.as_path())).await.unwrap_err();
        assert!(error.to_string().contains("failed to parse workflow"));
    }

    #[tokio::test]
    async fn test_write_prompt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.json");
        write_prompt(&prompt(), Some(path.as_path()), true).await.unwrap();

        let written: Value = serde_json::from_slice(&tokio::fs::read(&path).await.unwrap()).unwrap();
        assert_eq!(written["4"]["inputs"]["steps"], json!(20));
    }
}
