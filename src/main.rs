// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::env;
use std::fs;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{json, Map};
use tokio::task::{JoinError, JoinHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dagwood_interp::config::{load_and_validate_config, FieldMap, ResolvedFields};
use dagwood_interp::engine::Value;
use dagwood_interp::errors::FieldError;
use dagwood_interp::message::Message;

type Resolution = std::result::Result<ResolvedFields, FieldError>;

/// One message of the input batch file.
#[derive(Debug, Deserialize)]
struct InputMessage {
    payload: String,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

impl From<InputMessage> for Message {
    fn from(input: InputMessage) -> Self {
        Message {
            payload: input.payload.into_bytes(),
            metadata: input.metadata,
        }
    }
}

fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => json!(s),
        Value::Int(i) => json!(i),
        Value::Float(x) => serde_json::Value::from(*x),
        Value::Bool(b) => json!(b),
        Value::Opaque(opaque) => json!(opaque.rendered),
    }
}

fn render(index: usize, result: &Resolution) -> serde_json::Value {
    match result {
        Ok(fields) => {
            let fields: Map<String, serde_json::Value> = fields
                .iter()
                .map(|(name, value)| (name.clone(), to_json(value)))
                .collect();
            json!({ "index": index, "fields": fields })
        }
        Err(e) => json!({ "index": index, "error": e.to_string() }),
    }
}

/// A resolution task that died without producing a result.
fn render_task_failure(index: usize, error: &JoinError) -> serde_json::Value {
    tracing::error!(index, error = %error, "Field resolution task failed");
    json!({ "index": index, "error": format!("resolution task failed: {}", error) })
}

/// One output line per task, in index order. A failed task only affects its own line.
async fn collect_lines(handles: Vec<JoinHandle<Resolution>>) -> Vec<serde_json::Value> {
    let mut lines = Vec::with_capacity(handles.len());
    for (index, handle) in handles.into_iter().enumerate() {
        lines.push(match handle.await {
            Ok(result) => render(index, &result),
            Err(e) => render_task_failure(index, &e),
        });
    }
    lines
}

/// argv[0], which is not guaranteed to be present.
fn program_name(args: &[String]) -> &str {
    args.first().map(String::as_str).unwrap_or("dagwood-interp")
}

fn load_batch(path: &str) -> Result<Vec<Message>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read batch file {}", path))?;
    let inputs: Vec<InputMessage> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse batch file {}", path))?;
    Ok(inputs.into_iter().map(Message::from).collect())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dagwood_interp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    let program = program_name(&args);
    if args.len() != 3 {
        eprintln!("Usage: {} <fields.yaml> <batch.json>", program);
        eprintln!(
            "Example: {} configs/message-routing.yaml demos/batch.json",
            program
        );
        bail!("expected 2 arguments, got {}", args.len().saturating_sub(1));
    }

    let config = load_and_validate_config(&args[1])
        .with_context(|| format!("failed to load field config {}", args[1]))?;
    let fields = Arc::new(FieldMap::from_config(&config)?);
    let batch = Arc::new(load_batch(&args[2])?);

    tracing::info!(
        fields = fields.len(),
        messages = batch.len(),
        "Resolving dynamic fields"
    );

    let handles: Vec<_> = (0..batch.len())
        .map(|index| {
            let fields = Arc::clone(&fields);
            let batch = Arc::clone(&batch);
            tokio::task::spawn_blocking(move || fields.resolve(&batch, index as i64))
        })
        .collect();

    for line in collect_lines(handles).await {
        println!("{}", line);
    }

    Ok(())
}
