//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::{ConfiguredCatalog, SourceConfig};
use crate::connector::{Connector, CustomerioSource, Message};
use crate::error::{Error, Result};
use crate::streams;
use futures::StreamExt;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// CLI runner
pub struct Runner {
    cli: Cli,
    source: CustomerioSource,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            source: CustomerioSource::new(),
        }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Discover => self.discover().await,
            Commands::Streams => {
                self.streams();
                Ok(())
            }
            Commands::Read { .. } => self.read(self.cli.command.stream_filter()).await,
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<Value> {
        // Inline config takes precedence
        if let Some(json_str) = &self.cli.config_json {
            return serde_json::from_str(json_str)
                .map_err(|e| Error::config(format!("Invalid config JSON: {e}")));
        }

        if let Some(path) = &self.cli.config {
            let config = SourceConfig::from_file(path)?;
            return Ok(serde_json::to_value(config)?);
        }

        Err(Error::config(
            "No configuration given (use --config or --config-json)",
        ))
    }

    /// Check connection
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;

        self.output_message(&Message::info("Checking connection to Customer.io").to_json());

        let result = self.source.check(&config).await?;
        let status = if result.success { "SUCCEEDED" } else { "FAILED" };
        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": status,
                "message": result.message
            }
        }));

        Ok(())
    }

    /// Discover streams
    async fn discover(&self) -> Result<()> {
        let config = self.load_config()?;
        let catalog = self.source.discover(&config).await?;

        self.output_message(&json!({
            "type": "CATALOG",
            "catalog": catalog
        }));

        Ok(())
    }

    /// List stream names; needs no config
    fn streams(&self) {
        let names: Vec<&str> = streams::stream_names().collect();
        self.output_message(&json!({
            "type": "STREAMS",
            "streams": names
        }));
    }

    /// Read data
    async fn read(&self, filter: Option<Vec<String>>) -> Result<()> {
        let config = self.load_config()?;
        let catalog = select_streams(&self.source, filter.as_deref())?;

        let cancel = CancellationToken::new();
        let interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling sync");
                interrupt.cancel();
            }
        });

        // Run statistics are kept by the connector and logged when it finishes
        let mut messages = self.source.read(&config, &catalog, cancel).await?;

        while let Some(message) = messages.next().await {
            match message {
                Ok(message) => self.output_message(&message.to_json()),
                Err(e) => {
                    self.output_message(&Message::error(format!("Sync failed: {e}")).to_json());
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        if self.cli.pretty {
            println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
        } else {
            println!("{}", serde_json::to_string(msg).unwrap_or_default());
        }
    }
}

/// Configured catalog for `read`: every stream, or the named ones
fn select_streams(source: &CustomerioSource, filter: Option<&[String]>) -> Result<ConfiguredCatalog> {
    let mut catalog = ConfiguredCatalog::select_all(&source.catalog());

    if let Some(names) = filter {
        if let Some(unknown) = names.iter().find(|n| streams::descriptor(n).is_none()) {
            return Err(Error::StreamNotFound {
                stream: unknown.clone(),
            });
        }
        catalog
            .streams
            .retain(|s| names.iter().any(|n| *n == s.stream.name));
    }

    Ok(catalog)
}
