//! CLI route: single route table and run context. Opens the configured store and
//! hands invocations to the dispatcher.

use crate::cli::parse::Commands;
use crate::config::{ConfigLoader, LedgerConfig, StorageBackend};
use crate::dispatch::{Dispatcher, Response};
use crate::error::{ApiError, StorageError};
use crate::query::QueryBuilder;
use crate::store::{LedgerStore, MemoryLedger, SledLedger};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Printable result of one CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl From<Response> for CommandOutput {
    fn from(response: Response) -> Self {
        let success = response.is_success();
        Self {
            text: response.payload,
            success,
        }
    }
}

/// Runtime context for CLI execution: configuration, store and dispatcher.
pub struct RunContext {
    config: LedgerConfig,
    store: Box<dyn LedgerStore>,
    dispatcher: Dispatcher,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref cfg_path) => ConfigLoader::load_from_file(cfg_path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::from_config(config, &workspace_root)
    }

    /// Build the context from an already loaded configuration.
    pub fn from_config(config: LedgerConfig, workspace_root: &Path) -> Result<Self, ApiError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;

        let (store, store_path): (Box<dyn LedgerStore>, Option<PathBuf>) =
            match config.system.storage.backend {
                StorageBackend::Sled => {
                    let path = config.system.storage.resolve_store_path(workspace_root);
                    std::fs::create_dir_all(&path)
                        .map_err(|e| ApiError::StorageError(StorageError::IoError(e)))?;
                    (Box::new(SledLedger::new(&path)?), Some(path))
                }
                StorageBackend::Memory => (Box::new(MemoryLedger::new()), None),
            };
        debug!(backend = ?config.system.storage.backend, store_path = ?store_path, "store opened");

        let dispatcher = Dispatcher::new(QueryBuilder::new(config.query.salary_index.clone()));
        Ok(Self {
            config,
            store,
            dispatcher,
        })
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        match command {
            Commands::Init {
                id,
                name,
                department,
                salary,
                location,
            } => {
                let args = vec![
                    id.clone(),
                    name.clone(),
                    department.clone(),
                    salary.clone(),
                    location.clone(),
                ];
                let response = self.dispatcher.init(self.store.as_ref(), &args);
                self.store.sync()?;
                info!(success = response.is_success(), "init finished");
                Ok(response.into())
            }
            Commands::Invoke { operation, args } => {
                let response = self.dispatcher.invoke(self.store.as_ref(), operation, args);
                self.store.sync()?;
                info!(operation = %operation, success = response.is_success(), "invoke finished");
                Ok(response.into())
            }
            Commands::Operations => {
                let lines: Vec<String> = self
                    .dispatcher
                    .catalog()
                    .into_iter()
                    .map(|(name, arity)| format!("{}\t{}", name, arity))
                    .collect();
                Ok(CommandOutput {
                    text: lines.join("\n"),
                    success: true,
                })
            }
            Commands::Config => {
                let text = self
                    .config
                    .to_toml()
                    .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))?;
                Ok(CommandOutput {
                    text,
                    success: true,
                })
            }
        }
    }
}
