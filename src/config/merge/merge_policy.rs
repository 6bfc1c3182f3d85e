//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("system.storage.backend", "sled")?
        .set_default("system.storage.store_path", ".empledger/store")?
        .set_default("query.salary_index.design_doc", "_design/indexSalaryDoc")?
        .set_default("query.salary_index.index_name", "indexSalary")
}
