pub mod config;
pub mod database;
pub mod error;
pub mod logging;

pub use config::{Config, EnvSource, Environment, ProcessEnv};
pub use database::{
    load_connection_config, load_connection_config_from, ConnectionConfig,
    ConnectionConfigBuilder, DataSource, DatabaseType, DbConnection, InitializedDataSource,
};
pub use error::DataSourceError;
