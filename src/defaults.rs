//! Default values and environment variable names.

/// Model alias used when none is configured.
pub const DEFAULT_MODEL: &str = "sonnet";

/// Agent CLI executable name searched on `PATH`.
pub const BINARY_NAME: &str = "claude";

/// Overrides the agent CLI location.
pub const ENV_CLI_PATH: &str = "SIUMAI_AGENT_CLI_PATH";

/// Overrides the default model.
pub const ENV_MODEL: &str = "SIUMAI_AGENT_MODEL";

/// Provider id reported in metadata and logs.
pub const PROVIDER_ID: &str = "agent";
