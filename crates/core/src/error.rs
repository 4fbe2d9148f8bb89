use thiserror::Error;

/// Startup configuration problems. These are fatal: the process reports them
/// and exits before accepting any upload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("missing credential for provider '{provider}': set {key}")]
    MissingCredential { provider: String, key: String },

    #[error("unknown {kind} provider: '{name}'")]
    UnknownProvider { kind: &'static str, name: String },

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}
