//! Config failures. Layer-scoped variants carry the layer label, e.g.
//! `cwd(/srv/app/huddle.json5)` or `runtime(./prod.json5)`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer file exists but could not be read, or a runtime layer passed
    /// with `--config` is missing.
    #[error("cannot read config layer {layer}: {source}")]
    LayerUnreadable {
        layer: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config layer {layer} is not valid json5: {source}")]
    LayerSyntax {
        layer: String,
        #[source]
        source: json5::Error,
    },
    /// Schema check on a single layer. `path` reads `<layer>:<field>`, for
    /// example `user(~/.huddle/huddle.json5):endpoints.timeout_secs`.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
    /// The merged layers passed the schema but did not decode into
    /// `HuddleConfig`.
    #[error("effective config does not decode: {0}")]
    Undecodable(#[from] serde_json::Error),
    /// Cross-field rule broken, such as a file history provider without
    /// `history.path` or inverted `history` backoff bounds.
    #[error("inconsistent config: {0}")]
    Inconsistent(String),
}
