// ─── Error ──────────────────────────────────────────────────────────────────
use smol_str::SmolStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntityError {
    /// The schema gate does not recognize the field. Raised by `set` and bulk `set_attrs`.
    #[error("unknown attribute: {name}")]
    UnknownField { name: SmolStr },
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
