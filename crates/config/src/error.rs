#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Threshold out of range: {0}% (must be within 1-100)")]
    ThresholdRange(u64),

    #[error("Warning threshold {warning}% must be below critical threshold {critical}%")]
    ThresholdOrder { warning: u64, critical: u64 },

    #[error("Failed to serialize TOML: {0}")]
    SerializeTOML(#[from] toml_edit::ser::Error),

    #[error("Failed to parse TOML: {0}")]
    DeserializeTOML(#[from] toml_edit::de::Error),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}
