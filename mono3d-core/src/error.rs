/// Error types for shape validation and scene configuration
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("face {face} references vertex {index}, but the shape has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u16,
        vertex_count: usize,
    },
    #[error("shape has {0} vertices; 16-bit indices address at most 65536")]
    TooManyVertices(usize),
    #[error("index buffer length {0} is not a multiple of 3")]
    MalformedIndexBuffer(usize),
    #[error("face color bias has {actual} entries, expected {expected}")]
    FaceBiasLength { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
