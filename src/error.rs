// Error type for the mask loader.
// Every variant states *where* things went wrong. Malformed polygon data and
// missing orientation metadata never show up here: those recover locally.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading the image file (or listing the input directory) failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image decoder rejected the bytes. Passed through untouched.
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// The named image is not present in the input directory.
    #[error("Invalid image file: {0}")]
    InvalidImage(String),

    /// Feather is above what the host accepts.
    #[error("Feather {value} is out of range (max {max})")]
    FeatherOutOfRange { value: u32, max: u32 },

    /// The config file was not valid JSON for `Config`.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Packing a buffer into a batch tensor failed.
    #[error("Tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
