use thiserror::Error;

/// Errors from the generation pipeline.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("asset {id:#010X}: string table has no strings")]
    EmptyStringTable { id: u32 },

    #[error(transparent)]
    Disc(#[from] retrodisc::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
