use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    TokenizerError(tokenizers::Error),
    CandleError(candle_core::Error),
    SerializationError(serde_json::Error),
    CsvError(csv::Error),
    IOError(std::io::Error),
    DatasetError(String),
}

impl From<tokenizers::Error> for Error {
    fn from(err: tokenizers::Error) -> Self {
        Self::TokenizerError(err)
    }
}

impl From<candle_core::Error> for Error {
    fn from(err: candle_core::Error) -> Self {
        Self::CandleError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::CsvError(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::IOError(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Self::TokenizerError(e) => write!(f, "tokenizer error: {}", e),
            Self::CandleError(e) => write!(f, "candle error: {}", e),
            Self::SerializationError(e) => write!(f, "serialization error: {}", e),
            Self::CsvError(e) => write!(f, "csv error: {}", e),
            Self::IOError(e) => write!(f, "IO error: {}", e),
            Self::DatasetError(e) => write!(f, "dataset error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
