//! Tipos de erro para qstate

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Resultado customizado para operações quânticas
pub type QuantumResult<T> = Result<T, QuantumError>;

/// Erros que podem ocorrer em operações sobre estados, operadores e repositório
#[derive(Debug, Error)]
pub enum QuantumError {
    #[error("Invalid vector: {0}")]
    InvalidVector(String),

    #[error("Vector is not normalized: sum of |amplitude|^2 is {norm}, expected 1")]
    NotNormalized { norm: f64 },

    #[error("Matrix must be square: {rows} rows but row {row} has {len} columns")]
    NonSquareMatrix { rows: usize, row: usize, len: usize },

    #[error("Operator '{name}' is not unitary: max |M·M† - I| = {deviation:e}")]
    NotUnitary { name: String, deviation: f64 },

    #[error("Operator '{operator}' has dimension {expected} but state has {actual} amplitudes")]
    DimensionMismatch {
        operator: String,
        expected: usize,
        actual: usize,
    },

    #[error("A state with id '{0}' already exists")]
    DuplicateId(String),

    #[error("No state with id '{0}'")]
    UnknownId(String),

    #[error("Persistence error on {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: PersistenceCause,
    },
}

/// Causa subjacente de uma falha de persistência
#[derive(Debug, Error)]
pub enum PersistenceCause {
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl QuantumError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, cause: impl Into<PersistenceCause>) -> Self {
        Self::Persistence {
            path: path.into(),
            source: cause.into(),
        }
    }

    /// Categoria do erro, sem o payload
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidVector(_) => ErrorKind::InvalidVector,
            Self::NotNormalized { .. } => ErrorKind::NotNormalized,
            Self::NonSquareMatrix { .. } => ErrorKind::NonSquareMatrix,
            Self::NotUnitary { .. } => ErrorKind::NotUnitary,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::DuplicateId(_) => ErrorKind::DuplicateId,
            Self::UnknownId(_) => ErrorKind::UnknownId,
            Self::Persistence { .. } => ErrorKind::PersistenceError,
        }
    }
}

/// Categorias de erro expostas ao shell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidVector,
    NotNormalized,
    NonSquareMatrix,
    NotUnitary,
    DimensionMismatch,
    DuplicateId,
    UnknownId,
    PersistenceError,
}

impl ErrorKind {
    /// Nome descritivo
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidVector => "InvalidVector",
            Self::NotNormalized => "NotNormalized",
            Self::NonSquareMatrix => "NonSquareMatrix",
            Self::NotUnitary => "NotUnitary",
            Self::DimensionMismatch => "DimensionMismatch",
            Self::DuplicateId => "DuplicateId",
            Self::UnknownId => "UnknownId",
            Self::PersistenceError => "PersistenceError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
