//! Operadores lineares: matrizes quadradas complexas aplicadas a estados

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::DEFAULT_TOLERANCE;
use crate::error::{QuantumError, QuantumResult};
use crate::state::QuantumState;

/// Nível de validação na construção de um [`Operator`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Validation {
    /// Apenas verifica se a matriz é quadrada
    #[default]
    Square,
    /// Também exige M·M† ≈ I
    Unitary,
}

impl Validation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Unitary => "unitary",
        }
    }

    /// Aceita "square" / "unitary" (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Some(Self::Square),
            "unitary" | "strict" => Some(Self::Unitary),
            _ => None,
        }
    }
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Operador quântico: nome + matriz quadrada n×n
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    name: String,
    matrix: Vec<Vec<Complex64>>,
}

impl Operator {
    /// Cria operador exigindo apenas matriz quadrada
    pub fn new(name: impl Into<String>, matrix: Vec<Vec<Complex64>>) -> QuantumResult<Self> {
        Self::with_validation(name, matrix, Validation::Square, DEFAULT_TOLERANCE)
    }

    /// Cria operador com nível de validação explícito
    pub fn with_validation(
        name: impl Into<String>,
        matrix: Vec<Vec<Complex64>>,
        validation: Validation,
        tolerance: f64,
    ) -> QuantumResult<Self> {
        let rows = matrix.len();
        if rows == 0 {
            return Err(QuantumError::NonSquareMatrix { rows: 0, row: 0, len: 0 });
        }
        if let Some((row, r)) = matrix.iter().enumerate().find(|(_, r)| r.len() != rows) {
            return Err(QuantumError::NonSquareMatrix {
                rows,
                row,
                len: r.len(),
            });
        }

        let op = Self {
            name: name.into(),
            matrix,
        };

        if validation == Validation::Unitary {
            let deviation = op.unitarity_deviation();
            if !(deviation <= tolerance) {
                return Err(QuantumError::NotUnitary {
                    name: op.name,
                    deviation,
                });
            }
        }

        Ok(op)
    }

    /// Matriz já conhecida como quadrada (catálogo)
    pub(crate) fn from_square(name: impl Into<String>, matrix: Vec<Vec<Complex64>>) -> Self {
        debug_assert!(matrix.iter().all(|row| row.len() == matrix.len()));
        Self {
            name: name.into(),
            matrix,
        }
    }

    /// Cria operador a partir de uma matriz real
    pub fn from_real(name: impl Into<String>, matrix: &[&[f64]]) -> QuantumResult<Self> {
        let matrix = matrix
            .iter()
            .map(|row| row.iter().map(|&v| Complex64::new(v, 0.0)).collect())
            .collect();
        Self::new(name, matrix)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dimensão n da matriz n×n
    pub fn dimension(&self) -> usize {
        self.matrix.len()
    }

    pub fn matrix(&self) -> &[Vec<Complex64>] {
        &self.matrix
    }

    /// Aplica o operador, validando o resultado com a tolerância padrão
    pub fn apply(&self, state: &QuantumState) -> QuantumResult<QuantumState> {
        self.apply_with_tolerance(state, DEFAULT_TOLERANCE)
    }

    /// Aplica o operador: v' = M·v, id `"{state}_{operador}"`, mesma base
    pub fn apply_with_tolerance(
        &self,
        state: &QuantumState,
        tolerance: f64,
    ) -> QuantumResult<QuantumState> {
        if state.dimension() != self.dimension() {
            return Err(QuantumError::DimensionMismatch {
                operator: self.name.clone(),
                expected: self.dimension(),
                actual: state.dimension(),
            });
        }

        let vector = self.mul_vector(state.vector());
        let id = format!("{}_{}", state.id(), self.name);
        QuantumState::with_tolerance(id, vector, state.basis(), tolerance)
    }

    fn mul_vector(&self, v: &[Complex64]) -> Vec<Complex64> {
        self.matrix
            .iter()
            .map(|row| row.iter().zip(v).map(|(m, a)| m * a).sum())
            .collect()
    }

    /// Transposta conjugada (dagger)
    pub fn dagger(&self) -> Operator {
        let n = self.dimension();
        let matrix = (0..n)
            .map(|i| (0..n).map(|j| self.matrix[j][i].conj()).collect())
            .collect();
        Operator {
            name: format!("{}†", self.name),
            matrix,
        }
    }

    /// Produto de matrizes self·other (aplica `other` primeiro)
    pub fn compose(&self, other: &Operator) -> QuantumResult<Operator> {
        if self.dimension() != other.dimension() {
            return Err(QuantumError::DimensionMismatch {
                operator: other.name.clone(),
                expected: self.dimension(),
                actual: other.dimension(),
            });
        }
        Ok(Operator {
            name: format!("{}·{}", self.name, other.name),
            matrix: mat_mul(&self.matrix, &other.matrix),
        })
    }

    /// Verifica se M·M† ≈ I
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        self.unitarity_deviation() <= tolerance
    }

    /// max |(M·M†)ᵢⱼ - δᵢⱼ|
    fn unitarity_deviation(&self) -> f64 {
        let product = mat_mul(&self.matrix, &self.dagger().matrix);
        let mut deviation: f64 = 0.0;
        for (i, row) in product.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                deviation = deviation.max((value - Complex64::new(expected, 0.0)).norm());
            }
        }
        deviation
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{}): [", self.name, self.dimension(), self.dimension())?;
        for (i, row) in self.matrix.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{value}")?;
            }
        }
        write!(f, "]")
    }
}

fn mat_mul(a: &[Vec<Complex64>], b: &[Vec<Complex64>]) -> Vec<Vec<Complex64>> {
    let n = a.len();
    (0..n)
        .map(|i| {
            (0..n)
                .map(|j| (0..n).map(|k| a[i][k] * b[k][j]).sum())
                .collect()
        })
        .collect()
}
