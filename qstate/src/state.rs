//! Estado quântico: vetor de amplitudes normalizado

use num_complex::Complex64;
use std::collections::BTreeMap;
use std::fmt;

use crate::config::{DEFAULT_BASIS, DEFAULT_TOLERANCE};
use crate::error::{QuantumError, QuantumResult};

/// Estado quântico validado
///
/// Só é construído por [`QuantumState::new`] ou [`QuantumState::with_tolerance`],
/// que garantem vetor não vazio e `Σ|aᵢ|² ≈ 1`. As amplitudes não mudam depois
/// da construção; transformações produzem um novo estado.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantumState {
    id: String,
    vector: Vec<Complex64>,
    basis: String,
}

impl QuantumState {
    /// Cria estado com a tolerância padrão
    pub fn new(
        id: impl Into<String>,
        vector: Vec<Complex64>,
        basis: impl Into<String>,
    ) -> QuantumResult<Self> {
        Self::with_tolerance(id, vector, basis, DEFAULT_TOLERANCE)
    }

    /// Cria estado validando a normalização com tolerância relativa `tolerance`
    pub fn with_tolerance(
        id: impl Into<String>,
        vector: Vec<Complex64>,
        basis: impl Into<String>,
        tolerance: f64,
    ) -> QuantumResult<Self> {
        if vector.is_empty() {
            return Err(QuantumError::InvalidVector("vector cannot be empty".into()));
        }
        if let Some(i) = vector.iter().position(|a| !a.is_finite()) {
            return Err(QuantumError::InvalidVector(format!(
                "amplitude {i} is not finite: {}",
                vector[i]
            )));
        }

        let norm = norm_sqr(&vector);
        if !is_close_to_one(norm, tolerance) {
            return Err(QuantumError::NotNormalized { norm });
        }

        Ok(Self {
            id: id.into(),
            vector,
            basis: basis.into(),
        })
    }

    /// Estado de base `|index⟩` num espaço de dimensão `dimension`
    pub fn basis_state(id: impl Into<String>, dimension: usize, index: usize) -> QuantumResult<Self> {
        if index >= dimension {
            return Err(QuantumError::InvalidVector(format!(
                "basis index {index} out of range for dimension {dimension}"
            )));
        }
        let mut vector = vec![Complex64::new(0.0, 0.0); dimension];
        vector[index] = Complex64::new(1.0, 0.0);
        Self::new(id, vector, DEFAULT_BASIS)
    }

    /// Mesmo estado sob outro identificador
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn vector(&self) -> &[Complex64] {
        &self.vector
    }

    pub fn basis(&self) -> &str {
        &self.basis
    }

    /// Número de amplitudes
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }

    /// Soma de |aᵢ|²
    pub fn norm_sqr(&self) -> f64 {
        norm_sqr(&self.vector)
    }

    /// Distribuição de probabilidade sobre os estados de base
    ///
    /// Não colapsa o estado nem sorteia um resultado.
    pub fn measure(&self) -> Measurement {
        Measurement {
            state_id: self.id.clone(),
            basis: self.basis.clone(),
            probabilities: self.vector.iter().map(|a| a.norm_sqr()).collect(),
        }
    }
}

impl fmt::Display for QuantumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: vector=[", self.id)?;
        for (i, amplitude) in self.vector.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{amplitude}")?;
        }
        write!(f, "] basis={}", self.basis)
    }
}

/// Resultado de uma medição: probabilidade de cada estado de base
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    state_id: String,
    basis: String,
    probabilities: Vec<f64>,
}

impl Measurement {
    pub fn state_id(&self) -> &str {
        &self.state_id
    }

    pub fn basis(&self) -> &str {
        &self.basis
    }

    /// Probabilidade do resultado `outcome` ("0", "1", ...)
    ///
    /// Só aceita a forma canônica do índice: "01" e "+1" não são chaves.
    pub fn get(&self, outcome: &str) -> Option<f64> {
        let index = outcome.parse::<usize>().ok()?;
        if index.to_string() != outcome {
            return None;
        }
        self.probability(index)
    }

    /// Probabilidade pelo índice
    pub fn probability(&self, index: usize) -> Option<f64> {
        self.probabilities.get(index).copied()
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Pares (resultado, probabilidade) em ordem de índice
    pub fn iter(&self) -> impl Iterator<Item = (String, f64)> + '_ {
        self.probabilities
            .iter()
            .enumerate()
            .map(|(i, &p)| (i.to_string(), p))
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.iter().collect()
    }

    /// Soma das probabilidades (≈ 1)
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Measurement of state {} (basis {}):",
            self.state_id, self.basis
        )?;
        for (outcome, p) in self.iter() {
            let percent = (p * 100.0 * 100.0).round() / 100.0;
            writeln!(f, " - basis state {outcome}: {percent}%")?;
        }
        Ok(())
    }
}

pub(crate) fn norm_sqr(vector: &[Complex64]) -> f64 {
    vector.iter().map(|a| a.norm_sqr()).sum()
}

/// Comparação relativa com 1, no estilo `|x - 1| <= tol · max(|x|, 1)`
pub(crate) fn is_close_to_one(value: f64, tolerance: f64) -> bool {
    (value - 1.0).abs() <= tolerance * value.abs().max(1.0)
}
