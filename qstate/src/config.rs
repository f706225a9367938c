//! Configuração do repositório
//!
//! Valores lidos de `.env` ou de variáveis de ambiente:
//!
//! - `QSTATE_TOLERANCE`: tolerância relativa da normalização (default: 1e-9)
//! - `QSTATE_VALIDATION`: `square` ou `unitary` (default: square)
//! - `QSTATE_DEFAULT_BASIS`: base usada quando nenhuma é informada (default: computational)

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};
use std::env;

use crate::operator::Validation;

/// Tolerância relativa padrão para Σ|aᵢ|² ≈ 1 e M·M† ≈ I
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Base padrão dos estados
pub const DEFAULT_BASIS: &str = "computational";

// Carrega .env uma única vez
static DOTENV_INIT: Lazy<()> = Lazy::new(|| {
    let _ = dotenv::dotenv();
});

#[inline]
fn ensure_loaded() {
    let _ = &*DOTENV_INIT;
}

/// Configuração do repositório de estados
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Tolerância relativa de normalização e unitariedade (sempre finita e > 0)
    #[serde(deserialize_with = "deserialize_tolerance")]
    tolerance: f64,
    /// Validação aplicada a operadores construídos pelo repositório
    pub validation: Validation,
    /// Base atribuída quando `add` não recebe uma
    pub default_basis: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            validation: Validation::default(),
            default_basis: DEFAULT_BASIS.to_string(),
        }
    }
}

impl RepositoryConfig {
    /// Lê a configuração do ambiente, caindo nos defaults
    pub fn from_env() -> Self {
        ensure_loaded();
        let defaults = Self::default();

        let tolerance = env::var("QSTATE_TOLERANCE")
            .ok()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|t| is_valid_tolerance(*t))
            .unwrap_or(defaults.tolerance);

        let validation = env::var("QSTATE_VALIDATION")
            .ok()
            .and_then(|v| Validation::parse(&v))
            .unwrap_or(defaults.validation);

        let default_basis = env::var("QSTATE_DEFAULT_BASIS")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.default_basis);

        Self {
            tolerance,
            validation,
            default_basis,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Define a tolerância; valores não positivos ou não finitos são ignorados
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        if is_valid_tolerance(tolerance) {
            self.tolerance = tolerance;
        }
        self
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_default_basis(mut self, basis: impl Into<String>) -> Self {
        self.default_basis = basis.into();
        self
    }
}

fn is_valid_tolerance(tolerance: f64) -> bool {
    tolerance.is_finite() && tolerance > 0.0
}

fn deserialize_tolerance<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let tolerance = f64::deserialize(deserializer)?;
    if is_valid_tolerance(tolerance) {
        Ok(tolerance)
    } else {
        Err(serde::de::Error::custom(format!(
            "tolerance must be finite and positive, got {tolerance}"
        )))
    }
}
