//! # Persistência JSON
//!
//! Formato do arquivo: array JSON de entradas
//!
//! ```text
//! [
//!   { "id": "q0", "basis": "computational", "vector": [1.0, 0.0] },
//!   { "id": "q1", "basis": "computational", "vector": [0.0, { "real": 0.0, "imag": 1.0 }] }
//! ]
//! ```
//!
//! Amplitudes com parte imaginária zero são gravadas como número puro; as demais
//! como objeto `{"real", "imag"}`. A leitura aceita as duas formas em qualquer posição.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{QuantumError, QuantumResult};
use crate::state::QuantumState;

/// Codificação de uma amplitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amplitude {
    Real(f64),
    Complex { real: f64, imag: f64 },
}

impl From<Complex64> for Amplitude {
    fn from(c: Complex64) -> Self {
        // -0.0 vai como objeto para preservar o sinal
        if c.im == 0.0 && c.im.is_sign_positive() {
            Self::Real(c.re)
        } else {
            Self::Complex {
                real: c.re,
                imag: c.im,
            }
        }
    }
}

impl From<Amplitude> for Complex64 {
    fn from(a: Amplitude) -> Self {
        match a {
            Amplitude::Real(re) => Complex64::new(re, 0.0),
            Amplitude::Complex { real, imag } => Complex64::new(real, imag),
        }
    }
}

/// Entrada persistida
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<String>,
    pub vector: Vec<Amplitude>,
}

impl From<&QuantumState> for StoredState {
    fn from(state: &QuantumState) -> Self {
        Self {
            id: state.id().to_string(),
            basis: Some(state.basis().to_string()),
            vector: state.vector().iter().copied().map(Amplitude::from).collect(),
        }
    }
}

impl StoredState {
    /// Reconstrói o estado, validando a normalização
    pub fn into_state(self, default_basis: &str, tolerance: f64) -> QuantumResult<QuantumState> {
        let basis = self.basis.unwrap_or_else(|| default_basis.to_string());
        let vector = self.vector.into_iter().map(Complex64::from).collect();
        QuantumState::with_tolerance(self.id, vector, basis, tolerance)
    }
}

/// Serializa os estados em JSON indentado
pub fn encode<'a>(states: impl IntoIterator<Item = &'a QuantumState>) -> serde_json::Result<String> {
    let stored: Vec<StoredState> = states.into_iter().map(StoredState::from).collect();
    serde_json::to_string_pretty(&stored)
}

/// Grava o arquivo de forma atômica: arquivo temporário no mesmo diretório + rename
pub fn write_atomic(path: &Path, contents: &[u8]) -> QuantumResult<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| QuantumError::persistence(path, e))?;

    let mut tmp =
        tempfile::NamedTempFile::new_in(parent).map_err(|e| QuantumError::persistence(path, e))?;
    tmp.write_all(contents)
        .and_then(|_| tmp.flush())
        .map_err(|e| QuantumError::persistence(path, e))?;
    tmp.persist(path)
        .map_err(|e| QuantumError::persistence(path, e.error))?;
    Ok(())
}

/// Lê o arquivo e separa as entradas sem decodificá-las
///
/// Falha se o arquivo não existe, não é JSON ou não é um array. A decodificação
/// de cada entrada fica a cargo de [`decode_entry`].
pub fn read_entries(path: &Path) -> QuantumResult<Vec<serde_json::Value>> {
    let text = fs::read_to_string(path).map_err(|e| QuantumError::persistence(path, e))?;
    serde_json::from_str(&text).map_err(|e| QuantumError::persistence(path, e))
}

/// Decodifica uma entrada isolada
pub fn decode_entry(value: serde_json::Value) -> Result<StoredState, serde_json::Error> {
    serde_json::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amplitude_encoding() {
        let real = serde_json::to_string(&Amplitude::from(Complex64::new(0.6, 0.0))).unwrap();
        assert_eq!(real, "0.6");

        let complex = serde_json::to_string(&Amplitude::from(Complex64::new(0.5, -0.5))).unwrap();
        assert_eq!(complex, r#"{"real":0.5,"imag":-0.5}"#);
    }

    #[test]
    fn test_negative_zero_imaginary_keeps_sign() {
        let amplitude = Amplitude::from(Complex64::new(1.0, -0.0));
        assert_eq!(amplitude, Amplitude::Complex { real: 1.0, imag: -0.0 });

        let json = serde_json::to_string(&amplitude).unwrap();
        let back: Amplitude = serde_json::from_str(&json).unwrap();
        let c = Complex64::from(back);
        assert_eq!(c.re, 1.0);
        assert!(c.im == 0.0 && c.im.is_sign_negative());
    }

    #[test]
    fn test_amplitude_decoding_accepts_both_forms() {
        let values: Vec<Amplitude> =
            serde_json::from_str(r#"[1, 0.25, {"real": 0.0, "imag": 1.0}]"#).unwrap();
        let complex: Vec<Complex64> = values.into_iter().map(Complex64::from).collect();
        assert_eq!(
            complex,
            vec![
                Complex64::new(1.0, 0.0),
                Complex64::new(0.25, 0.0),
                Complex64::new(0.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_missing_basis_uses_default() {
        let stored = decode_entry(serde_json::json!({ "id": "q", "vector": [0, 1] })).unwrap();
        let state = stored.into_state("computational", 1e-9).unwrap();
        assert_eq!(state.basis(), "computational");
    }

    #[test]
    fn test_malformed_entry() {
        assert!(decode_entry(serde_json::json!({ "id": "q" })).is_err());
        assert!(decode_entry(serde_json::json!({ "id": 3, "vector": [1] })).is_err());
        assert!(decode_entry(serde_json::json!({ "id": "q", "vector": ["1+0j"] })).is_err());
    }

    #[test]
    fn test_encode_pretty() {
        let state = QuantumState::new(
            "q0",
            vec![Complex64::new(0.0, 1.0), Complex64::new(0.0, 0.0)],
            "computational",
        )
        .unwrap();
        let json = encode([&state]).unwrap();
        let back: Vec<StoredState> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![StoredState::from(&state)]);
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_write_atomic_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("states.json");
        write_atomic(&path, b"[]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_read_entries_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            read_entries(&missing),
            Err(QuantumError::Persistence { .. })
        ));

        let object = dir.path().join("object.json");
        fs::write(&object, r#"{"id": "q0"}"#).unwrap();
        assert!(read_entries(&object).is_err());
    }
}
