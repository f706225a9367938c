//! # ⚛️ qstate — Repositório de Estados Quânticos
//!
//! Modela estados quânticos discretos como vetores complexos normalizados,
//! aplica operadores lineares (matrizes) e persiste coleções nomeadas em JSON.
//!
//! ## Computational Complexity
//!
//! **Apply — O(n²):** produto matriz-vetor n×n sobre números complexos
//!
//! **Measure — O(n):** |aᵢ|² para cada amplitude
//!
//! **Unitarity check — O(n³):** M·M† comparado com I (apenas no modo estrito)
//!
//! **Save / Load — O(S × n):** S estados de dimensão n, leitura/escrita do arquivo inteiro
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │          StateRepository                        │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  id → QuantumState (ordem de inserção)    │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  Operator · apply (M·v, nomes sem colisão)│  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  JSON save / load tolerante               │  │
//! │  └───────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Exemplo
//!
//! ```
//! use qstate::{catalog, StateRepository};
//! use num_complex::Complex64;
//!
//! let mut repo = StateRepository::new();
//! repo.add("q0", vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)], None)?;
//!
//! let x = catalog::builtin("X").unwrap();
//! let flipped = repo.apply("q0", &x, None)?;
//! assert_eq!(flipped.id(), "q0_X");
//!
//! let m = repo.measure("q0_X")?;
//! assert_eq!(m.get("1"), Some(1.0));
//! # Ok::<(), qstate::QuantumError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod operator;
pub mod persist;
pub mod repository;
pub mod state;

pub use config::{RepositoryConfig, DEFAULT_BASIS, DEFAULT_TOLERANCE};
pub use error::{ErrorKind, PersistenceCause, QuantumError, QuantumResult};
pub use operator::{Operator, Validation};
pub use repository::{LoadReport, SkippedEntry, StateRepository};
pub use state::{Measurement, QuantumState};
