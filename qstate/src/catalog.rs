//! # Catálogo de operadores padrão
//!
//! Tabela estática de portas single-qubit construídas sem argumentos.
//!
//! - **Pauli**: I, X, Y, Z
//! - **Hadamard**: H
//! - **Phase**: S, T

use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::operator::Operator;

/// Entrada do catálogo
struct Builtin {
    name: &'static str,
    description: &'static str,
    matrix: fn() -> [[Complex64; 2]; 2],
}

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "I",
        description: "identity",
        matrix: || [[ONE, ZERO], [ZERO, ONE]],
    },
    Builtin {
        name: "X",
        description: "Pauli-X (bit flip)",
        matrix: || [[ZERO, ONE], [ONE, ZERO]],
    },
    Builtin {
        name: "Y",
        description: "Pauli-Y",
        matrix: || [[ZERO, -I], [I, ZERO]],
    },
    Builtin {
        name: "Z",
        description: "Pauli-Z (phase flip)",
        matrix: || [[ONE, ZERO], [ZERO, -ONE]],
    },
    Builtin {
        name: "H",
        description: "Hadamard",
        matrix: || {
            let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
            [[h, h], [h, -h]]
        },
    },
    Builtin {
        name: "S",
        description: "phase (sqrt Z)",
        matrix: || [[ONE, ZERO], [ZERO, I]],
    },
    Builtin {
        name: "T",
        description: "pi/8",
        matrix: || [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, PI / 4.0)]],
    },
];

impl Builtin {
    fn build(&self) -> Operator {
        let rows = (self.matrix)().iter().map(|row| row.to_vec()).collect();
        Operator::from_square(self.name, rows)
    }
}

/// Resolve um operador pelo nome (exato, depois sem diferenciar maiúsculas)
pub fn builtin(name: &str) -> Option<Operator> {
    BUILTINS
        .iter()
        .find(|b| b.name == name)
        .or_else(|| BUILTINS.iter().find(|b| b.name.eq_ignore_ascii_case(name)))
        .map(Builtin::build)
}

/// Nomes disponíveis
pub fn names() -> Vec<&'static str> {
    BUILTINS.iter().map(|b| b.name).collect()
}

/// Descrição curta de um operador do catálogo
pub fn describe(name: &str) -> Option<&'static str> {
    BUILTINS.iter().find(|b| b.name == name).map(|b| b.description)
}

/// Constrói todos os operadores do catálogo
pub fn all() -> Vec<Operator> {
    BUILTINS.iter().map(Builtin::build).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::QuantumState;

    fn zero() -> QuantumState {
        QuantumState::new("q0", vec![ONE, ZERO], "computational").unwrap()
    }

    #[test]
    fn test_all_unitary() {
        for op in all() {
            assert!(op.is_unitary(1e-10), "{} is not unitary", op.name());
            assert_eq!(op.dimension(), 2);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(builtin("X").unwrap().name(), "X");
        assert_eq!(builtin("h").unwrap().name(), "H");
        assert!(builtin("CNOT").is_none());
        assert_eq!(names(), vec!["I", "X", "Y", "Z", "H", "S", "T"]);
        assert_eq!(describe("Z"), Some("Pauli-Z (phase flip)"));
    }

    #[test]
    fn test_pauli_x() {
        let result = builtin("X").unwrap().apply(&zero()).unwrap();
        // X|0⟩ = |1⟩
        assert!(result.vector()[0].norm_sqr() < 1e-10);
        assert!((result.vector()[1].re - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_pauli_z_phase() {
        let one = QuantumState::new("q1", vec![ZERO, ONE], "computational").unwrap();
        let result = builtin("Z").unwrap().apply(&one).unwrap();
        // Z|1⟩ = -|1⟩
        assert!(result.vector()[0].norm_sqr() < 1e-10);
        assert!((result.vector()[1].re + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_s_squared_is_z() {
        let s = builtin("S").unwrap();
        let s2 = s.compose(&s).unwrap();
        let z = builtin("Z").unwrap();
        assert!((s2.matrix()[1][1] - z.matrix()[1][1]).norm() < 1e-10);
    }

    #[test]
    fn test_t_phase() {
        let one = QuantumState::new("q1", vec![ZERO, ONE], "computational").unwrap();
        let result = builtin("T").unwrap().apply(&one).unwrap();
        assert!((result.vector()[1].arg() - PI / 4.0).abs() < 1e-10);
        assert!((result.measure().total() - 1.0).abs() < 1e-12);
    }
}
