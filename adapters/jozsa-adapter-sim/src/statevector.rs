//! Statevector simulation engine.
//!
//! Basis index bit `k` holds qubit `k` (little-endian).

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::PI;

use jozsa_ir::StandardGate;

/// A statevector representing a quantum state.
#[derive(Debug, Clone)]
pub(crate) struct Statevector {
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self { amplitudes }
    }

    /// Apply a built-in gate. Operands are validated by the IR.
    pub fn apply_gate(&mut self, gate: StandardGate, qubits: &[usize]) {
        match gate {
            StandardGate::I => {}
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Y => self.apply_y(qubits[0]),
            StandardGate::Z => self.apply_phase(qubits[0], PI),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::S => self.apply_phase(qubits[0], PI / 2.0),
            StandardGate::Sdg => self.apply_phase(qubits[0], -PI / 2.0),
            StandardGate::T => self.apply_phase(qubits[0], PI / 4.0),
            StandardGate::Tdg => self.apply_phase(qubits[0], -PI / 4.0),
            StandardGate::CX => self.apply_mcx(&qubits[..1], qubits[1]),
            StandardGate::CZ => self.apply_cz(qubits[0], qubits[1]),
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
            StandardGate::CCX => self.apply_mcx(&qubits[..2], qubits[2]),
        }
    }

    fn apply_x(&mut self, qubit: usize) {
        self.apply_mcx(&[], qubit);
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    /// X on `target` when every control is set; no controls is a plain X.
    fn apply_mcx(&mut self, controls: &[usize], target: usize) {
        let ctrl_mask = controls.iter().fold(0usize, |m, &c| m | (1 << c));
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & ctrl_mask == ctrl_mask && i & tgt_mask == 0 {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let mask = (1 << control) | (1 << target);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp = -*amp;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if i & mask1 != 0 && i & mask2 == 0 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Probability of reading 1 on `qubit`.
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = 1 << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Projectively measure one qubit, collapsing the state.
    pub fn measure<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) -> bool {
        let p_one = self.probability_one(qubit);
        let outcome = rng.r#gen::<f64>() < p_one;
        self.collapse(qubit, outcome, if outcome { p_one } else { 1.0 - p_one });
        outcome
    }

    fn collapse(&mut self, qubit: usize, outcome: bool, probability: f64) {
        let mask = 1 << qubit;
        let norm = probability.sqrt();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                if norm > 0.0 {
                    *amp /= norm;
                }
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
    }

    /// Reset a qubit to |0⟩: measure, then flip if it read 1.
    pub fn reset<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) {
        if self.measure(qubit, rng) {
            self.apply_x(qubit);
        }
    }

    /// Probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use proptest::prelude::*;
    use rand::rngs::StdRng;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        for i in 1..4 {
            assert!(approx_eq(sv.amplitudes[i], Complex64::new(0.0, 0.0)));
        }
    }

    #[test]
    fn test_hadamard_twice_is_identity() {
        let mut sv = Statevector::new(1);
        sv.apply_gate(StandardGate::H, &[0]);
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(sqrt2_inv, 0.0)));
        sv.apply_gate(StandardGate::H, &[0]);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_cx_is_little_endian() {
        let mut sv = Statevector::new(2);
        sv.apply_gate(StandardGate::X, &[0]);
        sv.apply_gate(StandardGate::CX, &[0, 1]);
        // |q1 q0⟩ = |11⟩
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_phase_kickback() {
        // Ancilla in |−⟩ turns CX into a Z on the control.
        let mut sv = Statevector::new(2);
        sv.apply_gate(StandardGate::X, &[1]);
        sv.apply_gate(StandardGate::H, &[0]);
        sv.apply_gate(StandardGate::H, &[1]);
        sv.apply_gate(StandardGate::CX, &[0, 1]);
        sv.apply_gate(StandardGate::H, &[0]);
        assert!((sv.probability_one(0) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_toffoli_and_swap() {
        let mut sv = Statevector::new(3);
        sv.apply_gate(StandardGate::X, &[0]);
        sv.apply_gate(StandardGate::X, &[1]);
        sv.apply_gate(StandardGate::CCX, &[0, 1, 2]);
        assert!(approx_eq(sv.amplitudes[0b111], Complex64::new(1.0, 0.0)));

        sv.apply_gate(StandardGate::X, &[1]);
        sv.apply_gate(StandardGate::Swap, &[1, 2]);
        assert!(approx_eq(sv.amplitudes[0b011], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_measure_collapses() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut sv = Statevector::new(2);
        sv.apply_gate(StandardGate::H, &[0]);
        sv.apply_gate(StandardGate::CX, &[0, 1]);

        let first = sv.measure(0, &mut rng);
        let p = sv.probability_one(1);
        assert!((p - if first { 1.0 } else { 0.0 }).abs() < 1e-10);
        let total: f64 = sv.probabilities().iter().sum();
        assert!((total - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_reset_returns_to_zero() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let mut sv = Statevector::new(1);
            sv.apply_gate(StandardGate::H, &[0]);
            sv.reset(0, &mut rng);
            assert!(sv.probability_one(0) < 1e-10);
        }
    }

    #[test]
    fn test_probabilities_of_basis_state() {
        let mut sv = Statevector::new(2);
        sv.apply_gate(StandardGate::X, &[1]);
        assert_eq!(sv.probabilities(), vec![0.0, 0.0, 1.0, 0.0]);
    }

    fn arb_gate() -> impl Strategy<Value = StandardGate> {
        prop_oneof![
            Just(StandardGate::X),
            Just(StandardGate::Y),
            Just(StandardGate::Z),
            Just(StandardGate::H),
            Just(StandardGate::S),
            Just(StandardGate::T),
            Just(StandardGate::CX),
            Just(StandardGate::CZ),
            Just(StandardGate::Swap),
            Just(StandardGate::CCX),
        ]
    }

    proptest! {
        #[test]
        fn prop_gates_preserve_norm(
            ops in prop::collection::vec((arb_gate(), any::<u64>()), 0..40),
        ) {
            let n = 4usize;
            let mut sv = Statevector::new(n);
            for (gate, pick) in ops {
                // distinct operands drawn from a rotation of 0..n
                let start = (pick % n as u64) as usize;
                let qubits: Vec<usize> = (0..gate.num_qubits() as usize)
                    .map(|k| (start + k) % n)
                    .collect();
                sv.apply_gate(gate, &qubits);
            }
            let total: f64 = sv.probabilities().iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
        }
    }
}
