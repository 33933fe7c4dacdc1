//! Full Deutsch-Jozsa circuit assembly.

use jozsa_ir::{Circuit, QubitId};
use tracing::debug;

use crate::error::AlgoResult;
use crate::oracle::{Oracle, register_width};

/// Assemble the Deutsch-Jozsa circuit for `n` data qubits.
///
/// Layers, in order:
/// 1. X on the ancilla `q[n]`
/// 2. H on all `n + 1` qubits
/// 3. the oracle, fenced by barriers
/// 4. H on `q[0..n]`
/// 5. measure `q[i]` into `c[i]` for `i < n`
///
/// The ancilla is never measured, so the result has `n` classical bits.
pub fn deutsch_jozsa_circuit(n: u32, oracle: &Oracle) -> AlgoResult<Circuit> {
    let width = register_width(n)?;
    let block = oracle.build(n)?;

    let mut circuit = Circuit::new(format!("deutsch_jozsa_{}", oracle.label()));
    let qubits = circuit.add_qreg("q", width);
    let clbits = circuit.add_creg("c", n);
    let ancilla = QubitId(n);

    circuit.x(ancilla)?;
    for &q in &qubits {
        circuit.h(q)?;
    }

    circuit.barrier_all()?;
    circuit.compose(&block, &qubits)?;
    circuit.barrier_all()?;

    for &q in &qubits[..n as usize] {
        circuit.h(q)?;
    }
    for (&q, &c) in qubits.iter().zip(&clbits) {
        circuit.measure(q, c)?;
    }

    debug!(
        n,
        oracle = %oracle,
        ops = circuit.dag().num_ops(),
        depth = circuit.depth(),
        "Assembled Deutsch-Jozsa circuit"
    );
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jozsa_ir::{InstructionKind, StandardGate};

    #[test]
    fn test_shape() {
        let circuit = deutsch_jozsa_circuit(3, &Oracle::balanced()).unwrap();
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.num_clbits(), 3);
        assert_eq!(circuit.name(), "deutsch_jozsa_balanced");
    }

    #[test]
    fn test_layer_order() {
        let circuit = deutsch_jozsa_circuit(2, &Oracle::constant(true)).unwrap();
        let kinds: Vec<_> = circuit
            .instructions()
            .map(|inst| (inst.kind, inst.qubits.clone()))
            .collect();

        let gate = |g, qs: &[u32]| {
            (
                InstructionKind::Gate(g),
                qs.iter().copied().map(QubitId).collect::<Vec<_>>(),
            )
        };
        let all = vec![QubitId(0), QubitId(1), QubitId(2)];
        let expected = vec![
            gate(StandardGate::X, &[2]),
            gate(StandardGate::H, &[0]),
            gate(StandardGate::H, &[1]),
            gate(StandardGate::H, &[2]),
            (InstructionKind::Barrier, all.clone()),
            gate(StandardGate::X, &[2]),
            (InstructionKind::Barrier, all),
            gate(StandardGate::H, &[0]),
            gate(StandardGate::H, &[1]),
            (InstructionKind::Measure, vec![QubitId(0)]),
            (InstructionKind::Measure, vec![QubitId(1)]),
        ];
        assert_eq!(kinds, expected);
    }

    #[test]
    fn test_measurements_map_data_qubits_to_matching_bits() {
        let circuit = deutsch_jozsa_circuit(4, &Oracle::balanced()).unwrap();
        let measures: Vec<_> = circuit
            .instructions()
            .filter(|inst| inst.is_measure())
            .map(|inst| (inst.qubits[0].0, inst.clbits[0].0))
            .collect();
        assert_eq!(measures, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_gate_counts() {
        let circuit = deutsch_jozsa_circuit(3, &Oracle::balanced()).unwrap();
        let ops = circuit.count_ops();
        assert_eq!(ops.get("x"), Some(&1));
        assert_eq!(ops.get("h"), Some(&7));
        assert_eq!(ops.get("cx"), Some(&3));
        assert_eq!(ops.get("measure"), Some(&3));
        assert_eq!(ops.get("barrier"), Some(&2));

        let identity = deutsch_jozsa_circuit(3, &Oracle::constant(false)).unwrap();
        assert_eq!(identity.count_ops().get("x"), Some(&1));
        assert_eq!(identity.count_ops().get("cx"), None);
    }

    #[test]
    fn test_rejects_empty_register() {
        assert!(deutsch_jozsa_circuit(0, &Oracle::balanced()).is_err());
    }
}
