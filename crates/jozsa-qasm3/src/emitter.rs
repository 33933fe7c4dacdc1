//! QASM3 emitter for serializing circuits.

use std::fmt::Write as _;

use jozsa_ir::{Circuit, ClbitId, Instruction, InstructionKind, QubitId};

use crate::error::{QasmError, QasmResult};

/// Emit a circuit as QASM3 source code.
///
/// Operations are written in program order. Qubits are addressed as
/// `q[i]` and classical bits as `c[i]` by their identifier.
pub fn emit(circuit: &Circuit) -> QasmResult<String> {
    let mut emitter = Emitter::new(circuit.num_qubits(), circuit.num_clbits());
    emitter.emit_circuit(circuit)?;
    Ok(emitter.output)
}

struct Emitter {
    output: String,
    num_qubits: usize,
    num_clbits: usize,
}

impl Emitter {
    fn new(num_qubits: usize, num_clbits: usize) -> Self {
        Self {
            output: String::new(),
            num_qubits,
            num_clbits,
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) -> QasmResult<()> {
        self.writeln("OPENQASM 3.0;");
        self.writeln("include \"stdgates.inc\";");
        self.writeln("");

        if self.num_qubits > 0 {
            self.writeln(&format!("qubit[{}] q;", self.num_qubits));
        }
        if self.num_clbits > 0 {
            self.writeln(&format!("bit[{}] c;", self.num_clbits));
        }
        if self.num_qubits > 0 || self.num_clbits > 0 {
            self.writeln("");
        }

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction)?;
        }
        Ok(())
    }

    fn emit_instruction(&mut self, instruction: &Instruction) -> QasmResult<()> {
        match instruction.kind {
            InstructionKind::Gate(gate) => {
                let qubits = self.qubit_list(&instruction.qubits)?;
                self.writeln(&format!("{} {qubits};", gate.name()));
            }

            InstructionKind::Measure => {
                if instruction.qubits.len() != instruction.clbits.len() {
                    return Err(QasmError::MalformedMeasure(format!(
                        "{} qubits onto {} bits",
                        instruction.qubits.len(),
                        instruction.clbits.len()
                    )));
                }
                for (&q, &c) in instruction.qubits.iter().zip(&instruction.clbits) {
                    let line = format!("{} = measure {};", self.clbit(c)?, self.qubit(q)?);
                    self.writeln(&line);
                }
            }

            InstructionKind::Reset => {
                for &q in &instruction.qubits {
                    let line = format!("reset {};", self.qubit(q)?);
                    self.writeln(&line);
                }
            }

            InstructionKind::Barrier => {
                if instruction.qubits.is_empty() {
                    self.writeln("barrier;");
                } else {
                    let qubits = self.qubit_list(&instruction.qubits)?;
                    self.writeln(&format!("barrier {qubits};"));
                }
            }
        }
        Ok(())
    }

    fn qubit(&self, qubit: QubitId) -> QasmResult<String> {
        if qubit.0 as usize >= self.num_qubits {
            return Err(QasmError::OperandOutOfRange {
                register: "q",
                operand: qubit.0,
                size: self.num_qubits,
            });
        }
        Ok(format!("q[{}]", qubit.0))
    }

    fn clbit(&self, clbit: ClbitId) -> QasmResult<String> {
        if clbit.0 as usize >= self.num_clbits {
            return Err(QasmError::OperandOutOfRange {
                register: "c",
                operand: clbit.0,
                size: self.num_clbits,
            });
        }
        Ok(format!("c[{}]", clbit.0))
    }

    fn qubit_list(&self, qubits: &[QubitId]) -> QasmResult<String> {
        let parts = qubits
            .iter()
            .map(|&q| self.qubit(q))
            .collect::<QasmResult<Vec<_>>>()?;
        Ok(parts.join(", "))
    }

    fn writeln(&mut self, line: &str) {
        // Writing into a String cannot fail.
        let _ = writeln!(self.output, "{line}");
    }
}
