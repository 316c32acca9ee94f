use super::Program;
use crate::lang::{Error, Unit};

/// ## Resolution pass
///
/// Consumes a parsed unit. Every instruction is solved against the
/// table even after a failure so all problems are reported together.
/// Any failure rejects the whole program.

pub fn link(unit: Unit) -> Result<Program, Vec<Error>> {
    let Unit {
        table,
        instructions,
        code_start,
    } = unit;
    let mut errors: Vec<Error> = vec![];
    let mut code = Vec::with_capacity(instructions.len());
    for mut instruction in instructions {
        match instruction.solve(&table) {
            Ok(()) => code.push(instruction),
            Err(error) => errors.push(error),
        }
    }
    if errors.is_empty() {
        Ok(Program::new(code, code_start, table))
    } else {
        Err(errors)
    }
}
