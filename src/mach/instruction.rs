use super::{Field, Mode, Opcode, Operand, SymbolKind, SymbolTable};
use crate::error;
use crate::lang::{Error, Location};

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    opcode: Opcode,
    operands: [Field; 3],
    location: Option<Location>,
}

impl Instruction {
    pub fn new(opcode: Opcode, fields: Vec<Field>, location: Option<&Location>) -> Instruction {
        let mut operands = [Field::Empty, Field::Empty, Field::Empty];
        for (slot, field) in operands.iter_mut().zip(fields) {
            *slot = field;
        }
        Instruction {
            opcode,
            operands,
            location: location.cloned(),
        }
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Solved operand at `index`, if present.
    pub fn operand(&self, index: usize) -> Option<&Operand> {
        self.operands.get(index).and_then(|f| f.operand())
    }

    /// Solves every operand and then checks operand kinds against the
    /// opcode. Stops at the first problem.
    pub fn solve(&mut self, table: &SymbolTable) -> Result<()> {
        let location = self.location.as_ref();
        for field in self.operands.iter_mut() {
            field.solve(table).map_err(|e| e.or_location(location))?;
        }
        if self.opcode.has_target() {
            if let Some(target) = self.operands[0].operand() {
                if target.is_constant() {
                    return Err(error!(InvalidTarget, location; &target.to_string()));
                }
            }
        }
        if let Opcode::Move {
            source: Mode::Address,
            ..
        } = self.opcode
        {
            if let Some(source) = self.operands[1].operand() {
                if source.is_constant() || source.kind() == SymbolKind::Temp {
                    return Err(error!(InvalidAddressOf, location; &source.to_string()));
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.opcode)?;
        let mut first = true;
        for field in self.operands.iter().filter(|f| !f.is_empty()) {
            if first {
                write!(f, " {}", field)?;
                first = false;
            } else {
                write!(f, ", {}", field)?;
            }
        }
        Ok(())
    }
}
