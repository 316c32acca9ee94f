use super::{Address, Instruction, SymbolKind, SymbolTable};
use std::rc::Rc;

/// ## Resolved program
///
/// Instruction `i` lives at code address `code_start + i`.

#[derive(Debug)]
pub struct Program {
    code: Rc<Vec<Instruction>>,
    code_start: Address,
    table: SymbolTable,
}

impl Program {
    pub fn new(code: Vec<Instruction>, code_start: Address, table: SymbolTable) -> Program {
        Program {
            code: Rc::new(code),
            code_start,
            table,
        }
    }

    pub fn code(&self) -> &Rc<Vec<Instruction>> {
        &self.code
    }

    pub fn code_start(&self) -> Address {
        self.code_start
    }

    /// Address of the `main` label, or the start of the code.
    pub fn entry_point(&self) -> Address {
        match self.table.get("main") {
            Some(s) if s.kind() == SymbolKind::Label => s.val().to_addr(),
            _ => self.code_start,
        }
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn into_parts(self) -> (Rc<Vec<Instruction>>, Address, SymbolTable) {
        (self.code, self.code_start, self.table)
    }
}
