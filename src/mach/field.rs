use super::{Address, Symbol, SymbolKind, SymbolTable, Val};
use crate::error;
use crate::lang::Error;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Resolved operand
///
/// Self-contained: nothing here borrows from the symbol table.

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Table variable, located by its static address.
    Var { name: Rc<str>, addr: Address },
    /// Code address.
    Label(Address),
    Temp(u32),
    Param(u32),
    Const(Val),
}

impl Operand {
    pub fn kind(&self) -> SymbolKind {
        match self {
            Operand::Var { .. } => SymbolKind::Var,
            Operand::Label(_) => SymbolKind::Label,
            Operand::Temp(_) => SymbolKind::Temp,
            Operand::Param(_) => SymbolKind::Param,
            Operand::Const(_) => SymbolKind::Const,
        }
    }

    /// True for operands that carry their value inline.
    pub fn is_constant(&self) -> bool {
        matches!(self, Operand::Label(_) | Operand::Const(_))
    }
}

/// ## Instruction operand
///
/// Starts as an owned placeholder symbol and is solved at most once.

#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Empty,
    Unsolved(Symbol),
    Solved(Operand),
}

impl Default for Field {
    fn default() -> Field {
        Field::Empty
    }
}

impl Field {
    pub fn is_empty(&self) -> bool {
        matches!(self, Field::Empty)
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, Field::Solved(_))
    }

    pub fn operand(&self) -> Option<&Operand> {
        match self {
            Field::Solved(operand) => Some(operand),
            _ => None,
        }
    }

    pub fn solve(&mut self, table: &SymbolTable) -> Result<()> {
        let placeholder = match self {
            Field::Unsolved(symbol) => symbol,
            _ => return Ok(()),
        };
        let operand = match placeholder.kind() {
            SymbolKind::Var | SymbolKind::Label => {
                let name = match placeholder.id_rc() {
                    Some(name) => name.clone(),
                    None => return Err(error!(InternalError, placeholder.location(); "anonymous reference")),
                };
                match table.get(&name) {
                    None => {
                        let message = format!("'{}'", name);
                        return Err(error!(UnresolvedSymbol, placeholder.location(); &message));
                    }
                    Some(symbol) if symbol.kind() == SymbolKind::Label => {
                        Operand::Label(symbol.val().to_addr())
                    }
                    Some(_) => match table.get_addr(&name) {
                        Some(addr) => Operand::Var { name, addr },
                        None => return Err(error!(InternalError, placeholder.location(); &name)),
                    },
                }
            }
            SymbolKind::Temp => Operand::Temp(placeholder.val().to_addr()),
            SymbolKind::Param => Operand::Param(placeholder.val().to_addr()),
            SymbolKind::Const => Operand::Const(placeholder.val()),
        };
        *self = Field::Solved(operand);
        Ok(())
    }
}

impl From<Operand> for Field {
    fn from(operand: Operand) -> Field {
        Field::Solved(operand)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Field::Empty => Ok(()),
            Field::Unsolved(symbol) => match symbol.kind() {
                SymbolKind::Temp => write!(f, "{}", Operand::Temp(symbol.val().to_addr())),
                SymbolKind::Param => write!(f, "{}", Operand::Param(symbol.val().to_addr())),
                SymbolKind::Const => write!(f, "{}", symbol.val().escape()),
                SymbolKind::Var | SymbolKind::Label => write!(f, "{}", symbol.id().unwrap_or("?")),
            },
            Field::Solved(operand) => write!(f, "{}", operand),
        }
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Operand::Var { name, .. } => write!(f, "{}", name),
            Operand::Label(addr) => write!(f, "0x{:08x}", addr),
            Operand::Temp(super::STACK_REG) => write!(f, "$s"),
            Operand::Temp(super::FRAME_REG) => write!(f, "$f"),
            Operand::Temp(super::PC_REG) => write!(f, "$pc"),
            Operand::Temp(super::RA_REG) => write!(f, "$ra"),
            Operand::Temp(n) => write!(f, "${}", n),
            Operand::Param(n) => write!(f, "#{}", n),
            Operand::Const(val) => write!(f, "{}", val.escape()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    fn table() -> SymbolTable {
        let mut table = SymbolTable::new(16);
        table.put(Symbol::named("x", SymbolKind::Var, Val::Int(4)));
        table.put(Symbol::named("loop", SymbolKind::Label, Val::Addr(7)));
        table
    }

    #[test]
    fn test_solve_var() {
        let table = table();
        let mut field = Field::Unsolved(Symbol::named("x", SymbolKind::Var, Val::Int(0)));
        assert!(field.solve(&table).is_ok());
        let expected = Operand::Var {
            name: "x".into(),
            addr: 0,
        };
        assert_eq!(field.operand(), Some(&expected));
    }

    #[test]
    fn test_solve_label_copies_address() {
        let table = table();
        let mut field = Field::Unsolved(Symbol::named("loop", SymbolKind::Var, Val::Int(0)));
        assert!(field.solve(&table).is_ok());
        assert_eq!(field.operand(), Some(&Operand::Label(7)));
        assert_eq!(field.to_string(), "0x00000007");
    }

    #[test]
    fn test_solve_is_idempotent() {
        let table = table();
        let mut field = Field::Unsolved(Symbol::new(SymbolKind::Const, Val::Float(1.5)));
        assert!(field.solve(&table).is_ok());
        let once = field.clone();
        assert!(field.solve(&table).is_ok());
        assert_eq!(field, once);
        assert_eq!(field.operand(), Some(&Operand::Const(Val::Float(1.5))));
    }

    #[test]
    fn test_unresolved() {
        let table = table();
        let mut field = Field::Unsolved(Symbol::named("nope", SymbolKind::Var, Val::Int(0)));
        let err = field.solve(&table).err().map(|e| e.code());
        assert_eq!(err, Some(ErrorCode::UnresolvedSymbol));
        assert!(!field.is_solved());
    }

    #[test]
    fn test_temps_and_params() {
        let table = table();
        let mut temp = Field::Unsolved(Symbol::new(SymbolKind::Temp, Val::Addr(3)));
        let mut param = Field::Unsolved(Symbol::new(SymbolKind::Param, Val::Addr(1)));
        assert!(temp.solve(&table).is_ok());
        assert!(param.solve(&table).is_ok());
        assert_eq!(temp.to_string(), "$3");
        assert_eq!(param.to_string(), "#1");
        let mut reg = Field::Unsolved(Symbol::new(SymbolKind::Temp, Val::Addr(0x402)));
        assert!(reg.solve(&table).is_ok());
        assert_eq!(reg.to_string(), "$pc");
    }
}
