use super::{Address, Instruction, SymbolTable};

/// ## Debug dump of a loaded program
///
/// Table blocks print as `[addr:size] symbol`, then labels,
/// then one `addr: instruction` line per instruction.

pub struct Listing<'a> {
    table: &'a SymbolTable,
    code: &'a [Instruction],
    code_start: Address,
}

impl<'a> Listing<'a> {
    pub fn new(table: &'a SymbolTable, code: &'a [Instruction], code_start: Address) -> Listing<'a> {
        Listing {
            table,
            code,
            code_start,
        }
    }
}

impl<'a> std::fmt::Display for Listing<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "SYMBOLS")?;
        for (addr, size, symbol) in self.table.memory().blocks() {
            writeln!(f, "[{:06x}:{:02x}] {}", addr, size, symbol)?;
        }
        for label in self.table.labels() {
            writeln!(f, "{}", label)?;
        }
        writeln!(f, "CODE")?;
        for (index, instruction) in self.code.iter().enumerate() {
            writeln!(f, "{:06x}: {}", self.code_start as usize + index, instruction)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::parse;
    use crate::mach::link;

    #[test]
    fn test_listing() {
        let (unit, errors) = parse("t.tac", ".table\nint x = 5\n.code\nmain: add $0, x, 1\nprint $0\n");
        assert!(errors.is_empty());
        let program = link(unit).ok().unwrap();
        let s = Listing::new(program.table(), program.code(), program.code_start()).to_string();
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines[0], "SYMBOLS");
        assert!(lines[1].starts_with("[000000:01] var x: int 5"));
        assert!(lines.contains(&"000000: add $0, x, 1"));
        assert!(lines.contains(&"000001: print $0"));
    }
}
