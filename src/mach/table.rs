use super::{Address, MemoryManager, Symbol, SymbolKind, TABLE_SIZE};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// ## Named storage
///
/// Variables live in the table's memory manager. Labels are code
/// addresses and are kept in their own map, never allocated.

#[derive(Debug)]
pub struct SymbolTable {
    vars: HashMap<Rc<str>, Address>,
    labels: BTreeMap<Rc<str>, Symbol>,
    memory: MemoryManager,
}

impl Default for SymbolTable {
    fn default() -> SymbolTable {
        SymbolTable::new(TABLE_SIZE)
    }
}

impl SymbolTable {
    pub fn new(capacity: u32) -> SymbolTable {
        SymbolTable {
            vars: HashMap::new(),
            labels: BTreeMap::new(),
            memory: MemoryManager::new(capacity),
        }
    }

    /// Registers a named symbol, releasing any variable previously
    /// stored under the same name. Fails for anonymous symbols or
    /// when the memory manager is full.
    pub fn put(&mut self, symbol: Symbol) -> bool {
        let id = match symbol.id_rc() {
            Some(id) => id.clone(),
            None => return false,
        };
        if symbol.kind() == SymbolKind::Label {
            self.labels.insert(id, symbol);
            return true;
        }
        if let Some(addr) = self.vars.remove(&id) {
            self.memory.free(addr);
        }
        match self.memory.put(symbol) {
            Some(addr) => {
                self.vars.insert(id, addr);
                true
            }
            None => false,
        }
    }

    /// Labels shadow variables of the same name.
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        match self.labels.get(name) {
            Some(label) => Some(label),
            None => self
                .vars
                .get(name)
                .and_then(|addr| self.memory.get_block(*addr)),
        }
    }

    pub fn get_addr(&self, name: &str) -> Option<Address> {
        self.vars.get(name).copied()
    }

    pub fn contains_var(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn get_at(&self, addr: Address) -> Option<&Symbol> {
        self.memory.get(addr)
    }

    pub fn get_at_mut(&mut self, addr: Address) -> Option<&mut Symbol> {
        self.memory.get_mut(addr)
    }

    pub fn labels(&self) -> impl Iterator<Item = &Symbol> {
        self.labels.values()
    }

    pub fn memory(&self) -> &MemoryManager {
        &self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mach::Val;

    #[test]
    fn test_labels_bypass_memory() {
        let mut table = SymbolTable::new(4);
        assert!(table.put(Symbol::named("main", SymbolKind::Label, Val::Addr(3))));
        assert_eq!(table.memory().available(), 4);
        assert_eq!(table.get("main").map(|s| s.val()), Some(Val::Addr(3)));
        assert_eq!(table.get_addr("main"), None);
    }

    #[test]
    fn test_redeclare_releases_old_block() {
        let mut table = SymbolTable::new(4);
        let a = Symbol::array(Some("a"), SymbolKind::Var, vec![Val::Int(0); 3]);
        assert!(table.put(a));
        assert!(table.put(Symbol::named("b", SymbolKind::Var, Val::Int(1))));
        assert_eq!(table.memory().available(), 0);
        assert!(table.put(Symbol::named("a", SymbolKind::Var, Val::Float(2.0))));
        assert_eq!(table.memory().available(), 2);
        let addr = table.get_addr("a").unwrap_or(u32::MAX);
        assert_eq!(table.get_at(addr).map(|s| s.val()), Some(Val::Float(2.0)));
    }

    #[test]
    fn test_label_shadows_var() {
        let mut table = SymbolTable::default();
        assert!(table.put(Symbol::named("x", SymbolKind::Var, Val::Int(1))));
        assert!(table.put(Symbol::named("x", SymbolKind::Label, Val::Addr(0))));
        assert_eq!(table.get("x").map(|s| s.kind()), Some(SymbolKind::Label));
        assert!(table.contains_var("x"));
    }

    #[test]
    fn test_anonymous_rejected() {
        let mut table = SymbolTable::new(4);
        assert!(!table.put(Symbol::new(SymbolKind::Var, Val::Int(1))));
    }

    #[test]
    fn test_full_table() {
        let mut table = SymbolTable::new(2);
        let big = Symbol::array(Some("big"), SymbolKind::Var, vec![Val::Char(0); 3]);
        assert!(!table.put(big));
        assert!(table.get("big").is_none());
    }
}
