use proptest::prelude::*;
use tac::mach::{MemoryManager, Symbol, SymbolKind, SymbolTable, Val};

#[derive(Debug, Clone)]
enum Op {
    Alloc(u32),
    Free(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![(1u32..12).prop_map(Op::Alloc), (0usize..16).prop_map(Op::Free)]
}

/// Blocks and stalls tile `[0, max)` with no two stalls adjacent.
fn check_partition(mm: &MemoryManager) -> Result<(), TestCaseError> {
    let mut ranges: Vec<(u32, u32, bool)> = mm
        .blocks()
        .map(|(base, size, _)| (base, size, true))
        .chain(mm.stalls().iter().map(|s| (s.base, s.size, false)))
        .collect();
    ranges.sort_by_key(|r| r.0);
    let mut next = 0;
    let mut prev_stall = false;
    for (base, size, used) in ranges {
        prop_assert_eq!(base, next);
        prop_assert!(size > 0);
        prop_assert!(used || !prev_stall, "adjacent stalls at {}", base);
        prev_stall = !used;
        next = base + size;
    }
    prop_assert_eq!(next, mm.max_size());
    let free: u32 = mm.stalls().iter().map(|s| s.size).sum();
    prop_assert_eq!(free, mm.available());
    Ok(())
}

proptest! {
    #[test]
    fn allocator_keeps_partition(ops in prop::collection::vec(op(), 1..60)) {
        let mut mm = MemoryManager::new(64);
        let mut live: Vec<u32> = vec![];
        for op in ops {
            match op {
                Op::Alloc(size) => {
                    if let Some(addr) = mm.alloc(size) {
                        prop_assert!(!live.contains(&addr));
                        live.push(addr);
                    }
                }
                Op::Free(n) => {
                    if !live.is_empty() {
                        let addr = live.remove(n % live.len());
                        prop_assert!(mm.free(addr));
                    }
                }
            }
            check_partition(&mm)?;
        }
        for addr in live {
            prop_assert!(mm.free(addr));
        }
        prop_assert_eq!(mm.stalls().len(), 1);
        prop_assert_eq!(mm.available(), 64);
    }

    #[test]
    fn free_of_unknown_address_fails(addr in 0u32..64) {
        let mut mm = MemoryManager::new(64);
        prop_assert!(!mm.free(addr));
        check_partition(&mm)?;
    }
}

#[test]
fn test_table_addresses_follow_declaration_order() {
    let mut table = SymbolTable::new(32);
    assert!(table.put(Symbol::named("a", SymbolKind::Var, Val::Int(1))));
    assert!(table.put(Symbol::array(Some("v"), SymbolKind::Var, vec![Val::Char(0); 4])));
    assert!(table.put(Symbol::named("b", SymbolKind::Var, Val::Float(1.0))));
    assert_eq!(table.get_addr("a"), Some(0));
    assert_eq!(table.get_addr("v"), Some(1));
    assert_eq!(table.get_addr("b"), Some(5));
    assert_eq!(table.get_at(3).map(|s| s.val()), Some(Val::Char(0)));
}
