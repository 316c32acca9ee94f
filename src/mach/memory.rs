use super::{Address, Symbol, SymbolKind, Val};

/// ## Free address range

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stall {
    pub base: Address,
    pub size: u32,
}

impl Stall {
    pub fn upper_bound(&self) -> Address {
        self.base + self.size
    }
}

#[derive(Debug)]
struct Block {
    base: Address,
    size: u32,
    symbol: Symbol,
}

impl Block {
    fn upper_bound(&self) -> Address {
        self.base + self.size
    }
}

/// ## Address-ordered block allocator
///
/// Allocated blocks and stalls always partition `[0, max_size)`.
/// New blocks are carved from the front of the largest stall.

#[derive(Debug)]
pub struct MemoryManager {
    max_size: u32,
    used: u32,
    blocks: Vec<Block>,
    stalls: Vec<Stall>,
}

impl MemoryManager {
    pub fn new(max_size: u32) -> MemoryManager {
        let mut mm = MemoryManager {
            max_size,
            used: 0,
            blocks: vec![],
            stalls: vec![],
        };
        mm.clear();
        mm
    }

    /// Allocates `size` anonymous character slots.
    pub fn alloc(&mut self, size: u32) -> Option<Address> {
        self.insert(size, || {
            if size > 1 {
                Symbol::filled(None, SymbolKind::Temp, Val::Char(0), size as usize)
            } else {
                Symbol::new(SymbolKind::Temp, Val::Char(0))
            }
        })
    }

    pub fn put(&mut self, symbol: Symbol) -> Option<Address> {
        let size = symbol.size() as u32;
        self.insert(size, || symbol)
    }

    fn insert<F>(&mut self, size: u32, make: F) -> Option<Address>
    where
        F: FnOnce() -> Symbol,
    {
        if size == 0 || size > self.available() {
            return None;
        }
        let mut largest: Option<usize> = None;
        for (index, stall) in self.stalls.iter().enumerate() {
            if largest.map_or(true, |l| stall.size > self.stalls[l].size) {
                largest = Some(index);
            }
        }
        let index = largest?;
        let base = self.stalls[index].base;
        if size > self.stalls[index].size {
            return None;
        }

        self.blocks.push(Block {
            base,
            size,
            symbol: make(),
        });
        let mut i = self.blocks.len() - 1;
        while i > 0 && self.blocks[i].base < self.blocks[i - 1].base {
            self.blocks.swap(i, i - 1);
            i -= 1;
        }

        let stall = &mut self.stalls[index];
        if size < stall.size {
            stall.base += size;
            stall.size -= size;
        } else {
            self.stalls.remove(index);
        }
        self.used += size;
        Some(base)
    }

    fn find(&self, addr: Address) -> Option<usize> {
        let index = self.blocks.partition_point(|b| b.base <= addr);
        if index == 0 {
            return None;
        }
        if addr < self.blocks[index - 1].upper_bound() {
            Some(index - 1)
        } else {
            None
        }
    }

    /// Symbol covering `addr`, resolved into array elements.
    pub fn get(&self, addr: Address) -> Option<&Symbol> {
        let block = &self.blocks[self.find(addr)?];
        block.symbol.element((addr - block.base) as usize)
    }

    pub fn get_mut(&mut self, addr: Address) -> Option<&mut Symbol> {
        let index = self.find(addr)?;
        let block = &mut self.blocks[index];
        block.symbol.element_mut((addr - block.base) as usize)
    }

    /// Symbol of the block starting exactly at `addr`.
    pub fn get_block(&self, addr: Address) -> Option<&Symbol> {
        self.blocks
            .binary_search_by_key(&addr, |b| b.base)
            .ok()
            .map(|i| &self.blocks[i].symbol)
    }

    pub fn free(&mut self, addr: Address) -> bool {
        let index = match self.blocks.binary_search_by_key(&addr, |b| b.base) {
            Ok(index) => index,
            Err(_) => return false,
        };
        let block = self.blocks.remove(index);
        self.used -= block.size;
        let upper = block.upper_bound();

        let i = self.stalls.partition_point(|s| s.upper_bound() < addr);
        if i < self.stalls.len() && self.stalls[i].upper_bound() == addr {
            self.stalls[i].size += block.size;
            if i + 1 < self.stalls.len() && self.stalls[i + 1].base == upper {
                let next = self.stalls.remove(i + 1);
                self.stalls[i].size += next.size;
            }
        } else if i < self.stalls.len() && self.stalls[i].base == upper {
            self.stalls[i].base = addr;
            self.stalls[i].size += block.size;
        } else {
            self.stalls.insert(
                i,
                Stall {
                    base: addr,
                    size: block.size,
                },
            );
        }
        true
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.stalls.clear();
        self.used = 0;
        if self.max_size > 0 {
            self.stalls.push(Stall {
                base: 0,
                size: self.max_size,
            });
        }
    }

    pub fn available(&self) -> u32 {
        self.max_size - self.used
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    /// End of the highest allocated block.
    pub fn upper_bound(&self) -> Address {
        self.blocks.last().map_or(0, |b| b.upper_bound())
    }

    pub fn blocks(&self) -> impl Iterator<Item = (Address, u32, &Symbol)> {
        self.blocks.iter().map(|b| (b.base, b.size, &b.symbol))
    }

    pub fn stalls(&self) -> &[Stall] {
        &self.stalls
    }
}
