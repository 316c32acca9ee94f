/*!
## Rust Machine Module

This Rust module resolves, links, and executes three-address code.

Data addresses are split into three regions. The symbol table starts
at zero, the call stack at `STACK_BASE`, and the heap at `DYN_BASE`.
Code addresses are a separate space starting at `CODE_START`.

*/

pub type Address = u32;

pub const STACK_BASE: Address = 0x5555_5555;
pub const DYN_BASE: Address = 0xAAAA_AAAA;
pub const TABLE_SIZE: u32 = 0x5555_5555;
pub const HEAP_SIZE: u32 = 0x5555_5555;
pub const CODE_START: Address = 0;

// Temporaries with these indices read machine registers.
pub const STACK_REG: u32 = 0x400;
pub const FRAME_REG: u32 = 0x401;
pub const PC_REG: u32 = 0x402;
pub const RA_REG: u32 = 0x403;

pub const MAX_STACK: usize = 0x10000;

mod context;
mod field;
mod instruction;
mod link;
mod listing;
mod memory;
mod opcode;
mod operation;
mod program;
mod runtime;
mod stack;
mod symbol;
mod table;
mod val;

#[cfg(test)]
mod tests;

pub use context::CallStack;
pub use field::Field;
pub use field::Operand;
pub use instruction::Instruction;
pub use link::link;
pub use listing::Listing;
pub use memory::MemoryManager;
pub use memory::Stall;
pub use opcode::Family;
pub use opcode::Mode;
pub use opcode::Opcode;
pub use operation::Operation;
pub use program::Program;
pub use runtime::Event;
pub use runtime::Region;
pub use runtime::Runtime;
pub use stack::Stack;
pub use symbol::Elements;
pub use symbol::Symbol;
pub use symbol::SymbolKind;
pub use symbol::Value;
pub use table::SymbolTable;
pub use val::format_float;
pub use val::Type;
pub use val::TypeKind;
pub use val::Val;
