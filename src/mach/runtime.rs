use super::{
    link, Address, CallStack, Family, Instruction, Listing, MemoryManager, Mode, Opcode,
    Operand, Operation, Program, Symbol, SymbolKind, SymbolTable, TypeKind, Val, DYN_BASE,
    FRAME_REG, HEAP_SIZE, PC_REG, RA_REG, STACK_BASE, STACK_REG,
};
use crate::error;
use crate::lang::{parse, Error, Location};
use log::{debug, info, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::VecDeque;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Owner of a data address

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// `[0, STACK_BASE)`: the symbol table.
    Static,
    /// `[STACK_BASE, DYN_BASE)`: slots of the call stack.
    Stack,
    /// `[DYN_BASE, ..)`: blocks from `mema`.
    Heap,
}

impl Region {
    pub fn of(addr: Address) -> Region {
        if addr < STACK_BASE {
            Region::Static
        } else if addr < DYN_BASE {
            Region::Stack
        } else {
            Region::Heap
        }
    }
}

/// ## Events
///
/// `Runtime::execute` reports progress through events. Prints and
/// warnings arrive in program order.

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Stopped,
    Running,
    /// Raw output bytes; characters are written unchanged.
    Print(Vec<u8>),
    /// The program is blocked on a scan; call `enter` or `close_input`.
    Input,
    Warning(Error),
    Errors(Rc<Vec<Error>>),
}

enum Step {
    Next,
    Jump(Address),
    Wait,
}

/// ## Virtual machine

pub struct Runtime {
    code: Rc<Vec<Instruction>>,
    code_start: Address,
    table: SymbolTable,
    heap: MemoryManager,
    stack: CallStack,
    pc: Address,
    running: bool,
    interrupted: bool,
    location: Option<Location>,
    print: Vec<u8>,
    pending: VecDeque<Event>,
    input: VecDeque<u8>,
    input_closed: bool,
    rng: StdRng,
}

impl Default for Runtime {
    fn default() -> Runtime {
        Runtime {
            code: Rc::new(vec![]),
            code_start: 0,
            table: SymbolTable::new(0),
            heap: MemoryManager::new(HEAP_SIZE),
            stack: CallStack::new(),
            pc: 0,
            running: false,
            interrupted: false,
            location: None,
            print: Vec::new(),
            pending: VecDeque::new(),
            input: VecDeque::new(),
            input_closed: false,
            rng: StdRng::from_entropy(),
        }
    }
}

impl Runtime {
    /// A runtime ready to execute an already linked program.
    pub fn new(program: Program) -> Runtime {
        let mut runtime = Runtime::default();
        runtime.start(program);
        runtime
    }

    /// Parses and links a source file. Diagnostics are queued as events.
    /// Returns true when the program is ready to run.
    pub fn load(&mut self, file: &str, source: &str) -> bool {
        self.running = false;
        info!("parsing {}", file);
        let (unit, diagnostics) = parse(file, source);
        let (errors, warnings): (Vec<Error>, Vec<Error>) =
            diagnostics.into_iter().partition(|e| e.is_error());
        for warning in warnings {
            self.pending.push_back(Event::Warning(warning));
        }
        if !errors.is_empty() {
            self.pending.push_back(Event::Errors(Rc::new(errors)));
            return false;
        }
        info!("compiling {}", file);
        match link(unit) {
            Ok(program) => {
                self.start(program);
                true
            }
            Err(errors) => {
                self.pending.push_back(Event::Errors(Rc::new(errors)));
                false
            }
        }
    }

    fn start(&mut self, program: Program) {
        self.pc = program.entry_point();
        let (code, code_start, table) = program.into_parts();
        self.code = code;
        self.code_start = code_start;
        self.table = table;
        self.heap.clear();
        self.stack = CallStack::new();
        self.location = None;
        self.running = true;
        debug!("\n{}", self.listing());
        info!("running");
    }

    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn interrupt(&mut self) {
        self.interrupted = true;
    }

    /// Feeds one line of standard input.
    pub fn enter(&mut self, line: &str) {
        self.input.extend(line.bytes());
        self.input.push_back(b'\n');
    }

    /// End of standard input; further scans read zero.
    pub fn close_input(&mut self) {
        self.input_closed = true;
    }

    pub fn listing(&self) -> String {
        Listing::new(&self.table, &self.code, self.code_start).to_string()
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn call_stack(&self) -> &CallStack {
        &self.stack
    }

    fn contains(&self, addr: Address) -> bool {
        addr >= self.code_start && ((addr - self.code_start) as usize) < self.code.len()
    }

    /// Runs at most `cycles` instructions.
    pub fn execute(&mut self, cycles: usize) -> Event {
        if let Some(event) = self.pending.pop_front() {
            return event;
        }
        if self.interrupted {
            self.interrupted = false;
            if self.running {
                return self.fatal(error!(Interrupted));
            }
        }
        if !self.running {
            return Event::Stopped;
        }
        let code = Rc::clone(&self.code);
        for _ in 0..cycles {
            if !self.contains(self.pc) {
                self.running = false;
                break;
            }
            let instruction = &code[(self.pc - self.code_start) as usize];
            if self.location.as_ref() != instruction.location() {
                self.location = instruction.location().cloned();
            }
            trace!("{:06x}: {}", self.pc, instruction);
            match self.step(instruction) {
                Ok(Step::Next) => self.pc += 1,
                Ok(Step::Jump(addr)) => self.pc = addr,
                Ok(Step::Wait) => {
                    self.flush();
                    self.pending.push_back(Event::Input);
                    break;
                }
                Err(error) => return self.fatal(error),
            }
        }
        self.flush();
        match self.pending.pop_front() {
            Some(event) => event,
            None if self.running => Event::Running,
            None => Event::Stopped,
        }
    }

    fn fatal(&mut self, error: Error) -> Event {
        self.running = false;
        self.flush();
        let error = error.or_location(self.location.as_ref());
        self.pending.push_back(Event::Errors(Rc::new(vec![error])));
        self.pending.pop_front().unwrap_or(Event::Stopped)
    }

    fn flush(&mut self) {
        if !self.print.is_empty() {
            let s = std::mem::take(&mut self.print);
            self.pending.push_back(Event::Print(s));
        }
    }

    fn warn(&mut self, error: Error) {
        self.flush();
        let warning = error.or_location(self.location.as_ref());
        self.pending.push_back(Event::Warning(warning));
    }

    fn step(&mut self, i: &Instruction) -> Result<Step> {
        match i.opcode().family() {
            Family::Arithmetic => self.general_logic_arithmetic(i),
            Family::Integer => self.integer_logic_arithmetic(i),
            Family::Cast => self.casting(i),
            Family::Move => self.movement(i),
            Family::Control => self.branch_and_function(i),
        }
    }

    fn general_logic_arithmetic(&mut self, i: &Instruction) -> Result<Step> {
        let target = operand(i, 0)?;
        let lhs = self.read(operand(i, 1)?)?;
        let rhs = match i.operand(2) {
            Some(op) => Some(self.read(op)?),
            None => None,
        };
        let kind = if target.kind() == SymbolKind::Temp {
            lhs.kind()
        } else {
            self.read(target)?.kind()
        };
        if lhs.kind() != kind || rhs.map_or(false, |r| r.kind() != kind) {
            self.warn(error!(OperandTypes));
        }
        let rhs = rhs.unwrap_or_else(|| kind.zero());
        let val = match i.opcode() {
            Opcode::Add => Operation::sum(kind, lhs, rhs)?,
            Opcode::Sub => Operation::subtract(kind, lhs, rhs)?,
            Opcode::Mul => Operation::multiply(kind, lhs, rhs)?,
            Opcode::Div => Operation::divide(kind, lhs, rhs)?,
            Opcode::And => Operation::and(kind, lhs, rhs)?,
            Opcode::Or => Operation::or(kind, lhs, rhs)?,
            Opcode::Minus => Operation::negate(kind, lhs)?,
            Opcode::Not => Operation::not(kind, lhs)?,
            Opcode::Seq => Operation::equal(kind, lhs, rhs)?,
            Opcode::Slt => Operation::less(kind, lhs, rhs)?,
            Opcode::Sleq => Operation::less_equal(kind, lhs, rhs)?,
            op => return Err(error!(InternalError; &op.to_string())),
        };
        self.store(target, val)?;
        Ok(Step::Next)
    }

    fn integer_logic_arithmetic(&mut self, i: &Instruction) -> Result<Step> {
        let target = operand(i, 0)?;
        if target.kind() != SymbolKind::Temp && self.read(target)?.kind() != TypeKind::Int {
            self.warn(error!(NonIntegerTarget));
        }
        let lhs = self.read(operand(i, 1)?)?;
        let rhs = match i.operand(2) {
            Some(op) => Some(self.read(op)?),
            None => None,
        };
        if lhs.kind() != TypeKind::Int || rhs.map_or(false, |r| r.kind() != TypeKind::Int) {
            self.warn(error!(OperandTypes));
        }
        let rhs = rhs.unwrap_or(Val::Int(0));
        let val = match i.opcode() {
            Opcode::Band => Operation::bit_and(lhs, rhs)?,
            Opcode::Bor => Operation::bit_or(lhs, rhs)?,
            Opcode::Bxor => Operation::bit_xor(lhs, rhs)?,
            Opcode::Shl => Operation::shift_left(lhs, rhs)?,
            Opcode::Shr => Operation::shift_right(lhs, rhs)?,
            Opcode::Bnot => Operation::bit_not(lhs)?,
            Opcode::Mod => Operation::modulus(lhs, rhs)?,
            op => return Err(error!(InternalError; &op.to_string())),
        };
        self.store(target, val)?;
        Ok(Step::Next)
    }

    fn casting(&mut self, i: &Instruction) -> Result<Step> {
        let (from, to) = match i.opcode() {
            Opcode::Cast { from, to } => (from, to),
            op => return Err(error!(InternalError; &op.to_string())),
        };
        let target = operand(i, 0)?;
        if target.kind() != SymbolKind::Temp && self.read(target)?.kind() != to {
            self.warn(error!(CastTarget));
        }
        let source = self.read(operand(i, 1)?)?;
        if source.kind() != from {
            self.warn(error!(CastSource));
        }
        self.store(target, Operation::cast(from, to, source))?;
        Ok(Step::Next)
    }

    fn movement(&mut self, i: &Instruction) -> Result<Step> {
        let (target_mode, source_mode) = match i.opcode() {
            Opcode::Move { target, source } => (target, source),
            op => return Err(error!(InternalError; &op.to_string())),
        };
        let target = operand(i, 0)?;
        let source = operand(i, 1)?;

        let val = match source_mode {
            Mode::Value => self.read(source)?,
            Mode::Deref | Mode::Index => {
                let addr = self.pointer(i, source, source_mode)?;
                self.symbol_at(addr)?.val()
            }
            Mode::Address => Val::Addr(self.address_of(source)?),
        };

        let stored = match target_mode {
            Mode::Value => self.store(target, val)?,
            Mode::Deref | Mode::Index => {
                let addr = self.pointer(i, target, target_mode)?;
                self.symbol_at_mut(addr)?.store(val)
            }
            Mode::Address => return Err(error!(InternalError; &i.opcode().to_string())),
        };
        if !stored {
            self.warn(error!(MoveTarget));
        }
        Ok(Step::Next)
    }

    fn branch_and_function(&mut self, i: &Instruction) -> Result<Step> {
        match i.opcode() {
            Opcode::Brz | Opcode::Brnz | Opcode::Jump | Opcode::Call => {
                let dest = self.read(operand(i, 0)?)?;
                if dest.kind() != TypeKind::Addr {
                    self.warn(error!(NonAddress));
                }
                let jump = match i.opcode() {
                    Opcode::Brz => self.read(operand(i, 1)?)?.is_zero(),
                    Opcode::Brnz => !self.read(operand(i, 1)?)?.is_zero(),
                    _ => true,
                };
                if !jump {
                    return Ok(Step::Next);
                }
                let addr = dest.to_addr();
                if !self.contains(addr) {
                    return Err(error!(InvalidJump; &format!("0x{:08x}", addr)));
                }
                if i.opcode() == Opcode::Call {
                    let count = match i.operand(1) {
                        Some(op) => self.read(op)?.to_int(),
                        None => 0,
                    };
                    self.stack.call(self.pc + 1, count)?;
                }
                Ok(Step::Jump(addr))
            }
            Opcode::Return => {
                if !self.stack.has_caller() {
                    return Err(error!(ReturnToNowhere));
                }
                let val = match i.operand(0) {
                    Some(op) => Some(self.read(op)?),
                    None => None,
                };
                let ra = self.stack.ret()?;
                if let Some(val) = val {
                    self.stack.push(Symbol::new(SymbolKind::Const, val))?;
                }
                Ok(Step::Jump(ra))
            }
            Opcode::Param | Opcode::Push => {
                let val = self.read(operand(i, 0)?)?;
                self.stack.push(Symbol::new(SymbolKind::Const, val))?;
                Ok(Step::Next)
            }
            Opcode::Pop => {
                let symbol = self.stack.pop()?;
                self.store_checked(operand(i, 0)?, symbol.val())?;
                Ok(Step::Next)
            }
            Opcode::Print | Opcode::Println => {
                if let Some(op) = i.operand(0) {
                    match self.read(op)? {
                        Val::Char(c) => self.print.push(c),
                        val => self.print.extend_from_slice(val.to_string().as_bytes()),
                    }
                }
                if i.opcode() == Opcode::Println {
                    self.print.push(b'\n');
                }
                Ok(Step::Next)
            }
            Opcode::Scanc | Opcode::Scani | Opcode::Scanf => {
                let val = match self.scan(i.opcode()) {
                    Some(val) => val,
                    None => return Ok(Step::Wait),
                };
                self.store_checked(operand(i, 0)?, val)?;
                Ok(Step::Next)
            }
            Opcode::Mema => {
                let size = self.read(operand(i, 1)?)?;
                if size.kind() != TypeKind::Int {
                    self.warn(error!(NonIntegerSize));
                }
                let addr = match size.to_int() {
                    n if n > 0 => self.heap.alloc(n as u32).map_or(0, |a| a + DYN_BASE),
                    _ => 0,
                };
                self.store_checked(operand(i, 0)?, Val::Addr(addr))?;
                Ok(Step::Next)
            }
            Opcode::Memf => {
                let val = self.read(operand(i, 0)?)?;
                if val.kind() != TypeKind::Addr {
                    self.warn(error!(FreeNonAddress));
                }
                self.heap.free(val.to_addr().wrapping_sub(DYN_BASE));
                Ok(Step::Next)
            }
            Opcode::Rand => {
                let val = Val::Int(self.rng.gen_range(0..i32::MAX));
                self.store_checked(operand(i, 0)?, val)?;
                Ok(Step::Next)
            }
            op => Err(error!(InternalError; &op.to_string())),
        }
    }

    fn read(&mut self, op: &Operand) -> Result<Val> {
        match op {
            Operand::Const(val) => Ok(*val),
            Operand::Label(addr) => Ok(Val::Addr(*addr)),
            Operand::Var { addr, .. } => Ok(self.symbol_at(*addr)?.val()),
            Operand::Temp(n) => self.read_temp(*n),
            Operand::Param(n) => {
                let index = self.stack.param_index(*n)?;
                match self.stack.slot(index) {
                    Some(symbol) => Ok(symbol.val()),
                    None => Err(error!(ParamOutOfBounds)),
                }
            }
        }
    }

    fn read_temp(&mut self, n: u32) -> Result<Val> {
        let reg = match n {
            STACK_REG => STACK_BASE + self.stack.len().saturating_sub(1) as Address,
            FRAME_REG => STACK_BASE + self.stack.frame_start() as Address,
            PC_REG => self.pc,
            RA_REG => self.stack.return_address(),
            n if n > RA_REG => return Err(error!(TempOutOfRange; &format!("${}", n))),
            n => return Ok(self.stack.temp(n).val()),
        };
        Ok(Val::Addr(reg))
    }

    /// Stores into a target operand. False when the target kept its own type.
    fn store(&mut self, op: &Operand, val: Val) -> Result<bool> {
        let symbol = match op {
            Operand::Var { addr, .. } => return Ok(self.symbol_at_mut(*addr)?.store(val)),
            Operand::Temp(n) if *n > RA_REG => {
                return Err(error!(TempOutOfRange; &format!("${}", n)))
            }
            Operand::Temp(n) if *n >= STACK_REG => {
                self.warn(error!(ReadOnlyRegister; &op.to_string()));
                return Ok(true);
            }
            Operand::Temp(n) => Some(self.stack.temp(*n)),
            Operand::Param(n) => {
                let index = self.stack.param_index(*n)?;
                self.stack.slot_mut(index)
            }
            Operand::Const(_) | Operand::Label(_) => None,
        };
        match symbol {
            Some(symbol) => Ok(symbol.store(val)),
            None => Err(error!(InvalidTarget; &op.to_string())),
        }
    }

    fn store_checked(&mut self, op: &Operand, val: Val) -> Result<()> {
        if !self.store(op, val)? {
            self.warn(error!(TargetType));
        }
        Ok(())
    }

    /// Address held by `op`, plus the index operand for `Mode::Index`.
    fn pointer(&mut self, i: &Instruction, op: &Operand, mode: Mode) -> Result<Address> {
        let base = self.read(op)?;
        if base.kind() != TypeKind::Addr {
            self.warn(error!(NonPointer));
        }
        let mut addr = base.to_addr();
        if mode == Mode::Index {
            let offset = self.read(operand(i, 2)?)?;
            if offset.kind() != TypeKind::Int {
                self.warn(error!(NonIntegerIndex));
            }
            addr = addr.wrapping_add(offset.to_int() as u32);
        }
        Ok(addr)
    }

    fn address_of(&mut self, op: &Operand) -> Result<Address> {
        match op {
            Operand::Var { addr, .. } => Ok(*addr),
            Operand::Param(n) => Ok(STACK_BASE + self.stack.param_index(*n)? as Address),
            _ => Err(error!(InvalidAddressOf; &op.to_string())),
        }
    }

    fn symbol_at(&self, addr: Address) -> Result<&Symbol> {
        let symbol = match Region::of(addr) {
            Region::Static => self.table.get_at(addr),
            Region::Stack => self.stack.slot((addr - STACK_BASE) as usize),
            Region::Heap => self.heap.get(addr - DYN_BASE),
        };
        symbol.ok_or_else(|| error!(InvalidAddress; &format!("0x{:08x}", addr)))
    }

    fn symbol_at_mut(&mut self, addr: Address) -> Result<&mut Symbol> {
        let symbol = match Region::of(addr) {
            Region::Static => self.table.get_at_mut(addr),
            Region::Stack => self.stack.slot_mut((addr - STACK_BASE) as usize),
            Region::Heap => self.heap.get_mut(addr - DYN_BASE),
        };
        symbol.ok_or_else(|| error!(InvalidAddress; &format!("0x{:08x}", addr)))
    }

    /// Next value for a scan opcode, or None to wait for more input.
    fn scan(&mut self, opcode: Opcode) -> Option<Val> {
        while self.input.front().map_or(false, |c| c.is_ascii_whitespace()) {
            self.input.pop_front();
        }
        if opcode == Opcode::Scanc {
            return match self.input.pop_front() {
                Some(c) => Some(Val::Char(c)),
                None if self.input_closed => Some(Val::Char(0)),
                None => None,
            };
        }
        let kind = if opcode == Opcode::Scani {
            TypeKind::Int
        } else {
            TypeKind::Float
        };
        let end = match self.input.iter().position(|c| c.is_ascii_whitespace()) {
            Some(end) => end,
            None if self.input_closed => self.input.len(),
            None => return None,
        };
        if end == 0 {
            return Some(kind.zero());
        }
        let token: Vec<u8> = self.input.drain(..end).collect();
        let token = String::from_utf8_lossy(&token);
        let val = match kind {
            TypeKind::Int => token.parse::<i32>().ok().map(Val::Int),
            _ => token.parse::<f32>().ok().map(Val::Float),
        };
        match val {
            Some(val) => Some(val),
            None => {
                while let Some(c) = self.input.pop_front() {
                    if c == b'\n' {
                        break;
                    }
                }
                let message = format!("'{}'", token);
                self.warn(error!(InvalidInput; &message));
                Some(kind.zero())
            }
        }
    }
}

fn operand(i: &Instruction, index: usize) -> Result<&Operand> {
    match i.operand(index) {
        Some(op) => Ok(op),
        None => Err(error!(InternalError; &format!("missing operand {} of {}", index, i.opcode()))),
    }
}
