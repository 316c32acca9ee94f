use super::{Address, Stack, Symbol, SymbolKind, Val};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Activation record

#[derive(Debug)]
struct Frame {
    frame_start: usize,
    return_address: Address,
    temps: Vec<Symbol>,
}

impl Frame {
    fn new(frame_start: usize, return_address: Address) -> Frame {
        Frame {
            frame_start,
            return_address,
            temps: vec![],
        }
    }
}

/// ## Call stack
///
/// One slot vector shared by every activation, plus a stack of frames.
/// The root frame lives for the whole run and is never popped.
/// Returning truncates the slots back to the frame start.

#[derive(Debug)]
pub struct CallStack {
    values: Stack<Symbol>,
    root: Frame,
    frames: Vec<Frame>,
}

impl Default for CallStack {
    fn default() -> CallStack {
        CallStack {
            values: Stack::new("call stack"),
            root: Frame::new(0, 0),
            frames: vec![],
        }
    }
}

impl CallStack {
    pub fn new() -> CallStack {
        CallStack::default()
    }

    fn current(&self) -> &Frame {
        self.frames.last().unwrap_or(&self.root)
    }

    fn current_mut(&mut self) -> &mut Frame {
        match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.root,
        }
    }

    /// Number of live activations, root included.
    pub fn depth(&self) -> usize {
        self.frames.len() + 1
    }

    pub fn has_caller(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn frame_start(&self) -> usize {
        self.current().frame_start
    }

    pub fn return_address(&self) -> Address {
        self.current().return_address
    }

    /// Opens a frame over the top `param_count` slots.
    pub fn call(&mut self, return_address: Address, param_count: i32) -> Result<()> {
        if param_count < 0 || param_count as usize > self.values.len() {
            return Err(error!(BadParamCount; &param_count.to_string()));
        }
        let frame_start = self.values.len() - param_count as usize;
        self.frames.push(Frame::new(frame_start, return_address));
        Ok(())
    }

    /// Drops the current frame with its slots and temporaries.
    pub fn ret(&mut self) -> Result<Address> {
        match self.frames.pop() {
            Some(frame) => {
                self.values.truncate(frame.frame_start);
                Ok(frame.return_address)
            }
            None => Err(error!(ReturnToNowhere)),
        }
    }

    pub fn push(&mut self, symbol: Symbol) -> Result<()> {
        self.values.push(symbol)
    }

    pub fn pop(&mut self) -> Result<Symbol> {
        self.values.pop()
    }

    pub fn slot(&self, index: usize) -> Option<&Symbol> {
        self.values.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Symbol> {
        self.values.get_mut(index)
    }

    /// Absolute slot of parameter `n` of the current frame.
    pub fn param_index(&self, n: u32) -> Result<usize> {
        let index = self.frame_start() + n as usize;
        if index < self.values.len() {
            Ok(index)
        } else {
            Err(error!(ParamOutOfBounds; &format!("#{}", n)))
        }
    }

    /// Temporaries spring into existence as integer zero.
    pub fn temp(&mut self, n: u32) -> &mut Symbol {
        let temps = &mut self.current_mut().temps;
        while temps.len() <= n as usize {
            temps.push(Symbol::new(SymbolKind::Temp, Val::Int(0)));
        }
        &mut temps[n as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    fn value(n: i32) -> Symbol {
        Symbol::new(SymbolKind::Const, Val::Int(n))
    }

    #[test]
    fn test_call_and_return() {
        let mut stack = CallStack::new();
        assert!(stack.push(value(1)).is_ok());
        assert!(stack.push(value(3)).is_ok());
        assert!(stack.push(value(4)).is_ok());
        assert!(stack.call(9, 2).is_ok());
        assert_eq!(stack.frame_start(), 1);
        assert_eq!(stack.param_index(1).ok(), Some(2));
        assert!(stack.param_index(2).is_err());
        assert!(stack.push(value(5)).is_ok());
        assert_eq!(stack.ret().ok(), Some(9));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_bad_calls() {
        let mut stack = CallStack::new();
        let code = stack.call(0, 1).err().map(|e| e.code());
        assert_eq!(code, Some(ErrorCode::BadParamCount));
        let code = stack.call(0, -1).err().map(|e| e.code());
        assert_eq!(code, Some(ErrorCode::BadParamCount));
        let code = stack.ret().err().map(|e| e.code());
        assert_eq!(code, Some(ErrorCode::ReturnToNowhere));
        let code = stack.pop().err().map(|e| e.code());
        assert_eq!(code, Some(ErrorCode::StackUnderflow));
    }

    #[test]
    fn test_temps_are_private() {
        let mut stack = CallStack::new();
        stack.temp(2).store(Val::Float(1.5));
        assert!(stack.call(4, 0).is_ok());
        assert_eq!(stack.temp(2).val(), Val::Int(0));
        stack.temp(2).store(Val::Char(b'x'));
        assert!(stack.ret().is_ok());
        assert_eq!(stack.temp(2).val(), Val::Float(1.5));
    }
}
