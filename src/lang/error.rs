use super::{Column, LineNumber};
use std::rc::Rc;

/// ## Source position of a diagnostic

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: Rc<str>,
    pub line: LineNumber,
    pub column: Column,
}

impl Location {
    pub fn new(file: &Rc<str>, line: LineNumber, column: Column) -> Location {
        Location {
            file: file.clone(),
            line,
            column,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.file)?;
        if self.line > 0 {
            write!(f, "({}", self.line)?;
            if self.column > 0 {
                write!(f, ",{}", self.column)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warning,
    Error,
}

#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    location: Option<Location>,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $loc:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_location($loc)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $loc:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_location($loc)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            location: None,
            message: String::new(),
        }
    }

    pub fn info(message: &str) -> Error {
        Error::new(ErrorCode::Info).message(message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn level(&self) -> Level {
        self.code.level()
    }

    pub fn is_error(&self) -> bool {
        self.level() == Level::Error
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn in_location(mut self, location: Option<&Location>) -> Error {
        debug_assert!(self.location.is_none());
        self.location = location.cloned();
        self
    }

    /// Attaches a location only when the error doesn't carry one yet.
    pub fn or_location(mut self, location: Option<&Location>) -> Error {
        if self.location.is_none() {
            self.location = location.cloned();
        }
        self
    }

    pub fn message(mut self, message: &str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        self.message = message.to_string();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Info,

    // *** Front end and resolution
    SyntaxError,
    OutOfMemory,
    FileNotFound,
    UnresolvedSymbol,
    InvalidTarget,
    InvalidAddressOf,

    // *** Fatal execution errors
    InvalidAddress,
    StackUnderflow,
    StackOverflow,
    InvalidJump,
    BadParamCount,
    ReturnToNowhere,
    ParamOutOfBounds,
    TempOutOfRange,
    DivisionByZero,
    Interrupted,
    InternalError,

    // *** Warnings
    Redeclared,
    OperandTypes,
    NonIntegerTarget,
    CastTarget,
    CastSource,
    NonPointer,
    NonIntegerIndex,
    NonIntegerSize,
    MoveTarget,
    TargetType,
    NonAddress,
    FreeNonAddress,
    InvalidInput,
    ReadOnlyRegister,
}

impl ErrorCode {
    pub fn level(self) -> Level {
        use ErrorCode::*;
        match self {
            Info => Level::Info,
            Redeclared | OperandTypes | NonIntegerTarget | CastTarget | CastSource | NonPointer
            | NonIntegerIndex | NonIntegerSize | MoveTarget | TargetType | NonAddress
            | FreeNonAddress | InvalidInput | ReadOnlyRegister => Level::Warning,
            _ => Level::Error,
        }
    }

    fn text(self) -> &'static str {
        use ErrorCode::*;
        match self {
            Info => "",
            SyntaxError => "syntax error",
            OutOfMemory => "out of memory",
            FileNotFound => "couldn't open input file",
            UnresolvedSymbol => "unresolved symbol",
            InvalidTarget => "invalid use of constant as operation target",
            InvalidAddressOf => "invalid use of constant as target of address operator",
            InvalidAddress => "invalid address access",
            StackUnderflow => "trying to pop empty stack",
            StackOverflow => "stack overflow",
            InvalidJump => "jump to an invalid code address",
            BadParamCount => "number of parameters incompatible with stack size",
            ReturnToNowhere => "returning to nowhere",
            ParamOutOfBounds => "parameter out of stack bounds",
            TempOutOfRange => "temporary's index is too large",
            DivisionByZero => "division by zero",
            Interrupted => "interrupted",
            InternalError => "internal error",
            Redeclared => "symbol redeclared",
            OperandTypes => "different types for target and operands",
            NonIntegerTarget => "target of integer operation is not an integer",
            CastTarget => "divergent type for target of cast",
            CastSource => "divergent type for source of cast",
            NonPointer => "dereferencing a non-pointer value",
            NonIntegerIndex => "non-integer array index",
            NonIntegerSize => "non-integer block size",
            MoveTarget => "divergent type for target of move",
            TargetType => "divergent type for target symbol",
            NonAddress => "non address value used as address",
            FreeNonAddress => "trying to free a non-address value",
            InvalidInput => "invalid input",
            ReadOnlyRegister => "write to read-only register",
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.level() {
            Level::Info => write!(f, "info:")?,
            Level::Warning => write!(f, "warning:")?,
            Level::Error => write!(f, "error:")?,
        }
        if let Some(location) = &self.location {
            if !location.file.is_empty() {
                write!(f, " {}:", location)?;
            }
        }
        let text = self.code.text();
        if text.is_empty() {
            write!(f, " {}", self.message)
        } else if self.message.is_empty() {
            write!(f, " {}", text)
        } else {
            write!(f, " {}: {}", text, self.message)
        }
    }
}
