use super::{Type, TypeKind, Val};
use crate::lang::Location;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Label,
    Var,
    Const,
    Temp,
    Param,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use SymbolKind::*;
        match self {
            Label => write!(f, "label"),
            Var => write!(f, "var"),
            Const => write!(f, "const"),
            Temp => write!(f, "temp"),
            Param => write!(f, "param"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Val),
    Array(Elements),
}

/// ## Array storage
///
/// Only elements that were initialized or written are kept. Every
/// other position reads as `fill`.

#[derive(Debug, Clone, PartialEq)]
pub struct Elements {
    len: usize,
    fill: Box<Symbol>,
    cells: BTreeMap<usize, Symbol>,
}

impl Elements {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, offset: usize) -> Option<&Symbol> {
        if offset >= self.len {
            return None;
        }
        Some(self.cells.get(&offset).unwrap_or(&self.fill))
    }

    pub fn get_mut(&mut self, offset: usize) -> Option<&mut Symbol> {
        if offset >= self.len {
            return None;
        }
        let fill = &self.fill;
        Some(self.cells.entry(offset).or_insert_with(|| (**fill).clone()))
    }
}

/// ## Unit of storage
///
/// The type is derived from the value so the two never disagree.
/// Array elements are scalar symbols addressed by position.

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    id: Option<Rc<str>>,
    kind: SymbolKind,
    value: Value,
    location: Option<Location>,
}

impl Symbol {
    pub fn new(kind: SymbolKind, val: Val) -> Symbol {
        Symbol {
            id: None,
            kind,
            value: Value::Scalar(val),
            location: None,
        }
    }

    pub fn named(id: &str, kind: SymbolKind, val: Val) -> Symbol {
        Symbol {
            id: Some(id.into()),
            ..Symbol::new(kind, val)
        }
    }

    pub fn array(id: Option<&str>, kind: SymbolKind, elements: Vec<Val>) -> Symbol {
        let fill = match elements.first() {
            Some(v) => v.kind().zero(),
            None => TypeKind::Char.zero(),
        };
        Symbol::filled(id, kind, fill, elements.len()).with_elements(elements)
    }

    /// An array of `size` elements that all read as `fill`.
    pub fn filled(id: Option<&str>, kind: SymbolKind, fill: Val, size: usize) -> Symbol {
        Symbol {
            id: id.map(Rc::from),
            kind,
            value: Value::Array(Elements {
                len: size,
                fill: Box::new(Symbol::new(kind, fill)),
                cells: BTreeMap::new(),
            }),
            location: None,
        }
    }

    /// Sets the leading elements of an array. Values past its end are dropped.
    pub fn with_elements(mut self, vals: Vec<Val>) -> Symbol {
        let kind = self.kind;
        if let Value::Array(elements) = &mut self.value {
            for (offset, val) in vals.into_iter().take(elements.len).enumerate() {
                elements.cells.insert(offset, Symbol::new(kind, val));
            }
        }
        self
    }

    pub fn with_location(mut self, location: Option<&Location>) -> Symbol {
        self.location = location.cloned();
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn id_rc(&self) -> Option<&Rc<str>> {
        self.id.as_ref()
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn ty(&self) -> Type {
        match &self.value {
            Value::Scalar(v) => Type::scalar(v.kind()),
            Value::Array(elements) => Type {
                kind: elements
                    .get(0)
                    .map(|s| s.val().kind())
                    .unwrap_or(TypeKind::Char),
                array_size: elements.len(),
            },
        }
    }

    /// Number of address slots the symbol occupies.
    pub fn size(&self) -> usize {
        match &self.value {
            Value::Scalar(_) => 1,
            Value::Array(elements) => elements.len(),
        }
    }

    pub fn element(&self, offset: usize) -> Option<&Symbol> {
        match &self.value {
            Value::Scalar(_) if offset == 0 => Some(self),
            Value::Scalar(_) => None,
            Value::Array(elements) => elements.get(offset),
        }
    }

    pub fn element_mut(&mut self, offset: usize) -> Option<&mut Symbol> {
        if let Value::Scalar(_) = self.value {
            return if offset == 0 { Some(self) } else { None };
        }
        match &mut self.value {
            Value::Array(elements) => elements.get_mut(offset),
            Value::Scalar(_) => None,
        }
    }

    /// Scalar value; an array reads as its first element.
    pub fn val(&self) -> Val {
        match &self.value {
            Value::Scalar(v) => *v,
            Value::Array(elements) => match elements.get(0) {
                Some(s) => s.val(),
                None => TypeKind::Char.zero(),
            },
        }
    }

    /// Temporaries take the type of whatever is stored in them. Any other
    /// symbol keeps its type and the value is converted, returning false
    /// so the caller can report the divergence.
    pub fn store(&mut self, val: Val) -> bool {
        let kind = self.kind;
        match &mut self.value {
            Value::Scalar(v) => {
                if kind == SymbolKind::Temp || v.kind() == val.kind() {
                    *v = val;
                    true
                } else {
                    *v = val.convert(v.kind());
                    false
                }
            }
            Value::Array(elements) => match elements.get_mut(0) {
                Some(s) => s.store(val),
                None => false,
            },
        }
    }
}

const LISTED_ELEMENTS: usize = 16;

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(id) = &self.id {
            write!(f, " {}", id)?;
        }
        write!(f, ": {} ", self.ty())?;
        match &self.value {
            Value::Scalar(v) => write!(f, "{}", v.escape()),
            Value::Array(elements) => {
                write!(f, "[")?;
                for i in 0..elements.len().min(LISTED_ELEMENTS) {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if let Some(s) = elements.get(i) {
                        write!(f, "{}", s.val().escape())?;
                    }
                }
                if elements.len() > LISTED_ELEMENTS {
                    write!(f, ", ...")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl Val {
    /// Listing form: characters are quoted and escaped.
    pub fn escape(self) -> String {
        match self {
            Val::Char(c) => format!("'{}'", std::ascii::escape_default(c)),
            v => v.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_retypes_temp() {
        let mut t = Symbol::new(SymbolKind::Temp, Val::Int(0));
        assert!(t.store(Val::Float(1.5)));
        assert_eq!(t.val(), Val::Float(1.5));
        assert_eq!(t.ty(), Type::scalar(TypeKind::Float));
    }

    #[test]
    fn test_store_converts_var() {
        let mut v = Symbol::named("x", SymbolKind::Var, Val::Int(0));
        assert!(!v.store(Val::Float(7.9)));
        assert_eq!(v.val(), Val::Int(7));
        assert!(v.store(Val::Int(3)));
        assert_eq!(v.val(), Val::Int(3));
    }

    #[test]
    fn test_array_elements() {
        let mut a = Symbol::array(
            Some("a"),
            SymbolKind::Var,
            vec![Val::Int(1), Val::Int(2), Val::Int(3)],
        );
        assert_eq!(a.size(), 3);
        assert_eq!(a.ty().array_size, 3);
        assert_eq!(a.element(2).map(|s| s.val()), Some(Val::Int(3)));
        assert!(a.element(3).is_none());
        if let Some(s) = a.element_mut(1) {
            s.store(Val::Int(20));
        }
        assert_eq!(a.to_string(), "var a: int[3] [1, 20, 3]");
    }

    #[test]
    fn test_filled_array_is_sparse() {
        let mut a = Symbol::filled(None, SymbolKind::Temp, Val::Char(0), 200_000_000);
        assert_eq!(a.size(), 200_000_000);
        assert_eq!(a.element(199_999_999).map(|s| s.val()), Some(Val::Char(0)));
        assert!(a.element(200_000_000).is_none());
        if let Some(s) = a.element_mut(123_456_789) {
            s.store(Val::Int(5));
        }
        assert_eq!(a.element(123_456_789).map(|s| s.val()), Some(Val::Int(5)));
        assert_eq!(a.element(123_456_790).map(|s| s.val()), Some(Val::Char(0)));
        match a.value() {
            Value::Array(elements) => assert_eq!(elements.cells.len(), 1),
            Value::Scalar(_) => panic!("not an array"),
        }
    }

    #[test]
    fn test_partial_initializer() {
        let a = Symbol::filled(Some("a"), SymbolKind::Var, Val::Int(0), 20)
            .with_elements(vec![Val::Int(1), Val::Int(2)]);
        assert_eq!(a.element(1).map(|s| s.val()), Some(Val::Int(2)));
        assert_eq!(a.element(19).map(|s| s.val()), Some(Val::Int(0)));
        assert_eq!(
            a.to_string(),
            "var a: int[20] [1, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, ...]"
        );
    }

    #[test]
    fn test_display_scalar() {
        let c = Symbol::named("nl", SymbolKind::Var, Val::Char(b'\n'));
        assert_eq!(c.to_string(), "var nl: char '\\n'");
        let k = Symbol::new(SymbolKind::Const, Val::Addr(16));
        assert_eq!(k.to_string(), "const: addr 0x000010");
    }
}
