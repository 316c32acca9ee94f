/// ## Primitive type tags

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Char = 0,
    Int = 1,
    Float = 2,
    Addr = 3,
}

impl TypeKind {
    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn from_bits(bits: u8) -> Option<TypeKind> {
        match bits {
            0 => Some(TypeKind::Char),
            1 => Some(TypeKind::Int),
            2 => Some(TypeKind::Float),
            3 => Some(TypeKind::Addr),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<TypeKind> {
        match name {
            "char" => Some(TypeKind::Char),
            "int" => Some(TypeKind::Int),
            "float" => Some(TypeKind::Float),
            "addr" => Some(TypeKind::Addr),
            _ => None,
        }
    }

    pub fn zero(self) -> Val {
        match self {
            TypeKind::Char => Val::Char(0),
            TypeKind::Int => Val::Int(0),
            TypeKind::Float => Val::Float(0.0),
            TypeKind::Addr => Val::Addr(0),
        }
    }

    pub fn one(self) -> Val {
        Val::Int(1).convert(self)
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TypeKind::Char => write!(f, "char"),
            TypeKind::Int => write!(f, "int"),
            TypeKind::Float => write!(f, "float"),
            TypeKind::Addr => write!(f, "addr"),
        }
    }
}

/// ## Type of a symbol
///
/// An `array_size` of zero means a scalar.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Type {
    pub kind: TypeKind,
    pub array_size: usize,
}

impl Type {
    pub fn scalar(kind: TypeKind) -> Type {
        Type {
            kind,
            array_size: 0,
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.array_size > 0 {
            write!(f, "{}[{}]", self.kind, self.array_size)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

/// ## Scalar machine value
///
/// Conversions follow C on the fixed widths: narrowing wraps,
/// float to integer truncates toward zero.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Val {
    Char(u8),
    Int(i32),
    Float(f32),
    Addr(u32),
}

impl Val {
    pub fn kind(&self) -> TypeKind {
        match self {
            Val::Char(_) => TypeKind::Char,
            Val::Int(_) => TypeKind::Int,
            Val::Float(_) => TypeKind::Float,
            Val::Addr(_) => TypeKind::Addr,
        }
    }

    pub fn to_char(self) -> u8 {
        match self {
            Val::Char(c) => c,
            Val::Int(i) => i as u8,
            Val::Float(f) => f as i32 as u8,
            Val::Addr(a) => a as u8,
        }
    }

    pub fn to_int(self) -> i32 {
        match self {
            Val::Char(c) => c as i32,
            Val::Int(i) => i,
            Val::Float(f) => f as i32,
            Val::Addr(a) => a as i32,
        }
    }

    pub fn to_float(self) -> f32 {
        match self {
            Val::Char(c) => c as f32,
            Val::Int(i) => i as f32,
            Val::Float(f) => f,
            Val::Addr(a) => a as f32,
        }
    }

    pub fn to_addr(self) -> u32 {
        match self {
            Val::Char(c) => c as u32,
            Val::Int(i) => i as u32,
            Val::Float(f) => f as i64 as u32,
            Val::Addr(a) => a,
        }
    }

    pub fn convert(self, kind: TypeKind) -> Val {
        match kind {
            TypeKind::Char => Val::Char(self.to_char()),
            TypeKind::Int => Val::Int(self.to_int()),
            TypeKind::Float => Val::Float(self.to_float()),
            TypeKind::Addr => Val::Addr(self.to_addr()),
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Val::Char(c) => c == 0,
            Val::Int(i) => i == 0,
            Val::Float(f) => f == 0.0,
            Val::Addr(a) => a == 0,
        }
    }

    pub fn from_bool(kind: TypeKind, b: bool) -> Val {
        if b {
            kind.one()
        } else {
            kind.zero()
        }
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::Char(c) => write!(f, "{}", *c as char),
            Val::Int(i) => write!(f, "{}", i),
            Val::Float(n) => write!(f, "{}", format_float(*n)),
            Val::Addr(a) => write!(f, "0x{:06x}", a),
        }
    }
}

/// Formats like a C `%g` with six significant digits.
pub fn format_float(n: f32) -> String {
    if n.is_nan() {
        return if n.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if n.is_infinite() {
        return if n < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    let sci = format!("{:.5e}", n);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    if exp < -4 || exp >= 6 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let fixed = format!("{:.*}", (5 - exp) as usize, n);
        trim_fraction(&fixed).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
