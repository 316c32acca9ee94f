#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Unknown(String),
    Ident(String),
    Directive(String),
    Literal(Literal),
    /// `$` followed by its index or register name.
    Temp(String),
    /// `#` followed by its index.
    Param(String),
    Colon,
    Comma,
    Equals,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Integer(String),
    Float(String),
    Char(u8),
    String(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Unknown(s) => write!(f, "{}", s),
            Ident(s) => write!(f, "{}", s),
            Directive(s) => write!(f, "{}", s),
            Literal(s) => write!(f, "{}", s),
            Temp(s) => write!(f, "${}", s),
            Param(s) => write!(f, "#{}", s),
            Colon => write!(f, ":"),
            Comma => write!(f, ","),
            Equals => write!(f, "="),
            LBracket => write!(f, "["),
            RBracket => write!(f, "]"),
            LBrace => write!(f, "{{"),
            RBrace => write!(f, "}}"),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Literal::*;
        match self {
            Integer(s) => write!(f, "{}", s),
            Float(s) => write!(f, "{}", s),
            Char(c) => write!(f, "'{}'", std::ascii::escape_default(*c)),
            String(s) => write!(f, "{:?}", s),
        }
    }
}
