use super::{lex, token::*, Column, Error, LineNumber, Location};
use crate::error;
use crate::mach::{
    Address, Field, Instruction, Opcode, Symbol, SymbolKind, SymbolTable, TypeKind, Val,
    CODE_START, FRAME_REG, PC_REG, RA_REG, STACK_REG,
};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Parsed translation unit
///
/// Instructions are still unsolved; the table holds every declared
/// variable and label.

#[derive(Debug)]
pub struct Unit {
    pub table: SymbolTable,
    pub instructions: Vec<Instruction>,
    pub code_start: Address,
}

/// Parses a whole source file. The returned diagnostics may mix
/// warnings and errors; the unit must not be linked if any is an error.
pub fn parse(file: &str, source: &str) -> (Unit, Vec<Error>) {
    parse_with_table(file, source, SymbolTable::default())
}

pub fn parse_with_table(file: &str, source: &str, table: SymbolTable) -> (Unit, Vec<Error>) {
    let mut parser = TacParser {
        file: file.into(),
        section: Section::Code,
        table,
        instructions: vec![],
        diagnostics: vec![],
    };
    for (index, line) in source.lines().enumerate() {
        let line_number = index as LineNumber + 1;
        let tokens = lex(line);
        if let Err(error) = parser.parse_line(line_number, tokens) {
            parser.diagnostics.push(error);
        }
    }
    let unit = Unit {
        table: parser.table,
        instructions: parser.instructions,
        code_start: CODE_START,
    };
    (unit, parser.diagnostics)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Table,
    Code,
}

struct TacParser {
    file: Rc<str>,
    section: Section,
    table: SymbolTable,
    instructions: Vec<Instruction>,
    diagnostics: Vec<Error>,
}

struct LineTokens {
    file: Rc<str>,
    line: LineNumber,
    tokens: std::iter::Peekable<std::vec::IntoIter<(Column, Token)>>,
    column: Column,
}

impl LineTokens {
    fn location(&self) -> Location {
        Location::new(&self.file, self.line, self.column)
    }

    fn next(&mut self) -> Option<Token> {
        let (column, token) = self.tokens.next()?;
        self.column = column;
        Some(token)
    }

    fn peek(&mut self) -> Option<&Token> {
        self.tokens.peek().map(|(_, t)| t)
    }

    fn peek_location(&mut self) -> Location {
        let column = match self.tokens.peek() {
            Some((column, _)) => *column,
            None => self.column,
        };
        Location::new(&self.file, self.line, column)
    }

    fn unexpected(&mut self, expected: &str) -> Error {
        let location = self.peek_location();
        let message = match self.peek() {
            Some(token) => format!("expected {}, found '{}'", expected, token),
            None => format!("expected {}", expected),
        };
        error!(SyntaxError, Some(&location); &message)
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<()> {
        if self.peek() == Some(&token) {
            self.next();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_end(&mut self) -> Result<()> {
        if self.peek().is_none() {
            Ok(())
        } else {
            Err(self.unexpected("end of line"))
        }
    }

    fn ident(&mut self, expected: &str) -> Result<String> {
        if let Some(Token::Ident(_)) = self.peek() {
            if let Some(Token::Ident(s)) = self.next() {
                return Ok(s);
            }
        }
        Err(self.unexpected(expected))
    }
}

impl TacParser {
    fn parse_line(&mut self, line: LineNumber, tokens: Vec<(Column, Token)>) -> Result<()> {
        let mut tokens = LineTokens {
            file: self.file.clone(),
            line,
            tokens: tokens.into_iter().peekable(),
            column: 0,
        };
        match tokens.peek() {
            None => Ok(()),
            Some(Token::Directive(_)) => self.directive(&mut tokens),
            Some(_) => match self.section {
                Section::Table => self.declaration(&mut tokens),
                Section::Code => self.code_line(&mut tokens),
            },
        }
    }

    fn directive(&mut self, tokens: &mut LineTokens) -> Result<()> {
        if let Some(Token::Directive(d)) = tokens.next() {
            match d.as_str() {
                ".table" => self.section = Section::Table,
                ".code" => self.section = Section::Code,
                _ => {
                    let message = format!("unknown directive '{}'", d);
                    return Err(error!(SyntaxError, Some(&tokens.location()); &message));
                }
            }
        }
        tokens.expect_end()
    }

    fn declaration(&mut self, tokens: &mut LineTokens) -> Result<()> {
        let type_name = tokens.ident("a type")?;
        let kind = match TypeKind::from_name(&type_name) {
            Some(kind) => kind,
            None => {
                let message = format!("unknown type '{}'", type_name);
                return Err(error!(SyntaxError, Some(&tokens.location()); &message));
            }
        };
        let name = tokens.ident("a variable name")?;
        let location = tokens.location();

        let mut array: Option<Option<usize>> = None;
        if tokens.peek() == Some(&Token::LBracket) {
            tokens.next();
            let mut size = None;
            if let Some(Token::Literal(Literal::Integer(_))) = tokens.peek() {
                if let Some(Token::Literal(lit)) = tokens.next() {
                    let val = literal_value(&lit, &tokens.location())?;
                    size = Some(val.to_int().max(0) as usize);
                }
            }
            tokens.expect(Token::RBracket, "']'")?;
            array = Some(size);
        }

        let mut init: Vec<Val> = vec![];
        let mut string = false;
        if tokens.peek() == Some(&Token::Equals) {
            tokens.next();
            match tokens.next() {
                Some(Token::Literal(Literal::String(s))) => {
                    init = s.bytes().map(Val::Char).chain(Some(Val::Char(0))).collect();
                    string = true;
                }
                Some(Token::Literal(lit)) => init.push(literal_value(&lit, &tokens.location())?),
                Some(Token::LBrace) => loop {
                    match tokens.next() {
                        Some(Token::Literal(lit)) if !matches!(lit, Literal::String(_)) => {
                            init.push(literal_value(&lit, &tokens.location())?)
                        }
                        _ => {
                            return Err(error!(SyntaxError, Some(&tokens.location()); "expected a literal"))
                        }
                    }
                    match tokens.next() {
                        Some(Token::Comma) => continue,
                        Some(Token::RBrace) => break,
                        _ => {
                            return Err(error!(SyntaxError, Some(&tokens.location()); "expected ',' or '}'"))
                        }
                    }
                },
                _ => return Err(error!(SyntaxError, Some(&tokens.location()); "expected an initializer")),
            }
        }
        tokens.expect_end()?;

        let init: Vec<Val> = init.into_iter().map(|v| v.convert(kind)).collect();
        let symbol = match array {
            None => {
                if string || init.len() > 1 {
                    return Err(error!(SyntaxError, Some(&location); "scalar with array initializer"));
                }
                let val = init.first().copied().unwrap_or_else(|| kind.zero());
                Symbol::named(&name, SymbolKind::Var, val)
            }
            Some(size) => {
                let size = size.unwrap_or_else(|| init.len());
                if size == 0 {
                    return Err(error!(SyntaxError, Some(&location); "array size must be positive"));
                }
                if init.len() > size {
                    return Err(error!(SyntaxError, Some(&location); "too many initializers"));
                }
                Symbol::filled(Some(&name), SymbolKind::Var, kind.zero(), size).with_elements(init)
            }
        };

        if self.table.contains_var(&name) {
            let message = format!("'{}'", name);
            self.diagnostics
                .push(error!(Redeclared, Some(&location); &message));
        }
        if self.table.put(symbol.with_location(Some(&location))) {
            Ok(())
        } else {
            Err(error!(OutOfMemory, Some(&location); &format!("'{}'", name)))
        }
    }

    fn code_line(&mut self, tokens: &mut LineTokens) -> Result<()> {
        let word = tokens.ident("an instruction or label")?;
        let mut location = tokens.location();
        let mnemonic = if tokens.peek() == Some(&Token::Colon) {
            tokens.next();
            self.label(&word, &location);
            if tokens.peek().is_none() {
                return Ok(());
            }
            let mnemonic = tokens.ident("an instruction")?;
            location = tokens.location();
            mnemonic
        } else {
            word
        };

        let opcode = match Opcode::from_mnemonic(&mnemonic) {
            Some(opcode) => opcode,
            None => {
                let message = format!("unknown instruction '{}'", mnemonic);
                return Err(error!(SyntaxError, Some(&location); &message));
            }
        };

        let mut fields: Vec<Field> = vec![];
        if tokens.peek().is_some() {
            loop {
                fields.push(self.operand(tokens)?);
                match tokens.peek() {
                    Some(Token::Comma) => {
                        tokens.next();
                    }
                    None => break,
                    Some(_) => return Err(tokens.unexpected("','")),
                }
            }
        }

        let arity = opcode.arity();
        if !arity.contains(&fields.len()) {
            let expected = if arity.start() == arity.end() {
                format!("{}", arity.start())
            } else {
                format!("{} to {}", arity.start(), arity.end())
            };
            let message = format!("'{}' takes {} operands, found {}", opcode, expected, fields.len());
            return Err(error!(SyntaxError, Some(&location); &message));
        }

        self.instructions
            .push(Instruction::new(opcode, fields, Some(&location)));
        Ok(())
    }

    fn label(&mut self, name: &str, location: &Location) {
        let addr = CODE_START + self.instructions.len() as Address;
        if let Some(previous) = self.table.get(name) {
            if previous.kind() == SymbolKind::Label {
                let message = format!("'{}'", name);
                self.diagnostics
                    .push(error!(Redeclared, Some(location); &message));
            }
        }
        let symbol = Symbol::named(name, SymbolKind::Label, Val::Addr(addr));
        self.table.put(symbol.with_location(Some(location)));
    }

    fn operand(&mut self, tokens: &mut LineTokens) -> Result<Field> {
        let token = match tokens.next() {
            Some(token) => token,
            None => return Err(tokens.unexpected("an operand")),
        };
        let location = tokens.location();
        let symbol = match token {
            Token::Ident(name) => Symbol::named(&name, SymbolKind::Var, Val::Int(0)),
            Token::Temp(t) => {
                let index = match t.as_str() {
                    "s" => STACK_REG,
                    "f" => FRAME_REG,
                    "pc" => PC_REG,
                    "ra" => RA_REG,
                    _ => match t.parse::<u32>() {
                        Ok(n) if n < STACK_REG => n,
                        _ => {
                            let message = format!("invalid temporary '${}'", t);
                            return Err(error!(SyntaxError, Some(&location); &message));
                        }
                    },
                };
                Symbol::new(SymbolKind::Temp, Val::Addr(index))
            }
            Token::Param(p) => match p.parse::<u32>() {
                Ok(n) => Symbol::new(SymbolKind::Param, Val::Addr(n)),
                Err(_) => {
                    let message = format!("invalid parameter '#{}'", p);
                    return Err(error!(SyntaxError, Some(&location); &message));
                }
            },
            Token::Literal(Literal::String(_)) => {
                return Err(error!(SyntaxError, Some(&location); "string operand"));
            }
            Token::Literal(lit) => Symbol::new(SymbolKind::Const, literal_value(&lit, &location)?),
            token => {
                let message = format!("unexpected '{}'", token);
                return Err(error!(SyntaxError, Some(&location); &message));
            }
        };
        Ok(Field::Unsolved(symbol.with_location(Some(&location))))
    }
}

fn literal_value(lit: &Literal, location: &Location) -> Result<Val> {
    let val = match lit {
        Literal::Integer(s) => {
            let (negative, digits) = match s.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, s.as_str()),
            };
            let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok().map(|n| n as i64),
                None => digits.parse::<i64>().ok(),
            };
            let n = magnitude.map(|m| if negative { -m } else { m });
            match n {
                Some(n) if n >= i32::MIN as i64 && n <= u32::MAX as i64 => Some(Val::Int(n as i32)),
                _ => None,
            }
        }
        Literal::Float(s) => s.parse::<f32>().ok().map(Val::Float),
        Literal::Char(c) => Some(Val::Char(*c)),
        Literal::String(_) => None,
    };
    match val {
        Some(val) => Ok(val),
        None => {
            let message = format!("invalid literal {}", lit);
            Err(error!(SyntaxError, Some(location); &message))
        }
    }
}
