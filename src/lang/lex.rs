use super::{token::*, Column};

/// Splits one source line into tokens tagged with their 1-based column.
/// A `//` comment ends the line.
pub fn lex(s: &str) -> Vec<(Column, Token)> {
    TacLexer {
        chars: s.chars().peekable(),
        column: 0,
    }
    .collect()
}

fn is_tac_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r'
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

fn unescape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '0' => Some('\0'),
        '\\' => Some('\\'),
        '\'' => Some('\''),
        '"' => Some('"'),
        _ => None,
    }
}

struct TacLexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    column: Column,
}

impl<'a> TacLexer<'a> {
    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.column += 1;
        Some(ch)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn take_while<F: Fn(char) -> bool>(&mut self, s: &mut String, test: F) {
        while let Some(pk) = self.peek() {
            if !test(pk) {
                break;
            }
            s.push(pk);
            self.advance();
        }
    }

    fn number(&mut self) -> Token {
        let mut s = String::new();
        if self.peek() == Some('-') {
            s.push('-');
            self.advance();
        }
        if self.peek() == Some('0') {
            s.push('0');
            self.advance();
            if let Some(x) = self.peek().filter(|c| *c == 'x' || *c == 'X') {
                s.push(x);
                self.advance();
                self.take_while(&mut s, |c| c.is_ascii_hexdigit());
                return Token::Literal(Literal::Integer(s));
            }
        }
        let mut float = false;
        self.take_while(&mut s, |c| c.is_ascii_digit());
        if self.peek() == Some('.') {
            float = true;
            s.push('.');
            self.advance();
            self.take_while(&mut s, |c| c.is_ascii_digit());
        }
        let digits = s.chars().any(|c| c.is_ascii_digit());
        if let Some(e) = self.peek().filter(|c| digits && (*c == 'e' || *c == 'E')) {
            float = true;
            s.push(e);
            self.advance();
            if let Some(sign) = self.peek().filter(|c| *c == '+' || *c == '-') {
                s.push(sign);
                self.advance();
            }
            self.take_while(&mut s, |c| c.is_ascii_digit());
        }
        if s == "-" || s == "." || s == "-." {
            return Token::Unknown(s);
        }
        if float {
            Token::Literal(Literal::Float(s))
        } else {
            Token::Literal(Literal::Integer(s))
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, String> {
        let mut raw = String::new();
        let mut s = String::new();
        raw.push(quote);
        self.advance();
        loop {
            let ch = match self.advance() {
                Some(ch) => ch,
                None => return Err(raw),
            };
            raw.push(ch);
            if ch == quote {
                return Ok(s);
            }
            if ch == '\\' {
                let escaped = match self.advance() {
                    Some(e) => e,
                    None => return Err(raw),
                };
                raw.push(escaped);
                match unescape(escaped) {
                    Some(c) => s.push(c),
                    None => return Err(raw),
                }
            } else {
                s.push(ch);
            }
        }
    }

    fn character(&mut self) -> Token {
        match self.quoted('\'') {
            Ok(s) => {
                let bytes = s.as_bytes();
                if bytes.len() == 1 {
                    Token::Literal(Literal::Char(bytes[0]))
                } else {
                    Token::Unknown(format!("'{}'", s))
                }
            }
            Err(raw) => Token::Unknown(raw),
        }
    }

    fn string(&mut self) -> Token {
        match self.quoted('"') {
            Ok(s) => Token::Literal(Literal::String(s)),
            Err(raw) => Token::Unknown(raw),
        }
    }

    fn sigil<F>(&mut self, make: F) -> Token
    where
        F: Fn(String) -> Token,
    {
        let mut s = String::new();
        if let Some(ch) = self.advance() {
            self.take_while(&mut s, |c| c.is_ascii_alphanumeric());
            if s.is_empty() {
                return Token::Unknown(ch.to_string());
            }
        }
        make(s)
    }

    fn word(&mut self) -> Token {
        let mut s = String::new();
        self.take_while(&mut s, is_ident_char);
        Token::Ident(s)
    }

    fn directive(&mut self) -> Token {
        let mut s = String::from(".");
        self.advance();
        self.take_while(&mut s, is_ident_char);
        Token::Directive(s)
    }

    fn punctuation(&mut self, ch: char) -> Token {
        self.advance();
        match ch {
            ':' => Token::Colon,
            ',' => Token::Comma,
            '=' => Token::Equals,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            _ => Token::Unknown(ch.to_string()),
        }
    }
}

impl<'a> Iterator for TacLexer<'a> {
    type Item = (Column, Token);

    fn next(&mut self) -> Option<Self::Item> {
        while self.peek().map_or(false, is_tac_whitespace) {
            self.advance();
        }
        let pk = self.peek()?;
        let column = self.column + 1;
        let token = match pk {
            '/' => {
                self.advance();
                if self.peek() == Some('/') {
                    while self.advance().is_some() {}
                    return None;
                }
                Token::Unknown("/".to_string())
            }
            '-' => self.number(),
            '.' => {
                let mut ahead = self.chars.clone();
                ahead.next();
                if ahead.next().map_or(false, |c| c.is_ascii_digit()) {
                    self.number()
                } else {
                    self.directive()
                }
            }
            '$' => self.sigil(Token::Temp),
            '#' => self.sigil(Token::Param),
            '\'' => self.character(),
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if is_ident_start(c) => self.word(),
            c => self.punctuation(c),
        };
        Some((column, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<Token> {
        lex(s).into_iter().map(|(_, t)| t).collect()
    }

    #[test]
    fn test_instruction() {
        assert_eq!(
            lex("main: add $0, x, -2 // sum"),
            vec![
                (1, Token::Ident("main".into())),
                (5, Token::Colon),
                (7, Token::Ident("add".into())),
                (11, Token::Temp("0".into())),
                (13, Token::Comma),
                (15, Token::Ident("x".into())),
                (16, Token::Comma),
                (18, Token::Literal(Literal::Integer("-2".into()))),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("0x1F 3.5 1e3 .25 -0.5 7"),
            vec![
                Token::Literal(Literal::Integer("0x1F".into())),
                Token::Literal(Literal::Float("3.5".into())),
                Token::Literal(Literal::Float("1e3".into())),
                Token::Literal(Literal::Float(".25".into())),
                Token::Literal(Literal::Float("-0.5".into())),
                Token::Literal(Literal::Integer("7".into())),
            ]
        );
    }

    #[test]
    fn test_quotes() {
        assert_eq!(
            tokens(r#"'a' '\n' "hi\t!" 'ab'"#),
            vec![
                Token::Literal(Literal::Char(b'a')),
                Token::Literal(Literal::Char(b'\n')),
                Token::Literal(Literal::String("hi\t!".into())),
                Token::Unknown("'ab'".into()),
            ]
        );
        assert_eq!(tokens("\"open"), vec![Token::Unknown("\"open".into())]);
    }

    #[test]
    fn test_declaration() {
        assert_eq!(
            tokens("int v[3] = {1, 2}"),
            vec![
                Token::Ident("int".into()),
                Token::Ident("v".into()),
                Token::LBracket,
                Token::Literal(Literal::Integer("3".into())),
                Token::RBracket,
                Token::Equals,
                Token::LBrace,
                Token::Literal(Literal::Integer("1".into())),
                Token::Comma,
                Token::Literal(Literal::Integer("2".into())),
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_registers_and_params() {
        assert_eq!(
            tokens("$ra #2 $ @"),
            vec![
                Token::Temp("ra".into()),
                Token::Param("2".into()),
                Token::Unknown("$".into()),
                Token::Unknown("@".into()),
            ]
        );
    }
}
