use super::{src_file::SrcFile, Error, ErrorInfo, IntoErrorInfo};
use core::fmt::Display;
use unicode_segmentation::UnicodeSegmentation;

/// hydro's ascii character type
#[allow(non_camel_case_types)]
pub(crate) type ascii = u8;

/// hydro's utf8 character type
#[allow(non_camel_case_types)]
pub(crate) type utf8 = char;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Op {
    Equals,
    EqualsEquals,

    Plus,
    Minus,
    Times,
    Divide,

    And,
    Or,
}

impl Display for Op {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        return match self {
            Self::Equals => write!(f, "="),
            Self::EqualsEquals => write!(f, "=="),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Times => write!(f, "*"),
            Self::Divide => write!(f, "/"),
            Self::And => write!(f, "&&"),
            Self::Or => write!(f, "||"),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    // Symbols
    OpenRoundBracket,
    CloseRoundBracket,
    OpenCurlyBracket,
    CloseCurlyBracket,
    SemiColon,
    Comma,
    Op(Op),

    // Literal values
    False,
    True,
    /// integer literals are never empty and always contain valid ascii digits
    Integer(&'src str),
    /// the payload is the string contents after escape decoding
    Str(Box<[ascii]>),

    Identifier(&'src str),

    // Keywords
    Exit,
    Let,
    If,
    Else,
    While,
    For,
    Function,
    Return,
    Print,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        return match self {
            Self::OpenRoundBracket => write!(f, "("),
            Self::CloseRoundBracket => write!(f, ")"),
            Self::OpenCurlyBracket => write!(f, "{{"),
            Self::CloseCurlyBracket => write!(f, "}}"),
            Self::SemiColon => write!(f, ";"),
            Self::Comma => write!(f, ","),
            Self::Op(op) => write!(f, "{op}"),

            Self::False => write!(f, "false"),
            Self::True => write!(f, "true"),
            Self::Integer(literal) => write!(f, "{literal}"),
            Self::Str(string) => {
                write!(f, "\"")?;
                for ch in &**string {
                    write!(f, "{}", ch.escape_ascii())?;
                }
                write!(f, "\"")
            }

            Self::Identifier(name) => write!(f, "{name}"),

            Self::Exit => write!(f, "exit"),
            Self::Let => write!(f, "let"),
            Self::If => write!(f, "if"),
            Self::Else => write!(f, "else"),
            Self::While => write!(f, "while"),
            Self::For => write!(f, "for"),
            Self::Function => write!(f, "function"),
            Self::Return => write!(f, "return"),
            Self::Print => write!(f, "print"),
        };
    }
}

#[derive(Debug)]
pub struct Tokenizer<'src> {
    code: &'src str,
    col: usize,
    token_start_col: usize,
}

impl<'src> Tokenizer<'src> {
    pub fn tokenize(src: &'src SrcFile<'_>) -> Result<Vec<Token<'src>>, Error<ErrorKind<'src>>> {
        let mut this = Self { code: src.code(), col: 0, token_start_col: 0 };
        let mut tokens = Vec::<Token<'src>>::new();

        'tokenization: loop {
            this.token_start_col = this.col;

            let next = match this.peek_next_ascii_char()? {
                Some(ch) => {
                    this.col += 1;
                    ch
                }
                None => break 'tokenization,
            };

            let token = match next {
                // ignore whitespace
                b' ' | b'\t' | b'\r' | b'\n' | b'\x0C' => continue 'tokenization,

                b'/' => match this.peek_next_utf8_char() {
                    Some('/') => {
                        this.col += 1;
                        this.line_comment();
                        continue 'tokenization;
                    }
                    Some('*') => {
                        this.col += 1;
                        this.block_comment()?;
                        continue 'tokenization;
                    }
                    _ => Token::Op(Op::Divide),
                },
                b'=' => match this.peek_next_utf8_char() {
                    Some('=') => {
                        this.col += 1;
                        Token::Op(Op::EqualsEquals)
                    }
                    _ => Token::Op(Op::Equals),
                },
                b'&' => match this.peek_next_utf8_char() {
                    Some('&') => {
                        this.col += 1;
                        Token::Op(Op::And)
                    }
                    _ => return Err(Error { kind: ErrorKind::UnrecognizedCharacter('&') }),
                },
                b'|' => match this.peek_next_utf8_char() {
                    Some('|') => {
                        this.col += 1;
                        Token::Op(Op::Or)
                    }
                    _ => return Err(Error { kind: ErrorKind::UnrecognizedCharacter('|') }),
                },
                b'"' => {
                    let literal = this.string_literal()?;
                    Token::Str(literal.into_boxed_slice())
                }
                b'a'..=b'z' | b'A'..=b'Z' => this.identifier()?,
                b'0'..=b'9' => {
                    let literal = this.integer_decimal()?;
                    Token::Integer(literal)
                }
                b'(' => Token::OpenRoundBracket,
                b')' => Token::CloseRoundBracket,
                b'{' => Token::OpenCurlyBracket,
                b'}' => Token::CloseCurlyBracket,
                b';' => Token::SemiColon,
                b',' => Token::Comma,
                b'+' => Token::Op(Op::Plus),
                b'-' => Token::Op(Op::Minus),
                b'*' => Token::Op(Op::Times),
                unrecognized => {
                    return Err(Error {
                        kind: ErrorKind::UnrecognizedCharacter(unrecognized as utf8),
                    })
                }
            };

            tokens.push(token);
        }

        return Ok(tokens);
    }
}

// iteration of characters
impl<'src> Tokenizer<'src> {
    fn peek_next_ascii_char(&self) -> Result<Option<ascii>, Error<ErrorKind<'src>>> {
        if self.col >= self.code.len() {
            return Ok(None);
        }

        let next = self.code.as_bytes()[self.col];
        return match next {
            ascii_ch @ 0..=b'\x7F' => Ok(Some(ascii_ch)),
            _utf8_ch => {
                let rest_of_code = &self.code[self.col..];
                let Some(grapheme) = rest_of_code.graphemes(true).next() else {
                    unreachable!("this branch assured we would have a valid grapheme");
                };

                Err(Error { kind: ErrorKind::Utf8Character { grapheme } })
            }
        };
    }

    fn peek_next_utf8_char(&self) -> Option<utf8> {
        let rest_of_code = &self.code[self.col..];
        return rest_of_code.chars().next();
    }

    // Note: only used when skipping comments, where utf8 characters are allowed
    fn next_utf8_char_multiline(&mut self) -> Option<utf8> {
        let next = self.peek_next_utf8_char()?;
        self.col += next.len_utf8();
        return Some(next);
    }
}

impl<'src> Tokenizer<'src> {
    fn line_comment(&mut self) {
        while let Some(ch) = self.next_utf8_char_multiline() {
            if ch == '\n' {
                break;
            }
        }
    }

    // Note: block comments do not nest
    fn block_comment(&mut self) -> Result<(), Error<ErrorKind<'src>>> {
        loop {
            match self.next_utf8_char_multiline() {
                Some('*') => {
                    if let Some('/') = self.peek_next_utf8_char() {
                        self.col += 1;
                        return Ok(());
                    }
                }
                Some(_) => {}
                None => return Err(Error { kind: ErrorKind::UnclosedBlockComment }),
            }
        }
    }

    fn string_literal(&mut self) -> Result<Vec<ascii>, Error<ErrorKind<'src>>> {
        let mut literal = Vec::<ascii>::new();

        loop {
            let next_character = match self.peek_next_ascii_char()? {
                Some(b'\n') | None => {
                    return Err(Error { kind: ErrorKind::UnclosedStringLiteral })
                }
                Some(next_character) => {
                    self.col += 1;
                    next_character
                }
            };

            let character = match next_character {
                b'"' => break,
                b'\\' => {
                    let escape_character = match self.peek_next_ascii_char()? {
                        Some(b'\n') | None => {
                            return Err(Error { kind: ErrorKind::UnclosedStringLiteral })
                        }
                        Some(escape_character) => {
                            self.col += 1;
                            escape_character
                        }
                    };

                    match escape_character {
                        b'n' => b'\n',
                        b't' => b'\t',
                        b'"' => b'"',
                        b'\\' => b'\\',
                        unrecognized => {
                            return Err(Error {
                                kind: ErrorKind::UnrecognizedEscapeCharacter(
                                    unrecognized as utf8,
                                ),
                            })
                        }
                    }
                }
                control @ (b'\x00'..=b'\x1F' | b'\x7F') => {
                    return Err(Error {
                        kind: ErrorKind::ControlCharacterInStringLiteral(control as utf8),
                    })
                }
                ch => ch,
            };

            literal.push(character);
        }

        return Ok(literal);
    }

    fn identifier(&mut self) -> Result<Token<'src>, Error<ErrorKind<'src>>> {
        loop {
            match self.peek_next_ascii_char()? {
                Some(b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z') => self.col += 1,
                Some(_) | None => break,
            }
        }

        let identifier = match &self.code[self.token_start_col..self.col] {
            "exit" => Token::Exit,
            "let" => Token::Let,
            "if" => Token::If,
            "else" => Token::Else,
            "while" => Token::While,
            "for" => Token::For,
            "function" => Token::Function,
            "return" => Token::Return,
            "true" => Token::True,
            "false" => Token::False,
            "print" => Token::Print,
            identifier => Token::Identifier(identifier),
        };

        return Ok(identifier);
    }

    fn integer_decimal(&mut self) -> Result<&'src str, Error<ErrorKind<'src>>> {
        loop {
            match self.peek_next_ascii_char()? {
                Some(b'0'..=b'9') => self.col += 1,
                Some(_) | None => break,
            }
        }

        return Ok(&self.code[self.token_start_col..self.col]);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind<'src> {
    UnclosedBlockComment,

    UnclosedStringLiteral,
    UnrecognizedEscapeCharacter(utf8),
    ControlCharacterInStringLiteral(utf8),

    Utf8Character { grapheme: &'src str },
    UnrecognizedCharacter(utf8),
}

impl IntoErrorInfo for ErrorKind<'_> {
    fn info(&self) -> ErrorInfo {
        let (message, cause) = match self {
            Self::UnclosedBlockComment => (
                "unclosed block comment".into(),
                "missing closing `*/`".into(),
            ),
            Self::UnclosedStringLiteral => (
                "unclosed string literal".into(),
                "missing closing \" quote".into(),
            ),
            Self::UnrecognizedEscapeCharacter(unrecognized) => (
                "invalid string literal".into(),
                format!("unrecognized '\\{unrecognized}' escape character").into(),
            ),
            Self::ControlCharacterInStringLiteral(control) => (
                format!("invalid string literal character {}", control.escape_unicode()).into(),
                "control characters are not allowed, use escape sequences instead".into(),
            ),
            Self::Utf8Character { grapheme } => (
                format!("invalid character '{grapheme}' {}", grapheme.escape_unicode()).into(),
                "utf8 characters are not allowed".into(),
            ),
            Self::UnrecognizedCharacter(unrecognized) => (
                format!("invalid character '{unrecognized}' {}", unrecognized.escape_unicode())
                    .into(),
                "unrecognized".into(),
            ),
        };

        return ErrorInfo { message, cause };
    }
}
