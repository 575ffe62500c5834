use super::{
    arena::{Arena, ExpressionIndex, NodeIndex, ScopeIndex, DEFAULT_CAPACITY},
    tokenizer::{ascii, Op, Token},
    Error, ErrorInfo, IntoErrorInfo,
};
use core::fmt::Display;

pub(crate) type StringLabel = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divide,
    EqualsEquals,
    And,
    Or,
}

impl BinaryOp {
    /// binding power of each binary operator, smaller is looser
    #[must_use]
    pub(crate) const fn precedence(self) -> u8 {
        return match self {
            Self::Or => 0,
            Self::And => 1,
            Self::EqualsEquals => 2,
            Self::Plus | Self::Minus => 3,
            Self::Times | Self::Divide => 4,
        };
    }

    #[must_use]
    pub(crate) const fn from_op(op: Op) -> Option<Self> {
        return match op {
            Op::Plus => Some(Self::Plus),
            Op::Minus => Some(Self::Minus),
            Op::Times => Some(Self::Times),
            Op::Divide => Some(Self::Divide),
            Op::EqualsEquals => Some(Self::EqualsEquals),
            Op::And => Some(Self::And),
            Op::Or => Some(Self::Or),
            Op::Equals => None,
        };
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        return match self {
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Times => write!(f, "*"),
            Self::Divide => write!(f, "/"),
            Self::EqualsEquals => write!(f, "=="),
            Self::And => write!(f, "&&"),
            Self::Or => write!(f, "||"),
        };
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Expression<'src> {
    False,
    True,
    Integer(i64),
    Str { label: StringLabel },
    Identifier(&'src str),

    Parenthesis { expression_index: ExpressionIndex },
    Binary { lhs_index: ExpressionIndex, op: BinaryOp, rhs_index: ExpressionIndex },
    Call { name: &'src str, arguments: Vec<ExpressionIndex> },
}

#[derive(Debug, Clone)]
pub(crate) struct IfBranch {
    pub(crate) condition: ExpressionIndex,
    pub(crate) scope: ScopeIndex,
}

#[derive(Debug, Clone)]
pub(crate) struct If {
    pub(crate) branches: Vec<IfBranch>,
    pub(crate) els: Option<ScopeIndex>,
}

#[derive(Debug, Clone)]
pub(crate) enum Node<'src> {
    Expression(ExpressionIndex),

    Print(ExpressionIndex),
    Exit(ExpressionIndex),

    Definition { name: &'src str, value: ExpressionIndex },
    Assignment { name: &'src str, new_value: ExpressionIndex },

    Scope(ScopeIndex),
    If(If),
    While { condition: ExpressionIndex, scope: ScopeIndex },
    For { init: NodeIndex, condition: ExpressionIndex, step: NodeIndex, scope: ScopeIndex },

    Function { name: &'src str, parameters: Vec<&'src str>, scope: ScopeIndex },
    Return(ExpressionIndex),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
    pub(crate) nodes: Vec<NodeIndex>,
}

#[derive(Debug)]
pub struct Ast<'src> {
    pub(crate) arena: Arena<'src>,

    /// ordered top level statements, the program root
    pub(crate) statements: Vec<NodeIndex>,

    /// decoded string literal contents, addressed by string label
    pub(crate) strings: Vec<Box<[ascii]>>,
}

#[derive(Debug)]
pub struct Parser<'tokens, 'src: 'tokens> {
    token: usize,
    tokens: &'tokens [Token<'src>],

    scope_depth: u32,
    ast: Ast<'src>,
}

impl<'tokens, 'src: 'tokens> Parser<'tokens, 'src> {
    pub fn parse(tokens: &'tokens [Token<'src>]) -> Result<Ast<'src>, Error<ErrorKind>> {
        let mut this = Self {
            token: 0,
            tokens,
            scope_depth: 0,
            ast: Ast {
                arena: Arena::with_capacity(DEFAULT_CAPACITY),
                statements: Vec::new(),
                strings: Vec::new(),
            },
        };

        while let Some(token) = this.peek_next_token() {
            if let Token::SemiColon = token {
                this.token += 1;
                continue;
            }

            let node = this.statement()?;
            let node_index = this.ast.arena.new_node(node);
            this.ast.statements.push(node_index);
        }

        return Ok(this.ast);
    }
}

// iteration of tokens
impl<'tokens, 'src: 'tokens> Parser<'tokens, 'src> {
    fn peek_next_token(&self) -> Option<&'tokens Token<'src>> {
        return self.tokens.get(self.token);
    }

    fn peek_second_token(&self) -> Option<&'tokens Token<'src>> {
        return self.tokens.get(self.token + 1);
    }

    fn next_token_bounded(
        &mut self,
        expected: Expected,
    ) -> Result<&'tokens Token<'src>, Error<ErrorKind>> {
        let Some(token) = self.tokens.get(self.token) else {
            return Err(Error { kind: ErrorKind::PrematureEndOfFile(expected) });
        };

        self.token += 1;
        return Ok(token);
    }

    fn semicolon(&mut self) -> Result<(), Error<ErrorKind>> {
        let token = self.next_token_bounded(Expected::Semicolon)?;
        let Token::SemiColon = token else {
            return Err(Error { kind: ErrorKind::MissingSemicolon });
        };

        return Ok(());
    }

    fn open_round_bracket(&mut self, after: &'static str) -> Result<(), Error<ErrorKind>> {
        let token = self.next_token_bounded(Expected::OpenRoundBracket)?;
        let Token::OpenRoundBracket = token else {
            return Err(Error { kind: ErrorKind::MissingOpenRoundBracket { after } });
        };

        return Ok(());
    }

    fn close_round_bracket(&mut self) -> Result<(), Error<ErrorKind>> {
        let token = self.next_token_bounded(Expected::ClosingRoundBracket)?;
        let Token::CloseRoundBracket = token else {
            return Err(Error { kind: ErrorKind::UnclosedRoundBracket });
        };

        return Ok(());
    }

    fn identifier(&mut self, after: &'static str) -> Result<&'src str, Error<ErrorKind>> {
        let token = self.next_token_bounded(Expected::Identifier)?;
        let Token::Identifier(name) = token else {
            return Err(Error { kind: ErrorKind::MissingIdentifier { after } });
        };

        return Ok(*name);
    }
}

// parsing of statements
impl<'tokens, 'src: 'tokens> Parser<'tokens, 'src> {
    fn statement(&mut self) -> Result<Node<'src>, Error<ErrorKind>> {
        let token = self.next_token_bounded(Expected::Statement)?;
        return match token {
            Token::Exit => {
                self.open_round_bracket("exit")?;
                let expression_index = self.expression(0)?;
                self.close_round_bracket()?;
                self.semicolon()?;
                Ok(Node::Exit(expression_index))
            }
            Token::Let => {
                let name = self.identifier("let")?;

                let equals_token = self.next_token_bounded(Expected::EqualsSign)?;
                let Token::Op(Op::Equals) = equals_token else {
                    return Err(Error { kind: ErrorKind::MissingEqualsSign });
                };

                let value = self.expression(0)?;
                self.semicolon()?;
                Ok(Node::Definition { name, value })
            }
            Token::Print => {
                let expression_index = self.expression(0)?;
                self.semicolon()?;
                Ok(Node::Print(expression_index))
            }
            Token::OpenCurlyBracket => {
                self.token -= 1;
                let scope_index = self.scope()?;
                Ok(Node::Scope(scope_index))
            }
            Token::If => self.if_statement(),
            Token::Else => Err(Error { kind: ErrorKind::StrayElseBlock }),
            Token::While => {
                let condition = self.expression(0)?;
                let scope = self.scope()?;
                Ok(Node::While { condition, scope })
            }
            Token::For => {
                self.open_round_bracket("for")?;
                let init = self.for_clause()?;
                let init = self.ast.arena.new_node(init);
                self.semicolon()?;
                let condition = self.expression(0)?;
                self.semicolon()?;
                let step = self.for_clause()?;
                let step = self.ast.arena.new_node(step);
                self.close_round_bracket()?;
                let scope = self.scope()?;
                Ok(Node::For { init, condition, step, scope })
            }
            Token::Function => {
                if self.scope_depth > 0 {
                    return Err(Error { kind: ErrorKind::NestedFunctionDefinition });
                }

                let name = self.identifier("function")?;
                let parameters = self.parameter_list()?;
                let scope = self.scope()?;
                Ok(Node::Function { name, parameters, scope })
            }
            Token::Return => {
                let expression_index = self.expression(0)?;
                self.semicolon()?;
                Ok(Node::Return(expression_index))
            }
            Token::Identifier(name) => {
                if let Some(Token::Op(Op::Equals)) = self.peek_next_token() {
                    self.token += 1;
                    let new_value = self.expression(0)?;
                    self.semicolon()?;
                    return Ok(Node::Assignment { name: *name, new_value });
                }

                self.token -= 1;
                let expression_index = self.expression(0)?;
                self.semicolon()?;
                Ok(Node::Expression(expression_index))
            }
            Token::False | Token::True | Token::Integer(_) | Token::Str(_)
            | Token::OpenRoundBracket => {
                self.token -= 1;
                let expression_index = self.expression(0)?;
                self.semicolon()?;
                Ok(Node::Expression(expression_index))
            }
            Token::CloseCurlyBracket => Err(Error { kind: ErrorKind::StrayClosingCurlyBracket }),
            Token::CloseRoundBracket => Err(Error { kind: ErrorKind::StrayClosingRoundBracket }),
            Token::Comma => Err(Error { kind: ErrorKind::StrayComma }),
            Token::SemiColon => unreachable!("skipped by the statements loops"),
            Token::Op(op) => Err(Error { kind: ErrorKind::StrayOperator(*op) }),
        };
    }

    /// the first and third clause of a `for`, either an assignment or a bare expression
    fn for_clause(&mut self) -> Result<Node<'src>, Error<ErrorKind>> {
        if let Some(Token::Identifier(name)) = self.peek_next_token() {
            if let Some(Token::Op(Op::Equals)) = self.peek_second_token() {
                self.token += 2;
                let new_value = self.expression(0)?;
                return Ok(Node::Assignment { name: *name, new_value });
            }
        }

        let expression_index = self.expression(0)?;
        return Ok(Node::Expression(expression_index));
    }

    fn if_statement(&mut self) -> Result<Node<'src>, Error<ErrorKind>> {
        self.open_round_bracket("if")?;
        let condition = self.expression(0)?;
        self.close_round_bracket()?;
        let scope = self.scope()?;

        let mut branches = vec![IfBranch { condition, scope }];
        let mut els: Option<ScopeIndex> = None;

        while let Some(Token::Else) = self.peek_next_token() {
            self.token += 1;

            // an `else` followed by an `if` extends the chain with another
            // branch, note that the branch condition carries no parenthesis
            if let Some(Token::If) = self.peek_next_token() {
                self.token += 1;
                let branch_condition = self.expression(0)?;
                let branch_scope = self.scope()?;
                branches.push(IfBranch { condition: branch_condition, scope: branch_scope });
                continue;
            }

            els = Some(self.scope()?);
            break;
        }

        return Ok(Node::If(If { branches, els }));
    }

    fn scope(&mut self) -> Result<ScopeIndex, Error<ErrorKind>> {
        let open_curly_token = self.next_token_bounded(Expected::OpenCurlyBracket)?;
        let Token::OpenCurlyBracket = open_curly_token else {
            return Err(Error { kind: ErrorKind::MissingOpenCurlyBracket });
        };

        self.scope_depth += 1;

        let mut nodes = Vec::<NodeIndex>::new();
        loop {
            match self.peek_next_token() {
                Some(Token::CloseCurlyBracket) => {
                    self.token += 1;
                    break;
                }
                Some(Token::SemiColon) => {
                    self.token += 1;
                    continue;
                }
                Some(_) => {
                    let node = self.statement()?;
                    let node_index = self.ast.arena.new_node(node);
                    nodes.push(node_index);
                }
                None => {
                    return Err(Error {
                        kind: ErrorKind::PrematureEndOfFile(Expected::ClosingCurlyBracket),
                    })
                }
            }
        }

        self.scope_depth -= 1;
        return Ok(self.ast.arena.new_scope(Scope { nodes }));
    }

    fn parameter_list(&mut self) -> Result<Vec<&'src str>, Error<ErrorKind>> {
        self.open_round_bracket("function name")?;

        let mut parameters = Vec::<&'src str>::new();
        loop {
            match self.next_token_bounded(Expected::ParameterOrClosingRoundBracket)? {
                Token::CloseRoundBracket => break,
                Token::Identifier(name) => {
                    parameters.push(*name);

                    match self.next_token_bounded(Expected::CommaOrClosingRoundBracket)? {
                        Token::Comma => {}
                        Token::CloseRoundBracket => break,
                        _ => {
                            return Err(Error {
                                kind: ErrorKind::MissingCommaBetweenParameters,
                            })
                        }
                    }
                }
                _ => return Err(Error { kind: ErrorKind::MissingIdentifier { after: "(" } }),
            }
        }

        return Ok(parameters);
    }
}

// parsing of expressions, using precedence climbing
impl<'tokens, 'src: 'tokens> Parser<'tokens, 'src> {
    fn expression(&mut self, min_precedence: u8) -> Result<ExpressionIndex, Error<ErrorKind>> {
        // a call is recognized by an identifier immediately followed by `(`
        let mut lhs = 'lhs: {
            if let Some(Token::Identifier(name)) = self.peek_next_token() {
                if let Some(Token::OpenRoundBracket) = self.peek_second_token() {
                    let name = *name;
                    self.token += 1;
                    break 'lhs self.call(name)?;
                }
            }

            self.term()?
        };

        loop {
            let Some(Token::Op(op)) = self.peek_next_token() else {
                break;
            };

            let Some(binary_op) = BinaryOp::from_op(*op) else {
                break;
            };

            let precedence = binary_op.precedence();
            if precedence < min_precedence {
                break;
            }

            self.token += 1;
            let rhs_index = self.expression(precedence + 1)?;
            lhs = Expression::Binary {
                lhs_index: self.ast.arena.new_expression(lhs),
                op: binary_op,
                rhs_index,
            };
        }

        return Ok(self.ast.arena.new_expression(lhs));
    }

    fn term(&mut self) -> Result<Expression<'src>, Error<ErrorKind>> {
        let token = self.next_token_bounded(Expected::Expression)?;
        return match token {
            Token::False => Ok(Expression::False),
            Token::True => Ok(Expression::True),
            Token::Integer(literal) => match literal.parse::<i64>() {
                Ok(integer) => Ok(Expression::Integer(integer)),
                Err(_) => Err(Error { kind: ErrorKind::IntegerLiteralOverflow }),
            },
            Token::Str(string) => {
                let label = self.ast.strings.len() as StringLabel;
                self.ast.strings.push(string.clone());
                Ok(Expression::Str { label })
            }
            Token::Identifier(name) => Ok(Expression::Identifier(*name)),
            Token::OpenRoundBracket => {
                if let Some(Token::CloseRoundBracket) = self.peek_next_token() {
                    return Err(Error { kind: ErrorKind::EmptyExpression });
                }

                let expression_index = self.expression(0)?;
                self.close_round_bracket()?;
                Ok(Expression::Parenthesis { expression_index })
            }
            _ => Err(Error { kind: ErrorKind::ExpectedOperand }),
        };
    }

    fn call(&mut self, name: &'src str) -> Result<Expression<'src>, Error<ErrorKind>> {
        self.open_round_bracket("function name")?;

        let mut arguments = Vec::<ExpressionIndex>::new();
        loop {
            if let Some(Token::CloseRoundBracket) = self.peek_next_token() {
                self.token += 1;
                break;
            }

            let argument = self.expression(0)?;
            arguments.push(argument);

            match self.next_token_bounded(Expected::CommaOrClosingRoundBracket)? {
                Token::Comma => {}
                Token::CloseRoundBracket => break,
                _ => return Err(Error { kind: ErrorKind::MissingCommaBetweenArguments }),
            }
        }

        return Ok(Expression::Call { name, arguments });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Statement,
    Expression,
    Semicolon,
    Identifier,
    EqualsSign,
    OpenRoundBracket,
    ClosingRoundBracket,
    OpenCurlyBracket,
    ClosingCurlyBracket,
    ParameterOrClosingRoundBracket,
    CommaOrClosingRoundBracket,
}

impl Display for Expected {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        return match self {
            Self::Statement => write!(f, "statement"),
            Self::Expression => write!(f, "expression"),
            Self::Semicolon => write!(f, "';'"),
            Self::Identifier => write!(f, "identifier"),
            Self::EqualsSign => write!(f, "'='"),
            Self::OpenRoundBracket => write!(f, "'('"),
            Self::ClosingRoundBracket => write!(f, "')'"),
            Self::OpenCurlyBracket => write!(f, "'{{'"),
            Self::ClosingCurlyBracket => write!(f, "'}}'"),
            Self::ParameterOrClosingRoundBracket => write!(f, "parameter name or ')'"),
            Self::CommaOrClosingRoundBracket => write!(f, "',' or ')'"),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    PrematureEndOfFile(Expected),

    MissingSemicolon,
    MissingEqualsSign,
    MissingIdentifier { after: &'static str },
    MissingOpenRoundBracket { after: &'static str },
    MissingOpenCurlyBracket,
    MissingCommaBetweenParameters,
    MissingCommaBetweenArguments,
    UnclosedRoundBracket,

    EmptyExpression,
    ExpectedOperand,
    IntegerLiteralOverflow,

    StrayElseBlock,
    StrayClosingRoundBracket,
    StrayClosingCurlyBracket,
    StrayComma,
    StrayOperator(Op),

    NestedFunctionDefinition,
}

impl IntoErrorInfo for ErrorKind {
    fn info(&self) -> ErrorInfo {
        let (message, cause) = match self {
            Self::PrematureEndOfFile(expected) => (
                "premature end of file".into(),
                format!("expected {expected} before the end of the file").into(),
            ),
            Self::MissingSemicolon => (
                "invalid statement".into(),
                "expected ';' after the statement".into(),
            ),
            Self::MissingEqualsSign => (
                "invalid variable definition".into(),
                "expected '=' after the variable name".into(),
            ),
            Self::MissingIdentifier { after } => (
                "invalid statement".into(),
                format!("expected identifier after '{after}'").into(),
            ),
            Self::MissingOpenRoundBracket { after } => (
                "invalid statement".into(),
                format!("expected '(' after '{after}'").into(),
            ),
            Self::MissingOpenCurlyBracket => (
                "invalid statement".into(),
                "expected '{' opening a block".into(),
            ),
            Self::MissingCommaBetweenParameters => (
                "invalid function definition".into(),
                "expected ',' or ')' after the parameter name".into(),
            ),
            Self::MissingCommaBetweenArguments => (
                "invalid function call".into(),
                "expected ',' or ')' after the argument".into(),
            ),
            Self::UnclosedRoundBracket => (
                "invalid expression".into(),
                "expected ')' closing the bracket".into(),
            ),
            Self::EmptyExpression => (
                "invalid expression".into(),
                "empty expressions are not allowed".into(),
            ),
            Self::ExpectedOperand => (
                "invalid expression".into(),
                "expected an operand before this token".into(),
            ),
            Self::IntegerLiteralOverflow => (
                "invalid integer literal".into(),
                format!("overflows a 64 bit signed integer (over {})", i64::MAX).into(),
            ),
            Self::StrayElseBlock => (
                "stray 'else' block".into(),
                "must appear after an 'if' statement".into(),
            ),
            Self::StrayClosingRoundBracket => (
                "stray ')'".into(),
                "was not opened before".into(),
            ),
            Self::StrayClosingCurlyBracket => (
                "stray '}'".into(),
                "was not opened before".into(),
            ),
            Self::StrayComma => (
                "stray ','".into(),
                "not allowed at the start of a statement".into(),
            ),
            Self::StrayOperator(op) => (
                format!("stray '{op}' operator").into(),
                "not allowed at the start of a statement".into(),
            ),
            Self::NestedFunctionDefinition => (
                "invalid function definition".into(),
                "functions can only be defined at the top level".into(),
            ),
        };

        return ErrorInfo { message, cause };
    }
}
