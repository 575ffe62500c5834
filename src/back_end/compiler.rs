use super::{Error, ErrorInfo, IntoErrorInfo};
use crate::front_end::{
    arena::{ExpressionIndex, NodeIndex, ScopeIndex},
    ast::{Ast, BinaryOp, Expression, If, Node},
};

/// a live local, stored in the 8-byte stack slot it was introduced in
#[derive(Debug)]
struct Variable<'src> {
    name: &'src str,
    slot_index: usize,
}

#[derive(Debug)]
struct Function<'src> {
    name: &'src str,
    parameters_count: usize,
}

#[derive(Debug, Clone, Copy)]
enum Resolved {
    Local { slot_index: usize },
    Parameter { position: usize },
}

// arguments are pushed by the caller, so the first parameter sits right above
// the return address and the saved base pointer
const PARAMETERS_BASE_OFFSET: usize = 16;

#[derive(Debug)]
pub struct Compiler<'src: 'ast, 'ast> {
    ast: &'ast Ast<'src>,

    asm: String,
    data: String,

    /// number of 8-byte slots currently occupied above `rsp`
    stack_depth: usize,
    /// snapshots of the live variables count at each `{`
    scopes: Vec<usize>,
    variables: Vec<Variable<'src>>,

    parameters: &'ast [&'src str],
    inside_function: bool,
    functions: Vec<Function<'src>>,

    label_counter: usize,

    uses_int_print: bool,
    uses_str_print: bool,
}

// Generation of the assembly text
impl<'src: 'ast, 'ast> Compiler<'src, 'ast> {
    pub fn compile(ast: &'ast Ast<'src>) -> Result<String, Error<ErrorKind<'src>>> {
        let mut this = Compiler {
            ast,
            asm: String::new(),
            data: String::new(),
            stack_depth: 0,
            scopes: Vec::new(),
            variables: Vec::new(),
            parameters: &[],
            inside_function: false,
            functions: Vec::new(),
            label_counter: 0,
            uses_int_print: false,
            uses_str_print: false,
        };

        // functions are registered up front so that calls can be checked
        // regardless of definition order
        for node_index in &ast.statements {
            let Node::Function { name, parameters, .. } = ast.arena.node(*node_index) else {
                continue;
            };

            if this.resolve_function(name).is_some() {
                return Err(Error { kind: ErrorKind::FunctionAlreadyDefined { name: *name } });
            }

            for (parameter_index, parameter) in parameters.iter().enumerate() {
                if parameters[..parameter_index].contains(parameter) {
                    return Err(Error {
                        kind: ErrorKind::ParameterAlreadyDefined {
                            function: *name,
                            parameter: *parameter,
                        },
                    });
                }
            }

            this.functions.push(Function { name: *name, parameters_count: parameters.len() });
        }

        for node_index in &ast.statements {
            if let Node::Function { .. } = ast.arena.node(*node_index) {
                continue;
            }

            this.node(*node_index)?;
        }

        this.asm += " mov rax, 60\
            \n mov rdi, 0\
            \n syscall\n";

        // function bodies go after the exit sequence so that control never
        // falls into them
        for node_index in &ast.statements {
            let Node::Function { name, parameters, scope } = ast.arena.node(*node_index) else {
                continue;
            };

            this.function(*name, parameters, *scope)?;
        }

        if this.uses_int_print {
            this.asm += INT_PRINT_ASM;
        }
        if this.uses_str_print {
            this.asm += STR_PRINT_ASM;
        }

        for (label, string) in ast.strings.iter().enumerate() {
            let mut string_text = String::with_capacity(string.len() + 2);
            for ch in &**string {
                match ch {
                    b'`' => string_text += "\\`",
                    other => string_text.extend((*other as char).escape_default()),
                }
            }

            this.data += &format!(
                " str_{label}: db `{string_text}`, 0\
                \n str_{label}_len: equ $ - str_{label}\n"
            );
        }

        if this.uses_int_print {
            this.data += " int_str: times 64 db 0\n";
        }

        let mut program = String::with_capacity(this.asm.len() + this.data.len() + 64);
        program += "global _start\
            \n\
            \nsection .text\
            \n_start:\n";
        program += &this.asm;

        if !this.data.is_empty() {
            program += "\nsection .data\n";
            program += &this.data;
        }

        return Ok(program);
    }

    fn function(
        &mut self,
        name: &'src str,
        parameters: &'ast [&'src str],
        scope_index: ScopeIndex,
    ) -> Result<(), Error<ErrorKind<'src>>> {
        self.asm += &format!(
            "\nfn_{name}:\
            \n push rbp\
            \n mov rbp, rsp\n"
        );

        self.inside_function = true;
        self.parameters = parameters;
        self.variables.clear();
        self.scopes.clear();
        self.stack_depth = 0;

        self.scope(scope_index)?;

        // implicit `return 0` for bodies that fall off the end
        self.asm += " mov rax, 0\
            \n mov rsp, rbp\
            \n pop rbp\
            \n ret\n";

        self.inside_function = false;
        self.parameters = &[];
        return Ok(());
    }
}

// compile-time stack model
impl<'src: 'ast, 'ast> Compiler<'src, 'ast> {
    fn push(&mut self, reg: &str) {
        self.asm += &format!(" push {reg}\n");
        self.stack_depth += 1;
    }

    fn pop(&mut self, reg: &str) {
        self.asm += &format!(" pop {reg}\n");
        self.stack_depth -= 1;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(self.variables.len());
    }

    fn end_scope(&mut self) {
        let Some(previous_variables_count) = self.scopes.pop() else {
            unreachable!("unbalanced scopes");
        };

        let popped_count = self.variables.len() - previous_variables_count;
        if popped_count > 0 {
            self.asm += &format!(" add rsp, {}\n", popped_count * 8);
            self.stack_depth -= popped_count;
            self.variables.truncate(previous_variables_count);
        }
    }

    fn next_label(&mut self) -> usize {
        let label = self.label_counter;
        self.label_counter += 1;
        return label;
    }

    fn resolve(&self, name: &str) -> Option<Resolved> {
        for variable in &self.variables {
            if variable.name == name {
                return Some(Resolved::Local { slot_index: variable.slot_index });
            }
        }

        for (position, parameter) in self.parameters.iter().enumerate() {
            if *parameter == name {
                return Some(Resolved::Parameter { position });
            }
        }

        return None;
    }

    fn resolve_function(&self, name: &str) -> Option<&Function<'src>> {
        for function in &self.functions {
            if function.name == name {
                return Some(function);
            }
        }

        return None;
    }

    /// the expression with any parenthesis wrappers peeled off
    fn unparenthesized(&self, expression_index: ExpressionIndex) -> &'ast Expression<'src> {
        let mut expression = self.ast.arena.expression(expression_index);
        while let Expression::Parenthesis { expression_index } = expression {
            expression = self.ast.arena.expression(*expression_index);
        }

        return expression;
    }
}

// statements
impl<'src: 'ast, 'ast> Compiler<'src, 'ast> {
    fn node(&mut self, node_index: NodeIndex) -> Result<(), Error<ErrorKind<'src>>> {
        match self.ast.arena.node(node_index) {
            Node::Expression(expression_index) => match self.unparenthesized(*expression_index) {
                // bare literals are no-op statements
                Expression::False
                | Expression::True
                | Expression::Integer(_)
                | Expression::Str { .. } => {}
                _ => {
                    self.expression(*expression_index)?;

                    // discarding the residue to keep the stack neutral
                    self.asm += " add rsp, 8\n";
                    self.stack_depth -= 1;
                }
            },
            Node::Print(expression_index) => {
                self.asm += &format!(" ; print {}\n", self.display_expression(*expression_index));
                match self.unparenthesized(*expression_index) {
                    Expression::Str { label } => {
                        let label = *label;
                        self.expression(*expression_index)?;
                        self.pop("rsi");
                        self.asm += &format!(
                            " mov rdi, str_{label}_len\
                            \n call str_print\n"
                        );
                        self.uses_str_print = true;
                    }
                    _ => {
                        self.expression(*expression_index)?;
                        self.pop("rdi");
                        self.asm += " call int_print\n";
                        self.uses_int_print = true;
                    }
                }
            }
            Node::Exit(expression_index) => {
                self.asm += &format!(" ; exit({})\n", self.display_expression(*expression_index));
                self.expression(*expression_index)?;
                self.asm += " mov rax, 60\n";
                self.pop("rdi");
                self.asm += " syscall\n";
            }
            Node::Definition { name, value } => {
                if self.resolve(name).is_some() {
                    return Err(Error { kind: ErrorKind::VariableAlreadyDefined { name: *name } });
                }

                self.asm += &format!(" ; let {name} = {}\n", self.display_expression(*value));
                self.expression(*value)?;

                // the lowered value stays on the stack, serving as the
                // variable's storage
                self.variables.push(Variable { name: *name, slot_index: self.stack_depth - 1 });
            }
            Node::Assignment { name, new_value } => {
                let Some(resolved) = self.resolve(name) else {
                    return Err(Error {
                        kind: ErrorKind::VariableNotPreviouslyDefined { name: *name },
                    });
                };

                self.asm += &format!(" ; {name} = {}\n", self.display_expression(*new_value));
                self.expression(*new_value)?;
                self.pop("rax");

                match resolved {
                    Resolved::Local { slot_index } => {
                        let offset = self.stack_depth - slot_index - 1;
                        self.asm += &format!(" mov [rsp + {}], rax\n", offset * 8);
                    }
                    Resolved::Parameter { position } => {
                        self.asm += &format!(
                            " mov [rbp + {}], rax\n",
                            PARAMETERS_BASE_OFFSET + position * 8
                        );
                    }
                }
            }
            Node::Scope(scope_index) => self.scope(*scope_index)?,
            Node::If(if_statement) => self.iff(if_statement)?,
            Node::While { condition, scope } => {
                let loop_index = self.next_label();

                self.asm += &format!("loop_{loop_index}:\n");
                self.expression(*condition)?;
                self.pop("rax");
                self.asm += &format!(
                    " cmp rax, 0\
                    \n je loop_{loop_index}_end\n"
                );

                self.scope(*scope)?;

                self.asm += &format!(
                    " jmp loop_{loop_index}\
                    \nloop_{loop_index}_end:\n"
                );
            }
            Node::For { init, condition, step, scope } => {
                let loop_index = self.next_label();

                self.node(*init)?;
                self.asm += &format!("loop_{loop_index}:\n");
                self.expression(*condition)?;
                self.pop("rax");
                self.asm += &format!(
                    " cmp rax, 0\
                    \n je loop_{loop_index}_end\n"
                );

                self.scope(*scope)?;
                self.node(*step)?;

                self.asm += &format!(
                    " jmp loop_{loop_index}\
                    \nloop_{loop_index}_end:\n"
                );
            }
            Node::Function { .. } => {
                unreachable!("function definitions are only allowed at the top level");
            }
            Node::Return(expression_index) => {
                if !self.inside_function {
                    return Err(Error { kind: ErrorKind::ReturnOutsideOfFunction });
                }

                self.expression(*expression_index)?;
                self.pop("rax");
                self.asm += " mov rsp, rbp\
                    \n pop rbp\
                    \n ret\n";
            }
        }

        return Ok(());
    }

    fn scope(&mut self, scope_index: ScopeIndex) -> Result<(), Error<ErrorKind<'src>>> {
        self.begin_scope();
        for node_index in &self.ast.arena.scope(scope_index).nodes {
            self.node(*node_index)?;
        }
        self.end_scope();
        return Ok(());
    }

    fn iff(&mut self, if_statement: &'ast If) -> Result<(), Error<ErrorKind<'src>>> {
        let if_index = self.next_label();

        let [branch] = if_statement.branches.as_slice() else {
            return self.if_chain(if_statement, if_index);
        };

        if if_statement.els.is_some() {
            return self.if_chain(if_statement, if_index);
        }

        self.expression(branch.condition)?;
        self.pop("rax");
        self.asm += &format!(
            " test rax, rax\
            \n jz if_{if_index}_end\n"
        );
        self.scope(branch.scope)?;
        self.asm += &format!("if_{if_index}_end:\n");
        return Ok(());
    }

    /// an `if` with `else if` branches or a final `else`, sharing one end label
    fn if_chain(
        &mut self,
        if_statement: &'ast If,
        if_index: usize,
    ) -> Result<(), Error<ErrorKind<'src>>> {
        let branches_count = if_statement.branches.len();

        for (branch_index, branch) in if_statement.branches.iter().enumerate() {
            if branch_index > 0 {
                self.asm += &format!("if_{if_index}_else_if_{branch_index}:\n");
            }

            let false_tag = if branch_index + 1 < branches_count {
                format!("if_{if_index}_else_if_{}", branch_index + 1)
            } else if if_statement.els.is_some() {
                format!("if_{if_index}_else")
            } else {
                format!("if_{if_index}_end")
            };

            self.expression(branch.condition)?;
            self.pop("rax");
            self.asm += &format!(
                " cmp rax, 0\
                \n je {false_tag}\n"
            );

            self.scope(branch.scope)?;
            self.asm += &format!(" jmp if_{if_index}_end\n");
        }

        if let Some(els) = if_statement.els {
            self.asm += &format!("if_{if_index}_else:\n");
            self.scope(els)?;
        }

        self.asm += &format!("if_{if_index}_end:\n");
        return Ok(());
    }
}

// expressions
impl<'src: 'ast, 'ast> Compiler<'src, 'ast> {
    /// lowers the expression, leaving its value in a fresh slot at the top of
    /// the stack
    fn expression(
        &mut self,
        expression_index: ExpressionIndex,
    ) -> Result<(), Error<ErrorKind<'src>>> {
        match self.ast.arena.expression(expression_index) {
            Expression::False => {
                self.asm += " mov rax, 0\n";
                self.push("rax");
            }
            Expression::True => {
                self.asm += " mov rax, 1\n";
                self.push("rax");
            }
            Expression::Integer(integer) => {
                self.asm += &format!(" mov rax, {integer}\n");
                self.push("rax");
            }
            Expression::Str { label } => {
                self.asm += &format!(" lea rax, [str_{label}]\n");
                self.push("rax");
            }
            Expression::Identifier(name) => match self.resolve(name) {
                Some(Resolved::Local { slot_index }) => {
                    let offset = self.stack_depth - slot_index - 1;
                    self.asm += &format!(" push QWORD [rsp + {}]\n", offset * 8);
                    self.stack_depth += 1;
                }
                Some(Resolved::Parameter { position }) => {
                    self.asm += &format!(
                        " push QWORD [rbp + {}]\n",
                        PARAMETERS_BASE_OFFSET + position * 8
                    );
                    self.stack_depth += 1;
                }
                None => {
                    return Err(Error {
                        kind: ErrorKind::VariableNotPreviouslyDefined { name: *name },
                    })
                }
            },
            Expression::Parenthesis { expression_index } => self.expression(*expression_index)?,
            Expression::Binary { lhs_index, op: BinaryOp::And, rhs_index } => {
                let label_index = self.next_label();

                self.expression(*lhs_index)?;
                self.pop("rax");
                self.asm += &format!(
                    " cmp rax, 0\
                    \n je and_{label_index}_false\n"
                );

                self.expression(*rhs_index)?;
                self.pop("rax");
                self.asm += &format!(
                    " cmp rax, 0\
                    \n je and_{label_index}_false\
                    \n mov rax, 1\
                    \n jmp and_{label_index}_end\
                    \nand_{label_index}_false:\
                    \n mov rax, 0\
                    \nand_{label_index}_end:\n"
                );
                self.push("rax");
            }
            Expression::Binary { lhs_index, op: BinaryOp::Or, rhs_index } => {
                let label_index = self.next_label();

                self.expression(*lhs_index)?;
                self.pop("rax");
                self.asm += &format!(
                    " cmp rax, 0\
                    \n jne or_{label_index}_true\n"
                );

                self.expression(*rhs_index)?;
                self.pop("rax");
                self.asm += &format!(
                    " cmp rax, 0\
                    \n jne or_{label_index}_true\
                    \n mov rax, 0\
                    \n jmp or_{label_index}_end\
                    \nor_{label_index}_true:\
                    \n mov rax, 1\
                    \nor_{label_index}_end:\n"
                );
                self.push("rax");
            }
            Expression::Binary { lhs_index, op, rhs_index } => {
                // operands are lowered right to left so that the pops
                // reconstruct left to right semantics
                self.expression(*rhs_index)?;
                self.expression(*lhs_index)?;
                self.pop("rax");
                self.pop("rbx");

                self.asm += match op {
                    BinaryOp::Plus => " add rax, rbx\n",
                    BinaryOp::Minus => " sub rax, rbx\n",
                    BinaryOp::Times => " mul rbx\n",
                    BinaryOp::Divide => {
                        " xor rdx, rdx\
                        \n div rbx\n"
                    }
                    BinaryOp::EqualsEquals => {
                        " cmp rax, rbx\
                        \n sete al\
                        \n movzx rax, al\n"
                    }
                    BinaryOp::And | BinaryOp::Or => {
                        unreachable!("short-circuiting operators are lowered separately")
                    }
                };
                self.push("rax");
            }
            Expression::Call { name, arguments } => {
                let Some(function) = self.resolve_function(name) else {
                    return Err(Error {
                        kind: ErrorKind::FunctionNotPreviouslyDefined { name: *name },
                    });
                };

                if function.parameters_count != arguments.len() {
                    return Err(Error {
                        kind: ErrorKind::WrongNumberOfArguments {
                            function: *name,
                            expected: function.parameters_count,
                            actual: arguments.len(),
                        },
                    });
                }

                // arguments are lowered in reverse order, so that the first
                // argument ends up closest to the return address
                for argument_index in arguments.iter().rev() {
                    self.expression(*argument_index)?;
                }

                self.asm += &format!(" call fn_{name}\n");

                if !arguments.is_empty() {
                    self.asm += &format!(" add rsp, {}\n", arguments.len() * 8);
                    self.stack_depth -= arguments.len();
                }

                self.push("rax");
            }
        }

        return Ok(());
    }
}

// rendering of expressions inside assembly comments
impl<'src: 'ast, 'ast> Compiler<'src, 'ast> {
    fn display_expression(&self, expression_index: ExpressionIndex) -> String {
        return match self.ast.arena.expression(expression_index) {
            Expression::False => "false".to_owned(),
            Expression::True => "true".to_owned(),
            Expression::Integer(integer) => integer.to_string(),
            Expression::Str { label } => format!("str_{label}"),
            Expression::Identifier(name) => (*name).to_owned(),
            Expression::Parenthesis { expression_index } => {
                format!("({})", self.display_expression(*expression_index))
            }
            Expression::Binary { lhs_index, op, rhs_index } => format!(
                "{} {op} {}",
                self.display_expression(*lhs_index),
                self.display_expression(*rhs_index)
            ),
            Expression::Call { name, arguments } => {
                let mut text = format!("{name}(");
                let mut arguments_iter = arguments.iter();
                if let Some(first_argument) = arguments_iter.next() {
                    text += &self.display_expression(*first_argument);
                    for argument in arguments_iter {
                        text += ", ";
                        text += &self.display_expression(*argument);
                    }
                }
                text += ")";
                text
            }
        };
    }
}

// runtime support routines, appended only when a print statement needs them
const INT_PRINT_ASM: &str = "
; fn int_str: str @rax:rdx = int_to_str(self: int @rdi)
int_to_str:
 mov rsi, 10
 mov rcx, int_str + 63

 mov rax, rdi
 cmp rax, 0
 je .write_zero
 jl .make_number_positive
 jg .next_digit

.write_zero:
 mov byte [rcx], '0'
 jmp .done

.make_number_positive:
 neg rax

.next_digit:
 xor rdx, rdx
 idiv rsi

 add dl, '0'
 mov byte [rcx], dl
 dec rcx

 cmp rax, 0
 jne .next_digit

 cmp rdi, 0
 jl .add_minus_sign
 inc rcx
 jmp .done

.add_minus_sign:
 mov byte [rcx], '-'

.done:
 mov rdx, int_str + 64
 sub rdx, rcx

 mov rax, rcx
 ret

; fn int_print(self: int @rdi)
int_print:
 call int_to_str
 mov rdi, 1
 mov rsi, rax
 mov rax, 1
 syscall
 ret
";

const STR_PRINT_ASM: &str = "
; fn str_print(self: str @rdi:rsi)
str_print:
 mov rdx, rdi
 mov rdi, 1
 mov rax, 1
 syscall
 ret
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind<'src> {
    VariableAlreadyDefined { name: &'src str },
    VariableNotPreviouslyDefined { name: &'src str },

    FunctionAlreadyDefined { name: &'src str },
    FunctionNotPreviouslyDefined { name: &'src str },
    WrongNumberOfArguments { function: &'src str, expected: usize, actual: usize },
    ParameterAlreadyDefined { function: &'src str, parameter: &'src str },
    ReturnOutsideOfFunction,
}

impl IntoErrorInfo for ErrorKind<'_> {
    fn info(&self) -> ErrorInfo {
        let (message, cause) = match self {
            Self::VariableAlreadyDefined { name } => (
                format!("variable '{name}' already defined").into(),
                "cannot define the same variable twice in overlapping scopes".into(),
            ),
            Self::VariableNotPreviouslyDefined { name } => (
                format!("variable '{name}' not previously defined").into(),
                "was not defined before this point".into(),
            ),
            Self::FunctionAlreadyDefined { name } => (
                format!("function '{name}' already defined").into(),
                "cannot define the same function twice".into(),
            ),
            Self::FunctionNotPreviouslyDefined { name } => (
                format!("function '{name}' not defined").into(),
                "was not defined anywhere in the program".into(),
            ),
            Self::WrongNumberOfArguments { function, expected, actual } => (
                format!("wrong number of arguments in call to '{function}'").into(),
                format!("expected {expected} arguments but got {actual}").into(),
            ),
            Self::ParameterAlreadyDefined { function, parameter } => (
                format!("duplicate parameter '{parameter}' in function '{function}'").into(),
                "parameter names must be distinct".into(),
            ),
            Self::ReturnOutsideOfFunction => (
                "stray 'return' statement".into(),
                "can only appear inside a function body".into(),
            ),
        };

        return ErrorInfo { message, cause };
    }
}
