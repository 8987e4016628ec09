//! Recursive descent parser for MiniJava
//!
//! Expressions are parsed by precedence climbing. Every construct that can
//! recover from a failure (class, declaration, variable, statement, expression,
//! term) records the diagnostic, skips to its synchronization tokens and hands
//! an error placeholder back to its caller, so one malformed construct does not
//! hide the errors that follow it.

use crate::ast::*;
use crate::error::{syntax_error, unexpected_token, ParseFailure, ParseResult};
use crate::lexer::Lexer;
use crate::token::{Keyword, Token, TokenKind, TokenSource};
use core_types::{CompileError, Diagnostic, SourcePosition};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// A parsed type reference (`int`, `Foo`, `int[]`)
struct TypeSpec {
    name: String,
    builtin: bool,
    is_array: bool,
    position: SourcePosition,
}

/// MiniJava parser
pub struct Parser<S: TokenSource = Lexer> {
    source: S,
    /// Tokens peeked but not yet consumed
    lookahead: VecDeque<Token>,
    diagnostics: Vec<Diagnostic>,
    next_id: u32,
}

impl Parser<Lexer> {
    /// Create a new parser for the given source code
    pub fn new(source: &str) -> Self {
        Self::from_source(Lexer::new(source))
    }
}

impl<S: TokenSource> Parser<S> {
    /// Create a parser reading from an arbitrary token source
    pub fn from_source(source: S) -> Self {
        Self {
            source,
            lookahead: VecDeque::new(),
            diagnostics: Vec::new(),
            next_id: 0,
        }
    }

    /// Parse the source into an AST.
    ///
    /// Fails with every recorded diagnostic if any lexical or syntax error
    /// was found.
    pub fn parse(&mut self) -> Result<Program, CompileError> {
        let (program, diagnostics) = self.parse_with_diagnostics();
        if diagnostics.is_empty() {
            Ok(program)
        } else {
            Err(CompileError::Rejected(diagnostics))
        }
    }

    /// Parse the source, returning the recovered tree together with the
    /// diagnostics in the order they were recorded
    pub fn parse_with_diagnostics(&mut self) -> (Program, Vec<Diagnostic>) {
        debug!("parsing program");
        let main_class = self.parse_main_class();

        let mut classes = Vec::new();
        while !self.at(&TokenKind::EndOfInput) {
            if let Some(class) = self.parse_class_declaration() {
                classes.push(class);
            }
        }

        let diagnostics = std::mem::take(&mut self.diagnostics);
        debug!(
            classes = classes.len(),
            diagnostics = diagnostics.len(),
            "parsed program"
        );
        (
            Program {
                main_class,
                classes,
            },
            diagnostics,
        )
    }

    // ========================================================================
    // Classes and declarations
    // ========================================================================

    fn parse_main_class(&mut self) -> Option<MainClassDeclaration> {
        let result = self.main_class_body();
        self.recover(result, Self::sync_class, "main class")
    }

    fn main_class_body(&mut self) -> ParseResult<MainClassDeclaration> {
        let position = self.expect_keyword(Keyword::Class)?;
        let (name, _) = self.expect_identifier()?;
        self.expect_kind(TokenKind::LeftBrace)?;
        self.expect_keyword(Keyword::Public)?;
        self.expect_keyword(Keyword::Static)?;
        self.expect_type_named("void")?;
        self.expect_keyword(Keyword::Main)?;
        self.expect_kind(TokenKind::LeftParen)?;
        self.expect_kind(TokenKind::RightParen)?;
        self.expect_kind(TokenKind::LeftBrace)?;
        let statements = self.parse_statement_list();
        self.expect_kind(TokenKind::RightBrace)?;
        self.expect_kind(TokenKind::RightBrace)?;

        Ok(MainClassDeclaration {
            id: self.next_node_id(),
            name,
            statements,
            position,
        })
    }

    fn parse_class_declaration(&mut self) -> Option<ClassDeclaration> {
        let result = self.class_body();
        self.recover(result, Self::sync_class, "class")
    }

    fn class_body(&mut self) -> ParseResult<ClassDeclaration> {
        let position = self.expect_keyword(Keyword::Class)?;
        let (name, _) = self.expect_identifier()?;
        let superclass = if self.at(&TokenKind::LeftBrace) {
            None
        } else {
            self.expect_keyword(Keyword::Extends)?;
            Some(self.expect_identifier()?.0)
        };
        self.expect_kind(TokenKind::LeftBrace)?;
        let declarations = self.parse_declaration_list();
        self.expect_kind(TokenKind::RightBrace)?;

        Ok(ClassDeclaration {
            id: self.next_node_id(),
            name,
            superclass,
            declarations,
            position,
        })
    }

    fn parse_declaration_list(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        while !self.at(&TokenKind::RightBrace) && !self.at(&TokenKind::EndOfInput) {
            declarations.push(self.parse_declaration());
        }
        declarations
    }

    fn parse_declaration(&mut self) -> Declaration {
        let position = self.peek().position;
        let result = self.declaration_body();
        self.recover(result, Self::sync_declaration, "declaration")
            .unwrap_or(Declaration::Error { position })
    }

    fn declaration_body(&mut self) -> ParseResult<Declaration> {
        let token = self.peek().clone();
        match token.kind {
            ref kind if kind.is_type() => Ok(self
                .parse_variable_declaration(VariableKind::Class)?
                .map_or(Declaration::Error { position: token.position }, Declaration::Variable)),
            TokenKind::Keyword(_) => self.parse_method_declaration().map(Declaration::Method),
            TokenKind::Error(_) => {
                self.consume();
                Err(ParseFailure::Lexical)
            }
            ref kind => Err(syntax_error(
                format!("invalid {} starting a declaration", kind),
                token.position,
            )),
        }
    }

    fn parse_method_declaration(&mut self) -> ParseResult<MethodDeclaration> {
        let position = self.expect_keyword(Keyword::Public)?;
        let return_type = self.parse_type()?;
        let (name, _) = self.expect_identifier()?;
        self.expect_kind(TokenKind::LeftParen)?;
        let parameters = self.parse_formal_parameters()?;
        self.expect_kind(TokenKind::RightParen)?;
        self.expect_kind(TokenKind::LeftBrace)?;
        let body = self.parse_statement_list();
        self.expect_kind(TokenKind::RightBrace)?;

        Ok(MethodDeclaration {
            id: self.next_node_id(),
            name,
            return_type: return_type.name,
            returns_array: return_type.is_array,
            parameters,
            body,
            position,
        })
    }

    fn parse_formal_parameters(&mut self) -> ParseResult<Vec<VariableDeclaration>> {
        let mut parameters = Vec::new();
        if self.at(&TokenKind::RightParen) {
            return Ok(parameters);
        }
        loop {
            parameters.extend(self.parse_variable_or_formal(VariableKind::Formal));
            if self.at(&TokenKind::RightParen) {
                return Ok(parameters);
            }
            self.expect_kind(TokenKind::Comma)?;
        }
    }

    /// `Type name ;`, yielding `None` if the declaration itself had to be recovered
    fn parse_variable_declaration(
        &mut self,
        kind: VariableKind,
    ) -> ParseResult<Option<VariableDeclaration>> {
        let declaration = self.parse_variable_or_formal(kind);
        self.expect_kind(TokenKind::Semicolon)?;
        Ok(declaration)
    }

    fn parse_variable_or_formal(&mut self, kind: VariableKind) -> Option<VariableDeclaration> {
        let result = self.variable_body(kind);
        self.recover(result, Self::sync_variable, "variable declaration")
    }

    fn variable_body(&mut self, kind: VariableKind) -> ParseResult<VariableDeclaration> {
        let ty = self.parse_type()?;
        let (name, _) = self.expect_identifier()?;
        Ok(VariableDeclaration {
            id: self.next_node_id(),
            name,
            type_name: ty.name,
            is_array: ty.is_array,
            kind,
            position: ty.position,
        })
    }

    fn parse_type(&mut self) -> ParseResult<TypeSpec> {
        let mut ty = self.expect_type()?;
        if self.at(&TokenKind::LeftBracket) {
            self.consume();
            self.expect_kind(TokenKind::RightBracket)?;
            ty.is_array = true;
        }
        Ok(ty)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_statement_list(&mut self) -> Vec<Statement> {
        let mut statements = Vec::new();
        while !self.at(&TokenKind::RightBrace) && !self.at(&TokenKind::EndOfInput) {
            statements.push(self.parse_statement());
        }
        statements
    }

    fn parse_statement(&mut self) -> Statement {
        let position = self.peek().position;
        let result = self.statement_body();
        self.recover(result, Self::sync_statement, "statement")
            .unwrap_or(Statement::Error { position })
    }

    fn statement_body(&mut self) -> ParseResult<Statement> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::TypeName { .. } => Ok(self
                .parse_variable_declaration(VariableKind::Local)?
                .map_or(Statement::Error { position: token.position }, Statement::VariableDeclaration)),
            TokenKind::Keyword(keyword) => self.parse_keyword_statement(keyword, token.position),
            TokenKind::LeftBrace => self.parse_block(),
            _ => self.parse_expression_statement_or_declaration(),
        }
    }

    fn parse_keyword_statement(
        &mut self,
        keyword: Keyword,
        position: SourcePosition,
    ) -> ParseResult<Statement> {
        match keyword {
            Keyword::Assert => self.parse_assert(),
            Keyword::If => self.parse_if(),
            Keyword::While => self.parse_while(),
            Keyword::System => self.parse_print(),
            Keyword::Return => self.parse_return(),
            other => Err(syntax_error(
                format!("invalid keyword `{}` starting a statement", other.as_str()),
                position,
            )),
        }
    }

    fn parse_assert(&mut self) -> ParseResult<Statement> {
        let position = self.consume().position;
        self.expect_kind(TokenKind::LeftParen)?;
        let expression = self.parse_expression();
        self.expect_kind(TokenKind::RightParen)?;
        self.expect_kind(TokenKind::Semicolon)?;
        Ok(Statement::Assert {
            id: self.next_node_id(),
            expression,
            position,
        })
    }

    fn parse_if(&mut self) -> ParseResult<Statement> {
        let position = self.consume().position;
        self.expect_kind(TokenKind::LeftParen)?;
        let condition = self.parse_expression();
        self.expect_kind(TokenKind::RightParen)?;
        let then_branch = Box::new(self.parse_statement());
        let else_branch = if self.at_keyword(Keyword::Else) {
            self.consume();
            Some(Box::new(self.parse_statement()))
        } else {
            None
        };
        Ok(Statement::If {
            id: self.next_node_id(),
            condition,
            then_branch,
            else_branch,
            position,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Statement> {
        let position = self.consume().position;
        self.expect_kind(TokenKind::LeftParen)?;
        let condition = self.parse_expression();
        self.expect_kind(TokenKind::RightParen)?;
        let body = Box::new(self.parse_statement());
        Ok(Statement::While {
            id: self.next_node_id(),
            condition,
            body,
            position,
        })
    }

    fn parse_print(&mut self) -> ParseResult<Statement> {
        let position = self.consume().position;
        self.expect_kind(TokenKind::Dot)?;
        self.expect_keyword(Keyword::Out)?;
        self.expect_kind(TokenKind::Dot)?;
        self.expect_keyword(Keyword::Println)?;
        self.expect_kind(TokenKind::LeftParen)?;
        let expression = self.parse_expression();
        self.expect_kind(TokenKind::RightParen)?;
        self.expect_kind(TokenKind::Semicolon)?;
        Ok(Statement::Print {
            id: self.next_node_id(),
            expression,
            position,
        })
    }

    fn parse_return(&mut self) -> ParseResult<Statement> {
        let position = self.consume().position;
        let expression = self.parse_expression();
        self.expect_kind(TokenKind::Semicolon)?;
        Ok(Statement::Return {
            id: self.next_node_id(),
            expression,
            position,
        })
    }

    fn parse_block(&mut self) -> ParseResult<Statement> {
        let position = self.expect_kind(TokenKind::LeftBrace)?;
        let statements = self.parse_statement_list();
        self.expect_kind(TokenKind::RightBrace)?;
        Ok(Statement::Block {
            id: self.next_node_id(),
            statements,
            position,
        })
    }

    /// Statements starting with an identifier need up to three tokens of
    /// lookahead: `T[] x;` and `T x;` declare locals, anything else is an
    /// assignment or invocation expression.
    fn parse_expression_statement_or_declaration(&mut self) -> ParseResult<Statement> {
        let is_identifier = |kind: &TokenKind| matches!(kind, TokenKind::Identifier(_));

        if is_identifier(&self.peek().kind) {
            let second = self.peek_nth(1).kind.clone();
            if second == TokenKind::LeftBracket && self.peek_nth(2).kind == TokenKind::RightBracket {
                let (type_name, position) = self.expect_identifier()?;
                self.consume();
                self.consume();
                return self.finish_local_declaration(type_name, true, position);
            }
            if is_identifier(&second) {
                let (type_name, position) = self.expect_identifier()?;
                return self.finish_local_declaration(type_name, false, position);
            }
        }

        let expression = self.parse_expression();
        self.complete_statement(expression)
    }

    fn finish_local_declaration(
        &mut self,
        type_name: String,
        is_array: bool,
        position: SourcePosition,
    ) -> ParseResult<Statement> {
        let (name, _) = self.expect_identifier()?;
        self.expect_kind(TokenKind::Semicolon)?;
        Ok(Statement::VariableDeclaration(VariableDeclaration {
            id: self.next_node_id(),
            name,
            type_name,
            is_array,
            kind: VariableKind::Local,
            position,
        }))
    }

    fn complete_statement(&mut self, expression: Expression) -> ParseResult<Statement> {
        if self.at(&TokenKind::Assign) {
            let position = self.consume().position;
            let value = self.parse_expression();
            self.expect_kind(TokenKind::Semicolon)?;
            return Ok(Statement::Assignment {
                id: self.next_node_id(),
                target: expression,
                value,
                position,
            });
        }

        self.expect_kind(TokenKind::Semicolon)?;
        match expression {
            Expression::MethodInvocation(call) => Ok(Statement::MethodInvocation(call)),
            Expression::Error { position } => Ok(Statement::Error { position }),
            other => {
                // The terminator is already consumed, so no skipping is needed.
                let position = other.position();
                self.diagnostics.push(Diagnostic::syntax(
                    format!("{} cannot form a statement on its own", other.describe()),
                    position,
                ));
                Ok(Statement::Error { position })
            }
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expression(&mut self) -> Expression {
        let position = self.peek().position;
        let result = self.parse_binary(1);
        self.recover(result, Self::sync_expression, "expression")
            .unwrap_or(Expression::Error { position })
    }

    /// Parse a left-associative chain of operators of the given precedence
    fn parse_binary(&mut self, precedence: u8) -> ParseResult<Expression> {
        if precedence > BinaryOperator::MAX_PRECEDENCE {
            return self.parse_unary();
        }

        let mut left = self.parse_binary(precedence + 1)?;
        while let Some(operator) = self.peek_binary_operator(precedence) {
            let position = self.consume().position;
            let right = self.parse_binary(precedence + 1)?;
            left = Expression::BinaryOperator {
                id: self.next_node_id(),
                operator,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        Ok(left)
    }

    fn peek_binary_operator(&mut self, precedence: u8) -> Option<BinaryOperator> {
        match self.peek().kind {
            TokenKind::BinaryOperator(op) if op.precedence() == precedence => Some(op),
            _ => None,
        }
    }

    fn parse_unary(&mut self) -> ParseResult<Expression> {
        if self.at(&TokenKind::Not) {
            let position = self.consume().position;
            let operand = self.parse_term();
            return Ok(Expression::UnaryNot {
                id: self.next_node_id(),
                operand: Box::new(operand),
                position,
            });
        }
        Ok(self.parse_term())
    }

    fn parse_term(&mut self) -> Expression {
        let position = self.peek().position;
        let result = self.term_body();
        self.recover(result, Self::sync_term, "term")
            .unwrap_or(Expression::Error { position })
    }

    fn term_body(&mut self) -> ParseResult<Expression> {
        let token = self.peek().clone();
        let position = token.position;
        let term = match token.kind {
            TokenKind::Keyword(Keyword::New) => self.parse_instance_creation()?,
            TokenKind::Keyword(Keyword::This) => {
                self.consume();
                Expression::This {
                    id: self.next_node_id(),
                    position,
                }
            }
            TokenKind::Keyword(keyword @ (Keyword::True | Keyword::False)) => {
                self.consume();
                Expression::BooleanLiteral {
                    id: self.next_node_id(),
                    value: keyword == Keyword::True,
                    position,
                }
            }
            TokenKind::Keyword(other) => {
                return Err(syntax_error(
                    format!("invalid start token `{}` for an expression", other.as_str()),
                    position,
                ))
            }
            TokenKind::Identifier(name) => {
                self.consume();
                Expression::VariableReference {
                    id: self.next_node_id(),
                    name,
                    position,
                }
            }
            TokenKind::IntegerLiteral(value) => {
                self.consume();
                Expression::IntegerLiteral {
                    id: self.next_node_id(),
                    value,
                    position,
                }
            }
            TokenKind::LeftParen => {
                self.consume();
                let inner = self.parse_expression();
                self.expect_kind(TokenKind::RightParen)?;
                inner
            }
            TokenKind::Error(_) => {
                self.consume();
                return Err(ParseFailure::Lexical);
            }
            other => {
                return Err(syntax_error(
                    format!("invalid start token {} for a term in an expression", other),
                    position,
                ))
            }
        };
        self.parse_term_tail(term)
    }

    /// Apply postfix `[index]`, `.length` and `.method(args)` left to right
    fn parse_term_tail(&mut self, mut expression: Expression) -> ParseResult<Expression> {
        loop {
            if self.at(&TokenKind::LeftBracket) {
                let position = self.consume().position;
                let index = self.parse_expression();
                self.expect_kind(TokenKind::RightBracket)?;
                expression = Expression::ArrayIndex {
                    id: self.next_node_id(),
                    array: Box::new(expression),
                    index: Box::new(index),
                    position,
                };
            } else if self.at(&TokenKind::Dot) {
                self.consume();
                expression = Expression::MethodInvocation(self.parse_invocation(expression)?);
            } else {
                return Ok(expression);
            }
        }
    }

    fn parse_invocation(&mut self, receiver: Expression) -> ParseResult<MethodInvocation> {
        if let TokenKind::Keyword(_) = self.peek().kind {
            let position = self.expect_keyword(Keyword::Length)?;
            return Ok(MethodInvocation {
                id: self.next_node_id(),
                receiver: Box::new(receiver),
                method_name: Keyword::Length.as_str().to_string(),
                arguments: Vec::new(),
                position,
            });
        }

        let (method_name, position) = self.expect_identifier()?;
        self.expect_kind(TokenKind::LeftParen)?;
        let arguments = self.parse_expression_list()?;
        self.expect_kind(TokenKind::RightParen)?;
        Ok(MethodInvocation {
            id: self.next_node_id(),
            receiver: Box::new(receiver),
            method_name,
            arguments,
            position,
        })
    }

    fn parse_expression_list(&mut self) -> ParseResult<Vec<Expression>> {
        let mut arguments = Vec::new();
        if self.at(&TokenKind::RightParen) {
            return Ok(arguments);
        }
        loop {
            arguments.push(self.parse_expression());
            if self.at(&TokenKind::RightParen) {
                return Ok(arguments);
            }
            self.expect_kind(TokenKind::Comma)?;
        }
    }

    /// `new T()` or `new T[size]`; built-in types and types not followed by
    /// `(` always create arrays
    fn parse_instance_creation(&mut self) -> ParseResult<Expression> {
        let position = self.consume().position;
        let ty = self.expect_type()?;

        let array_size = if ty.builtin || !self.at(&TokenKind::LeftParen) {
            self.expect_kind(TokenKind::LeftBracket)?;
            let size = self.parse_expression();
            self.expect_kind(TokenKind::RightBracket)?;
            Some(Box::new(size))
        } else {
            self.expect_kind(TokenKind::LeftParen)?;
            self.expect_kind(TokenKind::RightParen)?;
            None
        };

        Ok(Expression::InstanceCreation {
            id: self.next_node_id(),
            type_name: ty.name,
            array_size,
            position,
        })
    }

    // ========================================================================
    // Recovery
    // ========================================================================

    fn recover<T>(
        &mut self,
        result: ParseResult<T>,
        sync: fn(&mut Self),
        construct: &str,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(failure) => {
                if let ParseFailure::Syntax(diagnostic) = failure {
                    debug!(construct, %diagnostic, "recovering from syntax error");
                    self.diagnostics.push(diagnostic);
                } else {
                    debug!(construct, "recovering from lexical error");
                }
                sync(self);
                None
            }
        }
    }

    /// Stop before the next `class` keyword
    fn sync_class(&mut self) {
        self.skip_until(|kind| *kind == TokenKind::Keyword(Keyword::Class));
    }

    /// Skip through the next `{`
    fn sync_declaration(&mut self) {
        self.skip_through(TokenKind::LeftBrace);
    }

    /// Skip through the next `;`
    fn sync_statement(&mut self) {
        self.skip_through(TokenKind::Semicolon);
    }

    fn sync_variable(&mut self) {
        self.skip_until(|kind| {
            matches!(
                kind,
                TokenKind::Semicolon | TokenKind::Comma | TokenKind::RightParen
            )
        });
    }

    fn sync_expression(&mut self) {
        self.skip_until(|kind| matches!(kind, TokenKind::Semicolon | TokenKind::RightParen));
    }

    fn sync_term(&mut self) {
        self.skip_until(|kind| {
            matches!(
                kind,
                TokenKind::Semicolon | TokenKind::RightParen | TokenKind::BinaryOperator(_)
            )
        });
    }

    /// Consume tokens until one satisfies `stop` or input ends; the stop token is kept
    fn skip_until(&mut self, stop: impl Fn(&TokenKind) -> bool) {
        loop {
            let token = self.peek();
            if token.is_end() || stop(&token.kind) {
                return;
            }
            self.consume();
        }
    }

    /// Consume tokens up to and including `terminator`, or until input ends
    fn skip_through(&mut self, terminator: TokenKind) {
        while !self.peek().is_end() {
            if self.consume().kind == terminator {
                return;
            }
        }
    }

    // ========================================================================
    // Token cursor
    // ========================================================================

    fn next_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn peek_nth(&mut self, n: usize) -> &Token {
        while self.lookahead.len() <= n {
            let token = self.source.next_token();
            self.lookahead.push_back(token);
        }
        &self.lookahead[n]
    }

    fn peek(&mut self) -> &Token {
        self.peek_nth(0)
    }

    fn at(&mut self, kind: &TokenKind) -> bool {
        self.peek().kind == *kind
    }

    fn at_keyword(&mut self, keyword: Keyword) -> bool {
        self.at(&TokenKind::Keyword(keyword))
    }

    /// Consume the current token; error tokens are recorded as lexical diagnostics
    fn consume(&mut self) -> Token {
        let token = self
            .lookahead
            .pop_front()
            .unwrap_or_else(|| self.source.next_token());
        if let TokenKind::Error(message) = &token.kind {
            self.diagnostics
                .push(Diagnostic::lexical(message.clone(), token.position));
        }
        trace!(token = %token.kind, position = %token.position, "consumed token");
        token
    }

    /// Consume the current token and extract a value from it.
    ///
    /// The token is consumed even when it does not match, so that every
    /// failed match makes progress.
    fn expect_map<T>(
        &mut self,
        expected: &str,
        extract: impl FnOnce(&Token) -> Option<T>,
    ) -> ParseResult<T> {
        let token = self.consume();
        match extract(&token) {
            Some(value) => Ok(value),
            None if token.is_error() => Err(ParseFailure::Lexical),
            None => Err(unexpected_token(expected, &token)),
        }
    }

    fn expect_kind(&mut self, kind: TokenKind) -> ParseResult<SourcePosition> {
        let expected = kind.to_string();
        self.expect_map(&expected, |token| (token.kind == kind).then_some(token.position))
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<SourcePosition> {
        self.expect_kind(TokenKind::Keyword(keyword))
    }

    fn expect_identifier(&mut self) -> ParseResult<(String, SourcePosition)> {
        self.expect_map("an identifier", |token| match &token.kind {
            TokenKind::Identifier(name) => Some((name.clone(), token.position)),
            _ => None,
        })
    }

    fn expect_type(&mut self) -> ParseResult<TypeSpec> {
        self.expect_map("a type", |token| {
            let (name, builtin) = match &token.kind {
                TokenKind::TypeName { name, builtin } => (name.clone(), *builtin),
                TokenKind::Identifier(name) => (name.clone(), false),
                _ => return None,
            };
            Some(TypeSpec {
                name,
                builtin,
                is_array: false,
                position: token.position,
            })
        })
    }

    fn expect_type_named(&mut self, expected: &str) -> ParseResult<SourcePosition> {
        self.expect_map(&format!("`{}`", expected), |token| match &token.kind {
            TokenKind::TypeName { name, .. } if name == expected => Some(token.position),
            _ => None,
        })
    }
}
