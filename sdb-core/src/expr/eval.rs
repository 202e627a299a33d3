//! Expression evaluator
//!
//! Evaluates a token sequence by splitting it at its loosest-binding top-level
//! operator and recursing on both halves. Every recursive call works on a
//! strictly shorter slice, so evaluation always terminates, and nesting
//! deeper than `EvalConfig::max_depth` fails with `TooDeep`.

use super::error::EvalError;
use super::lexer::tokenize_with_limit;
use super::token::{Token, TokenKind};
use super::value::{EvalConfig, Word, WordWidth};
use crate::machine::{Memory, Registers};

/// Expression evaluator bound to a target's registers and memory
#[derive(Clone, Copy)]
pub struct Evaluator<'t> {
    registers: &'t dyn Registers,
    memory: &'t dyn Memory,
    config: EvalConfig,
}

impl<'t> Evaluator<'t> {
    pub fn new(registers: &'t dyn Registers, memory: &'t dyn Memory) -> Self {
        Self::with_config(registers, memory, EvalConfig::default())
    }

    pub fn with_config(
        registers: &'t dyn Registers,
        memory: &'t dyn Memory,
        config: EvalConfig,
    ) -> Self {
        Self {
            registers,
            memory,
            config,
        }
    }

    pub fn config(&self) -> EvalConfig {
        self.config
    }

    fn width(&self) -> WordWidth {
        self.config.word_width
    }

    /// Tokenize and evaluate an expression
    pub fn evaluate_expression(&self, text: &str) -> Result<Word, EvalError> {
        let tokens = tokenize_with_limit(text, self.config.max_tokens)?;
        let result = self.evaluate(&tokens);
        log::debug!("evaluate {:?} -> {:?}", text, result);
        result
    }

    /// Evaluate a token range
    pub fn evaluate(&self, tokens: &[Token<'_>]) -> Result<Word, EvalError> {
        self.eval_at(tokens, 0)
    }

    fn eval_at(&self, tokens: &[Token<'_>], depth: usize) -> Result<Word, EvalError> {
        let limit = self.config.max_depth;
        if depth > limit {
            return Err(EvalError::TooDeep { limit });
        }

        match tokens {
            [] => return Err(EvalError::EmptyRange),
            [token] => return self.eval_operand(token),
            _ => {}
        }

        if is_parenthesized(tokens) {
            return self.eval_at(&tokens[1..tokens.len() - 1], depth + 1);
        }

        let op = main_operator(tokens)?;
        if op == 0 {
            return self.eval_prefix(tokens, depth);
        }

        let kind = tokens[op].kind;
        let right = self.eval_at(&tokens[op + 1..], depth + 1);
        match self.eval_at(&tokens[..op], depth + 1) {
            // No left operand: the operator is applied as a prefix
            Err(EvalError::EmptyRange) => self.apply_unary(kind, right?),
            left => {
                let right = right?;
                self.apply_binary(left?, kind, right)
            }
        }
    }

    /// Evaluate a range whose main operator is its first token.
    ///
    /// Such a range has no top-level binary operator, so a run of leading
    /// `-`/`*` is applied right to left without recursing once per operator.
    fn eval_prefix(&self, tokens: &[Token<'_>], depth: usize) -> Result<Word, EvalError> {
        let prefix = tokens
            .iter()
            .take_while(|token| token.kind.is_unary())
            .count()
            .max(1);
        let mut value = self.eval_at(&tokens[prefix..], depth + 1)?;
        for token in tokens[..prefix].iter().rev() {
            value = self.apply_unary(token.kind, value)?;
        }
        Ok(value)
    }

    fn eval_operand(&self, token: &Token<'_>) -> Result<Word, EvalError> {
        let width = self.width();
        match token.kind {
            TokenKind::Decimal => token
                .text
                .parse::<u64>()
                .map(|bits| width.from_bits(bits))
                .map_err(|_| EvalError::invalid_literal(token.text)),
            TokenKind::Hex => token
                .text
                .get(2..)
                .and_then(|digits| u64::from_str_radix(digits, 16).ok())
                .map(|bits| width.from_bits(bits))
                .ok_or_else(|| EvalError::invalid_literal(token.text)),
            TokenKind::Register => {
                let name = token.text.strip_prefix('$').unwrap_or(token.text);
                self.registers
                    .resolve(name)
                    .map(|bits| width.from_bits(bits))
                    .ok_or_else(|| EvalError::unknown_register(name))
            }
            _ => Err(EvalError::not_a_value(token.kind.as_str())),
        }
    }

    fn apply_unary(&self, op: TokenKind, value: Word) -> Result<Word, EvalError> {
        let width = self.width();
        match op {
            TokenKind::Neg => Ok(width.wrap(value.wrapping_neg())),
            TokenKind::Deref => {
                let address = width.to_bits(value);
                self.memory
                    .read(address, width)
                    .map(|bits| width.from_bits(bits))
                    .ok_or(EvalError::BadAddress { address })
            }
            other => Err(EvalError::InvalidUnaryOp {
                op: other.as_str().to_string(),
            }),
        }
    }

    fn apply_binary(&self, left: Word, op: TokenKind, right: Word) -> Result<Word, EvalError> {
        let width = self.width();
        let result = match op {
            TokenKind::Plus => width.wrap(left.wrapping_add(right)),
            TokenKind::Minus => width.wrap(left.wrapping_sub(right)),
            TokenKind::Star => width.wrap(left.wrapping_mul(right)),
            TokenKind::Slash => {
                if right == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                width.wrap(left.wrapping_div(right))
            }
            TokenKind::Eq => Word::from(left == right),
            TokenKind::Neq => Word::from(left != right),
            TokenKind::Gt => Word::from(left > right),
            TokenKind::Lt => Word::from(left < right),
            TokenKind::Ge => Word::from(left >= right),
            TokenKind::Le => Word::from(left <= right),
            TokenKind::And => Word::from(left != 0 && right != 0),
            TokenKind::Or => Word::from(left != 0 || right != 0),
            other => {
                return Err(EvalError::InvalidBinaryOp {
                    op: other.as_str().to_string(),
                })
            }
        };
        Ok(result)
    }
}

/// Evaluate an expression against a target with the default configuration
pub fn evaluate_expression(
    text: &str,
    registers: &dyn Registers,
    memory: &dyn Memory,
) -> Result<Word, EvalError> {
    Evaluator::new(registers, memory).evaluate_expression(text)
}

/// Whether the whole range is wrapped in one matching pair of parentheses.
///
/// `(1+2)` is, `(1)+(2)` is not.
fn is_parenthesized(tokens: &[Token<'_>]) -> bool {
    let last = tokens.len() - 1;
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
        if depth == 0 && i < last {
            return false;
        }
    }
    depth == 0
}

/// Index of the operator to split the range at.
///
/// The loosest-binding top-level operator wins. Among binary operators of
/// equal rank the rightmost wins; a unary operator never displaces an equal
/// rank candidate, so the leftmost prefix operator is applied last.
fn main_operator(tokens: &[Token<'_>]) -> Result<usize, EvalError> {
    let mut depth = 0usize;
    let mut best: Option<(usize, u8)> = None;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth = depth.checked_sub(1).ok_or(EvalError::UnbalancedParens)?;
            }
            _ if depth > 0 => {}
            kind => {
                let Some(rank) = kind.precedence() else {
                    continue;
                };
                let replaces = match best {
                    None => true,
                    Some((_, best_rank)) => {
                        rank > best_rank || (rank == best_rank && !kind.is_unary())
                    }
                };
                if replaces {
                    best = Some((i, rank));
                }
            }
        }
    }

    if depth != 0 {
        return Err(EvalError::UnbalancedParens);
    }
    best.map(|(i, _)| i).ok_or(EvalError::NoOperator)
}
