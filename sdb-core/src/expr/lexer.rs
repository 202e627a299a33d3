//! Expression lexer
//!
//! Splits expression text into tokens. Rules are tried in a fixed order at
//! each position and the first one matching a non-empty prefix wins.

use super::error::LexError;
use super::token::{Token, TokenKind, TokenSequence};

/// What a rule recognizes
#[derive(Clone, Copy)]
enum Pattern {
    Exact(&'static str),
    Whitespace,
    Hex,
    Decimal,
    Register,
}

impl Pattern {
    /// Length of the prefix of `input` this pattern matches, or 0.
    fn match_len(self, input: &str) -> usize {
        match self {
            Pattern::Exact(text) if input.starts_with(text) => text.len(),
            Pattern::Exact(_) => 0,
            Pattern::Whitespace => whitespace(input),
            Pattern::Hex => hex(input),
            Pattern::Decimal => decimal(input),
            Pattern::Register => register(input),
        }
    }
}

struct Rule {
    name: &'static str,
    pattern: Pattern,
    /// `None` for text that produces no token
    kind: Option<TokenKind>,
}

const fn rule(name: &'static str, pattern: Pattern, kind: Option<TokenKind>) -> Rule {
    Rule {
        name,
        pattern,
        kind,
    }
}

const fn exact(text: &'static str, kind: TokenKind) -> Rule {
    rule(text, Pattern::Exact(text), Some(kind))
}

const RULES: &[Rule] = &[
    rule("spaces", Pattern::Whitespace, None),
    exact("+", TokenKind::Plus),
    exact("==", TokenKind::Eq),
    exact("!=", TokenKind::Neq),
    exact(">=", TokenKind::Ge),
    exact("<=", TokenKind::Le),
    exact(">", TokenKind::Gt),
    exact("<", TokenKind::Lt),
    exact("&&", TokenKind::And),
    exact("||", TokenKind::Or),
    exact("-", TokenKind::Minus),
    exact("*", TokenKind::Star),
    exact("/", TokenKind::Slash),
    exact("(", TokenKind::LParen),
    exact(")", TokenKind::RParen),
    rule("hex", Pattern::Hex, Some(TokenKind::Hex)),
    rule("decimal", Pattern::Decimal, Some(TokenKind::Decimal)),
    rule("register", Pattern::Register, Some(TokenKind::Register)),
];

fn count_while(input: &str, pred: impl Fn(u8) -> bool) -> usize {
    input.bytes().take_while(|&b| pred(b)).count()
}

fn whitespace(input: &str) -> usize {
    count_while(input, |b| b.is_ascii_whitespace())
}

// 0[xX][0-9a-fA-F]+
fn hex(input: &str) -> usize {
    let bytes = input.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'0' || !matches!(bytes[1], b'x' | b'X') {
        return 0;
    }
    match count_while(&input[2..], |b| b.is_ascii_hexdigit()) {
        0 => 0,
        digits => digits + 2,
    }
}

// [0-9]+
fn decimal(input: &str) -> usize {
    count_while(input, |b| b.is_ascii_digit())
}

// \$[a-zA-Z]+
fn register(input: &str) -> usize {
    let Some(name) = input.strip_prefix('$') else {
        return 0;
    };
    match count_while(name, |b| b.is_ascii_alphabetic()) {
        0 => 0,
        letters => letters + 1,
    }
}

/// Tokenize an expression with no limit on the number of tokens
pub fn tokenize(input: &str) -> Result<TokenSequence<'_>, LexError> {
    tokenize_with_limit(input, None)
}

/// Tokenize an expression, failing once more than `max_tokens` would be emitted
pub fn tokenize_with_limit(
    input: &str,
    max_tokens: Option<usize>,
) -> Result<TokenSequence<'_>, LexError> {
    let mut tokens = TokenSequence::new();
    let mut position = 0;

    while position < input.len() {
        let rest = &input[position..];
        let Some((rule, len)) = RULES
            .iter()
            .map(|rule| (rule, rule.pattern.match_len(rest)))
            .find(|&(_, len)| len > 0)
        else {
            return Err(LexError::NoMatch {
                position,
                remaining: rest.to_string(),
            });
        };

        let text = &rest[..len];
        log::trace!(
            "match rule \"{}\" at position {} with len {}: {}",
            rule.name,
            position,
            len,
            text
        );

        if let Some(kind) = rule.kind {
            if let Some(limit) = max_tokens.filter(|&limit| tokens.len() >= limit) {
                return Err(LexError::TooManyTokens { limit });
            }
            let kind = classify(kind, tokens.last());
            tokens.push(Token::new(kind, text, position));
        }

        position += len;
    }

    Ok(tokens)
}

/// Resolve `-` and `*` against the token emitted just before them.
fn classify(kind: TokenKind, previous: Option<&Token<'_>>) -> TokenKind {
    let after_value = previous.is_some_and(|token| token.kind.ends_value());
    match kind {
        TokenKind::Minus if !after_value => TokenKind::Neg,
        TokenKind::Star if !after_value => TokenKind::Deref,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_arithmetic() {
        use TokenKind::*;
        assert_eq!(
            kinds("1 + 2*3 / 4"),
            vec![Decimal, Plus, Decimal, Star, Decimal, Slash, Decimal]
        );
    }

    #[test]
    fn test_tokenize_comparisons() {
        use TokenKind::*;
        assert_eq!(
            kinds("1==2 != 3 >= 4 <= 5 > 6 < 7"),
            vec![
                Decimal, Eq, Decimal, Neq, Decimal, Ge, Decimal, Le, Decimal, Gt, Decimal, Lt,
                Decimal
            ]
        );
        assert_eq!(kinds("1&&0||1"), vec![Decimal, And, Decimal, Or, Decimal]);
    }

    #[test]
    fn test_tokenize_literals() {
        let tokens = tokenize("0x1F 0X2a 42 $pc").unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| (t.kind, t.text)).collect();
        assert_eq!(
            texts,
            vec![
                (TokenKind::Hex, "0x1F"),
                (TokenKind::Hex, "0X2a"),
                (TokenKind::Decimal, "42"),
                (TokenKind::Register, "$pc"),
            ]
        );
        assert_eq!(tokens[3].position, 13);
    }

    #[test]
    fn test_unary_at_start() {
        use TokenKind::*;
        assert_eq!(kinds("-5"), vec![Neg, Decimal]);
        assert_eq!(kinds("*0x80000000"), vec![Deref, Hex]);
    }

    #[test]
    fn test_binary_after_values() {
        use TokenKind::*;
        assert_eq!(kinds("1-2"), vec![Decimal, Minus, Decimal]);
        assert_eq!(kinds("(1)*2"), vec![LParen, Decimal, RParen, Star, Decimal]);
        assert_eq!(kinds("$sp - 4"), vec![Register, Minus, Decimal]);
        assert_eq!(kinds("0x10*2"), vec![Hex, Star, Decimal]);
    }

    #[test]
    fn test_unary_after_operators() {
        use TokenKind::*;
        assert_eq!(kinds("2*-3"), vec![Decimal, Star, Neg, Decimal]);
        assert_eq!(kinds("(-1)"), vec![LParen, Neg, Decimal, RParen]);
        assert_eq!(kinds("**$sp"), vec![Deref, Deref, Register]);
        assert_eq!(kinds("1 - -2"), vec![Decimal, Minus, Neg, Decimal]);
        assert_eq!(kinds("--*$a"), vec![Neg, Neg, Deref, Register]);
    }

    #[test]
    fn test_classification_uses_final_previous_kind() {
        use TokenKind::*;
        // The second `-` follows a Neg, not a value, so it stays unary.
        assert_eq!(kinds("- - 1 - 1"), vec![Neg, Neg, Decimal, Minus, Decimal]);
    }

    #[test]
    fn test_whitespace_only() {
        assert!(tokenize("   \t ").unwrap().is_empty());
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_no_match() {
        let err = tokenize("1 + @").unwrap_err();
        assert_eq!(
            err,
            LexError::NoMatch {
                position: 4,
                remaining: "@".to_string()
            }
        );
    }

    #[test]
    fn test_incomplete_literals() {
        // `0x` alone lexes the `0` then fails on `x`
        assert!(matches!(
            tokenize("0x"),
            Err(LexError::NoMatch { position: 1, .. })
        ));
        assert!(matches!(
            tokenize("$"),
            Err(LexError::NoMatch { position: 0, .. })
        ));
        assert!(matches!(
            tokenize("1 = 1"),
            Err(LexError::NoMatch { position: 2, .. })
        ));
    }

    #[test]
    fn test_register_names_are_letters_only() {
        use TokenKind::*;
        assert_eq!(kinds("$a0"), vec![Register, Decimal]);
    }

    #[test]
    fn test_token_limit() {
        assert!(tokenize_with_limit("1+2", Some(3)).is_ok());
        assert_eq!(
            tokenize_with_limit("1+2+3", Some(3)).unwrap_err(),
            LexError::TooManyTokens { limit: 3 }
        );
        // Whitespace never counts against the limit
        assert!(tokenize_with_limit("  1   ", Some(1)).is_ok());
    }

    #[test]
    fn test_non_ascii_input() {
        let err = tokenize("1 + ü").unwrap_err();
        assert!(matches!(err, LexError::NoMatch { position: 4, .. }));
    }
}
