//! Lexer for the template language using logos
//!
//! Templates are lexed in two modes. Literal text only distinguishes
//! references, comments and the start of a `#set(...)` directive; the body of
//! a directive gets its own token set with strings, numbers and operators.
//! Every byte of input ends up in some token, since text outside directives
//! is reproduced from token spans.

use logos::{Lexer, Logos};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Directives
    Set,

    // References: $name, $!name, ${name}, $!{name}
    Reference(String),

    String(String),
    Integer(i64),

    // Delimiters
    ParenOpen,
    ParenClose,
    Equals,

    Whitespace,

    // Anything else
    Text,
}

/// Tokens of literal text
#[derive(Logos, Debug, Clone, PartialEq)]
enum TextToken {
    #[token("#set")]
    Set,

    #[regex(r"\$!?[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    #[regex(r"\$!?\{[a-zA-Z_][a-zA-Z0-9_]*\}", |lex| lex.slice().to_string())]
    Reference(String),

    // Lone sigils are text too
    #[token("$")]
    #[token("#")]
    #[regex(r"[^$#]+")]
    Text,

    // Comments (skip); a line comment takes its line break with it
    #[regex(r"##[^\n]*\n?", logos::skip)]
    LineComment,

    #[regex(r"#\*([^*]|\*+[^*#])*\*+#", logos::skip)]
    BlockComment,
}

/// Tokens inside the parentheses of a directive
#[derive(Logos, Debug, Clone, PartialEq)]
enum DirectiveToken {
    #[regex(r"\$!?[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    #[regex(r"\$!?\{[a-zA-Z_][a-zA-Z0-9_]*\}", |lex| lex.slice().to_string())]
    Reference(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        unescape(&s[1..s.len()-1])
    })]
    String(String),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Integer(i64),

    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("=")]
    Equals,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,
}

impl From<TextToken> for Token {
    fn from(tok: TextToken) -> Self {
        match tok {
            TextToken::Set => Token::Set,
            TextToken::Reference(raw) => Token::Reference(raw),
            TextToken::Text | TextToken::LineComment | TextToken::BlockComment => Token::Text,
        }
    }
}

impl From<DirectiveToken> for Token {
    fn from(tok: DirectiveToken) -> Self {
        match tok {
            DirectiveToken::Reference(raw) => Token::Reference(raw),
            DirectiveToken::String(s) => Token::String(s),
            DirectiveToken::Integer(n) => Token::Integer(n),
            DirectiveToken::ParenOpen => Token::ParenOpen,
            DirectiveToken::ParenClose => Token::ParenClose,
            DirectiveToken::Equals => Token::Equals,
            DirectiveToken::Whitespace => Token::Whitespace,
        }
    }
}

/// Lex input string into tokens with spans
///
/// `#set` is a directive only when an opening parenthesis follows it
/// (optionally after blanks); otherwise it is plain text, as is any input
/// the lexer cannot classify, so no source text is lost.
pub fn lex(input: &str) -> Vec<(Token, Span)> {
    let mut tokens = Vec::new();
    let mut text = TextToken::lexer(input);

    while let Some(tok) = text.next() {
        let span = text.span();
        match tok {
            Ok(TextToken::Set) if opens_directive(text.remainder()) => {
                tokens.push((Token::Set, span));
                let mut directive = text.morph::<DirectiveToken>();
                lex_directive(&mut directive, &mut tokens);
                text = directive.morph();
            }
            Ok(TextToken::Set) => tokens.push((Token::Text, span)),
            Ok(tok) => tokens.push((tok.into(), span)),
            Err(()) => tokens.push((Token::Text, span)),
        }
    }

    tokens
}

fn opens_directive(rest: &str) -> bool {
    rest.trim_start_matches([' ', '\t']).starts_with('(')
}

/// Lex a directive body up to and including its closing parenthesis
fn lex_directive(lexer: &mut Lexer<'_, DirectiveToken>, tokens: &mut Vec<(Token, Span)>) {
    while let Some(tok) = lexer.next() {
        let tok = tok.map(Token::from).unwrap_or(Token::Text);
        let closed = tok == Token::ParenClose;
        tokens.push((tok, lexer.span()));
        if closed {
            break;
        }
    }
}

/// Split a reference token into its variable name and quiet flag
pub fn split_reference(raw: &str) -> (&str, bool) {
    let rest = raw.strip_prefix('$').unwrap_or(raw);
    let (rest, quiet) = match rest.strip_prefix('!') {
        Some(r) => (r, true),
        None => (rest, false),
    };
    let name = rest
        .strip_prefix('{')
        .and_then(|r| r.strip_suffix('}'))
        .unwrap_or(rest);
    (name, quiet)
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
