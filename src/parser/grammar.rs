//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;
use serde_json::Value;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Parser output before literal text is sliced out of the source
#[derive(Debug, Clone)]
enum Piece {
    Text,
    Node(Node),
}

/// Parse template source into a document
pub fn parse(input: &str) -> Result<Document, Vec<crate::ParseError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::parser::lexer::lex(input)
        .into_iter()
        .map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    let pieces = template_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect::<Vec<_>>())?;

    Ok(assemble(input, pieces))
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn template_parser<'a, I>(
) -> impl Parser<'a, I, Vec<Spanned<Piece>>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let ws = just(Token::Whitespace).or_not();

    let reference = select! {
        Token::Reference(raw) => Reference::from_raw(&raw),
    }
    .labelled("reference");

    let value = choice((
        select! { Token::String(s) => SetValue::Literal(Value::String(s)) },
        select! { Token::Integer(n) => SetValue::Literal(Value::from(n)) },
        reference.clone().map(SetValue::Reference),
    ))
    .labelled("value");

    // #set( $name = value )
    let set_directive = just(Token::Set)
        .ignore_then(ws.clone())
        .ignore_then(just(Token::ParenOpen))
        .ignore_then(ws.clone())
        .ignore_then(reference.clone())
        .then_ignore(ws.clone())
        .then_ignore(just(Token::Equals))
        .then_ignore(ws.clone())
        .then(value)
        .then_ignore(ws)
        .then_ignore(just(Token::ParenClose))
        .map(|(target, value)| {
            Piece::Node(Node::Set {
                target: target.name,
                value,
            })
        });

    let print = reference.map(|r| Piece::Node(Node::Print(r)));

    // Everything else is literal text; the lexer only emits `#set` in front of
    // a parenthesis, so a malformed directive is a syntax error
    let text = any()
        .filter(|t: &Token| *t != Token::Set)
        .to(Piece::Text);

    // Order matters: the text branch accepts references too
    choice((set_directive, print, text))
        .map_with(|p, e| Spanned::new(p, span_range(&e.span())))
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
}

/// Slice literal text out of the source and merge adjacent runs
///
/// A line break right after a `#set` directive is dropped, so a directive on
/// its own line leaves no blank line behind.
fn assemble(input: &str, pieces: Vec<Spanned<Piece>>) -> Document {
    let mut nodes: Vec<Spanned<Node>> = Vec::new();
    let mut after_set = false;

    for piece in pieces {
        let span = piece.span;
        match piece.node {
            Piece::Text => {
                let mut text = &input[span.clone()];
                if after_set {
                    text = text
                        .strip_prefix("\r\n")
                        .or_else(|| text.strip_prefix('\n'))
                        .unwrap_or(text);
                }
                after_set = false;
                if text.is_empty() {
                    continue;
                }
                if let Some(Spanned {
                    node: Node::Text(prev),
                    span: prev_span,
                }) = nodes.last_mut()
                {
                    prev.push_str(text);
                    prev_span.end = span.end;
                    continue;
                }
                nodes.push(Spanned::new(Node::Text(text.to_string()), span));
            }
            Piece::Node(node) => {
                after_set = matches!(node, Node::Set { .. });
                nodes.push(Spanned::new(node, span));
            }
        }
    }

    Document { nodes }
}
