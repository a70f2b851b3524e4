use minips_lexer::{lex, Tok};
use minips_object::object::Object;
use std::rc::Rc;

/// Parse a source program into a list of executable objects.
///
/// Parsing never fails: an unterminated `{` or `[` ends at end of input and
/// a stray `}` or `]` is skipped without diagnosis.
pub fn parse(src: &str) -> Vec<Object> {
    let toks = lex(src);
    let mut i = 0usize;
    parse_until(&mut i, &toks, None)
}

fn parse_until(i: &mut usize, toks: &[Tok], end: Option<&Tok>) -> Vec<Object> {
    let mut out = Vec::new();
    while let Some(t) = toks.get(*i) {
        *i += 1;
        if Some(t) == end {
            return out;
        }
        match t {
            Tok::LBrace => {
                let code = parse_until(i, toks, Some(&Tok::RBrace));
                out.push(Object::Procedure { code: Rc::new(code), env: None });
            }
            Tok::LBracket => {
                let items = parse_until(i, toks, Some(&Tok::RBracket));
                out.push(Object::Array(items));
            }
            // mismatched closer: the block it would end does not exist
            Tok::RBrace | Tok::RBracket => {}
            Tok::Str(s) => out.push(Object::String(s.clone())),
            Tok::Word(w) => out.push(classify(w)),
            Tok::_Whitespace | Tok::_CommentLine => unreachable!(),
        }
    }
    out
}

fn classify(word: &str) -> Object {
    if let Some(rest) = word.strip_prefix('/') {
        Object::LiteralName(rest.to_string())
    } else if word == "true" {
        Object::Boolean(true)
    } else if word == "false" {
        Object::Boolean(false)
    } else if let Ok(n) = word.parse::<i32>() {
        Object::Integer(n)
    } else if let Ok(r) = word.parse::<f64>() {
        Object::Real(r)
    } else {
        Object::Name(word.to_string())
    }
}
