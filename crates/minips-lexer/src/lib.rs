use logos::{Lexer, Logos};

#[derive(Debug, Logos, PartialEq, Clone)]
pub enum Tok {
    // Whitespace separates tokens and is otherwise ignored
    #[regex(r"[ \t\r\n\x0b\x0c]+", logos::skip)]
    _Whitespace,

    // '%' runs up to but not including the next newline; end of input
    // terminates an open comment
    #[regex(r"%[^\n]*", logos::skip)]
    _CommentLine,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // '(' opens a string literal; the callback scans to the balancing ')'
    #[token("(", scan_string)]
    Str(String),

    // Any other run of non-whitespace, non-delimiter characters
    #[regex(r"[^ \t\r\n\x0b\x0c%(){}\[\]]+", |lex| lex.slice().to_string())]
    Word(String),
}

fn scan_string(lex: &mut Lexer<Tok>) -> Option<String> {
    // We have just matched '('; consume with nesting until the balancing ')'.
    // A backslash shields the following character from depth accounting but
    // both characters are kept verbatim. The outermost ')' is not appended.
    let s = lex.remainder();
    let mut out = String::new();
    let mut depth = 1usize;
    let mut chars = s.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some((_, next)) = chars.next() {
                    out.push(next);
                }
            }
            '(' => {
                depth += 1;
                out.push('(');
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    lex.bump(i + 1);
                    return Some(out);
                }
                out.push(')');
            }
            c => out.push(c),
        }
    }
    // Unterminated: consume the rest
    lex.bump(s.len());
    Some(out)
}

pub fn lex(input: &str) -> Vec<Tok> {
    let mut out = Vec::new();
    let mut l = Tok::lexer(input);
    while let Some(res) = l.next() {
        if let Ok(tok) = res {
            out.push(tok);
        }
    }
    out
}
