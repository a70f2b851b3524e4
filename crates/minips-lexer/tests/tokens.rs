use minips_lexer::{lex, Tok};

fn words(input: &str) -> Vec<String> {
    lex(input)
        .into_iter()
        .map(|t| match t {
            Tok::Word(w) => w,
            other => panic!("expected word, got {other:?}"),
        })
        .collect()
}

#[test]
fn whitespace_separates_words() {
    assert_eq!(words("3 4\tadd\n="), vec!["3", "4", "add", "="]);
    assert_eq!(lex("   \n\t "), vec![]);
}

#[test]
fn structural_delimiters_are_single_tokens() {
    let toks = lex("{dup}[3]");
    assert_eq!(
        toks,
        vec![
            Tok::LBrace,
            Tok::Word("dup".into()),
            Tok::RBrace,
            Tok::LBracket,
            Tok::Word("3".into()),
            Tok::RBracket,
        ]
    );
}

#[test]
fn comment_runs_to_end_of_line() {
    assert_eq!(words("1 % two three\n4"), vec!["1", "4"]);
}

#[test]
fn comment_terminates_word() {
    assert_eq!(words("abc%def\nghi"), vec!["abc", "ghi"]);
}

#[test]
fn unterminated_comment_is_accepted() {
    assert_eq!(words("1 % trailing"), vec!["1"]);
}

#[test]
fn string_literal_drops_outer_parens() {
    assert_eq!(lex("(hello world)"), vec![Tok::Str("hello world".into())]);
}

#[test]
fn string_literals_nest() {
    assert_eq!(lex("(a(b)c)"), vec![Tok::Str("a(b)c".into())]);
    assert_eq!(lex("((x))"), vec![Tok::Str("(x)".into())]);
}

#[test]
fn backslash_shields_delimiters() {
    assert_eq!(lex(r"(a\)b)"), vec![Tok::Str(r"a\)b".into())]);
    assert_eq!(lex(r"(a\(b)"), vec![Tok::Str(r"a\(b".into())]);
    assert_eq!(lex(r"(a\\)"), vec![Tok::Str(r"a\\".into())]);
}

#[test]
fn percent_inside_string_is_not_a_comment() {
    assert_eq!(lex("(100% pure)"), vec![Tok::Str("100% pure".into())]);
}

#[test]
fn unterminated_string_ends_at_input_end() {
    assert_eq!(lex("(abc"), vec![Tok::Str("abc".into())]);
    assert_eq!(lex("(a(b"), vec![Tok::Str("a(b".into())]);
}

#[test]
fn adjacent_strings_and_words() {
    let toks = lex("(a)(b) x(c)");
    assert_eq!(
        toks,
        vec![
            Tok::Str("a".into()),
            Tok::Str("b".into()),
            Tok::Word("x".into()),
            Tok::Str("c".into()),
        ]
    );
}

#[test]
fn words_carry_punctuation() {
    assert_eq!(words("/x 3.14 == -5"), vec!["/x", "3.14", "==", "-5"]);
}
