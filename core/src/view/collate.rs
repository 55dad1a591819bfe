//! Title collation: case-insensitive, with embedded numbers compared by value.

use std::cmp::Ordering;

/// Compare two titles the way a reader expects: "rocky 2" < "Rocky 10" < "rocky ii".
pub fn title_cmp(a: &str, b: &str) -> Ordering {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    natural_cmp(&a, &b)
}

/// Token-wise comparison where digit runs compare numerically and text runs lexically.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a_tokens = tokenize(a);
    let b_tokens = tokenize(b);

    for (a_tok, b_tok) in a_tokens.iter().zip(b_tokens.iter()) {
        let ordering = match (a_tok, b_tok) {
            (Token::Number(a_digits, a_val), Token::Number(b_digits, b_val)) => {
                a_val.cmp(b_val).then_with(|| a_digits.len().cmp(&b_digits.len()))
            }
            (Token::Text(a_text), Token::Text(b_text)) => a_text.cmp(b_text),
            (Token::Number(..), Token::Text(..)) => Ordering::Less,
            (Token::Text(..), Token::Number(..)) => Ordering::Greater,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    a_tokens.len().cmp(&b_tokens.len())
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    Number(&'a str, u128),
}

fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut chars = input.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !ch.is_ascii_digit() {
            continue;
        }
        if start < idx {
            tokens.push(Token::Text(&input[start..idx]));
        }
        let mut end = idx + ch.len_utf8();
        while let Some(&(next_idx, next_ch)) = chars.peek() {
            if !next_ch.is_ascii_digit() {
                break;
            }
            chars.next();
            end = next_idx + next_ch.len_utf8();
        }
        let digits = &input[idx..end];
        tokens.push(Token::Number(digits, digits.parse::<u128>().unwrap_or(u128::MAX)));
        start = end;
    }

    if start < input.len() {
        tokens.push(Token::Text(&input[start..]));
    }
    tokens
}
