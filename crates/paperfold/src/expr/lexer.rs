//! Tokens of the tag language.
//!
//! Words are split on whitespace and parentheses only, so keywords match on
//! word boundaries (`ANDROID` stays an identifier). Keywords are upper case.

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    LParen,
    RParen,
    And,
    Or,
    Not,
    True,
    False,
    Word(String),
}

impl Token {
    fn from_word(word: &str) -> Self {
        match word {
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            "TRUE" => Token::True,
            "FALSE" => Token::False,
            _ => Token::Word(word.to_owned()),
        }
    }
}

pub(crate) fn tokenize(src: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let mut word_start: Option<usize> = None;
    for (i, ch) in src.char_indices() {
        let breaks = ch.is_whitespace() || ch == '(' || ch == ')';
        if !breaks {
            word_start.get_or_insert(i);
            continue;
        }
        if let Some(s) = word_start.take() {
            out.push(Token::from_word(&src[s..i]));
        }
        match ch {
            '(' => out.push(Token::LParen),
            ')' => out.push(Token::RParen),
            _ => {}
        }
    }
    if let Some(s) = word_start {
        out.push(Token::from_word(&src[s..]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_words_and_parens() {
        let toks = tokenize("(a AND b)OR NOT c");
        assert_eq!(
            toks,
            vec![
                Token::LParen,
                Token::Word("a".into()),
                Token::And,
                Token::Word("b".into()),
                Token::RParen,
                Token::Or,
                Token::Not,
                Token::Word("c".into()),
            ]
        );
    }

    #[test]
    fn keywords_need_word_boundaries() {
        let toks = tokenize("ANDROID ORBIT NOTE and");
        assert!(toks.iter().all(|t| matches!(t, Token::Word(_))));
    }
}
