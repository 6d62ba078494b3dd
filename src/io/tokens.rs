//! Record tokenizing.
//!
//! A record is split on whitespace and every token gets one strict `f64` parse.
//! Tokens that do not parse are skipped; they are never an error. Column
//! structure is irrelevant: every numeric token of every record joins one flat
//! stream of values.

/// One numeric token, classified for the passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Finite(f64),
    /// `nan` / `NaN`; never becomes min/max and is never binned.
    NaN,
    /// `inf` / `-inf`; skipped like NaN so the range stays finite.
    Infinite,
}

impl Token {
    fn classify(v: f64) -> Self {
        if v.is_nan() {
            Token::NaN
        } else if v.is_infinite() {
            Token::Infinite
        } else {
            Token::Finite(v)
        }
    }

    pub fn finite(self) -> Option<f64> {
        match self {
            Token::Finite(v) => Some(v),
            Token::NaN | Token::Infinite => None,
        }
    }
}

/// Numeric tokens of one record, in order.
pub fn tokens(record: &str) -> impl Iterator<Item = Token> + '_ {
    record
        .split_whitespace()
        .filter_map(|tok| tok.parse::<f64>().ok())
        .map(Token::classify)
}
