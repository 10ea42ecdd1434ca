use std::fmt::Display;

use rusty_money::MoneyError;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    DateParse(String),
    PriceParse(String),
}

impl From<MoneyError> for Error {
    fn from(e: MoneyError) -> Self {
        Self::PriceParse(e.to_string())
    }
}

impl Error {
    pub fn html_parse_error(msg: &str) -> Self {
        Self::HtmlParse(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "HTML Parse Error: {msg}"),
            Self::DateParse(msg) => write!(f, "Date Parse Error: {msg}"),
            Self::PriceParse(msg) => write!(f, "Price Parse Error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
