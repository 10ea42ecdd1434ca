use std::sync::OnceLock;

use regex::Regex;
use scraper::Selector;

/// A CSS selector that is parsed on first use.
#[derive(Debug)]
pub(super) struct StaticSelector<'a> {
    cell: OnceLock<Selector>,
    selector: &'a str,
}

impl<'a> StaticSelector<'a> {
    pub(super) const fn new(selector: &'a str) -> Self {
        Self {
            cell: OnceLock::new(),
            selector,
        }
    }
}

impl<'a> core::ops::Deref for StaticSelector<'a> {
    type Target = Selector;

    fn deref(&self) -> &Self::Target {
        self.cell
            .get_or_init(|| match Selector::parse(self.selector) {
                Ok(sel) => sel,
                Err(e) => panic!("Error parsing static selector {}: {:?}", self.selector, e),
            })
    }
}

/// A regex that is compiled on first use.
#[derive(Debug)]
pub(super) struct StaticRegex<'a> {
    cell: OnceLock<Regex>,
    pattern: &'a str,
}

impl<'a> StaticRegex<'a> {
    pub(super) const fn new(pattern: &'a str) -> Self {
        Self {
            cell: OnceLock::new(),
            pattern,
        }
    }
}

impl<'a> core::ops::Deref for StaticRegex<'a> {
    type Target = Regex;

    fn deref(&self) -> &Self::Target {
        self.cell
            .get_or_init(|| match Regex::new(self.pattern) {
                Ok(re) => re,
                Err(e) => panic!("Error compiling static regex {}: {e}", self.pattern),
            })
    }
}

#[macro_export]
macro_rules! static_selector {
    ($x: ident <- $sel: literal) => {
        static $x: $crate::parse::statics::StaticSelector =
            $crate::parse::statics::StaticSelector::new($sel);
    };
}

#[macro_export]
macro_rules! static_regex {
    ($x: ident <- $pat: literal) => {
        static $x: $crate::parse::statics::StaticRegex =
            $crate::parse::statics::StaticRegex::new($pat);
    };
}
