//! Facet fixtures shared by integration tests.

#![allow(dead_code)]

use facetwork::core::facet::Facet;
use facetwork::{capability, facet_value};

pub trait Titled: Facet {
    fn text(&self) -> &str;
}

pub trait Summarized: Titled {
    fn summary(&self) -> &str;
}

pub trait Owned: Facet {
    fn owner(&self) -> &str;
}

capability!(Titled);
capability!(Summarized: Titled);
capability!(Owned);

#[derive(Debug, Clone, PartialEq)]
pub struct TitleValue(pub String);

impl TitleValue {
    pub fn new(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl Titled for TitleValue {
    fn text(&self) -> &str {
        &self.0
    }
}

facet_value!(TitleValue: Titled);

#[derive(Debug, Clone, PartialEq)]
pub struct Abstract {
    pub title: String,
    pub summary: String,
}

impl Abstract {
    pub fn new(title: &str, summary: &str) -> Self {
        Self {
            title: title.to_string(),
            summary: summary.to_string(),
        }
    }
}

impl Titled for Abstract {
    fn text(&self) -> &str {
        &self.title
    }
}

impl Summarized for Abstract {
    fn summary(&self) -> &str {
        &self.summary
    }
}

facet_value!(Abstract: Summarized);

#[derive(Debug, Clone, PartialEq)]
pub struct Owner(pub String);

impl Owner {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl Owned for Owner {
    fn owner(&self) -> &str {
        &self.0
    }
}

facet_value!(Owner: Owned);

/// Implements no capability.
#[derive(Debug)]
pub struct Scratch;

facet_value!(Scratch);
