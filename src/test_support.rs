//! Facet fixtures shared by unit tests.

use crate::core::facet::Facet;

pub trait Titled: Facet {
    fn text(&self) -> &str;
}

pub trait Headline: Titled {}

pub trait Tagged: Facet {
    fn tag(&self) -> &str;
}

crate::capability!(Titled);
crate::capability!(Headline: Titled);
crate::capability!(Tagged);

#[derive(Debug, Clone, PartialEq)]
pub struct TitleValue {
    pub text: String,
}

impl TitleValue {
    pub fn new(text: &str) -> Self {
        Self { text: text.into() }
    }
}

impl Titled for TitleValue {
    fn text(&self) -> &str {
        &self.text
    }
}

impl Headline for TitleValue {}

crate::facet_value!(TitleValue: Headline);

#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub name: String,
}

impl Author {
    pub fn new(name: &str) -> Self {
        Self { name: name.into() }
    }
}

impl Tagged for Author {
    fn tag(&self) -> &str {
        "author"
    }
}

impl Titled for Author {
    fn text(&self) -> &str {
        &self.name
    }
}

crate::facet_value!(Author: Tagged, Titled);

#[derive(Debug, Clone, PartialEq)]
pub struct Label(pub &'static str);

impl Tagged for Label {
    fn tag(&self) -> &str {
        self.0
    }
}

crate::facet_value!(Label: Tagged);

/// A value implementing no capability.
#[derive(Debug, Clone, PartialEq)]
pub struct Plain;

crate::facet_value!(Plain);
