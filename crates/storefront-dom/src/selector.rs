//! CSS Selectors
//!
//! Parses selector lists and matches them against document elements.
//! Supports type, universal, id, class and attribute selectors, descendant
//! and child combinators, and the pseudo-classes storefront scripts rely on.
//! `:focus-visible` is only understood when the document's runtime supports
//! it, so feature checks behave like they do in an older browser.

use crate::{Document, NodeId, RuntimeFeatures};

/// Selector parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Unexpected end of selector")]
    UnexpectedEnd,

    #[error("Unsupported pseudo-class ':{0}'")]
    UnsupportedPseudoClass(String),

    #[error("Unsupported pseudo-element '::{0}'")]
    UnsupportedPseudoElement(String),
}

/// Pseudo-class type
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    // Input pseudo-classes
    Enabled,
    Disabled,

    // User action pseudo-classes
    Focus,
    FocusVisible,
    FocusWithin,

    // Tree-structural pseudo-classes
    Root,
    Empty,
    FirstChild,
    LastChild,

    // Logical pseudo-classes
    Not(SelectorList),
    Is(SelectorList),
}

/// A component of a compound selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :enabled, :not(), etc.
    PseudoClass(PseudoClass),
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let (matcher, value) = match (&self.matcher, value) {
            (_, None) => return false,
            (None, Some(_)) => return true,
            (Some(matcher), Some(value)) => (matcher, value),
        };

        let fold = |s: &str| if self.case_insensitive { s.to_lowercase() } else { s.to_string() };
        let val = fold(value);

        match matcher {
            AttributeMatcher::Exact(expected) => val == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                val.split_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                val == expected || val.starts_with(&format!("{expected}-"))
            }
            // Empty operands never match for the substring matchers
            AttributeMatcher::Prefix(expected) => !expected.is_empty() && val.starts_with(&fold(expected)),
            AttributeMatcher::Suffix(expected) => !expected.is_empty() && val.ends_with(&fold(expected)),
            AttributeMatcher::Substring(expected) => !expected.is_empty() && val.contains(&fold(expected)),
        }
    }
}

/// How two compound selectors relate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
}

/// Sequence of components that all apply to one element
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

/// Compound selectors joined by combinators, e.g. `[id^="Details-"] summary`
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    pub combinators: Vec<Combinator>,
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Parse with every supported feature enabled
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Self::parse_with(input, RuntimeFeatures::default())
    }

    /// Parse against a runtime's capabilities
    pub fn parse_with(input: &str, features: RuntimeFeatures) -> Result<Self, SelectorError> {
        let mut parser = Parser::new(input, features);
        parser.skip_whitespace();
        if parser.at_end() {
            return Err(SelectorError::Empty);
        }
        let list = parser.parse_list(false)?;
        match parser.peek() {
            None => Ok(list),
            Some(ch) => Err(SelectorError::UnexpectedChar { ch, pos: parser.pos }),
        }
    }

    /// Number of complex selectors in the list
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Check whether an element matches any selector in the list
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        doc.tree().element(id).is_some()
            && self.selectors.iter().any(|sel| sel.matches(doc, id))
    }
}

impl ComplexSelector {
    /// Match right-to-left, backtracking over ancestors for descendant combinators
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_from(n - 1, doc, id),
        }
    }

    fn matches_from(&self, index: usize, doc: &Document, id: NodeId) -> bool {
        if !self.compounds[index].matches(doc, id) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => doc
                .parent_element(id)
                .is_some_and(|parent| self.matches_from(index - 1, doc, parent)),
            Combinator::Descendant => doc
                .tree()
                .ancestors(id)
                .filter(|&a| doc.tree().element(a).is_some())
                .any(|a| self.matches_from(index - 1, doc, a)),
        }
    }
}

impl CompoundSelector {
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        self.components.iter().all(|c| match_component(c, doc, id))
    }
}

/// Match a selector component against an element
pub fn match_component(component: &SelectorComponent, doc: &Document, id: NodeId) -> bool {
    let Some(el) = doc.tree().element(id) else { return false };
    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => el.tag == *tag,
        SelectorComponent::Id(expected) => el.get_attr("id") == Some(expected.as_str()),
        SelectorComponent::Class(class) => el.classes.contains(class),
        SelectorComponent::Attribute(attr) => attr.matches(el.get_attr(&attr.name)),
        SelectorComponent::PseudoClass(pseudo) => match_pseudo_class(pseudo, doc, id),
    }
}

/// Match a pseudo-class against an element
pub fn match_pseudo_class(pseudo: &PseudoClass, doc: &Document, id: NodeId) -> bool {
    match pseudo {
        PseudoClass::Enabled => doc.is_disableable(id) && !doc.is_disabled(id),
        PseudoClass::Disabled => doc.is_disableable(id) && doc.is_disabled(id),

        PseudoClass::Focus => doc.active_element() == Some(id),
        PseudoClass::FocusVisible => doc.focus_visible_element() == Some(id),
        PseudoClass::FocusWithin => doc
            .active_element()
            .is_some_and(|active| doc.tree().is_inclusive_ancestor(id, active)),

        PseudoClass::Root => id == doc.document_element(),
        PseudoClass::Empty => doc.tree().children(id).all(|c| {
            doc.tree()
                .get(c)
                .is_some_and(|n| !n.is_element() && n.as_text().is_none_or(str::is_empty))
        }),
        PseudoClass::FirstChild => doc.parent_element(id).is_some_and(|p| {
            doc.tree().element_children(p).next() == Some(id)
        }),
        PseudoClass::LastChild => doc.parent_element(id).is_some_and(|p| {
            doc.tree().element_children(p).last() == Some(id)
        }),

        PseudoClass::Not(list) => !list.matches(doc, id),
        PseudoClass::Is(list) => list.matches(doc, id),
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    features: RuntimeFeatures,
}

impl Parser {
    fn new(input: &str, features: RuntimeFeatures) -> Self {
        Self { chars: input.chars().collect(), pos: 0, features }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(ch) => SelectorError::UnexpectedChar { ch, pos: self.pos },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, want: char) -> Result<(), SelectorError> {
        if self.peek() == Some(want) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Skip whitespace, returning whether any was skipped
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn parse_list(&mut self, nested: bool) -> Result<SelectorList, SelectorError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                }
                Some(')') if nested => break,
                None => break,
                Some(_) => return Err(self.unexpected()),
            }
        }
        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    Combinator::Child
                }
                None | Some(',') | Some(')') => break,
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector { compounds, combinators })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut components = Vec::new();

        loop {
            let component = match self.peek() {
                Some('*') if components.is_empty() => {
                    self.pos += 1;
                    SelectorComponent::Universal
                }
                Some(ch) if components.is_empty() && is_ident_start(ch) => {
                    SelectorComponent::Type(self.parse_ident()?.to_ascii_lowercase())
                }
                Some('#') => {
                    self.pos += 1;
                    SelectorComponent::Id(self.parse_ident()?)
                }
                Some('.') => {
                    self.pos += 1;
                    SelectorComponent::Class(self.parse_ident()?)
                }
                Some('[') => SelectorComponent::Attribute(self.parse_attribute()?),
                Some(':') => SelectorComponent::PseudoClass(self.parse_pseudo()?),
                _ => break,
            };
            components.push(component);
        }

        if components.is_empty() {
            return Err(self.unexpected());
        }
        Ok(CompoundSelector { components })
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.unexpected());
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.expect('[')?;
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(AttributeSelector { name, matcher: None, case_insensitive: false });
        }

        let op = match self.bump() {
            Some('=') => '=',
            Some(op @ ('~' | '|' | '^' | '$' | '*')) => {
                self.expect('=')?;
                op
            }
            Some(_) => {
                self.pos -= 1;
                return Err(self.unexpected());
            }
            None => return Err(SelectorError::UnexpectedEnd),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                let value: String = self.chars[start..self.pos].iter().collect();
                self.expect(quote)?;
                value
            }
            _ => self.parse_ident()?,
        };

        self.skip_whitespace();
        let case_insensitive = match self.peek() {
            Some('i' | 'I') => {
                self.pos += 1;
                self.skip_whitespace();
                true
            }
            Some('s' | 'S') => {
                self.pos += 1;
                self.skip_whitespace();
                false
            }
            _ => false,
        };
        self.expect(']')?;

        let matcher = match op {
            '=' => AttributeMatcher::Exact(value),
            '~' => AttributeMatcher::Contains(value),
            '|' => AttributeMatcher::DashMatch(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            _ => AttributeMatcher::Substring(value),
        };
        Ok(AttributeSelector { name, matcher: Some(matcher), case_insensitive })
    }

    fn parse_pseudo(&mut self) -> Result<PseudoClass, SelectorError> {
        self.expect(':')?;
        if self.peek() == Some(':') {
            self.pos += 1;
            let name = self.parse_ident()?;
            return Err(SelectorError::UnsupportedPseudoElement(name));
        }

        let name = self.parse_ident()?.to_ascii_lowercase();
        let pseudo = match name.as_str() {
            "enabled" => PseudoClass::Enabled,
            "disabled" => PseudoClass::Disabled,
            "focus" => PseudoClass::Focus,
            "focus-visible" if self.features.focus_visible_selector => PseudoClass::FocusVisible,
            "focus-within" => PseudoClass::FocusWithin,
            "root" => PseudoClass::Root,
            "empty" => PseudoClass::Empty,
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "not" | "is" => {
                self.expect('(')?;
                let list = self.parse_list(true)?;
                self.expect(')')?;
                if name == "not" { PseudoClass::Not(list) } else { PseudoClass::Is(list) }
            }
            _ => return Err(SelectorError::UnsupportedPseudoClass(name)),
        };
        Ok(pseudo)
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '-' || !ch.is_ascii()
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' || !ch.is_ascii()
}
