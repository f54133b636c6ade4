//! Selector evaluation over fetched pages
//!
//! Matched elements are copied out of the parsed document into owned
//! `Element` values, so results can cross task boundaries and reach user
//! callbacks without exposing the DOM.

use crate::crawler::fetcher::FetchedPage;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use url::Url;

/// Attributes consulted, in order, when a link element is turned into a URL
const HREF_ATTRIBUTES: &[&str] = &["href", "src"];

/// An element matched by a selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name, lowercase
    pub name: String,

    /// All attributes of the element
    pub attributes: BTreeMap<String, String>,

    /// Concatenated text content, trimmed
    pub text: String,

    /// Outer HTML
    pub html: String,
}

impl Element {
    /// Returns the value of an attribute
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns the element's link target (`href`, falling back to `src`)
    pub fn href(&self) -> Option<&str> {
        HREF_ATTRIBUTES.iter().find_map(|name| self.attr(name))
    }

    fn from_ref(element: ElementRef<'_>) -> Self {
        let value = element.value();
        Self {
            name: value.name().to_string(),
            attributes: value
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            text: element.text().collect::<String>().trim().to_string(),
            html: element.html(),
        }
    }
}

/// Elements matched by one selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorMatch {
    pub selector: String,
    pub elements: Vec<Element>,
}

/// Everything extracted from one visited page
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The URL that was visited (as claimed from the frontier)
    pub url: Url,

    /// Matches for the configured link selectors, in configuration order
    pub links: Vec<SelectorMatch>,

    /// Matches for the configured content selectors, in configuration order
    pub content: Vec<SelectorMatch>,
}

impl Extraction {
    /// Link targets of every matched link element
    pub fn hrefs(&self) -> impl Iterator<Item = &str> {
        self.links
            .iter()
            .flat_map(|m| m.elements.iter())
            .filter_map(Element::href)
    }

    /// Total number of matched link elements
    pub fn link_element_count(&self) -> usize {
        self.links.iter().map(|m| m.elements.len()).sum()
    }
}

/// A selector could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorFailure {
    pub selector: String,
    pub message: String,
}

/// Capability that evaluates selectors against a fetched page
pub trait SelectorEvaluator: Send + Sync {
    /// Evaluates every selector against the page
    ///
    /// Returns one `SelectorMatch` per selector, in input order. Any selector
    /// failure fails the whole evaluation.
    fn evaluate(
        &self,
        page: &FetchedPage,
        selectors: &[String],
    ) -> Result<Vec<SelectorMatch>, SelectorFailure>;
}

/// CSS selector evaluator backed by `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperEvaluator;

impl ScraperEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl SelectorEvaluator for ScraperEvaluator {
    fn evaluate(
        &self,
        page: &FetchedPage,
        selectors: &[String],
    ) -> Result<Vec<SelectorMatch>, SelectorFailure> {
        let compiled = selectors
            .iter()
            .map(|s| {
                Selector::parse(s).map_err(|e| SelectorFailure {
                    selector: s.clone(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let document = Html::parse_document(&page.body);

        Ok(selectors
            .iter()
            .zip(compiled.iter())
            .map(|(source, selector)| SelectorMatch {
                selector: source.clone(),
                elements: document.select(selector).map(Element::from_ref).collect(),
            })
            .collect())
    }
}
