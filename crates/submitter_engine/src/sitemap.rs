//! Sitemap XML parsing.
//!
//! A document is read once and three kinds of `<loc>` are collected:
//!
//! - `<url><loc>` directly under the root, in the sitemap namespace
//! - `<url><loc>` anywhere below the root, without a namespace
//! - `<sitemap><loc>` directly under the root, in the sitemap namespace
//!
//! The first non-empty kind in that order decides what the document is. Only the first
//! matching `<loc>` of an entry counts.

use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use crate::{EngineError, FailureKind};

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// Page URLs in document order.
    UrlSet(Vec<String>),
    /// Locations of child sitemaps in document order.
    Index(Vec<String>),
    /// Neither page entries nor child sitemaps.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ns {
    Sitemap,
    Unbound,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    NamespacedUrl,
    PlainUrl,
    ChildSitemap,
}

struct Frame {
    ns: Ns,
    local: Vec<u8>,
    loc_seen: bool,
}

struct Capture {
    target: Target,
    depth: usize,
    text: String,
}

#[derive(Default)]
struct Locations {
    namespaced_urls: Vec<String>,
    plain_urls: Vec<String>,
    child_sitemaps: Vec<String>,
}

pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, EngineError> {
    let found = collect_locations(xml)?;
    let document = if !found.namespaced_urls.is_empty() {
        SitemapDocument::UrlSet(found.namespaced_urls)
    } else if !found.plain_urls.is_empty() {
        SitemapDocument::UrlSet(found.plain_urls)
    } else if !found.child_sitemaps.is_empty() {
        SitemapDocument::Index(found.child_sitemaps)
    } else {
        SitemapDocument::Empty
    };
    Ok(document)
}

fn collect_locations(xml: &str) -> Result<Locations, EngineError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut found = Locations::default();
    let mut stack: Vec<Frame> = Vec::new();
    let mut capture: Option<Capture> = None;
    let mut seen_root = false;

    loop {
        let (ns, event) = match reader.read_resolved_event() {
            Ok((resolved, event)) => (classify(&resolved), event),
            Err(err) => return Err(parse_error(format!("XML parse error: {err}"))),
        };

        match event {
            Event::Start(start) => {
                enter_element(&mut stack, &mut seen_root)?;
                let local = start.local_name().as_ref().to_vec();
                if local == b"loc" && capture.is_none() {
                    if let Some(target) = claim_loc(&mut stack, ns) {
                        capture = Some(Capture {
                            target,
                            depth: stack.len(),
                            text: String::new(),
                        });
                    }
                }
                stack.push(Frame {
                    ns,
                    local,
                    loc_seen: false,
                });
            }
            Event::Empty(start) => {
                enter_element(&mut stack, &mut seen_root)?;
                if start.local_name().as_ref() == b"loc" {
                    // An empty first <loc> still uses up the entry.
                    claim_loc(&mut stack, ns);
                }
            }
            Event::Text(text) => {
                if let Some(capture) = capture.as_mut() {
                    if stack.len() == capture.depth + 1 {
                        let text = text
                            .unescape()
                            .map_err(|err| parse_error(format!("bad text in <loc>: {err}")))?;
                        capture.text.push_str(&text);
                    }
                }
            }
            Event::CData(data) => {
                if let Some(capture) = capture.as_mut() {
                    if stack.len() == capture.depth + 1 {
                        capture.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
            }
            Event::End(_) => {
                if stack.pop().is_none() {
                    return Err(parse_error("closing tag without matching opening tag"));
                }
                if capture.as_ref().is_some_and(|c| c.depth == stack.len()) {
                    if let Some(done) = capture.take() {
                        found.record(done);
                    }
                }
            }
            Event::Eof => {
                if !stack.is_empty() {
                    return Err(parse_error("unexpected end of document"));
                }
                if !seen_root {
                    return Err(parse_error("no root element found"));
                }
                break;
            }
            _ => {}
        }
    }

    Ok(found)
}

fn enter_element(stack: &mut [Frame], seen_root: &mut bool) -> Result<(), EngineError> {
    if stack.is_empty() {
        if *seen_root {
            return Err(parse_error("content after the root element"));
        }
        *seen_root = true;
    }
    Ok(())
}

/// Decides whether a `<loc>` opening under the current top of `stack` is one we collect,
/// and marks the parent entry as consumed if so.
fn claim_loc(stack: &mut [Frame], loc_ns: Ns) -> Option<Target> {
    let depth = stack.len();
    let parent = stack.last_mut()?;
    if parent.loc_seen {
        return None;
    }

    let target = match (parent.ns, parent.local.as_slice(), loc_ns) {
        (Ns::Sitemap, b"url", Ns::Sitemap) if depth == 2 => Target::NamespacedUrl,
        (Ns::Unbound, b"url", Ns::Unbound) if depth >= 2 => Target::PlainUrl,
        (Ns::Sitemap, b"sitemap", Ns::Sitemap) if depth == 2 => Target::ChildSitemap,
        _ => return None,
    };
    parent.loc_seen = true;
    Some(target)
}

impl Locations {
    fn record(&mut self, capture: Capture) {
        let value = capture.text.trim();
        if value.is_empty() {
            return;
        }
        let list = match capture.target {
            Target::NamespacedUrl => &mut self.namespaced_urls,
            Target::PlainUrl => &mut self.plain_urls,
            Target::ChildSitemap => &mut self.child_sitemaps,
        };
        list.push(value.to_string());
    }
}

fn classify(resolved: &ResolveResult<'_>) -> Ns {
    match resolved {
        ResolveResult::Bound(ns) if ns.as_ref() == SITEMAP_NAMESPACE.as_bytes() => Ns::Sitemap,
        ResolveResult::Unbound => Ns::Unbound,
        _ => Ns::Other,
    }
}

fn parse_error(message: impl Into<String>) -> EngineError {
    EngineError::new(FailureKind::Parse, message)
}
