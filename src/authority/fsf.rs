use std::borrow::Cow;

use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

use super::{ApprovalList, Transport};
use crate::error::{Error, Result};
use crate::models::{Authority, Source};

pub const FSF_LICENSES_URL: &str = "https://www.gnu.org/licenses/license-list.en.html";

/// Class carried by the sections that list free licenses.
const APPROVED_CLASS: &str = "green";

/// HTML elements that never have an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Fetch and scrape the FSF free license list.
pub async fn fetch_approved<T: Transport>(transport: &T, url: &str) -> Result<ApprovalList> {
    let body = transport.get(url).await.map_err(|cause| Error::Fetch {
        origin: Source::Fsf,
        cause,
    })?;
    parse_approved(&body)
}

/// An open element and whether it sits in an approved section.
struct Open {
    name: String,
    approved: bool,
}

/// Anchor currently being read inside an approved `<dt>`.
struct Anchor {
    id: Option<String>,
    text: String,
}

/// State of the approved `<dt>` currently open.
#[derive(Default)]
struct Term {
    found: Option<(String, String)>,
}

/// Scrape `.green dt` terms: the first anchor of each term carrying an `id`
/// and non-empty text yields `normalize(id)` → trimmed text.
///
/// Fails with [`Error::Scrape`] if the markup cannot be tokenized or no term
/// qualifies, since an empty list means the page layout moved.
pub fn parse_approved(html: &str) -> Result<ApprovalList> {
    let mut reader = Reader::from_str(html);
    {
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
    }

    let mut list = ApprovalList::new(Authority::Fsf);
    let mut stack: Vec<Open> = Vec::new();
    let mut term: Option<Term> = None;
    let mut anchor: Option<Anchor> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = element_name(e.name().as_ref());
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    continue;
                }

                let approved = stack.last().is_some_and(|o| o.approved)
                    || has_class(&e, APPROVED_CLASS);

                if name == "dt" {
                    // An unclosed previous term ends where the next one starts.
                    close_term(&mut term, &mut anchor, &mut list);
                    if approved {
                        term = Some(Term::default());
                    }
                } else if name == "a" && anchor.is_none() {
                    if let Some(t) = &term {
                        if t.found.is_none() {
                            anchor = Some(Anchor {
                                id: attribute(&e, "id"),
                                text: String::new(),
                            });
                        }
                    }
                }

                stack.push(Open { name, approved });
            }
            Ok(Event::Text(e)) => {
                if let Some(a) = anchor.as_mut() {
                    a.text.push_str(&text_of(&e));
                }
            }
            Ok(Event::End(e)) => {
                let name = element_name(e.name().as_ref());
                // Closing an element implicitly closes everything opened inside it.
                if let Some(pos) = stack.iter().rposition(|o| o.name == name) {
                    for open in stack.drain(pos..).rev() {
                        match open.name.as_str() {
                            "a" => close_anchor(&mut term, &mut anchor),
                            "dt" => close_term(&mut term, &mut anchor, &mut list),
                            _ => {}
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::scrape(
                    Source::Fsf,
                    format!("unreadable markup at byte {}: {}", reader.buffer_position(), e),
                ))
            }
            _ => {}
        }
    }
    close_term(&mut term, &mut anchor, &mut list);

    if list.is_empty() {
        return Err(Error::scrape(
            Source::Fsf,
            format!("no `.{} dt` anchors with an id and text", APPROVED_CLASS),
        ));
    }

    // The FSF lists Clear BSD under its own anchor rather than the SPDX id.
    list.alias("clearbsd", "bsd-3-clause-clear");

    tracing::debug!(licenses = list.len(), "scraped FSF license list");
    Ok(list)
}

fn close_anchor(term: &mut Option<Term>, anchor: &mut Option<Anchor>) {
    let Some(a) = anchor.take() else {
        return;
    };
    let Some(t) = term.as_mut() else {
        return;
    };
    let text = a.text.trim();
    match a.id {
        Some(id) if !id.trim().is_empty() && !text.is_empty() && t.found.is_none() => {
            t.found = Some((id, text.to_string()));
        }
        _ => {}
    }
}

fn close_term(term: &mut Option<Term>, anchor: &mut Option<Anchor>, list: &mut ApprovalList) {
    close_anchor(term, anchor);
    if let Some((id, name)) = term.take().and_then(|t| t.found) {
        list.insert(&id, &name);
    }
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Option<String> {
    e.html_attributes()
        .flatten()
        .find(|a| a.key.as_ref().eq_ignore_ascii_case(key.as_bytes()))
        .map(|a| match a.unescape_value_with(resolve_html5_entity) {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&a.value).into_owned(),
        })
}

fn has_class(e: &BytesStart<'_>, class: &str) -> bool {
    attribute(e, "class").is_some_and(|v| v.split_whitespace().any(|c| c == class))
}

/// Text content with HTML entities decoded; raw bytes if an entity is unknown.
fn text_of<'a>(e: &'a BytesText<'a>) -> Cow<'a, str> {
    match e.unescape_with(resolve_html5_entity) {
        Ok(text) => text,
        Err(_) => String::from_utf8_lossy(e),
    }
}
