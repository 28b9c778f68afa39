//! In-memory document model
//!
//! A small element tree with just enough of the DOM to host the dashboard:
//! ids, classes, text content, child lists and a vertical scroll offset.
//! Scroll distances are measured in table rows.

use std::fmt::Write as _;

use super::{DashboardView, CLIENTS_LIST, CLIENT_COUNT, LOGS_LIST, LOGS_VIEWPORT};
use crate::error::{DashboardError, DashboardResult};
use crate::status::StatusSnapshot;

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    /// Space-separated class list, as in `className`
    pub class_name: String,
    /// Text owned directly by this element
    pub text: String,
    pub children: Vec<Element>,
    pub scroll_top: usize,
}

/// Simple CSS selector: `#id`, `.class` or a tag name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(String),
    Class(String),
    Tag(String),
}

impl Selector {
    pub fn parse(selector: &str) -> Self {
        if let Some(id) = selector.strip_prefix('#') {
            Selector::Id(id.to_string())
        } else if let Some(class) = selector.strip_prefix('.') {
            Selector::Class(class.to_string())
        } else {
            Selector::Tag(selector.to_string())
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Selector::Id(id) => element.id.as_deref() == Some(id.as_str()),
            Selector::Class(class) => element.has_class(class),
            Selector::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
        }
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_name.split_whitespace().any(|c| c == class)
    }

    /// Concatenated text of this element and all descendants
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Replace all content with a single text value
    pub fn set_text_content(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.text = text.into();
    }

    pub fn append_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Drop all children, then append `children` in order
    pub fn replace_children(&mut self, children: impl IntoIterator<Item = Element>) {
        self.children.clear();
        self.children.extend(children);
    }

    /// Child elements that are table rows
    pub fn rows(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter(|c| c.tag == "tr")
    }

    /// Text of each cell in each row, for assertions and debugging
    pub fn row_texts(&self) -> Vec<Vec<String>> {
        self.rows()
            .map(|row| row.children.iter().map(Element::text_content).collect())
            .collect()
    }

    /// Total content height in rows
    pub fn scroll_height(&self) -> usize {
        self.children
            .iter()
            .map(|c| usize::from(c.tag == "tr") + c.scroll_height())
            .sum()
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.scroll_height();
    }

    /// First matching element in document order, including `self`
    pub fn find(&self, selector: &Selector) -> Option<&Element> {
        if selector.matches(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(selector))
    }

    pub fn find_mut(&mut self, selector: &Selector) -> Option<&mut Element> {
        if selector.matches(self) {
            return Some(self);
        }
        for child in &mut self.children {
            if let Some(found) = child.find_mut(selector) {
                return Some(found);
            }
        }
        None
    }

    fn write_html(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{}<{}", indent, self.tag);
        if let Some(id) = &self.id {
            let _ = write!(out, " id=\"{}\"", escape_html(id));
        }
        if !self.class_name.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape_html(&self.class_name));
        }
        out.push('>');

        if self.children.is_empty() {
            out.push_str(&escape_html(&self.text));
        } else {
            out.push('\n');
            if !self.text.is_empty() {
                let _ = writeln!(out, "{}  {}", indent, escape_html(&self.text));
            }
            for child in &self.children {
                child.write_html(out, depth + 1);
            }
            out.push_str(&indent);
        }

        let _ = writeln!(out, "</{}>", self.tag);
    }
}

/// A page: a tree of elements under a single root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// The dashboard page skeleton with every element the renderer needs
    pub fn dashboard() -> Self {
        let header_row = |labels: &[&str]| {
            labels.iter().fold(Element::new("tr"), |row, label| {
                row.child(Element::new("th").with_text(*label))
            })
        };

        let body = Element::new("body")
            .child(Element::new("h1").with_text("Whisper Chat Server"))
            .child(
                Element::new("div").with_class("stats").child(
                    Element::new("p")
                        .with_text("Connected clients: ")
                        .child(Element::new("span").with_id("client-count").with_text("0")),
                ),
            )
            .child(
                Element::new("div").with_class("clients").child(
                    Element::new("table")
                        .child(Element::new("thead").child(header_row(&["Username"])))
                        .child(Element::new("tbody").with_id("clients-list")),
                ),
            )
            .child(
                Element::new("div").with_class("logs").child(
                    Element::new("table")
                        .child(
                            Element::new("thead")
                                .child(header_row(&["Timestamp", "Type", "Message"])),
                        )
                        .child(Element::new("tbody").with_id("logs-list")),
                ),
            );

        Self::new(Element::new("html").child(body))
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn query_selector(&self, selector: &str) -> Option<&Element> {
        self.root.find(&Selector::parse(selector))
    }

    pub fn query_selector_mut(&mut self, selector: &str) -> Option<&mut Element> {
        self.root.find_mut(&Selector::parse(selector))
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<&Element> {
        self.root.find(&Selector::Id(id.to_string()))
    }

    pub fn get_element_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.root.find_mut(&Selector::Id(id.to_string()))
    }

    /// Look up an element that must exist
    pub fn require(&self, selector: &str) -> DashboardResult<&Element> {
        self.query_selector(selector)
            .ok_or_else(|| DashboardError::MissingElement(selector.to_string()))
    }

    pub fn require_mut(&mut self, selector: &str) -> DashboardResult<&mut Element> {
        self.query_selector_mut(selector)
            .ok_or_else(|| DashboardError::MissingElement(selector.to_string()))
    }

    /// Serialize the tree as indented HTML
    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n");
        self.root.write_html(&mut out, 0);
        out
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::dashboard()
    }
}

impl DashboardView for Document {
    fn render(&mut self, snapshot: &StatusSnapshot) -> DashboardResult<()> {
        // Fail before touching anything so a broken page is never half-rendered
        for selector in [CLIENT_COUNT, CLIENTS_LIST, LOGS_LIST, LOGS_VIEWPORT] {
            self.require(selector)?;
        }

        self.require_mut(CLIENT_COUNT)?
            .set_text_content(snapshot.client_count.to_string());

        self.require_mut(CLIENTS_LIST)?
            .replace_children(snapshot.clients.iter().map(|client| {
                Element::new("tr").child(Element::new("td").with_text(client.as_str()))
            }));

        self.require_mut(LOGS_LIST)?
            .replace_children(snapshot.logs.iter().map(|entry| {
                Element::new("tr")
                    .child(Element::new("td").with_text(entry.timestamp.as_str()))
                    .child(
                        Element::new("td")
                            .with_text(entry.kind.as_str())
                            .with_class(entry.css_class()),
                    )
                    .child(Element::new("td").with_text(entry.message.as_str()))
            }));

        self.require_mut(LOGS_VIEWPORT)?.scroll_to_bottom();

        Ok(())
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{parse_snapshot, LogEntry};

    fn sample_snapshot() -> StatusSnapshot {
        parse_snapshot(
            br#"{"client_count": 2, "clients": ["alice","bob"],
                 "logs": [{"timestamp":"12:00:00","type":"INFO","message":"started"}]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_dashboard_skeleton() {
        let doc = Document::dashboard();

        assert_eq!(doc.require(CLIENT_COUNT).unwrap().text_content(), "0");
        assert_eq!(doc.require(CLIENTS_LIST).unwrap().rows().count(), 0);
        assert_eq!(doc.require(LOGS_LIST).unwrap().rows().count(), 0);
        assert!(doc.query_selector(LOGS_VIEWPORT).is_some());
    }

    #[test]
    fn test_selectors() {
        let doc = Document::dashboard();

        assert_eq!(doc.query_selector("h1").unwrap().text, "Whisper Chat Server");
        assert_eq!(doc.query_selector(".logs").unwrap().tag, "div");
        assert_eq!(doc.get_element_by_id("logs-list").unwrap().tag, "tbody");
        assert!(doc.query_selector("#nope").is_none());
        assert!(doc.query_selector(".nope").is_none());
    }

    #[test]
    fn test_replace_children() {
        let mut doc = Document::dashboard();
        let list = doc.get_element_by_id_mut("clients-list").unwrap();
        list.append_child(Element::new("tr").with_text("stale"));

        list.replace_children(
            ["dave", "erin"]
                .iter()
                .map(|name| Element::new("tr").child(Element::new("td").with_text(*name))),
        );
        assert_eq!(
            list.row_texts(),
            vec![vec!["dave".to_string()], vec!["erin".to_string()]]
        );

        list.replace_children(std::iter::empty());
        assert_eq!(doc.require(CLIENTS_LIST).unwrap().rows().count(), 0);
    }

    #[test]
    fn test_multiple_classes() {
        let el = Element::new("td").with_class("cell error");
        assert!(el.has_class("error"));
        assert!(el.has_class("cell"));
        assert!(!el.has_class("err"));
    }

    #[test]
    fn test_render_scenario() {
        let mut doc = Document::dashboard();
        doc.render(&sample_snapshot()).unwrap();

        assert_eq!(doc.require(CLIENT_COUNT).unwrap().text_content(), "2");
        assert_eq!(
            doc.require(CLIENTS_LIST).unwrap().row_texts(),
            vec![vec!["alice".to_string()], vec!["bob".to_string()]]
        );

        let logs = doc.require(LOGS_LIST).unwrap();
        assert_eq!(
            logs.row_texts(),
            vec![vec![
                "12:00:00".to_string(),
                "INFO".to_string(),
                "started".to_string()
            ]]
        );
        let type_cell = &logs.rows().next().unwrap().children[1];
        assert_eq!(type_cell.class_name, "info");
    }

    #[test]
    fn test_render_empty_snapshot() {
        let mut doc = Document::dashboard();
        doc.render(&sample_snapshot()).unwrap();
        doc.render(&StatusSnapshot::empty()).unwrap();

        assert_eq!(doc.require(CLIENT_COUNT).unwrap().text_content(), "0");
        assert_eq!(doc.require(CLIENTS_LIST).unwrap().rows().count(), 0);
        assert_eq!(doc.require(LOGS_LIST).unwrap().rows().count(), 0);
    }

    #[test]
    fn test_render_is_idempotent() {
        let snapshot = sample_snapshot();

        let mut once = Document::dashboard();
        once.render(&snapshot).unwrap();

        let mut twice = Document::dashboard();
        twice.render(&snapshot).unwrap();
        twice.render(&snapshot).unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice.require(CLIENTS_LIST).unwrap().rows().count(), 2);
    }

    #[test]
    fn test_render_scrolls_logs_to_bottom() {
        let mut doc = Document::dashboard();
        let snapshot = StatusSnapshot {
            client_count: 0,
            clients: vec![],
            logs: (0..5)
                .map(|i| LogEntry::new(format!("12:00:0{}", i), "MESSAGE", format!("m{}", i)))
                .collect(),
        };
        doc.render(&snapshot).unwrap();

        let viewport = doc.require(LOGS_VIEWPORT).unwrap();
        // Five log rows plus the header row
        assert_eq!(viewport.scroll_height(), 6);
        assert_eq!(viewport.scroll_top, viewport.scroll_height());
    }

    #[test]
    fn test_render_missing_element_leaves_page_untouched() {
        let mut doc = Document::new(
            Element::new("body")
                .child(Element::new("span").with_id("client-count").with_text("7"))
                .child(Element::new("tbody").with_id("clients-list")),
        );
        let before = doc.clone();

        let err = doc.render(&sample_snapshot()).unwrap_err();
        assert!(matches!(err, DashboardError::MissingElement(ref s) if s == LOGS_LIST));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_client_text_is_escaped_in_html() {
        let mut doc = Document::dashboard();
        let snapshot = StatusSnapshot {
            client_count: 1,
            clients: vec!["<script>alert('x')</script>".to_string()],
            logs: vec![],
        };
        doc.render(&snapshot).unwrap();

        // Text is stored verbatim and only escaped on output
        assert_eq!(
            doc.require(CLIENTS_LIST).unwrap().row_texts()[0][0],
            "<script>alert('x')</script>"
        );
        let html = doc.to_html();
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_to_html_structure() {
        let mut doc = Document::dashboard();
        doc.render(&sample_snapshot()).unwrap();
        let html = doc.to_html();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<span id=\"client-count\">2</span>"));
        assert!(html.contains("<td class=\"info\">INFO</td>"));
        assert!(html.contains("<div class=\"logs\">"));
    }
}
