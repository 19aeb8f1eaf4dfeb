//! Paragraph and run content.

use super::format::{ParagraphFormat, RunFormat};
use super::xml::XmlElement;

pub fn new_paragraph() -> XmlElement {
    XmlElement::new("w:p")
}

/// A run holding `text`, with tabs and line breaks expanded.
pub fn new_run(text: &str) -> XmlElement {
    let mut run = XmlElement::new("w:r");
    set_run_text(&mut run, text);
    run
}

/// Visible text of a run.
pub fn run_text(run: &XmlElement) -> String {
    let mut text = String::new();
    for child in run.elements() {
        match child.name.as_str() {
            "w:t" => text.push_str(&child.text()),
            "w:tab" | "w:ptab" => text.push('\t'),
            "w:br" => match child.attr("w:type") {
                Some("page") | Some("column") => {}
                _ => text.push('\n'),
            },
            "w:cr" => text.push('\n'),
            "w:noBreakHyphen" => text.push('-'),
            _ => {}
        }
    }
    text
}

/// Replace a run's content, keeping its `w:rPr`.
pub fn set_run_text(run: &mut XmlElement, text: &str) {
    run.retain_elements(|child| child.is("w:rPr"));

    let mut pending = String::new();
    for ch in text.chars() {
        match ch {
            '\t' => {
                flush_text(run, &mut pending);
                run.push(XmlElement::new("w:tab"));
            }
            '\n' | '\r' => {
                flush_text(run, &mut pending);
                run.push(XmlElement::new("w:br"));
            }
            other => pending.push(other),
        }
    }
    flush_text(run, &mut pending);
}

fn flush_text(run: &mut XmlElement, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let text = std::mem::take(pending);
    let mut element = XmlElement::new("w:t");
    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        element.set_attr("xml:space", "preserve");
    }
    run.push(element.with_text(text));
}

/// Read-only view of a `w:p`.
#[derive(Clone, Copy)]
pub struct Paragraph<'a> {
    element: &'a XmlElement,
}

impl<'a> Paragraph<'a> {
    pub fn new(element: &'a XmlElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &'a XmlElement {
        self.element
    }

    /// Text of direct runs and of runs nested in hyperlinks.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for child in self.element.elements() {
            match child.name.as_str() {
                "w:r" => text.push_str(&run_text(child)),
                "w:hyperlink" => {
                    for run in child.children_named("w:r") {
                        text.push_str(&run_text(run));
                    }
                }
                _ => {}
            }
        }
        text
    }

    pub fn style_id(&self) -> Option<&'a str> {
        self.element
            .child("w:pPr")?
            .child("w:pStyle")?
            .attr("w:val")
    }

    pub fn runs(&self) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.element.children_named("w:r")
    }
}

/// Mutable view of a `w:p`.
pub struct ParagraphMut<'a> {
    element: &'a mut XmlElement,
}

impl<'a> ParagraphMut<'a> {
    pub fn new(element: &'a mut XmlElement) -> Self {
        Self { element }
    }

    pub fn view(&self) -> Paragraph<'_> {
        Paragraph::new(self.element)
    }

    pub fn text(&self) -> String {
        self.view().text()
    }

    pub fn element_mut(&mut self) -> &mut XmlElement {
        self.element
    }

    pub fn has_runs(&self) -> bool {
        self.element.has_child("w:r")
    }

    /// Remove all content except paragraph properties.
    pub fn clear(&mut self) {
        self.element.retain_elements(|child| child.is("w:pPr"));
    }

    /// Replace the paragraph's content with one unformatted run.
    pub fn set_text(&mut self, text: &str) {
        self.clear();
        self.add_run(text);
    }

    pub fn add_run(&mut self, text: &str) -> RunMut<'_> {
        RunMut::new(self.element.push_mut(new_run(text)))
    }

    /// Append an arbitrary child element (field run, bookmark end, ...).
    pub fn push(&mut self, element: XmlElement) {
        self.element.push(element);
    }

    /// Insert `element` as the first content child, after any `w:pPr`.
    pub fn insert_first_content(&mut self, element: XmlElement) {
        let index = self
            .element
            .position_of("w:pPr")
            .map(|position| position + 1)
            .unwrap_or(0);
        self.element.insert(index, element);
    }

    pub fn format(&mut self) -> ParagraphFormat<'_> {
        ParagraphFormat::new(self.element.get_or_insert_first("w:pPr"))
    }

    pub fn set_style(&mut self, style_id: &str) {
        self.format().set_style(style_id);
    }

    pub fn runs_mut(&mut self) -> impl Iterator<Item = RunMut<'_>> {
        self.element.children_named_mut("w:r").map(RunMut::new)
    }

    pub fn first_run_mut(&mut self) -> Option<RunMut<'_>> {
        self.runs_mut().next()
    }
}

/// Mutable view of a `w:r`.
pub struct RunMut<'a> {
    element: &'a mut XmlElement,
}

impl<'a> RunMut<'a> {
    pub fn new(element: &'a mut XmlElement) -> Self {
        Self { element }
    }

    pub fn text(&self) -> String {
        run_text(self.element)
    }

    pub fn set_text(&mut self, text: &str) {
        set_run_text(self.element, text);
    }

    pub fn format(&mut self) -> RunFormat<'_> {
        RunFormat::new(self.element.get_or_insert_first("w:rPr"))
    }
}
