//! The editable document.
//!
//! [`Document`] parses the parts it understands (main document, its
//! relationships, content types, styles, settings, core properties and any
//! header or footer parts that get touched) and writes them back on save.
//! Every other part is carried through untouched.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::error::{DocxError, DocxResult};
use super::fields::page_break_run;
use super::package::{
    CONTENT_TYPES_PART, PACKAGE_RELS_PART, Package, Relationships, add_content_type_override,
    part_directory, rels_part_name, resolve_target,
};
use super::paragraph::{Paragraph, ParagraphMut, new_paragraph};
use super::schema::{
    CT_FOOTER, CT_HEADER, CT_SETTINGS, NS_R, NS_W, REL_CORE_PROPERTIES, REL_FOOTER, REL_HEADER,
    REL_SETTINGS, REL_STYLES, SECT_PR, SETTINGS,
};
use super::styles::Styles;
use super::table::{Table, TableMut, new_table};
use super::template;
use super::xml::{XmlElement, XmlNode};

/// Text block width used when the last section has no usable page geometry.
const DEFAULT_BLOCK_WIDTH: i64 = 8640;

/// A top-level body item in document order.
#[derive(Clone, Copy)]
pub enum Block<'a> {
    Paragraph(Paragraph<'a>),
    Table(Table<'a>),
}

/// Header or footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryKind {
    Header,
    Footer,
}

impl StoryKind {
    fn reference(self) -> &'static str {
        match self {
            Self::Header => "w:headerReference",
            Self::Footer => "w:footerReference",
        }
    }

    fn root_name(self) -> &'static str {
        match self {
            Self::Header => "w:hdr",
            Self::Footer => "w:ftr",
        }
    }

    fn rel_type(self) -> &'static str {
        match self {
            Self::Header => REL_HEADER,
            Self::Footer => REL_FOOTER,
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            Self::Header => CT_HEADER,
            Self::Footer => CT_FOOTER,
        }
    }

    fn part_prefix(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Footer => "footer",
        }
    }

    fn style_name(self) -> &'static str {
        match self {
            Self::Header => "Header",
            Self::Footer => "Footer",
        }
    }
}

/// Page margins in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub top: i64,
    pub bottom: i64,
    pub left: i64,
    pub right: i64,
}

/// Core document metadata from `docProps/core.xml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreProperties {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: String,
    pub last_modified_by: String,
    pub revision: i64,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

/// W3CDTF timestamps as written by Word and other producers.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// An open .docx document.
#[derive(Debug)]
pub struct Document {
    package: Package,
    main_part: String,
    /// `w:document` with its body taken out; `body_index` marks where it goes back.
    root: XmlElement,
    body_index: usize,
    body: XmlElement,
    rels: Relationships,
    content_types: XmlElement,
    styles_part: Option<String>,
    styles: Styles,
    settings_part: Option<String>,
    settings: Option<XmlElement>,
    core_part: Option<String>,
    core: Option<XmlElement>,
    stories: BTreeMap<String, XmlElement>,
}

impl Document {
    /// A new empty document.
    pub fn new() -> DocxResult<Self> {
        Self::from_package(template::blank_package())
    }

    pub fn open(path: &Path) -> DocxResult<Self> {
        Self::from_package(Package::open(path)?)
    }

    pub fn from_package(package: Package) -> DocxResult<Self> {
        let main_part = package.main_document_part()?;
        let mut root = package.required_xml_part(&main_part)?;
        let body_index = root
            .position_of("w:body")
            .ok_or_else(|| DocxError::malformed(&main_part, "document has no body"))?;
        let XmlNode::Element(body) = root.children.remove(body_index) else {
            return Err(DocxError::malformed(&main_part, "body is not an element"));
        };

        let rels = package
            .xml_part(&rels_part_name(&main_part))?
            .map(Relationships::from_element)
            .unwrap_or_else(Relationships::empty);
        let content_types = package.required_xml_part(CONTENT_TYPES_PART)?;

        let main_dir = part_directory(&main_part).to_string();
        let styles_part = rels
            .target_of_type(REL_STYLES)
            .map(|target| resolve_target(&main_dir, target));
        let styles = match &styles_part {
            Some(name) => package.xml_part(name)?,
            None => None,
        }
        .map(Styles::from_element)
        .unwrap_or_else(|| Styles::from_element(XmlElement::new("w:styles")));

        let settings_part = rels
            .target_of_type(REL_SETTINGS)
            .map(|target| resolve_target(&main_dir, target));
        let settings = match &settings_part {
            Some(name) => package.xml_part(name)?,
            None => None,
        };

        let core_part = package
            .xml_part(PACKAGE_RELS_PART)?
            .map(Relationships::from_element)
            .and_then(|package_rels| {
                package_rels
                    .target_of_type(REL_CORE_PROPERTIES)
                    .map(|target| resolve_target("", target))
            });
        let core = match &core_part {
            Some(name) => package.xml_part(name)?,
            None => None,
        };

        Ok(Self {
            package,
            main_part,
            root,
            body_index,
            body,
            rels,
            content_types,
            styles_part,
            styles,
            settings_part,
            settings,
            core_part,
            core,
            stories: BTreeMap::new(),
        })
    }

    /// Serialize every edited part into a copy of the package.
    pub fn to_package(&self) -> Package {
        let mut package = self.package.clone();

        let mut root = self.root.clone();
        root.insert(self.body_index, self.body.clone());
        package.set_xml_part(&self.main_part, &root);
        package.set_xml_part(&rels_part_name(&self.main_part), self.rels.element());
        package.set_xml_part(CONTENT_TYPES_PART, &self.content_types);

        if let Some(name) = &self.styles_part {
            package.set_xml_part(name, self.styles.element());
        }
        if let (Some(name), Some(settings)) = (&self.settings_part, &self.settings) {
            package.set_xml_part(name, settings);
        }
        if let (Some(name), Some(core)) = (&self.core_part, &self.core) {
            package.set_xml_part(name, core);
        }
        for (name, story) in &self.stories {
            package.set_xml_part(name, story);
        }
        package
    }

    pub fn save(&self, path: &Path) -> DocxResult<()> {
        self.to_package().save(path)
    }

    // ========================================================================
    // Body content
    // ========================================================================

    pub fn paragraphs(&self) -> Vec<Paragraph<'_>> {
        self.body.children_named("w:p").map(Paragraph::new).collect()
    }

    pub fn paragraph_count(&self) -> usize {
        self.body.children_named("w:p").count()
    }

    pub fn paragraph_mut(&mut self, index: usize) -> Option<ParagraphMut<'_>> {
        self.body
            .children_named_mut("w:p")
            .nth(index)
            .map(ParagraphMut::new)
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = ParagraphMut<'_>> {
        self.body.children_named_mut("w:p").map(ParagraphMut::new)
    }

    pub fn tables(&self) -> Vec<Table<'_>> {
        self.body.children_named("w:tbl").map(Table::new).collect()
    }

    pub fn table_count(&self) -> usize {
        self.body.children_named("w:tbl").count()
    }

    pub fn table_mut(&mut self, index: usize) -> Option<TableMut<'_>> {
        self.body
            .children_named_mut("w:tbl")
            .nth(index)
            .map(TableMut::new)
    }

    /// Top-level paragraphs and tables in body order.
    pub fn blocks(&self) -> Vec<Block<'_>> {
        self.body
            .elements()
            .filter_map(|element| match element.name.as_str() {
                "w:p" => Some(Block::Paragraph(Paragraph::new(element))),
                "w:tbl" => Some(Block::Table(Table::new(element))),
                _ => None,
            })
            .collect()
    }

    /// The raw body, for walks that reach into table cells.
    pub fn body_mut(&mut self) -> &mut XmlElement {
        &mut self.body
    }

    /// Insert a block before the body's section properties.
    fn append_block(&mut self, block: XmlElement) -> &mut XmlElement {
        let index = match self.body.children.iter().rposition(
            |node| matches!(node, XmlNode::Element(element) if element.name == "w:sectPr"),
        ) {
            Some(index) => index,
            None => self.body.children.len(),
        };
        self.body.insert_mut(index, block)
    }

    /// Append an empty paragraph at the end of the body.
    pub fn add_paragraph(&mut self) -> ParagraphMut<'_> {
        ParagraphMut::new(self.append_block(new_paragraph()))
    }

    /// Append a paragraph holding only a page break.
    pub fn add_page_break(&mut self) {
        self.append_block(new_paragraph().with_child(page_break_run()));
    }

    /// Append an empty table spanning the text block width.
    pub fn add_table(&mut self, rows: usize, cols: usize) -> TableMut<'_> {
        let width = self.block_width();
        TableMut::new(self.append_block(new_table(rows, cols, width)))
    }

    /// Page width minus side margins of the last section.
    fn block_width(&self) -> i64 {
        let Some(last) = self.section_count().checked_sub(1) else {
            return DEFAULT_BLOCK_WIDTH;
        };
        let Some(sect_pr) = self.sect_pr(last) else {
            return DEFAULT_BLOCK_WIDTH;
        };
        let attr = |element: &str, name: &str| -> Option<i64> {
            sect_pr.child(element)?.attr(name)?.parse().ok()
        };
        match (
            attr("w:pgSz", "w:w"),
            attr("w:pgMar", "w:left"),
            attr("w:pgMar", "w:right"),
        ) {
            (Some(width), Some(left), Some(right)) if width - left - right > 0 => {
                width - left - right
            }
            _ => DEFAULT_BLOCK_WIDTH,
        }
    }

    // ========================================================================
    // Styles, settings and metadata
    // ========================================================================

    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut Styles {
        &mut self.styles
    }

    /// Settings root, created with its part when the package has none.
    fn settings_mut(&mut self) -> &mut XmlElement {
        if self.settings.is_none() {
            let main_dir = part_directory(&self.main_part).to_string();
            let name = join_part(&main_dir, "settings.xml");
            self.rels.add(REL_SETTINGS, "settings.xml");
            add_content_type_override(&mut self.content_types, &name, CT_SETTINGS);
            self.settings_part = Some(name);
        }
        self.settings
            .get_or_insert_with(|| XmlElement::new("w:settings").with_attr("xmlns:w", NS_W))
    }

    pub fn even_and_odd_headers(&self) -> bool {
        self.settings
            .as_ref()
            .and_then(|settings| settings.child("w:evenAndOddHeaders"))
            .is_some_and(|flag| !matches!(flag.attr("w:val"), Some("0") | Some("false")))
    }

    pub fn set_even_and_odd_headers(&mut self, on: bool) {
        let settings = self.settings_mut();
        if on {
            settings
                .get_or_insert("w:evenAndOddHeaders", SETTINGS)
                .remove_attr("w:val");
        } else {
            settings.remove_children("w:evenAndOddHeaders");
        }
    }

    pub fn core_properties(&self) -> CoreProperties {
        let Some(core) = &self.core else {
            return CoreProperties::default();
        };
        let text = |name: &str| core.child(name).map(XmlElement::text).unwrap_or_default();
        CoreProperties {
            title: text("dc:title"),
            author: text("dc:creator"),
            subject: text("dc:subject"),
            keywords: text("cp:keywords"),
            last_modified_by: text("cp:lastModifiedBy"),
            revision: text("cp:revision").trim().parse().unwrap_or(0),
            created: parse_timestamp(&text("dcterms:created")),
            modified: parse_timestamp(&text("dcterms:modified")),
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.set_core_text("dc:title", title);
    }

    pub fn set_author(&mut self, author: &str) {
        self.set_core_text("dc:creator", author);
    }

    fn set_core_text(&mut self, name: &str, value: &str) {
        let core = self.core.get_or_insert_with(|| {
            XmlElement::new("cp:coreProperties")
                .with_attr(
                    "xmlns:cp",
                    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
                )
                .with_attr("xmlns:dc", "http://purl.org/dc/elements/1.1/")
                .with_attr("xmlns:dcterms", "http://purl.org/dc/terms/")
                .with_attr("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance")
        });
        match core.child_mut(name) {
            Some(element) => element.set_text(value),
            None => core.push(XmlElement::new(name).with_text(value)),
        }

        if self.core_part.is_none() {
            let name = "docProps/core.xml".to_string();
            let mut package_rels = self
                .package
                .xml_part(PACKAGE_RELS_PART)
                .ok()
                .flatten()
                .map(Relationships::from_element)
                .unwrap_or_else(Relationships::empty);
            package_rels.add(REL_CORE_PROPERTIES, &name);
            self.package
                .set_xml_part(PACKAGE_RELS_PART, package_rels.element());
            add_content_type_override(
                &mut self.content_types,
                &name,
                "application/vnd.openxmlformats-package.core-properties+xml",
            );
            self.core_part = Some(name);
        }
    }

    // ========================================================================
    // Bookmarks
    // ========================================================================

    /// One more than the largest bookmark id in the body; 1 when there are none.
    /// When the largest id is `i64::MAX`, the smallest unused positive id.
    pub fn next_bookmark_id(&self) -> i64 {
        let ids: BTreeSet<i64> = self
            .body
            .descendants("w:bookmarkStart")
            .into_iter()
            .filter_map(|start| start.attr("w:id")?.trim().parse::<i64>().ok())
            .collect();
        let largest = ids.last().copied().unwrap_or(0).max(0);
        largest
            .checked_add(1)
            .unwrap_or_else(|| (1..).find(|id| !ids.contains(id)).unwrap_or(1))
    }

    // ========================================================================
    // Sections
    // ========================================================================

    /// Body node positions holding section properties, in document order.
    fn section_nodes(&self) -> Vec<usize> {
        self.body
            .children
            .iter()
            .enumerate()
            .filter_map(|(index, node)| match node {
                XmlNode::Element(element) if element.is("w:sectPr") => Some(index),
                XmlNode::Element(element)
                    if element.is("w:p")
                        && element
                            .child("w:pPr")
                            .is_some_and(|ppr| ppr.has_child("w:sectPr")) =>
                {
                    Some(index)
                }
                _ => None,
            })
            .collect()
    }

    pub fn section_count(&self) -> usize {
        self.section_nodes().len()
    }

    fn sect_pr(&self, section: usize) -> Option<&XmlElement> {
        let node = *self.section_nodes().get(section)?;
        match &self.body.children[node] {
            XmlNode::Element(element) if element.is("w:sectPr") => Some(element),
            XmlNode::Element(paragraph) => paragraph.child("w:pPr")?.child("w:sectPr"),
            _ => None,
        }
    }

    fn sect_pr_mut(&mut self, section: usize) -> Option<&mut XmlElement> {
        let node = *self.section_nodes().get(section)?;
        match &mut self.body.children[node] {
            XmlNode::Element(element) => {
                if element.is("w:sectPr") {
                    Some(element)
                } else {
                    element.child_mut("w:pPr")?.child_mut("w:sectPr")
                }
            }
            _ => None,
        }
    }

    pub fn section_mut(&mut self, section: usize) -> Option<SectionMut<'_>> {
        self.sect_pr_mut(section).map(|element| SectionMut { element })
    }

    /// Start a new section: the current last section's properties move onto a
    /// new paragraph and the body keeps a copy without header or footer
    /// references.
    pub fn add_section(&mut self) {
        let Some(node) = self.body.position_of("w:sectPr") else {
            return;
        };
        let XmlNode::Element(sentinel) = &mut self.body.children[node] else {
            return;
        };
        let closing = sentinel.clone();
        sentinel.remove_children("w:headerReference");
        sentinel.remove_children("w:footerReference");
        sentinel.remove_children("w:type");

        let paragraph = new_paragraph().with_child(XmlElement::new("w:pPr").with_child(closing));
        self.body.insert(node, paragraph);
    }

    // ========================================================================
    // Headers and footers
    // ========================================================================

    fn own_story_part(&self, section: usize, kind: StoryKind) -> Option<String> {
        let sect_pr = self.sect_pr(section)?;
        let reference = sect_pr
            .children_named(kind.reference())
            .find(|reference| reference.attr("w:type").unwrap_or("default") == "default")?;
        let target = self.rels.target_by_id(reference.attr("r:id")?)?;
        Some(resolve_target(part_directory(&self.main_part), target))
    }

    /// A section without its own default header (or footer) shows the previous one.
    pub fn is_linked_to_previous(&self, section: usize, kind: StoryKind) -> bool {
        self.own_story_part(section, kind).is_none()
    }

    /// Give the section its own header or footer part if it lacks one.
    pub fn unlink_from_previous(&mut self, section: usize, kind: StoryKind) -> DocxResult<()> {
        if self.is_linked_to_previous(section, kind) {
            self.add_story(section, kind)?;
        }
        Ok(())
    }

    /// Root of the header or footer part shown by `section`, resolving links
    /// to earlier sections. When no section up to this one has a part, the
    /// first section gets a new one.
    pub fn story_mut(&mut self, section: usize, kind: StoryKind) -> DocxResult<&mut XmlElement> {
        if section >= self.section_count() {
            return Err(DocxError::malformed(&self.main_part, "section index out of range"));
        }
        let existing = (0..=section)
            .rev()
            .find_map(|index| self.own_story_part(index, kind));
        let part = match existing {
            Some(part) => part,
            None => self.add_story(0, kind)?,
        };
        self.load_story(&part)
    }

    fn load_story(&mut self, part: &str) -> DocxResult<&mut XmlElement> {
        if !self.stories.contains_key(part) {
            let root = self.package.required_xml_part(part)?;
            self.stories.insert(part.to_string(), root);
        }
        self.stories
            .get_mut(part)
            .ok_or_else(|| DocxError::MissingPart(part.to_string()))
    }

    fn add_story(&mut self, section: usize, kind: StoryKind) -> DocxResult<String> {
        let main_dir = part_directory(&self.main_part).to_string();
        let mut number = 1;
        let (file, part) = loop {
            let file = format!("{}{number}.xml", kind.part_prefix());
            let part = join_part(&main_dir, &file);
            if !self.package.contains(&part) && !self.stories.contains_key(&part) {
                break (file, part);
            }
            number += 1;
        };

        let style_id = self
            .styles
            .style_id_for(kind.style_name())
            .unwrap_or_else(|| kind.style_name().to_string());
        let root = XmlElement::new(kind.root_name())
            .with_attr("xmlns:w", NS_W)
            .with_attr("xmlns:r", NS_R)
            .with_child(new_paragraph().with_child(
                XmlElement::new("w:pPr")
                    .with_child(XmlElement::new("w:pStyle").with_attr("w:val", style_id)),
            ));

        let rel_id = self.rels.add(kind.rel_type(), &file);
        add_content_type_override(&mut self.content_types, &part, kind.content_type());
        if self.root.attr("xmlns:r").is_none() {
            self.root.set_attr("xmlns:r", NS_R);
        }

        let sect_pr = self
            .sect_pr_mut(section)
            .ok_or_else(|| DocxError::malformed("document", "section index out of range"))?;
        sect_pr.insert_ordered(
            XmlElement::new(kind.reference())
                .with_attr("w:type", "default")
                .with_attr("r:id", rel_id),
            SECT_PR,
        );

        self.stories.insert(part.clone(), root);
        Ok(part)
    }
}

fn join_part(directory: &str, file: &str) -> String {
    if directory.is_empty() {
        file.to_string()
    } else {
        format!("{directory}/{file}")
    }
}

/// Editor over one section's `w:sectPr`.
pub struct SectionMut<'a> {
    element: &'a mut XmlElement,
}

impl SectionMut<'_> {
    pub fn set_page_size(&mut self, width: i64, height: i64) {
        let size = self.element.get_or_insert("w:pgSz", SECT_PR);
        size.set_attr("w:w", width.to_string());
        size.set_attr("w:h", height.to_string());
    }

    /// New margin elements also get Word's default header, footer and gutter distances.
    pub fn set_margins(&mut self, margins: Margins) {
        let pg_mar = self.element.get_or_insert("w:pgMar", SECT_PR);
        pg_mar.set_attr("w:top", margins.top.to_string());
        pg_mar.set_attr("w:right", margins.right.to_string());
        pg_mar.set_attr("w:bottom", margins.bottom.to_string());
        pg_mar.set_attr("w:left", margins.left.to_string());
        for (name, default) in [("w:header", "720"), ("w:footer", "720"), ("w:gutter", "0")] {
            if pg_mar.attr(name).is_none() {
                pg_mar.set_attr(name, default);
            }
        }
    }

    pub fn different_first_page(&self) -> bool {
        self.element
            .child("w:titlePg")
            .is_some_and(|flag| !matches!(flag.attr("w:val"), Some("0") | Some("false")))
    }

    pub fn set_different_first_page(&mut self, on: bool) {
        if on {
            self.element
                .get_or_insert("w:titlePg", SECT_PR)
                .remove_attr("w:val");
        } else {
            self.element.remove_children("w:titlePg");
        }
    }

    /// Restart page numbering at `start`, replacing any numbering settings.
    pub fn restart_page_numbering(&mut self, start: i64) {
        self.element.replace_ordered(
            XmlElement::new("w:pgNumType").with_attr("w:start", start.to_string()),
            SECT_PR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn body_names(document: &Document) -> Vec<String> {
        document.body.elements().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn test_new_document_is_empty_with_one_section() {
        let document = Document::new().unwrap();
        assert_eq!(document.paragraph_count(), 0);
        assert_eq!(document.table_count(), 0);
        assert_eq!(document.section_count(), 1);
        assert_eq!(document.next_bookmark_id(), 1);
    }

    #[test]
    fn test_blocks_are_inserted_before_section_properties() {
        let mut document = Document::new().unwrap();
        document.add_paragraph().set_text("first");
        document.add_table(2, 2);
        document.add_paragraph().set_text("second");

        assert_eq!(body_names(&document), vec!["w:p", "w:tbl", "w:p", "w:sectPr"]);
        let texts: Vec<_> = document.paragraphs().iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_table_width_follows_text_block() {
        let mut document = Document::new().unwrap();
        document.add_table(1, 2);
        let table = document.body.child("w:tbl").unwrap();
        let col = table.child("w:tblGrid").unwrap().child("w:gridCol").unwrap();
        // Letter width 12240 minus 2 x 1800 margins, split in two.
        assert_eq!(col.attr("w:w"), Some("4320"));
    }

    #[test]
    fn test_save_and_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("roundtrip.docx");

        let mut document = Document::new().unwrap();
        document.set_title("Report");
        document.set_author("Analyst");
        document.add_paragraph().set_text("Hello");
        document.save(&path).unwrap();

        let reopened = Document::open(&path).unwrap();
        assert_eq!(reopened.paragraphs()[0].text(), "Hello");
        let core = reopened.core_properties();
        assert_eq!(core.title, "Report");
        assert_eq!(core.author, "Analyst");
        assert_eq!(core.revision, 1);
        assert!(core.created.is_some());
    }

    #[test]
    fn test_add_section_splits_properties() {
        let mut document = Document::new().unwrap();
        document.add_paragraph().set_text("one");
        document.add_section();
        document.add_paragraph().set_text("two");

        assert_eq!(document.section_count(), 2);
        assert_eq!(document.paragraph_count(), 3);
    }

    #[test]
    fn test_linked_sections_share_first_section_header() {
        let mut document = Document::new().unwrap();
        document.add_section();
        assert!(document.is_linked_to_previous(1, StoryKind::Header));

        document
            .story_mut(1, StoryKind::Header)
            .unwrap()
            .push(new_paragraph());

        // The first section received the new part; the second still links to it.
        assert!(!document.is_linked_to_previous(0, StoryKind::Header));
        assert!(document.is_linked_to_previous(1, StoryKind::Header));
        assert_eq!(document.stories.len(), 1);
    }

    #[test]
    fn test_unlink_creates_part_with_styled_paragraph() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("header.docx");

        let mut document = Document::new().unwrap();
        document.unlink_from_previous(0, StoryKind::Footer).unwrap();
        document.unlink_from_previous(0, StoryKind::Footer).unwrap();
        assert_eq!(document.stories.len(), 1);

        let footer = document.story_mut(0, StoryKind::Footer).unwrap();
        assert_eq!(footer.name, "w:ftr");
        let paragraph = footer.child("w:p").unwrap();
        assert_eq!(Paragraph::new(paragraph).style_id(), Some("Footer"));
        document.save(&path).unwrap();

        let package = Package::open(&path).unwrap();
        assert!(package.contains("word/footer1.xml"));
        let types = package.required_xml_part(CONTENT_TYPES_PART).unwrap();
        assert!(
            types
                .children_named("Override")
                .any(|o| o.attr("PartName") == Some("/word/footer1.xml"))
        );
        let reopened = Document::open(&path).unwrap();
        assert!(!reopened.is_linked_to_previous(0, StoryKind::Footer));
    }

    #[test]
    fn test_section_properties_keep_schema_order() {
        let mut document = Document::new().unwrap();
        document.unlink_from_previous(0, StoryKind::Footer).unwrap();
        document.unlink_from_previous(0, StoryKind::Header).unwrap();
        {
            let mut section = document.section_mut(0).unwrap();
            section.set_different_first_page(true);
            section.restart_page_numbering(5);
            section.restart_page_numbering(3);
        }
        let sect_pr = document.sect_pr(0).unwrap();
        let names: Vec<_> = sect_pr.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "w:headerReference",
                "w:footerReference",
                "w:pgSz",
                "w:pgMar",
                "w:pgNumType",
                "w:cols",
                "w:titlePg",
                "w:docGrid"
            ]
        );
        assert_eq!(sect_pr.child("w:pgNumType").unwrap().attr("w:start"), Some("3"));
    }

    #[test]
    fn test_even_and_odd_headers_toggle() {
        let mut document = Document::new().unwrap();
        assert!(!document.even_and_odd_headers());
        document.set_even_and_odd_headers(true);
        assert!(document.even_and_odd_headers());
        document.set_even_and_odd_headers(false);
        assert!(!document.even_and_odd_headers());
    }

    #[test]
    fn test_bookmark_ids() {
        let mut document = Document::new().unwrap();
        let mut paragraph = document.add_paragraph();
        paragraph.push(crate::docx::fields::bookmark_start(7, "intro"));
        paragraph.push(crate::docx::fields::bookmark_end(7));
        assert_eq!(document.next_bookmark_id(), 8);
    }

    #[test]
    fn test_bookmark_id_after_largest_possible() {
        let mut document = Document::new().unwrap();
        let mut paragraph = document.add_paragraph();
        for id in [1, 2, i64::MAX] {
            paragraph.push(crate::docx::fields::bookmark_start(id, &format!("b{id}")));
        }
        assert_eq!(document.next_bookmark_id(), 3);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("2024-03-01T10:00:00Z").is_some());
        assert!(parse_timestamp("2024-03-01T10:00:00").is_some());
        assert!(parse_timestamp("2024-03-01").is_some());
        assert!(parse_timestamp("").is_none());
    }
}
