//! OPC package access: the zip container, relationships and content types.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::error::{DocxError, DocxResult};
use super::schema::{NS_PKG_RELS, REL_OFFICE_DOCUMENT};
use super::xml::{self, XmlElement};

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const PACKAGE_RELS_PART: &str = "_rels/.rels";

/// A single named part inside the package.
#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub data: Vec<u8>,
}

/// All parts of a package, kept in their original archive order.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<Part>,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a package from a file on disk.
    pub fn open(path: &Path) -> DocxResult<Self> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a package from any seekable reader.
    pub fn read<R: Read + Seek>(reader: R) -> DocxResult<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut parts = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.push(Part {
                name: entry.name().trim_start_matches('/').to_string(),
                data,
            });
        }

        Ok(Self { parts })
    }

    /// Write the package to a file, replacing it if present.
    pub fn save(&self, path: &Path) -> DocxResult<()> {
        let file = File::create(path)?;
        let mut writer = self.write(BufWriter::new(file))?;
        writer.flush()?;
        Ok(())
    }

    /// Write the package as a zip archive into `writer`.
    pub fn write<W: Write + Seek>(&self, writer: W) -> DocxResult<W> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for part in &self.parts {
            zip.start_file(part.name.as_str(), options)?;
            zip.write_all(&part.data)?;
        }

        Ok(zip.finish()?)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|part| part.name == name)
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|part| part.name == name)
            .map(|part| part.data.as_slice())
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|part| part.name.as_str())
    }

    /// Insert or replace a part's bytes.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|part| part.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part {
                name: name.to_string(),
                data,
            }),
        }
    }

    /// Parse a part as XML, returning `None` when the part is absent.
    pub fn xml_part(&self, name: &str) -> DocxResult<Option<XmlElement>> {
        let Some(data) = self.part(name) else {
            return Ok(None);
        };
        let text = std::str::from_utf8(data).map_err(|_| DocxError::Encoding {
            part: name.to_string(),
        })?;
        xml::parse(text.trim_start_matches('\u{feff}')).map(Some)
    }

    /// Parse a part that must exist.
    pub fn required_xml_part(&self, name: &str) -> DocxResult<XmlElement> {
        self.xml_part(name)?
            .ok_or_else(|| DocxError::MissingPart(name.to_string()))
    }

    pub fn set_xml_part(&mut self, name: &str, root: &XmlElement) {
        self.set_part(name, root.to_document_string().into_bytes());
    }

    /// Locate the main document part through the package relationships.
    pub fn main_document_part(&self) -> DocxResult<String> {
        let rels = match self.xml_part(PACKAGE_RELS_PART)? {
            Some(root) => Relationships::from_element(root),
            None => return Ok("word/document.xml".to_string()),
        };
        Ok(rels
            .target_of_type(REL_OFFICE_DOCUMENT)
            .map(|target| resolve_target("", target))
            .unwrap_or_else(|| "word/document.xml".to_string()))
    }
}

/// Name of the relationships part that belongs to `part_name`.
pub fn rels_part_name(part_name: &str) -> String {
    match part_name.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part_name}.rels"),
    }
}

/// Directory portion of a part name, without the trailing slash.
pub fn part_directory(part_name: &str) -> &str {
    part_name.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Resolve a relationship target relative to the source part's directory.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

// ============================================================================
// Relationships
// ============================================================================

/// A `.rels` part.
#[derive(Debug, Clone)]
pub struct Relationships {
    root: XmlElement,
}

impl Relationships {
    pub fn empty() -> Self {
        Self {
            root: XmlElement::new("Relationships").with_attr("xmlns", NS_PKG_RELS),
        }
    }

    pub fn from_element(root: XmlElement) -> Self {
        Self { root }
    }

    pub fn element(&self) -> &XmlElement {
        &self.root
    }

    fn entries(&self) -> impl Iterator<Item = &XmlElement> {
        self.root.children_named("Relationship")
    }

    pub fn target_of_type(&self, rel_type: &str) -> Option<&str> {
        self.entries()
            .find(|rel| rel.attr("Type") == Some(rel_type))
            .and_then(|rel| rel.attr("Target"))
    }

    pub fn target_by_id(&self, id: &str) -> Option<&str> {
        self.entries()
            .find(|rel| rel.attr("Id") == Some(id))
            .and_then(|rel| rel.attr("Target"))
    }

    /// `(id, target)` pairs for every relationship of the given type.
    pub fn of_type<'a>(&'a self, rel_type: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.entries()
            .filter(move |rel| rel.attr("Type") == Some(rel_type))
            .filter_map(|rel| Some((rel.attr("Id")?, rel.attr("Target")?)))
    }

    /// Add a relationship and return its new id.
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let mut next = 1;
        while self.target_by_id(&format!("rId{next}")).is_some() {
            next += 1;
        }
        let id = format!("rId{next}");
        self.root.push(
            XmlElement::new("Relationship")
                .with_attr("Id", id.clone())
                .with_attr("Type", rel_type)
                .with_attr("Target", target),
        );
        id
    }
}

// ============================================================================
// Content Types
// ============================================================================

/// Register an override content type for `part_name` unless one exists.
pub fn add_content_type_override(content_types: &mut XmlElement, part_name: &str, content_type: &str) {
    let part_name = format!("/{part_name}");
    let exists = content_types
        .children_named("Override")
        .any(|entry| entry.attr("PartName") == Some(part_name.as_str()));
    if !exists {
        content_types.push(
            XmlElement::new("Override")
                .with_attr("PartName", part_name)
                .with_attr("ContentType", content_type),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_write_then_read_preserves_parts_and_order() {
        let mut package = Package::new();
        package.set_part(CONTENT_TYPES_PART, b"<Types/>".to_vec());
        package.set_part("word/document.xml", b"<w:document/>".to_vec());
        package.set_part("word/media/image1.png", vec![0, 1, 2, 3]);

        let bytes = package.write(Cursor::new(Vec::new())).unwrap().into_inner();
        let reread = Package::read(Cursor::new(bytes)).unwrap();

        let names: Vec<_> = reread.part_names().collect();
        assert_eq!(
            names,
            vec![CONTENT_TYPES_PART, "word/document.xml", "word/media/image1.png"]
        );
        assert_eq!(reread.part("word/media/image1.png"), Some(&[0u8, 1, 2, 3][..]));
    }

    #[test]
    fn test_rels_part_name() {
        assert_eq!(rels_part_name("word/document.xml"), "word/_rels/document.xml.rels");
        assert_eq!(rels_part_name("document.xml"), "_rels/document.xml.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("word", "header1.xml"), "word/header1.xml");
        assert_eq!(resolve_target("word", "../docProps/core.xml"), "docProps/core.xml");
        assert_eq!(resolve_target("word", "/word/styles.xml"), "word/styles.xml");
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
    }

    #[test]
    fn test_relationship_ids_are_unique() {
        let mut rels = Relationships::empty();
        let first = rels.add("type-a", "a.xml");
        let second = rels.add("type-b", "b.xml");
        assert_eq!(first, "rId1");
        assert_eq!(second, "rId2");
        assert_eq!(rels.target_by_id("rId2"), Some("b.xml"));
        assert_eq!(rels.target_of_type("type-a"), Some("a.xml"));
    }

    #[test]
    fn test_content_type_override_added_once() {
        let mut types = XmlElement::new("Types");
        add_content_type_override(&mut types, "word/header1.xml", "ct");
        add_content_type_override(&mut types, "word/header1.xml", "ct");
        assert_eq!(types.children_named("Override").count(), 1);
        assert_eq!(
            types.child("Override").unwrap().attr("PartName"),
            Some("/word/header1.xml")
        );
    }
}
