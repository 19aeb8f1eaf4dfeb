//! The styles part.

use super::format::{ParagraphFormat, RunFormat};
use super::schema::STYLE;
use super::xml::XmlElement;

/// Built-in style names that Word shows capitalized in its UI.
const UI_NAMES: &[(&str, &str)] = &[
    ("caption", "Caption"),
    ("footer", "Footer"),
    ("header", "Header"),
    ("title", "Title"),
    ("subtitle", "Subtitle"),
    ("body text", "Body Text"),
    ("list bullet", "List Bullet"),
    ("list number", "List Number"),
    ("list paragraph", "List Paragraph"),
    ("normal", "Normal"),
];

/// Display name for a stored style name (`heading 1` -> `Heading 1`).
pub fn ui_name(name: &str) -> String {
    let lower = name.to_lowercase();
    if let Some(level) = lower.strip_prefix("heading ") {
        if level.parse::<u8>().is_ok() {
            return format!("Heading {level}");
        }
    }
    UI_NAMES
        .iter()
        .find(|(stored, _)| *stored == lower)
        .map(|(_, shown)| (*shown).to_string())
        .unwrap_or_else(|| name.to_string())
}

/// The `w:styles` root of a document.
#[derive(Debug, Clone)]
pub struct Styles {
    root: XmlElement,
}

impl Styles {
    pub fn from_element(root: XmlElement) -> Self {
        Self { root }
    }

    pub fn element(&self) -> &XmlElement {
        &self.root
    }

    fn styles(&self) -> impl Iterator<Item = &XmlElement> {
        self.root.children_named("w:style")
    }

    fn by_id(&self, style_id: &str) -> Option<&XmlElement> {
        self.styles().find(|style| style.attr("w:styleId") == Some(style_id))
    }

    /// Resolve a style by display name, stored name or id, case-insensitively.
    pub fn style_id_for(&self, name: &str) -> Option<String> {
        let wanted = name.trim().to_lowercase();
        self.styles()
            .find(|style| {
                let stored = style
                    .child("w:name")
                    .and_then(|n| n.attr("w:val"))
                    .unwrap_or_default();
                stored.to_lowercase() == wanted
                    || ui_name(stored).to_lowercase() == wanted
                    || style.attr("w:styleId").map(str::to_lowercase).as_deref() == Some(wanted.as_str())
            })
            .and_then(|style| style.attr("w:styleId"))
            .map(str::to_string)
    }

    pub fn default_paragraph_style_id(&self) -> Option<&str> {
        self.styles()
            .find(|style| {
                style.attr("w:type") == Some("paragraph")
                    && matches!(style.attr("w:default"), Some("1") | Some("true"))
            })
            .and_then(|style| style.attr("w:styleId"))
    }

    /// Display name of a style id.
    pub fn display_name(&self, style_id: &str) -> Option<String> {
        let stored = self.by_id(style_id)?.child("w:name")?.attr("w:val")?;
        Some(ui_name(stored))
    }

    /// Style id a paragraph effectively uses: its own when defined here,
    /// otherwise the default paragraph style.
    pub fn paragraph_style_id(&self, style_id: Option<&str>) -> Option<String> {
        style_id
            .filter(|id| self.by_id(id).is_some())
            .or_else(|| self.default_paragraph_style_id())
            .map(str::to_string)
    }

    /// Display name of the style a paragraph uses; unknown or missing ids fall
    /// back to the default paragraph style.
    pub fn paragraph_style_name(&self, style_id: Option<&str>) -> String {
        self.paragraph_style_id(style_id)
            .and_then(|id| self.display_name(&id))
            .unwrap_or_default()
    }

    pub fn style_mut(&mut self, style_id: &str) -> Option<StyleMut<'_>> {
        self.root
            .children_named_mut("w:style")
            .find(|style| style.attr("w:styleId") == Some(style_id))
            .map(|element| StyleMut { element })
    }
}

/// Editor over one `w:style`.
pub struct StyleMut<'a> {
    element: &'a mut XmlElement,
}

impl StyleMut<'_> {
    pub fn paragraph_format(&mut self) -> ParagraphFormat<'_> {
        ParagraphFormat::new(self.element.get_or_insert("w:pPr", STYLE))
    }

    pub fn run_format(&mut self) -> RunFormat<'_> {
        RunFormat::new(self.element.get_or_insert("w:rPr", STYLE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::xml::parse;

    fn sample() -> Styles {
        Styles::from_element(
            parse(concat!(
                r#"<w:styles>"#,
                r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>"#,
                r#"<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:qFormat/></w:style>"#,
                r#"<w:style w:type="paragraph" w:styleId="Caption"><w:name w:val="caption"/></w:style>"#,
                r#"</w:styles>"#
            ))
            .unwrap(),
        )
    }

    #[test]
    fn test_ui_name() {
        assert_eq!(ui_name("heading 3"), "Heading 3");
        assert_eq!(ui_name("caption"), "Caption");
        assert_eq!(ui_name("My Style"), "My Style");
    }

    #[test]
    fn test_style_lookup_by_any_name() {
        let styles = sample();
        assert_eq!(styles.style_id_for("Heading 1").as_deref(), Some("Heading1"));
        assert_eq!(styles.style_id_for("heading 1").as_deref(), Some("Heading1"));
        assert_eq!(styles.style_id_for("CAPTION").as_deref(), Some("Caption"));
        assert_eq!(styles.style_id_for("Heading1").as_deref(), Some("Heading1"));
        assert_eq!(styles.style_id_for("Quote"), None);
    }

    #[test]
    fn test_paragraph_style_name_falls_back_to_default() {
        let styles = sample();
        assert_eq!(styles.paragraph_style_name(Some("Heading1")), "Heading 1");
        assert_eq!(styles.paragraph_style_name(None), "Normal");
        assert_eq!(styles.paragraph_style_name(Some("Missing")), "Normal");
        assert_eq!(styles.paragraph_style_id(Some("Missing")).as_deref(), Some("Normal"));
        assert_eq!(styles.paragraph_style_id(Some("Heading1")).as_deref(), Some("Heading1"));
    }

    #[test]
    fn test_style_properties_inserted_in_order() {
        let mut styles = sample();
        {
            let mut heading = styles.style_mut("Heading1").unwrap();
            heading.run_format().set_bold(true);
            heading.paragraph_format().set_first_line_indent(0.0);
        }
        let heading = styles
            .element()
            .children_named("w:style")
            .nth(1)
            .unwrap();
        let names: Vec<_> = heading.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["w:name", "w:basedOn", "w:qFormat", "w:pPr", "w:rPr"]);
    }
}
