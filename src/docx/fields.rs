//! Field codes, bookmarks and breaks.

use super::xml::XmlElement;

/// A single run holding a complete field: begin, instruction, separate, end.
///
/// No cached result is written; Word evaluates the field when it is updated.
pub fn field_run(instruction: &str) -> XmlElement {
    XmlElement::new("w:r")
        .with_child(XmlElement::new("w:fldChar").with_attr("w:fldCharType", "begin"))
        .with_child(
            XmlElement::new("w:instrText")
                .with_attr("xml:space", "preserve")
                .with_text(instruction),
        )
        .with_child(XmlElement::new("w:fldChar").with_attr("w:fldCharType", "separate"))
        .with_child(XmlElement::new("w:fldChar").with_attr("w:fldCharType", "end"))
}

/// Instruction text of every field run inside `paragraph`.
pub fn field_instructions(paragraph: &XmlElement) -> Vec<String> {
    paragraph
        .descendants("w:instrText")
        .into_iter()
        .map(XmlElement::text)
        .collect()
}

pub fn toc_instruction(heading_start: i64, heading_end: i64) -> String {
    format!(r#"TOC \o "{heading_start}-{heading_end}" \h \z \u"#)
}

pub fn seq_instruction(identifier: &str) -> String {
    format!(r"SEQ {identifier} \* ARABIC")
}

pub fn ref_instruction(bookmark: &str, hyperlink: bool) -> String {
    if hyperlink {
        format!(r"REF {bookmark} \h")
    } else {
        format!("REF {bookmark}")
    }
}

pub const PAGE_INSTRUCTION: &str = "PAGE";

pub fn bookmark_start(id: i64, name: &str) -> XmlElement {
    XmlElement::new("w:bookmarkStart")
        .with_attr("w:id", id.to_string())
        .with_attr("w:name", name)
}

pub fn bookmark_end(id: i64) -> XmlElement {
    XmlElement::new("w:bookmarkEnd").with_attr("w:id", id.to_string())
}

pub fn page_break_run() -> XmlElement {
    XmlElement::new("w:r").with_child(XmlElement::new("w:br").with_attr("w:type", "page"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_run_markup() {
        let run = field_run("PAGE");
        assert_eq!(
            run.to_xml_string(),
            concat!(
                r#"<w:r><w:fldChar w:fldCharType="begin"/>"#,
                r#"<w:instrText xml:space="preserve">PAGE</w:instrText>"#,
                r#"<w:fldChar w:fldCharType="separate"/>"#,
                r#"<w:fldChar w:fldCharType="end"/></w:r>"#
            )
        );
    }

    #[test]
    fn test_instructions() {
        assert_eq!(toc_instruction(1, 3), r#"TOC \o "1-3" \h \z \u"#);
        assert_eq!(seq_instruction("Figure"), r"SEQ Figure \* ARABIC");
        assert_eq!(ref_instruction("sec_intro", true), r"REF sec_intro \h");
        assert_eq!(ref_instruction("sec_intro", false), "REF sec_intro");
    }

    #[test]
    fn test_field_instructions_collects_runs() {
        let paragraph = XmlElement::new("w:p")
            .with_child(field_run("SEQ Table \\* ARABIC"))
            .with_child(field_run("PAGE"));
        assert_eq!(
            field_instructions(&paragraph),
            vec!["SEQ Table \\* ARABIC".to_string(), "PAGE".to_string()]
        );
    }
}
