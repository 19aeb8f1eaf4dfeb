//! Tables, rows and cells.

use super::paragraph::{Paragraph, ParagraphMut, new_run};
use super::schema::{TBL_PR, TC_PR};
use super::xml::XmlElement;

/// Border values accepted for table formatting, keyed by request name.
pub const BORDER_STYLES: &[(&str, &str)] = &[
    ("dashed", "dashed"),
    ("dotted", "dotted"),
    ("double", "double"),
    ("none", "nil"),
    ("single", "single"),
];

const BORDER_EDGES: &[&str] = &["top", "left", "bottom", "right", "insideH", "insideV"];

/// Map a requested border style to its `w:val`, case-insensitively.
pub fn border_value(style: &str) -> Option<&'static str> {
    let style = style.to_lowercase();
    BORDER_STYLES
        .iter()
        .find(|(name, _)| *name == style)
        .map(|(_, value)| *value)
}

/// Build an empty `rows` x `cols` table whose columns share `width` twips evenly.
pub fn new_table(rows: usize, cols: usize, width: i64) -> XmlElement {
    let column_width = if cols > 0 { width / cols as i64 } else { 0 };

    let properties = XmlElement::new("w:tblPr")
        .with_child(
            XmlElement::new("w:tblW")
                .with_attr("w:type", "auto")
                .with_attr("w:w", "0"),
        )
        .with_child(
            XmlElement::new("w:tblLook")
                .with_attr("w:firstColumn", "1")
                .with_attr("w:firstRow", "1")
                .with_attr("w:lastColumn", "0")
                .with_attr("w:lastRow", "0")
                .with_attr("w:noHBand", "0")
                .with_attr("w:noVBand", "1")
                .with_attr("w:val", "04A0"),
        );

    let mut grid = XmlElement::new("w:tblGrid");
    for _ in 0..cols {
        grid.push(XmlElement::new("w:gridCol").with_attr("w:w", column_width.to_string()));
    }

    let mut table = XmlElement::new("w:tbl").with_child(properties).with_child(grid);
    for _ in 0..rows {
        let mut row = XmlElement::new("w:tr");
        for _ in 0..cols {
            row.push(
                XmlElement::new("w:tc")
                    .with_child(
                        XmlElement::new("w:tcPr").with_child(
                            XmlElement::new("w:tcW")
                                .with_attr("w:type", "dxa")
                                .with_attr("w:w", column_width.to_string()),
                        ),
                    )
                    .with_child(XmlElement::new("w:p")),
            );
        }
        table.push(row);
    }
    table
}

/// Cell text: the cell's own paragraphs joined by newlines.
pub fn cell_text(cell: &XmlElement) -> String {
    cell.children_named("w:p")
        .map(|p| Paragraph::new(p).text())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace a cell's content with a single paragraph holding `text`.
pub fn set_cell_text(cell: &mut XmlElement, text: &str) {
    cell.retain_elements(|child| child.is("w:tcPr"));
    cell.push(XmlElement::new("w:p").with_child(new_run(text)));
}

/// Set a clear background fill on a cell, replacing any existing shading.
pub fn shade_cell(cell: &mut XmlElement, fill: &str) {
    let properties = cell.get_or_insert_first("w:tcPr");
    properties.replace_ordered(
        XmlElement::new("w:shd")
            .with_attr("w:val", "clear")
            .with_attr("w:color", "auto")
            .with_attr("w:fill", fill),
        TC_PR,
    );
}

/// Read-only view of a `w:tbl`.
#[derive(Clone, Copy)]
pub struct Table<'a> {
    element: &'a XmlElement,
}

impl<'a> Table<'a> {
    pub fn new(element: &'a XmlElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &'a XmlElement {
        self.element
    }

    pub fn rows(&self) -> Vec<&'a XmlElement> {
        self.element.children_named("w:tr").collect()
    }

    pub fn row_count(&self) -> usize {
        self.element.children_named("w:tr").count()
    }

    /// Widest row, in cells.
    pub fn column_count(&self) -> usize {
        self.element
            .children_named("w:tr")
            .map(|row| row.children_named("w:tc").count())
            .max()
            .unwrap_or(0)
    }

    pub fn cells(row: &'a XmlElement) -> Vec<&'a XmlElement> {
        row.children_named("w:tc").collect()
    }

    /// Cell texts row by row.
    pub fn cell_texts(&self) -> Vec<Vec<String>> {
        self.element
            .children_named("w:tr")
            .map(|row| row.children_named("w:tc").map(cell_text).collect())
            .collect()
    }
}

/// Mutable view of a `w:tbl`.
pub struct TableMut<'a> {
    element: &'a mut XmlElement,
}

impl<'a> TableMut<'a> {
    pub fn new(element: &'a mut XmlElement) -> Self {
        Self { element }
    }

    pub fn view(&self) -> Table<'_> {
        Table::new(self.element)
    }

    pub fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut XmlElement> {
        self.element
            .children_named_mut("w:tr")
            .nth(row)?
            .children_named_mut("w:tc")
            .nth(column)
    }

    /// Rows in order, each as its list of cells.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = Vec<&mut XmlElement>> {
        self.element
            .children_named_mut("w:tr")
            .map(|row| row.children_named_mut("w:tc").collect())
    }

    /// Replace the table-wide borders with `value` on all six edges.
    pub fn set_borders(&mut self, value: &str) {
        let mut borders = XmlElement::new("w:tblBorders");
        for edge in BORDER_EDGES {
            borders.push(
                XmlElement::new(format!("w:{edge}"))
                    .with_attr("w:val", value)
                    .with_attr("w:sz", "4")
                    .with_attr("w:space", "0")
                    .with_attr("w:color", "000000"),
            );
        }
        self.element
            .get_or_insert_first("w:tblPr")
            .replace_ordered(borders, TBL_PR);
    }

    /// Autofit lets Word resize columns to content; otherwise the layout is fixed.
    pub fn set_autofit(&mut self, autofit: bool) {
        let layout = if autofit { "autofit" } else { "fixed" };
        self.element
            .get_or_insert_first("w:tblPr")
            .get_or_insert("w:tblLayout", TBL_PR)
            .set_attr("w:type", layout);
    }
}

/// Paragraphs of a cell, for run-level edits.
pub fn cell_paragraphs_mut(cell: &mut XmlElement) -> impl Iterator<Item = ParagraphMut<'_>> {
    cell.children_named_mut("w:p").map(ParagraphMut::new)
}

/// Visit every paragraph in a container, then every paragraph of its tables.
///
/// Within a cell the cell's paragraphs come before its nested tables.
pub fn visit_paragraphs_mut(container: &mut XmlElement, visit: &mut dyn FnMut(&mut XmlElement)) {
    for paragraph in container.children_named_mut("w:p") {
        visit(paragraph);
    }
    for table in container.children_named_mut("w:tbl") {
        for row in table.children_named_mut("w:tr") {
            for cell in row.children_named_mut("w:tc") {
                visit_paragraphs_mut(cell, visit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::xml::parse;

    #[test]
    fn test_new_table_shape() {
        let tbl = new_table(2, 3, 9000);
        let table = Table::new(&tbl);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        let grid = tbl.child("w:tblGrid").unwrap();
        assert_eq!(grid.children_named("w:gridCol").count(), 3);
        assert_eq!(grid.child("w:gridCol").unwrap().attr("w:w"), Some("3000"));
    }

    #[test]
    fn test_set_cell_text_and_read_back() {
        let mut tbl = new_table(1, 1, 1000);
        let mut table = TableMut::new(&mut tbl);
        set_cell_text(table.cell_mut(0, 0).unwrap(), "Name");
        assert_eq!(table.view().cell_texts(), vec![vec!["Name".to_string()]]);
        assert!(table.cell_mut(0, 1).is_none());
    }

    #[test]
    fn test_borders_replace_existing() {
        let mut tbl = new_table(1, 1, 1000);
        let mut table = TableMut::new(&mut tbl);
        table.set_borders("single");
        table.set_borders("nil");

        let tbl_pr = tbl.child("w:tblPr").unwrap();
        assert_eq!(tbl_pr.children_named("w:tblBorders").count(), 1);
        let borders = tbl_pr.child("w:tblBorders").unwrap();
        let edges: Vec<_> = borders.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(
            edges,
            vec!["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"]
        );
        assert!(borders.elements().all(|e| e.attr("w:val") == Some("nil")));

        // tblBorders sits before tblLook.
        let names: Vec<_> = tbl_pr.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["w:tblW", "w:tblBorders", "w:tblLook"]);
    }

    #[test]
    fn test_borders_create_missing_table_properties() {
        let mut tbl = parse("<w:tbl><w:tblGrid/><w:tr/></w:tbl>").unwrap();
        TableMut::new(&mut tbl).set_borders("double");
        assert_eq!(tbl.elements().next().unwrap().name, "w:tblPr");
    }

    #[test]
    fn test_shade_cell_replaces_fill() {
        let mut cell = parse(r#"<w:tc><w:tcPr><w:shd w:fill="FFFFFF"/><w:vAlign w:val="top"/></w:tcPr><w:p/></w:tc>"#).unwrap();
        shade_cell(&mut cell, "D9E2F3");
        let tc_pr = cell.child("w:tcPr").unwrap();
        assert_eq!(tc_pr.children_named("w:shd").count(), 1);
        let shd = tc_pr.child("w:shd").unwrap();
        assert_eq!(shd.attr("w:fill"), Some("D9E2F3"));
        assert_eq!(shd.attr("w:val"), Some("clear"));
        assert_eq!(shd.attr("w:color"), Some("auto"));
        let names: Vec<_> = tc_pr.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["w:shd", "w:vAlign"]);
    }

    #[test]
    fn test_border_value_lookup() {
        assert_eq!(border_value("NONE"), Some("nil"));
        assert_eq!(border_value("Dashed"), Some("dashed"));
        assert_eq!(border_value("wavy"), None);
    }

    #[test]
    fn test_visit_order_nested_tables() {
        let mut body = parse(concat!(
            "<w:body>",
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p>",
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>nested</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
            "</w:tc></w:tr></w:tbl>",
            "<w:p><w:r><w:t>body</w:t></w:r></w:p>",
            "</w:body>"
        ))
        .unwrap();
        let mut seen = Vec::new();
        visit_paragraphs_mut(&mut body, &mut |p| seen.push(Paragraph::new(p).text()));
        assert_eq!(seen, vec!["body", "cell", "nested"]);
    }
}
