//! Paragraph and run property editing.
//!
//! [`ParagraphFormat`] wraps a `w:pPr` and [`RunFormat`] a `w:rPr`. Both work
//! the same whether the properties belong to a paragraph, a run or a style.

use super::schema::{P_PR, R_PR};
use super::units::{half_points, line_240ths, twips_from_pt};
use super::xml::XmlElement;

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Accepted names, sorted.
    pub const NAMES: &'static [&'static str] = &["center", "justify", "left", "right"];

    /// Parse a case-insensitive alignment name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            "justify" => Some(Self::Justify),
            _ => None,
        }
    }

    /// Value of the `w:jc` element.
    pub fn xml_value(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "both",
        }
    }
}

/// Editor over a `w:pPr` element.
pub struct ParagraphFormat<'a> {
    ppr: &'a mut XmlElement,
}

impl<'a> ParagraphFormat<'a> {
    pub fn new(ppr: &'a mut XmlElement) -> Self {
        Self { ppr }
    }

    pub fn set_style(&mut self, style_id: &str) {
        self.ppr
            .get_or_insert("w:pStyle", P_PR)
            .set_attr("w:val", style_id);
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.ppr
            .get_or_insert("w:jc", P_PR)
            .set_attr("w:val", alignment.xml_value());
    }

    /// Line spacing as a multiple of single spacing.
    pub fn set_line_spacing(&mut self, multiple: f64) {
        let spacing = self.ppr.get_or_insert("w:spacing", P_PR);
        spacing.set_attr("w:line", line_240ths(multiple).to_string());
        spacing.set_attr("w:lineRule", "auto");
    }

    pub fn set_space_before(&mut self, points: f64) {
        self.ppr
            .get_or_insert("w:spacing", P_PR)
            .set_attr("w:before", twips_from_pt(points).to_string());
    }

    pub fn set_space_after(&mut self, points: f64) {
        self.ppr
            .get_or_insert("w:spacing", P_PR)
            .set_attr("w:after", twips_from_pt(points).to_string());
    }

    pub fn set_left_indent(&mut self, points: f64) {
        self.ppr
            .get_or_insert("w:ind", P_PR)
            .set_attr("w:left", twips_from_pt(points).to_string());
    }

    pub fn set_right_indent(&mut self, points: f64) {
        self.ppr
            .get_or_insert("w:ind", P_PR)
            .set_attr("w:right", twips_from_pt(points).to_string());
    }

    /// Positive values indent the first line; negative values become a hanging indent.
    pub fn set_first_line_indent(&mut self, points: f64) {
        let ind = self.ppr.get_or_insert("w:ind", P_PR);
        let twips = twips_from_pt(points);
        if twips < 0 {
            ind.remove_attr("w:firstLine");
            ind.set_attr("w:hanging", (-twips).to_string());
        } else {
            ind.remove_attr("w:hanging");
            ind.set_attr("w:firstLine", twips.to_string());
        }
    }
}

/// Editor over a `w:rPr` element.
pub struct RunFormat<'a> {
    rpr: &'a mut XmlElement,
}

impl<'a> RunFormat<'a> {
    pub fn new(rpr: &'a mut XmlElement) -> Self {
        Self { rpr }
    }

    /// Font for Latin text (`w:ascii` and `w:hAnsi`).
    pub fn set_font_name(&mut self, name: &str) {
        let fonts = self.rpr.get_or_insert("w:rFonts", R_PR);
        fonts.set_attr("w:ascii", name);
        fonts.set_attr("w:hAnsi", name);
    }

    /// Separate western and East Asian faces; complex script follows western.
    pub fn set_fonts(&mut self, western: &str, east_asian: &str) {
        let fonts = self.rpr.get_or_insert("w:rFonts", R_PR);
        fonts.set_attr("w:ascii", western);
        fonts.set_attr("w:hAnsi", western);
        fonts.set_attr("w:cs", western);
        fonts.set_attr("w:eastAsia", east_asian);
    }

    pub fn set_size(&mut self, points: f64) {
        self.rpr
            .get_or_insert("w:sz", R_PR)
            .set_attr("w:val", half_points(points).to_string());
    }

    pub fn set_bold(&mut self, on: bool) {
        self.set_toggle("w:b", on);
    }

    pub fn set_italic(&mut self, on: bool) {
        self.set_toggle("w:i", on);
    }

    /// Six-digit RGB hex, already validated.
    pub fn set_color(&mut self, hex: &str) {
        self.rpr.get_or_insert("w:color", R_PR).set_attr("w:val", hex);
    }

    fn set_toggle(&mut self, name: &str, on: bool) {
        let toggle = self.rpr.get_or_insert(name, R_PR);
        if on {
            toggle.remove_attr("w:val");
        } else {
            toggle.set_attr("w:val", "0");
        }
    }
}
