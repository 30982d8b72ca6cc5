//! Tabular and outline renderings of a hierarchy.
//!
//! Every employee gets one row with `depth` columns; the name sits in the
//! column of its own level (CEO = column 0). Rows follow a pre-order walk,
//! subordinates in ascending id order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use termtree::Tree;

use crate::domain::entities::{Hierarchy, HierarchyNode};

/// Fixed inline style for markup tables.
pub const HTML_TABLE_STYLE: &str = concat!(
    "<style>\n",
    "table, td {\n",
    "   border: 1px solid;\n",
    "   border-collapse: collapse;\n",
    "   padding: 4px;\n",
    "}\n",
    "</style>\n",
);

/// Label preceding the markup table.
pub const HTML_LABEL: &str = "EmployeeHierarchy: <br/>";

/// Output shape of a rendered hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Tab separated cells terminated by `|`
    #[default]
    Text,
    /// HTML table
    Html,
    /// Indented tree outline
    Tree,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DisplayMode::Text => "text",
            DisplayMode::Html => "html",
            DisplayMode::Tree => "tree",
        };
        f.write_str(s)
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(DisplayMode::Text),
            "html" => Ok(DisplayMode::Html),
            "tree" => Ok(DisplayMode::Tree),
            other => Err(format!("unknown display mode: {other}")),
        }
    }
}

/// Options for the markup rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prepend [`HTML_TABLE_STYLE`]
    pub include_style: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_style: true,
        }
    }
}

/// Cell and row delimiters of a tabular display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub start_line: &'static str,
    pub empty_cell: &'static str,
    pub open_cell: &'static str,
    pub close_cell: &'static str,
    pub end_line: &'static str,
    /// Fill every row with empty cells up to the hierarchy depth
    pub pad_trailing: bool,
    /// HTML-escape names
    pub escape_names: bool,
}

impl Delimiters {
    pub const TEXT: Delimiters = Delimiters {
        start_line: "",
        empty_cell: "\t\t|",
        open_cell: "",
        close_cell: "\t|",
        end_line: "\n",
        pad_trailing: false,
        escape_names: false,
    };

    pub const HTML: Delimiters = Delimiters {
        start_line: "<tr>",
        empty_cell: "<td></td>",
        open_cell: "<td>",
        close_cell: "</td>",
        end_line: "</tr>",
        pad_trailing: true,
        escape_names: true,
    };

    /// Delimiters of a tabular mode; the outline mode has none.
    pub fn for_mode(mode: DisplayMode) -> Option<Delimiters> {
        match mode {
            DisplayMode::Text => Some(Self::TEXT),
            DisplayMode::Html => Some(Self::HTML),
            DisplayMode::Tree => None,
        }
    }
}

pub fn render(hierarchy: &Hierarchy, mode: DisplayMode, options: &RenderOptions) -> String {
    match mode {
        DisplayMode::Text => render_text(hierarchy),
        DisplayMode::Html => render_markup(hierarchy, options),
        DisplayMode::Tree => render_outline(hierarchy),
    }
}

/// Text table. Rows carry leading empty cells only.
pub fn render_text(hierarchy: &Hierarchy) -> String {
    let mut out = String::new();
    write_table(&mut out, hierarchy, DisplayMode::Text);
    out
}

/// HTML table. Every row is padded to `depth` cells.
pub fn render_markup(hierarchy: &Hierarchy, options: &RenderOptions) -> String {
    let mut out = String::new();
    if options.include_style {
        out.push_str(HTML_TABLE_STYLE);
    }
    out.push_str(HTML_LABEL);
    out.push_str("<table>");
    write_table(&mut out, hierarchy, DisplayMode::Html);
    out.push_str("</table>");
    out
}

/// Indented outline with `name (id)` labels.
pub fn render_outline(hierarchy: &Hierarchy) -> String {
    outline(hierarchy.root()).to_string()
}

fn outline(node: &HierarchyNode) -> Tree<String> {
    Tree::new(node.employee().to_string()).with_leaves(node.subordinates().iter().map(outline))
}

fn write_table(out: &mut String, hierarchy: &Hierarchy, mode: DisplayMode) {
    if let Some(delims) = Delimiters::for_mode(mode) {
        let roots = std::slice::from_ref(hierarchy.root());
        write_rows(out, roots, 0, hierarchy.depth(), &delims);
    }
}

fn write_rows(
    out: &mut String,
    nodes: &[HierarchyNode],
    level: usize,
    depth: usize,
    delims: &Delimiters,
) {
    for node in nodes {
        out.push_str(delims.start_line);
        for _ in 0..level {
            out.push_str(delims.empty_cell);
        }
        out.push_str(delims.open_cell);
        if delims.escape_names {
            push_escaped(out, node.name());
        } else {
            out.push_str(node.name());
        }
        out.push_str(delims.close_cell);
        if delims.pad_trailing {
            for _ in (level + 1)..depth {
                out.push_str(delims.empty_cell);
            }
        }
        out.push_str(delims.end_line);

        if let HierarchyNode::Manager { subordinates, .. } = node {
            write_rows(out, subordinates, level + 1, depth, delims);
        }
    }
}

fn push_escaped(out: &mut String, s: &str) {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::EmployeeRecord;

    fn small() -> Hierarchy {
        Hierarchy::new(HierarchyNode::new(
            EmployeeRecord::root("Jamie", 150),
            vec![HierarchyNode::Leaf(EmployeeRecord::new(
                "Al <Bob> & Co",
                100,
                Some(150),
            ))],
        ))
    }

    #[test]
    fn given_mode_names_when_parsing_then_round_trip() {
        for mode in [DisplayMode::Text, DisplayMode::Html, DisplayMode::Tree] {
            assert_eq!(mode.to_string().parse::<DisplayMode>(), Ok(mode));
        }
        assert!("xml".parse::<DisplayMode>().is_err());
    }

    #[test]
    fn given_outline_mode_when_asking_delimiters_then_none() {
        assert_eq!(Delimiters::for_mode(DisplayMode::Tree), None);
        assert_eq!(Delimiters::for_mode(DisplayMode::Text), Some(Delimiters::TEXT));
    }

    #[test]
    fn given_tabular_modes_when_asking_delimiters_then_only_markup_pads_and_escapes() {
        let html = Delimiters::for_mode(DisplayMode::Html).unwrap();
        assert!(html.pad_trailing && html.escape_names);

        let text = Delimiters::for_mode(DisplayMode::Text).unwrap();
        assert!(!text.pad_trailing && !text.escape_names);
    }

    #[test]
    fn given_markup_special_chars_when_rendering_html_then_escaped() {
        let html = render_markup(&small(), &RenderOptions::default());
        assert!(html.contains("<td>Al &lt;Bob&gt; &amp; Co</td>"));
    }

    #[test]
    fn given_style_disabled_when_rendering_html_then_starts_with_label() {
        let html = render_markup(
            &small(),
            &RenderOptions {
                include_style: false,
            },
        );
        assert_eq!(
            html,
            "EmployeeHierarchy: <br/><table>\
             <tr><td>Jamie</td><td></td></tr>\
             <tr><td></td><td>Al &lt;Bob&gt; &amp; Co</td></tr>\
             </table>"
        );
    }

    #[test]
    fn given_small_hierarchy_when_rendering_text_then_no_trailing_cells() {
        assert_eq!(render_text(&small()), "Jamie\t|\n\t\t|Al <Bob> & Co\t|\n");
    }
}
