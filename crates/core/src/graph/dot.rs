//! DOT text helpers: escaping, palettes and the fixed attribute strings.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// Indentation used for every line inside the digraph body.
pub const INDENT: &str = "   ";

/// Node identifier of the aggregated HTTP routes table.
///
/// Contains `/` so no function directory name can collide with it.
pub const HTTP_TABLE_ID: &str = "/httpTrigger";

pub const TRIGGER_ARROW: &str = "arrowhead = vee, label=\"   Trigger\"";
pub const INPUT_ARROW: &str = "arrowhead = dot, label=\"   Input\"";
pub const OUTPUT_ARROW: &str = "arrowhead = box, label=\"   Output\"";

/// Colour scheme applied to function and resource nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// Four-step blue scheme with white text on output nodes.
    #[default]
    Blues,
    /// Beige functions with blue-green resources.
    Classic,
}

impl Palette {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "blues" => Some(Palette::Blues),
            "classic" => Some(Palette::Classic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Palette::Blues => "blues",
            Palette::Classic => "classic",
        }
    }

    pub fn function_attrs(&self) -> &'static str {
        match self {
            Palette::Blues => "shape=note, fillcolor=\"/blues4/1\"",
            Palette::Classic => "shape=note, fillcolor=\"beige\"",
        }
    }

    pub fn trigger_attrs(&self) -> &'static str {
        match self {
            Palette::Blues => "fillcolor=\"/blues4/2\"",
            Palette::Classic => "fillcolor=\"/bugn3/1\"",
        }
    }

    pub fn input_attrs(&self) -> &'static str {
        match self {
            Palette::Blues => "fillcolor=\"/blues4/3\"",
            Palette::Classic => "fillcolor=\"/bugn3/2\"",
        }
    }

    pub fn output_attrs(&self) -> &'static str {
        match self {
            Palette::Blues => "fontcolor=white, fillcolor=\"/blues4/4\"",
            Palette::Classic => "fillcolor=\"/bugn3/3\"",
        }
    }

    /// Background of a route cell in the HTTP table.
    pub fn http_cell_color(&self) -> &'static str {
        match self {
            Palette::Blues => "/blues4/2",
            Palette::Classic => "/bugn3/1",
        }
    }
}

/// Quote and escape a string so it is a valid DOT identifier.
pub fn quote_id(input: &str) -> String {
    format!("\"{}\"", escape_label(input))
}

/// Escape special characters for quoted DOT strings.
pub fn escape_label(input: &str) -> String {
    input.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Escape text placed inside an HTML-like label.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Graph-wide styling directives opening the digraph.
pub fn write_preamble(out: &mut String, font: &str) {
    let font = escape_label(font);
    let _ = writeln!(out, "digraph Functions {{");
    let _ = writeln!(out, "{INDENT}graph [fontname = \"{font}\"];");
    let _ = writeln!(out, "{INDENT}node[fontname = \"{font}\", shape = box, style = filled];");
    let _ = writeln!(out, "{INDENT}edge[fontname = \"{font}\", fontsize = 10];");
}

/// One `<td>` cell of the HTTP table, addressable through `port`.
pub fn http_cell(port: &str, route: &str, palette: Palette) -> String {
    format!(
        "<td bgcolor=\"{}\" port=\"{}\"><font point-size=\"10\"><b>{}</b></font></td>",
        palette.http_cell_color(),
        escape_html(port),
        escape_html(route)
    )
}

/// Opening of the HTTP table node; `columns` is the number of route cells.
pub fn http_table_open(columns: usize) -> String {
    format!(
        "{} [shape=none, fillcolor=white, label=<<table border=\"0\" cellborder=\"1\" \
         cellspacing=\"0\" cellpadding=\"5\"><tr><td colspan=\"{columns}\">HTTP Triggers</td></tr><tr>",
        quote_id(HTTP_TABLE_ID)
    )
}

pub const HTTP_TABLE_CLOSE: &str = "</tr></table>>];";
