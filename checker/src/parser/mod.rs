//! OpenDocument spreadsheet loading.
//!
//! Both variants of the format are supported: flat XML (`.fods`) and the zip
//! archive (`.ods`) whose `content.xml` entry holds the same XML. The archive
//! is opened, read and closed inside [`read_content_xml`], so nothing stays
//! open while the corpus is checked.
//!
//! The XML is turned into the owned [`Sheet`] tree; normalization and row
//! reading live in [`table`], the typed criteria in [`criteria`].

pub mod criteria;
pub mod table;

use roxmltree::{Document, Node};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{SpreadsheetError, SpreadsheetResult};
pub use table::{Cell, Row, Sheet, Table};

const TABLE_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:table:1.0";
const TEXT_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";

/// The two supported spreadsheet containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    /// Zip archive with a `content.xml` entry
    Ods,
    /// Flat XML
    Fods,
}

impl SpreadsheetFormat {
    pub fn from_path(path: &Path) -> SpreadsheetResult<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if name.ends_with(".fods") {
            Ok(Self::Fods)
        } else if name.ends_with(".ods") {
            Ok(Self::Ods)
        } else {
            Err(SpreadsheetError::UnsupportedFormat(path.display().to_string()))
        }
    }
}

/// Read the spreadsheet XML, unpacking `content.xml` for `.ods` files.
pub fn read_content_xml(path: &Path) -> SpreadsheetResult<String> {
    let xml = match SpreadsheetFormat::from_path(path)? {
        SpreadsheetFormat::Fods => fs::read_to_string(path)?,
        SpreadsheetFormat::Ods => {
            let mut archive = ZipArchive::new(File::open(path)?)?;
            let mut entry = match archive.by_name("content.xml") {
                Ok(entry) => entry,
                Err(ZipError::FileNotFound) => return Err(SpreadsheetError::MissingContent),
                Err(e) => return Err(e.into()),
            };
            let mut xml = String::new();
            entry.read_to_string(&mut xml)?;
            xml
        }
    };
    Ok(xml)
}

/// Build the cell tree from spreadsheet XML.
pub fn parse_content(xml: &str) -> SpreadsheetResult<Sheet> {
    let doc = Document::parse(xml.trim_start_matches('\u{feff}'))?;
    let tables = doc
        .descendants()
        .filter(|n| is_element(n, TABLE_NS, "table"))
        .map(read_table)
        .collect();
    Ok(Sheet { tables })
}

/// Load a spreadsheet file, expanded and pruned.
pub fn load_spreadsheet(path: &Path) -> SpreadsheetResult<Sheet> {
    let xml = read_content_xml(path)?;
    let sheet = parse_content(&xml)?;
    Ok(table::prune(table::expand(sheet)))
}

fn is_element(node: &Node, namespace: &str, name: &str) -> bool {
    node.is_element() && node.tag_name().namespace() == Some(namespace) && node.tag_name().name() == name
}

fn read_table(node: Node) -> Table {
    let mut rows = Vec::new();
    collect_rows(node, &mut rows);
    Table {
        name: node.attribute((TABLE_NS, "name")).unwrap_or_default().to_string(),
        rows,
    }
}

/// Rows may sit directly in the table or inside header/row groups.
fn collect_rows(node: Node, rows: &mut Vec<Row>) {
    for child in node.children().filter(Node::is_element) {
        if is_element(&child, TABLE_NS, "table-row") {
            rows.push(read_row(child));
        } else if child.tag_name().namespace() == Some(TABLE_NS)
            && matches!(
                child.tag_name().name(),
                "table-header-rows" | "table-rows" | "table-row-group"
            )
        {
            collect_rows(child, rows);
        }
    }
}

fn read_row(node: Node) -> Row {
    let cells = node
        .children()
        .filter(|c| is_element(c, TABLE_NS, "table-cell") || is_element(c, TABLE_NS, "covered-table-cell"))
        .map(|c| Cell {
            repeat: c.attribute((TABLE_NS, "number-columns-repeated")).map(str::to_string),
            paragraphs: c
                .children()
                .filter(|p| is_element(p, TEXT_NS, "p") || is_element(p, TEXT_NS, "h"))
                .map(|p| {
                    let mut text = String::new();
                    paragraph_text(p, &mut text);
                    text
                })
                .collect(),
        })
        .collect();
    Row {
        repeat: node.attribute((TABLE_NS, "number-rows-repeated")).map(str::to_string),
        cells,
    }
}

/// Flatten a paragraph, honouring the ODF whitespace elements.
fn paragraph_text(node: Node, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            out.push_str(child.text().unwrap_or_default());
        } else if is_element(&child, TEXT_NS, "s") {
            let count = child
                .attribute((TEXT_NS, "c"))
                .and_then(|c| c.parse::<usize>().ok())
                .unwrap_or(1);
            out.push_str(&" ".repeat(count));
        } else if is_element(&child, TEXT_NS, "tab") {
            out.push('\t');
        } else if is_element(&child, TEXT_NS, "line-break") {
            out.push('\n');
        } else if child.is_element() {
            paragraph_text(child, out);
        }
    }
}
