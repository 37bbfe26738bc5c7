//! Reads classic cell comments straight from the xlsx package.
//!
//! calamine exposes cell values but not the comments attached to them, so the
//! annotation channel is resolved the way the format stores it:
//! `xl/workbook.xml` lists the sheets with their relationship ids, the
//! workbook relationships map those ids to worksheet parts, and each
//! worksheet's own relationships point at its `comments*.xml` part. A sheet
//! without a comments part simply yields an empty map.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::tracker::tools::error::{Result, ToolError};

/// Comment text keyed by zero-based `(row, col)` cell coordinates.
pub type CommentMap = HashMap<(u32, u32), String>;

/// Relationship entry of a `*.rels` part.
struct Relationship {
    id: String,
    rel_type: String,
    target: String,
}

/// Reads the cell comments of every sheet in the workbook, keyed by sheet
/// name as it appears in `xl/workbook.xml`.
pub fn read_workbook_comments(path: &Path) -> Result<HashMap<String, CommentMap>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let workbook_xml = read_archive_part(&mut archive, "xl/workbook.xml")?
        .ok_or_else(|| ToolError::InvalidWorkbook("missing xl/workbook.xml".into()))?;
    let workbook_rels = read_archive_part(&mut archive, "xl/_rels/workbook.xml.rels")?
        .ok_or_else(|| ToolError::InvalidWorkbook("missing workbook relationships".into()))?;

    let sheet_rids = parse_sheet_rids(&workbook_xml)?;
    let rel_targets = parse_relationships(&workbook_rels)?;

    let mut comments = HashMap::new();
    for (sheet_name, rid) in sheet_rids {
        let Some(sheet_rel) = rel_targets.iter().find(|rel| rel.id == rid) else {
            continue;
        };
        let sheet_part = join_part_path("xl/", &sheet_rel.target);
        let map = read_sheet_comments(&mut archive, &sheet_part)?;
        comments.insert(sheet_name, map);
    }

    Ok(comments)
}

fn read_sheet_comments(archive: &mut ZipArchive<File>, sheet_part: &str) -> Result<CommentMap> {
    let Some(rels_xml) = read_archive_part(archive, &rels_path_for(sheet_part))? else {
        return Ok(CommentMap::new());
    };

    let comments_target = parse_relationships(&rels_xml)?
        .into_iter()
        .find(|rel| rel.rel_type.ends_with("/comments"))
        .map(|rel| rel.target);
    let Some(target) = comments_target else {
        return Ok(CommentMap::new());
    };

    let comments_part = join_part_path(&dir_of(sheet_part), &target);
    match read_archive_part(archive, &comments_part)? {
        Some(xml) => parse_comments_xml(&xml),
        None => Ok(CommentMap::new()),
    }
}

/// Reads a package part to a string, mapping an absent part to `None`.
fn read_archive_part(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(error) => return Err(error.into()),
    };

    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(Some(content))
}

/// Extracts `(sheet name, relationship id)` pairs from `xl/workbook.xml`,
/// preserving sheet order.
fn parse_sheet_rids(xml: &str) -> Result<Vec<(String, String)>> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                if element.name().as_ref() == b"sheet" {
                    let name = attr_value(&element, b"name")?;
                    let rid = attr_value(&element, b"r:id")?;
                    if let (Some(name), Some(rid)) = (name, rid) {
                        sheets.push((name, rid));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(error) => return Err(ToolError::Xml(error.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut relationships = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                if element.name().as_ref() == b"Relationship" {
                    let id = attr_value(&element, b"Id")?;
                    let rel_type = attr_value(&element, b"Type")?;
                    let target = attr_value(&element, b"Target")?;
                    if let (Some(id), Some(rel_type), Some(target)) = (id, rel_type, target) {
                        relationships.push(Relationship { id, rel_type, target });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(error) => return Err(ToolError::Xml(error.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

/// Parses a classic `comments*.xml` part into a coordinate-keyed map. Rich
/// text runs inside a comment are concatenated.
fn parse_comments_xml(xml: &str) -> Result<CommentMap> {
    // Text is not trimmed here: a comment may span several `<t>` runs and the
    // whitespace between runs is part of the text.
    let mut reader = Reader::from_reader(xml.as_bytes());

    let mut buf = Vec::new();
    let mut map = CommentMap::new();

    let mut in_comment = false;
    let mut in_text = false;
    let mut current_ref = String::new();
    let mut current_text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(element)) => match element.name().as_ref() {
                b"comment" => {
                    in_comment = true;
                    current_text.clear();
                    current_ref = attr_value(&element, b"ref")?.unwrap_or_default();
                }
                b"t" if in_comment => in_text = true,
                _ => {}
            },
            Ok(Event::End(element)) => match element.name().as_ref() {
                b"comment" => {
                    in_comment = false;
                    if let Some(coord) = parse_cell_ref(&current_ref) {
                        map.insert(coord, current_text.clone());
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(text)) => {
                if in_comment && in_text {
                    let unescaped = text
                        .unescape()
                        .map_err(|error| ToolError::Xml(error.to_string()))?;
                    current_text.push_str(&unescaped);
                }
            }
            Ok(Event::Eof) => break,
            Err(error) => return Err(ToolError::Xml(error.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(map)
}

fn attr_value(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|error| ToolError::Xml(error.to_string()))?;
        if attribute.key.as_ref() == key {
            let value = attribute
                .unescape_value()
                .map_err(|error| ToolError::Xml(error.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Converts an A1-style reference into zero-based `(row, col)` coordinates.
fn parse_cell_ref(reference: &str) -> Option<(u32, u32)> {
    let mut col_letters = String::new();
    let mut row_digits = String::new();

    for ch in reference.chars() {
        if ch.is_ascii_alphabetic() {
            col_letters.push(ch.to_ascii_uppercase());
        } else if ch.is_ascii_digit() {
            row_digits.push(ch);
        }
    }

    if col_letters.is_empty() || row_digits.is_empty() {
        return None;
    }

    let col = col_letters
        .chars()
        .rev()
        .enumerate()
        .map(|(i, ch)| (ch as u32 - 'A' as u32 + 1) * 26_u32.pow(i as u32))
        .sum::<u32>()
        - 1;
    let row = row_digits.parse::<u32>().ok()? - 1;

    Some((row, col))
}

/// Resolves a relationship target against the directory of the referencing
/// part. Targets may be relative (`../comments1.xml`) or package-absolute.
fn join_part_path(base_dir: &str, target: &str) -> String {
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

/// Path of the `.rels` part describing the given part.
fn rels_path_for(part_path: &str) -> String {
    match part_path.rfind('/') {
        Some(idx) => format!("{}_rels/{}.rels", &part_path[..idx + 1], &part_path[idx + 1..]),
        None => format!("_rels/{part_path}.rels"),
    }
}

fn dir_of(part_path: &str) -> String {
    match part_path.rfind('/') {
        Some(idx) => part_path[..idx + 1].to_string(),
        None => String::new(),
    }
}
