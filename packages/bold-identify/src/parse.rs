//! Parsing of identification engine XML into match records.
//!
//! A response looks like:
//!
//! ```xml
//! <matches>
//!   <match>
//!     <ID>GBMIN2873-13</ID>
//!     <sequencedescription>cytochrome oxidase subunit 1</sequencedescription>
//!     <database>Published</database>
//!     <citation>Lepidoptera</citation>
//!     <taxonomicidentification>Lepidoptera</taxonomicidentification>
//!     <similarity>0.99</similarity>
//!     <specimen>
//!       <url>http://www.boldsystems.org/...</url>
//!       <collectionlocation>
//!         <country>Canada</country>
//!         <coord><lat>49.25</lat><lon>-123.1</lon></coord>
//!       </collectionlocation>
//!     </specimen>
//!   </match>
//! </matches>
//! ```
//!
//! Specimen values are looked up by element name, so extra, missing or
//! reordered elements inside `<specimen>` never shift values into the wrong
//! column.

use roxmltree::{Document, Node};

use crate::error::Result;
use crate::types::{MatchRecord, Specimen};
use crate::xml::{
    child_text, element_children, find_by_path, find_child, find_descendant, get_text, has_tag,
};

/// Number of leaves a well-formed `<specimen>` subtree has.
const SPECIMEN_LEAVES: usize = 4;

/// Parse a response body and extract all matches.
///
/// # Returns
/// One record per `<match>` element in document order, or a parse error for
/// malformed XML
///
/// # Examples
/// ```
/// use bold_identify::parse::parse_response;
///
/// let records = parse_response("<matches><match><ID>A1</ID></match></matches>").unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].id.as_deref(), Some("A1"));
/// assert!(records[0].specimen.url.is_none());
/// ```
pub fn parse_response(xml: &str) -> Result<Vec<MatchRecord>> {
    let doc = Document::parse(xml)?;
    let records = parse_matches(&doc);
    tracing::debug!(matches = records.len(), "Parsed identification response");
    Ok(records)
}

/// Extract every `<match>` element anywhere in the document.
pub fn parse_matches(doc: &Document<'_>) -> Vec<MatchRecord> {
    doc.descendants()
        .filter(|n| has_tag(*n, "match"))
        .map(parse_match)
        .collect()
}

/// Convert a single `<match>` element into a record.
///
/// Absent child elements become `None`.
pub fn parse_match(node: Node<'_, '_>) -> MatchRecord {
    let id = child_text(node, "ID");

    let specimen = match find_child(node, "specimen") {
        Some(specimen) => {
            let leaves = flatten_leaves(specimen).len();
            if leaves != SPECIMEN_LEAVES {
                tracing::warn!(
                    id = id.as_deref().unwrap_or("?"),
                    leaves,
                    "Irregular specimen structure, unmatched fields left empty"
                );
            }
            parse_specimen(specimen)
        }
        None => Specimen::default(),
    };

    MatchRecord {
        id,
        sequencedescription: child_text(node, "sequencedescription"),
        database: child_text(node, "database"),
        citation: child_text(node, "citation"),
        taxonomicidentification: child_text(node, "taxonomicidentification"),
        similarity: child_text(node, "similarity"),
        specimen,
    }
}

/// Extract url, country and coordinates from a `<specimen>` element.
///
/// Each value is taken from its canonical path first and otherwise from the
/// first descendant with the same name.
pub fn parse_specimen(node: Node<'_, '_>) -> Specimen {
    let lookup = |path: &str| {
        let name = path.rsplit('/').next().unwrap_or(path);
        find_by_path(node, path)
            .or_else(|| find_descendant(node, name))
            .and_then(get_text)
    };

    Specimen {
        url: lookup("url"),
        country: lookup("collectionlocation/country"),
        lat: lookup("collectionlocation/coord/lat"),
        lon: lookup("collectionlocation/coord/lon"),
    }
}

/// Flatten an element subtree into its leaf values, depth-first and
/// left-to-right.
///
/// A leaf is an element without element children; empty leaves yield `None`.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use bold_identify::parse::flatten_leaves;
///
/// let doc = Document::parse("<s><a>1</a><b><c>2</c><d/></b></s>").unwrap();
/// assert_eq!(
///     flatten_leaves(doc.root_element()),
///     vec![Some("1".to_string()), Some("2".to_string()), None]
/// );
/// ```
pub fn flatten_leaves(node: Node<'_, '_>) -> Vec<Option<String>> {
    let mut leaves = Vec::new();
    collect_leaves(node, &mut leaves);
    leaves
}

fn collect_leaves(node: Node<'_, '_>, leaves: &mut Vec<Option<String>>) {
    let mut children = element_children(node).peekable();
    if children.peek().is_none() {
        leaves.push(get_text(node));
        return;
    }
    for child in children {
        collect_leaves(child, leaves);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IdentifyError;
    use pretty_assertions::assert_eq;

    const FULL_MATCH: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<matches>
  <match>
    <ID>GBMIN2873-13</ID>
    <sequencedescription>cytochrome oxidase subunit 1</sequencedescription>
    <database>Published</database>
    <citation>Lepidoptera</citation>
    <taxonomicidentification>Lepidoptera</taxonomicidentification>
    <similarity>0.9876</similarity>
    <specimen>
      <url>http://www.boldsystems.org/index.php/Public_RecordView?processid=GBMIN2873-13</url>
      <collectionlocation>
        <country>Canada</country>
        <coord>
          <lat>49.25</lat>
          <lon>-123.1</lon>
        </coord>
      </collectionlocation>
    </specimen>
  </match>
</matches>"#;

    #[test]
    fn test_parse_full_match() {
        let records = parse_response(FULL_MATCH).unwrap();
        assert_eq!(records.len(), 1);

        let values: Vec<Option<&str>> = records[0].fields().iter().map(|(_, v)| *v).collect();
        assert_eq!(
            values,
            vec![
                Some("GBMIN2873-13"),
                Some("cytochrome oxidase subunit 1"),
                Some("Published"),
                Some("Lepidoptera"),
                Some("Lepidoptera"),
                Some("0.9876"),
                Some("http://www.boldsystems.org/index.php/Public_RecordView?processid=GBMIN2873-13"),
                Some("Canada"),
                Some("49.25"),
                Some("-123.1"),
            ]
        );
    }

    #[test]
    fn test_parse_no_matches() {
        let records = parse_response("<matches/>").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_matches_anywhere_in_document() {
        let xml = r#"<root>
            <match><ID>1</ID></match>
            <group><match><ID>2</ID></match></group>
            <match><ID>3</ID></match>
        </root>"#;
        let records = parse_response(xml).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, vec![Some("1"), Some("2"), Some("3")]);
    }

    #[test]
    fn test_missing_citation_is_none() {
        let xml = FULL_MATCH.replace("<citation>Lepidoptera</citation>", "");
        let records = parse_response(&xml).unwrap();
        let record = &records[0];

        assert_eq!(record.citation, None);
        assert_eq!(record.id.as_deref(), Some("GBMIN2873-13"));
        assert_eq!(record.taxonomicidentification.as_deref(), Some("Lepidoptera"));
        assert_eq!(record.specimen.country.as_deref(), Some("Canada"));
    }

    #[test]
    fn test_missing_specimen_pads_with_none() {
        let xml = r#"<matches><match><ID>X</ID><similarity>1</similarity></match></matches>"#;
        let records = parse_response(xml).unwrap();
        assert_eq!(records[0].specimen, Specimen::default());
        assert_eq!(records[0].similarity.as_deref(), Some("1"));
    }

    #[test]
    fn test_short_specimen_keeps_names() {
        // Without a country the remaining values must not shift left.
        let xml = r#"<match><specimen>
            <url>u</url>
            <collectionlocation><coord><lat>1</lat><lon>2</lon></coord></collectionlocation>
        </specimen></match>"#;
        let doc = Document::parse(xml).unwrap();
        let record = parse_match(doc.root_element());

        assert_eq!(
            record.specimen,
            Specimen {
                url: Some("u".to_string()),
                country: None,
                lat: Some("1".to_string()),
                lon: Some("2".to_string()),
            }
        );
    }

    #[test]
    fn test_specimen_falls_back_to_descendants() {
        let xml = r#"<specimen>
            <extra><note>ignored</note></extra>
            <location><lon>5</lon><lat>6</lat><country>Kenya</country></location>
            <url>u</url>
        </specimen>"#;
        let doc = Document::parse(xml).unwrap();
        let specimen = parse_specimen(doc.root_element());

        assert_eq!(specimen.url.as_deref(), Some("u"));
        assert_eq!(specimen.country.as_deref(), Some("Kenya"));
        assert_eq!(specimen.lat.as_deref(), Some("6"));
        assert_eq!(specimen.lon.as_deref(), Some("5"));
    }

    #[test]
    fn test_empty_specimen_leaf_is_none() {
        let xml = FULL_MATCH.replace("<country>Canada</country>", "<country/>");
        let records = parse_response(&xml).unwrap();
        assert_eq!(records[0].specimen.country, None);
        assert_eq!(records[0].specimen.lat.as_deref(), Some("49.25"));
    }

    #[test]
    fn test_flatten_leaves_of_full_specimen() {
        let doc = Document::parse(FULL_MATCH).unwrap();
        let specimen = doc.descendants().find(|n| has_tag(*n, "specimen")).unwrap();
        let leaves = flatten_leaves(specimen);

        assert_eq!(leaves.len(), SPECIMEN_LEAVES);
        assert_eq!(leaves[1].as_deref(), Some("Canada"));
        assert_eq!(leaves[3].as_deref(), Some("-123.1"));
    }

    #[test]
    fn test_flatten_leaves_of_leaf_node() {
        let doc = Document::parse("<url>u</url>").unwrap();
        assert_eq!(flatten_leaves(doc.root_element()), vec![Some("u".to_string())]);
    }

    #[test]
    fn test_malformed_xml_is_error() {
        let result = parse_response("<matches><match></matches>");
        assert!(matches!(result, Err(IdentifyError::XmlParse(_))));
    }
}
