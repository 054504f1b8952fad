//! XML utility functions for navigating and extracting data from DOM trees.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use bold_identify::xml::get_tag_name;
///
/// let xml = r#"<matches><match>text</match></matches>"#;
/// let doc = Document::parse(xml).unwrap();
/// let first = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(first), "match");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Check if a node is an element with a specific tag name.
pub fn has_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && get_tag_name(node) == tag
}

/// Find the first child element with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use bold_identify::xml::find_child;
///
/// let xml = r#"<match><ID>1</ID><similarity>1</similarity></match>"#;
/// let doc = Document::parse(xml).unwrap();
/// let root = doc.root_element();
///
/// assert!(find_child(root, "ID").is_some());
/// assert!(find_child(root, "citation").is_none());
/// ```
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| has_tag(*child, tag))
}

/// Find a descendant element matching a path of tag names.
///
/// # Arguments
/// * `node` - Starting node
/// * `path` - Slash-separated path of tag names (e.g., "coord/lat")
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use bold_identify::xml::find_by_path;
///
/// let xml = r#"<specimen><collectionlocation><country>Canada</country></collectionlocation></specimen>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let country = find_by_path(doc.root_element(), "collectionlocation/country");
/// assert_eq!(country.and_then(|n| n.text()), Some("Canada"));
/// ```
pub fn find_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    path.split('/')
        .try_fold(node, |current, part| find_child(current, part))
}

/// Find the first descendant element (excluding `node` itself) with the given
/// tag name, in document order.
pub fn find_descendant<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants().skip(1).find(|n| has_tag(*n, tag))
}

/// Get the trimmed text content of a node.
///
/// All text descendants are joined, so text split by comments or CDATA
/// sections is kept whole. Returns `None` for elements without text or with
/// only whitespace.
pub fn get_text(node: Node<'_, '_>) -> Option<String> {
    let text: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Get the trimmed text of the child element `tag`, if present and non-empty.
pub fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    find_child(node, tag).and_then(get_text)
}

/// Get all element children of a node.
///
/// Excludes text nodes, comments and processing instructions.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}
