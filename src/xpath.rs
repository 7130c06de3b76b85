use std::sync::LazyLock;

use regex::Regex;

use crate::document::{Element, ModelDocument, VALUE_ATTRIBUTES};

/// Location of the root model element in every document.
pub const MODEL_XPATH: &str = "/sbml:sbml/sbml:model";

static ID_PREDICATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[@id=['"]([^'"]+)['"]\]"#).expect("valid id regex"));

static TRAILING_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/@([A-Za-z_][A-Za-z0-9_]*)$").expect("valid attribute regex"));

/// Where a variable path landed inside a document.
///
/// A path either stops on an element, or its last segment names one of the
/// element's declared attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Located<'d> {
    pub element: &'d Element,
    /// XPath of `element`
    pub xpath: String,
    pub attribute: Option<&'d str>,
}

fn element_xpath(parent: &str, element: &Element) -> String {
    format!(
        "{}/{}/sbml:{}[@id='{}']",
        parent,
        element.kind.container(),
        element.kind.tag(),
        element.id
    )
}

/// Walk a variable path down the document's element hierarchy.
///
/// # Examples
///
/// - `[S1]` → species `S1`
/// - `[J0, k1]` → local parameter `k1` of reaction `J0`
/// - `[S1, x]` → attribute `x` of species `S1`
pub fn locate<'d, S: AsRef<str>>(path: &[S], doc: &'d ModelDocument) -> Option<Located<'d>> {
    let model = doc.model.as_ref()?;
    let (first, rest) = path.split_first()?;

    let mut element = model.element(first.as_ref())?;
    let mut xpath = element_xpath(MODEL_XPATH, element);

    for (i, segment) in rest.iter().enumerate() {
        let segment = segment.as_ref();
        if let Some(child) = element.child(segment) {
            xpath = element_xpath(&xpath, child);
            element = child;
            continue;
        }

        // Attributes can only end a path
        let is_last = i + 1 == rest.len();
        let attribute = element
            .attributes
            .get_key_value(segment)
            .map(|(name, _)| name.as_str());
        return match attribute {
            Some(name) if is_last => Some(Located {
                element,
                xpath,
                attribute: Some(name),
            }),
            _ => None,
        };
    }

    Some(Located {
        element,
        xpath,
        attribute: None,
    })
}

/// Element-level location: the element itself, or the named attribute when
/// the path ends on one. `None` when the path does not resolve.
pub fn element_location<S: AsRef<str>>(path: &[S], doc: &ModelDocument) -> Option<String> {
    let located = locate(path, doc)?;
    match located.attribute {
        Some(attribute) => Some(format!("{}/@{}", located.xpath, attribute)),
        None => Some(located.xpath),
    }
}

/// Attribute-level location: the named attribute, or the element's value
/// attribute. `None` when the path does not resolve or the element has no
/// value attribute.
pub fn attribute_location<S: AsRef<str>>(path: &[S], doc: &ModelDocument) -> Option<String> {
    let located = locate(path, doc)?;
    let attribute = match located.attribute {
        Some(attribute) => attribute,
        None => located.element.value_attribute()?,
    };
    Some(format!("{}/@{}", located.xpath, attribute))
}

/// Recover a variable path from a target XPath.
///
/// Collects every `[@id='...']` predicate in order. A trailing attribute is
/// kept as the last segment unless it is one of the value attributes, which
/// are implied by the element.
///
/// # Examples
/// ```
/// use simchange::xpath::id_from_xpath;
///
/// let target = "/sbml:sbml/sbml:model/sbml:listOfSpecies/sbml:species[@id='S1']/@initialConcentration";
/// assert_eq!(id_from_xpath(target), vec!["S1"]);
///
/// let target = "/sbml:sbml/sbml:model/sbml:listOfSpecies/sbml:species[@id='S1']/@x";
/// assert_eq!(id_from_xpath(target), vec!["S1", "x"]);
/// ```
pub fn id_from_xpath(target: &str) -> Vec<String> {
    let mut ids: Vec<String> = ID_PREDICATE
        .captures_iter(target)
        .map(|caps| caps[1].to_string())
        .collect();

    if let Some(caps) = TRAILING_ATTRIBUTE.captures(target) {
        let attribute = &caps[1];
        if !VALUE_ATTRIBUTES.contains(&attribute) {
            ids.push(attribute.to_string());
        }
    }
    ids
}
