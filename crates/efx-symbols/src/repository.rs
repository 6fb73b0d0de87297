//! Indexed symbol repository serving the translator's lookup contract.
//!
//! Built once from [`SdkMetadata`]; every XPath is parsed at construction,
//! so lookups are allocation-light and the repository needs no interior
//! mutability. A reverse index maps absolute XPath text back to the
//! declaring field, used for absolute-path atoms embedded in expressions.

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;

use efx_ast::foundation::{contextualize, DataType, XPath};

use crate::error::SymbolError;
use crate::model::{FieldType, SdkMetadata};

/// A field definition with its path parsed.
#[derive(Debug, Clone)]
pub struct FieldSymbol {
    /// Field identifier
    pub id: String,
    /// Identifier of the owning node
    pub parent_node_id: String,
    /// Parsed absolute location
    pub xpath: XPath,
    /// Declared field type
    pub field_type: FieldType,
    /// Attached codelist, if any
    pub codelist_id: Option<String>,
}

/// A node definition with its path parsed.
#[derive(Debug, Clone)]
pub struct NodeSymbol {
    /// Node identifier
    pub id: String,
    /// Parent node identifier; absent on the root
    pub parent_id: Option<String>,
    /// Parsed absolute location
    pub xpath: XPath,
}

/// A codelist with its codes in declared order.
#[derive(Debug, Clone)]
pub struct Codelist {
    /// Codelist identifier
    pub id: String,
    /// Parent codelist this one tailors, if any
    pub parent_id: Option<String>,
    /// Codes in declared order
    pub codes: Vec<String>,
}

/// Read-only symbol tables for one notice-schema version.
#[derive(Debug, Clone)]
pub struct SymbolRepository {
    version: String,
    fields: IndexMap<String, FieldSymbol>,
    nodes: IndexMap<String, NodeSymbol>,
    codelists: IndexMap<String, Codelist>,
    fields_by_xpath: HashMap<String, String>,
}

impl SymbolRepository {
    /// Build a repository from parsed metadata.
    ///
    /// Fails on duplicate identifiers; later lookups can then trust the
    /// maps to be unambiguous.
    pub fn from_metadata(metadata: SdkMetadata) -> Result<Self, SymbolError> {
        let mut fields = IndexMap::with_capacity(metadata.fields.len());
        let mut nodes = IndexMap::with_capacity(metadata.xml_structure.len());
        let mut codelists = IndexMap::with_capacity(metadata.codelists.len());
        let mut fields_by_xpath = HashMap::with_capacity(metadata.fields.len());

        for node in metadata.xml_structure {
            let symbol = NodeSymbol {
                id: node.id.clone(),
                parent_id: node.parent_id,
                xpath: XPath::parse(&node.xpath_absolute),
            };
            if nodes.insert(node.id.clone(), symbol).is_some() {
                return Err(SymbolError::Duplicate { kind: "node", id: node.id });
            }
        }

        for field in metadata.fields {
            let symbol = FieldSymbol {
                id: field.id.clone(),
                parent_node_id: field.parent_node_id,
                xpath: XPath::parse(&field.xpath_absolute),
                field_type: field.field_type,
                codelist_id: field.code_list.map(|c| c.value.id),
            };
            fields_by_xpath.insert(symbol.xpath.to_string(), field.id.clone());
            if fields.insert(field.id.clone(), symbol).is_some() {
                return Err(SymbolError::Duplicate { kind: "field", id: field.id });
            }
        }

        for codelist in metadata.codelists {
            let entry = Codelist {
                id: codelist.id.clone(),
                parent_id: codelist.parent_id,
                codes: codelist.values,
            };
            if codelists.insert(codelist.id.clone(), entry).is_some() {
                return Err(SymbolError::Duplicate { kind: "codelist", id: codelist.id });
            }
        }

        Ok(Self {
            version: metadata.sdk_version,
            fields,
            nodes,
            codelists,
            fields_by_xpath,
        })
    }

    /// Load a repository from a schema-metadata JSON file.
    pub fn load(path: &Path) -> Result<Self, SymbolError> {
        let text = std::fs::read_to_string(path)?;
        let metadata: SdkMetadata = serde_json::from_str(&text)?;
        Self::from_metadata(metadata)
    }

    /// The schema version this repository serves.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Look up a field definition.
    pub fn field(&self, id: &str) -> Result<&FieldSymbol, SymbolError> {
        self.fields
            .get(id)
            .ok_or_else(|| SymbolError::FieldNotFound(id.to_string()))
    }

    /// Look up a node definition.
    pub fn node(&self, id: &str) -> Result<&NodeSymbol, SymbolError> {
        self.nodes
            .get(id)
            .ok_or_else(|| SymbolError::NodeNotFound(id.to_string()))
    }

    /// Absolute location of a field's value.
    pub fn absolute_path_of_field(&self, id: &str) -> Result<XPath, SymbolError> {
        Ok(self.field(id)?.xpath.clone())
    }

    /// Absolute location of a node.
    pub fn absolute_path_of_node(&self, id: &str) -> Result<XPath, SymbolError> {
        Ok(self.node(id)?.xpath.clone())
    }

    /// A field's location relative to a context path.
    pub fn relative_path_of_field(&self, id: &str, context: &XPath) -> Result<XPath, SymbolError> {
        Ok(contextualize(context, &self.field(id)?.xpath))
    }

    /// A node's location relative to a context path.
    pub fn relative_path_of_node(&self, id: &str, context: &XPath) -> Result<XPath, SymbolError> {
        Ok(contextualize(context, &self.node(id)?.xpath))
    }

    /// Declared data type of a field's value.
    pub fn type_of_field(&self, id: &str) -> Result<DataType, SymbolError> {
        Ok(self.field(id)?.field_type.data_type())
    }

    /// Declared field type (the metadata-level type, not the data type).
    pub fn field_type_of_field(&self, id: &str) -> Result<FieldType, SymbolError> {
        Ok(self.field(id)?.field_type)
    }

    /// Identifier of the node a field belongs to.
    pub fn parent_node_of_field(&self, id: &str) -> Result<&str, SymbolError> {
        Ok(&self.field(id)?.parent_node_id)
    }

    /// Root of the codelist chain attached to a field.
    ///
    /// Tailored codelists point at their parent; the root id is what label
    /// keys are built from.
    pub fn root_codelist_of_field(&self, id: &str) -> Result<&str, SymbolError> {
        let field = self.field(id)?;
        let start = field
            .codelist_id
            .as_deref()
            .ok_or_else(|| SymbolError::FieldWithoutCodelist(id.to_string()))?;
        let mut current = self.codelist(start)?;
        while let Some(parent_id) = current.parent_id.as_deref() {
            current = self.codelist(parent_id)?;
        }
        Ok(&current.id)
    }

    /// Look up a codelist definition.
    pub fn codelist(&self, id: &str) -> Result<&Codelist, SymbolError> {
        self.codelists
            .get(id)
            .ok_or_else(|| SymbolError::CodelistMissing(id.to_string()))
    }

    /// Codes of a codelist, in declared order.
    pub fn expand_codelist(&self, id: &str) -> Result<&[String], SymbolError> {
        Ok(&self.codelist(id)?.codes)
    }

    /// Whether a field's location ends in an attribute step.
    pub fn is_attribute_field(&self, id: &str) -> Result<bool, SymbolError> {
        Ok(self.field(id)?.xpath.is_attribute())
    }

    /// Name of a field's trailing attribute, when it has one.
    pub fn attribute_name_of_field(&self, id: &str) -> Result<Option<&str>, SymbolError> {
        Ok(self.field(id)?.xpath.attribute_name())
    }

    /// A field's location with its trailing attribute step removed.
    pub fn path_of_field_without_attribute(&self, id: &str) -> Result<XPath, SymbolError> {
        Ok(self.field(id)?.xpath.without_attribute())
    }

    /// The field declared at an absolute location, if any.
    pub fn field_id_for_absolute_path(&self, path: &XPath) -> Result<&str, SymbolError> {
        self.fields_by_xpath
            .get(&path.to_string())
            .map(String::as_str)
            .ok_or_else(|| SymbolError::PathNotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_json() -> &'static str {
        r#"{
            "sdkVersion": "1.0",
            "fields": [
                {
                    "id": "BT-00-Code",
                    "parentNodeId": "ND-Business",
                    "xpathAbsolute": "/*/PathNode/CodeField/normalize-space(text())",
                    "type": "code",
                    "codeList": { "value": { "id": "currencies-tailored" } }
                },
                {
                    "id": "BT-00-Indicator",
                    "parentNodeId": "ND-Root",
                    "xpathAbsolute": "/*/IndicatorField",
                    "type": "indicator"
                },
                {
                    "id": "BT-00-Attribute",
                    "parentNodeId": "ND-Business",
                    "xpathAbsolute": "/*/PathNode/CodeField/@listName",
                    "type": "text"
                }
            ],
            "xmlStructure": [
                { "id": "ND-Root", "xpathAbsolute": "/*" },
                { "id": "ND-Business", "parentId": "ND-Root", "xpathAbsolute": "/*/PathNode" }
            ],
            "codelists": [
                { "id": "currencies-tailored", "parentId": "currencies", "values": ["EUR"] },
                { "id": "currencies", "values": ["EUR", "SEK", "GBP"] }
            ]
        }"#
    }

    fn repo() -> SymbolRepository {
        let metadata: SdkMetadata = serde_json::from_str(sample_json()).unwrap();
        SymbolRepository::from_metadata(metadata).unwrap()
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(sample_json().as_bytes()).unwrap();
        let repo = SymbolRepository::load(file.path()).unwrap();
        assert_eq!(repo.version(), "1.0");
        assert!(repo.field("BT-00-Code").is_ok());
    }

    #[test]
    fn test_absolute_and_relative_paths() {
        let repo = repo();
        let node = repo.absolute_path_of_node("ND-Business").unwrap();
        assert_eq!(node.to_string(), "/*/PathNode");
        let relative = repo.relative_path_of_field("BT-00-Code", &node).unwrap();
        assert_eq!(relative.to_string(), "CodeField/normalize-space(text())");
    }

    #[test]
    fn test_round_trip_with_contextualize() {
        let repo = repo();
        let node_path = repo.absolute_path_of_node("ND-Business").unwrap();
        let field_path = repo.absolute_path_of_field("BT-00-Code").unwrap();
        assert_eq!(
            contextualize(&node_path, &field_path),
            repo.relative_path_of_field("BT-00-Code", &node_path).unwrap()
        );
    }

    #[test]
    fn test_type_of_field() {
        let repo = repo();
        assert_eq!(repo.type_of_field("BT-00-Code").unwrap(), DataType::String);
        assert_eq!(
            repo.type_of_field("BT-00-Indicator").unwrap(),
            DataType::Boolean
        );
    }

    #[test]
    fn test_root_codelist_follows_parent_chain() {
        let repo = repo();
        assert_eq!(repo.root_codelist_of_field("BT-00-Code").unwrap(), "currencies");
    }

    #[test]
    fn test_expand_codelist_keeps_order() {
        let repo = repo();
        assert_eq!(
            repo.expand_codelist("currencies").unwrap(),
            &["EUR", "SEK", "GBP"]
        );
    }

    #[test]
    fn test_attribute_field() {
        let repo = repo();
        assert!(repo.is_attribute_field("BT-00-Attribute").unwrap());
        assert_eq!(
            repo.attribute_name_of_field("BT-00-Attribute").unwrap(),
            Some("listName")
        );
        assert_eq!(
            repo.path_of_field_without_attribute("BT-00-Attribute")
                .unwrap()
                .to_string(),
            "/*/PathNode/CodeField"
        );
        assert!(!repo.is_attribute_field("BT-00-Code").unwrap());
    }

    #[test]
    fn test_reverse_lookup() {
        let repo = repo();
        let path = XPath::parse("/*/PathNode/CodeField/normalize-space(text())");
        assert_eq!(repo.field_id_for_absolute_path(&path).unwrap(), "BT-00-Code");
        assert!(repo
            .field_id_for_absolute_path(&XPath::parse("/*/Nowhere"))
            .is_err());
    }

    #[test]
    fn test_unknown_symbols() {
        let repo = repo();
        assert!(matches!(
            repo.field("BT-99-Missing"),
            Err(SymbolError::FieldNotFound(_))
        ));
        assert!(matches!(
            repo.codelist("no-such-list"),
            Err(SymbolError::CodelistMissing(_))
        ));
    }
}
