//! Serde model of the schema-metadata JSON.
//!
//! Mirrors the notice schema's JSON description:
//!
//! ```json
//! {
//!   "sdkVersion": "1.0",
//!   "fields": [{ "id": "BT-00-Code", "parentNodeId": "ND-Root",
//!                "xpathAbsolute": "/*/PathNode/CodeField",
//!                "type": "code",
//!                "codeList": { "value": { "id": "currencies" } } }],
//!   "xmlStructure": [{ "id": "ND-Root", "xpathAbsolute": "/*" }],
//!   "codelists": [{ "id": "currencies", "parentId": null,
//!                   "values": ["EUR", "SEK"] }]
//! }
//! ```
//!
//! These are transport structures only; [`crate::SymbolRepository`] turns
//! them into indexed symbols with parsed paths.

use efx_ast::foundation::DataType;
use serde::Deserialize;

/// Top-level schema-metadata document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkMetadata {
    /// Schema version this metadata describes
    pub sdk_version: String,
    /// Field definitions
    #[serde(default)]
    pub fields: Vec<FieldMeta>,
    /// Node definitions
    #[serde(default)]
    pub xml_structure: Vec<NodeMeta>,
    /// Codelist definitions
    #[serde(default)]
    pub codelists: Vec<CodelistMeta>,
}

/// One field definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMeta {
    /// Field identifier, e.g. `BT-00-Code`
    pub id: String,
    /// Identifier of the node this field belongs to
    pub parent_node_id: String,
    /// Absolute location of the field's value
    pub xpath_absolute: String,
    /// Declared field type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Codelist attachment, for `code`/`internal-code` fields
    #[serde(default)]
    pub code_list: Option<CodeListAttachment>,
}

/// Codelist attachment on a field.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeListAttachment {
    /// The attached codelist
    pub value: CodeListValue,
}

/// Inner codelist reference.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeListValue {
    /// Codelist identifier
    pub id: String,
}

/// One node definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMeta {
    /// Node identifier, e.g. `ND-Root`
    pub id: String,
    /// Parent node identifier; absent on the root
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Absolute location of the node
    pub xpath_absolute: String,
}

/// One codelist definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodelistMeta {
    /// Codelist identifier
    pub id: String,
    /// Parent codelist this one tailors, if any
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Codes in declared order
    #[serde(default)]
    pub values: Vec<String>,
}

/// Declared field types.
///
/// The declared type selects the [`DataType`] a field-value reference
/// carries, and drives indirect label resolution (`indicator`, `code`
/// and `internal-code` are the only label-resolvable types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum FieldType {
    /// Boolean indicator
    #[serde(rename = "indicator")]
    Indicator,
    /// Code from a codelist
    #[serde(rename = "code")]
    Code,
    /// Code from an internal (non-published) codelist
    #[serde(rename = "internal-code")]
    InternalCode,
    /// Plain text
    #[serde(rename = "text")]
    Text,
    /// Language-qualified text
    #[serde(rename = "text-multilingual")]
    TextMultilingual,
    /// Identifier string
    #[serde(rename = "id")]
    Id,
    /// Reference to an identifier
    #[serde(rename = "id-ref")]
    IdRef,
    /// Email address
    #[serde(rename = "email")]
    Email,
    /// Phone number
    #[serde(rename = "phone")]
    Phone,
    /// URL
    #[serde(rename = "url")]
    Url,
    /// Decimal number
    #[serde(rename = "number")]
    Number,
    /// Integer
    #[serde(rename = "integer")]
    Integer,
    /// Monetary amount
    #[serde(rename = "amount")]
    Amount,
    /// Calendar date
    #[serde(rename = "date")]
    Date,
    /// Time of day
    #[serde(rename = "time")]
    Time,
    /// Duration measure
    #[serde(rename = "measure")]
    Measure,
}

impl FieldType {
    /// The data type a value reference to a field of this type carries.
    pub fn data_type(self) -> DataType {
        match self {
            FieldType::Indicator => DataType::Boolean,
            FieldType::TextMultilingual => DataType::MultilingualString,
            FieldType::Number | FieldType::Integer | FieldType::Amount => DataType::Number,
            FieldType::Date => DataType::Date,
            FieldType::Time => DataType::Time,
            FieldType::Measure => DataType::Duration,
            FieldType::Code
            | FieldType::InternalCode
            | FieldType::Text
            | FieldType::Id
            | FieldType::IdRef
            | FieldType::Email
            | FieldType::Phone
            | FieldType::Url => DataType::String,
        }
    }

    /// The declared-type name as written in the metadata.
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Indicator => "indicator",
            FieldType::Code => "code",
            FieldType::InternalCode => "internal-code",
            FieldType::Text => "text",
            FieldType::TextMultilingual => "text-multilingual",
            FieldType::Id => "id",
            FieldType::IdRef => "id-ref",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Url => "url",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Amount => "amount",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Measure => "measure",
        }
    }
}
