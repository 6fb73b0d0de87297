//! End-to-end translation through the shipped XPath/XSLT back-end.

use std::sync::Arc;

use efx_ast::foundation::{contextualize, DataType};
use efx_symbols::{SdkMetadata, SymbolRepository};
use efx_translate::{
    translate_expression, translate_template, BackendRegistry, SymbolResolver, ANY_VERSION,
};
use efx_xpath::{XPathScriptComposer, XsltMarkupComposer};

fn repo() -> SymbolRepository {
    let metadata: SdkMetadata = serde_json::from_str(
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
        }"#,
    )
    .unwrap();
    SymbolRepository::from_metadata(metadata).unwrap()
}

#[test]
fn test_boolean_expression_maps_equality() {
    let repo = repo();
    let result = translate_expression(
        &repo,
        &XPathScriptComposer::new(),
        "ND-Root",
        "not(1 = 2) and (2 = 2)",
    )
    .unwrap();
    assert_eq!(result.script(), "not(1 == 2) and (2 == 2)");
    assert_eq!(result.data_type(), DataType::Boolean);
}

#[test]
fn test_absolute_path_atom_becomes_symbolic_reference() {
    let repo = repo();
    let result = translate_expression(
        &repo,
        &XPathScriptComposer::new(),
        "ND-Root",
        "count(/*/PathNode/CodeField/normalize-space(text())) = 1",
    )
    .unwrap();
    assert_eq!(result.script(), "count(/BT-00-Code) == 1");
}

#[test]
fn test_codelist_containment() {
    let repo = repo();
    let result = translate_expression(
        &repo,
        &XPathScriptComposer::new(),
        "ND-Business",
        "BT-00-Code in codelist:currencies",
    )
    .unwrap();
    assert_eq!(
        result.script(),
        "CodeField/normalize-space(text()) == ('EUR', 'SEK', 'GBP')"
    );
}

#[test]
fn test_relative_path_round_trip() {
    let repo = repo();
    let node = repo.absolute_path_of_node("ND-Business").unwrap();
    let field = SymbolResolver::absolute_path_of_field(&repo, "BT-00-Code").unwrap();
    assert_eq!(
        contextualize(&node, &field),
        SymbolResolver::relative_path_of_field(&repo, "BT-00-Code", &node).unwrap()
    );
}

#[test]
fn test_template_renders_a_stylesheet() {
    let repo = repo();
    let output = translate_template(
        &repo,
        &XPathScriptComposer::new(),
        &XsltMarkupComposer::new(),
        "{ND-Business} Currency: ${BT-00-Code}\n\t{BT-00-Indicator} flag\n",
    )
    .unwrap();
    assert!(output.starts_with("<?xml"));
    // Top-level call-site switches into the block's context.
    assert!(output.contains(
        "<xsl:for-each select=\"/*/PathNode\">\
         <xsl:call-template name=\"block01\"></xsl:call-template></xsl:for-each>"
    ));
    // The nested block's call-site is relative to its parent's context.
    assert!(output.contains("<xsl:for-each select=\"../IndicatorField\">"));
    assert!(output.contains("<xsl:value-of select=\"CodeField/normalize-space(text())\"/>"));
    assert!(output.contains("<xsl:template name=\"block0101\">"));
}

#[test]
fn test_registry_serves_the_back_end_for_any_version() {
    let repo = repo();
    let mut registry = BackendRegistry::new();
    registry
        .register_script(ANY_VERSION, "xpath", Arc::new(XPathScriptComposer::new()))
        .unwrap();
    registry
        .register_markup(ANY_VERSION, "xslt", Arc::new(XsltMarkupComposer::new()))
        .unwrap();

    let script = registry.script(repo.version(), "xpath").unwrap();
    let result = translate_expression(&repo, script.as_ref(), "ND-Root", "1 + 2 = 3").unwrap();
    assert_eq!(result.script(), "1 + 2 == 3");

    assert!(registry.markup(repo.version(), "xslt").is_ok());
    assert!(registry.script(repo.version(), "sql").is_err());
}
