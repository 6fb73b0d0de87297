//! XSLT markup composer.
//!
//! Renders template content as an XSLT stylesheet: one named template per
//! content block, `xsl:for-each` plus `xsl:call-template` at every
//! call-site, and a root template holding the top-level call-sites. Label
//! lookups go through an `efx:label` extension function so the label
//! catalogue stays a runtime concern of the stylesheet host.

use efx_ast::foundation::{TypedExpression, XPath};
use efx_translate::MarkupComposer;

/// Escape text for XML content and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// The shipped XSLT back-end, valid for any schema version.
#[derive(Debug, Default)]
pub struct XsltMarkupComposer;

impl XsltMarkupComposer {
    pub fn new() -> Self {
        Self
    }
}

impl MarkupComposer for XsltMarkupComposer {
    fn render_free_text(&self, text: &str) -> String {
        format!("<xsl:text>{}</xsl:text>", escape(text))
    }

    fn render_label_from_key(&self, key: &str) -> String {
        format!("<xsl:value-of select=\"efx:label('{}')\"/>", escape(key))
    }

    fn render_label_from_expression(&self, expression: &TypedExpression) -> String {
        format!(
            "<xsl:value-of select=\"efx:label({})\"/>",
            escape(expression.script())
        )
    }

    fn render_value_reference(&self, value: &TypedExpression) -> String {
        format!("<xsl:value-of select=\"{}\"/>", escape(value.script()))
    }

    fn compose_fragment_definition(
        &self,
        name: &str,
        outline_number: &str,
        body: &str,
        parameters: &[String],
    ) -> String {
        let mut fragment = format!("<xsl:template name=\"{}\">", name);
        for parameter in parameters {
            fragment.push_str(&format!("<xsl:param name=\"{}\"/>", parameter));
        }
        fragment.push_str("<section>");
        if !outline_number.is_empty() {
            fragment.push_str(&format!("<xsl:text>{} </xsl:text>", outline_number));
        }
        fragment.push_str(body);
        fragment.push_str("</section></xsl:template>");
        fragment
    }

    fn render_fragment_invocation(
        &self,
        name: &str,
        context_path: &XPath,
        parameters: &[String],
    ) -> String {
        let mut call = format!("<xsl:call-template name=\"{}\">", name);
        for parameter in parameters {
            call.push_str(&format!(
                "<xsl:with-param name=\"{p}\" select=\"${p}\"/>",
                p = parameter
            ));
        }
        call.push_str("</xsl:call-template>");
        format!(
            "<xsl:for-each select=\"{}\">{}</xsl:for-each>",
            escape(&context_path.to_string()),
            call
        )
    }

    fn compose_output_file(&self, call_sites: &[String], fragments: &[String]) -> String {
        let mut out = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <xsl:stylesheet version=\"2.0\" \
             xmlns:xsl=\"http://www.w3.org/1999/XSL/Transform\" \
             xmlns:efx=\"urn:efx:labels\">\n",
        );
        out.push_str("<xsl:template match=\"/\"><html><body>");
        for site in call_sites {
            out.push_str(site);
        }
        out.push_str("</body></html></xsl:template>\n");
        for fragment in fragments {
            out.push_str(fragment);
            out.push('\n');
        }
        out.push_str("</xsl:stylesheet>\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use efx_ast::foundation::{DataType, Shape};

    #[test]
    fn test_free_text_is_escaped() {
        let composer = XsltMarkupComposer::new();
        assert_eq!(
            composer.render_free_text("a < b"),
            "<xsl:text>a &lt; b</xsl:text>"
        );
    }

    #[test]
    fn test_value_reference_selects_the_script() {
        let composer = XsltMarkupComposer::new();
        let value = TypedExpression::new("CodeField", Shape::Path, DataType::String);
        assert_eq!(
            composer.render_value_reference(&value),
            "<xsl:value-of select=\"CodeField\"/>"
        );
    }

    #[test]
    fn test_fragment_definition_with_parameters_and_number() {
        let composer = XsltMarkupComposer::new();
        let fragment = composer.compose_fragment_definition(
            "block01",
            "1.2",
            "<xsl:text>x</xsl:text>",
            &["c".to_string()],
        );
        assert_eq!(
            fragment,
            "<xsl:template name=\"block01\"><xsl:param name=\"c\"/><section>\
             <xsl:text>1.2 </xsl:text><xsl:text>x</xsl:text></section></xsl:template>"
        );
    }

    #[test]
    fn test_invocation_switches_context() {
        let composer = XsltMarkupComposer::new();
        let call =
            composer.render_fragment_invocation("block01", &XPath::parse("PathNode"), &[]);
        assert_eq!(
            call,
            "<xsl:for-each select=\"PathNode\">\
             <xsl:call-template name=\"block01\"></xsl:call-template></xsl:for-each>"
        );
    }

    #[test]
    fn test_output_file_shape() {
        let composer = XsltMarkupComposer::new();
        let out = composer.compose_output_file(
            &["<site/>".to_string()],
            &["<fragment/>".to_string()],
        );
        assert!(out.starts_with("<?xml"));
        assert!(out.contains("<xsl:template match=\"/\"><html><body><site/></body></html>"));
        assert!(out.contains("<fragment/>"));
        assert!(out.ends_with("</xsl:stylesheet>\n"));
    }
}
