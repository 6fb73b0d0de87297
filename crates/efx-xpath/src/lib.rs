//! # XPath/XSLT back-end
//!
//! The shipped target back-end for the EFX translation engine:
//!
//! - [`script::XPathScriptComposer`] — expression emission in an XPath
//!   2.0 dialect with `==` value equality
//! - [`markup::XsltMarkupComposer`] — template emission as an XSLT
//!   stylesheet of named, parameterized fragments
//!
//! Both composers are stateless and valid for any schema version; a
//! caller typically registers them under the engine's any-version key.

pub mod markup;
pub mod script;

pub use markup::XsltMarkupComposer;
pub use script::XPathScriptComposer;
