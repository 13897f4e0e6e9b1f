//! Partial document merging
//!
//! Each successfully processed batch yields a [`SpecFragment`]; this module
//! folds them into one [`OpenApiDocument`] with a fixed envelope. Key
//! collisions resolve to the later fragment (fragments describe disjoint file
//! sets, so collisions are rare and non-adversarial).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

pub const OPENAPI_VERSION: &str = "3.0.0";
pub const DOCUMENT_VERSION: &str = "1.0.0";

/// One batch's parsed partial API description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecFragment {
    #[serde(default)]
    pub paths: Map<String, Value>,
    #[serde(default)]
    pub components: FragmentComponents,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FragmentComponents {
    #[serde(default)]
    pub schemas: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub title: String,
    pub version: String,
    pub description: String,
}

/// The cumulative OpenAPI-shaped document for one project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: DocumentInfo,
    pub paths: Map<String, Value>,
    pub components: FragmentComponents,
}

impl OpenApiDocument {
    /// Creates an empty document with the fixed envelope
    pub fn new(project_name: &str) -> Self {
        Self {
            openapi: OPENAPI_VERSION.to_string(),
            info: DocumentInfo {
                title: project_name.to_string(),
                version: DOCUMENT_VERSION.to_string(),
                description: format!(
                    "Automatically generated API documentation for {}",
                    project_name
                ),
            },
            paths: Map::new(),
            components: FragmentComponents::default(),
        }
    }

    /// Shallow-merges one fragment into the document, last write wins.
    pub fn absorb(&mut self, fragment: &SpecFragment) {
        for (path, item) in &fragment.paths {
            if self.paths.contains_key(path) {
                debug!(path = %path, "Overwriting previously merged path");
            }
            self.paths.insert(path.clone(), item.clone());
        }
        for (name, schema) in &fragment.components.schemas {
            if self.components.schemas.contains_key(name) {
                debug!(schema = %name, "Overwriting previously merged schema");
            }
            self.components.schemas.insert(name.clone(), schema.clone());
        }
    }

    pub fn route_count(&self) -> usize {
        self.paths.len()
    }

    pub fn schema_count(&self) -> usize {
        self.components.schemas.len()
    }
}

/// Merges fragments in arrival order into a fresh document.
pub fn merge_fragments(project_name: &str, fragments: &[SpecFragment]) -> OpenApiDocument {
    let mut document = OpenApiDocument::new(project_name);
    for fragment in fragments {
        document.absorb(fragment);
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(json: &str) -> SpecFragment {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_envelope_is_fixed() {
        let document = merge_fragments("shop-api", &[]);
        assert_eq!(document.openapi, "3.0.0");
        assert_eq!(document.info.title, "shop-api");
        assert_eq!(document.info.version, "1.0.0");
        assert!(document.paths.is_empty());
        assert!(document.components.schemas.is_empty());
    }

    #[test]
    fn test_merge_collects_paths_and_schemas() {
        let a = fragment(
            r#"{"paths": {"/users": {"get": {}}}, "components": {"schemas": {"User": {}}}}"#,
        );
        let b = fragment(
            r#"{"paths": {"/orders": {"post": {}}}, "components": {"schemas": {"Order": {}}}}"#,
        );

        let document = merge_fragments("shop-api", &[a, b]);
        assert_eq!(document.route_count(), 2);
        assert_eq!(document.schema_count(), 2);
        assert!(document.paths.contains_key("/users"));
        assert!(document.paths.contains_key("/orders"));
    }

    #[test]
    fn test_later_fragment_wins_on_collision() {
        let a = fragment(r#"{"paths": {"/users": {"get": {"summary": "first"}}}}"#);
        let b = fragment(r#"{"paths": {"/users": {"get": {"summary": "second"}}}}"#);

        let document = merge_fragments("shop-api", &[a, b]);
        assert_eq!(document.route_count(), 1);
        assert_eq!(
            document.paths["/users"]["get"]["summary"],
            Value::String("second".to_string())
        );
    }

    #[test]
    fn test_merge_is_incremental() {
        // Merging [A, B] must equal merging [A] and then absorbing B.
        let a = fragment(
            r#"{"paths": {"/users": {"get": {}}}, "components": {"schemas": {"User": {}}}}"#,
        );
        let b = fragment(r#"{"paths": {"/users": {"get": {"summary": "v2"}}, "/orders": {}}}"#);

        let direct = merge_fragments("shop-api", &[a.clone(), b.clone()]);

        let mut incremental = merge_fragments("shop-api", &[a]);
        incremental.absorb(&b);

        assert_eq!(
            serde_json::to_value(&direct).unwrap(),
            serde_json::to_value(&incremental).unwrap()
        );
    }

    #[test]
    fn test_fragment_defaults_for_missing_keys() {
        let fragment: SpecFragment = serde_json::from_str(r#"{"paths": {"/a": {}}}"#).unwrap();
        assert!(fragment.components.schemas.is_empty());

        let fragment: SpecFragment = serde_json::from_str("{}").unwrap();
        assert!(fragment.paths.is_empty());
    }
}
