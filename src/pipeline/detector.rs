//! Best-effort web framework detection
//!
//! Inspects the collected manifest files for known framework dependencies.
//! The result only enriches prompt context; detection failure is never fatal
//! and degrades to a default instead.

use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::collector::CollectedFile;

/// Detected framework and language pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackInfo {
    pub framework: String,
    pub language: String,
}

impl Default for StackInfo {
    fn default() -> Self {
        Self {
            framework: "Unknown".to_string(),
            language: "JavaScript".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
}

/// Node web frameworks recognized in package.json, checked in order
const NODE_FRAMEWORKS: &[(&str, &str, &str)] = &[
    ("express", "Express", "JavaScript"),
    ("fastify", "Fastify", "JavaScript"),
    ("@nestjs/core", "NestJS", "TypeScript"),
];

/// Python web frameworks recognized in requirements.txt
const PYTHON_FRAMEWORKS: &[(&str, &str)] = &[
    ("flask", "Flask"),
    ("django", "Django"),
    ("fastapi", "FastAPI"),
];

/// Returns the best-effort framework/language for the collected files.
pub fn detect_stack(files: &[CollectedFile]) -> StackInfo {
    if let Some(manifest) = find_by_name(files, "package.json") {
        if let Some(stack) = detect_node_stack(&manifest.content) {
            debug!(framework = %stack.framework, "Detected framework from package.json");
            return stack;
        }
    }

    if let Some(requirements) = find_by_name(files, "requirements.txt") {
        if let Some(stack) = detect_python_stack(&requirements.content) {
            debug!(framework = %stack.framework, "Detected framework from requirements.txt");
            return stack;
        }
    }

    StackInfo::default()
}

fn find_by_name<'a>(files: &'a [CollectedFile], name: &str) -> Option<&'a CollectedFile> {
    files.iter().find(|f| {
        f.relative_path
            .rsplit('/')
            .next()
            .map(|n| n == name)
            .unwrap_or(false)
    })
}

fn detect_node_stack(manifest_content: &str) -> Option<StackInfo> {
    // A malformed manifest degrades to the default rather than failing.
    let manifest: PackageManifest = serde_json::from_str(manifest_content).ok()?;

    for (marker, framework, language) in NODE_FRAMEWORKS {
        if manifest.dependencies.contains_key(*marker)
            || manifest.dev_dependencies.contains_key(*marker)
        {
            return Some(StackInfo {
                framework: framework.to_string(),
                language: language.to_string(),
            });
        }
    }
    None
}

fn detect_python_stack(requirements: &str) -> Option<StackInfo> {
    let lowered = requirements.to_lowercase();
    for (marker, framework) in PYTHON_FRAMEWORKS {
        let found = lowered.lines().any(|line| {
            let name = line
                .split(['=', '<', '>', '~', '!', '[', ' ', ';'])
                .next()
                .unwrap_or("")
                .trim();
            name == *marker
        });
        if found {
            return Some(StackInfo {
                framework: framework.to_string(),
                language: "Python".to_string(),
            });
        }
    }
    None
}
