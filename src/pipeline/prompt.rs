//! Prompt construction
//!
//! Renders one batch of files plus project metadata into a single generation
//! instruction. Deterministic for identical inputs.

use super::collector::CollectedFile;
use super::detector::StackInfo;

/// Builds the instruction for one batch.
///
/// The output format constraints ask for a bare JSON object with `paths` and
/// `components.schemas`; natural-language portions must use
/// `documentation_language` while technical keys stay in the standard schema
/// vocabulary.
pub fn build_batch_prompt(
    project_name: &str,
    stack: &StackInfo,
    documentation_language: &str,
    batch: &[CollectedFile],
) -> String {
    let mut files_content = String::new();
    for file in batch {
        files_content.push_str(&format!(
            "\nFILE PATH: {}\nCONTENT:\n{}\n---",
            file.relative_path, file.content
        ));
    }

    format!(
        r#"Role: Senior API Documenter.
Task: Analyze code files and extract OpenAPI 3.0 definitions.

Project: {project_name} ({framework} / {language})

Instructions:
1. Return a JSON object with "paths" and "components.schemas" keys.
2. IMPORTANT: All descriptions, summaries, and explanations MUST be written in "{doc_language}".
3. Keep parameter names, schema keys, and other technical identifiers in English/code standard.
4. Output ONLY the JSON object. No prose, no markdown code fences.

Input Files:
{files_content}

Expected JSON structure:
{{
  "paths": {{
    "/example": {{
      "get": {{
        "summary": "...",
        "description": "...",
        "responses": {{ }}
      }}
    }}
  }},
  "components": {{
    "schemas": {{ }}
  }}
}}"#,
        project_name = project_name,
        framework = stack.framework,
        language = stack.language,
        doc_language = documentation_language,
        files_content = files_content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn batch() -> Vec<CollectedFile> {
        vec![
            CollectedFile {
                absolute_path: PathBuf::from("/repo/routes/users.js"),
                relative_path: "routes/users.js".to_string(),
                content: "router.get('/users', handler);".to_string(),
                priority: 1,
            },
            CollectedFile {
                absolute_path: PathBuf::from("/repo/app.js"),
                relative_path: "app.js".to_string(),
                content: "const app = express();".to_string(),
                priority: 2,
            },
        ]
    }

    #[test]
    fn test_prompt_contains_project_and_files() {
        let stack = StackInfo {
            framework: "Express".to_string(),
            language: "JavaScript".to_string(),
        };
        let prompt = build_batch_prompt("shop-api", &stack, "en", &batch());

        assert!(prompt.contains("shop-api (Express / JavaScript)"));
        assert!(prompt.contains("FILE PATH: routes/users.js"));
        assert!(prompt.contains("FILE PATH: app.js"));
        assert!(prompt.contains("router.get('/users', handler);"));
    }

    #[test]
    fn test_prompt_carries_documentation_language() {
        let prompt = build_batch_prompt("shop-api", &StackInfo::default(), "pt-BR", &batch());
        assert!(prompt.contains("written in \"pt-BR\""));
    }

    #[test]
    fn test_prompt_demands_bare_json() {
        let prompt = build_batch_prompt("shop-api", &StackInfo::default(), "en", &batch());
        assert!(prompt.contains("ONLY the JSON object"));
        assert!(prompt.contains("\"paths\""));
        assert!(prompt.contains("components.schemas"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let stack = StackInfo::default();
        let a = build_batch_prompt("shop-api", &stack, "en", &batch());
        let b = build_batch_prompt("shop-api", &stack, "en", &batch());
        assert_eq!(a, b);
    }
}
