//! Shared fixtures for integration tests

use std::fs;
use std::path::Path;

/// Writes a file under `root`, creating parent directories as needed.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Turns `dir` into a git repository with everything committed, so it can be
/// cloned through the fetcher like any remote.
pub fn commit_all(dir: &Path) {
    let repo = git2::Repository::init(dir).unwrap();
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = git2::Signature::now("tester", "tester@example.com").unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
        .unwrap();
}

/// A three-file Express-like project with one route file.
pub fn express_fixture(dir: &Path) {
    write_file(
        dir,
        "package.json",
        r#"{"name": "shop-api", "dependencies": {"express": "^4.18.0"}}"#,
    );
    write_file(
        dir,
        "app.js",
        "const express = require('express');\nconst app = express();\napp.listen(3000);\n",
    );
    write_file(
        dir,
        "routes/users.js",
        "const router = require('express').Router();\nrouter.get('/users', (req, res) => res.json([]));\nmodule.exports = router;\n",
    );
    commit_all(dir);
}

/// A minimal fragment response covering a single route.
pub fn fragment_response(path: &str) -> String {
    serde_json::json!({
        "paths": { path: { "get": { "summary": "List", "responses": {} } } },
        "components": { "schemas": {} }
    })
    .to_string()
}
