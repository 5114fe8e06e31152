//! Configuration for sotto

use crate::SottoError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration as TOML
pub const DEFAULT_CONFIG: &str = r#"# Sotto Configuration

[scan]
# Directory names never descended into during a scan.
# These cover build output, dependency, cache, and VCS directories that
# would otherwise dominate the index on real project trees.
ignored_dirs = [
    "__pycache__", "node_modules", ".git", ".vscode", ".idea",
    "dist", "build", "target", "out", "bin", "obj",
    ".next", ".nuxt", "coverage", ".nyc_output",
    "logs", "tmp", "temp", "cache", ".cache",
    "venv", "env", ".env", "envs", ".venv",
    "site-packages", ".pytest_cache", ".mypy_cache",
    "vendor", "bower_components", "jspm_packages",
    "typings", "lib", "libs", "packages",
    ".gradle", ".mvn", "node", ".yarn",
    "android", "ios", "platforms", "plugins",
    ".expo", ".expo-shared", "web-build",
    "public", "static", "assets", "media",
]
"#;

/// Sotto configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_ignored_dirs")]
    pub ignored_dirs: Vec<String>,
}

fn default_ignored_dirs() -> Vec<String> {
    [
        "__pycache__",
        "node_modules",
        ".git",
        ".vscode",
        ".idea",
        "dist",
        "build",
        "target",
        "out",
        "bin",
        "obj",
        ".next",
        ".nuxt",
        "coverage",
        ".nyc_output",
        "logs",
        "tmp",
        "temp",
        "cache",
        ".cache",
        "venv",
        "env",
        ".env",
        "envs",
        ".venv",
        "site-packages",
        ".pytest_cache",
        ".mypy_cache",
        "vendor",
        "bower_components",
        "jspm_packages",
        "typings",
        "lib",
        "libs",
        "packages",
        ".gradle",
        ".mvn",
        "node",
        ".yarn",
        "android",
        "ios",
        "platforms",
        "plugins",
        ".expo",
        ".expo-shared",
        "web-build",
        "public",
        "static",
        "assets",
        "media",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignored_dirs: default_ignored_dirs(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Err(SottoError::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| SottoError::ConfigParse(e.to_string()))
    }
}
