//! Normalized bundler report consumed by graph construction.
//!
//! Only the fields the layout needs are modelled. Everything is optional on
//! the wire so partially filled reports degrade to skipped modules and
//! dropped links instead of parse failures.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Stable integer identity of a module within one report.
pub type ModuleId = u64;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Stats {
    /// Flat module listing. Its length bounds the ids considered for nodes.
    #[serde(default)]
    pub modules: Vec<ModuleSummary>,
    /// Bundle/chunk file name to the modules it contains.
    #[serde(default)]
    pub chunks: BTreeMap<String, ChunkStats>,
}

impl Stats {
    /// Module ids to build nodes for, in listing order.
    ///
    /// Entries of the flat listing without an explicit id use their position;
    /// an id already taken by an earlier entry is skipped. Reports without a
    /// listing fall back to every id found in a chunk.
    pub fn module_ids(&self) -> Vec<ModuleId> {
        if self.modules.is_empty() {
            let ids: BTreeSet<ModuleId> = self
                .chunks
                .values()
                .flat_map(|chunk| chunk.modules.iter().filter_map(|m| m.id))
                .collect();
            return ids.into_iter().collect();
        }

        let mut seen = BTreeSet::new();
        self.modules
            .iter()
            .enumerate()
            .map(|(idx, m)| m.id.unwrap_or(idx as ModuleId))
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleSummary {
    #[serde(default)]
    pub id: Option<ModuleId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkStats {
    #[serde(default)]
    pub modules: Vec<ModuleStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleStats {
    /// Entries without an id never match a node.
    #[serde(default)]
    pub id: Option<ModuleId>,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub dirname: Option<String>,
    #[serde(default)]
    pub request: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub loaders: Vec<String>,
    #[serde(default)]
    pub reasons: Vec<Reason>,
}

impl ModuleStats {
    /// Display identity: directory, then request, then filename, then name.
    pub fn display_name(&self) -> Option<&str> {
        self.dirname
            .as_deref()
            .or(self.request.as_deref())
            .or(self.filename.as_deref())
            .or(self.name.as_deref())
    }
}

/// Why a module was included in the bundle.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reason {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub module: Option<ModuleRef>,
    #[serde(default)]
    pub user_request: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub dirname: Option<String>,
    #[serde(rename = "async", default)]
    pub is_async: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonKind {
    Main,
    Context,
    Require,
}

impl Reason {
    /// Classify by substring, checking `main` before `context` before
    /// `require` (so `require.context` is a context reason).
    pub fn classify(&self) -> Option<ReasonKind> {
        if self.kind.contains("main") {
            Some(ReasonKind::Main)
        } else if self.kind.contains("context") {
            Some(ReasonKind::Context)
        } else if self.kind.contains("require") {
            Some(ReasonKind::Require)
        } else {
            None
        }
    }
}

/// A referenced module, given either by name or by numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ModuleRef {
    Id(ModuleId),
    Name(String),
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleRef::Id(id) => write!(f, "{}", id),
            ModuleRef::Name(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_report() {
        let stats: Stats = serde_json::from_str(
            r#"{
                "modules": [{ "id": 0 }, {}],
                "chunks": {
                    "main.js": { "modules": [
                        { "id": 0, "size": 12, "request": "./a.js",
                          "reasons": [{ "type": "require", "module": "./b.js", "async": true }] }
                    ] }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(stats.modules.len(), 2);
        let module = &stats.chunks["main.js"].modules[0];
        assert_eq!(module.display_name(), Some("./a.js"));
        assert!(module.reasons[0].is_async);
        assert_eq!(
            module.reasons[0].module,
            Some(ModuleRef::Name("./b.js".to_string()))
        );
    }

    #[test]
    fn test_display_name_precedence() {
        let module = ModuleStats {
            dirname: Some("dir".into()),
            request: Some("req".into()),
            filename: Some("file".into()),
            ..Default::default()
        };
        assert_eq!(module.display_name(), Some("dir"));

        let module = ModuleStats {
            filename: Some("file".into()),
            name: Some("name".into()),
            ..Default::default()
        };
        assert_eq!(module.display_name(), Some("file"));
        assert_eq!(ModuleStats::default().display_name(), None);
    }

    #[test]
    fn test_reason_classification_order() {
        let reason = |kind: &str| Reason {
            kind: kind.to_string(),
            ..Default::default()
        };
        assert_eq!(reason("main").classify(), Some(ReasonKind::Main));
        assert_eq!(reason("require.context").classify(), Some(ReasonKind::Context));
        assert_eq!(reason("cjs require").classify(), Some(ReasonKind::Require));
        assert_eq!(reason("harmony").classify(), None);
    }

    #[test]
    fn test_module_ids_fallback_to_chunks() {
        let stats: Stats = serde_json::from_str(
            r#"{ "chunks": {
                "a.js": { "modules": [{ "id": 4 }, { "id": 2 }] },
                "b.js": { "modules": [{ "id": 2 }] }
            } }"#,
        )
        .unwrap();
        assert_eq!(stats.module_ids(), vec![2, 4]);

        let stats: Stats =
            serde_json::from_str(r#"{ "modules": [{}, { "id": 9 }, {}] }"#).unwrap();
        assert_eq!(stats.module_ids(), vec![0, 9, 2]);
    }

    #[test]
    fn test_module_ids_are_unique() {
        let stats: Stats = serde_json::from_str(r#"{ "modules": [{ "id": 1 }, {}] }"#).unwrap();
        assert_eq!(stats.module_ids(), vec![1]);

        let stats: Stats =
            serde_json::from_str(r#"{ "modules": [{}, { "id": 0 }, { "id": 5 }, {}] }"#).unwrap();
        assert_eq!(stats.module_ids(), vec![0, 5, 3]);
    }

    #[test]
    fn test_numeric_module_reference() {
        let reason: Reason = serde_json::from_str(r#"{ "type": "require", "module": 7 }"#).unwrap();
        assert_eq!(reason.module, Some(ModuleRef::Id(7)));
        assert_eq!(reason.module.unwrap().to_string(), "7");
    }
}
