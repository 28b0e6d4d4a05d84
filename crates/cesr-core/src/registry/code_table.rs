//! Registry backed by the generated `sizes.json` / `codex.json` /
//! `counter.json` documents.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use super::{CodeKind, Descriptor, Registry, Repeat};
use crate::error::CesrError;

const KERI_V1_SIZES: &str = include_str!("../../tables/sizes.json");
const KERI_V1_CODEX: &str = include_str!("../../tables/codex.json");
const KERI_V1_COUNTER: &str = include_str!("../../tables/counter.json");

#[derive(Debug, Deserialize)]
struct SizeEntry {
    hs: usize,
    ss: usize,
    #[serde(default)]
    os: usize,
    fs: Option<usize>,
    #[serde(default)]
    ls: usize,
}

#[derive(Debug, Deserialize)]
struct SizesDoc {
    #[serde(rename = "Matter", default)]
    matter: BTreeMap<String, SizeEntry>,
    #[serde(rename = "Indexer", default)]
    indexer: BTreeMap<String, SizeEntry>,
    #[serde(rename = "Counter", default)]
    counter: BTreeMap<String, SizeEntry>,
}

type CodexDoc = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Default, Deserialize)]
struct CounterEntry {
    name: Option<String>,
    repeat: Option<String>,
    #[serde(default)]
    frame: bool,
    #[serde(default)]
    version: bool,
    context: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CounterDoc {
    #[serde(rename = "Counter", default)]
    counter: BTreeMap<String, CounterEntry>,
    /// Alternate-version counter codes; sizes.json carries no sizes for them.
    #[serde(rename = "AltCounter", default)]
    alt_counter: BTreeMap<String, CounterEntry>,
}

/// Descriptors of one code space plus the hard sizes derived from them.
#[derive(Debug, Default)]
struct CodeSet {
    /// Hard-size prefix (first char, or first two for counters) to `hs`.
    hards: HashMap<Vec<u8>, usize>,
    codes: HashMap<String, Arc<Descriptor>>,
}

impl CodeSet {
    fn insert(&mut self, prefix_len: usize, descriptor: Descriptor) -> Result<(), CesrError> {
        let code = &descriptor.selector;
        if !code.is_ascii() || code.len() != descriptor.hs || code.len() < prefix_len {
            return Err(CesrError::table(format!(
                "code {code:?} does not match its hard size {}",
                descriptor.hs
            )));
        }
        let cs = descriptor.cs();
        match descriptor.fs {
            None if cs % 4 != 0 => {
                return Err(CesrError::table(format!(
                    "variable code {code:?} has code size {cs}, not a multiple of 4"
                )));
            }
            Some(fs) if fs % 4 != 0 || fs < cs => {
                return Err(CesrError::table(format!(
                    "code {code:?} has invalid full size {fs}"
                )));
            }
            _ => {}
        }
        if descriptor.os > descriptor.ss {
            return Err(CesrError::table(format!(
                "code {code:?} has other index wider than its soft part"
            )));
        }
        if let Some(repeat) = &descriptor.repeat {
            if Repeat::parse(repeat).is_none() {
                log::warn!("code {code:?} declares unknown repeat multiplier {repeat:?}");
            }
        }

        let prefix = code.as_bytes()[..prefix_len].to_vec();
        match self.hards.get(&prefix) {
            Some(&hs) if hs != descriptor.hs => {
                return Err(CesrError::table(format!(
                    "code {code:?} disagrees on hard size for prefix {:?}",
                    String::from_utf8_lossy(&prefix)
                )));
            }
            Some(_) => {}
            None => {
                self.hards.insert(prefix, descriptor.hs);
            }
        }
        self.codes.insert(code.clone(), Arc::new(descriptor));
        Ok(())
    }
}

#[derive(Debug)]
struct Tables {
    matter: CodeSet,
    indexer: CodeSet,
    counter: CodeSet,
}

/// Which primitive code space a [`CodeTable`] view decodes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTable {
    Matter,
    Indexer,
}

impl PrimitiveTable {
    fn label(self) -> &'static str {
        match self {
            PrimitiveTable::Matter => "Matter",
            PrimitiveTable::Indexer => "Indexer",
        }
    }
}

/// JSON-driven [`Registry`].
///
/// Cloning is cheap: the loaded tables and registered contexts are shared.
#[derive(Clone)]
pub struct CodeTable {
    tables: Arc<Tables>,
    primitives: PrimitiveTable,
    name: String,
    contexts: Arc<HashMap<String, Arc<dyn Registry>>>,
}

impl fmt::Debug for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut contexts: Vec<&String> = self.contexts.keys().collect();
        contexts.sort();
        f.debug_struct("CodeTable")
            .field("name", &self.name)
            .field("primitives", &self.primitives)
            .field("matter", &self.tables.matter.codes.len())
            .field("indexer", &self.tables.indexer.codes.len())
            .field("counter", &self.tables.counter.codes.len())
            .field("contexts", &contexts)
            .finish()
    }
}

impl CodeTable {
    /// Parses the three generated table documents.
    pub fn from_json(sizes: &str, codex: &str, counter: &str) -> Result<Self, CesrError> {
        let sizes: SizesDoc = serde_json::from_str(sizes)
            .map_err(|err| CesrError::table(format!("sizes: {err}")))?;
        let codex: CodexDoc = serde_json::from_str(codex)
            .map_err(|err| CesrError::table(format!("codex: {err}")))?;
        let mut counters: CounterDoc = serde_json::from_str(counter)
            .map_err(|err| CesrError::table(format!("counter: {err}")))?;

        if !counters.alt_counter.is_empty() {
            log::warn!(
                "ignoring {} AltCounter codes in counter.json: only Counter codes are decoded",
                counters.alt_counter.len()
            );
        }

        let name_of = |section: &str, code: &str| {
            codex
                .get(section)
                .and_then(|names| names.get(code))
                .cloned()
        };

        let mut matter = CodeSet::default();
        for (code, entry) in sizes.matter {
            let kind = if entry.fs.is_some() {
                CodeKind::FixedSize
            } else {
                CodeKind::VariableSize
            };
            let name = name_of("Matter", &code);
            matter.insert(1, primitive_descriptor(code, name, kind, entry))?;
        }

        let mut indexer = CodeSet::default();
        for (code, entry) in sizes.indexer {
            if entry.fs.is_none() {
                return Err(CesrError::table(format!(
                    "indexer code {code:?} has no full size"
                )));
            }
            let name = name_of("Indexer", &code);
            indexer.insert(1, primitive_descriptor(code, name, CodeKind::Indexer, entry))?;
        }

        let mut counter = CodeSet::default();
        for (code, entry) in sizes.counter {
            if !code.starts_with('-') || code.len() < 2 {
                return Err(CesrError::table(format!(
                    "counter code {code:?} must start with '-'"
                )));
            }
            let extra = counters.counter.remove(&code).unwrap_or_default();
            if extra.frame && extra.repeat.is_some() {
                return Err(CesrError::table(format!(
                    "counter code {code:?} cannot be both a frame and a group"
                )));
            }
            let kind = if extra.version {
                CodeKind::Version
            } else {
                CodeKind::Counter
            };
            let descriptor = Descriptor {
                name: extra.name.or_else(|| name_of("Counter", &code)),
                selector: code,
                kind,
                hs: entry.hs,
                ss: entry.ss,
                os: entry.os,
                fs: entry.fs,
                ls: entry.ls,
                repeat: extra.repeat,
                frame: extra.frame,
                context: extra.context,
            };
            counter.insert(2, descriptor)?;
        }
        if let Some(code) = counters.counter.keys().next() {
            return Err(CesrError::table(format!(
                "counter.json describes {code:?} which has no size entry"
            )));
        }

        Ok(Self {
            tables: Arc::new(Tables {
                matter,
                indexer,
                counter,
            }),
            primitives: PrimitiveTable::Matter,
            name: "CodeTable".to_string(),
            contexts: Arc::new(HashMap::new()),
        })
    }

    /// Reads `sizes.json`, `codex.json` and `counter.json` from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, CesrError> {
        let dir = dir.as_ref();
        let read = |file: &str| {
            let path = dir.join(file);
            fs::read_to_string(&path)
                .map_err(|err| CesrError::table(format!("{}: {err}", path.display())))
        };
        let table = Self::from_json(&read("sizes.json")?, &read("codex.json")?, &read("counter.json")?)?;
        Ok(table.named(dir.display().to_string()))
    }

    /// Bundled KERI v1 tables.
    pub fn keri_v1() -> Result<Self, CesrError> {
        Ok(Self::from_json(KERI_V1_SIZES, KERI_V1_CODEX, KERI_V1_COUNTER)?.named("KERI v1"))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a sub-protocol registry under a counter context name.
    pub fn with_context(mut self, name: impl Into<String>, registry: Arc<dyn Registry>) -> Self {
        Arc::make_mut(&mut self.contexts).insert(name.into(), registry);
        self
    }

    /// A view of the same tables decoding primitives from `primitives`.
    pub fn with_primitives(mut self, primitives: PrimitiveTable) -> Self {
        self.primitives = primitives;
        self
    }

    pub fn primitives(&self) -> PrimitiveTable {
        self.primitives
    }

    /// Descriptors of the active primitive table followed by the counters.
    pub fn descriptors(&self) -> impl Iterator<Item = &Arc<Descriptor>> {
        self.primitive_set()
            .codes
            .values()
            .chain(self.tables.counter.codes.values())
    }

    fn primitive_set(&self) -> &CodeSet {
        match self.primitives {
            PrimitiveTable::Matter => &self.tables.matter,
            PrimitiveTable::Indexer => &self.tables.indexer,
        }
    }
}

fn primitive_descriptor(
    code: String,
    name: Option<String>,
    kind: CodeKind,
    entry: SizeEntry,
) -> Descriptor {
    Descriptor {
        selector: code,
        name,
        kind,
        hs: entry.hs,
        ss: entry.ss,
        os: entry.os,
        fs: entry.fs,
        ls: entry.ls,
        repeat: None,
        frame: false,
        context: None,
    }
}

impl Registry for CodeTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn primitive_hard_size(&self, first: u8) -> Option<usize> {
        self.primitive_set().hards.get([first].as_slice()).copied()
    }

    fn counter_hard_size(&self, first_two: &[u8]) -> Option<usize> {
        self.tables.counter.hards.get(first_two).copied()
    }

    fn lookup(&self, selector: &str) -> Result<Arc<Descriptor>, CesrError> {
        let (set, label) = if selector.starts_with('-') {
            (&self.tables.counter, "Counter")
        } else {
            (self.primitive_set(), self.primitives.label())
        };
        set.codes
            .get(selector)
            .cloned()
            .ok_or_else(|| CesrError::unknown_code(format!("{} {label}", self.name), selector))
    }

    fn context(&self, name: &str) -> Result<Arc<dyn Registry>, CesrError> {
        match name {
            "Matter" => Ok(Arc::new(self.clone().with_primitives(PrimitiveTable::Matter))),
            "Indexer" => Ok(Arc::new(self.clone().with_primitives(PrimitiveTable::Indexer))),
            other => self
                .contexts
                .get(other)
                .cloned()
                .ok_or_else(|| CesrError::unknown_code(format!("{} context", self.name), other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keri() -> CodeTable {
        CodeTable::keri_v1().unwrap()
    }

    #[test]
    fn derives_hard_sizes_from_size_tables() {
        let table = keri();
        assert_eq!(table.primitive_hard_size(b'E'), Some(1));
        assert_eq!(table.primitive_hard_size(b'0'), Some(2));
        assert_eq!(table.primitive_hard_size(b'1'), Some(4));
        assert_eq!(table.primitive_hard_size(b'4'), Some(2));
        assert_eq!(table.primitive_hard_size(b'7'), Some(4));
        assert_eq!(table.primitive_hard_size(b'-'), None);
        assert_eq!(table.counter_hard_size(b"-A"), Some(2));
        assert_eq!(table.counter_hard_size(b"-0"), Some(3));
        assert_eq!(table.counter_hard_size(b"-_"), Some(5));
    }

    #[test]
    fn merges_counter_extras() {
        let table = keri();
        let sigs = table.lookup("-A").unwrap();
        assert_eq!(sigs.name.as_deref(), Some("ControllerIdxSigs"));
        assert_eq!(sigs.repeat.as_deref(), Some("x1"));
        assert_eq!(sigs.context.as_deref(), Some("Indexer"));
        assert!(table.lookup("-L").unwrap().frame);
        assert_eq!(table.lookup("-_AAA").unwrap().kind, CodeKind::Version);
        assert_eq!(table.lookup("4A").unwrap().kind, CodeKind::VariableSize);
    }

    #[test]
    fn indexer_view_switches_primitive_space() {
        let table = keri();
        let indexer = table.context("Indexer").unwrap();
        assert_eq!(indexer.primitive_hard_size(b'2'), Some(2));
        assert_eq!(table.primitive_hard_size(b'2'), None);
        assert_eq!(indexer.lookup("A").unwrap().kind, CodeKind::Indexer);
        assert_eq!(table.lookup("A").unwrap().kind, CodeKind::FixedSize);
    }

    #[test]
    fn unknown_context_and_selector() {
        let table = keri();
        assert!(matches!(
            table.context("Nope"),
            Err(CesrError::UnknownCode { code, .. }) if code == "Nope"
        ));
        assert!(matches!(
            table.lookup("-Z"),
            Err(CesrError::UnknownCode { code, .. }) if code == "-Z"
        ));
    }

    #[test]
    fn registered_context_resolves() {
        let sub = CodeTable::keri_v1().unwrap().named("sub");
        let table = keri().with_context("Sub", Arc::new(sub));
        assert_eq!(table.context("Sub").unwrap().name(), "sub");
    }

    #[test]
    fn rejects_misaligned_variable_code() {
        let sizes = r#"{"Matter": {"4A": {"hs": 2, "ss": 1, "fs": null, "ls": 0}}}"#;
        let err = CodeTable::from_json(sizes, "{}", "{}").unwrap_err();
        assert!(matches!(err, CesrError::Table { .. }));
    }

    #[test]
    fn rejects_inconsistent_hard_sizes() {
        let sizes = r#"{"Matter": {
            "0A": {"hs": 2, "ss": 0, "fs": 24, "ls": 0},
            "0AAA": {"hs": 4, "ss": 0, "fs": 48, "ls": 0}
        }}"#;
        let err = CodeTable::from_json(sizes, "{}", "{}").unwrap_err();
        assert!(matches!(err, CesrError::Table { .. }));
    }

    #[test]
    fn rejects_orphan_counter_extras() {
        let counter = r#"{"Counter": {"-Z": {"name": "Ghost"}}}"#;
        let err = CodeTable::from_json("{}", "{}", counter).unwrap_err();
        assert!(matches!(err, CesrError::Table { .. }));
    }

    #[test]
    fn alt_counter_section_is_skipped() {
        let sizes = r#"{"Counter": {"-A": {"hs": 2, "ss": 2, "fs": 4, "ls": 0}}}"#;
        let counter = r#"{
            "Counter": {"-A": {"name": "ControllerIdxSigs", "repeat": "x1"}},
            "AltCounter": {"-A": {"name": "GenericGroup"}, "-Q": {"name": "Orphan"}}
        }"#;
        let table = CodeTable::from_json(sizes, "{}", counter).unwrap();
        let sigs = table.lookup("-A").unwrap();
        assert_eq!(sigs.name.as_deref(), Some("ControllerIdxSigs"));
        assert!(matches!(
            table.lookup("-Q"),
            Err(CesrError::UnknownCode { .. })
        ));
    }
}
