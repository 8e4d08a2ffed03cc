use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How the host environment exposes a pre-declared binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ambient {
    #[serde(rename = "readonly", alias = "readable")]
    ReadOnly,
    #[serde(rename = "writable", alias = "writeable")]
    Writable,
}

/// Named sets of ambient bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Builtin,
    Browser,
    Node,
}

impl Environment {
    fn entries(self) -> &'static [(&'static str, Ambient)] {
        match self {
            Environment::Builtin => BUILTIN,
            Environment::Browser => BROWSER,
            Environment::Node => NODE,
        }
    }
}

use Ambient::{ReadOnly, Writable};

const BUILTIN: &[(&str, Ambient)] = &[
    ("Array", ReadOnly),
    ("ArrayBuffer", ReadOnly),
    ("BigInt", ReadOnly),
    ("Boolean", ReadOnly),
    ("DataView", ReadOnly),
    ("Date", ReadOnly),
    ("Error", ReadOnly),
    ("EvalError", ReadOnly),
    ("Float32Array", ReadOnly),
    ("Float64Array", ReadOnly),
    ("Function", ReadOnly),
    ("Infinity", ReadOnly),
    ("Int16Array", ReadOnly),
    ("Int32Array", ReadOnly),
    ("Int8Array", ReadOnly),
    ("JSON", ReadOnly),
    ("Map", ReadOnly),
    ("Math", ReadOnly),
    ("NaN", ReadOnly),
    ("Number", ReadOnly),
    ("Object", ReadOnly),
    ("Promise", ReadOnly),
    ("Proxy", ReadOnly),
    ("RangeError", ReadOnly),
    ("ReferenceError", ReadOnly),
    ("Reflect", ReadOnly),
    ("RegExp", ReadOnly),
    ("Set", ReadOnly),
    ("String", ReadOnly),
    ("Symbol", ReadOnly),
    ("SyntaxError", ReadOnly),
    ("TypeError", ReadOnly),
    ("URIError", ReadOnly),
    ("Uint16Array", ReadOnly),
    ("Uint32Array", ReadOnly),
    ("Uint8Array", ReadOnly),
    ("Uint8ClampedArray", ReadOnly),
    ("WeakMap", ReadOnly),
    ("WeakSet", ReadOnly),
    ("decodeURI", ReadOnly),
    ("decodeURIComponent", ReadOnly),
    ("encodeURI", ReadOnly),
    ("encodeURIComponent", ReadOnly),
    ("escape", ReadOnly),
    ("eval", ReadOnly),
    ("globalThis", ReadOnly),
    ("isFinite", ReadOnly),
    ("isNaN", ReadOnly),
    ("parseFloat", ReadOnly),
    ("parseInt", ReadOnly),
    ("undefined", ReadOnly),
    ("unescape", ReadOnly),
];

const BROWSER: &[(&str, Ambient)] = &[
    ("alert", ReadOnly),
    ("clearInterval", ReadOnly),
    ("clearTimeout", ReadOnly),
    ("console", ReadOnly),
    ("document", ReadOnly),
    ("fetch", ReadOnly),
    ("localStorage", ReadOnly),
    ("location", Writable),
    ("name", Writable),
    ("navigator", ReadOnly),
    ("onload", Writable),
    ("requestAnimationFrame", ReadOnly),
    ("self", ReadOnly),
    ("sessionStorage", ReadOnly),
    ("setInterval", ReadOnly),
    ("setTimeout", ReadOnly),
    ("window", ReadOnly),
];

const NODE: &[(&str, Ambient)] = &[
    ("Buffer", ReadOnly),
    ("__dirname", ReadOnly),
    ("__filename", ReadOnly),
    ("clearImmediate", ReadOnly),
    ("clearInterval", ReadOnly),
    ("clearTimeout", ReadOnly),
    ("console", ReadOnly),
    ("exports", Writable),
    ("global", ReadOnly),
    ("module", ReadOnly),
    ("process", ReadOnly),
    ("require", ReadOnly),
    ("setImmediate", ReadOnly),
    ("setInterval", ReadOnly),
    ("setTimeout", ReadOnly),
];

/// The ambient bindings seeded into the outermost scope before analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Globals {
    entries: BTreeMap<String, Ambient>,
}

impl Globals {
    /// No ambient bindings at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard ECMAScript globals.
    pub fn builtin() -> Self {
        let mut globals = Self::empty();
        globals.add_environment(Environment::Builtin);
        globals
    }

    pub fn add_environment(&mut self, environment: Environment) {
        for (name, ambient) in environment.entries() {
            self.entries.insert((*name).to_string(), *ambient);
        }
    }

    /// Adds or overrides a single binding.
    pub fn insert(&mut self, name: impl Into<String>, ambient: Ambient) {
        self.entries.insert(name.into(), ambient);
    }

    pub fn get(&self, name: &str) -> Option<Ambient> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Ambient)> {
        self.entries.iter().map(|(name, ambient)| (name.as_str(), *ambient))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Ambient)> for Globals {
    fn from_iter<I: IntoIterator<Item = (String, Ambient)>>(iter: I) -> Self {
        Globals { entries: iter.into_iter().collect() }
    }
}
