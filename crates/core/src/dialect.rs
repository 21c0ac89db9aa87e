//! Comment dialects: which comment markers are recognized for a file extension.
//!
//! The built-in dialects form a closed set backed by `'static` tables. A
//! [`DialectRegistry`] layers project overrides from `.codemate.toml` on top of them;
//! those are validated when resolved, before any parsing starts.

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Built-in dialect table
// ---------------------------------------------------------------------------

struct DialectTable {
    single_line: &'static [&'static str],
    multiline: &'static [(&'static str, &'static str)],
    extensions: &'static [&'static str],
}

const SLASH: DialectTable = DialectTable {
    single_line: &["//"],
    multiline: &[("/*", "*/")],
    extensions: &[
        "php", "js", "mjs", "cjs", "jsx", "ts", "tsx", "c", "h", "cc", "cpp", "cxx", "hpp", "hxx",
        "cs", "java", "kt", "kts", "scala", "rs", "go", "swift", "dart", "scss", "less",
    ],
};

const HASH: DialectTable = DialectTable {
    single_line: &["#"],
    multiline: &[("\"\"\"", "\"\"\""), ("'''", "'''")],
    extensions: &["py", "pyw", "rb", "sh", "bash", "zsh"],
};

const MARKUP: DialectTable = DialectTable {
    single_line: &[],
    multiline: &[("<!--", "-->")],
    extensions: &["html", "htm", "xhtml", "xml", "svg"],
};

const CSS: DialectTable = DialectTable {
    single_line: &[],
    multiline: &[("/*", "*/")],
    extensions: &["css"],
};

const COMPONENT: DialectTable = DialectTable {
    single_line: &["//"],
    multiline: &[("<!--", "-->"), ("/*", "*/")],
    extensions: &["vue", "svelte"],
};

/// The built-in comment dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `//` and `/* */`. C-family languages and PHP. The fallback dialect.
    Slash,
    /// `#` and triple-quoted strings. Python, Ruby, shell.
    Hash,
    /// `<!-- -->` only.
    Markup,
    /// `/* */` only.
    Css,
    /// Template-component files mixing markup and script comments.
    Component,
}

impl Dialect {
    pub const ALL: [Dialect; 5] =
        [Dialect::Slash, Dialect::Hash, Dialect::Markup, Dialect::Css, Dialect::Component];

    /// Dialect used when the extension is missing or unknown.
    pub const DEFAULT: Dialect = Dialect::Slash;

    fn table(self) -> &'static DialectTable {
        match self {
            Dialect::Slash => &SLASH,
            Dialect::Hash => &HASH,
            Dialect::Markup => &MARKUP,
            Dialect::Css => &CSS,
            Dialect::Component => &COMPONENT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Slash => "slash",
            Dialect::Hash => "hash",
            Dialect::Markup => "markup",
            Dialect::Css => "css",
            Dialect::Component => "component",
        }
    }

    pub fn from_name(name: &str) -> Option<Dialect> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    /// Extensions that resolve to this dialect.
    pub fn extensions(self) -> &'static [&'static str] {
        self.table().extensions
    }

    /// Look up the dialect for an extension token, falling back to [`Dialect::DEFAULT`].
    pub fn for_extension(extension: Option<&str>) -> Dialect {
        let Some(ext) = extension.map(normalize_extension) else {
            return Self::DEFAULT;
        };
        Self::ALL
            .into_iter()
            .find(|d| d.extensions().iter().any(|e| *e == ext))
            .unwrap_or(Self::DEFAULT)
    }

    pub fn comment_dialect(self) -> CommentDialect {
        let table = self.table();
        CommentDialect {
            single_line: table.single_line.iter().map(|s| s.to_string()).collect(),
            multiline: table
                .multiline
                .iter()
                .map(|(open, close)| (open.to_string(), close.to_string()))
                .collect(),
        }
    }
}

/// Lowercase an extension token and drop a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Resolve an extension against the built-in table only. Never fails.
pub fn resolve(extension: Option<&str>) -> CommentDialect {
    Dialect::for_extension(extension).comment_dialect()
}

// ---------------------------------------------------------------------------
// Resolved dialect
// ---------------------------------------------------------------------------

/// The comment markers the parser scans for. Immutable once built; every
/// multiline opener is guaranteed a non-empty closer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentDialect {
    single_line: Vec<String>,
    multiline: Vec<(String, String)>,
}

impl CommentDialect {
    /// Build a dialect from explicit markers. Returns the reason on rejection.
    pub fn new<S: Into<String>>(
        single_line: impl IntoIterator<Item = S>,
        multiline: impl IntoIterator<Item = (S, S)>,
    ) -> std::result::Result<Self, String> {
        let single_line: Vec<String> = single_line.into_iter().map(Into::into).collect();
        let multiline: Vec<(String, String)> =
            multiline.into_iter().map(|(o, c)| (o.into(), c.into())).collect();

        if single_line.iter().any(|o| o.is_empty()) {
            return Err("single-line opener is empty".to_string());
        }
        for (opener, closer) in &multiline {
            if opener.is_empty() {
                return Err("multiline opener is empty".to_string());
            }
            if closer.is_empty() {
                return Err(format!("multiline opener '{opener}' has an empty closer"));
            }
        }
        Ok(Self { single_line, multiline })
    }

    pub fn single_line_openers(&self) -> &[String] {
        &self.single_line
    }

    /// Opener/closer pairs in lookup order.
    pub fn multiline_pairs(&self) -> &[(String, String)] {
        &self.multiline
    }
}

// ---------------------------------------------------------------------------
// Registry with project overrides
// ---------------------------------------------------------------------------

/// A dialect declared in `.codemate.toml`, kept unvalidated until resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialectSpec {
    pub single_line: Vec<String>,
    /// Each entry should be `[opener, closer]`.
    pub multiline: Vec<Vec<String>>,
}

impl DialectSpec {
    fn validate(&self) -> std::result::Result<CommentDialect, String> {
        let mut pairs = Vec::with_capacity(self.multiline.len());
        for entry in &self.multiline {
            match entry.as_slice() {
                [opener, closer] => pairs.push((opener.clone(), closer.clone())),
                [opener] => return Err(format!("multiline opener '{opener}' has no closer")),
                [] => return Err("multiline entry is empty".to_string()),
                _ => return Err(format!("multiline entry {entry:?} must be [opener, closer]")),
            }
        }
        CommentDialect::new(self.single_line.iter().cloned(), pairs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Override {
    Alias(String),
    Custom(DialectSpec),
}

/// Maps extensions to comment dialects: built-in table plus project overrides.
#[derive(Debug, Clone, Default)]
pub struct DialectRegistry {
    overrides: HashMap<String, Override>,
}

impl DialectRegistry {
    /// A registry with no overrides; resolution can never fail.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Route `extension` to a built-in dialect by name (`slash`, `hash`, ...).
    pub fn with_alias(mut self, extension: &str, dialect_name: &str) -> Self {
        self.overrides
            .insert(normalize_extension(extension), Override::Alias(dialect_name.to_string()));
        self
    }

    /// Give `extension` its own comment markers.
    pub fn with_dialect(mut self, extension: &str, spec: DialectSpec) -> Self {
        self.overrides.insert(normalize_extension(extension), Override::Custom(spec));
        self
    }

    pub fn has_overrides(&self) -> bool {
        !self.overrides.is_empty()
    }

    /// Resolve the dialect for an extension. Unknown or missing extensions fall back
    /// to the default dialect; a misconfigured override is an [`Error::Configuration`].
    pub fn resolve(&self, extension: Option<&str>) -> Result<CommentDialect> {
        let Some(ext) = extension.map(normalize_extension) else {
            return Ok(Dialect::DEFAULT.comment_dialect());
        };
        match self.overrides.get(&ext) {
            None => Ok(Dialect::for_extension(Some(ext.as_str())).comment_dialect()),
            Some(Override::Alias(name)) => Dialect::from_name(name)
                .map(Dialect::comment_dialect)
                .ok_or_else(|| Error::Configuration {
                    extension: ext.clone(),
                    reason: format!("unknown dialect '{name}'"),
                }),
            Some(Override::Custom(spec)) => spec
                .validate()
                .map_err(|reason| Error::Configuration { extension: ext.clone(), reason }),
        }
    }
}
