//! Keyword interning for component types, relationship kinds, and roles.
//!
//! All names in the core — component types, relationship kinds, role names —
//! are interned keywords, so identity comparison is a `u32` compare and the
//! same name always resolves to the same id within one interner.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Interned keyword identifier.
///
/// Keywords name component types (`:position`), relationship kinds
/// (`:anchorage`), and roles (`:parent`). They are interned for fast
/// comparison and cheap copying.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct KeywordId(pub(crate) u32);

impl KeywordId {
    /// Returns the raw index of this keyword.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    // =========================================================================
    // Reserved Keywords
    // =========================================================================
    // Always interned at startup with fixed indices.

    /// Reserved relationship kind for dependency tracking: `:dep/dependence`
    pub const DEPENDENCE: KeywordId = KeywordId(0);

    /// Reserved role for the entity that requires another: `:dep/dependent`
    pub const ROLE_DEPENDENT: KeywordId = KeywordId(1);

    /// Reserved role for the entity that is required: `:dep/dependency`
    pub const ROLE_DEPENDENCY: KeywordId = KeywordId(2);
}

impl fmt::Debug for KeywordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeywordId({})", self.0)
    }
}

/// Interner mapping keyword strings to stable ids and back.
///
/// Not thread-safe; the simulation world owns exactly one and the pipeline is
/// single-threaded by design.
#[derive(Clone, Debug)]
pub struct Interner {
    /// Keyword storage, indexed by `KeywordId`.
    keywords: Vec<Arc<str>>,
    /// Map from keyword string to id.
    keyword_map: HashMap<Arc<str>, KeywordId>,
}

impl Interner {
    /// Reserved keywords pre-interned at startup, in id order.
    const RESERVED: &'static [&'static str] = &[
        "dep/dependence", // KeywordId(0) = DEPENDENCE
        "dep/dependent",  // KeywordId(1) = ROLE_DEPENDENT
        "dep/dependency", // KeywordId(2) = ROLE_DEPENDENCY
    ];

    /// Creates an interner with the reserved keywords installed.
    #[must_use]
    pub fn new() -> Self {
        let mut interner = Self {
            keywords: Vec::new(),
            keyword_map: HashMap::new(),
        };
        for name in Self::RESERVED {
            interner.intern(name);
        }
        interner
    }

    /// Interns a keyword, returning its id.
    ///
    /// Interning the same string twice returns the same id.
    pub fn intern(&mut self, name: &str) -> KeywordId {
        if let Some(&id) = self.keyword_map.get(name) {
            return id;
        }
        let id = KeywordId(u32::try_from(self.keywords.len()).unwrap_or(u32::MAX));
        let shared: Arc<str> = Arc::from(name);
        self.keywords.push(Arc::clone(&shared));
        self.keyword_map.insert(shared, id);
        id
    }

    /// Looks up a keyword id without interning.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<KeywordId> {
        self.keyword_map.get(name).copied()
    }

    /// Resolves an id back to its string.
    #[must_use]
    pub fn resolve(&self, id: KeywordId) -> Option<&str> {
        self.keywords.get(id.0 as usize).map(AsRef::as_ref)
    }

    /// Number of interned keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Returns true if only the reserved keywords are interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.len() == Self::RESERVED.len()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
