//! Symbol registry.
//!
//! Every call to `Symbol(desc)` produces a fresh, unique symbol even when the
//! description repeats. `Symbol.for(key)` goes through the global registry
//! instead and hands back the same symbol for the same key.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique symbol identifier.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
    /// Returns the raw index of this symbol.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    // =========================================================================
    // Well-known Symbols
    // =========================================================================
    // These are always registered at startup with fixed indices.

    /// `Symbol.toPrimitive`, consulted by ToPrimitive before `valueOf`/`toString`.
    pub const TO_PRIMITIVE: SymbolId = SymbolId(0);

    /// `Symbol.toStringTag`, consulted by `Object.prototype.toString`.
    pub const TO_STRING_TAG: SymbolId = SymbolId(1);
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

/// Registry of all symbols created in one heap.
#[derive(Clone, Debug, Default)]
pub struct SymbolRegistry {
    /// Description of each symbol, indexed by `SymbolId`.
    descriptions: Vec<Option<Arc<str>>>,
    /// Global registry used by `Symbol.for`.
    global: HashMap<Arc<str>, SymbolId>,
}

impl SymbolRegistry {
    /// Well-known symbols registered at startup, in `SymbolId` order.
    const WELL_KNOWN: &'static [&'static str] = &[
        "Symbol.toPrimitive",  // SymbolId(0) = TO_PRIMITIVE
        "Symbol.toStringTag",  // SymbolId(1) = TO_STRING_TAG
    ];

    /// Creates a registry with the well-known symbols pre-registered.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        for (i, &name) in Self::WELL_KNOWN.iter().enumerate() {
            let id = registry.create(Some(name));
            debug_assert_eq!(
                id.0 as usize, i,
                "well-known symbol '{name}' should have index {i}, got {}",
                id.0
            );
        }
        registry
    }

    /// Creates a fresh symbol, as `Symbol(description)` does.
    ///
    /// # Panics
    ///
    /// Panics if the number of symbols exceeds `u32::MAX`.
    pub fn create(&mut self, description: Option<&str>) -> SymbolId {
        let idx = u32::try_from(self.descriptions.len()).expect("too many symbols");
        self.descriptions.push(description.map(Arc::from));
        SymbolId(idx)
    }

    /// Returns the symbol registered under `key`, creating it on first use.
    pub fn for_key(&mut self, key: &str) -> SymbolId {
        if let Some(&id) = self.global.get(key) {
            return id;
        }
        let id = self.create(Some(key));
        self.global.insert(Arc::from(key), id);
        id
    }

    /// Returns the key a symbol was registered under via [`Self::for_key`].
    #[must_use]
    pub fn key_for(&self, id: SymbolId) -> Option<&str> {
        self.global
            .iter()
            .find(|&(_, &sym)| sym == id)
            .map(|(key, _)| key.as_ref())
    }

    /// Gets the description of a symbol.
    #[must_use]
    pub fn description(&self, id: SymbolId) -> Option<&str> {
        self.descriptions
            .get(id.0 as usize)
            .and_then(|d| d.as_deref())
    }

    /// Returns `Symbol(description)`, the text `String(symbol)` produces.
    #[must_use]
    pub fn descriptive_string(&self, id: SymbolId) -> String {
        format!("Symbol({})", self.description(id).unwrap_or(""))
    }

    /// Returns the number of symbols, including the well-known ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    /// Returns true if no symbols exist (never the case after [`Self::new`]).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}
