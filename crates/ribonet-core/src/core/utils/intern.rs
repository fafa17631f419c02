use std::collections::HashMap;
use std::fmt;
use std::sync::{OnceLock, RwLock};

/// An interned string handle used for names outside the closed atom and residue
/// enumerations.
///
/// Symbols are cheap to copy and compare. Two symbols are equal if and only if they
/// were interned from the same string. Ordering follows interning order, which keeps
/// extension kinds after every enumerated kind without depending on their spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

#[derive(Default)]
struct Interner {
    ids: HashMap<&'static str, u32>,
    names: Vec<&'static str>,
}

static INTERNER: OnceLock<RwLock<Interner>> = OnceLock::new();

fn interner() -> &'static RwLock<Interner> {
    INTERNER.get_or_init(|| RwLock::new(Interner::default()))
}

impl Symbol {
    /// Interns `name` and returns its handle. Repeated calls with the same string
    /// return the same symbol.
    pub fn intern(name: &str) -> Self {
        if let Some(&id) = interner()
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .ids
            .get(name)
        {
            return Symbol(id);
        }

        let mut table = interner()
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(&id) = table.ids.get(name) {
            return Symbol(id);
        }
        let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());
        let id = table.names.len() as u32;
        table.names.push(leaked);
        table.ids.insert(leaked, id);
        Symbol(id)
    }

    pub fn as_str(&self) -> &'static str {
        interner()
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .names[self.0 as usize]
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
