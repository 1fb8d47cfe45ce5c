use crate::config::AnalyzerConfig;
use crate::types::{HardcodedLiteral, ScopeEntry, SymbolFacts};
use std::collections::HashSet;

/// Bindings of one unit in the order they happened
#[derive(Debug, Default)]
pub(crate) struct ScopeStack {
    entries: Vec<ScopeEntry>,
    bound: HashSet<String>,
}

impl ScopeStack {
    /// Record `symbol` unless it is already bound; the first binding wins
    pub fn push(&mut self, symbol: &str, statement: usize) {
        if self.bound.insert(symbol.to_string()) {
            self.entries.push(ScopeEntry {
                symbol: symbol.to_string(),
                statement,
            });
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.bound.contains(symbol)
    }

    pub fn into_entries(mut self) -> Vec<ScopeEntry> {
        self.entries.sort_by_key(|entry| entry.statement);
        self.entries
    }
}

/// Accumulates the facts of one unit while its statements are walked
pub(crate) struct UnitScope<'c> {
    config: &'c AnalyzerConfig,
    facts: SymbolFacts,
    stack: ScopeStack,
}

impl<'c> UnitScope<'c> {
    pub fn new(index: usize, config: &'c AnalyzerConfig) -> Self {
        Self {
            config,
            facts: SymbolFacts::empty(index),
            stack: ScopeStack::default(),
        }
    }

    pub fn import(&mut self, module: &str, name: Option<&str>, statement: usize) {
        if !module.is_empty() && !self.facts.imports.iter().any(|m| m == module) {
            self.facts.imports.push(module.to_string());
        }
        if let Some(name) = name.filter(|n| !n.is_empty() && !self.config.is_builtin(n)) {
            self.facts.imported_names.insert(name.to_string());
            self.facts.defined_names.insert(name.to_string());
            self.stack.push(name, statement);
        }
    }

    pub fn definition(&mut self, name: &str, statement: usize) {
        if name.is_empty() || self.config.is_builtin(name) {
            return;
        }
        self.facts.function_names.insert(name.to_string());
        self.facts.defined_names.insert(name.to_string());
        self.stack.push(name, statement);
    }

    pub fn read(&mut self, name: &str) {
        if self.config.is_builtin(name) {
            return;
        }
        self.facts.used_names.insert(name.to_string());
        if !self.stack.contains(name) {
            self.facts.external_references.insert(name.to_string());
        }
    }

    pub fn bind(&mut self, name: &str, statement: usize) {
        if self.config.is_builtin(name) {
            return;
        }
        self.facts.defined_names.insert(name.to_string());
        self.stack.push(name, statement);
    }

    pub fn hardcoded(&mut self, literal: HardcodedLiteral) {
        self.facts.has_hardcoded_paths = true;
        self.facts.hardcoded_literals.push(literal);
    }

    pub fn finish(mut self) -> SymbolFacts {
        self.facts.scope = self.stack.into_entries();
        self.facts
    }
}
