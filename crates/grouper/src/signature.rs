//! Parameters, return values and a suggested name for a group.

use crate::rules::suggest_name;
use nb2prod_protocol::Group;
use nb2prod_unit_analyzer::SymbolFacts;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    /// Sorted
    pub parameters: Vec<String>,
    /// Sorted
    pub returns: Vec<String>,
}

impl Signature {
    pub fn has_interface(&self) -> bool {
        !self.parameters.is_empty() || !self.returns.is_empty()
    }
}

/// Infer the signature of `group` against every analysed unit of the notebook.
///
/// Parameters are the group's external references that nothing in the notebook defines.
/// Returns are member variables read by units after the group. A name that is both is a
/// return.
pub fn synthesize(group: &Group, facts: &[SymbolFacts]) -> Signature {
    let members = || facts.iter().filter(|f| group.contains(f.index));

    let external: BTreeSet<&String> = members().flat_map(|f| &f.external_references).collect();
    let defined: BTreeSet<&String> = members().flat_map(|f| &f.defined_names).collect();
    let defined_outside: BTreeSet<&String> = facts
        .iter()
        .filter(|f| !group.contains(f.index))
        .flat_map(|f| &f.defined_names)
        .collect();

    let variables: BTreeSet<String> = members().flat_map(|f| f.variable_names()).collect();
    let read_later: BTreeSet<&String> = facts
        .iter()
        .filter(|f| f.index > group.max_unit())
        .flat_map(|f| &f.external_references)
        .collect();

    let returns: Vec<String> = variables
        .iter()
        .filter(|name| read_later.contains(name))
        .cloned()
        .collect();

    let parameters: Vec<String> = external
        .into_iter()
        .filter(|name| !defined.contains(name) && !defined_outside.contains(name))
        .filter(|name| !returns.contains(*name))
        .cloned()
        .collect();

    Signature {
        name: suggest_name(group.category, &returns).to_string(),
        parameters,
        returns,
    }
}
