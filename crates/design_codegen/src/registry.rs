//! Typed icon registry for the React package.

use crate::error::{CodegenError, CodegenResult};
use crate::naming::{is_valid_identifier, kebab_to_pascal};
use crate::svg::IconSet;
use std::collections::BTreeMap;

/// One icon bound to the identifier its component import uses.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistryEntry {
    /// Asset name (kebab-case), also the runtime key.
    pub name: String,
    /// PascalCase binding for the component import.
    pub identifier: String,
}

/// Validated name → identifier bindings, in icon-set order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IconRegistry {
    pub entries: Vec<RegistryEntry>,
}

impl IconRegistry {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Bind every icon of `set` to its PascalCase identifier.
///
/// Fails when an identifier is not a valid binding name, and when two icon
/// names produce the same identifier.
pub fn build_registry(set: &IconSet) -> CodegenResult<IconRegistry> {
    let mut entries = Vec::with_capacity(set.len());
    for name in set.names() {
        let identifier = kebab_to_pascal(name);
        if !is_valid_identifier(&identifier) {
            return Err(CodegenError::InvalidIconName {
                name: name.to_string(),
                identifier,
            });
        }
        entries.push(RegistryEntry {
            name: name.to_string(),
            identifier,
        });
    }

    let mut by_identifier: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for entry in &entries {
        by_identifier
            .entry(entry.identifier.as_str())
            .or_default()
            .push(entry.name.clone());
    }
    let collisions = by_identifier
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(identifier, names)| (identifier.to_string(), names))
        .collect::<Vec<_>>();
    if !collisions.is_empty() {
        return Err(CodegenError::IdentifierCollision { collisions });
    }

    Ok(IconRegistry { entries })
}
