use std::collections::HashMap;

use crate::NonTerminalId;

/// Names of all non-terminals of a grammar, user-written and synthesized.
///
/// Both kinds draw from one counter, so a synthesized non-terminal can never
/// collide with a named one. Synthesized non-terminals get a `temp-N` label
/// that is only used for display; looking the label up by name does not find
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    ids: HashMap<String, NonTerminalId>,
    names: Vec<String>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of a named non-terminal, allocating one on first sight.
    pub(crate) fn intern(&mut self, name: &str) -> NonTerminalId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.allocate(name.to_owned());
        self.ids.insert(name.to_owned(), id);
        id
    }

    /// Allocate an anonymous non-terminal.
    pub(crate) fn fresh(&mut self) -> NonTerminalId {
        let label = format!("temp-{}", self.names.len() + 1);
        self.allocate(label)
    }

    fn allocate(&mut self, name: String) -> NonTerminalId {
        self.names.push(name);
        -(self.names.len() as NonTerminalId)
    }

    pub fn name(&self, id: NonTerminalId) -> Option<&str> {
        if id >= 0 {
            return None;
        }
        self.names.get((-id - 1) as usize).map(String::as_str)
    }

    pub fn id(&self, name: &str) -> Option<NonTerminalId> {
        self.ids.get(name).copied()
    }

    pub fn is_synthesized(&self, id: NonTerminalId) -> bool {
        match self.name(id) {
            Some(name) => self.id(name) != Some(id),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All `(id, name)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (NonTerminalId, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(idx, name)| (-(idx as NonTerminalId) - 1, name.as_str()))
    }
}
