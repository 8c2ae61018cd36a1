//! Editing session state.

use std::path::PathBuf;

use super::group::ColorGroup;
use super::palette::{ramp_indices, Palette};

/// Default base name for generated files.
pub const DEFAULT_PREFIX: &str = "palette";

/// Where and under which base name generated files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNaming {
    pub output_dir: PathBuf,
    pub prefix: String,
}

impl Default for OutputNaming {
    fn default() -> Self {
        Self { output_dir: PathBuf::from("out"), prefix: DEFAULT_PREFIX.to_string() }
    }
}

/// A base palette plus the groups an artist has defined over it.
///
/// Generation only ever reads a snapshot of this; derived palettes are
/// independent values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectState {
    pub base: Palette,
    pub groups: Vec<ColorGroup>,
    pub naming: OutputNaming,
}

impl ProjectState {
    pub fn new(base: Palette) -> Self {
        Self { base, groups: Vec::new(), naming: OutputNaming::default() }
    }

    /// Add an empty group. A taken name gets ` 1`, ` 2`, ... appended.
    pub fn add_group(&mut self, name: &str) -> &mut ColorGroup {
        let mut candidate = name.to_string();
        let mut counter = 1;
        while self.group(&candidate).is_some() {
            candidate = format!("{} {}", name, counter);
            counter += 1;
        }
        self.groups.push(ColorGroup::new(candidate));
        let last = self.groups.len() - 1;
        &mut self.groups[last]
    }

    pub fn remove_group(&mut self, name: &str) -> Option<ColorGroup> {
        let pos = self.groups.iter().position(|g| g.name == name)?;
        Some(self.groups.remove(pos))
    }

    pub fn group(&self, name: &str) -> Option<&ColorGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut ColorGroup> {
        self.groups.iter_mut().find(|g| g.name == name)
    }

    /// The first group owning `index`.
    pub fn group_for_index(&self, index: u8) -> Option<&ColorGroup> {
        self.groups.iter().find(|g| g.owns(index))
    }

    /// Select the 8-index ramp containing `index` in the named group, or
    /// deselect it when the whole ramp is already selected. Returns false if
    /// there is no such group.
    pub fn toggle_ramp(&mut self, group: &str, index: u8) -> bool {
        let Some(group) = self.group_mut(group) else {
            return false;
        };
        if ramp_indices(index).all(|i| group.owns(i)) {
            for i in ramp_indices(index) {
                group.remove_index(i);
            }
        } else {
            for i in ramp_indices(index) {
                group.add_index(i);
            }
        }
        true
    }
}
