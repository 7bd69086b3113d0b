use super::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(ObjectId),
}

/// Single-object selection. Selecting replaces whatever was selected.
#[derive(Debug, Default)]
pub struct SelectionState {
    current: Selection,
    mounted: bool,
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            current: Selection::Unselected,
            mounted: false,
        }
    }

    pub fn current(&self) -> &Selection {
        &self.current
    }

    pub fn selected(&self) -> Option<&ObjectId> {
        match &self.current {
            Selection::Selected(id) => Some(id),
            Selection::Unselected => None,
        }
    }

    pub fn is_selected(&self, id: &ObjectId) -> bool {
        self.selected() == Some(id)
    }

    /// Select the default plane the first time the editor mounts. Later
    /// calls do nothing.
    pub fn mount(&mut self, default_plane: ObjectId) -> bool {
        if self.mounted {
            return false;
        }
        self.mounted = true;
        self.select_pointer(default_plane)
    }

    /// A proxy was clicked. Returns whether the selection changed.
    pub fn select_pointer(&mut self, id: ObjectId) -> bool {
        if self.is_selected(&id) {
            return false;
        }
        log::debug!("Selected {}", id);
        self.current = Selection::Selected(id);
        true
    }

    /// A click missed every proxy.
    pub fn clear_selection(&mut self) -> bool {
        if self.current == Selection::Unselected {
            return false;
        }
        log::debug!("Selection cleared");
        self.current = Selection::Unselected;
        true
    }
}
