use log::debug;

/// Combined hover/selection state. The two axes are independent: hovering a
/// node never changes the selection and selecting never clears the hover.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct Interaction {
    hovered: Option<usize>,
    selected: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum Phase {
    Idle,
    Hovered(usize),
    Selected(usize),
    HoveredWhileSelected { hovered: usize, selected: usize },
}

impl Interaction {
    pub(in crate::app) fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub(in crate::app) fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub(in crate::app) fn is_hovered(&self, index: usize) -> bool {
        self.hovered == Some(index)
    }

    pub(in crate::app) fn is_selected(&self, index: usize) -> bool {
        self.selected == Some(index)
    }

    /// Entering a node replaces whatever was hovered before.
    pub(in crate::app) fn pointer_over(&mut self, index: usize) {
        if self.hovered != Some(index) {
            debug!("hover {:?} -> {index}", self.hovered);
            self.hovered = Some(index);
        }
    }

    /// Leaving a node only clears the hover if that node is the hovered one;
    /// a late leave event for an older node is ignored.
    pub(in crate::app) fn pointer_out(&mut self, index: usize) {
        if self.hovered == Some(index) {
            debug!("hover {index} -> none");
            self.hovered = None;
        }
    }

    /// Per-frame hit test result: the node under the pointer, if any.
    pub(in crate::app) fn pointer_target(&mut self, target: Option<usize>) {
        match (self.hovered, target) {
            (_, Some(index)) => self.pointer_over(index),
            (Some(previous), None) => self.pointer_out(previous),
            (None, None) => {}
        }
    }

    pub(in crate::app) fn click(&mut self, index: usize) {
        if self.selected != Some(index) {
            debug!("select {:?} -> {index}", self.selected);
            self.selected = Some(index);
        }
    }

    pub(in crate::app) fn close(&mut self) {
        if let Some(previous) = self.selected.take() {
            debug!("deselect {previous}");
        }
    }

    pub(in crate::app) fn phase(&self) -> Phase {
        match (self.hovered, self.selected) {
            (None, None) => Phase::Idle,
            (Some(hovered), None) => Phase::Hovered(hovered),
            (None, Some(selected)) => Phase::Selected(selected),
            (Some(hovered), Some(selected)) => Phase::HoveredWhileSelected { hovered, selected },
        }
    }

    /// Camera auto-rotation pauses while anything is hovered.
    pub(in crate::app) fn auto_rotate_allowed(&self) -> bool {
        self.hovered.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_is_exclusive() {
        let mut interaction = Interaction::default();
        interaction.pointer_over(1);
        interaction.pointer_over(4);
        assert_eq!(interaction.hovered(), Some(4));
        assert!(!interaction.is_hovered(1));

        // stale leave from the first node
        interaction.pointer_out(1);
        assert_eq!(interaction.hovered(), Some(4));

        interaction.pointer_out(4);
        assert_eq!(interaction.phase(), Phase::Idle);
    }

    #[test]
    fn selection_swaps_atomically() {
        let mut interaction = Interaction::default();
        interaction.click(2);
        assert_eq!(interaction.phase(), Phase::Selected(2));

        interaction.click(5);
        assert_eq!(interaction.selected(), Some(5));
        assert!(!interaction.is_selected(2));

        interaction.close();
        assert_eq!(interaction.selected(), None);
        interaction.close();
        assert_eq!(interaction.phase(), Phase::Idle);
    }

    #[test]
    fn hover_and_selection_are_independent() {
        let mut interaction = Interaction::default();
        interaction.click(3);
        interaction.pointer_over(7);
        assert_eq!(
            interaction.phase(),
            Phase::HoveredWhileSelected {
                hovered: 7,
                selected: 3
            }
        );

        interaction.pointer_out(7);
        assert_eq!(interaction.phase(), Phase::Selected(3));

        interaction.pointer_over(3);
        interaction.close();
        assert_eq!(interaction.phase(), Phase::Hovered(3));
    }

    #[test]
    fn pointer_target_drives_hover() {
        let mut interaction = Interaction::default();
        interaction.pointer_target(Some(0));
        assert!(!interaction.auto_rotate_allowed());
        interaction.pointer_target(Some(6));
        assert_eq!(interaction.hovered(), Some(6));
        interaction.pointer_target(None);
        assert!(interaction.auto_rotate_allowed());
        interaction.pointer_target(None);
        assert_eq!(interaction.phase(), Phase::Idle);
    }
}
