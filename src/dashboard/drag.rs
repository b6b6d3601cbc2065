use crate::dashboard::view::BoardView;

/// What the pointer is over when a drag event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// A drop zone, identified by its recorded index.
    Zone(usize),
    /// Anything that is not a drop zone.
    Other,
}

/// Answer to a drag-over event. `Move` permits the drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Move,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// No active drag, or the target was not a known drop zone.
    Ignored,
    Moved { widget: String, from: usize, to: usize },
}

/// State held between drag-start and drag-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub widget_id: String,
}

/// Turns drag events into a widget reorder on a [`BoardView`].
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn on_drag_start(&mut self, view: &mut dyn BoardView, widget_id: &str) -> bool {
        if !view.contains(widget_id) {
            tracing::debug!(widget = %widget_id, "drag start on unknown widget ignored");
            return false;
        }
        // A new drag replaces any session whose end event never arrived.
        if let Some(stale) = self.session.take() {
            view.set_dragging(&stale.widget_id, false);
        }
        view.set_dragging(widget_id, true);
        view.rebuild_drop_zones();
        view.set_drop_zones_visible(true);
        self.session = Some(DragSession {
            widget_id: widget_id.to_string(),
        });
        true
    }

    pub fn on_drag_over(&mut self, view: &mut dyn BoardView, target: DropTarget) -> DropEffect {
        match target {
            DropTarget::Zone(index) => view.highlight_drop_zone(Some(index)),
            DropTarget::Other => view.highlight_drop_zone(None),
        }
        DropEffect::Move
    }

    pub fn on_drop(&mut self, view: &mut dyn BoardView, target: DropTarget) -> DropOutcome {
        let DropTarget::Zone(zone_index) = target else {
            return DropOutcome::Ignored;
        };
        let Some(session) = &self.session else {
            tracing::debug!("drop without an active drag ignored");
            return DropOutcome::Ignored;
        };
        let Some(zone) = view
            .drop_zones()
            .into_iter()
            .find(|z| z.index == zone_index)
        else {
            tracing::debug!(zone = zone_index, "drop on missing zone ignored");
            return DropOutcome::Ignored;
        };
        let Some(from) = view.position(&session.widget_id) else {
            return DropOutcome::Ignored;
        };

        // The reference node is measured with the dragged widget still in place.
        let ids = view.widget_ids();
        let reference = ids.get(zone.index).map(String::as_str);
        view.move_before(&session.widget_id, reference);
        view.rebuild_drop_zones();
        view.highlight_drop_zone(None);

        let to = view.position(&session.widget_id).unwrap_or(from);
        tracing::debug!(widget = %session.widget_id, from, to, "widget dropped");
        DropOutcome::Moved {
            widget: session.widget_id.clone(),
            from,
            to,
        }
    }

    pub fn on_drag_end(&mut self, view: &mut dyn BoardView) {
        if let Some(session) = self.session.take() {
            view.set_dragging(&session.widget_id, false);
        }
        view.highlight_drop_zone(None);
        view.set_drop_zones_visible(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::view::WidgetBoard;

    fn drag(board: &mut WidgetBoard, id: &str, zone: usize) -> DropOutcome {
        let mut ctl = DragController::new();
        assert!(ctl.on_drag_start(board, id));
        ctl.on_drag_over(board, DropTarget::Zone(zone));
        let outcome = ctl.on_drop(board, DropTarget::Zone(zone));
        ctl.on_drag_end(board);
        outcome
    }

    #[test]
    fn drag_last_to_front() {
        let mut board = WidgetBoard::from_ids(["A", "B", "C"]);
        let outcome = drag(&mut board, "C", 0);
        assert_eq!(board.widget_ids(), vec!["C", "A", "B"]);
        assert_eq!(
            outcome,
            DropOutcome::Moved {
                widget: "C".into(),
                from: 2,
                to: 0
            }
        );
    }

    #[test]
    fn drag_first_to_end() {
        let mut board = WidgetBoard::from_ids(["A", "B", "C"]);
        drag(&mut board, "A", 3);
        assert_eq!(board.widget_ids(), vec!["B", "C", "A"]);
    }

    #[test]
    fn drag_into_middle() {
        let mut board = WidgetBoard::from_ids(["A", "B", "C", "D"]);
        drag(&mut board, "A", 2);
        assert_eq!(board.widget_ids(), vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn adjacent_zones_are_noops() {
        for id in ["A", "B", "C"] {
            let mut board = WidgetBoard::from_ids(["A", "B", "C"]);
            let pos = board.position(id).unwrap();
            drag(&mut board, id, pos + 1);
            assert_eq!(board.widget_ids(), vec!["A", "B", "C"]);
            drag(&mut board, id, pos);
            assert_eq!(board.widget_ids(), vec!["A", "B", "C"]);
        }
    }

    #[test]
    fn drop_without_session_is_ignored() {
        let mut board = WidgetBoard::from_ids(["A", "B"]);
        let mut ctl = DragController::new();
        assert_eq!(ctl.on_drop(&mut board, DropTarget::Zone(0)), DropOutcome::Ignored);
        assert_eq!(board.widget_ids(), vec!["A", "B"]);
    }

    #[test]
    fn drop_on_non_zone_or_missing_zone_is_ignored() {
        let mut board = WidgetBoard::from_ids(["A", "B"]);
        let mut ctl = DragController::new();
        ctl.on_drag_start(&mut board, "B");
        assert_eq!(ctl.on_drop(&mut board, DropTarget::Other), DropOutcome::Ignored);
        assert_eq!(ctl.on_drop(&mut board, DropTarget::Zone(9)), DropOutcome::Ignored);
        assert_eq!(board.widget_ids(), vec!["A", "B"]);
    }

    #[test]
    fn start_reveals_zones_and_end_hides_them() {
        let mut board = WidgetBoard::from_ids(["A", "B"]);
        let mut ctl = DragController::new();
        ctl.on_drag_start(&mut board, "A");
        assert!(board.node("A").unwrap().dragging);
        assert_eq!(board.drop_zones().len(), 3);
        assert!(board.drop_zones_visible());
        assert_eq!(ctl.on_drag_over(&mut board, DropTarget::Zone(2)), DropEffect::Move);
        assert_eq!(board.highlighted_zone(), Some(2));
        ctl.on_drag_over(&mut board, DropTarget::Other);
        assert_eq!(board.highlighted_zone(), None);

        // Cancelled drag: no drop event at all.
        ctl.on_drag_end(&mut board);
        assert!(!ctl.is_dragging());
        assert!(!board.node("A").unwrap().dragging);
        assert!(!board.drop_zones_visible());
        assert_eq!(board.widget_ids(), vec!["A", "B"]);
    }

    #[test]
    fn unknown_widget_does_not_start_drag() {
        let mut board = WidgetBoard::from_ids(["A"]);
        let mut ctl = DragController::new();
        assert!(!ctl.on_drag_start(&mut board, "Z"));
        assert!(ctl.session().is_none());
    }
}
