/// A widget as placed on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetNode {
    pub id: String,
    pub minimized: bool,
    pub dragging: bool,
}

impl WidgetNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            minimized: false,
            dragging: false,
        }
    }
}

/// Interstitial drop target. `index` is the position a dropped widget would
/// take and is fixed when the zones are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropZone {
    pub index: usize,
    pub visible: bool,
    pub highlighted: bool,
}

/// View-state surface the layout and drag logic operate on.
///
/// Lookups are by widget id. Mutators return `false` when the target does not
/// exist so callers can skip silently.
pub trait BoardView {
    fn widget_ids(&self) -> Vec<String>;
    fn position(&self, id: &str) -> Option<usize>;
    fn is_minimized(&self, id: &str) -> Option<bool>;
    fn set_minimized(&mut self, id: &str, minimized: bool) -> bool;
    fn set_dragging(&mut self, id: &str, dragging: bool) -> bool;
    /// Move `id` immediately before `reference`, or to the end when
    /// `reference` is `None`.
    fn move_before(&mut self, id: &str, reference: Option<&str>) -> bool;
    /// Append a fresh node. Returns `false` if the id is already present.
    fn append(&mut self, id: &str) -> bool;
    fn remove(&mut self, id: &str) -> bool;
    fn clear(&mut self);

    fn drop_zones(&self) -> Vec<DropZone>;
    /// Recreate one zone before each widget plus a trailing one.
    fn rebuild_drop_zones(&mut self);
    fn set_drop_zones_visible(&mut self, visible: bool);
    fn highlight_drop_zone(&mut self, index: Option<usize>);

    fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    fn len(&self) -> usize {
        self.widget_ids().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory board used by the GUI and in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetBoard {
    nodes: Vec<WidgetNode>,
    zones: Vec<DropZone>,
}

impl WidgetBoard {
    pub fn new() -> Self {
        let mut board = Self::default();
        board.rebuild_drop_zones();
        board
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut board = Self::new();
        for id in ids {
            let id: String = id.into();
            board.append(&id);
        }
        board.rebuild_drop_zones();
        board
    }

    pub fn nodes(&self) -> &[WidgetNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&WidgetNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut WidgetNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn drop_zones_visible(&self) -> bool {
        self.zones.iter().any(|z| z.visible)
    }

    pub fn highlighted_zone(&self) -> Option<usize> {
        self.zones.iter().find(|z| z.highlighted).map(|z| z.index)
    }
}

impl BoardView for WidgetBoard {
    fn widget_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    fn is_minimized(&self, id: &str) -> Option<bool> {
        self.node(id).map(|n| n.minimized)
    }

    fn set_minimized(&mut self, id: &str, minimized: bool) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.minimized = minimized;
                true
            }
            None => false,
        }
    }

    fn set_dragging(&mut self, id: &str, dragging: bool) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.dragging = dragging;
                true
            }
            None => false,
        }
    }

    fn move_before(&mut self, id: &str, reference: Option<&str>) -> bool {
        if reference == Some(id) {
            return self.contains(id);
        }
        let Some(from) = self.position(id) else {
            return false;
        };
        let node = self.nodes.remove(from);
        let to = match reference.and_then(|r| self.position(r)) {
            Some(idx) => idx,
            None if reference.is_none() => self.nodes.len(),
            None => {
                // Unknown reference: put the node back where it was.
                self.nodes.insert(from, node);
                return false;
            }
        };
        self.nodes.insert(to, node);
        true
    }

    fn append(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.nodes.push(WidgetNode::new(id));
        true
    }

    fn remove(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.nodes.remove(idx);
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        self.nodes.clear();
    }

    fn drop_zones(&self) -> Vec<DropZone> {
        self.zones.clone()
    }

    fn rebuild_drop_zones(&mut self) {
        let visible = self.drop_zones_visible();
        self.zones = (0..=self.nodes.len())
            .map(|index| DropZone {
                index,
                visible,
                highlighted: false,
            })
            .collect();
    }

    fn set_drop_zones_visible(&mut self, visible: bool) {
        for zone in &mut self.zones {
            zone.visible = visible;
        }
    }

    fn highlight_drop_zone(&mut self, index: Option<usize>) {
        for zone in &mut self.zones {
            zone.highlighted = Some(zone.index) == index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zones_interleave_widgets() {
        let board = WidgetBoard::from_ids(["a", "b", "c"]);
        let indices: Vec<usize> = board.drop_zones().iter().map(|z| z.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(!board.drop_zones_visible());
    }

    #[test]
    fn empty_board_has_trailing_zone() {
        let mut board = WidgetBoard::from_ids(["a"]);
        board.remove("a");
        board.rebuild_drop_zones();
        assert_eq!(board.drop_zones().len(), 1);
        assert_eq!(board.drop_zones()[0].index, 0);
    }

    #[test]
    fn move_before_and_append() {
        let mut board = WidgetBoard::from_ids(["a", "b", "c"]);
        assert!(board.move_before("c", Some("a")));
        assert_eq!(board.widget_ids(), vec!["c", "a", "b"]);
        assert!(board.move_before("c", None));
        assert_eq!(board.widget_ids(), vec!["a", "b", "c"]);
        assert!(!board.move_before("a", Some("zzz")));
        assert_eq!(board.widget_ids(), vec!["a", "b", "c"]);
        assert!(!board.move_before("zzz", None));
    }

    #[test]
    fn rebuild_keeps_visibility_and_drops_highlight() {
        let mut board = WidgetBoard::from_ids(["a", "b"]);
        board.set_drop_zones_visible(true);
        board.highlight_drop_zone(Some(1));
        assert_eq!(board.highlighted_zone(), Some(1));
        board.rebuild_drop_zones();
        assert!(board.drop_zones().iter().all(|z| z.visible));
        assert_eq!(board.highlighted_zone(), None);
    }

    #[test]
    fn append_rejects_duplicates() {
        let mut board = WidgetBoard::from_ids(["a"]);
        assert!(!board.append("a"));
        assert!(board.append("b"));
        assert_eq!(board.len(), 2);
    }
}
