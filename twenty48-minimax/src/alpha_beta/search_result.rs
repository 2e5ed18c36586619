use text_trees::StringTreeNode;

use crate::board::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Counters threaded through one top level search. They start at zero for every depth of the
/// iterative deepening
pub struct SearchStats {
    /// Every board generated, both player moves and tile spawns
    pub positions: u64,
    /// How many times a node returned early because of the alpha-beta window
    pub cutoffs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// This is returned from every node of the search
pub struct SearchResult {
    /// The chosen direction at a player node. `None` at environment nodes, and at a player node
    /// where nothing can move
    pub direction: Option<Direction>,
    #[allow(missing_docs)]
    pub score: f64,
    /// The cumulative counters up to and including this node
    pub stats: SearchStats,
}

#[derive(Debug, Clone, PartialEq)]
/// Every legal direction at the root, each scored with a full window
///
/// This is meant for debugging. The normal search stops looking at a direction as soon as it
/// knows it can't be the best, so it can't tell you how much worse the other directions are
pub struct RootAnalysis {
    /// The depth each direction was searched to
    pub depth: usize,
    /// Sorted best first. Directions with equal scores keep their search order
    pub options: Vec<(Direction, SearchResult)>,
}

impl RootAnalysis {
    /// The direction the search would pick, if any direction can move
    pub fn best(&self) -> Option<&(Direction, SearchResult)> {
        self.options.first()
    }

    /// A visual representation of the scored options
    pub fn to_text_tree(&self) -> String {
        let mut root = StringTreeNode::new(format!("depth {}", self.depth));

        for (direction, result) in &self.options {
            root.push_node(StringTreeNode::new(format!(
                "{direction} {:.4} ({} positions, {} cutoffs)",
                result.score, result.stats.positions, result.stats.cutoffs
            )));
        }

        format!("{}", root)
    }
}
