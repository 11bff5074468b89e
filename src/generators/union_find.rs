/// Disjoint-set forest over cell indices, with path compression and union by rank.
///
/// Tracks which cells are already joined by carved passages while a maze is generated.
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    groups: usize,
}

impl DisjointSet {
    /// Creates `size` singleton groups, one per element.
    pub fn new(size: usize) -> Self {
        DisjointSet {
            parent: (0..size).collect(),
            rank: vec![0; size],
            groups: size,
        }
    }

    /// Representative of the group containing `x`.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Point every element on the way directly at the root
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    pub fn same_group(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }

    /// Merges the groups of `x` and `y`.
    ///
    /// Callers check [`DisjointSet::same_group`] first; merging a group with itself is a no-op
    /// and is flagged in debug builds since it means a cycle-closing edge slipped through.
    pub fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        debug_assert_ne!(root_x, root_y, "union called on two elements of the same group");
        if root_x == root_y {
            return;
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Greater => {
                self.parent[root_y] = root_x;
            }
            std::cmp::Ordering::Less => {
                self.parent[root_x] = root_y;
            }
            std::cmp::Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] = self.rank[root_x].saturating_add(1);
            }
        }
        self.groups -= 1;
    }

    /// Number of disjoint groups left.
    pub fn group_count(&self) -> usize {
        self.groups
    }
}
