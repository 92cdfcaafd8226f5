/// A disjoint-set forest over provisional component labels.
///
/// Labels are added one at a time with [`UnionFind::make_set`]; the root of a
/// set is always its smallest label, so resolved labels keep raster order.
#[derive(Debug, Default)]
pub(crate) struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a new singleton set and return its label.
    pub(crate) fn make_set(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        id
    }

    /// Returns the root of the set containing `id`, with path compression.
    pub(crate) fn find(&mut self, mut id: u32) -> u32 {
        let mut root = id;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        // Go back and collapse the tree
        while self.parent[id as usize] != root {
            let next = self.parent[id as usize];
            self.parent[id as usize] = root;
            id = next;
        }

        root
    }

    /// Merge the sets containing `a` and `b`, returning the surviving root.
    pub(crate) fn union(&mut self, a: u32, b: u32) -> u32 {
        let ra = self.find(a);
        let rb = self.find(b);
        let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[hi as usize] = lo;
        lo
    }

    pub(crate) fn len(&self) -> usize {
        self.parent.len()
    }
}
