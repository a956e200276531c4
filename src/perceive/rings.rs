use std::collections::VecDeque;

use crate::model::molecule::Molecule;

/// Sets `in_ring` on every bond that lies on a cycle.
///
/// A bond is a ring bond exactly when removing it keeps its endpoints connected,
/// i.e. when it is not a bridge. Bridges are found with an iterative low-link DFS.
pub fn mark_ring_bonds(mol: &mut Molecule) {
    let bridges = find_bridges(mol);
    for (bond, is_bridge) in mol.bonds_mut().iter_mut().zip(bridges) {
        bond.in_ring = !is_bridge;
    }
}

fn find_bridges(mol: &Molecule) -> Vec<bool> {
    const UNVISITED: usize = usize::MAX;

    let n = mol.atom_count();
    let mut disc = vec![UNVISITED; n];
    let mut low = vec![0usize; n];
    let mut bridges = vec![false; mol.bond_count()];
    let mut timer = 0;

    for root in 0..n {
        if disc[root] != UNVISITED {
            continue;
        }
        disc[root] = timer;
        low[root] = timer;
        timer += 1;

        // (atom, bond used to reach it, next neighbor slot to visit)
        let mut stack: Vec<(usize, Option<usize>, usize)> = vec![(root, None, 0)];

        while let Some(top) = stack.last_mut() {
            let (v, via, slot) = *top;
            top.2 += 1;

            if let Some(&(w, bond)) = mol.neighbors(v).get(slot) {
                if Some(bond) == via {
                    continue;
                }
                if disc[w] == UNVISITED {
                    disc[w] = timer;
                    low[w] = timer;
                    timer += 1;
                    stack.push((w, Some(bond), 0));
                } else {
                    low[v] = low[v].min(disc[w]);
                }
                continue;
            }

            stack.pop();
            if let (Some(bond), Some(&(parent, _, _))) = (via, stack.last()) {
                low[parent] = low[parent].min(low[v]);
                if low[v] > disc[parent] {
                    bridges[bond] = true;
                }
            }
        }
    }

    bridges
}

/// Atoms of the smallest cycle through bond `bond` between `from` and `to`, in ring
/// order starting at `from`, or `None` if no cycle of at most `max_size` atoms exists.
pub(super) fn smallest_cycle_through(
    mol: &Molecule,
    from: usize,
    to: usize,
    bond: usize,
    max_size: usize,
) -> Option<Vec<usize>> {
    let mut parent = vec![usize::MAX; mol.atom_count()];
    let mut depth = vec![0usize; mol.atom_count()];
    let mut queue = VecDeque::from([from]);
    parent[from] = from;

    while let Some(v) = queue.pop_front() {
        if v == to {
            break;
        }
        if depth[v] + 1 >= max_size {
            continue;
        }
        for &(w, b) in mol.neighbors(v) {
            if b == bond || parent[w] != usize::MAX {
                continue;
            }
            parent[w] = v;
            depth[w] = depth[v] + 1;
            queue.push_back(w);
        }
    }

    if parent[to] == usize::MAX {
        return None;
    }

    let mut cycle = vec![to];
    let mut cur = to;
    while cur != from {
        cur = parent[cur];
        cycle.push(cur);
    }
    cycle.reverse();
    Some(cycle)
}
