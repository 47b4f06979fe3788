use lazy_static::lazy_static;
use sha2::{Digest, Sha256};
use ssz::H256;

const MAX_TREE_DEPTH: usize = 32;
const EMPTY_SLICE: &[H256] = &[];

lazy_static! {
    /// `ZERO_HASHES[i]` is the root of a tree of 2^i zero leaves.
    static ref ZERO_HASHES: Vec<H256> = {
        let mut hashes = vec![H256::zero(); MAX_TREE_DEPTH + 1];

        for i in 0..MAX_TREE_DEPTH {
            hashes[i + 1] = hash_concat(hashes[i], hashes[i]);
        }

        hashes
    };

    static ref ZERO_NODES: Vec<MerkleTree> = {
        (0..=MAX_TREE_DEPTH).map(MerkleTree::Zero).collect()
    };
}

pub fn hash(input: &[u8]) -> H256 {
    H256::from_slice(&Sha256::digest(input))
}

pub fn hash_concat(left: H256, right: H256) -> H256 {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    H256::from_slice(&hasher.finalize())
}

/// Right-sparse Merkle tree of fixed depth.
///
/// Only the first N leaves are populated; everything to their right is a
/// zero subtree, which is exactly the shape of the deposit contract tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MerkleTree {
    Leaf(H256),
    Node(H256, Box<Self>, Box<Self>),
    /// 2^depth zero leaves.
    Zero(usize),
}

impl MerkleTree {
    pub fn create(leaves: &[H256], depth: usize) -> Self {
        use MerkleTree::*;

        if leaves.is_empty() {
            return Zero(depth);
        }

        match depth {
            0 => {
                debug_assert_eq!(leaves.len(), 1);
                Leaf(leaves[0])
            }
            _ => {
                let subtree_capacity = 2usize.pow(depth as u32 - 1);
                let (left_leaves, right_leaves) = if leaves.len() <= subtree_capacity {
                    (leaves, EMPTY_SLICE)
                } else {
                    leaves.split_at(subtree_capacity)
                };

                let left_subtree = MerkleTree::create(left_leaves, depth - 1);
                let right_subtree = MerkleTree::create(right_leaves, depth - 1);
                let hash = hash_concat(left_subtree.hash(), right_subtree.hash());

                Node(hash, Box::new(left_subtree), Box::new(right_subtree))
            }
        }
    }

    pub fn hash(&self) -> H256 {
        match *self {
            MerkleTree::Leaf(h) => h,
            MerkleTree::Node(h, _, _) => h,
            MerkleTree::Zero(depth) => ZERO_HASHES[depth],
        }
    }

    fn left_and_right_branches(&self) -> Option<(&Self, &Self)> {
        match *self {
            MerkleTree::Leaf(_) | MerkleTree::Zero(0) => None,
            MerkleTree::Node(_, ref l, ref r) => Some((l, r)),
            MerkleTree::Zero(depth) => Some((&ZERO_NODES[depth - 1], &ZERO_NODES[depth - 1])),
        }
    }

    /// Return the leaf at `index` and its bottom-up inclusion proof of
    /// length `depth`.
    ///
    /// Indices past the populated leaves yield the zero leaf and a proof of
    /// its inclusion.
    pub fn generate_proof(&self, index: usize, depth: usize) -> (H256, Vec<H256>) {
        let mut proof = vec![];
        let mut current_node = self;
        let mut current_depth = depth;
        while current_depth > 0 {
            let ith_bit = (index >> (current_depth - 1)) & 0x01;
            let Some((left, right)) = current_node.left_and_right_branches() else {
                break;
            };

            if ith_bit == 1 {
                proof.push(left.hash());
                current_node = right;
            } else {
                proof.push(right.hash());
                current_node = left;
            }
            current_depth -= 1;
        }

        debug_assert_eq!(proof.len(), depth);

        proof.reverse();

        (current_node.hash(), proof)
    }
}

/// Verify that `leaf` sits at `index` of the depth-`depth` tree rooted at `root`.
pub fn verify_merkle_proof(
    leaf: H256,
    branch: &[H256],
    depth: usize,
    index: usize,
    root: H256,
) -> bool {
    if branch.len() == depth {
        merkle_root_from_branch(leaf, branch, depth, index) == root
    } else {
        false
    }
}

fn merkle_root_from_branch(leaf: H256, branch: &[H256], depth: usize, index: usize) -> H256 {
    branch
        .iter()
        .take(depth)
        .enumerate()
        .fold(leaf, |node, (i, sibling)| {
            if (index >> i) & 0x01 == 1 {
                hash_concat(*sibling, node)
            } else {
                hash_concat(node, *sibling)
            }
        })
}

/// Append-only accumulator over deposit leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositTree {
    leaves: Vec<H256>,
    depth: usize,
}

impl DepositTree {
    pub fn new(depth: usize) -> Self {
        Self {
            leaves: Vec::new(),
            depth,
        }
    }

    pub fn from_leaves(leaves: impl IntoIterator<Item = H256>, depth: usize) -> Self {
        Self {
            leaves: leaves.into_iter().collect(),
            depth,
        }
    }

    /// Append a leaf, returning its index.
    pub fn push_leaf(&mut self, leaf: H256) -> usize {
        self.leaves.push(leaf);
        self.leaves.len() - 1
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn root(&self) -> H256 {
        MerkleTree::create(&self.leaves, self.depth).hash()
    }

    pub fn generate_proof(&self, index: usize) -> (H256, Vec<H256>) {
        MerkleTree::create(&self.leaves, self.depth).generate_proof(index, self.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn leaf(byte: u8) -> H256 {
        H256::from([byte; 32])
    }

    #[test]
    fn sparse_zero_correct() {
        let depth = 2;
        let zero = H256::zero();
        let dense_tree = MerkleTree::create(&[zero, zero, zero, zero], depth);
        let sparse_tree = MerkleTree::create(&[], depth);
        assert_eq!(dense_tree.hash(), sparse_tree.hash());
    }

    #[test]
    fn create_small_example() {
        let node_b0x = hash_concat(leaf(0xAA), leaf(0xBB));
        let node_b1x = hash_concat(leaf(0xCC), leaf(0xDD));
        let root = hash_concat(node_b0x, node_b1x);

        let tree = MerkleTree::create(&[leaf(0xAA), leaf(0xBB), leaf(0xCC), leaf(0xDD)], 2);
        assert_eq!(tree.hash(), root);
    }

    #[test]
    fn verify_small_example() {
        let node_b0x = hash_concat(leaf(0xAA), leaf(0xBB));
        let node_b1x = hash_concat(leaf(0xCC), leaf(0xDD));
        let root = hash_concat(node_b0x, node_b1x);

        assert!(verify_merkle_proof(leaf(0xAA), &[leaf(0xBB), node_b1x], 2, 0b00, root));
        assert!(verify_merkle_proof(leaf(0xBB), &[leaf(0xAA), node_b1x], 2, 0b01, root));
        assert!(verify_merkle_proof(leaf(0xCC), &[leaf(0xDD), node_b0x], 2, 0b10, root));
        assert!(verify_merkle_proof(leaf(0xDD), &[leaf(0xCC), node_b0x], 2, 0b11, root));
        assert!(verify_merkle_proof(leaf(0xDD), &[leaf(0xCC)], 1, 0b11, node_b1x));

        // zero-length proof
        assert!(!verify_merkle_proof(leaf(0xBB), &[], 2, 0b01, root));
        // reversed proof
        assert!(!verify_merkle_proof(leaf(0xBB), &[node_b1x, leaf(0xAA)], 2, 0b01, root));
        // too short
        assert!(!verify_merkle_proof(leaf(0xBB), &[leaf(0xAA)], 2, 0b01, root));
        // wrong index
        assert!(!verify_merkle_proof(leaf(0xBB), &[leaf(0xAA), node_b1x], 2, 0b10, root));
        // wrong root
        assert!(!verify_merkle_proof(leaf(0xBB), &[leaf(0xAA), node_b1x], 2, 0b01, node_b1x));
    }

    #[test]
    fn verify_zero_depth() {
        assert!(verify_merkle_proof(leaf(0xD6), &[], 0, 0, leaf(0xD6)));
        assert!(!verify_merkle_proof(leaf(0xD6), &[], 0, 7, leaf(0xD7)));
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(10)]
    #[case(11)]
    #[case(33)]
    fn deposit_tree_proofs_verify(#[case] count: u8) {
        let mut tree = DepositTree::new(32);
        for byte in 0..count {
            tree.push_leaf(leaf(byte + 1));
        }
        let root = tree.root();

        for index in 0..tree.len() {
            let (proved_leaf, proof) = tree.generate_proof(index);
            assert_eq!(proved_leaf, leaf(index as u8 + 1));
            assert_eq!(proof.len(), 32);
            assert!(verify_merkle_proof(proved_leaf, &proof, 32, index, root));
        }
    }

    #[test]
    fn appending_changes_root() {
        let mut tree = DepositTree::from_leaves([leaf(1), leaf(2)], 32);
        let before = tree.root();
        assert_eq!(tree.push_leaf(leaf(3)), 2);
        assert_ne!(tree.root(), before);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn zeroed_last_sibling_breaks_proof() {
        let tree = DepositTree::from_leaves((1..=11).map(leaf), 32);
        let (proved_leaf, mut proof) = tree.generate_proof(10);
        *proof.last_mut().unwrap() = H256::zero();
        assert!(!verify_merkle_proof(proved_leaf, &proof, 32, 10, tree.root()));
    }
}
