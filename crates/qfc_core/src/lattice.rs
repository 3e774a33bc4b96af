//! Qubit lattice adjacency for QFC
//!
//! Gantree: L1_Lattice → Lattice
//!
//! Converts coupler descriptions (pairwise list or heavy neighbor map) into a
//! symmetric 0/1 adjacency matrix and its square, which gives two-hop
//! reachability through a shared neighbor.

use crate::error::{QfcError, QfcResult};
use crate::types::{QubitId, QubitPair};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Heavy (over-specified) coupling form: every qubit mapped to its neighbors
pub type HeavyCoupling = BTreeMap<QubitId, Vec<QubitId>>;

/// Serializable coupling description
/// Gantree: CouplingMap // 직렬화 형식
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouplingMap {
    /// Explicit qubit count (needed when trailing qubits have no couplers)
    #[serde(default)]
    pub num_qubits: Option<usize>,

    /// Pairwise couplers
    pub connections: Vec<QubitPair>,

    /// Optional lattice name
    #[serde(default)]
    pub name: Option<String>,
}

/// Fixed-connectivity qubit lattice
/// Gantree: Lattice // 큐비트 격자
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CouplingMap", into = "CouplingMap")]
pub struct Lattice {
    /// Symmetric 0/1 adjacency, zero diagonal
    /// Gantree: adjacency: Array2<u8> // 인접 행렬
    adjacency: Array2<u8>,

    /// adjacency · adjacency
    /// Gantree: adjacency_squared: Array2<u32> // 2-hop 행렬
    adjacency_squared: Array2<u32>,

    /// Optional lattice name
    name: Option<String>,
}

impl Lattice {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create from a pairwise coupling list
    /// Gantree: from_pairs(pairs, n?) -> Result<Self> // 쌍 목록에서 생성
    ///
    /// The lattice covers the largest referenced qubit, or `num_qubits` if
    /// that is larger.
    pub fn from_pairs(pairs: &[QubitPair], num_qubits: Option<usize>) -> QfcResult<Self> {
        for &(a, b) in pairs {
            if a == b {
                return Err(QfcError::InvalidCoupling(a, b));
            }
        }

        let referenced = pairs
            .iter()
            .map(|&(a, b)| a.max(b) + 1)
            .max()
            .unwrap_or(0);
        let n = referenced.max(num_qubits.unwrap_or(0));

        let mut adjacency = Array2::<u8>::zeros((n, n));
        for &(a, b) in pairs {
            adjacency[[a, b]] = 1;
            adjacency[[b, a]] = 1;
        }

        Ok(Self::from_adjacency_unchecked(adjacency))
    }

    /// Create from the heavy neighbor-map form
    /// Gantree: from_heavy(map) -> Result<Self> // heavy 형식에서 생성
    ///
    /// One-sided entries are mirrored so the result is always symmetric.
    pub fn from_heavy(heavy: &HeavyCoupling) -> QfcResult<Self> {
        let n = heavy
            .iter()
            .flat_map(|(&q, nbrs)| std::iter::once(q).chain(nbrs.iter().copied()))
            .map(|q| q + 1)
            .max()
            .unwrap_or(0);

        let mut adjacency = Array2::<u8>::zeros((n, n));
        for (&q, nbrs) in heavy {
            for &nb in nbrs {
                if nb == q {
                    return Err(QfcError::InvalidCoupling(q, nb));
                }
                adjacency[[q, nb]] = 1;
                adjacency[[nb, q]] = 1;
            }
        }

        Ok(Self::from_adjacency_unchecked(adjacency))
    }

    /// Create from a square 0/1 adjacency matrix
    pub fn from_adjacency(adjacency: Array2<u8>) -> QfcResult<Self> {
        let (rows, cols) = adjacency.dim();
        if rows != cols {
            return Err(QfcError::ShapeMismatch {
                what: "adjacency columns",
                expected: rows,
                actual: cols,
            });
        }
        for i in 0..rows {
            if adjacency[[i, i]] != 0 {
                return Err(QfcError::InvalidCoupling(i, i));
            }
            for j in i + 1..rows {
                if (adjacency[[i, j]] != 0) != (adjacency[[j, i]] != 0) {
                    return Err(QfcError::ConfigError(format!(
                        "adjacency is not symmetric at ({}, {})",
                        i, j
                    )));
                }
            }
        }
        Ok(Self::from_adjacency_unchecked(adjacency.mapv(|v| u8::from(v != 0))))
    }

    fn from_adjacency_unchecked(adjacency: Array2<u8>) -> Self {
        let wide = adjacency.mapv(u32::from);
        let adjacency_squared = wide.dot(&wide);
        Self {
            adjacency,
            adjacency_squared,
            name: None,
        }
    }

    /// Linear chain 0-1-2-...-N-1
    /// Gantree: linear(n) -> Self // 선형 체인
    pub fn linear(n: usize) -> Self {
        let pairs: Vec<QubitPair> = (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect();
        Self::known_good(&pairs, n, format!("linear_{}", n))
    }

    /// Ring 0-1-...-N-1-0
    /// Gantree: ring(n) -> Self // 원형
    pub fn ring(n: usize) -> Self {
        let mut pairs: Vec<QubitPair> = (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect();
        if n > 2 {
            pairs.push((n - 1, 0));
        }
        Self::known_good(&pairs, n, format!("ring_{}", n))
    }

    /// Square grid, qubit index `row * cols + col`
    /// Gantree: grid(rows, cols) -> Self // 그리드
    pub fn grid(rows: usize, cols: usize) -> Self {
        let mut pairs = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let q = r * cols + c;
                if c + 1 < cols {
                    pairs.push((q, q + 1));
                }
                if r + 1 < rows {
                    pairs.push((q, q + cols));
                }
            }
        }
        Self::known_good(&pairs, rows * cols, format!("grid_{}x{}", rows, cols))
    }

    /// 7-qubit heavy-hex cell (IBM Lagos style H shape)
    pub fn heavy_hex_7() -> Self {
        let pairs = [(0, 1), (1, 2), (1, 3), (3, 5), (4, 5), (5, 6)];
        Self::known_good(&pairs, 7, "heavy_hex_7".to_string())
    }

    /// Every pair coupled
    pub fn all_to_all(n: usize) -> Self {
        let mut pairs = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                pairs.push((i, j));
            }
        }
        Self::known_good(&pairs, n, format!("all_to_all_{}", n))
    }

    fn known_good(pairs: &[QubitPair], n: usize, name: String) -> Self {
        let mut adjacency = Array2::<u8>::zeros((n, n));
        for &(a, b) in pairs {
            adjacency[[a, b]] = 1;
            adjacency[[b, a]] = 1;
        }
        let mut lattice = Self::from_adjacency_unchecked(adjacency);
        lattice.name = Some(name);
        lattice
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.adjacency.nrows()
    }

    /// Number of couplers
    pub fn num_edges(&self) -> usize {
        self.adjacency.iter().map(|&v| v as usize).sum::<usize>() / 2
    }

    /// Adjacency matrix
    pub fn adjacency(&self) -> &Array2<u8> {
        &self.adjacency
    }

    /// Squared adjacency matrix
    pub fn adjacency_squared(&self) -> &Array2<u32> {
        &self.adjacency_squared
    }

    /// Lattice name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set lattice name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Builder form of [`set_name`](Self::set_name)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    // ========================================================================
    // Connectivity Queries
    // ========================================================================

    /// Directly coupled (never true for `a == b`)
    /// Gantree: is_adjacent(a, b) -> bool // 직접 연결
    #[inline]
    pub fn is_adjacent(&self, a: QubitId, b: QubitId) -> bool {
        let n = self.num_qubits();
        a < n && b < n && self.adjacency[[a, b]] != 0
    }

    /// Reachable in exactly two hops through some shared neighbor
    #[inline]
    pub fn is_two_hop(&self, a: QubitId, b: QubitId) -> bool {
        let n = self.num_qubits();
        a != b && a < n && b < n && self.adjacency_squared[[a, b]] != 0
    }

    /// Sorted neighbors of `qubit`
    /// Gantree: neighbors(q) -> Vec<QubitId> // 이웃
    pub fn neighbors(&self, qubit: QubitId) -> Vec<QubitId> {
        if qubit >= self.num_qubits() {
            return Vec::new();
        }
        self.adjacency
            .row(qubit)
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0)
            .map(|(q, _)| q)
            .collect()
    }

    /// Qubits adjacent to both `a` and `b`
    pub fn common_neighbors(&self, a: QubitId, b: QubitId) -> Vec<QubitId> {
        (0..self.num_qubits())
            .filter(|&k| k != a && k != b && self.is_adjacent(a, k) && self.is_adjacent(b, k))
            .collect()
    }

    /// Number of couplers on `qubit`
    pub fn degree(&self, qubit: QubitId) -> usize {
        self.neighbors(qubit).len()
    }

    /// Hop distance by BFS, `None` if unreachable
    pub fn distance(&self, start: QubitId, end: QubitId) -> Option<usize> {
        let n = self.num_qubits();
        if start >= n || end >= n {
            return None;
        }
        if start == end {
            return Some(0);
        }

        let mut dist: Vec<Option<usize>> = vec![None; n];
        let mut queue = VecDeque::new();
        dist[start] = Some(0);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let d = dist[current]?;
            for nb in self.neighbors(current) {
                if dist[nb].is_none() {
                    if nb == end {
                        return Some(d + 1);
                    }
                    dist[nb] = Some(d + 1);
                    queue.push_back(nb);
                }
            }
        }

        None
    }

    /// All qubits mutually reachable
    pub fn is_fully_connected(&self) -> bool {
        (1..self.num_qubits()).all(|q| self.distance(0, q).is_some())
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Upper-triangle couplers in row-major order
    /// Gantree: to_pairs() -> Vec<QubitPair> // 쌍 목록으로 변환
    pub fn to_pairs(&self) -> Vec<QubitPair> {
        let n = self.num_qubits();
        let mut pairs = Vec::with_capacity(self.num_edges());
        for i in 0..n {
            for j in i + 1..n {
                if self.adjacency[[i, j]] != 0 {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Heavy form: every qubit listed, neighbors ascending
    /// Gantree: to_heavy() -> HeavyCoupling // heavy 형식으로 변환
    pub fn to_heavy(&self) -> HeavyCoupling {
        (0..self.num_qubits())
            .map(|q| (q, self.neighbors(q)))
            .collect()
    }

    /// Serializable coupling description
    pub fn to_coupling_map(&self) -> CouplingMap {
        CouplingMap {
            num_qubits: Some(self.num_qubits()),
            connections: self.to_pairs(),
            name: self.name.clone(),
        }
    }
}

impl PartialEq for Lattice {
    fn eq(&self, other: &Self) -> bool {
        self.adjacency == other.adjacency
    }
}

impl TryFrom<CouplingMap> for Lattice {
    type Error = QfcError;

    fn try_from(map: CouplingMap) -> QfcResult<Self> {
        let mut lattice = Lattice::from_pairs(&map.connections, map.num_qubits)?;
        lattice.name = map.name;
        Ok(lattice)
    }
}

impl From<Lattice> for CouplingMap {
    fn from(lattice: Lattice) -> Self {
        lattice.to_coupling_map()
    }
}

// ============================================================================
// Display
// ============================================================================

impl std::fmt::Display for Lattice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Lattice({} qubits, {} edges{})",
            self.num_qubits(),
            self.num_edges(),
            self.name
                .as_ref()
                .map(|n| format!(", {}", n))
                .unwrap_or_default()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_symmetric_zero_diagonal(lattice: &Lattice) {
        let adj = lattice.adjacency();
        for i in 0..lattice.num_qubits() {
            assert_eq!(adj[[i, i]], 0, "self-loop on {}", i);
            for j in 0..lattice.num_qubits() {
                assert_eq!(adj[[i, j]], adj[[j, i]], "asymmetric at ({}, {})", i, j);
            }
        }
    }

    #[test]
    fn test_from_pairs_sizes_to_max_index() {
        let lattice = Lattice::from_pairs(&[(0, 1), (1, 4)], None).unwrap();
        assert_eq!(lattice.num_qubits(), 5);
        assert_eq!(lattice.num_edges(), 2);
        assert!(lattice.is_adjacent(4, 1));
        assert!(!lattice.is_adjacent(0, 4));
    }

    #[test]
    fn test_explicit_count_covers_trailing_qubits() {
        let lattice = Lattice::from_pairs(&[(0, 1)], Some(4)).unwrap();
        assert_eq!(lattice.num_qubits(), 4);
        assert!(lattice.neighbors(3).is_empty());

        // Smaller explicit count never truncates
        let lattice = Lattice::from_pairs(&[(0, 5)], Some(2)).unwrap();
        assert_eq!(lattice.num_qubits(), 6);
    }

    #[test]
    fn test_self_loop_rejected() {
        let err = Lattice::from_pairs(&[(0, 1), (2, 2)], None).unwrap_err();
        assert_eq!(err, QfcError::InvalidCoupling(2, 2));
    }

    #[test]
    fn test_empty_lattice() {
        let lattice = Lattice::from_pairs(&[], None).unwrap();
        assert_eq!(lattice.num_qubits(), 0);
        assert!(lattice.to_pairs().is_empty());
        assert!(lattice.is_fully_connected());
    }

    #[test]
    fn test_pairwise_roundtrip() {
        let edges = vec![(0, 1), (0, 3), (1, 2), (2, 3)];
        let lattice = Lattice::from_pairs(&edges, None).unwrap();
        assert_eq!(lattice.to_pairs(), edges);
        assert_symmetric_zero_diagonal(&lattice);
    }

    #[test]
    fn test_heavy_roundtrip() {
        let lattice = Lattice::grid(2, 3);
        let heavy = lattice.to_heavy();
        assert_eq!(heavy.len(), 6);
        assert_eq!(heavy[&1], vec![0, 2, 4]);

        let rebuilt = Lattice::from_heavy(&heavy).unwrap();
        assert_eq!(rebuilt, lattice);
        assert_eq!(rebuilt.to_pairs(), lattice.to_pairs());
    }

    #[test]
    fn test_one_sided_heavy_is_mirrored() {
        let mut heavy = HeavyCoupling::new();
        heavy.insert(0, vec![1]);
        heavy.insert(1, vec![2]);
        let lattice = Lattice::from_heavy(&heavy).unwrap();
        assert_symmetric_zero_diagonal(&lattice);
        assert_eq!(lattice.to_pairs(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_adjacency_squared_two_hop() {
        let lattice = Lattice::linear(4);
        let sq = lattice.adjacency_squared();
        assert_eq!(sq[[0, 2]], 1);
        assert_eq!(sq[[1, 1]], 2); // degree on the diagonal
        assert_eq!(sq[[0, 3]], 0);
        assert!(lattice.is_two_hop(0, 2));
        assert!(!lattice.is_two_hop(1, 1));

        // Ring of 4: opposite corners share two neighbors
        let ring = Lattice::ring(4);
        assert_eq!(ring.adjacency_squared()[[0, 2]], 2);
        assert_eq!(ring.common_neighbors(0, 2), vec![1, 3]);
    }

    #[test]
    fn test_ring_and_grid() {
        let ring = Lattice::ring(4);
        assert_eq!(ring.num_edges(), 4);
        assert!(ring.is_adjacent(3, 0));

        let grid = Lattice::grid(2, 3);
        assert_eq!(grid.num_edges(), 7);
        assert_symmetric_zero_diagonal(&grid);
    }

    #[test]
    fn test_from_adjacency_validation() {
        let mut adj = Array2::<u8>::zeros((3, 3));
        adj[[0, 1]] = 1;
        assert!(Lattice::from_adjacency(adj.clone()).is_err());
        adj[[1, 0]] = 1;
        let lattice = Lattice::from_adjacency(adj).unwrap();
        assert_eq!(lattice.to_pairs(), vec![(0, 1)]);
    }

    #[test]
    fn test_distance() {
        let lattice = Lattice::heavy_hex_7();
        assert_eq!(lattice.distance(0, 6), Some(4));
        assert_eq!(lattice.distance(2, 2), Some(0));
        assert!(lattice.is_fully_connected());

        let split = Lattice::from_pairs(&[(0, 1), (2, 3)], None).unwrap();
        assert_eq!(split.distance(0, 3), None);
        assert!(!split.is_fully_connected());
    }

    #[test]
    fn test_serde_roundtrip() {
        let lattice = Lattice::from_pairs(&[(0, 1), (1, 2)], Some(4))
            .unwrap()
            .with_name("chain");
        let json = serde_json::to_string(&lattice).unwrap();
        let restored: Lattice = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, lattice);
        assert_eq!(restored.num_qubits(), 4);
        assert_eq!(restored.name(), Some("chain"));
    }

    #[test]
    fn test_serde_rejects_self_loop() {
        let json = r#"{"connections": [[0, 0]]}"#;
        assert!(serde_json::from_str::<Lattice>(json).is_err());
    }
}
