//! Binary regression tree (least-squares CART).
//!
//! Small fitted-per-query trees back the bootstrap-tree policy, so the
//! implementation favors simplicity over training throughput: nodes live in
//! a flat arena, splits minimize the summed squared error of the children,
//! and thresholds fall on midpoints between adjacent distinct feature
//! values.

/// Growth limits for [`RegressionTree::fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    /// Maximum tree depth; 0 yields a single leaf at the global mean.
    pub max_depth: u32,
    /// Minimum number of samples a node needs to be considered for a split.
    pub min_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 8,
            min_split: 2,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree. Prediction walks from the root following
/// `row[feature] <= threshold` to the left child.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Fits a tree to `rows` (one feature vector per sample) and `targets`.
    /// All rows must share one width. An empty training set yields a
    /// constant-zero tree.
    pub fn fit(rows: &[Vec<f64>], targets: &[f64], params: TreeParams) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        if rows.is_empty() {
            tree.nodes.push(Node::Leaf { value: 0.0 });
            return tree;
        }
        let indices: Vec<usize> = (0..rows.len()).collect();
        tree.grow(rows, targets, indices, params.max_depth, params.min_split);
        tree
    }

    /// Predicted value for one feature vector.
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut node = 0;
        loop {
            match self.nodes[node] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    fn grow(
        &mut self,
        rows: &[Vec<f64>],
        targets: &[f64],
        indices: Vec<usize>,
        depth_left: u32,
        min_split: usize,
    ) -> usize {
        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: mean_of(targets, &indices),
        });
        if depth_left == 0 || indices.len() < min_split {
            return node_id;
        }
        if let Some((feature, threshold)) = best_split(rows, targets, &indices) {
            let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                .into_iter()
                .partition(|&i| rows[i][feature] <= threshold);
            // A midpoint between two adjacent representable floats can land
            // on the upper value and drain one side; keep the leaf then.
            if !left_idx.is_empty() && !right_idx.is_empty() {
                let left = self.grow(rows, targets, left_idx, depth_left - 1, min_split);
                let right = self.grow(rows, targets, right_idx, depth_left - 1, min_split);
                self.nodes[node_id] = Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                };
            }
        }
        node_id
    }
}

/// Finds the (feature, threshold) pair minimizing the children's summed
/// squared error, or None when no split improves on the parent.
fn best_split(rows: &[Vec<f64>], targets: &[f64], indices: &[usize]) -> Option<(usize, f64)> {
    if indices.len() < 2 {
        return None;
    }
    let n = indices.len() as f64;
    let total: f64 = indices.iter().map(|&i| targets[i]).sum();
    let total_sq: f64 = indices.iter().map(|&i| targets[i] * targets[i]).sum();
    let parent_sse = total_sq - total * total / n;

    let width = rows[indices[0]].len();
    let mut best: Option<(usize, f64, f64)> = None;

    for feature in 0..width {
        let mut sorted = indices.to_vec();
        sorted.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for (k, &i) in sorted.iter().enumerate().take(sorted.len() - 1) {
            let y = targets[i];
            left_sum += y;
            left_sq += y * y;
            let here = rows[i][feature];
            let next = rows[sorted[k + 1]][feature];
            if here == next {
                continue;
            }
            let left_n = (k + 1) as f64;
            let right_n = n - left_n;
            let right_sum = total - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_n)
                + (right_sq - right_sum * right_sum / right_n);
            if sse < parent_sse - 1e-12 && best.map_or(true, |(_, _, b)| sse < b) {
                best = Some((feature, 0.5 * (here + next), sse));
            }
        }
    }
    best.map(|(feature, threshold, _)| (feature, threshold))
}

fn mean_of(targets: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| targets[i]).sum::<f64>() / indices.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_training_set_predicts_zero() {
        let tree = RegressionTree::fit(&[], &[], TreeParams::default());
        assert!(tree.predict(&[1.0, 2.0]).abs() < 1e-10);
    }

    #[test]
    fn test_constant_target_yields_single_leaf() {
        let rows: Vec<Vec<f64>> = (0..10).map(|x| vec![x as f64]).collect();
        let targets = vec![5.0; 10];
        let tree = RegressionTree::fit(&rows, &targets, TreeParams::default());
        assert_eq!(tree.nodes.len(), 1);
        assert!((tree.predict(&[3.0]) - 5.0).abs() < 1e-10);
        assert!((tree.predict(&[100.0]) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_separable_data_splits_cleanly() {
        let rows: Vec<Vec<f64>> = (0..10).map(|x| vec![x as f64]).collect();
        let targets: Vec<f64> = (0..10).map(|x| if x < 5 { 0.0 } else { 100.0 }).collect();
        let tree = RegressionTree::fit(&rows, &targets, TreeParams::default());
        assert!(tree.predict(&[2.0]).abs() < 1e-10);
        assert!((tree.predict(&[8.0]) - 100.0).abs() < 1e-10);
        // The split lands between 4 and 5.
        assert!(tree.predict(&[4.0]).abs() < 1e-10);
        assert!((tree.predict(&[5.0]) - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_depth_returns_global_mean() {
        let rows: Vec<Vec<f64>> = (0..4).map(|x| vec![x as f64]).collect();
        let targets = vec![0.0, 0.0, 10.0, 10.0];
        let params = TreeParams {
            max_depth: 0,
            min_split: 2,
        };
        let tree = RegressionTree::fit(&rows, &targets, params);
        assert_eq!(tree.nodes.len(), 1);
        assert!((tree.predict(&[0.0]) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_min_split_blocks_small_nodes() {
        let rows = vec![vec![0.0], vec![1.0]];
        let targets = vec![0.0, 10.0];
        let params = TreeParams {
            max_depth: 8,
            min_split: 3,
        };
        let tree = RegressionTree::fit(&rows, &targets, params);
        assert_eq!(tree.nodes.len(), 1);
        assert!((tree.predict(&[0.0]) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_split_picks_the_informative_feature() {
        // Feature 0 is constant noise; feature 1 separates the targets.
        let rows: Vec<Vec<f64>> = (0..8).map(|x| vec![7.0, x as f64]).collect();
        let targets: Vec<f64> = (0..8).map(|x| if x < 4 { -1.0 } else { 1.0 }).collect();
        let tree = RegressionTree::fit(&rows, &targets, TreeParams::default());
        assert!((tree.predict(&[7.0, 0.0]) + 1.0).abs() < 1e-10);
        assert!((tree.predict(&[7.0, 7.0]) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_piecewise_targets_recovered() {
        let rows: Vec<Vec<f64>> = (0..12).map(|x| vec![x as f64]).collect();
        let targets: Vec<f64> = (0..12)
            .map(|x| match x {
                0..=3 => 1.0,
                4..=7 => 5.0,
                _ => 9.0,
            })
            .collect();
        let tree = RegressionTree::fit(&rows, &targets, TreeParams::default());
        assert!((tree.predict(&[1.0]) - 1.0).abs() < 1e-10);
        assert!((tree.predict(&[6.0]) - 5.0).abs() < 1e-10);
        assert!((tree.predict(&[11.0]) - 9.0).abs() < 1e-10);
    }
}
