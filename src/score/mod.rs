pub mod weights;

/// One externally scored contact. Score units are whatever the producer
/// used; only relative order and range matter downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItem {
    pub identity: String,
    pub score: f32,
}

/// Diameter interpolation range shared by every item in a batch.
#[derive(Debug, Clone, Copy)]
pub struct SizeRange {
    pub min_diameter: f32,
    pub max_diameter: f32,
}

impl Default for SizeRange {
    fn default() -> Self {
        Self {
            min_diameter: 100.0,
            max_diameter: 200.0,
        }
    }
}

impl SizeRange {
    pub fn midpoint(&self) -> f32 {
        (self.min_diameter + self.max_diameter) / 2.0
    }
}

/// Sort scores descending so the strongest affinity is placed first.
pub fn rank_descending(items: &mut [ScoredItem]) {
    items.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Map each score onto a diameter by min-max normalization against the
/// batch's own score range. A batch of identical scores has no range to
/// normalize against; every item gets the midpoint diameter instead of a
/// divide-by-zero.
pub fn diameters(scores: &[f32], range: SizeRange) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }

    let lo = scores.iter().copied().fold(f32::INFINITY, f32::min);
    let hi = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if hi - lo <= f32::EPSILON {
        return vec![range.midpoint(); scores.len()];
    }

    let span = range.max_diameter - range.min_diameter;
    scores
        .iter()
        .map(|&s| range.min_diameter + (s - lo) / (hi - lo) * span)
        .collect()
}

/// Percentage share of the batch total per item. A zero/negative total
/// (possible with an all-zero batch) splits the shares evenly rather
/// than dividing by zero.
pub fn shares(scores: &[f32]) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }
    let total: f32 = scores.iter().sum();
    if total <= f32::EPSILON {
        return vec![100.0 / scores.len() as f32; scores.len()];
    }
    scores.iter().map(|&s| s / total * 100.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolation_is_linear_over_the_batch_range() {
        let sizes = diameters(&[10.0, 50.0, 90.0], SizeRange::default());
        assert_eq!(sizes, vec![100.0, 150.0, 200.0]);
    }

    #[test]
    fn equal_scores_collapse_to_the_midpoint() {
        let sizes = diameters(&[50.0, 50.0, 50.0], SizeRange::default());
        assert_eq!(sizes, vec![150.0, 150.0, 150.0]);
    }

    #[test]
    fn single_item_batch_gets_the_midpoint() {
        let sizes = diameters(&[73.0], SizeRange::default());
        assert_eq!(sizes, vec![150.0]);
    }

    #[test]
    fn ranking_sorts_descending() {
        let mut items = vec![
            ScoredItem { identity: "a".into(), score: 12.0 },
            ScoredItem { identity: "b".into(), score: 80.5 },
            ScoredItem { identity: "c".into(), score: 44.0 },
        ];
        rank_descending(&mut items);
        let order: Vec<&str> = items.iter().map(|i| i.identity.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn shares_sum_to_one_hundred() {
        let s = shares(&[90.0, 50.0, 10.0]);
        assert!((s.iter().sum::<f32>() - 100.0).abs() < 1e-4);
        assert!((s[0] - 60.0).abs() < 1e-4);
    }

    #[test]
    fn zero_total_splits_evenly() {
        let s = shares(&[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(s, vec![25.0; 4]);
    }
}
