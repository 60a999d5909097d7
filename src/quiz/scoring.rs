use serde::Serialize;

/// Points for a correct answer before the combo bonus.
pub const BASE_POINTS: u32 = 10;

/// Multiplier gained per consecutive correct answer.
pub const COMBO_STEP: f64 = 0.1;

/// Run of consecutive correct answers within one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComboState {
    count: u32,
    best: u32,
}

impl ComboState {
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Longest run seen this session.
    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn multiplier(&self) -> f64 {
        1.0 + COMBO_STEP * self.count as f64
    }

    /// Extend the run and return the points the answer is worth.
    pub fn hit(&mut self) -> u32 {
        self.count += 1;
        self.best = self.best.max(self.count);
        points_for_combo(self.count)
    }

    pub fn miss(&mut self) {
        self.count = 0;
    }
}

/// `round(10 * (1 + 0.1 * combo))`, with `combo` counted after the hit.
pub fn points_for_combo(combo: u32) -> u32 {
    (BASE_POINTS as f64 * (1.0 + COMBO_STEP * combo as f64)).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_grow_linearly_with_combo() {
        assert_eq!(points_for_combo(1), 11);
        assert_eq!(points_for_combo(3), 13);
        assert_eq!(points_for_combo(10), 20);
    }

    #[test]
    fn test_miss_resets_but_keeps_best() {
        let mut combo = ComboState::default();
        assert_eq!(combo.hit(), 11);
        assert_eq!(combo.hit(), 12);
        combo.miss();
        assert_eq!(combo.count(), 0);
        assert_eq!(combo.best(), 2);
        assert_eq!(combo.hit(), 11);
        assert!((combo.multiplier() - 1.1).abs() < f64::EPSILON);
    }
}
