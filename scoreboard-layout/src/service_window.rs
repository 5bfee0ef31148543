use scoreboard_common::config::{DEFAULT_SERVICES_FROM, DEFAULT_SERVICES_TO, ViewConfig};

/// A half-open percentile range `[from, to)` over the ranks of the active services.
///
/// Rank `i` of `n` services sits at percentile `i * 100 / n`. The comparison is done by cross
/// multiplying in integers, which gives exactly the same answer as the real-valued division
/// without any rounding at the boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceWindow {
    pub from: i32,
    pub to: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedServices<T> {
    pub visible: Vec<T>,
    pub count: usize,
}

impl Default for ServiceWindow {
    fn default() -> Self {
        Self {
            from: DEFAULT_SERVICES_FROM,
            to: DEFAULT_SERVICES_TO,
        }
    }
}

impl From<&ViewConfig> for ServiceWindow {
    fn from(config: &ViewConfig) -> Self {
        Self {
            from: config.services_from,
            to: config.services_to,
        }
    }
}

impl ServiceWindow {
    pub fn new(from: i32, to: i32) -> Self {
        Self { from, to }
    }

    /// Whether the service at `rank` (0 based) of `total` falls inside the window
    pub fn contains_rank(&self, rank: usize, total: usize) -> bool {
        if total == 0 {
            return false;
        }
        let scaled_rank = rank as i64 * 100;
        let total = total as i64;
        self.from as i64 * total <= scaled_rank && scaled_rank < self.to as i64 * total
    }

    /// Number of services out of `total` that fall inside the window
    pub fn count(&self, total: usize) -> usize {
        (0..total)
            .filter(|&rank| self.contains_rank(rank, total))
            .count()
    }

    /// Picks the services inside the window, keeping their order
    pub fn select<T: Clone>(&self, active: &[T]) -> SelectedServices<T> {
        let total = active.len();
        let visible: Vec<T> = active
            .iter()
            .enumerate()
            .filter(|(rank, _)| self.contains_rank(*rank, total))
            .map(|(_, service)| service.clone())
            .collect();
        SelectedServices {
            count: visible.len(),
            visible,
        }
    }
}
