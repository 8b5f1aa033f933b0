use super::model::SyncedLyricLine;

/// Index of the line with the greatest start time not after
/// `position_ms`. Ties go to the later line. `None` before the first line.
pub fn active_line(lines: &[SyncedLyricLine], position_ms: i64) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    for (idx, line) in lines.iter().enumerate() {
        let start = i64::try_from(line.start_time_ms).unwrap_or(i64::MAX);
        if start > position_ms {
            continue;
        }
        if best.is_none_or(|(_, best_start)| start >= best_start) {
            best = Some((idx, start));
        }
    }
    best.map(|(idx, _)| idx)
}

/// First visible row that centres a `height`-row line starting at row
/// `top` in a `container`-row viewport.
pub fn scroll_target(top: usize, height: usize, container: usize) -> usize {
    let slack = container.saturating_sub(height) / 2;
    top.saturating_sub(slack)
}

/// Suppresses repeated identical scroll targets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AutoScroll {
    last_applied: Option<usize>,
}

impl AutoScroll {
    /// `Some(target)` when it differs from the last applied target.
    pub fn update(&mut self, target: usize) -> Option<usize> {
        if self.last_applied == Some(target) {
            return None;
        }
        self.last_applied = Some(target);
        Some(target)
    }

    pub fn current(&self) -> usize {
        self.last_applied.unwrap_or(0)
    }

    pub fn reset(&mut self) {
        self.last_applied = None;
    }
}
