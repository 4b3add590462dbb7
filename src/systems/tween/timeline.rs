//! Declarative sequencing of timed actions.
//!
//! `Timeline` lays actions out on a time axis with append / join / interval
//! semantics; `TimelinePlayer` replays the laid-out steps against elapsed
//! frame time.
use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineStep<A> {
    pub at: f32,
    pub action: A,
}

#[derive(Clone, Debug)]
pub struct Timeline<A> {
    steps: Vec<TimelineStep<A>>,
    end: f32,
    last_start: f32,
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            end: 0.0,
            last_start: 0.0,
        }
    }
}

impl<A> Timeline<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `action` at the current end and extends the end by `duration`.
    pub fn append(&mut self, action: A, duration: f32) -> &mut Self {
        let at = self.end;
        self.push(at, action);
        self.last_start = at;
        self.end = at + duration.max(0.0);
        self
    }

    /// Starts `action` together with the most recently placed item.
    pub fn join(&mut self, action: A, duration: f32) -> &mut Self {
        let at = self.last_start;
        self.push(at, action);
        self.end = self.end.max(at + duration.max(0.0));
        self
    }

    pub fn append_interval(&mut self, duration: f32) -> &mut Self {
        self.last_start = self.end;
        self.end += duration.max(0.0);
        self
    }

    /// Zero-length action at the current end.
    pub fn append_callback(&mut self, action: A) -> &mut Self {
        let at = self.end;
        self.push(at, action);
        self.last_start = at;
        self
    }

    pub fn duration(&self) -> f32 {
        self.end
    }

    pub fn steps(&self) -> &[TimelineStep<A>] {
        &self.steps
    }

    fn push(&mut self, at: f32, action: A) {
        // Stable insert keeps same-time actions in declaration order.
        let index = self.steps.partition_point(|step| step.at <= at);
        self.steps.insert(index, TimelineStep { at, action });
    }
}

#[derive(Clone, Debug)]
pub struct TimelinePlayer<A> {
    pending: VecDeque<TimelineStep<A>>,
    elapsed: f32,
    duration: f32,
}

impl<A> TimelinePlayer<A> {
    pub fn new(timeline: Timeline<A>) -> Self {
        Self {
            duration: timeline.end,
            pending: timeline.steps.into(),
            elapsed: 0.0,
        }
    }

    /// Advances by `delta` seconds and returns every action now due, in order.
    pub fn advance(&mut self, delta: f32) -> Vec<A> {
        self.elapsed += delta.max(0.0);
        let mut due = Vec::new();
        while self
            .pending
            .front()
            .is_some_and(|step| step.at <= self.elapsed)
        {
            if let Some(step) = self.pending.pop_front() {
                due.push(step.action);
            }
        }
        due
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty() && self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts(timeline: &Timeline<&'static str>) -> Vec<(&'static str, f32)> {
        timeline
            .steps()
            .iter()
            .map(|step| (step.action, step.at))
            .collect()
    }

    #[test]
    fn append_places_items_back_to_back() {
        let mut timeline = Timeline::new();
        timeline.append("fade", 0.3).append("title", 0.6);

        assert_eq!(starts(&timeline), vec![("fade", 0.0), ("title", 0.3)]);
        assert!((timeline.duration() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn join_starts_with_the_previous_callback() {
        let mut timeline = Timeline::new();
        timeline
            .append("title", 1.0)
            .append_interval(0.5)
            .append_callback("burst")
            .join("stars", 0.25);

        assert_eq!(
            starts(&timeline),
            vec![("title", 0.0), ("burst", 1.5), ("stars", 1.5)]
        );
        assert!((timeline.duration() - 1.75).abs() < 1e-6);
    }

    #[test]
    fn intervals_only_move_the_end() {
        let mut timeline: Timeline<&'static str> = Timeline::new();
        timeline.append_interval(0.2).append_interval(0.3);
        assert!(timeline.steps().is_empty());
        assert!((timeline.duration() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn player_releases_actions_as_time_passes() {
        let mut timeline = Timeline::new();
        timeline
            .append("a", 0.5)
            .append_callback("b")
            .append_interval(0.5)
            .append_callback("c");
        let mut player = TimelinePlayer::new(timeline);

        assert_eq!(player.advance(0.0), vec!["a"]);
        assert!(player.advance(0.25).is_empty());
        assert_eq!(player.advance(0.25), vec!["b"]);
        assert!(!player.is_finished());
        assert_eq!(player.advance(2.0), vec!["c"]);
        assert!(player.is_finished());
    }
}
