use std::fmt::{self, Debug, Display, Formatter};

use separator::Separatable;

/// Counters collected by IDA* over all its iterations.
#[derive(Clone, PartialEq)]
pub struct Stats {
    expanded_states: Vec<u64>,
    pruned_states: Vec<u64>,
    iterations: u32,
    threshold: f64,
    /// Largest `g + h - threshold` among expanded states, never positive.
    max_overshoot: f64,
}

impl Stats {
    pub(crate) fn new() -> Self {
        Stats {
            expanded_states: vec![],
            pruned_states: vec![],
            iterations: 0,
            threshold: 0.0,
            max_overshoot: f64::NEG_INFINITY,
        }
    }

    pub fn total_expanded(&self) -> u64 {
        self.expanded_states.iter().sum::<u64>()
    }

    pub fn total_pruned(&self) -> u64 {
        self.pruned_states.iter().sum::<u64>()
    }

    pub fn expanded_by_depth(&self) -> &[u64] {
        &self.expanded_states
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// The bound of the last iteration.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn max_overshoot(&self) -> f64 {
        self.max_overshoot
    }

    pub(crate) fn start_iteration(&mut self, threshold: f64) {
        self.iterations += 1;
        self.threshold = threshold;
    }

    pub(crate) fn add_expanded(&mut self, depth: u32, f: f64) {
        Self::add(&mut self.expanded_states, depth);
        let overshoot = f - self.threshold;
        if overshoot > self.max_overshoot {
            self.max_overshoot = overshoot;
        }
    }

    pub(crate) fn add_pruned(&mut self, depth: u32) {
        Self::add(&mut self.pruned_states, depth);
    }

    fn add(counts: &mut Vec<u64>, depth: u32) {
        // while because a depth might only ever be pruned, not expanded
        while depth as usize >= counts.len() {
            counts.push(0);
        }
        counts[depth as usize] += 1;
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Iterations: {}", self.iterations)?;
        writeln!(f, "Final threshold: {}", self.threshold)?;
        writeln!(f, "States expanded total: {}", self.total_expanded().separated_string())?;
        writeln!(f, "States pruned total: {}", self.total_pruned().separated_string())?;
        writeln!(f)?;

        writeln!(f, "Depth / expanded states:")?;
        writeln!(f, "|                   Depth / pruned states:")?;
        let depths = self.expanded_states.len().max(self.pruned_states.len());
        for i in 0..depths {
            let depth = format!("{}: ", i);
            let expanded = self.expanded_states.get(i).cloned().unwrap_or(0);
            let pruned = self.pruned_states.get(i).cloned().unwrap_or(0);
            writeln!(
                f,
                "{0:<5}{1:<15}{0:<5}{2:<15}",
                depth,
                expanded.separated_string(),
                pruned.separated_string()
            )?;
        }
        Ok(())
    }
}

impl Debug for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "expanded by depth: {:?}", self.expanded_states)?;
        writeln!(f, "pruned by depth: {:?}", self.pruned_states)?;
        writeln!(f, "iterations: {}", self.iterations)?;
        writeln!(f, "threshold: {}", self.threshold)?;
        writeln!(f, "max overshoot: {}", self.max_overshoot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting() {
        let mut stats = Stats::new();
        stats.start_iteration(3.0);
        stats.add_expanded(0, 3.0);
        stats.add_pruned(2);
        stats.add_expanded(1, 2.5);
        stats.start_iteration(5.0);
        stats.add_expanded(0, 3.0);

        assert_eq!(stats.iterations(), 2);
        assert_eq!(stats.threshold(), 5.0);
        assert_eq!(stats.expanded_by_depth(), &[2, 1]);
        assert_eq!(stats.total_expanded(), 3);
        assert_eq!(stats.total_pruned(), 1);
        assert_eq!(stats.max_overshoot(), 0.0);

        let out = stats.to_string();
        assert!(out.contains("States expanded total: 3"));
        assert!(out.contains("2: "));
    }
}
