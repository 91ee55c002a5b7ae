use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Custom,
    Xsb,
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Format::Custom => write!(f, "custom"),
            Format::Xsb => write!(f, "xsb"),
        }
    }
}

impl FromStr for Format {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "custom" => Ok(Format::Custom),
            "xsb" => Ok(Format::Xsb),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    IdaStar,
    Annealing,
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Algorithm::IdaStar => write!(f, "ida-star"),
            Algorithm::Annealing => write!(f, "annealing"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ida-star" => Ok(Algorithm::IdaStar),
            "annealing" => Ok(Algorithm::Annealing),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeuristicKind {
    /// Sum of Manhattan distances to the nearest goal.
    ManhattanSum,
    /// Optimal assignment on real walking distances (walls block, boxes don't).
    Hungarian,
    /// Optimal assignment on Manhattan distances of unsolved boxes + half the player distance.
    ExactMatching,
    /// Squared assignment distances, player distance and a penalty for pulls.
    Annealing,
    /// Greedy goal assignment with a simple corner check.
    ManhattanGreedySafe,
}

pub const HEURISTICS: [HeuristicKind; 5] = [
    HeuristicKind::ManhattanSum,
    HeuristicKind::Hungarian,
    HeuristicKind::ExactMatching,
    HeuristicKind::Annealing,
    HeuristicKind::ManhattanGreedySafe,
];

impl Display for HeuristicKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            HeuristicKind::ManhattanSum => write!(f, "manhattan-sum"),
            HeuristicKind::Hungarian => write!(f, "hungarian"),
            HeuristicKind::ExactMatching => write!(f, "exact-matching"),
            HeuristicKind::Annealing => write!(f, "annealing"),
            HeuristicKind::ManhattanGreedySafe => write!(f, "manhattan"),
        }
    }
}

impl FromStr for HeuristicKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HEURISTICS
            .iter()
            .cloned()
            .find(|h| h.to_string() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Deadlock {
    Corner,
    Tunnel,
    Edge,
    Square,
    DeadSquares,
}

/// Canonical order in which the oracle checks predicates.
pub const DEADLOCKS: [Deadlock; 5] = [
    Deadlock::Corner,
    Deadlock::Tunnel,
    Deadlock::Edge,
    Deadlock::Square,
    Deadlock::DeadSquares,
];

impl Display for Deadlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Deadlock::Corner => write!(f, "corner"),
            Deadlock::Tunnel => write!(f, "tunnel"),
            Deadlock::Edge => write!(f, "edge"),
            Deadlock::Square => write!(f, "2x2"),
            Deadlock::DeadSquares => write!(f, "dead-squares"),
        }
    }
}

impl FromStr for Deadlock {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DEADLOCKS
            .iter()
            .cloned()
            .find(|d| d.to_string() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// Ordered set of enabled deadlock predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Deadlocks(Vec<Deadlock>);

impl Deadlocks {
    pub fn none() -> Self {
        Deadlocks(Vec::new())
    }

    pub fn all() -> Self {
        Deadlocks(DEADLOCKS.to_vec())
    }

    pub fn new<I: IntoIterator<Item = Deadlock>>(deadlocks: I) -> Self {
        let mut v: Vec<_> = deadlocks.into_iter().collect();
        v.sort();
        v.dedup();
        Deadlocks(v)
    }

    pub fn contains(&self, deadlock: Deadlock) -> bool {
        self.0.contains(&deadlock)
    }

    pub fn iter(&self) -> impl Iterator<Item = Deadlock> + '_ {
        self.0.iter().cloned()
    }
}

impl Display for Deadlocks {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<_> = self.0.iter().map(Deadlock::to_string).collect();
        write!(f, "{}", names.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName(pub String);

impl Display for UnknownName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown name: {}", self.0)
    }
}

impl std::error::Error for UnknownName {}

#[derive(Debug, Clone, PartialEq)]
pub struct IdaConfig {
    pub heuristic: HeuristicKind,
    pub deadlocks: Deadlocks,
    pub max_depth: u32,
}

impl Default for IdaConfig {
    fn default() -> Self {
        IdaConfig {
            heuristic: HeuristicKind::ExactMatching,
            deadlocks: Deadlocks::none(),
            max_depth: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingConfig {
    pub heuristic: HeuristicKind,
    pub deadlocks: Deadlocks,
    pub initial_temp: f64,
    /// Fraction of the temperature lost every round.
    pub decay_rate: f64,
    pub min_temp: f64,
    /// Scales the temperature in the acceptance probability.
    pub scale: f64,
    /// `None` picks a random seed (it's logged so the run can be repeated).
    pub seed: Option<u64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        AnnealingConfig {
            heuristic: HeuristicKind::ExactMatching,
            deadlocks: Deadlocks::none(),
            initial_temp: 1000.0,
            decay_rate: 0.000_003,
            min_temp: 1.0,
            scale: 0.01,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub algorithm: Algorithm,
    pub pulls_allowed: bool,
    pub ida: IdaConfig,
    pub annealing: AnnealingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            algorithm: Algorithm::IdaStar,
            pulls_allowed: true,
            ida: IdaConfig::default(),
            annealing: AnnealingConfig::default(),
        }
    }
}

impl Config {
    /// Sets the heuristic and deadlocks of the selected algorithm.
    pub fn with_search(mut self, heuristic: HeuristicKind, deadlocks: Deadlocks) -> Self {
        match self.algorithm {
            Algorithm::IdaStar => {
                self.ida.heuristic = heuristic;
                self.ida.deadlocks = deadlocks;
            }
            Algorithm::Annealing => {
                self.annealing.heuristic = heuristic;
                self.annealing.deadlocks = deadlocks;
            }
        }
        self
    }

    pub fn heuristic(&self) -> HeuristicKind {
        match self.algorithm {
            Algorithm::IdaStar => self.ida.heuristic,
            Algorithm::Annealing => self.annealing.heuristic,
        }
    }

    pub fn deadlocks(&self) -> &Deadlocks {
        match self.algorithm {
            Algorithm::IdaStar => &self.ida.deadlocks,
            Algorithm::Annealing => &self.annealing.deadlocks,
        }
    }

    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        let sa = &self.annealing;
        match self.algorithm {
            Algorithm::IdaStar => {
                if self.ida.max_depth == 0 {
                    return Err("max depth must be at least 1".to_string());
                }
            }
            Algorithm::Annealing => {
                if !(sa.decay_rate > 0.0 && sa.decay_rate < 1.0) {
                    return Err(format!("decay rate {} is not in (0, 1)", sa.decay_rate));
                }
                if !(sa.min_temp > 0.0) || !(sa.initial_temp > 0.0) || !sa.initial_temp.is_finite()
                {
                    return Err(format!(
                        "temperatures must be finite and positive (initial {}, min {})",
                        sa.initial_temp, sa.min_temp
                    ));
                }
                if !(sa.initial_temp > sa.min_temp) {
                    return Err(format!(
                        "initial temperature {} must be above min temperature {}",
                        sa.initial_temp, sa.min_temp
                    ));
                }
                if !(sa.scale > 0.0) {
                    return Err(format!("scale {} must be positive", sa.scale));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for &h in &HEURISTICS {
            assert_eq!(h.to_string().parse::<HeuristicKind>().unwrap(), h);
        }
        for &d in &DEADLOCKS {
            assert_eq!(d.to_string().parse::<Deadlock>().unwrap(), d);
        }
        assert_eq!("annealing".parse::<Algorithm>().unwrap(), Algorithm::Annealing);
        assert_eq!(Format::Custom.to_string().parse::<Format>().unwrap(), Format::Custom);
        assert_eq!(
            "dijkstra".parse::<Algorithm>().unwrap_err(),
            UnknownName("dijkstra".to_string())
        );
    }

    #[test]
    fn deadlocks_are_ordered_and_unique() {
        let deadlocks = Deadlocks::new(vec![
            Deadlock::Square,
            Deadlock::Corner,
            Deadlock::Square,
            Deadlock::Edge,
        ]);
        assert_eq!(deadlocks.to_string(), "corner,edge,2x2");
        assert!(deadlocks.contains(Deadlock::Edge));
        assert!(!deadlocks.contains(Deadlock::Tunnel));
        assert_eq!(Deadlocks::none().to_string(), "none");
    }

    #[test]
    fn validation() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.algorithm = Algorithm::Annealing;
        assert!(config.validate().is_ok());
        config.annealing.decay_rate = 1.0;
        assert!(config.validate().is_err());
        config.annealing.decay_rate = 0.01;
        config.annealing.min_temp = 0.0;
        assert!(config.validate().is_err());

        config.annealing.min_temp = 1.0;
        config.annealing.initial_temp = -5.0;
        assert!(config.validate().is_err());
        config.annealing.initial_temp = 0.0;
        assert!(config.validate().is_err());
        // no room to cool down
        config.annealing.initial_temp = 1.0;
        assert!(config.validate().is_err());
        config.annealing.initial_temp = 0.5;
        assert!(config.validate().is_err());
        config.annealing.initial_temp = 2.0;
        assert!(config.validate().is_ok());

        let mut config = Config::default();
        config.ida.max_depth = 0;
        assert!(config.validate().is_err());
    }
}
