//! One-time challenges and their evaluator.

use super::economy::grant_reward;
use super::state::ProgressSnapshot;

/// Counter a challenge watches. Every metric is monotonic non-decreasing
/// under normal play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    /// Lifetime boba earned.
    Boba,
    Sessions,
    Clicks,
    /// Passive boba per second.
    Bps,
}

impl Metric {
    pub fn read(self, s: &ProgressSnapshot) -> f64 {
        match self {
            Metric::Boba => s.total_earned,
            Metric::Sessions => s.completed_sessions as f64,
            Metric::Clicks => s.total_clicks as f64,
            Metric::Bps => s.passive_rate,
        }
    }
}

#[derive(Debug)]
pub struct Challenge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub metric: Metric,
    pub target: f64,
    pub reward: f64,
}

impl Challenge {
    pub fn is_met(&self, s: &ProgressSnapshot) -> bool {
        self.metric.read(s) >= self.target
    }
}

pub static CHALLENGES: &[Challenge] = &[
    Challenge {
        id: "rookie",
        name: "Rookie Brewer",
        description: "Brew 100 total boba",
        metric: Metric::Boba,
        target: 100.0,
        reward: 50.0,
    },
    Challenge {
        id: "focused",
        name: "Focused Mind",
        description: "Complete 5 focus sessions",
        metric: Metric::Sessions,
        target: 5.0,
        reward: 100.0,
    },
    Challenge {
        id: "clicker",
        name: "Fast Fingers",
        description: "Click 200 times",
        metric: Metric::Clicks,
        target: 200.0,
        reward: 75.0,
    },
    Challenge {
        id: "passive",
        name: "Passive Income",
        description: "Reach 10 boba per second",
        metric: Metric::Bps,
        target: 10.0,
        reward: 250.0,
    },
    Challenge {
        id: "master",
        name: "Boba Master",
        description: "Brew 1000 total boba",
        metric: Metric::Boba,
        target: 1000.0,
        reward: 500.0,
    },
];

/// Grant every newly met challenge once, in list order. A reward granted
/// here counts towards later `Boba` challenges in the same pass.
pub fn evaluate(s: &mut ProgressSnapshot) -> Vec<&'static Challenge> {
    let mut newly = Vec::new();
    for challenge in CHALLENGES {
        if s.is_challenge_completed(challenge.id) || !challenge.is_met(s) {
            continue;
        }
        grant_reward(s, challenge.reward);
        s.completed_challenge_ids.insert(challenge.id.to_string());
        newly.push(challenge);
    }
    newly
}

/// Display status of one challenge.
#[derive(Clone, Debug)]
pub struct ChallengeProgress {
    pub challenge: &'static Challenge,
    pub current: f64,
    /// `current / target` in `[0, 1]`.
    pub fraction: f64,
    pub completed: bool,
}

pub fn progress(s: &ProgressSnapshot) -> Vec<ChallengeProgress> {
    CHALLENGES
        .iter()
        .map(|c| {
            let current = c.metric.read(s);
            let completed = s.is_challenge_completed(c.id);
            let fraction = if completed {
                1.0
            } else {
                (current / c.target).clamp(0.0, 1.0)
            };
            ChallengeProgress {
                challenge: c,
                current,
                fraction,
                completed,
            }
        })
        .collect()
}
