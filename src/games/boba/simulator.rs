//! Balance simulator for Boba Focus.
//! Run with: cargo test simulate_workday -- --nocapture
//!
//! Plays a scripted Pomodoro day through the public game API: no clicking
//! while the focus timer runs, steady brewing during breaks, and the
//! cheapest affordable upgrade bought whenever one is in reach.

#[cfg(test)]
mod tests {
    use crate::games::boba::catalog::CATALOG;
    use crate::games::boba::challenges::CHALLENGES;
    use crate::games::boba::economy::{self, format_number};
    use crate::games::boba::save::{self, Decoded, MemoryStore};
    use crate::games::boba::state::{ProgressSnapshot, UpgradeId};
    use crate::games::boba::timer::TimerMode;
    use crate::games::boba::BobaGame;

    /// Frame length. Below the passive loop's catch-up clamp so no income is dropped.
    const FRAME_MS: f64 = 250.0;
    const CLICKS_PER_SECOND: u32 = 5;

    struct Report {
        purchases: u32,
    }

    /// Index of the cheapest entry the player can afford right now.
    fn cheapest_affordable(s: &ProgressSnapshot) -> Option<usize> {
        CATALOG
            .iter()
            .enumerate()
            .filter(|(idx, _)| economy::can_afford(s, *idx))
            .min_by_key(|(_, e)| e.next_cost(s))
            .map(|(idx, _)| idx)
    }

    fn report(g: &BobaGame, seconds: u32, r: &Report) {
        let s = &g.state;
        eprintln!("┌─── {}h{:02}m ─────────────────────────", seconds / 3600, seconds / 60 % 60);
        eprintln!(
            "│ Boba: {}  Earned: {}  Goal: {}",
            format_number(s.currency),
            format_number(s.total_earned),
            format_number(s.current_goal)
        );
        eprintln!(
            "│ Click: {}/click  Passive: {}/s  Clicks: {}  Sessions: {}",
            format_number(s.per_click_rate),
            format_number(s.passive_rate),
            s.total_clicks,
            s.completed_sessions
        );
        let levels: Vec<String> = UpgradeId::all()
            .iter()
            .map(|id| format!("{}:{}", id.key(), s.level(*id)))
            .collect();
        eprintln!("│ Levels: {}  Purchases: {}", levels.join("  "), r.purchases);
        eprintln!("│ Challenges: {:?}", s.completed_challenge_ids);
        eprintln!("└────────────────────────────────────");
    }

    /// Asserts the invariants that must hold after every frame.
    fn check_frame(prev: &ProgressSnapshot, s: &ProgressSnapshot) {
        assert!(s.currency >= 0.0, "balance went negative: {}", s.currency);
        assert!(s.currency <= s.total_earned + 1e-6);
        assert!(s.total_earned >= prev.total_earned);
        assert!(s.total_clicks >= prev.total_clicks);
        assert!(s.completed_sessions >= prev.completed_sessions);
        assert!(s.current_goal > s.total_earned, "goal left behind");
        assert!(prev
            .completed_challenge_ids
            .is_subset(&s.completed_challenge_ids));
        for id in UpgradeId::all() {
            assert!(s.level(*id) >= prev.level(*id));
        }
    }

    fn simulate(total_seconds: u32) -> BobaGame {
        let mut g = BobaGame::new(Box::new(MemoryStore::new()), None, 0.0);
        let mut r = Report { purchases: 0 };
        let frames_per_second = (1000.0 / FRAME_MS) as u32;
        let report_every = 3600;

        eprintln!("\n========================================");
        eprintln!("  Boba Focus balance simulator");
        eprintln!("  Play time: {} min", total_seconds / 60);
        eprintln!("  Click rate during breaks: {}/s", CLICKS_PER_SECOND);
        eprintln!("========================================\n");

        let mut prev = g.state.clone();
        for second in 0..total_seconds {
            for frame in 0..frames_per_second {
                let now = (second * frames_per_second + frame) as f64 * FRAME_MS;

                if !g.timer.is_running() {
                    g.toggle_timer(now);
                }

                if g.timer.mode == TimerMode::Break && frame == 0 {
                    for _ in 0..CLICKS_PER_SECOND {
                        g.brew(now);
                    }
                    while let Some(idx) = cheapest_affordable(&g.state) {
                        assert!(g.buy(idx, now));
                        r.purchases += 1;
                    }
                }

                g.update(now);
                g.drain_events();
                check_frame(&prev, &g.state);
                prev = g.state.clone();
            }

            if (second + 1) % report_every == 0 {
                report(&g, second + 1, &r);
            }
        }
        g
    }

    #[test]
    fn simulate_workday() {
        // Four hours: eight focus sessions of 25 minutes with 5 minute breaks.
        let g = simulate(4 * 3600);
        let s = &g.state;

        assert_eq!(s.completed_sessions, 8);
        for id in ["rookie", "focused", "clicker", "master"] {
            assert!(s.is_challenge_completed(id), "{} not completed", id);
        }
        assert!(s.level(UpgradeId::Tapioca) > 1);
        assert!(s.level(UpgradeId::Staff) > 0);
        assert!(s.passive_rate > 0.0);

        // Derived rates always agree with a fresh recompute.
        let mut recomputed = s.clone();
        economy::recompute_rates(&mut recomputed);
        assert_eq!(recomputed.per_click_rate, s.per_click_rate);
        assert_eq!(recomputed.passive_rate, s.passive_rate);
    }

    #[test]
    fn simulated_progress_survives_save_cycle() {
        let g = simulate(3600);
        let json = save::encode(&g.state).unwrap();
        match save::decode(&json) {
            Decoded::Snapshot { snapshot, .. } => assert_eq!(snapshot, g.state),
            Decoded::Discard(reason) => panic!("discarded: {}", reason),
        }
    }

    #[test]
    fn every_challenge_is_reachable() {
        // A long idle session on top of the workday must clear the passive goal too.
        let mut g = simulate(8 * 3600);
        let start = 8.0 * 3600.0 * 1000.0;
        while g.state.passive_rate < 10.0 {
            let Some(idx) = CATALOG
                .iter()
                .position(|e| e.id == UpgradeId::Staff)
            else {
                break;
            };
            let cost = CATALOG[idx].next_cost(&g.state) as f64;
            if g.state.currency < cost {
                let shortfall = cost - g.state.currency;
                economy::grant_reward(&mut g.state, shortfall);
            }
            assert!(g.buy(idx, start));
        }
        g.update(start + FRAME_MS);
        assert_eq!(g.state.completed_challenge_ids.len(), CHALLENGES.len());
    }
}
