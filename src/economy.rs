//! Star-token economy
//!
//! Tokens are earned from kills, token shards and bosses, and spent by the
//! shop/continue screens. The balance outlives a run; only the continue
//! counter is per-run.

use serde::{Deserialize, Serialize};

use crate::tuning::EconomyTuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenEconomy {
    pub tokens: u32,
    /// Lifetime tokens earned (never decreases)
    pub total_earned: u32,
    pub continues_used: u32,
    gain_mult: f32,
    continue_base_cost: u32,
    continue_cost_step: u32,
}

impl Default for TokenEconomy {
    fn default() -> Self {
        Self::new(&EconomyTuning::default())
    }
}

impl TokenEconomy {
    pub fn new(tuning: &EconomyTuning) -> Self {
        Self {
            tokens: 0,
            total_earned: 0,
            continues_used: 0,
            gain_mult: tuning.gain_mult,
            continue_base_cost: tuning.continue_base_cost,
            continue_cost_step: tuning.continue_cost_step,
        }
    }

    /// Credit tokens scaled by the gain multiplier; returns what was actually gained
    pub fn add_tokens(&mut self, amount: u32) -> u32 {
        let gained = (amount as f32 * self.gain_mult).floor().max(0.0) as u32;
        self.tokens = self.tokens.saturating_add(gained);
        self.total_earned = self.total_earned.saturating_add(gained);
        gained
    }

    /// Spend tokens if the balance covers it
    pub fn spend(&mut self, amount: u32) -> bool {
        if self.tokens >= amount {
            self.tokens -= amount;
            true
        } else {
            false
        }
    }

    /// Cost of the next death continue (rises with each use)
    pub fn continue_cost(&self) -> u32 {
        self.continue_base_cost + self.continues_used * self.continue_cost_step
    }

    pub fn use_continue(&mut self) -> bool {
        let cost = self.continue_cost();
        if self.spend(cost) {
            self.continues_used += 1;
            true
        } else {
            false
        }
    }

    /// Reset per-run state; the balance is kept
    pub fn reset_run(&mut self) {
        self.continues_used = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_multiplier_floors() {
        let mut eco = TokenEconomy::new(&EconomyTuning {
            gain_mult: 1.25,
            ..Default::default()
        });
        assert_eq!(eco.add_tokens(1), 1);
        assert_eq!(eco.add_tokens(10), 12);
        assert_eq!(eco.tokens, 13);
        assert_eq!(eco.total_earned, 13);
    }

    #[test]
    fn test_spend_requires_balance() {
        let mut eco = TokenEconomy::default();
        eco.add_tokens(3);
        assert!(!eco.spend(5));
        assert_eq!(eco.tokens, 3);
        assert!(eco.spend(3));
        assert_eq!(eco.tokens, 0);
    }

    #[test]
    fn test_continue_cost_escalates() {
        let mut eco = TokenEconomy::default();
        eco.add_tokens(20);
        assert_eq!(eco.continue_cost(), 5);
        assert!(eco.use_continue());
        assert_eq!(eco.continue_cost(), 8);
        assert!(eco.use_continue());
        assert_eq!(eco.tokens, 7);
        assert!(!eco.use_continue());

        eco.reset_run();
        assert_eq!(eco.continue_cost(), 5);
        assert_eq!(eco.tokens, 7);
    }
}
