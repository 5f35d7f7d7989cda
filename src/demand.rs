//! Demand Counter
//!
//! Tracks, for every `(user, application)` pair, how many desktops or laptops
//! are still waiting for a partner device. One license covers a desktop and a
//! laptop of the same user, so every device either consumes an unmatched
//! device of the opposite type or opens a new demand that needs its own copy.
//!
//! ## Algorithm
//!
//! Each [`Surplus`] keeps at most one nonzero side:
//!
//! - a desktop arriving while laptops are waiting cancels one of them;
//! - otherwise it becomes a waiting desktop and the total grows by one;
//! - laptops are handled symmetrically.
//!
//! After `k` laptops and `m` desktops for a key the surplus is `|k - m|` on
//! the larger side and that key has contributed `max(k, m)` to the total,
//! whatever order the devices arrived in. This is what lets the pipeline absorb
//! records from several workers without sorting them first.

use crate::models::{DemandKey, DeviceType};
use std::collections::HashMap;

/// Unmatched devices for one demand key. At most one field is nonzero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Surplus {
    pub laptop: u64,
    pub desktop: u64,
}

/// What a single absorb did to the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demand {
    /// A new unmatched device; one more copy is required.
    Opened,
    /// Paired with a waiting device of the other type.
    Matched,
    /// Not a desktop or laptop.
    Ignored,
}

#[derive(Debug, Default)]
pub struct DemandCounter {
    surplus: HashMap<DemandKey, Surplus>,
    total: u64,
}

impl DemandCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, user_id: &str, app_id: &str, device_type: DeviceType) -> Demand {
        if !device_type.is_countable() {
            return Demand::Ignored;
        }

        let key = DemandKey {
            user_id: user_id.to_string(),
            app_id: app_id.to_string(),
        };
        let surplus = self.surplus.entry(key).or_default();

        let (waiting_other, waiting_same) = match device_type {
            DeviceType::Desktop => (&mut surplus.laptop, &mut surplus.desktop),
            DeviceType::Laptop => (&mut surplus.desktop, &mut surplus.laptop),
            DeviceType::Other => return Demand::Ignored,
        };

        if *waiting_other > 0 {
            *waiting_other -= 1;
            Demand::Matched
        } else {
            *waiting_same += 1;
            self.total += 1;
            Demand::Opened
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn surplus(&self, user_id: &str, app_id: &str) -> Option<Surplus> {
        self.surplus
            .get(&DemandKey {
                user_id: user_id.to_string(),
                app_id: app_id.to_string(),
            })
            .copied()
    }

    pub fn demand_keys(&self) -> usize {
        self.surplus.len()
    }
}
