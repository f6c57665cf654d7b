use serde::{Deserialize, Serialize};
use std::fmt;

/// A successful heal observed during this run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealEvent {
    pub original: String,
    pub healed: String,
    pub score: u32,
}

impl HealEvent {
    pub fn new(original: impl Into<String>, healed: impl Into<String>, score: u32) -> Self {
        Self {
            original: original.into(),
            healed: healed.into(),
            score,
        }
    }
}

/// Run-scoped, append-only record of heals, one entry per (original, healed) pair.
///
/// Owned by whoever orchestrates the test run and rendered at teardown via
/// its `Display` impl.
#[derive(Debug, Clone, Default)]
pub struct HealLog {
    events: Vec<HealEvent>,
}

impl HealLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `event` unless its (original, healed) pair is already recorded.
    /// Returns whether it was added.
    pub fn record(&mut self, event: HealEvent) -> bool {
        let seen = self
            .events
            .iter()
            .any(|e| e.original == event.original && e.healed == event.healed);
        if seen {
            return false;
        }

        log::info!("Healed '{}' → '{}' ({} %)", event.original, event.healed, event.score);
        self.events.push(event);
        true
    }

    pub fn events(&self) -> &[HealEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl fmt::Display for HealLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.events.is_empty() {
            return write!(f, "0 selectors healed (cache up-to-date)");
        }

        write!(f, "{} selectors healed this run:", self.events.len())?;
        for event in &self.events {
            write!(
                f,
                "\n   {:<25} → {:<25} ({} %)",
                event.original, event.healed, event.score
            )?;
        }
        Ok(())
    }
}
