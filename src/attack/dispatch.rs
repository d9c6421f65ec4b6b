//! Dispatchers: where the engine's choices come from.
//!
//! The firing driver never decides anything on its own. Whenever a module
//! or a target value must be picked, it hands the filtered options to a
//! [`Dispatcher`] and waits for the answer:
//! - `ScriptedDispatcher`: replays a fixed list of answers
//! - `RandomDispatcher`: seeded auto-pilot
//! - any `FnMut(&ChoiceRequest) -> Choice` function

use std::collections::VecDeque;

use crate::core::{GameRng, ModuleId, PlayerId};
use crate::targets::{TargetRef, TargetValue};

// =============================================================================
// Requests and answers
// =============================================================================

/// A decision the firing needs from outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoiceRequest<'a> {
    /// Which module to fire next.
    Module { author: PlayerId, options: &'a [ModuleId] },
    /// Which value fills a target slot.
    Target {
        author: PlayerId,
        target: TargetRef,
        options: &'a [TargetValue],
    },
}

impl ChoiceRequest<'_> {
    #[must_use]
    pub fn author(&self) -> PlayerId {
        match self {
            ChoiceRequest::Module { author, .. } | ChoiceRequest::Target { author, .. } => *author,
        }
    }

    /// Number of options offered.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ChoiceRequest::Module { options, .. } => options.len(),
            ChoiceRequest::Target { options, .. } => options.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A dispatcher's answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    /// Index into the offered options.
    Pick(usize),
    /// Stop: at module choice this ends the firing, at target choice it
    /// abandons the module.
    Decline,
    /// The player is gone. The firing unwinds without applying the module
    /// in flight.
    Disconnected,
}

/// Source of choices for a firing.
pub trait Dispatcher {
    fn choose(&mut self, request: &ChoiceRequest<'_>) -> Choice;
}

impl<F> Dispatcher for F
where
    F: FnMut(&ChoiceRequest<'_>) -> Choice,
{
    fn choose(&mut self, request: &ChoiceRequest<'_>) -> Choice {
        self(request)
    }
}

// =============================================================================
// Implementations
// =============================================================================

/// Answers from a prepared list, in order. Declines once the list runs out.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDispatcher {
    script: VecDeque<Choice>,
}

impl ScriptedDispatcher {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Choice>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Shorthand for a script of picks only.
    #[must_use]
    pub fn picks(indices: impl IntoIterator<Item = usize>) -> Self {
        Self::new(indices.into_iter().map(Choice::Pick))
    }

    /// Answers not consumed yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Dispatcher for ScriptedDispatcher {
    fn choose(&mut self, _request: &ChoiceRequest<'_>) -> Choice {
        self.script.pop_front().unwrap_or(Choice::Decline)
    }
}

/// Auto-pilot: picks uniformly at random.
///
/// Module choices are declined with `stop_probability`; target choices
/// never are.
#[derive(Clone, Debug)]
pub struct RandomDispatcher {
    rng: GameRng,
    stop_probability: f64,
}

impl RandomDispatcher {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
            stop_probability: 0.0,
        }
    }

    /// Set the chance of ending the firing at each module choice.
    #[must_use]
    pub fn with_stop_probability(mut self, probability: f64) -> Self {
        self.stop_probability = probability.clamp(0.0, 1.0);
        self
    }
}

impl Dispatcher for RandomDispatcher {
    fn choose(&mut self, request: &ChoiceRequest<'_>) -> Choice {
        if request.is_empty() {
            return Choice::Decline;
        }
        if matches!(request, ChoiceRequest::Module { .. }) && self.rng.gen_bool(self.stop_probability) {
            return Choice::Decline;
        }
        Choice::Pick(self.rng.gen_range_usize(0..request.len()))
    }
}
