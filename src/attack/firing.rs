//! The firing driver: runs a pattern end to end against a dispatcher.

use tracing::{debug, info, warn};

use crate::board::Board;
use crate::core::{EngineError, ModuleId, PlayerId, Result};
use crate::effects::Effect;
use crate::players::Roster;
use crate::targets::{Constraint, ResolvedTargets};

use super::dispatch::{Choice, ChoiceRequest, Dispatcher};
use super::pattern::{AttackPattern, ModuleReport};

/// How a firing ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FiringOutcome {
    /// No fireable module was left on offer.
    Exhausted,
    /// The dispatcher declined to pick another module.
    Declined,
    /// The dispatcher reported the author gone. The module in flight, if
    /// any, was not applied.
    Disconnected,
}

/// Summary of a firing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FiringReport {
    pub author: PlayerId,
    /// Applied modules, in order.
    pub applied: Vec<ModuleReport>,
    /// Modules passed over and never applied: a target could not be filled,
    /// a target they read was never reached, or the dispatcher declined one
    /// of their targets.
    pub skipped: Vec<ModuleId>,
    pub outcome: FiringOutcome,
}

impl FiringReport {
    /// Ids of the applied modules, in order.
    #[must_use]
    pub fn applied_modules(&self) -> Vec<ModuleId> {
        self.applied.iter().map(|r| r.module).collect()
    }
}

/// Fire `pattern` for `author`, taking every choice from `dispatcher`.
///
/// The pattern is prepared first, so any state from an earlier firing is
/// discarded. Modules are offered only while they are unused, affordable
/// and their first target has at least one candidate. Each applied module
/// commits its cost and effects to `roster` atomically.
///
/// Errors are contract violations (unknown author, out-of-range picks,
/// malformed patterns); running out of options is a normal outcome.
pub fn fire(
    pattern: &mut AttackPattern,
    board: &Board,
    roster: &mut Roster,
    author: PlayerId,
    dispatcher: &mut dyn Dispatcher,
) -> Result<FiringReport> {
    roster.position_of(author)?;
    pattern.prepare(author);

    let mut applied = Vec::new();
    let mut skipped = Vec::new();

    let outcome = loop {
        if pattern.is_terminal() {
            break FiringOutcome::Exhausted;
        }

        let mut options = Vec::new();
        for id in pattern.available_modules(roster)? {
            if can_start(pattern, board, roster, id)? {
                options.push(id);
            } else if !skipped.contains(&id) {
                skipped.push(id);
            }
        }
        if options.is_empty() {
            pattern.terminate();
            break FiringOutcome::Exhausted;
        }

        let request = ChoiceRequest::Module {
            author,
            options: &options,
        };
        let module = match dispatcher.choose(&request) {
            Choice::Pick(i) => *options.get(i).ok_or(EngineError::InvalidChoice {
                index: i,
                options: options.len(),
            })?,
            Choice::Decline => {
                pattern.terminate();
                break FiringOutcome::Declined;
            }
            Choice::Disconnected => {
                pattern.terminate();
                break FiringOutcome::Disconnected;
            }
        };
        pattern.select_module(module)?;

        match fill_targets(pattern, board, roster, author, dispatcher)? {
            Fill::Complete => applied.push(pattern.apply_module(board, roster)?),
            Fill::Abandoned => {
                pattern.abandon_module()?;
                if !skipped.contains(&module) {
                    skipped.push(module);
                }
            }
            Fill::Disconnected => {
                pattern.terminate();
                break FiringOutcome::Disconnected;
            }
        }
    };

    skipped.retain(|id| !applied.iter().any(|r: &ModuleReport| r.module == *id));

    match outcome {
        FiringOutcome::Disconnected => warn!(%author, applied = applied.len(), "firing unwound: author disconnected"),
        _ => info!(%author, applied = applied.len(), ?outcome, "firing finished"),
    }

    Ok(FiringReport {
        author,
        applied,
        skipped,
        outcome,
    })
}

enum Fill {
    Complete,
    Abandoned,
    Disconnected,
}

/// Whether `module` could be fired from the current state.
///
/// Every target of another module that the module reads, in constraints or
/// effects, must already be resolved. Of its own slots only the first is
/// probed for candidates: later slots depend on what fills the earlier ones.
fn can_start(pattern: &AttackPattern, board: &Board, roster: &Roster, module: ModuleId) -> Result<bool> {
    let candidate = pattern.module(module)?;
    let outside = candidate
        .targets
        .iter()
        .flat_map(|t| &t.constraints)
        .flat_map(Constraint::coordinates)
        .chain(candidate.effects.iter().flat_map(Effect::coordinates))
        .filter_map(|c| c.as_target())
        .filter(|r| r.module != module);
    for reference in outside {
        match pattern.resolved(reference) {
            Ok(_) => {}
            Err(EngineError::UnresolvedReference(_)) => return Ok(false),
            Err(e) => return Err(e),
        }
    }

    let Some(first) = candidate.next_unresolved() else {
        return Ok(true);
    };
    match pattern.target_candidates(board, roster, first) {
        Ok(candidates) => Ok(!candidates.is_empty()),
        Err(EngineError::UnresolvedReference(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

fn fill_targets(
    pattern: &mut AttackPattern,
    board: &Board,
    roster: &Roster,
    author: PlayerId,
    dispatcher: &mut dyn Dispatcher,
) -> Result<Fill> {
    while let Some(target) = pattern.next_unresolved_target() {
        let candidates = match pattern.target_candidates(board, roster, target) {
            Ok(candidates) => candidates,
            Err(EngineError::UnresolvedReference(_)) => return Ok(Fill::Abandoned),
            Err(e) => return Err(e),
        };
        if candidates.is_empty() {
            debug!(%target, "no candidates");
            return Ok(Fill::Abandoned);
        }

        let request = ChoiceRequest::Target {
            author,
            target,
            options: &candidates,
        };
        match dispatcher.choose(&request) {
            Choice::Pick(i) => {
                let value = *candidates.get(i).ok_or(EngineError::InvalidChoice {
                    index: i,
                    options: candidates.len(),
                })?;
                pattern.resolve_target(board, roster, target, value)?;
            }
            Choice::Decline => return Ok(Fill::Abandoned),
            Choice::Disconnected => return Ok(Fill::Disconnected),
        }
    }
    Ok(Fill::Complete)
}
