//! Runner disambiguation
//!
//! When an outcome's default resolution moves or displaces runners who were on
//! base before the play, each such base is queued (first, second, third) and
//! the scorer answers one prompt at a time. Answers edit the tentative result;
//! the last answer yields the result to commit.

use scorebook_protocol::{Base, OutcomeKey, RunnerChoice};

use crate::error::GameError;
use crate::types::{OutcomeResult, RunnerState};

/// Bases that need the scorer to confirm where their runner went
///
/// A base is queued when it was occupied before the play and the default
/// resolution either left it empty or moved its runner by assumption.
/// Home runs never prompt.
pub fn runner_prompts(outcome: OutcomeKey, pre: &RunnerState, result: &OutcomeResult) -> Vec<Base> {
    if outcome == OutcomeKey::HomeRun {
        return Vec::new();
    }

    pre.occupied()
        .filter(|base| {
            !result.runners.is_occupied(*base) || result.presumed_moved.is_occupied(*base)
        })
        .collect()
}

/// Answers the scorer may give for a runner on `base`
pub fn legal_choices(base: Base) -> Vec<RunnerChoice> {
    match base {
        Base::First => vec![
            RunnerChoice::ToSecond,
            RunnerChoice::ToThird,
            RunnerChoice::Score,
            RunnerChoice::Held,
        ],
        Base::Second => vec![
            RunnerChoice::ToThird,
            RunnerChoice::Score,
            RunnerChoice::Held,
        ],
        Base::Third => vec![RunnerChoice::Score, RunnerChoice::Held],
    }
}

/// Apply one answer to a tentative result
///
/// Edits are made to the tentative occupancy: moving a runner sets the target
/// base and clears `base`; scoring clears `base` and adds a run; holding marks
/// `base` occupied. Runs already credited by the default resolution are kept.
pub fn apply_choice(
    result: &OutcomeResult,
    base: Base,
    choice: RunnerChoice,
) -> Result<OutcomeResult, GameError> {
    if !legal_choices(base).contains(&choice) {
        return Err(GameError::IllegalRunnerChoice { base, choice });
    }

    let mut next = *result;
    match choice {
        RunnerChoice::Held => next.runners.set(base, true),
        RunnerChoice::ToSecond => {
            next.runners.set(base, false);
            next.runners.set(Base::Second, true);
        }
        RunnerChoice::ToThird => {
            next.runners.set(base, false);
            next.runners.set(Base::Third, true);
        }
        RunnerChoice::Score => {
            next.runners.set(base, false);
            next.runs_scored += 1;
        }
    }

    Ok(next)
}

/// The prompt currently shown to the scorer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunnerPrompt {
    pub base: Base,
    pub choices: Vec<RunnerChoice>,

    /// Zero-based position in the queue
    pub index: usize,
    pub total: usize,
}

/// A play waiting on runner prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingResolution {
    /// Runners before the outcome was applied
    pub pre_runners: RunnerState,

    /// Result accumulated so far
    pub tentative: OutcomeResult,

    pub outcome: OutcomeKey,

    /// Bases to resolve, in base order
    pub prompts: Vec<Base>,

    pub current: usize,
}

impl PendingResolution {
    /// Start a resolution, or `None` if the play needs no prompts
    pub fn begin(outcome: OutcomeKey, pre_runners: RunnerState, tentative: OutcomeResult) -> Option<Self> {
        let prompts = runner_prompts(outcome, &pre_runners, &tentative);
        if prompts.is_empty() {
            return None;
        }

        Some(Self {
            pre_runners,
            tentative,
            outcome,
            prompts,
            current: 0,
        })
    }

    /// Base being asked about
    pub fn current_base(&self) -> Option<Base> {
        self.prompts.get(self.current).copied()
    }

    pub fn current_prompt(&self) -> Option<RunnerPrompt> {
        let base = self.current_base()?;
        Some(RunnerPrompt {
            base,
            choices: legal_choices(base),
            index: self.current,
            total: self.prompts.len(),
        })
    }

    /// Prompts not yet answered
    pub fn remaining(&self) -> usize {
        self.prompts.len().saturating_sub(self.current)
    }

    /// Answer the current prompt
    ///
    /// Returns the finished result once the last prompt is answered. An illegal
    /// answer leaves the resolution unchanged.
    pub fn answer(&mut self, choice: RunnerChoice) -> Result<Option<OutcomeResult>, GameError> {
        let base = self.current_base().ok_or(GameError::NoPendingResolution)?;

        self.tentative = apply_choice(&self.tentative, base, choice)?;
        self.current += 1;

        if self.current >= self.prompts.len() {
            Ok(Some(self.tentative))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlayContext, resolve};

    fn resolve_with(outcome: OutcomeKey, runners: RunnerState) -> OutcomeResult {
        resolve(
            outcome,
            &PlayContext {
                runners,
                ..PlayContext::default()
            },
        )
    }

    #[test]
    fn test_single_with_first_and_third_prompts_both() {
        let pre = RunnerState::new(true, false, true);
        let result = resolve_with(OutcomeKey::Single, pre);

        assert_eq!(
            runner_prompts(OutcomeKey::Single, &pre, &result),
            vec![Base::First, Base::Third]
        );
    }

    #[test]
    fn test_home_run_never_prompts() {
        let pre = RunnerState::loaded();
        let result = resolve_with(OutcomeKey::HomeRun, pre);
        assert!(runner_prompts(OutcomeKey::HomeRun, &pre, &result).is_empty());
        assert!(PendingResolution::begin(OutcomeKey::HomeRun, pre, result).is_none());
    }

    #[test]
    fn test_walk_and_outs_never_prompt() {
        let pre = RunnerState::loaded();
        for key in [
            OutcomeKey::Walk,
            OutcomeKey::Strikeout,
            OutcomeKey::Groundout,
            OutcomeKey::Flyout,
            OutcomeKey::Foul,
        ] {
            let result = resolve_with(key, pre);
            assert!(runner_prompts(key, &pre, &result).is_empty(), "{key:?}");
        }
    }

    #[test]
    fn test_empty_bases_never_prompt() {
        let pre = RunnerState::empty();
        let result = resolve_with(OutcomeKey::Double, pre);
        assert!(runner_prompts(OutcomeKey::Double, &pre, &result).is_empty());
    }

    #[test]
    fn test_choice_sets() {
        assert_eq!(legal_choices(Base::First).len(), 4);
        assert_eq!(
            legal_choices(Base::Third),
            vec![RunnerChoice::Score, RunnerChoice::Held]
        );
        assert!(!legal_choices(Base::Second).contains(&RunnerChoice::ToSecond));
    }

    #[test]
    fn test_apply_choice_edits() {
        let base = OutcomeResult {
            runners: RunnerState::new(true, true, false),
            runs_scored: 1,
            ..OutcomeResult::default()
        };

        let held = apply_choice(&base, Base::Third, RunnerChoice::Held).unwrap();
        assert_eq!(held.runners, RunnerState::loaded());
        assert_eq!(held.runs_scored, 1);

        let scored = apply_choice(&base, Base::First, RunnerChoice::Score).unwrap();
        assert_eq!(scored.runners, RunnerState::new(false, true, false));
        assert_eq!(scored.runs_scored, 2);

        let to_third = apply_choice(&base, Base::First, RunnerChoice::ToThird).unwrap();
        assert_eq!(to_third.runners, RunnerState::new(false, true, true));
    }

    #[test]
    fn test_illegal_choice_is_rejected() {
        let base = OutcomeResult::default();
        let err = apply_choice(&base, Base::Third, RunnerChoice::ToSecond).unwrap_err();
        assert_eq!(
            err,
            GameError::IllegalRunnerChoice {
                base: Base::Third,
                choice: RunnerChoice::ToSecond
            }
        );
    }

    #[test]
    fn test_sequential_answers_accumulate_runs() {
        let pre = RunnerState::new(true, false, true);
        let result = resolve_with(OutcomeKey::Single, pre);
        let mut pending = PendingResolution::begin(OutcomeKey::Single, pre, result).unwrap();

        let prompt = pending.current_prompt().unwrap();
        assert_eq!(prompt.base, Base::First);
        assert_eq!(prompt.index, 0);
        assert_eq!(prompt.total, 2);

        assert_eq!(pending.answer(RunnerChoice::Score).unwrap(), None);
        assert_eq!(pending.remaining(), 1);
        assert_eq!(pending.current_base(), Some(Base::Third));

        let done = pending.answer(RunnerChoice::Score).unwrap().unwrap();
        assert_eq!(done.runs_scored, result.runs_scored + 2);
        assert_eq!(pending.current_prompt(), None);
    }

    #[test]
    fn test_illegal_answer_keeps_prompt() {
        let pre = RunnerState::new(false, false, true);
        let result = resolve_with(OutcomeKey::Double, pre);
        let mut pending = PendingResolution::begin(OutcomeKey::Double, pre, result).unwrap();

        assert!(pending.answer(RunnerChoice::ToThird).is_err());
        assert_eq!(pending.current_base(), Some(Base::Third));
        assert_eq!(pending.tentative, result);
    }
}
