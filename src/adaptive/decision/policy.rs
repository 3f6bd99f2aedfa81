use crate::adaptive::config::{HintGate, PolicyThresholds};
use crate::adaptive::types::{Action, EngagementState, HintLevel, InterventionRecord, Task};

const FRUSTRATED_MESSAGES: [&str; 3] = [
    "You seem stuck. Here's a hint to help you out! 💡",
    "Let's break this down step by step. 🤗",
    "Here's a detailed walkthrough to help you. 📚",
];
const CONFUSED_MESSAGES: [&str; 2] = [
    "Here's something to think about... 🤔",
    "Let me explain the approach... 💭",
];
const SAD_MESSAGE: &str = "💙 Don't worry, you've got this! Here's a small hint to get you started.";
const BONUS_MESSAGE: &str = "🎯 Ready for an extra challenge?";
const ENCOURAGE_MESSAGE: &str = "Keep up the great work! You're doing amazing! 🌟";

/// Turns engagement state, its sustained duration and the hints already given
/// for a task into the next intervention.
///
/// Hint gates require an exact prior-hint count, so a level is only ever
/// delivered once per task and never ahead of the level below it.
pub struct InterventionPolicy {
    thresholds: PolicyThresholds,
}

impl InterventionPolicy {
    pub fn new(thresholds: PolicyThresholds) -> Self {
        Self { thresholds }
    }

    /// `prior_hints` must already be filtered to the task being decided on.
    /// A task the caller could not resolve yields `NoAction`.
    pub fn decide(
        &self,
        task: Option<&Task>,
        state: EngagementState,
        sustained_secs: f64,
        elapsed_secs: f64,
        prior_hints: &[InterventionRecord],
    ) -> Action {
        let Some(task) = task else {
            return Action::NoAction;
        };
        let hint_count = prior_hints.len();

        match state {
            EngagementState::Frustrated => {
                escalate(
                    &self.thresholds.frustrated,
                    &FRUSTRATED_MESSAGES,
                    sustained_secs,
                    hint_count,
                )
                .map(|(level, message)| {
                    let mistakes = (level == HintLevel::THIRD).then(|| task.common_mistakes.clone());
                    hint(task, level, message, mistakes)
                })
                .unwrap_or(Action::NoAction)
            }
            EngagementState::Confused => {
                escalate(
                    &self.thresholds.confused,
                    &CONFUSED_MESSAGES,
                    sustained_secs,
                    hint_count,
                )
                .map(|(level, message)| hint(task, level, message, None))
                .unwrap_or(Action::NoAction)
            }
            EngagementState::Bored => {
                if sustained_secs >= self.thresholds.bored_min_sustained_secs {
                    Action::BonusChallenge {
                        content: task.bonus_challenge.clone(),
                        message: BONUS_MESSAGE.to_string(),
                        xp_bonus: self.thresholds.bonus_xp,
                    }
                } else {
                    Action::NoAction
                }
            }
            EngagementState::Sad => {
                if self.thresholds.sad.is_open(sustained_secs, hint_count) {
                    hint(task, HintLevel::FIRST, SAD_MESSAGE, None)
                } else {
                    Action::NoAction
                }
            }
            EngagementState::Happy | EngagementState::Focused => {
                if elapsed_secs > self.thresholds.encourage_after_secs && hint_count == 0 {
                    Action::Encourage {
                        message: ENCOURAGE_MESSAGE.to_string(),
                    }
                } else {
                    Action::NoAction
                }
            }
        }
    }
}

impl Default for InterventionPolicy {
    fn default() -> Self {
        Self::new(PolicyThresholds::default())
    }
}

/// Gates past the end of the message table never fire.
fn escalate(
    gates: &[HintGate],
    messages: &[&'static str],
    sustained_secs: f64,
    hint_count: usize,
) -> Option<(HintLevel, &'static str)> {
    let idx = gates
        .iter()
        .take(messages.len())
        .position(|gate| gate.is_open(sustained_secs, hint_count))?;
    let level = u8::try_from(idx + 1).ok().and_then(HintLevel::new)?;
    let message = messages.get(idx).copied()?;
    Some((level, message))
}

fn hint(task: &Task, level: HintLevel, message: &str, common_mistakes: Option<Vec<String>>) -> Action {
    Action::DeliverHint {
        level,
        text: task.hint(level).to_string(),
        message: message.to_string(),
        common_mistakes,
    }
}
