#![allow(dead_code)]

use std::sync::Arc;

use affect_tutor::adaptive::{
    AdaptiveEngine, Difficulty, EmotionLabel, EngineConfig, RawEmotionScores, Task, TaskCatalog,
};

pub const TASK_ID: &str = "q_two_sum";

pub fn sample_task(id: &str, difficulty: Difficulty) -> Task {
    let mut task = Task::new(id, difficulty);
    task.topic = "arrays".to_string();
    task.question = "Return indices of the two numbers that add up to target.".to_string();
    task.example_input = "[2, 7, 11, 15], 9".to_string();
    task.example_output = "[0, 1]".to_string();
    task.hint_level_1 = "Think about what complement each number needs.".to_string();
    task.hint_level_2 = "Store numbers you have seen in a hash map.".to_string();
    task.hint_level_3 = "For each x, check whether target - x is in the map, then insert x.".to_string();
    task.explanation = "Single pass with a hash map, O(n) time.".to_string();
    task.bonus_challenge = "Solve it for three numbers.".to_string();
    task.common_mistakes = vec![
        "Using the same element twice".to_string(),
        "Returning values instead of indices".to_string(),
    ];
    task
}

pub fn engine_with(tasks: Vec<Task>) -> AdaptiveEngine {
    AdaptiveEngine::new(EngineConfig::default(), Arc::new(TaskCatalog::from_tasks(tasks)))
}

pub fn engine() -> AdaptiveEngine {
    engine_with(vec![sample_task(TASK_ID, Difficulty::Medium)])
}

pub fn frustrated() -> RawEmotionScores {
    RawEmotionScores::new()
        .with(EmotionLabel::Angry, 0.62)
        .with(EmotionLabel::Neutral, 0.1)
}

pub fn confused() -> RawEmotionScores {
    RawEmotionScores::new()
        .with(EmotionLabel::Fear, 0.35)
        .with(EmotionLabel::Neutral, 0.2)
}

pub fn calm() -> RawEmotionScores {
    RawEmotionScores::new().with(EmotionLabel::Neutral, 0.8)
}
