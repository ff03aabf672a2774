// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! The hidden prompt behind the splash title: five clicks knock it down.
use crate::config::EasterEgg;
use crate::splash::timer::Timer;
use std::time::{Duration, Instant};

pub const CLICKS_TO_FALL: u32 = 5;
pub const SHAKE_DURATION: Duration = Duration::from_millis(400);
pub const FALL_DURATION: Duration = Duration::from_millis(700);
/// The title shakes with wider offsets than the bag.
pub const SHAKE_AMPLITUDE: f32 = 1.92;

pub const PROMPT_LABEL: &str = "What is my other name?";
pub const PROMPT_PLACEHOLDER: &str = "Enter your answer...";
pub const INCORRECT_ANSWER: &str = "Incorrect password. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitlePhase {
    #[default]
    Standing,
    Falling,
    AskingAnswer,
}

#[derive(Debug, Default)]
pub struct TitleSequence {
    phase: TitlePhase,
    clicks: u32,
    shake: Timer,
    /// Runs from the final click until the fall starts.
    fall_delay: Timer,
    fall: Timer,
}

impl TitleSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a click on the title. Ignored once the fall has been scheduled.
    pub fn click(&mut self, now: Instant) {
        if self.phase != TitlePhase::Standing || self.fall_delay.deadline().is_some() {
            return;
        }
        self.clicks += 1;
        self.shake.start(now, SHAKE_DURATION);
        if self.clicks >= CLICKS_TO_FALL {
            self.fall_delay.start(now, SHAKE_DURATION);
        }
    }

    /// Advances the shake, fall and reveal. Call once per frame.
    pub fn tick(&mut self, now: Instant) {
        self.shake.poll(now);

        if let Some(fall_start) = self.fall_delay.deadline()
            && self.fall_delay.poll(now)
        {
            self.phase = TitlePhase::Falling;
            self.fall.start(fall_start, FALL_DURATION);
        }

        if self.fall.poll(now) {
            self.phase = TitlePhase::AskingAnswer;
            log::debug!("Title prompt revealed");
        }
    }

    pub fn phase(&self) -> TitlePhase {
        self.phase
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn shake_progress(&self, now: Instant) -> Option<f32> {
        self.shake.progress(now)
    }

    pub fn fall_progress(&self, now: Instant) -> Option<f32> {
        self.fall.progress(now)
    }
}

/// The answer box shown after the title falls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnswerPrompt {
    pub input: String,
    show_error: bool,
}

impl AnswerPrompt {
    /// Replaces the input. Any error from the previous submission is cleared.
    pub fn edit(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.show_error = false;
    }

    /// Call after `input` was changed in place.
    pub fn edited(&mut self) {
        self.show_error = false;
    }

    /// Returns the destination on a correct answer (trimmed, case-insensitive).
    /// There is no lockout; a wrong answer only shows the inline error.
    pub fn submit(&mut self, easter_egg: Option<&EasterEgg>) -> Option<String> {
        let answer = self.input.trim().to_lowercase();
        match easter_egg {
            Some(egg) if !answer.is_empty() && answer == egg.answer.trim().to_lowercase() => {
                self.show_error = false;
                Some(egg.url.clone())
            }
            _ => {
                self.show_error = true;
                None
            }
        }
    }

    pub fn error(&self) -> Option<&'static str> {
        self.show_error.then_some(INCORRECT_ANSWER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn egg() -> EasterEgg {
        EasterEgg {
            answer: "Secret".to_owned(),
            url: "https://example.com/hidden".to_owned(),
        }
    }

    #[test]
    fn test_four_clicks_only_shake() {
        let start = Instant::now();
        let mut title = TitleSequence::new();
        for i in 0..4 {
            title.click(start + ms(i * 500));
            title.tick(start + ms(i * 500 + 450));
        }
        assert_eq!(title.clicks(), 4);
        assert_eq!(title.phase(), TitlePhase::Standing);
        assert_eq!(title.shake_progress(start + ms(2000)), None);
    }

    #[test]
    fn test_fifth_click_falls_then_asks() {
        let start = Instant::now();
        let mut title = TitleSequence::new();
        for _ in 0..5 {
            title.click(start);
        }
        assert_eq!(title.shake_progress(start), Some(0.0));

        title.tick(start + ms(399));
        assert_eq!(title.phase(), TitlePhase::Standing);

        title.tick(start + ms(400));
        assert_eq!(title.phase(), TitlePhase::Falling);
        assert_eq!(title.fall_progress(start + ms(400)), Some(0.0));

        title.tick(start + ms(1099));
        assert_eq!(title.phase(), TitlePhase::Falling);
        title.tick(start + ms(1100));
        assert_eq!(title.phase(), TitlePhase::AskingAnswer);
    }

    #[test]
    fn test_late_tick_completes_whole_sequence() {
        let start = Instant::now();
        let mut title = TitleSequence::new();
        for _ in 0..5 {
            title.click(start);
        }
        title.tick(start + ms(5000));
        assert_eq!(title.phase(), TitlePhase::AskingAnswer);
    }

    #[test]
    fn test_clicks_ignored_once_fall_scheduled() {
        let start = Instant::now();
        let mut title = TitleSequence::new();
        for _ in 0..5 {
            title.click(start);
        }
        title.click(start + ms(100));
        title.tick(start + ms(500));
        title.click(start + ms(600));
        assert_eq!(title.clicks(), 5);
    }

    #[test]
    fn test_answer_prompt() {
        let egg = egg();
        let mut prompt = AnswerPrompt::default();

        prompt.edit("wrong");
        assert_eq!(prompt.submit(Some(&egg)), None);
        assert_eq!(prompt.error(), Some(INCORRECT_ANSWER));

        prompt.edit("  sEcReT ");
        assert_eq!(prompt.error(), None);
        assert_eq!(
            prompt.submit(Some(&egg)).as_deref(),
            Some("https://example.com/hidden")
        );
        assert_eq!(prompt.error(), None);
    }

    #[test]
    fn test_answer_prompt_without_configured_answer() {
        let mut prompt = AnswerPrompt::default();
        prompt.edit("anything");
        assert_eq!(prompt.submit(None), None);
        assert!(prompt.error().is_some());

        prompt.input.push('!');
        prompt.edited();
        assert_eq!(prompt.error(), None);
    }
}
