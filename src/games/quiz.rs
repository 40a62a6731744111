use crate::catalog::{self, Device};
use crate::games::Level;
use crate::narration::{CaptionNarrator, Narrator};
use crate::random;
use crate::tui::{self, TerminalGuard};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use rand::Rng;
use std::time::{Duration, Instant};

const QUESTION_COUNT: usize = 5;
const DISTRACTORS: usize = 2;
const FEEDBACK_DELAY: Duration = Duration::from_millis(2000);
const TICK_MS: u64 = 33;

pub struct QuizQuestion
{
    pub target: &'static Device,
    pub options: Vec<&'static Device>,
    pub prompt: &'static str,
}

struct Feedback
{
    text: String,
    due: Instant,
}

pub struct QuizSession<N: Narrator>
{
    questions: Vec<QuizQuestion>,
    current: usize,
    score: usize,
    feedback: Option<Feedback>,
    finished: bool,
    narrator: N,
}

fn prompt_for(level: Level, device: &'static Device) -> &'static str
{
    match level {
        Level::Easy => device.short_description,
        Level::Medium => device.usage,
        Level::Hard => device.challenge,
    }
}

impl<N: Narrator> QuizSession<N>
{
    pub fn new<R: Rng>(level: Level, rng: &mut R, narrator: N) -> Self
    {
        let targets = random::sample(catalog::devices(), QUESTION_COUNT, rng);
        let questions = targets
            .into_iter()
            .map(|target| {
                let rest: Vec<&'static Device> = catalog::devices()
                    .iter()
                    .filter(|device| device.id != target.id)
                    .collect();
                let mut options: Vec<&'static Device> = random::sample(&rest, DISTRACTORS, rng)
                    .into_iter()
                    .copied()
                    .collect();
                options.push(target);
                random::shuffle(&mut options, rng);
                QuizQuestion {
                    target,
                    options,
                    prompt: prompt_for(level, target),
                }
            })
            .collect();
        Self {
            questions,
            current: 0,
            score: 0,
            feedback: None,
            finished: false,
            narrator,
        }
    }

    pub fn answer(&mut self, option_id: &str, now: Instant)
    {
        // A visible feedback line means the previous answer is still being
        // shown; further input waits for the next question.
        if self.finished || self.feedback.is_some() {
            return;
        }
        let Some(question) = self.questions.get(self.current) else {
            return;
        };

        let text = if option_id == question.target.id {
            self.score += 1;
            "Resposta Correta!".to_string()
        } else {
            format!("Erro. A resposta era: {}.", question.target.name)
        };
        self.narrator.speak(&text);
        self.feedback = Some(Feedback { text, due: now + FEEDBACK_DELAY });
    }

    /// Clears due feedback and advances. Returns true the single time the
    /// last question is resolved.
    pub fn tick(&mut self, now: Instant) -> bool
    {
        let due = self
            .feedback
            .as_ref()
            .is_some_and(|feedback| now >= feedback.due);
        if !due {
            return false;
        }
        self.feedback = None;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            false
        } else if !self.finished {
            self.finished = true;
            true
        } else {
            false
        }
    }

    pub fn current_question(&self) -> Option<&QuizQuestion>
    {
        self.questions.get(self.current)
    }

    pub fn question_number(&self) -> usize
    {
        self.current + 1
    }

    pub fn total_questions(&self) -> usize
    {
        self.questions.len()
    }

    pub fn score(&self) -> usize
    {
        self.score
    }

    pub fn feedback(&self) -> Option<&str>
    {
        self.feedback.as_ref().map(|feedback| feedback.text.as_str())
    }

    pub fn questions(&self) -> &[QuizQuestion]
    {
        &self.questions
    }

    pub fn is_finished(&self) -> bool
    {
        self.finished
    }

    pub fn narrator(&self) -> &N
    {
        &self.narrator
    }
}

pub fn run(level: Level) -> Result<(), String>
{
    let mut term = TerminalGuard::enter().map_err(|err| err.to_string())?;
    let mut rng = rand::thread_rng();
    let mut session = QuizSession::new(level, &mut rng, CaptionNarrator::new());

    let mut last_tick = Instant::now();

    loop {
        let now = Instant::now();
        if session.tick(now) {
            break;
        }
        if handle_input(&mut session, now)? {
            return Ok(());
        }
        if last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            draw_ui(term.stdout(), &session, level, now)?;
            last_tick = Instant::now();
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    draw_summary(term.stdout(), &session)?;
    tui::wait_for_space()?;
    Ok(())
}

fn handle_input<N: Narrator>(session: &mut QuizSession<N>, now: Instant) -> Result<bool, String>
{
    while event::poll(Duration::from_millis(0)).map_err(|err| err.to_string())? {
        match event::read().map_err(|err| err.to_string())? {
            Event::Key(KeyEvent { code, modifiers, .. }) => match code {
                KeyCode::Esc => return Ok(true),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(true)
                }
                KeyCode::Char(ch @ '1'..='3') => {
                    let index = ch as usize - '1' as usize;
                    let option_id = session
                        .current_question()
                        .and_then(|question| question.options.get(index))
                        .map(|device| device.id);
                    if let Some(id) = option_id {
                        session.answer(id, now);
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }
    Ok(false)
}

fn draw_ui(
    stdout: &mut std::io::Stdout,
    session: &QuizSession<CaptionNarrator>,
    level: Level,
    now: Instant,
) -> Result<(), String>
{
    let mut lines = Vec::new();
    lines.push("WIT Arcade - Quiz dos Dispositivos".to_string());
    lines.push(format!(
        "Nível: {}   Questão {}/{}   Pontos: {}",
        level.label(),
        session.question_number(),
        session.total_questions(),
        session.score()
    ));
    lines.push(String::new());

    if let Some(question) = session.current_question() {
        lines.push("Identifique o componente:".to_string());
        lines.push(format!("\"{}\"", question.prompt));
        lines.push(String::new());
        for (index, option) in question.options.iter().enumerate() {
            lines.push(format!("  {}. {}", index + 1, option.name));
        }
    }

    lines.push(String::new());
    if let Some(feedback) = session.feedback() {
        lines.push(feedback.to_string());
    } else {
        lines.push(String::new());
    }
    if let Some(caption) = session.narrator().caption(now) {
        lines.push(format!("♪ {caption}"));
    } else {
        lines.push(String::new());
    }
    lines.push("Responda com 1, 2 ou 3. Esc sai.".to_string());

    tui::draw_frame(stdout, &lines)
}

fn draw_summary(
    stdout: &mut std::io::Stdout,
    session: &QuizSession<CaptionNarrator>,
) -> Result<(), String>
{
    let mut lines = Vec::new();
    lines.push("Quiz concluído!".to_string());
    lines.push(String::new());
    lines.push(format!(
        "Pontuação final: {}/{}",
        session.score(),
        session.total_questions()
    ));
    lines.push(String::new());
    lines.push("Pressione ESPAÇO para sair.".to_string());
    tui::draw_frame(stdout, &lines)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::narration::RecordingNarrator;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    fn session(level: Level, seed: u64) -> QuizSession<RecordingNarrator>
    {
        let mut rng = StdRng::seed_from_u64(seed);
        QuizSession::new(level, &mut rng, RecordingNarrator::new())
    }

    #[rstest]
    #[case(Level::Easy)]
    #[case(Level::Medium)]
    #[case(Level::Hard)]
    fn every_question_has_three_options_with_the_target_once(#[case] level: Level)
    {
        for seed in 0..20 {
            let session = session(level, seed);
            assert_eq!(session.total_questions(), QUESTION_COUNT);
            for question in session.questions() {
                assert_eq!(question.options.len(), 3);
                let target_count = question
                    .options
                    .iter()
                    .filter(|option| option.id == question.target.id)
                    .count();
                assert_eq!(target_count, 1);
                for (i, option) in question.options.iter().enumerate() {
                    assert!(
                        question.options[i + 1..]
                            .iter()
                            .all(|other| other.id != option.id),
                        "duplicate option {}",
                        option.id
                    );
                }
            }
        }
    }

    #[test]
    fn question_targets_are_distinct()
    {
        let session = session(Level::Easy, 31);
        let questions = session.questions();
        for (i, question) in questions.iter().enumerate() {
            assert!(
                questions[i + 1..]
                    .iter()
                    .all(|other| other.target.id != question.target.id)
            );
        }
    }

    #[rstest]
    #[case(Level::Easy)]
    #[case(Level::Medium)]
    #[case(Level::Hard)]
    fn prompt_follows_the_level(#[case] level: Level)
    {
        let session = session(level, 32);
        for question in session.questions() {
            let expected = match level {
                Level::Easy => question.target.short_description,
                Level::Medium => question.target.usage,
                Level::Hard => question.target.challenge,
            };
            assert_eq!(question.prompt, expected);
        }
    }

    #[test]
    fn correct_answer_scores_and_shows_positive_feedback()
    {
        let mut session = session(Level::Hard, 33);
        let now = Instant::now();
        let target_id = session.current_question().unwrap().target.id;

        session.answer(target_id, now);
        assert_eq!(session.score(), 1);
        assert_eq!(session.feedback(), Some("Resposta Correta!"));
        assert_eq!(session.narrator().last(), Some("Resposta Correta!"));
    }

    #[test]
    fn wrong_answer_names_the_correct_device()
    {
        let mut session = session(Level::Easy, 34);
        let now = Instant::now();
        let question = session.current_question().unwrap();
        let target_name = question.target.name;
        let wrong_id = question
            .options
            .iter()
            .find(|option| option.id != question.target.id)
            .unwrap()
            .id;

        session.answer(wrong_id, now);
        assert_eq!(session.score(), 0);
        assert_eq!(
            session.feedback(),
            Some(format!("Erro. A resposta era: {target_name}.").as_str())
        );
    }

    #[test]
    fn answers_are_ignored_while_feedback_is_shown()
    {
        let mut session = session(Level::Easy, 35);
        let now = Instant::now();
        let target_id = session.current_question().unwrap().target.id;

        session.answer(target_id, now);
        session.answer(target_id, now + Duration::from_millis(100));
        assert_eq!(session.score(), 1);
        assert_eq!(session.question_number(), 1);
    }

    #[test]
    fn feedback_clears_and_the_session_advances()
    {
        let mut session = session(Level::Medium, 36);
        let now = Instant::now();
        let target_id = session.current_question().unwrap().target.id;

        session.answer(target_id, now);
        assert!(!session.tick(now + Duration::from_millis(1900)));
        assert!(session.feedback().is_some());

        assert!(!session.tick(now + Duration::from_millis(2001)));
        assert_eq!(session.feedback(), None);
        assert_eq!(session.question_number(), 2);
    }

    #[test]
    fn finish_fires_once_after_the_last_question()
    {
        let mut session = session(Level::Easy, 37);
        let mut now = Instant::now();
        let mut finishes = 0;

        for _ in 0..QUESTION_COUNT {
            let target_id = session.current_question().unwrap().target.id;
            session.answer(target_id, now);
            now += Duration::from_millis(2001);
            if session.tick(now) {
                finishes += 1;
            }
        }

        assert_eq!(finishes, 1);
        assert!(session.is_finished());
        assert_eq!(session.score(), QUESTION_COUNT);
        assert!(!session.tick(now + Duration::from_secs(1)));

        // A resolved session ignores further answers.
        session.answer("alexa", now);
        assert_eq!(session.score(), QUESTION_COUNT);
    }
}
