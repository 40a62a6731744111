use std::time::{Duration, Instant};

const CAPTION_TTL: Duration = Duration::from_secs(4);

/// Fire-and-forget speech capability. Games announce checkpoints through it
/// and never wait on completion.
pub trait Narrator
{
    fn speak(&mut self, text: &str);
}

/// Terminal stand-in for the speech transport: holds at most one caption,
/// a new `speak` replaces whatever is still on screen.
pub struct CaptionNarrator
{
    current: Option<Caption>,
}

struct Caption
{
    text: String,
    since: Instant,
}

impl CaptionNarrator
{
    pub fn new() -> Self
    {
        Self { current: None }
    }

    pub fn caption(&self, now: Instant) -> Option<&str>
    {
        self.current
            .as_ref()
            .filter(|caption| now.saturating_duration_since(caption.since) < CAPTION_TTL)
            .map(|caption| caption.text.as_str())
    }
}

impl Narrator for CaptionNarrator
{
    fn speak(&mut self, text: &str)
    {
        tracing::debug!(text, "narration");
        self.current = Some(Caption {
            text: text.to_string(),
            since: Instant::now(),
        });
    }
}

#[cfg(test)]
pub struct RecordingNarrator
{
    pub spoken: Vec<String>,
}

#[cfg(test)]
impl RecordingNarrator
{
    pub fn new() -> Self
    {
        Self { spoken: Vec::new() }
    }

    pub fn last(&self) -> Option<&str>
    {
        self.spoken.last().map(String::as_str)
    }
}

#[cfg(test)]
impl Narrator for RecordingNarrator
{
    fn speak(&mut self, text: &str)
    {
        self.spoken.push(text.to_string());
    }
}
