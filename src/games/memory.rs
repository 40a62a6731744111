use crate::catalog;
use crate::games::Level;
use crate::narration::{CaptionNarrator, Narrator};
use crate::random;
use crate::tui::{self, TerminalGuard};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use rand::Rng;
use std::time::{Duration, Instant};

const MATCH_DELAY: Duration = Duration::from_millis(500);
const MISMATCH_DELAY: Duration = Duration::from_millis(1000);
const TICK_MS: u64 = 33;

pub struct MemoryCard
{
    pub device_id: &'static str,
    pub face_up: bool,
    pub matched: bool,
}

struct PendingResolve
{
    first: usize,
    second: usize,
    is_match: bool,
    due: Instant,
}

pub struct MemoryBoard<N: Narrator>
{
    cards: Vec<MemoryCard>,
    peek: Vec<usize>,
    pending: Option<PendingResolve>,
    matches: usize,
    moves: usize,
    pair_count: usize,
    finished: bool,
    narrator: N,
}

fn pair_count_for(level: Level) -> usize
{
    match level {
        Level::Easy => 6,
        Level::Medium => 8,
        Level::Hard => 12,
    }
}

impl<N: Narrator> MemoryBoard<N>
{
    pub fn new<R: Rng>(level: Level, rng: &mut R, mut narrator: N) -> Self
    {
        // The catalog may hold fewer devices than the level asks for; the
        // deck simply gets fewer pairs.
        let chosen = random::sample(catalog::devices(), pair_count_for(level), rng);
        let mut cards: Vec<MemoryCard> = chosen
            .iter()
            .flat_map(|device| {
                [device.id, device.id].map(|id| MemoryCard {
                    device_id: id,
                    face_up: false,
                    matched: false,
                })
            })
            .collect();
        random::shuffle(&mut cards, rng);
        narrator.speak("Encontre os pares das cartas.");
        Self {
            pair_count: chosen.len(),
            cards,
            peek: Vec::new(),
            pending: None,
            matches: 0,
            moves: 0,
            finished: false,
            narrator,
        }
    }

    pub fn flip(&mut self, position: usize, now: Instant)
    {
        let Some(card) = self.cards.get(position) else {
            return;
        };
        if card.matched || card.face_up || self.peek.len() >= 2 {
            return;
        }

        self.cards[position].face_up = true;
        self.peek.push(position);

        if self.peek.len() == 2 {
            self.moves += 1;
            let (first, second) = (self.peek[0], self.peek[1]);
            let is_match = self.cards[first].device_id == self.cards[second].device_id;
            if is_match {
                self.narrator.speak("Par perfeito!");
            }
            let delay = if is_match { MATCH_DELAY } else { MISMATCH_DELAY };
            self.pending = Some(PendingResolve {
                first,
                second,
                is_match,
                due: now + delay,
            });
        }
    }

    /// Applies a due resolve. Returns true the single time the last pair
    /// is matched.
    pub fn tick(&mut self, now: Instant) -> bool
    {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|resolve| now >= resolve.due);
        if !due {
            return false;
        }
        let resolve = self.pending.take().unwrap();
        self.peek.clear();

        if resolve.is_match {
            self.cards[resolve.first].matched = true;
            self.cards[resolve.second].matched = true;
            self.matches += 1;
            if self.matches == self.pair_count && !self.finished {
                self.finished = true;
                self.narrator.speak("Incrível! Você venceu.");
                return true;
            }
        } else {
            self.cards[resolve.first].face_up = false;
            self.cards[resolve.second].face_up = false;
        }
        false
    }

    pub fn cards(&self) -> &[MemoryCard]
    {
        &self.cards
    }

    pub fn pair_count(&self) -> usize
    {
        self.pair_count
    }

    pub fn matches(&self) -> usize
    {
        self.matches
    }

    pub fn moves(&self) -> usize
    {
        self.moves
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
    let mut board = MemoryBoard::new(level, &mut rng, CaptionNarrator::new());

    let columns = if level == Level::Hard { 6 } else { 4 };
    let mut cursor = 0usize;
    let mut last_tick = Instant::now();

    loop {
        let now = Instant::now();
        if board.tick(now) {
            break;
        }
        if handle_input(&mut board, &mut cursor, columns, now)? {
            return Ok(());
        }
        if last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            draw_ui(term.stdout(), &board, cursor, columns, level, now)?;
            last_tick = Instant::now();
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    draw_summary(term.stdout(), &board)?;
    tui::wait_for_space()?;
    Ok(())
}

fn handle_input<N: Narrator>(
    board: &mut MemoryBoard<N>,
    cursor: &mut usize,
    columns: usize,
    now: Instant,
) -> Result<bool, String>
{
    let total = board.cards().len();
    while event::poll(Duration::from_millis(0)).map_err(|err| err.to_string())? {
        match event::read().map_err(|err| err.to_string())? {
            Event::Key(KeyEvent { code, modifiers, .. }) => match code {
                KeyCode::Esc => return Ok(true),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(true)
                }
                KeyCode::Left => {
                    if *cursor > 0 {
                        *cursor -= 1;
                    }
                }
                KeyCode::Right => {
                    if *cursor + 1 < total {
                        *cursor += 1;
                    }
                }
                KeyCode::Up => {
                    if *cursor >= columns {
                        *cursor -= columns;
                    }
                }
                KeyCode::Down => {
                    if *cursor + columns < total {
                        *cursor += columns;
                    }
                }
                KeyCode::Enter | KeyCode::Char(' ') => board.flip(*cursor, now),
                _ => {}
            },
            _ => {}
        }
    }
    Ok(false)
}

fn card_face(card: &MemoryCard) -> String
{
    if card.face_up || card.matched {
        let name = catalog::device_by_id(card.device_id)
            .map(|device| device.name)
            .unwrap_or("?");
        let short: String = name.chars().take(6).collect();
        format!("{short:<6}")
    } else {
        "  ?   ".to_string()
    }
}

fn draw_ui(
    stdout: &mut std::io::Stdout,
    board: &MemoryBoard<CaptionNarrator>,
    cursor: usize,
    columns: usize,
    level: Level,
    now: Instant,
) -> Result<(), String>
{
    let mut lines = Vec::new();
    lines.push("WIT Arcade - Jogo da Memória".to_string());
    lines.push(format!(
        "Nível: {}   Pares: {}/{}   Jogadas: {}",
        level.label(),
        board.matches(),
        board.pair_count(),
        board.moves()
    ));
    lines.push(String::new());

    for (row_start, chunk) in board.cards().chunks(columns).enumerate().map(|(r, c)| (r * columns, c)) {
        let mut line = String::new();
        for (offset, card) in chunk.iter().enumerate() {
            let position = row_start + offset;
            let open = if position == cursor { '>' } else { ' ' };
            let close = if card.matched { '=' } else { ' ' };
            line.push_str(&format!("{open}[{}]{close}", card_face(card)));
        }
        lines.push(line);
    }

    lines.push(String::new());
    if let Some(caption) = board.narrator().caption(now) {
        lines.push(format!("♪ {caption}"));
    } else {
        lines.push(String::new());
    }
    lines.push("Setas movem. Enter vira a carta. Esc sai.".to_string());

    tui::draw_frame(stdout, &lines)
}

fn draw_summary(
    stdout: &mut std::io::Stdout,
    board: &MemoryBoard<CaptionNarrator>,
) -> Result<(), String>
{
    let mut lines = Vec::new();
    lines.push("Incrível! Você venceu.".to_string());
    lines.push(String::new());
    lines.push(format!(
        "{} pares encontrados em {} jogadas.",
        board.pair_count(),
        board.moves()
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
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    fn board(level: Level, seed: u64) -> MemoryBoard<RecordingNarrator>
    {
        let mut rng = StdRng::seed_from_u64(seed);
        MemoryBoard::new(level, &mut rng, RecordingNarrator::new())
    }

    fn positions_of_a_pair(board: &MemoryBoard<RecordingNarrator>) -> (usize, usize)
    {
        for (i, card) in board.cards().iter().enumerate() {
            for (j, other) in board.cards().iter().enumerate().skip(i + 1) {
                if card.device_id == other.device_id {
                    return (i, j);
                }
            }
        }
        unreachable!("every deck holds pairs");
    }

    fn positions_of_a_mismatch(board: &MemoryBoard<RecordingNarrator>) -> (usize, usize)
    {
        for (i, card) in board.cards().iter().enumerate() {
            for (j, other) in board.cards().iter().enumerate().skip(i + 1) {
                if card.device_id != other.device_id {
                    return (i, j);
                }
            }
        }
        unreachable!("decks with more than one pair hold mismatches");
    }

    #[rstest]
    #[case(Level::Easy, 6)]
    #[case(Level::Medium, 8)]
    // Hard asks for 12 pairs but the catalog holds 10 devices; the deck
    // silently gets 10.
    #[case(Level::Hard, 10)]
    fn deck_holds_two_cards_per_chosen_device(#[case] level: Level, #[case] pairs: usize)
    {
        let board = board(level, 11);
        assert_eq!(board.pair_count(), pairs);
        assert_eq!(board.cards().len(), 2 * pairs);
        for card in board.cards() {
            let copies = board
                .cards()
                .iter()
                .filter(|other| other.device_id == card.device_id)
                .count();
            assert_eq!(copies, 2, "device {}", card.device_id);
        }
    }

    #[test]
    fn matching_pair_resolves_after_the_match_delay()
    {
        let mut board = board(Level::Easy, 21);
        let now = Instant::now();
        let (first, second) = positions_of_a_pair(&board);

        board.flip(first, now);
        board.flip(second, now);
        assert_eq!(board.moves(), 1);
        assert_eq!(board.narrator().last(), Some("Par perfeito!"));
        assert!(!board.cards()[first].matched);

        board.tick(now + Duration::from_millis(400));
        assert!(!board.cards()[first].matched);
        board.tick(now + Duration::from_millis(501));
        assert!(board.cards()[first].matched);
        assert!(board.cards()[second].matched);
        assert_eq!(board.matches(), 1);
    }

    #[test]
    fn mismatch_flips_back_after_the_longer_delay()
    {
        let mut board = board(Level::Easy, 22);
        let now = Instant::now();
        let (first, second) = positions_of_a_mismatch(&board);

        board.flip(first, now);
        board.flip(second, now);
        assert_eq!(board.moves(), 1);

        board.tick(now + Duration::from_millis(900));
        assert!(board.cards()[first].face_up);
        board.tick(now + Duration::from_millis(1001));
        assert!(!board.cards()[first].face_up);
        assert!(!board.cards()[second].face_up);
        assert_eq!(board.matches(), 0);
    }

    #[test]
    fn peek_window_refuses_a_third_card()
    {
        let mut board = board(Level::Easy, 23);
        let now = Instant::now();
        let (first, second) = positions_of_a_mismatch(&board);
        let third = (0..board.cards().len())
            .find(|&p| p != first && p != second)
            .unwrap();

        board.flip(first, now);
        board.flip(second, now);
        board.flip(third, now);
        assert!(!board.cards()[third].face_up);
        assert_eq!(board.moves(), 1);
    }

    #[test]
    fn flipping_resolved_or_face_up_cards_is_a_no_op()
    {
        let mut board = board(Level::Easy, 24);
        let now = Instant::now();
        let (first, second) = positions_of_a_pair(&board);

        board.flip(first, now);
        board.flip(first, now);
        assert_eq!(board.moves(), 0);

        board.flip(second, now);
        board.tick(now + Duration::from_millis(501));
        assert!(board.cards()[first].matched);

        board.flip(first, now + Duration::from_secs(1));
        assert_eq!(board.moves(), 1);
        assert!(board.cards()[first].matched);
    }

    #[test]
    fn out_of_range_position_is_ignored()
    {
        let mut board = board(Level::Easy, 25);
        board.flip(usize::MAX, Instant::now());
        assert!(board.cards().iter().all(|card| !card.face_up));
    }

    #[test]
    fn finish_fires_once_when_every_pair_is_matched()
    {
        let mut board = board(Level::Easy, 26);
        let mut now = Instant::now();
        let mut finishes = 0;

        while board.matches() < board.pair_count() {
            let (first, second) = positions_of_a_pair_unmatched(&board);
            board.flip(first, now);
            board.flip(second, now);
            now += Duration::from_millis(501);
            if board.tick(now) {
                finishes += 1;
            }
        }

        assert_eq!(finishes, 1);
        assert!(board.is_finished());
        assert_eq!(board.narrator().last(), Some("Incrível! Você venceu."));
        assert!(!board.tick(now + Duration::from_secs(1)));
    }

    fn positions_of_a_pair_unmatched(board: &MemoryBoard<RecordingNarrator>) -> (usize, usize)
    {
        for (i, card) in board.cards().iter().enumerate() {
            if card.matched {
                continue;
            }
            for (j, other) in board.cards().iter().enumerate().skip(i + 1) {
                if !other.matched && card.device_id == other.device_id {
                    return (i, j);
                }
            }
        }
        unreachable!("called only while unmatched pairs remain");
    }
}
