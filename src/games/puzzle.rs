use crate::games::Level;
use crate::narration::{CaptionNarrator, Narrator};
use crate::random;
use crate::tui::{self, TerminalGuard};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use rand::Rng;
use std::time::{Duration, Instant};

const FINISH_DELAY: Duration = Duration::from_millis(500);
const TICK_MS: u64 = 33;

pub struct PuzzleBoard<N: Narrator>
{
    size: usize,
    tiles: Vec<usize>,
    selected: Option<usize>,
    finish_at: Option<Instant>,
    finished: bool,
    narrator: N,
}

fn grid_side(level: Level) -> usize
{
    match level {
        Level::Easy => 2,
        Level::Medium => 3,
        Level::Hard => 4,
    }
}

fn is_solved(tiles: &[usize]) -> bool
{
    tiles.iter().enumerate().all(|(index, &tile)| tile == index)
}

impl<N: Narrator> PuzzleBoard<N>
{
    pub fn new<R: Rng>(level: Level, rng: &mut R, mut narrator: N) -> Self
    {
        let size = grid_side(level);
        let mut tiles: Vec<usize> = (0..size * size).collect();
        random::shuffle_until(&mut tiles, rng, is_solved);
        narrator.speak("Clique em duas peças para trocar de lugar!");
        Self {
            size,
            tiles,
            selected: None,
            finish_at: None,
            finished: false,
            narrator,
        }
    }

    pub fn select(&mut self, index: usize, now: Instant)
    {
        if self.finished || self.finish_at.is_some() || index >= self.tiles.len() {
            return;
        }
        let Some(first) = self.selected.take() else {
            self.selected = Some(index);
            return;
        };

        self.tiles.swap(first, index);
        if is_solved(&self.tiles) {
            self.finish_at = Some(now + FINISH_DELAY);
        }
    }

    /// Applies the finish timer. Returns true the single time the board
    /// is solved.
    pub fn tick(&mut self, now: Instant) -> bool
    {
        if !self.finished && self.finish_at.is_some_and(|at| now >= at) {
            self.finished = true;
            return true;
        }
        false
    }

    pub fn size(&self) -> usize
    {
        self.size
    }

    pub fn tiles(&self) -> &[usize]
    {
        &self.tiles
    }

    pub fn selected(&self) -> Option<usize>
    {
        self.selected
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
    let mut board = PuzzleBoard::new(level, &mut rng, CaptionNarrator::new());

    let mut cursor = 0usize;
    let mut last_tick = Instant::now();

    loop {
        let now = Instant::now();
        if board.tick(now) {
            break;
        }
        if handle_input(&mut board, &mut cursor, now)? {
            return Ok(());
        }
        if last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            draw_ui(term.stdout(), &board, cursor, level, now)?;
            last_tick = Instant::now();
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    draw_summary(term.stdout(), &board)?;
    tui::wait_for_space()?;
    Ok(())
}

fn handle_input<N: Narrator>(
    board: &mut PuzzleBoard<N>,
    cursor: &mut usize,
    now: Instant,
) -> Result<bool, String>
{
    let size = board.size();
    let total = size * size;
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
                    if *cursor >= size {
                        *cursor -= size;
                    }
                }
                KeyCode::Down => {
                    if *cursor + size < total {
                        *cursor += size;
                    }
                }
                KeyCode::Enter | KeyCode::Char(' ') => board.select(*cursor, now),
                _ => {}
            },
            _ => {}
        }
    }
    Ok(false)
}

fn draw_ui(
    stdout: &mut std::io::Stdout,
    board: &PuzzleBoard<CaptionNarrator>,
    cursor: usize,
    level: Level,
    now: Instant,
) -> Result<(), String>
{
    let mut lines = Vec::new();
    lines.push("WIT Arcade - Quebra-Cabeça".to_string());
    lines.push(format!(
        "Nível: {}   Grade: {}x{}",
        level.label(),
        board.size(),
        board.size()
    ));
    lines.push(String::new());

    for row in 0..board.size() {
        let mut line = String::new();
        for col in 0..board.size() {
            let index = row * board.size() + col;
            let tile = board.tiles()[index] + 1;
            let mark = if board.selected() == Some(index) {
                '*'
            } else if index == cursor {
                '>'
            } else {
                ' '
            };
            line.push_str(&format!("{mark}[{tile:>2}] "));
        }
        lines.push(line);
    }

    lines.push(String::new());
    if let Some(caption) = board.narrator().caption(now) {
        lines.push(format!("♪ {caption}"));
    } else {
        lines.push(String::new());
    }
    lines.push("Setas movem. Enter marca e troca. Esc sai.".to_string());

    tui::draw_frame(stdout, &lines)
}

fn draw_summary(
    stdout: &mut std::io::Stdout,
    board: &PuzzleBoard<CaptionNarrator>,
) -> Result<(), String>
{
    let mut lines = Vec::new();
    lines.push("Quebra-cabeça montado!".to_string());
    lines.push(String::new());
    lines.push(format!(
        "Todas as {} peças estão no lugar.",
        board.tiles().len()
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

    fn board(level: Level, seed: u64) -> PuzzleBoard<RecordingNarrator>
    {
        let mut rng = StdRng::seed_from_u64(seed);
        PuzzleBoard::new(level, &mut rng, RecordingNarrator::new())
    }

    fn solve(board: &mut PuzzleBoard<RecordingNarrator>, now: Instant)
    {
        loop {
            let wrong = board
                .tiles()
                .iter()
                .enumerate()
                .find(|&(index, &tile)| tile != index)
                .map(|(index, _)| index);
            let Some(index) = wrong else {
                break;
            };
            let holder = board
                .tiles()
                .iter()
                .position(|&tile| tile == index)
                .unwrap();
            board.select(index, now);
            board.select(holder, now);
        }
    }

    #[rstest]
    #[case(Level::Easy, 2)]
    #[case(Level::Medium, 3)]
    #[case(Level::Hard, 4)]
    fn board_is_an_unsolved_permutation(#[case] level: Level, #[case] side: usize)
    {
        for seed in 0..20 {
            let board = board(level, seed);
            assert_eq!(board.size(), side);
            let mut sorted = board.tiles().to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..side * side).collect::<Vec<usize>>());
            assert!(!is_solved(board.tiles()));
        }
    }

    #[test]
    fn second_selection_swaps_and_clears_the_mark()
    {
        let mut board = board(Level::Medium, 41);
        let now = Instant::now();
        let before = board.tiles().to_vec();

        board.select(0, now);
        assert_eq!(board.selected(), Some(0));
        board.select(3, now);
        assert_eq!(board.selected(), None);
        assert_eq!(board.tiles()[0], before[3]);
        assert_eq!(board.tiles()[3], before[0]);
    }

    #[test]
    fn out_of_range_selection_is_ignored()
    {
        let mut board = board(Level::Easy, 42);
        board.select(99, Instant::now());
        assert_eq!(board.selected(), None);
    }

    #[test]
    fn solving_the_board_finishes_after_the_delay()
    {
        let mut board = board(Level::Easy, 43);
        let now = Instant::now();
        solve(&mut board, now);
        assert!(is_solved(board.tiles()));

        assert!(!board.tick(now + Duration::from_millis(400)));
        assert!(board.tick(now + Duration::from_millis(501)));
        assert!(board.is_finished());
        assert!(!board.tick(now + Duration::from_secs(1)));
    }

    #[test]
    fn a_resolved_board_ignores_further_selections()
    {
        let mut board = board(Level::Easy, 44);
        let now = Instant::now();
        solve(&mut board, now);

        let solved = board.tiles().to_vec();
        board.select(0, now);
        board.select(1, now);
        assert_eq!(board.tiles(), solved.as_slice());
        assert_eq!(board.selected(), None);
    }
}
