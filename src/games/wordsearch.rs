use crate::catalog;
use crate::games::Level;
use crate::narration::{CaptionNarrator, Narrator};
use crate::random;
use crate::tui::{self, TerminalGuard};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use rand::Rng;
use std::time::{Duration, Instant};

const GRID_SIZE: usize = 10;
const TARGET_WORDS: usize = 4;
const MAX_WORD_LEN: usize = 8;
const PLACE_ATTEMPTS: usize = 100;
const FINISH_DELAY: Duration = Duration::from_millis(1000);
const TICK_MS: u64 = 33;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pos
{
    pub col: usize,
    pub row: usize,
}

pub struct Cell
{
    pub letter: char,
    pub revealed: bool,
}

pub struct Placement
{
    pub word: String,
    pub cells: Vec<Pos>,
}

pub struct WordGrid<N: Narrator>
{
    cells: Vec<Cell>,
    targets: Vec<String>,
    placements: Vec<Placement>,
    found: Vec<String>,
    drag: Option<(Pos, Pos)>,
    finish_at: Option<Instant>,
    finished: bool,
    narrator: N,
}

impl<N: Narrator> WordGrid<N>
{
    pub fn new<R: Rng>(rng: &mut R, mut narrator: N) -> Self
    {
        let candidates: Vec<&catalog::Device> = catalog::devices()
            .iter()
            .filter(|device| {
                device.name.chars().count() <= MAX_WORD_LEN && !device.name.contains(' ')
            })
            .collect();
        let targets: Vec<String> = random::sample(&candidates, TARGET_WORDS, rng)
            .iter()
            .map(|device| device.name.to_uppercase())
            .collect();

        let mut letters: Vec<Option<char>> = vec![None; GRID_SIZE * GRID_SIZE];
        let mut placements = Vec::new();
        for word in &targets {
            if let Some(placement) = place_word(word, &mut letters, rng) {
                placements.push(placement);
            }
        }

        let cells = letters
            .into_iter()
            .map(|letter| Cell {
                letter: letter.unwrap_or_else(|| {
                    (b'A' + rng.gen_range(0..26u8)) as char
                }),
                revealed: false,
            })
            .collect();

        narrator.speak("Encontre as palavras escondidas na grade.");
        Self {
            cells,
            targets,
            placements,
            found: Vec::new(),
            drag: None,
            finish_at: None,
            finished: false,
            narrator,
        }
    }

    pub fn drag_start(&mut self, pos: Pos)
    {
        self.drag = Some((pos, pos));
    }

    pub fn drag_update(&mut self, pos: Pos)
    {
        if let Some((_, end)) = self.drag.as_mut() {
            *end = pos;
        }
    }

    pub fn drag_release(&mut self, now: Instant)
    {
        let Some((start, end)) = self.drag.take() else {
            return;
        };
        let run = run_between(start, end);
        let forward: String = run.iter().map(|&pos| self.letter_at(pos)).collect();
        let reversed: String = forward.chars().rev().collect();

        let hit = [forward, reversed].into_iter().find(|candidate| {
            self.targets.contains(candidate) && !self.found.contains(candidate)
        });
        let Some(word) = hit else {
            return;
        };

        for &pos in &run {
            self.cells[pos.row * GRID_SIZE + pos.col].revealed = true;
        }
        self.narrator.speak(&format!("Palavra encontrada: {word}"));
        self.found.push(word);
        if self.found.len() == self.targets.len() {
            self.finish_at = Some(now + FINISH_DELAY);
        }
    }

    /// Applies the finish timer. Returns true the single time the session
    /// finishes.
    pub fn tick(&mut self, now: Instant) -> bool
    {
        if !self.finished && self.finish_at.is_some_and(|at| now >= at) {
            self.finished = true;
            self.narrator
                .speak("Parabéns! Você encontrou todas as palavras.");
            return true;
        }
        false
    }

    pub fn letter_at(&self, pos: Pos) -> char
    {
        self.cells[pos.row * GRID_SIZE + pos.col].letter
    }

    pub fn is_revealed(&self, pos: Pos) -> bool
    {
        self.cells[pos.row * GRID_SIZE + pos.col].revealed
    }

    pub fn is_in_active_selection(&self, pos: Pos) -> bool
    {
        self.drag
            .is_some_and(|(start, end)| run_between(start, end).contains(&pos))
    }

    pub fn is_dragging(&self) -> bool
    {
        self.drag.is_some()
    }

    pub fn targets(&self) -> &[String]
    {
        &self.targets
    }

    pub fn found(&self) -> &[String]
    {
        &self.found
    }

    pub fn placements(&self) -> &[Placement]
    {
        &self.placements
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

fn place_word<R: Rng>(
    word: &str,
    letters: &mut [Option<char>],
    rng: &mut R,
) -> Option<Placement>
{
    let chars: Vec<char> = word.chars().collect();
    if chars.is_empty() || chars.len() > GRID_SIZE {
        return None;
    }

    for _ in 0..PLACE_ATTEMPTS {
        let horizontal = rng.gen_bool(0.5);
        let (start_col, start_row) = if horizontal {
            (
                rng.gen_range(0..=GRID_SIZE - chars.len()),
                rng.gen_range(0..GRID_SIZE),
            )
        } else {
            (
                rng.gen_range(0..GRID_SIZE),
                rng.gen_range(0..=GRID_SIZE - chars.len()),
            )
        };

        let cells: Vec<Pos> = (0..chars.len())
            .map(|i| {
                if horizontal {
                    Pos { col: start_col + i, row: start_row }
                } else {
                    Pos { col: start_col, row: start_row + i }
                }
            })
            .collect();

        let collides = cells.iter().zip(&chars).any(|(&pos, &ch)| {
            letters[pos.row * GRID_SIZE + pos.col].is_some_and(|existing| existing != ch)
        });
        if collides {
            continue;
        }

        for (&pos, &ch) in cells.iter().zip(&chars) {
            letters[pos.row * GRID_SIZE + pos.col] = Some(ch);
        }
        return Some(Placement { word: word.to_string(), cells });
    }

    // Crowded grids may refuse a word; it stays on the target list but is
    // simply not placed, matching the lenient setup contract.
    None
}

// The run is always axis-aligned on the dominant axis of the drag, with
// exact diagonal ties going to the vertical axis. Cells come back in
// ascending coordinate order whatever the drag direction.
fn run_between(start: Pos, end: Pos) -> Vec<Pos>
{
    let dx = end.col as isize - start.col as isize;
    let dy = end.row as isize - start.row as isize;
    if dx.abs() > dy.abs() {
        let (first, last) = (start.col.min(end.col), start.col.max(end.col));
        (first..=last).map(|col| Pos { col, row: start.row }).collect()
    } else {
        let (first, last) = (start.row.min(end.row), start.row.max(end.row));
        (first..=last).map(|row| Pos { col: start.col, row }).collect()
    }
}

pub fn run(_level: Level) -> Result<(), String>
{
    let mut term = TerminalGuard::enter().map_err(|err| err.to_string())?;
    let mut rng = rand::thread_rng();
    let mut grid = WordGrid::new(&mut rng, CaptionNarrator::new());

    let mut cursor = Pos { col: 0, row: 0 };
    let mut last_tick = Instant::now();

    loop {
        let now = Instant::now();
        if grid.tick(now) {
            break;
        }
        if handle_input(&mut grid, &mut cursor, now)? {
            return Ok(());
        }
        if last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            draw_ui(term.stdout(), &grid, cursor, now)?;
            last_tick = Instant::now();
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    draw_summary(term.stdout(), &grid)?;
    tui::wait_for_space()?;
    Ok(())
}

fn handle_input<N: Narrator>(
    grid: &mut WordGrid<N>,
    cursor: &mut Pos,
    now: Instant,
) -> Result<bool, String>
{
    while event::poll(Duration::from_millis(0)).map_err(|err| err.to_string())? {
        match event::read().map_err(|err| err.to_string())? {
            Event::Key(KeyEvent { code, modifiers, .. }) => match code {
                KeyCode::Esc => return Ok(true),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(true)
                }
                KeyCode::Left => {
                    if cursor.col > 0 {
                        cursor.col -= 1;
                        grid.drag_update(*cursor);
                    }
                }
                KeyCode::Right => {
                    if cursor.col + 1 < GRID_SIZE {
                        cursor.col += 1;
                        grid.drag_update(*cursor);
                    }
                }
                KeyCode::Up => {
                    if cursor.row > 0 {
                        cursor.row -= 1;
                        grid.drag_update(*cursor);
                    }
                }
                KeyCode::Down => {
                    if cursor.row + 1 < GRID_SIZE {
                        cursor.row += 1;
                        grid.drag_update(*cursor);
                    }
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if grid.is_dragging() {
                        grid.drag_release(now);
                    } else {
                        grid.drag_start(*cursor);
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
    grid: &WordGrid<CaptionNarrator>,
    cursor: Pos,
    now: Instant,
) -> Result<(), String>
{
    let mut lines = Vec::new();
    lines.push("WIT Arcade - Caça-Palavras".to_string());
    lines.push(format!(
        "Encontradas: {}/{}",
        grid.found().len(),
        grid.targets().len()
    ));
    lines.push(String::new());

    for row in 0..GRID_SIZE {
        let mut line = String::new();
        for col in 0..GRID_SIZE {
            let pos = Pos { col, row };
            let letter = grid.letter_at(pos);
            let rendered = if pos == cursor {
                format!(">{letter}<")
            } else if grid.is_in_active_selection(pos) {
                format!("[{letter}]")
            } else if grid.is_revealed(pos) {
                format!("({letter})")
            } else {
                format!(" {letter} ")
            };
            line.push_str(&rendered);
        }
        lines.push(line);
    }

    lines.push(String::new());
    let mut word_line = String::new();
    for word in grid.targets() {
        let mark = if grid.found().contains(word) { 'x' } else { ' ' };
        word_line.push_str(&format!("[{mark}] {word}  "));
    }
    lines.push(word_line);

    lines.push(String::new());
    if let Some(caption) = grid.narrator().caption(now) {
        lines.push(format!("♪ {caption}"));
    } else {
        lines.push(String::new());
    }
    lines.push(
        "Setas movem. Enter inicia e solta a seleção. Esc sai.".to_string(),
    );

    tui::draw_frame(stdout, &lines)
}

fn draw_summary(
    stdout: &mut std::io::Stdout,
    grid: &WordGrid<CaptionNarrator>,
) -> Result<(), String>
{
    let mut lines = Vec::new();
    lines.push("Parabéns! Você encontrou todas as palavras.".to_string());
    lines.push(String::new());
    lines.push(grid.found().join(", "));
    lines.push(String::new());
    lines.push("Pressione ESPAÇO para sair.".to_string());
    tui::draw_frame(stdout, &lines)
}
