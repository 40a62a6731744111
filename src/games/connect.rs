use crate::games::Level;
use crate::narration::{CaptionNarrator, Narrator};
use crate::random;
use crate::tui::{self, TerminalGuard};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use rand::Rng;
use std::time::{Duration, Instant};

const WRONG_FLASH: Duration = Duration::from_millis(500);
const FINISH_DELAY: Duration = Duration::from_millis(1500);
const TICK_MS: u64 = 33;

struct Association
{
    device_id: &'static str,
    device_label: &'static str,
    sense_id: &'static str,
    sense_label: &'static str,
}

// Devices on the left, the sense or body part that uses them on the right.
static ASSOCIATIONS: [Association; 4] = [
    Association { device_id: "alexa", device_label: "Alexa", sense_id: "voice", sense_label: "Voz" },
    Association { device_id: "keyboard", device_label: "Teclado", sense_id: "hand", sense_label: "Mão" },
    Association { device_id: "vr", device_label: "Óculos VR", sense_id: "eye", sense_label: "Olhos" },
    Association { device_id: "camera", device_label: "Câmera", sense_id: "photo", sense_label: "Foto" },
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MatchPair
{
    pub left: &'static str,
    pub right: &'static str,
}

pub struct ConnectBoard<N: Narrator>
{
    right_order: Vec<usize>,
    selected_left: Option<&'static str>,
    confirmed: Vec<MatchPair>,
    wrong_flash: Option<(&'static str, Instant)>,
    finish_at: Option<Instant>,
    finished: bool,
    narrator: N,
}

impl<N: Narrator> ConnectBoard<N>
{
    pub fn new<R: Rng>(_level: Level, rng: &mut R, mut narrator: N) -> Self
    {
        let mut right_order: Vec<usize> = (0..ASSOCIATIONS.len()).collect();
        random::shuffle(&mut right_order, rng);
        narrator.speak("Ligue o dispositivo à sua função.");
        Self {
            right_order,
            selected_left: None,
            confirmed: Vec::new(),
            wrong_flash: None,
            finish_at: None,
            finished: false,
            narrator,
        }
    }

    pub fn left_items(&self) -> Vec<(&'static str, &'static str)>
    {
        ASSOCIATIONS
            .iter()
            .map(|assoc| (assoc.device_id, assoc.device_label))
            .collect()
    }

    pub fn right_items(&self) -> Vec<(&'static str, &'static str)>
    {
        self.right_order
            .iter()
            .map(|&i| (ASSOCIATIONS[i].sense_id, ASSOCIATIONS[i].sense_label))
            .collect()
    }

    pub fn select_left(&mut self, id: &str)
    {
        if self.confirmed.iter().any(|pair| pair.left == id) {
            return;
        }
        let Some(assoc) = ASSOCIATIONS.iter().find(|assoc| assoc.device_id == id) else {
            return;
        };
        self.selected_left = Some(assoc.device_id);
        self.wrong_flash = None;
    }

    pub fn select_right(&mut self, id: &str, now: Instant)
    {
        if self.confirmed.iter().any(|pair| pair.right == id) {
            return;
        }
        let Some(left) = self.selected_left else {
            return;
        };
        let Some(sense) = ASSOCIATIONS.iter().find(|assoc| assoc.sense_id == id) else {
            return;
        };

        let expected = ASSOCIATIONS
            .iter()
            .find(|assoc| assoc.device_id == left)
            .map(|assoc| assoc.sense_id);

        if expected == Some(sense.sense_id) {
            self.narrator.speak("Conexão estabelecida.");
            self.confirmed.push(MatchPair { left, right: sense.sense_id });
            self.selected_left = None;
            if self.confirmed.len() == ASSOCIATIONS.len() {
                self.finish_at = Some(now + FINISH_DELAY);
            }
        } else {
            self.narrator.speak("Erro. Tente novamente.");
            self.wrong_flash = Some((sense.sense_id, now + WRONG_FLASH));
            self.selected_left = None;
        }
    }

    /// Applies due timers. Returns true the single time the session finishes.
    pub fn tick(&mut self, now: Instant) -> bool
    {
        if self
            .wrong_flash
            .is_some_and(|(_, until)| now >= until)
        {
            self.wrong_flash = None;
        }
        if !self.finished && self.finish_at.is_some_and(|at| now >= at) {
            self.finished = true;
            self.narrator.speak("Excelente! Sistema operacional.");
            return true;
        }
        false
    }

    pub fn selected_left(&self) -> Option<&'static str>
    {
        self.selected_left
    }

    pub fn is_left_confirmed(&self, id: &str) -> bool
    {
        self.confirmed.iter().any(|pair| pair.left == id)
    }

    pub fn is_right_confirmed(&self, id: &str) -> bool
    {
        self.confirmed.iter().any(|pair| pair.right == id)
    }

    pub fn wrong_flash(&self, now: Instant) -> Option<&'static str>
    {
        self.wrong_flash
            .filter(|&(_, until)| now < until)
            .map(|(id, _)| id)
    }

    pub fn confirmed_pairs(&self) -> &[MatchPair]
    {
        &self.confirmed
    }

    pub fn total_pairs(&self) -> usize
    {
        ASSOCIATIONS.len()
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
    let mut board = ConnectBoard::new(level, &mut rng, CaptionNarrator::new());

    let mut column = 0usize;
    let mut row = 0usize;
    let mut last_tick = Instant::now();

    loop {
        let now = Instant::now();
        if board.tick(now) {
            break;
        }
        if handle_input(&mut board, &mut column, &mut row, now)? {
            return Ok(());
        }
        if last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            draw_ui(term.stdout(), &board, column, row, level, now)?;
            last_tick = Instant::now();
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    draw_summary(term.stdout(), &board)?;
    tui::wait_for_space()?;
    Ok(())
}

fn handle_input<N: Narrator>(
    board: &mut ConnectBoard<N>,
    column: &mut usize,
    row: &mut usize,
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
                KeyCode::Up => {
                    if *row > 0 {
                        *row -= 1;
                    }
                }
                KeyCode::Down => {
                    if *row + 1 < board.total_pairs() {
                        *row += 1;
                    }
                }
                KeyCode::Left => *column = 0,
                KeyCode::Right => *column = 1,
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if *column == 0 {
                        let (id, _) = board.left_items()[*row];
                        board.select_left(id);
                    } else {
                        let (id, _) = board.right_items()[*row];
                        board.select_right(id, now);
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
    board: &ConnectBoard<CaptionNarrator>,
    column: usize,
    row: usize,
    level: Level,
    now: Instant,
) -> Result<(), String>
{
    let mut lines = Vec::new();
    lines.push("WIT Arcade - Conecte os Pontos".to_string());
    lines.push(format!(
        "Nível: {}   Pares: {}/{}",
        level.label(),
        board.confirmed_pairs().len(),
        board.total_pairs()
    ));
    lines.push(String::new());
    lines.push(format!("{:<24}{}", "  DISPOSITIVOS", "SENTIDOS"));

    let left = board.left_items();
    let right = board.right_items();
    for i in 0..board.total_pairs() {
        let (left_id, left_label) = left[i];
        let (right_id, right_label) = right[i];

        let left_mark = if board.is_left_confirmed(left_id) {
            'x'
        } else if board.selected_left() == Some(left_id) {
            '*'
        } else {
            ' '
        };
        let right_mark = if board.is_right_confirmed(right_id) {
            'x'
        } else if board.wrong_flash(now) == Some(right_id) {
            '!'
        } else {
            ' '
        };

        let left_cursor = if column == 0 && row == i { '>' } else { ' ' };
        let right_cursor = if column == 1 && row == i { '>' } else { ' ' };
        lines.push(format!(
            "{left_cursor} [{left_mark}] {left_label:<16}{right_cursor} [{right_mark}] {right_label}"
        ));
    }

    lines.push(String::new());
    if let Some(caption) = board.narrator().caption(now) {
        lines.push(format!("♪ {caption}"));
    } else {
        lines.push(String::new());
    }
    lines.push("Setas movem. Enter seleciona. Esc sai.".to_string());

    tui::draw_frame(stdout, &lines)
}

fn draw_summary(
    stdout: &mut std::io::Stdout,
    board: &ConnectBoard<CaptionNarrator>,
) -> Result<(), String>
{
    let mut lines = Vec::new();
    lines.push("Sistema 100% conectado!".to_string());
    lines.push(String::new());
    lines.push(format!(
        "Todos os {} pares foram ligados.",
        board.total_pairs()
    ));
    lines.push(String::new());
    lines.push("Pressione ESPAÇO para sair.".to_string());
    tui::draw_frame(stdout, &lines)
}
