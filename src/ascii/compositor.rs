//! Frame compositor: turns a filled/empty grid into the next frame's text.
//!
//! Each frame reuses most characters of the previous frame and redraws a
//! small random fraction, which gives the "static" look while keeping the
//! shape stable. Occasionally a whole word is written over the end of a run
//! of filled cells.

use rand::Rng;

use super::grid::CharacterGrid;

/// Probability that a filled cell is redrawn when a previous frame exists.
pub const DEFAULT_REPLACE_CHANCE: f64 = 0.10;

/// Probability that a redrawn cell triggers a word injection.
pub const DEFAULT_WORD_CHANCE: f64 = 0.05;

/// Per-cell mutation probabilities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationPolicy {
    /// Chance to redraw a filled cell that has a previous character.
    pub replace_chance: f64,
    /// Chance to inject a word after a redraw.
    pub word_chance: f64,
}

impl Default for MutationPolicy {
    fn default() -> Self {
        Self {
            replace_chance: DEFAULT_REPLACE_CHANCE,
            word_chance: DEFAULT_WORD_CHANCE,
        }
    }
}

impl MutationPolicy {
    /// Probabilities clamped to [0, 1]; NaN becomes 0.
    fn clamped(&self) -> (f64, f64) {
        let clamp = |p: f64| if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        (clamp(self.replace_chance), clamp(self.word_chance))
    }
}

/// Compose the next frame.
///
/// # Arguments
/// * `grid` - Filled/empty cells for this frame
/// * `letters` - Palette that redrawn characters are drawn from
/// * `words` - Words that may be written over runs of filled cells
/// * `previous` - Text of the previous frame, if there was one
/// * `policy` - Redraw and word-injection probabilities
/// * `rng` - Random source
///
/// # Returns
/// One line per grid row, every line terminated by `'\n'`.
pub fn compose<R: Rng + ?Sized>(
    grid: &CharacterGrid,
    letters: &str,
    words: &[String],
    previous: Option<&str>,
    policy: &MutationPolicy,
    rng: &mut R,
) -> String {
    let (replace_chance, word_chance) = policy.clamped();
    let palette: Vec<char> = letters.chars().collect();
    // Index by cell, not by byte offset, so line breaks are dropped
    let previous: Option<Vec<char>> = previous.map(|t| t.chars().filter(|&c| c != '\n').collect());

    let cols = grid.cols() as usize;
    let mut out = String::with_capacity((cols + 1) * grid.rows() as usize);
    let mut row: Vec<char> = Vec::with_capacity(cols);

    for (y, cells) in grid.row_cells().enumerate() {
        row.clear();
        let mut run_start: Option<usize> = None;

        for (x, &filled) in cells.iter().enumerate() {
            if !filled {
                row.push(' ');
                run_start = None;
                continue;
            }
            let start = *run_start.get_or_insert(x);

            let reused = match &previous {
                Some(prev) if !rng.gen_bool(replace_chance) => prev.get(y * cols + x).copied(),
                _ => None,
            };
            let replaced = reused.is_none();
            row.push(reused.unwrap_or_else(|| draw_letter(&palette, rng)));

            if replaced && !words.is_empty() && rng.gen_bool(word_chance) {
                let word = &words[rng.gen_range(0..words.len())];
                let word_len = word.chars().count();
                if x + 1 - start >= word_len {
                    row.truncate(row.len() - word_len);
                    row.extend(word.chars());
                }
            }
        }

        out.extend(row.iter());
        out.push('\n');
    }

    out
}

fn draw_letter<R: Rng + ?Sized>(palette: &[char], rng: &mut R) -> char {
    if palette.is_empty() {
        return ' ';
    }
    palette[rng.gen_range(0..palette.len())]
}
