//! Render projection — model state to style values.
//!
//! Pure functions from intensities and distributions to colors. Nothing
//! here touches a display; frontends (or the CLI) project these styles
//! onto whatever surface they own.

use serde::{Deserialize, Serialize};

/// Opaque color channelled as plain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Color with an opacity channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};
const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Accent color for the winning class label.
pub const ACCENT: Rgb = Rgb {
    r: 95,
    g: 191,
    b: 255,
};

/// Style of one class row: the bar shade plus the digit label colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityStyle {
    /// Gray bar fill, darker for higher probability.
    pub bar: Rgb,
    /// Digit text color.
    pub label: Rgb,
    /// Fill behind the digit text.
    pub label_fill: Rgba,
    /// Whether this row is the highlighted maximum.
    pub highlighted: bool,
}

/// Board cell fill: black at the cell's intensity.
pub fn cell_shade(intensity: f32) -> Rgba {
    Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: intensity,
    }
}

/// Index of the maximum probability, first occurrence winning ties.
///
/// An all-zero distribution has no maximum: nothing is highlighted until
/// the peer has actually said something.
pub fn max_index(probabilities: &[f32]) -> Option<usize> {
    if probabilities.iter().all(|&p| p == 0.0) {
        return None;
    }
    let mut best = 0;
    let mut best_p = f32::NEG_INFINITY;
    for (i, &p) in probabilities.iter().enumerate() {
        if p > best_p {
            best = i;
            best_p = p;
        }
    }
    Some(best)
}

fn inverse_gray(value: f32) -> Rgb {
    let channel = ((1.0 - value) * 255.0).round() as u8;
    Rgb {
        r: channel,
        g: channel,
        b: channel,
    }
}

/// Styles for the class-probability rows. The maximum index gets white
/// text on the accent color, with the probability itself as the opacity;
/// every other row shades gray proportional to `1 - p`.
pub fn probability_styles(probabilities: &[f32]) -> Vec<ProbabilityStyle> {
    let max = max_index(probabilities);
    probabilities
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let highlighted = max == Some(i);
            ProbabilityStyle {
                bar: inverse_gray(p),
                label: if highlighted { WHITE } else { BLACK },
                label_fill: if highlighted {
                    Rgba {
                        r: ACCENT.r,
                        g: ACCENT.g,
                        b: ACCENT.b,
                        a: p,
                    }
                } else {
                    Rgba {
                        r: 255,
                        g: 255,
                        b: 255,
                        a: 1.0,
                    }
                },
                highlighted,
            }
        })
        .collect()
}

/// Gray shades for the hidden-layer activation strip, one per unit.
pub fn weight_styles(weights: &[f32]) -> Vec<Rgb> {
    weights.iter().map(|&w| inverse_gray(w)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_index_picks_maximum() {
        let probs = [0.1, 0.05, 0.9, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(max_index(&probs), Some(2));
    }

    #[test]
    fn test_max_index_all_zero_has_no_maximum() {
        assert_eq!(max_index(&[0.0; 10]), None);
        assert_eq!(max_index(&[]), None);
    }

    #[test]
    fn test_max_index_tie_break_first_occurrence() {
        let probs = [0.0, 0.4, 0.4, 0.2];
        assert_eq!(max_index(&probs), Some(1));
    }

    #[test]
    fn test_probability_styles_highlight() {
        let probs = [0.1, 0.05, 0.9, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let styles = probability_styles(&probs);

        let winner = &styles[2];
        assert!(winner.highlighted);
        assert_eq!(winner.label, WHITE);
        assert_eq!(winner.label_fill.r, ACCENT.r);
        assert!((winner.label_fill.a - 0.9).abs() < f32::EPSILON);

        let loser = &styles[0];
        assert!(!loser.highlighted);
        assert_eq!(loser.label, BLACK);
        // bar gray = round((1 - 0.1) * 255)
        assert_eq!(loser.bar.r, 230);
    }

    #[test]
    fn test_probability_styles_all_zero_highlights_nothing() {
        let styles = probability_styles(&[0.0; 10]);
        assert!(styles.iter().all(|s| !s.highlighted));
        // every bar is fully light
        assert!(styles.iter().all(|s| s.bar.r == 255));
    }

    #[test]
    fn test_cell_shade_tracks_intensity() {
        let shade = cell_shade(0.5);
        assert_eq!((shade.r, shade.g, shade.b), (0, 0, 0));
        assert!((shade.a - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_weight_styles_shading() {
        let styles = weight_styles(&[0.0, 1.0, 0.5]);
        assert_eq!(styles[0].r, 255);
        assert_eq!(styles[1].r, 0);
        assert_eq!(styles[2].r, 128);
    }
}
