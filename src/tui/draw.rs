use ratatui::style::{Color, Modifier, Style};

const LEVELS: [&str; 8] = ["▏", "▎", "▍", "▌", "▋", "▊", "▉", "█"];

/// Horizontal bar of `width` cells filled to `proportion` with eighth-cell resolution.
pub fn share_bar(proportion: f64, width: usize) -> String {
    let eighths = (proportion.clamp(0.0, 1.0) * (width * 8) as f64).round() as usize;
    let full = eighths / 8;
    let rest = eighths % 8;
    let mut bar = "█".repeat(full);
    if rest > 0 {
        bar.push_str(LEVELS[rest - 1]);
    }
    let used = full + usize::from(rest > 0);
    bar + &" ".repeat(width.saturating_sub(used))
}

pub fn dot_color(selected: bool, hovered: bool) -> Color {
    if hovered {
        Color::Yellow
    } else if selected {
        Color::Red
    } else {
        Color::Blue
    }
}

/// Palette cycled across languages in the breakdown.
pub fn language_style(index: usize) -> Style {
    const PALETTE: [Color; 6] = [
        Color::Cyan,
        Color::Green,
        Color::Magenta,
        Color::Yellow,
        Color::LightBlue,
        Color::LightRed,
    ];
    Style::default()
        .fg(PALETTE[index % PALETTE.len()])
        .add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_has_fixed_width() {
        assert_eq!(share_bar(0.0, 4), "    ");
        assert_eq!(share_bar(1.0, 4), "████");
        assert_eq!(share_bar(0.5, 4), "██  ");
        assert_eq!(share_bar(0.25 + 1.0 / 32.0, 4).chars().count(), 4);
    }

    #[test]
    fn hover_wins_over_selection() {
        assert_eq!(dot_color(true, true), Color::Yellow);
        assert_eq!(dot_color(true, false), Color::Red);
        assert_eq!(dot_color(false, false), Color::Blue);
    }
}
