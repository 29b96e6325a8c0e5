// src/views/player_box.rs

use crate::defs::{paint, Colors};
use crate::game_view::PlayerPanel;

pub fn render(panel: &PlayerPanel) -> String {
    let mut text = format!("{}: {}", panel.label, panel.name);
    if panel.highlight {
        text.push_str(" (you)");
    }
    if panel.winner {
        text.push_str(" - winner");
    } else if panel.active {
        text.push_str(" <");
    }
    let text = if panel.winner {
        paint(Colors::yellow(), &text)
    } else if panel.is_waiting() {
        paint(Colors::dim(), &text)
    } else if panel.active {
        paint(Colors::green(), &text)
    } else {
        text
    };
    format!("[ {text} ]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::plain;

    fn panel(name: &str, active: bool, winner: bool, highlight: bool) -> PlayerPanel {
        PlayerPanel { label: "Player X", name: name.into(), active, winner, highlight }
    }

    #[test]
    fn test_player_box_text() {
        assert_eq!(plain(&render(&panel("ann", true, false, true))), "[ Player X: ann (you) < ]");
        assert_eq!(plain(&render(&panel("ann", true, true, false))), "[ Player X: ann - winner ]");
        assert_eq!(plain(&render(&panel("waiting", false, false, false))), "[ Player X: waiting ]");
    }
}
