use crate::app::App;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io;
use wordsearch_core::{HintState, LeaderboardEntry, Phase, Position, SessionView, CAPACITY};

/// Width of the side panel holding score, found words and leaderboard
const PANEL_WIDTH: u16 = 40;

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide, SetBackgroundColor(app.theme.bg), Clear(ClearType::All))?;
    render_game_screen(stdout, app, term_width, term_height)?;
    execute!(stdout, Show)?;
    Ok(())
}

fn render_game_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let view = app.session.view();
    let size = view.grid.size() as u16;

    // Each tile is "| X " plus a closing border
    let grid_width = size * 4 + 1;
    let grid_height = size * 2 + 1;

    let total_width = grid_width + 3 + PANEL_WIDTH;
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = 2;

    render_grid(stdout, app, &view, start_x, start_y)?;
    render_input(stdout, app, start_x, start_y + grid_height + 1)?;

    let panel_x = start_x + grid_width + 3;
    let next_y = render_info_panel(stdout, app, &view, panel_x, start_y)?;
    let next_y = render_found_words(stdout, app, &view, panel_x, next_y + 1)?;
    render_leaderboard(stdout, app, panel_x, next_y + 1)?;

    let controls_y = (start_y + grid_height + 4).max(term_height.saturating_sub(3));
    render_controls(stdout, app, start_x, controls_y)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width)?;
    }

    if let Some(ref name) = app.name_prompt {
        render_name_prompt(stdout, app, name, term_width, term_height)?;
    } else if view.phase == Phase::Ended {
        render_end_overlay(stdout, app, &view, term_width, term_height)?;
    }

    Ok(())
}

fn render_grid(
    stdout: &mut io::Stdout,
    app: &App,
    view: &SessionView<'_>,
    x: u16,
    y: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let size = view.grid.size();
    let separator = format!("+{}", "---+".repeat(size));

    execute!(
        stdout,
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.border),
        MoveTo(x, y),
        Print(&separator)
    )?;

    for (row, letters) in view.grid.rows().enumerate() {
        let cell_y = y + 1 + row as u16 * 2;
        execute!(stdout, MoveTo(x, cell_y))?;

        for (col, letter) in letters.iter().enumerate() {
            let pos = Position::new(row, col);
            // Typed trail wins over the hint so the player sees their own path
            let bg = if app.is_typed(pos) {
                theme.typed_bg
            } else if app.is_hinted(pos) {
                theme.hint_bg
            } else {
                theme.bg
            };
            let fg = if view.phase == Phase::Ended {
                theme.info
            } else {
                theme.letter
            };
            execute!(
                stdout,
                SetBackgroundColor(theme.bg),
                SetForegroundColor(theme.border),
                Print("|"),
                SetBackgroundColor(bg),
                SetForegroundColor(fg),
                Print(format!(" {} ", letter))
            )?;
        }
        execute!(
            stdout,
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.border),
            Print("|"),
            MoveTo(x, cell_y + 1),
            Print(&separator)
        )?;
    }

    Ok(())
}

fn render_input(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let color = if app.input_untraceable() {
        theme.error
    } else {
        theme.fg
    };

    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.info),
        Print("Word: "),
        SetForegroundColor(color),
        Print(&app.input),
        SetForegroundColor(theme.key),
        Print("_")
    )?;

    Ok(())
}

/// Draws title, player, score, time and hint status. Returns the next free row.
fn render_info_panel(
    stdout: &mut io::Stdout,
    app: &App,
    view: &SessionView<'_>,
    x: u16,
    y: u16,
) -> io::Result<u16> {
    let theme = &app.theme;

    execute!(
        stdout,
        SetBackgroundColor(theme.bg),
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("═══ WORD SEARCH ═══"),
        MoveTo(x, y + 2),
        SetForegroundColor(theme.info),
        Print(format!("Player: {:>11}", view.player)),
        MoveTo(x, y + 3),
        Print(format!("Score:  {:>11}", view.score)),
    )?;

    let time_color = if view.remaining_secs <= 10 {
        theme.error
    } else {
        theme.info
    };
    execute!(
        stdout,
        MoveTo(x, y + 4),
        SetForegroundColor(time_color),
        Print(format!("Time:   {:>11}", format_time(view.remaining_secs)))
    )?;

    let (hint_text, hint_color) = if view.hint_available {
        ("Hint (1 left)", theme.success)
    } else {
        match view.hint_state {
            HintState::Granted | HintState::Exhausted => ("Hint (0 left)", theme.info),
            HintState::Available => ("Hint unavailable", theme.info),
        }
    };
    execute!(
        stdout,
        MoveTo(x, y + 5),
        SetForegroundColor(hint_color),
        Print(hint_text)
    )?;

    Ok(y + 6)
}

/// Draws the found words with their definitions. Returns the next free row.
fn render_found_words(
    stdout: &mut io::Stdout,
    app: &App,
    view: &SessionView<'_>,
    x: u16,
    y: u16,
) -> io::Result<u16> {
    let theme = &app.theme;

    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.key),
        Print(format!("Found words ({})", view.found.len()))
    )?;

    let mut row = y + 1;
    for found in view.found {
        execute!(
            stdout,
            MoveTo(x, row),
            SetForegroundColor(theme.success),
            Print(&found.word)
        )?;
        row += 1;
        for line in wrap_text(&found.definition, PANEL_WIDTH as usize - 2) {
            execute!(
                stdout,
                MoveTo(x + 2, row),
                SetForegroundColor(theme.info),
                Print(line)
            )?;
            row += 1;
        }
    }

    Ok(row)
}

fn render_leaderboard(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let entries = app.session.leaderboard().top(CAPACITY);

    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.key),
        Print("Leaderboard")
    )?;

    if entries.is_empty() {
        execute!(
            stdout,
            MoveTo(x, y + 1),
            SetForegroundColor(theme.info),
            Print("No scores yet!")
        )?;
        return Ok(());
    }

    for (i, entry) in entries.iter().enumerate() {
        let color = if entry.name == app.session.player() {
            theme.success
        } else {
            theme.fg
        };
        execute!(
            stdout,
            MoveTo(x, y + 1 + i as u16),
            SetForegroundColor(color),
            Print(leaderboard_line(i, entry))
        )?;
    }

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    let controls = [
        ("A-Z", "Type"),
        ("Enter", "Submit"),
        ("Bksp", "Delete"),
        ("Esc", "Clear"),
        ("?/Tab", "Hint"),
        ("Ctrl+R", "Restart"),
        ("Ctrl+C", "Quit"),
    ];

    // Display in columns of 2 items each
    for (i, (key, desc)) in controls.iter().enumerate() {
        let col = i / 2;
        let row = i % 2;
        let cx = x + (col as u16) * 17;
        let cy = y + row as u16;

        execute!(
            stdout,
            MoveTo(cx, cy),
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.key),
            Print(format!("{:>7}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.chars().count() as u16) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(theme.bg),
        SetBackgroundColor(theme.key),
        Print(&padded)
    )?;

    Ok(())
}

fn render_end_overlay(
    stdout: &mut io::Stdout,
    app: &App,
    view: &SessionView<'_>,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let final_score = app.result.map_or(view.score, |r| r.final_score);
    let recorded = app.result.is_some_and(|r| r.recorded);

    let mut lines = vec![
        ("Time's up!".to_string(), theme.key),
        (String::new(), theme.fg),
        (format!("Final Score: {}", final_score), theme.fg),
        (format!("Words found: {}", view.found.len()), theme.fg),
    ];
    if recorded {
        lines.push(("New best on the leaderboard!".to_string(), theme.success));
    }
    lines.push((String::new(), theme.fg));
    lines.push(("Enter: play again   q: quit".to_string(), theme.info));

    let box_width: u16 = 34;
    let box_height = lines.len() as u16 + 2;
    let x = term_width.saturating_sub(box_width) / 2;
    let y = term_height.saturating_sub(box_height) / 2;

    for row in 0..box_height {
        execute!(
            stdout,
            MoveTo(x, y + row),
            SetBackgroundColor(theme.typed_bg),
            Print(" ".repeat(box_width as usize))
        )?;
    }

    for (i, (line, color)) in lines.iter().enumerate() {
        let offset = (box_width as usize).saturating_sub(line.chars().count()) / 2;
        execute!(
            stdout,
            MoveTo(x + offset as u16, y + 1 + i as u16),
            SetBackgroundColor(theme.typed_bg),
            SetForegroundColor(*color),
            Print(line)
        )?;
    }

    Ok(())
}

fn render_name_prompt(
    stdout: &mut io::Stdout,
    app: &App,
    name: &str,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let box_width: u16 = 34;
    let box_height: u16 = 7;
    let x = term_width.saturating_sub(box_width) / 2;
    let y = term_height.saturating_sub(box_height) / 2;

    for row in 0..box_height {
        execute!(
            stdout,
            MoveTo(x, y + row),
            SetBackgroundColor(theme.typed_bg),
            Print(" ".repeat(box_width as usize))
        )?;
    }

    execute!(
        stdout,
        MoveTo(x + 2, y + 1),
        SetForegroundColor(theme.key),
        Print("Who is playing next?"),
        MoveTo(x + 2, y + 3),
        SetForegroundColor(theme.fg),
        Print(format!("Name: {}_", name)),
        MoveTo(x + 2, y + 5),
        SetForegroundColor(theme.info),
        Print("Enter: start   Esc: keep name")
    )?;

    Ok(())
}

// Helpers

/// "m:ss" countdown display
fn format_time(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// One leaderboard row; the top three get medals
fn leaderboard_line(index: usize, entry: &LeaderboardEntry) -> String {
    let medal = match index {
        0 => "🥇",
        1 => "🥈",
        2 => "🥉",
        _ => "  ",
    };
    format!("{} {}: {}", medal, entry.name, entry.score)
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_width && !current.is_empty() {
            lines.push(current);
            current = String::new();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(120), "2:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(0), "0:00");
    }

    #[test]
    fn test_leaderboard_medals() {
        let entry = LeaderboardEntry::new("Ann", 30);
        assert_eq!(leaderboard_line(0, &entry), "🥇 Ann: 30");
        assert_eq!(leaderboard_line(2, &entry), "🥉 Ann: 30");
        assert_eq!(leaderboard_line(4, &entry), "   Ann: 30");
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("A small domesticated carnivorous mammal", 16);
        assert_eq!(lines, vec!["A small", "domesticated", "carnivorous", "mammal"]);
        assert!(wrap_text("", 10).is_empty());
    }
}
