use std::{fmt::Display, io::stdout, sync::mpsc::Receiver};

use crate::gui::error::PenGuiError;
use crate::pipeline::PredictionEvent;

use crossterm::{
    event::{self, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{
        block::{Position, Title},
        *,
    },
    Terminal,
};

/// Renders predictions as they come off the pipeline's bounded queue,
/// newest at the bottom, until the user presses a key. The pipeline keeps
/// running while this blocks; the queue's back-pressure is the only
/// coupling. Returns every line that was displayed.
pub fn prediction_feed<T: Display>(
    events: Receiver<Vec<PredictionEvent<T>>>,
    visible_rows: usize,
) -> Result<Vec<String>, PenGuiError> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let mut history: Vec<String> = Vec::new();
    loop {
        while let Ok(batch) = events.try_recv() {
            for event in batch {
                let expected = event.expected.as_deref().unwrap_or("?");
                history.push(format!(
                    "[{}] => {}  (writing: {})",
                    event.at.format("%H:%M:%S%.3f"),
                    event.result,
                    expected
                ));
            }
        }

        let title = Title::from(" Live Predictions ".magenta().bold());
        let instructions = Title::from(Line::from(vec![
            " Stop ".into(),
            "<Any Key> ".magenta().bold(),
        ]));
        let block = Block::default()
            .title(title.alignment(Alignment::Center))
            .title(
                instructions
                    .alignment(Alignment::Center)
                    .position(Position::Bottom),
            )
            .borders(Borders::ALL);
        let first_visible = history.len().saturating_sub(visible_rows);
        let list = List::new(history[first_visible..].iter().map(|s| s.as_str()))
            .style(Style::default().fg(Color::White))
            .block(block);
        terminal.draw(|frame| {
            let area = frame.size();
            frame.render_widget(list, area);
        })?;

        if event::poll(std::time::Duration::from_millis(16))? {
            if let event::Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    break;
                }
            }
        }
    }

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(history)
}
