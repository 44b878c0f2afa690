//! Reborn Clicker rendering.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::ClickableList;

use super::actions::*;
use super::logic::{self, format_number, EngineView};
use super::ClickerGame;

pub fn render(game: &ClickerGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let view = logic::view(&game.state);

    // Log panel on the right when wide enough
    let (main_area, log_area) = if area.width >= 80 {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        (h_chunks[0], Some(h_chunks[1]))
    } else {
        (area, None)
    };

    let tracks_height = view.tracks.len() as u16 + 2;
    let reborn_height = if game.confirm_reborn { 5 } else { 4 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),             // stats
            Constraint::Length(5),             // click button
            Constraint::Length(tracks_height), // upgrade tracks
            Constraint::Length(reborn_height), // reborn
            Constraint::Min(0),                // log (narrow) or spacer
        ])
        .split(main_area);

    render_stats(&view, f, chunks[0]);
    render_click_button(game, f, chunks[1], click_state);
    render_tracks(game, &view, is_narrow_layout(area.width), f, chunks[2], click_state);
    render_reborn(game, &view, f, chunks[3], click_state);

    match log_area {
        Some(log_area) => render_log(game, f, log_area),
        None if chunks[4].height >= 3 => render_log(game, f, chunks[4]),
        None => {}
    }
}

fn render_stats(view: &EngineView, f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled("ポイント: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format_number(view.points.floor()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("クリック: ", Style::default().fg(Color::Gray)),
            Span::styled(format_number(view.click_power), Style::default().fg(Color::White)),
            Span::styled("  毎秒: ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{:.1}", view.per_second), Style::default().fg(Color::Green)),
            Span::styled(
                format!("  x{:.1}", view.multiplier),
                Style::default().fg(Color::Magenta),
            ),
        ]),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Reborn Clicker "),
    );
    f.render_widget(widget, area);
}

fn render_click_button(
    game: &ClickerGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let pressed = game.click_flash > 0;
    let button_style = if pressed {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    };

    let floating = if pressed {
        format!("+{}", format_number(game.last_click))
    } else {
        String::new()
    };

    let lines = vec![
        Line::from(Span::styled("  [C] クリック！  ", button_style)),
        Line::from(Span::styled(floating, Style::default().fg(Color::LightYellow))),
    ];

    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if pressed { Color::Yellow } else { Color::DarkGray })),
    );
    f.render_widget(widget, area);

    // The whole button block is the hit area
    click_state.borrow_mut().add_click_target(area, CLICK_BUTTON);
}

fn render_tracks(
    game: &ClickerGame,
    view: &EngineView,
    narrow: bool,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    for (i, tv) in view.tracks.iter().enumerate() {
        let flashing = matches!(game.purchase_flash, Some((t, _)) if t == tv.track);
        let (key_style, text_style) = if flashing {
            (
                Style::default().fg(Color::Black).bg(Color::Green),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )
        } else if tv.affordable {
            (
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::White),
            )
        } else {
            (
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::DarkGray),
            )
        };

        let mut spans = vec![
            Span::styled(format!(" [{}] ", tv.track.key()), key_style),
            Span::styled(format!("{:<12} Lv.{:<3} ", tv.track.name(), tv.level), text_style),
        ];
        // Narrow screens drop the effect column
        if !narrow {
            spans.push(Span::styled(format!("{:<9}", tv.track.description()), text_style));
        }
        spans.push(Span::styled(format!("{}pt", format_number(tv.cost)), text_style));
        let line = Line::from(spans);
        cl.push_clickable(line, BUY_TRACK_BASE + i as u16);
    }

    let border_color = if game.error_flash > 0 { Color::Red } else { Color::Cyan };
    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1);
    }
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" アップグレード "),
    );
    f.render_widget(widget, area);
}

fn render_reborn(
    game: &ClickerGame,
    view: &EngineView,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::styled(format!(" 転生 {}回 ", view.reborn_count), Style::default().fg(Color::Gray)),
        Span::styled(
            format!("x{:.1} → x{:.1}", view.multiplier, view.next_multiplier),
            Style::default().fg(Color::Magenta),
        ),
    ]));

    if game.confirm_reborn {
        let warn = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
        cl.push_clickable(Line::from(Span::styled(" [Y] 転生する（全ての強化がリセット）", warn)), REBORN_CONFIRM);
        cl.push_clickable(Line::from(Span::styled(" [N] やめる", Style::default().fg(Color::White))), REBORN_CANCEL);
    } else {
        let style = if view.can_reborn {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let label = format!(" [R] 転生 ({}pt)", format_number(view.reborn_cost));
        cl.push_clickable(Line::from(Span::styled(label, style)), REBORN_REQUEST);
    }

    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1);
    }
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(" 転生 "),
    );
    f.render_widget(widget, area);
}

fn render_log(game: &ClickerGame, f: &mut Frame, area: Rect) {
    let visible_height = area.height.saturating_sub(2) as usize;
    let start = game.log.len().saturating_sub(visible_height);

    let log_lines: Vec<Line> = game.log[start..]
        .iter()
        .map(|entry| {
            let style = if entry.is_important {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let widget = Paragraph::new(log_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" ログ "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}
