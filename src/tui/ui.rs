use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Tab};
use crate::models::VocabularyItem;
use crate::settings::SettingToggle;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0]);

    match (&app.not_ready, app.tab) {
        (_, Tab::Settings) => render_settings(frame, app, chunks[1]),
        (Some(reason), _) => render_not_ready(frame, reason, chunks[1]),
        (None, Tab::Lessons) => render_lessons(frame, app, chunks[1]),
        (None, Tab::Vocabulary) => render_vocabulary(frame, app, chunks[1]),
    }

    render_status(frame, app, chunks[2]);

    if app.search_active {
        render_search_input(frame, app);
    }

    if app.show_help {
        render_help(frame);
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.label())).collect();

    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(
            Block::default()
                .title(" بين يديك · Bayna Yadayk ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}

fn render_not_ready(frame: &mut Frame, reason: &str, area: Rect) {
    let text = format!("База данных недоступна.\n\n{reason}\n\nНажмите 'r', чтобы повторить попытку.");
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red)))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_lessons(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
        .split(area);

    let textbook_title = app
        .selected_textbook()
        .map(|t| match &t.level {
            Some(level) => format!(" {} [{}] ", t.title, level),
            None => format!(" {} ", t.title),
        })
        .unwrap_or_else(|| " Нет учебников ".to_string());

    let items: Vec<ListItem> = app
        .lessons
        .iter()
        .map(|lesson| {
            let subtitle = lesson.subtitle.as_deref().unwrap_or("");
            ListItem::new(vec![
                Line::from(Span::styled(lesson.title.clone(), Style::default().fg(Color::White))),
                Line::from(Span::styled(
                    format!("{subtitle} · {} реплик", lesson.turn_count),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    render_selectable_list(frame, items, &textbook_title, app.lesson_index, columns[0]);

    let word_rows = (app.lesson_words.len() as u16).saturating_add(2);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(word_rows)])
        .split(columns[1]);

    render_dialogue(frame, app, right[0]);
    render_word_list(frame, &app.lesson_words, " Слова урока ", right[1]);
}

fn render_dialogue(frame: &mut Frame, app: &App, area: Rect) {
    let Some(lesson) = app.selected_lesson() else {
        let paragraph = Paragraph::new("Выберите урок")
            .block(Block::default().title(" Диалог ").borders(Borders::ALL));
        frame.render_widget(paragraph, area);
        return;
    };

    let first_speaker = lesson.turns.first().map(|t| t.speaker.as_str());
    let mut lines = Vec::new();
    for turn in &lesson.turns {
        let color = if Some(turn.speaker.as_str()) == first_speaker {
            Color::Cyan
        } else {
            Color::Magenta
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", turn.speaker), Style::default().fg(color)),
            Span::styled(turn.arabic.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]));
        if app.settings.auto_transcription && !turn.transcription.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("   {}", turn.transcription),
                Style::default().fg(Color::Yellow),
            )));
        }
        lines.push(Line::from(Span::styled(
            format!("   {}", turn.russian),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));
    }

    if lines.is_empty() {
        lines.push(Line::from("В этом уроке пока нет диалога"));
    }

    let title = match &lesson.difficulty {
        Some(difficulty) => format!(" Урок {} · {} ", lesson.number, difficulty),
        None => format!(" Урок {} ", lesson.number),
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn word_line(word: &VocabularyItem) -> Line<'static> {
    let mut spans = vec![Span::styled(
        word.arabic.clone(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];
    if let Some(transcription) = &word.transcription {
        spans.push(Span::styled(format!(" [{transcription}]"), Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::raw(format!(" — {}", word.translation_ru)));
    Line::from(spans)
}

fn render_word_list(frame: &mut Frame, words: &[VocabularyItem], title: &str, area: Rect) {
    let items: Vec<ListItem> = words.iter().map(|w| ListItem::new(word_line(w))).collect();
    let list = List::new(items).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    frame.render_widget(list, area);
}

fn render_vocabulary(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(area);

    let category_label = app
        .categories
        .get(app.category_index)
        .map(|c| c.label.as_str())
        .unwrap_or("Все");
    let words = app.visible_words();
    let title = format!(" Словарь [{category_label}] · {} ", words.len());

    let items: Vec<ListItem> = words.iter().map(|w| ListItem::new(word_line(w))).collect();
    render_selectable_list(frame, items, &title, app.word_index, columns[0]);

    let detail = match &app.selected_word {
        Some(word) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    word.arabic.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("Транскрипция: {}", word.transcription.as_deref().unwrap_or("—"))),
                Line::from(format!("Перевод ({}): {}", word.translation_lang, word.translation_ru)),
            ];
            let part_of_speech = word
                .part_of_speech_kind()
                .map(|pos| pos.label().to_string())
                .or_else(|| word.part_of_speech.clone());
            if let Some(part_of_speech) = part_of_speech {
                lines.push(Line::from(format!("Часть речи: {part_of_speech}")));
            }
            if let Some(notes) = &word.notes {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(notes.clone(), Style::default().fg(Color::Gray))));
            }
            lines
        }
        None => vec![Line::from("Ничего не найдено")],
    };

    let paragraph = Paragraph::new(detail)
        .block(
            Block::default()
                .title(" Слово ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, columns[1]);
}

fn render_settings(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = SettingToggle::ALL
        .iter()
        .map(|key| {
            let mark = if key.get(&app.settings) { "[x]" } else { "[ ]" };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{mark} "), Style::default().fg(Color::Yellow)),
                Span::raw(key.label()),
            ]))
        })
        .collect();

    let title = format!(" Настройки · шрифт: {} ", app.settings.arabic_font);
    render_selectable_list(frame, items, &title, app.setting_index, area);
}

fn render_selectable_list(frame: &mut Frame, items: Vec<ListItem>, title: &str, selected: usize, area: Rect) {
    let has_items = !items.is_empty();
    let list = List::new(items)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(has_items.then_some(selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let status = match app.tab {
        _ if !app.is_ready() && app.tab != Tab::Settings => "r:retry  Tab:switch  ?:help  q:quit",
        Tab::Lessons => "j/k:nav  [/]:textbook  t:transcription  Tab:switch  ?:help  q:quit",
        Tab::Vocabulary => "j/k:nav  c:category  /:search  Tab:switch  ?:help  q:quit",
        Tab::Settings => "j/k:nav  Enter:toggle  f:font  Tab:switch  ?:help  q:quit",
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(40)])
        .split(area);

    let paragraph = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, columns[0]);

    if app.is_ready() {
        let counts = app.counts;
        let progress = format!(
            "учебников {} · уроков {} · слов {}",
            counts.textbooks, counts.lessons, counts.vocabulary
        );
        let paragraph = Paragraph::new(progress)
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Right);
        frame.render_widget(paragraph, columns[1]);
    }
}

fn render_search_input(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 20, frame.area());

    let block = Block::default()
        .title(" Поиск: арабский, транскрипция или перевод ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);

    // Clear the area first
    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(block, area);

    let input_text = format!("> {}_", app.search_query);
    let paragraph = Paragraph::new(input_text).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        "",
        " Navigation:",
        "   Tab / 1-3  Switch tab",
        "   j / ↓      Move down",
        "   k / ↑      Move up",
        "   [ / ]      Previous / next textbook",
        "",
        " Actions:",
        "   t          Toggle transcription",
        "   c          Cycle word category",
        "   /          Search words",
        "   Enter      Toggle setting",
        "   f          Cycle Arabic font",
        "   r          Retry opening the database",
        "",
        " General:",
        "   ?          Toggle this help",
        "   q          Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
