use crate::gui::{Message, SpeakpadApp};
use crate::playback::PlaybackState;
use iced::widget::{button, column, container, pick_list, row, text, text_editor, Space};
use iced::{Alignment, Element, Length};

pub fn view(app: &SpeakpadApp) -> Element<'_, Message> {
    let session = app.session();
    let actions = session.actions();

    let mut content = column![text("Text to Speech Converter").size(28)]
        .spacing(16)
        .align_x(Alignment::Center);

    content = content.push(
        text_editor(&app.editor)
            .placeholder("Enter text here...")
            .on_action(Message::EditText)
            .height(Length::Fixed(160.0)),
    );

    // Voice Selection
    let voices = session.catalog().voices();
    let voice_picker: Element<'_, Message> = if voices.is_empty() {
        text("Waiting for voices...").style(text::secondary).into()
    } else {
        pick_list(
            voices,
            session.catalog().selected_voice().cloned(),
            Message::VoiceSelected,
        )
        .placeholder("Select a voice...")
        .width(Length::Fill)
        .into()
    };
    content = content.push(voice_picker);

    // Playback Controls
    let controls = row![
        button("Convert to Speech")
            .style(button::primary)
            .padding(10)
            .on_press_maybe(actions.speak.then_some(Message::SpeakPressed)),
        button("Pause")
            .style(button::secondary)
            .padding(10)
            .on_press_maybe(actions.pause.then_some(Message::PausePressed)),
        button("Resume")
            .style(button::success)
            .padding(10)
            .on_press_maybe(actions.resume.then_some(Message::ResumePressed)),
        button("Stop")
            .style(button::danger)
            .padding(10)
            .on_press_maybe(actions.stop.then_some(Message::StopPressed)),
    ]
    .spacing(12);
    content = content.push(controls);

    if let Some(notice) = app.notice() {
        content = content.push(
            row![
                text(notice).style(text::danger),
                Space::with_width(10),
                button("Dismiss")
                    .style(button::text)
                    .on_press(Message::DismissNotice),
            ]
            .align_y(Alignment::Center),
        );
    }

    let status = match session.state() {
        PlaybackState::Idle => "Idle",
        PlaybackState::Speaking => "Speaking...",
        PlaybackState::Paused => "Paused",
    };
    content = content.push(
        text(format!(
            "{} · {} · {} wpm",
            status,
            session.controller().engine().name(),
            app.config.speech_rate
        ))
        .size(14)
        .style(text::secondary),
    );

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(20)
        .center_x(Length::Fill)
        .into()
}
