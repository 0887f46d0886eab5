use iced::{
    Color, Element, Length, Theme, border,
    widget::{Column, button, column, container, container::Style, progress_bar, row, scrollable, text},
};
use iced_widget::container::bordered_box;

use crate::charts::{ChartColor, Dashboard};
use crate::render::{ChatBubble, ConversationPanel, Speaker};
use crate::state::Tab;

pub fn chart_color(color: ChartColor) -> Color {
    match color {
        ChartColor::Red => Color::from_rgb8(0xd6, 0x28, 0x28),
        ChartColor::Orange => Color::from_rgb8(0xf7, 0x7f, 0x00),
        ChartColor::Yellow => Color::from_rgb8(0xe9, 0xc4, 0x6a),
        ChartColor::Green => Color::from_rgb8(0x2a, 0x9d, 0x8f),
        ChartColor::Blue => Color::from_rgb8(0x45, 0x7b, 0x9d),
        ChartColor::Gray => Color::from_rgb8(0x8d, 0x99, 0xae),
    }
}

fn darken(theme: &Theme) -> Color {
    let mut color_rgba = theme.palette().background.into_rgba8();
    color_rgba[0] /= 2;
    color_rgba[1] /= 2;
    color_rgba[2] /= 2;
    Color::from_rgb8(color_rgba[0], color_rgba[1], color_rgba[2])
}

impl Tab {
    fn style(self, selected: Self) -> impl Fn(&Theme) -> Style {
        move |theme: &Theme| {
            let style = bordered_box(theme).border(border::width(2));
            if self == selected {
                style.background(darken(theme))
            } else {
                style.background(theme.palette().background)
            }
        }
    }
}

/// Page frame: a title bar with tabs above the main content.
pub fn layout<'a, Message>(
    header: impl Into<Element<'a, Message>>,
    tabs: impl Into<Element<'a, Message>>,
    main_content: impl Into<Element<'a, Message>>,
) -> Element<'a, Message>
where
    Message: 'a,
{
    container(column![
        container(header.into()).padding(10),
        tabs.into(),
        container(main_content.into())
            .height(Length::Fill)
            .padding(10),
    ])
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

pub fn tab_bar<'a, Message>(selected: Tab, on_select: impl Fn(Tab) -> Message) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let tabs = Tab::ALL.into_iter().map(|tab| {
        container(button(text(tab.label())).on_press(on_select(tab)))
            .style(tab.style(selected))
            .padding(5)
            .into()
    });
    row(tabs).spacing(10).into()
}

pub fn errors<'a, Message: 'a>(errors: &'a [String]) -> Element<'a, Message> {
    Column::with_children(errors.iter().map(|error| {
        text(error.as_str())
            .color(chart_color(ChartColor::Red))
            .into()
    }))
    .spacing(5)
    .into()
}

pub fn chat_bubble<'a, Message: 'a>(bubble: &'a ChatBubble) -> Element<'a, Message> {
    let who = match bubble.speaker {
        Speaker::User => "You",
        Speaker::Assistant => "Assistant",
    };
    let body = container(column![
        text(who).size(12),
        text(bubble.text.as_str()),
        text(bubble.timestamp.as_str()).size(10),
    ])
    .style(bordered_box)
    .padding(10)
    .max_width(600);

    match bubble.speaker {
        Speaker::User => container(body).align_right(Length::Fill).into(),
        Speaker::Assistant => container(body).align_left(Length::Fill).into(),
    }
}

/// Heading, notices and bubbles of a conversation. The input box is left to
/// the caller since only writable panels get one.
pub fn conversation<'a, Message: 'a>(panel: &'a ConversationPanel) -> Element<'a, Message> {
    let mut content = column![text(panel.heading()).size(24)].spacing(10);
    let empty_notice = match panel {
        ConversationPanel::Active { empty_notice, .. } => *empty_notice,
        ConversationPanel::ReadOnly {
            notice,
            empty_notice,
            ..
        } => {
            content = content.push(text(*notice).color(chart_color(ChartColor::Blue)));
            *empty_notice
        }
    };
    if let Some(notice) = empty_notice {
        content = content.push(text(notice));
    }
    let bubbles = Column::with_children(panel.bubbles().iter().map(|bubble| chat_bubble(bubble))).spacing(8);
    content
        .push(scrollable(bubbles).height(Length::Fill))
        .into()
}

fn section<'a, Message: 'a>(
    title: &'a str,
    body: impl Into<Element<'a, Message>>,
) -> Element<'a, Message> {
    container(column![text(title).size(18), body.into()].spacing(8))
        .style(bordered_box)
        .padding(10)
        .width(Length::Fill)
        .into()
}

pub fn dashboard<'a, Message: 'a>(dashboard: &'a Dashboard) -> Element<'a, Message> {
    let health = &dashboard.health;
    let band = health
        .bands
        .iter()
        .find(|band| health.value < band.to)
        .or(health.bands.last())
        .map_or(ChartColor::Gray, |band| band.color);
    let gauge = column![
        text(format!("{}%", health.value))
            .size(32)
            .color(chart_color(band)),
        progress_bar(0.0..=100.0, f32::from(health.value)),
    ]
    .spacing(5);

    let status = &dashboard.status;
    let summary = column![
        text(format!("Schedule: {}", status.schedule)),
        text(format!("Resources: {}", status.resources)),
        text(format!("Budget: {}", status.budget)),
        text(format!("Completion: {:.0}%", status.completion_pct)),
        text(status.executive_summary.as_str()),
    ]
    .spacing(4);

    let total: u32 = dashboard.breakdown.slices.iter().map(|slice| slice.count).sum();
    let breakdown = Column::with_children(dashboard.breakdown.slices.iter().map(|slice| {
        row![
            text(slice.label.as_str()).width(Length::FillPortion(1)),
            container(progress_bar(0.0..=total.max(1) as f32, slice.count as f32))
                .width(Length::FillPortion(2)),
            text(slice.count.to_string()),
        ]
        .spacing(10)
        .into()
    }))
    .spacing(4);

    let scatter = Column::with_children(dashboard.scatter.points.iter().map(|point| {
        text(format!(
            "{}  ({} {:.2}, {} {:.2})",
            point.label,
            dashboard.scatter.x_axis.title,
            point.x,
            dashboard.scatter.y_axis.title,
            point.y
        ))
        .color(chart_color(point.color))
        .into()
    }))
    .spacing(4);

    let trend = Column::with_children(dashboard.trend.series.iter().map(|series| {
        let values: Vec<String> = series.values.iter().map(u32::to_string).collect();
        text(format!("{}: {}", series.name, values.join(" → ")))
            .color(chart_color(series.color))
            .into()
    }))
    .spacing(4);

    let timeline = Column::with_children(dashboard.timeline.bars.iter().map(|bar| {
        text(format!("{}: {} to {}", bar.name, bar.start, bar.end))
            .color(chart_color(bar.color))
            .into()
    }))
    .spacing(4);

    let risks = Column::with_children(dashboard.risks.iter().map(|risk| {
        row![
            text(risk.severity.as_str())
                .color(chart_color(risk.severity.color()))
                .width(Length::FillPortion(1)),
            text(risk.factor.as_str()).width(Length::FillPortion(2)),
            text(risk.description.as_str()).width(Length::FillPortion(4)),
            text(format!("{:.0}%", risk.probability * 100.0)).width(Length::FillPortion(1)),
        ]
        .spacing(10)
        .into()
    }))
    .spacing(4);

    let mitigations = Column::with_children(dashboard.mitigations.iter().map(|mitigation| {
        let actions = Column::with_children(
            mitigation
                .actions
                .iter()
                .map(|action| text(format!("• {action}")).into()),
        );
        column![
            text(format!("{}: {}", mitigation.factor, mitigation.description))
                .color(chart_color(ChartColor::Red)),
            actions,
        ]
        .spacing(4)
        .into()
    }))
    .spacing(8);

    scrollable(
        column![
            row![
                section(health.title, gauge),
                section("Project Status", summary),
            ]
            .spacing(10),
            row![
                section(dashboard.breakdown.title, breakdown),
                section(dashboard.scatter.title, scatter),
            ]
            .spacing(10),
            section(dashboard.trend.title, trend),
            section(dashboard.timeline.title, timeline),
            section("Identified Risks", risks),
            section("Recommended Mitigations", mitigations),
        ]
        .spacing(10),
    )
    .into()
}
