//! SynthBrute theme and color utilities.

use ratatui::style::Color;
use washdesk_core::{BookingStatus, EnquiryStatus};

#[derive(Debug, Clone)]
pub struct SynthBruteTheme {
    pub bg: Color,
    pub bg_secondary: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub secondary: Color,
    pub secondary_dim: Color,
    pub tertiary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl SynthBruteTheme {
    pub fn synthbrute() -> Self {
        Self {
            bg: Color::Rgb(10, 10, 10),
            bg_secondary: Color::Rgb(26, 26, 26),
            bg_highlight: Color::Rgb(42, 42, 42),
            primary: Color::Rgb(0, 255, 255),
            primary_dim: Color::Rgb(0, 136, 136),
            secondary: Color::Rgb(255, 0, 255),
            secondary_dim: Color::Rgb(136, 0, 136),
            tertiary: Color::Rgb(255, 255, 0),
            success: Color::Rgb(0, 255, 0),
            warning: Color::Rgb(255, 255, 0),
            error: Color::Rgb(255, 0, 0),
            info: Color::Rgb(0, 255, 255),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(136, 136, 136),
            text_muted: Color::Rgb(68, 68, 68),
            border: Color::Rgb(68, 68, 68),
            border_focus: Color::Rgb(0, 255, 255),
        }
    }
}

pub fn booking_status_color(status: BookingStatus, theme: &SynthBruteTheme) -> Color {
    match status {
        BookingStatus::Pending => theme.warning,
        BookingStatus::Accepted => theme.primary,
        BookingStatus::Completed => theme.success,
    }
}

pub fn enquiry_status_color(status: EnquiryStatus, theme: &SynthBruteTheme) -> Color {
    match status {
        EnquiryStatus::Pending => theme.warning,
        EnquiryStatus::Completed => theme.success,
        EnquiryStatus::Cancelled => theme.text_dim,
    }
}

pub fn presence_color(present: bool, theme: &SynthBruteTheme) -> Color {
    if present {
        theme.success
    } else {
        theme.error
    }
}
