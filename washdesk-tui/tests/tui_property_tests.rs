use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use proptest::prelude::*;
use ratatui::{backend::TestBackend, Terminal};
use tokio::sync::mpsc;
use washdesk_client::ApiClient;
use washdesk_core::{BookingStatus, EnquiryStatus};
use washdesk_tui::config::{AuthConfig, ConfigError, ThemeConfig, TuiConfig};
use washdesk_tui::keys::{map_key, Action};
use washdesk_tui::nav::View;
use washdesk_tui::persistence::{self, PersistedState};
use washdesk_tui::state::App;
use washdesk_tui::theme::{booking_status_color, enquiry_status_color, SynthBruteTheme};
use washdesk_tui::views::render_view;

fn base_config() -> TuiConfig {
    TuiConfig {
        api_base_url: "http://localhost:4000/api".to_string(),
        auth: AuthConfig {
            api_key: Some("test-key".to_string()),
            jwt: None,
        },
        request_timeout_ms: 5_000,
        tick_interval_ms: 250,
        page_size: 10,
        persistence_path: "tmp/washdesk.json".into(),
        log_path: "tmp/washdesk.log".into(),
        export_dir: "tmp/exports".into(),
        currency_code: "AED".to_string(),
        theme: ThemeConfig {
            name: "synthbrute".to_string(),
        },
    }
}

fn invalid_field(result: Result<(), ConfigError>) -> &'static str {
    match result {
        Err(ConfigError::InvalidValue { field, .. }) => field,
        other => panic!("expected InvalidValue, got {:?}", other),
    }
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn config_base_is_valid() {
    assert!(base_config().validate().is_ok());
}

#[test]
fn config_requires_auth() {
    let mut config = base_config();
    config.auth = AuthConfig {
        api_key: None,
        jwt: None,
    };
    assert_eq!(invalid_field(config.validate()), "auth");
}

#[test]
fn config_requires_http_scheme() {
    let mut config = base_config();
    config.api_base_url = "localhost:4000".to_string();
    assert_eq!(invalid_field(config.validate()), "api_base_url");
}

#[test]
fn config_requires_theme_name() {
    let mut config = base_config();
    config.theme = ThemeConfig {
        name: "unknown".to_string(),
    };
    assert_eq!(invalid_field(config.validate()), "theme.name");
}

#[test]
fn config_rest_settings_carry_auth() {
    let mut config = base_config();
    config.auth.jwt = Some("token".to_string());
    let rest = config.rest_config();
    assert_eq!(rest.base_url, "http://localhost:4000/api");
    assert_eq!(rest.api_key.as_deref(), Some("test-key"));
    assert_eq!(rest.bearer_token.as_deref(), Some("token"));
}

proptest! {
    #[test]
    fn config_page_size_bounds(size in 0u32..400) {
        let mut config = base_config();
        config.page_size = size;
        prop_assert_eq!(config.validate().is_ok(), (1..=200).contains(&size));
    }

    #[test]
    fn config_currency_code_must_be_three_chars(code in "[A-Z]{0,5}") {
        let mut config = base_config();
        config.currency_code = code.clone();
        prop_assert_eq!(config.validate().is_ok(), code.len() == 3);
    }
}

// ============================================================================
// Keybindings
// ============================================================================

proptest! {
    #[test]
    fn keybinding_digit_switches_view(digit in 0u8..=9u8) {
        let ch = char::from(b'0' + digit);
        let expected = match ch {
            '1'..='5' => Some(Action::SwitchView(ch as usize - '1' as usize)),
            _ => None,
        };
        prop_assert_eq!(map_key(press(KeyCode::Char(ch))), expected);
    }

    #[test]
    fn keybinding_switch_targets_exist(digit in 1u8..=5u8) {
        let ch = char::from(b'0' + digit);
        if let Some(Action::SwitchView(index)) = map_key(press(KeyCode::Char(ch))) {
            prop_assert!(View::from_index(index).is_some());
        } else {
            prop_assert!(false, "digit {} not mapped", ch);
        }
    }

    #[test]
    fn view_next_then_previous_is_identity(index in 0usize..5) {
        let view = View::from_index(index).unwrap();
        prop_assert_eq!(view.next().previous(), view);
    }
}

#[test]
fn keybinding_page_keys() {
    assert_eq!(map_key(press(KeyCode::Char(']'))), Some(Action::NextPage));
    assert_eq!(map_key(press(KeyCode::PageUp)), Some(Action::PrevPage));
}

// ============================================================================
// Theme and persistence
// ============================================================================

#[test]
fn status_colors_are_distinct() {
    let theme = SynthBruteTheme::synthbrute();
    let bookings: Vec<_> = BookingStatus::all()
        .iter()
        .map(|s| booking_status_color(*s, &theme))
        .collect();
    assert_ne!(bookings[0], bookings[1]);
    assert_ne!(bookings[1], bookings[2]);
    assert_ne!(
        enquiry_status_color(EnquiryStatus::Pending, &theme),
        enquiry_status_color(EnquiryStatus::Completed, &theme)
    );
}

proptest! {
    #[test]
    fn persisted_state_survives_save(index in 0usize..5, show_currency in any::<bool>()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("state.json");
        let state = PersistedState {
            active_view: View::from_index(index).unwrap(),
            show_currency,
        };
        persistence::save(&path, &state).unwrap();
        prop_assert_eq!(persistence::load(&path).unwrap(), Some(state));
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    buffer.content().iter().map(|cell| cell.symbol()).collect()
}

#[test]
fn render_shows_tabs_and_empty_hint() {
    let config = base_config();
    let api = ApiClient::new(&config.rest_config()).unwrap();
    let (tx, _rx) = mpsc::channel(8);
    let mut app = App::new(config, api, tx);
    app.show_currency = true;

    let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
    terminal.draw(|f| render_view(f, &app)).unwrap();
    let text = buffer_text(&terminal);
    assert!(text.contains("WASHDESK"));
    assert!(text.contains("5 Attendance"));
    assert!(text.contains("No location selected"));
    assert!(text.contains("[AED]"));
}
