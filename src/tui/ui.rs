use crate::backend::Control;
use crate::core::monitor::MonitorView;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{LibraryOverlay, NowPlaying, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0)]);
    let [title_area, main_area] = layout.areas(frame.area());

    let degraded = matches!(
        app.monitor.view(),
        MonitorView::Showing { degraded: true, .. }
    );
    TitleBar::new(
        app.backend.name().to_string(),
        app.status_message.clone(),
        degraded,
    )
    .render(frame, title_area);

    NowPlaying {
        view: app.monitor.view(),
        updated_at: app.monitor.updated_at(),
        transport_busy: app.monitor.is_busy(Control::Transport),
        refreshing: app.monitor.is_stale(),
        command_failure: app.monitor.command_failure(),
    }
    .render(frame, main_area);

    if app.navigator.is_open() {
        tui.library.sync(&app.navigator);
        LibraryOverlay::new(&app.navigator, &mut tui.library).render(frame, main_area);
    }
}
