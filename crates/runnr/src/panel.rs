use log::{debug, warn};
use runnr_client::MarketError;

pub const CHART_FAILURE: &str = "Unable to load chart data";
pub const WATCHLIST_FAILURE: &str = "Unable to load watchlist data";
pub const SCANNER_FAILURE: &str = "Unable to load scanner data";

/// Proof of which fetch a result belongs to.
///
/// Handed out when a panel starts fetching and travels with the request; the
/// panel only accepts a result whose ticket is still its current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum PanelState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(&'static str),
}

/// One independently-fetching area of the dashboard.
///
/// Every new fetch, and closing the panel, bumps the generation, so responses to
/// superseded requests are dropped when they arrive. The requests themselves are
/// left to finish.
#[derive(Debug)]
pub struct Panel<T> {
    name: &'static str,
    failure: &'static str,
    generation: u64,
    closed: bool,
    state: PanelState<T>,
}

impl<T> Panel<T> {
    pub fn new(name: &'static str, failure: &'static str) -> Self {
        Self {
            name,
            failure,
            generation: 0,
            closed: false,
            state: PanelState::Idle,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> &PanelState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PanelState::Loading)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        !self.closed && ticket.0 == self.generation
    }

    /// Start a fetch, superseding any still outstanding.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.state = PanelState::Loading;
        Ticket(self.generation)
    }

    /// Apply a fetch result if `ticket` is still current. Returns whether it was
    /// applied.
    pub fn settle(&mut self, ticket: Ticket, result: Result<T, MarketError>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "{} panel discarding stale response (generation {} < {})",
                self.name, ticket.0, self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(data) => PanelState::Ready(data),
            Err(e) => {
                warn!("{} panel fetch failed: {e}", self.name);
                PanelState::Failed(self.failure)
            }
        };
        true
    }

    /// Tear the panel down; anything still in flight is ignored when it lands.
    pub fn close(&mut self) {
        self.generation += 1;
        self.closed = true;
        self.state = PanelState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> Panel<u32> {
        Panel::new("chart", CHART_FAILURE)
    }

    #[test]
    fn starts_idle_then_loading() {
        let mut panel = panel();
        assert_eq!(panel.state(), &PanelState::Idle);
        panel.begin();
        assert_eq!(panel.state(), &PanelState::Loading);
    }

    #[test]
    fn current_result_is_applied() {
        let mut panel = panel();
        let ticket = panel.begin();
        assert!(panel.settle(ticket, Ok(7)));
        assert_eq!(panel.state(), &PanelState::Ready(7));
    }

    #[test]
    fn failure_shows_fixed_message() {
        let mut panel = panel();
        let ticket = panel.begin();
        assert!(panel.settle(ticket, Err(MarketError::unavailable("500"))));
        assert_eq!(panel.state(), &PanelState::Failed("Unable to load chart data"));
    }

    #[test]
    fn last_triggered_fetch_wins() {
        let mut panel = panel();
        let first = panel.begin();
        let second = panel.begin();

        // the newer request lands first, then the stale one straggles in
        assert!(panel.settle(second, Ok(2)));
        assert!(!panel.settle(first, Ok(1)));
        assert_eq!(panel.state(), &PanelState::Ready(2));
    }

    #[test]
    fn stale_result_does_not_end_loading() {
        let mut panel = panel();
        let first = panel.begin();
        let _second = panel.begin();
        assert!(!panel.settle(first, Ok(1)));
        assert_eq!(panel.state(), &PanelState::Loading);
    }

    #[test]
    fn closed_panel_ignores_everything() {
        let mut panel = panel();
        let ticket = panel.begin();
        panel.close();
        assert!(!panel.settle(ticket, Ok(1)));
        assert_eq!(panel.state(), &PanelState::Idle);
    }
}
