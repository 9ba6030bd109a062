//! Wi-Fi signal indicator: shows the current level as one of five icons
//! and forwards each level to at most one weakly-held observer.
//!
//! Lifecycle:
//! - `attach` / `register_observer` (re)start the upstream subscription.
//! - `detach` clears the observer, then releases the subscription.
//! - `unregister_observer` clears the observer only.
//!
//! The subscription task runs off the UI loop and posts
//! [`Action::SignalDelivered`]; the indicator acts on it in
//! [`Component::update`], ignoring deliveries from any subscription other
//! than its live one.

use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::Line,
    widgets::Paragraph,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace, warn};

use wifibars_core::{
    LevelDelivery, ObserverSlot, SignalLevel, SignalSource, Subscription, SubscriptionId,
    WifiLevel, WifiLevelObserver,
};

use super::icons::{Icon, IconSet, asset_for};
use crate::action::Action;
use crate::component::Component;

pub struct SignalIndicator {
    source: Arc<dyn SignalSource>,
    icons: Arc<IconSet>,
    tint: Option<ratatui::style::Color>,
    observer: ObserverSlot,
    subscription: Option<Subscription>,
    /// Sender onto the UI loop; set by `init`.
    action_tx: Option<UnboundedSender<Action>>,
    displayed: Option<Icon>,
    attached: bool,
}

impl SignalIndicator {
    pub fn new(
        source: Arc<dyn SignalSource>,
        icons: Arc<IconSet>,
        tint: Option<ratatui::style::Color>,
    ) -> Self {
        Self {
            source,
            icons,
            tint,
            observer: ObserverSlot::new(),
            subscription: None,
            action_tx: None,
            displayed: None,
            attached: false,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// The indicator became visible.
    pub fn attach(&mut self) {
        self.attached = true;
        self.start_subscription();
    }

    /// The indicator left the screen. The observer is cleared first so it
    /// cannot be called once this returns.
    pub fn detach(&mut self) {
        self.attached = false;
        self.observer.clear();
        self.release_subscription();
    }

    /// Observe level changes through `observer`, held weakly.
    ///
    /// Restarts the subscription so levels flow even while detached.
    pub fn register_observer<O: WifiLevelObserver + 'static>(&mut self, observer: &Arc<O>) {
        self.observer.register(observer);
        self.start_subscription();
    }

    /// Register `observer` and attach, starting a single subscription.
    pub fn attach_observed<O: WifiLevelObserver + 'static>(&mut self, observer: &Arc<O>) {
        self.observer.register(observer);
        self.attach();
    }

    /// Forget the observer. The subscription keeps running.
    pub fn unregister_observer(&mut self) {
        self.observer.clear();
    }

    /// Release the live subscription, if any. Returns whether one was released.
    pub fn release_subscription(&mut self) -> bool {
        match self.subscription.take() {
            Some(mut subscription) if !subscription.is_released() => subscription.release(),
            _ => false,
        }
    }

    fn start_subscription(&mut self) {
        self.release_subscription();

        let Some(tx) = self.action_tx.clone() else {
            warn!("indicator not initialized; subscription not started");
            return;
        };

        let stream = self.source.observe();
        match Subscription::spawn(stream, move |delivery| {
            tx.send(Action::SignalDelivered(delivery)).is_ok()
        }) {
            Ok(subscription) => {
                debug!(subscription = %subscription.id(), attached = self.attached, "indicator subscribed");
                self.subscription = Some(subscription);
            }
            Err(e) => warn!(error = %e, "could not start signal subscription"),
        }
    }

    // ── Update handling ──────────────────────────────────────────────

    /// Notify the observer, then show the icon for `level`.
    ///
    /// A level whose icon is missing from the set leaves the current icon
    /// on screen.
    pub fn on_level_received(&mut self, level: SignalLevel) {
        self.observer.notify(WifiLevel::from(level));

        let asset = asset_for(level);
        let Some(base) = self.icons.resolve(asset) else {
            debug!(%level, icon = %asset, "icon not in set; keeping current icon");
            return;
        };

        self.displayed = Some(match self.tint {
            Some(color) => base.tinted(color),
            None => base.clone(),
        });
    }

    fn accepts(&self, delivery: &LevelDelivery) -> bool {
        self.subscription.as_ref().is_some_and(|subscription| {
            subscription.id() == delivery.subscription && !subscription.is_released()
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The icon currently on display.
    pub fn displayed(&self) -> Option<&Icon> {
        self.displayed.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn subscription_id(&self) -> Option<SubscriptionId> {
        self.subscription
            .as_ref()
            .filter(|subscription| !subscription.is_released())
            .map(Subscription::id)
    }

    pub fn has_subscription(&self) -> bool {
        self.subscription_id().is_some()
    }

    pub fn observer_registered(&self) -> bool {
        self.observer.is_registered()
    }

    pub fn observer_alive(&self) -> bool {
        self.observer.is_alive()
    }
}

impl Component for SignalIndicator {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SignalDelivered(delivery) = action {
            if self.accepts(delivery) {
                self.on_level_received(delivery.level);
            } else {
                trace!(subscription = %delivery.subscription, "dropping delivery from stale subscription");
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(icon) = &self.displayed else {
            return;
        };
        let widget = Paragraph::new(Line::from(icon.span())).alignment(Alignment::Center);
        frame.render_widget(widget, area);
    }

    fn id(&self) -> &str {
        "signal_indicator"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend, style::Color};
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use wifibars_config::GlyphSettings;
    use wifibars_core::ManualSource;

    use crate::widgets::icons::SignalIcon;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<WifiLevel>>,
    }

    impl Recorder {
        fn seen(&self) -> Vec<WifiLevel> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl WifiLevelObserver for Recorder {
        fn on_level_changed(&self, level: WifiLevel) {
            self.seen.lock().unwrap().push(level);
        }
    }

    struct Harness {
        indicator: SignalIndicator,
        source: ManualSource,
        icons: Arc<IconSet>,
        rx: UnboundedReceiver<Action>,
    }

    impl Harness {
        fn new(tint: Option<Color>) -> Self {
            Self::with_icons(Arc::new(IconSet::builtin()), ManualSource::new(), tint)
        }

        fn with_icons(icons: Arc<IconSet>, source: ManualSource, tint: Option<Color>) -> Self {
            let mut indicator =
                SignalIndicator::new(Arc::new(source.clone()), Arc::clone(&icons), tint);
            let (tx, rx) = mpsc::unbounded_channel();
            indicator.init(tx).unwrap();
            Self {
                indicator,
                source,
                icons,
                rx,
            }
        }

        /// Emit upstream and run the resulting delivery through the UI side.
        async fn emit(&mut self, level: SignalLevel) {
            self.source.emit(level);
            self.pump().await;
        }

        async fn pump(&mut self) {
            let action = self.rx.recv().await.unwrap();
            self.indicator.update(&action).unwrap();
        }

        fn base(&self, icon: SignalIcon) -> Icon {
            self.icons.resolve(icon).unwrap().clone()
        }
    }

    #[tokio::test]
    async fn untinted_fair_shows_two_bar_icon() {
        let mut h = Harness::new(None);
        h.indicator.attach();
        h.emit(SignalLevel::FAIR).await;

        assert_eq!(h.indicator.displayed(), Some(&h.base(SignalIcon::Bars2)));
    }

    #[tokio::test]
    async fn tinted_excellent_shows_red_four_bar_icon() {
        let mut h = Harness::new(Some(Color::Red));
        h.indicator.attach();
        h.emit(SignalLevel::EXCELLENT).await;

        let shown = h.indicator.displayed().unwrap();
        let base = h.base(SignalIcon::Bars4);
        assert_eq!(shown.glyph(), base.glyph());
        assert_eq!(shown.style().fg, Some(Color::Red));
        assert_ne!(shown, &base);
    }

    #[tokio::test]
    async fn unrecognized_rank_shows_no_signal() {
        let mut h = Harness::new(None);
        let recorder = Arc::new(Recorder::default());
        h.indicator.register_observer(&recorder);
        h.emit(SignalLevel::from_rank(7)).await;

        assert_eq!(h.indicator.displayed(), Some(&h.base(SignalIcon::Bars0)));
        assert_eq!(recorder.seen(), vec![WifiLevel::NoSignal]);
    }

    #[tokio::test]
    async fn observer_sees_single_no_signal() {
        let mut h = Harness::new(None);
        let recorder = Arc::new(Recorder::default());
        h.indicator.register_observer(&recorder);
        assert!(h.indicator.has_subscription());

        h.emit(SignalLevel::NO_SIGNAL).await;

        assert_eq!(recorder.seen(), vec![WifiLevel::NoSignal]);
    }

    #[tokio::test]
    async fn observer_sees_levels_in_order() {
        let mut h = Harness::new(None);
        let recorder = Arc::new(Recorder::default());
        h.indicator.register_observer(&recorder);

        h.emit(SignalLevel::POOR).await;
        h.emit(SignalLevel::GOOD).await;

        assert_eq!(recorder.seen(), vec![WifiLevel::Poor, WifiLevel::Good]);
    }

    #[tokio::test]
    async fn unregistered_observer_is_not_called_but_icon_updates() {
        let mut h = Harness::new(None);
        let recorder = Arc::new(Recorder::default());
        h.indicator.attach();
        h.indicator.register_observer(&recorder);
        h.emit(SignalLevel::POOR).await;

        h.indicator.unregister_observer();
        assert!(h.indicator.has_subscription());
        h.emit(SignalLevel::GOOD).await;

        assert_eq!(recorder.seen(), vec![WifiLevel::Poor]);
        assert_eq!(h.indicator.displayed(), Some(&h.base(SignalIcon::Bars3)));
    }

    #[tokio::test]
    async fn dropped_observer_is_skipped() {
        let mut h = Harness::new(None);
        let recorder = Arc::new(Recorder::default());
        h.indicator.register_observer(&recorder);
        drop(recorder);

        h.emit(SignalLevel::FAIR).await;

        assert!(h.indicator.observer_registered());
        assert!(!h.indicator.observer_alive());
        assert_eq!(h.indicator.displayed(), Some(&h.base(SignalIcon::Bars2)));
    }

    #[tokio::test]
    async fn detach_ignores_later_deliveries() {
        let mut h = Harness::new(None);
        let recorder = Arc::new(Recorder::default());
        h.indicator.attach();
        h.indicator.register_observer(&recorder);
        h.emit(SignalLevel::POOR).await;
        let old = h.indicator.subscription_id().unwrap();

        h.indicator.detach();
        assert!(!h.indicator.has_subscription());
        assert!(!h.indicator.observer_registered());

        // A delivery already queued by the released subscription.
        h.indicator
            .update(&Action::SignalDelivered(LevelDelivery {
                subscription: old,
                level: SignalLevel::EXCELLENT,
            }))
            .unwrap();
        h.source.emit(SignalLevel::GOOD);
        tokio::task::yield_now().await;
        while let Ok(action) = h.rx.try_recv() {
            h.indicator.update(&action).unwrap();
        }

        assert_eq!(h.indicator.displayed(), Some(&h.base(SignalIcon::Bars1)));
        assert_eq!(recorder.seen(), vec![WifiLevel::Poor]);
    }

    #[tokio::test]
    async fn detach_without_subscription_is_a_no_op() {
        let mut h = Harness::new(None);
        h.indicator.detach();
        h.indicator.detach();
        assert!(!h.indicator.has_subscription());
    }

    #[tokio::test]
    async fn release_twice_is_harmless() {
        let mut h = Harness::new(None);
        h.indicator.attach();

        assert!(h.indicator.release_subscription());
        assert!(!h.indicator.release_subscription());
        assert!(!h.indicator.has_subscription());
    }

    #[tokio::test]
    async fn restart_replaces_subscription() {
        let mut h = Harness::new(None);
        h.indicator.attach();
        let first = h.indicator.subscription_id().unwrap();
        h.indicator.attach();
        let second = h.indicator.subscription_id().unwrap();
        assert_ne!(first, second);

        h.indicator
            .update(&Action::SignalDelivered(LevelDelivery {
                subscription: first,
                level: SignalLevel::GOOD,
            }))
            .unwrap();
        assert_eq!(h.indicator.displayed(), None);

        h.emit(SignalLevel::FAIR).await;
        assert_eq!(h.indicator.displayed(), Some(&h.base(SignalIcon::Bars2)));
    }

    #[tokio::test]
    async fn tint_does_not_leak_between_indicators() {
        let icons = Arc::new(IconSet::builtin());
        let source = ManualSource::new();
        let mut red = Harness::with_icons(Arc::clone(&icons), source.clone(), Some(Color::Red));
        let mut plain = Harness::with_icons(Arc::clone(&icons), source.clone(), None);
        red.indicator.attach();
        plain.indicator.attach();

        source.emit(SignalLevel::GOOD);
        red.pump().await;
        plain.pump().await;

        let base = icons.resolve(SignalIcon::Bars3).unwrap();
        assert_eq!(red.indicator.displayed().unwrap().style().fg, Some(Color::Red));
        assert_eq!(plain.indicator.displayed(), Some(base));
        assert_eq!(*icons, IconSet::builtin());
    }

    #[tokio::test]
    async fn missing_icon_keeps_current_one() {
        let glyphs = GlyphSettings {
            no_signal: Some("x".into()),
            ..GlyphSettings::default()
        };
        let icons = Arc::new(IconSet::from_glyphs(&glyphs));
        let mut h = Harness::with_icons(icons, ManualSource::new(), None);
        let recorder = Arc::new(Recorder::default());
        h.indicator.attach();
        h.indicator.register_observer(&recorder);

        h.emit(SignalLevel::NO_SIGNAL).await;
        h.emit(SignalLevel::GOOD).await;

        assert_eq!(h.indicator.displayed().unwrap().glyph(), "x");
        assert_eq!(recorder.seen(), vec![WifiLevel::NoSignal, WifiLevel::Good]);
    }

    #[tokio::test]
    async fn attach_before_init_starts_nothing() {
        let source = ManualSource::new();
        let mut indicator =
            SignalIndicator::new(Arc::new(source), Arc::new(IconSet::builtin()), None);
        indicator.attach();
        assert!(indicator.is_attached());
        assert!(!indicator.has_subscription());
    }

    #[tokio::test]
    async fn renders_current_glyph() {
        let mut h = Harness::new(None);
        h.indicator.attach();
        h.emit(SignalLevel::EXCELLENT).await;

        let mut terminal = Terminal::new(TestBackend::new(8, 1)).unwrap();
        terminal
            .draw(|frame| h.indicator.render(frame, frame.area()))
            .unwrap();
        let drawn: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(drawn.contains("▂▄▆█"), "drawn: {drawn:?}");
    }
}
