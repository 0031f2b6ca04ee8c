//! Controller module - Presentation loop state machine
//!
//! - `events`: The event queue and the tasks feeding it (timer, terminal)
//! - `input`: Key mapping and key handling
//! - `playback`: Refreshing playback state and dispatching controls

mod events;
mod input;
mod playback;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::art::ArtRenderer;
use crate::config::AppConfig;
use crate::error::LoopError;
use crate::model::{AppModel, PlaybackService};

pub use events::{spawn_terminal_events, AppEvent};

/// Whether the loop keeps going after an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct AppController {
    pub(crate) model: AppModel,
    service: Arc<dyn PlaybackService>,
    art: Arc<dyn ArtRenderer>,
    events: UnboundedSender<AppEvent>,
    art_width: u16,
    art_height: u16,
}

impl AppController {
    /// Creates the controller together with the receiving end of its event queue.
    pub fn new(
        service: Arc<dyn PlaybackService>,
        art: Arc<dyn ArtRenderer>,
        config: &AppConfig,
    ) -> (Self, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            model: AppModel::new(),
            service,
            art,
            events: tx,
            art_width: config.art_width,
            art_height: config.art_height,
        };
        (controller, rx)
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn sender(&self) -> UnboundedSender<AppEvent> {
        self.events.clone()
    }

    pub fn start_ticker(&self, period: Duration) {
        events::spawn_ticker(self.events.clone(), period);
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Flow {
        if self.model.is_terminated() {
            return Flow::Exit;
        }

        match event {
            AppEvent::Tick => {
                self.refresh_playback();
                Flow::Continue
            }
            AppEvent::Input(input) => self.handle_input(input),
            AppEvent::Resize(width, height) => {
                self.model.ui_state.resize(width, height);
                Flow::Continue
            }
            AppEvent::PlaybackFetched(result) => self.on_playback_fetched(result),
            AppEvent::CommandCompleted(control, result) => self.on_command_completed(control, result),
            AppEvent::ArtReady { url, result } => {
                self.on_art_ready(url, result);
                Flow::Continue
            }
        }
    }

    /// Error that ended the loop, if it did not end normally
    pub fn into_error(mut self) -> Option<LoopError> {
        self.model.take_error()
    }
}

#[cfg(test)]
mod tests {
    use super::input::Input;
    use super::*;
    use crate::model::{Control, LoopState, PlaybackSnapshot, TrackInfo};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeState {
        snapshot: Option<PlaybackSnapshot>,
        commands: Vec<&'static str>,
        fail_fetch: bool,
        fail_commands: bool,
        /// Time between reading the player and answering
        fetch_delay: Option<Duration>,
    }

    #[derive(Default)]
    struct FakeService {
        state: Mutex<FakeState>,
    }

    impl FakeService {
        fn with_snapshot(snapshot: PlaybackSnapshot) -> Arc<Self> {
            let service = Self::default();
            service.state.lock().unwrap().snapshot = Some(snapshot);
            Arc::new(service)
        }

        fn commands(&self) -> Vec<&'static str> {
            self.state.lock().unwrap().commands.clone()
        }

        fn command(&self, name: &'static str) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            if state.fail_commands {
                return Err(anyhow!("Player command failed: No active device found"));
            }
            state.commands.push(name);
            Ok(())
        }

        fn set_playing(&self, playing: bool) {
            if let Some(snapshot) = self.state.lock().unwrap().snapshot.as_mut() {
                snapshot.is_playing = playing;
            }
        }
    }

    #[async_trait]
    impl PlaybackService for FakeService {
        async fn current_playback(&self) -> Result<PlaybackSnapshot> {
            let (result, delay) = {
                let state = self.state.lock().unwrap();
                let result = if state.fail_fetch {
                    Err(anyhow!("connection reset"))
                } else {
                    Ok(state.snapshot.clone().unwrap_or_else(PlaybackSnapshot::no_device))
                };
                (result, state.fetch_delay)
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        }

        async fn previous_track(&self) -> Result<()> {
            self.command("previous")
        }

        async fn next_track(&self) -> Result<()> {
            self.command("next")
        }

        async fn pause(&self) -> Result<()> {
            self.command("pause")?;
            self.set_playing(false);
            Ok(())
        }

        async fn play(&self) -> Result<()> {
            self.command("play")?;
            self.set_playing(true);
            Ok(())
        }
    }

    struct StubArt;

    #[async_trait]
    impl ArtRenderer for StubArt {
        async fn render(&self, url: &str, width: u16, height: u16) -> Result<String> {
            Ok(format!("{url} {width}x{height}"))
        }
    }

    fn config() -> AppConfig {
        AppConfig::from_lookup(|name| match name {
            "SPOTIFY_ID" => Some("id".to_string()),
            "SPOTIFY_SECRET" => Some("secret".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn playing(progress_ms: u32, duration_ms: u32) -> PlaybackSnapshot {
        PlaybackSnapshot {
            is_playing: true,
            device: Some("Living Room".to_string()),
            track: Some(TrackInfo {
                name: "Windowlicker".to_string(),
                artist: "Aphex Twin".to_string(),
                album_art_url: Some("https://i.scdn.co/image/abc".to_string()),
                duration_ms,
            }),
            progress_ms,
        }
    }

    fn new_controller(service: Arc<FakeService>) -> (AppController, UnboundedReceiver<AppEvent>) {
        AppController::new(service, Arc::new(StubArt), &config())
    }

    /// Handles `event`, then every event it causes, until the queue is quiet.
    async fn settle(
        controller: &mut AppController,
        rx: &mut UnboundedReceiver<AppEvent>,
        event: AppEvent,
    ) -> Flow {
        let mut flow = controller.handle_event(event);
        while flow == Flow::Continue {
            let next = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
            match next {
                Ok(Some(event)) => flow = controller.handle_event(event),
                _ => break,
            }
        }
        flow
    }

    #[tokio::test]
    async fn quit_while_idle_terminates_without_error() {
        let (mut controller, _rx) = new_controller(Arc::new(FakeService::default()));
        assert!(matches!(controller.model().state(), LoopState::Idle));

        let flow = controller.handle_event(AppEvent::Input(Input::Quit));

        assert_eq!(flow, Flow::Exit);
        assert!(controller.model().is_terminated());
        assert!(controller.into_error().is_none());
    }

    #[tokio::test]
    async fn tick_fetches_snapshot_and_becomes_active() {
        let service = FakeService::with_snapshot(playing(30_000, 200_000));
        let (mut controller, mut rx) = new_controller(service);

        let flow = settle(&mut controller, &mut rx, AppEvent::Tick).await;

        assert_eq!(flow, Flow::Continue);
        let snapshot = controller.model().snapshot().expect("active after fetch");
        assert_eq!(snapshot.progress_ms, 30_000);
        assert_eq!(
            controller.model().album_art(),
            Some("https://i.scdn.co/image/abc 37x15")
        );
    }

    #[tokio::test]
    async fn finished_track_terminates_on_next_tick() {
        let service = FakeService::with_snapshot(playing(200_000, 200_000));
        let (mut controller, mut rx) = new_controller(service);
        controller.model.ui_state.select_next();
        controller.model.ui_state.toggle_help();

        let flow = settle(&mut controller, &mut rx, AppEvent::Tick).await;

        assert_eq!(flow, Flow::Exit);
        assert!(controller.model().is_terminated());
        assert!(controller.into_error().is_none());
    }

    #[tokio::test]
    async fn finished_track_terminates_from_active_state() {
        let service = FakeService::with_snapshot(playing(10_000, 200_000));
        let (mut controller, mut rx) = new_controller(service.clone());
        settle(&mut controller, &mut rx, AppEvent::Tick).await;
        assert!(controller.model().snapshot().is_some());

        service.state.lock().unwrap().snapshot = Some(playing(200_000, 200_000));
        let flow = settle(&mut controller, &mut rx, AppEvent::Tick).await;

        assert_eq!(flow, Flow::Exit);
        assert!(controller.model().is_terminated());
    }

    #[tokio::test]
    async fn select_on_play_pause_pauses_a_playing_track() {
        let service = FakeService::with_snapshot(playing(30_000, 200_000));
        let (mut controller, mut rx) = new_controller(service.clone());
        settle(&mut controller, &mut rx, AppEvent::Tick).await;
        assert_eq!(controller.model().ui_state.selected, 1);

        let flow = settle(&mut controller, &mut rx, AppEvent::Input(Input::Select)).await;

        assert_eq!(flow, Flow::Continue);
        assert_eq!(service.commands(), vec!["pause"]);
        // The synthetic tick after the command refreshed the snapshot
        assert!(!controller.model().snapshot().unwrap().is_playing);
    }

    #[tokio::test]
    async fn select_on_play_pause_resumes_a_paused_track() {
        let mut paused = playing(30_000, 200_000);
        paused.is_playing = false;
        let service = FakeService::with_snapshot(paused);
        let (mut controller, mut rx) = new_controller(service.clone());
        settle(&mut controller, &mut rx, AppEvent::Tick).await;

        settle(&mut controller, &mut rx, AppEvent::Input(Input::Select)).await;

        assert_eq!(service.commands(), vec!["play"]);
        assert!(controller.model().snapshot().unwrap().is_playing);
    }

    #[tokio::test]
    async fn fetch_racing_a_command_is_replaced_by_a_fresh_one() {
        let service = FakeService::with_snapshot(playing(30_000, 200_000));
        service.state.lock().unwrap().fetch_delay = Some(Duration::from_millis(50));
        let (mut controller, mut rx) = new_controller(service.clone());
        settle(&mut controller, &mut rx, AppEvent::Tick).await;
        assert!(controller.model().is_playing());

        // This fetch reads the player before the pause lands
        controller.handle_event(AppEvent::Tick);
        let flow = settle(&mut controller, &mut rx, AppEvent::Input(Input::Select)).await;

        assert_eq!(flow, Flow::Continue);
        assert_eq!(service.commands(), vec!["pause"]);
        assert!(!controller.model().is_playing());

        // A second press resumes instead of pausing again
        settle(&mut controller, &mut rx, AppEvent::Input(Input::Select)).await;
        assert_eq!(service.commands(), vec!["pause", "play"]);
        assert!(controller.model().is_playing());
    }

    #[tokio::test]
    async fn selection_picks_previous_and_next() {
        let service = FakeService::with_snapshot(playing(30_000, 200_000));
        let (mut controller, mut rx) = new_controller(service.clone());

        controller.handle_event(AppEvent::Input(Input::Left));
        assert_eq!(controller.model().ui_state.selected_control(), Control::Previous);
        settle(&mut controller, &mut rx, AppEvent::Input(Input::Select)).await;

        controller.handle_event(AppEvent::Input(Input::Left));
        assert_eq!(controller.model().ui_state.selected_control(), Control::Next);
        settle(&mut controller, &mut rx, AppEvent::Input(Input::Select)).await;

        assert_eq!(service.commands(), vec!["previous", "next"]);
    }

    #[tokio::test]
    async fn fetch_failure_is_fatal() {
        let service = Arc::new(FakeService::default());
        service.state.lock().unwrap().fail_fetch = true;
        let (mut controller, mut rx) = new_controller(service);

        let flow = settle(&mut controller, &mut rx, AppEvent::Tick).await;

        assert_eq!(flow, Flow::Exit);
        assert!(matches!(controller.into_error(), Some(LoopError::Fetch(_))));
    }

    #[tokio::test]
    async fn command_failure_is_fatal() {
        let service = FakeService::with_snapshot(playing(30_000, 200_000));
        service.state.lock().unwrap().fail_commands = true;
        let (mut controller, mut rx) = new_controller(service);
        controller.handle_event(AppEvent::Input(Input::Right));

        let flow = settle(&mut controller, &mut rx, AppEvent::Input(Input::Select)).await;

        assert_eq!(flow, Flow::Exit);
        match controller.into_error() {
            Some(LoopError::Command { control, message }) => {
                assert_eq!(control, Control::Next);
                assert!(message.contains("No active device"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_device_snapshot_keeps_ticking() {
        let (mut controller, mut rx) = new_controller(Arc::new(FakeService::default()));

        let flow = settle(&mut controller, &mut rx, AppEvent::Tick).await;

        assert_eq!(flow, Flow::Continue);
        assert!(!controller.model().snapshot().unwrap().device_present());
    }

    #[tokio::test]
    async fn art_failure_is_not_fatal() {
        struct BrokenArt;

        #[async_trait]
        impl ArtRenderer for BrokenArt {
            async fn render(&self, _url: &str, _width: u16, _height: u16) -> Result<String> {
                Err(anyhow!("404"))
            }
        }

        let service = FakeService::with_snapshot(playing(30_000, 200_000));
        let (mut controller, mut rx) = AppController::new(service, Arc::new(BrokenArt), &config());

        let flow = settle(&mut controller, &mut rx, AppEvent::Tick).await;

        assert_eq!(flow, Flow::Continue);
        assert_eq!(controller.model().album_art(), Some(""));
    }

    #[tokio::test]
    async fn resize_and_help_do_not_change_loop_state() {
        let (mut controller, _rx) = new_controller(Arc::new(FakeService::default()));

        assert_eq!(controller.handle_event(AppEvent::Resize(132, 43)), Flow::Continue);
        assert_eq!(controller.handle_event(AppEvent::Input(Input::Help)), Flow::Continue);

        let ui = &controller.model().ui_state;
        assert_eq!((ui.viewport_width, ui.viewport_height), (132, 43));
        assert!(ui.help_expanded);
        assert!(matches!(controller.model().state(), LoopState::Idle));
    }

    #[tokio::test]
    async fn events_after_termination_are_ignored() {
        let (mut controller, _rx) = new_controller(Arc::new(FakeService::default()));
        controller.handle_event(AppEvent::Input(Input::Quit));

        let flow = controller.handle_event(AppEvent::PlaybackFetched(Ok(playing(0, 1000))));

        assert_eq!(flow, Flow::Exit);
        assert!(controller.model().is_terminated());
    }
}
