//! Drop-zone coordinator: turns a stream of pointer positions into a single
//! [`FolderDropState`].
//!
//! # How a drag is classified
//!
//! A drag session owns two [`DwellTimer`]s:
//!
//! * the **folder** timer, keyed by folder ids, arms
//!   [`DragIntent::DropInFolder`](crate::intent::DragIntent::DropInFolder);
//! * the **website** timer, keyed by website ids, arms
//!   [`DragIntent::CreateFolder`](crate::intent::DragIntent::CreateFolder).
//!
//! On every pointer move the coordinator asks its [`TileRegistry`] for the
//! rendered tiles and scans folders first, then websites, skipping the tile
//! being dragged.  The first tile whose inner zone contains the pointer is
//! entered on its timer while the other timer is told the pointer left.
//! When one timer arms, the other's progress is cleared so at most one
//! target is armed at any time.
//!
//! ```ignore
//! let mut dz = DropZoneCoordinator::new(SystemClock::new(), layout, DragConfig::default());
//! dz.handle_drag_start("website-9");
//! dz.handle_pointer_move(Point::new(50.0, 50.0));
//! // ... host calls dz.poll() when dz.next_deadline() is reached ...
//! let verdict = dz.handle_drag_end();
//! ```

use crate::dwell::{DwellObserver, DwellTimer, DWELL_TIME_MS, EXIT_GRACE_MS};
use crate::geometry::{pointer_in_inner_zone, Point, INNER_ZONE_RATIO};
use crate::intent::FolderDropState;
use crate::traits::{Clock, TileRegistry};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::mpsc;

/// Tuning knobs for drag-intent detection.
///
/// `inner_zone_ratio` (in `(0.0, 1.0]`) is the fraction of a tile, per
/// axis, that counts as "on" the tile.  The outer band lets the pointer
/// pass over tiles without arming them.
///
/// `dwell_ms` is how long the pointer must stay in an inner zone before the
/// target arms; `grace_ms` is how long it may wander off an armed target
/// before it disarms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Inner zone ratio.  Default: `0.9`.
    pub inner_zone_ratio: f64,
    /// Dwell before arming, in ms.  Default: `200`.
    pub dwell_ms: u64,
    /// Exit grace before disarming, in ms.  Default: `50`.
    pub grace_ms: u64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            inner_zone_ratio: INNER_ZONE_RATIO,
            dwell_ms: DWELL_TIME_MS,
            grace_ms: EXIT_GRACE_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetKind {
    Folder,
    Website,
}

#[derive(Debug)]
enum DwellEvent {
    Armed(TargetKind, String),
    Disarmed(TargetKind),
}

/// Forwards a timer's callbacks into the session's event queue.
struct EventSink {
    kind: TargetKind,
    tx: mpsc::Sender<DwellEvent>,
}

impl DwellObserver for EventSink {
    fn on_arm(&mut self, target: &str) {
        let _ = self.tx.send(DwellEvent::Armed(self.kind, target.to_string()));
    }

    fn on_disarm(&mut self) {
        let _ = self.tx.send(DwellEvent::Disarmed(self.kind));
    }
}

/// State that lives exactly as long as one drag.
struct DragSession<C: Clock> {
    dragged: String,
    folders: DwellTimer<C, EventSink>,
    websites: DwellTimer<C, EventSink>,
    events: mpsc::Receiver<DwellEvent>,
}

impl<C: Clock + Clone> DragSession<C> {
    fn new(dragged: String, clock: &C, config: &DragConfig) -> Self {
        let (tx, events) = mpsc::channel();
        let timer = |kind| {
            DwellTimer::new(
                clock.clone(),
                EventSink {
                    kind,
                    tx: tx.clone(),
                },
                config.dwell_ms,
                config.grace_ms,
            )
        };
        Self {
            dragged,
            folders: timer(TargetKind::Folder),
            websites: timer(TargetKind::Website),
            events,
        }
    }

    fn poll(&mut self) {
        self.folders.poll_timers();
        self.websites.poll_timers();
        self.settle();
    }

    /// Apply the mutual exclusion rule to every queued timer event.
    fn settle(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                // Only act if the timer is still armed: a later event in the
                // same batch may already have been overridden.
                DwellEvent::Armed(TargetKind::Folder, id) if self.folders.is_armed_on(&id) => {
                    debug!("folder {} armed", id);
                    self.websites.clear_dwell();
                }
                DwellEvent::Armed(TargetKind::Website, id) if self.websites.is_armed_on(&id) => {
                    debug!("website {} armed for merge", id);
                    self.folders.clear_dwell();
                }
                DwellEvent::Armed(..) => {}
                DwellEvent::Disarmed(kind) => debug!("{:?} target disarmed", kind),
            }
        }
    }

    fn verdict(&self) -> FolderDropState {
        let folder = self.folders.state();
        if let (true, Some(id)) = (folder.armed, folder.target) {
            return FolderDropState::drop_in_folder(id);
        }
        let website = self.websites.state();
        if let (true, Some(id)) = (website.armed, website.target) {
            return FolderDropState::create_folder(id);
        }
        FolderDropState::default()
    }

    fn next_deadline(&self) -> Option<u64> {
        match (self.folders.next_deadline(), self.websites.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Cancel every pending deadline.
    fn destroy(self) {
        self.folders.destroy();
        self.websites.destroy();
    }
}

/// Classifies an in-flight drag as reorder, drop-into-folder, or
/// create-folder.
///
/// Generic over the [`Clock`] and the [`TileRegistry`], so the same logic
/// runs against a live layout in the daemon and against fixed rectangles
/// and a [`ManualClock`](crate::clock::ManualClock) in tests.
pub struct DropZoneCoordinator<C: Clock + Clone, R: TileRegistry> {
    clock: C,
    registry: R,
    config: DragConfig,
    session: Option<DragSession<C>>,
    state: FolderDropState,
}

impl<C: Clock + Clone, R: TileRegistry> DropZoneCoordinator<C, R> {
    pub fn new(clock: C, registry: R, config: DragConfig) -> Self {
        Self {
            clock,
            registry,
            config,
            session: None,
            state: FolderDropState::default(),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Mutable access to the registry, e.g. to replace the layout after the
    /// grid reflows.
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Replace the tuning knobs.  Takes effect at the next drag start.
    pub fn set_config(&mut self, config: DragConfig) {
        self.config = config;
    }

    /// Whether a drag session is in progress.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Id of the item being dragged, if a session is in progress.
    pub fn dragged_item(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.dragged.as_str())
    }

    /// Begin a drag of `dragged_item_id`.
    ///
    /// Any previous session is destroyed first.  The dragged item is never
    /// considered as a target of its own drag.
    pub fn handle_drag_start(&mut self, dragged_item_id: impl Into<String>) {
        let dragged = dragged_item_id.into();
        if let Some(previous) = self.session.take() {
            warn!(
                "drag of {} started while {} was still in progress",
                dragged, previous.dragged
            );
            previous.destroy();
        }
        info!("drag start: {}", dragged);
        self.session = Some(DragSession::new(dragged, &self.clock, &self.config));
        self.state = FolderDropState::default();
    }

    /// Feed the current pointer position.
    ///
    /// Ignored outside a drag session.
    pub fn handle_pointer_move(&mut self, point: Point) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.poll();

        let ratio = self.config.inner_zone_ratio;
        let hit = |tiles: Vec<(String, _)>| {
            tiles
                .into_iter()
                .filter(|(id, _)| *id != session.dragged)
                .find(|(_, rect)| pointer_in_inner_zone(point, rect, ratio))
                .map(|(id, _)| id)
        };

        if let Some(folder_id) = hit(self.registry.folder_tiles()) {
            session.folders.enter_target(&folder_id);
            session.websites.leave_target();
        } else if let Some(website_id) = hit(self.registry.website_tiles()) {
            session.websites.enter_target(&website_id);
            session.folders.leave_target();
        } else {
            session.folders.leave_target();
            session.websites.leave_target();
        }

        session.settle();
        self.state = session.verdict();
    }

    /// Fire every dwell or grace deadline that has been reached.
    ///
    /// The host calls this whenever [`next_deadline`](Self::next_deadline)
    /// passes.  Returns `true` if the drop state changed.
    pub fn poll(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.poll();
        let state = session.verdict();
        if state == self.state {
            return false;
        }
        self.state = state;
        true
    }

    /// Earliest pending deadline in clock milliseconds, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.session.as_ref().and_then(DragSession::next_deadline)
    }

    /// Finish the drag and return the verdict to act on.
    ///
    /// All timers are cancelled and the public state is reset before
    /// returning, so highlight queries report nothing armed afterwards.
    pub fn handle_drag_end(&mut self) -> FolderDropState {
        let Some(mut session) = self.session.take() else {
            warn!("drag end without a drag in progress");
            self.state = FolderDropState::default();
            return FolderDropState::default();
        };
        session.poll();
        let verdict = session.verdict();
        info!("drag end: {} -> {}", session.dragged, verdict.intent);
        session.destroy();
        self.state = FolderDropState::default();
        verdict
    }

    /// Abort the drag (escape key, focus loss) without a verdict.
    pub fn cancel_drag(&mut self) {
        if let Some(session) = self.session.take() {
            info!("drag cancelled: {}", session.dragged);
            session.destroy();
        }
        self.state = FolderDropState::default();
    }

    /// Current drop state.
    pub fn drop_state(&self) -> &FolderDropState {
        &self.state
    }

    /// Whether `folder_id` should be highlighted as the drop target.
    pub fn is_folder_armed(&self, folder_id: &str) -> bool {
        self.state.is_armed && self.state.target_folder_id.as_deref() == Some(folder_id)
    }

    /// Whether `website_id` should be highlighted as the merge target.
    pub fn is_website_armed(&self, website_id: &str) -> bool {
        self.state.is_armed && self.state.target_website_id.as_deref() == Some(website_id)
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::geometry::Rect;
    use crate::intent::DragIntent;
    use crate::layout::TileLayout;

    const DWELL: u64 = DWELL_TIME_MS;
    const GRACE: u64 = EXIT_GRACE_MS;

    fn tile(col: f64) -> Rect {
        Rect::new(col * 100.0, 0.0, 100.0, 100.0)
    }

    fn center(col: f64) -> Point {
        Point::new(col * 100.0 + 50.0, 50.0)
    }

    /// folder-1 at column 0, website-1 at column 1, website-2 at column 2.
    fn make_coordinator() -> (DropZoneCoordinator<ManualClock, TileLayout>, ManualClock) {
        let clock = ManualClock::new();
        let layout = TileLayout::new()
            .with_folder("folder-1", tile(0.0))
            .with_website("website-1", tile(1.0))
            .with_website("website-2", tile(2.0));
        let dz = DropZoneCoordinator::new(clock.clone(), layout, DragConfig::default());
        (dz, clock)
    }

    fn advance(
        dz: &mut DropZoneCoordinator<ManualClock, TileLayout>,
        clock: &ManualClock,
        ms: u64,
    ) {
        clock.advance(ms);
        dz.poll();
    }

    #[test]
    fn starts_in_reorder() {
        let (dz, _) = make_coordinator();
        assert_eq!(dz.drop_state(), &FolderDropState::default());
        assert!(!dz.is_folder_armed("any-folder"));
        assert!(!dz.is_dragging());
    }

    #[test]
    fn folder_drop_verdict_and_reset() {
        let (mut dz, clock) = make_coordinator();
        dz.handle_drag_start("site-1");
        dz.handle_pointer_move(center(0.0));
        assert!(!dz.is_folder_armed("folder-1"));
        advance(&mut dz, &clock, DWELL);
        assert!(dz.is_folder_armed("folder-1"));

        let verdict = dz.handle_drag_end();
        assert_eq!(verdict, FolderDropState::drop_in_folder("folder-1"));
        assert!(!dz.is_folder_armed("folder-1"));
        assert_eq!(dz.drop_state(), &FolderDropState::default());
    }

    #[test]
    fn outer_band_never_arms() {
        let (mut dz, clock) = make_coordinator();
        dz.handle_drag_start("website-1");
        dz.handle_pointer_move(Point::new(2.0, 2.0));
        advance(&mut dz, &clock, DWELL + 100);
        assert!(!dz.is_folder_armed("folder-1"));
        assert_eq!(dz.drop_state().intent, DragIntent::ReorderGrid);
    }

    #[test]
    fn dragging_folder_over_itself_never_arms() {
        let (mut dz, clock) = make_coordinator();
        dz.handle_drag_start("folder-1");
        dz.handle_pointer_move(center(0.0));
        advance(&mut dz, &clock, DWELL * 10);
        assert!(!dz.is_folder_armed("folder-1"));
        assert_eq!(dz.handle_drag_end().intent, DragIntent::ReorderGrid);
    }

    #[test]
    fn website_over_website_creates_folder() {
        let (mut dz, clock) = make_coordinator();
        dz.handle_drag_start("website-2");
        dz.handle_pointer_move(center(1.0));
        advance(&mut dz, &clock, DWELL);
        assert!(dz.is_website_armed("website-1"));
        assert!(!dz.is_website_armed("website-2"));
        assert_eq!(dz.handle_drag_end(), FolderDropState::create_folder("website-1"));
    }

    #[test]
    fn dragging_website_over_itself_never_arms() {
        let (mut dz, clock) = make_coordinator();
        dz.handle_drag_start("website-1");
        dz.handle_pointer_move(center(1.0));
        advance(&mut dz, &clock, DWELL * 3);
        assert_eq!(dz.handle_drag_end().intent, DragIntent::ReorderGrid);
    }

    #[test]
    fn end_to_end_arm_then_grace_disarm() {
        let clock = ManualClock::new();
        let layout = TileLayout::new().with_folder("folder-1", Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut dz = DropZoneCoordinator::new(clock.clone(), layout, DragConfig::default());

        dz.handle_drag_start("website-9");
        dz.handle_pointer_move(Point::new(50.0, 50.0));
        clock.advance(200);
        assert!(dz.poll());
        assert!(dz.is_folder_armed("folder-1"));

        dz.handle_pointer_move(Point::new(500.0, 500.0));
        assert!(dz.is_folder_armed("folder-1"), "still within grace");
        clock.advance(50);
        assert!(dz.poll());
        assert!(!dz.is_folder_armed("folder-1"));
        assert_eq!(dz.drop_state().intent, DragIntent::ReorderGrid);
    }

    #[test]
    fn wobble_at_boundary_does_not_flicker() {
        let (mut dz, clock) = make_coordinator();
        dz.handle_drag_start("website-2");
        dz.handle_pointer_move(center(0.0));
        advance(&mut dz, &clock, DWELL);

        for _ in 0..5 {
            dz.handle_pointer_move(Point::new(1.0, 50.0));
            advance(&mut dz, &clock, GRACE / 2);
            dz.handle_pointer_move(center(0.0));
            assert!(dz.is_folder_armed("folder-1"));
        }
        advance(&mut dz, &clock, GRACE * 4);
        assert!(dz.is_folder_armed("folder-1"));
    }

    #[test]
    fn moving_from_folder_to_website_switches_intent() {
        let (mut dz, clock) = make_coordinator();
        dz.handle_drag_start("website-2");
        dz.handle_pointer_move(center(0.0));
        advance(&mut dz, &clock, DWELL);
        assert!(dz.is_folder_armed("folder-1"));

        dz.handle_pointer_move(center(1.0));
        advance(&mut dz, &clock, GRACE);
        assert!(!dz.is_folder_armed("folder-1"));
        assert!(!dz.is_website_armed("website-1"));

        advance(&mut dz, &clock, DWELL - GRACE);
        assert!(dz.is_website_armed("website-1"));
        assert_eq!(dz.handle_drag_end(), FolderDropState::create_folder("website-1"));
    }

    #[test]
    fn at_most_one_target_armed_with_long_grace() {
        let clock = ManualClock::new();
        let layout = TileLayout::new()
            .with_folder("folder-1", tile(0.0))
            .with_website("website-1", tile(1.0));
        let config = DragConfig {
            grace_ms: 1_000,
            ..DragConfig::default()
        };
        let mut dz = DropZoneCoordinator::new(clock.clone(), layout, config);

        dz.handle_drag_start("website-2");
        dz.handle_pointer_move(center(0.0));
        advance(&mut dz, &clock, DWELL);
        assert!(dz.is_folder_armed("folder-1"));

        // The folder stays armed in its long grace period while the website
        // dwell completes; arming the website clears the folder.
        dz.handle_pointer_move(center(1.0));
        advance(&mut dz, &clock, DWELL);
        assert!(dz.is_website_armed("website-1"));
        assert!(!dz.is_folder_armed("folder-1"));
        advance(&mut dz, &clock, 2_000);
        assert_eq!(dz.drop_state(), &FolderDropState::create_folder("website-1"));
    }

    #[test]
    fn switching_tiles_before_arming_restarts_dwell() {
        let (mut dz, clock) = make_coordinator();
        dz.handle_drag_start("folder-9");
        dz.handle_pointer_move(center(1.0));
        advance(&mut dz, &clock, DWELL - 10);
        dz.handle_pointer_move(center(2.0));
        advance(&mut dz, &clock, DWELL - 10);
        assert!(!dz.drop_state().is_armed);
        advance(&mut dz, &clock, 10);
        assert!(dz.is_website_armed("website-2"));
    }

    #[test]
    fn folders_take_priority_over_websites() {
        let clock = ManualClock::new();
        // Overlapping tiles: the folder wins regardless of list order.
        let layout = TileLayout::new()
            .with_website("website-1", tile(0.0))
            .with_folder("folder-1", tile(0.0));
        let mut dz = DropZoneCoordinator::new(clock.clone(), layout, DragConfig::default());
        dz.handle_drag_start("website-2");
        dz.handle_pointer_move(center(0.0));
        advance(&mut dz, &clock, DWELL);
        assert!(dz.is_folder_armed("folder-1"));
        assert!(!dz.is_website_armed("website-1"));
    }

    #[test]
    fn first_folder_in_rendering_order_wins() {
        let clock = ManualClock::new();
        let layout = TileLayout::new()
            .with_folder("folder-b", tile(0.0))
            .with_folder("folder-a", tile(0.0));
        let mut dz = DropZoneCoordinator::new(clock.clone(), layout, DragConfig::default());
        dz.handle_drag_start("website-1");
        dz.handle_pointer_move(center(0.0));
        advance(&mut dz, &clock, DWELL);
        assert!(dz.is_folder_armed("folder-b"));
    }

    #[test]
    fn repeated_moves_at_same_point_do_not_restart_dwell() {
        let (mut dz, clock) = make_coordinator();
        dz.handle_drag_start("website-1");
        for _ in 0..4 {
            dz.handle_pointer_move(center(0.0));
            advance(&mut dz, &clock, DWELL / 4);
        }
        assert!(dz.is_folder_armed("folder-1"));
    }

    #[test]
    fn drag_end_cancels_pending_dwell() {
        let (mut dz, clock) = make_coordinator();
        dz.handle_drag_start("website-1");
        dz.handle_pointer_move(center(0.0));
        clock.advance(DWELL - 1);
        assert_eq!(dz.handle_drag_end().intent, DragIntent::ReorderGrid);
        assert!(dz.next_deadline().is_none());
        advance(&mut dz, &clock, DWELL);
        assert!(!dz.is_folder_armed("folder-1"));
    }

    #[test]
    fn drag_end_fires_due_dwell() {
        let (mut dz, clock) = make_coordinator();
        dz.handle_drag_start("website-1");
        dz.handle_pointer_move(center(0.0));
        clock.advance(DWELL);
        assert_eq!(dz.handle_drag_end(), FolderDropState::drop_in_folder("folder-1"));
    }

    #[test]
    fn cancel_drag_resets_everything() {
        let (mut dz, clock) = make_coordinator();
        dz.handle_drag_start("website-1");
        dz.handle_pointer_move(center(0.0));
        advance(&mut dz, &clock, DWELL);
        dz.cancel_drag();
        assert!(!dz.is_dragging());
        assert!(!dz.is_folder_armed("folder-1"));
        assert!(dz.next_deadline().is_none());
    }

    #[test]
    fn new_drag_starts_from_scratch() {
        let (mut dz, clock) = make_coordinator();
        dz.handle_drag_start("website-1");
        dz.handle_pointer_move(center(0.0));
        advance(&mut dz, &clock, DWELL);
        dz.handle_drag_start("website-2");
        assert_eq!(dz.dragged_item(), Some("website-2"));
        assert_eq!(dz.drop_state(), &FolderDropState::default());
        advance(&mut dz, &clock, DWELL);
        assert!(!dz.is_folder_armed("folder-1"));
    }

    #[test]
    fn pointer_moves_outside_a_drag_are_ignored() {
        let (mut dz, clock) = make_coordinator();
        dz.handle_pointer_move(center(0.0));
        advance(&mut dz, &clock, DWELL);
        assert!(dz.next_deadline().is_none());
        assert!(!dz.is_folder_armed("folder-1"));
    }

    #[test]
    fn next_deadline_tracks_dwell() {
        let (mut dz, clock) = make_coordinator();
        clock.advance(1_000);
        dz.handle_drag_start("website-1");
        assert!(dz.next_deadline().is_none());
        dz.handle_pointer_move(center(0.0));
        assert_eq!(dz.next_deadline(), Some(1_000 + DWELL));
    }

    #[test]
    fn new_config_applies_from_next_drag() {
        let (mut dz, clock) = make_coordinator();
        assert_eq!(dz.registry().len(), 3);
        dz.handle_drag_start("website-1");
        dz.set_config(DragConfig {
            dwell_ms: 2 * DWELL,
            ..DragConfig::default()
        });
        assert_eq!(dz.config().dwell_ms, 2 * DWELL);

        dz.handle_pointer_move(center(0.0));
        advance(&mut dz, &clock, DWELL);
        assert!(dz.is_folder_armed("folder-1"), "running drag keeps its timing");

        dz.handle_drag_start("website-1");
        dz.handle_pointer_move(center(0.0));
        advance(&mut dz, &clock, DWELL);
        assert!(!dz.is_folder_armed("folder-1"));
        advance(&mut dz, &clock, DWELL);
        assert!(dz.is_folder_armed("folder-1"));
    }

    #[test]
    fn layout_changes_apply_to_next_move() {
        let (mut dz, clock) = make_coordinator();
        dz.handle_drag_start("website-1");
        dz.registry_mut().folders.clear();
        dz.handle_pointer_move(center(0.0));
        advance(&mut dz, &clock, DWELL);
        assert_eq!(dz.drop_state().intent, DragIntent::ReorderGrid);
    }
}
