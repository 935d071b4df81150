//! Route drawing: validation, layer reset, markers and the animation loop.
//!
//! The map and the frame clock sit behind [`RouteSurface`] and
//! [`FrameScheduler`]; the browser implementations live in `mapbox`.

use contracts::domain::a006_route::aggregate::RouteResult;
use contracts::shared::geo::Bounds;
use contracts::shared::LngLat;
use std::cell::RefCell;
use std::rc::Rc;

use super::animation::{AnimationPhase, RouteAnimator, Tick};
use super::markers::{waypoint_markers, WaypointMarker};

pub const FIT_PADDING_PX: u32 = 50;

/// Map operations the drawer needs
pub trait RouteSurface {
    fn is_ready(&self) -> bool;
    /// Drop any route layers and recreate them on an empty `route` source
    fn reset_route_layers(&self);
    fn remove_route_layers(&self);
    fn set_route_data(&self, coordinates: &[LngLat]);
    fn replace_markers(&self, markers: &[WaypointMarker]);
    fn clear_markers(&self);
    fn fit_bounds(&self, bounds: Bounds, padding: u32);
}

pub trait FrameScheduler {
    type Handle;

    /// `None` when no frame could be requested
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Option<Self::Handle>;
    fn cancel_frame(&self, handle: Self::Handle);
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrawError {
    #[error("Route data is not valid")]
    RouteUnavailable,
    #[error("Map is not ready yet")]
    SurfaceNotReady,
}

struct DrawerInner<S, F: FrameScheduler> {
    surface: S,
    scheduler: F,
    animator: RefCell<RouteAnimator>,
    pending_frame: RefCell<Option<F::Handle>>,
    on_complete: RefCell<Option<Box<dyn FnOnce()>>>,
}

pub struct RouteDrawer<S, F: FrameScheduler> {
    inner: Rc<DrawerInner<S, F>>,
}

impl<S, F: FrameScheduler> Clone for RouteDrawer<S, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S, F> RouteDrawer<S, F>
where
    S: RouteSurface + 'static,
    F: FrameScheduler + 'static,
{
    pub fn new(surface: S, scheduler: F, steps: u32) -> Self {
        Self {
            inner: Rc::new(DrawerInner {
                surface,
                scheduler,
                animator: RefCell::new(RouteAnimator::new(steps)),
                pending_frame: RefCell::new(None),
                on_complete: RefCell::new(None),
            }),
        }
    }

    pub fn surface(&self) -> &S {
        &self.inner.surface
    }

    pub fn phase(&self) -> AnimationPhase {
        self.inner.animator.borrow().phase()
    }

    /// Draw `route` from scratch; a running animation is cancelled first.
    /// `on_complete` runs after the last frame, never for a cancelled draw.
    pub fn draw(&self, route: &RouteResult, on_complete: impl FnOnce() + 'static) -> Result<(), DrawError> {
        if !route.is_success {
            log::error!("route draw aborted: route {} is not valid", route.route_id);
            return Err(DrawError::RouteUnavailable);
        }
        let surface = &self.inner.surface;
        if !surface.is_ready() {
            log::error!("route draw aborted: map is not ready");
            return Err(DrawError::SurfaceNotReady);
        }

        self.cancel();
        surface.reset_route_layers();
        surface.replace_markers(&waypoint_markers(&route.step_locations));

        let coordinates = route.coordinates().to_vec();
        let bounds = Bounds::from_points(&coordinates);
        *self.inner.on_complete.borrow_mut() = Some(Box::new(on_complete));
        let generation = self.inner.animator.borrow_mut().start(coordinates);
        log::debug!(
            "drawing route {} ({} points, generation {})",
            route.route_id,
            route.coordinates().len(),
            generation
        );
        self.run_frame(generation);

        if let Some(bounds) = bounds {
            surface.fit_bounds(bounds, FIT_PADDING_PX);
        }
        Ok(())
    }

    fn run_frame(&self, generation: u64) {
        let tick = self.inner.animator.borrow_mut().tick(generation);
        match tick {
            Tick::Stale => {}
            Tick::Frame(points) => {
                self.inner.surface.set_route_data(&points);
                let drawer = self.clone();
                let handle = self
                    .inner
                    .scheduler
                    .request_frame(Box::new(move || drawer.run_frame(generation)));
                match handle {
                    Some(handle) => *self.inner.pending_frame.borrow_mut() = Some(handle),
                    None => {
                        log::warn!("no animation frame available, drawing the whole route");
                        let whole = self.inner.animator.borrow_mut().finish(generation);
                        if let Some(points) = whole {
                            self.finish(&points);
                        }
                    }
                }
            }
            Tick::Last(points) => self.finish(&points),
        }
    }

    fn finish(&self, points: &[LngLat]) {
        self.inner.surface.set_route_data(points);
        self.inner.pending_frame.borrow_mut().take();
        let done = self.inner.on_complete.borrow_mut().take();
        if let Some(done) = done {
            done();
        }
    }

    fn cancel(&self) {
        let pending = self.inner.pending_frame.borrow_mut().take();
        if let Some(handle) = pending {
            self.inner.scheduler.cancel_frame(handle);
        }
        if self.inner.animator.borrow_mut().cancel() {
            log::debug!("route animation cancelled");
        }
        self.inner.on_complete.borrow_mut().take();
    }

    /// Stop animating and remove the route and its markers from the map
    pub fn clear(&self) {
        self.cancel();
        self.inner.surface.clear_markers();
        self.inner.surface.remove_route_layers();
    }
}

#[cfg(test)]
pub mod fakes {
    use super::*;
    use std::cell::Cell;

    /// Records every call made by the drawer
    #[derive(Default)]
    pub struct RecordingSurface {
        pub not_ready: Cell<bool>,
        pub calls: RefCell<Vec<&'static str>>,
        pub frames: RefCell<Vec<Vec<LngLat>>>,
        pub markers: RefCell<Vec<WaypointMarker>>,
        pub fitted: RefCell<Option<(Bounds, u32)>>,
    }

    impl RouteSurface for RecordingSurface {
        fn is_ready(&self) -> bool {
            !self.not_ready.get()
        }

        fn reset_route_layers(&self) {
            self.calls.borrow_mut().push("reset_layers");
        }

        fn remove_route_layers(&self) {
            self.calls.borrow_mut().push("remove_layers");
        }

        fn set_route_data(&self, coordinates: &[LngLat]) {
            self.frames.borrow_mut().push(coordinates.to_vec());
        }

        fn replace_markers(&self, markers: &[WaypointMarker]) {
            self.calls.borrow_mut().push("replace_markers");
            *self.markers.borrow_mut() = markers.to_vec();
        }

        fn clear_markers(&self) {
            self.calls.borrow_mut().push("clear_markers");
            self.markers.borrow_mut().clear();
        }

        fn fit_bounds(&self, bounds: Bounds, padding: u32) {
            *self.fitted.borrow_mut() = Some((bounds, padding));
        }
    }

    type Callback = Box<dyn FnOnce()>;

    /// Frames run only when the test says so
    #[derive(Clone, Default)]
    pub struct ManualFrames {
        queue: Rc<RefCell<Vec<(u32, Callback)>>>,
        next_id: Rc<Cell<u32>>,
        pub cancelled: Rc<RefCell<Vec<u32>>>,
        /// When set, `request_frame` hands out nothing
        pub refuse: Rc<Cell<bool>>,
    }

    impl ManualFrames {
        pub fn pending(&self) -> usize {
            self.queue.borrow().len()
        }

        /// Run the oldest queued frame; false when none is queued
        pub fn run_next(&self) -> bool {
            let next = {
                let mut queue = self.queue.borrow_mut();
                if queue.is_empty() {
                    None
                } else {
                    Some(queue.remove(0))
                }
            };
            match next {
                Some((_, callback)) => {
                    callback();
                    true
                }
                None => false,
            }
        }

        pub fn run_all(&self) -> usize {
            let mut ran = 0;
            while self.run_next() {
                ran += 1;
            }
            ran
        }
    }

    impl FrameScheduler for ManualFrames {
        type Handle = u32;

        fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Option<u32> {
            if self.refuse.get() {
                return None;
            }
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            self.queue.borrow_mut().push((id, callback));
            Some(id)
        }

        fn cancel_frame(&self, handle: u32) {
            self.cancelled.borrow_mut().push(handle);
            self.queue.borrow_mut().retain(|(id, _)| *id != handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::{ManualFrames, RecordingSurface};
    use super::*;
    use contracts::domain::a006_route::aggregate::{RouteFeature, RouteGeometry, StepLocation};
    use std::cell::Cell;

    fn stop(name: &str, position: LngLat) -> StepLocation {
        StepLocation {
            address: String::new(),
            burmese_name: String::new(),
            english_name: name.into(),
            latitude: position[1],
            longitude: position[0],
            location_type: "defined_location".into(),
        }
    }

    fn route(success: bool) -> RouteResult {
        let coordinates = vec![[95.643, 16.735], [95.645, 16.737], [95.650, 16.734]];
        RouteResult {
            route_id: "r-1".into(),
            is_success: success,
            distance: 1000.0,
            estimated_time: 200.0,
            route: RouteFeature {
                geometry: RouteGeometry {
                    coordinates: coordinates.clone(),
                    geometry_type: "LineString".into(),
                },
                feature_type: "Feature".into(),
            },
            start_location: stop("Start", coordinates[0]),
            end_location: stop("End", coordinates[2]),
            road_names: Vec::new(),
            step_locations: vec![
                stop("Start", coordinates[0]),
                stop("Middle", coordinates[1]),
                stop("End", coordinates[2]),
            ],
        }
    }

    fn drawer() -> (RouteDrawer<RecordingSurface, ManualFrames>, ManualFrames) {
        let frames = ManualFrames::default();
        (RouteDrawer::new(RecordingSurface::default(), frames.clone(), 100), frames)
    }

    #[test]
    fn test_full_draw_runs_101_frames_then_completes() {
        let (drawer, frames) = drawer();
        let completed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&completed);

        drawer.draw(&route(true), move || counter.set(counter.get() + 1)).unwrap();
        assert_eq!(drawer.surface().frames.borrow().len(), 1);
        assert_eq!(drawer.phase(), AnimationPhase::Animating);

        assert_eq!(frames.run_all(), 100);
        let drawn = drawer.surface().frames.borrow();
        assert_eq!(drawn.len(), 101);
        assert_eq!(drawn.last().unwrap(), route(true).coordinates());
        assert_eq!(completed.get(), 1);
        assert_eq!(drawer.phase(), AnimationPhase::Complete);
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn test_missing_frame_draws_whole_route_and_completes() {
        let (drawer, frames) = drawer();
        let completed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&completed);
        drawer.draw(&route(true), move || counter.set(counter.get() + 1)).unwrap();
        frames.run_next();

        frames.refuse.set(true);
        frames.run_next();

        assert_eq!(completed.get(), 1);
        assert_eq!(drawer.phase(), AnimationPhase::Complete);
        assert_eq!(frames.pending(), 0);
        let drawn = drawer.surface().frames.borrow();
        assert_eq!(drawn.len(), 4);
        assert_eq!(drawn.last().unwrap(), route(true).coordinates());
    }

    #[test]
    fn test_draw_sets_up_layers_markers_and_bounds() {
        let (drawer, _frames) = drawer();
        drawer.draw(&route(true), || {}).unwrap();

        let surface = drawer.surface();
        assert_eq!(*surface.calls.borrow(), vec!["reset_layers", "replace_markers"]);
        assert_eq!(surface.markers.borrow().len(), 3);
        let (bounds, padding) = surface.fitted.borrow().unwrap();
        assert_eq!(padding, 50);
        assert_eq!(bounds.south_west, [95.643, 16.734]);
        assert_eq!(bounds.north_east, [95.650, 16.737]);
    }

    #[test]
    fn test_redraw_cancels_pending_frame() {
        let (drawer, frames) = drawer();
        let first_done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&first_done);
        drawer.draw(&route(true), move || flag.set(true)).unwrap();
        frames.run_next();
        frames.run_next();

        drawer.draw(&route(true), || {}).unwrap();
        assert_eq!(frames.cancelled.borrow().len(), 1);
        assert_eq!(frames.pending(), 1);

        frames.run_all();
        // 3 frames of the first draw, then a full second draw
        assert_eq!(drawer.surface().frames.borrow().len(), 3 + 101);
        assert!(!first_done.get());
    }

    #[test]
    fn test_stale_callback_does_not_draw() {
        let frames = ManualFrames::default();
        let drawer = RouteDrawer::new(RecordingSurface::default(), frames.clone(), 100);
        drawer.draw(&route(true), || {}).unwrap();

        // a callback captured before the redraw, as if cancellation raced the frame
        let stale_generation = drawer.inner.animator.borrow().generation();
        drawer.draw(&route(true), || {}).unwrap();
        let before = drawer.surface().frames.borrow().len();
        drawer.run_frame(stale_generation);
        assert_eq!(drawer.surface().frames.borrow().len(), before);
    }

    #[test]
    fn test_invalid_route_or_map_aborts_without_drawing() {
        let (drawer, frames) = drawer();
        assert_eq!(drawer.draw(&route(false), || {}), Err(DrawError::RouteUnavailable));

        drawer.surface().not_ready.set(true);
        assert_eq!(drawer.draw(&route(true), || {}), Err(DrawError::SurfaceNotReady));

        assert!(drawer.surface().calls.borrow().is_empty());
        assert!(drawer.surface().frames.borrow().is_empty());
        assert_eq!(frames.pending(), 0);
        assert_eq!(drawer.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn test_clear_stops_animation_and_removes_everything() {
        let (drawer, frames) = drawer();
        let done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&done);
        drawer.draw(&route(true), move || flag.set(true)).unwrap();

        drawer.clear();
        assert_eq!(frames.pending(), 0);
        assert_eq!(drawer.phase(), AnimationPhase::Cancelled);
        assert!(drawer.surface().markers.borrow().is_empty());
        assert_eq!(
            *drawer.surface().calls.borrow(),
            vec!["reset_layers", "replace_markers", "clear_markers", "remove_layers"]
        );
        assert!(!done.get());
    }
}
