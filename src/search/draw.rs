//! Lifecycle of the user-drawn search circle.
//!
//! The session is a pure reducer: map events go in, a new session and a
//! list of effects for the page to carry out come back. Nothing here
//! touches the map or the listings.

use crate::models::SearchShape;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawState {
    #[default]
    Idle,
    Drawing,
    Drawn,
}

impl DrawState {
    /// Whether `self -> next` is one of the machine's edges
    pub fn can_transition_to(self, next: DrawState) -> bool {
        matches!(
            (self, next),
            (DrawState::Idle, DrawState::Drawing)
                | (DrawState::Drawing, DrawState::Drawn)
                | (DrawState::Drawing, DrawState::Idle)
                | (DrawState::Drawn, DrawState::Idle)
                | (DrawState::Drawn, DrawState::Drawing)
        )
    }
}

/// Input to the draw session, usually translated from a map library event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawEvent {
    /// User pressed the "draw" trigger
    RequestDraw,
    /// The drawing tool reported a finished circle
    ShapeCreated(SearchShape),
    /// The drawing tool was switched off, with or without a shape
    DrawingStopped,
    /// User abandoned the gesture (Escape)
    Cancel,
    /// User pressed "clear drawing"
    RequestClear,
    /// Proximity mode took over the map
    ProximityEngaged,
    /// Proximity mode released the map
    ProximityExited,
}

/// Work the page must perform after a transition, in order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawEffect {
    /// Remove the current circle overlay, drop its matches and hide the panel
    ClearShape,
    EnableDrawTool,
    DisableDrawTool,
    /// Put the circle on the map
    ShowShape(SearchShape),
    /// Run the radius query for the circle
    RunQuery(SearchShape),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawSession {
    state: DrawState,
    shape: Option<SearchShape>,
    /// A shape was reported during the current drawing gesture
    shape_created: bool,
    /// Proximity mode is active; drawing may not start
    suppressed: bool,
}

/// Result of feeding one event to a session
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub session: DrawSession,
    pub effects: Vec<DrawEffect>,
}

impl DrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    /// The active search circle, present only in `Drawn`
    pub fn shape(&self) -> Option<&SearchShape> {
        self.shape.as_ref()
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Apply `event` in place and return the effects to run
    pub fn dispatch(&mut self, event: DrawEvent) -> Vec<DrawEffect> {
        let Transition { session, effects } = transition(self, event);
        *self = session;
        effects
    }
}

/// Compute the session that follows `event`.
pub fn transition(session: &DrawSession, event: DrawEvent) -> Transition {
    let mut next = session.clone();
    let mut effects = Vec::new();

    match (session.state, event) {
        (_, DrawEvent::RequestDraw) if session.suppressed => {
            debug!("Draw requested while proximity mode is active, ignoring");
        }
        (DrawState::Idle, DrawEvent::RequestDraw) => {
            next.state = DrawState::Drawing;
            next.shape_created = false;
            effects.push(DrawEffect::EnableDrawTool);
        }
        (DrawState::Drawn, DrawEvent::RequestDraw) => {
            next.state = DrawState::Drawing;
            next.shape = None;
            next.shape_created = false;
            effects.push(DrawEffect::ClearShape);
            effects.push(DrawEffect::EnableDrawTool);
        }
        (DrawState::Drawing, DrawEvent::ShapeCreated(shape)) => {
            info!(
                lat = shape.center.lat,
                lng = shape.center.lng,
                radius_m = shape.radius_m,
                "Search circle drawn"
            );
            next.state = DrawState::Drawn;
            next.shape = Some(shape);
            next.shape_created = true;
            effects.push(DrawEffect::DisableDrawTool);
            effects.push(DrawEffect::ShowShape(shape));
            effects.push(DrawEffect::RunQuery(shape));
        }
        (DrawState::Drawing, DrawEvent::DrawingStopped) if !session.shape_created => {
            info!("Drawing stopped without a shape, treating as cancelled");
            next.state = DrawState::Idle;
            effects.push(DrawEffect::DisableDrawTool);
        }
        (DrawState::Drawing, DrawEvent::Cancel) => {
            info!("Drawing cancelled");
            next.state = DrawState::Idle;
            effects.push(DrawEffect::DisableDrawTool);
        }
        (DrawState::Drawn, DrawEvent::DrawingStopped) => {
            debug!("Drawing tool stopped after shape was created");
        }
        (DrawState::Drawn, DrawEvent::RequestClear) => {
            next.state = DrawState::Idle;
            next.shape = None;
            next.shape_created = false;
            effects.push(DrawEffect::ClearShape);
        }
        (state, DrawEvent::ProximityEngaged) => {
            next.suppressed = true;
            next.state = DrawState::Idle;
            next.shape = None;
            next.shape_created = false;
            match state {
                DrawState::Drawing => effects.push(DrawEffect::DisableDrawTool),
                DrawState::Drawn => effects.push(DrawEffect::ClearShape),
                DrawState::Idle => {}
            }
        }
        (_, DrawEvent::ProximityExited) => {
            next.suppressed = false;
        }
        (DrawState::Idle, DrawEvent::ShapeCreated(_)) => {
            // Only reachable if the map reports a shape after it already stopped
            warn!("Shape reported outside a drawing gesture, discarding");
        }
        (state, event) => {
            debug!(?state, ?event, "Event has no effect in this state");
        }
    }

    debug_assert!(
        next.state == session.state || session.state.can_transition_to(next.state),
        "illegal draw transition {:?} -> {:?}",
        session.state,
        next.state
    );

    Transition {
        session: next,
        effects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LatLng;

    const ALL_EVENTS: [DrawEvent; 7] = [
        DrawEvent::RequestDraw,
        DrawEvent::ShapeCreated(SearchShape {
            center: LatLng { lat: -12.97, lng: -38.50 },
            radius_m: 800.0,
        }),
        DrawEvent::DrawingStopped,
        DrawEvent::Cancel,
        DrawEvent::RequestClear,
        DrawEvent::ProximityEngaged,
        DrawEvent::ProximityExited,
    ];

    fn shape() -> SearchShape {
        SearchShape::circle(LatLng::new(-12.97, -38.50), 800.0)
    }

    fn drawn() -> DrawSession {
        let mut session = DrawSession::new();
        session.dispatch(DrawEvent::RequestDraw);
        session.dispatch(DrawEvent::ShapeCreated(shape()));
        session
    }

    #[test]
    fn starts_idle() {
        let session = DrawSession::new();
        assert_eq!(session.state(), DrawState::Idle);
        assert!(session.shape().is_none());
    }

    #[test]
    fn draw_then_complete() {
        let mut session = DrawSession::new();
        assert_eq!(
            session.dispatch(DrawEvent::RequestDraw),
            vec![DrawEffect::EnableDrawTool]
        );
        assert_eq!(session.state(), DrawState::Drawing);

        let effects = session.dispatch(DrawEvent::ShapeCreated(shape()));
        assert_eq!(
            effects,
            vec![
                DrawEffect::DisableDrawTool,
                DrawEffect::ShowShape(shape()),
                DrawEffect::RunQuery(shape()),
            ]
        );
        assert_eq!(session.state(), DrawState::Drawn);
        assert_eq!(session.shape(), Some(&shape()));

        // the tool reports "stopped" after "created"; nothing changes
        assert!(session.dispatch(DrawEvent::DrawingStopped).is_empty());
        assert_eq!(session.state(), DrawState::Drawn);
    }

    #[test]
    fn stop_without_shape_cancels() {
        let mut session = DrawSession::new();
        session.dispatch(DrawEvent::RequestDraw);

        let effects = session.dispatch(DrawEvent::DrawingStopped);
        assert_eq!(effects, vec![DrawEffect::DisableDrawTool]);
        assert_eq!(session.state(), DrawState::Idle);
        assert!(session.shape().is_none());
    }

    #[test]
    fn escape_cancels_without_query() {
        let mut session = DrawSession::new();
        session.dispatch(DrawEvent::RequestDraw);

        let effects = session.dispatch(DrawEvent::Cancel);
        assert!(!effects
            .iter()
            .any(|e| matches!(e, DrawEffect::RunQuery(_))));
        assert_eq!(session.state(), DrawState::Idle);
    }

    #[test]
    fn late_shape_after_cancel_is_discarded() {
        let mut session = DrawSession::new();
        session.dispatch(DrawEvent::RequestDraw);
        session.dispatch(DrawEvent::DrawingStopped);

        assert!(session.dispatch(DrawEvent::ShapeCreated(shape())).is_empty());
        assert_eq!(session.state(), DrawState::Idle);
    }

    #[test]
    fn clear_returns_to_idle() {
        let mut session = drawn();
        assert_eq!(
            session.dispatch(DrawEvent::RequestClear),
            vec![DrawEffect::ClearShape]
        );
        assert_eq!(session.state(), DrawState::Idle);
        assert!(session.shape().is_none());
    }

    #[test]
    fn redraw_clears_previous_shape_first() {
        let mut session = drawn();
        assert_eq!(
            session.dispatch(DrawEvent::RequestDraw),
            vec![DrawEffect::ClearShape, DrawEffect::EnableDrawTool]
        );
        assert_eq!(session.state(), DrawState::Drawing);
        assert!(session.shape().is_none());
    }

    #[test]
    fn proximity_suppresses_drawing() {
        let mut session = drawn();
        assert_eq!(
            session.dispatch(DrawEvent::ProximityEngaged),
            vec![DrawEffect::ClearShape]
        );
        assert_eq!(session.state(), DrawState::Idle);

        assert!(session.dispatch(DrawEvent::RequestDraw).is_empty());
        assert_eq!(session.state(), DrawState::Idle);

        session.dispatch(DrawEvent::ProximityExited);
        session.dispatch(DrawEvent::RequestDraw);
        assert_eq!(session.state(), DrawState::Drawing);
    }

    #[test]
    fn only_machine_edges_are_taken() {
        let starts = [DrawSession::new(), {
            let mut s = DrawSession::new();
            s.dispatch(DrawEvent::RequestDraw);
            s
        }, drawn()];

        for start in &starts {
            for event in ALL_EVENTS {
                let next = transition(start, event).session;
                if next.state() != start.state() {
                    assert!(
                        start.state().can_transition_to(next.state()),
                        "{:?} --{:?}--> {:?}",
                        start.state(),
                        event,
                        next.state()
                    );
                }
            }
        }
    }

    #[test]
    fn edges_from_each_state() {
        use DrawState::*;
        assert!(Idle.can_transition_to(Drawing));
        assert!(!Idle.can_transition_to(Drawn));
        assert!(Drawing.can_transition_to(Drawn));
        assert!(Drawing.can_transition_to(Idle));
        assert!(Drawn.can_transition_to(Idle));
        assert!(Drawn.can_transition_to(Drawing));
    }
}
