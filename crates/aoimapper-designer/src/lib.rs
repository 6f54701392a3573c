//! # AOI Mapper Designer
//!
//! Turns raw map pointer events into committed features.
//!
//! ## Core Components
//!
//! - **Session**: the pending, uncommitted vertices of a line or polygon
//! - **Router**: reads the drawing mode from the store and either commits a
//!   point immediately, extends the session, or finalizes it
//!
//! ## State machine
//!
//! ```text
//! none     primary/secondary      -> no-op
//! point    primary(P)             -> commit point [P]
//! point    secondary              -> no-op
//! line     primary(P)             -> session += P
//! polygon  primary(P)             -> session += P
//! line     secondary, |s| >= 2    -> commit line(s), clear session
//! polygon  secondary, |s| >= 3    -> commit polygon(s), clear session
//! line/polygon secondary, too few -> clear session, nothing committed
//! any mode change                 -> clear session
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aoimapper_designer::{PointerEvent, PointerRouter};
//!
//! let router = PointerRouter::new(store.bus().clone());
//! router.attach();
//! store.set_drawing_mode(DrawingMode::Polygon);
//! router.handle(&mut store, PointerEvent::Primary(LatLon::new(0.0, 0.0)));
//! ```

pub mod router;
pub mod session;

pub use router::{PointerEvent, PointerOutcome, PointerRouter};
pub use session::DrawingSession;
