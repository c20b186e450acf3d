#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure camera system that keeps the player inside a dead-zone follow box.

use worldshift_core::{Command, Event, PixelPoint, PlayerSnapshot, ViewSize};

/// Distance in pixels between each viewport edge and the follow box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Border {
    horizontal: i32,
    vertical: i32,
}

impl Border {
    /// Creates a new border. Negative values collapse to zero.
    #[must_use]
    pub fn new(horizontal: i32, vertical: i32) -> Self {
        Self {
            horizontal: horizontal.max(0),
            vertical: vertical.max(0),
        }
    }

    /// Inset applied to the left and right viewport edges.
    #[must_use]
    pub const fn horizontal(&self) -> i32 {
        self.horizontal
    }

    /// Inset applied to the top and bottom viewport edges.
    #[must_use]
    pub const fn vertical(&self) -> i32 {
        self.vertical
    }
}

impl Default for Border {
    fn default() -> Self {
        Self {
            horizontal: 64,
            vertical: 48,
        }
    }
}

/// Axis-aligned follow box expressed in world pixels, bounds inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeadZone {
    /// Upper-left corner of the box.
    pub min: PixelPoint,
    /// Lower-right corner of the box.
    pub max: PixelPoint,
}

impl DeadZone {
    /// Reports whether `point` lies inside the box.
    #[must_use]
    pub const fn contains(&self, point: PixelPoint) -> bool {
        point.x() >= self.min.x()
            && point.x() <= self.max.x()
            && point.y() >= self.min.y()
            && point.y() <= self.max.y()
    }
}

/// Camera system that scrolls only when the player leaves the follow box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FollowCamera {
    view: ViewSize,
    border: Border,
}

impl FollowCamera {
    /// Creates a camera system for the provided viewport and border.
    #[must_use]
    pub const fn new(view: ViewSize, border: Border) -> Self {
        Self { view, border }
    }

    /// Viewport the camera scrolls.
    #[must_use]
    pub const fn view(&self) -> ViewSize {
        self.view
    }

    /// Follow box around a camera centred on `center`.
    ///
    /// Borders wider than half the viewport shrink the box to a single point.
    #[must_use]
    pub fn dead_zone(&self, center: PixelPoint) -> DeadZone {
        let reach_x = reach(self.view.width(), self.border.horizontal());
        let reach_y = reach(self.view.height(), self.border.vertical());
        DeadZone {
            min: center.translated(-reach_x, -reach_y),
            max: center.translated(reach_x, reach_y),
        }
    }

    /// Camera centre that brings `focus` back onto the edge of the follow box.
    #[must_use]
    pub fn follow(&self, center: PixelPoint, focus: PixelPoint) -> PixelPoint {
        let reach_x = reach(self.view.width(), self.border.horizontal());
        let reach_y = reach(self.view.height(), self.border.vertical());
        PixelPoint::new(
            follow_axis(center.x(), focus.x(), reach_x),
            follow_axis(center.y(), focus.y(), reach_y),
        )
    }

    /// Consumes world events and the player snapshot to emit camera commands.
    ///
    /// Only batches that advanced time are considered, so the camera moves at
    /// most once per logic tick.
    pub fn handle(
        &self,
        events: &[Event],
        player: &PlayerSnapshot,
        camera: PixelPoint,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let center = self.follow(camera, player.draw_center());
        if center != camera {
            out.push(Command::PanCamera { center });
        }
    }
}

fn reach(extent: i32, border: i32) -> i32 {
    let half = extent / 2;
    (half - border).max(0)
}

fn follow_axis(center: i32, focus: i32, reach: i32) -> i32 {
    if focus < center - reach {
        focus + reach
    } else if focus > center + reach {
        focus - reach
    } else {
        center
    }
}
