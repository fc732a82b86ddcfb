use crate::infra::Position;

/// Directional command understood by the action backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteStep {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
}

impl RouteStep {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            RouteStep::MoveUp => "moveUp",
            RouteStep::MoveDown => "moveDown",
            RouteStep::MoveLeft => "moveLeft",
            RouteStep::MoveRight => "moveRight",
        }
    }

    /// Grid displacement of one step.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            RouteStep::MoveUp => (0, -1),
            RouteStep::MoveDown => (0, 1),
            RouteStep::MoveLeft => (-1, 0),
            RouteStep::MoveRight => (1, 0),
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, RouteStep::MoveLeft | RouteStep::MoveRight)
    }
}

/// Axis-aligned route: all horizontal steps first, then all vertical ones.
/// Steps are produced lazily.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    horizontal: RouteStep,
    horizontal_len: u32,
    vertical: RouteStep,
    vertical_len: u32,
}

impl Route {
    pub fn len(&self) -> u64 {
        u64::from(self.horizontal_len) + u64::from(self.vertical_len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn horizontal_len(&self) -> u32 {
        self.horizontal_len
    }

    pub fn vertical_len(&self) -> u32 {
        self.vertical_len
    }

    pub fn steps(&self) -> impl Iterator<Item = RouteStep> + use<> {
        std::iter::repeat_n(self.horizontal, self.horizontal_len as usize)
            .chain(std::iter::repeat_n(self.vertical, self.vertical_len as usize))
    }
}

#[tracing::instrument(level = "trace", fields(start_x = start.x, start_y = start.y, goal_x = goal.x, goal_y = goal.y))]
pub fn plan_route(start: Position, goal: Position) -> Route {
    // Any difference of two i32 values fits in i64, and its magnitude in u32.
    let dx = i64::from(goal.x) - i64::from(start.x);
    let dy = i64::from(goal.y) - i64::from(start.y);

    let route = Route {
        horizontal: if dx > 0 {
            RouteStep::MoveRight
        } else {
            RouteStep::MoveLeft
        },
        horizontal_len: dx.unsigned_abs() as u32,
        vertical: if dy > 0 {
            RouteStep::MoveDown
        } else {
            RouteStep::MoveUp
        },
        vertical_len: dy.unsigned_abs() as u32,
    };

    tracing::trace!(steps = route.len(), "Route planned");
    route
}
