//! Path planning.
//!
//! A [`Navigator`] turns a start, a goal, obstacles and movement flags into waypoints.
//! An empty path means no path was found; callers treat that as a normal outcome.

use rand::distributions::{Distribution, Uniform};
use stp_core::{math, FieldGeometry, NavigatorSettings, PlayerId, Vector2, WorldData};

use crate::MoveFlags;

/// A circular region robots must not enter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Vector2,
    pub radius: f64,
}

impl Obstacle {
    pub fn contains(&self, p: Vector2) -> bool {
        (p - self.center).norm() < self.radius
    }
}

pub struct NavRequest<'a> {
    pub start: Vector2,
    pub goal: Vector2,
    pub obstacles: &'a [Obstacle],
    pub flags: MoveFlags,
    pub field: &'a FieldGeometry,
}

pub trait Navigator: Send {
    /// Plans a path from `start` to `goal`. The returned waypoints exclude the start and
    /// end at the goal. An empty path means planning failed.
    fn plan(&self, request: &NavRequest<'_>) -> Vec<Vector2>;
}

/// Obstacles for `player`: every other robot, plus the ball when the flags ask to keep
/// away from it.
pub fn obstacles_for(
    player: PlayerId,
    world: &WorldData,
    flags: MoveFlags,
    settings: &NavigatorSettings,
) -> Vec<Obstacle> {
    let own = world.own_players.iter().filter(|p| p.id != player);
    let mut obstacles: Vec<Obstacle> = own
        .chain(world.opp_players.iter())
        .map(|p| Obstacle {
            center: p.position,
            radius: 2.0 * settings.robot_radius,
        })
        .collect();
    if flags.contains(MoveFlags::AVOID_BALL_STOP) {
        if let Some(ball) = &world.ball {
            obstacles.push(Obstacle {
                center: ball.position2(),
                radius: settings.ball_avoid_radius,
            });
        }
    }
    obstacles
}

/// Whether the flags allow a robot to end up at `goal`.
pub fn goal_permitted(goal: Vector2, flags: MoveFlags, field: &FieldGeometry) -> bool {
    if !field.contains_with_boundary(goal) {
        return false;
    }
    if flags.contains(MoveFlags::AVOID_FRIENDLY_DEFENSE) && field.in_own_defense_area(goal, 0.0) {
        return false;
    }
    if flags.contains(MoveFlags::AVOID_ENEMY_DEFENSE) && field.in_opp_defense_area(goal, 0.0) {
        return false;
    }
    if flags.contains(MoveFlags::STAY_OWN_HALF) && goal.x > 0.0 {
        return false;
    }
    true
}

/// Obstacles that matter for a request. Obstacles already containing the start are
/// dropped so a robot squeezed against another one can still move away.
fn relevant_obstacles(request: &NavRequest<'_>) -> Vec<Obstacle> {
    request
        .obstacles
        .iter()
        .filter(|o| !o.contains(request.start))
        .copied()
        .collect()
}

/// Drives straight at the goal and detours around the first blocking obstacle, up to a
/// fixed recursion depth.
#[derive(Debug, Clone)]
pub struct StraightLineNavigator {
    max_depth: u32,
}

impl StraightLineNavigator {
    pub fn new(settings: &NavigatorSettings) -> Self {
        Self {
            max_depth: settings.max_detour_depth,
        }
    }

    fn plan_rec(
        &self,
        start: Vector2,
        goal: Vector2,
        obstacles: &[Obstacle],
        field: &FieldGeometry,
        depth: u32,
    ) -> Vec<Vector2> {
        let blocking = obstacles
            .iter()
            .filter(|o| math::segment_hits_circle(start, goal, o.center, o.radius))
            .min_by(|a, b| {
                (a.center - start)
                    .norm()
                    .total_cmp(&(b.center - start).norm())
            });
        let Some(blocking) = blocking else {
            return vec![goal];
        };
        if depth == 0 {
            return Vec::new();
        }

        let dir = goal - start;
        let normal = Vector2::new(-dir.y, dir.x).normalize();
        let clearance = blocking.radius * 1.5;
        let mut detours = [
            blocking.center + normal * clearance,
            blocking.center - normal * clearance,
        ];
        // Pass on the side away from the obstacle center first.
        if (blocking.center - start).dot(&normal) > 0.0 {
            detours.swap(0, 1);
        }

        for waypoint in detours {
            if !field.contains_with_boundary(waypoint)
                || obstacles.iter().any(|o| o.contains(waypoint))
            {
                continue;
            }
            let first = self.plan_rec(start, waypoint, obstacles, field, depth - 1);
            if first.is_empty() {
                continue;
            }
            let second = self.plan_rec(waypoint, goal, obstacles, field, depth - 1);
            if second.is_empty() {
                continue;
            }
            return first.into_iter().chain(second).collect();
        }
        Vec::new()
    }
}

impl Navigator for StraightLineNavigator {
    fn plan(&self, request: &NavRequest<'_>) -> Vec<Vector2> {
        if !goal_permitted(request.goal, request.flags, request.field) {
            return Vec::new();
        }
        let obstacles = relevant_obstacles(request);
        if obstacles.iter().any(|o| o.contains(request.goal)) {
            return Vec::new();
        }
        self.plan_rec(
            request.start,
            request.goal,
            &obstacles,
            request.field,
            self.max_depth,
        )
    }
}

/// Samples paths with a dual RRT-connect inside the field and smooths them.
#[derive(Debug, Clone)]
pub struct RrtNavigator {
    step: f64,
    max_tries: usize,
}

impl RrtNavigator {
    pub fn new(settings: &NavigatorSettings) -> Self {
        Self {
            step: settings.rrt_step,
            max_tries: settings.rrt_max_tries as usize,
        }
    }
}

impl Navigator for RrtNavigator {
    fn plan(&self, request: &NavRequest<'_>) -> Vec<Vector2> {
        if !goal_permitted(request.goal, request.flags, request.field) {
            return Vec::new();
        }
        let obstacles = relevant_obstacles(request);
        let field = request.field;
        let is_free = |p: &[f64]| {
            let p = Vector2::new(p[0], p[1]);
            field.contains_with_boundary(p) && !obstacles.iter().any(|o| o.contains(p))
        };
        if !is_free(request.goal.as_slice()) {
            return Vec::new();
        }

        let half_l = field.half_length() + field.boundary_width;
        let half_w = field.half_width() + field.boundary_width;
        let result = rrt::dual_rrt_connect(
            request.start.as_slice(),
            request.goal.as_slice(),
            is_free,
            || {
                let mut rng = rand::thread_rng();
                let x = Uniform::new(-half_l, half_l).sample(&mut rng);
                let y = Uniform::new(-half_w, half_w).sample(&mut rng);
                vec![x, y]
            },
            self.step,
            self.max_tries,
        );
        let mut path = match result {
            Ok(path) => path,
            Err(err) => {
                log::debug!("RRT failed to reach {:?}: {}", request.goal, err);
                return Vec::new();
            }
        };
        rrt::smooth_path(&mut path, is_free, self.step, 100);

        path.into_iter()
            .skip(1)
            .map(|p| Vector2::new(p[0], p[1]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn request<'a>(
        start: Vector2,
        goal: Vector2,
        obstacles: &'a [Obstacle],
        field: &'a FieldGeometry,
    ) -> NavRequest<'a> {
        NavRequest {
            start,
            goal,
            obstacles,
            flags: MoveFlags::NONE,
            field,
        }
    }

    fn assert_clear(start: Vector2, path: &[Vector2], obstacles: &[Obstacle]) {
        let mut prev = start;
        for p in path {
            for o in obstacles {
                assert!(!math::segment_hits_circle(prev, *p, o.center, o.radius));
            }
            prev = *p;
        }
    }

    #[test]
    fn straight_path_without_obstacles() {
        let field = FieldGeometry::default();
        let nav = StraightLineNavigator::new(&NavigatorSettings::default());
        let goal = Vector2::new(1000.0, 500.0);
        let path = nav.plan(&request(Vector2::zeros(), goal, &[], &field));
        assert_eq!(path, vec![goal]);
    }

    #[test]
    fn detours_around_blocking_robot() {
        let field = FieldGeometry::default();
        let nav = StraightLineNavigator::new(&NavigatorSettings::default());
        let start = Vector2::new(-1000.0, 0.0);
        let goal = Vector2::new(1000.0, 0.0);
        let obstacles = [Obstacle {
            center: Vector2::zeros(),
            radius: 180.0,
        }];
        let path = nav.plan(&request(start, goal, &obstacles, &field));
        assert!(path.len() >= 2);
        assert_eq!(path.last().copied(), Some(goal));
        assert_clear(start, &path, &obstacles);
    }

    #[test]
    fn blocked_goal_gives_empty_path() {
        let field = FieldGeometry::default();
        let nav = StraightLineNavigator::new(&NavigatorSettings::default());
        let obstacles = [Obstacle {
            center: Vector2::new(1000.0, 0.0),
            radius: 180.0,
        }];
        let path = nav.plan(&request(
            Vector2::zeros(),
            Vector2::new(1050.0, 0.0),
            &obstacles,
            &field,
        ));
        assert!(path.is_empty());
    }

    #[test]
    fn start_inside_obstacle_is_ignored() {
        let field = FieldGeometry::default();
        let nav = StraightLineNavigator::new(&NavigatorSettings::default());
        let obstacles = [Obstacle {
            center: Vector2::new(50.0, 0.0),
            radius: 180.0,
        }];
        let goal = Vector2::new(-1000.0, 0.0);
        let path = nav.plan(&request(Vector2::zeros(), goal, &obstacles, &field));
        assert_eq!(path, vec![goal]);
    }

    #[test]
    fn flags_forbid_goals() {
        let field = FieldGeometry::default();
        let in_defense = Vector2::new(-5500.0, 0.0);
        assert!(goal_permitted(in_defense, MoveFlags::NONE, &field));
        assert!(!goal_permitted(
            in_defense,
            MoveFlags::AVOID_FRIENDLY_DEFENSE,
            &field
        ));
        assert!(!goal_permitted(
            Vector2::new(100.0, 0.0),
            MoveFlags::STAY_OWN_HALF,
            &field
        ));
        assert!(!goal_permitted(
            Vector2::new(9000.0, 0.0),
            MoveFlags::NONE,
            &field
        ));
    }

    #[test]
    fn obstacles_skip_self_and_add_ball_on_stop() {
        use stp_core::PlayerData;

        let me = PlayerId::new(0);
        let world = WorldData::new(0.0)
            .with_ball(Vector2::new(500.0, 0.0))
            .with_own_player(PlayerData::new(me, Vector2::zeros()))
            .with_own_player(PlayerData::new(PlayerId::new(1), Vector2::new(0.0, 500.0)))
            .with_opp_player(PlayerData::new(PlayerId::new(0), Vector2::new(0.0, -500.0)));
        let settings = NavigatorSettings::default();
        assert_eq!(
            obstacles_for(me, &world, MoveFlags::NONE, &settings).len(),
            2
        );
        let with_ball = obstacles_for(me, &world, MoveFlags::AVOID_BALL_STOP, &settings);
        assert_eq!(with_ball.len(), 3);
        assert_relative_eq!(with_ball[2].radius, settings.ball_avoid_radius);
    }

    #[test]
    fn rrt_reaches_goal_in_open_field() {
        let field = FieldGeometry::default();
        let nav = RrtNavigator::new(&NavigatorSettings::default());
        let goal = Vector2::new(800.0, -300.0);
        let path = nav.plan(&request(Vector2::zeros(), goal, &[], &field));
        let last = path.last().copied().unwrap();
        assert_relative_eq!(last.x, goal.x, epsilon = 1e-6);
        assert_relative_eq!(last.y, goal.y, epsilon = 1e-6);
    }

    #[test]
    fn rrt_rejects_goal_inside_obstacle() {
        let field = FieldGeometry::default();
        let nav = RrtNavigator::new(&NavigatorSettings::default());
        let obstacles = [Obstacle {
            center: Vector2::new(800.0, 0.0),
            radius: 200.0,
        }];
        let path = nav.plan(&request(
            Vector2::zeros(),
            Vector2::new(850.0, 0.0),
            &obstacles,
            &field,
        ));
        assert!(path.is_empty());
    }
}
