//! Headless simulation harness around [`convex_collide`].
//!
//! One input-driven mover polygon lives among static obstacle polygons.
//! Each tick applies the movement intent from an explicit input snapshot,
//! then runs collision resolution against every obstacle, so the mover slides
//! along whatever it is pushed into. No rendering, no event loop, no frame
//! pacing - callers own all of that.

use convex_collide::{Polygon, Vec2};
use rand::Rng;
use tracing::instrument;

/// The pressed state of the four movement keys, sampled once per tick.
///
/// A plain value handed into [`Arena::tick`] - the simulation reads no
/// ambient input state. Opposite directions don't cancel: up wins over down
/// and left wins over right, matching classic else-if key handling.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputSnapshot {
    /// The movement intent this snapshot asks for, in units of `move_speed`.
    /// Screen-space axes: positive y is down.
    pub fn direction(&self) -> Vec2 {
        let mut direction = Vec2::default();
        if self.up {
            direction.y = -1.;
        } else if self.down {
            direction.y = 1.;
        }
        if self.left {
            direction.x = -1.;
        } else if self.right {
            direction.x = 1.;
        }
        direction
    }
}

/// An arena with one movable polygon and a set of static obstacles.
#[derive(Clone, PartialEq, Debug)]
pub struct Arena {
    /// The polygon driven by input and corrected by collision resolution.
    pub mover: Polygon,
    /// Static polygons the mover is pushed out of.
    pub obstacles: Vec<Polygon>,
    /// Distance the mover travels per tick per pressed direction.
    pub move_speed: f32,
    /// The width of the arena (positions should stay within `0-width`).
    pub width: f32,
    /// The height of the arena (positions should stay within `0-height`).
    pub height: f32,
}

impl Arena {
    /// The classic demo scene: a heptagon mover and an octagon obstacle in a
    /// 640x480 arena, move speed 2 per tick.
    pub fn fixed_demo() -> Arena {
        let mover = Polygon::regular(Vec2::new(64., 64.), 7, Vec2::new(32., 32.)).unwrap();
        let obstacle = Polygon::regular(Vec2::new(128., 96.), 8, Vec2::new(32., 32.)).unwrap();
        Arena {
            mover,
            obstacles: vec![obstacle],
            move_speed: 2.,
            width: 640.,
            height: 480.,
        }
    }

    /// Generate a random arena of the given size, full of regular-polygon
    /// obstacles placed fully inside the bounds.
    pub fn new_random<R: Rng>(rng: &mut R, width: f32, height: f32) -> Arena {
        let mut obstacles = Vec::new();
        for _ in 0..8 {
            let scale = rng.gen_range(10f32..40f32);
            let sides = rng.gen_range(3..=8);
            let position = Vec2::new(
                rng.gen_range(scale..width - scale),
                rng.gen_range(scale..height - scale),
            );
            obstacles.push(Polygon::regular(position, sides, Vec2::new(scale, scale)).unwrap());
        }
        let mover = Polygon::regular(Vec2::new(width / 2., height / 2.), 7, Vec2::new(16., 16.))
            .unwrap();
        Arena {
            mover,
            obstacles,
            move_speed: 2.,
            width,
            height,
        }
    }

    /// Advance the simulation by one tick: apply the movement intent, then
    /// push the mover out of every obstacle it penetrates.
    ///
    /// Returns the net collision correction applied this tick, if any.
    #[instrument(skip(self))]
    pub fn tick(&mut self, input: &InputSnapshot) -> Option<Vec2> {
        self.mover.position += input.direction() * self.move_speed;

        let mut correction = None;
        for obstacle in &self.obstacles {
            if let Some(displacement) = self.mover.resolve_against(obstacle) {
                *correction.get_or_insert(Vec2::default()) += displacement;
            }
        }
        correction
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn walled_arena() -> Arena {
        Arena {
            mover: Polygon::axis_box(Vec2::new(0., 0.), 2., 2.).unwrap(),
            obstacles: vec![Polygon::axis_box(Vec2::new(4., 0.), 2., 2.).unwrap()],
            move_speed: 1.,
            width: 100.,
            height: 100.,
        }
    }

    #[test]
    fn input_direction_follows_keys() {
        let idle = InputSnapshot::default();
        assert_eq!(Vec2::default(), idle.direction());

        let up_right = InputSnapshot {
            up: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(Vec2::new(1., -1.), up_right.direction());

        // Else-if precedence: up beats down, left beats right.
        let all = InputSnapshot {
            up: true,
            down: true,
            left: true,
            right: true,
        };
        assert_eq!(Vec2::new(-1., -1.), all.direction());
    }

    #[test]
    fn tick_moves_by_speed_when_clear() {
        let mut arena = Arena::fixed_demo();
        let start = arena.mover.position;
        let correction = arena.tick(&InputSnapshot {
            right: true,
            ..Default::default()
        });
        assert_eq!(None, correction);
        assert_eq!(Vec2::new(start.x + 2., start.y), arena.mover.position);
    }

    #[test]
    fn mover_cannot_push_through_obstacle() {
        let mut arena = walled_arena();
        let hold_right = InputSnapshot {
            right: true,
            ..Default::default()
        };
        let mut corrected = false;
        for _ in 0..20 {
            corrected |= arena.tick(&hold_right).is_some();
            let obstacle = &arena.obstacles[0];
            assert!(!arena.mover.collides_with(obstacle));
            // The obstacle face is at x=3, the mover is 1 wide around its
            // position, so the position can never pass x=2.
            assert!(arena.mover.position.x <= 2.);
        }
        assert!(corrected);
        assert_eq!(2., arena.mover.position.x);
    }

    #[test]
    fn correction_is_reported_to_the_caller() {
        let mut arena = walled_arena();
        arena.mover.position = Vec2::new(2.5, 0.);
        assert!(arena.mover.collides_with(&arena.obstacles[0]));
        let correction = arena.tick(&InputSnapshot::default()).unwrap();
        assert_eq!(Vec2::new(-0.5, 0.), correction);
        assert!(!arena.mover.collides_with(&arena.obstacles[0]));
    }

    #[test]
    fn random_arena_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let arena = Arena::new_random(&mut rng, 200., 150.);
        assert!(!arena.obstacles.is_empty());
        for polygon in arena.obstacles.iter().chain([&arena.mover]) {
            for v in polygon.global_vertices() {
                assert!(v.x >= 0. && v.x <= 200., "x out of bounds: {v:?}");
                assert!(v.y >= 0. && v.y <= 150., "y out of bounds: {v:?}");
            }
        }
    }

    #[test]
    fn tick_runs_under_a_subscriber() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let mut arena = walled_arena();
            arena.mover.position = Vec2::new(3., 0.);
            let correction = arena.tick(&InputSnapshot::default());
            assert!(correction.is_some());
        });
    }
}
