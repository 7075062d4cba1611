//! Collision detection and response for a ball among axis-aligned rectangles
//!
//! Every obstacle in the maze (walls, borders, goal) is a rectangle, so the
//! only test needed is circle vs. AABB plus a reflection for the response.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the rectangle (if hit)
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a ball and an axis-aligned rectangle
///
/// Clamps the ball center onto the rectangle to find the closest point. When
/// the center is inside the rectangle, the ball is pushed out through the
/// nearest face.
pub fn ball_rect_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    rect_center: Vec2,
    half_extents: Vec2,
) -> CollisionResult {
    let min = rect_center - half_extents;
    let max = rect_center + half_extents;
    let closest = ball_pos.clamp(min, max);
    let delta = ball_pos - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > 0.0 {
        if dist_sq >= ball_radius * ball_radius {
            return CollisionResult::miss();
        }
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: delta / dist,
            penetration: ball_radius - dist,
        };
    }

    // Center inside the rectangle (tunneling or spawn overlap)
    let to_left = ball_pos.x - min.x;
    let to_right = max.x - ball_pos.x;
    let to_top = ball_pos.y - min.y;
    let to_bottom = max.y - ball_pos.y;

    let (depth, normal, point) = [
        (to_left, Vec2::NEG_X, Vec2::new(min.x, ball_pos.y)),
        (to_right, Vec2::X, Vec2::new(max.x, ball_pos.y)),
        (to_top, Vec2::NEG_Y, Vec2::new(ball_pos.x, min.y)),
        (to_bottom, Vec2::Y, Vec2::new(ball_pos.x, max.y)),
    ]
    .into_iter()
    .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
    .unwrap_or((0.0, Vec2::Y, ball_pos));

    CollisionResult {
        hit: true,
        point,
        normal,
        penetration: depth + ball_radius,
    }
}

/// Bounce off a surface, keeping `restitution` of the normal speed.
///
/// With `restitution == 1.0` this is the standard reflection
/// v' = v - 2(v·n)n. Velocities already leaving the surface are returned unchanged.
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let approach = velocity.dot(normal);
    if approach >= 0.0 {
        return velocity;
    }
    velocity - (1.0 + restitution) * approach * normal
}
