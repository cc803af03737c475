//! Entity-level collision checks
//!
//! Everything reduces to [`overlaps`] on bounding boxes. The only rule beyond
//! geometry is that a bullet never touches the tank that fired it.

use super::rect::{Rect, overlaps};
use super::state::{Bullet, Obstacle, Tank};

/// Check if a box overlaps any obstacle
pub fn rect_hits_obstacles(rect: &Rect, obstacles: &[Obstacle]) -> bool {
    obstacles.iter().any(|obstacle| overlaps(rect, &obstacle.rect))
}

/// Check if a tank is colliding with any obstacle
pub fn tank_obstacle_collision(tank: &Tank, obstacles: &[Obstacle]) -> bool {
    rect_hits_obstacles(&tank.rect(), obstacles)
}

/// Check if two tanks' boxes overlap
pub fn tank_tank_collision(a: &Tank, b: &Tank) -> bool {
    overlaps(&a.rect(), &b.rect())
}

/// Check if a bullet strikes a tank (never its owner)
pub fn bullet_tank_collision(bullet: &Bullet, tank: &Tank) -> bool {
    if bullet.owner == tank.id {
        return false;
    }
    overlaps(&bullet.rect(), &tank.rect())
}

/// Check if a bullet is colliding with any obstacle
pub fn bullet_obstacle_collision(bullet: &Bullet, obstacles: &[Obstacle]) -> bool {
    rect_hits_obstacles(&bullet.rect(), obstacles)
}
