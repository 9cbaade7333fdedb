use courier_core::geometry::{Aabb, GravityDir};
use courier_core::timer::Timer;
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionSystem, resolve_horizontal, resolve_vertical};
use crate::config::{COINS_PER_HP_BONUS, PhysicsConfig};

/// Per-tick input intent for the controlled actor.
///
/// `jump` and `flip` are edge-triggered: true only on the tick the button
/// was pressed. `move_dir` is the held horizontal axis in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InputState {
    pub move_dir: f32,
    pub jump: bool,
    pub flip: bool,
}

/// Event-shaped outcomes of one player tick, for the audio/FX collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    Jumped,
    Flipped(GravityDir),
    /// Hit a ceiling-type face while moving fast.
    Bump,
    /// Stamina just drained to zero; manual flips are now locked.
    StaminaExhausted,
}

/// Result of a [`PlayerController::take_damage`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageOutcome {
    /// False when a gate (invulnerability, Flux Surge) swallowed the hit.
    pub applied: bool,
    /// HP just dropped to the critical threshold (1) from 2 or higher.
    /// The caller uses this to trigger the camera shake.
    pub critical: bool,
    pub died: bool,
}

impl DamageOutcome {
    fn blocked() -> Self {
        Self {
            applied: false,
            critical: false,
            died: false,
        }
    }
}

/// How an attacker's box touched a target's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Vertical, direction-consistent "landed on top" contact.
    Stomp,
    /// Any other contact: lateral, or vertical against the grain.
    Hit,
}

/// Classify a contact between an attacker and a target box.
///
/// The collision axis is the one with the *smaller* overlap; exact ties
/// resolve to horizontal, hence never a stomp. A vertical contact is a
/// stomp only when the attacker's center sits on the gravity side of the
/// target's center and its vertical velocity moves with gravity, mirrored
/// under inverted gravity. Returns `None` when the boxes do not overlap.
pub fn classify_contact(
    attacker: &Aabb,
    attacker_vel_y: f32,
    gravity: GravityDir,
    target: &Aabb,
) -> Option<ContactKind> {
    let overlap_x = attacker.overlap_x(target);
    let overlap_y = attacker.overlap_y(target);
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    if overlap_y < overlap_x {
        let stomp = match gravity {
            GravityDir::Down => {
                attacker.center_y() < target.center_y() && attacker_vel_y > 0.0
            },
            GravityDir::Up => attacker.center_y() > target.center_y() && attacker_vel_y < 0.0,
        };
        if stomp {
            return Some(ContactKind::Stomp);
        }
    }
    Some(ContactKind::Hit)
}

/// The controlled actor: position, velocity, gravity direction, stamina,
/// and the timer set that gates jumping and flipping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerController {
    aabb: Aabb,
    vel_x: f32,
    vel_y: f32,
    gravity_dir: GravityDir,
    on_ground: bool,

    hp: i32,
    alive: bool,
    coins: u32,
    last_hp_bonus_at: u32,

    // Stamina economy. The flip lock is a two-threshold hysteresis:
    // latched at empty, released only at a completely full pool.
    stamina: f32,
    max_stamina: f32,
    stamina_exhausted: bool,
    flip_locked: bool,

    flip_cooldown: Timer,
    coyote_timer: Timer,
    jump_buffer: Timer,
    invuln_timer: Timer,
    flux_surge_timer: Timer,

    stamina_boost: bool,
    double_shot: bool,
    facing_right: bool,

    checkpoint_x: f32,
    checkpoint_y: f32,
    checkpoint_coins: u32,
    checkpoint_hp_bonus_at: u32,

    cfg: PhysicsConfig,
}

impl PlayerController {
    pub fn new(x: f32, y: f32, cfg: PhysicsConfig) -> Self {
        Self {
            aabb: Aabb::new(x, y, cfg.player_width, cfg.player_height),
            vel_x: 0.0,
            vel_y: 0.0,
            gravity_dir: GravityDir::Down,
            on_ground: false,
            hp: cfg.player_hp,
            alive: true,
            coins: 0,
            last_hp_bonus_at: 0,
            stamina: 1.0,
            max_stamina: 1.0,
            stamina_exhausted: false,
            flip_locked: false,
            flip_cooldown: Timer::default(),
            coyote_timer: Timer::new(cfg.coyote_time),
            jump_buffer: Timer::new(cfg.jump_buffer_time),
            invuln_timer: Timer::default(),
            flux_surge_timer: Timer::default(),
            stamina_boost: false,
            double_shot: false,
            facing_right: true,
            checkpoint_x: x,
            checkpoint_y: y,
            checkpoint_coins: 0,
            checkpoint_hp_bonus_at: 0,
            cfg,
        }
    }

    /// One simulation tick. The step order is load-bearing: timers first,
    /// then stamina, intent, gates, gravity, and finally axis-separated
    /// movement against the tile grid.
    pub fn update(
        &mut self,
        dt: f32,
        input: &InputState,
        collision: &CollisionSystem,
    ) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        if !self.alive {
            return events;
        }

        // 1. Timers.
        self.flip_cooldown.tick(dt);
        self.coyote_timer.tick(dt);
        self.jump_buffer.tick(dt);
        self.invuln_timer.tick(dt);
        self.flux_surge_timer.tick(dt);

        // 2. Stamina.
        self.handle_stamina(dt, &mut events);

        // 3. Horizontal intent: velocity snaps to the target, no ramp.
        let move_dir = if input.move_dir.is_finite() {
            input.move_dir.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let speed = if self.flux_surge_timer.is_active() {
            self.cfg.boost_speed
        } else {
            self.cfg.run_speed
        };
        self.vel_x = move_dir * speed;
        if move_dir != 0.0 {
            self.facing_right = move_dir > 0.0;
        }

        // 4. Gravity flip.
        if input.flip && !self.flip_locked && !self.flip_cooldown.is_active() {
            self.gravity_dir = self.gravity_dir.flipped();
            self.flip_cooldown.start(self.cfg.flip_cooldown);
            // Halve the old fall so the flip feels immediate.
            self.vel_y *= 0.5;
            events.push(PlayerEvent::Flipped(self.gravity_dir));
        }

        // 5. Jump: coyote window refreshed while grounded, press buffered,
        // both must be live at once for the jump to fire.
        if self.on_ground {
            self.coyote_timer.start_default();
        }
        if input.jump {
            self.jump_buffer.start_default();
        }
        if self.jump_buffer.is_active() && self.coyote_timer.is_active() {
            self.vel_y = -self.cfg.jump_impulse * self.gravity_dir.sign();
            self.on_ground = false;
            self.jump_buffer.stop();
            self.coyote_timer.stop();
            events.push(PlayerEvent::Jumped);
        }

        // 6. Gravity, capped in the fall direction only.
        self.vel_y += self.cfg.gravity * self.gravity_dir.sign() * dt;
        match self.gravity_dir {
            GravityDir::Down => self.vel_y = self.vel_y.min(self.cfg.max_fall_speed),
            GravityDir::Up => self.vel_y = self.vel_y.max(-self.cfg.max_fall_speed),
        }

        // 7. Axis-separated movement.
        self.resolve_motion(dt, collision, &mut events);

        events
    }

    fn handle_stamina(&mut self, dt: f32, events: &mut Vec<PlayerEvent>) {
        let drain = self.cfg.stamina_drain_rate();
        if self.on_ground {
            let mut regen = self.cfg.stamina_regen_rate;
            if self.stamina_boost {
                regen *= 2.0;
            }
            self.stamina = (self.stamina + regen * dt).min(self.max_stamina);
            if self.stamina >= self.max_stamina {
                self.stamina_exhausted = false;
                self.flip_locked = false;
            }
        } else {
            self.stamina = (self.stamina - drain * dt).max(0.0);
            if self.stamina <= 0.0 && !self.stamina_exhausted {
                self.stamina_exhausted = true;
                self.flip_locked = true;
                events.push(PlayerEvent::StaminaExhausted);
            }
        }
        debug_assert!(self.stamina >= 0.0 && self.stamina <= self.max_stamina);
    }

    fn resolve_motion(
        &mut self,
        dt: f32,
        collision: &CollisionSystem,
        events: &mut Vec<PlayerEvent>,
    ) {
        self.on_ground = false;

        // Horizontal.
        self.aabb.x += self.vel_x * dt;
        if self.aabb.left() < 0.0 {
            self.aabb.x = 0.0;
            self.vel_x = 0.0;
        } else if self.aabb.right() > collision.world_width() {
            self.aabb.x = collision.world_width() - self.aabb.w;
            self.vel_x = 0.0;
        }
        let hits = collision.overlaps(&self.aabb, self.gravity_dir);
        resolve_horizontal(&mut self.aabb, &mut self.vel_x, &hits);

        // Vertical.
        self.aabb.y += self.vel_y * dt;
        if self.aabb.top() < 0.0 {
            self.aabb.y = 0.0;
            self.vel_y = 0.0;
        } else if self.aabb.bottom() > collision.world_height() {
            self.aabb.y = collision.world_height() - self.aabb.h;
            self.vel_y = 0.0;
        }
        let hits = collision.overlaps(&self.aabb, self.gravity_dir);
        let outcome = resolve_vertical(
            &mut self.aabb,
            &mut self.vel_y,
            self.gravity_dir,
            crate::config::BUMP_SPEED,
            &hits,
        );
        if outcome.landed {
            self.on_ground = true;
        }
        if outcome.bumped {
            events.push(PlayerEvent::Bump);
        }
    }

    /// Apply a hit. No-op while an invulnerability gate is open.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.invuln_timer.is_active() || self.flux_surge_timer.is_active() {
            return DamageOutcome::blocked();
        }
        let previous_hp = self.hp;
        self.hp = (self.hp - amount).max(0);
        self.invuln_timer.start(self.cfg.invuln_time);
        if self.hp == 0 {
            self.alive = false;
        }
        DamageOutcome {
            applied: true,
            critical: previous_hp >= 2 && self.hp == 1,
            died: !self.alive,
        }
    }

    /// Classify a contact with another actor's box using this controller's
    /// own box, vertical velocity, and gravity. The same rule drives
    /// enemy-defeat and boss-damage stomps elsewhere in the game.
    pub fn classify_contact(&self, target: &Aabb) -> Option<ContactKind> {
        classify_contact(&self.aabb, self.vel_y, self.gravity_dir, target)
    }

    /// Collect one coin; returns true when it granted the periodic HP bonus.
    pub fn collect_coin(&mut self) -> bool {
        self.coins += 1;
        let since_bonus = self.coins - self.last_hp_bonus_at;
        if since_bonus >= COINS_PER_HP_BONUS && self.hp < self.cfg.player_hp {
            self.hp += 1;
            self.last_hp_bonus_at = self.coins;
            return true;
        }
        false
    }

    /// Flux Surge: boosted speed and invulnerability for a fixed window.
    pub fn activate_flux_surge(&mut self) {
        self.flux_surge_timer.start(self.cfg.flux_surge_duration);
    }

    /// Permanent double-shot flag; projectiles live outside this core.
    pub fn activate_double_shot(&mut self) {
        self.double_shot = true;
    }

    /// Permanent stamina upgrade: the pool doubles, the current charge
    /// scales proportionally, regeneration doubles. Drain is untouched.
    pub fn activate_stamina_boost(&mut self) {
        if !self.stamina_boost {
            self.stamina_boost = true;
            self.max_stamina = 2.0;
            self.stamina = (self.stamina * 2.0).min(self.max_stamina);
        }
    }

    pub fn set_checkpoint(&mut self, x: f32, y: f32) {
        self.checkpoint_x = x;
        self.checkpoint_y = y;
        self.checkpoint_coins = self.coins;
        self.checkpoint_hp_bonus_at = self.last_hp_bonus_at;
    }

    /// Respawn at the last checkpoint: full HP and stamina, normal gravity,
    /// cleared gates. Permanent power-ups survive.
    pub fn respawn(&mut self) {
        self.aabb.x = self.checkpoint_x;
        self.aabb.y = self.checkpoint_y;
        self.vel_x = 0.0;
        self.vel_y = 0.0;
        self.gravity_dir = GravityDir::Down;
        self.hp = self.cfg.player_hp;
        self.alive = true;
        self.coins = self.checkpoint_coins;
        // Keeps last_hp_bonus_at <= coins; the bonus cadence restarts from
        // the checkpoint along with the coin count.
        self.last_hp_bonus_at = self.checkpoint_hp_bonus_at;
        self.invuln_timer.stop();
        self.flux_surge_timer.stop();
        self.stamina = self.max_stamina;
        self.stamina_exhausted = false;
        self.flip_locked = false;
    }

    // Read-only surface for the HUD and the enemy/hazard collaborators.

    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.vel_x, self.vel_y)
    }

    pub fn gravity_dir(&self) -> GravityDir {
        self.gravity_dir
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    pub fn max_stamina(&self) -> f32 {
        self.max_stamina
    }

    pub fn stamina_ratio(&self) -> f32 {
        if self.max_stamina > 0.0 {
            self.stamina / self.max_stamina
        } else {
            0.0
        }
    }

    pub fn is_flip_locked(&self) -> bool {
        self.flip_locked
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invuln_timer.is_active() || self.flux_surge_timer.is_active()
    }

    pub fn invuln_ratio(&self) -> f32 {
        self.invuln_timer.ratio()
    }

    pub fn is_flux_surge_active(&self) -> bool {
        self.flux_surge_timer.is_active()
    }

    pub fn flux_surge_time_left(&self) -> f32 {
        if self.flux_surge_timer.is_active() {
            self.flux_surge_timer.remaining()
        } else {
            0.0
        }
    }

    pub fn has_double_shot(&self) -> bool {
        self.double_shot
    }

    pub fn has_stamina_boost(&self) -> bool {
        self.stamina_boost
    }

    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    #[cfg(test)]
    pub(crate) fn set_position(&mut self, x: f32, y: f32) {
        self.aabb.x = x;
        self.aabb.y = y;
    }

    #[cfg(test)]
    pub(crate) fn set_stamina(&mut self, stamina: f32) {
        self.stamina = stamina;
    }
}
