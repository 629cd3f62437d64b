use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

pub const PLAYER_WIDTH: f64 = 20.0;
pub const PLAYER_HEIGHT: f64 = 28.0;
const PLAYER_SPEED: f64 = 7.0;
const PLAYER_AIR_SPEED: f64 = 5.5;
const JUMP_POWER: f64 = -14.0;
const GRAVITY: f64 = 0.9;
const FRICTION: f64 = 0.75;
const AIR_FRICTION: f64 = 0.9;
pub const MAX_SPEED: f64 = 10.0;
const PLAYER_START_X: f64 = 100.0;

pub const GROUND_HEIGHT: f64 = 120.0;
const BLOCK_SPACING: f64 = 200.0;
const BLOCK_HEIGHT: f64 = 40.0;
const INITIAL_BLOCK_WIDTH: f64 = 80.0;
const VIEW_DISTANCE: f64 = 1000.0;
const CULL_DISTANCE: f64 = 300.0;
const INITIAL_BLOCK_X: f64 = 400.0;
const INITIAL_COIN_X: f64 = 300.0;
const INITIAL_SPAN_END: f64 = 2000.0;
pub const COIN_RADIUS: f64 = 12.0;
const COIN_PLACEMENT_ATTEMPTS: usize = 10;

/// Keys held during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keys {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub on_ground: bool,
    pub facing: Facing,
    can_double_jump: bool,
    has_double_jumped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub collected: bool,
}

/// Endless side-scrolling level, advanced one frame at a time.
///
/// Blocks and coins are generated ahead of the player and culled once they
/// fall far enough behind the camera.
#[derive(Debug, Clone)]
pub struct World {
    width: f64,
    height: f64,
    player: Player,
    blocks: Vec<Block>,
    coins: Vec<Coin>,
    camera_x: f64,
    score: u32,
    last_block_x: f64,
    last_coin_x: f64,
    previous_keys: Keys,
    rng: SmallRng,
}

impl World {
    pub fn new(width: f64, height: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let ground_y = height - GROUND_HEIGHT;

        let mut world = World {
            width,
            height,
            player: Player {
                x: PLAYER_START_X,
                y: ground_y - PLAYER_HEIGHT,
                vx: 0.0,
                vy: 0.0,
                on_ground: false,
                facing: Facing::Right,
                can_double_jump: true,
                has_double_jumped: false,
            },
            blocks: Vec::new(),
            coins: Vec::new(),
            camera_x: 0.0,
            score: 0,
            last_block_x: 0.0,
            last_coin_x: 0.0,
            previous_keys: Keys::default(),
            rng,
        };
        world.generate_initial_blocks();
        world.generate_initial_coins();
        debug!(
            "Generated world with {} blocks and {} coins",
            world.blocks.len(),
            world.coins.len()
        );
        world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn camera_x(&self) -> f64 {
        self.camera_x
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn ground_y(&self) -> f64 {
        self.height - GROUND_HEIGHT
    }

    /// Height of the player's feet above the ground line.
    pub fn altitude(&self) -> f64 {
        self.ground_y() - self.player.y - PLAYER_HEIGHT
    }

    /// Forgets held keys so the next jump press counts as a new press.
    pub fn release_keys(&mut self) {
        self.previous_keys = Keys::default();
    }

    /// Advances the simulation by one frame.
    pub fn step(&mut self, keys: Keys) {
        self.generate_blocks_ahead();
        self.cull_blocks();
        self.generate_coins_ahead();
        self.cull_coins();
        self.collect_coins();

        self.apply_horizontal_input(keys);
        self.apply_jump(keys);
        self.previous_keys = keys;

        let player = &mut self.player;
        if player.on_ground {
            player.can_double_jump = true;
            player.has_double_jumped = false;
        } else {
            player.vy += GRAVITY;
        }
        player.x += player.vx;
        player.y += player.vy;

        self.resolve_ground();
        self.resolve_blocks();

        self.camera_x = (self.player.x - self.width / 3.0).max(0.0);
    }

    fn apply_horizontal_input(&mut self, keys: Keys) {
        let player = &mut self.player;
        let speed = if player.on_ground {
            PLAYER_SPEED
        } else {
            PLAYER_AIR_SPEED
        };

        if keys.left {
            player.vx -= speed;
            player.facing = Facing::Left;
        }
        if keys.right {
            player.vx += speed;
            player.facing = Facing::Right;
        }
        if !keys.left && !keys.right {
            player.vx *= if player.on_ground {
                FRICTION
            } else {
                AIR_FRICTION
            };
        }
        player.vx = player.vx.clamp(-MAX_SPEED, MAX_SPEED);
    }

    fn apply_jump(&mut self, keys: Keys) {
        if !keys.jump || self.previous_keys.jump {
            return;
        }
        let player = &mut self.player;
        if player.on_ground {
            player.vy = JUMP_POWER;
            player.on_ground = false;
            player.can_double_jump = true;
            player.has_double_jumped = false;
        } else if player.can_double_jump && !player.has_double_jumped {
            player.vy = JUMP_POWER;
            player.has_double_jumped = true;
            player.can_double_jump = false;
        }
    }

    fn resolve_ground(&mut self) {
        let ground_y = self.ground_y();
        let player = &mut self.player;
        if player.y + PLAYER_HEIGHT >= ground_y {
            player.y = ground_y - PLAYER_HEIGHT;
            player.vy = 0.0;
            player.on_ground = true;
        } else {
            player.on_ground = false;
        }
    }

    fn resolve_blocks(&mut self) {
        let player = &mut self.player;
        for block in &self.blocks {
            if !overlaps(player, block) {
                continue;
            }
            let horizontally_inside =
                player.x < block.x + block.width && player.x + PLAYER_WIDTH > block.x;

            if player.vy > 0.0 && player.y < block.y && player.y + PLAYER_HEIGHT > block.y {
                player.y = block.y - PLAYER_HEIGHT;
                player.vy = 0.0;
                player.on_ground = true;
            } else if player.vx > 0.0 && horizontally_inside {
                player.x = block.x - PLAYER_WIDTH;
                player.vx = 0.0;
            } else if player.vx < 0.0 && horizontally_inside {
                player.x = block.x + block.width;
                player.vx = 0.0;
            }
        }
    }

    fn collect_coins(&mut self) {
        let center_x = self.player.x + PLAYER_WIDTH / 2.0;
        let center_y = self.player.y + PLAYER_HEIGHT / 2.0;
        let reach = PLAYER_WIDTH.max(PLAYER_HEIGHT) / 2.0;

        for coin in self.coins.iter_mut().filter(|coin| !coin.collected) {
            let distance = (center_x - coin.x).hypot(center_y - coin.y);
            if distance < coin.radius + reach {
                coin.collected = true;
                self.score += 1;
                debug!("Collected coin at {:.0}, score {}", coin.x, self.score);
            }
        }
    }

    fn generate_initial_blocks(&mut self) {
        let ground_y = self.ground_y();
        let mut x = INITIAL_BLOCK_X;
        while x < INITIAL_SPAN_END {
            let lift = self.rng.random_range(60.0..140.0);
            self.blocks.push(Block {
                x,
                y: ground_y - lift,
                width: INITIAL_BLOCK_WIDTH,
                height: BLOCK_HEIGHT,
            });
            self.last_block_x = x;
            x += BLOCK_SPACING;
        }
    }

    fn generate_blocks_ahead(&mut self) {
        let ground_y = self.ground_y();
        let horizon = self.player.x + VIEW_DISTANCE;
        while self.last_block_x < horizon {
            self.last_block_x += BLOCK_SPACING + self.rng.random_range(-50.0..50.0);
            // leave an occasional gap
            if self.rng.random_bool(0.8) {
                let lift = self.rng.random_range(60.0..140.0);
                let width = self.rng.random_range(60.0..100.0);
                self.blocks.push(Block {
                    x: self.last_block_x,
                    y: ground_y - lift,
                    width,
                    height: BLOCK_HEIGHT,
                });
            }
        }
    }

    fn cull_blocks(&mut self) {
        let threshold = self.camera_x - CULL_DISTANCE;
        self.blocks.retain(|block| block.x > threshold);
    }

    fn generate_initial_coins(&mut self) {
        let mut x = INITIAL_COIN_X;
        while x < INITIAL_SPAN_END {
            if let Some(coin) = self.place_coin(x) {
                self.coins.push(coin);
                self.last_coin_x = x;
            }
            x += self.rng.random_range(150.0..250.0);
        }
    }

    fn generate_coins_ahead(&mut self) {
        let horizon = self.player.x + VIEW_DISTANCE;
        while self.last_coin_x < horizon {
            self.last_coin_x += self.rng.random_range(150.0..250.0);
            if let Some(coin) = self.place_coin(self.last_coin_x) {
                self.coins.push(coin);
            }
        }
    }

    /// Rolls for a coin at `x`, retrying its height until it clears every
    /// block. Gives up after a fixed number of attempts.
    fn place_coin(&mut self, x: f64) -> Option<Coin> {
        if !self.rng.random_bool(0.6) {
            return None;
        }
        let ground_y = self.ground_y();
        let mut y = ground_y - self.rng.random_range(80.0..180.0);
        let mut attempts = 0;
        while self.coin_overlaps_block(x, y) && attempts < COIN_PLACEMENT_ATTEMPTS {
            y = ground_y - self.rng.random_range(80.0..180.0);
            attempts += 1;
        }
        if self.coin_overlaps_block(x, y) {
            return None;
        }
        Some(Coin {
            x,
            y,
            radius: COIN_RADIUS,
            collected: false,
        })
    }

    fn coin_overlaps_block(&self, x: f64, y: f64) -> bool {
        self.blocks.iter().any(|block| {
            let closest_x = x.clamp(block.x, block.x + block.width);
            let closest_y = y.clamp(block.y, block.y + block.height);
            (x - closest_x).hypot(y - closest_y) < COIN_RADIUS
        })
    }

    fn cull_coins(&mut self) {
        let threshold = self.camera_x - CULL_DISTANCE;
        self.coins.retain(|coin| !coin.collected && coin.x > threshold);
    }
}

fn overlaps(player: &Player, block: &Block) -> bool {
    player.x < block.x + block.width
        && player.x + PLAYER_WIDTH > block.x
        && player.y < block.y + block.height
        && player.y + PLAYER_HEIGHT > block.y
}
