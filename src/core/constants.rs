// Frame pacing
pub const TARGET_FPS: f64 = 60.0;
pub const TARGET_FRAME_MS: f64 = 16.6;
pub const FPS_SAMPLE_INTERVAL_MS: f64 = 1000.0;
pub const FPS_HISTORY_LEN: usize = 10;
pub const FPS_THROTTLE_MARGIN: f64 = 5.0;

// Spatial grid
pub const SPATIAL_CELL_SIZE: f32 = 128.0;
pub const SPATIAL_CLEANUP_INTERVAL_MS: u64 = 5000;

// Pools
pub const PARTICLE_POOL_CAPACITY: usize = 512;
pub const HIT_SPARK_COUNT: usize = 6;
pub const HIT_SPARK_SPEED: f32 = 90.0;
pub const HIT_SPARK_LIFE_SECONDS: f32 = 0.35;

// Melee hitbox per combo step (index = sequence - 1)
pub const HITBOX_ANGLE_DEGREES: f32 = 270.0;
pub const HITBOX_BASE_RADIUS: f32 = 40.0;
pub const HITBOX_RADIUS_MULTIPLIERS: [f32; 4] = [1.0, 1.3, 1.6, 2.0];
pub const HITBOX_DURATIONS_MS: [u64; 4] = [400, 450, 500, 700];
pub const SEQUENCE_DAMAGE_MULTIPLIERS: [f64; 4] = [1.0, 1.2, 1.5, 2.0];
pub const MAX_COMBO_SEQUENCE: u8 = 4;
pub const COMBO_RESET_MS: u64 = 1500;

// Damage
pub const STRENGTH_DAMAGE_FACTOR: i64 = 2;
pub const CRIT_DAMAGE_MULTIPLIER: f64 = 1.5;
pub const HIT_FLAG_DURATION_MS: u64 = 200;
pub const KNOCKBACK_DISTANCE: f32 = 20.0;
pub const KNOCKBACK_DURATION_MS: u64 = 200;
pub const PERCENT_DIVISOR: f64 = 100.0;

// Experience
pub const MAX_LEVEL: u32 = 99;
pub const STARTING_EXP_TO_NEXT: u64 = 30;
pub const EXP_THRESHOLD_GROWTH: f64 = 1.1;
pub const STAT_POINTS_PER_LEVEL: u32 = 1;
pub const SKILL_POINT_MILESTONE: u32 = 10;
pub const SKILL_POINTS_PER_MILESTONE: u32 = 20;
pub const LEVEL_UP_DISPLAY_MS: u64 = 3000;

// Starting character
pub const STARTING_HEALTH: u32 = 100;
pub const STARTING_MANA: u32 = 50;
pub const STARTING_BASE_ATTACK: u32 = 5;
pub const STARTING_BASE_STAT: u32 = 1;
pub const MOVE_SPEED_UNITS_PER_SECOND: f32 = 140.0;
pub const HEALTH_PER_VITALITY: u32 = 10;

// World lifecycle
pub const CORPSE_REMOVAL_DELAY_MS: u64 = 1500;
pub const RESPAWN_WINDOW_MS: u64 = 30_000;
pub const ACTIVE_CACHE_REFRESH_MS: u64 = 1000;

// Boss behavior
pub const BOSS_AGGRO_RADIUS: f32 = 300.0;
pub const BOSS_ATTACK_RADIUS: f32 = 80.0;
pub const BOSS_ATTACK_COOLDOWN_MS: u64 = 3000;
pub const BOSS_WINDUP_MS: u64 = 800;
pub const BOSS_STRIKE_DAMAGE: u32 = 50;

// Enemy health by archetype
pub const METIN_HEALTH: u32 = 1200;
pub const STONE_OF_METIN_HEALTH: u32 = 1500;
pub const DESERT_METIN_HEALTH: u32 = 2200;
pub const STONE_OF_MAP1_HEALTH: u32 = 800;
pub const WHITE_TIGER_HEALTH: u32 = 3000;
pub const BOSS_HEALTH: u32 = 8000;

// Experience rewards by archetype
pub const METIN_EXP: u64 = 120;
pub const STONE_OF_METIN_EXP: u64 = 150;
pub const DESERT_METIN_EXP: u64 = 260;
pub const STONE_OF_MAP1_EXP: u64 = 60;
pub const WHITE_TIGER_EXP: u64 = 400;
pub const BOSS_EXP: u64 = 1500;

// Inventory
pub const INVENTORY_CAPACITY: usize = 45;
