pub type Register = u8;

// Register map
pub const VERSION: Register = 0x00;
pub const MODE: Register = 0x01;
pub const PARTICLES: Register = 0x02;

pub const VERSION_LEN: usize = 1;
pub const PARTICLES_LEN_I2C: usize = 16;
pub const PARTICLES_LEN_UART: usize = 20;

// Mode control codes, written to MODE
pub const MODE_LOW_POWER: u8 = 0x00;
pub const MODE_ACTIVE_REPORTING: u8 = 0x01;
pub const MODE_AWAKE: u8 = 0x02;

// Particle counts follow the six concentration words
pub const COUNT_OFFSET: usize = 12;

pub const DEFAULT_ADDR: u8 = 0x19;
